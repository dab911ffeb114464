//! Markdown rendering command.

use std::path::Path;

use pageshell::markdown::MarkdownRenderer;

/// Render a markdown file and print the wrapped HTML.
pub async fn cmd_markdown(file: &Path) -> anyhow::Result<()> {
    let source = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    println!("{}", MarkdownRenderer::new().render(&source));
    Ok(())
}
