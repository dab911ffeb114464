//! Navigation commands: one-shot `open` and the interactive `browse` loop.

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use pageshell::config::Config;
use pageshell::fetch::fetcher_for_site;
use pageshell::navigator::{Action, Command, Navigation, Snapshot};
use pageshell::transition::TransitionConfig;
use pageshell::{LoadOptions, MemoryDocument, Navigator};

use super::PageArgs;
use crate::cli::icons::{self, dim_arrow, error, info};

fn build_navigator(config: &Config, page: &PageArgs) -> anyhow::Result<Navigator<MemoryDocument>> {
    let document = if page.standalone {
        MemoryDocument::standalone(&page.location)
    } else {
        MemoryDocument::composing(&page.location)
    };
    let fetcher = fetcher_for_site(&config.site, config.timeout())?;
    let mut navigator = Navigator::from_config(document, fetcher, config);
    if page.instant {
        navigator = navigator.with_transition(TransitionConfig::instant());
    }
    Ok(navigator)
}

fn print_outcome(outcome: &Navigation) {
    println!("{} {}", icons::navigation(outcome), outcome);
}

fn print_snapshot(config: &Config, snapshot: &Snapshot) {
    println!("{} location: {}", info(), snapshot.location);
    println!(
        "{} history: {}",
        info(),
        if snapshot.pages.is_empty() {
            "(empty)".to_string()
        } else {
            snapshot.pages.join(" > ")
        }
    );
    match &snapshot.container {
        Some(html) => {
            println!("{}", style(format!("#{}", config.container_id)).bold());
            println!("{}", html);
        }
        None => println!("{} no #{} on this page", dim_arrow(), config.container_id),
    }
}

/// Load each page in turn and print the final state.
pub async fn cmd_open(config: &Config, page: &PageArgs, pages: &[String]) -> anyhow::Result<()> {
    let mut navigator = build_navigator(config, page)?;

    for target in pages {
        let outcome = navigator.load_page(target, LoadOptions::default()).await;
        print_outcome(&outcome);
    }

    print_snapshot(config, &navigator.snapshot());
    Ok(())
}

/// Parse one line of `browse` input.
fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match verb {
        "" => Ok(None),
        "go" | "open" if !rest.is_empty() => Ok(Some(Command::navigate(rest))),
        "back" => Ok(Some(Command::Back)),
        "click" if !rest.is_empty() => rest.parse::<Action>().map(|a| Some(Command::Click(a))),
        "quit" | "exit" => Ok(Some(Command::Quit)),
        _ => Err(format!("unknown command: {}", line)),
    }
}

const BROWSE_HELP: &str =
    "commands: go <page> | back | click <id>|back|close overlay-N | show | quit";

/// Interactive loop: stdin lines become navigator commands.
pub async fn cmd_browse(config: &Config, page: &PageArgs) -> anyhow::Result<()> {
    let mut navigator = build_navigator(config, page)?;
    let (tx, rx) = mpsc::channel::<Command>(16);

    println!("{} {}", info(), BROWSE_HELP);

    let reader_config = config.clone();
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim() == "show" {
                let (reply_tx, reply_rx) = oneshot::channel();
                if tx.send(Command::Show(reply_tx)).await.is_err() {
                    break;
                }
                if let Ok(snapshot) = reply_rx.await {
                    print_snapshot(&reader_config, &snapshot);
                }
                continue;
            }

            match parse_line(&line) {
                Ok(Some(command)) => {
                    let quit = matches!(command, Command::Quit);
                    if tx.send(command).await.is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => println!("{} {} ({})", error(), e, BROWSE_HELP),
            }
        }
    });

    navigator.run(rx).await;
    reader.abort();

    print_snapshot(config, &navigator.snapshot());
    Ok(())
}
