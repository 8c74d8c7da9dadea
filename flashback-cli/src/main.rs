mod bookmarks;
mod config;
mod history;
mod output;
mod profile;
mod prompt;
mod tabs;

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flashback_rs::palette::now_ms;
use flashback_rs::session::DEBOUNCE;
use flashback_rs::theme::current_theme;
use flashback_rs::{
    activate, dispatch, Browser, Candidate, Host, JsonThemeStore, Key, KeyOutcome, Outcome, Palette, Query,
};
use tracing_subscriber::EnvFilter;

use config::Config;
use profile::ProfileBrowser;
use prompt::TerminalConfirm;

#[derive(Parser)]
#[command(name = "flashback")]
#[command(about = "Command palette over Chromium history, bookmarks, and tabs")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Browser profile name
    #[arg(short, long, default_value = "Default", global = true)]
    profile: String,

    /// Browser user data directory (defaults to Chrome's)
    #[arg(long, env = "FLASHBACK_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Theme preference file
    #[arg(long, global = true)]
    theme_file: Option<PathBuf>,

    /// Output a single JSON object instead of newline-delimited rows
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a palette query and print the rows
    Query {
        /// Palette input, e.g. "github:issues", "/tabs rust", "=2*21"
        #[arg(default_value = "")]
        text: String,
    },

    /// Run a palette query and activate one row
    Open {
        /// Palette input
        #[arg(default_value = "")]
        text: String,

        /// Row to activate (defaults to the first)
        #[arg(short, long)]
        index: Option<usize>,

        /// Answer yes to confirmations
        #[arg(short, long)]
        yes: bool,

        /// Log navigation and clipboard writes instead of performing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Interactive palette: each line replaces the input, :up :down :enter :esc
    Shell {
        /// Log navigation and clipboard writes instead of performing them
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FLASHBACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let global = cli.global;

    let config = Config::new(&global.profile, global.data_dir, global.theme_file)?;
    let themes = JsonThemeStore::new(config.theme_path.clone());

    match cli.command {
        Commands::Query { text } => {
            let browser = ProfileBrowser::new(config);
            let rows = query_rows(&browser, &text);

            if global.json {
                output::print_search_result(&rows);
            } else {
                output::print_rows(&rows, None);
            }
        }

        Commands::Open {
            text,
            index,
            yes,
            dry_run,
        } => {
            let browser = ProfileBrowser::new(config).dry_run(dry_run);
            let confirm = TerminalConfirm::new(yes);
            let host = Host::new(&browser, &themes, &confirm);

            let rows = query_rows(&browser, &text);
            if rows.is_empty() {
                output::print_rows(&rows, None);
                return Ok(());
            }

            let index = index.unwrap_or(0);
            let item = rows
                .get(index)
                .with_context(|| format!("no row {} for '{}' ({} rows)", index, text, rows.len()))?;

            let outcome = match activate(item, &host) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(error = %e, title = item.display_title(), "activation failed");
                    return Ok(());
                }
            };
            tracing::info!(?outcome, title = item.display_title(), "activated");

            match outcome {
                Outcome::Requery(next) | Outcome::Prefill(next) => {
                    output::print_rows(&query_rows(&browser, &next), None);
                }
                Outcome::Close | Outcome::Stay => {}
            }
        }

        Commands::Shell { dry_run } => {
            let browser = ProfileBrowser::new(config).dry_run(dry_run);
            let confirm = TerminalConfirm::new(false);
            tracing::debug!(theme = %current_theme(&themes), "starting shell");
            shell(Host::new(&browser, &themes, &confirm))?;
        }
    }

    Ok(())
}

/// Dispatch `text`; a failing collaborator is logged and yields no rows.
fn query_rows(browser: &dyn Browser, text: &str) -> Vec<Candidate> {
    match dispatch(&Query::parse(text), browser, now_ms()) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, input = text, "query failed");
            Vec::new()
        }
    }
}

fn parse_key(line: &str) -> Option<Key> {
    match line {
        ":up" => Some(Key::Up),
        ":down" => Some(Key::Down),
        ":enter" => Some(Key::Enter),
        ":esc" => Some(Key::Escape),
        _ => None,
    }
}

fn shell(host: Host<'_>) -> Result<()> {
    let mut palette = Palette::new(host);
    palette.toggle();
    print_session(&palette);

    // stdin is not held across iterations: confirmations read from it too
    let mut buf = String::new();
    loop {
        buf.clear();
        if io::stdin().read_line(&mut buf).context("failed to read input")? == 0 {
            break;
        }
        let line = buf.trim_end_matches(['\r', '\n']);

        match parse_key(line.trim()) {
            Some(key) => {
                let outcome = palette.key(key);
                if outcome == KeyOutcome::Ignored {
                    continue;
                }
                if !palette.session().is_visible() {
                    // reopen so the next line starts a fresh palette
                    palette.toggle();
                }
            }
            None => {
                let now = Instant::now();
                palette.input(line, now);
                palette.tick(now + DEBOUNCE);
            }
        }
        print_session(&palette);
    }

    Ok(())
}

fn print_session(palette: &Palette<'_>) {
    let session = palette.session();
    output::print_rows(session.results(), session.selected());
}
