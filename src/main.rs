use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind as ClapErrorKind;
use clap::{CommandFactory, Parser};

use meta_collector::{fetch, logging, parse_file, parse_url, Attributes, CollectError};

/// collect - print the social metadata (Open Graph, Twitter Cards, App Links, icons) of a page
#[derive(Parser, Debug)]
#[command(name = "collect", disable_version_flag = true)]
struct Cli {
    /// Local HTML file (starting with `~`, `.` or `/`) or URL to fetch
    #[arg(value_name = "PATH|URL")]
    targets: Vec<String>,

    /// Show version information
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// User agent string for HTTP requests
    #[arg(long)]
    user_agent: Option<String>,

    /// Log file path (optional, for debugging)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn version_line() -> String {
    format!(
        "collect version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}

/// Things which look like paths start with "~", "." or "/".
fn is_path(target: &str) -> bool {
    target.starts_with('~') || target.starts_with('.') || target.starts_with('/')
}

/// clap's rendered error without its own `error: ` lead-in.
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .trim_start_matches("error: ")
        .trim_end()
        .to_string()
}

async fn collect(cli: &Cli) -> Result<Attributes> {
    let [target] = cli.targets.as_slice() else {
        eprintln!("{}", Cli::command().render_usage());
        return Err(CollectError::ArgumentCount(cli.targets.len()).into());
    };

    let attrs = if is_path(target) {
        parse_file(target)?
    } else {
        let user_agent = cli
            .user_agent
            .as_deref()
            .unwrap_or(fetch::CRAWLER_USER_AGENT);
        tracing::debug!("User-Agent: {}", user_agent);
        let client = fetch::create_client(user_agent)?;
        parse_url(&client, target).await?
    };

    Ok(attrs)
}

fn print_json(attrs: &Attributes) -> Result<()> {
    let mut out = io::stdout().lock();
    attrs.write_json(&mut out).map_err(CollectError::from)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.kind() == ClapErrorKind::DisplayHelp => {
            eprintln!("{}", version_line());
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            println!("ERROR: {}", clap_message(&err));
            return ExitCode::FAILURE;
        }
    };

    if cli.version {
        eprintln!("{}", version_line());
        return ExitCode::SUCCESS;
    }

    if let Err(err) = logging::init_logging(cli.log_file.as_deref()) {
        println!("ERROR: failed to open log file: {}", err);
        return ExitCode::FAILURE;
    }

    let result = match collect(&cli).await {
        Ok(attrs) => print_json(&attrs),
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(collect_err) = err.downcast_ref::<CollectError>() {
                tracing::debug!("{:?} error: {:?}", collect_err.kind(), collect_err);
            }
            println!("ERROR: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
