//! Command-line entry point for the visual/layout defect auditor.

use clap::Parser;

mod cli;
mod config;
mod error;
mod logging;
mod output;
mod run;

use cli::Cli;
use error::ExitCode;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let log_format: logging::LogFormat = cli.log_format.parse().unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(ExitCode::UserError.as_i32());
    });
    if !cli.quiet {
        logging::init(cli.verbose, log_format);
    }

    let code = match run_cli(&cli).await {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::UserError
        }
    };

    std::process::exit(code.as_i32());
}

async fn run_cli(cli: &Cli) -> anyhow::Result<()> {
    let config = config::build_config(cli)?;
    let result = run::execute(&config).await?;
    output::write_result(&single_or_multi(&config, result), config.save.as_deref())?;
    Ok(())
}

/// Per the documented output shapes: a single fixed URL (non-crawl)
/// serializes as a bare [`domsentry_types::AuditResult`]; everything
/// else (multiple URLs, or a crawl) serializes as the multi-URL shape.
fn single_or_multi(
    config: &domsentry_types::Config,
    mut result: domsentry_types::MultiUrlAuditResult,
) -> serde_json::Value {
    if config.crawl.is_none() && config.urls.len() == 1 && result.results.len() <= 1 {
        match result.results.pop() {
            Some(single) => serde_json::to_value(single).unwrap_or(serde_json::Value::Null),
            None => serde_json::to_value(result).unwrap_or(serde_json::Value::Null),
        }
    } else {
        serde_json::to_value(result).unwrap_or(serde_json::Value::Null)
    }
}
