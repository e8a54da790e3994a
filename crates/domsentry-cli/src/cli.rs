//! CLI flag surface, parsed with `clap` derive macros the same way
//! `riptide-cli/src/main.rs` does.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "domsentry")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless-browser visual/layout defect auditor", long_about = None)]
pub struct Cli {
    /// Single URL to audit (exclusive with --urls).
    #[arg(long)]
    pub url: Option<String>,

    /// Multiple URLs to audit.
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub urls: Vec<String>,

    /// Rendering viewport: desktop, tablet, mobile, or WxH.
    #[arg(long, default_value = "desktop")]
    pub viewport: String,

    /// Output format; only "json" is accepted.
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Write the result JSON to this path instead of stdout.
    #[arg(long)]
    pub save: Option<std::path::PathBuf>,

    /// Stop the whole run on the first critical issue.
    #[arg(long)]
    pub exit_early: bool,

    /// Comma/space-separated detector names; defaults to every detector
    /// except `centering`.
    #[arg(long)]
    pub detectors: Option<String>,

    /// Verbose logging (debug level).
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Suppress non-error log output to stderr.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Log line format.
    #[arg(long, default_value = "text")]
    pub log_format: String,

    /// Enable crawl mode (requires exactly one URL).
    #[arg(long)]
    pub crawl: bool,

    /// Maximum link depth from the seed, 1-10.
    #[arg(long, default_value_t = 3)]
    pub max_depth: u32,

    /// Maximum number of pages to process, 1-1000.
    #[arg(long, default_value_t = 50)]
    pub max_pages: u32,

    /// Maximum number of concurrently processing pages, 1-10.
    #[arg(long, default_value_t = 3)]
    pub max_threads: u32,

    /// Whether subdomains of the base host count as internal (crawl mode).
    #[arg(long)]
    pub include_subdomains: bool,

    /// Case-insensitive substrings; a crawled link matching any is dropped.
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub exclude_patterns: Vec<String>,

    /// Case-insensitive substrings; when non-empty, only matching
    /// crawled links are kept.
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub include_patterns: Vec<String>,
}
