use clap::Parser;
use solr_dump::{FailurePolicy, LoadConfig, Loader, SolrClient, DEFAULT_SOLR_URL};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Post JSON dump files from a directory to a Solr core's update handler
#[derive(Debug, Parser)]
#[command(version)]
struct LoadArgs {
    /// Core name
    #[arg(short, long)]
    core: String,

    /// Directory to load json dump files from
    #[arg(short, long)]
    dir: PathBuf,

    /// Solr base url
    #[arg(long, default_value = DEFAULT_SOLR_URL)]
    solr: String,

    /// Only post files whose names match this glob
    #[arg(long, default_value = "*")]
    pattern: String,

    /// Stop at the first file Solr does not accept
    #[arg(long)]
    fail_fast: bool,

    /// Show a progress bar
    #[arg(long)]
    progress: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl LoadArgs {
    fn into_config(self) -> LoadConfig {
        LoadConfig {
            pattern: self.pattern,
            on_failure: if self.fail_fast {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Continue
            },
            progress: self.progress,
            ..LoadConfig::new(&self.core, self.dir)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = LoadArgs::parse();
    solr_dump::logging::init(args.verbose);

    let client = SolrClient::new(&args.solr);
    match Loader::new(client, args.into_config()).run().await {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
