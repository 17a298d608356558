use clap::Parser;
use solr_dump::fetch::{dump_core, DEFAULT_FETCH_SIZE};
use solr_dump::fields::FieldProjection;
use solr_dump::{FetchConfig, SolrClient, DEFAULT_SOLR_URL};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Dump a Solr core into numbered JSON files using cursor paging
#[derive(Debug, Parser)]
#[command(version)]
struct FetchArgs {
    /// Core name
    #[arg(short, long)]
    core: String,

    /// uniqueKey field name of the core
    #[arg(long = "uniqueKey")]
    unique_key: String,

    /// Directory to dump data into (default: core name)
    #[arg(short, long)]
    target: Option<PathBuf>,

    /// Solr base url
    #[arg(long, default_value = DEFAULT_SOLR_URL)]
    solr: String,

    /// Rows per page
    #[arg(long = "fetchSize", default_value_t = DEFAULT_FETCH_SIZE)]
    fetch_size: usize,

    /// Field list to request instead of the built-in one for this core
    #[arg(long)]
    fl: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl FetchArgs {
    fn into_config(self) -> FetchConfig {
        let mut fields = FieldProjection::builtin();
        if let Some(fl) = &self.fl {
            fields = fields.with_override(&self.core, fl);
        }
        FetchConfig {
            target_dir: self.target.unwrap_or_else(|| PathBuf::from(&self.core)),
            fetch_size: self.fetch_size,
            fields,
            ..FetchConfig::new(&self.core, &self.unique_key)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = FetchArgs::parse();
    solr_dump::logging::init(args.verbose);

    let client = SolrClient::new(&args.solr);
    let config = args.into_config();

    match dump_core(client, config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
