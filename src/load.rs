//! Posting dump files back into a core, one file at a time

use crate::dump::{parse_serial, serial_gaps};
use crate::error::{Error, Result};
use crate::SolrClient;
use pbr::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use wax::{Glob, Pattern};

/// What to do when Solr rejects a file or the post fails in transit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and move on to the next file
    #[default]
    Continue,
    /// Stop at the first failed file
    Abort,
}

/// Settings of one load run
#[derive(Clone, Debug)]
pub struct LoadConfig {
    /// Core the documents are posted to
    pub core: String,
    pub dir: PathBuf,
    /// Glob matched against file names in `dir`
    pub pattern: String,
    pub on_failure: FailurePolicy,
    pub progress: bool,
}

impl LoadConfig {
    pub fn new(core: &str, dir: impl Into<PathBuf>) -> LoadConfig {
        LoadConfig {
            core: core.to_string(),
            dir: dir.into(),
            pattern: "*".to_string(),
            on_failure: FailurePolicy::default(),
            progress: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadSummary {
    pub posted: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Check that `path` is a directory we can list
pub fn prepare_source_dir(path: &Path) -> Result<()> {
    let meta = std::fs::metadata(path).map_err(|cause| Error::DirectoryNotFound {
        path: path.to_path_buf(),
        cause,
    })?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Regular files in `dir` whose names match `pattern`, sorted by name
pub fn list_dump_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let glob = Glob::new(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            warn!(file = ?name, "skipping file with non UTF-8 name");
            continue;
        };
        if glob.is_match(name) {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Warn about names that do not look like one contiguous dump.
///
/// Loading goes ahead regardless.
fn check_dump_names(files: &[PathBuf]) {
    let mut serials = Vec::with_capacity(files.len());
    for file in files {
        match file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_serial)
        {
            Some((_, serial)) => serials.push(serial),
            None => warn!(file = %file.display(), "not a numbered dump file"),
        }
    }
    let gaps = serial_gaps(&serials);
    if !gaps.is_empty() {
        warn!(?gaps, "dump serials are not contiguous");
    }
}

pub struct Loader {
    client: SolrClient,
    config: LoadConfig,
}

impl Loader {
    pub fn new(client: SolrClient, config: LoadConfig) -> Loader {
        Loader { client, config }
    }

    /// List the source directory and post every matching file in name order
    pub async fn run(&self) -> Result<LoadSummary> {
        prepare_source_dir(&self.config.dir)?;
        let files = list_dump_files(&self.config.dir, &self.config.pattern)?;
        check_dump_names(&files);
        self.post_files(&files).await
    }

    async fn post_file(&self, file: &Path) -> Result<()> {
        let body = tokio::fs::read(file).await?;
        self.client.update(&self.config.core, body).await
    }

    /// Post `files` in the given order, waiting for each before the next
    pub async fn post_files(&self, files: &[PathBuf]) -> Result<LoadSummary> {
        let start = Instant::now();
        let total = files.len();
        let mut progress = self.config.progress.then(|| {
            let mut pb = ProgressBar::new(total as u64);
            pb.message("posting ");
            pb
        });
        let mut summary = LoadSummary {
            posted: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        };

        for (i, file) in files.iter().enumerate() {
            info!(
                core = %self.config.core,
                "processing {} ({}/{})",
                file.display(),
                i + 1,
                total
            );
            match self.post_file(file).await {
                Ok(()) => {
                    summary.posted += 1;
                    info!("{} processed", file.display());
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(file = %file.display(), error = %e, "post failed");
                    if self.config.on_failure == FailurePolicy::Abort {
                        return Err(Error::LoadAborted {
                            file: file.clone(),
                            cause: Box::new(e),
                        });
                    }
                }
            }
            if let Some(pb) = progress.as_mut() {
                pb.inc();
            }
        }

        if let Some(mut pb) = progress {
            pb.finish();
        }
        summary.elapsed = start.elapsed();
        info!(
            posted = summary.posted,
            failed = summary.failed,
            "Posting files completed in {} seconds",
            summary.elapsed.as_secs()
        );
        Ok(summary)
    }
}
