//! Cursor paging through a core into dump files
//!
//! Pages are requested strictly one after another: each request carries the
//! cursor returned by the previous response, and a page is on disk before
//! the next one is asked for. Files already written stay in place when a
//! later page fails, so a run can be inspected and resumed by hand.

use crate::dump::DumpWriter;
use crate::error::{Error, Result};
use crate::fields::FieldProjection;
use crate::query::{PageRequest, PageResponse, CURSOR_START};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows per page when `--fetchSize` is not given
pub const DEFAULT_FETCH_SIZE: usize = 10000;

/// Settings of one fetch run
#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub core: String,
    /// Unique key of the core, used as the sort field
    pub unique_key: String,
    pub target_dir: PathBuf,
    pub fetch_size: usize,
    pub fields: FieldProjection,
}

impl FetchConfig {
    /// Defaults: dump into a directory named after the core, builtin field table
    pub fn new(core: &str, unique_key: &str) -> FetchConfig {
        FetchConfig {
            core: core.to_string(),
            unique_key: unique_key.to_string(),
            target_dir: PathBuf::from(core),
            fetch_size: DEFAULT_FETCH_SIZE,
            fields: FieldProjection::builtin(),
        }
    }
}

/// Anything that can answer a cursor page request
#[async_trait]
pub trait PageSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse>;
}

/// Make sure `path` is a writable directory, creating it when missing
pub fn prepare_target_dir(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => Err(Error::NotADirectory {
            path: path.to_path_buf(),
        }),
        Ok(meta) if meta.permissions().readonly() => Err(Error::ReadOnlyDirectory {
            path: path.to_path_buf(),
        }),
        Ok(_) => check_writable(path, |dir| tempfile::tempfile_in(dir).map(drop)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(dir = %path.display(), "creating target directory");
            std::fs::create_dir_all(path)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Run `create` against `path`; a refused create means the directory is read-only.
///
/// Mode bits miss directories owned by another user, so the preflight
/// creates and drops an anonymous file.
fn check_writable<F>(path: &Path, create: F) -> Result<()>
where
    F: FnOnce(&Path) -> std::io::Result<()>,
{
    use std::io::ErrorKind::{PermissionDenied, ReadOnlyFilesystem};

    match create(path) {
        Ok(()) => Ok(()),
        Err(e) if matches!(e.kind(), PermissionDenied | ReadOnlyFilesystem) => {
            Err(Error::ReadOnlyDirectory {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Why a fetch stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Response carried no next cursor
    NoNextCursor,
    /// Next cursor equals the one just sent
    CursorStalled,
    /// Fetched count reached the reported total
    Exhausted,
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue(String),
    Done(StopReason),
}

/// Loop state, advanced once per page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchSession {
    pub serial: u32,
    pub fetched: u64,
    pub cursor: String,
}

impl FetchSession {
    pub fn start() -> FetchSession {
        FetchSession {
            serial: 0,
            fetched: 0,
            cursor: CURSOR_START.to_string(),
        }
    }

    /// Decide what follows a page whose documents are already counted
    fn next_step(&self, num_found: u64, next_cursor: Option<String>) -> Step {
        match next_cursor {
            None => Step::Done(StopReason::NoNextCursor),
            Some(next) if next == self.cursor => Step::Done(StopReason::CursorStalled),
            Some(_) if self.fetched >= num_found => Step::Done(StopReason::Exhausted),
            Some(next) => Step::Continue(next),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchSummary {
    pub pages: u32,
    pub fetched: u64,
    pub num_found: u64,
    pub reason: StopReason,
}

pub struct Fetcher<S> {
    source: S,
    config: FetchConfig,
    writer: DumpWriter,
}

impl<S: PageSource> Fetcher<S> {
    pub fn new(source: S, config: FetchConfig) -> Fetcher<S> {
        let writer = DumpWriter::new(config.target_dir.clone(), config.core.clone());
        Fetcher {
            source,
            config,
            writer,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn request(&self, cursor: &str) -> PageRequest {
        PageRequest {
            core: self.config.core.clone(),
            sort_field: self.config.unique_key.clone(),
            rows: self.config.fetch_size,
            cursor: cursor.to_string(),
            field_list: self.config.fields.field_list(&self.config.core).to_string(),
        }
    }

    /// Page through the whole core, one dump file per page
    pub async fn run(&self) -> Result<FetchSummary> {
        let core = &self.config.core;
        let mut session = FetchSession::start();

        loop {
            let request = self.request(&session.cursor);
            info!(
                core = %core,
                serial = session.serial,
                fetched = session.fetched,
                cursor = %session.cursor,
                "fetching page"
            );

            let page = self
                .source
                .fetch_page(&request)
                .await
                .map_err(|cause| Error::PageFetchFailed {
                    core: core.clone(),
                    serial: session.serial,
                    cause: Box::new(cause),
                })?;

            session.fetched += page.docs.len() as u64;
            let path = self.writer.write_page(session.serial, &page.docs).await?;
            debug!(file = %path.display(), docs = page.docs.len(), "page written");

            match session.next_step(page.num_found, page.next_cursor) {
                Step::Continue(next) => {
                    session.serial += 1;
                    session.cursor = next;
                }
                Step::Done(reason) => {
                    info!(
                        ?reason,
                        "Complete fetching {} records from {}",
                        session.fetched,
                        core
                    );
                    return Ok(FetchSummary {
                        pages: session.serial + 1,
                        fetched: session.fetched,
                        num_found: page.num_found,
                        reason,
                    });
                }
            }
        }
    }
}

/// Prepare the target directory, then page through the whole core.
///
/// Nothing is requested when the directory cannot be used.
pub async fn dump_core<S: PageSource>(source: S, config: FetchConfig) -> Result<FetchSummary> {
    prepare_target_dir(&config.target_dir)?;
    Fetcher::new(source, config).run().await
}
