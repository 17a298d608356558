//! Dump file naming and page persistence
//!
//! A dump is a directory of `<prefix>.<serial>.json` files, each holding one
//! page as a JSON array. Serials are zero padded so that sorting file names
//! lexicographically yields fetch order.

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Width serial numbers are zero padded to
pub const SERIAL_WIDTH: usize = 5;

/// `genome`, 7 -> `genome.00007.json`
pub fn dump_file_name(prefix: &str, serial: u32) -> String {
    format!("{prefix}.{serial:0width$}.json", width = SERIAL_WIDTH)
}

/// Split a dump file name into its prefix and serial.
///
/// Returns `None` for names that were not produced by [`dump_file_name`].
pub fn parse_serial(file_name: &str) -> Option<(&str, u32)> {
    static DUMP_NAME: OnceLock<Regex> = OnceLock::new();
    let re = DUMP_NAME.get_or_init(|| {
        Regex::new(r"^(?P<prefix>.+)\.(?P<serial>\d+)\.json$").expect("dump name regex")
    });
    let caps = re.captures(file_name)?;
    let prefix = caps.name("prefix")?.as_str();
    let serial = caps.name("serial")?.as_str().parse().ok()?;
    Some((prefix, serial))
}

/// Writes pages of one fetch into a directory
#[derive(Clone, Debug)]
pub struct DumpWriter {
    dir: PathBuf,
    prefix: String,
}

impl DumpWriter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> DumpWriter {
        DumpWriter {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, serial: u32) -> PathBuf {
        self.dir.join(dump_file_name(&self.prefix, serial))
    }

    /// Write `docs` as a JSON array, replacing any existing file
    pub async fn write_page(&self, serial: u32, docs: &[Value]) -> Result<PathBuf> {
        let path = self.path_for(serial);
        let bytes = serde_json::to_vec(docs)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|cause| Error::WriteError {
                path: path.clone(),
                cause,
            })?;
        Ok(path)
    }
}

/// Inclusive ranges of serials missing from an otherwise contiguous `0..=max` run.
///
/// Input does not need to be sorted; duplicates are ignored. Output size is
/// bounded by the number of serials given, not by their values.
pub fn serial_gaps(serials: &[u32]) -> Vec<RangeInclusive<u32>> {
    let mut sorted = serials.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut gaps = Vec::new();
    let mut expected: u64 = 0;
    for &s in &sorted {
        if u64::from(s) > expected {
            gaps.push(expected as u32..=s - 1);
        }
        expected = u64::from(s) + 1;
    }
    gaps
}
