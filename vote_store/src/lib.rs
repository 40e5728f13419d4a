/*!
A flat, append-only store of votes, keyed by an 8-digit voter identifier.

The store is a CSV file: one header row, then one `identifier,candidate` row per
vote. A caller takes a vote by checking the identifier, checking that it has not
voted yet, and appending the record, in that order. The [`VoteLedger`] trait
bundles these steps:

```
use vote_store::{StoreConfig, VoteError, VoteLedger, VoteStore};
# let dir = tempfile::tempdir().unwrap();
# let path = dir.path().join("election.csv");

let mut store = VoteStore::open(StoreConfig::new(&path))?;
store.submit("12345678", "Will")?;

assert!(store.has_voted("12345678")?);
assert!(matches!(
    store.submit("12345678", "Max"),
    Err(VoteError::DuplicateVote { .. })
));
# Ok::<(), VoteError>(())
```
*/

mod config;
pub mod indexed;
pub mod ledger;
pub mod manual;

use log::{debug, info, warn};
use snafu::prelude::*;

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

pub use crate::config::*;
pub use crate::indexed::IndexedVoteStore;
pub use crate::ledger::VoteLedger;

/// Length of a voter identifier, in digits.
pub const IDENTIFIER_LEN: usize = 8;

/// Returns true if `id` is made of exactly 8 ASCII digits.
///
/// Nothing is trimmed: callers are expected to clean up user input first.
pub fn is_valid_identifier(id: &str) -> bool {
    id.len() == IDENTIFIER_LEN && id.bytes().all(|b| b.is_ascii_digit())
}

/// The CSV-backed store.
///
/// No file handle is kept between calls: every operation opens the file,
/// does its work and closes it before returning, on success and on error.
/// Only one process is expected to write to the file at a time.
#[derive(Debug, Clone)]
pub struct VoteStore {
    config: StoreConfig,
}

impl VoteStore {
    /// Builds the store without touching the file system.
    pub fn new(config: StoreConfig) -> VoteStore {
        VoteStore { config }
    }

    /// Builds the store and creates the backing file if it does not exist yet.
    pub fn open(config: StoreConfig) -> VoteResult<VoteStore> {
        let store = VoteStore::new(config);
        store.initialize()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        self.config.path.as_path()
    }

    /// Creates the backing file with its header row.
    ///
    /// Returns `false` without touching anything when the file already exists.
    pub fn initialize(&self) -> VoteResult<bool> {
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path())
        {
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("initialize: {} already exists", self.path().display());
                return Ok(false);
            }
            res => res
                .map_err(csv::Error::from)
                .context(StoreUnavailableSnafu { path: self.path() })?,
        };
        let header = &self.config.header;
        self.write_row(file, &header.identifier, &header.candidate)?;
        info!(
            "initialize: created {} with header ({}, {})",
            self.path().display(),
            header.identifier,
            header.candidate
        );
        Ok(true)
    }

    /// Scans every record and returns true if one of them has `id` as identifier.
    ///
    /// The comparison is done on the raw bytes of the first column, without any
    /// normalization. The header row is skipped.
    pub fn has_voted(&self, id: &str) -> VoteResult<bool> {
        let mut rdr = self.reader()?;
        let mut scanned: usize = 0;
        for row in rdr.byte_records() {
            let row = row.context(StoreUnavailableSnafu { path: self.path() })?;
            scanned += 1;
            if row.get(0) == Some(id.as_bytes()) {
                debug!("has_voted: found {} at row {}", id, scanned + 1);
                return Ok(true);
            }
        }
        debug!("has_voted: {} not found in {} records", id, scanned);
        Ok(false)
    }

    /// Appends `(id, candidate)` as a single line and flushes it.
    ///
    /// The file must exist: a store whose file disappeared is unavailable, it is
    /// not recreated without its header. This does not check the identifier nor look for an earlier vote: see
    /// [`VoteLedger::submit`] for the checked path.
    pub fn record(&self, id: &str, candidate: &str) -> VoteResult<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(self.path())
            .map_err(csv::Error::from)
            .context(StoreUnavailableSnafu { path: self.path() })?;
        self.write_row(file, id, candidate)?;
        info!("record: vote of {} stored in {}", id, self.path().display());
        Ok(())
    }

    /// Reads back all the records, in file order.
    ///
    /// Rows with fewer than two fields (for instance a line cut short by a failed
    /// append) are skipped.
    pub fn records(&self) -> VoteResult<Vec<VoteRecord>> {
        let mut rdr = self.reader()?;
        let mut res: Vec<VoteRecord> = Vec::new();
        for (idx, row) in rdr.records().enumerate() {
            let row = row.context(StoreUnavailableSnafu { path: self.path() })?;
            match (row.get(0), row.get(1)) {
                (Some(voter_id), Some(candidate)) => res.push(VoteRecord::new(voter_id, candidate)),
                _ => {
                    // The header is line 1.
                    warn!("records: skipping malformed line {}: {:?}", idx + 2, row);
                }
            }
        }
        Ok(res)
    }

    /// The identifier column of every row, malformed rows included.
    pub fn voter_ids(&self) -> VoteResult<Vec<String>> {
        let mut rdr = self.reader()?;
        let mut res: Vec<String> = Vec::new();
        for row in rdr.records() {
            let row = row.context(StoreUnavailableSnafu { path: self.path() })?;
            if let Some(voter_id) = row.get(0) {
                res.push(voter_id.to_string());
            }
        }
        Ok(res)
    }

    fn reader(&self) -> VoteResult<csv::Reader<File>> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(self.path())
            .context(StoreUnavailableSnafu { path: self.path() })
    }

    fn write_row(&self, file: File, first: &str, second: &str) -> VoteResult<()> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.write_record([first, second])
            .context(StoreUnavailableSnafu { path: self.path() })?;
        wtr.flush()
            .map_err(csv::Error::from)
            .context(StoreUnavailableSnafu { path: self.path() })
    }
}

impl VoteLedger for VoteStore {
    fn has_voted(&self, id: &str) -> VoteResult<bool> {
        VoteStore::has_voted(self, id)
    }

    fn record(&mut self, id: &str, candidate: &str) -> VoteResult<()> {
        VoteStore::record(self, id, candidate)
    }
}
