// ********* Stored data structures ***********

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// One row of the backing file: a voter identifier and the candidate it voted for.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter_id: String,
    pub candidate: String,
}

impl VoteRecord {
    pub fn new(voter_id: &str, candidate: &str) -> VoteRecord {
        VoteRecord {
            voter_id: voter_id.to_string(),
            candidate: candidate.to_string(),
        }
    }
}

/// The names written in the first row of a freshly created store.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StoreHeader {
    pub identifier: String,
    pub candidate: String,
}

impl Default for StoreHeader {
    fn default() -> Self {
        StoreHeader {
            identifier: "NUID".to_string(),
            candidate: "Candidate".to_string(),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub header: StoreHeader,
}

impl StoreConfig {
    pub const DEFAULT_PATH: &'static str = "election.csv";

    pub fn new(path: impl AsRef<Path>) -> StoreConfig {
        StoreConfig {
            path: path.as_ref().to_path_buf(),
            header: StoreHeader::default(),
        }
    }

    pub fn with_header(self, header: StoreHeader) -> StoreConfig {
        StoreConfig { header, ..self }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(StoreConfig::DEFAULT_PATH)
    }
}

// ********* Errors **********

/// Everything that can go wrong while taking a vote.
///
/// `InvalidIdentifier`, `InvalidCandidate` and `DuplicateVote` are expected
/// outcomes of a submission: the caller reports them and the voter may try again
/// (except for a duplicate). `StoreUnavailable` means the backing file could not
/// be read or written; nothing is retried.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VoteError {
    #[snafu(display("identifier {id:?} must be exactly 8 digits"))]
    InvalidIdentifier { id: String },

    #[snafu(display("a candidate must be provided"))]
    InvalidCandidate {},

    #[snafu(display("identifier {id} has already voted"))]
    DuplicateVote { id: String },

    #[snafu(display("vote store {} is unavailable", path.display()))]
    StoreUnavailable { path: PathBuf, source: csv::Error },
}

impl VoteError {
    /// True for the outcomes that come from the voter's input rather than from storage.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, VoteError::StoreUnavailable { .. })
    }
}

pub type VoteResult<T> = Result<T, VoteError>;
