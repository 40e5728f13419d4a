use log::debug;
use std::collections::HashSet;

use crate::{StoreConfig, VoteLedger, VoteResult, VoteStore};

/// A [`VoteStore`] that keeps the set of identifiers that already voted in memory.
///
/// The set is rebuilt from the whole file when the store is opened. After that,
/// lookups do not touch the file anymore, so writes made by another process are
/// not seen.
///
/// ```
/// use vote_store::{IndexedVoteStore, StoreConfig, VoteLedger};
/// # let dir = tempfile::tempdir().unwrap();
/// # let config = StoreConfig::new(dir.path().join("election.csv"));
///
/// let mut store = IndexedVoteStore::open(config.clone())?;
/// store.submit("12345678", "Will")?;
///
/// let reopened = IndexedVoteStore::open(config)?;
/// assert!(reopened.has_voted("12345678")?);
/// assert_eq!(reopened.len(), 1);
/// # Ok::<(), vote_store::VoteError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IndexedVoteStore {
    inner: VoteStore,
    voters: HashSet<String>,
}

impl IndexedVoteStore {
    pub fn open(config: StoreConfig) -> VoteResult<IndexedVoteStore> {
        let inner = VoteStore::open(config)?;
        let voters: HashSet<String> = inner.voter_ids()?.into_iter().collect();
        debug!(
            "IndexedVoteStore::open: {} distinct voters in {}",
            voters.len(),
            inner.path().display()
        );
        Ok(IndexedVoteStore { inner, voters })
    }

    pub fn store(&self) -> &VoteStore {
        &self.inner
    }

    /// Number of distinct identifiers seen so far.
    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }
}

impl VoteLedger for IndexedVoteStore {
    fn has_voted(&self, id: &str) -> VoteResult<bool> {
        Ok(self.voters.contains(id))
    }

    fn record(&mut self, id: &str, candidate: &str) -> VoteResult<()> {
        self.inner.record(id, candidate)?;
        self.voters.insert(id.to_string());
        Ok(())
    }
}
