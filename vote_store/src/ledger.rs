use snafu::prelude::*;

use crate::config::*;

/// The operations a front-end needs to take votes.
///
/// A front-end holds a ledger and calls [`VoteLedger::submit`] once per
/// submission, or the three steps one by one if it wants to report each of them
/// separately. The order matters: the identifier is checked first, then
/// previous votes, and only then is the record written.
pub trait VoteLedger {
    fn is_valid_identifier(&self, id: &str) -> bool {
        crate::is_valid_identifier(id)
    }

    fn has_voted(&self, id: &str) -> VoteResult<bool>;

    /// Stores the vote unconditionally.
    fn record(&mut self, id: &str, candidate: &str) -> VoteResult<()>;

    /// Validates, checks for an earlier vote and stores the vote.
    fn submit(&mut self, id: &str, candidate: &str) -> VoteResult<VoteRecord> {
        ensure!(self.is_valid_identifier(id), InvalidIdentifierSnafu { id });
        ensure!(!candidate.is_empty(), InvalidCandidateSnafu {});
        ensure!(!self.has_voted(id)?, DuplicateVoteSnafu { id });
        self.record(id, candidate)?;
        Ok(VoteRecord::new(id, candidate))
    }
}
