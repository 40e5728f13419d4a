// Turning the command line choice into the candidate that gets stored.

use crate::recorder::*;

/// What the voter selected on the command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BallotChoice {
    /// One of the listed candidates, as typed.
    Listed(String),
    /// Free text, already trimmed. It may be empty.
    WriteIn(String),
}

pub fn read_choice(
    candidate: Option<&str>,
    write_in: Option<&str>,
) -> RecorderResult<BallotChoice> {
    match (candidate, write_in) {
        (Some(c), None) => Ok(BallotChoice::Listed(c.trim().to_string())),
        (None, Some(w)) => Ok(BallotChoice::WriteIn(w.trim().to_string())),
        (None, None) => MissingChoiceSnafu {}.fail(),
        (Some(c), Some(w)) => {
            whatever!("Cannot vote both for {:?} and for write-in {:?}", c, w)
        }
    }
}

/// Returns the name to store for this choice.
///
/// Listed candidates are matched without regard to ASCII case and stored with the
/// spelling of the configuration. An empty write-in is returned as is: the store
/// rejects it.
pub fn resolve_candidate(choice: &BallotChoice, settings: &Settings) -> RecorderResult<String> {
    match choice {
        BallotChoice::Listed(name) => settings
            .candidates
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .cloned()
            .context(UnknownCandidateSnafu {
                name: name.clone(),
                known: settings.candidates.clone(),
            }),
        BallotChoice::WriteIn(text) => {
            ensure!(settings.allow_write_in, WriteInDisabledSnafu {});
            debug!("resolve_candidate: write-in {:?}", text);
            Ok(text.clone())
        }
    }
}
