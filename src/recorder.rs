use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use vote_store::*;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::args::{Args, Command};
use crate::recorder::ballot::*;
use crate::recorder::config_reader::*;

pub mod ballot;
pub mod config_reader;

#[derive(Debug, Snafu)]
pub enum RecorderError {
    #[snafu(display("Error opening configuration file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },

    #[snafu(display("{source}"))]
    Vote { source: VoteError },

    #[snafu(display("No candidate selected: use --candidate or --write-in"))]
    MissingChoice {},
    #[snafu(display("Unknown candidate {name:?}, expected one of {known:?}"))]
    UnknownCandidate { name: String, known: Vec<String> },
    #[snafu(display("Write-in votes are not accepted for this election"))]
    WriteInDisabled {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

impl RecorderError {
    /// True when the voter's input was refused, as opposed to a broken setup or store.
    pub fn is_rejection(&self) -> bool {
        match self {
            RecorderError::Vote { source } => source.is_rejection(),
            RecorderError::MissingChoice {}
            | RecorderError::UnknownCandidate { .. }
            | RecorderError::WriteInDisabled {} => true,
            _ => false,
        }
    }
}

pub type RecorderResult<T> = Result<T, RecorderError>;

/// What the front-end reports back once a command went through.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Outcome {
    Initialized { path: PathBuf, created: bool },
    Recorded(VoteRecord),
    AlreadyVoted { id: String },
    Checked { id: String, voted: bool },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::AlreadyVoted { .. } => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Initialized {
                path,
                created: true,
            } => write!(f, "Created store {}", path.display()),
            Outcome::Initialized {
                path,
                created: false,
            } => write!(f, "Store {} already exists", path.display()),
            Outcome::Recorded(r) => write!(f, "Vote recorded for {}", r.candidate),
            Outcome::AlreadyVoted { id } => write!(f, "Identifier {} has already voted", id),
            Outcome::Checked { id, voted: true } => write!(f, "Identifier {} has voted", id),
            Outcome::Checked { id, voted: false } => {
                write!(f, "Identifier {} has not voted yet", id)
            }
        }
    }
}

fn open_ledger(settings: &Settings) -> RecorderResult<Box<dyn VoteLedger>> {
    let store = settings.store.clone();
    let ledger: Box<dyn VoteLedger> = if settings.indexed {
        Box::new(IndexedVoteStore::open(store).context(VoteSnafu {})?)
    } else {
        Box::new(VoteStore::open(store).context(VoteSnafu {})?)
    };
    Ok(ledger)
}

fn check_identifier(ledger: &dyn VoteLedger, raw_id: &str) -> RecorderResult<String> {
    let id = raw_id.trim().to_string();
    if !ledger.is_valid_identifier(&id) {
        warn!("Rejected identifier {:?}", raw_id);
        return Err(VoteError::InvalidIdentifier { id }).context(VoteSnafu {});
    }
    Ok(id)
}

/// The submit flow of the voting form: identifier, then ballot, then previous votes.
pub fn submit_vote(
    ledger: &mut dyn VoteLedger,
    settings: &Settings,
    raw_id: &str,
    candidate: Option<&str>,
    write_in: Option<&str>,
) -> RecorderResult<Outcome> {
    let id = check_identifier(ledger, raw_id)?;
    let choice = read_choice(candidate, write_in)?;
    debug!("submit_vote: {:?} {:?}", id, choice);
    let candidate = resolve_candidate(&choice, settings)?;
    match ledger.submit(&id, &candidate) {
        Ok(record) => {
            info!("Recorded vote {:?}", record);
            Ok(Outcome::Recorded(record))
        }
        Err(VoteError::DuplicateVote { id }) => {
            warn!("Identifier {} tried to vote again", id);
            Ok(Outcome::AlreadyVoted { id })
        }
        Err(e) => Err(e).context(VoteSnafu {}),
    }
}

pub fn run(args: &Args) -> RecorderResult<Outcome> {
    let settings = build_settings(args)?;
    match &args.command {
        Command::Init => {
            let store = VoteStore::new(settings.store.clone());
            let created = store.initialize().context(VoteSnafu {})?;
            Ok(Outcome::Initialized {
                path: store.path().to_path_buf(),
                created,
            })
        }
        Command::Vote {
            id,
            candidate,
            write_in,
        } => {
            let mut ledger = open_ledger(&settings)?;
            submit_vote(
                ledger.as_mut(),
                &settings,
                id,
                candidate.as_deref(),
                write_in.as_deref(),
            )
        }
        Command::Check { id } => {
            let ledger = open_ledger(&settings)?;
            let id = check_identifier(ledger.as_ref(), id)?;
            let voted = ledger.has_voted(&id).context(VoteSnafu {})?;
            Ok(Outcome::Checked { id, voted })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(dir: &TempDir, command: Command) -> Args {
        Args {
            config: None,
            store: Some(dir.path().join("election.csv").display().to_string()),
            verbose: false,
            command,
        }
    }

    fn vote(id: &str, candidate: Option<&str>, write_in: Option<&str>) -> Command {
        Command::Vote {
            id: id.to_string(),
            candidate: candidate.map(str::to_string),
            write_in: write_in.map(str::to_string),
        }
    }

    fn check(id: &str) -> Command {
        Command::Check { id: id.to_string() }
    }

    #[test]
    fn init_twice() {
        let dir = tempfile::tempdir().unwrap();
        let first = run(&args(&dir, Command::Init)).unwrap();
        assert!(matches!(first, Outcome::Initialized { created: true, .. }));
        let second = run(&args(&dir, Command::Init)).unwrap();
        assert!(matches!(second, Outcome::Initialized { created: false, .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("election.csv")).unwrap(),
            "NUID,Candidate\n"
        );
    }

    #[test]
    fn vote_then_vote_again() {
        let dir = tempfile::tempdir().unwrap();
        let res = run(&args(&dir, vote(" 12345678 ", Some("Will"), None))).unwrap();
        assert_eq!(res, Outcome::Recorded(VoteRecord::new("12345678", "Will")));
        assert_eq!(res.exit_code(), 0);

        let again = run(&args(&dir, vote("12345678", Some("Max"), None))).unwrap();
        assert_eq!(
            again,
            Outcome::AlreadyVoted {
                id: "12345678".to_string()
            }
        );
        assert_eq!(again.exit_code(), 2);

        assert_eq!(
            run(&args(&dir, check("12345678"))).unwrap(),
            Outcome::Checked {
                id: "12345678".to_string(),
                voted: true
            }
        );
        assert_eq!(
            run(&args(&dir, check("87654321"))).unwrap(),
            Outcome::Checked {
                id: "87654321".to_string(),
                voted: false
            }
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("election.csv")).unwrap(),
            "NUID,Candidate\n12345678,Will\n"
        );
    }

    #[test]
    fn invalid_identifier_comes_first() {
        let dir = tempfile::tempdir().unwrap();
        // Also no candidate: the identifier is reported.
        let err = run(&args(&dir, vote("1234567", None, None))).unwrap_err();
        assert!(matches!(
            err,
            RecorderError::Vote {
                source: VoteError::InvalidIdentifier { .. }
            }
        ));
        assert!(err.is_rejection());
        let err = run(&args(&dir, check("abcd1234"))).unwrap_err();
        assert!(matches!(err, RecorderError::Vote { .. }));
        assert!(err.is_rejection());
    }

    #[test]
    fn identifier_is_trimmed_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = VoteStore::open(StoreConfig::new(dir.path().join("e.csv"))).unwrap();
        let settings = Settings {
            store: StoreConfig::new(dir.path().join("e.csv")),
            candidates: vec!["Will".to_string()],
            allow_write_in: false,
            indexed: false,
        };
        let res = submit_vote(&mut store, &settings, "\t12345678 ", Some("will"), None).unwrap();
        assert_eq!(res, Outcome::Recorded(VoteRecord::new("12345678", "Will")));

        // Bad identifier and missing ballot: the identifier is reported.
        let err = submit_vote(&mut store, &settings, "123", None, None).unwrap_err();
        assert!(matches!(
            err,
            RecorderError::Vote {
                source: VoteError::InvalidIdentifier { ref id }
            } if id == "123"
        ));
        let err = submit_vote(&mut store, &settings, "87654321", None, None).unwrap_err();
        assert!(matches!(err, RecorderError::MissingChoice {}));
        assert!(err.is_rejection());
    }

    #[test]
    fn write_in_vote() {
        let dir = tempfile::tempdir().unwrap();
        let res = run(&args(&dir, vote("12345678", None, Some(" Smith, Jane ")))).unwrap();
        assert_eq!(
            res,
            Outcome::Recorded(VoteRecord::new("12345678", "Smith, Jane"))
        );
        let store = VoteStore::open(StoreConfig::new(dir.path().join("election.csv"))).unwrap();
        assert_eq!(
            store.records().unwrap(),
            vec![VoteRecord::new("12345678", "Smith, Jane")]
        );
    }

    #[test]
    fn empty_write_in_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args(&dir, vote("12345678", None, Some("  ")))).unwrap_err();
        assert!(matches!(
            err,
            RecorderError::Vote {
                source: VoteError::InvalidCandidate {}
            }
        ));
        // Nothing was recorded, the voter can try again.
        let res = run(&args(&dir, vote("12345678", Some("Max"), None))).unwrap();
        assert_eq!(res, Outcome::Recorded(VoteRecord::new("12345678", "Max")));
    }

    #[test]
    fn configuration_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("election.json");
        fs::write(
            &config_path,
            r#"{
                "storePath": "votes.csv",
                "header": { "identifier": "voter", "candidate": "choice" },
                "candidates": ["Alice", "Bob"],
                "allowWriteIn": false,
                "indexed": true
            }"#,
        )
        .unwrap();
        let a = Args {
            config: Some(config_path.display().to_string()),
            store: None,
            verbose: false,
            command: vote("12345678", Some("alice"), None),
        };
        let res = run(&a).unwrap();
        assert_eq!(res, Outcome::Recorded(VoteRecord::new("12345678", "Alice")));
        assert_eq!(
            fs::read_to_string(dir.path().join("votes.csv")).unwrap(),
            "voter,choice\n12345678,Alice\n"
        );

        let rejected = Args {
            command: vote("87654321", None, Some("Carol")),
            ..a.clone()
        };
        assert!(matches!(
            run(&rejected),
            Err(RecorderError::WriteInDisabled {})
        ));
        let unknown = Args {
            command: vote("87654321", Some("Will"), None),
            ..a
        };
        assert!(matches!(
            run(&unknown),
            Err(RecorderError::UnknownCandidate { .. })
        ));
    }

    #[test]
    fn store_option_overrides_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("election.json");
        fs::write(&config_path, r#"{ "storePath": "votes.csv" }"#).unwrap();
        let a = Args {
            config: Some(config_path.display().to_string()),
            ..args(&dir, Command::Init)
        };
        let settings = build_settings(&a).unwrap();
        assert_eq!(settings.store.path, dir.path().join("election.csv"));
        assert_eq!(settings.candidates, vec!["Will", "Max"]);
        assert!(settings.allow_write_in);
        assert!(!settings.indexed);
    }

    #[test]
    fn bad_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Args {
            config: Some(dir.path().join("nope.json").display().to_string()),
            ..args(&dir, Command::Init)
        };
        assert!(matches!(
            run(&missing),
            Err(RecorderError::OpeningJson { .. })
        ));

        let config_path = dir.path().join("bad.json");
        fs::write(&config_path, "{ not json").unwrap();
        let bad = Args {
            config: Some(config_path.display().to_string()),
            ..args(&dir, Command::Init)
        };
        let err = run(&bad).unwrap_err();
        assert!(matches!(err, RecorderError::ParsingJson { .. }));
        assert!(!err.is_rejection());

        let nobody = dir.path().join("nobody.json");
        fs::write(&nobody, r#"{ "candidates": [], "allowWriteIn": false }"#).unwrap();
        let nobody = Args {
            config: Some(nobody.display().to_string()),
            ..args(&dir, Command::Init)
        };
        assert!(matches!(run(&nobody), Err(RecorderError::Whatever { .. })));
    }

    #[test]
    fn unavailable_store() {
        let dir = tempfile::tempdir().unwrap();
        let a = Args {
            store: Some(
                dir.path()
                    .join("missing")
                    .join("election.csv")
                    .display()
                    .to_string(),
            ),
            ..args(&dir, vote("12345678", Some("Will"), None))
        };
        let err = run(&a).unwrap_err();
        assert!(matches!(
            err,
            RecorderError::Vote {
                source: VoteError::StoreUnavailable { .. }
            }
        ));
        assert!(!err.is_rejection());
    }
}
