use clap::{Parser, Subcommand};

/// Records one vote per voter identifier in a CSV file.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the election settings: store location, header names,
    /// listed candidates and whether write-ins are accepted.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    /// (file path, default election.csv) The CSV file holding the votes. Setting this option overrides
    /// the path that may be specified with the --config option.
    #[clap(short, long, value_parser, global = true)]
    pub store: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Creates the store with its header row, if it does not exist yet.
    Init,
    /// Records a vote, unless the identifier is invalid or has already voted.
    Vote {
        /// The 8-digit voter identifier. Surrounding spaces are ignored.
        #[clap(short, long, value_parser)]
        id: String,
        /// One of the listed candidates.
        #[clap(long, value_parser)]
        candidate: Option<String>,
        /// The name of a candidate that is not listed.
        #[clap(long, value_parser, conflicts_with = "candidate")]
        write_in: Option<String>,
    },
    /// Tells whether an identifier has already voted.
    Check {
        /// The 8-digit voter identifier. Surrounding spaces are ignored.
        #[clap(short, long, value_parser)]
        id: String,
    },
}
