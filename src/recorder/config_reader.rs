use crate::recorder::*;

use serde::{Deserialize, Serialize};
use vote_store::{StoreConfig, StoreHeader};

/// The candidates offered when the configuration does not list any.
pub const DEFAULT_CANDIDATES: [&str; 2] = ["Will", "Max"];

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecorderConfig {
    #[serde(rename = "storePath")]
    pub store_path: Option<String>,
    pub header: Option<StoreHeader>,
    pub candidates: Option<Vec<String>>,
    #[serde(rename = "allowWriteIn")]
    pub allow_write_in: Option<bool>,
    pub indexed: Option<bool>,
}

/// The configuration after applying the defaults and the command line overrides.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub store: StoreConfig,
    pub candidates: Vec<String>,
    pub allow_write_in: bool,
    pub indexed: bool,
}

pub fn read_config(path: &str) -> RecorderResult<RecorderConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RecorderConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn build_settings(args: &Args) -> RecorderResult<Settings> {
    let (config, root) = match args.config.as_deref() {
        Some(config_path) => {
            let root = Path::new(config_path)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (read_config(config_path)?, root)
        }
        None => (RecorderConfig::default(), PathBuf::new()),
    };

    // The command line wins, then the configuration file (relative to its directory).
    let store_path: PathBuf = match (&args.store, &config.store_path) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => root.join(p),
        (None, None) => PathBuf::from(StoreConfig::DEFAULT_PATH),
    };
    let header = config.header.clone().unwrap_or_default();
    ensure_whatever!(
        !header.identifier.is_empty() && !header.candidate.is_empty(),
        "The header names cannot be empty: {:?}",
        header
    );

    let candidates: Vec<String> = match config.candidates.clone() {
        Some(cs) => cs.iter().map(|c| c.trim().to_string()).collect(),
        None => DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
    };
    if let Some(c) = candidates.iter().find(|c| c.is_empty()) {
        whatever!("The list of candidates contains an empty name: {:?}", c)
    }
    let allow_write_in = config.allow_write_in.unwrap_or(true);
    ensure_whatever!(
        allow_write_in || !candidates.is_empty(),
        "No candidate is listed and write-ins are disabled: nobody can be voted for"
    );

    let settings = Settings {
        store: StoreConfig::new(store_path).with_header(header),
        candidates,
        allow_write_in,
        indexed: config.indexed.unwrap_or(false),
    };
    info!("settings: {:?}", settings);
    Ok(settings)
}
