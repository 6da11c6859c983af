//! Property file configuration
//!
//! Two Java-style `.properties` files are read from the configuration directory:
//! `mailgun.properties` holds the account and `mailgun-sender.properties`
//! holds the default sender address.

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use java_properties::PropertiesError;
use secrecy::Secret;
use thiserror::Error;
use tracing::info;

/// Name of the account properties file
pub const ACCOUNT_PROPERTIES: &str = "mailgun.properties";

/// Name of the sender properties file
pub const SENDER_PROPERTIES: &str = "mailgun-sender.properties";

/// Key holding the default sender address
pub const DEFAULT_FROM_EMAIL_KEY: &str = "mailgun.sender.default.from.email";

const DOMAIN_KEY: &str = "domain";
const PRIVATE_API_KEY_KEY: &str = "privateApiKey";
const REGION_KEY: &str = "region";
const BASE_URL_KEY: &str = "baseUrl";
const TIMEOUT_KEY: &str = "timeoutSeconds";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file is missing or cannot be opened
    #[error("Error loading `{}`", path.display())]
    Load {
        /// Path of the properties file
        path: PathBuf,

        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The file is not a valid properties file
    #[error("Error loading `{}`", path.display())]
    Parse {
        /// Path of the properties file
        path: PathBuf,

        /// The underlying parse error
        #[source]
        source: PropertiesError,
    },

    /// A required key is absent
    #[error("Missing {key} key ({help})")]
    MissingKey {
        /// The missing key
        key: &'static str,

        /// How to fix it
        help: String,
    },

    /// A key has a value that cannot be used
    #[error("Invalid value `{value}` for {key} key")]
    InvalidValue {
        /// The offending key
        key: &'static str,

        /// The value found in the file
        value: String,
    },
}

/// Mailgun API region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    /// `api.mailgun.net`
    #[default]
    Us,

    /// `api.eu.mailgun.net`
    Eu,
}

impl Region {
    /// The API root for this region
    pub fn api_root(&self) -> &'static str {
        match self {
            Self::Us => "https://api.mailgun.net/v3",
            Self::Eu => "https://api.eu.mailgun.net/v3",
        }
    }
}

impl FromStr for Region {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "eu" => Ok(Self::Eu),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Us => write!(f, "us"),
            Self::Eu => write!(f, "eu"),
        }
    }
}

/// Mailgun account details
#[derive(Debug)]
pub struct MailgunAccount {
    /// The sending domain
    pub domain: String,

    /// The private API key
    pub private_api_key: Secret<String>,

    /// The API region
    pub region: Region,

    /// Overrides the region's API root
    pub base_url: Option<String>,

    /// Timeout for each API call
    pub timeout: Duration,
}

impl MailgunAccount {
    /// The API root requests are sent to, without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or_else(|| self.region.api_root())
    }
}

/// Loads the account from `mailgun.properties` in `config_dir`.
pub fn load_account(config_dir: &Path) -> Result<MailgunAccount, ConfigError> {
    let mut properties = read_properties(&config_dir.join(ACCOUNT_PROPERTIES))?;

    let domain = required(&mut properties, DOMAIN_KEY)?;
    let private_api_key = Secret::new(required(&mut properties, PRIVATE_API_KEY_KEY)?);

    let region = match properties.remove(REGION_KEY) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: REGION_KEY,
            value,
        })?,
        None => Region::default(),
    };

    let timeout = match properties.remove(TIMEOUT_KEY) {
        Some(value) => value
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidValue {
                key: TIMEOUT_KEY,
                value,
            })?,
        None => DEFAULT_TIMEOUT,
    };

    let account = MailgunAccount {
        domain,
        private_api_key,
        region,
        base_url: properties.remove(BASE_URL_KEY),
        timeout,
    };

    info!("Configured {ACCOUNT_PROPERTIES}");

    Ok(account)
}

/// Resolves the sender address.
///
/// An explicit `from_override` wins and no file is read. Otherwise the
/// address comes from `mailgun-sender.properties` in `config_dir`.
pub fn resolve_default_from(
    from_override: Option<&str>,
    config_dir: &Path,
) -> Result<String, ConfigError> {
    if let Some(from) = from_override {
        return Ok(from.to_string());
    }

    let mut properties = read_properties(&config_dir.join(SENDER_PROPERTIES))?;

    let from = properties
        .remove(DEFAULT_FROM_EMAIL_KEY)
        .ok_or_else(|| ConfigError::MissingKey {
            key: DEFAULT_FROM_EMAIL_KEY,
            help: format!(
                "Must set from email address with option -f or in the `{SENDER_PROPERTIES}` file"
            ),
        })?;

    info!("Configured {SENDER_PROPERTIES}");

    Ok(from)
}

fn read_properties(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    java_properties::read(BufReader::new(file)).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn required(
    properties: &mut HashMap<String, String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    properties
        .remove(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingKey {
            key,
            help: format!("Must set {key} in the `{ACCOUNT_PROPERTIES}` file"),
        })
}
