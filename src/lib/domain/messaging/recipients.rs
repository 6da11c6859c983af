//! Recipient resolution

use std::path::{Path, PathBuf};

use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader, Lines},
};
use tracing::{debug, error};

use super::{errors::SendError, mailing_lists::validate_mailing_list, ListInfo, MailingListDirectory};

/// How the recipients of a run were chosen on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSelection {
    /// A single literal address
    EmailAddress(String),

    /// A mailing list address, checked against the known lists
    MailingList(String),

    /// A file with one address per line
    RecipientsFile(PathBuf),
}

/// The recipients of a run, ready to be walked
#[derive(Debug)]
pub enum Recipients {
    /// A single address
    Single(String),

    /// A validated mailing list
    MailingList(ListInfo),

    /// The lines of a recipients file
    File(RecipientLines),
}

impl RecipientSelection {
    /// Resolves the selection into [`Recipients`].
    ///
    /// Mailing list addresses are looked up in `directory`; recipients files are
    /// opened but not read.
    pub async fn resolve<D>(self, directory: &D) -> Result<Recipients, SendError>
    where
        D: MailingListDirectory + ?Sized,
    {
        match self {
            Self::EmailAddress(address) => Ok(Recipients::Single(address)),
            Self::MailingList(address) => {
                let list = validate_mailing_list(directory, &address).await?;
                debug!("Validated mailing list {}", list.address);

                Ok(Recipients::MailingList(list))
            }
            Self::RecipientsFile(path) => Ok(Recipients::File(RecipientLines::open(&path).await?)),
        }
    }
}

/// A single pass over the addresses of a recipients file.
///
/// Lines are yielded in file order, untrimmed; blank lines come through as
/// empty addresses. The file is closed when the cursor is dropped.
#[derive(Debug)]
pub struct RecipientLines {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

impl RecipientLines {
    /// Opens a recipients file
    pub async fn open(path: &Path) -> Result<Self, SendError> {
        let file = File::open(path).await.map_err(|source| SendError::RecipientsFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
        })
    }

    /// Reads the next address, or `None` once the file is exhausted
    pub async fn next_line(&mut self) -> Result<Option<String>, SendError> {
        self.lines
            .next_line()
            .await
            .map_err(|source| SendError::RecipientsFile {
                path: self.path.clone(),
                source,
            })
    }
}

/// Builds the error raised when no recipient option was supplied.
///
/// The message is logged as an error and each supplied option at debug level.
pub fn omitted_option(message: &str, options: Vec<String>) -> SendError {
    error!("{message}");

    for option in &options {
        debug!("{option}");
    }

    SendError::OmittedOption {
        message: message.to_string(),
        options,
    }
}
