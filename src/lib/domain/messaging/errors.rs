//! Error types for addressing and delivering messages

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when handing a single message to the delivery client.
///
/// These never abort a run: the sender logs them and moves on to the next
/// recipient.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The message could not be handed to the API
    #[error("Mailgun message send error: {0:#}")]
    SendFailed(anyhow::Error),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that can occur when reading the known mailing lists
#[derive(Debug, Error)]
pub enum MailingListError {
    /// The API answered with a non-success status
    #[error("Mailgun mailing list error ({status}): {message}")]
    Rejected {
        /// HTTP status code returned by the API
        status: u16,

        /// Message returned by the API
        message: String,
    },

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that stop a run before or while recipients are being walked
#[derive(Debug, Error)]
pub enum SendError {
    /// The mailing list address is not one of the account's lists
    #[error("Invalid mailing address: {address}")]
    InvalidMailingList {
        /// The address given on the command line
        address: String,
    },

    /// The known mailing lists could not be read
    #[error("Mailgun mailing list error")]
    MailingLists(#[from] MailingListError),

    /// The recipients file could not be opened or read
    #[error("Error reading recipients file `{}`", path.display())]
    RecipientsFile {
        /// Path of the recipients file
        path: PathBuf,

        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// None of the recipient options was supplied
    #[error("{message}")]
    OmittedOption {
        /// What was expected
        message: String,

        /// Every option that was supplied, for diagnostics
        options: Vec<String>,
    },
}
