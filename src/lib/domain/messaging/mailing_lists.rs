//! Mailing list directory

use async_trait::async_trait;
use serde::Deserialize;

#[cfg(test)]
use mockall::mock;

use super::errors::{MailingListError, SendError};

/// A mailing list known to the email API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListInfo {
    /// The list's distribution address
    pub address: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Who may post to the list (`readonly`, `members` or `everyone`)
    #[serde(default)]
    pub access_level: String,

    /// Number of members
    #[serde(default)]
    pub members_count: u64,

    /// Creation timestamp as reported by the API
    #[serde(default)]
    pub created_at: String,
}

/// Read access to the account's mailing lists
#[async_trait]
pub trait MailingListDirectory: Send + Sync + 'static {
    /// Returns every mailing list of the account.
    async fn mailing_lists(&self) -> Result<Vec<ListInfo>, MailingListError>;
}

#[cfg(test)]
mock! {
    pub MailingListDirectory {}

    #[async_trait]
    impl MailingListDirectory for MailingListDirectory {
        async fn mailing_lists(&self) -> Result<Vec<ListInfo>, MailingListError>;
    }
}

/// Checks that `address` is one of the directory's mailing lists.
///
/// # Returns
/// - [`Ok`] with the matching [`ListInfo`].
/// - [`Err`] with [`SendError::InvalidMailingList`] if no list has that address,
///   or [`SendError::MailingLists`] if the lists could not be read.
pub async fn validate_mailing_list<D>(directory: &D, address: &str) -> Result<ListInfo, SendError>
where
    D: MailingListDirectory + ?Sized,
{
    let lists = directory.mailing_lists().await?;

    lists
        .into_iter()
        .find(|info| info.address == address)
        .ok_or_else(|| SendError::InvalidMailingList {
            address: address.to_string(),
        })
}
