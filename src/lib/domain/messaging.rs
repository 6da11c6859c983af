//! This module contains the outbound message model, the collaborator traits
//! used to deliver it and the service that sends it to every recipient.

mod delivery;
mod email_request;
mod mailing_lists;
mod recipients;
mod service;

pub mod errors;

pub use delivery::DeliveryClient;
pub use email_request::{parse_test_mode, EmailRequest, MessageTemplate};
pub use mailing_lists::{validate_mailing_list, ListInfo, MailingListDirectory};
pub use recipients::{omitted_option, RecipientLines, RecipientSelection, Recipients};
pub use service::SenderService;

#[cfg(test)]
pub mod tests {
    pub use super::delivery::MockDeliveryClient;
    pub use super::mailing_lists::MockMailingListDirectory;
}
