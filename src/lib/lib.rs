#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends email through the Mailgun API to a single address, a mailing list or
//! every address listed in a file.

pub mod domain;
pub mod infrastructure;
