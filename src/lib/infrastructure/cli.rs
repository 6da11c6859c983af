//! Command-line arguments

use std::{io, path::PathBuf};

use clap::{ArgAction, ArgGroup, CommandFactory, Parser};

use crate::{
    domain::messaging::{errors::SendError, omitted_option, MessageTemplate, RecipientSelection},
    infrastructure::content::MessageBodies,
};

/// Command-line arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(
    name = "mailgun-sender",
    about = "Sends a message through the Mailgun API",
    next_help_heading = "Choose options",
    after_help = "This tool is used for sending messages to mailing lists or email addresses.",
    disable_help_flag = true,
    group(
        ArgGroup::new("recipients")
            .required(true)
            .args(["mailing_list_address", "email_address", "recipients_file"])
    )
)]
pub struct Args {
    /// Mailing list address
    #[arg(short = 'm', long, value_name = "List")]
    pub mailing_list_address: Option<String>,

    /// Recipient's email address
    #[arg(short = 'e', long, value_name = "Email")]
    pub email_address: Option<String>,

    /// Recipients list file
    #[arg(short = 'R', long, value_name = "File")]
    pub recipients_file: Option<PathBuf>,

    /// From email address [default can be set in mailgun-sender.properties]
    #[arg(short = 'f', long, value_name = "Email")]
    pub from_email_address: Option<String>,

    /// Email subject title
    #[arg(short = 's', long, value_name = "Subject")]
    pub subject: String,

    /// Reply-to email address
    #[arg(short = 'r', long, value_name = "Email")]
    pub reply_to_email_address: Option<String>,

    /// Campaign identifier
    #[arg(short = 'c', long, value_name = "ID")]
    pub campaign_id: Option<String>,

    /// Test mode flag [default: false]
    #[arg(short = 't', long, value_name = "Flag")]
    pub test_mode_flag: Option<String>,

    /// Plain text file content
    #[arg(short = 'p', long, value_name = "File")]
    pub plain_text_file: PathBuf,

    /// HTML file content
    #[arg(short = 'h', long, value_name = "File")]
    pub html_file: PathBuf,

    /// Directory holding mailgun.properties and mailgun-sender.properties
    #[arg(
        long,
        value_name = "Dir",
        env = "MAILGUN_SENDER_CONFIG_DIR",
        default_value = "config"
    )]
    pub config_dir: PathBuf,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Args {
    /// Writes the usage text shown after a configuration error
    pub fn write_usage<W: io::Write>(writer: &mut W) -> io::Result<()> {
        Self::command().write_help(writer)
    }

    /// The recipient option that was supplied.
    ///
    /// The parser guarantees exactly one; an [`Args`] built by hand with none
    /// yields [`SendError::OmittedOption`].
    pub fn recipient_selection(&self) -> Result<RecipientSelection, SendError> {
        if let Some(list) = &self.mailing_list_address {
            Ok(RecipientSelection::MailingList(list.clone()))
        } else if let Some(address) = &self.email_address {
            Ok(RecipientSelection::EmailAddress(address.clone()))
        } else if let Some(path) = &self.recipients_file {
            Ok(RecipientSelection::RecipientsFile(path.clone()))
        } else {
            Err(omitted_option(
                "Option value must be an email address, mailing list or recipients file.",
                self.supplied_options(),
            ))
        }
    }

    /// Builds the message shared by every recipient.
    ///
    /// `from` is the already resolved sender, see
    /// [`resolve_default_from`](crate::infrastructure::config::resolve_default_from).
    pub fn message_template(&self, from: String, bodies: MessageBodies) -> MessageTemplate {
        MessageTemplate::new(from, self.subject.clone(), bodies.text, bodies.html)
            .reply_to(self.reply_to_email_address.clone())
            .campaign_id(self.campaign_id.clone())
            .test_mode(self.test_mode_flag.as_deref())
    }

    /// Every supplied option, rendered as `--name=value`
    pub fn supplied_options(&self) -> Vec<String> {
        let options = [
            ("mailing-list-address", self.mailing_list_address.clone()),
            ("email-address", self.email_address.clone()),
            (
                "recipients-file",
                self.recipients_file.as_ref().map(|p| p.display().to_string()),
            ),
            ("from-email-address", self.from_email_address.clone()),
            ("subject", Some(self.subject.clone())),
            ("reply-to-email-address", self.reply_to_email_address.clone()),
            ("campaign-id", self.campaign_id.clone()),
            ("test-mode-flag", self.test_mode_flag.clone()),
            (
                "plain-text-file",
                Some(self.plain_text_file.display().to_string()),
            ),
            ("html-file", Some(self.html_file.display().to_string())),
        ];

        options
            .into_iter()
            .filter_map(|(name, value)| value.map(|value| format!("--{name}={value}")))
            .collect()
    }
}
