#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends a message through the Mailgun API

use std::{io, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::Parser;
use mailgun_sender::{
    domain::messaging::SenderService,
    infrastructure::{
        cli::Args,
        config::{load_account, resolve_default_from, MailgunAccount},
        content::MessageBodies,
        mailgun::MailgunClient,
    },
};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[mutants::skip]
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let (account, from) = match configure(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err:#}\n");
            if let Err(help_err) = Args::write_usage(&mut io::stdout()) {
                error!("Failed to print usage: {help_err}");
            }

            return ExitCode::FAILURE;
        }
    };

    match run(args, account, from).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");

            ExitCode::FAILURE
        }
    }
}

fn configure(args: &Args) -> Result<(MailgunAccount, String)> {
    let account = load_account(&args.config_dir)?;
    let from = resolve_default_from(args.from_email_address.as_deref(), &args.config_dir)?;

    Ok((account, from))
}

async fn run(args: Args, account: MailgunAccount, from: String) -> Result<()> {
    let bodies = MessageBodies::read(&args.plain_text_file, &args.html_file).await?;
    let template = args.message_template(from, bodies);
    let selection = args.recipient_selection()?;

    let client = Arc::new(MailgunClient::new(account)?);
    let sender = SenderService::new(client.clone(), client);

    sender.send(selection, &template).await?;

    Ok(())
}
