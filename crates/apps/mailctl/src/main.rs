//! mailctl - Gmail from the command line
//!
//! Thin front end over `mail::Mailbox`. Results are printed as pretty JSON;
//! `body` prints the text as-is.

mod cli;

use anyhow::Result;
use clap::Parser;
use log::error;
use mail::{ApiTarget, CredentialManager, Mailbox, MessageId, SearchRequest, ThreadId};
use serde::Serialize;
use std::process::ExitCode;

use cli::{Cli, Command};

/// Exit status for problems the user must fix (missing secret, no token)
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if mail::is_config_error(&e) => {
            error!("{:#}", e);
            eprintln!("Run `mailctl auth` once, or check the client secret file.");
            ExitCode::from(EXIT_CONFIG)
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let auth = cli.auth.to_config().interactive_from_env();

    if let Command::Auth = cli.command {
        let session = CredentialManager::new(auth.allow_interactive(true))
            .obtain_session(&ApiTarget::gmail())?;
        return print_json(&serde_json::json!({
            "token_path": session.token_path(),
        }));
    }

    let mailbox = Mailbox::connect(auth)?;

    match cli.command {
        Command::Auth => Ok(()),
        Command::Search {
            query,
            label,
            max,
            all,
            page_token,
        } => {
            let request = SearchRequest {
                query,
                label,
                max_results: if all { None } else { Some(max) },
                page_token,
            };
            print_json(&mailbox.search(&request)?)
        }
        Command::Show { message_id } => {
            print_json(&mailbox.get_details(&MessageId::new(message_id))?)
        }
        Command::Body { message_id } => {
            println!("{}", mailbox.get_body(&MessageId::new(message_id))?);
            Ok(())
        }
        Command::Unread { max } => print_json(&mailbox.try_get_unread(Some(max))?),
        Command::Reply {
            thread_id,
            body,
            format,
        } => {
            let result = mailbox.create_draft_reply(&ThreadId::new(thread_id), &body, &format);
            print_json(&result)?;
            if result.is_success() {
                Ok(())
            } else {
                anyhow::bail!("Draft reply was not created")
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
