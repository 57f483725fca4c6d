use clap::{Args, Parser, Subcommand};
use mail::{AuthConfig, Label};
use std::path::PathBuf;

/// Default client secret file name inside the config directory
const CLIENT_SECRET_FILE: &str = "client_secret.json";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub auth: AuthArgs,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct AuthArgs {
    /// OAuth client secret file downloaded from the Google Cloud Console.
    #[clap(long, global = true, env = "MAILCTL_CLIENT_SECRET")]
    pub client_secret: Option<PathBuf>,

    /// Directory holding token files (default: token-files next to the secret).
    #[clap(long, global = true, env = "MAILCTL_TOKEN_DIR")]
    pub token_dir: Option<PathBuf>,

    /// Suffix appended to token file names, to keep several accounts apart.
    #[clap(long, global = true, default_value = "")]
    pub token_suffix: String,
}

impl AuthArgs {
    /// Build the credential manager settings; interactive consent stays off
    pub fn to_config(&self) -> AuthConfig {
        let secret = self
            .client_secret
            .clone()
            .or_else(|| config::config_path(CLIENT_SECRET_FILE))
            .unwrap_or_else(|| PathBuf::from(CLIENT_SECRET_FILE));

        let mut auth = AuthConfig::new(secret).with_token_suffix(&self.token_suffix);
        if let Some(dir) = &self.token_dir {
            auth = auth.with_token_dir(dir);
        }
        auth
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in through the browser and store the token.
    Auth,

    /// Search messages and print them as JSON.
    Search {
        /// Gmail search query, e.g. "from:alice has:attachment".
        #[clap(long)]
        query: Option<String>,

        /// Restrict to a system label: ALL, INBOX, SENT, DRAFT, SPAM or TRASH.
        #[clap(long, default_value = "INBOX")]
        label: Label,

        /// Maximum number of messages to return.
        #[clap(long, default_value_t = mail::DEFAULT_MAX_RESULTS, conflicts_with = "all")]
        max: usize,

        /// Follow every page instead of stopping at --max.
        #[clap(long)]
        all: bool,

        /// Continue a previous search.
        #[clap(long)]
        page_token: Option<String>,
    },

    /// Print a message summary as JSON.
    Show { message_id: String },

    /// Print the plain-text body of a message.
    Body { message_id: String },

    /// List unread inbox messages as JSON.
    Unread {
        #[clap(long, default_value_t = mail::DEFAULT_MAX_RESULTS)]
        max: usize,
    },

    /// Create a draft reply to the latest message of a thread.
    Reply {
        thread_id: String,

        /// Reply text.
        #[clap(long)]
        body: String,

        /// Body format: plain or html.
        #[clap(long, default_value = "plain")]
        format: String,
    },
}
