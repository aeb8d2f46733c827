use std::io;

use anyhow::{anyhow, Result};
use tracing::{debug, error, info};

use crate::{
    api::{
        cli::{Cli, CliCommand, ConnectionArgs},
        message::{SAVE_FAILED_MESSAGE, SAVE_SUCCEEDED_MESSAGE},
        native_host::{self, BookmarkService},
    },
    client::BookmarkClient,
    config::Config,
    logger::init_logger,
    types::BookmarkDraft,
};

mod api;
mod client;
mod config;
mod endpoint;
mod error;
mod logger;
mod metadata;
mod submission;
mod types;

fn main() -> Result<()> {
    let cli = Cli {};
    let program = cli.run();

    match program.command {
        CliCommand::Save {
            title,
            url,
            description,
            tags,
            connection,
        } => command_save(
            BookmarkDraft {
                title,
                description,
                url,
                tags,
            },
            connection,
        ),
        CliCommand::QuickSave {
            url,
            title,
            tags,
            connection,
        } => command_quick_save(url, title, tags, connection),
        CliCommand::Metadata { url, connection } => command_metadata(url, connection),
        CliCommand::NativeHost { connection } => command_native_host(connection),
    }
}

fn connect(connection: ConnectionArgs) -> Result<BookmarkClient> {
    let mut config = Config::new_from_file(connection.config)?;
    config.override_endpoints(connection.endpoints)?;

    init_logger(config.get_log_level());

    BookmarkClient::from_config(&config)
}

fn command_save(draft: BookmarkDraft, connection: ConnectionArgs) -> Result<()> {
    let client = connect(connection)?;

    save_and_report(&client, &draft)
}

/// Same flow as the extension's keyboard shortcut.
fn command_quick_save(
    url: String,
    title: Option<String>,
    tags: String,
    connection: ConnectionArgs,
) -> Result<()> {
    let client = connect(connection)?;

    let draft = client.metadata(&url, title.as_deref()).into_draft(tags);
    info!(url = %draft.url, "Quick saving bookmark");

    save_and_report(&client, &draft)
}

fn command_metadata(url: String, connection: ConnectionArgs) -> Result<()> {
    let client = connect(connection)?;

    let metadata = client.metadata(&url, None);
    println!("{}", serde_json::to_string_pretty(&metadata)?);

    Ok(())
}

fn command_native_host(connection: ConnectionArgs) -> Result<()> {
    let client = connect(connection)?;

    let stdin = io::stdin();
    let stdout = io::stdout();

    native_host::run(&mut stdin.lock(), &mut stdout.lock(), &client)
}

fn save_and_report(client: &BookmarkClient, draft: &BookmarkDraft) -> Result<()> {
    match client.save(draft) {
        Ok(submission) => {
            for attempt in &submission.attempts {
                debug!(
                    endpoint = %attempt.endpoint,
                    method = %attempt.method,
                    outcome = ?attempt.outcome,
                    "Attempt"
                );
            }
            if !submission.is_confirmed() {
                info!("Server did not confirm the save before the timeout");
            }
            info!(
                endpoint = %submission.endpoint,
                method = %submission.method,
                attempts = submission.attempts.len(),
                "Bookmark saved"
            );
            println!("{}", SAVE_SUCCEEDED_MESSAGE);

            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to save bookmark");

            Err(anyhow!("{} ({})", SAVE_FAILED_MESSAGE, e))
        }
    }
}
