use clap::{Args, Parser, Subcommand};

pub struct Cli;

impl Cli {
    pub fn run(&self) -> CliProgram {
        CliProgram::parse()
    }
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliProgram {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Args)]
pub struct ConnectionArgs {
    #[arg(
        long,
        short,
        value_name = "FILE_PATH",
        help = "Custom path to config file"
    )]
    pub config: Option<String>,

    #[arg(
        long = "endpoint",
        short,
        value_name = "URL",
        help = "Endpoint to try instead of the configured ones (repeatable, tried in order)"
    )]
    pub endpoints: Vec<String>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    #[command(about = "Save a bookmark to the first endpoint that accepts it")]
    Save {
        #[arg(long, help = "Bookmark title")]
        title: String,

        #[arg(long, help = "Bookmarked page URL")]
        url: String,

        #[arg(long, default_value = "", help = "Bookmark description")]
        description: String,

        #[arg(long, default_value = "", help = "Tags, separated by spaces")]
        tags: String,

        #[command(flatten)]
        connection: ConnectionArgs,
    },
    #[command(about = "Read title and description from a page, then save it")]
    QuickSave {
        #[arg(value_name = "URL")]
        url: String,

        #[arg(long, help = "Title to use when the page cannot be read")]
        title: Option<String>,

        #[arg(long, default_value = "", help = "Tags, separated by spaces")]
        tags: String,

        #[command(flatten)]
        connection: ConnectionArgs,
    },
    #[command(about = "Print title, description and URL of a page as JSON")]
    Metadata {
        #[arg(value_name = "URL")]
        url: String,

        #[command(flatten)]
        connection: ConnectionArgs,
    },
    #[command(about = "Serve browser extension messages over stdin/stdout")]
    NativeHost {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{CliCommand, CliProgram};

    #[test]
    fn it_parses_save_with_repeated_endpoints() {
        let program = CliProgram::parse_from([
            "bookerics-save",
            "save",
            "--title",
            "Example",
            "--url",
            "https://example.com",
            "--endpoint",
            "http://localhost:1/api/bookmarks",
            "-e",
            "http://localhost:2/api/bookmarks",
        ]);

        match program.command {
            CliCommand::Save {
                title,
                description,
                tags,
                connection,
                ..
            } => {
                assert_eq!(title, "Example");
                assert_eq!(description, "");
                assert_eq!(tags, "");
                assert_eq!(
                    connection.endpoints,
                    vec![
                        "http://localhost:1/api/bookmarks".to_string(),
                        "http://localhost:2/api/bookmarks".to_string()
                    ]
                );
            }
            _ => panic!("expected save command"),
        }
    }

    #[test]
    fn it_parses_quick_save() {
        let program =
            CliProgram::parse_from(["bookerics-save", "quick-save", "https://example.com", "-c", "/tmp/b.toml"]);

        match program.command {
            CliCommand::QuickSave {
                url,
                title,
                connection,
                ..
            } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(title, None);
                assert_eq!(connection.config.as_deref(), Some("/tmp/b.toml"));
            }
            _ => panic!("expected quick-save command"),
        }
    }
}
