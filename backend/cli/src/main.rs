mod check_cmd;
mod serve;
mod status_cmd;

use std::path::PathBuf;

use anyhow::Result;
use buzzbot_config::BotConfig;
use buzzbot_logging::{LogFormat, init_logger};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "buzzbot")]
#[command(about = "buzzbot: keyword quotes, jokes and pinned messages for Discord")]
#[command(version)]
struct Cli {
    /// YAML config file
    #[arg(short, long, global = true, env = "BUZZBOT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and answer messages
    Serve(ServeArgs),
    /// Validate the config and dictionary, then list the keywords
    Check {
        /// Dictionary file to check instead of the configured one
        #[arg(short, long)]
        dictionary: Option<PathBuf>,
    },
    /// Query the health endpoint of a running instance
    Status {
        /// Base URL of the running instance
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Discord bot token
    #[arg(short, long)]
    token: Option<String>,

    /// Path to the JSON/YAML keyword dictionary
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Bind address of the health and metrics server
    #[arg(short, long)]
    listen: Option<String>,

    /// Answer edited messages too
    #[arg(long)]
    handle_edits: bool,

    /// Emit console logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl ServeArgs {
    /// Flags win over the file and the environment.
    fn apply(&self, config: &mut BotConfig) {
        if let Some(token) = &self.token {
            config.token = token.clone();
        }
        if let Some(path) = &self.dictionary {
            config.dictionary_path = path.clone();
        }
        if let Some(listen) = &self.listen {
            config.listen_address = listen.clone();
        }
        if self.handle_edits {
            config.handle_message_updates = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let mut config = buzzbot_config::load_and_prepare(cli.config.as_deref()).await?;
            args.apply(&mut config);

            let format = if args.json_logs {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            };
            init_logger(&config.log_level, format, config.log_dir.as_deref());
            buzzbot_config::check(&config)?;

            serve::run(config).await?;
        }
        Commands::Check { dictionary } => {
            init_logger("warn", LogFormat::Pretty, None);
            check_cmd::run(cli.config.as_deref(), dictionary).await?;
        }
        Commands::Status { url } => {
            status_cmd::run(&url).await?;
        }
    }

    Ok(())
}
