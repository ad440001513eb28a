use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newswire::app::{AppContext, NewswireError};
use newswire::cli::{commands, Cli};
use newswire::config::Config;
use newswire::publish::{CommandPublisher, GitPublisher, NoopPublisher, Publisher};
use newswire::store::FileStore;

/// Distinguishes a bad config from a failed run.
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "newswire=info".into()))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            let is_config = e
                .downcast_ref::<NewswireError>()
                .is_some_and(NewswireError::is_config);
            if is_config {
                ExitCode::from(EXIT_CONFIG)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config).map_err(|e| {
        anyhow::Error::new(e).context(format!("loading {}", cli.config.display()))
    })?;

    let publisher: Arc<dyn Publisher> = match (&cli.publish_cmd, cli.git) {
        (Some(cmd), _) => Arc::new(CommandPublisher::new(cmd.clone())),
        (None, true) => Arc::new(GitPublisher::new(".", cli.git_message.clone())),
        (None, false) => Arc::new(NoopPublisher),
    };

    let store = FileStore::new(&cli.output, &cli.last_run);
    let ctx = AppContext::new(config, store)?.with_publisher(publisher);

    commands::run_once(&ctx).await?;
    Ok(())
}
