//! Marquee - command-line client for the movie and TV show catalog
use clap::Parser;
use marquee_cli::{cli::Cli, commands, config::Settings, App};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "marquee=info,marquee_cli=info,marquee_client=info,marquee_query=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    tracing::debug!(api_url = %settings.api_url, "Loaded configuration");

    let app = App::new(settings)?;

    let mut stdout = std::io::stdout();
    let mut stdin = std::io::BufReader::new(std::io::stdin());
    commands::execute(&app, cli.command, &mut stdout, &mut stdin).await
}
