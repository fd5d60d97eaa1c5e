use clap::Parser;
use scripts::{
    cli::Cli, config::Environment, errors::ScriptError, networks::NetworkRegistry,
};
use tracing_subscriber::EnvFilter;

/// The log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        networks_file,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let env = Environment::from_process();
    let registry = match networks_file {
        Some(path) => NetworkRegistry::builtin().with_overlay_file(&path)?,
        None => NetworkRegistry::builtin(),
    };

    command.run(&registry, &env).await
}
