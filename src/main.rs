use notely::app::Notely;
use notely::cli::{parse_args, run_command};
use notely::config::ClientConfig;
use notely::logging;

use color_eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialise logging: {}", e);
    }

    let command = parse_args(std::env::args());

    let runtime = tokio::runtime::Runtime::new()?;
    let app = runtime.block_on(Notely::from_config(ClientConfig::from_env()));

    let stdin = std::io::stdin();
    let result = runtime.block_on(run_command(
        &app,
        command,
        &mut stdin.lock(),
        &mut std::io::stdout(),
    ));

    // The handler already printed a user-facing message
    if let Err(e) = result {
        tracing::debug!("Command failed: {:?}", e);
        std::process::exit(1);
    }
    Ok(())
}
