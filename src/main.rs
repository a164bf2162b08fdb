#[macro_use]
extern crate rust_i18n;

use planbot::error::Error;
use planbot::startup;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

// Initialize i18n
i18n!("locales", fallback = "en");

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging("info")?;

    info!("Starting planbot");

    // Load configuration
    let config = startup::load_config()?;
    let locale = config.locale.as_str();

    let agent = startup::build_agent(&config)?;

    println!("{}", t!("cli_example", locale = locale));
    print!("> ");
    std::io::stdout().flush().map_err(Error::from)?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(Error::from)?;

    let instruction = line.trim();
    if instruction.is_empty() {
        return Ok(());
    }

    match agent.handle(instruction).await {
        Ok(confirmation) => println!("{}", confirmation),
        Err(e) => {
            error!("Failed to add event: {:?}", e);
            if e.is_client_error() {
                println!("{}", t!("cli_invalid_request", locale = locale, error = e));
            } else {
                println!("{}", t!("cli_error", locale = locale, error = e));
            }
        }
    }

    Ok(())
}
