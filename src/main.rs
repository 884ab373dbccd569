use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use drivedrop_pricing::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // The server configures tracing from its config file once loaded
    if !matches!(command, cli::Commands::Start) {
        init_tracing("warn", "text");
    }

    match command {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Estimate {
            file,
            quote,
            token,
            pickup_date,
            delivery_date,
        } => {
            let options = commands::estimate::EstimateOptions {
                file,
                quote,
                token,
                pickup_date,
                delivery_date,
            };
            commands::estimate::execute(&args.config, options).await?;
        }
        cli::Commands::Watch { token } => {
            commands::watch::execute(&args.config, token).await?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
        },
        cli::Commands::Version => {
            println!("DriveDrop Pricing v{}", env!("CARGO_PKG_VERSION"));
            println!("Rust {}", env!("CARGO_PKG_RUST_VERSION"));
        }
    }

    Ok(())
}
