//! Keiba Predictor - Main Entry Point
//!
//! Batch training and evaluation of a finishing-position model over
//! historical race results.

use clap::Parser;
use keiba_predictor::cli::{cmd_info, cmd_train, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keiba_predictor=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train {
            data_dir,
            config,
            vocab,
            save_vocab,
            plot,
        }) => {
            cmd_train(
                &data_dir,
                config.as_ref(),
                vocab.as_ref(),
                save_vocab.as_ref(),
                &plot,
            )?;
        }
        Some(Commands::Info { data_dir }) => {
            cmd_info(&data_dir)?;
        }
        None => {
            // Default: the original hardcoded run against ./data
            cmd_train(
                &std::path::PathBuf::from("data"),
                None,
                None,
                None,
                &std::path::PathBuf::from("predictions.png"),
            )?;
        }
    }

    Ok(())
}
