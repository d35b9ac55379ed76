//! Command-line interface
//!
//! `keiba train` runs the full pipeline: load, preprocess, select features,
//! cross-validate, plot. With no subcommand the default train run executes,
//! matching the original one-shot script.

use clap::{Parser, Subcommand};
use colored::*;
use ndarray::Array1;
use polars::prelude::*;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::data::RaceDataLoader;
use crate::features::FeatureSelector;
use crate::preprocessing::{LabelEncoder, Preprocessor};
use crate::training::{train_cv, KFold};
use crate::utils::Timer;
use crate::visualization::scatter_plot;

#[derive(Parser)]
#[command(name = "keiba")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Horse racing finishing-position prediction pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train and cross-validate the finishing-position model
    Train {
        /// Directory containing the five race result CSV files
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Pipeline configuration file (JSON); defaults reproduce the
        /// original hardcoded run
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Reuse a persisted encoder vocabulary instead of fitting per run
        #[arg(long)]
        vocab: Option<PathBuf>,

        /// Persist the fitted encoder vocabulary after the run
        #[arg(long)]
        save_vocab: Option<PathBuf>,

        /// Output path for the predicted-vs-actual scatter plot
        #[arg(long, default_value = "predictions.png")]
        plot: PathBuf,
    },
    /// Show dataset shape and missing-value summary without training
    Info {
        /// Directory containing the five race result CSV files
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,
    },
}

fn step_ok(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", "─".repeat(56).dimmed());
}

pub fn cmd_train(
    data_dir: &PathBuf,
    config_path: Option<&PathBuf>,
    vocab_path: Option<&PathBuf>,
    save_vocab_path: Option<&PathBuf>,
    plot_path: &PathBuf,
) -> anyhow::Result<()> {
    section("Train");

    let config = match config_path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    // Load
    let timer = Timer::start("data loading");
    let raw = RaceDataLoader::new().load(data_dir)?;
    timer.stop();
    step_ok(&format!(
        "loaded {} rows × {} cols",
        raw.height(),
        raw.width()
    ));

    for (name, nulls) in Preprocessor::null_report(&raw) {
        tracing::info!("{}: {} missing values", name, nulls);
    }

    // Preprocess
    let mut preprocessor = Preprocessor::new(&config.label_column);
    if let Some(path) = vocab_path {
        preprocessor = preprocessor.with_encoder(LabelEncoder::load(path)?);
        step_ok(&format!("reusing vocabulary from {}", path.display()));
    }

    let timer = Timer::start("preprocessing");
    let processed = preprocessor.fit_transform(&raw)?;
    timer.stop();
    step_ok(&format!("{} rows after preprocessing", processed.height()));

    if let Some(path) = save_vocab_path {
        preprocessor.encoder().save(path)?;
        step_ok(&format!("saved vocabulary to {}", path.display()));
    }

    // Feature selection; label comes from the same processed frame, so the
    // two stay row-aligned regardless of which rows were dropped above.
    let selector = FeatureSelector::new(config.feature_columns.clone());
    let timer = Timer::start("feature selection");
    let features_df = selector.select(&processed)?;
    timer.stop();

    let x = features_df.to_ndarray::<Float64Type>(IndexOrder::C)?;
    let y = label_vector(&processed, &config.label_column)?;

    // Cross-validated training
    let kfold = KFold::new(config.cv_folds, config.seed);
    let splits = kfold.split(x.nrows())?;

    let timer = Timer::start("model training");
    let outcome = train_cv(&x, &y, &splits, &config.gbm, config.log_every)?;
    timer.stop();

    section("Results");
    // Pad before coloring; width specifiers count ANSI escape bytes
    for (fold, score) in outcome.fold_rmse.iter().enumerate() {
        println!(
            "  {} {:.4}",
            format!("{:<14}", format!("fold {}", fold)).dimmed(),
            score
        );
    }
    println!(
        "  {} {}",
        format!("{:<14}", "overall RMSE").dimmed(),
        format!("{:.4}", outcome.overall_rmse).white().bold()
    );

    log_top_features(&outcome.models, selector.columns());

    // Plot
    scatter_plot(
        &outcome.oof_predictions,
        &y,
        &config.label_column,
        plot_path,
    )?;
    step_ok(&format!("scatter plot written to {}", plot_path.display()));

    Ok(())
}

pub fn cmd_info(data_dir: &PathBuf) -> anyhow::Result<()> {
    section("Info");

    let raw = RaceDataLoader::new().load(data_dir)?;
    println!("  rows    {}", raw.height());
    println!("  columns {}", raw.width());

    let report = Preprocessor::null_report(&raw);
    if report.is_empty() {
        step_ok("no missing values");
    } else {
        for (name, nulls) in report {
            println!("  {:<56} {} missing", name, nulls);
        }
    }

    Ok(())
}

fn label_vector(df: &DataFrame, label_column: &str) -> anyhow::Result<Array1<f64>> {
    let series = df
        .column(label_column)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let values: Vec<f64> = series.f64()?.into_no_null_iter().collect();
    Ok(Array1::from_vec(values))
}

// Averages importances over the fold models and logs the strongest features
fn log_top_features(models: &[crate::training::GbmRegressor], names: &[String]) {
    if models.is_empty() {
        return;
    }

    let n_features = names.len();
    let mut averaged = vec![0.0f64; n_features];
    for model in models {
        for (i, &imp) in model.feature_importances().iter().enumerate() {
            if i < n_features {
                averaged[i] += imp;
            }
        }
    }
    for imp in &mut averaged {
        *imp /= models.len() as f64;
    }

    let mut ranked: Vec<(usize, f64)> = averaged.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (idx, imp) in ranked.into_iter().take(10) {
        tracing::info!("feature importance: {} = {:.4}", names[idx], imp);
    }
}
