//! Command-line front end. Parses arguments, merges them with the config
//! file, and hands off to the library.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::core::partition::{split_dataset, PartitionReport};
use crate::core::sorting::{
    bin_dir, categorize, classify_scores, save_to_bin, BinInventory, GarbageCategory, CLASS_LABELS,
};
use crate::logging::setup_logging;
use commands::{BinsArgs, Commands, ConfigArgs, SortArgs, SplitArgs};

#[derive(Parser, Debug)]
#[command(
    name = "garbage-sorter",
    version,
    about = "Split garbage image datasets and sort images into disposal bins."
)]
pub struct Cli {
    /// Config file (defaults to config.json in the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log to stderr only
    #[arg(long, global = true)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config_path = self.config.clone().or_else(AppConfig::default_config_path);
        let config = match &config_path {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        let log_dir = (config.log_to_file && !self.no_log_file).then_some(config.log_dir.as_path());
        setup_logging(log_dir, &config.log_filter).context("Failed to set up logging")?;

        match &config_path {
            Some(path) if path.exists() => info!("Loaded configuration from {:?}", path),
            Some(path) => info!("No config file at {:?}, using defaults", path),
            None => warn!("Could not determine config directory, using defaults"),
        }

        match self.command {
            Commands::Split(args) => run_split(config, args),
            Commands::Sort(args) => run_sort(&config, args),
            Commands::Bins(args) => run_bins(&config, args),
            Commands::Labels => {
                run_labels();
                Ok(())
            }
            Commands::Config(args) => run_config(&config, config_path.as_deref(), args),
        }
    }
}

fn run_split(mut config: AppConfig, args: SplitArgs) -> Result<()> {
    args.apply_to(&mut config);
    let options = config.partition_options();

    let report = match config.seed {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            let mut rng = StdRng::seed_from_u64(seed);
            split_dataset(&config.source_dir, &config.destination_dir, &options, &mut rng)
        }
        None => split_dataset(
            &config.source_dir,
            &config.destination_dir,
            &options,
            &mut rand::thread_rng(),
        ),
    }
    .with_context(|| {
        format!(
            "Failed to split {:?} into {:?}",
            config.source_dir, config.destination_dir
        )
    })?;

    print_report(&report);

    if let Some(path) = &args.report {
        report.write_json(path)?;
    }
    Ok(())
}

fn print_report(report: &PartitionReport) {
    println!("{:<24} {:>7} {:>7} {:>7}", "class", "train", "val", "test");
    for class in &report.classes {
        println!(
            "{:<24} {:>7} {:>7} {:>7}",
            class.class_name, class.counts.train, class.counts.val, class.counts.test
        );
    }
    let totals = report.totals();
    println!(
        "{:<24} {:>7} {:>7} {:>7}",
        "total", totals.train, totals.val, totals.test
    );
    for skipped in &report.skipped_classes {
        println!("skipped {}: {}", skipped.class_name, skipped.reason);
    }
    println!("Dataset split complete.");
}

fn run_sort(config: &AppConfig, args: SortArgs) -> Result<()> {
    let (label, category) = match (&args.label, &args.scores, args.category) {
        (Some(label), _, _) => (Some(label.clone()), categorize(label)),
        (None, Some(scores), _) => {
            let (label, category) = classify_scores(scores)?;
            (Some(label.to_string()), category)
        }
        (None, None, Some(category)) => (None, category),
        (None, None, None) => anyhow::bail!("one of --label, --scores or --category is required"),
    };

    if let Some(label) = &label {
        println!("label:    {}", label);
    }
    println!("category: {} ({})", category.display_name(), category.key());

    if args.no_save {
        return Ok(());
    }

    let output_dir = args
        .output_dir
        .as_deref()
        .unwrap_or(config.bin_output_dir.as_path());
    let saved = save_to_bin(&args.image, output_dir, category)?;
    let inventory = BinInventory::load_from_dir(output_dir)?;
    println!("saved:    {}", saved.display());
    println!(
        "{} now holds {} items",
        category.display_name(),
        inventory.count(category)
    );
    Ok(())
}

fn run_bins(config: &AppConfig, args: BinsArgs) -> Result<()> {
    let output_dir = args
        .output_dir
        .as_deref()
        .unwrap_or(config.bin_output_dir.as_path());
    let inventory = BinInventory::load_from_dir(output_dir)?;

    let categories: Vec<GarbageCategory> = match args.category {
        Some(category) => vec![category],
        None => GarbageCategory::all().to_vec(),
    };

    for category in categories {
        let items = inventory.items(category);
        println!(
            "{} [{}] {} - {} items in {}",
            category.display_name(),
            category.key(),
            category.color_hex(),
            items.len(),
            bin_dir(output_dir, category).display()
        );
        if items.is_empty() {
            println!("  (empty)");
        }
        for item in items {
            let name = item
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| item.display().to_string());
            println!("  {}", name);
        }
    }
    Ok(())
}

fn run_labels() {
    for (index, label) in CLASS_LABELS.iter().enumerate() {
        let category = categorize(label);
        println!("{:>2}  {}  ->  {} ({})", index, label, category.display_name(), category.key());
    }
}

fn run_config(config: &AppConfig, config_path: Option<&Path>, args: ConfigArgs) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if args.write {
        let path = config_path.context("No config path available, pass --config")?;
        config.save(path)?;
        println!("Configuration saved to {}", path.display());
    }
    Ok(())
}
