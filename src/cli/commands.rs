use clap::{ArgGroup, Args, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::core::partition::RatioPolicy;
use crate::core::sorting::GarbageCategory;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a class-labeled image folder into train/val/test copies
    Split(SplitArgs),

    /// Sort one image into a garbage bin from a label or classifier scores
    Sort(SortArgs),

    /// Show what has been collected in each bin
    Bins(BinsArgs),

    /// Print the classifier labels and the bin each one goes to
    Labels,

    /// Print the effective configuration, optionally saving it
    Config(ConfigArgs),
}

/// Arguments of `split`. Unset values fall back to the config file.
#[derive(Args, Debug, Default)]
pub struct SplitArgs {
    /// Dataset root with one folder per class
    pub source: Option<PathBuf>,

    /// Output root for train/, val/ and test/
    pub destination: Option<PathBuf>,

    /// Fraction of each class copied to train/
    #[arg(long)]
    pub train: Option<f64>,

    /// Fraction of each class copied to val/
    #[arg(long)]
    pub val: Option<f64>,

    /// Fraction of each class copied to test/
    #[arg(long)]
    pub test: Option<f64>,

    /// Seed for a reproducible split
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rescale ratios that do not add up to 1.0 instead of rejecting them
    #[arg(long)]
    pub normalize: bool,

    /// Skip class folders that cannot be read instead of aborting
    #[arg(long)]
    pub continue_on_error: bool,

    /// Write a JSON report of the per-class counts to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl SplitArgs {
    /// Apply the flags that were given on top of `config`
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        if let Some(destination) = &self.destination {
            config.destination_dir = destination.clone();
        }
        if let Some(train) = self.train {
            config.train_scale = train;
        }
        if let Some(val) = self.val {
            config.val_scale = val;
        }
        if let Some(test) = self.test {
            config.test_scale = test;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.normalize {
            config.ratio_policy = RatioPolicy::Normalize;
        }
        if self.continue_on_error {
            config.abort_on_error = false;
        }
    }
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source_of_label").required(true).args(["label", "scores", "category"])))]
pub struct SortArgs {
    /// Image to sort
    pub image: PathBuf,

    /// Label predicted by the classifier
    #[arg(long)]
    pub label: Option<String>,

    /// Classifier scores in label order, comma separated
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub scores: Option<Vec<f32>>,

    /// Put the image straight into this bin (recyclable, hazardous, kitchen, other)
    #[arg(long)]
    pub category: Option<GarbageCategory>,

    /// Folder holding the bins
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Only print the result, do not save the image
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Args, Debug)]
pub struct BinsArgs {
    /// Folder holding the bins
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Only show this bin
    #[arg(long)]
    pub category: Option<GarbageCategory>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Save the effective configuration to the config file
    #[arg(long)]
    pub write: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args_override_config() {
        let mut config = AppConfig::default();
        let args = SplitArgs {
            source: Some(PathBuf::from("photos")),
            val: Some(0.1),
            test: Some(0.1),
            seed: Some(3),
            normalize: true,
            continue_on_error: true,
            ..SplitArgs::default()
        };

        args.apply_to(&mut config);

        assert_eq!(config.source_dir, PathBuf::from("photos"));
        assert_eq!(config.destination_dir, PathBuf::from("laji2"));
        assert_eq!(config.train_scale, 0.8);
        assert_eq!(config.val_scale, 0.1);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.ratio_policy, RatioPolicy::Normalize);
        assert!(!config.abort_on_error);
    }

    #[test]
    fn test_empty_split_args_keep_config() {
        let mut config = AppConfig {
            seed: Some(99),
            ..AppConfig::default()
        };
        SplitArgs::default().apply_to(&mut config);
        assert_eq!(config.seed, Some(99));
        assert!(config.abort_on_error);
    }
}
