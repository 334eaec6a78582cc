use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::error::{PartitionError, PartitionResult};
use super::partitioner::ClassPlan;
use super::ratios::SplitRatios;
use crate::core::dataset::DatasetSplit;

/// Image counts per split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCounts {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

impl SplitCounts {
    pub fn get(&self, split: DatasetSplit) -> usize {
        match split {
            DatasetSplit::Train => self.train,
            DatasetSplit::Val => self.val,
            DatasetSplit::Test => self.test,
        }
    }

    pub fn add(&mut self, split: DatasetSplit, count: usize) {
        match split {
            DatasetSplit::Train => self.train += count,
            DatasetSplit::Val => self.val += count,
            DatasetSplit::Test => self.test += count,
        }
    }

    pub fn total(&self) -> usize {
        self.train + self.val + self.test
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub class_name: String,
    pub counts: SplitCounts,
}

/// A class left out because its directory could not be read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedClass {
    pub class_name: String,
    pub reason: String,
}

/// Outcome of one dataset split run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub ratios: SplitRatios,
    pub classes: Vec<ClassReport>,
    pub skipped_classes: Vec<SkippedClass>,
}

impl PartitionReport {
    pub fn new(source: &Path, destination: &Path, ratios: SplitRatios) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            ratios,
            classes: Vec::new(),
            skipped_classes: Vec::new(),
        }
    }

    pub fn record(&mut self, plan: &ClassPlan) {
        let mut counts = SplitCounts::default();
        for split in DatasetSplit::all() {
            counts.add(split, plan.count(split));
        }
        self.classes.push(ClassReport {
            class_name: plan.class_name.clone(),
            counts,
        });
    }

    pub fn skip(&mut self, class_name: &str, reason: String) {
        self.skipped_classes.push(SkippedClass {
            class_name: class_name.to_string(),
            reason,
        });
    }

    pub fn class(&self, class_name: &str) -> Option<&ClassReport> {
        self.classes.iter().find(|c| c.class_name == class_name)
    }

    /// Counts summed over every processed class
    pub fn totals(&self) -> SplitCounts {
        let mut totals = SplitCounts::default();
        for class in &self.classes {
            for split in DatasetSplit::all() {
                totals.add(split, class.counts.get(split));
            }
        }
        totals
    }

    /// Save the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> PartitionResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PartitionError::io("serialize report", path, e.into()))?;
        fs::write(path, json).map_err(|e| PartitionError::io("write report", path, e))?;
        info!("Split report saved to: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_counts() {
        let mut counts = SplitCounts::default();
        counts.add(DatasetSplit::Train, 8);
        counts.add(DatasetSplit::Test, 2);
        assert_eq!(counts.get(DatasetSplit::Train), 8);
        assert_eq!(counts.get(DatasetSplit::Val), 0);
        assert_eq!(counts.total(), 10);
    }

    #[test]
    fn test_report_serialization_roundtrip() {
        let mut report = PartitionReport::new(
            Path::new("laji1"),
            Path::new("laji2"),
            SplitRatios::default(),
        );
        report.classes.push(ClassReport {
            class_name: "cat".to_string(),
            counts: SplitCounts {
                train: 8,
                val: 0,
                test: 2,
            },
        });
        report.skip("dog", "permission denied".to_string());

        let json = serde_json::to_string(&report).unwrap();
        let loaded: PartitionReport = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, report);
        assert_eq!(loaded.totals().total(), 10);
        assert_eq!(loaded.skipped_classes[0].class_name, "dog");
    }
}
