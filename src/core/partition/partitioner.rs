//! Stratified train/val/test splitting of a class-labeled image folder.
//!
//! Each class directory is shuffled independently and cut at two cumulative
//! boundaries; the selected images are then copied (never moved) into
//! `destination/{train,val,test}/{class}`.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

use super::error::{PartitionError, PartitionResult};
use super::ratios::{RatioPolicy, SplitRatios};
use super::report::PartitionReport;
use crate::core::dataset::{discover_classes, list_class_images, ClassDir, DatasetSplit};
use crate::core::operations::{copy_file_with_metadata, ensure_dir};

/// Configuration for a dataset split run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionOptions {
    pub ratios: SplitRatios,
    pub ratio_policy: RatioPolicy,
    /// Abort the run when a class directory cannot be read. When false the
    /// class is skipped and listed in the report instead.
    pub abort_on_error: bool,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            ratios: SplitRatios::default(),
            ratio_policy: RatioPolicy::Strict,
            abort_on_error: true,
        }
    }
}

/// Split assignment for every image of one class, in shuffled order
#[derive(Debug, Clone)]
pub struct ClassPlan {
    pub class_name: String,
    /// Folder name of the class on disk
    pub dir_name: OsString,
    pub assignments: Vec<(PathBuf, DatasetSplit)>,
}

impl ClassPlan {
    pub fn count(&self, split: DatasetSplit) -> usize {
        self.assignments.iter().filter(|(_, s)| *s == split).count()
    }

    pub fn files(&self, split: DatasetSplit) -> impl Iterator<Item = &PathBuf> {
        self.assignments
            .iter()
            .filter(move |(_, s)| *s == split)
            .map(|(path, _)| path)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Shuffle the indices `0..n` and assign each shuffled position a split.
///
/// Returns `(original_index, split)` pairs in shuffled order.
pub fn assign_splits<R: Rng + ?Sized>(
    n: usize,
    ratios: &SplitRatios,
    rng: &mut R,
) -> Vec<(usize, DatasetSplit)> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let boundaries = ratios.boundaries(n);
    indices
        .into_iter()
        .enumerate()
        .map(|(position, index)| (index, SplitRatios::split_for_position(position, boundaries)))
        .collect()
}

/// Build the split plan for one class from its image list
pub fn plan_class<R: Rng + ?Sized>(
    class: &ClassDir,
    images: Vec<PathBuf>,
    ratios: &SplitRatios,
    rng: &mut R,
) -> ClassPlan {
    let assignments = assign_splits(images.len(), ratios, rng)
        .into_iter()
        .map(|(index, split)| (images[index].clone(), split))
        .collect();

    ClassPlan {
        class_name: class.name.clone(),
        dir_name: class.dir_name.clone(),
        assignments,
    }
}

/// Directory receiving the copies of the class folder `dir_name` for `split`
pub fn class_split_dir(
    destination: &Path,
    split: DatasetSplit,
    dir_name: impl AsRef<OsStr>,
) -> PathBuf {
    destination.join(split.as_str()).join(dir_name.as_ref())
}

/// Create `destination/{train,val,test}/{class}` for every class
pub fn create_destination_tree(destination: &Path, classes: &[ClassDir]) -> PartitionResult<()> {
    for split in DatasetSplit::all() {
        ensure_dir(&destination.join(split.as_str()))?;
        for class in classes {
            ensure_dir(&class_split_dir(destination, split, &class.dir_name))?;
        }
    }
    Ok(())
}

/// Copy every file of a plan into its split directory, one at a time
pub fn copy_class_plan(plan: &ClassPlan, destination: &Path) -> PartitionResult<()> {
    for (image, split) in &plan.assignments {
        let dest_dir = class_split_dir(destination, *split, &plan.dir_name);
        copy_file_with_metadata(image, &dest_dir)?;
    }
    Ok(())
}

/// Split the dataset under `source` into `destination` using `rng` for the
/// per-class shuffles.
///
/// # Arguments
/// * `source` - Root whose immediate subdirectories are the classes
/// * `destination` - Root of the train/val/test output tree
/// * `options` - Ratios, ratio policy, and error handling
/// * `rng` - Random source; pass a seeded generator for a reproducible split
///
/// # Returns
/// * `Ok(PartitionReport)` with the per-class counts
/// * `Err(PartitionError)` on the first failure
pub fn split_dataset<R: Rng + ?Sized>(
    source: &Path,
    destination: &Path,
    options: &PartitionOptions,
    rng: &mut R,
) -> PartitionResult<PartitionReport> {
    let span = info_span!("split_dataset");
    let _enter = span.enter();

    let ratios = options.ratios.resolve(options.ratio_policy)?;
    validate_roots(source, destination)?;

    info!(
        "Splitting {:?} into {:?} (train {:.3}, val {:.3}, test {:.3})",
        source, destination, ratios.train, ratios.val, ratios.test
    );

    let classes =
        discover_classes(source).map_err(|e| PartitionError::io("list classes in", source, e))?;
    create_destination_tree(destination, &classes)?;

    let mut report = PartitionReport::new(source, destination, ratios);

    for class in &classes {
        let class_span = info_span!("class", name = %class.name);
        let _class_enter = class_span.enter();

        let class_dir = source.join(&class.dir_name);
        let listing = list_class_images(&class_dir);
        let Some(images) = images_or_skip(class, &class_dir, listing, options, &mut report)? else {
            continue;
        };

        let plan = plan_class(class, images, &ratios, rng);
        debug!(
            "Class {:?}: {} train, {} val, {} test",
            class.name,
            plan.count(DatasetSplit::Train),
            plan.count(DatasetSplit::Val),
            plan.count(DatasetSplit::Test)
        );

        copy_class_plan(&plan, destination)?;
        report.record(&plan);
    }

    let totals = report.totals();
    info!(
        "Dataset split complete: {} classes, {} train, {} val, {} test",
        report.classes.len(),
        totals.train,
        totals.val,
        totals.test
    );
    if !report.skipped_classes.is_empty() {
        warn!("{} classes were skipped", report.skipped_classes.len());
    }

    Ok(report)
}

/// Resolve the image listing of one class folder.
///
/// A failed listing aborts the run, or with `abort_on_error` off is recorded
/// in `report` as a skipped class and yields `Ok(None)`.
fn images_or_skip(
    class: &ClassDir,
    class_dir: &Path,
    listing: io::Result<Vec<PathBuf>>,
    options: &PartitionOptions,
    report: &mut PartitionReport,
) -> PartitionResult<Option<Vec<PathBuf>>> {
    match listing {
        Ok(images) => Ok(Some(images)),
        Err(e) if !options.abort_on_error => {
            warn!("Skipping class {:?}: {}", class.name, e);
            report.skip(&class.name, e.to_string());
            Ok(None)
        }
        Err(e) => Err(PartitionError::io("list images in", class_dir, e)),
    }
}

/// Same as [`split_dataset`], drawing from the thread-local generator.
/// Successive runs produce different splits.
pub fn split_dataset_with_entropy(
    source: &Path,
    destination: &Path,
    options: &PartitionOptions,
) -> PartitionResult<PartitionReport> {
    let mut rng = rand::thread_rng();
    split_dataset(source, destination, options, &mut rng)
}

fn validate_roots(source: &Path, destination: &Path) -> PartitionResult<()> {
    if !source.exists() {
        return Err(PartitionError::invalid_input(source, "source directory does not exist"));
    }
    if !source.is_dir() {
        return Err(PartitionError::invalid_input(source, "source is not a directory"));
    }
    if destination.exists() && !destination.is_dir() {
        return Err(PartitionError::invalid_input(
            destination,
            "destination exists and is not a directory",
        ));
    }

    let source_abs = source
        .canonicalize()
        .map_err(|e| PartitionError::io("resolve", source, e))?;
    if let Some(destination_abs) = resolve_for_comparison(destination) {
        if destination_abs.starts_with(&source_abs) {
            return Err(PartitionError::invalid_input(
                destination,
                "destination must not be inside the source directory",
            ));
        }
    }
    Ok(())
}

/// Absolute form of a path that may not exist yet: the deepest existing
/// ancestor is canonicalized and the missing components appended.
fn resolve_for_comparison(path: &Path) -> Option<PathBuf> {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        if let Ok(existing) = current.canonicalize() {
            let mut resolved = existing;
            for component in missing.iter().rev() {
                resolved.push(component);
            }
            return Some(resolved);
        }
        missing.push(current.file_name()?.to_os_string());
        current = match current.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
    }
}
