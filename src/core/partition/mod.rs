mod error;
mod partitioner;
mod ratios;
mod report;

pub use error::{PartitionError, PartitionResult};
pub use partitioner::{
    assign_splits, class_split_dir, copy_class_plan, create_destination_tree, plan_class,
    split_dataset, split_dataset_with_entropy, ClassPlan, PartitionOptions,
};
pub use ratios::{RatioPolicy, SplitRatios, RATIO_SUM_TOLERANCE};
pub use report::{ClassReport, PartitionReport, SkippedClass, SplitCounts};
