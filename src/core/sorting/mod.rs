mod category;
mod error;
mod inventory;

pub use category::{categorize, classify_scores, label_for_scores, GarbageCategory, CLASS_LABELS};
pub use error::SortError;
pub use inventory::{bin_dir, save_to_bin, BinInventory};
