pub mod dataset;
pub mod operations;
pub mod partition;
pub mod sorting;

pub use dataset::*;
pub use operations::*;
pub use partition::*;
pub use sorting::*;
