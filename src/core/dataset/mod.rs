mod dataset;

pub use dataset::{
    discover_classes, is_image_file, is_image_name, list_class_images, ClassDir, DatasetSplit,
    IMAGE_EXTENSIONS,
};
