use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::category::GarbageCategory;
use super::error::SortError;
use crate::core::dataset::list_class_images;
use crate::core::operations::{ensure_dir, FileOpError};

/// Images collected into each of the four bins, in the order they arrived
#[derive(Debug, Clone)]
pub struct BinInventory {
    bins: BTreeMap<GarbageCategory, Vec<PathBuf>>,
}

impl BinInventory {
    /// Create an inventory with four empty bins
    pub fn new() -> Self {
        Self {
            bins: GarbageCategory::all()
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }

    /// Put an image into a bin. Returns the new item count of that bin.
    pub fn throw(&mut self, category: GarbageCategory, image_path: PathBuf) -> usize {
        let items = self.bins.entry(category).or_default();
        items.push(image_path);
        items.len()
    }

    pub fn count(&self, category: GarbageCategory) -> usize {
        self.items(category).len()
    }

    pub fn items(&self, category: GarbageCategory) -> &[PathBuf] {
        self.bins.get(&category).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.bins.values().map(|v| v.len()).sum()
    }

    /// Rebuild an inventory from the bin folders under `output_dir`.
    ///
    /// Missing bin folders count as empty bins.
    pub fn load_from_dir(output_dir: &Path) -> Result<Self, SortError> {
        let mut inventory = Self::new();
        for category in GarbageCategory::all() {
            let directory = bin_dir(output_dir, category);
            if !directory.is_dir() {
                debug!("Bin folder {:?} does not exist", directory);
                continue;
            }
            let images = list_class_images(&directory).map_err(|source| SortError::ReadBin {
                path: directory.clone(),
                source,
            })?;
            for image in images {
                inventory.throw(category, image);
            }
        }
        info!("Loaded {} sorted items from {:?}", inventory.total(), output_dir);
        Ok(inventory)
    }
}

impl Default for BinInventory {
    fn default() -> Self {
        Self::new()
    }
}

/// Folder of one bin under the output directory
pub fn bin_dir(output_dir: &Path, category: GarbageCategory) -> PathBuf {
    output_dir.join(category.key())
}

/// Write an image into its bin folder under `output_dir`.
///
/// The image is decoded (by content, falling back to the extension) and
/// encoded again in the format implied by its file name, so unreadable
/// files are rejected rather than copied. Transparency is dropped when the
/// target is JPEG, which has no alpha channel.
///
/// # Returns
/// * `Ok(PathBuf)` with the path of the saved image
/// * `Err(SortError)` if the image could not be read or written
pub fn save_to_bin(
    image_path: &Path,
    output_dir: &Path,
    category: GarbageCategory,
) -> Result<PathBuf, SortError> {
    let file_name = image_path
        .file_name()
        .ok_or_else(|| FileOpError::InvalidFileName(image_path.to_path_buf()))?;

    let img = decode_image(image_path).map_err(|source| SortError::Decode {
        path: image_path.to_path_buf(),
        source,
    })?;

    let directory = bin_dir(output_dir, category);
    ensure_dir(&directory)?;
    let save_path = directory.join(file_name);
    let img = match ImageFormat::from_path(&save_path) {
        Ok(ImageFormat::Jpeg) if img.color().has_alpha() => {
            debug!("Dropping alpha channel of {:?} for JPEG output", image_path);
            DynamicImage::ImageRgb8(img.to_rgb8())
        }
        _ => img,
    };
    img.save(&save_path).map_err(|source| {
        // Do not leave a truncated file behind
        let _ = fs::remove_file(&save_path);
        SortError::Encode {
            path: save_path.clone(),
            source,
        }
    })?;

    info!("Saved {:?} to bin {}: {:?}", image_path, category.key(), save_path);
    Ok(save_path)
}

fn decode_image(path: &Path) -> Result<DynamicImage, ImageError> {
    ImageReader::open(path)
        .map_err(ImageError::IoError)?
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn write_test_png(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([16, 185, 129]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_new_inventory_has_four_empty_bins() {
        let inventory = BinInventory::new();
        for category in GarbageCategory::all() {
            assert_eq!(inventory.count(category), 0);
        }
        assert_eq!(inventory.total(), 0);
    }

    #[test]
    fn test_throw_counts_per_bin() {
        let mut inventory = BinInventory::new();
        assert_eq!(inventory.throw(GarbageCategory::Kitchen, PathBuf::from("apple.jpg")), 1);
        assert_eq!(inventory.throw(GarbageCategory::Kitchen, PathBuf::from("peel.jpg")), 2);
        assert_eq!(inventory.throw(GarbageCategory::Hazardous, PathBuf::from("spray.jpg")), 1);

        assert_eq!(inventory.count(GarbageCategory::Kitchen), 2);
        assert_eq!(inventory.count(GarbageCategory::Recyclable), 0);
        assert_eq!(
            inventory.items(GarbageCategory::Kitchen),
            &[PathBuf::from("apple.jpg"), PathBuf::from("peel.jpg")]
        );
        assert_eq!(inventory.total(), 3);
    }

    #[test]
    fn test_save_to_bin_writes_decodable_image() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("can.png");
        write_test_png(&src, 8, 6);
        let output_dir = temp.path().join("tu");

        let saved = save_to_bin(&src, &output_dir, GarbageCategory::Recyclable).unwrap();

        assert_eq!(saved, output_dir.join("recyclable").join("can.png"));
        let reloaded = image::open(&saved).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (8, 6));
        assert!(src.exists());
    }

    #[test]
    fn test_save_to_bin_transparent_image_named_jpg() {
        let temp = tempfile::tempdir().unwrap();
        let png = temp.path().join("icon.png");
        RgbaImage::from_pixel(5, 4, Rgba([200, 30, 30, 128]))
            .save(&png)
            .unwrap();
        // PNG bytes behind a .jpg name, as scraped datasets often have
        let src = temp.path().join("icon.jpg");
        fs::rename(&png, &src).unwrap();

        let saved = save_to_bin(&src, &temp.path().join("tu"), GarbageCategory::Other).unwrap();

        assert_eq!(saved, temp.path().join("tu").join("other").join("icon.jpg"));
        let reloaded = image::open(&saved).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (5, 4));
        assert!(!reloaded.color().has_alpha());
    }

    #[test]
    fn test_save_to_bin_rejects_non_image() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("fake.jpg");
        fs::write(&src, b"not really a jpeg").unwrap();

        let err = save_to_bin(&src, temp.path(), GarbageCategory::Other).unwrap_err();
        assert!(matches!(err, SortError::Decode { .. }));
        assert!(!temp.path().join("other").join("fake.jpg").exists());
    }

    #[test]
    fn test_load_from_dir() {
        let temp = tempfile::tempdir().unwrap();
        let output_dir = temp.path();
        write_test_png(&temp.path().join("a.png"), 2, 2);
        save_to_bin(&temp.path().join("a.png"), output_dir, GarbageCategory::Kitchen).unwrap();
        fs::write(output_dir.join("kitchen").join("notes.txt"), b"skip").unwrap();
        fs::create_dir_all(output_dir.join("hazardous")).unwrap();
        fs::write(output_dir.join("hazardous").join("b.JPG"), b"x").unwrap();

        let inventory = BinInventory::load_from_dir(output_dir).unwrap();

        assert_eq!(inventory.count(GarbageCategory::Kitchen), 1);
        assert_eq!(inventory.count(GarbageCategory::Hazardous), 1);
        assert_eq!(inventory.count(GarbageCategory::Recyclable), 0);
        assert_eq!(inventory.total(), 2);
    }

    #[test]
    fn test_load_from_missing_dir_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let inventory = BinInventory::load_from_dir(&temp.path().join("tu")).unwrap();
        assert_eq!(inventory.total(), 0);
    }
}
