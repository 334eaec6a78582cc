use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name suffixes recognized as images (matched case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".bmp", ".gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSplit {
    Train,
    Val,
    Test,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Val => "val",
            DatasetSplit::Test => "test",
        }
    }

    /// All splits in the order they are laid out on disk
    pub fn all() -> [DatasetSplit; 3] {
        [DatasetSplit::Train, DatasetSplit::Val, DatasetSplit::Test]
    }
}

impl fmt::Display for DatasetSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether a file name carries one of the recognized image suffixes.
///
/// Only the suffix counts: `c.PNG` qualifies, `d.jpeg.bak` does not.
pub fn is_image_name(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Path variant of [`is_image_name`]
pub fn is_image_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| is_image_name(&name.to_string_lossy()))
        .unwrap_or(false)
}

/// One class folder under a dataset root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClassDir {
    /// Folder name exactly as stored on disk, used for every path
    pub dir_name: OsString,
    /// Readable form of the name for logs and reports
    pub name: String,
}

impl ClassDir {
    pub fn new(dir_name: impl Into<OsString>) -> Self {
        let dir_name = dir_name.into();
        let name = dir_name.to_string_lossy().into_owned();
        Self { dir_name, name }
    }
}

/// List the classes under a dataset root.
///
/// Every immediate subdirectory is a class; plain files at this level are
/// ignored. Classes are sorted by folder name so that a seeded run visits
/// them in a stable order.
pub fn discover_classes(root: &Path) -> io::Result<Vec<ClassDir>> {
    let mut classes = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.path().is_dir() {
            classes.push(ClassDir::new(entry.file_name()));
        } else {
            debug!("Skipping non-directory entry {:?}", entry.path());
        }
    }

    classes.sort();
    info!("Found {} classes in {:?}", classes.len(), root);
    Ok(classes)
}

/// List the qualifying image files inside one class directory.
///
/// Files are sorted by name for consistent ordering.
pub fn list_class_images(class_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    for entry in fs::read_dir(class_dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            image_files.push(path);
        }
    }

    image_files.sort();
    debug!("Found {} images in {:?}", image_files.len(), class_dir);
    Ok(image_files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filtering() {
        assert!(is_image_name("a.jpg"));
        assert!(is_image_name("c.PNG"));
        assert!(is_image_name("photo.JpEg"));
        assert!(is_image_name("scan.bmp"));
        assert!(is_image_name("anim.gif"));
        assert!(!is_image_name("b.txt"));
        assert!(!is_image_name("d.jpeg.bak"));
        assert!(!is_image_name("jpg"));
    }

    #[test]
    fn test_list_class_images_filters_and_sorts() {
        let temp = tempfile::tempdir().unwrap();
        for name in ["c.PNG", "b.txt", "a.jpg", "d.jpeg.bak"] {
            fs::write(temp.path().join(name), b"x").unwrap();
        }
        // A directory that looks like an image is not a file to copy
        fs::create_dir(temp.path().join("nested.jpg")).unwrap();

        let images = list_class_images(temp.path()).unwrap();
        let names: Vec<String> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "c.PNG"]);
    }

    #[test]
    fn test_discover_classes_ignores_files() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("dog")).unwrap();
        fs::create_dir(temp.path().join("cat")).unwrap();
        fs::write(temp.path().join("README.txt"), b"notes").unwrap();

        let classes = discover_classes(temp.path()).unwrap();
        let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["cat", "dog"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_classes_keeps_raw_folder_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempfile::tempdir().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9");
        fs::create_dir(temp.path().join(raw)).unwrap();

        let classes = discover_classes(temp.path()).unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].dir_name.as_os_str(), raw);
        assert_eq!(classes[0].name, "caf\u{FFFD}");
        assert!(temp.path().join(&classes[0].dir_name).is_dir());
    }

    #[test]
    fn test_discover_classes_missing_root() {
        let temp = tempfile::tempdir().unwrap();
        assert!(discover_classes(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_split_names() {
        let names: Vec<&str> = DatasetSplit::all().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["train", "val", "test"]);
        assert_eq!(DatasetSplit::Val.to_string(), "val");
    }
}
