use anyhow::Result;
use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub const DEFAULT_IMAGES_DIR: &str = "images";

const SUFFIXES: [(&str, ImageFormat); 3] = [
    (".jpg", ImageFormat::Jpeg),
    (".jpeg", ImageFormat::Jpeg),
    (".png", ImageFormat::Png),
];

/// A local image picked for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub path: PathBuf,
    pub filename: String,
    pub format: ImageFormat,
}

impl ImageReference {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Returns the format implied by the file name's suffix, ignoring case, if
/// it is one of the accepted image types.
fn image_format(filename: &str) -> Option<ImageFormat> {
    let lower = filename.to_lowercase();
    SUFFIXES
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|&(_, format)| format)
}

/// Finds the lexically first `.jpg`/`.jpeg`/`.png` file directly inside `dir`.
pub fn find_first_image(dir: impl AsRef<Path>) -> Result<ImageReference> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()).into());
    }

    let mut first: Option<(String, ImageFormat)> = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Some(filename) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let Some(format) = image_format(&filename) else {
            continue;
        };
        // follows symlinks, unlike DirEntry::file_type
        if !entry.path().is_file() {
            continue;
        }
        if first.as_ref().map_or(true, |(best, _)| filename < *best) {
            first = Some((filename, format));
        }
    }

    let Some((filename, format)) = first else {
        return Err(Error::NoImagesFound(dir.to_path_buf()).into());
    };
    tracing::debug!("selected {filename} from {}", dir.display());

    Ok(ImageReference {
        path: dir.join(&filename),
        filename,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp directory");
        for name in files {
            fs::write(dir.path().join(name), b"fake").unwrap();
        }
        dir
    }

    #[test]
    fn picks_lexically_first_match() {
        let dir = dir_with(&["b.jpg", "a.png", "c.jpeg", "notes.txt"]);
        let image = find_first_image(dir.path()).unwrap();
        assert_eq!(image.filename, "a.png");
        assert_eq!(image.path, dir.path().join("a.png"));
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.content_type(), "image/png");
    }

    #[test]
    fn suffix_match_ignores_case() {
        let dir = dir_with(&["PHOTO.JPG", "readme.md"]);
        let image = find_first_image(dir.path()).unwrap();
        assert_eq!(image.filename, "PHOTO.JPG");
        assert_eq!(image.content_type(), "image/jpeg");
    }

    #[test]
    fn ordering_is_by_code_point() {
        // uppercase sorts before lowercase
        let dir = dir_with(&["apple.png", "Zebra.jpeg"]);
        let image = find_first_image(dir.path()).unwrap();
        assert_eq!(image.filename, "Zebra.jpeg");
    }

    #[test]
    fn skips_directories_named_like_images() {
        let dir = dir_with(&["b.png"]);
        fs::create_dir(dir.path().join("a.jpg")).unwrap();
        let image = find_first_image(dir.path()).unwrap();
        assert_eq!(image.filename, "b.png");
    }

    #[test]
    fn does_not_recurse() {
        let dir = dir_with(&[]);
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("a.png"), b"x").unwrap();

        let err = find_first_image(dir.path()).unwrap_err();
        let err = err.downcast::<Error>().unwrap();
        assert!(matches!(err, Error::NoImagesFound(_)));
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = dir_with(&[]);
        let missing = dir.path().join("nope");
        let err = find_first_image(&missing).unwrap_err();
        assert!(err.to_string().starts_with("Images directory not found"));
        let err = err.downcast::<Error>().unwrap();
        assert!(matches!(err, Error::DirectoryNotFound(p) if p == missing));
    }

    #[test]
    fn no_matching_files_is_reported() {
        let dir = dir_with(&["a.gif", "b.webp", "jpg"]);
        let err = find_first_image(dir.path()).unwrap_err();
        assert!(err.to_string().contains("expected .jpg/.jpeg/.png"));
        let err = err.downcast::<Error>().unwrap();
        assert!(matches!(err, Error::NoImagesFound(_)));
    }
}
