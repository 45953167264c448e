//! Read-only access to image files on disk.
//!
//! Used both for images extracted from the uploaded PDF and for theme
//! background pictures. Only plain file names are accepted so a slide
//! record cannot reach outside the store's directory.

use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A directory of image files addressed by file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `dir`. The directory need not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path for a file name, or `None` if the name is not a plain
    /// file name.
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        if !is_plain_file_name(filename) {
            return None;
        }
        Some(self.dir.join(filename))
    }

    /// Whether the store holds a file with this name.
    pub fn contains(&self, filename: &str) -> bool {
        self.path_for(filename).is_some_and(|p| p.is_file())
    }

    /// Read a file's bytes. Missing files and rejected names both map to
    /// [`Error::ImageNotFound`].
    pub fn load(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self
            .path_for(filename)
            .ok_or_else(|| Error::ImageNotFound(filename.to_string()))?;

        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::ImageNotFound(filename.to_string()))
            }
            Err(e) if path.is_dir() => {
                log::debug!("{} is a directory: {}", path.display(), e);
                Err(Error::ImageNotFound(filename.to_string()))
            }
            Err(e) => Err(Error::IoError(e)),
        }
    }

    /// Read a file and guess its MIME type from the content.
    pub fn load_with_mime(&self, filename: &str) -> Result<(Vec<u8>, &'static str)> {
        let bytes = self.load(filename)?;
        let mime = image::guess_format(&bytes)
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream");
        Ok((bytes, mime))
    }

    /// MIME type of a stored file, guessed from its content.
    pub fn mime_type(&self, filename: &str) -> Result<&'static str> {
        self.load_with_mime(filename).map(|(_, mime)| mime)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image::RgbImage::new(2, 2)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pic.png"), png_bytes()).unwrap();

        let store = ImageStore::new(dir.path());
        assert!(store.contains("pic.png"));
        let (bytes, mime) = store.load_with_mime("pic.png").unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        assert!(!store.contains("nope.png"));
        assert!(matches!(store.load("nope.png"), Err(Error::ImageNotFound(_))));
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let store = ImageStore::new("/definitely/not/a/real/dir");
        assert!(matches!(store.load("a.png"), Err(Error::ImageNotFound(_))));
    }

    #[test]
    fn test_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("images");
        fs::create_dir(&inner).unwrap();
        fs::write(dir.path().join("secret.png"), b"x").unwrap();

        let store = ImageStore::new(&inner);
        assert!(store.path_for("../secret.png").is_none());
        assert!(matches!(store.load("../secret.png"), Err(Error::ImageNotFound(_))));
        assert!(store.path_for("..").is_none());
        assert!(store.path_for("a\\b.png").is_none());
        assert!(store.path_for("").is_none());
    }

    #[test]
    fn test_unknown_mime_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blob.bin"), b"not an image").unwrap();
        let (_, mime) = ImageStore::new(dir.path()).load_with_mime("blob.bin").unwrap();
        assert_eq!(mime, "application/octet-stream");
        assert_eq!(
            ImageStore::new(dir.path()).mime_type("blob.bin").unwrap(),
            "application/octet-stream"
        );
    }
}
