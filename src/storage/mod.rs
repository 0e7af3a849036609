//! # File Storage
//!
//! Owns the three on-disk folders of the service: raw uploads, cover
//! templates, and generated covers. All paths come from configuration and
//! are passed in explicitly; nothing here is ambient global state.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};

/// Handle to the service's storage folders
#[derive(Debug, Clone)]
pub struct Storage {
    uploads_dir: PathBuf,
    templates_dir: PathBuf,
    generated_dir: PathBuf,
}

impl Storage {
    /// Build a storage handle rooted at `base`, using the folder names from
    /// the configuration
    pub fn new<P: AsRef<Path>>(base: P, config: &StorageConfig) -> Self {
        let base = base.as_ref();
        Self {
            uploads_dir: base.join(&config.upload_folder),
            templates_dir: base.join(&config.template_folder),
            generated_dir: base.join(&config.generated_folder),
        }
    }

    /// Ensure the necessary folders exist
    pub fn ensure_folders(&self) -> Result<()> {
        for dir in [&self.uploads_dir, &self.templates_dir, &self.generated_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                info!("Created storage folder {:?}", dir);
            }
        }
        Ok(())
    }

    /// Strip a client-supplied filename down to a safe basename
    ///
    /// Path separators are dropped, so the result can never escape its
    /// folder. Returns [`StorageError::UnsafeFilename`] when nothing safe
    /// remains.
    pub fn sanitize_filename(name: &str) -> Result<String> {
        let base = name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        let safe: String = base
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            .collect();

        if safe.is_empty() || safe.chars().all(|c| c == '.') {
            return Err(StorageError::UnsafeFilename {
                name: name.to_string(),
            }
            .into());
        }
        Ok(safe)
    }

    /// Unique output filename for a generated cover
    ///
    /// Model name plus a UTC timestamp, so concurrent requests for the same
    /// model land on distinct files.
    pub fn generated_cover_name(model_name: &str) -> String {
        let safe_model: String = model_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
            .collect();
        let safe_model = if safe_model.is_empty() {
            "cover".to_string()
        } else {
            safe_model
        };
        let timestamp = Utc::now().format("%Y%m%d%H%M%S%3f");
        format!("{}_{}.png", safe_model, timestamp)
    }

    /// Save an uploaded photo, returning the path it was written to
    pub fn save_upload(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let safe = Self::sanitize_filename(filename)?;
        let path = self.uploads_dir.join(safe);
        self.write_file(&path, bytes)?;
        debug!("Saved upload to {:?}", path);
        Ok(path)
    }

    /// Save a template file, returning the sanitized filename it was stored
    /// under
    pub fn save_template(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let safe = Self::sanitize_filename(filename)?;
        let path = self.templates_dir.join(&safe);
        self.write_file(&path, bytes)?;
        debug!("Saved template to {:?}", path);
        Ok(safe)
    }

    /// Read the template image registered for a model
    pub fn read_template(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.templates_dir.join(filename);
        if !path.exists() {
            return Err(StorageError::TemplateNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        Ok(std::fs::read(&path)?)
    }

    /// Write a generated cover, returning its full path
    pub fn write_generated(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.generated_dir.join(filename);
        self.write_file(&path, bytes)?;
        Ok(path)
    }

    /// List the generated cover filenames (PNG files only), sorted
    pub fn list_generated(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.generated_dir)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".png") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read a generated cover back for serving
    pub fn read_generated(&self, filename: &str) -> Result<Vec<u8>> {
        let safe = Self::sanitize_filename(filename)?;
        let path = self.generated_dir.join(safe);
        if !path.exists() {
            return Err(StorageError::CoverNotFound {
                name: filename.to_string(),
            }
            .into());
        }
        Ok(std::fs::read(&path)?)
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        std::fs::write(path, bytes).map_err(|e| StorageError::WriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoverError;
    use tempfile::tempdir;

    fn storage_in(dir: &tempfile::TempDir) -> Storage {
        let storage = Storage::new(dir.path(), &StorageConfig::default());
        storage.ensure_folders().unwrap();
        storage
    }

    #[test]
    fn test_ensure_folders_creates_all_three() {
        let dir = tempdir().unwrap();
        storage_in(&dir);

        assert!(dir.path().join("uploads").is_dir());
        assert!(dir.path().join("cover_templates").is_dir());
        assert!(dir.path().join("generated_covers").is_dir());
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(
            Storage::sanitize_filename("../../etc/passwd").unwrap(),
            "passwd"
        );
        assert_eq!(
            Storage::sanitize_filename("C:\\photos\\me.jpg").unwrap(),
            "me.jpg"
        );
        assert_eq!(
            Storage::sanitize_filename("my photo (1).png").unwrap(),
            "myphoto1.png"
        );
    }

    #[test]
    fn test_sanitize_rejects_names_with_nothing_left() {
        assert!(matches!(
            Storage::sanitize_filename("../.."),
            Err(CoverError::Storage(StorageError::UnsafeFilename { .. }))
        ));
        assert!(matches!(
            Storage::sanitize_filename(""),
            Err(CoverError::Storage(StorageError::UnsafeFilename { .. }))
        ));
    }

    #[test]
    fn test_generated_cover_name_includes_model() {
        let name = Storage::generated_cover_name("pixel-9");
        assert!(name.starts_with("pixel-9_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_template_roundtrip_and_missing_template() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir);

        let stored = storage.save_template("tmpl.png", b"bytes").unwrap();
        assert_eq!(stored, "tmpl.png");
        assert_eq!(storage.read_template("tmpl.png").unwrap(), b"bytes");

        assert!(matches!(
            storage.read_template("missing.png"),
            Err(CoverError::Storage(StorageError::TemplateNotFound { .. }))
        ));
    }

    #[test]
    fn test_list_generated_filters_to_png() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir);

        storage.write_generated("b.png", b"x").unwrap();
        storage.write_generated("a.png", b"x").unwrap();
        storage.write_generated("notes.txt", b"x").unwrap();

        assert_eq!(storage.list_generated().unwrap(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_read_generated_cannot_escape_its_folder() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir);
        storage.save_upload("secret.png", b"private").unwrap();
        storage.write_generated("ok.png", b"x").unwrap();

        // The traversal collapses to a basename inside generated_covers,
        // which does not exist there
        assert!(matches!(
            storage.read_generated("../uploads/secret.png"),
            Err(CoverError::Storage(StorageError::CoverNotFound { .. }))
        ));
        assert_eq!(storage.read_generated("ok.png").unwrap(), b"x");
    }
}
