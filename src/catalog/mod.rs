//! # Model Catalog
//!
//! Keyed records of the known mobile models and their cover templates.
//! The catalog is a JSON file on disk, loaded once at startup and written
//! back after every mutation. Uniqueness of `model_name` is enforced here,
//! at the storage boundary, so the compositing core never has to care.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

/// A mobile model and the template file registered for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileModel {
    pub id: i64,
    pub model_name: String,
    pub template_filename: String,
    pub created_at: DateTime<Utc>,
}

/// On-disk shape of the catalog file
///
/// `next_id` is persisted so deleted ids are never reused across restarts.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    next_id: i64,
    models: Vec<MobileModel>,
}

/// The catalog of registered mobile models
#[derive(Debug)]
pub struct ModelCatalog {
    path: PathBuf,
    next_id: i64,
    models: Vec<MobileModel>,
}

impl ModelCatalog {
    /// Load the catalog from `path`, or start an empty one if the file does
    /// not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            info!("No catalog file at {:?}, starting empty", path);
            return Ok(Self {
                path,
                next_id: 1,
                models: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|_| CatalogError::LoadFailed {
            path: path.display().to_string(),
        })?;
        let file: CatalogFile =
            serde_json::from_str(&content).map_err(|_| CatalogError::LoadFailed {
                path: path.display().to_string(),
            })?;

        info!("Loaded {} models from {:?}", file.models.len(), path);
        Ok(Self {
            path,
            next_id: file.next_id,
            models: file.models,
        })
    }

    fn save(&self) -> Result<()> {
        let file = CatalogFile {
            next_id: self.next_id,
            models: self.models.clone(),
        };
        let content =
            serde_json::to_string_pretty(&file).map_err(|_| CatalogError::SaveFailed {
                path: self.path.display().to_string(),
            })?;
        std::fs::write(&self.path, content).map_err(|_| CatalogError::SaveFailed {
            path: self.path.display().to_string(),
        })?;
        Ok(())
    }

    /// All registered models, in insertion order
    pub fn list(&self) -> &[MobileModel] {
        &self.models
    }

    /// Look up a model by id
    pub fn get(&self, id: i64) -> Option<&MobileModel> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Look up a model by its unique name
    pub fn find_by_name(&self, name: &str) -> Option<&MobileModel> {
        self.models.iter().find(|m| m.model_name == name)
    }

    /// Register a new model
    ///
    /// Fails with [`CatalogError::DuplicateName`] if the name is taken.
    pub fn add_model(&mut self, model_name: &str, template_filename: &str) -> Result<MobileModel> {
        if self.find_by_name(model_name).is_some() {
            return Err(CatalogError::DuplicateName {
                name: model_name.to_string(),
            }
            .into());
        }

        let model = MobileModel {
            id: self.next_id,
            model_name: model_name.to_string(),
            template_filename: template_filename.to_string(),
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.models.push(model.clone());
        self.save()?;

        debug!("Added model '{}' (id {})", model.model_name, model.id);
        Ok(model)
    }

    /// Update an existing model's name and/or template filename
    ///
    /// A rename that collides with another model's name is rejected; renaming
    /// a model to its own current name is fine.
    pub fn update_model(
        &mut self,
        id: i64,
        model_name: Option<&str>,
        template_filename: Option<&str>,
    ) -> Result<MobileModel> {
        let index = self
            .models
            .iter()
            .position(|m| m.id == id)
            .ok_or(CatalogError::ModelNotFound { id })?;

        if let Some(name) = model_name {
            if let Some(existing) = self.find_by_name(name) {
                if existing.id != id {
                    return Err(CatalogError::DuplicateName {
                        name: name.to_string(),
                    }
                    .into());
                }
            }
        }

        let model = &mut self.models[index];
        if let Some(name) = model_name {
            model.model_name = name.to_string();
        }
        if let Some(filename) = template_filename {
            model.template_filename = filename.to_string();
        }
        let updated = model.clone();
        self.save()?;

        debug!("Updated model '{}' (id {})", updated.model_name, id);
        Ok(updated)
    }

    /// Remove a model from the catalog
    pub fn delete_model(&mut self, id: i64) -> Result<MobileModel> {
        let index = self
            .models
            .iter()
            .position(|m| m.id == id)
            .ok_or(CatalogError::ModelNotFound { id })?;

        let removed = self.models.remove(index);
        self.save()?;

        debug!("Deleted model '{}' (id {})", removed.model_name, id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoverError;
    use tempfile::tempdir;

    fn catalog_in(dir: &tempfile::TempDir) -> ModelCatalog {
        ModelCatalog::load_or_create(dir.path().join("models.json")).unwrap()
    }

    #[test]
    fn test_add_and_list_models() {
        let dir = tempdir().unwrap();
        let mut catalog = catalog_in(&dir);

        let a = catalog.add_model("pixel-9", "pixel9.png").unwrap();
        let b = catalog.add_model("iphone-16", "iphone16.png").unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(catalog.list().len(), 2);
        assert_eq!(catalog.find_by_name("pixel-9").unwrap().id, 1);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let dir = tempdir().unwrap();
        let mut catalog = catalog_in(&dir);

        catalog.add_model("pixel-9", "a.png").unwrap();
        let result = catalog.add_model("pixel-9", "b.png");
        assert!(matches!(
            result,
            Err(CoverError::Catalog(CatalogError::DuplicateName { .. }))
        ));
        assert_eq!(catalog.list().len(), 1);
    }

    #[test]
    fn test_update_renames_and_rejects_conflicts() {
        let dir = tempdir().unwrap();
        let mut catalog = catalog_in(&dir);

        let a = catalog.add_model("pixel-9", "a.png").unwrap();
        catalog.add_model("iphone-16", "b.png").unwrap();

        // Rename onto a taken name fails
        let result = catalog.update_model(a.id, Some("iphone-16"), None);
        assert!(matches!(
            result,
            Err(CoverError::Catalog(CatalogError::DuplicateName { .. }))
        ));

        // Renaming to the current name is a no-op, not a conflict
        catalog.update_model(a.id, Some("pixel-9"), None).unwrap();

        let updated = catalog
            .update_model(a.id, Some("pixel-9a"), Some("a2.png"))
            .unwrap();
        assert_eq!(updated.model_name, "pixel-9a");
        assert_eq!(updated.template_filename, "a2.png");
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let dir = tempdir().unwrap();
        let mut catalog = catalog_in(&dir);

        let result = catalog.update_model(42, Some("x"), None);
        assert!(matches!(
            result,
            Err(CoverError::Catalog(CatalogError::ModelNotFound { id: 42 }))
        ));
    }

    #[test]
    fn test_delete_removes_model() {
        let dir = tempdir().unwrap();
        let mut catalog = catalog_in(&dir);

        let a = catalog.add_model("pixel-9", "a.png").unwrap();
        catalog.delete_model(a.id).unwrap();

        assert!(catalog.get(a.id).is_none());
        assert!(matches!(
            catalog.delete_model(a.id),
            Err(CoverError::Catalog(CatalogError::ModelNotFound { .. }))
        ));
    }

    #[test]
    fn test_catalog_persists_across_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models.json");

        {
            let mut catalog = ModelCatalog::load_or_create(&path).unwrap();
            catalog.add_model("pixel-9", "a.png").unwrap();
            let b = catalog.add_model("iphone-16", "b.png").unwrap();
            catalog.delete_model(b.id).unwrap();
        }

        let mut reloaded = ModelCatalog::load_or_create(&path).unwrap();
        assert_eq!(reloaded.list().len(), 1);
        assert_eq!(reloaded.find_by_name("pixel-9").unwrap().id, 1);

        // Deleted ids are not reused after a restart
        let c = reloaded.add_model("galaxy-s25", "c.png").unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_corrupt_catalog_file_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = ModelCatalog::load_or_create(&path);
        assert!(matches!(
            result,
            Err(CoverError::Catalog(CatalogError::LoadFailed { .. }))
        ));
    }
}
