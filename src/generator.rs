//! # Cover Generator
//!
//! Orchestrates one upload request end to end: persist the upload, fetch the
//! model's template, run the compositing core, and write the generated cover
//! under a collision-free name. Either the whole pipeline succeeds and a
//! valid PNG lands on disk, or an error comes back and nothing partial is
//! produced.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::catalog::MobileModel;
use crate::compositor::{composite, Raster};
use crate::error::Result;
use crate::storage::Storage;

/// A freshly generated cover, both on disk and as PNG bytes for the response
#[derive(Debug, Clone)]
pub struct GeneratedCover {
    pub filename: String,
    pub path: PathBuf,
    pub png_bytes: Vec<u8>,
}

/// Runs the upload-to-cover pipeline against a storage handle
#[derive(Debug, Clone)]
pub struct CoverGenerator {
    storage: Storage,
}

impl CoverGenerator {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Generate a cover for `model` from an uploaded photo
    pub fn generate(
        &self,
        model: &MobileModel,
        upload_filename: &str,
        upload_bytes: &[u8],
    ) -> Result<GeneratedCover> {
        info!(
            "Generating cover for model '{}' from upload '{}'",
            model.model_name, upload_filename
        );

        // Step 1: persist the raw upload
        let upload_path = self.storage.save_upload(upload_filename, upload_bytes)?;
        debug!("Upload stored at {:?}", upload_path);

        // Step 2: fetch the registered template
        let template_bytes = self.storage.read_template(&model.template_filename)?;

        // Step 3: decode both images before any pixel processing
        let template = Raster::decode(&template_bytes)?;
        let photo = Raster::decode(upload_bytes)?;
        debug!(
            "Decoded template {}x{}, photo {}x{}",
            template.width(),
            template.height(),
            photo.width(),
            photo.height()
        );

        // Step 4: composite the photo into the chroma region
        let result = composite(&template, &photo)?;

        // Step 5: encode and persist under a unique name
        let png_bytes = result.to_png_bytes()?;
        let filename = Storage::generated_cover_name(&model.model_name);
        let path = self.storage.write_generated(&filename, &png_bytes)?;

        info!(
            "Generated cover {} ({}x{}, {} bytes)",
            filename,
            result.width(),
            result.height(),
            png_bytes.len()
        );

        Ok(GeneratedCover {
            filename,
            path,
            png_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MobileModel;
    use crate::config::StorageConfig;
    use crate::error::{CompositeError, CoverError, StorageError};
    use chrono::Utc;
    use tempfile::tempdir;

    const CHROMA_GREEN: [u8; 3] = [43, 200, 43];
    const RED: [u8; 3] = [200, 0, 0];

    fn model(template_filename: &str) -> MobileModel {
        MobileModel {
            id: 1,
            model_name: "pixel-9".to_string(),
            template_filename: template_filename.to_string(),
            created_at: Utc::now(),
        }
    }

    fn setup() -> (tempfile::TempDir, Storage, CoverGenerator) {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path(), &StorageConfig::default());
        storage.ensure_folders().unwrap();
        let generator = CoverGenerator::new(storage.clone());
        (dir, storage, generator)
    }

    #[test]
    fn test_pipeline_produces_a_decodable_cover() {
        let (dir, storage, generator) = setup();

        let template_png = Raster::new_filled(40, 60, CHROMA_GREEN)
            .to_png_bytes()
            .unwrap();
        storage.save_template("tmpl.png", &template_png).unwrap();
        let photo_png = Raster::new_filled(10, 10, RED).to_png_bytes().unwrap();

        let cover = generator
            .generate(&model("tmpl.png"), "photo.png", &photo_png)
            .unwrap();

        assert!(cover.path.exists());
        assert!(cover.filename.starts_with("pixel-9_"));

        // Dimensions follow the template and the green region was replaced
        let decoded = Raster::decode(&cover.png_bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 60));
        assert_eq!(decoded.get_pixel(20, 30), RED);

        // The raw upload is retained too
        assert!(dir.path().join("uploads").join("photo.png").exists());
    }

    #[test]
    fn test_missing_template_fails_before_processing() {
        let (dir, _storage, generator) = setup();
        let photo_png = Raster::new_filled(10, 10, RED).to_png_bytes().unwrap();

        let result = generator.generate(&model("absent.png"), "photo.png", &photo_png);
        assert!(matches!(
            result,
            Err(CoverError::Storage(StorageError::TemplateNotFound { .. }))
        ));
        assert!(std::fs::read_dir(dir.path().join("generated_covers"))
            .unwrap()
            .next()
            .is_none());
    }

    #[test]
    fn test_malformed_template_produces_no_output() {
        let (dir, storage, generator) = setup();
        storage.save_template("bad.png", b"junk").unwrap();
        let photo_png = Raster::new_filled(10, 10, RED).to_png_bytes().unwrap();

        let result = generator.generate(&model("bad.png"), "photo.png", &photo_png);
        assert!(matches!(
            result,
            Err(CoverError::Composite(CompositeError::DecodeFailed { .. }))
        ));
        assert!(std::fs::read_dir(dir.path().join("generated_covers"))
            .unwrap()
            .next()
            .is_none());
    }

    #[test]
    fn test_malformed_upload_produces_no_output() {
        let (dir, storage, generator) = setup();

        let template_png = Raster::new_filled(40, 60, CHROMA_GREEN)
            .to_png_bytes()
            .unwrap();
        storage.save_template("tmpl.png", &template_png).unwrap();

        let result = generator.generate(&model("tmpl.png"), "photo.png", b"not an image");
        assert!(matches!(
            result,
            Err(CoverError::Composite(CompositeError::DecodeFailed { .. }))
        ));
        assert!(std::fs::read_dir(dir.path().join("generated_covers"))
            .unwrap()
            .next()
            .is_none());
    }
}
