//! # Cover-Compositor
//!
//! Composite user photos into chroma-keyed phone-cover templates.
//!
//! A template is a cover image with a solid green placeholder region. The
//! compositor stretches the user photo to the template's dimensions, masks
//! out the green region, and drops the photo into its place, leaving every
//! other template pixel untouched. Around that core sit a model catalog,
//! file storage for templates and generated covers, and a small REST API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cover_compositor::compositor::{composite, Raster};
//! use cover_compositor::error::Result;
//!
//! # fn main() -> Result<()> {
//! let template = Raster::decode(&std::fs::read("cover_templates/pixel9.png")?)?;
//! let photo = Raster::decode(&std::fs::read("photo.jpg")?)?;
//!
//! let cover = composite(&template, &photo)?;
//! cover.save_png("cover.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`compositor`] - The chroma-key compositing core (pure, no I/O)
//! - [`catalog`] - Keyed records of mobile models and their templates
//! - [`storage`] - Upload, template, and generated-cover folders
//! - [`generator`] - The upload-to-cover pipeline
//! - [`api`] - REST surface over the above
//! - [`config`] - Configuration management

pub mod api;
pub mod catalog;
pub mod compositor;
pub mod config;
pub mod error;
pub mod generator;
pub mod storage;

// Re-export commonly used types for convenience
pub use crate::{
    catalog::{MobileModel, ModelCatalog},
    compositor::{composite, ChromaMask, Raster},
    config::Config,
    error::{CoverError, Result},
    generator::CoverGenerator,
    storage::Storage,
};
