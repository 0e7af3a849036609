//! # Compositing Core
//!
//! Replaces the green placeholder region of a cover template with a user
//! photo. The whole operation is a pure transform over in-memory buffers;
//! decoding, encoding, and file I/O belong to the callers.

pub mod chroma;
pub mod raster;

use image::imageops::{self, FilterType};

use crate::error::Result;

pub use chroma::{rgb_to_hsv, ChromaMask, ChromaRange, GREEN_RANGE};
pub use raster::Raster;

/// Composite a user photo into a template's chroma-keyed placeholder region
///
/// The photo is stretched (not cropped) to the template dimensions, so the
/// output always has exactly the template's size. Template pixels outside
/// the chroma range pass through unchanged; pixels inside it are replaced by
/// the resized photo. The two masked layers are combined with per-channel
/// saturating addition.
pub fn composite(template: &Raster, photo: &Raster) -> Result<Raster> {
    template.ensure_non_empty()?;
    photo.ensure_non_empty()?;

    let width = template.width();
    let height = template.height();

    // Stretch to template dimensions; aspect ratio is deliberately discarded.
    let resized = Raster::new(imageops::resize(
        photo.as_image(),
        width,
        height,
        FilterType::Triangle,
    ));

    let mask = ChromaMask::build(template);

    let mut result = Raster::new_filled(width, height, [0, 0, 0]);
    for y in 0..height {
        for x in 0..width {
            // The mask and its inverse never overlap, so exactly one layer
            // contributes a non-zero value at each pixel.
            let template_kept = if mask.get(x, y) {
                [0, 0, 0]
            } else {
                template.get_pixel(x, y)
            };
            let photo_inserted = if mask.get(x, y) {
                resized.get_pixel(x, y)
            } else {
                [0, 0, 0]
            };
            result.set_pixel(x, y, saturating_add_pixel(template_kept, photo_inserted));
        }
    }

    Ok(result)
}

/// Per-channel saturating addition of two RGB pixels
fn saturating_add_pixel(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    [
        a[0].saturating_add(b[0]),
        a[1].saturating_add(b[1]),
        a[2].saturating_add(b[2]),
    ]
}
