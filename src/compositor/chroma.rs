use crate::compositor::raster::Raster;

/// Inclusive HSV bounds identifying the placeholder color in a template
///
/// Hue is on the halved 0-179 scale, saturation and value are 8-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromaRange {
    pub hue_min: u8,
    pub hue_max: u8,
    pub sat_min: u8,
    pub sat_max: u8,
    pub val_min: u8,
    pub val_max: u8,
}

/// The green placeholder range used by every cover template
///
/// Fixed policy, not user-configurable.
pub const GREEN_RANGE: ChromaRange = ChromaRange {
    hue_min: 35,
    hue_max: 85,
    sat_min: 100,
    sat_max: 255,
    val_min: 100,
    val_max: 255,
};

impl ChromaRange {
    /// Test whether an HSV triple falls inside this range
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        let [h, s, v] = hsv;
        (self.hue_min..=self.hue_max).contains(&h)
            && (self.sat_min..=self.sat_max).contains(&s)
            && (self.val_min..=self.val_max).contains(&v)
    }
}

/// Convert an 8-bit RGB pixel to HSV with hue on the 0-179 scale
///
/// Gray pixels (zero chroma) get hue 0, and a black pixel gets saturation 0.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb;
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = v - min;

    let s = if v == 0 {
        0
    } else {
        ((delta as f32) * 255.0 / (v as f32)).round() as u8
    };

    let h = if delta == 0 {
        0
    } else {
        let delta_f = delta as f32;
        let mut degrees = if v == r {
            60.0 * (g as f32 - b as f32) / delta_f
        } else if v == g {
            120.0 + 60.0 * (b as f32 - r as f32) / delta_f
        } else {
            240.0 + 60.0 * (r as f32 - g as f32) / delta_f
        };
        if degrees < 0.0 {
            degrees += 360.0;
        }
        ((degrees / 2.0).round() as u16 % 180) as u8
    };

    [h, s, v]
}

/// Boolean grid marking the chroma placeholder pixels of a template
///
/// Same dimensions as the template it was built from; a set bit means the
/// template pixel is part of the placeholder region.
#[derive(Debug, Clone)]
pub struct ChromaMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl ChromaMask {
    /// Build the mask for a template using the fixed green range
    pub fn build(template: &Raster) -> Self {
        let width = template.width();
        let height = template.height();
        let mut bits = Vec::with_capacity((width * height) as usize);

        for y in 0..height {
            for x in 0..width {
                let hsv = rgb_to_hsv(template.get_pixel(x, y));
                bits.push(GREEN_RANGE.contains(hsv));
            }
        }

        Self {
            width,
            height,
            bits,
        }
    }

    /// Whether the pixel at the given coordinates is inside the chroma region
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bits[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels inside the chroma region
    pub fn coverage(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }
}
