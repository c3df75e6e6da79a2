use serde::Serialize;

use crate::complex::Complex;
use crate::error::CoreError;

/// Output raster dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl<'de> serde::Deserialize<'de> for RasterSize {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            width: u32,
            height: u32,
        }
        let raw = Raw::deserialize(deserializer)?;
        RasterSize::new(raw.width, raw.height).map_err(serde::de::Error::custom)
    }
}

impl RasterSize {
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidRaster { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of pixels (and of sample points) in the raster.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `height / width`, the ratio used by [`AspectLock::Raster`](crate::AspectLock::Raster).
    pub fn height_over_width(&self) -> f64 {
        self.height as f64 / self.width as f64
    }
}

impl Default for RasterSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

/// The visible rectangle of the parameter plane.
///
/// Always non-degenerate: `upper_right` lies strictly above and to the right
/// of `lower_left` and every coordinate is finite. Construction goes through
/// [`Region::new`] or [`Region::from_center`], and deserialization applies
/// the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    lower_left: Complex,
    upper_right: Complex,
}

impl<'de> serde::Deserialize<'de> for Region {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            lower_left: Complex,
            upper_right: Complex,
        }
        let raw = Raw::deserialize(deserializer)?;
        Region::new(raw.lower_left, raw.upper_right).map_err(serde::de::Error::custom)
    }
}

impl Region {
    pub fn new(lower_left: Complex, upper_right: Complex) -> crate::Result<Self> {
        if !lower_left.is_finite() || !upper_right.is_finite() {
            return Err(CoreError::DegenerateRegion {
                reason: format!("corners must be finite, got {lower_left} .. {upper_right}"),
            });
        }
        if upper_right.re <= lower_left.re || upper_right.im <= lower_left.im {
            return Err(CoreError::DegenerateRegion {
                reason: format!(
                    "upper right {upper_right} must lie above and right of lower left {lower_left}"
                ),
            });
        }
        Ok(Self {
            lower_left,
            upper_right,
        })
    }

    /// Build a region of the given extent centred on `center`.
    pub fn from_center(center: Complex, width: f64, height: f64) -> crate::Result<Self> {
        let half = Complex::new(0.5 * width, 0.5 * height);
        Self::new(center - half, center + half)
    }

    /// Default view of the logistic map: `[-2, 4] × [-2, 2]`.
    pub fn default_logistic() -> Self {
        Self {
            lower_left: Complex::new(-2.0, -2.0),
            upper_right: Complex::new(4.0, 2.0),
        }
    }

    #[inline]
    pub fn lower_left(&self) -> Complex {
        self.lower_left
    }

    #[inline]
    pub fn upper_right(&self) -> Complex {
        self.upper_right
    }

    /// Real extent in plane units.
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper_right.re - self.lower_left.re
    }

    /// Imaginary extent in plane units.
    #[inline]
    pub fn height(&self) -> f64 {
        self.upper_right.im - self.lower_left.im
    }

    pub fn center(&self) -> Complex {
        Complex::new(
            0.5 * (self.lower_left.re + self.upper_right.re),
            0.5 * (self.lower_left.im + self.upper_right.im),
        )
    }

    /// Map a raster position to the plane by linear interpolation.
    ///
    /// `x` runs left to right and `y` bottom to top, both in pixels, so
    /// `(0, 0)` is the lower-left corner and `(raster.width, raster.height)`
    /// the upper-right one.
    pub fn screen_to_plane(&self, x: f64, y: f64, raster: RasterSize) -> Complex {
        Complex::new(
            self.lower_left.re + x / raster.width as f64 * self.width(),
            self.lower_left.im + y / raster.height as f64 * self.height(),
        )
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::default_logistic()
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] .. [{}]", self.lower_left, self.upper_right)
    }
}
