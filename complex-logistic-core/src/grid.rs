use crate::complex::Complex;
use crate::region::{RasterSize, Region};

/// The ordered sample points for one render request.
///
/// Column-major: the point for raster column `i`, row `j` sits at index
/// `i * height + j`. Row 0 is the top edge of the region.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    points: Vec<Complex>,
}

impl SampleGrid {
    /// Expand `region` into `raster.width × raster.height` sample points.
    ///
    /// Point `(i, j)` is `(ll.re + i·h_stride, ur.im − j·v_stride)`, so the
    /// right and bottom edges of the region are never sampled.
    pub fn build(region: &Region, raster: RasterSize) -> Self {
        let (width, height) = (raster.width, raster.height);
        let horizontal_stride = region.width() / width as f64;
        let vertical_stride = region.height() / height as f64;
        let left = region.lower_left().re;
        let top = region.upper_right().im;

        let mut points = Vec::with_capacity(raster.pixel_count());
        for i in 0..width {
            let re = left + i as f64 * horizontal_stride;
            for j in 0..height {
                points.push(Complex::new(re, top - j as f64 * vertical_stride));
            }
        }

        Self {
            width,
            height,
            points,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Complex] {
        &self.points
    }

    #[inline]
    pub fn index(&self, i: u32, j: u32) -> usize {
        i as usize * self.height as usize + j as usize
    }

    pub fn get(&self, i: u32, j: u32) -> Option<Complex> {
        if i >= self.width || j >= self.height {
            return None;
        }
        self.points.get(self.index(i, j)).copied()
    }
}
