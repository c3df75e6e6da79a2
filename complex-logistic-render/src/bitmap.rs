/// An RGBA pixel buffer ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a new bitmap filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// RGBA of the pixel at column `x`, row `y` (row 0 at the top).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let o = self.offset(x, y);
        [
            self.pixels[o],
            self.pixels[o + 1],
            self.pixels[o + 2],
            self.pixels[o + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let o = self.offset(x, y);
        self.pixels[o..o + 4].copy_from_slice(&rgba);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bitmap_is_black_opaque() {
        let bmp = Bitmap::new(4, 4);
        assert_eq!(bmp.pixels.len(), 4 * 4 * 4);
        for chunk in bmp.pixels.chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn set_pixel_is_row_major() {
        let mut bmp = Bitmap::new(3, 2);
        bmp.set_pixel(2, 1, [1, 2, 3, 4]);
        assert_eq!(&bmp.pixels[20..24], &[1, 2, 3, 4]);
        assert_eq!(bmp.pixel(2, 1), [1, 2, 3, 4]);
        assert_eq!(bmp.pixel(0, 0), [0, 0, 0, 255]);
    }
}
