use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::result_buffer::ResultBuffer;

/// Phosphor green of an old storage-tube terminal.
pub const TEKTRONIX_GREEN: [u8; 4] = [0x33, 0xFF, 0x33, 0xFF];
pub const BLACK: [u8; 4] = [0, 0, 0, 0xFF];

/// The two-color mapping from escape flags to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_escaped")]
    pub escaped: [u8; 4],
    #[serde(default = "default_bounded")]
    pub bounded: [u8; 4],
}

fn default_escaped() -> [u8; 4] {
    BLACK
}

fn default_bounded() -> [u8; 4] {
    TEKTRONIX_GREEN
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            escaped: default_escaped(),
            bounded: default_bounded(),
        }
    }
}

impl Palette {
    #[inline]
    pub fn color(&self, escaped: bool) -> [u8; 4] {
        if escaped {
            self.escaped
        } else {
            self.bounded
        }
    }

    /// Map a result buffer to a row-major bitmap of the same size.
    pub fn colorize(&self, results: &ResultBuffer) -> Bitmap {
        let mut bitmap = Bitmap::new(results.width, results.height);
        let height = results.height as usize;
        if height == 0 {
            return bitmap;
        }
        for (i, column) in results.data.chunks_exact(height).enumerate() {
            for (j, &escaped) in column.iter().enumerate() {
                bitmap.set_pixel(i as u32, j as u32, self.color(escaped));
            }
        }
        bitmap
    }
}
