// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel buffer workers write into.  It is a flat, row-major
//! arena sized once at construction; a compute pass overwrites it in
//! place one full row at a time.

use itertools::iproduct;

use error::{Error, Result};
use palette::{Color, BLACK};

/// One output pixel: where it goes on the raster and what color it is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel {
    /// Column and row on the output raster
    pub position: (u32, u32),
    /// Color computed for that position
    pub color: Color,
}

/// `width * height` pixels plus the bookkeeping needed to prove a
/// pass touched every row exactly once.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    rows_written: Vec<u32>,
    generation: u64,
}

impl PixelBuffer {
    /// Allocates a buffer for a raster of the given size, every pixel
    /// black and already carrying its position.
    pub fn new(width: u32, height: u32) -> Result<PixelBuffer> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let pixels = iproduct!(0..height, 0..width)
            .map(|(y, x)| Pixel {
                position: (x, y),
                color: BLACK,
            })
            .collect();
        Ok(PixelBuffer {
            width,
            height,
            pixels,
            rows_written: vec![0; height as usize],
            generation: 0,
        })
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The total number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Never true for a buffer built through `new`.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Every pixel, row-major.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// The pixel at column `x`, row `y`, if that is on the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<&Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.offset(x, y))
    }

    /// One full row.
    pub fn row(&self, y: u32) -> &[Pixel] {
        let start = self.offset(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// Which frame this buffer holds.  Zero until the first pass is
    /// published.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// How many times each row was committed since the last
    /// `begin_pass`.
    pub fn rows_written(&self) -> &[u32] {
        &self.rows_written
    }

    /// True when every row has been committed exactly once this pass.
    pub fn is_complete(&self) -> bool {
        self.rows_written.iter().all(|&n| n == 1)
    }

    /// Resets the per-row markers.  Called at the top of each pass.
    pub fn begin_pass(&mut self) {
        for n in self.rows_written.iter_mut() {
            *n = 0;
        }
    }

    /// Copies a finished row of colors into place.  The caller holds
    /// the buffer's lock for exactly as long as this takes.
    pub fn commit_row(&mut self, y: u32, colors: &[Color]) {
        assert_eq!(colors.len(), self.width as usize, "row length mismatch");
        let start = self.offset(0, y);
        let row = &mut self.pixels[start..start + colors.len()];
        for (x, (pixel, color)) in row.iter_mut().zip(colors).enumerate() {
            pixel.position = (x as u32, y);
            pixel.color = *color;
        }
        self.rows_written[y as usize] += 1;
    }

    /// Packed RGB bytes, row-major, for image encoders and blitters.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&[pixel.color.r, pixel.color.g, pixel.color.b]);
        }
        bytes
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
