// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport, which describes the rectangle of the
//! complex plane currently mapped onto the output raster, and the
//! ViewportSnapshot, a frozen copy of that rectangle handed to a
//! compute pass so nothing can move underneath the workers.

use num::Complex;

/// Width of the complex plane visible at zoom level 0.
pub const BASE_WIDTH: f64 = 4.0;
/// Height of the visible plane at zoom level 0, before the aspect
/// ratio is applied.
pub const BASE_HEIGHT: f64 = 4.0;
/// How much each zoom step scales the visible extent by.
pub const ZOOM_FACTOR: f64 = 0.5;

/// The rectangle a compute pass maps pixels onto: a center and a
/// width/height on the complex plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportSnapshot {
    /// Center of the visible rectangle
    pub center: Complex<f64>,
    /// Width and height of the visible rectangle
    pub size: (f64, f64),
}

impl ViewportSnapshot {
    /// Given a pixel on the output raster, return the point on the
    /// complex plane it corresponds to.  Pixel (0, 0) lands on
    /// `center - size / 2`, and each pixel step covers
    /// `size / output` of the plane.  Out-of-range pixels simply
    /// extrapolate.
    #[inline]
    pub fn map_pixel_to_plane(
        &self,
        pixel_x: u32,
        pixel_y: u32,
        output_width: u32,
        output_height: u32,
    ) -> Complex<f64> {
        let left = self.center.re - self.size.0 / 2.0;
        let top = self.center.im - self.size.1 / 2.0;
        Complex::new(
            left + f64::from(pixel_x) * self.size.0 / f64::from(output_width),
            top + f64::from(pixel_y) * self.size.1 / f64::from(output_height),
        )
    }
}

/// The user's window onto the complex plane.  Zooming only ever
/// happens in whole steps; the extent is always recomputed from the
/// zoom level, so stepping in and back out lands exactly where it
/// started.
#[derive(Clone, Debug)]
pub struct Viewport {
    center: Complex<f64>,
    size: (f64, f64),
    zoom_level: i32,
    aspect_ratio: f64,
    mouse_location: Complex<f64>,
    // Bumped by every mutation that changes what a frame looks like.
    revision: u64,
}

impl Viewport {
    /// A viewport centered on the origin at zoom level 0.  The aspect
    /// ratio is height over width of the output raster.
    pub fn new(aspect_ratio: f64) -> Viewport {
        Viewport {
            center: Complex::new(0.0, 0.0),
            size: Viewport::size_at(0, aspect_ratio),
            zoom_level: 0,
            aspect_ratio,
            mouse_location: Complex::new(0.0, 0.0),
            revision: 0,
        }
    }

    /// Convenience constructor taking the output raster dimensions.
    pub fn for_raster(width: u32, height: u32) -> Viewport {
        Viewport::new(f64::from(height) / f64::from(width))
    }

    fn size_at(zoom_level: i32, aspect_ratio: f64) -> (f64, f64) {
        let scale = ZOOM_FACTOR.powi(zoom_level);
        (BASE_WIDTH * scale, BASE_HEIGHT * aspect_ratio * scale)
    }

    /// Center of the visible rectangle.
    pub fn center(&self) -> Complex<f64> {
        self.center
    }

    /// Width and height of the visible rectangle.
    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    /// Number of zoom steps applied so far; negative when zoomed out.
    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    /// Height over width, fixed for the life of the viewport.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Last cursor location reported by the front end, in plane
    /// coordinates.
    pub fn mouse_location(&self) -> Complex<f64> {
        self.mouse_location
    }

    /// Changes each time the viewport is moved or zoomed.  A frame
    /// rendered at one revision is stale at any other.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// See `ViewportSnapshot::map_pixel_to_plane`.
    pub fn map_pixel_to_plane(
        &self,
        pixel_x: u32,
        pixel_y: u32,
        output_width: u32,
        output_height: u32,
    ) -> Complex<f64> {
        self.snapshot()
            .map_pixel_to_plane(pixel_x, pixel_y, output_width, output_height)
    }

    /// Freezes the current rectangle for a compute pass.
    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            center: self.center,
            size: self.size,
        }
    }

    /// Halves the visible extent.
    pub fn zoom_in(&mut self) {
        self.zoom_to(self.zoom_level + 1);
    }

    /// Doubles the visible extent.
    pub fn zoom_out(&mut self) {
        self.zoom_to(self.zoom_level - 1);
    }

    /// Jumps straight to the given zoom level.
    pub fn zoom_to(&mut self, zoom_level: i32) {
        self.zoom_level = zoom_level;
        self.size = Viewport::size_at(zoom_level, self.aspect_ratio);
        self.touch();
    }

    /// Moves the center; the extent is left alone.
    pub fn set_center(&mut self, center: Complex<f64>) {
        self.center = center;
        self.touch();
    }

    /// Records where the cursor is.  Only the status text cares, so
    /// this does not make the current frame stale.
    pub fn set_mouse_location(&mut self, location: Complex<f64>) {
        self.mouse_location = location;
    }

    /// The heads-up display text: where we are, where the cursor is,
    /// and how to drive.
    pub fn status_text(&self) -> String {
        format!(
            "Mandelbrot Set\n\
             Center: ({}, {})\n\
             Cursor: ({}, {})\n\
             Left-click to Zoom in\n\
             Right-click to Zoom out\n",
            self.center.re, self.center.im, self.mouse_location.re, self.mouse_location.im
        )
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
