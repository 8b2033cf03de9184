// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Explorer is the boundary a front end drives.  It owns the
//! viewport and two pixel buffers: the published one the renderer may
//! draw from, and a scratch one each compute pass writes into.  The
//! two are swapped only when a pass finishes cleanly, so a failed pass
//! leaves the last good frame on screen.
//!
//! Input events only move the viewport.  Any number of them between
//! two calls to `compute_frame` collapse into a single pass.

use std::mem;

use num::Complex;

use buffer::PixelBuffer;
use config::Config;
use error::Result;
use render::{FrameRenderer, FrameStats};
use viewport::Viewport;

/// A running explorer session.
pub struct Explorer {
    config: Config,
    viewport: Viewport,
    renderer: FrameRenderer,
    front: PixelBuffer,
    back: PixelBuffer,
    generation: u64,
    rendered_revision: Option<u64>,
    last_stats: Option<FrameStats>,
}

impl Explorer {
    /// Validates the configuration and allocates both buffers.  No
    /// frame is computed until `compute_frame` is called.
    pub fn new(config: Config) -> Result<Explorer> {
        config.validate()?;
        let renderer = FrameRenderer::new(config.workers, config.scheme)?;
        let front = PixelBuffer::new(config.width, config.height)?;
        let back = front.clone();
        let mut viewport = Viewport::new(config.aspect_ratio());
        viewport.set_center(config.center);
        viewport.zoom_to(config.zoom_level);
        info!(
            "explorer ready: {}x{}, {} workers, {} palette",
            config.width, config.height, config.workers, config.scheme
        );
        Ok(Explorer {
            config,
            viewport,
            renderer,
            front,
            back,
            generation: 0,
            rendered_revision: None,
            last_stats: None,
        })
    }

    /// Read access to the viewport, for status displays.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// True when the viewport has moved since the published frame was
    /// computed, or no frame has been computed yet.
    pub fn needs_recompute(&self) -> bool {
        self.rendered_revision != Some(self.viewport.revision())
    }

    /// Recenters on the plane point under the given pixel, then zooms
    /// in one step.
    pub fn zoom_in_at(&mut self, pixel_x: u32, pixel_y: u32) {
        self.recenter(pixel_x, pixel_y);
        self.viewport.zoom_in();
        debug!("zoom in to level {}", self.viewport.zoom_level());
    }

    /// Recenters on the plane point under the given pixel, then zooms
    /// out one step.
    pub fn zoom_out_at(&mut self, pixel_x: u32, pixel_y: u32) {
        self.recenter(pixel_x, pixel_y);
        self.viewport.zoom_out();
        debug!("zoom out to level {}", self.viewport.zoom_level());
    }

    /// Tracks the cursor for the status text.  Does not invalidate
    /// the frame.
    pub fn set_mouse_position(&mut self, pixel_x: u32, pixel_y: u32) {
        let location = self.pixel_to_plane(pixel_x, pixel_y);
        self.viewport.set_mouse_location(location);
    }

    /// Brings the published frame up to date with the viewport and
    /// returns it.  Does nothing but return the current frame if the
    /// viewport has not moved.
    ///
    /// On failure the error is logged and returned, the previous frame
    /// stays published, and the session stays stale so the next call
    /// tries again.
    pub fn compute_frame(&mut self) -> Result<&PixelBuffer> {
        if !self.needs_recompute() {
            return Ok(&self.front);
        }
        let revision = self.viewport.revision();
        let view = self.viewport.snapshot();
        match self.renderer.render(&view, &mut self.back) {
            Ok(stats) => {
                self.generation += 1;
                self.back.set_generation(self.generation);
                mem::swap(&mut self.front, &mut self.back);
                self.rendered_revision = Some(revision);
                info!(
                    "frame {} ready in {:?} (center {}, zoom {})",
                    self.generation,
                    stats.elapsed,
                    view.center,
                    self.viewport.zoom_level()
                );
                self.last_stats = Some(stats);
                Ok(&self.front)
            }
            Err(e) => {
                error!("compute pass aborted, keeping frame {}: {}", self.generation, e);
                Err(e)
            }
        }
    }

    /// The published frame.  Generation 0 means nothing has been
    /// computed yet and the buffer is all black.
    pub fn frame(&self) -> &PixelBuffer {
        &self.front
    }

    /// Number of frames published so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Statistics from the most recent successful pass.
    pub fn last_stats(&self) -> Option<&FrameStats> {
        self.last_stats.as_ref()
    }

    /// Heads-up display text for the front end to draw.
    pub fn status_text(&self) -> String {
        self.viewport.status_text()
    }

    fn pixel_to_plane(&self, pixel_x: u32, pixel_y: u32) -> Complex<f64> {
        self.viewport
            .map_pixel_to_plane(pixel_x, pixel_y, self.config.width, self.config.height)
    }

    fn recenter(&mut self, pixel_x: u32, pixel_y: u32) {
        let center = self.pixel_to_plane(pixel_x, pixel_y);
        self.viewport.set_center(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::Error;
    use num::Complex;
    use render::Fault;

    fn small() -> Config {
        Config {
            width: 40,
            height: 30,
            workers: 3,
            ..Config::default()
        }
    }

    #[test]
    fn first_call_computes_a_frame() {
        let mut explorer = Explorer::new(small()).unwrap();
        assert!(explorer.needs_recompute());
        assert_eq!(explorer.generation(), 0);
        {
            let frame = explorer.compute_frame().unwrap();
            assert_eq!(frame.generation(), 1);
            assert!(frame.is_complete());
        }
        assert!(!explorer.needs_recompute());
        assert_eq!(explorer.last_stats().unwrap().rows, 30);
    }

    #[test]
    fn unchanged_viewport_does_not_recompute() {
        let mut explorer = Explorer::new(small()).unwrap();
        explorer.compute_frame().unwrap();
        explorer.compute_frame().unwrap();
        assert_eq!(explorer.generation(), 1);
    }

    #[test]
    fn mouse_moves_do_not_invalidate() {
        let mut explorer = Explorer::new(small()).unwrap();
        explorer.compute_frame().unwrap();
        explorer.set_mouse_position(10, 10);
        assert!(!explorer.needs_recompute());
        assert_eq!(
            explorer.viewport().mouse_location(),
            explorer.viewport().map_pixel_to_plane(10, 10, 40, 30)
        );
    }

    #[test]
    fn zoom_events_coalesce_into_one_pass() {
        let mut explorer = Explorer::new(small()).unwrap();
        explorer.compute_frame().unwrap();
        explorer.zoom_in_at(20, 15);
        explorer.zoom_in_at(5, 5);
        explorer.zoom_out_at(30, 10);
        assert!(explorer.needs_recompute());
        explorer.compute_frame().unwrap();
        assert_eq!(explorer.generation(), 2);
        assert_eq!(explorer.viewport().zoom_level(), 1);
    }

    #[test]
    fn zoom_in_recenters_on_the_clicked_point() {
        let mut explorer = Explorer::new(small()).unwrap();
        let target = explorer.viewport().map_pixel_to_plane(10, 5, 40, 30);
        explorer.zoom_in_at(10, 5);
        assert_eq!(explorer.viewport().center(), target);
        assert_eq!(explorer.viewport().size(), (2.0, 1.5));
    }

    #[test]
    fn config_center_and_zoom_are_applied() {
        let config = Config {
            center: Complex::new(-0.5, 0.0),
            zoom_level: -1,
            ..small()
        };
        let explorer = Explorer::new(config).unwrap();
        assert_eq!(explorer.viewport().center(), Complex::new(-0.5, 0.0));
        assert_eq!(explorer.viewport().size(), (8.0, 6.0));
        assert!(explorer.status_text().contains("Center: (-0.5, 0)"));
    }

    #[test]
    fn bad_config_is_rejected() {
        let config = Config {
            workers: 0,
            ..small()
        };
        assert!(Explorer::new(config).is_err());
    }

    #[test]
    fn failed_pass_keeps_the_last_frame() {
        let mut explorer = Explorer::new(small()).unwrap();
        explorer.compute_frame().unwrap();
        let published = explorer.frame().clone();
        explorer.zoom_in_at(12, 9);

        explorer.renderer.set_fault(Some(Fault::SpawnRefused(1)));
        match explorer.compute_frame() {
            Err(Error::WorkerSpawn { .. }) => {}
            other => panic!("expected a spawn failure, got {:?}", other.map(|f| f.generation())),
        }
        assert_eq!(explorer.generation(), 1);
        assert_eq!(explorer.frame().generation(), 1);
        assert_eq!(explorer.frame().pixels(), published.pixels());
        assert!(explorer.needs_recompute());
        assert_eq!(explorer.last_stats().unwrap().rows, 30);

        explorer.renderer.set_fault(None);
        {
            let frame = explorer.compute_frame().unwrap();
            assert_eq!(frame.generation(), 2);
            assert!(frame.is_complete());
        }
        assert!(!explorer.needs_recompute());
    }

    #[test]
    fn panicked_pass_is_retried() {
        let mut explorer = Explorer::new(small()).unwrap();
        explorer.renderer.set_fault(Some(Fault::Panics(0)));
        assert!(explorer.compute_frame().is_err());
        assert_eq!(explorer.frame().generation(), 0);
        assert!(explorer.needs_recompute());

        explorer.renderer.set_fault(None);
        assert_eq!(explorer.compute_frame().unwrap().generation(), 1);
    }
}
