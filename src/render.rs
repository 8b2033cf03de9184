// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The compute pass.
//!
//! Cost per pixel varies wildly: points far outside the set escape on
//! the first iteration, points hugging the boundary can run all the
//! way to `MAX_ITER`.  Carving the image into one contiguous block of
//! rows per thread leaves the threads that drew the boring blocks
//! sitting idle while one thread grinds through the interesting one.
//!
//! Instead, rows are pulled one at a time off a shared atomic counter.
//! A worker that finishes a cheap row immediately claims the next one,
//! so the expensive rows end up spread across everybody.  Each row is
//! computed into the worker's own scratch buffer; the shared pixel
//! buffer is locked only long enough to copy the finished row in.

extern crate crossbeam;

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use buffer::PixelBuffer;
use error::{Error, Result};
use escape::count_iterations;
use palette::{Color, ColorScheme, BLACK};
use viewport::ViewportSnapshot;

/// What a finished pass looked like.
#[derive(Clone, Debug)]
pub struct FrameStats {
    /// Rows computed
    pub rows: u32,
    /// How many rows each worker ended up claiming
    pub rows_per_worker: Vec<usize>,
    /// Wall-clock time from first spawn to last join
    pub elapsed: Duration,
}

impl FrameStats {
    /// Number of workers that took part.
    pub fn workers(&self) -> usize {
        self.rows_per_worker.len()
    }
}

/// Knows how many workers to throw at a frame and which palette to
/// paint it with.  Holds no per-frame state; the viewport and the
/// buffer are handed in for each pass.
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    workers: usize,
    scheme: ColorScheme,
    #[cfg(test)]
    fault: Option<Fault>,
}

/// A failure to force on one worker of the next pass.
#[cfg(test)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Fault {
    /// The OS refuses to start this worker.
    SpawnRefused(usize),
    /// This worker panics before claiming a row.
    Panics(usize),
}

impl FrameRenderer {
    /// Requires at least one worker.
    pub fn new(workers: usize, scheme: ColorScheme) -> Result<Self> {
        if workers == 0 {
            return Err(Error::NoWorkers);
        }
        Ok(FrameRenderer {
            workers,
            scheme,
            #[cfg(test)]
            fault: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn set_fault(&mut self, fault: Option<Fault>) {
        self.fault = fault;
    }

    #[cfg(test)]
    fn refused_spawn(&self, worker: usize) -> Option<io::Error> {
        match self.fault {
            Some(Fault::SpawnRefused(n)) if n == worker => Some(io::Error::new(
                io::ErrorKind::WouldBlock,
                "Resource temporarily unavailable",
            )),
            _ => None,
        }
    }

    #[cfg(not(test))]
    #[inline]
    fn refused_spawn(&self, _worker: usize) -> Option<io::Error> {
        None
    }

    #[cfg(test)]
    fn check_panic(&self, worker: usize) {
        if self.fault == Some(Fault::Panics(worker)) {
            panic!("row worker {} went down", worker);
        }
    }

    #[cfg(not(test))]
    #[inline]
    fn check_panic(&self, _worker: usize) {}

    /// Computes every color in row `y` into `row`, which must be
    /// exactly `width` long.
    pub fn render_row(
        &self,
        view: &ViewportSnapshot,
        y: u32,
        width: u32,
        height: u32,
        row: &mut [Color],
    ) {
        for (x, color) in row.iter_mut().enumerate() {
            let point = view.map_pixel_to_plane(x as u32, y, width, height);
            *color = self.scheme.color(count_iterations(point));
        }
    }

    /// The single-threaded pass: top to bottom, one row at a time,
    /// straight into the buffer.
    pub fn render_single(&self, view: &ViewportSnapshot, buffer: &mut PixelBuffer) {
        let (width, height) = (buffer.width(), buffer.height());
        let mut row = vec![BLACK; width as usize];
        buffer.begin_pass();
        for y in 0..height {
            self.render_row(view, y, width, height, &mut row);
            buffer.commit_row(y, &row);
        }
    }

    /// One worker's loop: claim the next row, compute it privately,
    /// lock just long enough to copy it in, repeat until the counter
    /// runs past the last row.  Returns the number of rows claimed.
    fn drain_rows(
        &self,
        worker: usize,
        view: &ViewportSnapshot,
        (width, height): (u32, u32),
        next_row: &AtomicUsize,
        shared: &Mutex<&mut PixelBuffer>,
    ) -> usize {
        self.check_panic(worker);
        let mut row = vec![BLACK; width as usize];
        let mut claimed = 0;
        loop {
            let y = next_row.fetch_add(1, Ordering::SeqCst);
            if y >= height as usize {
                break;
            }
            self.render_row(view, y as u32, width, height, &mut row);
            {
                let mut target = match shared.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                target.commit_row(y as u32, &row);
            }
            claimed += 1;
        }
        trace!("row worker {} done after {} rows", worker, claimed);
        claimed
    }

    /// The threaded pass.  Spawns the workers, lets them drain the
    /// row counter, and joins every one of them before returning.
    ///
    /// If a worker cannot be spawned, the counter is pushed past the
    /// last row so the workers already running stop after their
    /// current row, and the spawn error is returned.  The buffer is
    /// then only partly overwritten; callers that publish frames
    /// must not publish this one.
    pub fn render(&self, view: &ViewportSnapshot, buffer: &mut PixelBuffer) -> Result<FrameStats> {
        let (width, height) = (buffer.width(), buffer.height());
        let rows = height as usize;
        buffer.begin_pass();

        let next_row = AtomicUsize::new(0);
        let shared = Mutex::new(buffer);
        let started = Instant::now();

        let outcome = crossbeam::scope(|spawner| -> Result<Vec<usize>> {
            let mut handles = Vec::with_capacity(self.workers);
            for worker in 0..self.workers {
                let next_row = &next_row;
                let shared = &shared;
                let spawned = match self.refused_spawn(worker) {
                    Some(cause) => Err(cause),
                    None => spawner
                        .builder()
                        .name(format!("row-worker-{}", worker))
                        .spawn(move |_| {
                            self.drain_rows(worker, view, (width, height), next_row, shared)
                        }),
                };
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(cause) => {
                        next_row.fetch_add(rows, Ordering::SeqCst);
                        return Err(Error::WorkerSpawn { worker, cause });
                    }
                }
            }

            let mut claimed = Vec::with_capacity(handles.len());
            for handle in handles {
                match handle.join() {
                    Ok(n) => claimed.push(n),
                    Err(_) => return Err(Error::WorkerPanicked),
                }
            }
            Ok(claimed)
        });

        let rows_per_worker = match outcome {
            Ok(result) => result?,
            Err(_) => return Err(Error::WorkerPanicked),
        };
        let stats = FrameStats {
            rows: height,
            rows_per_worker,
            elapsed: started.elapsed(),
        };
        debug!(
            "computed {}x{} on {} workers in {:?} (rows per worker: {:?})",
            width,
            height,
            stats.workers(),
            stats.elapsed,
            stats.rows_per_worker
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape::MAX_ITER;
    use num::Complex;
    use palette::iterations_to_color;
    use viewport::Viewport;

    #[test]
    fn refuses_zero_workers() {
        assert!(FrameRenderer::new(0, ColorScheme::Banded).is_err());
    }

    #[test]
    fn every_row_is_written_exactly_once() {
        let view = Viewport::for_raster(37, 23).snapshot();
        let mut buffer = PixelBuffer::new(37, 23).unwrap();
        let renderer = FrameRenderer::new(4, ColorScheme::Banded).unwrap();
        let stats = renderer.render(&view, &mut buffer).unwrap();
        assert!(buffer.is_complete());
        assert_eq!(stats.rows, 23);
        assert_eq!(stats.workers(), 4);
        assert_eq!(stats.rows_per_worker.iter().sum::<usize>(), 23);
    }

    #[test]
    fn second_pass_resets_markers() {
        let view = Viewport::for_raster(8, 8).snapshot();
        let mut buffer = PixelBuffer::new(8, 8).unwrap();
        let renderer = FrameRenderer::new(3, ColorScheme::Banded).unwrap();
        renderer.render(&view, &mut buffer).unwrap();
        renderer.render(&view, &mut buffer).unwrap();
        assert!(buffer.is_complete());
    }

    #[test]
    fn more_workers_than_rows_is_fine() {
        let view = Viewport::for_raster(5, 2).snapshot();
        let mut buffer = PixelBuffer::new(5, 2).unwrap();
        let renderer = FrameRenderer::new(16, ColorScheme::Banded).unwrap();
        let stats = renderer.render(&view, &mut buffer).unwrap();
        assert!(buffer.is_complete());
        assert_eq!(stats.rows_per_worker.iter().sum::<usize>(), 2);
    }

    #[test]
    fn threaded_matches_single() {
        let mut vp = Viewport::for_raster(64, 48);
        vp.set_center(Complex::new(-0.75, 0.1));
        vp.zoom_in();
        let view = vp.snapshot();

        let mut single = PixelBuffer::new(64, 48).unwrap();
        let mut threaded = PixelBuffer::new(64, 48).unwrap();
        let renderer = FrameRenderer::new(6, ColorScheme::Banded).unwrap();
        renderer.render_single(&view, &mut single);
        renderer.render(&view, &mut threaded).unwrap();
        assert_eq!(single.pixels(), threaded.pixels());
    }

    #[test]
    fn row_colors_match_the_evaluator() {
        let view = Viewport::for_raster(16, 4).snapshot();
        let renderer = FrameRenderer::new(1, ColorScheme::Banded).unwrap();
        let mut row = vec![BLACK; 16];
        renderer.render_row(&view, 2, 16, 4, &mut row);
        for (x, color) in row.iter().enumerate() {
            let point = view.map_pixel_to_plane(x as u32, 2, 16, 4);
            assert_eq!(*color, iterations_to_color(count_iterations(point)));
        }
        // Row 2 of 4 runs through the real axis; the origin is inside.
        assert_eq!(row[8], BLACK);
        assert!(count_iterations(view.map_pixel_to_plane(8, 2, 16, 4)) > MAX_ITER);
    }

    #[test]
    fn refused_spawn_aborts_the_pass() {
        let view = Viewport::for_raster(20, 40).snapshot();
        let mut buffer = PixelBuffer::new(20, 40).unwrap();
        let mut renderer = FrameRenderer::new(4, ColorScheme::Banded).unwrap();
        renderer.set_fault(Some(Fault::SpawnRefused(2)));
        match renderer.render(&view, &mut buffer) {
            Err(Error::WorkerSpawn { worker, .. }) => assert_eq!(worker, 2),
            other => panic!("expected a spawn failure, got {:?}", other),
        }
        // No row is ever written twice, even on the way out.
        assert!(buffer.rows_written().iter().all(|&n| n <= 1));
    }

    #[test]
    fn refusing_the_first_worker_writes_nothing() {
        let view = Viewport::for_raster(8, 8).snapshot();
        let mut buffer = PixelBuffer::new(8, 8).unwrap();
        let mut renderer = FrameRenderer::new(3, ColorScheme::Banded).unwrap();
        renderer.set_fault(Some(Fault::SpawnRefused(0)));
        assert!(renderer.render(&view, &mut buffer).is_err());
        assert!(buffer.rows_written().iter().all(|&n| n == 0));
    }

    #[test]
    fn panicking_worker_fails_the_pass() {
        let view = Viewport::for_raster(16, 16).snapshot();
        let mut buffer = PixelBuffer::new(16, 16).unwrap();
        let mut renderer = FrameRenderer::new(3, ColorScheme::Banded).unwrap();
        renderer.set_fault(Some(Fault::Panics(1)));
        match renderer.render(&view, &mut buffer) {
            Err(Error::WorkerPanicked) => {}
            other => panic!("expected a worker panic, got {:?}", other),
        }
        // The surviving workers still drained the counter.
        assert!(buffer.is_complete());
    }
}
