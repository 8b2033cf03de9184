#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot explorer engine
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring and adding `c` never runs off to
//! infinity.  Points outside the set do run off, some immediately and
//! some only after many rounds, and the number of rounds a point
//! survives is what gets turned into a color.
//!
//! This crate is the compute side of an interactive, zoomable viewer.
//! A front end owns the window and the input; it tells an `Explorer`
//! where the user clicked, asks it for a frame, and draws the pixels
//! it gets back.  Frames are computed by a pool of threads that pull
//! rows off a shared counter, so the rows near the set's boundary,
//! which are by far the most expensive, get spread across every core.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod buffer;
pub mod config;
pub mod error;
pub mod escape;
pub mod explorer;
pub mod palette;
pub mod render;
pub mod viewport;

pub use buffer::{Pixel, PixelBuffer};
pub use config::Config;
pub use error::{Error, Result};
pub use escape::{count_iterations, MAX_ITER};
pub use explorer::Explorer;
pub use palette::{iterations_to_color, Color, ColorScheme};
pub use render::{FrameRenderer, FrameStats};
pub use viewport::{Viewport, ViewportSnapshot};
