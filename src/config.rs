// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Startup configuration, plus the little string parsers the command
//! line front end uses to fill it in.

use std::str::FromStr;

use num::Complex;
use num_cpus;

use error::{Error, Result};
use palette::ColorScheme;

/// Everything fixed for the life of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Output raster width in pixels
    pub width: u32,
    /// Output raster height in pixels
    pub height: u32,
    /// Worker threads per compute pass
    pub workers: usize,
    /// Palette to paint frames with
    pub scheme: ColorScheme,
    /// Initial center of the viewport
    pub center: Complex<f64>,
    /// Initial zoom level
    pub zoom_level: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 1920,
            height: 1080,
            workers: num_cpus::get().max(1),
            scheme: ColorScheme::Banded,
            center: Complex::new(0.0, 0.0),
            zoom_level: 0,
        }
    }
}

impl Config {
    /// Height over width of the output raster.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width)
    }

    /// Catches the mistakes that would otherwise surface halfway
    /// through the first pass.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.workers == 0 {
            return Err(Error::NoWorkers);
        }
        Ok(())
    }
}

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}
