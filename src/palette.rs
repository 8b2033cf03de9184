// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns iteration counts into colors.  The canonical scheme cuts the
//! range `[0, MAX_ITER)` into five equal bands, each with a fixed
//! color; it is deliberately coarse.  An older smooth gradient is
//! kept as an alternate scheme.

use std::fmt;
use std::str::FromStr;

use escape::MAX_ITER;

/// An 8-bit-per-channel RGB triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Builds a color out of its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
}

/// Points considered inside the set.
pub const BLACK: Color = Color::new(0, 0, 0);

/// The bands, lowest iteration counts first.
pub const PALETTE: [Color; 5] = [
    Color::new(255, 0, 0),     // red
    Color::new(255, 255, 0),   // yellow
    Color::new(0, 255, 0),     // green
    Color::new(64, 224, 208),  // turquoise
    Color::new(255, 0, 255),   // magenta
];

/// The banded palette.  Anything at or past `MAX_ITER` is black; we
/// don't spend any visual distinction on points that are certainly
/// (or very probably) inside.  Otherwise the first band whose upper
/// threshold is strictly greater than `count` wins.
pub fn iterations_to_color(count: usize) -> Color {
    if count >= MAX_ITER {
        return BLACK;
    }
    let bands = PALETTE.len() as f64;
    PALETTE
        .iter()
        .enumerate()
        .find(|&(i, _)| (count as f64) < (i + 1) as f64 / bands * MAX_ITER as f64)
        .map(|(_, color)| *color)
        .unwrap_or(BLACK)
}

/// The legacy gradient: red and green ramp up together along a fifth
/// root of the normalized count, blue is pinned at full.
pub fn iterations_to_gradient(count: usize) -> Color {
    if count >= MAX_ITER {
        return BLACK;
    }
    let multiplier = (count as f32 / MAX_ITER as f32).powf(1.0 / 5.0);
    let rg = (255.0 * multiplier) as u8;
    Color::new(rg, rg, 255)
}

/// Which of the two coloring schemes to paint a frame with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    /// Five fixed bands; the reference look.
    Banded,
    /// Smooth blue-white ramp.
    Gradient,
}

impl ColorScheme {
    /// Colors a single iteration count.
    #[inline]
    pub fn color(self, count: usize) -> Color {
        match self {
            ColorScheme::Banded => iterations_to_color(count),
            ColorScheme::Gradient => iterations_to_gradient(count),
        }
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "banded" => Ok(ColorScheme::Banded),
            "gradient" => Ok(ColorScheme::Gradient),
            _ => Err(format!("Unknown color scheme '{}'", s)),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ColorScheme::Banded => write!(f, "banded"),
            ColorScheme::Gradient => write!(f, "gradient"),
        }
    }
}
