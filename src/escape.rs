// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.  Takes a point on the complex plane and
//! counts how many rounds of `z = z * z + c` it survives before it
//! wanders outside the circle of radius two.

use num::Complex;

/// The most iterations we will spend on any one point.  Shared with
/// the palette, which treats anything at or past this as "inside."
pub const MAX_ITER: usize = 128;

/// Returns the 1-based iteration at which `c` was seen to escape.
/// The orbit starts at `z = c` and is tested before each step, so
/// anything already outside the radius-two circle escapes at 1.
///
/// Points that never escape return `MAX_ITER + 1`, one past the loop
/// bound.  The palette's `count >= MAX_ITER` test relies on that.
///
/// We compare the squared norm against 4.0 rather than taking a
/// square root and comparing against 2.0; same answer, less work.
pub fn count_iterations(c: Complex<f64>) -> usize {
    let mut z = c;
    for i in 1..=MAX_ITER {
        if z.norm_sqr() > 4.0 {
            return i;
        }
        z = z * z + c;
    }
    MAX_ITER + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_outside_radius_two_escape_immediately() {
        assert_eq!(count_iterations(Complex::new(2.5, 0.0)), 1);
        assert_eq!(count_iterations(Complex::new(0.0, -3.0)), 1);
        assert_eq!(count_iterations(Complex::new(-1.5, 1.5)), 1);
    }

    #[test]
    fn origin_never_escapes() {
        assert_eq!(count_iterations(Complex::new(0.0, 0.0)), MAX_ITER + 1);
    }

    #[test]
    fn periodic_orbits_never_escape() {
        // -1 bounces between -1 and 0 forever.
        assert_eq!(count_iterations(Complex::new(-1.0, 0.0)), MAX_ITER + 1);
        assert_eq!(count_iterations(Complex::new(-2.0, 0.0)), MAX_ITER + 1);
    }

    #[test]
    fn escape_test_is_strict() {
        // |2|^2 == 4 does not count as escaped; the next step does.
        assert_eq!(count_iterations(Complex::new(2.0, 0.0)), 2);
    }

    #[test]
    fn counts_follow_the_orbit() {
        // 1 -> 2 -> 5
        assert_eq!(count_iterations(Complex::new(1.0, 0.0)), 3);
        // 0.5 -> 0.75 -> 1.0625 -> 1.6289 -> 3.1533
        assert_eq!(count_iterations(Complex::new(0.5, 0.0)), 5);
    }

    #[test]
    fn repeated_calls_agree() {
        let c = Complex::new(-0.7436, 0.1318);
        let first = count_iterations(c);
        for _ in 0..10 {
            assert_eq!(count_iterations(c), first);
        }
    }
}
