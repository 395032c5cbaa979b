//! Easing curve library.
//!
//! Every curve is a pure function `(elapsed, start, delta, duration) ->
//! value`: at `elapsed == 0` it returns `start`, at `elapsed == duration` it
//! returns `start + delta`. The scheduler treats curves as opaque lookups.

use std::f64::consts::{FRAC_PI_2, PI};

/// `(elapsed, start, delta, duration) -> value`.
pub type EasingFn = fn(f64, f64, f64, f64) -> f64;

pub fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * t / d + b
}

pub fn quad_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t + b
}

pub fn quad_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

pub fn quad_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        c / 2.0 * t * t + b
    } else {
        let t = t - 1.0;
        -c / 2.0 * (t * (t - 2.0) - 1.0) + b
    }
}

pub fn cubic_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t * t + b
}

pub fn cubic_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t * t + 1.0) + b
}

pub fn sine_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c * (t / d * FRAC_PI_2).cos() + c + b
}

pub fn sine_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * (t / d * FRAC_PI_2).sin() + b
}

pub fn sine_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c / 2.0 * ((PI * t / d).cos() - 1.0) + b
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: &[(&str, EasingFn)] = &[
        ("linear", linear),
        ("quad_in", quad_in),
        ("quad_out", quad_out),
        ("quad_in_out", quad_in_out),
        ("cubic_in", cubic_in),
        ("cubic_out", cubic_out),
        ("sine_in", sine_in),
        ("sine_out", sine_out),
        ("sine_in_out", sine_in_out),
    ];

    #[test]
    fn curves_hit_both_endpoints() {
        for (name, f) in CURVES {
            let at_start = f(0.0, 200.0, -150.0, 1000.0);
            let at_end = f(1000.0, 200.0, -150.0, 1000.0);
            assert!((at_start - 200.0).abs() < 1e-9, "{name} start: {at_start}");
            assert!((at_end - 50.0).abs() < 1e-9, "{name} end: {at_end}");
        }
    }

    #[test]
    fn linear_is_proportional() {
        assert_eq!(linear(500.0, 200.0, -150.0, 1000.0), 125.0);
        assert_eq!(linear(250.0, 0.0, 100.0, 1000.0), 25.0);
    }
}
