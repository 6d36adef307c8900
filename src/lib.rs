//! Natural cubic spline fitting and evaluation, no-std compatible
//! (with `alloc`), for curves that are fitted rarely and evaluated often.
//!
//! A spline is fitted through a table of knots `(x_i, y_i)` with
//! non-decreasing `x`. Evaluation returns the value or the first or second
//! derivative, optionally chained through an outer variable, and extrapolates
//! linearly outside the knots.
//!
//! # Performance Scalings
//! | Operation          | RAM   | Cost      |
//! |--------------------|-------|-----------|
//! | fit / any edit     | O(n)  | O(n)      |
//! | evaluate           | O(1)  | O(log n)  |
//!
//! Evaluation performs a bisection search for the containing interval and
//! never allocates.
//!
//! # Example
//! ```rust
//! use natspline::{Function1D, KnotTable, Spline};
//!
//! // Fit through parallel columns
//! let x = vec![0.0_f64, 0.5, 1.2, 2.0];
//! let y = vec![1.0_f64, 0.2, -0.3, 0.4];
//! let spline = Spline::new(x, y).unwrap();
//!
//! // Value inside the knots, and linear extrapolation outside them
//! let inside = spline.value(0.8);
//! let outside = spline.value(-1.0);
//!
//! assert!(inside < 0.2 && inside > -0.3);
//! assert_eq!(outside, 1.0 - spline.coefficients().b()[0]);
//!
//! // d²y/dt² for x(t) moving with dx/dt = 2, d²x/dt² = 0.5
//! let ydd = spline.evaluate(0.8, 2.0, 0.5, 2);
//! let expected = 4.0 * spline.derivative(2, 0.8) + 0.5 * spline.derivative(1, 0.8);
//! assert!((ydd - expected).abs() < 1e-12);
//!
//! // Unsupported derivative orders give NaN rather than an error
//! assert!(spline.evaluate(0.8, 1.0, 0.0, 3).is_nan());
//!
//! // Batch edits: take the knots out, edit, and fit once
//! let mut knots: KnotTable<f64> = spline.into_knots();
//! knots.append(3.0, 1.0).unwrap();
//! assert_eq!(knots.add_point(0.25, 0.8), Ok(1));
//! let spline = knots.fit().unwrap();
//! assert_eq!(spline.size(), 6);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
// These "needless" range loops mirror the recurrences they implement
#![allow(clippy::needless_range_loop)]

extern crate alloc;

pub mod error;
mod export;
pub mod knots;
pub mod spline;

#[cfg(feature = "std")]
pub mod utils;

#[cfg(all(test, feature = "std"))]
pub(crate) mod testing;

pub use error::SplineError;
pub use knots::{BoundingBox, KnotTable};
pub use spline::{Coefficients, Function1D, Spline, Tolerances};
