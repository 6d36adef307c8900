//! Coefficient fitting for the natural cubic spline.
//!
//! Each interval is a cubic in `dx = x - x_i`:
//!
//! `y(x) = y_i + dx * (b_i + dx * (c_i + dx * d_i))`
//!
//! The interior knots carry the usual continuity conditions on the first and
//! second derivative, which gives a tridiagonal system in the `c` coefficients.
//! With four or more knots, the end rows match the third derivative of the
//! cubic through the first (and last) four knots, so data sampled from a
//! cubic is reproduced exactly. With three knots the end rows ask for zero
//! third derivative, which makes the fit the parabola through all three.
//! Two knots give a straight line.
//!
//! Every knot spacing is floored at `min_spacing` before it is divided by.
//! That keeps repeated or nearly repeated knots from dividing by zero,
//! at the cost of biasing the fit near them.
//!
//! References
//! * Forsythe, Malcolm & Moler, *Computer Methods for Mathematical Computations*, 1977, ch. 4
//! * https://en.wikipedia.org/wiki/Tridiagonal_matrix_algorithm
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, warn};
use num_traits::Float;

use crate::SplineError;

/// Fitted polynomial coefficients, one entry per knot.
#[derive(Clone, Debug, PartialEq)]
pub struct Coefficients<T> {
    pub(crate) b: Vec<T>,
    pub(crate) c: Vec<T>,
    pub(crate) d: Vec<T>,
}

impl<T> Coefficients<T> {
    /// Linear coefficients (slope at each knot)
    pub fn b(&self) -> &[T] {
        &self.b
    }

    /// Quadratic coefficients (half the second derivative at each knot)
    pub fn c(&self) -> &[T] {
        &self.c
    }

    /// Cubic coefficients
    pub fn d(&self) -> &[T] {
        &self.d
    }

    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }
}

/// Fit the spline coefficients for knots `x`, `y`.
///
/// The sequence of floating point operations is fixed; changing it changes
/// results in the last bits.
///
/// # Errors
/// * If `x` and `y` differ in length
/// * If there are fewer than 2 knots
pub fn natural_cubic<T: Float>(
    x: &[T],
    y: &[T],
    min_spacing: T,
) -> Result<Coefficients<T>, SplineError> {
    let n = x.len();
    if y.len() != n {
        return Err(SplineError::LengthMismatch { x: n, y: y.len() });
    }
    if n < 2 {
        return Err(SplineError::TooFewKnots(n));
    }
    debug!("fitting natural cubic spline through {n} knots");

    let two = T::one() + T::one();
    let three = two + T::one();

    // Distance from knot `lo` up to knot `hi`, floored
    let spacing = |hi: usize, lo: usize| {
        let h = x[hi] - x[lo];
        if h < min_spacing {
            warn!("spacing between knots {lo} and {hi} is below the floor and was clamped");
        }
        min_spacing.max(h)
    };

    let mut b = vec![T::zero(); n];
    let mut c = vec![T::zero(); n];
    let mut d = vec![T::zero(); n];

    if n == 2 {
        let slope = (y[1] - y[0]) / spacing(1, 0);
        b[0] = slope;
        b[1] = slope;
        return Ok(Coefficients { b, c, d });
    }

    let nm1 = n - 1;
    let nm2 = n - 2;

    // Tridiagonal system: `b` is the diagonal, `d` the off-diagonal, `c` the right-hand side.
    // The divided differences are written one slot ahead and then differenced in place.
    d[0] = spacing(1, 0);
    c[1] = (y[1] - y[0]) / d[0];
    for i in 1..nm1 {
        d[i] = spacing(i + 1, i);
        b[i] = two * (d[i - 1] + d[i]);
        c[i + 1] = (y[i + 1] - y[i]) / d[i];
        c[i] = c[i + 1] - c[i];
    }

    // End rows
    b[0] = -d[0];
    b[nm1] = -d[nm2];
    c[0] = T::zero();
    c[nm1] = T::zero();

    if n > 3 {
        let d31 = spacing(3, 1);
        let d20 = spacing(2, 0);
        let d1 = spacing(nm1, n - 3);
        let d2 = spacing(nm2, n - 4);
        let d30 = spacing(3, 0);
        let d3 = spacing(nm1, n - 4);
        c[0] = c[2] / d31 - c[1] / d20;
        c[nm1] = c[nm2] / d1 - c[n - 3] / d2;
        c[0] = c[0] * d[0] * d[0] / d30;
        c[nm1] = -c[nm1] * d[nm2] * d[nm2] / d3;
    }

    // Forward elimination
    for i in 1..n {
        let t = d[i - 1] / b[i - 1];
        b[i] = b[i] - t * d[i - 1];
        c[i] = c[i] - t * c[i - 1];
    }

    // Back substitution
    c[nm1] = c[nm1] / b[nm1];
    for i in (0..nm1).rev() {
        c[i] = (c[i] - d[i] * c[i + 1]) / b[i];
    }

    // Polynomial coefficients. The last knot borrows its cubic term
    // from the last interval.
    b[nm1] = (y[nm1] - y[nm2]) / d[nm2] + d[nm2] * (c[nm2] + two * c[nm1]);
    for i in 0..nm1 {
        b[i] = (y[i + 1] - y[i]) / d[i] - d[i] * (c[i + 1] + two * c[i]);
        d[i] = (c[i + 1] - c[i]) / d[i];
        c[i] = c[i] * three;
    }
    c[nm1] = c[nm1] * three;
    d[nm1] = d[nm2];

    Ok(Coefficients { b, c, d })
}
