//! Point evaluation of a fitted spline, with chain-rule derivatives.
//!
//! The query point is treated as a function of some outer variable `t`, with
//! `velocity = dx/dt` and `acceleration = d²x/dt²`. Derivatives are taken with
//! respect to `t`:
//!
//! * order 1: `y'(x) * velocity`
//! * order 2: `y'(x) * acceleration + y''(x) * velocity²`
//!
//! Passing `velocity = 1, acceleration = 0` gives the plain derivatives in `x`.
//!
//! Outside the knots the spline continues as a straight line with the slope
//! of the boundary knot, so the second derivative there has no curvature
//! term. Within the endpoint tolerance of a boundary knot the curvature term
//! of that knot is included. The second derivative therefore jumps exactly at
//! the boundary knots.
use num_traits::Float;

use super::solve::Coefficients;
use crate::knots::{KnotTable, Location};

/// Supported derivative orders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Order {
    Value,
    First,
    Second,
}

impl Order {
    /// Negative orders and orders above 2 are not supported.
    #[inline]
    pub(crate) fn from_i32(order: i32) -> Option<Self> {
        match order {
            0 => Some(Self::Value),
            1 => Some(Self::First),
            2 => Some(Self::Second),
            _ => None,
        }
    }
}

/// Evaluate the spline or one of its derivatives, returning NaN on a domain error.
///
/// O(log n) in the number of knots, with no allocation.
#[inline]
pub(crate) fn evaluate<T: Float>(
    knots: &KnotTable<T>,
    coefs: &Coefficients<T>,
    endpoint_tol: T,
    x: T,
    velocity: T,
    acceleration: T,
    order: i32,
) -> T {
    let n = knots.size();
    // Coefficients that don't line up with the knots are an unfitted table
    if n < 2 || coefs.len() != n {
        return T::nan();
    }
    let order = match Order::from_i32(order) {
        Some(order) => order,
        None => return T::nan(),
    };

    let (xs, ys) = (knots.all_x(), knots.all_y());
    let (b, c, d) = (coefs.b(), coefs.c(), coefs.d());
    let two = T::one() + T::one();
    let three = two + T::one();
    let six = three + three;

    match knots.locate(x, endpoint_tol) {
        Location::OutsideLow => extrapolate(xs[0], ys[0], b[0], x, velocity, acceleration, order),
        Location::OutsideHigh => {
            let k = n - 1;
            extrapolate(xs[k], ys[k], b[k], x, velocity, acceleration, order)
        }
        Location::AtFirst => at_knot(ys[0], b[0], c[0], velocity, acceleration, order),
        Location::AtLast => {
            let k = n - 1;
            at_knot(ys[k], b[k], c[k], velocity, acceleration, order)
        }
        Location::Inside(k) => {
            let dx = x - xs[k];
            match order {
                Order::Value => ys[k] + dx * (b[k] + dx * (c[k] + dx * d[k])),
                Order::First => (b[k] + dx * (two * c[k] + three * dx * d[k])) * velocity,
                Order::Second => {
                    (b[k] + dx * (two * c[k] + three * dx * d[k])) * acceleration
                        + (two * c[k] + six * dx * d[k]) * velocity * velocity
                }
            }
        }
    }
}

/// Straight-line continuation from a boundary knot
#[inline]
fn extrapolate<T: Float>(
    x0: T,
    y0: T,
    slope: T,
    x: T,
    velocity: T,
    acceleration: T,
    order: Order,
) -> T {
    match order {
        Order::Value => y0 + (x - x0) * slope,
        Order::First => slope * velocity,
        Order::Second => slope * acceleration,
    }
}

/// Closed form at a boundary knot, including its curvature
#[inline]
fn at_knot<T: Float>(y0: T, slope: T, c0: T, velocity: T, acceleration: T, order: Order) -> T {
    let two = T::one() + T::one();
    match order {
        Order::Value => y0,
        Order::First => slope * velocity,
        Order::Second => slope * acceleration + two * c0 * velocity * velocity,
    }
}
