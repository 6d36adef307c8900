//! A fitted natural cubic spline.
//!
//! [`Spline`] is the fitted half of the spline state machine. It always holds
//! coefficients that match its knots: every edit made through it re-fits
//! before returning. To make many edits for the price of one fit, take the
//! knots out with [`Spline::into_knots`], edit the [`KnotTable`], and fit again.
//!
//! ```rust
//! use natspline::Spline;
//!
//! let mut spline = Spline::new(vec![0.0_f64, 1.0, 2.0, 3.0], vec![0.0, 1.0, 0.0, 1.0]).unwrap();
//!
//! // Value, then first and second derivative with respect to x
//! let y = spline.evaluate(1.5, 1.0, 0.0, 0);
//! let _dy = spline.evaluate(1.5, 1.0, 0.0, 1);
//! let _ddy = spline.evaluate(1.5, 1.0, 0.0, 2);
//!
//! // Edits re-fit right away
//! spline.scale_y(2.0).unwrap();
//! assert!((spline.evaluate(1.5, 1.0, 0.0, 0) - 2.0 * y).abs() < 1e-12);
//! ```
mod eval;
pub mod solve;

use alloc::vec;
use alloc::vec::Vec;

use log::debug;
use num_traits::{Float, NumCast};

use crate::knots::{BoundingBox, KnotTable};
use crate::SplineError;
pub use solve::Coefficients;

/// Numerical tolerances used when fitting and evaluating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances<T> {
    /// Floor applied to every knot spacing before it is divided by
    pub min_spacing: T,

    /// Distance within which a query point counts as sitting on a boundary knot
    pub endpoint: T,
}

impl<T: Float> Tolerances<T> {
    /// Default spacing floor
    pub const MIN_SPACING: f64 = 1e-7;

    /// Default endpoint tolerance
    pub const ENDPOINT: f64 = 2e-13;

    /// # Errors
    /// * If either tolerance is not positive and finite
    pub fn new(min_spacing: T, endpoint: T) -> Result<Self, SplineError> {
        let valid = |v: T| v.is_finite() && v > T::zero();
        if !(valid(min_spacing) && valid(endpoint)) {
            return Err(SplineError::InvalidTolerance);
        }
        Ok(Self {
            min_spacing,
            endpoint,
        })
    }

    /// Convert tolerances given in f64 to the spline's number type.
    pub fn from_f64(min_spacing: f64, endpoint: f64) -> Result<Self, SplineError> {
        let min_spacing = <T as NumCast>::from(min_spacing).ok_or(SplineError::Unrepresentable)?;
        let endpoint = <T as NumCast>::from(endpoint).ok_or(SplineError::Unrepresentable)?;
        Self::new(min_spacing, endpoint)
    }
}

impl<T: Float> Default for Tolerances<T> {
    fn default() -> Self {
        // Both constants are representable in any float type; fall back to
        // machine epsilon for exotic ones rather than failing.
        let cast = |v: f64| <T as NumCast>::from(v).unwrap_or_else(T::epsilon);
        Self {
            min_spacing: cast(Self::MIN_SPACING),
            endpoint: cast(Self::ENDPOINT),
        }
    }
}

/// A function of one variable with up to two derivatives.
pub trait Function1D<T: Float> {
    /// Number of independent variables
    fn argument_size(&self) -> usize {
        1
    }

    /// Highest derivative order that evaluates to a number
    fn max_derivative_order(&self) -> usize {
        2
    }

    fn value(&self, x: T) -> T;

    /// Derivative of the given order with respect to `x`, or NaN if the
    /// order is not supported.
    fn derivative(&self, order: usize, x: T) -> T;

    /// Evaluate the function at a set of observation points.
    ///
    /// It is highly recommended to inline implementations of this function.
    #[inline]
    fn eval(&self, locs: &[T], out: &mut [T]) -> Result<(), SplineError> {
        if locs.len() != out.len() {
            return Err(SplineError::LengthMismatch {
                x: locs.len(),
                y: out.len(),
            });
        }
        for (o, &x) in out.iter_mut().zip(locs) {
            *o = self.value(x);
        }
        Ok(())
    }

    /// Evaluate the function at a set of observation points, allocating
    /// for the output values for convenience.
    #[cfg(feature = "std")]
    #[inline]
    fn eval_alloc(&self, locs: &[T]) -> Vec<T> {
        locs.iter().map(|&x| self.value(x)).collect()
    }
}

/// Natural cubic spline through a table of knots.
///
/// Evaluation is a read over immutable state and can be shared between
/// readers; edits take `&mut self`.
#[derive(Clone, Debug, PartialEq)]
pub struct Spline<T> {
    knots: KnotTable<T>,
    coefs: Coefficients<T>,
    tolerances: Tolerances<T>,
}

impl<T: Float> Spline<T> {
    /// Fit a spline through knots given as parallel columns.
    ///
    /// # Errors
    /// * If `x` and `y` differ in length
    /// * If there are fewer than 2 knots
    /// * If `x` is not non-decreasing
    pub fn new(x: Vec<T>, y: Vec<T>) -> Result<Self, SplineError> {
        KnotTable::new(x, y)?.fit()
    }

    /// Same as [`Spline::new`], with explicit tolerances.
    pub fn with_tolerances(
        x: Vec<T>,
        y: Vec<T>,
        tolerances: Tolerances<T>,
    ) -> Result<Self, SplineError> {
        KnotTable::new(x, y)?.fit_with(tolerances)
    }

    /// Fit a spline through (x, y) pairs, in order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, SplineError>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        KnotTable::from_pairs(pairs)?.fit()
    }

    /// A flat spline with knots at x = 0 and x = 1.
    pub fn constant(value: T) -> Self {
        let knots = KnotTable::flat(value);
        let coefs = Coefficients {
            b: vec![T::zero(); 2],
            c: vec![T::zero(); 2],
            d: vec![T::zero(); 2],
        };
        Self {
            knots,
            coefs,
            tolerances: Tolerances::default(),
        }
    }

    pub(crate) fn from_knots(
        knots: KnotTable<T>,
        tolerances: Tolerances<T>,
    ) -> Result<Self, SplineError> {
        let coefs = solve::natural_cubic(knots.all_x(), knots.all_y(), tolerances.min_spacing)?;
        Ok(Self {
            knots,
            coefs,
            tolerances,
        })
    }

    /// Give up the fit and return the knots for editing.
    pub fn into_knots(self) -> KnotTable<T> {
        self.knots
    }

    pub fn knots(&self) -> &KnotTable<T> {
        &self.knots
    }

    pub fn coefficients(&self) -> &Coefficients<T> {
        &self.coefs
    }

    pub fn tolerances(&self) -> Tolerances<T> {
        self.tolerances
    }

    /// Evaluate the spline, or its first or second derivative, at `x`.
    ///
    /// `velocity` and `acceleration` are the first and second derivatives of
    /// `x` with respect to an outer variable; derivatives are returned with
    /// respect to that variable. Use `1.0, 0.0` for plain derivatives in `x`.
    ///
    /// Returns NaN for a negative order or an order above 2.
    #[inline]
    pub fn evaluate(&self, x: T, velocity: T, acceleration: T, deriv_order: i32) -> T {
        eval::evaluate(
            &self.knots,
            &self.coefs,
            self.tolerances.endpoint,
            x,
            velocity,
            acceleration,
            deriv_order,
        )
    }

    pub fn size(&self) -> usize {
        self.knots.size()
    }

    pub fn x_at(&self, i: usize) -> Option<T> {
        self.knots.x_at(i)
    }

    pub fn y_at(&self, i: usize) -> Option<T> {
        self.knots.y_at(i)
    }

    pub fn all_x(&self) -> &[T] {
        self.knots.all_x()
    }

    pub fn all_y(&self) -> &[T] {
        self.knots.all_y()
    }

    pub fn min_x(&self) -> T {
        self.knots.min_x()
    }

    pub fn max_x(&self) -> T {
        self.knots.max_x()
    }

    pub fn bounds(&self) -> BoundingBox<T> {
        self.knots.bounds()
    }

    /// Insert a knot at its sorted position, re-fit, and return its index.
    pub fn add_point(&mut self, x: T, y: T) -> Result<usize, SplineError> {
        let index = self.knots.add_point(x, y)?;
        self.refit()?;
        Ok(index)
    }

    /// Add a knot after the last one and re-fit.
    pub fn append(&mut self, x: T, y: T) -> Result<(), SplineError> {
        self.knots.append(x, y)?;
        self.refit()
    }

    /// Add a knot at `index` and re-fit.
    pub fn insert_at(&mut self, index: usize, x: T, y: T) -> Result<(), SplineError> {
        self.knots.insert_at(index, x, y)?;
        self.refit()
    }

    /// Remove the knot at `index` and re-fit.
    ///
    /// # Errors
    /// * If `index` is out of bounds
    /// * If fewer than 2 knots would remain; the spline is left as it was
    pub fn delete_point(&mut self, index: usize) -> Result<(), SplineError> {
        let size = self.size();
        if index >= size {
            return Err(SplineError::IndexOutOfBounds { index, size });
        }
        self.check_remaining(1)?;
        self.knots.delete_at(index)?;
        self.refit()
    }

    /// Remove several knots and re-fit once.
    ///
    /// # Errors
    /// * If any index is out of bounds
    /// * If fewer than 2 knots would remain; the spline is left as it was
    pub fn delete_points(&mut self, indices: &[usize]) -> Result<(), SplineError> {
        let removing = self.knots.count_distinct(indices)?;
        self.check_remaining(removing)?;
        self.knots.delete_many(indices)?;
        self.refit()
    }

    /// Move a knot to a new x value and re-fit.
    pub fn set_x(&mut self, index: usize, value: T) -> Result<(), SplineError> {
        self.knots.set_x(index, value)?;
        self.refit()
    }

    /// Change a knot's y value and re-fit.
    pub fn set_y(&mut self, index: usize, value: T) -> Result<(), SplineError> {
        self.knots.set_y(index, value)?;
        self.refit()
    }

    /// Multiply every y value by `factor` and re-fit.
    pub fn scale_y(&mut self, factor: T) -> Result<(), SplineError> {
        self.knots.scale_y(factor);
        self.refit()
    }

    fn check_remaining(&self, removing: usize) -> Result<(), SplineError> {
        let remaining = self.size().saturating_sub(removing);
        if remaining < 2 {
            debug!("refusing to delete {removing} knots from a table of {}", self.size());
            return Err(SplineError::TooFewKnots(remaining));
        }
        Ok(())
    }

    fn refit(&mut self) -> Result<(), SplineError> {
        self.coefs = solve::natural_cubic(
            self.knots.all_x(),
            self.knots.all_y(),
            self.tolerances.min_spacing,
        )?;
        Ok(())
    }
}

impl<T: Float> Function1D<T> for Spline<T> {
    #[inline]
    fn value(&self, x: T) -> T {
        self.evaluate(x, T::one(), T::zero(), 0)
    }

    #[inline]
    fn derivative(&self, order: usize, x: T) -> T {
        let order = i32::try_from(order).unwrap_or(i32::MAX);
        self.evaluate(x, T::one(), T::zero(), order)
    }
}

#[cfg(test)]
mod test {
    use super::{Function1D, Spline, Tolerances};
    use crate::testing::*;
    use crate::utils::linspace;
    use crate::{KnotTable, SplineError};

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            Spline::new(vec![0.0], vec![1.0]),
            Err(SplineError::TooFewKnots(1))
        );
        assert_eq!(
            Spline::<f64>::new(vec![], vec![]),
            Err(SplineError::TooFewKnots(0))
        );
        assert_eq!(
            Spline::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0]),
            Err(SplineError::LengthMismatch { x: 3, y: 2 })
        );
        assert_eq!(
            Spline::new(vec![0.0, 2.0, 1.0], vec![1.0, 2.0, 3.0]),
            Err(SplineError::Unordered(2))
        );
    }

    #[test]
    fn test_tolerances() {
        let t = Tolerances::<f64>::default();
        assert_eq!(t.min_spacing, 1e-7);
        assert_eq!(t.endpoint, 2e-13);
        assert_eq!(
            Tolerances::new(0.0, 1e-13),
            Err(SplineError::InvalidTolerance)
        );
        assert_eq!(
            Tolerances::<f64>::from_f64(1e-7, f64::INFINITY),
            Err(SplineError::InvalidTolerance)
        );

        // A wide endpoint tolerance snaps nearby queries onto the first knot
        let tol = Tolerances::new(1e-7, 0.1).unwrap();
        let s = Spline::with_tolerances(vec![0.0, 1.0, 2.0], vec![5.0, 0.0, 1.0], tol).unwrap();
        assert_eq!(s.evaluate(0.05, 1.0, 1.0, 0), 5.0);
    }

    #[test]
    fn test_constant() {
        let s = Spline::constant(3.5_f64);
        assert_eq!(s.size(), 2);
        assert_eq!((s.min_x(), s.max_x()), (0.0, 1.0));
        for x in [-2.0, 0.0, 0.3, 1.0, 4.0] {
            assert_eq!(s.value(x), 3.5);
            assert_eq!(s.derivative(1, x), 0.0);
        }
        // Same coefficients as a real fit
        let fitted = Spline::new(vec![0.0, 1.0], vec![3.5, 3.5]).unwrap();
        assert_eq!(s, fitted);
    }

    #[test]
    fn test_function_trait() {
        let s = Spline::<f64>::from_pairs([(0.0, 0.0), (1.0, 2.0)]).unwrap();
        assert_eq!(s.argument_size(), 1);
        assert_eq!(s.max_derivative_order(), 2);
        assert_eq!(s.value(0.5), 1.0);
        assert_eq!(s.derivative(1, 0.5), 2.0);
        assert_eq!(s.derivative(2, 0.5), 0.0);
        assert!(s.derivative(3, 0.5).is_nan());

        let locs = [0.25, 0.5, 2.0];
        let mut out = [0.0; 3];
        s.eval(&locs, &mut out).unwrap();
        assert_eq!(out, [0.5, 1.0, 4.0]);
        assert_eq!(s.eval_alloc(&locs), out.to_vec());
        assert!(s.eval(&locs, &mut [0.0; 2]).is_err());
    }

    #[test]
    fn test_scale_y_is_linear() {
        let mut rng = rng_fixed_seed();
        let (x, y) = random_knots(&mut rng, 9);
        let mut s = Spline::new(x, y).unwrap();
        let obs = linspace(s.min_x() - 1.0, s.max_x() + 1.0, 97);
        let before = s.eval_alloc(&obs);

        for factor in [2.0, -0.5, 1e3] {
            let mut scaled = s.clone();
            scaled.scale_y(factor).unwrap();
            for (i, &x) in obs.iter().enumerate() {
                let expected = factor * before[i];
                let got = scaled.evaluate(x, 1.0, 1.0, 0);
                assert!((got - expected).abs() <= 1e-9 * expected.abs().max(1.0));
            }
        }

        // Scaling by zero flattens the curve
        s.scale_y(0.0).unwrap();
        assert!(s.eval_alloc(&obs).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_edits_refit() {
        let mut s: Spline<f64> =
            Spline::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 0.0, 1.0]).unwrap();

        assert_eq!(s.add_point(1.5, 4.0), Ok(2));
        assert_eq!(s.size(), 5);
        assert!((s.evaluate(1.5, 1.0, 1.0, 0) - 4.0).abs() < 1e-12);

        s.set_y(2, -4.0).unwrap();
        assert!((s.evaluate(1.5, 1.0, 1.0, 0) + 4.0).abs() < 1e-12);

        s.set_x(4, 5.0).unwrap();
        assert_eq!(s.max_x(), 5.0);
        assert!((s.evaluate(5.0, 1.0, 1.0, 0) - 1.0).abs() < 1e-12);

        s.append(6.0, 2.0).unwrap();
        s.insert_at(0, -1.0, 0.5).unwrap();
        assert_eq!(s.all_x(), &[-1.0, 0.0, 1.0, 1.5, 2.0, 5.0, 6.0]);
        assert_eq!(s.min_x(), -1.0);

        // Every edit leaves the fit matching a fresh one
        let fresh = Spline::new(s.all_x().to_vec(), s.all_y().to_vec()).unwrap();
        assert_eq!(s.coefficients(), fresh.coefficients());

        s.delete_point(0).unwrap();
        s.delete_points(&[0, 5]).unwrap();
        assert_eq!(s.all_x(), &[1.0, 1.5, 2.0, 5.0]);
        assert_eq!((s.min_x(), s.max_x()), (1.0, 5.0));
        let fresh = Spline::new(s.all_x().to_vec(), s.all_y().to_vec()).unwrap();
        assert_eq!(s.coefficients(), fresh.coefficients());
    }

    #[test]
    fn test_failed_edits_leave_spline_alone() {
        let mut s: Spline<f64> = Spline::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap();
        let before = s.clone();

        assert_eq!(s.delete_points(&[0, 1]), Err(SplineError::TooFewKnots(1)));
        assert_eq!(
            s.delete_points(&[0, 3]),
            Err(SplineError::IndexOutOfBounds { index: 3, size: 3 })
        );
        assert_eq!(s.append(1.5, 0.0), Err(SplineError::Unordered(3)));
        assert_eq!(s.set_x(1, 3.0), Err(SplineError::Unordered(1)));
        assert_eq!(s.add_point(f64::NAN, 5.0), Err(SplineError::Unordered(0)));
        assert_eq!(
            s.delete_point(3),
            Err(SplineError::IndexOutOfBounds { index: 3, size: 3 })
        );
        assert_eq!(s, before);

        s.delete_point(1).unwrap();
        assert_eq!(s.delete_point(0), Err(SplineError::TooFewKnots(1)));
        // Repeated indices only count once
        assert_eq!(s.delete_points(&[1, 1]), Err(SplineError::TooFewKnots(1)));
        assert_eq!(s.size(), 2);
    }

    #[test]
    fn test_batch_edit_through_knots() {
        let s: Spline<f64> = Spline::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap();
        let mut knots: KnotTable<f64> = s.into_knots();
        for i in 3..10 {
            knots.append(i as f64, (i % 2) as f64).unwrap();
        }
        let s = knots.fit().unwrap();
        assert_eq!(s.size(), 10);
        for i in 0..10 {
            assert!((s.value(i as f64) - (i % 2) as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_random_tables_interpolate() {
        let mut rng = rng_fixed_seed();
        for n in 2..20 {
            let (x, y) = random_knots(&mut rng, n);
            let s = Spline::new(x.clone(), y.clone()).unwrap();
            for i in 0..n {
                assert!((s.evaluate(x[i], 1.0, 1.0, 0) - y[i]).abs() < 1e-10);
            }
        }
    }
}
