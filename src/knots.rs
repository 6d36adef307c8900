//! The ordered table of (x, y) samples a spline is fitted through.
//!
//! A [`KnotTable`] is the unfitted half of the spline state machine: it can be
//! edited freely without paying for a re-fit, and turned into a [`Spline`]
//! with [`KnotTable::fit`]. Its x values are kept non-decreasing; edits that
//! would break that ordering are refused with [`SplineError::Unordered`].
use alloc::vec::Vec;

use log::debug;
use num_traits::Float;

use crate::spline::{Spline, Tolerances};
use crate::SplineError;

/// Where an observation point falls relative to the knots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Location {
    /// Strictly below the first knot
    OutsideLow,
    /// Strictly above the last knot
    OutsideHigh,
    /// Within the endpoint tolerance of the first knot
    AtFirst,
    /// Within the endpoint tolerance of the last knot
    AtLast,
    /// Inside the interval starting at this knot index
    Inside(usize),
}

/// Extent of the knot table.
///
/// A spline is a function of one variable, so the y and z extents are always zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox<T> {
    pub min_x: T,
    pub max_x: T,
}

impl<T: Float> BoundingBox<T> {
    fn of(x: &[T]) -> Self {
        match (x.first(), x.last()) {
            (Some(&lo), Some(&hi)) => Self {
                min_x: lo,
                max_x: hi,
            },
            _ => Self {
                min_x: T::nan(),
                max_x: T::nan(),
            },
        }
    }

    pub fn min_y(&self) -> T {
        T::zero()
    }

    pub fn max_y(&self) -> T {
        T::zero()
    }

    pub fn min_z(&self) -> T {
        T::zero()
    }

    pub fn max_z(&self) -> T {
        T::zero()
    }
}

/// Ordered sample pairs, stored as parallel x and y columns.
#[derive(Clone, Debug, PartialEq)]
pub struct KnotTable<T> {
    x: Vec<T>,
    y: Vec<T>,
    bounds: BoundingBox<T>,
}

impl<T: Float> Default for KnotTable<T> {
    fn default() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            bounds: BoundingBox::of(&[]),
        }
    }
}

impl<T: Float> KnotTable<T> {
    /// Build a table from parallel columns.
    ///
    /// The table may hold any number of knots; the two-knot minimum is
    /// checked when fitting.
    ///
    /// # Errors
    /// * If `x` and `y` differ in length
    /// * If `x` is not non-decreasing
    pub fn new(x: Vec<T>, y: Vec<T>) -> Result<Self, SplineError> {
        if x.len() != y.len() {
            return Err(SplineError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        // Comparing with `<` lets NaN through, so test the negation of `>=`
        if let Some(i) = x.windows(2).position(|w| !(w[1] >= w[0])) {
            return Err(SplineError::Unordered(i + 1));
        }

        let bounds = BoundingBox::of(&x);
        Ok(Self { x, y, bounds })
    }

    /// Build a table from (x, y) pairs, in order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, SplineError>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let (x, y) = pairs.into_iter().unzip();
        Self::new(x, y)
    }

    /// Fit a spline through these knots using the default tolerances.
    pub fn fit(self) -> Result<Spline<T>, SplineError> {
        Spline::from_knots(self, Tolerances::default())
    }

    /// Fit a spline through these knots.
    ///
    /// # Errors
    /// * If there are fewer than 2 knots
    pub fn fit_with(self, tolerances: Tolerances<T>) -> Result<Spline<T>, SplineError> {
        Spline::from_knots(self, tolerances)
    }

    pub fn size(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x_at(&self, i: usize) -> Option<T> {
        self.x.get(i).copied()
    }

    pub fn y_at(&self, i: usize) -> Option<T> {
        self.y.get(i).copied()
    }

    pub fn all_x(&self) -> &[T] {
        &self.x
    }

    pub fn all_y(&self) -> &[T] {
        &self.y
    }

    pub fn bounds(&self) -> BoundingBox<T> {
        self.bounds
    }

    /// First x value, or NaN for an empty table.
    pub fn min_x(&self) -> T {
        self.bounds.min_x
    }

    /// Last x value, or NaN for an empty table.
    pub fn max_x(&self) -> T {
        self.bounds.max_x
    }

    /// Add a knot after the last one.
    ///
    /// # Errors
    /// * If `x` is below the current last x value
    pub fn append(&mut self, x: T, y: T) -> Result<(), SplineError> {
        self.insert_at(self.x.len(), x, y)
    }

    /// Add a knot at `index`, shifting later knots up by one.
    ///
    /// # Errors
    /// * If `index` is past the end of the table
    /// * If `x` does not fit between its new neighbors
    pub fn insert_at(&mut self, index: usize, x: T, y: T) -> Result<(), SplineError> {
        let size = self.x.len();
        if index > size {
            return Err(SplineError::IndexOutOfBounds { index, size });
        }
        self.check_order(index, x, index.checked_sub(1), Some(index))?;

        self.x.insert(index, x);
        self.y.insert(index, y);
        self.refresh_bounds();
        Ok(())
    }

    /// Add a knot at the position that keeps x ordered and return its index.
    ///
    /// A knot whose x equals existing knots is placed after them. An x that
    /// has no place in the order (NaN) is refused.
    pub fn add_point(&mut self, x: T, y: T) -> Result<usize, SplineError> {
        let index = self.x.partition_point(|&v| v <= x);
        if x.is_nan() {
            debug!("refusing knot insert at index {index}: x is not comparable");
            return Err(SplineError::Unordered(index));
        }
        self.x.insert(index, x);
        self.y.insert(index, y);
        self.refresh_bounds();
        Ok(index)
    }

    /// Two knots at x = 0 and x = 1 carrying the same value.
    pub(crate) fn flat(value: T) -> Self {
        let x = alloc::vec![T::zero(), T::one()];
        let bounds = BoundingBox::of(&x);
        Self {
            x,
            y: alloc::vec![value; 2],
            bounds,
        }
    }

    /// Remove the knot at `index` and return it.
    pub fn delete_at(&mut self, index: usize) -> Result<(T, T), SplineError> {
        let size = self.x.len();
        if index >= size {
            return Err(SplineError::IndexOutOfBounds { index, size });
        }
        let removed = (self.x.remove(index), self.y.remove(index));
        self.refresh_bounds();
        Ok(removed)
    }

    /// Remove several knots at once. Repeated indices are removed once.
    ///
    /// All indices are checked before anything is removed, so on error
    /// the table is unchanged.
    pub fn delete_many(&mut self, indices: &[usize]) -> Result<(), SplineError> {
        let size = self.x.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= size) {
            return Err(SplineError::IndexOutOfBounds { index, size });
        }

        // Remove from the top down so earlier removals don't shift later indices
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for i in sorted {
            self.x.remove(i);
            self.y.remove(i);
        }
        self.refresh_bounds();
        Ok(())
    }

    /// Number of distinct entries in `indices`, all of which must be in bounds.
    pub(crate) fn count_distinct(&self, indices: &[usize]) -> Result<usize, SplineError> {
        let size = self.x.len();
        let mut seen = alloc::vec![false; size];
        let mut count = 0;
        for &index in indices {
            let slot = seen
                .get_mut(index)
                .ok_or(SplineError::IndexOutOfBounds { index, size })?;
            if !*slot {
                *slot = true;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Move the knot at `index` to a new x value.
    ///
    /// # Errors
    /// * If `index` is out of bounds
    /// * If `value` would move the knot past one of its neighbors
    pub fn set_x(&mut self, index: usize, value: T) -> Result<(), SplineError> {
        let size = self.x.len();
        if index >= size {
            return Err(SplineError::IndexOutOfBounds { index, size });
        }
        let next = if index + 1 < size {
            Some(index + 1)
        } else {
            None
        };
        self.check_order(index, value, index.checked_sub(1), next)?;

        self.x[index] = value;
        self.refresh_bounds();
        Ok(())
    }

    pub fn set_y(&mut self, index: usize, value: T) -> Result<(), SplineError> {
        let size = self.y.len();
        let slot = self
            .y
            .get_mut(index)
            .ok_or(SplineError::IndexOutOfBounds { index, size })?;
        *slot = value;
        Ok(())
    }

    /// Multiply every y value by `factor`.
    pub fn scale_y(&mut self, factor: T) {
        self.y.iter_mut().for_each(|y| *y = *y * factor);
    }

    /// Classify an observation point and, if it is inside the table,
    /// find the lower knot of its interval by bisection.
    ///
    /// The out-of-range checks come before the endpoint checks, so a point
    /// a hair outside the table is extrapolated even if it is within
    /// `endpoint_tol` of the boundary knot.
    ///
    /// Assumes at least 2 knots.
    #[inline]
    pub(crate) fn locate(&self, loc: T, endpoint_tol: T) -> Location {
        let n = self.x.len();
        let (first, last) = (self.x[0], self.x[n - 1]);

        if loc < first {
            return Location::OutsideLow;
        }
        if loc > last {
            return Location::OutsideHigh;
        }
        if (loc - first).abs() <= endpoint_tol {
            return Location::AtFirst;
        }
        if (loc - last).abs() <= endpoint_tol {
            return Location::AtLast;
        }

        // Index of the last knot at or below the point, clipped to the last interval
        let k = self
            .x
            .partition_point(|&v| v <= loc)
            .saturating_sub(1)
            .min(n - 2);
        Location::Inside(k)
    }

    fn check_order(
        &self,
        index: usize,
        x: T,
        prev: Option<usize>,
        next: Option<usize>,
    ) -> Result<(), SplineError> {
        let after_prev = prev.map_or(true, |i| x >= self.x[i]);
        let before_next = next
            .filter(|&i| i < self.x.len())
            .map_or(true, |i| x <= self.x[i]);
        if after_prev && before_next {
            Ok(())
        } else {
            debug!("refusing knot edit at index {index}: x would be out of order");
            Err(SplineError::Unordered(index))
        }
    }

    fn refresh_bounds(&mut self) {
        self.bounds = BoundingBox::of(&self.x);
    }
}
