//! Convenience methods for moving knot data in and out of flat arrays,
//! and for building evenly spaced observation points.
use itertools::Itertools;
use num_traits::Float;

use crate::knots::KnotTable;
use crate::SplineError;

/// Generates evenly spaced values from start to stop,
/// including the endpoint.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let cast = |i: usize| T::from(i).unwrap_or_else(T::nan);
            let dx = (stop - start) / cast(n - 1);
            (0..n).map(|i| start + cast(i) * dx).collect()
        }
    }
}

/// Split an interleaved array `[x0, y0, x1, y1, ...]` into x and y columns.
///
/// # Errors
/// * If the array has an odd number of entries
pub fn deinterleave<T: Copy>(flat: &[T]) -> Result<(Vec<T>, Vec<T>), SplineError> {
    if flat.len() % 2 != 0 {
        return Err(SplineError::LengthMismatch {
            x: flat.len() / 2 + 1,
            y: flat.len() / 2,
        });
    }
    Ok(flat.iter().copied().tuples::<(T, T)>().unzip())
}

/// Flatten a knot table into `[x0, y0, x1, y1, ...]`.
pub fn interleave<T: Float>(knots: &KnotTable<T>) -> Vec<T> {
    itertools::interleave(knots.all_x(), knots.all_y())
        .copied()
        .collect()
}
