//! Plain-text dump of a knot table.
//!
//! ```text
//! begin<label>
//! (x0, y0)
//! (x1, y1)
//! end<label>
//!
//! ```
//!
//! This is a one-way diagnostic format; nothing in this crate reads it back.
use core::fmt::{self, Display, Write};

use num_traits::Float;

use crate::knots::KnotTable;
use crate::spline::Spline;

impl<T: Float + Display> KnotTable<T> {
    /// Write every knot between `begin<label>` and `end<label>` lines.
    pub fn write_block<W: Write>(&self, out: &mut W, label: &str) -> fmt::Result {
        writeln!(out, "begin{label}")?;
        for (x, y) in self.all_x().iter().zip(self.all_y()) {
            writeln!(out, "({x}, {y})")?;
        }
        writeln!(out, "end{label}")?;
        writeln!(out)
    }

    /// Write the knots as a numbered function block, `beginfunction f<index>`.
    pub fn write_function<W: Write>(&self, out: &mut W, index: usize) -> fmt::Result {
        writeln!(out, "beginfunction f{index}")?;
        for (x, y) in self.all_x().iter().zip(self.all_y()) {
            writeln!(out, "({x}, {y})")?;
        }
        writeln!(out, "endfunction")?;
        writeln!(out)
    }
}

impl<T: Float + Display> Spline<T> {
    pub fn write_block<W: Write>(&self, out: &mut W, label: &str) -> fmt::Result {
        self.knots().write_block(out, label)
    }

    pub fn write_function<W: Write>(&self, out: &mut W, index: usize) -> fmt::Result {
        self.knots().write_function(out, index)
    }
}
