//! Axis normalization.

use std::error::Error;
use std::fmt;

use smallvec::SmallVec;

/// Sorted set of non-negative axis indices which a reduction is performed over.
pub type AxisSet = SmallVec<[usize; 4]>;

/// Error returned when an axis is out of range for an array's rank, or when
/// a tuple of axes repeats an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisError {
    /// The axis as it was specified, before normalization.
    pub axis: isize,

    /// Rank of the array the axis was applied to.
    pub ndim: usize,
}

impl fmt::Display for AxisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "axis {} is invalid for an array with {} dimensions",
            self.axis, self.ndim
        )
    }
}

impl Error for AxisError {}

/// Resolve a single, possibly negative, axis into the range `[0, ndim)`.
///
/// Negative axes count from the end, so `-1` is the last dimension.
pub fn resolve_axis(axis: isize, ndim: usize) -> Result<usize, AxisError> {
    let rank = ndim as isize;
    let resolved = if axis < 0 { rank + axis } else { axis };
    if (0..rank).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(AxisError { axis, ndim })
    }
}

/// Return the axes that a reduction with an `axis` argument reduces over.
///
/// `None` means the reduction is performed over all `ndim` dimensions. For
/// argmax and argmin this corresponds to searching the flattened array.
pub fn normalise_axis(axis: Option<isize>, ndim: usize) -> Result<AxisSet, AxisError> {
    match axis {
        None => Ok((0..ndim).collect()),
        Some(axis) => Ok(SmallVec::from_slice(&[resolve_axis(axis, ndim)?])),
    }
}

/// Variant of [`normalise_axis`] for reductions which accept a tuple of axes.
///
/// The result is sorted. Specifying the same axis twice, including via
/// different negative and positive values, is an error.
pub fn normalise_axes(axes: Option<&[isize]>, ndim: usize) -> Result<AxisSet, AxisError> {
    let Some(axes) = axes else {
        return Ok((0..ndim).collect());
    };

    let mut resolved = AxisSet::with_capacity(axes.len());
    for &axis in axes {
        let index = resolve_axis(axis, ndim)?;
        if resolved.contains(&index) {
            return Err(AxisError { axis, ndim });
        }
        resolved.push(index);
    }
    resolved.sort_unstable();

    Ok(resolved)
}
