//! Shape broadcasting.

use std::error::Error;
use std::fmt;

use smallvec::SmallVec;

/// Shape of an array. An empty shape denotes a 0-dimensional array.
pub type Shape = SmallVec<[usize; 4]>;

/// Error returned when a set of shapes cannot be broadcast together.
#[derive(Clone, Debug, PartialEq)]
pub struct BroadcastError {
    /// The shapes which were being broadcast.
    pub shapes: Vec<Shape>,
}

impl fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shapes ")?;
        for (i, shape) in self.shapes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", shape.as_slice())?;
        }
        write!(f, " are not broadcast-compatible")
    }
}

impl Error for BroadcastError {}

/// Return the shape `a` and `b` broadcast to, or `None` if they are not
/// broadcast-compatible.
///
/// The checks compare this against the output shape a namespace reports for
/// `where`. Dimensions are aligned from the right, with missing leading
/// dimensions treated as size 1. Two sizes are compatible if they are equal
/// or one of them is 1.
pub fn broadcast_pair(a: &[usize], b: &[usize]) -> Option<Shape> {
    // Size of the `i`th dimension of `shape`, counting from the right.
    let size_from_right = |shape: &[usize], i: usize| {
        shape.len().checked_sub(i + 1).map_or(1, |pos| shape[pos])
    };
    (0..a.len().max(b.len()))
        .rev()
        .map(|i| match (size_from_right(a, i), size_from_right(b, i)) {
            (x, y) if x == y => Some(x),
            (1, y) => Some(y),
            (x, 1) => Some(x),
            _ => None,
        })
        .collect()
}

/// Return the shape that results from broadcasting all of `shapes` together.
///
/// Broadcasting no shapes gives the 0-d shape `[]`.
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Shape, BroadcastError> {
    let mut result = Shape::new();
    for shape in shapes {
        result = broadcast_pair(&result, shape).ok_or_else(|| BroadcastError {
            shapes: shapes.iter().map(|s| Shape::from_slice(s)).collect(),
        })?;
    }
    Ok(result)
}

/// Return the shape that results from reducing `shape` over `axes`.
///
/// If `keepdims` is true the reduced dimensions are kept with size 1,
/// otherwise they are removed.
pub fn reduced_shape(shape: &[usize], axes: &[usize], keepdims: bool) -> Shape {
    shape
        .iter()
        .enumerate()
        .filter_map(|(axis, &side)| match (axes.contains(&axis), keepdims) {
            (true, true) => Some(1),
            (true, false) => None,
            (false, _) => Some(side),
        })
        .collect()
}
