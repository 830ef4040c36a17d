//! Iteration over the N-dimensional indices of an array.

use std::iter::FusedIterator;

use smallvec::{smallvec, SmallVec};

use crate::shape::Shape;

/// An index into an array with a dynamic number of dimensions.
pub type DynIndex = SmallVec<[usize; 5]>;

/// Iterator over all the indices of an array with a given shape, in row-major
/// order (the last dimension varies fastest).
///
/// The number of dimensions may be zero, in which case the iterator will yield
/// a single empty index. This is consistent with `ndindex` in NumPy. If any
/// dimension has size zero, no indices are yielded.
#[derive(Clone, Debug)]
pub struct Indices {
    /// End index (exclusive) along each dimension.
    end: DynIndex,

    next: Option<DynIndex>,

    /// Remaining iteration steps.
    remaining: usize,
}

impl Indices {
    /// Return an iterator over all the indices where each dimension is between
    /// `0` and `shape[dim]`.
    pub fn from_shape(shape: &[usize]) -> Indices {
        let remaining: usize = shape.iter().product();
        Indices {
            end: shape.iter().copied().collect(),
            next: (remaining > 0).then(|| smallvec![0; shape.len()]),
            remaining,
        }
    }
}

impl Iterator for Indices {
    type Item = DynIndex;

    /// Return the next index in the sequence, or `None` after all indices
    /// have been returned.
    fn next(&mut self) -> Option<DynIndex> {
        let current = self.next.take()?;

        let mut next = current.clone();
        let mut has_next = false;
        for (&dim_end, index) in self.end.iter().zip(next.iter_mut()).rev() {
            *index += 1;
            if *index == dim_end {
                *index = 0;
            } else {
                has_next = true;
                break;
            }
        }

        self.next = has_next.then_some(next);
        self.remaining -= 1;

        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Indices {}

impl FusedIterator for Indices {}

/// Return an iterator over the indices of an array with shape `shape`.
///
/// See [`Indices`].
pub fn ndindex(shape: &[usize]) -> Indices {
    Indices::from_shape(shape)
}

/// A restartable sequence of the indices of an array with a given shape.
///
/// Each call to [`iter`](NdIndex::iter) starts a fresh, independent pass over
/// the same indices.
#[derive(Clone, Debug, PartialEq)]
pub struct NdIndex {
    shape: Shape,
}

impl NdIndex {
    pub fn new(shape: &[usize]) -> NdIndex {
        NdIndex {
            shape: Shape::from_slice(shape),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Return the number of indices in the sequence.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> Indices {
        Indices::from_shape(&self.shape)
    }
}

impl<'a> IntoIterator for &'a NdIndex {
    type Item = DynIndex;
    type IntoIter = Indices;

    fn into_iter(self) -> Indices {
        self.iter()
    }
}

/// Iterator returned by [`axes_ndindex`].
#[derive(Clone, Debug)]
pub struct AxesIndices {
    /// Shape whose indices enumerate the coordinates of non-reduced
    /// dimensions. Reduced dimensions have size 1.
    base: Indices,

    /// Shape whose indices enumerate the coordinates of reduced dimensions.
    /// Non-reduced dimensions have size 1.
    group_shape: DynIndex,
}

impl Iterator for AxesIndices {
    type Item = Vec<DynIndex>;

    fn next(&mut self) -> Option<Vec<DynIndex>> {
        let base = self.base.next()?;
        let group = Indices::from_shape(&self.group_shape)
            .map(|mut offset| {
                // One of `base[i]` and `offset[i]` is always zero.
                for (index, &base_index) in offset.iter_mut().zip(base.iter()) {
                    *index += base_index;
                }
                offset
            })
            .collect();
        Some(group)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.base.size_hint()
    }
}

impl ExactSizeIterator for AxesIndices {}

impl FusedIterator for AxesIndices {}

/// Partition the indices of an array with shape `shape` into groups that are
/// reduced together by a reduction over `axes`.
///
/// Two indices are in the same group if they agree on every dimension not in
/// `axes`. Groups are yielded in row-major order of the non-reduced
/// coordinates, which matches the order that [`ndindex`] visits the output of
/// the reduction, with or without `keepdims`. Within a group, indices are in
/// row-major order of the reduced coordinates.
pub fn axes_ndindex(shape: &[usize], axes: &[usize]) -> AxesIndices {
    let mut base_shape = DynIndex::with_capacity(shape.len());
    let mut group_shape = DynIndex::with_capacity(shape.len());
    for (axis, &side) in shape.iter().enumerate() {
        if axes.contains(&axis) {
            base_shape.push(1);
            group_shape.push(side);
        } else {
            base_shape.push(side);
            group_shape.push(1);
        }
    }
    AxesIndices {
        base: Indices::from_shape(&base_shape),
        group_shape,
    }
}
