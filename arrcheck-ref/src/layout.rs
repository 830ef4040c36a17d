use std::iter::{repeat, zip};

use arrcheck::Shape;
use smallvec::SmallVec;

pub type Strides = SmallVec<[usize; 4]>;

/// Maps logical indices of an array to offsets in its element buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
}

impl Layout {
    /// Create a row-major layout for `shape`.
    pub fn contiguous(shape: &[usize]) -> Layout {
        let mut strides = Strides::from_elem(0, shape.len());
        let mut stride = 1;
        for (dim, &size) in shape.iter().enumerate().rev() {
            strides[dim] = stride;
            stride *= size;
        }
        Layout {
            shape: Shape::from_slice(shape),
            strides,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return true if the layout is row-major without broadcast dimensions.
    pub fn is_contiguous(&self) -> bool {
        *self == Layout::contiguous(&self.shape)
    }

    /// Return the buffer offset of `index`, or `None` if it has the wrong
    /// length or is out of bounds.
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.ndim() {
            return None;
        }
        let mut offset = 0;
        for ((&i, &size), &stride) in zip(zip(index, &self.shape), &self.strides) {
            if i >= size {
                return None;
            }
            offset += i * stride;
        }
        Some(offset)
    }

    /// Return true if this layout can be broadcast to `target_shape`.
    pub fn can_broadcast_to(&self, target_shape: &[usize]) -> bool {
        if self.shape.as_slice() == target_shape {
            return true;
        } else if self.ndim() > target_shape.len() {
            return false;
        }

        // Compare trailing dimensions. Missing leading dimensions act as 1.
        let target_dims = target_shape[target_shape.len() - self.ndim()..].iter();
        zip(self.shape.iter(), target_dims).all(|(&a, &b)| a == b || a == 1)
    }

    /// Broadcast this layout to `to_shape`. Broadcast dimensions get a stride
    /// of zero so that every index along them maps to the same element.
    pub fn broadcast(&self, to_shape: &[usize]) -> Option<Layout> {
        if !self.can_broadcast_to(to_shape) {
            return None;
        }
        let pad = to_shape.len() - self.ndim();
        let strides = repeat(0)
            .take(pad)
            .chain(
                zip(&self.shape, &self.strides)
                    .enumerate()
                    .map(|(i, (&size, &stride))| {
                        if size == 1 && to_shape[i + pad] != 1 {
                            0
                        } else {
                            stride
                        }
                    }),
            )
            .collect();
        Some(Layout {
            shape: Shape::from_slice(to_shape),
            strides,
        })
    }
}
