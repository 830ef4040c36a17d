use std::fmt;
use std::sync::Arc;

use arrcheck::index::ndindex;
use arrcheck::shape::BroadcastError;
use arrcheck::{ArrayObject, DType, NamespaceError, Scalar, Shape};

use crate::layout::Layout;
use crate::storage::{Element, Storage};

/// An n-dimensional array in the reference namespace.
///
/// Arrays are immutable. Broadcasting creates a view which shares the element
/// buffer of the source array.
#[derive(Clone)]
pub struct RefArray {
    storage: Arc<Storage>,
    layout: Layout,
}

impl RefArray {
    /// Create an array from a row-major buffer.
    pub fn from_storage(storage: Storage, shape: &[usize]) -> Result<RefArray, NamespaceError> {
        let layout = Layout::contiguous(shape);
        if storage.len() != layout.len() {
            return Err(NamespaceError::DataLengthMismatch {
                expected: layout.len(),
                actual: storage.len(),
            });
        }
        Ok(RefArray {
            storage: Arc::new(storage),
            layout,
        })
    }

    /// Create a 1-D array from a vector.
    pub fn from_vec<T: Element>(data: Vec<T>) -> RefArray {
        let layout = Layout::contiguous(&[data.len()]);
        RefArray {
            storage: Arc::new(T::into_storage(data)),
            layout,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Return a view of this array broadcast to `shape`.
    pub fn broadcast(&self, shape: &[usize]) -> Result<RefArray, NamespaceError> {
        let layout = self.layout.broadcast(shape).ok_or_else(|| {
            NamespaceError::Broadcast(BroadcastError {
                shapes: vec![
                    Shape::from_slice(self.layout.shape()),
                    Shape::from_slice(shape),
                ],
            })
        })?;
        Ok(RefArray {
            storage: self.storage.clone(),
            layout,
        })
    }

    /// Return the elements in row-major order, if the array has element type
    /// `T`.
    pub fn to_vec<T: Element>(&self) -> Option<Vec<T>> {
        let data = T::slice(&self.storage)?;
        if self.layout.is_contiguous() {
            return Some(data.to_vec());
        }
        ndindex(self.layout.shape())
            .map(|index| {
                self.layout
                    .offset(&index)
                    .and_then(|offset| data.get(offset).copied())
            })
            .collect()
    }

    /// Return the elements in row-major order as scalars.
    pub fn to_scalars(&self) -> Vec<Scalar> {
        ndindex(self.layout.shape())
            .filter_map(|index| {
                let offset = self.layout.offset(&index)?;
                self.storage.scalar(offset)
            })
            .collect()
    }

    /// Convert this array to `dtype`.
    pub fn cast(&self, dtype: DType) -> Result<RefArray, NamespaceError> {
        if dtype == self.dtype() {
            return Ok(self.clone());
        }
        let storage = Storage::from_scalars(dtype, &self.to_scalars())?;
        RefArray::from_storage(storage, self.layout.shape())
    }
}

impl ArrayObject for RefArray {
    fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    fn get(&self, index: &[usize]) -> Result<Scalar, NamespaceError> {
        let out_of_bounds = || NamespaceError::IndexOutOfBounds {
            index: index.to_vec(),
            shape: Shape::from_slice(self.layout.shape()),
        };
        let offset = self.layout.offset(index).ok_or_else(out_of_bounds)?;
        self.storage.scalar(offset).ok_or_else(out_of_bounds)
    }
}

impl fmt::Debug for RefArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array([")?;
        for (i, x) in self.to_scalars().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x)?;
        }
        write!(
            f,
            "], shape={:?}, dtype={})",
            self.layout.shape(),
            self.dtype()
        )
    }
}
