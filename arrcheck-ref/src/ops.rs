//! Implementations of the searching functions.

use std::iter::zip;

use arrcheck::axis::resolve_axis;
use arrcheck::index::{axes_ndindex, ndindex};
use arrcheck::shape::{broadcast_shapes, reduced_shape};
use arrcheck::{promote_types, ArrayObject, DType, NamespaceError, Shape};

use crate::array::RefArray;
use crate::layout::Layout;
use crate::storage::{map_dtype, Element, Storage};

/// Return the position of the first element in `values` for which `compare`
/// is true against every earlier candidate.
fn select_index<T: Copy, Cmp: Fn(T, T) -> bool>(
    values: impl Iterator<Item = T>,
    compare: &Cmp,
) -> Option<usize> {
    values
        .enumerate()
        .fold(None, |acc, (i, val)| match acc {
            Some((index, best)) => {
                if compare(val, best) {
                    Some((i, val))
                } else {
                    Some((index, best))
                }
            }
            None => Some((i, val)),
        })
        .map(|(index, _)| index)
}

fn empty_sequence() -> NamespaceError {
    NamespaceError::InvalidValue("Cannot select index from empty sequence".to_string())
}

/// Shared implementation of argmax and argmin.
///
/// `compare(a, b)` returns true if `a` should replace the current candidate
/// `b`. Using a strict comparison selects the first occurrence of ties.
fn index_select<T: Element, Cmp: Fn(T, T) -> bool>(
    input: &[T],
    shape: &[usize],
    axis: Option<isize>,
    keep_dims: bool,
    compare: Cmp,
) -> Result<(Vec<i64>, Shape), NamespaceError> {
    let layout = Layout::contiguous(shape);
    if layout.len() != input.len() {
        return Err(NamespaceError::DataLengthMismatch {
            expected: layout.len(),
            actual: input.len(),
        });
    }

    let Some(axis) = axis else {
        let all_axes: Vec<usize> = (0..shape.len()).collect();
        let index = select_index(input.iter().copied(), &compare).ok_or_else(empty_sequence)?;
        return Ok((vec![index as i64], reduced_shape(shape, &all_axes, keep_dims)));
    };

    let resolved_axis = resolve_axis(axis, shape.len())?;
    if shape[resolved_axis] == 0 {
        return Err(empty_sequence());
    }

    let mut reduced_data = Vec::new();
    for group in axes_ndindex(shape, &[resolved_axis]) {
        let values = group
            .iter()
            .map(|index| {
                layout
                    .offset(index)
                    .and_then(|offset| input.get(offset).copied())
                    .ok_or_else(|| NamespaceError::IndexOutOfBounds {
                        index: index.to_vec(),
                        shape: Shape::from_slice(shape),
                    })
            })
            .collect::<Result<Vec<T>, _>>()?;
        let index = select_index(values.into_iter(), &compare).ok_or_else(empty_sequence)?;
        reduced_data.push(index as i64);
    }

    Ok((reduced_data, reduced_shape(shape, &[resolved_axis], keep_dims)))
}

fn arg_reduce(
    input: &RefArray,
    axis: Option<isize>,
    keep_dims: bool,
    index_dtype: DType,
    select_max: bool,
) -> Result<RefArray, NamespaceError> {
    let (indices, shape) = map_dtype!(input.dtype(), T, {
        let data: Vec<T> = input
            .to_vec()
            .ok_or(NamespaceError::UnsupportedDType(input.dtype()))?;
        if select_max {
            index_select(&data, input.shape(), axis, keep_dims, |a, b| a > b)?
        } else {
            index_select(&data, input.shape(), axis, keep_dims, |a, b| a < b)?
        }
    });
    RefArray::from_storage(Storage::from_indices(index_dtype, indices)?, &shape)
}

/// Return the indices of the maximum values along `axis`.
///
/// If `axis` is `None` the index is into the flattened array.
pub fn arg_max(
    input: &RefArray,
    axis: Option<isize>,
    keep_dims: bool,
    index_dtype: DType,
) -> Result<RefArray, NamespaceError> {
    arg_reduce(input, axis, keep_dims, index_dtype, true)
}

/// Return the indices of the minimum values along `axis`.
pub fn arg_min(
    input: &RefArray,
    axis: Option<isize>,
    keep_dims: bool,
    index_dtype: DType,
) -> Result<RefArray, NamespaceError> {
    arg_reduce(input, axis, keep_dims, index_dtype, false)
}

fn nonzero_coords<T: Element>(data: &[T], shape: &[usize]) -> Vec<Vec<i64>> {
    let mut coords: Vec<Vec<i64>> = vec![Vec::new(); shape.len().max(1)];
    for (index, &x) in zip(ndindex(shape), data) {
        if x.is_zero() {
            continue;
        }
        if shape.is_empty() {
            coords[0].push(0);
        }
        for (dim, &i) in index.iter().enumerate() {
            coords[dim].push(i as i64);
        }
    }
    coords
}

/// Return the coordinates of non-zero elements of `input`, one 1-D array per
/// dimension.
///
/// A 0-d input is treated as a 1-element 1-D array, so the result is a single
/// array containing `[0]` if the element is non-zero or nothing otherwise.
pub fn nonzero(input: &RefArray, index_dtype: DType) -> Result<Vec<RefArray>, NamespaceError> {
    let coords = map_dtype!(input.dtype(), T, {
        let data: Vec<T> = input
            .to_vec()
            .ok_or(NamespaceError::UnsupportedDType(input.dtype()))?;
        nonzero_coords(&data, input.shape())
    });
    coords
        .into_iter()
        .map(|dim_coords| {
            let len = dim_coords.len();
            RefArray::from_storage(Storage::from_indices(index_dtype, dim_coords)?, &[len])
        })
        .collect()
}

fn where_op<T: Element>(cond: &[bool], x: &[T], y: &[T]) -> Vec<T> {
    zip(cond, zip(x, y))
        .map(|(&c, (&x, &y))| if c { x } else { y })
        .collect()
}

/// Select elements from `x` where `cond` is true and from `y` otherwise.
///
/// The inputs are broadcast together and `x` and `y` are promoted to a common
/// dtype.
pub fn where_(cond: &RefArray, x: &RefArray, y: &RefArray) -> Result<RefArray, NamespaceError> {
    if cond.dtype() != DType::Bool {
        return Err(NamespaceError::UnsupportedDType(cond.dtype()));
    }
    let out_dtype = promote_types(x.dtype(), y.dtype())
        .ok_or(NamespaceError::IncompatibleDTypes(x.dtype(), y.dtype()))?;
    let result_shape = broadcast_shapes(&[cond.shape(), x.shape(), y.shape()])?;

    let cond: Vec<bool> = cond
        .broadcast(&result_shape)?
        .to_vec()
        .ok_or(NamespaceError::UnsupportedDType(cond.dtype()))?;
    let x = x.cast(out_dtype)?.broadcast(&result_shape)?;
    let y = y.cast(out_dtype)?.broadcast(&result_shape)?;

    let storage = map_dtype!(out_dtype, T, {
        let x: Vec<T> = x.to_vec().ok_or(NamespaceError::UnsupportedDType(out_dtype))?;
        let y: Vec<T> = y.to_vec().ok_or(NamespaceError::UnsupportedDType(out_dtype))?;
        T::into_storage(where_op(&cond, &x, &y))
    });
    RefArray::from_storage(storage, &result_shape)
}
