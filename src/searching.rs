//! Checks for the searching functions: argmax, argmin, nonzero and where.
//!
//! Each check takes the namespace under test and a generated input, calls the
//! function under test and compares the result against a value computed
//! independently by scanning the input element by element.

use std::error::Error;
use std::fmt;
use std::iter::zip;

use proptest::prelude::*;

use crate::assertions::{
    assert_default_index, assert_index_equals, assert_keepdimable_shape, assert_scalar_equals,
    assert_shape, fail, AssertionFailure,
};
use crate::axis::{normalise_axis, AxisError};
use crate::dtype::{numeric_dtypes, scalar_dtypes, DType, Scalar};
use crate::index::{axes_ndindex, ndindex};
use crate::namespace::{ArrayNamespace, ArrayObject, NamespaceError};
use crate::shape::{broadcast_shapes, BroadcastError};
use crate::strategies::{
    array_of, arrays, dtypes, mutually_broadcastable_shapes, mutually_promotable_dtypes,
    reduce_kwargs, shapes, Elements, HostArray, ReduceKwargs, ShapeOptions,
};

/// Reason why a check failed.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckError {
    /// The namespace returned an error for a valid input.
    Namespace {
        func_name: &'static str,
        error: NamespaceError,
    },

    /// The output of a function did not match the expected value.
    Assertion(AssertionFailure),

    Axis(AxisError),

    Broadcast(BroadcastError),
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Namespace { func_name, error } => {
                write!(f, "{}() raised an error for valid input: {}", func_name, error)
            }
            CheckError::Assertion(err) => write!(f, "{}", err),
            CheckError::Axis(err) => write!(f, "{}", err),
            CheckError::Broadcast(err) => write!(f, "{}", err),
        }
    }
}

impl Error for CheckError {}

impl From<AssertionFailure> for CheckError {
    fn from(val: AssertionFailure) -> CheckError {
        CheckError::Assertion(val)
    }
}

impl From<AxisError> for CheckError {
    fn from(val: AxisError) -> CheckError {
        CheckError::Axis(val)
    }
}

impl From<BroadcastError> for CheckError {
    fn from(val: BroadcastError) -> CheckError {
        CheckError::Broadcast(val)
    }
}

/// Attribute an error returned by the namespace to the function `func_name`.
fn call<T>(func_name: &'static str, result: Result<T, NamespaceError>) -> Result<T, CheckError> {
    result.map_err(|error| CheckError::Namespace { func_name, error })
}

/// Which extremum an arg-reduction searches for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgReduction {
    Max,
    Min,
}

impl ArgReduction {
    pub fn func_name(self) -> &'static str {
        match self {
            ArgReduction::Max => "argmax",
            ArgReduction::Min => "argmin",
        }
    }

    /// Return true if `candidate` should replace `current` as the extremum.
    fn prefers(self, candidate: Scalar, current: Scalar) -> bool {
        match self {
            ArgReduction::Max => candidate > current,
            ArgReduction::Min => candidate < current,
        }
    }

    /// Return the position of the first extremum in a non-empty sequence.
    fn position(self, elements: &[Scalar]) -> usize {
        let mut best = 0;
        for (i, &x) in elements.iter().enumerate().skip(1) {
            if self.prefers(x, elements[best]) {
                best = i;
            }
        }
        best
    }
}

/// Inputs for argmax and argmin: a numeric array without NaNs, with at least
/// one element along every dimension, and keyword arguments.
///
/// Returns `None` if `catalog` has no numeric dtypes.
pub fn arg_reduction_inputs(
    catalog: &[DType],
) -> Option<impl Strategy<Value = (HostArray, ReduceKwargs)>> {
    let numeric = numeric_dtypes(catalog);
    if numeric.is_empty() {
        return None;
    }
    let x = arrays(
        dtypes(numeric),
        shapes(ShapeOptions::default().min_side(1)),
        Elements { allow_nan: false },
    );
    Some(x.prop_flat_map(|x| {
        let ndim = x.ndim();
        (Just(x), reduce_kwargs(ndim))
    }))
}

/// Inputs for nonzero: an array of any dtype in `catalog`.
pub fn nonzero_inputs(catalog: &[DType]) -> Option<impl Strategy<Value = HostArray>> {
    let scalar = scalar_dtypes(catalog);
    if scalar.is_empty() {
        return None;
    }
    Some(arrays(
        dtypes(scalar),
        shapes(ShapeOptions::default().min_side(1)),
        Elements::default(),
    ))
}

/// Inputs for where: a boolean condition and two arrays of mutually
/// promotable dtypes, with mutually broadcastable shapes.
///
/// Returns `None` if `catalog` lacks `bool` or has no promotable pairs.
pub fn where_inputs(
    catalog: &[DType],
) -> Option<impl Strategy<Value = (HostArray, HostArray, HostArray)>> {
    if !catalog.contains(&DType::Bool) {
        return None;
    }
    let dtypes = mutually_promotable_dtypes(catalog)?;
    let shapes = mutually_broadcastable_shapes(3, ShapeOptions::default().min_side(1));
    Some((shapes, dtypes).prop_flat_map(|(shapes, (dtype1, dtype2))| {
        (
            array_of(DType::Bool, shapes[0].clone(), Elements::default()),
            array_of(dtype1, shapes[1].clone(), Elements::default()),
            array_of(dtype2, shapes[2].clone(), Elements::default()),
        )
    }))
}

/// Check argmax against a linear scan of every reduced group of `x`.
pub fn check_argmax<N: ArrayNamespace>(
    ns: &N,
    x: &HostArray,
    kw: &ReduceKwargs,
) -> Result<(), CheckError> {
    check_arg_reduction(ns, ArgReduction::Max, x, kw)
}

/// Check argmin against a linear scan of every reduced group of `x`.
pub fn check_argmin<N: ArrayNamespace>(
    ns: &N,
    x: &HostArray,
    kw: &ReduceKwargs,
) -> Result<(), CheckError> {
    check_arg_reduction(ns, ArgReduction::Min, x, kw)
}

/// Shared implementation of [`check_argmax`] and [`check_argmin`].
///
/// The output must have a default index dtype and the keepdims-aware reduced
/// shape. Each output element must be the position, within its reduced group,
/// of the first occurrence of the extremum.
pub fn check_arg_reduction<N: ArrayNamespace>(
    ns: &N,
    reduction: ArgReduction,
    x: &HostArray,
    kw: &ReduceKwargs,
) -> Result<(), CheckError> {
    let func_name = reduction.func_name();
    let x = call("asarray", x.materialize(ns))?;

    let out = call(
        func_name,
        match reduction {
            ArgReduction::Max => ns.argmax(&x, kw.axis, kw.keepdims()),
            ArgReduction::Min => ns.argmin(&x, kw.axis, kw.keepdims()),
        },
    )?;

    assert_default_index(func_name, out.dtype(), "out.dtype")?;
    let axes = normalise_axis(kw.axis, x.ndim())?;
    assert_keepdimable_shape(
        func_name,
        out.shape(),
        x.shape(),
        &axes,
        kw.keepdims(),
        kw,
    )?;

    for (indices, out_idx) in zip(axes_ndindex(x.shape(), &axes), ndindex(out.shape())) {
        let out_val = call(func_name, out.get(&out_idx))?;
        let observed = out_val.as_index().ok_or_else(|| {
            fail(
                func_name,
                kw,
                format!("out[{:?}]={} is not an integer", out_idx.as_slice(), out_val),
            )
        })?;

        let elements = indices
            .iter()
            .map(|idx| call(func_name, x.get(idx)))
            .collect::<Result<Vec<_>, _>>()?;
        let expected = reduction.position(&elements) as i64;

        assert_index_equals(func_name, &out_idx, observed, expected, kw)?;
    }

    Ok(())
}

/// Check that nonzero returns the coordinates of every non-zero element of
/// `x`, in row-major order.
///
/// The output must have one 1-D array of a default index dtype per dimension
/// of `x` (one for 0-d inputs), all of the same size.
pub fn check_nonzero<N: ArrayNamespace>(ns: &N, x: &HostArray) -> Result<(), CheckError> {
    let x = call("asarray", x.materialize(ns))?;
    let out = call("nonzero", ns.nonzero(&x))?;

    if x.ndim() == 0 && out.len() != 1 {
        return Err(fail(
            "nonzero",
            "",
            format!(
                "len(out)={}, but should be 1 for 0-dimensional arrays",
                out.len()
            ),
        )
        .into());
    } else if x.ndim() > 0 && out.len() != x.ndim() {
        return Err(fail(
            "nonzero",
            "",
            format!("len(out)={}, but should be x.ndim={}", out.len(), x.ndim()),
        )
        .into());
    }

    let size = out[0].size();
    for (i, coords) in out.iter().enumerate() {
        if coords.ndim() != 1 {
            return Err(fail(
                "nonzero",
                "",
                format!("out[{}].ndim={}, but should be 1", i, coords.ndim()),
            )
            .into());
        }
        if coords.size() != size {
            return Err(fail(
                "nonzero",
                "",
                format!(
                    "out[{}].size={}, but should be out[0].size={}",
                    i,
                    coords.size(),
                    size
                ),
            )
            .into());
        }
        assert_default_index("nonzero", coords.dtype(), &format!("out[{}].dtype", i))?;
    }

    let mut indices = Vec::new();
    for idx in ndindex(x.shape()) {
        if call("nonzero", x.get(&idx))?.is_nonzero() {
            indices.push(idx);
        }
    }

    if x.ndim() == 0 {
        if size != indices.len() {
            return Err(fail(
                "nonzero",
                "",
                format!(
                    "out[0].size={}, but x has {} non-zero elements",
                    size,
                    indices.len()
                ),
            )
            .into());
        }
        return Ok(());
    }

    for i in 0..size {
        let mut idx = Vec::with_capacity(out.len());
        for coords in &out {
            let coord = call("nonzero", coords.get(&[i]))?;
            let coord = coord
                .as_index()
                .and_then(|c| usize::try_from(c).ok())
                .ok_or_else(|| {
                    fail(
                        "nonzero",
                        "",
                        format!("out[..][{}]={} is not a valid coordinate", i, coord),
                    )
                })?;
            idx.push(coord);
        }

        let f_idx = format!("Extrapolated index (x[{}] for x in out)={:?}", i, idx);
        match indices.iter().position(|nz| nz.as_slice() == idx.as_slice()) {
            Some(pos) if pos == i => {}
            Some(pos) => {
                return Err(fail(
                    "nonzero",
                    "",
                    format!("{} is in the wrong position, should be {}", f_idx, pos),
                )
                .into());
            }
            None => {
                let in_bounds = zip(&idx, x.shape()).all(|(&c, &side)| c < side);
                let message = if in_bounds {
                    let element = call("nonzero", x.get(&idx))?;
                    format!(
                        "{} results in x[{:?}]={}, a zero element",
                        f_idx, idx, element
                    )
                } else {
                    format!("{} is out of bounds for x.shape={:?}", f_idx, x.shape())
                };
                return Err(fail("nonzero", "", message).into());
            }
        }
    }

    if size != indices.len() {
        return Err(fail(
            "nonzero",
            "",
            format!(
                "out[0].size={}, but x has {} non-zero elements",
                size,
                indices.len()
            ),
        )
        .into());
    }

    Ok(())
}

/// Check that `where(cond, x1, x2)` has the broadcast shape of its inputs and
/// takes each element from `x1` where the broadcast condition is true and from
/// `x2` elsewhere.
pub fn check_where<N: ArrayNamespace>(
    ns: &N,
    cond: &HostArray,
    x1: &HostArray,
    x2: &HostArray,
) -> Result<(), CheckError> {
    let cond = call("asarray", cond.materialize(ns))?;
    let x1 = call("asarray", x1.materialize(ns))?;
    let x2 = call("asarray", x2.materialize(ns))?;

    let out = call("where", ns.where_(&cond, &x1, &x2))?;

    let shape = broadcast_shapes(&[cond.shape(), x1.shape(), x2.shape()])?;
    assert_shape("where", out.shape(), &shape, "out.shape", "")?;

    let cond = call("broadcast_to", ns.broadcast_to(&cond, &shape))?;
    let x1 = call("broadcast_to", ns.broadcast_to(&x1, &shape))?;
    let x2 = call("broadcast_to", ns.broadcast_to(&x2, &shape))?;

    for idx in ndindex(&shape) {
        let out_val = call("where", out.get(&idx))?;
        let out_repr = format!("out[{:?}]", idx.as_slice());
        if call("where", cond.get(&idx))?.is_nonzero() {
            let x_val = call("where", x1.get(&idx))?;
            let x_repr = format!("_x1[{:?}]", idx.as_slice());
            assert_scalar_equals("where", &x_repr, x_val, &out_repr, out_val)?;
        } else {
            let x_val = call("where", x2.get(&idx))?;
            let x_repr = format!("_x2[{:?}]", idx.as_slice());
            assert_scalar_equals("where", &x_repr, x_val, &out_repr, out_val)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ArgReduction, CheckError};
    use crate::assertions::fail;
    use crate::dtype::{DType, Scalar};
    use crate::namespace::NamespaceError;

    #[test]
    fn test_arg_reduction_position() {
        let values: Vec<Scalar> = [3, 1, 4, 1, 5, 9, 2, 9, 1]
            .into_iter()
            .map(Scalar::Int)
            .collect();
        assert_eq!(ArgReduction::Max.position(&values), 5);
        assert_eq!(ArgReduction::Min.position(&values), 1);

        let values = [Scalar::Float(-0.), Scalar::Float(0.)];
        assert_eq!(ArgReduction::Max.position(&values), 0);
        assert_eq!(ArgReduction::Min.position(&values), 0);

        let values = [Scalar::Float(f64::NEG_INFINITY), Scalar::Float(f64::INFINITY)];
        assert_eq!(ArgReduction::Max.position(&values), 1);
        assert_eq!(ArgReduction::Min.position(&values), 0);
    }

    #[test]
    fn test_check_error_display() {
        let err = CheckError::Namespace {
            func_name: "argmax",
            error: NamespaceError::UnsupportedDType(DType::UInt64),
        };
        assert_eq!(
            err.to_string(),
            "argmax() raised an error for valid input: unsupported dtype uint64"
        );

        let err: CheckError = fail("nonzero", "", "len(out)=2, but should be x.ndim=1".into()).into();
        assert_eq!(
            err.to_string(),
            "len(out)=2, but should be x.ndim=1 [nonzero()]"
        );
    }
}
