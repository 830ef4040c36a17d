//! Assertions used by the checks.
//!
//! Each assertion returns an [`AssertionFailure`] describing the function
//! under test, the operand that was wrong and both the observed and expected
//! values.

use std::error::Error;
use std::fmt;

use crate::dtype::{DType, Scalar, DEFAULT_INDEX_DTYPES};
use crate::shape::reduced_shape;

/// A mismatch between the output of a function under test and the value
/// computed independently by the suite.
#[derive(Clone, Debug, PartialEq)]
pub struct AssertionFailure {
    /// Name of the function under test, eg. "argmax".
    pub func_name: String,

    /// Formatted keyword arguments the function was called with, eg.
    /// "axis=1, keepdims=true".
    pub kwargs: String,

    pub message: String,
}

impl AssertionFailure {
    fn new(func_name: &str, kwargs: impl fmt::Display, message: String) -> AssertionFailure {
        AssertionFailure {
            func_name: func_name.to_string(),
            kwargs: kwargs.to_string(),
            message,
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}({})]", self.message, self.func_name, self.kwargs)
    }
}

impl Error for AssertionFailure {}

/// Assert that `dtype` is one of the default index dtypes, int32 or int64.
pub fn assert_default_index(
    func_name: &str,
    dtype: DType,
    repr_name: &str,
) -> Result<(), AssertionFailure> {
    if DEFAULT_INDEX_DTYPES.contains(&dtype) {
        return Ok(());
    }
    Err(AssertionFailure::new(
        func_name,
        "",
        format!(
            "{}={}, should be the default index dtype, which is either int32 or int64",
            repr_name, dtype
        ),
    ))
}

/// Assert that the shape of an output matches `expected`.
pub fn assert_shape(
    func_name: &str,
    out_shape: &[usize],
    expected: &[usize],
    repr_name: &str,
    kwargs: impl fmt::Display,
) -> Result<(), AssertionFailure> {
    if out_shape == expected {
        return Ok(());
    }
    Err(AssertionFailure::new(
        func_name,
        kwargs,
        format!(
            "{}={:?}, but should be {:?}",
            repr_name, out_shape, expected
        ),
    ))
}

/// Assert that the output shape of a reduction over `axes` of an input with
/// shape `in_shape` is correct, taking `keepdims` into account.
pub fn assert_keepdimable_shape(
    func_name: &str,
    out_shape: &[usize],
    in_shape: &[usize],
    axes: &[usize],
    keepdims: bool,
    kwargs: impl fmt::Display,
) -> Result<(), AssertionFailure> {
    let expected = reduced_shape(in_shape, axes, keepdims);
    assert_shape(func_name, out_shape, &expected, "out.shape", kwargs)
}

/// Assert that an integer output element, such as an index returned by
/// argmax, matches the expected value.
pub fn assert_index_equals(
    func_name: &str,
    out_index: &[usize],
    observed: i64,
    expected: i64,
    kwargs: impl fmt::Display,
) -> Result<(), AssertionFailure> {
    if observed == expected {
        return Ok(());
    }
    Err(AssertionFailure::new(
        func_name,
        kwargs,
        format!(
            "out[{:?}]={}, should be {}",
            out_index, observed, expected
        ),
    ))
}

/// Assert that the element `out_val` of an output equals the element `x_val`
/// of an input it was taken from.
///
/// Values are compared numerically, so an element taken from an int8 input
/// equals the same value in an int16 output. NaN equals NaN.
pub fn assert_scalar_equals(
    func_name: &str,
    x_repr: &str,
    x_val: Scalar,
    out_repr: &str,
    out_val: Scalar,
) -> Result<(), AssertionFailure> {
    let equal = if out_val.is_nan() {
        x_val.is_nan()
    } else {
        x_val == out_val
    };
    if equal {
        return Ok(());
    }
    Err(AssertionFailure::new(
        func_name,
        "",
        format!("{}={}, should be {} ({})", out_repr, out_val, x_repr, x_val),
    ))
}

/// Build an [`AssertionFailure`] for a condition that is checked directly by
/// a check, rather than via one of the helpers in this module.
pub fn fail(func_name: &str, kwargs: impl fmt::Display, message: String) -> AssertionFailure {
    AssertionFailure::new(func_name, kwargs, message)
}

#[cfg(test)]
mod tests {
    use super::{
        assert_default_index, assert_index_equals, assert_keepdimable_shape,
        assert_scalar_equals, assert_shape,
    };
    use crate::dtype::{DType, Scalar};

    #[test]
    fn test_assert_default_index() {
        assert!(assert_default_index("argmax", DType::Int32, "out.dtype").is_ok());
        assert!(assert_default_index("argmax", DType::Int64, "out.dtype").is_ok());

        let err = assert_default_index("argmax", DType::UInt64, "out.dtype").unwrap_err();
        assert_eq!(
            err.to_string(),
            "out.dtype=uint64, should be the default index dtype, which is either int32 or int64 [argmax()]"
        );
    }

    #[test]
    fn test_assert_shape() {
        assert!(assert_shape("where", &[2, 3], &[2, 3], "out.shape", "").is_ok());

        let err = assert_shape("where", &[3], &[2, 3], "out.shape", "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "out.shape=[3], but should be [2, 3] [where()]"
        );
    }

    #[test]
    fn test_assert_keepdimable_shape() {
        assert!(assert_keepdimable_shape("argmax", &[2], &[2, 3], &[1], false, "").is_ok());
        assert!(assert_keepdimable_shape("argmax", &[2, 1], &[2, 3], &[1], true, "").is_ok());
        assert!(assert_keepdimable_shape("argmax", &[], &[2, 3], &[0, 1], false, "").is_ok());

        let err = assert_keepdimable_shape("argmax", &[2], &[2, 3], &[1], true, "keepdims=true")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "out.shape=[2], but should be [2, 1] [argmax(keepdims=true)]"
        );
    }

    #[test]
    fn test_assert_index_equals() {
        assert!(assert_index_equals("argmin", &[0], 2, 2, "").is_ok());
        let err = assert_index_equals("argmin", &[0], 1, 2, "axis=0").unwrap_err();
        assert_eq!(err.to_string(), "out[[0]]=1, should be 2 [argmin(axis=0)]");
    }

    #[test]
    fn test_assert_scalar_equals() {
        assert!(
            assert_scalar_equals("where", "x1[0]", Scalar::Int(5), "out[0]", Scalar::Int(5))
                .is_ok()
        );
        assert!(
            assert_scalar_equals("where", "x1[0]", Scalar::UInt(5), "out[0]", Scalar::Int(5))
                .is_ok()
        );
        assert!(assert_scalar_equals(
            "where",
            "x1[0]",
            Scalar::Float(f64::NAN),
            "out[0]",
            Scalar::Float(f64::NAN)
        )
        .is_ok());
        assert!(assert_scalar_equals(
            "where",
            "x1[0]",
            Scalar::Float(1.),
            "out[0]",
            Scalar::Float(f64::NAN)
        )
        .is_err());

        let err = assert_scalar_equals("where", "x2[1]", Scalar::Int(2), "out[1]", Scalar::Int(20))
            .unwrap_err();
        assert_eq!(err.to_string(), "out[1]=20, should be x2[1] (2) [where()]");
    }
}
