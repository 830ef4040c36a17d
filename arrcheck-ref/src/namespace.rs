use arrcheck::{ArrayNamespace, DType, NamespaceError, Scalar};

use crate::array::RefArray;
use crate::ops;
use crate::storage::Storage;

/// Reference implementation of [`ArrayNamespace`].
///
/// Supports every dtype in the catalog. Index outputs use `int64` by default.
#[derive(Clone, Debug)]
pub struct RefNamespace {
    index_dtype: DType,
}

impl Default for RefNamespace {
    fn default() -> RefNamespace {
        RefNamespace {
            index_dtype: DType::Int64,
        }
    }
}

impl RefNamespace {
    pub fn new() -> RefNamespace {
        RefNamespace::default()
    }

    /// Create a namespace whose index outputs have dtype `index_dtype`.
    ///
    /// Returns an error unless `index_dtype` is `int32` or `int64`.
    pub fn with_index_dtype(index_dtype: DType) -> Result<RefNamespace, NamespaceError> {
        match index_dtype {
            DType::Int32 | DType::Int64 => Ok(RefNamespace { index_dtype }),
            _ => Err(NamespaceError::UnsupportedDType(index_dtype)),
        }
    }

    pub fn index_dtype(&self) -> DType {
        self.index_dtype
    }
}

impl ArrayNamespace for RefNamespace {
    type Array = RefArray;

    fn name(&self) -> &str {
        "arrcheck-ref"
    }

    fn dtypes(&self) -> &[DType] {
        &DType::ALL
    }

    fn asarray(
        &self,
        data: &[Scalar],
        shape: &[usize],
        dtype: DType,
    ) -> Result<RefArray, NamespaceError> {
        let len: usize = shape.iter().product();
        if data.len() != len {
            return Err(NamespaceError::DataLengthMismatch {
                expected: len,
                actual: data.len(),
            });
        }
        RefArray::from_storage(Storage::from_scalars(dtype, data)?, shape)
    }

    fn argmax(
        &self,
        x: &RefArray,
        axis: Option<isize>,
        keepdims: bool,
    ) -> Result<RefArray, NamespaceError> {
        ops::arg_max(x, axis, keepdims, self.index_dtype)
    }

    fn argmin(
        &self,
        x: &RefArray,
        axis: Option<isize>,
        keepdims: bool,
    ) -> Result<RefArray, NamespaceError> {
        ops::arg_min(x, axis, keepdims, self.index_dtype)
    }

    fn nonzero(&self, x: &RefArray) -> Result<Vec<RefArray>, NamespaceError> {
        ops::nonzero(x, self.index_dtype)
    }

    fn where_(
        &self,
        cond: &RefArray,
        x1: &RefArray,
        x2: &RefArray,
    ) -> Result<RefArray, NamespaceError> {
        ops::where_(cond, x1, x2)
    }

    fn broadcast_to(&self, x: &RefArray, shape: &[usize]) -> Result<RefArray, NamespaceError> {
        x.broadcast(shape)
    }
}

#[cfg(test)]
mod tests {
    use arrcheck::{ArrayNamespace, ArrayObject, DType, NamespaceError, Scalar};

    use super::RefNamespace;

    #[test]
    fn test_asarray() {
        let ns = RefNamespace::new();
        let x = ns
            .asarray(&[Scalar::Int(1), Scalar::Int(-2)], &[2], DType::Int8)
            .unwrap();
        assert_eq!(x.dtype(), DType::Int8);
        assert_eq!(x.get(&[1]), Ok(Scalar::Int(-2)));

        let err = ns
            .asarray(&[Scalar::Int(1)], &[2, 2], DType::Int8)
            .unwrap_err();
        assert_eq!(
            err,
            NamespaceError::DataLengthMismatch {
                expected: 4,
                actual: 1
            }
        );

        let x = ns.asarray(&[Scalar::Float(2.5)], &[], DType::Float64).unwrap();
        assert_eq!(x.shape(), &[] as &[usize]);
    }

    #[test]
    fn test_index_dtype() {
        let ns = RefNamespace::with_index_dtype(DType::Int32).unwrap();
        let x = ns
            .asarray(&[Scalar::UInt(3), Scalar::UInt(9)], &[2], DType::UInt32)
            .unwrap();
        let out = ns.argmax(&x, None, false).unwrap();
        assert_eq!(out.dtype(), DType::Int32);
        assert_eq!(out.get(&[]), Ok(Scalar::Int(1)));

        assert!(RefNamespace::with_index_dtype(DType::UInt64).is_err());
        assert_eq!(RefNamespace::new().index_dtype(), DType::Int64);
    }
}
