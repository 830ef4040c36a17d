//! Interface to the array library under test.

use std::error::Error;
use std::fmt;

use crate::axis::AxisError;
use crate::dtype::{DType, Scalar};
use crate::shape::{BroadcastError, Shape};

/// Errors reported by an array namespace.
#[derive(Clone, Debug, PartialEq)]
pub enum NamespaceError {
    /// The namespace does not support arrays of this dtype.
    UnsupportedDType(DType),

    /// The dtypes of the inputs cannot be combined.
    IncompatibleDTypes(DType, DType),

    /// The length of the data passed to `asarray` does not match the shape.
    DataLengthMismatch { expected: usize, actual: usize },

    /// An input has a value that is incorrect.
    InvalidValue(String),

    /// An index passed to [`ArrayObject::get`] is out of bounds.
    IndexOutOfBounds { index: Vec<usize>, shape: Shape },

    Axis(AxisError),

    Broadcast(BroadcastError),
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceError::UnsupportedDType(dtype) => write!(f, "unsupported dtype {}", dtype),
            NamespaceError::IncompatibleDTypes(a, b) => {
                write!(f, "dtypes {} and {} cannot be promoted", a, b)
            }
            NamespaceError::DataLengthMismatch { expected, actual } => write!(
                f,
                "data has {} elements but the shape requires {}",
                actual, expected
            ),
            NamespaceError::InvalidValue(details) => write!(f, "invalid value: {}", details),
            NamespaceError::IndexOutOfBounds { index, shape } => write!(
                f,
                "index {:?} is out of bounds for shape {:?}",
                index,
                shape.as_slice()
            ),
            NamespaceError::Axis(err) => write!(f, "{}", err),
            NamespaceError::Broadcast(err) => write!(f, "{}", err),
        }
    }
}

impl Error for NamespaceError {}

impl From<AxisError> for NamespaceError {
    fn from(val: AxisError) -> NamespaceError {
        NamespaceError::Axis(val)
    }
}

impl From<BroadcastError> for NamespaceError {
    fn from(val: BroadcastError) -> NamespaceError {
        NamespaceError::Broadcast(val)
    }
}

/// An array produced by the library under test.
///
/// The suite never inspects an array's storage. It reads shapes, dtypes and
/// individual elements through this trait only.
pub trait ArrayObject: fmt::Debug {
    fn shape(&self) -> &[usize];

    fn dtype(&self) -> DType;

    /// Return the element at `index`, which must have one entry per dimension.
    fn get(&self, index: &[usize]) -> Result<Scalar, NamespaceError>;

    fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Return the number of elements in the array.
    fn size(&self) -> usize {
        self.shape().iter().product()
    }
}

/// The array library under test.
///
/// Implementations adapt a concrete library to the functions the suite
/// exercises. Functions return errors rather than panicking, and the suite
/// treats an error on valid input as a conformance failure.
pub trait ArrayNamespace {
    type Array: ArrayObject;

    /// Name of the namespace, used in reports.
    fn name(&self) -> &str;

    /// The dtypes which this namespace supports. Inputs are only generated
    /// with these dtypes.
    fn dtypes(&self) -> &[DType];

    /// Return true if functions whose output shape depends on the input data,
    /// such as `nonzero`, are supported.
    fn supports_data_dependent_shapes(&self) -> bool {
        true
    }

    /// Create an array of `dtype` with the given shape from row-major `data`.
    fn asarray(
        &self,
        data: &[Scalar],
        shape: &[usize],
        dtype: DType,
    ) -> Result<Self::Array, NamespaceError>;

    /// Return the indices of the maximum values along `axis`, or of the
    /// flattened array if `axis` is `None`.
    fn argmax(
        &self,
        x: &Self::Array,
        axis: Option<isize>,
        keepdims: bool,
    ) -> Result<Self::Array, NamespaceError>;

    /// Return the indices of the minimum values along `axis`, or of the
    /// flattened array if `axis` is `None`.
    fn argmin(
        &self,
        x: &Self::Array,
        axis: Option<isize>,
        keepdims: bool,
    ) -> Result<Self::Array, NamespaceError>;

    /// Return one array of coordinates per dimension of `x` for the elements
    /// which are non-zero.
    fn nonzero(&self, x: &Self::Array) -> Result<Vec<Self::Array>, NamespaceError>;

    /// Select elements from `x1` where `cond` is true and from `x2` otherwise.
    fn where_(
        &self,
        cond: &Self::Array,
        x1: &Self::Array,
        x2: &Self::Array,
    ) -> Result<Self::Array, NamespaceError>;

    /// Broadcast `x` to `shape`.
    fn broadcast_to(&self, x: &Self::Array, shape: &[usize])
        -> Result<Self::Array, NamespaceError>;
}
