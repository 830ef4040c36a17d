//! Typed element buffers.

use arrcheck::{DType, NamespaceError, Scalar};

/// Row-major element buffer of an array, with one variant per dtype.
#[derive(Clone, Debug, PartialEq)]
pub enum Storage {
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// Evaluate `$body` with `$T` bound to the Rust element type of `$dtype`.
macro_rules! map_dtype {
    ($dtype:expr, $T:ident, $body:block) => {{
        use arrcheck::DType;
        match $dtype {
            DType::Bool => {
                type $T = bool;
                $body
            }
            DType::Int8 => {
                type $T = i8;
                $body
            }
            DType::Int16 => {
                type $T = i16;
                $body
            }
            DType::Int32 => {
                type $T = i32;
                $body
            }
            DType::Int64 => {
                type $T = i64;
                $body
            }
            DType::UInt8 => {
                type $T = u8;
                $body
            }
            DType::UInt16 => {
                type $T = u16;
                $body
            }
            DType::UInt32 => {
                type $T = u32;
                $body
            }
            DType::UInt64 => {
                type $T = u64;
                $body
            }
            DType::Float32 => {
                type $T = f32;
                $body
            }
            DType::Float64 => {
                type $T = f64;
                $body
            }
        }
    }};
}

pub(crate) use map_dtype;

/// Element type of a [`Storage`] buffer.
pub trait Element: Copy + PartialOrd + Send + Sync + 'static {
    const DTYPE: DType;

    fn to_scalar(self) -> Scalar;

    /// Convert a scalar to this type, returning `None` if the value cannot be
    /// represented exactly.
    fn from_scalar(value: Scalar) -> Option<Self>;

    fn is_zero(self) -> bool;

    /// Return the buffer if `storage` holds elements of this type.
    fn slice(storage: &Storage) -> Option<&[Self]>;

    fn into_storage(data: Vec<Self>) -> Storage;
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn to_scalar(self) -> Scalar {
        Scalar::Bool(self)
    }

    fn from_scalar(value: Scalar) -> Option<bool> {
        match value {
            Scalar::Bool(x) => Some(x),
            _ => None,
        }
    }

    fn is_zero(self) -> bool {
        !self
    }

    fn slice(storage: &Storage) -> Option<&[bool]> {
        match storage {
            Storage::Bool(data) => Some(data),
            _ => None,
        }
    }

    fn into_storage(data: Vec<bool>) -> Storage {
        Storage::Bool(data)
    }
}

macro_rules! impl_int_element {
    ($type:ty, $dtype:ident, $scalar:ident, $wide:ty) => {
        impl Element for $type {
            const DTYPE: DType = DType::$dtype;

            fn to_scalar(self) -> Scalar {
                Scalar::$scalar(self as $wide)
            }

            fn from_scalar(value: Scalar) -> Option<$type> {
                match value {
                    Scalar::Int(x) => <$type>::try_from(x).ok(),
                    Scalar::UInt(x) => <$type>::try_from(x).ok(),
                    Scalar::Bool(_) | Scalar::Float(_) => None,
                }
            }

            fn is_zero(self) -> bool {
                self == 0
            }

            fn slice(storage: &Storage) -> Option<&[$type]> {
                match storage {
                    Storage::$dtype(data) => Some(data),
                    _ => None,
                }
            }

            fn into_storage(data: Vec<$type>) -> Storage {
                Storage::$dtype(data)
            }
        }
    };
}

impl_int_element!(i8, Int8, Int, i64);
impl_int_element!(i16, Int16, Int, i64);
impl_int_element!(i32, Int32, Int, i64);
impl_int_element!(i64, Int64, Int, i64);
impl_int_element!(u8, UInt8, UInt, u64);
impl_int_element!(u16, UInt16, UInt, u64);
impl_int_element!(u32, UInt32, UInt, u64);
impl_int_element!(u64, UInt64, UInt, u64);

/// Return `converted` if it is exactly the integer `value`.
fn exact_float<F: Into<f64> + Copy>(value: i128, converted: F) -> Option<F> {
    (converted.into() as i128 == value).then_some(converted)
}

macro_rules! impl_float_element {
    ($type:ty, $dtype:ident) => {
        impl Element for $type {
            const DTYPE: DType = DType::$dtype;

            fn to_scalar(self) -> Scalar {
                Scalar::Float(self as f64)
            }

            fn from_scalar(value: Scalar) -> Option<$type> {
                match value {
                    Scalar::Float(x) if Self::DTYPE.can_hold(value) => Some(x as $type),
                    Scalar::Float(_) => None,
                    Scalar::Int(x) => exact_float(x as i128, x as $type),
                    Scalar::UInt(x) => exact_float(x as i128, x as $type),
                    Scalar::Bool(_) => None,
                }
            }

            fn is_zero(self) -> bool {
                self == 0.
            }

            fn slice(storage: &Storage) -> Option<&[$type]> {
                match storage {
                    Storage::$dtype(data) => Some(data),
                    _ => None,
                }
            }

            fn into_storage(data: Vec<$type>) -> Storage {
                Storage::$dtype(data)
            }
        }
    };
}

impl_float_element!(f32, Float32);
impl_float_element!(f64, Float64);

impl Storage {
    pub fn dtype(&self) -> DType {
        match self {
            Storage::Bool(_) => DType::Bool,
            Storage::Int8(_) => DType::Int8,
            Storage::Int16(_) => DType::Int16,
            Storage::Int32(_) => DType::Int32,
            Storage::Int64(_) => DType::Int64,
            Storage::UInt8(_) => DType::UInt8,
            Storage::UInt16(_) => DType::UInt16,
            Storage::UInt32(_) => DType::UInt32,
            Storage::UInt64(_) => DType::UInt64,
            Storage::Float32(_) => DType::Float32,
            Storage::Float64(_) => DType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        map_dtype!(self.dtype(), T, {
            T::slice(self).map(|data| data.len()).unwrap_or(0)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the element at buffer offset `offset`.
    pub fn scalar(&self, offset: usize) -> Option<Scalar> {
        map_dtype!(self.dtype(), T, {
            T::slice(self)
                .and_then(|data| data.get(offset))
                .map(|x| x.to_scalar())
        })
    }

    /// Create a buffer of `dtype` from scalar values.
    ///
    /// Fails if a value cannot be represented exactly in `dtype`, eg. a
    /// negative integer in a `uint8` buffer.
    pub fn from_scalars(dtype: DType, values: &[Scalar]) -> Result<Storage, NamespaceError> {
        map_dtype!(dtype, T, {
            let data = values
                .iter()
                .map(|&value| {
                    T::from_scalar(value).ok_or_else(|| {
                        NamespaceError::InvalidValue(format!(
                            "{} cannot be represented as {}",
                            value, dtype
                        ))
                    })
                })
                .collect::<Result<Vec<T>, _>>()?;
            Ok(T::into_storage(data))
        })
    }

    /// Create a buffer of index dtype `dtype` from indices.
    pub fn from_indices(dtype: DType, indices: Vec<i64>) -> Result<Storage, NamespaceError> {
        match dtype {
            DType::Int64 => Ok(Storage::Int64(indices)),
            DType::Int32 => indices
                .into_iter()
                .map(|index| {
                    i32::try_from(index).map_err(|_| {
                        NamespaceError::InvalidValue(format!(
                            "index {} does not fit in int32",
                            index
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Storage::Int32),
            _ => Err(NamespaceError::UnsupportedDType(dtype)),
        }
    }
}
