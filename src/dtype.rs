//! The dtype catalog and host-side scalar values.

use std::cmp::Ordering;
use std::fmt;

/// Element type of an array.
///
/// This is the closed catalog of dtypes that the array API standard requires
/// namespaces to support. A namespace may support only a subset, which it
/// reports via [`ArrayNamespace::dtypes`](crate::ArrayNamespace::dtypes).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

/// Kind of a dtype. Promotion is only defined between dtypes of the same kind,
/// or between signed and unsigned integers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DTypeKind {
    Bool,
    SignedInt,
    UnsignedInt,
    Float,
}

/// The dtypes which searching functions may use for index outputs.
pub const DEFAULT_INDEX_DTYPES: [DType; 2] = [DType::Int32, DType::Int64];

impl DType {
    /// Every dtype in the catalog.
    pub const ALL: [DType; 11] = [
        DType::Bool,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::Float32,
        DType::Float64,
    ];

    /// Return the canonical name of this dtype, eg. "int32".
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }

    /// Look up a dtype by its canonical name.
    pub fn from_name(name: &str) -> Option<DType> {
        DType::ALL.into_iter().find(|dtype| dtype.name() == name)
    }

    pub fn kind(self) -> DTypeKind {
        match self {
            DType::Bool => DTypeKind::Bool,
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 => DTypeKind::SignedInt,
            DType::UInt8 | DType::UInt16 | DType::UInt32 | DType::UInt64 => {
                DTypeKind::UnsignedInt
            }
            DType::Float32 | DType::Float64 => DTypeKind::Float,
        }
    }

    /// Return the width of this dtype in bits.
    pub fn bits(self) -> u32 {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 8,
            DType::Int16 | DType::UInt16 => 16,
            DType::Int32 | DType::UInt32 | DType::Float32 => 32,
            DType::Int64 | DType::UInt64 | DType::Float64 => 64,
        }
    }

    pub fn is_bool(self) -> bool {
        self.kind() == DTypeKind::Bool
    }

    pub fn is_integral(self) -> bool {
        matches!(self.kind(), DTypeKind::SignedInt | DTypeKind::UnsignedInt)
    }

    pub fn is_float(self) -> bool {
        self.kind() == DTypeKind::Float
    }

    /// Return true for dtypes which support arithmetic (integers and floats).
    pub fn is_numeric(self) -> bool {
        !self.is_bool()
    }

    /// Return the inclusive range of values of an integral dtype.
    fn int_bounds(self) -> Option<(i128, i128)> {
        let bits = self.bits();
        match self.kind() {
            DTypeKind::SignedInt => Some((-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)),
            DTypeKind::UnsignedInt => Some((0, (1i128 << bits) - 1)),
            DTypeKind::Bool | DTypeKind::Float => None,
        }
    }

    /// Return true if `value` can be stored in an array of this dtype without
    /// loss.
    pub fn can_hold(self, value: Scalar) -> bool {
        match (self.kind(), value) {
            (DTypeKind::Bool, Scalar::Bool(_)) => true,
            (DTypeKind::SignedInt | DTypeKind::UnsignedInt, Scalar::Int(_) | Scalar::UInt(_)) => {
                let (min, max) = self.int_bounds().unwrap_or((0, 0));
                value
                    .as_i128()
                    .is_some_and(|value| (min..=max).contains(&value))
            }
            (DTypeKind::Float, Scalar::Float(value)) => {
                self == DType::Float64 || value.is_nan() || (value as f32) as f64 == value
            }
            _ => false,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Return the signed integer dtype with the given width.
fn signed_int_with_bits(bits: u32) -> Option<DType> {
    match bits {
        8 => Some(DType::Int8),
        16 => Some(DType::Int16),
        32 => Some(DType::Int32),
        64 => Some(DType::Int64),
        _ => None,
    }
}

/// Return the dtype that results from combining `a` and `b` in an operation
/// such as `where`, following the array API type promotion table.
///
/// Returns `None` for combinations the standard leaves unspecified, such as
/// mixing integers and floats or `uint64` with a signed integer.
pub fn promote_types(a: DType, b: DType) -> Option<DType> {
    let wider = |a: DType, b: DType| if a.bits() >= b.bits() { a } else { b };
    match (a.kind(), b.kind()) {
        (DTypeKind::Bool, DTypeKind::Bool) => Some(DType::Bool),
        (DTypeKind::SignedInt, DTypeKind::SignedInt)
        | (DTypeKind::UnsignedInt, DTypeKind::UnsignedInt)
        | (DTypeKind::Float, DTypeKind::Float) => Some(wider(a, b)),
        (DTypeKind::SignedInt, DTypeKind::UnsignedInt) => promote_mixed_ints(a, b),
        (DTypeKind::UnsignedInt, DTypeKind::SignedInt) => promote_mixed_ints(b, a),
        _ => None,
    }
}

fn promote_mixed_ints(signed: DType, unsigned: DType) -> Option<DType> {
    if unsigned.bits() >= 64 {
        return None;
    }
    signed_int_with_bits(signed.bits().max(unsigned.bits() * 2))
}

/// Return all ordered pairs of dtypes from `catalog` which have a defined
/// promotion.
pub fn promotable_pairs(catalog: &[DType]) -> Vec<(DType, DType)> {
    let mut pairs = Vec::new();
    for &a in catalog {
        for &b in catalog {
            if promote_types(a, b).is_some() {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

/// Return the numeric dtypes in `catalog`.
pub fn numeric_dtypes(catalog: &[DType]) -> Vec<DType> {
    catalog.iter().copied().filter(|d| d.is_numeric()).collect()
}

/// Return every dtype in `catalog` which can hold scalar values. This is the
/// whole catalog.
pub fn scalar_dtypes(catalog: &[DType]) -> Vec<DType> {
    catalog.to_vec()
}

/// A single element value, read from or written to an array.
///
/// Integer values of any width are represented as `Int` or `UInt`, floats of
/// either width as `Float`. Comparisons between scalars compare values, so
/// `Int(3) == UInt(3)`.
#[derive(Copy, Clone, Debug)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Scalar {
    fn as_i128(self) -> Option<i128> {
        match self {
            Scalar::Int(x) => Some(x as i128),
            Scalar::UInt(x) => Some(x as i128),
            Scalar::Bool(_) | Scalar::Float(_) => None,
        }
    }

    /// Return the value as an index if it is an integer that fits in `i64`.
    pub fn as_index(self) -> Option<i64> {
        self.as_i128().and_then(|x| i64::try_from(x).ok())
    }

    /// Return true if this is a NaN float.
    pub fn is_nan(self) -> bool {
        matches!(self, Scalar::Float(x) if x.is_nan())
    }

    /// Return true if this value is "truthy": `true` for booleans, non-zero
    /// for numbers. NaN is non-zero.
    pub fn is_nonzero(self) -> bool {
        match self {
            Scalar::Bool(x) => x,
            Scalar::Int(x) => x != 0,
            Scalar::UInt(x) => x != 0,
            Scalar::Float(x) => x != 0.,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Scalar) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Scalar) -> Option<Ordering> {
        match (*self, *other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.partial_cmp(&b),
            (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(&b),
            (Scalar::Float(a), b) => b.as_i128().and_then(|b| a.partial_cmp(&(b as f64))),
            (a, Scalar::Float(b)) => a.as_i128().and_then(|a| (a as f64).partial_cmp(&b)),
            (a, b) => match (a.as_i128(), b.as_i128()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(x) => write!(f, "{}", x),
            Scalar::Int(x) => write!(f, "{}", x),
            Scalar::UInt(x) => write!(f, "{}", x),
            Scalar::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<bool> for Scalar {
    fn from(x: bool) -> Scalar {
        Scalar::Bool(x)
    }
}

impl From<i64> for Scalar {
    fn from(x: i64) -> Scalar {
        Scalar::Int(x)
    }
}

impl From<u64> for Scalar {
    fn from(x: u64) -> Scalar {
        Scalar::UInt(x)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Scalar {
        Scalar::Float(x)
    }
}
