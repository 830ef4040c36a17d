//! proptest strategies for generating the inputs of checks.
//!
//! Arrays are generated on the host as [`HostArray`] values and only turned
//! into arrays of the library under test inside a check, via the library's
//! own `asarray`. This keeps generated values printable and lets proptest
//! shrink them.

use std::fmt;

use proptest::collection::vec;
use proptest::prelude::*;

use crate::dtype::{promotable_pairs, DType, Scalar};
use crate::namespace::{ArrayNamespace, NamespaceError};
use crate::shape::Shape;

/// Maximum number of elements in a generated array.
pub const MAX_ARRAY_SIZE: usize = 1024;

/// Constraints on generated shapes.
#[derive(Clone, Copy, Debug)]
pub struct ShapeOptions {
    pub min_dims: usize,
    pub max_dims: usize,
    pub min_side: usize,
    pub max_side: usize,
}

impl Default for ShapeOptions {
    fn default() -> ShapeOptions {
        ShapeOptions {
            min_dims: 0,
            max_dims: 4,
            min_side: 0,
            max_side: 5,
        }
    }
}

impl ShapeOptions {
    /// Return options with the given minimum side length.
    pub fn min_side(self, min_side: usize) -> ShapeOptions {
        ShapeOptions {
            min_side,
            max_side: self.max_side.max(min_side),
            ..self
        }
    }
}

/// Constraints on generated element values.
#[derive(Clone, Copy, Debug)]
pub struct Elements {
    /// Whether float arrays may contain NaN.
    pub allow_nan: bool,
}

impl Default for Elements {
    fn default() -> Elements {
        Elements { allow_nan: true }
    }
}

/// An array generated by a strategy, held on the host in row-major order.
#[derive(Clone, PartialEq)]
pub struct HostArray {
    pub dtype: DType,
    pub shape: Shape,
    pub data: Vec<Scalar>,
}

impl HostArray {
    pub fn new(dtype: DType, shape: Shape, data: Vec<Scalar>) -> HostArray {
        HostArray { dtype, shape, data }
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Create the equivalent array in the namespace `ns`.
    pub fn materialize<N: ArrayNamespace>(&self, ns: &N) -> Result<N::Array, NamespaceError> {
        ns.asarray(&self.data, &self.shape, self.dtype)
    }
}

impl fmt::Debug for HostArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asarray([")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x)?;
        }
        write!(
            f,
            "], shape={:?}, dtype={})",
            self.shape.as_slice(),
            self.dtype
        )
    }
}

/// Keyword arguments for argmax and argmin.
///
/// Fields are `None` when the argument is omitted and the function's default
/// applies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReduceKwargs {
    pub axis: Option<isize>,
    pub keepdims: Option<bool>,
}

impl ReduceKwargs {
    pub fn keepdims(&self) -> bool {
        self.keepdims.unwrap_or(false)
    }
}

impl fmt::Display for ReduceKwargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.axis, self.keepdims) {
            (Some(axis), Some(keepdims)) => write!(f, "axis={}, keepdims={}", axis, keepdims),
            (Some(axis), None) => write!(f, "axis={}", axis),
            (None, Some(keepdims)) => write!(f, "keepdims={}", keepdims),
            (None, None) => Ok(()),
        }
    }
}

/// Generate shapes satisfying `opts`, with at most [`MAX_ARRAY_SIZE`]
/// elements.
pub fn shapes(opts: ShapeOptions) -> impl Strategy<Value = Shape> {
    vec(opts.min_side..=opts.max_side, opts.min_dims..=opts.max_dims)
        .prop_filter("array too large", |shape| {
            shape.iter().product::<usize>() <= MAX_ARRAY_SIZE
        })
        .prop_map(Shape::from_vec)
}

/// Generate dtypes from a non-empty `catalog`.
pub fn dtypes(catalog: Vec<DType>) -> impl Strategy<Value = DType> {
    prop::sample::select(catalog)
}

/// Generate element values for arrays of `dtype`.
///
/// Integer values span the whole range of the dtype. Float values include
/// infinities, signed zeros and subnormals, and NaN if `opts.allow_nan`.
pub fn elements(dtype: DType, opts: Elements) -> BoxedStrategy<Scalar> {
    use prop::num::{f32 as f32s, f64 as f64s};

    match dtype {
        DType::Bool => any::<bool>().prop_map(Scalar::Bool).boxed(),
        DType::Int8 => any::<i8>().prop_map(|x| Scalar::Int(x.into())).boxed(),
        DType::Int16 => any::<i16>().prop_map(|x| Scalar::Int(x.into())).boxed(),
        DType::Int32 => any::<i32>().prop_map(|x| Scalar::Int(x.into())).boxed(),
        DType::Int64 => any::<i64>().prop_map(Scalar::Int).boxed(),
        DType::UInt8 => any::<u8>().prop_map(|x| Scalar::UInt(x.into())).boxed(),
        DType::UInt16 => any::<u16>().prop_map(|x| Scalar::UInt(x.into())).boxed(),
        DType::UInt32 => any::<u32>().prop_map(|x| Scalar::UInt(x.into())).boxed(),
        DType::UInt64 => any::<u64>().prop_map(Scalar::UInt).boxed(),
        DType::Float32 => {
            let finite_and_inf = f32s::POSITIVE
                | f32s::NEGATIVE
                | f32s::NORMAL
                | f32s::SUBNORMAL
                | f32s::ZERO
                | f32s::INFINITE;
            let values = if opts.allow_nan {
                finite_and_inf | f32s::QUIET_NAN
            } else {
                finite_and_inf
            };
            values.prop_map(|x| Scalar::Float(x.into())).boxed()
        }
        DType::Float64 => {
            let finite_and_inf = f64s::POSITIVE
                | f64s::NEGATIVE
                | f64s::NORMAL
                | f64s::SUBNORMAL
                | f64s::ZERO
                | f64s::INFINITE;
            let values = if opts.allow_nan {
                finite_and_inf | f64s::QUIET_NAN
            } else {
                finite_and_inf
            };
            values.prop_map(Scalar::Float).boxed()
        }
    }
}

/// Generate a host array with a fixed dtype and shape.
pub fn array_of(dtype: DType, shape: Shape, opts: Elements) -> impl Strategy<Value = HostArray> {
    let size: usize = shape.iter().product();
    vec(elements(dtype, opts), size)
        .prop_map(move |data| HostArray::new(dtype, shape.clone(), data))
}

/// Generate host arrays whose dtype and shape are drawn from the given
/// strategies.
pub fn arrays(
    dtype: impl Strategy<Value = DType>,
    shape: impl Strategy<Value = Shape>,
    opts: Elements,
) -> impl Strategy<Value = HostArray> {
    (dtype, shape).prop_flat_map(move |(dtype, shape)| array_of(dtype, shape, opts))
}

/// Generate `num_shapes` shapes which can be broadcast together.
///
/// A result shape is drawn first. Each input shape is derived from it by
/// dropping some leading dimensions and replacing some of the remaining ones
/// with 1.
pub fn mutually_broadcastable_shapes(
    num_shapes: usize,
    opts: ShapeOptions,
) -> impl Strategy<Value = Vec<Shape>> {
    shapes(opts).prop_flat_map(move |base| {
        let ndim = base.len();
        let input = (0..=ndim, vec(any::<bool>(), ndim)).prop_map(move |(dropped, ones)| {
            (dropped..ndim)
                .map(|dim| if ones[dim] { 1 } else { base[dim] })
                .collect::<Shape>()
        });
        vec(input, num_shapes)
    })
}

/// Generate pairs of dtypes from `catalog` that can be promoted together.
///
/// Returns `None` if the catalog contains no such pairs.
pub fn mutually_promotable_dtypes(
    catalog: &[DType],
) -> Option<impl Strategy<Value = (DType, DType)>> {
    let pairs = promotable_pairs(catalog);
    (!pairs.is_empty()).then(|| prop::sample::select(pairs))
}

/// Generate keyword arguments for argmax and argmin on an array with `ndim`
/// dimensions.
///
/// An integer axis is only generated for arrays with at least one dimension.
pub fn reduce_kwargs(ndim: usize) -> impl Strategy<Value = ReduceKwargs> {
    let axis = if ndim == 0 {
        Just(None).boxed()
    } else {
        let n = ndim as isize;
        prop_oneof![Just(None), (-n..n).prop_map(Some)].boxed()
    };
    (axis, prop::option::of(any::<bool>()))
        .prop_map(|(axis, keepdims)| ReduceKwargs { axis, keepdims })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        array_of, arrays, dtypes, elements, mutually_broadcastable_shapes,
        mutually_promotable_dtypes, reduce_kwargs, shapes, Elements, HostArray, ReduceKwargs,
        ShapeOptions, MAX_ARRAY_SIZE,
    };
    use crate::dtype::{promote_types, DType, Scalar};
    use crate::shape::{broadcast_shapes, Shape};

    #[test]
    fn test_host_array_debug() {
        let x = HostArray::new(
            DType::Int32,
            Shape::from_slice(&[2]),
            vec![Scalar::Int(1), Scalar::Int(-2)],
        );
        assert_eq!(format!("{:?}", x), "asarray([1, -2], shape=[2], dtype=int32)");
    }

    #[test]
    fn test_reduce_kwargs_display() {
        let kw = ReduceKwargs {
            axis: Some(-1),
            keepdims: Some(true),
        };
        assert_eq!(kw.to_string(), "axis=-1, keepdims=true");
        assert_eq!(ReduceKwargs::default().to_string(), "");
        assert!(!ReduceKwargs::default().keepdims());
    }

    #[test]
    fn test_no_promotable_dtypes() {
        assert!(mutually_promotable_dtypes(&[]).is_none());
        assert!(mutually_promotable_dtypes(&[DType::Int64, DType::UInt64]).is_some());
    }

    proptest! {
        #[test]
        fn prop_shapes_respect_options(shape in shapes(ShapeOptions::default().min_side(1))) {
            prop_assert!(shape.len() <= 4);
            prop_assert!(shape.iter().all(|&side| (1..=5).contains(&side)));
            prop_assert!(shape.iter().product::<usize>() <= MAX_ARRAY_SIZE);
        }

        #[test]
        fn prop_arrays_fill_shape(x in arrays(dtypes(DType::ALL.to_vec()), shapes(ShapeOptions::default()), Elements::default())) {
            prop_assert_eq!(x.data.len(), x.shape.iter().product::<usize>());
            prop_assert!(x.data.iter().all(|&value| x.dtype.can_hold(value)));
        }

        #[test]
        fn prop_elements_exclude_nan(value in elements(DType::Float32, Elements { allow_nan: false })) {
            prop_assert!(!value.is_nan());
            prop_assert!(DType::Float32.can_hold(value));
        }

        #[test]
        fn prop_array_of_has_fixed_dtype(x in array_of(DType::UInt8, Shape::from_slice(&[3, 2]), Elements::default())) {
            prop_assert_eq!(x.dtype, DType::UInt8);
            prop_assert_eq!(x.data.len(), 6);
        }

        #[test]
        fn prop_shapes_are_mutually_broadcastable(shape_list in mutually_broadcastable_shapes(3, ShapeOptions::default().min_side(1))) {
            prop_assert_eq!(shape_list.len(), 3);
            let slices: Vec<&[usize]> = shape_list.iter().map(|s| s.as_slice()).collect();
            prop_assert!(broadcast_shapes(&slices).is_ok());
        }

        #[test]
        fn prop_dtypes_are_promotable((a, b) in mutually_promotable_dtypes(&DType::ALL).unwrap()) {
            prop_assert!(promote_types(a, b).is_some());
        }

        #[test]
        fn prop_reduce_kwargs_axis_in_range((ndim, kw) in (0usize..5).prop_flat_map(|ndim| (Just(ndim), reduce_kwargs(ndim)))) {
            if let Some(axis) = kw.axis {
                prop_assert!(ndim > 0);
                prop_assert!((-(ndim as isize)..ndim as isize).contains(&axis));
            }
        }
    }
}
