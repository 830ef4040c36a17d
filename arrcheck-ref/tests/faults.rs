//! Runs the checks against namespaces with deliberate conformance bugs, to
//! verify that every check detects them.

use arrcheck::searching::{check_argmax, check_nonzero, check_where, CheckError};
use arrcheck::strategies::{HostArray, ReduceKwargs};
use arrcheck::{
    run_check, ArrayNamespace, ArrayObject, Check, DType, NamespaceError, Scalar, Shape, Status,
    SuiteConfig,
};
use arrcheck_ref::{RefArray, RefNamespace, Storage};
use arrcheck_testing::TestCases;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Fault {
    /// argmax returns indices with an unsigned dtype.
    ArgmaxUnsignedIndex,

    /// argmax with no axis returns the last occurrence of the maximum.
    ArgmaxLastOccurrence,

    /// argmin ignores `keepdims`.
    ArgminDropsKeepdims,

    /// nonzero omits the last non-zero element.
    NonzeroDropsLast,

    /// nonzero returns an error for every input.
    NonzeroUnsupported,

    /// where selects from `x2` where the condition is true.
    WhereSwapped,

    /// The namespace does not support data-dependent output shapes.
    NoDataDependentShapes,
}

/// A reference namespace with one injected fault.
struct FaultyNamespace {
    inner: RefNamespace,
    fault: Fault,
}

impl FaultyNamespace {
    fn new(fault: Fault) -> FaultyNamespace {
        FaultyNamespace {
            inner: RefNamespace::new(),
            fault,
        }
    }
}

fn last_extremum(x: &RefArray) -> usize {
    let values = x.to_scalars();
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value >= values[best] {
            best = i;
        }
    }
    best
}

impl ArrayNamespace for FaultyNamespace {
    type Array = RefArray;

    fn name(&self) -> &str {
        "faulty"
    }

    fn dtypes(&self) -> &[DType] {
        self.inner.dtypes()
    }

    fn supports_data_dependent_shapes(&self) -> bool {
        self.fault != Fault::NoDataDependentShapes
    }

    fn asarray(
        &self,
        data: &[Scalar],
        shape: &[usize],
        dtype: DType,
    ) -> Result<RefArray, NamespaceError> {
        self.inner.asarray(data, shape, dtype)
    }

    fn argmax(
        &self,
        x: &RefArray,
        axis: Option<isize>,
        keepdims: bool,
    ) -> Result<RefArray, NamespaceError> {
        match self.fault {
            Fault::ArgmaxUnsignedIndex => self.inner.argmax(x, axis, keepdims)?.cast(DType::UInt64),
            Fault::ArgmaxLastOccurrence if axis.is_none() && !keepdims => {
                RefArray::from_storage(Storage::Int64(vec![last_extremum(x) as i64]), &[])
            }
            _ => self.inner.argmax(x, axis, keepdims),
        }
    }

    fn argmin(
        &self,
        x: &RefArray,
        axis: Option<isize>,
        keepdims: bool,
    ) -> Result<RefArray, NamespaceError> {
        match self.fault {
            Fault::ArgminDropsKeepdims => self.inner.argmin(x, axis, false),
            _ => self.inner.argmin(x, axis, keepdims),
        }
    }

    fn nonzero(&self, x: &RefArray) -> Result<Vec<RefArray>, NamespaceError> {
        match self.fault {
            Fault::NonzeroDropsLast => self
                .inner
                .nonzero(x)?
                .into_iter()
                .map(|coords| {
                    let mut coords = coords.to_vec::<i64>().unwrap_or_default();
                    coords.pop();
                    RefArray::from_vec(coords)
                })
                .map(Ok)
                .collect(),
            Fault::NonzeroUnsupported => Err(NamespaceError::InvalidValue(
                "nonzero is not implemented".into(),
            )),
            _ => self.inner.nonzero(x),
        }
    }

    fn where_(
        &self,
        cond: &RefArray,
        x1: &RefArray,
        x2: &RefArray,
    ) -> Result<RefArray, NamespaceError> {
        match self.fault {
            Fault::WhereSwapped => self.inner.where_(cond, x2, x1),
            _ => self.inner.where_(cond, x1, x2),
        }
    }

    fn broadcast_to(&self, x: &RefArray, shape: &[usize]) -> Result<RefArray, NamespaceError> {
        self.inner.broadcast_to(x, shape)
    }
}

fn config() -> SuiteConfig {
    SuiteConfig {
        cases: 100,
        seed: Some(1234),
        ..SuiteConfig::default()
    }
}

#[test]
fn test_checks_detect_faults() {
    #[derive(Debug)]
    struct Case {
        fault: Fault,
        check: Check,
        message: &'static str,
    }

    let cases = [
        Case {
            fault: Fault::ArgmaxUnsignedIndex,
            check: Check::Argmax,
            message: "out.dtype=uint64, should be the default index dtype",
        },
        Case {
            fault: Fault::ArgminDropsKeepdims,
            check: Check::Argmin,
            message: "keepdims=true",
        },
        Case {
            fault: Fault::NonzeroDropsLast,
            check: Check::Nonzero,
            message: "non-zero elements",
        },
        Case {
            fault: Fault::NonzeroUnsupported,
            check: Check::Nonzero,
            message: "nonzero() raised an error for valid input",
        },
        Case {
            fault: Fault::WhereSwapped,
            check: Check::Where,
            message: "should be _x",
        },
    ];

    cases.test_each(|case| {
        let ns = FaultyNamespace::new(case.fault);
        let outcome = run_check(&ns, case.check, &config(), 1234);
        match &outcome.status {
            Status::Failed {
                message,
                counterexample,
            } => {
                assert!(
                    message.contains(case.message),
                    "unexpected message {}",
                    message
                );
                assert!(!counterexample.is_empty());
            }
            status => panic!("expected failure, got {:?}", status),
        }
    })
}

#[test]
fn test_unaffected_checks_pass() {
    let ns = FaultyNamespace::new(Fault::WhereSwapped);
    for check in [Check::Argmax, Check::Argmin, Check::Nonzero] {
        let outcome = run_check(&ns, check, &config(), 99);
        assert_eq!(outcome.status, Status::Passed, "{}", check);
    }
}

#[test]
fn test_data_dependent_shapes_skipped() {
    let ns = FaultyNamespace::new(Fault::NoDataDependentShapes);
    let outcome = run_check(&ns, Check::Nonzero, &config(), 1);
    assert!(matches!(outcome.status, Status::Skipped { .. }));

    let ns = FaultyNamespace::new(Fault::NonzeroUnsupported);
    let config = SuiteConfig {
        data_dependent_shapes: false,
        ..config()
    };
    let outcome = run_check(&ns, Check::Nonzero, &config, 1);
    assert!(matches!(outcome.status, Status::Skipped { .. }));
}

#[test]
fn test_argmax_first_occurrence() {
    let ns = FaultyNamespace::new(Fault::ArgmaxLastOccurrence);
    let x = HostArray::new(
        DType::Int8,
        Shape::from_slice(&[3]),
        [3, 7, 7].map(Scalar::Int).to_vec(),
    );
    let err = check_argmax(&ns, &x, &ReduceKwargs::default()).unwrap_err();
    assert!(matches!(err, CheckError::Assertion(_)));
    assert_eq!(err.to_string(), "out[[]]=2, should be 1 [argmax()]");

    // Without ties the fault is not observable.
    let x = HostArray::new(
        DType::Int8,
        Shape::from_slice(&[3]),
        [3, 9, 7].map(Scalar::Int).to_vec(),
    );
    check_argmax(&ns, &x, &ReduceKwargs::default()).unwrap();
}

#[test]
fn test_nonzero_drops_last() {
    let ns = FaultyNamespace::new(Fault::NonzeroDropsLast);
    let x = HostArray::new(
        DType::Int32,
        Shape::from_slice(&[2, 2]),
        [0, 4, 5, 0].map(Scalar::Int).to_vec(),
    );
    let err = check_nonzero(&ns, &x).unwrap_err();
    assert_eq!(
        err.to_string(),
        "out[0].size=1, but x has 2 non-zero elements [nonzero()]"
    );
}

#[test]
fn test_where_swapped() {
    let ns = FaultyNamespace::new(Fault::WhereSwapped);
    let cond = HostArray::new(
        DType::Bool,
        Shape::from_slice(&[2]),
        vec![Scalar::Bool(true), Scalar::Bool(false)],
    );
    let x1 = HostArray::new(
        DType::Int64,
        Shape::from_slice(&[2]),
        [10, 20].map(Scalar::Int).to_vec(),
    );
    let x2 = HostArray::new(DType::Int64, Shape::new(), vec![Scalar::Int(1)]);
    let err = check_where(&ns, &cond, &x1, &x2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "out[[0]]=1, should be _x1[[0]] (10) [where()]"
    );

    let out = ns
        .where_(
            &ns.asarray(&cond.data, &cond.shape, cond.dtype).unwrap(),
            &ns.asarray(&x1.data, &x1.shape, x1.dtype).unwrap(),
            &ns.asarray(&x2.data, &x2.shape, x2.dtype).unwrap(),
        )
        .unwrap();
    assert_eq!(out.shape(), &[2]);
}
