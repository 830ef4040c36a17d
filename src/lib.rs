//! arrcheck is a property-based conformance suite for the searching functions
//! of array libraries: `argmax`, `argmin`, `nonzero` and `where`.
//!
//! # Checking a library
//!
//! The library under test is adapted to the suite by implementing
//! [`ArrayNamespace`] and [`ArrayObject`]. The namespace declares which
//! [dtypes](DType) it supports and exposes the functions under test. Arrays
//! are only ever inspected through their shape, dtype and individual
//! elements, so any storage layout will do.
//!
//! The workflow is:
//!
//! 1. Implement [`ArrayNamespace`] for the library.
//! 2. Build a [`SuiteConfig`], usually with [`SuiteConfig::from_env`].
//! 3. Call [`run_suite`] and inspect the returned [`Report`].
//!
//! ```no_run
//! # fn check<N: arrcheck::ArrayNamespace>(ns: &N) {
//! use arrcheck::{run_suite, SuiteConfig};
//!
//! let report = run_suite(ns, &SuiteConfig::from_env());
//! println!("{}", report);
//! assert!(report.all_passed());
//! # }
//! ```
//!
//! For each check the suite generates random inputs using
//! [proptest](https://docs.rs/proptest), calls the function under test and
//! compares the output against a value computed by scanning the input element
//! by element. When an input fails, proptest shrinks it to a minimal
//! counterexample which is included in the report.
//!
//! The individual checks in [`searching`] can also be called directly from a
//! library's own proptest tests, using the input strategies defined alongside
//! them.
//!
//! # Configuration
//!
//! [`SuiteConfig::from_env`] reads these environment variables
//! ([`SuiteConfig::from_lookup`] reads them from another source):
//!
//! - `ARRCHECK_MAX_EXAMPLES`: number of inputs generated per check (default 100)
//! - `ARRCHECK_MAX_SHRINK_ITERS`: limit on shrinking steps (default 4096)
//! - `ARRCHECK_SEED`: seed for input generation, for reproducing a run
//! - `ARRCHECK_FILTER`: only run checks whose name contains this substring
//! - `ARRCHECK_DISABLE_DATA_DEPENDENT_SHAPES`: skip `nonzero`
//!
//! # Crate features
//!
//! - **serde** - Implement `serde::Serialize` for [`Report`] and [`DType`]

pub mod assertions;
pub mod axis;
pub mod dtype;
pub mod env;
pub mod index;
pub mod namespace;
pub mod runner;
pub mod searching;
pub mod shape;
pub mod strategies;

pub use dtype::{promote_types, DType, Scalar};
pub use namespace::{ArrayNamespace, ArrayObject, NamespaceError};
pub use runner::{run_check, run_suite, Check, CheckOutcome, Report, Status, SuiteConfig};
pub use searching::CheckError;
pub use shape::Shape;
