//! A small reference implementation of an array namespace.
//!
//! [`RefNamespace`] implements the functions checked by
//! [arrcheck](arrcheck) on a simple strided array type. It is used to test the
//! suite itself and serves as the default target of the `arrcheck` CLI.
//!
//! ```
//! use arrcheck::{run_suite, SuiteConfig};
//! use arrcheck_ref::RefNamespace;
//!
//! let config = SuiteConfig {
//!     cases: 10,
//!     seed: Some(1234),
//!     ..SuiteConfig::default()
//! };
//! let report = run_suite(&RefNamespace::new(), &config);
//! assert!(report.all_passed(), "{}", report);
//! ```

mod array;
mod layout;
mod namespace;
pub mod ops;
mod storage;

pub use array::RefArray;
pub use layout::Layout;
pub use namespace::RefNamespace;
pub use storage::{Element, Storage};
