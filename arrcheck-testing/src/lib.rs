//! Internal testing utilities for the arrcheck crates.

use std::any::Any;
use std::fmt::{self, Debug};
use std::panic::{RefUnwindSafe, UnwindSafe};

/// A test case which panicked.
struct Failure {
    /// Position of the case in the collection.
    index: usize,

    /// Debug representation of the case.
    case: String,

    /// Message from the panic payload, if it was a string.
    message: Option<String>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "case {}: {}", self.index, self.case)?;
        if let Some(message) = &self.message {
            write!(f, "\n    {}", message)?;
        }
        Ok(())
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> Option<String> {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        Some(msg.to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}

fn report(failures: Vec<Failure>, total: usize) {
    if failures.is_empty() {
        return;
    }
    let details: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
    panic!(
        "{} of {} test cases failed:\n{}",
        failures.len(),
        total,
        details.join("\n")
    );
}

/// Utility for creating table-driven tests.
///
/// Create a `Debug` struct, conventionally named `Case`, holding the data for
/// one test case, put the cases in a collection and call `test_each` with the
/// test function. Every case is run, even if an earlier one panics. If any
/// case panicked, `test_each` then panics with the position, debug
/// representation and panic message of each failing case.
///
/// ```
/// use arrcheck_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     shape: Vec<usize>,
///     size: usize,
/// }
///
/// let cases = [
///     Case { shape: vec![], size: 1 },
///     Case { shape: vec![2, 3], size: 6 },
///     Case { shape: vec![4, 0], size: 0 },
/// ];
///
/// cases.test_each(|case| {
///     assert_eq!(case.shape.iter().product::<usize>(), case.size);
/// });
/// ```
///
/// The test function and the cases must be unwind safe. Fields which are not
/// can be wrapped in [`AssertUnwindSafe`](std::panic::AssertUnwindSafe).
pub trait TestCases {
    type Case;

    /// Call `test` with a reference to each case.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Call `test` with each case by value.
    fn test_each_value(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe;
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let mut failures = Vec::new();
        let mut total = 0;
        for (index, case) in self.into_iter().enumerate() {
            total += 1;
            if let Err(payload) = std::panic::catch_unwind(|| test(&case)) {
                failures.push(Failure {
                    index,
                    case: format!("{:?}", case),
                    message: panic_message(payload),
                });
            }
        }
        report(failures, total);
    }

    fn test_each_value(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe,
    {
        let mut failures = Vec::new();
        let mut total = 0;
        for (index, case) in self.into_iter().enumerate() {
            total += 1;
            let case_str = format!("{:?}", case);
            let test = &test;
            if let Err(payload) = std::panic::catch_unwind(move || test(case)) {
                failures.push(Failure {
                    index,
                    case: case_str,
                    message: panic_message(payload),
                });
            }
        }
        report(failures, total);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::catch_unwind;

    use super::{panic_message, TestCases};

    #[derive(Clone, Debug)]
    struct Case {
        x: i32,
    }

    #[test]
    fn test_all_cases_pass() {
        let cases = [Case { x: 1 }, Case { x: 2 }];
        cases.clone().test_each(|case| assert!(case.x > 0));
        cases.to_vec().test_each_value(|case| assert!(case.x > 0));
    }

    #[test]
    fn test_failures_are_reported() {
        let result = catch_unwind(|| {
            let cases = [Case { x: 1 }, Case { x: -2 }, Case { x: 3 }, Case { x: -4 }];
            cases.test_each(|case| assert!(case.x > 0, "x={} is negative", case.x));
        });
        let message = panic_message(result.unwrap_err()).unwrap();
        assert!(message.starts_with("2 of 4 test cases failed"));
        assert!(message.contains("case 1: Case { x: -2 }\n    x=-2 is negative"));
        assert!(message.contains("case 3: Case { x: -4 }\n    x=-4 is negative"));
    }

    #[test]
    fn test_failures_by_value() {
        let result = catch_unwind(|| {
            vec![Case { x: 0 }].test_each_value(|case| assert_eq!(case.x, 1));
        });
        let message = panic_message(result.unwrap_err()).unwrap();
        assert!(message.starts_with("1 of 1 test cases failed"));
        assert!(message.contains("case 0: Case { x: 0 }"));
    }
}
