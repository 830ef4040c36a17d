//! Drives the checks with proptest's test runner and collects a report.

use std::fmt;

use proptest::strategy::Strategy;
use proptest::test_runner::{
    Config, RngAlgorithm, TestCaseError, TestError, TestRng, TestRunner,
};

use crate::env::{flag_var, parsed_var, process_env, VarLookup};
use crate::namespace::ArrayNamespace;
use crate::searching::{
    arg_reduction_inputs, check_arg_reduction, check_nonzero, check_where, nonzero_inputs,
    where_inputs, ArgReduction, CheckError,
};

/// A property check in the suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Check {
    Argmax,
    Argmin,
    Nonzero,
    Where,
}

impl Check {
    pub const ALL: [Check; 4] = [Check::Argmax, Check::Argmin, Check::Nonzero, Check::Where];

    /// Name of the function this check exercises.
    pub fn name(self) -> &'static str {
        match self {
            Check::Argmax => "argmax",
            Check::Argmin => "argmin",
            Check::Nonzero => "nonzero",
            Check::Where => "where",
        }
    }

    /// Name of the check as a test, eg. "test_argmax".
    pub fn test_name(self) -> String {
        format!("test_{}", self.name())
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.test_name())
    }
}

/// Configuration for a run of the suite.
#[derive(Clone, Debug, PartialEq)]
pub struct SuiteConfig {
    /// Number of generated inputs per check.
    pub cases: u32,

    /// Maximum number of steps proptest takes to shrink a failing input.
    pub max_shrink_iters: u32,

    /// Seed for input generation. A random seed is chosen if this is `None`.
    pub seed: Option<u64>,

    /// Only run checks whose test name contains this substring.
    pub filter: Option<String>,

    /// Run checks of functions whose output shape depends on input values.
    pub data_dependent_shapes: bool,
}

impl Default for SuiteConfig {
    fn default() -> SuiteConfig {
        SuiteConfig {
            cases: 100,
            max_shrink_iters: 4096,
            seed: None,
            filter: None,
            data_dependent_shapes: true,
        }
    }
}

impl SuiteConfig {
    /// Create a config from the default values, overridden by the
    /// `ARRCHECK_*` environment variables.
    pub fn from_env() -> SuiteConfig {
        SuiteConfig::from_lookup(&process_env)
    }

    /// Create a config from the default values, overridden by the
    /// `ARRCHECK_*` variables returned by `vars`. Unset and invalid
    /// values keep their defaults.
    pub fn from_lookup(vars: VarLookup) -> SuiteConfig {
        let defaults = SuiteConfig::default();
        SuiteConfig {
            cases: parsed_var(vars, "ARRCHECK_MAX_EXAMPLES").unwrap_or(defaults.cases),
            max_shrink_iters: parsed_var(vars, "ARRCHECK_MAX_SHRINK_ITERS")
                .unwrap_or(defaults.max_shrink_iters),
            seed: parsed_var(vars, "ARRCHECK_SEED"),
            filter: vars("ARRCHECK_FILTER").filter(|filter| !filter.is_empty()),
            data_dependent_shapes: !flag_var(vars, "ARRCHECK_DISABLE_DATA_DEPENDENT_SHAPES", false),
        }
    }

    /// Return true if `check` is selected by the filter.
    pub fn selects(&self, check: Check) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |filter| check.test_name().contains(filter))
    }

    fn runner_config(&self) -> Config {
        let mut config = Config::with_cases(self.cases);
        config.max_shrink_iters = self.max_shrink_iters;
        config.failure_persistence = None;
        config
    }
}

/// Result of running a single check.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "lowercase"))]
pub enum Status {
    Passed,

    /// The check found an input for which the namespace does not conform.
    Failed {
        /// Description of the mismatch.
        message: String,

        /// The minimal failing input found by shrinking.
        counterexample: String,
    },

    /// The check was not run.
    Skipped { reason: String },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CheckOutcome {
    pub check: Check,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub status: Status,
}

/// Outcomes of a run of the suite against one namespace.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    pub namespace: String,

    /// Seed used for input generation. Passing this seed in the config
    /// reproduces the run.
    pub seed: u64,

    pub outcomes: Vec<CheckOutcome>,
}

impl Report {
    /// Return true if no check failed. Skipped checks do not count as
    /// failures.
    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Return the outcomes of failed checks.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, Status::Failed { .. }))
    }

    /// Return the outcome for `check`, if it was part of the run.
    pub fn outcome(&self, check: Check) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|outcome| outcome.check == check)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mut passed, mut failed, mut skipped) = (0, 0, 0);
        for outcome in &self.outcomes {
            match &outcome.status {
                Status::Passed => {
                    passed += 1;
                    writeln!(f, "{} PASSED", outcome.check)?;
                }
                Status::Skipped { reason } => {
                    skipped += 1;
                    writeln!(f, "{} SKIPPED ({})", outcome.check, reason)?;
                }
                Status::Failed {
                    message,
                    counterexample,
                } => {
                    failed += 1;
                    writeln!(f, "{} FAILED", outcome.check)?;
                    writeln!(f, "    {}", message)?;
                    if !counterexample.is_empty() {
                        writeln!(f, "    Falsifying example: {}", counterexample)?;
                    }
                }
            }
        }
        write!(
            f,
            "{} passed, {} failed, {} skipped against {} (seed {})",
            passed, failed, skipped, self.namespace, self.seed
        )
    }
}

/// Create a proptest RNG from a 64-bit seed.
fn seeded_rng(seed: u64) -> TestRng {
    let mut rng = fastrand::Rng::with_seed(seed);
    let bytes: [u8; 32] = std::array::from_fn(|_| rng.u8(..));
    TestRng::from_seed(RngAlgorithm::ChaCha, &bytes)
}

/// Run `test` against inputs generated by `strategy`, shrinking the first
/// failing input.
fn run_property<S: Strategy>(
    config: &SuiteConfig,
    seed: u64,
    strategy: S,
    test: impl Fn(S::Value) -> Result<(), CheckError>,
) -> Status {
    let mut runner = TestRunner::new_with_rng(config.runner_config(), seeded_rng(seed));
    let result = runner.run(&strategy, |value| {
        test(value).map_err(|err| TestCaseError::fail(err.to_string()))
    });
    match result {
        Ok(()) => Status::Passed,
        Err(TestError::Fail(reason, value)) => Status::Failed {
            message: reason.to_string(),
            counterexample: format!("{:?}", value),
        },
        Err(TestError::Abort(reason)) => Status::Failed {
            message: format!("aborted: {}", reason),
            counterexample: String::new(),
        },
    }
}

fn skipped(reason: &str) -> Status {
    Status::Skipped {
        reason: reason.to_string(),
    }
}

/// Run a single check against `ns`, generating inputs from `seed`.
pub fn run_check<N: ArrayNamespace>(
    ns: &N,
    check: Check,
    config: &SuiteConfig,
    seed: u64,
) -> CheckOutcome {
    let catalog = ns.dtypes();
    let status = if !config.selects(check) {
        skipped("deselected")
    } else {
        match check {
            Check::Argmax | Check::Argmin => {
                let reduction = if check == Check::Argmax {
                    ArgReduction::Max
                } else {
                    ArgReduction::Min
                };
                match arg_reduction_inputs(catalog) {
                    Some(inputs) => run_property(config, seed, inputs, |(x, kw)| {
                        check_arg_reduction(ns, reduction, &x, &kw)
                    }),
                    None => skipped("namespace supports no numeric dtypes"),
                }
            }
            Check::Nonzero => {
                if !config.data_dependent_shapes || !ns.supports_data_dependent_shapes() {
                    skipped("data-dependent shapes are disabled")
                } else {
                    match nonzero_inputs(catalog) {
                        Some(inputs) => run_property(config, seed, inputs, |x| check_nonzero(ns, &x)),
                        None => skipped("namespace supports no dtypes"),
                    }
                }
            }
            Check::Where => match where_inputs(catalog) {
                Some(inputs) => run_property(config, seed, inputs, |(cond, x1, x2)| {
                    check_where(ns, &cond, &x1, &x2)
                }),
                None => skipped("namespace supports no bool dtype or no promotable dtype pairs"),
            },
        }
    };

    match &status {
        Status::Passed => tracing::info!(check = check.name(), "passed"),
        Status::Failed { message, .. } => {
            tracing::warn!(check = check.name(), message = message.as_str(), "failed")
        }
        Status::Skipped { reason } => {
            tracing::debug!(check = check.name(), reason = reason.as_str(), "skipped")
        }
    }

    CheckOutcome { check, status }
}

/// Run every check in the suite against `ns`.
pub fn run_suite<N: ArrayNamespace>(ns: &N, config: &SuiteConfig) -> Report {
    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    tracing::info!(
        namespace = ns.name(),
        seed,
        cases = config.cases,
        "running searching function checks"
    );

    let outcomes = Check::ALL
        .into_iter()
        .map(|check| run_check(ns, check, config, seed))
        .collect();

    Report {
        namespace: ns.name().to_string(),
        seed,
        outcomes,
    }
}
