use std::error::Error;
use std::ffi::OsString;
use std::process::ExitCode;

use arrcheck::{run_suite, DType, SuiteConfig};
use arrcheck_ref::RefNamespace;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct Args {
    /// Overrides for the config read from the environment.
    max_examples: Option<u32>,
    seed: Option<u64>,
    filter: Option<String>,
    disable_data_dependent_shapes: bool,

    /// Dtype of index outputs of the reference namespace.
    index_dtype: Option<DType>,

    /// Print the report as JSON instead of text.
    json: bool,

    verbose: bool,
}

impl Args {
    /// Apply the command line overrides to `config`.
    fn apply(&self, config: &mut SuiteConfig) {
        if let Some(cases) = self.max_examples {
            config.cases = cases;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(filter) = &self.filter {
            config.filter = Some(filter.clone());
        }
        if self.disable_data_dependent_shapes {
            config.data_dependent_shapes = false;
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = OsString>) -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_args(args);
    while let Some(arg) = parser.next()? {
        match arg {
            Short('n') | Long("max-examples") => {
                result.max_examples = Some(parser.value()?.parse()?);
            }
            Long("seed") => result.seed = Some(parser.value()?.parse()?),
            Short('k') => result.filter = Some(parser.value()?.string()?),
            Long("disable-data-dependent-shapes") => result.disable_data_dependent_shapes = true,
            Long("index-dtype") => {
                let name = parser.value()?.string()?;
                let dtype = DType::from_name(&name)
                    .ok_or_else(|| format!("unknown dtype \"{}\"", name))?;
                result.index_dtype = Some(dtype);
            }
            Long("json") => result.json = true,
            Short('v') | Long("verbose") => result.verbose = true,
            Short('h') | Long("help") => {
                println!(
                    "Run the searching function conformance checks.

Usage: {bin_name} [OPTIONS]

  -n, --max-examples <N>           Number of inputs generated per check
      --seed <SEED>                Seed for input generation
  -k <FILTER>                      Only run checks whose name contains FILTER
      --disable-data-dependent-shapes
                                   Skip checks of functions with data-dependent output shapes
      --index-dtype <DTYPE>        Index dtype of the reference namespace (int32 or int64)
      --json                       Print the report as JSON
  -v, --verbose                    Enable verbose logging
  -h, --help                       Print help

Options default to the values of the ARRCHECK_* environment variables.
",
                    bin_name = parser.bin_name().unwrap_or("arrcheck")
                );
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(result)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("ARRCHECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("arrcheck={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Runs the conformance checks against the bundled reference namespace.
///
/// ```
/// cargo run -p arrcheck-cli -- --seed 1234 -n 200
/// ```
///
/// Exits with status 1 if any check fails.
fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = parse_args(std::env::args_os().skip(1))?;
    init_logging(args.verbose);

    let mut config = SuiteConfig::from_env();
    args.apply(&mut config);

    let ns = match args.index_dtype {
        Some(dtype) => RefNamespace::with_index_dtype(dtype)?,
        None => RefNamespace::new(),
    };
    tracing::debug!(?config, index_dtype = %ns.index_dtype(), "starting run");

    let report = run_suite(&ns, &config);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use arrcheck::{DType, SuiteConfig};
    use arrcheck_testing::TestCases;

    use super::{parse_args, Args};

    fn args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_parse_args() {
        #[derive(Debug)]
        struct Case {
            args: Vec<OsString>,
            expected: Args,
        }

        let cases = [
            Case {
                args: args(&[]),
                expected: Args::default(),
            },
            Case {
                args: args(&["-n", "20", "--seed", "99", "-k", "argm"]),
                expected: Args {
                    max_examples: Some(20),
                    seed: Some(99),
                    filter: Some("argm".into()),
                    ..Args::default()
                },
            },
            Case {
                args: args(&[
                    "--disable-data-dependent-shapes",
                    "--index-dtype",
                    "int32",
                    "--json",
                    "-v",
                ]),
                expected: Args {
                    disable_data_dependent_shapes: true,
                    index_dtype: Some(DType::Int32),
                    json: true,
                    verbose: true,
                    ..Args::default()
                },
            },
        ];

        cases.test_each_value(|case| {
            assert_eq!(parse_args(case.args).unwrap(), case.expected);
        })
    }

    #[test]
    fn test_parse_args_invalid() {
        assert!(parse_args(args(&["--max-examples", "many"])).is_err());
        assert!(parse_args(args(&["--index-dtype", "int128"])).is_err());
        assert!(parse_args(args(&["model.onnx"])).is_err());
    }

    #[test]
    fn test_apply() {
        let mut config = SuiteConfig::default();
        let args = Args {
            max_examples: Some(5),
            seed: Some(3),
            disable_data_dependent_shapes: true,
            ..Args::default()
        };
        args.apply(&mut config);
        assert_eq!(config.cases, 5);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.filter, None);
        assert!(!config.data_dependent_shapes);
    }
}
