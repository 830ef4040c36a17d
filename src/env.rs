use std::str::FromStr;

/// Parse a boolean variable value. Unrecognized values are false.
pub fn str_as_bool(s: &str) -> bool {
    match s {
        "1" | "true" | "t" | "yes" | "y" => true,
        "0" | "false" | "f" | "no" | "n" => false,
        _ => {
            tracing::warn!("Unrecognized boolean value \"{}\"", s);
            false
        }
    }
}

/// Source of configuration variables, usually [`std::env::var`].
pub type VarLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Return whether the boolean flag `name` is set, or `default` if it is
/// unset.
pub fn flag_var(vars: VarLookup, name: &str, default: bool) -> bool {
    vars(name).map(|s| str_as_bool(&s)).unwrap_or(default)
}

/// Parse the variable `name`, returning `None` if it is unset or invalid.
pub fn parsed_var<T: FromStr>(vars: VarLookup, name: &str) -> Option<T> {
    let value = vars(name)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring invalid value \"{}\" for {}", value, name);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{flag_var, parsed_var, str_as_bool};

    #[test]
    fn test_str_as_bool() {
        for s in ["1", "true", "t", "yes", "y"] {
            assert!(str_as_bool(s));
        }
        for s in ["0", "false", "f", "no", "n", "maybe"] {
            assert!(!str_as_bool(s));
        }
    }

    #[test]
    fn test_vars() {
        let vars = |name: &str| match name {
            "ON" => Some("yes".to_string()),
            "COUNT" => Some("12".to_string()),
            "BAD" => Some("twelve".to_string()),
            _ => None,
        };

        assert!(flag_var(&vars, "ON", false));
        assert!(flag_var(&vars, "UNSET", true));
        assert!(!flag_var(&vars, "UNSET", false));

        assert_eq!(parsed_var::<u32>(&vars, "COUNT"), Some(12));
        assert_eq!(parsed_var::<u32>(&vars, "BAD"), None);
        assert_eq!(parsed_var::<u32>(&vars, "UNSET"), None);
    }
}
