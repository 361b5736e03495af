//! Tracing subscriber setup.
//!
//! Logs go to stderr so that `check` and `show` output stays machine
//! readable on stdout. `RUST_LOG` wins over `--verbose` when set.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "recipe_schemas=debug,recipe_schemas_cli=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "warn");
        assert!(default_filter(true).contains("recipe_schemas=debug"));
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
