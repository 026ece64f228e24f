use super::schema::Config;

/// Highest precision accepted for rounded results.
pub const MAX_PRECISION: u32 = 12;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(precision) = config.output.precision {
        if precision > MAX_PRECISION {
            errors.push(format!(
                "output.precision: must be at most {}, got {}",
                MAX_PRECISION, precision
            ));
        }
    }

    if let Some(ref dir) = config.output.results_dir {
        if dir.as_os_str().is_empty() {
            errors.push("output.results_dir: must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        let config = Config {
            output: OutputConfig {
                precision: Some(2),
                results_dir: Some(PathBuf::from("results")),
            },
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_precision_too_high() {
        let config = Config {
            output: OutputConfig {
                precision: Some(20),
                results_dir: None,
            },
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("output.precision"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            output: OutputConfig {
                precision: Some(20),               // Error 1
                results_dir: Some(PathBuf::new()), // Error 2
            },
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
