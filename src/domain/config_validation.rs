//! Configuration validation.
//!
//! Validates config fields before a simulation runs.

use crate::domain::distribution::{DistributionKind, EstimationMode};
use crate::domain::error::StocksimError;
use crate::ports::config_port::ConfigPort;

pub const MAX_PATHS: usize = 1000;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    validate_data_source(config)?;
    validate_estimation_mode(config)?;
    validate_distribution(config)?;
    validate_paths(config)?;
    validate_seed(config)?;
    validate_chart_size(config)?;
    Ok(())
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "bundled".to_string());
    match source.trim().to_lowercase().as_str() {
        "bundled" => Ok(()),
        "csv" => match config.get_string("data", "csv_dir") {
            Some(dir) if !dir.trim().is_empty() => Ok(()),
            _ => Err(StocksimError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            }),
        },
        other => Err(StocksimError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: format!("unknown source '{}', expected bundled or csv", other),
        }),
    }
}

fn validate_estimation_mode(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    if let Some(mode) = config.get_string("simulation", "estimation_mode") {
        mode.parse::<EstimationMode>()
            .map_err(|reason| StocksimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "estimation_mode".to_string(),
                reason,
            })?;
    }
    Ok(())
}

fn validate_distribution(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    if let Some(name) = config.get_string("simulation", "distribution") {
        name.parse::<DistributionKind>()
            .map_err(|e| StocksimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "distribution".to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

fn validate_paths(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    let paths = int_setting(config, "simulation", "paths")?.unwrap_or(1);
    if !(1..=MAX_PATHS as i64).contains(&paths) {
        return Err(StocksimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "paths".to_string(),
            reason: format!("paths must be between 1 and {}", MAX_PATHS),
        });
    }
    Ok(())
}

/// `get_int` falls back to its default on garbage, so integer keys are
/// checked from the raw string here.
fn int_setting(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<i64>, StocksimError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| StocksimError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("expected an integer, got '{}'", raw),
            }),
    }
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    if let Some(seed) = config.get_string("simulation", "seed") {
        seed.trim()
            .parse::<u64>()
            .map_err(|_| StocksimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: "seed".to_string(),
                reason: "seed must be a non-negative integer".to_string(),
            })?;
    }
    Ok(())
}

fn validate_chart_size(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    for key in ["width", "height"] {
        let value = int_setting(config, "chart", key)?.unwrap_or(400);
        if !(100..=10_000).contains(&value) {
            return Err(StocksimError::ConfigInvalid {
                section: "chart".to_string(),
                key: key.to_string(),
                reason: format!("{} must be between 100 and 10000", key),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid(content: &str, expected_key: &str) {
        match validate_config(&config(content)) {
            Err(StocksimError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        assert!(validate_config(&config("")).is_ok());
    }

    #[test]
    fn full_config_is_valid() {
        let content = r#"
[data]
source = csv
csv_dir = data

[simulation]
estimation_mode = price_level
distribution = lognormal
paths = 10
seed = 42

[chart]
output = out.svg
width = 800
height = 400
"#;
        assert!(validate_config(&config(content)).is_ok());
    }

    #[test]
    fn csv_source_requires_dir() {
        match validate_config(&config("[data]\nsource = csv\n")) {
            Err(StocksimError::ConfigMissing { section, key }) => {
                assert_eq!(section, "data");
                assert_eq!(key, "csv_dir");
            }
            other => panic!("expected ConfigMissing, got {other:?}"),
        }
    }

    #[test]
    fn unknown_source_rejected() {
        assert_invalid("[data]\nsource = http\n", "source");
    }

    #[test]
    fn unknown_mode_rejected() {
        assert_invalid("[simulation]\nestimation_mode = garch\n", "estimation_mode");
    }

    #[test]
    fn unknown_distribution_rejected() {
        assert_invalid("[simulation]\ndistribution = poisson\n", "distribution");
    }

    #[test]
    fn paths_out_of_range_rejected() {
        assert_invalid("[simulation]\npaths = 0\n", "paths");
        assert_invalid("[simulation]\npaths = 5000\n", "paths");
    }

    #[test]
    fn bad_seed_rejected() {
        assert_invalid("[simulation]\nseed = -3\n", "seed");
    }

    #[test]
    fn non_integer_values_rejected() {
        assert_invalid("[simulation]\npaths = abc\n", "paths");
        assert_invalid("[chart]\nwidth = wide\n", "width");
        assert_invalid("[chart]\nheight = 4.5\n", "height");
    }

    #[test]
    fn tiny_chart_rejected() {
        assert_invalid("[chart]\nwidth = 10\n", "width");
    }
}
