use autofin_core::CalculatorConfig;

use crate::input::file::read_document;

/// Calculator constants from `--config`, or the built-in defaults.
/// Sections left out of the file keep their defaults.
pub fn load(path: Option<&str>) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(CalculatorConfig::default());
    };

    let config: CalculatorConfig = read_document(path)?;
    config.validate()?;

    tracing::debug!(path, "loaded calculator config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::fs;

    #[test]
    fn test_no_path_gives_defaults() {
        assert_eq!(load(None).unwrap(), CalculatorConfig::default());
    }

    #[test]
    fn test_yaml_override() {
        let path = std::env::temp_dir().join("autofin-config-test.yaml");
        fs::write(&path, "valuation:\n  base_value: \"650000\"\nloan:\n  term_months: 48\n")
            .unwrap();
        let config = load(path.to_str()).unwrap();
        assert_eq!(config.valuation.base_value, Decimal::from(650_000));
        assert_eq!(config.loan.term_months, 48);
        assert_eq!(config.fuel, CalculatorConfig::default().fuel);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let path = std::env::temp_dir().join("autofin-config-invalid.json");
        fs::write(&path, r#"{ "valuation": { "trade_in_ratio": "1.5" } }"#).unwrap();
        assert!(load(path.to_str()).is_err());
        let _ = fs::remove_file(path);
    }
}
