//! Runtime configuration.
//!
//! Values come from the environment, after `dotenv` has loaded `.env`.

use crate::masking::NetBits;
use std::collections::HashMap;
use std::error::Error;

/// Default flow record file when neither argument nor environment name one.
pub const DEFAULT_INPUT: &str = "flows.json";

pub const ENV_INPUT: &str = "FLOWMASK_INPUT";
pub const ENV_AGGREGATE: &str = "FLOWMASK_AGGREGATE";
pub const ENV_NETBITS: &str = "FLOWMASK_NETBITS";
pub const ENV_OUTPUT: &str = "FLOWMASK_OUTPUT";

/// How masked records are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Flow record JSON file.
    pub input: String,
    /// Aggregation key list, e.g. `srcip4/24,dstport`.
    pub aggregate: Option<String>,
    /// Addresses to mask with the record's own prefix lengths.
    pub net_bits: NetBits,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: DEFAULT_INPUT.to_string(),
            aggregate: None,
            net_bits: NetBits::NONE,
            output: OutputFormat::Terminal,
        }
    }
}

/// Parse a net bits setting: `none`, `src`, `dst`, `both` or `0`..`3`.
pub fn parse_net_bits(value: &str) -> Result<NetBits, Box<dyn Error>> {
    match value.trim().to_lowercase().as_str() {
        "" | "none" => Ok(NetBits::NONE),
        "src" => Ok(NetBits::SRC),
        "dst" => Ok(NetBits::DST),
        "both" => Ok(NetBits::BOTH),
        other => {
            let bits: u8 = other
                .parse()
                .map_err(|_| format!("Invalid {ENV_NETBITS} value '{value}'"))?;
            NetBits::new(bits)
        }
    }
}

fn parse_output(value: &str) -> Result<OutputFormat, Box<dyn Error>> {
    match value.trim().to_lowercase().as_str() {
        "" | "terminal" => Ok(OutputFormat::Terminal),
        "csv" => Ok(OutputFormat::Csv),
        _ => Err(format!("Invalid {ENV_OUTPUT} value '{value}', expected csv|terminal").into()),
    }
}

impl Config {
    /// Build a config from key/value settings, unknown keys are ignored.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Config, Box<dyn Error>> {
        let mut config = Config::default();
        if let Some(input) = vars.get(ENV_INPUT).filter(|v| !v.trim().is_empty()) {
            config.input = input.trim().to_string();
        }
        config.aggregate = vars
            .get(ENV_AGGREGATE)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if let Some(net_bits) = vars.get(ENV_NETBITS) {
            config.net_bits = parse_net_bits(net_bits)?;
        }
        if let Some(output) = vars.get(ENV_OUTPUT) {
            config.output = parse_output(output)?;
        }
        Ok(config)
    }

    /// Build a config from the process environment.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("FLOWMASK_"))
            .collect();
        let config = Config::from_vars(&vars)?;
        log::debug!("config from env: {config:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.input, DEFAULT_INPUT);
    }

    #[test]
    fn test_from_vars() {
        let config = Config::from_vars(&vars(&[
            (ENV_INPUT, "src/tests/test_data/flows_01.json"),
            (ENV_AGGREGATE, " srcnet,dstport "),
            (ENV_NETBITS, "Both"),
            (ENV_OUTPUT, "CSV"),
        ]))
        .unwrap();
        assert_eq!(config.input, "src/tests/test_data/flows_01.json");
        assert_eq!(config.aggregate.as_deref(), Some("srcnet,dstport"));
        assert_eq!(config.net_bits, NetBits::BOTH);
        assert_eq!(config.output, OutputFormat::Csv);
    }

    #[test]
    fn test_parse_net_bits() {
        assert_eq!(parse_net_bits("none").unwrap(), NetBits::NONE);
        assert_eq!(parse_net_bits("src").unwrap(), NetBits::SRC);
        assert_eq!(parse_net_bits("2").unwrap(), NetBits::DST);
        assert!(parse_net_bits("4").is_err());
        assert!(parse_net_bits("sideways").is_err());
    }

    #[test]
    fn test_invalid_output() {
        assert!(Config::from_vars(&vars(&[(ENV_OUTPUT, "xml")])).is_err());
        let config = Config::from_vars(&vars(&[(ENV_AGGREGATE, "  ")])).unwrap();
        assert!(config.aggregate.is_none());
    }
}
