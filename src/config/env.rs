//! Environment-variable overlay
//!
//! Applied after merging and before the effective configuration reaches the
//! caller. Recognized variables:
//!
//! | Variable | Effect |
//! |---|---|
//! | `NOVA_APP__ENVIRONMENT` | Deployment-mode tag (`dev`/`prod`/`test`) |
//! | `NOVA_CONFIG__STRICT` | `true` promotes unknown-key warnings to errors |
//! | `NOVA_DATA_HOME` | Data root override, consumed by path resolution |
//!
//! Unknown `NOVA_*` variables are ignored.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::merge::EffectiveConfig;
use crate::error::{ConfigError, ConfigResult};

const ENVIRONMENT_VAR: &str = "NOVA_APP__ENVIRONMENT";
const STRICT_VAR: &str = "NOVA_CONFIG__STRICT";

/// Deployment-mode tag; affects logging defaults downstream, never merge
/// behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployEnvironment {
    Dev,
    Prod,
    Test,
}

impl FromStr for DeployEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            "test" => Ok(Self::Test),
            other => Err(format!(
                "unknown environment '{other}' (expected dev, prod, or test)"
            )),
        }
    }
}

/// Apply overrides from the process environment.
pub fn apply_env_overlay(config: &mut EffectiveConfig) -> ConfigResult<()> {
    apply_overlay(config, |name| std::env::var(name).ok())
}

/// Apply overrides from an arbitrary lookup. Split out so tests avoid
/// process-global environment mutation.
pub fn apply_overlay<F>(config: &mut EffectiveConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENVIRONMENT_VAR) {
        let environment =
            value
                .parse::<DeployEnvironment>()
                .map_err(|message| ConfigError::InvalidEnv {
                    variable: ENVIRONMENT_VAR.to_string(),
                    message,
                })?;
        config.environment = Some(environment);
    }

    if let Some(value) = lookup(STRICT_VAR) {
        config.strict = parse_bool(&value).ok_or_else(|| ConfigError::InvalidEnv {
            variable: STRICT_VAR.to_string(),
            message: format!("expected true or false, got '{value}'"),
        })?;
    }

    if config.strict {
        if let Some(warning) = config.warnings.first() {
            return Err(ConfigError::Validation {
                scope: warning.scope,
                path: warning.path.clone(),
                field: Some(warning.key.clone()),
                message: format!("unknown key '{}' (strict mode)", warning.key),
            });
        }
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::reader::ConfigWarning;
    use crate::config::scope::Scope;

    fn empty_config() -> EffectiveConfig {
        EffectiveConfig {
            marketplaces: Vec::new(),
            logging: None,
            environment: None,
            strict: false,
            extra: serde_yaml::Mapping::new(),
            warnings: Vec::new(),
        }
    }

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_environment_tag_applied() {
        let mut config = empty_config();
        apply_overlay(&mut config, lookup_from(&[("NOVA_APP__ENVIRONMENT", "prod")]))
            .expect("overlay");
        assert_eq!(config.environment, Some(DeployEnvironment::Prod));
    }

    #[test]
    fn test_invalid_environment_rejected() {
        let mut config = empty_config();
        let err = apply_overlay(
            &mut config,
            lookup_from(&[("NOVA_APP__ENVIRONMENT", "staging")]),
        )
        .unwrap_err();
        match err {
            ConfigError::InvalidEnv { variable, message } => {
                assert_eq!(variable, "NOVA_APP__ENVIRONMENT");
                assert!(message.contains("staging"));
            }
            other => panic!("expected InvalidEnv, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let mut config = empty_config();
        config.warnings.push(ConfigWarning {
            scope: Scope::Global,
            path: "/cfg/config.yaml".to_string(),
            key: "telemetry".to_string(),
        });

        // Without strict, warnings pass through
        apply_overlay(&mut config, lookup_from(&[])).expect("overlay");

        let err = apply_overlay(&mut config, lookup_from(&[("NOVA_CONFIG__STRICT", "true")]))
            .unwrap_err();
        match err {
            ConfigError::Validation { field, .. } => {
                assert_eq!(field.as_deref(), Some("telemetry"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_strict_value_rejected() {
        let mut config = empty_config();
        let err = apply_overlay(&mut config, lookup_from(&[("NOVA_CONFIG__STRICT", "banana")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_unrecognized_nova_vars_ignored() {
        let mut config = empty_config();
        apply_overlay(
            &mut config,
            lookup_from(&[("NOVA_FUTURE__FLAG", "whatever")]),
        )
        .expect("unknown NOVA_* vars are not an error");
        assert_eq!(config.environment, None);
        assert!(!config.strict);
    }
}
