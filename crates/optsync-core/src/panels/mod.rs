//! Built-in panel schemas.
//!
//! Each panel owns a disjoint set of keys and is loaded and saved on its own.

pub mod model_ratio;
pub mod quota_reset;
pub mod system;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::PanelSchema;

pub use model_ratio::reset_model_ratio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    System,
    ModelRatio,
    QuotaReset,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown panel '{0}' (expected one of: system, model-ratio, quota-reset)")]
pub struct UnknownPanel(pub String);

impl PanelKind {
    pub const ALL: [Self; 3] = [Self::System, Self::ModelRatio, Self::QuotaReset];

    pub const fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::ModelRatio => "model-ratio",
            Self::QuotaReset => "quota-reset",
        }
    }

    pub fn schema(self) -> PanelSchema {
        match self {
            Self::System => system::schema(),
            Self::ModelRatio => model_ratio::schema(),
            Self::QuotaReset => quota_reset::schema(),
        }
    }

    /// The panel that declares `key`, if any.
    pub fn owning(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.schema().field(key).is_some())
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for PanelKind {
    type Err = UnknownPanel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownPanel(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{OptionEntry, OptionValue};

    #[test]
    fn builtin_schemas_are_valid() {
        for kind in PanelKind::ALL {
            let schema = kind.schema();
            assert_eq!(schema.name(), kind.name());
            assert!(
                PanelSchema::new(schema.name(), schema.fields().to_vec()).is_ok(),
                "{kind} schema is invalid"
            );
        }
    }

    #[test]
    fn panels_own_disjoint_keys() {
        let mut seen = HashSet::new();
        for kind in PanelKind::ALL {
            for key in kind.schema().keys() {
                assert!(seen.insert(key.to_string()), "{key} declared twice");
            }
        }
    }

    #[test]
    fn panel_names_parse_case_insensitively() {
        assert_eq!("Model-Ratio".parse::<PanelKind>(), Ok(PanelKind::ModelRatio));
        assert!("notification".parse::<PanelKind>().is_err());
    }

    #[test]
    fn owning_finds_the_declaring_panel() {
        assert_eq!(PanelKind::owning("SMTPToken"), Some(PanelKind::System));
        assert_eq!(
            PanelKind::owning("QuotaResetTime"),
            Some(PanelKind::QuotaReset)
        );
        assert_eq!(PanelKind::owning("nope"), None);
    }

    #[test]
    fn quota_reset_defaults_match_the_job_defaults() {
        let values = PanelKind::QuotaReset.schema().coerce(&[OptionEntry {
            key: "QuotaResetConcurrency".to_string(),
            value: "lots".to_string(),
        }]);
        assert_eq!(values["QuotaResetTime"], OptionValue::from("00:01"));
        assert_eq!(values["QuotaResetConcurrency"], OptionValue::Integer(3));
        assert_eq!(values["QuotaResetEnabled"], OptionValue::Bool(false));
    }

    #[test]
    fn out_of_range_stored_integers_load_as_default() {
        let schema = PanelKind::QuotaReset.schema();
        let load = |raw: &str| {
            schema.coerce(&[OptionEntry {
                key: "QuotaResetConcurrency".to_string(),
                value: raw.to_string(),
            }])["QuotaResetConcurrency"]
                .clone()
        };
        assert_eq!(load("0"), OptionValue::Integer(3));
        assert_eq!(load("11"), OptionValue::Integer(3));
        assert_eq!(load("10"), OptionValue::Integer(10));
    }

    #[test]
    fn malformed_port_list_loads_the_default_ports() {
        let schema = PanelKind::System.schema();
        let ports = |raw: &str| {
            schema.coerce(&[OptionEntry {
                key: "fetch_setting.allowed_ports".to_string(),
                value: raw.to_string(),
            }])["fetch_setting.allowed_ports"]
                .clone()
        };
        assert_eq!(
            ports("[80,"),
            OptionValue::List(vec![
                "80".to_string(),
                "443".to_string(),
                "8080".to_string(),
                "8443".to_string()
            ])
        );
        assert_eq!(ports(r#"["22"]"#), OptionValue::List(vec!["22".to_string()]));
        assert_eq!(ports(""), OptionValue::List(Vec::new()));
    }

    #[test]
    fn system_credentials_are_write_only() {
        let schema = PanelKind::System.schema();
        for key in ["SMTPToken", "GitHubClientSecret", "oidc.client_secret"] {
            let field = schema.field(key).unwrap();
            assert!(field.is_sensitive(), "{key}");
            assert!(field.is_write_only(), "{key}");
        }
        assert_eq!(
            schema.field("fetch_setting.allowed_ports").unwrap().default_value(),
            &OptionValue::List(vec![
                "80".to_string(),
                "443".to_string(),
                "8080".to_string(),
                "8443".to_string()
            ])
        );
    }
}
