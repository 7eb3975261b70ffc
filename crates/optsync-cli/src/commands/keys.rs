use optsync_core::models::FieldSpec;
use optsync_core::PanelKind;
use serde::Serialize;

use crate::commands::common::{display_value, print_json};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct KeyItem {
    pub panel: String,
    pub key: String,
    pub kind: String,
    pub default: String,
    pub flags: Vec<&'static str>,
}

pub fn run_keys(panel: Option<PanelKind>, json: bool) -> Result<(), CliError> {
    let items = key_items(panel);
    if json {
        return print_json(&items);
    }
    for line in format_key_lines(&items) {
        println!("{line}");
    }
    Ok(())
}

pub fn key_items(panel: Option<PanelKind>) -> Vec<KeyItem> {
    let kinds = panel.map_or_else(|| PanelKind::ALL.to_vec(), |kind| vec![kind]);
    kinds
        .into_iter()
        .flat_map(|kind| {
            kind.schema()
                .fields()
                .iter()
                .map(|field| KeyItem {
                    panel: kind.to_string(),
                    key: field.key().to_string(),
                    kind: field.kind().label().to_string(),
                    default: display_value(field, field.default_value(), false),
                    flags: field_flags(field),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn field_flags(field: &FieldSpec) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if field.is_sensitive() {
        flags.push("secret");
    } else if field.is_write_only() {
        flags.push("skip-empty");
    }
    if field.is_switch() {
        flags.push("switch");
    }
    if field.kind().is_json() {
        flags.push("validated");
    }
    flags
}

pub fn format_key_lines(items: &[KeyItem]) -> Vec<String> {
    let width = items.iter().map(|item| item.key.len()).max().unwrap_or(0);
    items
        .iter()
        .map(|item| {
            let mut line = format!(
                "{:<11}  {:<width$}  {:<9}",
                item.panel, item.key, item.kind
            );
            if !item.default.is_empty() {
                line.push_str(&format!("  default={}", item.default));
            }
            if !item.flags.is_empty() {
                line.push_str(&format!("  [{}]", item.flags.join(", ")));
            }
            line.trim_end().to_string()
        })
        .collect()
}
