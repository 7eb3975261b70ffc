use serde::Serialize;

use super::error::FieldError;
use crate::models::{OptionMap, OptionValue, PanelSchema};

/// A declared key whose working value differs from what the server holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionChange {
    pub key: String,
    pub value: OptionValue,
    /// The string that will be sent to the server.
    pub wire_value: String,
}

/// Changed keys in schema order.
///
/// A key is changed when its working value differs from the baseline, or
/// from the value `confirmed` says the server accepted since. Two values are
/// equal iff their canonical encodings match; list order counts unless the
/// field declares [`crate::models::ListOrder::Ignored`].
pub fn compute(
    schema: &PanelSchema,
    baseline: &OptionMap,
    confirmed: &OptionMap,
    working: &OptionMap,
) -> Vec<OptionChange> {
    schema
        .fields()
        .iter()
        .filter_map(|field| {
            let current = working.get(field.key())?;
            let encoded = field.canonical(current);
            let matches = |reference: &OptionValue| field.canonical(reference) == encoded;
            let changed = !baseline.get(field.key()).is_some_and(matches)
                || confirmed
                    .get(field.key())
                    .is_some_and(|accepted| !matches(accepted));
            changed.then(|| OptionChange {
                key: field.key().to_string(),
                value: current.clone(),
                wire_value: field.encode(current),
            })
        })
        .collect()
}

/// Submit-time validation of every changed field.
pub fn validate(
    schema: &PanelSchema,
    baseline: &OptionMap,
    confirmed: &OptionMap,
    working: &OptionMap,
) -> Vec<FieldError> {
    compute(schema, baseline, confirmed, working)
        .into_iter()
        .filter_map(|change| {
            let field = schema.field(&change.key)?;
            field
                .check_submission(&change.value)
                .err()
                .map(|message| FieldError {
                    key: change.key,
                    message,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{FieldSpec, ListOrder};

    fn schema() -> PanelSchema {
        PanelSchema::new(
            "demo",
            vec![
                FieldSpec::toggle("A"),
                FieldSpec::text("B"),
                FieldSpec::json("C"),
                FieldSpec::string_list("D", ListOrder::Significant),
                FieldSpec::string_list("E", ListOrder::Ignored),
            ],
        )
        .unwrap()
    }

    #[test]
    fn identical_maps_have_no_changes() {
        let schema = schema();
        let values = schema.defaults();
        assert!(compute(&schema, &values, &OptionMap::new(), &values).is_empty());
    }

    #[test]
    fn changes_follow_schema_order_and_carry_wire_values() {
        let schema = schema();
        let baseline = schema.defaults();
        let mut working = baseline.clone();
        working.insert("D".to_string(), OptionValue::List(vec!["x.com".to_string()]));
        working.insert("A".to_string(), OptionValue::Bool(true));

        let changes = compute(&schema, &baseline, &OptionMap::new(), &working);
        let keys = changes.iter().map(|change| change.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["A", "D"]);
        assert_eq!(changes[0].wire_value, "true");
        assert_eq!(changes[1].wire_value, r#"["x.com"]"#);
    }

    #[test]
    fn reordering_counts_only_for_significant_lists() {
        let schema = schema();
        let mut baseline = schema.defaults();
        let forward = OptionValue::List(vec!["80".to_string(), "443".to_string()]);
        let backward = OptionValue::List(vec!["443".to_string(), "80".to_string()]);
        baseline.insert("D".to_string(), forward.clone());
        baseline.insert("E".to_string(), forward);

        let mut working = baseline.clone();
        working.insert("D".to_string(), backward.clone());
        working.insert("E".to_string(), backward);

        let keys = compute(&schema, &baseline, &OptionMap::new(), &working)
            .into_iter()
            .map(|change| change.key)
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["D".to_string()]);
    }

    #[test]
    fn reverting_a_confirmed_key_is_still_a_change() {
        let schema = schema();
        let baseline = schema.defaults();
        let mut confirmed = OptionMap::new();
        confirmed.insert("B".to_string(), OptionValue::from("accepted"));

        let changes = compute(&schema, &baseline, &confirmed, &baseline);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].key, "B");
        assert_eq!(changes[0].wire_value, "");

        let mut working = baseline.clone();
        working.insert("B".to_string(), OptionValue::from("accepted"));
        let keys = compute(&schema, &baseline, &confirmed, &working)
            .into_iter()
            .map(|change| change.key)
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["B".to_string()]);
    }

    #[test]
    fn validate_reports_only_changed_invalid_json() {
        let schema = schema();
        let mut baseline = schema.defaults();
        baseline.insert("C".to_string(), OptionValue::from("{stale"));
        assert!(validate(&schema, &baseline, &OptionMap::new(), &baseline).is_empty());

        let mut working = baseline.clone();
        working.insert("C".to_string(), OptionValue::from("{invalid"));
        working.insert("B".to_string(), OptionValue::from("{not json but text"));

        let errors = validate(&schema, &baseline, &OptionMap::new(), &working);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key, "C");
        assert!(errors[0].message.contains("not valid JSON"));
    }
}
