//! Parameter group elements
//!
//! A group element is a mapping from member ids to values. Every key must be
//! declared in the spec and listed as a member of the group; member values
//! are checked with their own rules and their errors are reported under the
//! group.

use crate::error::ParameterError;
use crate::validator::{Checker, Outcome};
use appspec_model::ParameterRule;
use serde_json::Value;

impl Checker<'_> {
    pub(crate) fn check_group_element(
        &self,
        group: &ParameterRule,
        element: &Value,
        index: Option<usize>,
        outcome: &mut Outcome,
    ) {
        let entries = match element {
            Value::Null => return,
            Value::Object(entries) => entries,
            _ => {
                outcome.errors.push(ParameterError::new(
                    group.id(),
                    index,
                    "A parameter-group must be a dictionary",
                ));
                return;
            }
        };

        for (key, value) in entries {
            let Some(member) = self.specs.get(key) else {
                outcome.errors.push(ParameterError::new(
                    group.id(),
                    index,
                    format!("Unknown parameter id \"{key}\" in parameter group"),
                ));
                continue;
            };
            if !group.spec().has_member(key) {
                outcome.errors.push(ParameterError::new(
                    group.id(),
                    index,
                    format!("Unmappable parameter id \"{key}\" in parameter group"),
                ));
                continue;
            }
            if value.is_null() {
                continue;
            }

            let inner = self.check_parameter(member, value);
            outcome.references.extend(inner.references);
            outcome.errors.extend(
                inner
                    .errors
                    .into_iter()
                    .map(|e| ParameterError::new(group.id(), index, e.to_string())),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ValidateError, ValidationError};
    use crate::validator::{ParameterValidator, ValidationContext};
    use appspec_model::{MemoryCatalog, ObjectRef, ParamType, ParameterSpec};
    use serde_json::{json, Map, Value};

    fn specs(multiple: bool) -> Vec<ParameterSpec> {
        let mut group = ParameterSpec::new("g", ParamType::Group).with_members(["k", "genome"]);
        if multiple {
            group = group.multiple();
        }
        vec![
            group,
            ParameterSpec::new("k", ParamType::Int).optional().with_min(11.0),
            ParameterSpec::new("genome", ParamType::String)
                .optional()
                .with_allowed_types(["KBaseGenomes.Genome"]),
            ParameterSpec::new("outside", ParamType::Int).optional(),
        ]
    }

    fn messages(multiple: bool, value: Value) -> Vec<String> {
        let catalog = MemoryCatalog::new();
        let mut params = Map::new();
        params.insert("g".to_string(), value);
        match ParameterValidator::new(&catalog).validate_raw(
            specs(multiple),
            params,
            &ValidationContext::new("ws"),
        ) {
            Err(ValidateError::Validation(e @ ValidationError::InvalidValues { .. })) => e.messages(),
            other => panic!("expected value errors, got {other:?}"),
        }
    }

    #[test]
    fn element_must_be_mapping() {
        assert_eq!(
            messages(true, json!([{"k": 20}, 5])),
            vec!["g[1] - A parameter-group must be a dictionary".to_string()]
        );
    }

    #[test]
    fn unknown_and_unmappable_keys() {
        assert_eq!(
            messages(true, json!([{"nope": 1, "outside": 2}])),
            vec![
                "g[0] - Unknown parameter id \"nope\" in parameter group".to_string(),
                "g[0] - Unmappable parameter id \"outside\" in parameter group".to_string(),
            ]
        );
    }

    #[test]
    fn member_errors_reported_under_group() {
        assert_eq!(
            messages(true, json!([{"k": 20}, {"k": 5}])),
            vec!["g[1] - k - Given value 5 should be >= 11".to_string()]
        );
    }

    #[test]
    fn single_mapping_for_non_multiple_group() {
        assert_eq!(
            messages(false, json!({"k": 3})),
            vec!["g - k - Given value 3 should be >= 11".to_string()]
        );
    }

    #[test]
    fn member_references_are_collected() {
        let catalog = MemoryCatalog::new()
            .with_workspace(4, "ws")
            .with_object(4, 9, "g1", "KBaseGenomes.Genome-1.0", 2);
        let mut params = Map::new();
        params.insert("g".to_string(), json!([{"genome": "g1", "k": 12}]));
        let result = ParameterValidator::new(&catalog)
            .validate_raw(specs(true), params, &ValidationContext::new("ws"))
            .unwrap();
        assert_eq!(result.references, vec![ObjectRef::new(4, 9, 2)]);
    }
}
