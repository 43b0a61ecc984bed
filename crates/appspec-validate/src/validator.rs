//! Parameter validation and normalization
//!
//! Validation runs in four phases:
//!
//! 1. Presence: required parameters without a default must be submitted
//! 2. Unknown keys: every submitted key must be declared
//! 3. Values: every non-null value is checked, errors are collected
//! 4. Normalization: checkbox re-encoding and default injection
//!
//! The first two phases stop at the first failing phase; the third reports
//! every failing value at once.

use crate::error::{AppLabel, ParameterError, ValidateError, ValidationError};
use crate::value::check_value;
use appspec_model::{
    ObjectRef, ParamType, ParameterRule, ParameterSpec, ParameterSpecs, ReferenceResolver,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Where a validation runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    /// Workspace that scopes bare object names
    pub workspace: String,
    /// App quoted in fail-fast messages
    pub app: AppLabel,
}

impl ValidationContext {
    /// Context for a workspace
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            app: AppLabel::default(),
        }
    }

    /// With app id and release tag
    #[must_use]
    pub fn with_app(mut self, app_id: impl Into<String>, tag: impl Into<String>) -> Self {
        self.app = AppLabel {
            app_id: Some(app_id.into()),
            tag: Some(tag.into()),
        };
        self
    }
}

/// Successful validation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatedParams {
    /// Normalized parameters
    pub params: Map<String, Value>,
    /// Every object reference resolved along the way
    pub references: Vec<ObjectRef>,
}

/// References and errors collected for one parameter
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    pub(crate) references: Vec<ObjectRef>,
    pub(crate) errors: Vec<ParameterError>,
}

impl Outcome {
    pub(crate) fn merge(&mut self, other: Outcome) {
        self.references.extend(other.references);
        self.errors.extend(other.errors);
    }
}

/// Per-call state shared by value and group checks
pub(crate) struct Checker<'a> {
    pub(crate) specs: &'a ParameterSpecs,
    pub(crate) workspace: &'a str,
    pub(crate) resolver: &'a dyn ReferenceResolver,
}

impl Checker<'_> {
    /// Check a submitted value, element-wise for lists
    pub(crate) fn check_parameter(&self, rule: &ParameterRule, value: &Value) -> Outcome {
        let spec = rule.spec();
        let mut outcome = Outcome::default();
        match value {
            Value::Array(items) if spec.allow_multiple || spec.is_group() => {
                for (i, item) in items.iter().enumerate() {
                    self.check_element(rule, item, Some(i), &mut outcome);
                }
            }
            Value::Object(_) if spec.is_group() => {
                self.check_group_element(rule, value, None, &mut outcome);
            }
            _ => self.check_element(rule, value, None, &mut outcome),
        }
        outcome
    }

    fn check_element(
        &self,
        rule: &ParameterRule,
        value: &Value,
        index: Option<usize>,
        outcome: &mut Outcome,
    ) {
        if rule.spec().is_group() && index.is_some() {
            self.check_group_element(rule, value, index, outcome);
            return;
        }
        let check = check_value(rule, value, self.workspace, self.resolver);
        outcome.references.extend(check.reference);
        if let Some(message) = check.error {
            outcome
                .errors
                .push(ParameterError::new(rule.id(), index, message));
        }
    }
}

/// Validates submitted parameters against a spec
///
/// Object lookups go through the injected resolver; nothing is cached
/// between calls.
#[derive(Clone, Copy)]
pub struct ParameterValidator<'a> {
    resolver: &'a dyn ReferenceResolver,
}

impl<'a> ParameterValidator<'a> {
    /// Create validator backed by a resolver
    pub fn new(resolver: &'a dyn ReferenceResolver) -> Self {
        Self { resolver }
    }

    /// Validate and normalize submitted parameters
    ///
    /// # Errors
    /// - [`ValidationError::MissingParameters`] when required values are absent
    /// - [`ValidationError::UnknownParameters`] for undeclared keys
    /// - [`ValidationError::InvalidValues`] when any value fails its rules
    pub fn validate(
        &self,
        specs: &ParameterSpecs,
        mut params: Map<String, Value>,
        ctx: &ValidationContext,
    ) -> Result<ValidatedParams, ValidationError> {
        check_submission(specs, &params, &ctx.app)?;

        let checker = Checker {
            specs,
            workspace: &ctx.workspace,
            resolver: self.resolver,
        };
        let mut outcome = Outcome::default();
        for rule in specs.iter() {
            match params.get(rule.id()) {
                None | Some(Value::Null) => {}
                Some(value) => outcome.merge(checker.check_parameter(rule, value)),
            }
        }
        if !outcome.errors.is_empty() {
            tracing::debug!(errors = outcome.errors.len(), "parameter values rejected");
            return Err(ValidationError::InvalidValues {
                errors: outcome.errors,
            });
        }

        for rule in specs.iter() {
            normalize(rule.spec(), &mut params);
        }

        tracing::debug!(
            params = params.len(),
            references = outcome.references.len(),
            "parameters validated"
        );
        Ok(ValidatedParams {
            params,
            references: outcome.references,
        })
    }

    /// Check raw parameter specs, then validate against them
    ///
    /// # Errors
    /// [`ValidateError::Specification`] if the specs are malformed, otherwise
    /// as [`validate`](Self::validate).
    pub fn validate_raw(
        &self,
        specs: Vec<ParameterSpec>,
        params: Map<String, Value>,
        ctx: &ValidationContext,
    ) -> Result<ValidatedParams, ValidateError> {
        let specs = ParameterSpecs::new(specs)?;
        Ok(self.validate(&specs, params, ctx)?)
    }
}

/// Presence and unknown-key checks
///
/// These need neither a workspace nor a resolver, so callers can run them
/// before the execution context is read.
///
/// # Errors
/// - [`ValidationError::MissingParameters`] with every missing id, in
///   declaration order
/// - [`ValidationError::UnknownParameters`] with every undeclared key, in
///   submission order
pub fn check_submission(
    specs: &ParameterSpecs,
    params: &Map<String, Value>,
    app: &AppLabel,
) -> Result<(), ValidationError> {
    let missing: Vec<String> = specs
        .iter()
        .map(ParameterRule::spec)
        .filter(|s| !s.optional && !s.has_default() && !is_submitted(params.get(&s.id)))
        .map(|s| s.id.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingParameters {
            ids: missing,
            app: app.clone(),
        });
    }

    let unknown: Vec<String> = params
        .keys()
        .filter(|k| !specs.contains(k))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownParameters {
            ids: unknown,
            app: app.clone(),
        });
    }
    Ok(())
}

/// Present, non-null, not `""` and not `[]`
fn is_submitted(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn normalize(spec: &ParameterSpec, params: &mut Map<String, Value>) {
    if spec.param_type == ParamType::Checkbox {
        if let (Some(value), Some([checked, unchecked])) =
            (params.get_mut(&spec.id), spec.checkbox_map.as_ref())
        {
            *value = if is_truthy(value) {
                checked.clone()
            } else {
                unchecked.clone()
            };
            return;
        }
    }
    if let Some(default) = spec.default.as_ref().filter(|_| spec.has_default()) {
        let slot = params.entry(spec.id.clone()).or_insert(Value::Null);
        if slot.is_null() {
            *slot = default.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appspec_model::MemoryCatalog;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn run(specs: Vec<ParameterSpec>, params: Value) -> Result<ValidatedParams, ValidateError> {
        let catalog = MemoryCatalog::new();
        ParameterValidator::new(&catalog).validate_raw(specs, obj(params), &ValidationContext::new("ws"))
    }

    #[test]
    fn submitted_means_non_empty() {
        assert!(!is_submitted(None));
        assert!(!is_submitted(Some(&Value::Null)));
        assert!(!is_submitted(Some(&json!(""))));
        assert!(!is_submitted(Some(&json!([]))));
        assert!(is_submitted(Some(&json!(0))));
        assert!(is_submitted(Some(&json!(false))));
    }

    #[test]
    fn truthiness() {
        for falsy in [json!(false), Value::Null, json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("0"), json!([0]), json!({"a": 1})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn missing_stops_before_unknown() {
        let err = run(
            vec![ParameterSpec::new("a", ParamType::Int)],
            json!({"zzz": 1}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidateError::Validation(ValidationError::MissingParameters { ref ids, .. }) if ids == &["a"]
        ));
    }

    #[test]
    fn default_satisfies_presence_and_is_injected() {
        let result = run(
            vec![ParameterSpec::new("a", ParamType::Int).with_default(7)],
            json!({"a": null}),
        )
        .unwrap();
        assert_eq!(result.params["a"], json!(7));
    }

    #[test]
    fn empty_default_does_not_count() {
        let err = run(
            vec![ParameterSpec::new("a", ParamType::String).with_default("")],
            json!({}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidateError::Validation(ValidationError::MissingParameters { .. })
        ));
    }

    #[test]
    fn empty_submission_keeps_value_over_default() {
        let result = run(
            vec![
                ParameterSpec::new("s", ParamType::String).optional().with_default("fallback"),
                ParameterSpec::new("l", ParamType::String)
                    .optional()
                    .multiple()
                    .with_default("x"),
            ],
            json!({"s": "", "l": []}),
        )
        .unwrap();
        assert_eq!(result.params["s"], json!(""));
        assert_eq!(result.params["l"], json!([]));
    }

    #[test]
    fn checkbox_reencoded_only_when_submitted() {
        let specs = vec![
            ParameterSpec::new("c", ParamType::Checkbox)
                .optional()
                .with_checkbox_map("yes", "no"),
            ParameterSpec::new("d", ParamType::Checkbox)
                .optional()
                .with_checkbox_map(1, 0),
        ];
        let result = run(specs, json!({"c": ""})).unwrap();
        assert_eq!(result.params["c"], json!("no"));
        assert!(!result.params.contains_key("d"));
    }

    #[test]
    fn non_multiple_rejects_list() {
        let err = run(
            vec![ParameterSpec::new("a", ParamType::Int)],
            json!({"a": [1, 2]}),
        )
        .unwrap_err();
        let ValidateError::Validation(err) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            err.messages(),
            vec!["a - input type not supported - only str, int, float, or list".to_string()]
        );
    }
}
