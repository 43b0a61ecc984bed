//! Single-value validation
//!
//! Checks one submitted value against one parameter's rules. Rules run in a
//! fixed order and the first failure wins; a resolved object reference is
//! reported alongside any later failure so callers can still record it.

use appspec_model::{
    ObjectLookup, ObjectRef, ParamType, ParameterRule, ReferenceResolver,
};
use serde_json::Value;
use std::borrow::Cow;

/// Outcome of checking one value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueCheck {
    /// Object the value resolved to, if reference-valued
    pub reference: Option<ObjectRef>,
    /// Why the value was rejected
    pub error: Option<String>,
}

impl ValueCheck {
    /// Valid, nothing resolved
    #[inline]
    #[must_use]
    pub fn valid() -> Self {
        Self::default()
    }

    /// Rejected with message
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            reference: None,
            error: Some(message.into()),
        }
    }

    #[must_use]
    fn with_reference(mut self, reference: Option<ObjectRef>) -> Self {
        self.reference = reference;
        self
    }

    /// Whether the value passed
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Text form of a value for messages and string rules
pub(crate) fn text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Check one value against a parameter's rules
///
/// `workspace` scopes bare object names. The resolver is only consulted for
/// non-output parameters that declare `allowed_types`.
pub fn check_value(
    rule: &ParameterRule,
    value: &Value,
    workspace: &str,
    resolver: &dyn ReferenceResolver,
) -> ValueCheck {
    let spec = rule.spec();

    if value.is_null() {
        return ValueCheck::valid();
    }
    if spec.param_type.accepts_empty_string() && value.as_str() == Some("") {
        return ValueCheck::valid();
    }

    if let Some(message) = shape_error(spec.param_type, value) {
        return ValueCheck::invalid(message);
    }

    match spec.param_type {
        ParamType::Int if !(value.is_i64() || value.is_u64()) => {
            return ValueCheck::invalid(format!("Given value {} is not an int", text(value)));
        }
        ParamType::Float if !value.is_number() => {
            return ValueCheck::invalid(format!("Given value {} is not a number", text(value)));
        }
        _ => {}
    }

    let mut reference = None;
    if !rule.type_patterns().is_empty() && !spec.is_output {
        let check = check_object(rule, value, workspace, resolver);
        if !check.is_valid() {
            return check;
        }
        reference = check.reference;
    }

    let remaining = check_rules(rule, value);
    remaining.with_reference(reference)
}

fn shape_error(param_type: ParamType, value: &Value) -> Option<&'static str> {
    let ok = match param_type {
        ParamType::Group => value.is_array() || value.is_object(),
        ParamType::Mapping => value.is_object(),
        ParamType::Checkbox => value.is_string() || value.is_number() || value.is_boolean(),
        _ => value.is_string() || value.is_number(),
    };
    if ok {
        return None;
    }
    Some(match param_type {
        ParamType::Group => "a parameter group must be of type list or dict",
        ParamType::Mapping => "a parameter of type 'mapping' must be a dict",
        _ => "input type not supported - only str, int, float, or list",
    })
}

fn check_object(
    rule: &ParameterRule,
    value: &Value,
    workspace: &str,
    resolver: &dyn ReferenceResolver,
) -> ValueCheck {
    let name = text(value);
    let lookup = if name.contains('/') {
        if name.split('/').count() > 3 {
            return ValueCheck::invalid(format!(
                "Data reference named {name} does not have the right format - \
                 should be workspace/object/version(optional)"
            ));
        }
        ObjectLookup::by_ref(&*name)
    } else {
        ObjectLookup::by_name(workspace, &*name)
    };

    let info = match resolver.object_info(&lookup) {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(parameter = rule.id(), %lookup, error = %e, "object lookup failed");
            return ValueCheck::invalid(format!(
                "Data object named {name} not found in workspace {workspace}"
            ));
        }
    };

    let reference = Some(info.reference());
    if rule
        .type_patterns()
        .iter()
        .any(|p| p.matches(&info.type_string))
    {
        ValueCheck::valid().with_reference(reference)
    } else {
        ValueCheck::invalid(format!(
            "Type of data object, {}, does not match allowed types",
            info.type_string
        ))
        .with_reference(reference)
    }
}

/// Allowed values, bounds, output naming and regex constraints
fn check_rules(rule: &ParameterRule, value: &Value) -> ValueCheck {
    let spec = rule.spec();

    if let Some(allowed) = &spec.allowed_values {
        if !allowed.iter().any(|a| same_value(a, value)) {
            return ValueCheck::invalid(format!(
                "Given value '{}' is not permitted in the allowed set.",
                text(value)
            ));
        }
    }

    if let Some(max) = spec.max_val {
        match as_number(value) {
            Some(n) if n > max => {
                return ValueCheck::invalid(format!("Given value {} should be <= {max}", text(value)));
            }
            Some(_) => {}
            None => return not_a_number(value),
        }
    }
    if let Some(min) = spec.min_val {
        match as_number(value) {
            Some(n) if n < min => {
                return ValueCheck::invalid(format!("Given value {} should be >= {min}", text(value)));
            }
            Some(_) => {}
            None => return not_a_number(value),
        }
    }

    if spec.is_output {
        if let Some(message) = output_name_error(&text(value)) {
            return ValueCheck::invalid(message);
        }
    }

    let subject = text(value);
    if let Some(p) = rule.regex_patterns().iter().find(|p| !p.matches(&subject)) {
        return ValueCheck::invalid(format!(
            "Value {subject} does not match required regex {p}"
        ));
    }

    ValueCheck::valid()
}

fn not_a_number(value: &Value) -> ValueCheck {
    ValueCheck::invalid(format!("Given value {} must be a number", text(value)))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn same_value(allowed: &Value, value: &Value) -> bool {
    if let (Value::Number(a), Value::Number(v)) = (allowed, value) {
        return a == v || a.as_f64() == v.as_f64();
    }
    allowed == value
        || matches!(
            (allowed, value),
            (Value::String(a), Value::Number(_) | Value::Bool(_)) if *a == value.to_string()
        )
}

/// Naming rules for new data objects
///
/// Returns the reason a name is rejected, if it is.
#[must_use]
pub fn output_name_error(name: &str) -> Option<&'static str> {
    if name.chars().any(char::is_whitespace) {
        return Some("Spaces are not allowed in data object names.");
    }
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
        return Some("Data objects cannot be just a number.");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '|'))
    {
        return Some("Data object names can only include symbols: _ - . |");
    }
    None
}
