//! Parameter specifications
//!
//! [`ParameterSpec`] is one declared parameter as written in an app spec.
//! [`ParameterSpecs`] is a checked list of them: ids are unique, group members
//! resolve, and every pattern has been compiled once up front.

use crate::error::SpecificationError;
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Integer value
    Int,
    /// Integer or floating point value
    Float,
    /// Free text
    #[serde(alias = "text", alias = "textarea")]
    String,
    /// One of a fixed set of options
    Dropdown,
    /// Boolean re-encoded through a checkbox map
    Checkbox,
    /// Set of member parameters, possibly repeated
    Group,
    /// Key/value mapping
    Mapping,
}

impl ParamType {
    /// Types for which an empty string counts as "no value"
    #[inline]
    #[must_use]
    pub fn accepts_empty_string(self) -> bool {
        matches!(self, Self::String | Self::Dropdown | Self::Checkbox)
    }

    /// Spec name of the type
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Dropdown => "dropdown",
            Self::Checkbox => "checkbox",
            Self::Group => "group",
            Self::Mapping => "mapping",
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Unique key within the spec
    pub id: String,
    /// Declared type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Whether the parameter may be left out
    #[serde(default)]
    pub optional: bool,
    /// Value injected when none is submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Whether a list of values may be submitted
    #[serde(default)]
    pub allow_multiple: bool,
    /// Object type patterns for reference-valued parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_types: Vec<String>,
    /// Permitted values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
    /// Inclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_val: Option<f64>,
    /// Inclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_val: Option<f64>,
    /// Names a new output object rather than an existing input
    #[serde(default)]
    pub is_output: bool,
    /// `[true-encoding, false-encoding]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox_map: Option<[Value; 2]>,
    /// Member ids of a group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter_ids: Vec<String>,
    /// Patterns that must all match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regex_constraint: Vec<String>,
}

impl ParameterSpec {
    /// Create a required, single-valued parameter with no constraints
    #[must_use]
    pub fn new(id: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            id: id.into(),
            param_type,
            optional: false,
            default: None,
            allow_multiple: false,
            allowed_types: Vec::new(),
            allowed_values: None,
            min_val: None,
            max_val: None,
            is_output: false,
            checkbox_map: None,
            parameter_ids: Vec::new(),
            regex_constraint: Vec::new(),
        }
    }

    /// Mark as optional
    #[inline]
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// With default value
    #[inline]
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Allow a list of values
    #[inline]
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }

    /// With allowed object type patterns
    #[must_use]
    pub fn with_allowed_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// With allowed values
    #[must_use]
    pub fn with_allowed_values<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// With lower bound
    #[inline]
    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min_val = Some(min);
        self
    }

    /// With upper bound
    #[inline]
    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max_val = Some(max);
        self
    }

    /// Mark as naming an output object
    #[inline]
    #[must_use]
    pub fn output(mut self) -> Self {
        self.is_output = true;
        self
    }

    /// With checkbox encodings
    #[must_use]
    pub fn with_checkbox_map(mut self, checked: impl Into<Value>, unchecked: impl Into<Value>) -> Self {
        self.checkbox_map = Some([checked.into(), unchecked.into()]);
        self
    }

    /// With group members
    #[must_use]
    pub fn with_members<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.parameter_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// With a regex constraint
    #[must_use]
    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex_constraint.push(pattern.into());
        self
    }

    /// Whether a usable default is configured
    ///
    /// Null, empty strings and empty lists do not count.
    #[must_use]
    pub fn has_default(&self) -> bool {
        match &self.default {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        }
    }

    /// Whether this is a group parameter
    #[inline]
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.param_type == ParamType::Group
    }

    /// Whether `id` is a declared group member
    #[must_use]
    pub fn has_member(&self, id: &str) -> bool {
        self.parameter_ids.iter().any(|m| m == id)
    }
}

/// A parameter together with its compiled patterns
#[derive(Debug, Clone)]
pub struct ParameterRule {
    spec: ParameterSpec,
    type_patterns: Vec<Pattern>,
    regex_patterns: Vec<Pattern>,
}

impl ParameterRule {
    fn compile(spec: ParameterSpec) -> Result<Self, SpecificationError> {
        let type_patterns = spec
            .allowed_types
            .iter()
            .map(|p| Pattern::compile(&spec.id, p))
            .collect::<Result<Vec<_>, _>>()?;
        let regex_patterns = spec
            .regex_constraint
            .iter()
            .map(|p| Pattern::compile(&spec.id, p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            spec,
            type_patterns,
            regex_patterns,
        })
    }

    /// The declared parameter
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    /// Parameter id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    /// Compiled `allowed_types`
    #[inline]
    #[must_use]
    pub fn type_patterns(&self) -> &[Pattern] {
        &self.type_patterns
    }

    /// Compiled `regex_constraint`
    #[inline]
    #[must_use]
    pub fn regex_patterns(&self) -> &[Pattern] {
        &self.regex_patterns
    }
}

/// Checked, ordered list of parameter specs
#[derive(Debug, Clone, Default)]
pub struct ParameterSpecs {
    rules: Vec<ParameterRule>,
    index: HashMap<String, usize>,
}

impl ParameterSpecs {
    /// Check invariants and compile patterns
    ///
    /// # Errors
    /// - [`SpecificationError::DuplicateParameter`] if two specs share an id
    /// - [`SpecificationError::UnknownGroupMember`] if a group member is missing
    /// - [`SpecificationError::MissingCheckboxMap`] for a checkbox without map
    /// - [`SpecificationError::InvalidPattern`] if a pattern does not compile
    pub fn new(specs: Vec<ParameterSpec>) -> Result<Self, SpecificationError> {
        let mut index = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            if index.insert(spec.id.clone(), i).is_some() {
                return Err(SpecificationError::DuplicateParameter(spec.id.clone()));
            }
        }

        for spec in &specs {
            if spec.param_type == ParamType::Checkbox && spec.checkbox_map.is_none() {
                return Err(SpecificationError::MissingCheckboxMap(spec.id.clone()));
            }
            if let Some(member) = spec
                .parameter_ids
                .iter()
                .find(|m| *m == &spec.id || !index.contains_key(m.as_str()))
            {
                return Err(SpecificationError::UnknownGroupMember {
                    group: spec.id.clone(),
                    member: member.clone(),
                });
            }
        }

        let rules = specs
            .into_iter()
            .map(ParameterRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::trace!(count = rules.len(), "parameter specs compiled");
        Ok(Self { rules, index })
    }

    /// Look up a parameter by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ParameterRule> {
        self.index.get(id).map(|&i| &self.rules[i])
    }

    /// Whether an id is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate in declaration order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ParameterRule> {
        self.rules.iter()
    }

    /// Number of declared parameters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no parameters are declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
