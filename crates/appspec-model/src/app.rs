//! App specs and their input/output wiring
//!
//! An [`AppSpec`] describes one computational step: its parameters, how they
//! map onto the positional inputs of a job, how a job result maps onto the
//! parameters of an output widget, and which widget that is.

use crate::error::SpecificationError;
use crate::param::{ParameterSpec, ParameterSpecs};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// Where a logical parameter lives in a job's positional inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMappingEntry {
    /// Index into the job inputs
    #[serde(default)]
    pub target_position: usize,
    /// Key within that slot, if the slot is a mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_property: Option<String>,
    /// Logical parameter name; absent for constants and system values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_parameter: Option<String>,
    /// Encoding applied on the way in, e.g. `ref` or `list(ref)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type_transform: Option<String>,
}

impl InputMappingEntry {
    /// Map a whole slot to a parameter
    #[must_use]
    pub fn new(target_position: usize, input_parameter: impl Into<String>) -> Self {
        Self {
            target_position,
            target_property: None,
            input_parameter: Some(input_parameter.into()),
            target_type_transform: None,
        }
    }

    /// With key within the slot
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.target_property = Some(property.into());
        self
    }

    /// With encoding transform
    #[must_use]
    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.target_type_transform = Some(transform.into());
        self
    }
}

/// One output widget parameter and where its value comes from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputMappingEntry {
    /// Name of a system variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_system_variable: Option<String>,
    /// Literal value; a present `null` is kept
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub constant_value: Option<Value>,
    /// Name of a submitted parameter to echo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_parameter: Option<String>,
    /// Path into the job result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_method_output_path: Option<Vec<String>>,
    /// Widget parameter key; absent means "replace all widget parameters"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_property: Option<String>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// The value source of an output mapping entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputSource<'a> {
    /// Read a system variable by name
    SystemVariable(&'a str),
    /// Use a literal
    Constant(&'a Value),
    /// Echo a submitted parameter
    InputParameter(&'a str),
    /// Resolve a path into the job result
    ResultPath(&'a [String]),
    /// No source declared
    None,
}

impl OutputMappingEntry {
    /// The entry's value source
    ///
    /// When several are declared the first of system variable, constant,
    /// input parameter, result path wins.
    #[must_use]
    pub fn source(&self) -> OutputSource<'_> {
        if let Some(var) = &self.narrative_system_variable {
            OutputSource::SystemVariable(var)
        } else if let Some(value) = &self.constant_value {
            OutputSource::Constant(value)
        } else if let Some(name) = &self.input_parameter {
            OutputSource::InputParameter(name)
        } else if let Some(path) = &self.service_method_output_path {
            OutputSource::ResultPath(path)
        } else {
            OutputSource::None
        }
    }

    /// Entry resolving a path into the job result
    #[must_use]
    pub fn result_path<S: Into<String>>(path: impl IntoIterator<Item = S>) -> Self {
        Self {
            service_method_output_path: Some(path.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Entry with a literal value
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self {
            constant_value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Entry echoing a submitted parameter
    #[must_use]
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            input_parameter: Some(name.into()),
            ..Self::default()
        }
    }

    /// Entry reading a system variable
    #[must_use]
    pub fn system_variable(name: impl Into<String>) -> Self {
        Self {
            narrative_system_variable: Some(name.into()),
            ..Self::default()
        }
    }

    /// With widget parameter key
    #[must_use]
    pub fn with_target(mut self, key: impl Into<String>) -> Self {
        self.target_property = Some(key.into());
        self
    }
}

/// Wiring between parameters, job inputs and job results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Behavior {
    /// Parameter to job input mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kb_service_input_mapping: Option<Vec<InputMappingEntry>>,
    /// Job result to widget mapping for service calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kb_service_output_mapping: Option<Vec<OutputMappingEntry>>,
    /// Same shape, used by viewers and short-running steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_mapping: Option<Vec<OutputMappingEntry>>,
}

impl Behavior {
    /// Input mapping entries, empty if none are declared
    #[must_use]
    pub fn input_mapping(&self) -> &[InputMappingEntry] {
        self.kb_service_input_mapping.as_deref().unwrap_or_default()
    }

    /// Output mapping entries
    ///
    /// `kb_service_output_mapping` takes precedence over `output_mapping`
    /// when both are declared.
    #[must_use]
    pub fn output_mapping(&self) -> &[OutputMappingEntry] {
        self.kb_service_output_mapping
            .as_deref()
            .or(self.output_mapping.as_deref())
            .unwrap_or_default()
    }
}

/// Widget names
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Widgets {
    /// Input widget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Output widget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// A declarative app spec
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppSpec {
    /// App id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Declared parameters
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    /// Input/output wiring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Behavior>,
    /// Widget names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets: Option<Widgets>,
}

impl AppSpec {
    /// Parse from JSON text
    ///
    /// # Errors
    /// [`SpecificationError::Parse`] on malformed JSON or schema mismatch.
    pub fn from_json_str(text: &str) -> Result<Self, SpecificationError> {
        serde_json::from_str(text).map_err(|e| SpecificationError::parse("JSON", e))
    }

    /// Parse from YAML text
    ///
    /// # Errors
    /// [`SpecificationError::Parse`] on malformed YAML or schema mismatch.
    pub fn from_yaml_str(text: &str) -> Result<Self, SpecificationError> {
        serde_yaml::from_str(text).map_err(|e| SpecificationError::parse("YAML", e))
    }

    /// Load from a file; `.yaml`/`.yml` are YAML, anything else JSON
    ///
    /// # Errors
    /// IO or parse failures.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SpecificationError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| SpecificationError::io_error(path, e))?;
        let spec = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text)?,
            _ => Self::from_json_str(&text)?,
        };
        tracing::debug!(
            path = %path.display(),
            parameters = spec.parameters.len(),
            "loaded app spec"
        );
        Ok(spec)
    }

    /// The behavior block
    ///
    /// # Errors
    /// [`SpecificationError::MissingBehavior`] if the spec has none.
    pub fn behavior(&self) -> Result<&Behavior, SpecificationError> {
        self.behavior
            .as_ref()
            .ok_or(SpecificationError::MissingBehavior)
    }

    /// Declared output widget, if any
    #[must_use]
    pub fn output_widget(&self) -> Option<&str> {
        self.widgets.as_ref().and_then(|w| w.output.as_deref())
    }

    /// Checked parameter list
    ///
    /// # Errors
    /// See [`ParameterSpecs::new`].
    pub fn parameter_specs(&self) -> Result<ParameterSpecs, SpecificationError> {
        ParameterSpecs::new(self.parameters.clone())
    }
}
