//! Map a finished job onto its output widget
//!
//! Every output mapping entry yields one value (from a system variable, a
//! constant, a submitted parameter, or a path into the job result) and writes
//! it under its `target_property`. An entry without a target replaces the
//! widget parameters wholesale, for widgets that take a single value.

use crate::path::resolve_owned;
use crate::system::{SystemVariable, SystemVariables};
use appspec_model::{AppSpec, OutputMappingEntry, OutputSource, SpecificationError};
use serde::Serialize;
use serde_json::{Map, Value};

/// Widget used when a spec names none
pub const DEFAULT_OUTPUT_WIDGET: &str = "kbaseDefaultNarrativeOutput";

/// Widget name and its parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetOutput {
    /// Widget to render with
    pub widget: String,
    /// Parameters for the widget; usually a mapping
    pub params: Value,
}

/// Builds widget output from job results
pub struct OutputMapper<'a> {
    system: &'a dyn SystemVariables,
    default_widget: String,
}

impl<'a> OutputMapper<'a> {
    /// Create mapper reading system variables from `system`
    #[must_use]
    pub fn new(system: &'a dyn SystemVariables) -> Self {
        Self {
            system,
            default_widget: DEFAULT_OUTPUT_WIDGET.to_string(),
        }
    }

    /// With widget used when the spec declares none
    #[must_use]
    pub fn with_default_widget(mut self, widget: impl Into<String>) -> Self {
        self.default_widget = widget.into();
        self
    }

    /// Map a job result to widget output
    ///
    /// # Errors
    /// [`SpecificationError::MissingBehavior`] if the spec has no behavior
    /// block.
    pub fn map_outputs(
        &self,
        job_result: &Value,
        submitted: &Map<String, Value>,
        spec: &AppSpec,
    ) -> Result<WidgetOutput, SpecificationError> {
        let behavior = spec.behavior()?;
        let mut params = Value::Object(Map::new());

        for entry in behavior.output_mapping() {
            let value = self.entry_value(entry, job_result, submitted);
            match entry.target_property.as_deref() {
                Some(key) => {
                    if !params.is_object() {
                        params = Value::Object(Map::new());
                    }
                    if let Value::Object(map) = &mut params {
                        map.insert(key.to_string(), value);
                    }
                }
                None => params = value,
            }
        }

        let widget = match spec.output_widget() {
            Some(name) if name != "null" => name.to_string(),
            _ => self.default_widget.clone(),
        };

        tracing::debug!(%widget, entries = behavior.output_mapping().len(), "mapped job outputs");
        Ok(WidgetOutput { widget, params })
    }

    fn entry_value(
        &self,
        entry: &OutputMappingEntry,
        job_result: &Value,
        submitted: &Map<String, Value>,
    ) -> Value {
        match entry.source() {
            OutputSource::SystemVariable(name) => match name.parse::<SystemVariable>() {
                Ok(var) => self.system.get(var).map_or(Value::Null, Value::String),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring output mapping entry");
                    Value::Null
                }
            },
            OutputSource::Constant(value) => value.clone(),
            OutputSource::InputParameter(name) => {
                submitted.get(name).cloned().unwrap_or(Value::Null)
            }
            OutputSource::ResultPath(path) => resolve_owned(job_result, path),
            OutputSource::None => Value::Null,
        }
    }
}
