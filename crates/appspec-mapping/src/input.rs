//! Reconstruct named parameters from a job's positional inputs
//!
//! The inverse of building a job invocation: each input mapping entry with an
//! `input_parameter` names one slot (or one key of a slot) of the job inputs,
//! possibly encoded by a transform.

use crate::transform::Transform;
use appspec_model::{AppSpec, InputMappingEntry, SpecificationError};
use serde_json::{Map, Value};

/// Rebuild the named parameter mapping
///
/// Entries without `input_parameter` are skipped. When two entries target the
/// same name the later one wins.
///
/// # Errors
/// [`SpecificationError::PositionOutOfRange`] if an entry points past the end
/// of `job_inputs`.
pub fn map_inputs(
    job_inputs: &[Value],
    mapping: &[InputMappingEntry],
) -> Result<Map<String, Value>, SpecificationError> {
    let mut named = Map::new();

    for entry in mapping {
        let Some(parameter) = entry.input_parameter.as_deref() else {
            continue;
        };

        let slot = job_inputs.get(entry.target_position).ok_or_else(|| {
            SpecificationError::PositionOutOfRange {
                parameter: parameter.to_string(),
                position: entry.target_position,
                len: job_inputs.len(),
            }
        })?;

        let mut value = match entry.target_property.as_deref() {
            Some(property) => slot.get(property).cloned().unwrap_or(Value::Null),
            None => slot.clone(),
        };

        if let Some(tag) = entry.target_type_transform.as_deref() {
            value = Transform::parse(tag).reverse(value);
        }

        if named.insert(parameter.to_string(), value).is_some() {
            tracing::debug!(parameter, "input mapping overwrote an earlier entry");
        }
    }

    Ok(named)
}

/// Rebuild parameters using the spec's `kb_service_input_mapping`
///
/// # Errors
/// [`SpecificationError::MissingBehavior`] if the spec has no behavior block,
/// or any error of [`map_inputs`].
pub fn map_inputs_from_job(
    job_inputs: &[Value],
    spec: &AppSpec,
) -> Result<Map<String, Value>, SpecificationError> {
    let behavior = spec.behavior()?;
    map_inputs(job_inputs, behavior.input_mapping())
}
