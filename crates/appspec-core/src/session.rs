//! Session facade
//!
//! [`AppSession`] bundles configuration with the two collaborators every
//! operation needs, so callers pass them once instead of on every call.

use crate::config::AppSpecConfig;
use crate::error::AppError;
use crate::tag::ReleaseTag;
use appspec_mapping::{map_inputs_from_job, OutputMapper, SystemVariable, SystemVariables, WidgetOutput};
use appspec_model::{AppSpec, ReferenceResolver};
use appspec_validate::{
    check_submission, AppLabel, ParameterValidator, ValidatedParams, ValidationContext,
};
use serde_json::{Map, Value};

/// Validation and mapping against one execution context
pub struct AppSession<'a> {
    config: AppSpecConfig,
    resolver: &'a dyn ReferenceResolver,
    system: &'a dyn SystemVariables,
}

impl<'a> AppSession<'a> {
    /// Create session
    pub fn new(
        config: AppSpecConfig,
        resolver: &'a dyn ReferenceResolver,
        system: &'a dyn SystemVariables,
    ) -> Self {
        Self {
            config,
            resolver,
            system,
        }
    }

    /// Session configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AppSpecConfig {
        &self.config
    }

    /// Validate parameters submitted for an app
    ///
    /// `tag` defaults to the configured tag. Missing and unknown parameters
    /// are reported before the workspace is read; bare object names are
    /// looked up in the current workspace.
    ///
    /// # Errors
    /// - [`AppError::InvalidTag`] for an unknown tag
    /// - [`AppError::Specification`] for a malformed spec
    /// - [`AppError::Validation`] for missing, unknown or invalid parameters
    /// - [`AppError::WorkspaceUnavailable`] if the workspace name or id cannot
    ///   be read from the system variables
    pub fn validate_parameters(
        &self,
        app_id: &str,
        tag: Option<&str>,
        spec: &AppSpec,
        params: Map<String, Value>,
    ) -> Result<ValidatedParams, AppError> {
        let tag = match tag {
            Some(t) => t.parse::<ReleaseTag>()?,
            None => self.config.default_tag,
        };

        let specs = spec.parameter_specs()?;
        let app = AppLabel {
            app_id: Some(app_id.to_string()),
            tag: Some(tag.as_str().to_string()),
        };
        check_submission(&specs, &params, &app)?;

        let workspace = self
            .system
            .get(SystemVariable::Workspace)
            .ok_or(AppError::WorkspaceUnavailable(SystemVariable::Workspace))?;
        let workspace_id = self
            .system
            .get(SystemVariable::WorkspaceId)
            .ok_or(AppError::WorkspaceUnavailable(SystemVariable::WorkspaceId))?;

        tracing::info!(app_id, %tag, workspace = %workspace, workspace_id = %workspace_id, "validating app parameters");

        let ctx = ValidationContext {
            workspace,
            app,
        };
        let validated = ParameterValidator::new(self.resolver).validate(&specs, params, &ctx)?;
        Ok(validated)
    }

    /// Rebuild named parameters from positional job inputs
    ///
    /// # Errors
    /// [`AppError::Specification`] when the spec's input mapping does not fit
    /// the job inputs.
    pub fn map_inputs(&self, job_inputs: &[Value], spec: &AppSpec) -> Result<Map<String, Value>, AppError> {
        Ok(map_inputs_from_job(job_inputs, spec)?)
    }

    /// Map a job result to widget output, using the configured default widget
    ///
    /// # Errors
    /// [`AppError::Specification`] if the spec has no behavior block.
    pub fn map_outputs(
        &self,
        job_result: &Value,
        params: &Map<String, Value>,
        spec: &AppSpec,
    ) -> Result<WidgetOutput, AppError> {
        let output = OutputMapper::new(self.system)
            .with_default_widget(&self.config.default_output_widget)
            .map_outputs(job_result, params, spec)?;
        tracing::info!(widget = %output.widget, "job output mapped");
        Ok(output)
    }
}
