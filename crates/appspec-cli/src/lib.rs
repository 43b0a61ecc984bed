//! appspec command line
//!
//! Offline front end over [`appspec_core::AppSession`]. Every subcommand reads
//! JSON (or YAML specs) from files and writes one JSON document to stdout.

#![allow(missing_docs)]

use anyhow::{bail, Context, Result};
use appspec_core::{AppError, AppSession, AppSpecConfig};
use appspec_mapping::{ContextSystemVariables, ProcessContext};
use appspec_model::{AppSpec, MemoryCatalog};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// Result of a subcommand
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// The command succeeded
    Ok(Value),
    /// The submitted parameters were rejected
    Invalid(Value),
}

impl Report {
    /// Process exit code
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Ok(_) => 0,
            Self::Invalid(_) => 1,
        }
    }

    /// Document to print
    #[must_use]
    pub fn json(&self) -> &Value {
        match self {
            Self::Ok(v) | Self::Invalid(v) => v,
        }
    }
}

fn path_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

/// Command line definition
#[must_use]
pub fn command() -> Command {
    Command::new("appspec")
        .version(appspec_core::VERSION)
        .about("Check app specs, validate parameters and map job inputs and outputs")
        .subcommand_required(true)
        .arg(
            path_arg("config", "TOML configuration file").global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log at debug level"),
        )
        .subcommand(
            Command::new("check-spec")
                .about("Parse an app spec and check its parameter declarations")
                .arg(path_arg("spec", "App spec file (JSON or YAML)").required(true)),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate submitted parameters against an app spec")
                .arg(path_arg("spec", "App spec file (JSON or YAML)").required(true))
                .arg(path_arg("params", "JSON object of submitted parameters").required(true))
                .arg(path_arg(
                    "catalog",
                    "JSON object catalog; must list the workspace",
                ))
                .arg(
                    Arg::new("workspace")
                        .long("workspace")
                        .help("Workspace name; defaults to the configured environment variable"),
                )
                .arg(
                    Arg::new("app-id")
                        .long("app-id")
                        .help("App id quoted in messages; defaults to the spec id"),
                )
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .help("Release tag: release, beta or dev"),
                ),
        )
        .subcommand(
            Command::new("map-inputs")
                .about("Rebuild named parameters from positional job inputs")
                .arg(path_arg("spec", "App spec file (JSON or YAML)").required(true))
                .arg(path_arg("job-inputs", "JSON array of job inputs").required(true)),
        )
        .subcommand(
            Command::new("map-outputs")
                .about("Map a job result to output widget parameters")
                .arg(path_arg("spec", "App spec file (JSON or YAML)").required(true))
                .arg(path_arg("result", "JSON job result").required(true))
                .arg(
                    path_arg("params", "JSON object of submitted parameters"),
                )
                .arg(
                    Arg::new("workspace")
                        .long("workspace")
                        .help("Workspace name; defaults to the configured environment variable"),
                )
                .arg(path_arg("catalog", "JSON object catalog for workspace ids")),
        )
}

/// Run the selected subcommand
///
/// # Errors
/// Unreadable or malformed input files, malformed specs and anything other
/// than rejected parameters.
pub fn run(matches: &ArgMatches) -> Result<Report> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => AppSpecConfig::from_path(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => AppSpecConfig::default(),
    };

    match matches.subcommand() {
        Some(("check-spec", args)) => check_spec(args),
        Some(("validate", args)) => validate(args, config),
        Some(("map-inputs", args)) => map_inputs(args, config),
        Some(("map-outputs", args)) => map_outputs(args, config),
        Some((other, _)) => bail!("unknown subcommand {other}"),
        None => bail!("no subcommand given"),
    }
}

fn required<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(id)
        .with_context(|| format!("--{id} is required"))
}

fn load_spec(args: &ArgMatches) -> Result<AppSpec> {
    let path = required(args, "spec")?;
    AppSpec::from_path(path).with_context(|| format!("loading app spec {}", path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn read_object(path: &Path) -> Result<Map<String, Value>> {
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}

fn load_catalog(args: &ArgMatches) -> Result<MemoryCatalog> {
    match args.get_one::<PathBuf>("catalog") {
        Some(path) => MemoryCatalog::from_path(path)
            .with_context(|| format!("loading catalog {}", path.display())),
        None => Ok(MemoryCatalog::new()),
    }
}

fn system_variables(
    args: &ArgMatches,
    config: &AppSpecConfig,
    catalog: MemoryCatalog,
) -> ContextSystemVariables<MemoryCatalog> {
    let env = config.process_context();
    let workspace = args.get_one::<String>("workspace").cloned().or(env.workspace);
    ContextSystemVariables::new(ProcessContext::new(workspace, env.token), catalog)
}

fn check_spec(args: &ArgMatches) -> Result<Report> {
    let spec = load_spec(args)?;
    let params = spec
        .parameter_specs()
        .context("checking parameter declarations")?;
    let behavior = spec.behavior.as_ref();
    Ok(Report::Ok(json!({
        "id": spec.id,
        "parameters": params.len(),
        "input_mapping": behavior.map_or(0, |b| b.input_mapping().len()),
        "output_mapping": behavior.map_or(0, |b| b.output_mapping().len()),
        "output_widget": spec.output_widget(),
    })))
}

fn validate(args: &ArgMatches, config: AppSpecConfig) -> Result<Report> {
    let spec = load_spec(args)?;
    let params = read_object(required(args, "params")?)?;
    let catalog = load_catalog(args)?;
    let system = system_variables(args, &config, catalog.clone());

    let app_id = args
        .get_one::<String>("app-id")
        .cloned()
        .or_else(|| spec.id.clone())
        .unwrap_or_else(|| "unnamed".to_string());
    let tag = args.get_one::<String>("tag").map(String::as_str);

    let session = AppSession::new(config, &catalog, &system);
    match session.validate_parameters(&app_id, tag, &spec, params) {
        Ok(validated) => Ok(Report::Ok(serde_json::to_value(validated)?)),
        Err(AppError::Validation(e)) => {
            tracing::debug!(error = %e, "parameters rejected");
            Ok(Report::Invalid(json!({
                "error": e.to_string(),
                "parameters": e.parameter_ids(),
                "messages": e.messages(),
            })))
        }
        Err(e) => Err(e).context("validating parameters"),
    }
}

fn map_inputs(args: &ArgMatches, config: AppSpecConfig) -> Result<Report> {
    let spec = load_spec(args)?;
    let inputs_path = required(args, "job-inputs")?;
    let Value::Array(inputs) = read_json(inputs_path)? else {
        bail!("{} must contain a JSON array", inputs_path.display());
    };

    let catalog = MemoryCatalog::new();
    let system = ContextSystemVariables::new(ProcessContext::default(), catalog.clone());
    let session = AppSession::new(config, &catalog, &system);
    let named = session
        .map_inputs(&inputs, &spec)
        .context("mapping job inputs")?;
    Ok(Report::Ok(Value::Object(named)))
}

fn map_outputs(args: &ArgMatches, config: AppSpecConfig) -> Result<Report> {
    let spec = load_spec(args)?;
    let result = read_json(required(args, "result")?)?;
    let params = match args.get_one::<PathBuf>("params") {
        Some(path) => read_object(path)?,
        None => Map::new(),
    };
    let catalog = load_catalog(args)?;
    let system = system_variables(args, &config, catalog.clone());

    let session = AppSession::new(config, &catalog, &system);
    let output = session
        .map_outputs(&result, &params, &spec)
        .context("mapping job outputs")?;
    Ok(Report::Ok(serde_json::to_value(output)?))
}
