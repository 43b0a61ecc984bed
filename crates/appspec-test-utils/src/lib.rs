//! Testing utilities for appspec workspace
//!
//! Shared fixtures: a small object catalog, representative app specs and
//! helpers for building parameter maps.

#![allow(missing_docs)]

use appspec_model::{
    AppSpec, Behavior, InputMappingEntry, MemoryCatalog, OutputMappingEntry, ParamType,
    ParameterSpec, Widgets,
};
use serde_json::{Map, Value};

pub const WORKSPACE: &str = "my_ws";
pub const WORKSPACE_ID: u64 = 11;
pub const GENOME_TYPE: &str = "KBaseGenomes.Genome-8.2";
pub const READS_TYPE: &str = "KBaseFile.PairedEndLibrary-2.0";

/// Catalog with one workspace, a genome in two versions and three read sets
pub fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_workspace(WORKSPACE_ID, WORKSPACE)
        .with_workspace(12, "shared_ws")
        .with_object(WORKSPACE_ID, 22, "genome", GENOME_TYPE, 1)
        .with_object(WORKSPACE_ID, 22, "genome", GENOME_TYPE, 3)
        .with_object(WORKSPACE_ID, 30, "reads_a", READS_TYPE, 1)
        .with_object(WORKSPACE_ID, 31, "reads_b", READS_TYPE, 2)
        .with_object(12, 5, "reads_c", READS_TYPE, 1)
}

/// The three-entry mapping of `["x", {"ws": "W", "foo": "bar"}]`
pub fn canonical_input_mapping() -> Vec<InputMappingEntry> {
    vec![
        InputMappingEntry::new(0, "an_input"),
        InputMappingEntry::new(1, "workspace").with_property("ws"),
        InputMappingEntry::new(1, "baz").with_property("foo"),
    ]
}

/// Parameters of an assembly app exercising every rule
pub fn assembly_parameters() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::new("reads", ParamType::String)
            .multiple()
            .with_allowed_types(["KBaseFile.PairedEndLibrary"]),
        ParameterSpec::new("genome", ParamType::String)
            .optional()
            .with_allowed_types(["KBaseGenomes.Genome"]),
        ParameterSpec::new("output_name", ParamType::String).output(),
        ParameterSpec::new("min_contig", ParamType::Int)
            .optional()
            .with_default(500)
            .with_min(0.0)
            .with_max(100_000.0),
        ParameterSpec::new("coverage", ParamType::Float).optional(),
        ParameterSpec::new("assembler", ParamType::Dropdown)
            .optional()
            .with_allowed_values(["spades", "megahit"]),
        ParameterSpec::new("careful", ParamType::Checkbox)
            .optional()
            .with_checkbox_map(1, 0),
        ParameterSpec::new("tuning", ParamType::Group)
            .optional()
            .multiple()
            .with_members(["kmer", "cutoff"]),
        ParameterSpec::new("kmer", ParamType::Int).optional().with_min(11.0),
        ParameterSpec::new("cutoff", ParamType::Float).optional(),
        ParameterSpec::new("label", ParamType::String)
            .optional()
            .with_regex("[a-z]+"),
    ]
}

/// Full assembly app spec with wiring and widget
pub fn assembly_spec() -> AppSpec {
    AppSpec {
        id: Some("assemble_reads".to_string()),
        parameters: assembly_parameters(),
        behavior: Some(Behavior {
            kb_service_input_mapping: Some(vec![
                InputMappingEntry::new(0, "reads")
                    .with_property("read_refs")
                    .with_transform("list(ref)"),
                InputMappingEntry::new(0, "output_name").with_property("output"),
                InputMappingEntry::new(0, "min_contig").with_property("min_contig"),
            ]),
            kb_service_output_mapping: Some(vec![
                OutputMappingEntry::result_path(["0", "report_name"]).with_target("report_name"),
                OutputMappingEntry::result_path(["0", "report_ref"]).with_target("report_ref"),
                OutputMappingEntry::system_variable("workspace").with_target("workspace_name"),
                OutputMappingEntry::input("output_name").with_target("assembly"),
            ]),
            output_mapping: None,
        }),
        widgets: Some(Widgets {
            input: None,
            output: Some("kbaseReportView".to_string()),
        }),
    }
}

/// Build a parameter map from a JSON object literal
///
/// # Panics
/// If `value` is not an object.
pub fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
