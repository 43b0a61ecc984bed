//! Subcommands run against files in a temporary directory

use appspec_cli::{command, run, Report};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

const SPEC: &str = r#"
id: count_kmers
parameters:
  - id: reads
    type: string
    allowed_types: [KBaseFile.PairedEndLibrary]
  - id: k
    type: int
    optional: true
    default: 21
    min_val: 1
  - id: output_name
    type: string
    is_output: true
behavior:
  kb_service_input_mapping:
    - input_parameter: reads
      target_property: reads_ref
    - input_parameter: k
      target_property: k
  kb_service_output_mapping:
    - service_method_output_path: ["0", "count"]
      target_property: count
    - narrative_system_variable: workspace_id
      target_property: ws_id
widgets:
  output: kmerCountView
"#;

fn catalog() -> Value {
    json!({
        "workspaces": [{"id": 11, "name": "my_ws"}],
        "objects": [{
            "object_id": 30,
            "name": "reads_a",
            "type_string": "KBaseFile.PairedEndLibrary-2.0",
            "version": 1,
            "workspace_id": 11,
            "workspace": "my_ws"
        }]
    })
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        std::fs::write(fixture.path("spec.yaml"), SPEC).unwrap();
        fixture.write_json("catalog.json", &catalog());
        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_json(&self, name: &str, value: &Value) -> String {
        let path = self.path(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path.display().to_string()
    }

    fn arg(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<Report> {
        let mut argv = vec!["appspec".to_string()];
        argv.extend(args.iter().map(|a| (*a).to_string()));
        let matches = command().try_get_matches_from(argv).unwrap();
        run(&matches)
    }
}

#[test]
fn check_spec_summarizes() {
    let f = Fixture::new();
    let report = f.run(&["check-spec", "--spec", &f.arg("spec.yaml")]).unwrap();
    assert_eq!(
        report,
        Report::Ok(json!({
            "id": "count_kmers",
            "parameters": 3,
            "input_mapping": 2,
            "output_mapping": 2,
            "output_widget": "kmerCountView",
        }))
    );
}

#[test]
fn validate_accepts_and_normalizes() {
    let f = Fixture::new();
    let params = f.write_json("params.json", &json!({"reads": "reads_a", "output_name": "counts"}));
    let report = f
        .run(&[
            "validate",
            "--spec",
            &f.arg("spec.yaml"),
            "--params",
            &params,
            "--catalog",
            &f.arg("catalog.json"),
            "--workspace",
            "my_ws",
        ])
        .unwrap();

    assert_eq!(report.exit_code(), 0);
    assert_eq!(
        report.json(),
        &json!({
            "params": {"reads": "reads_a", "output_name": "counts", "k": 21},
            "references": ["11/30/1"],
        })
    );
}

#[test]
fn validate_reports_rejection_with_exit_code() {
    let f = Fixture::new();
    let params = f.write_json("params.json", &json!({"reads": "reads_a", "output_name": "counts", "k": 0}));
    let report = f
        .run(&[
            "validate",
            "--spec",
            &f.arg("spec.yaml"),
            "--params",
            &params,
            "--catalog",
            &f.arg("catalog.json"),
            "--workspace",
            "my_ws",
            "--tag",
            "dev",
        ])
        .unwrap();

    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.json()["messages"], json!(["k - Given value 0 should be >= 1"]));
    assert_eq!(report.json()["parameters"], json!(["k"]));
}

#[test]
fn validate_rejects_unknown_tag() {
    let f = Fixture::new();
    let params = f.write_json("params.json", &json!({}));
    let err = f
        .run(&[
            "validate",
            "--spec",
            &f.arg("spec.yaml"),
            "--params",
            &params,
            "--workspace",
            "my_ws",
            "--tag",
            "nightly",
        ])
        .unwrap_err();
    assert!(format!("{err:#}").contains("can't find tag nightly"));
}

#[test]
fn map_inputs_reads_positional_inputs() {
    let f = Fixture::new();
    let inputs = f.write_json("inputs.json", &json!([{"reads_ref": "my_ws/reads_a", "k": 31}]));
    let report = f
        .run(&["map-inputs", "--spec", &f.arg("spec.yaml"), "--job-inputs", &inputs])
        .unwrap();
    assert_eq!(report.json(), &json!({"reads": "my_ws/reads_a", "k": 31}));
}

#[test]
fn map_inputs_requires_array() {
    let f = Fixture::new();
    let inputs = f.write_json("inputs.json", &json!({"reads_ref": "x"}));
    let err = f
        .run(&["map-inputs", "--spec", &f.arg("spec.yaml"), "--job-inputs", &inputs])
        .unwrap_err();
    assert!(err.to_string().contains("must contain a JSON array"));
}

#[test]
fn map_outputs_uses_workspace_id_from_catalog() {
    let f = Fixture::new();
    let result = f.write_json("result.json", &json!([{"count": 1234}]));
    let report = f
        .run(&[
            "map-outputs",
            "--spec",
            &f.arg("spec.yaml"),
            "--result",
            &result,
            "--catalog",
            &f.arg("catalog.json"),
            "--workspace",
            "my_ws",
        ])
        .unwrap();
    assert_eq!(
        report.json(),
        &json!({"widget": "kmerCountView", "params": {"count": 1234, "ws_id": "11"}})
    );
}

#[test]
fn config_file_is_applied() {
    let f = Fixture::new();
    std::fs::write(f.path("appspec.toml"), "default_tag = \"nightly\"\n").unwrap();
    let err = f
        .run(&["--config", &f.arg("appspec.toml"), "check-spec", "--spec", &f.arg("spec.yaml")])
        .unwrap_err();
    assert!(format!("{err:#}").contains("loading configuration"));
}

#[test]
fn subcommand_is_required() {
    assert!(command().try_get_matches_from(["appspec"]).is_err());
}
