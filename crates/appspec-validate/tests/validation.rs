//! End-to-end validation of the assembly app parameters

use appspec_model::{
    ObjectInfo, ObjectLookup, ObjectRef, ParamType, ParameterSpec, ParameterSpecs,
    ReferenceResolver, ResolveError,
};
use appspec_test_utils::{assembly_parameters, params, sample_catalog, WORKSPACE};
use appspec_validate::{ParameterValidator, ValidationContext, ValidationError};
use mockall::mock;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

mock! {
    Resolver {}

    impl ReferenceResolver for Resolver {
        fn object_info(&self, lookup: &ObjectLookup) -> Result<ObjectInfo, ResolveError>;
    }
}

fn assembly_specs() -> ParameterSpecs {
    ParameterSpecs::new(assembly_parameters()).unwrap()
}

fn ctx() -> ValidationContext {
    ValidationContext::new(WORKSPACE)
}

#[test]
fn valid_submission_is_normalized() {
    let catalog = sample_catalog();
    let submitted = params(json!({
        "reads": ["reads_a", "11/31/2"],
        "genome": "genome",
        "output_name": "contigs",
        "careful": true,
        "assembler": "spades",
        "tuning": [{"kmer": 21, "cutoff": 0.5}],
        "label": "abc",
    }));

    let result = ParameterValidator::new(&catalog)
        .validate(&assembly_specs(), submitted, &ctx())
        .unwrap();

    assert_eq!(result.params["careful"], json!(1));
    assert_eq!(result.params["min_contig"], json!(500));
    assert_eq!(result.params["reads"], json!(["reads_a", "11/31/2"]));
    assert_eq!(
        result.references,
        vec![
            ObjectRef::new(11, 30, 1),
            ObjectRef::new(11, 31, 2),
            ObjectRef::new(11, 22, 3),
        ]
    );
}

#[test]
fn unchecked_checkbox_uses_false_encoding() {
    let catalog = sample_catalog();
    let submitted = params(json!({
        "reads": ["reads_a"],
        "output_name": "contigs",
        "careful": false,
    }));
    let result = ParameterValidator::new(&catalog)
        .validate(&assembly_specs(), submitted, &ctx())
        .unwrap();
    assert_eq!(result.params["careful"], json!(0));
}

#[test]
fn missing_required_names_only_that_id() {
    let catalog = sample_catalog();
    let submitted = params(json!({"reads": ["reads_a"], "bogus": 1, "min_contig": "x"}));
    let err = ParameterValidator::new(&catalog)
        .validate(&assembly_specs(), submitted, &ctx().with_app("assemble_reads", "beta"))
        .unwrap_err();

    assert_eq!(err.parameter_ids(), vec!["output_name"]);
    assert_eq!(
        err.to_string(),
        "missing required parameters [output_name] for app 'assemble_reads' (tag beta)"
    );
}

#[test]
fn unknown_keys_in_submission_order() {
    let catalog = sample_catalog();
    let submitted = params(json!({
        "zeta": 1,
        "reads": ["reads_a"],
        "output_name": "contigs",
        "alpha": 2,
    }));
    let err = ParameterValidator::new(&catalog)
        .validate(&assembly_specs(), submitted, &ctx())
        .unwrap_err();
    assert!(matches!(
        &err,
        ValidationError::UnknownParameters { ids, .. } if ids == &["zeta", "alpha"]
    ));
}

#[test]
fn value_errors_accumulate_in_spec_order() {
    let catalog = sample_catalog();
    let submitted = params(json!({
        "label": "ABC",
        "reads": ["reads_a"],
        "output_name": "my file",
        "min_contig": 2.5,
        "assembler": "velvet",
    }));
    let err = ParameterValidator::new(&catalog)
        .validate(&assembly_specs(), submitted, &ctx())
        .unwrap_err();
    assert_eq!(
        err.messages(),
        vec![
            "output_name - Spaces are not allowed in data object names.".to_string(),
            "min_contig - Given value 2.5 is not an int".to_string(),
            "assembler - Given value 'velvet' is not permitted in the allowed set.".to_string(),
            "label - Value ABC does not match required regex [a-z]+".to_string(),
        ]
    );
}

#[test]
fn wrong_object_type_is_reported() {
    let catalog = sample_catalog();
    let submitted = params(json!({"reads": ["genome"], "output_name": "contigs"}));
    let err = ParameterValidator::new(&catalog)
        .validate(&assembly_specs(), submitted, &ctx())
        .unwrap_err();
    assert_eq!(
        err.messages(),
        vec![
            "reads[0] - Type of data object, KBaseGenomes.Genome-8.2, does not match allowed types"
                .to_string()
        ]
    );
}

#[test]
fn resolver_failure_becomes_value_message() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_object_info()
        .times(1)
        .returning(|_| Err(ResolveError::Unavailable("connection refused".to_string())));

    let specs = ParameterSpecs::new(vec![ParameterSpec::new("genome", ParamType::String)
        .with_allowed_types(["KBaseGenomes.Genome"])])
    .unwrap();
    let err = ParameterValidator::new(&resolver)
        .validate(&specs, params(json!({"genome": "g1"})), &ctx())
        .unwrap_err();

    assert_eq!(
        err.messages(),
        vec!["genome - Data object named g1 not found in workspace my_ws".to_string()]
    );
}

#[test]
fn bare_names_are_scoped_to_context_workspace() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_object_info()
        .withf(|lookup| *lookup == ObjectLookup::by_name("my_ws", "g1"))
        .times(1)
        .returning(|_| {
            Ok(ObjectInfo {
                object_id: 3,
                name: "g1".to_string(),
                type_string: "KBaseGenomes.Genome-8.2".to_string(),
                version: 4,
                workspace_id: 11,
                workspace: "my_ws".to_string(),
            })
        });

    let specs = ParameterSpecs::new(vec![ParameterSpec::new("genome", ParamType::String)
        .with_allowed_types(["KBaseGenomes.Genome"])])
    .unwrap();
    let result = ParameterValidator::new(&resolver)
        .validate(&specs, params(json!({"genome": "g1"})), &ctx())
        .unwrap();
    assert_eq!(result.references, vec![ObjectRef::new(11, 3, 4)]);
}

#[test]
fn output_parameters_never_reach_resolver() {
    let mut resolver = MockResolver::new();
    resolver.expect_object_info().never();

    let specs = ParameterSpecs::new(vec![ParameterSpec::new("out", ParamType::String)
        .with_allowed_types(["KBaseGenomes.Genome"])
        .output()])
    .unwrap();
    let result = ParameterValidator::new(&resolver)
        .validate(&specs, params(json!({"out": "new_genome"})), &ctx())
        .unwrap();
    assert!(result.references.is_empty());
}

proptest! {
    #[test]
    fn only_the_invalid_element_is_reported(bad in 0usize..3, below in 0i64..11) {
        let specs = ParameterSpecs::new(vec![
            ParameterSpec::new("k", ParamType::Int).multiple().with_min(11.0),
        ])
        .unwrap();
        let mut values = vec![json!(11), json!(20), json!(31)];
        values[bad] = json!(below);

        let catalog = sample_catalog();
        let err = ParameterValidator::new(&catalog)
            .validate(&specs, params(json!({"k": values})), &ctx())
            .unwrap_err();

        match err {
            ValidationError::InvalidValues { errors } => {
                prop_assert_eq!(errors.len(), 1);
                prop_assert_eq!(errors[0].index, Some(bad));
            }
            other => prop_assert!(false, "unexpected error {}", other),
        }
    }
}
