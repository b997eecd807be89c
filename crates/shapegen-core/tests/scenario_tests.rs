//! End-to-end tests driving whole units through a build session.

mod helpers;

use helpers::{build, build_with_options, build_with_upstream, unit};
use shapegen_config::EngineOptions;
use shapegen_core::upstream;
use shapegen_core::{BuildError, DeriveError, FieldDefault, TypeDeriver, UsageError};
use shapegen_graph::{ModelIndex, ModelRef, ValidationIssue, Variant};
use tempfile::TempDir;

const USER_AND_ADDRESS: &str = r#"{ "models": [
    { "name": "Address", "namespace": "app",
      "model": { "variants": ["DATA", "CREATE"] },
      "fields": [{ "name": "city", "ty": { "name": "core.String" } }] },
    { "name": "User", "namespace": "app",
      "model": { "variants": ["DATA", "CREATE"] },
      "fields": [
        { "name": "name", "ty": { "name": "core.String" } },
        { "name": "address", "ty": { "name": "app.AddressSchema" }, "flatten": true }
      ] }
] }"#;

#[test]
fn flattened_address_inlines_into_user() {
    let report = build(&unit(USER_AND_ADDRESS));
    let plan = report.outcome.expect("unit should build");

    let create = plan
        .variant("app.UserSchema.CreateRequest")
        .expect("User has a create variant");
    let names: Vec<&str> = create.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["name", "city"]);
    assert!(plan.variant("app.UserSchema.PatchRequest").is_none());
}

#[test]
fn patch_on_user_is_rejected_before_emission() {
    let report = build(&unit(USER_AND_ADDRESS));
    let index = ModelIndex::from_models(report.metadata.models.clone());
    let options = EngineOptions::default();
    let user = index
        .get(&ModelRef::unversioned("app", "User"))
        .expect("User was built");

    let err = TypeDeriver::new(&index, &options)
        .derive_fields(user, Variant::PatchRequest)
        .unwrap_err();
    assert_eq!(
        err,
        DeriveError::VariantNotDeclared {
            model: "User".into(),
            variant: Variant::PatchRequest,
        }
    );
}

#[test]
fn cross_unit_dependency_names_both_models_and_variant() {
    let upstream_dir = TempDir::new().expect("tempdir");
    let order = build(&unit(
        r#"{ "models": [{ "name": "Order", "namespace": "shop",
            "model": { "variants": ["DATA"] },
            "fields": [{ "name": "id", "ty": { "name": "core.String" } }] }] }"#,
    ));
    assert!(order.outcome.is_ok());
    upstream::write(upstream_dir.path(), &order.metadata).expect("write metadata");

    let line_items = unit(
        r#"{ "models": [{ "name": "LineItem", "namespace": "shop",
            "model": { "variants": ["DATA", "CREATE"] },
            "fields": [
                { "name": "quantity", "ty": { "name": "core.Int" } },
                { "name": "order", "ty": { "name": "shop.OrderSchema" } }
            ] }] }"#,
    );
    let report = build_with_upstream(&line_items, &[upstream_dir.path().to_path_buf()]);

    // Metadata is produced even though the unit fails.
    assert_eq!(report.metadata.models.len(), 1);
    let err = report.outcome.unwrap_err();
    let BuildError::Validation(validation) = &err else {
        panic!("expected a validation failure, got {err:?}");
    };
    assert!(matches!(
        validation.issues(),
        [ValidationIssue::MissingDependency {
            variant: Variant::CreateRequest,
            ..
        }]
    ));
    let message = validation.issues()[0].to_string();
    assert!(message.contains("LineItem"));
    assert!(message.contains("Order"));
    assert!(message.contains("CREATE"));
}

fn patch_dependency(order_variants: &str) -> shapegen_core::FinishReport {
    build(&unit(&format!(
        r#"{{ "models": [
            {{ "name": "Order", "namespace": "shop",
              "model": {{ "variants": {order_variants} }},
              "fields": [{{ "name": "id", "ty": {{ "name": "core.String" }} }}] }},
            {{ "name": "Invoice", "namespace": "shop",
              "model": {{ "variants": ["DATA", "PATCH"] }},
              "fields": [{{ "name": "order", "ty": {{ "name": "shop.OrderSchema" }} }}] }}
        ] }}"#
    )))
}

#[test]
fn patch_dependency_fails_until_target_declares_patch() {
    let failing = patch_dependency(r#"["DATA"]"#);
    match failing.outcome {
        Err(BuildError::Validation(report)) => {
            assert!(report.issues().iter().any(|issue| matches!(
                issue,
                ValidationIssue::MissingDependency {
                    variant: Variant::PatchRequest,
                    ..
                }
            )));
        }
        other => panic!("expected a dependency failure, got {other:?}"),
    }

    let passing = patch_dependency(r#"["DATA", "PATCH"]"#);
    let plan = passing.outcome.expect("graph should validate");
    let order = plan
        .variant("shop.InvoiceSchema.PatchRequest")
        .and_then(|v| v.field("order"))
        .expect("order field");
    assert_eq!(
        order.ty.to_string(),
        "shapegen.runtime.Patchable<shop.OrderSchema.PatchRequest>"
    );
    assert_eq!(
        order.default,
        Some(FieldDefault::Unchanged(
            "shapegen.runtime.Patchable.Unchanged".to_string()
        ))
    );
}

#[test]
fn versioned_family_emits_discriminator_defaults() {
    let report = build(&unit(
        r#"{ "models": [
            { "name": "V1", "namespace": "bank", "family": "Account",
              "model": { "variants": ["DATA", "PATCH"] },
              "fields": [{ "name": "iban", "ty": { "name": "core.String" } }] },
            { "name": "V2", "namespace": "bank", "family": "Account",
              "model": { "variants": ["DATA", "PATCH"] },
              "fields": [
                { "name": "iban", "ty": { "name": "core.String" } },
                { "name": "owner", "ty": { "name": "core.String" } }
              ] }
        ] }"#,
    ));
    let plan = report.outcome.expect("family should build");

    let data = plan.variant("bank.AccountSchema.V2.Data").expect("V2 data");
    assert_eq!(
        data.field("schemaVersion").and_then(|f| f.default.clone()),
        Some(FieldDefault::SchemaVersion(2))
    );
    let patch = plan
        .variant("bank.AccountSchema.V1.PatchRequest")
        .expect("V1 patch");
    assert_eq!(
        patch.field("schemaVersion").and_then(|f| f.default.clone()),
        Some(FieldDefault::Unchanged(
            "shapegen.runtime.Patchable.Unchanged".to_string()
        ))
    );
    assert_eq!(plan.containers.len(), 1);
    assert_eq!(plan.containers[0].versions, ["V1", "V2"]);
}

#[test]
fn direct_model_reference_suggests_the_container() {
    let unit = unit(
        r#"{ "models": [
            { "name": "Address", "namespace": "app",
              "model": { "variants": ["DATA"] },
              "fields": [{ "name": "city", "ty": { "name": "core.String" } }] },
            { "name": "User", "namespace": "app",
              "model": { "variants": ["DATA"] },
              "fields": [{ "name": "address", "ty": { "name": "app.Address" } }] }
        ] }"#,
    );
    let mut session = shapegen_core::BuildSession::new(
        EngineOptions::default(),
        upstream::UpstreamMetadata::default(),
    );
    session.process(&unit).expect("stub pass");
    match session.process(&unit) {
        Err(BuildError::Usage(UsageError::AbstractModelReference { suggestion, .. })) => {
            assert_eq!(suggestion, "AddressSchema");
        }
        other => panic!("expected an abstract reference error, got {other:?}"),
    }
}

#[test]
fn hidden_models_cannot_be_referenced() {
    let unit = unit(
        r#"{ "models": [
            { "name": "Draft", "namespace": "app", "hide": true,
              "model": { "variants": ["DATA"] },
              "fields": [{ "name": "body", "ty": { "name": "core.String" } }] },
            { "name": "Post", "namespace": "app",
              "model": { "variants": ["DATA"] },
              "fields": [{ "name": "draft", "ty": { "name": "app.DraftSchema" } }] }
        ] }"#,
    );
    let mut session = shapegen_core::BuildSession::new(
        EngineOptions::default(),
        upstream::UpstreamMetadata::default(),
    );
    session.process(&unit).expect("stub pass");
    assert!(matches!(
        session.process(&unit),
        Err(BuildError::Usage(UsageError::UnresolvedType { .. }))
    ));
}

#[test]
fn patch_defaults_follow_configured_runtime_names() {
    let options = EngineOptions {
        patch_wrapper: "acme.Optional".to_string(),
        unchanged_case: "Absent".to_string(),
        ..EngineOptions::default()
    };
    let report = build_with_options(
        &unit(
            r#"{ "models": [{ "name": "Profile", "namespace": "app",
                 "model": { "variants": ["DATA", "PATCH"] },
                 "fields": [{ "name": "bio", "ty": { "name": "core.String" } }] }] }"#,
        ),
        options,
    );
    let plan = report.outcome.expect("profile should build");

    let bio = plan
        .variant("app.ProfileSchema.PatchRequest")
        .and_then(|v| v.field("bio"))
        .expect("bio field");
    assert_eq!(bio.ty.to_string(), "acme.Optional<core.String>");
    assert_eq!(
        bio.default,
        Some(FieldDefault::Unchanged("acme.Optional.Absent".to_string()))
    );
    let data = plan.variant("app.ProfileSchema.Data").expect("data");
    assert_eq!(data.field("bio").and_then(|f| f.default.clone()), None);
}
