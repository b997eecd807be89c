//! Turns raw directives into variant sets and directive attachments.

use shapegen_config::EngineOptions;
use shapegen_graph::{
    DirectiveConfig, SerializerMapping, SerializerMappings, Variant, VariantSet, Versioning,
};
use tracing::debug;

use crate::declaration::{
    ApplyDirective, ConfigDeclaration, ModelDeclaration, ModelDirective, PropertyDirective,
};
use crate::error::UsageError;

fn parse_variants<'a>(
    model: &str,
    names: impl IntoIterator<Item = &'a String>,
) -> Result<VariantSet, UsageError> {
    names
        .into_iter()
        .map(|name| {
            name.parse::<Variant>().map_err(|_| UsageError::UnknownVariant {
                model: model.to_string(),
                name: name.clone(),
            })
        })
        .collect()
}

/// The variants a model declares. The list is mandatory and non-empty.
pub fn resolve_model_variants(
    model: &str,
    directive: &ModelDirective,
) -> Result<VariantSet, UsageError> {
    let names = directive
        .variants
        .as_ref()
        .filter(|names| !names.is_empty())
        .ok_or_else(|| UsageError::MissingVariants {
            model: model.to_string(),
        })?;
    parse_variants(model, names)
}

/// The variants a property participates in.
///
/// Without a directive the property inherits `model_variants`. A non-empty
/// include list is used verbatim; otherwise the exclude list is subtracted.
pub fn resolve_property_variants(
    model: &str,
    model_variants: &VariantSet,
    directive: Option<&PropertyDirective>,
) -> Result<VariantSet, UsageError> {
    let Some(directive) = directive else {
        return Ok(model_variants.clone());
    };
    let include = parse_variants(model, &directive.include)?;
    if !include.is_empty() {
        return Ok(include);
    }
    let exclude = parse_variants(model, &directive.exclude)?;
    Ok(model_variants.difference(&exclude).copied().collect())
}

/// Expand apply rules into one attachment per extra directive.
pub fn resolve_apply(
    model: &str,
    model_variants: &VariantSet,
    rules: &[ApplyDirective],
) -> Result<Vec<DirectiveConfig>, UsageError> {
    let mut configs = Vec::new();
    for rule in rules {
        let include = parse_variants(model, &rule.include)?;
        let exclude = parse_variants(model, &rule.exclude)?;

        let offending: VariantSet = include
            .union(&exclude)
            .filter(|variant| !model_variants.contains(variant))
            .copied()
            .collect();
        if !offending.is_empty() {
            return Err(UsageError::UnknownApplyVariants {
                model: model.to_string(),
                offending,
                allowed: model_variants.clone(),
            });
        }

        let initial = if include.is_empty() { model_variants } else { &include };
        let variants: VariantSet = initial.difference(&exclude).copied().collect();
        configs.extend(rule.directives.iter().map(|directive| DirectiveConfig {
            directive: directive.clone(),
            variants: variants.clone(),
        }));
    }
    Ok(configs)
}

/// Family membership and schema version of a declaration.
pub fn resolve_versioning(decl: &ModelDeclaration) -> Result<Option<Versioning>, UsageError> {
    let Some(family) = &decl.family else {
        if decl.schema_version.is_some() {
            return Err(UsageError::UnexpectedSchemaVersion {
                model: decl.name.clone(),
            });
        }
        return Ok(None);
    };

    let schema_version = decl
        .schema_version
        .or_else(|| version_from_name(&decl.name))
        .ok_or_else(|| UsageError::MissingSchemaVersion {
            model: decl.name.clone(),
            family: family.clone(),
        })?;

    Ok(Some(Versioning {
        base_name: family.clone(),
        schema_version,
    }))
}

/// `V12` → `12`.
fn version_from_name(name: &str) -> Option<u32> {
    let digits = name.strip_prefix('V')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Serializer overrides from the unit's global configuration object, if any.
pub fn resolve_global_config(
    configs: &[ConfigDeclaration],
    options: &EngineOptions,
) -> Result<SerializerMappings, UsageError> {
    let config = match configs {
        [] => return Ok(SerializerMappings::new()),
        [config] => config,
        _ => {
            return Err(UsageError::MultipleConfigs {
                names: configs.iter().map(|c| c.name.clone()).collect(),
            });
        }
    };

    if !config.singleton {
        return Err(UsageError::ConfigNotSingleton {
            name: config.name.clone(),
        });
    }
    if !config.serialization_config {
        return Err(UsageError::ConfigMissingCapability {
            name: config.name.clone(),
            capability: options.serialization_config.clone(),
        });
    }

    let mappings: SerializerMappings = config
        .serializers
        .iter()
        .map(|entry| {
            SerializerMapping::new(&entry.target, &entry.serializer, entry.serializer_is_object)
        })
        .collect();
    debug!(config = %config.name, mappings = mappings.len(), "resolved global configuration");
    Ok(mappings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::SerializerDeclaration;

    fn set(variants: &[Variant]) -> VariantSet {
        variants.iter().copied().collect()
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn directive(variants: Option<&[&str]>) -> ModelDirective {
        ModelDirective {
            variants: variants.map(strings),
            ..ModelDirective::default()
        }
    }

    #[test]
    fn model_variants_are_mandatory() {
        let err = resolve_model_variants("User", &directive(None)).unwrap_err();
        assert!(matches!(err, UsageError::MissingVariants { ref model } if model == "User"));

        let err = resolve_model_variants("User", &directive(Some(&[]))).unwrap_err();
        assert!(matches!(err, UsageError::MissingVariants { .. }));
    }

    #[test]
    fn model_variants_reject_unknown_names() {
        let err = resolve_model_variants("User", &directive(Some(&["DATA", "UPSERT"]))).unwrap_err();
        assert_eq!(err.to_string(), "model 'User' names unknown variant 'UPSERT'");
    }

    #[test]
    fn property_include_wins_over_exclude() {
        let model = Variant::all();
        let directive = PropertyDirective {
            include: strings(&["CREATE"]),
            exclude: strings(&["CREATE"]),
            auto_contextual: None,
        };
        let variants = resolve_property_variants("User", &model, Some(&directive)).unwrap();
        assert_eq!(variants, set(&[Variant::CreateRequest]));
    }

    #[test]
    fn property_exclude_subtracts_from_model() {
        let model = set(&[Variant::Data, Variant::PatchRequest]);
        let directive = PropertyDirective {
            exclude: strings(&["PATCH"]),
            ..PropertyDirective::default()
        };
        let variants = resolve_property_variants("User", &model, Some(&directive)).unwrap();
        assert_eq!(variants, set(&[Variant::Data]));
        assert_eq!(resolve_property_variants("User", &model, None).unwrap(), model);
    }

    #[test]
    fn apply_targets_include_minus_exclude() {
        let model = Variant::all();
        let rules = vec![
            ApplyDirective {
                directives: strings(&["serde.Serializable", "app.Audited"]),
                include: Vec::new(),
                exclude: strings(&["PATCH"]),
            },
            ApplyDirective {
                directives: strings(&["app.Public"]),
                include: strings(&["DATA"]),
                exclude: Vec::new(),
            },
        ];
        let configs = resolve_apply("User", &model, &rules).unwrap();
        assert_eq!(configs.len(), 3);
        assert_eq!(configs[0].variants, set(&[Variant::Data, Variant::CreateRequest]));
        assert_eq!(configs[1].directive, "app.Audited");
        assert_eq!(configs[2].variants, set(&[Variant::Data]));
    }

    #[test]
    fn apply_rejects_variants_outside_model() {
        let model = set(&[Variant::Data, Variant::CreateRequest]);
        let rules = vec![ApplyDirective {
            directives: strings(&["serde.Serializable"]),
            include: strings(&["DATA"]),
            exclude: strings(&["PATCH"]),
        }];
        let err = resolve_apply("User", &model, &rules).unwrap_err();
        match err {
            UsageError::UnknownApplyVariants {
                offending, allowed, ..
            } => {
                assert_eq!(offending, set(&[Variant::PatchRequest]));
                assert_eq!(allowed, model);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn version_decl(name: &str, family: Option<&str>, schema_version: Option<u32>) -> ModelDeclaration {
        ModelDeclaration {
            name: name.into(),
            namespace: "app".into(),
            family: family.map(String::from),
            model: directive(Some(&["DATA"])),
            schema_version,
            hide: false,
            apply: Vec::new(),
            directives: Vec::new(),
            fields: Vec::new(),
        }
    }

    #[test]
    fn versioning_from_name_or_directive() {
        let v = resolve_versioning(&version_decl("V12", Some("Account"), None)).unwrap().unwrap();
        assert_eq!(v.schema_version, 12);
        assert_eq!(v.base_name, "Account");

        let v = resolve_versioning(&version_decl("Legacy", Some("Account"), Some(3))).unwrap().unwrap();
        assert_eq!(v.schema_version, 3);

        assert!(resolve_versioning(&version_decl("User", None, None)).unwrap().is_none());
    }

    #[test]
    fn versioning_errors() {
        let err = resolve_versioning(&version_decl("Legacy", Some("Account"), None)).unwrap_err();
        assert!(matches!(err, UsageError::MissingSchemaVersion { .. }));

        let err = resolve_versioning(&version_decl("V", Some("Account"), None)).unwrap_err();
        assert!(matches!(err, UsageError::MissingSchemaVersion { .. }));

        let err = resolve_versioning(&version_decl("User", None, Some(1))).unwrap_err();
        assert!(matches!(err, UsageError::UnexpectedSchemaVersion { .. }));
    }

    fn config(name: &str, singleton: bool, capability: bool) -> ConfigDeclaration {
        ConfigDeclaration {
            name: name.into(),
            singleton,
            serialization_config: capability,
            serializers: vec![SerializerDeclaration {
                target: "time.Instant".into(),
                serializer: "app.InstantSerializer".into(),
                serializer_is_object: true,
            }],
        }
    }

    #[test]
    fn global_config_rules() {
        let options = EngineOptions::default();
        assert!(resolve_global_config(&[], &options).unwrap().is_empty());

        let mappings = resolve_global_config(&[config("Cfg", true, true)], &options).unwrap();
        assert!(mappings.get("time.Instant").unwrap().is_serializer_object);

        let err = resolve_global_config(&[config("A", true, true), config("B", true, true)], &options)
            .unwrap_err();
        assert_eq!(err.to_string(), "multiple global configurations found: A, B");

        let err = resolve_global_config(&[config("Cfg", false, true)], &options).unwrap_err();
        assert!(matches!(err, UsageError::ConfigNotSingleton { .. }));

        let err = resolve_global_config(&[config("Cfg", true, false)], &options).unwrap_err();
        assert_eq!(
            err.to_string(),
            "global configuration 'Cfg' must implement 'shapegen.runtime.SerializationConfig'"
        );
    }
}
