//! Property-based tests for variant type derivation.

use proptest::prelude::*;
use shapegen_config::EngineOptions;
use shapegen_core::{PatchSerializers, TypeDeriver, TypeName};
use shapegen_graph::{Model, ModelIndex, ModelRef, Property, TypeInfo, Variant};

fn leaf_ref() -> ModelRef {
    ModelRef::unversioned("app", "Leaf")
}

fn leaf_model() -> Model {
    Model::builder("Leaf", "app", Variant::all())
        .property(Property::regular("id", TypeInfo::new("core.String"), Variant::all()))
        .build()
        .unwrap()
}

fn type_strategy() -> impl Strategy<Value = TypeInfo> {
    let leaf = prop_oneof![
        Just(TypeInfo::new("core.String")),
        Just(TypeInfo::new("core.Int")),
        Just(TypeInfo::new("time.Instant")),
        Just(TypeInfo::new(leaf_ref().container_name()).referencing(leaf_ref())),
    ];
    let leaf = (leaf, any::<bool>()).prop_map(|(ty, nullable)| ty.nullable(nullable));
    leaf.prop_recursive(4, 24, 3, |inner| {
        (
            prop_oneof![Just("core.List"), Just("core.Set"), Just("core.Map"), Just("app.Box")],
            prop::collection::vec(inner, 1..3),
            any::<bool>(),
        )
            .prop_map(|(raw, args, nullable)| TypeInfo::new(raw).with_args(args).nullable(nullable))
    })
}

/// An owner with one property of type `ty`, indexed together with `Leaf`.
fn graph(ty: TypeInfo, serializable: bool) -> (ModelIndex, Model) {
    let property = match ty.references().first().map(|target| (*target).clone()) {
        Some(target) => Property::foreign("value", ty, Variant::all(), target),
        None => Property::regular("value", ty, Variant::all()),
    };
    let mut builder = Model::builder("Owner", "app", Variant::all()).property(property);
    if serializable {
        builder = builder.directive("serde.Serializable");
    }
    let owner = builder.build().unwrap();
    (ModelIndex::from_models([owner.clone(), leaf_model()]), owner)
}

fn wrappers_below_root(ty: &TypeName, wrapper: &str) -> usize {
    ty.args.iter().map(|arg| arg.count(wrapper)).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Deriving the same property twice gives the same signature.
    #[test]
    fn derivation_is_idempotent(ty in type_strategy(), serializable in any::<bool>()) {
        let (index, owner) = graph(ty, serializable);
        let options = EngineOptions::default();
        let deriver = TypeDeriver::new(&index, &options);
        let property = &owner.properties[0];

        for variant in Variant::ALL {
            let first = deriver.derive_type(&owner, property, variant).unwrap();
            let second = deriver.derive_type(&owner, property, variant).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    /// Patch types are wrapped exactly once, at the root.
    #[test]
    fn patch_wrapper_is_outermost_only(ty in type_strategy(), serializable in any::<bool>()) {
        let (index, owner) = graph(ty, serializable);
        let options = EngineOptions::default();
        let deriver = TypeDeriver::new(&index, &options);
        let property = &owner.properties[0];
        let wrapper = options.patch_wrapper.as_str();

        let patch = deriver.derive_type(&owner, property, Variant::PatchRequest).unwrap();
        prop_assert_eq!(patch.raw.as_str(), wrapper);
        prop_assert!(!patch.nullable);
        prop_assert_eq!(patch.count(wrapper), 1);
        prop_assert_eq!(wrappers_below_root(&patch, wrapper), 0);

        for variant in [Variant::Data, Variant::CreateRequest] {
            let ty = deriver.derive_type(&owner, property, variant).unwrap();
            prop_assert_eq!(ty.count(wrapper), 0);
        }
    }

    /// Registering the same patch base twice reuses one serializer.
    #[test]
    fn patch_serializers_deduplicate(ty in type_strategy()) {
        let (index, owner) = graph(ty, true);
        let options = EngineOptions::default();
        let fields = TypeDeriver::new(&index, &options)
            .derive_fields(&owner, Variant::PatchRequest)
            .unwrap();
        let base = &fields[0].base;

        let mut serializers = PatchSerializers::new("app", "Owner");
        let first = serializers
            .get_or_register(base, &owner.type_serializers, &options)
            .to_string();
        let second = serializers
            .get_or_register(base, &owner.type_serializers, &options)
            .to_string();
        prop_assert_eq!(first, "app._OwnerPatchSerializer0");
        prop_assert_eq!(second, "app._OwnerPatchSerializer0");
        prop_assert_eq!(serializers.len(), 1);
    }
}
