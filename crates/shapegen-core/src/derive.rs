//! Rewrites declared types into variant-specific signatures.

use shapegen_config::EngineOptions;
use shapegen_graph::{
    Model, ModelIndex, ModelRef, Property, PropertyKind, TypeInfo, VERSION_FIELD, Variant,
};
use tracing::trace;

use crate::error::DeriveError;
use crate::type_name::{SerialMarker, TypeName};

/// Whether `model` carries the serializable directive for `variant`.
pub fn is_serializable(model: &Model, variant: Variant, options: &EngineOptions) -> bool {
    let directive = options.serializable_directive.as_str();
    model.directives.iter().any(|d| d == directive) || model.has_directive_for(directive, variant)
}

/// A field of a variant after flattening, with its derived type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedField<'m> {
    pub property: &'m Property,
    /// Type before patch wrapping.
    pub base: TypeName,
    pub ty: TypeName,
}

/// Derives variant types against an immutable, validated graph.
///
/// Every method is a pure function of the graph, so deriving the same
/// `(property, variant)` twice yields the same signature.
pub struct TypeDeriver<'a> {
    index: &'a ModelIndex,
    options: &'a EngineOptions,
}

impl<'a> TypeDeriver<'a> {
    pub fn new(index: &'a ModelIndex, options: &'a EngineOptions) -> Self {
        Self { index, options }
    }

    /// Type of `property` in `owner`'s `variant`, patch-wrapped for
    /// [`Variant::PatchRequest`].
    pub fn derive_type(
        &self,
        owner: &Model,
        property: &Property,
        variant: Variant,
    ) -> Result<TypeName, DeriveError> {
        let base = self.derive_base(owner, property, variant)?;
        Ok(self.finish(base, variant))
    }

    /// Every field `owner` exposes in `variant`, flattened properties
    /// expanded in place. Version discriminators of flattened targets are
    /// left out.
    pub fn derive_fields<'m>(
        &self,
        owner: &'m Model,
        variant: Variant,
    ) -> Result<Vec<DerivedField<'m>>, DeriveError>
    where
        'a: 'm,
    {
        self.check_declared(owner, variant)?;
        let mut fields = Vec::new();
        let mut path = vec![owner.key()];
        self.expand(owner, owner, variant, &mut path, &mut fields)?;
        Ok(fields)
    }

    fn expand<'m>(
        &self,
        owner: &Model,
        source: &'m Model,
        variant: Variant,
        path: &mut Vec<ModelRef>,
        fields: &mut Vec<DerivedField<'m>>,
    ) -> Result<(), DeriveError>
    where
        'a: 'm,
    {
        let inlined = path.len() > 1;
        for property in source.properties.iter().filter(|p| p.applies_to(variant)) {
            match &property.kind {
                PropertyKind::Flattened { target } => {
                    if path.contains(target) {
                        return Err(DeriveError::FlattenCycle {
                            model: owner.name.clone(),
                            target: target.clone(),
                        });
                    }
                    let inner: &'m Model =
                        self.index.get(target).ok_or_else(|| DeriveError::UnknownTarget {
                            model: source.name.clone(),
                            property: property.name.clone(),
                            target: target.clone(),
                        })?;
                    path.push(target.clone());
                    self.expand(owner, inner, variant, path, fields)?;
                    path.pop();
                }
                PropertyKind::Regular | PropertyKind::Foreign { .. } => {
                    if inlined && property.name == VERSION_FIELD {
                        continue;
                    }
                    let base = self.derive_node_tree(owner, property, variant)?;
                    let ty = self.finish(base.clone(), variant);
                    fields.push(DerivedField { property, base, ty });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn derive_base(
        &self,
        owner: &Model,
        property: &Property,
        variant: Variant,
    ) -> Result<TypeName, DeriveError> {
        self.check_declared(owner, variant)?;
        if !property.applies_to(variant) {
            return Err(DeriveError::PropertyNotInVariant {
                model: owner.name.clone(),
                property: property.name.clone(),
                variant,
            });
        }
        if property.is_flattened() {
            return Err(DeriveError::FlattenedProperty {
                model: owner.name.clone(),
                property: property.name.clone(),
            });
        }
        self.derive_node_tree(owner, property, variant)
    }

    fn check_declared(&self, owner: &Model, variant: Variant) -> Result<(), DeriveError> {
        if owner.declares(variant) {
            Ok(())
        } else {
            Err(DeriveError::VariantNotDeclared {
                model: owner.name.clone(),
                variant,
            })
        }
    }

    fn derive_node_tree(
        &self,
        owner: &Model,
        property: &Property,
        variant: Variant,
    ) -> Result<TypeName, DeriveError> {
        let derived = self.derive_node(owner, property, &property.type_info, variant)?;
        trace!(
            model = %owner.name,
            property = %property.name,
            %variant,
            ty = %derived,
            "derived field type"
        );
        Ok(derived)
    }

    fn derive_node(
        &self,
        owner: &Model,
        property: &Property,
        node: &TypeInfo,
        variant: Variant,
    ) -> Result<TypeName, DeriveError> {
        if let (true, Some(target)) = (node.arguments.is_empty(), &node.reference) {
            if !self.index.contains(target) {
                return Err(DeriveError::UnknownTarget {
                    model: owner.name.clone(),
                    property: property.name.clone(),
                    target: target.clone(),
                });
            }
            let name = format!("{}.{}", target.referenced_name(), variant.suffix());
            return Ok(TypeName::leaf(name).nullable(node.is_nullable));
        }

        let args = node
            .arguments
            .iter()
            .map(|arg| self.derive_node(owner, property, arg, variant))
            .collect::<Result<Vec<_>, _>>()?;

        let marker = match owner.type_serializers.get(&node.qualified_name) {
            Some(mapping) if variant != Variant::PatchRequest => {
                SerialMarker::With(mapping.serializer_fqn.clone())
            }
            Some(_) => SerialMarker::None,
            None if self.needs_context(owner, property, node, variant) => SerialMarker::Contextual,
            None => SerialMarker::None,
        };

        Ok(TypeName::generic(&node.qualified_name, args)
            .nullable(node.is_nullable)
            .marked(marker))
    }

    fn needs_context(
        &self,
        owner: &Model,
        property: &Property,
        node: &TypeInfo,
        variant: Variant,
    ) -> bool {
        property.auto_contextual.unwrap_or(owner.auto_contextual)
            && !self.options.is_intrinsic(&node.qualified_name)
            && is_serializable(owner, variant, self.options)
    }

    fn finish(&self, base: TypeName, variant: Variant) -> TypeName {
        match variant {
            Variant::PatchRequest => base.wrap(&self.options.patch_wrapper),
            Variant::Data | Variant::CreateRequest => base,
        }
    }
}
