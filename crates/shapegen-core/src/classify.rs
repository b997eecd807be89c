//! Classification of declared fields into graph properties.

use shapegen_graph::{Property, PropertyKind, TypeInfo, VariantSet};
use tracing::trace;

use crate::declaration::{DeclaredType, FieldDeclaration};
use crate::error::UsageError;
use crate::symbols::SymbolTable;

/// Classifies fields against the containers known to a unit.
pub struct PropertyClassifier<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> PropertyClassifier<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// Classify one field of `model` that participates in `variants`.
    pub fn classify(
        &self,
        model: &str,
        field: &FieldDeclaration,
        variants: VariantSet,
    ) -> Result<Property, UsageError> {
        if field.mutable {
            return Err(UsageError::MutableField {
                model: model.to_string(),
                field: field.name.clone(),
            });
        }

        let nodes = field.ty.nodes();
        if nodes
            .iter()
            .any(|node| node.unresolved || self.symbols.is_dangling_container_path(&node.name))
        {
            return Err(UsageError::UnresolvedType {
                model: model.to_string(),
                field: field.name.clone(),
                ty: field.ty.to_string(),
            });
        }

        for (depth, node) in nodes.iter().enumerate() {
            if let Some(suggestion) = self.symbols.abstract_suggestion(&node.name) {
                let (model, ty, suggestion) =
                    (model.to_string(), node.name.clone(), suggestion.to_string());
                let flatten = depth == 0 && field.flatten;
                let field = field.name.clone();
                return Err(if flatten {
                    UsageError::FlattenAbstractModel {
                        model,
                        field,
                        ty,
                        suggestion,
                    }
                } else {
                    UsageError::AbstractModelReference {
                        model,
                        field,
                        ty,
                        suggestion,
                    }
                });
            }
        }

        let type_info = self.type_info(&field.ty);
        let kind = self.kind(model, field, &type_info)?;
        trace!(model, field = %field.name, ?kind, "classified field");

        Ok(Property {
            name: field.name.clone(),
            type_info,
            variants,
            directives: field.directives.clone(),
            auto_contextual: field.property.as_ref().and_then(|p| p.auto_contextual),
            kind,
        })
    }

    fn kind(
        &self,
        model: &str,
        field: &FieldDeclaration,
        type_info: &TypeInfo,
    ) -> Result<PropertyKind, UsageError> {
        let invalid = |reason: &str| UsageError::InvalidFlattenTarget {
            model: model.to_string(),
            field: field.name.clone(),
            reason: reason.to_string(),
        };

        if let Some(target) = &type_info.reference {
            if !field.flatten {
                return Ok(PropertyKind::Foreign {
                    target: target.clone(),
                });
            }
            if type_info.is_nullable {
                return Err(invalid("a flattened container cannot be nullable"));
            }
            return Ok(PropertyKind::Flattened {
                target: target.clone(),
            });
        }

        if let Some(target) = type_info.references().first() {
            if field.flatten {
                return Err(invalid("the container is nested inside type arguments"));
            }
            return Ok(PropertyKind::Foreign {
                target: (*target).clone(),
            });
        }

        if field.flatten {
            return Err(invalid(&format!(
                "'{}' is not a generated container",
                field.ty
            )));
        }
        Ok(PropertyKind::Regular)
    }

    fn type_info(&self, ty: &DeclaredType) -> TypeInfo {
        let mut info = TypeInfo::new(&ty.name)
            .with_args(ty.args.iter().map(|arg| self.type_info(arg)).collect())
            .nullable(ty.nullable);
        info.is_enum = ty.is_enum;
        info.is_value_class = ty.is_value;
        info.is_data_class = ty.is_record;
        if let Some(target) = self.symbols.target(&ty.name) {
            info.reference = Some(target.clone());
        }
        info
    }
}
