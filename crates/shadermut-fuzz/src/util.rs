//! Module queries and edits shared by transformations.

use crate::context::TransformationContext;
use shadermut_core::Id;
use shadermut_ir::{Instruction, Module, StorageClass, Type};

/// Returns true if `id` may be bound by a new instruction.
///
/// The id must be non-null, unbound, and small enough that binding it keeps
/// the module under the validator's id limit.
pub fn is_fresh_id(module: &Module, context: &TransformationContext, id: Id) -> bool {
    !id.is_null()
        && id.0 < context.validator_options().max_id_bound
        && !module.def_use_mgr().is_defined(id)
}

/// Returns true if a scalar type of this shape may be declared in `module`
pub fn type_is_supported(module: &Module, context: &TransformationContext, ty: &Type) -> bool {
    if !ty.has_supported_width() {
        return false;
    }
    match ty.required_capability() {
        Some(capability) => {
            !context.validator_options().check_capabilities || module.has_capability(capability)
        }
        None => true,
    }
}

/// Append a global variable to the types/values section
pub fn add_global_variable(
    module: &mut Module,
    fresh_id: Id,
    pointer_type_id: Id,
    storage_class: StorageClass,
    initializer_id: Option<Id>,
) {
    debug_assert!(
        matches!(storage_class, StorageClass::Private | StorageClass::Workgroup),
        "Global variables may only be added with Private or Workgroup storage class"
    );
    module.add_type_or_value(Instruction::variable(
        fresh_id,
        pointer_type_id,
        storage_class,
        initializer_id,
    ));
}
