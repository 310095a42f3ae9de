use super::Transform;
use crate::context::TransformationContext;
use crate::message::{AddTypePointerMessage, TransformationMessage};
use crate::util;
use shadermut_core::Id;
use shadermut_ir::{AnalysisSet, Instruction, Module, PointerType, StorageClass, Type};

/// Declares a pointer type to an existing type.
///
/// The pointer's shape must be new, which keeps the type registry free of
/// duplicate declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTypePointer {
    message: AddTypePointerMessage,
}

impl AddTypePointer {
    pub fn new(fresh_id: Id, storage_class: StorageClass, base_type_id: Id) -> Self {
        Self::from_message(AddTypePointerMessage {
            fresh_id,
            storage_class: storage_class.as_u32(),
            base_type_id,
        })
    }

    pub fn from_message(message: AddTypePointerMessage) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &AddTypePointerMessage {
        &self.message
    }
}

impl Transform for AddTypePointer {
    fn name(&self) -> &'static str {
        "AddTypePointer"
    }

    fn is_applicable(&self, module: &Module, context: &TransformationContext) -> bool {
        if !util::is_fresh_id(module, context, self.message.fresh_id) {
            return false;
        }
        let Some(storage_class) = StorageClass::from_u32(self.message.storage_class) else {
            return false;
        };
        let types = module.type_mgr();
        if types.get_type(self.message.base_type_id).is_none() {
            return false;
        }
        types
            .get_id(&Type::Pointer(PointerType {
                pointee: self.message.base_type_id,
                storage_class,
            }))
            .is_none()
    }

    fn apply(&self, module: &mut Module, _context: &mut TransformationContext) {
        let storage_class = StorageClass::from_u32(self.message.storage_class)
            .expect("storage class decodes when the transformation is applicable");
        module.add_type_or_value(Instruction::type_pointer(
            self.message.fresh_id,
            storage_class,
            self.message.base_type_id,
        ));
        module.invalidate_analyses_except_for(AnalysisSet::NONE);
    }

    fn to_message(&self) -> TransformationMessage {
        TransformationMessage::AddTypePointer(self.message.clone())
    }
}
