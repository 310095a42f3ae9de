use super::Transform;
use crate::context::TransformationContext;
use crate::message::{AddTypeIntMessage, TransformationMessage};
use crate::util;
use shadermut_core::Id;
use shadermut_ir::{AnalysisSet, Instruction, Module, Type};

/// Declares an integer type of a width and signedness the module lacks.
///
/// Widths other than 32 need the matching capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTypeInt {
    message: AddTypeIntMessage,
}

impl AddTypeInt {
    pub fn new(fresh_id: Id, width: u32, is_signed: bool) -> Self {
        Self::from_message(AddTypeIntMessage {
            fresh_id,
            width,
            is_signed,
        })
    }

    pub fn from_message(message: AddTypeIntMessage) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &AddTypeIntMessage {
        &self.message
    }

    fn ty(&self) -> Type {
        Type::Int {
            width: self.message.width,
            signed: self.message.is_signed,
        }
    }
}

impl Transform for AddTypeInt {
    fn name(&self) -> &'static str {
        "AddTypeInt"
    }

    fn is_applicable(&self, module: &Module, context: &TransformationContext) -> bool {
        let ty = self.ty();
        util::is_fresh_id(module, context, self.message.fresh_id)
            && util::type_is_supported(module, context, &ty)
            && module.type_mgr().get_id(&ty).is_none()
    }

    fn apply(&self, module: &mut Module, _context: &mut TransformationContext) {
        module.add_type_or_value(Instruction::type_int(
            self.message.fresh_id,
            self.message.width,
            self.message.is_signed,
        ));
        module.invalidate_analyses_except_for(AnalysisSet::NONE);
    }

    fn to_message(&self) -> TransformationMessage {
        TransformationMessage::AddTypeInt(self.message.clone())
    }
}
