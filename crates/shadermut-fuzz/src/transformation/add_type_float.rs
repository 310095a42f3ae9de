use super::Transform;
use crate::context::TransformationContext;
use crate::message::{AddTypeFloatMessage, TransformationMessage};
use crate::util;
use shadermut_core::Id;
use shadermut_ir::{AnalysisSet, Instruction, Module, Type};

/// Declares a floating-point type of a width the module lacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTypeFloat {
    message: AddTypeFloatMessage,
}

impl AddTypeFloat {
    pub fn new(fresh_id: Id, width: u32) -> Self {
        Self::from_message(AddTypeFloatMessage { fresh_id, width })
    }

    pub fn from_message(message: AddTypeFloatMessage) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &AddTypeFloatMessage {
        &self.message
    }
}

impl Transform for AddTypeFloat {
    fn name(&self) -> &'static str {
        "AddTypeFloat"
    }

    fn is_applicable(&self, module: &Module, context: &TransformationContext) -> bool {
        let ty = Type::Float {
            width: self.message.width,
        };
        util::is_fresh_id(module, context, self.message.fresh_id)
            && util::type_is_supported(module, context, &ty)
            && module.type_mgr().get_id(&ty).is_none()
    }

    fn apply(&self, module: &mut Module, _context: &mut TransformationContext) {
        module.add_type_or_value(Instruction::type_float(
            self.message.fresh_id,
            self.message.width,
        ));
        module.invalidate_analyses_except_for(AnalysisSet::NONE);
    }

    fn to_message(&self) -> TransformationMessage {
        TransformationMessage::AddTypeFloat(self.message.clone())
    }
}
