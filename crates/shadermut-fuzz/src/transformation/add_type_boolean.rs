use super::Transform;
use crate::context::TransformationContext;
use crate::message::{AddTypeBooleanMessage, TransformationMessage};
use crate::util;
use shadermut_core::Id;
use shadermut_ir::{AnalysisSet, Instruction, Module};

/// Declares `OpTypeBool` in a module that lacks one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTypeBoolean {
    message: AddTypeBooleanMessage,
}

impl AddTypeBoolean {
    pub fn new(fresh_id: Id) -> Self {
        Self::from_message(AddTypeBooleanMessage { fresh_id })
    }

    pub fn from_message(message: AddTypeBooleanMessage) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &AddTypeBooleanMessage {
        &self.message
    }
}

impl Transform for AddTypeBoolean {
    fn name(&self) -> &'static str {
        "AddTypeBoolean"
    }

    fn is_applicable(&self, module: &Module, context: &TransformationContext) -> bool {
        util::is_fresh_id(module, context, self.message.fresh_id)
            && module.type_mgr().bool_type().is_none()
    }

    fn apply(&self, module: &mut Module, _context: &mut TransformationContext) {
        module.add_type_or_value(Instruction::type_bool(self.message.fresh_id));
        module.invalidate_analyses_except_for(AnalysisSet::NONE);
    }

    fn to_message(&self) -> TransformationMessage {
        TransformationMessage::AddTypeBoolean(self.message.clone())
    }
}
