use super::Transform;
use crate::context::TransformationContext;
use crate::fact_manager::Fact;
use crate::message::{AddConstantBooleanMessage, TransformationMessage};
use crate::util;
use shadermut_core::Id;
use shadermut_ir::{AnalysisSet, Instruction, Module};

/// Adds an `OpConstantTrue` or `OpConstantFalse` of the module's boolean type.
///
/// The same value may be added under any number of ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddConstantBoolean {
    message: AddConstantBooleanMessage,
}

impl AddConstantBoolean {
    pub fn new(fresh_id: Id, is_true: bool, is_irrelevant: bool) -> Self {
        Self::from_message(AddConstantBooleanMessage {
            fresh_id,
            is_true,
            is_irrelevant,
        })
    }

    pub fn from_message(message: AddConstantBooleanMessage) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &AddConstantBooleanMessage {
        &self.message
    }
}

impl Transform for AddConstantBoolean {
    fn name(&self) -> &'static str {
        "AddConstantBoolean"
    }

    fn is_applicable(&self, module: &Module, context: &TransformationContext) -> bool {
        // The boolean type is never created on demand.
        module.type_mgr().bool_type().is_some()
            && util::is_fresh_id(module, context, self.message.fresh_id)
    }

    fn apply(&self, module: &mut Module, context: &mut TransformationContext) {
        let bool_type = module
            .type_mgr()
            .bool_type()
            .expect("a boolean type exists when the transformation is applicable");
        module.add_type_or_value(Instruction::constant_bool(
            self.message.fresh_id,
            bool_type,
            self.message.is_true,
        ));
        module.invalidate_analyses_except_for(AnalysisSet::NONE);

        if self.message.is_irrelevant {
            context
                .fact_manager_mut()
                .record(Fact::IdIsIrrelevant(self.message.fresh_id));
        }
    }

    fn to_message(&self) -> TransformationMessage {
        TransformationMessage::AddConstantBoolean(self.message.clone())
    }
}
