use super::Transform;
use crate::context::TransformationContext;
use crate::fact_manager::Fact;
use crate::message::{AddConstantScalarMessage, TransformationMessage};
use crate::util;
use shadermut_core::Id;
use shadermut_ir::{AnalysisSet, Instruction, Module};

/// Adds an integer or floating-point `OpConstant` from its literal words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddConstantScalar {
    message: AddConstantScalarMessage,
}

impl AddConstantScalar {
    pub fn new(fresh_id: Id, type_id: Id, words: Vec<u32>, is_irrelevant: bool) -> Self {
        Self::from_message(AddConstantScalarMessage {
            fresh_id,
            type_id,
            words,
            is_irrelevant,
        })
    }

    pub fn from_message(message: AddConstantScalarMessage) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &AddConstantScalarMessage {
        &self.message
    }
}

impl Transform for AddConstantScalar {
    fn name(&self) -> &'static str {
        "AddConstantScalar"
    }

    fn is_applicable(&self, module: &Module, context: &TransformationContext) -> bool {
        if !util::is_fresh_id(module, context, self.message.fresh_id) {
            return false;
        }
        let Some(width) = module
            .type_mgr()
            .get_type(self.message.type_id)
            .and_then(|ty| ty.scalar_width())
        else {
            return false;
        };
        // One word per 32 bits, and at least one word.
        let expected_words = width.div_ceil(32).max(1) as usize;
        self.message.words.len() == expected_words
    }

    fn apply(&self, module: &mut Module, context: &mut TransformationContext) {
        module.add_type_or_value(Instruction::constant(
            self.message.fresh_id,
            self.message.type_id,
            &self.message.words,
        ));
        module.invalidate_analyses_except_for(AnalysisSet::NONE);

        if self.message.is_irrelevant {
            context
                .fact_manager_mut()
                .record(Fact::IdIsIrrelevant(self.message.fresh_id));
        }
    }

    fn to_message(&self) -> TransformationMessage {
        TransformationMessage::AddConstantScalar(self.message.clone())
    }
}
