//! Atomic, precondition-checked module edits.
//!
//! Every kind stores its persisted message as its only state, so a
//! transformation built from typed parameters and one decoded from a log
//! are the same value. Kinds are dispatched through the [`Transformation`]
//! sum type; adding a kind means adding a variant and a message.

mod add_constant_boolean;
mod add_constant_scalar;
mod add_global_variable;
mod add_type_boolean;
mod add_type_float;
mod add_type_int;
mod add_type_pointer;

pub use add_constant_boolean::AddConstantBoolean;
pub use add_constant_scalar::AddConstantScalar;
pub use add_global_variable::AddGlobalVariable;
pub use add_type_boolean::AddTypeBoolean;
pub use add_type_float::AddTypeFloat;
pub use add_type_int::AddTypeInt;
pub use add_type_pointer::AddTypePointer;

use crate::context::TransformationContext;
use crate::message::TransformationMessage;
use shadermut_ir::Module;
use tracing::debug;

/// The contract shared by every transformation kind
pub trait Transform {
    fn name(&self) -> &'static str;

    /// Pure check of the transformation's preconditions.
    ///
    /// Never mutates either argument and never panics, whatever the
    /// parameters; an inapplicable transformation simply yields false.
    fn is_applicable(&self, module: &Module, context: &TransformationContext) -> bool;

    /// Perform the edit.
    ///
    /// Must only be called right after `is_applicable` returned true for the
    /// same module and context.
    fn apply(&self, module: &mut Module, context: &mut TransformationContext);

    fn to_message(&self) -> TransformationMessage;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformation {
    AddTypeBoolean(AddTypeBoolean),
    AddTypeInt(AddTypeInt),
    AddTypeFloat(AddTypeFloat),
    AddTypePointer(AddTypePointer),
    AddConstantBoolean(AddConstantBoolean),
    AddConstantScalar(AddConstantScalar),
    AddGlobalVariable(AddGlobalVariable),
}

impl Transformation {
    pub fn from_message(message: TransformationMessage) -> Self {
        match message {
            TransformationMessage::AddTypeBoolean(m) => {
                Transformation::AddTypeBoolean(AddTypeBoolean::from_message(m))
            }
            TransformationMessage::AddTypeInt(m) => {
                Transformation::AddTypeInt(AddTypeInt::from_message(m))
            }
            TransformationMessage::AddTypeFloat(m) => {
                Transformation::AddTypeFloat(AddTypeFloat::from_message(m))
            }
            TransformationMessage::AddTypePointer(m) => {
                Transformation::AddTypePointer(AddTypePointer::from_message(m))
            }
            TransformationMessage::AddConstantBoolean(m) => {
                Transformation::AddConstantBoolean(AddConstantBoolean::from_message(m))
            }
            TransformationMessage::AddConstantScalar(m) => {
                Transformation::AddConstantScalar(AddConstantScalar::from_message(m))
            }
            TransformationMessage::AddGlobalVariable(m) => {
                Transformation::AddGlobalVariable(AddGlobalVariable::from_message(m))
            }
        }
    }

    fn kind(&self) -> &dyn Transform {
        match self {
            Transformation::AddTypeBoolean(t) => t,
            Transformation::AddTypeInt(t) => t,
            Transformation::AddTypeFloat(t) => t,
            Transformation::AddTypePointer(t) => t,
            Transformation::AddConstantBoolean(t) => t,
            Transformation::AddConstantScalar(t) => t,
            Transformation::AddGlobalVariable(t) => t,
        }
    }
}

impl Transform for Transformation {
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn is_applicable(&self, module: &Module, context: &TransformationContext) -> bool {
        self.kind().is_applicable(module, context)
    }

    fn apply(&self, module: &mut Module, context: &mut TransformationContext) {
        debug!("Applying {}: {:?}", self.name(), self.to_message());
        self.kind().apply(module, context);
    }

    fn to_message(&self) -> TransformationMessage {
        self.kind().to_message()
    }
}

impl From<TransformationMessage> for Transformation {
    fn from(message: TransformationMessage) -> Self {
        Transformation::from_message(message)
    }
}

impl From<AddTypeBoolean> for Transformation {
    fn from(t: AddTypeBoolean) -> Self {
        Transformation::AddTypeBoolean(t)
    }
}

impl From<AddTypeInt> for Transformation {
    fn from(t: AddTypeInt) -> Self {
        Transformation::AddTypeInt(t)
    }
}

impl From<AddTypeFloat> for Transformation {
    fn from(t: AddTypeFloat) -> Self {
        Transformation::AddTypeFloat(t)
    }
}

impl From<AddTypePointer> for Transformation {
    fn from(t: AddTypePointer) -> Self {
        Transformation::AddTypePointer(t)
    }
}

impl From<AddConstantBoolean> for Transformation {
    fn from(t: AddConstantBoolean) -> Self {
        Transformation::AddConstantBoolean(t)
    }
}

impl From<AddConstantScalar> for Transformation {
    fn from(t: AddConstantScalar) -> Self {
        Transformation::AddConstantScalar(t)
    }
}

impl From<AddGlobalVariable> for Transformation {
    fn from(t: AddGlobalVariable) -> Self {
        Transformation::AddGlobalVariable(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{is_valid, new_context, shader_with_globals};
    use shadermut_core::Id;
    use shadermut_ir::{AnalysisSet, StorageClass};

    fn one_of_each() -> Vec<Transformation> {
        vec![
            AddTypeBoolean::new(Id(30)).into(),
            AddTypeInt::new(Id(31), 32, false).into(),
            AddTypeFloat::new(Id(32), 16).into(),
            AddTypePointer::new(Id(33), StorageClass::Workgroup, Id(6)).into(),
            AddConstantBoolean::new(Id(34), false, true).into(),
            AddConstantScalar::new(Id(35), Id(8), vec![9], false).into(),
            AddGlobalVariable::new(Id(36), Id(10), StorageClass::Private, Some(Id(17)), true)
                .into(),
        ]
    }

    #[test]
    fn test_names_are_distinct() {
        let mut names: Vec<_> = one_of_each().iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_message_round_trip_preserves_identity() {
        for t in one_of_each() {
            let decoded = Transformation::from_message(t.to_message());
            assert_eq!(decoded, t);
            assert_eq!(decoded.to_message(), t.to_message());
        }
    }

    #[test]
    fn test_decoded_transformation_behaves_identically() {
        let module = shader_with_globals();
        let context = new_context();
        for t in one_of_each() {
            let decoded: Transformation = t.to_message().into();
            assert_eq!(
                decoded.is_applicable(&module, &context),
                t.is_applicable(&module, &context),
                "{} disagrees after round trip",
                t.name()
            );
        }
    }

    #[test]
    fn test_apply_invalidates_analyses() {
        let mut module = shader_with_globals();
        let mut context = new_context();
        let t: Transformation = AddConstantScalar::new(Id(40), Id(8), vec![1], false).into();

        assert!(t.is_applicable(&module, &context));
        assert!(module.is_analysis_valid(AnalysisSet::DEF_USE | AnalysisSet::TYPES));
        t.apply(&mut module, &mut context);
        assert!(!module.is_analysis_valid(AnalysisSet::DEF_USE));
        assert!(!module.is_analysis_valid(AnalysisSet::TYPES));
        assert!(!module.is_analysis_valid(AnalysisSet::CONSTANTS));

        // Rebuilt analyses see the new constant.
        assert!(module.constant_mgr().get_constant(Id(40)).is_some());
        assert!(is_valid(&module));
    }

    #[test]
    fn test_is_applicable_does_not_mutate() {
        let module = shader_with_globals();
        let context = new_context();
        let before = module.clone();
        for t in one_of_each() {
            t.is_applicable(&module, &context);
            t.is_applicable(&module, &context);
        }
        assert_eq!(module, before);
        assert!(context.fact_manager().is_empty());
    }
}
