use super::Transform;
use crate::context::TransformationContext;
use crate::fact_manager::Fact;
use crate::message::{AddGlobalVariableMessage, TransformationMessage};
use crate::util;
use shadermut_core::Id;
use shadermut_ir::{AnalysisSet, Module, StorageClass};

/// Adds a global variable of Private or Workgroup storage class.
///
/// Other storage classes have externally observable interfaces, so they are
/// rejected outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddGlobalVariable {
    message: AddGlobalVariableMessage,
}

impl AddGlobalVariable {
    pub fn new(
        fresh_id: Id,
        type_id: Id,
        storage_class: StorageClass,
        initializer_id: Option<Id>,
        value_is_irrelevant: bool,
    ) -> Self {
        debug_assert!(
            !(storage_class == StorageClass::Workgroup && initializer_id.is_some()),
            "Workgroup variables cannot have an initializer"
        );
        Self::from_message(AddGlobalVariableMessage {
            fresh_id,
            type_id,
            storage_class: storage_class.as_u32(),
            initializer_id,
            value_is_irrelevant,
        })
    }

    pub fn from_message(message: AddGlobalVariableMessage) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &AddGlobalVariableMessage {
        &self.message
    }

    fn storage_class(&self) -> Option<StorageClass> {
        StorageClass::from_u32(self.message.storage_class)
            .filter(|class| matches!(class, StorageClass::Private | StorageClass::Workgroup))
    }
}

impl Transform for AddGlobalVariable {
    fn name(&self) -> &'static str {
        "AddGlobalVariable"
    }

    fn is_applicable(&self, module: &Module, context: &TransformationContext) -> bool {
        if !util::is_fresh_id(module, context, self.message.fresh_id) {
            return false;
        }
        let Some(storage_class) = self.storage_class() else {
            return false;
        };

        // The type must be a pointer with the requested storage class.
        let Some(pointer) = module
            .type_mgr()
            .get_type(self.message.type_id)
            .and_then(|ty| ty.as_pointer())
        else {
            return false;
        };
        if pointer.storage_class != storage_class {
            return false;
        }

        if let Some(initializer_id) = self.message.initializer_id {
            if storage_class == StorageClass::Workgroup {
                return false;
            }
            let constants = module.constant_mgr().get_constants_from_ids(&[initializer_id]);
            let [constant] = constants.as_slice() else {
                return false;
            };
            if !module
                .type_mgr()
                .is_same_type(pointer.pointee, constant.type_id)
            {
                return false;
            }
        }
        true
    }

    fn apply(&self, module: &mut Module, context: &mut TransformationContext) {
        let storage_class = self
            .storage_class()
            .expect("storage class is Private or Workgroup when the transformation is applicable");
        util::add_global_variable(
            module,
            self.message.fresh_id,
            self.message.type_id,
            storage_class,
            self.message.initializer_id,
        );
        module.invalidate_analyses_except_for(AnalysisSet::NONE);

        if self.message.value_is_irrelevant {
            context
                .fact_manager_mut()
                .record(Fact::PointeeValueIsIrrelevant(self.message.fresh_id));
        }
    }

    fn to_message(&self) -> TransformationMessage {
        TransformationMessage::AddGlobalVariable(self.message.clone())
    }
}
