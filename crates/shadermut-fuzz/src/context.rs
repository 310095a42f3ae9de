//! State threaded through every transformation call.

use crate::fact_manager::FactManager;
use shadermut_core::ValidatorOptions;

/// Owns the fact store and validator options for one fuzzing session.
///
/// Exactly one context accompanies a module while it is being mutated.
#[derive(Debug, Clone, Default)]
pub struct TransformationContext {
    fact_manager: FactManager,
    validator_options: ValidatorOptions,
}

impl TransformationContext {
    pub fn new(fact_manager: FactManager, validator_options: ValidatorOptions) -> Self {
        Self {
            fact_manager,
            validator_options,
        }
    }

    pub fn fact_manager(&self) -> &FactManager {
        &self.fact_manager
    }

    pub fn fact_manager_mut(&mut self) -> &mut FactManager {
        &mut self.fact_manager
    }

    pub fn validator_options(&self) -> &ValidatorOptions {
        &self.validator_options
    }

    pub fn into_fact_manager(self) -> FactManager {
        self.fact_manager
    }
}
