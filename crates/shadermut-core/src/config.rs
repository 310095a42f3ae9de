//! Configuration types for the mutation engine.

use serde::{Deserialize, Serialize};

/// Options handed to the module validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Exclusive upper limit on ids a valid module may bind
    pub max_id_bound: u32,
    /// Require the matching capability for non-32-bit int/float types
    pub check_capabilities: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_id_bound: 0x3F_FFFF, // universal limit for SPIR-V consumers
            check_capabilities: true,
        }
    }
}

/// Transformation sequence replay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Validate the input module and the module after every applied transformation
    pub validate_after_each: bool,
    /// Stop after considering this many transformations
    pub max_transformations: Option<usize>,
}
