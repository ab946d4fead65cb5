//! Operation classifier.
//!
//! Resolution order:
//! 1. an explicit `operation_type` that the metadata table knows, unchanged;
//! 2. a reason text starting with a "sale" token → `sale`;
//! 3. the movement direction: `in` → `manual_in`, `out` → `manual_out`,
//!    otherwise `adjustment`.
//!
//! Classification is total and pure.

use serde::{Deserialize, Serialize};

use crate::movement::{Direction, Movement};
use crate::operation::{OperationMetadataTable, OperationType};

/// Inventory policy knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Reason prefixes (case-insensitive) that mark an untagged movement as a sale.
    pub sale_reason_prefixes: Vec<String>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            sale_reason_prefixes: vec!["продажа".to_string(), "sale".to_string()],
        }
    }
}

/// Classifier bound to an operation metadata table and reason vocabulary.
#[derive(Debug, Clone)]
pub struct Classifier {
    metadata: OperationMetadataTable,
    sale_prefixes: Vec<String>,
}

impl Classifier {
    pub fn new(metadata: OperationMetadataTable, config: &InventoryConfig) -> Self {
        let sale_prefixes = config
            .sale_reason_prefixes
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            metadata,
            sale_prefixes,
        }
    }

    pub fn metadata(&self) -> &OperationMetadataTable {
        &self.metadata
    }

    pub fn classify(&self, movement: &Movement) -> OperationType {
        if let Some(op) = movement.operation_type {
            if self.metadata.contains(op) {
                return op;
            }
        }

        if self.reason_marks_sale(movement.reason.as_deref()) {
            return OperationType::Sale;
        }

        match movement.direction {
            Direction::In => OperationType::ManualIn,
            Direction::Out => OperationType::ManualOut,
            Direction::Adjustment => OperationType::Adjustment,
        }
    }

    fn reason_marks_sale(&self, reason: Option<&str>) -> bool {
        let Some(reason) = reason else {
            return false;
        };
        let reason = reason.trim_start().to_lowercase();
        self.sale_prefixes.iter().any(|p| reason.starts_with(p.as_str()))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(OperationMetadataTable::default(), &InventoryConfig::default())
    }
}

/// Classify with the default reason vocabulary against `metadata`.
pub fn classify(movement: &Movement, metadata: &OperationMetadataTable) -> OperationType {
    Classifier::new(metadata.clone(), &InventoryConfig::default()).classify(movement)
}
