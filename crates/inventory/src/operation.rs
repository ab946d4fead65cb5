//! Operation categories and their presentation metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockbook_core::ValueObject;

use crate::movement::Direction;

/// Canonical operation category of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Sale,
    Purchase,
    Writeoff,
    ReturnIn,
    ReturnOut,
    TransferIn,
    TransferOut,
    Adjustment,
    ManualIn,
    ManualOut,
    Other,
}

impl OperationType {
    pub const ALL: [OperationType; 11] = [
        OperationType::Sale,
        OperationType::Purchase,
        OperationType::Writeoff,
        OperationType::ReturnIn,
        OperationType::ReturnOut,
        OperationType::TransferIn,
        OperationType::TransferOut,
        OperationType::Adjustment,
        OperationType::ManualIn,
        OperationType::ManualOut,
        OperationType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Sale => "sale",
            OperationType::Purchase => "purchase",
            OperationType::Writeoff => "writeoff",
            OperationType::ReturnIn => "return_in",
            OperationType::ReturnOut => "return_out",
            OperationType::TransferIn => "transfer_in",
            OperationType::TransferOut => "transfer_out",
            OperationType::Adjustment => "adjustment",
            OperationType::ManualIn => "manual_in",
            OperationType::ManualOut => "manual_out",
            OperationType::Other => "other",
        }
    }
}

impl core::fmt::Display for OperationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        OperationType::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown operation type: {s}"))
    }
}

/// Presentation metadata for one operation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationMeta {
    pub label: String,
    pub display_color: String,
    pub default_direction: Direction,
}

impl OperationMeta {
    pub fn new(label: impl Into<String>, display_color: impl Into<String>, default_direction: Direction) -> Self {
        Self {
            label: label.into(),
            display_color: display_color.into(),
            default_direction,
        }
    }
}

impl ValueObject for OperationMeta {}

/// Mapping from operation type to its metadata.
///
/// Only operation types present in the table count as "known" when the
/// classifier decides whether to trust a movement's explicit tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationMetadataTable {
    entries: BTreeMap<OperationType, OperationMeta>,
}

impl OperationMetadataTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, op: OperationType, meta: OperationMeta) -> Self {
        self.entries.insert(op, meta);
        self
    }

    pub fn insert(&mut self, op: OperationType, meta: OperationMeta) -> Option<OperationMeta> {
        self.entries.insert(op, meta)
    }

    pub fn contains(&self, op: OperationType) -> bool {
        self.entries.contains_key(&op)
    }

    pub fn get(&self, op: OperationType) -> Option<&OperationMeta> {
        self.entries.get(&op)
    }

    /// Metadata for `op`, falling back to the `other` entry.
    pub fn describe(&self, op: OperationType) -> Option<&OperationMeta> {
        self.get(op).or_else(|| self.get(OperationType::Other))
    }

    pub fn iter(&self) -> impl Iterator<Item = (OperationType, &OperationMeta)> {
        self.entries.iter().map(|(op, meta)| (*op, meta))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OperationMetadataTable {
    fn default() -> Self {
        use Direction::{Adjustment, In, Out};
        use OperationType as Op;

        Self::empty()
            .with(Op::Sale, OperationMeta::new("Sale", "blue", Out))
            .with(Op::Purchase, OperationMeta::new("Purchase", "green", In))
            .with(Op::Writeoff, OperationMeta::new("Write-off", "red", Out))
            .with(Op::ReturnIn, OperationMeta::new("Customer return", "cyan", In))
            .with(Op::ReturnOut, OperationMeta::new("Return to supplier", "orange", Out))
            .with(Op::TransferIn, OperationMeta::new("Transfer in", "geekblue", In))
            .with(Op::TransferOut, OperationMeta::new("Transfer out", "purple", Out))
            .with(Op::Adjustment, OperationMeta::new("Adjustment", "gold", Adjustment))
            .with(Op::ManualIn, OperationMeta::new("Manual receipt", "lime", In))
            .with(Op::ManualOut, OperationMeta::new("Manual issue", "volcano", Out))
            .with(Op::Other, OperationMeta::new("Other", "default", Adjustment))
    }
}
