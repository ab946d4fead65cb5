//! Movement creation requests and their pre-flight checks.

use serde::{Deserialize, Serialize};

use stockbook_core::{BranchName, DomainError, DomainResult, ProductId};
use stockbook_products::{Catalog, available_stock};

use crate::movement::Direction;
use crate::operation::OperationType;

/// Request to append a movement, as handed to the ledger store.
///
/// Id, timestamp and `stock_after` are assigned by the store. For
/// [`Direction::Adjustment`], `quantity` is the counted on-hand level the
/// product should be corrected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovement {
    pub product_id: ProductId,
    pub branch_name: Option<BranchName>,
    pub direction: Direction,
    pub operation_type: Option<OperationType>,
    pub quantity: i64,
    pub reason: Option<String>,
    pub actor_name: Option<String>,
}

impl NewMovement {
    pub fn new(product_id: ProductId, direction: Direction, quantity: i64) -> Self {
        Self {
            product_id,
            branch_name: None,
            direction,
            operation_type: None,
            quantity,
            reason: None,
            actor_name: None,
        }
    }

    pub fn incoming(product_id: ProductId, quantity: i64) -> Self {
        Self::new(product_id, Direction::In, quantity)
    }

    pub fn outgoing(product_id: ProductId, quantity: i64) -> Self {
        Self::new(product_id, Direction::Out, quantity)
    }

    pub fn recount(product_id: ProductId, counted: i64) -> Self {
        Self::new(product_id, Direction::Adjustment, counted)
    }

    pub fn with_operation(mut self, op: OperationType) -> Self {
        self.operation_type = Some(op);
        self
    }

    pub fn with_branch(mut self, branch: impl Into<BranchName>) -> Self {
        self.branch_name = Some(branch.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor_name = Some(actor.into());
        self
    }

    /// Checks that need no catalog: quantity must be positive for in/out and
    /// non-negative for a recount.
    pub fn validate_shape(&self) -> DomainResult<()> {
        match self.direction {
            Direction::In | Direction::Out if self.quantity <= 0 => {
                Err(DomainError::validation("quantity must be positive"))
            }
            Direction::Adjustment if self.quantity < 0 => {
                Err(DomainError::validation("counted quantity cannot be negative"))
            }
            _ => Ok(()),
        }
    }

    /// Pre-flight check against a catalog snapshot.
    ///
    /// Outgoing movements may not exceed the product's available stock; for
    /// composite products that is the bundle availability. Composite products
    /// can only go out: their stock follows the components.
    pub fn validate(&self, catalog: &Catalog) -> DomainResult<()> {
        self.validate_shape()?;

        let product = catalog
            .get(&self.product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {}", self.product_id)))?;

        if product.is_composite && self.direction != Direction::Out {
            return Err(DomainError::validation(
                "bundle stock follows its components and cannot be received or recounted",
            ));
        }

        if self.direction == Direction::Out {
            let available = available_stock(product, catalog);
            if self.quantity > available {
                tracing::debug!(
                    product_id = %self.product_id,
                    requested = self.quantity,
                    available,
                    "movement rejected: insufficient stock"
                );
                return Err(DomainError::insufficient_stock(self.quantity, available));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbook_products::{ComponentRequirement, Product};

    #[test]
    fn zero_quantity_is_rejected_for_in_and_out() {
        let id = ProductId::new();
        assert!(matches!(
            NewMovement::incoming(id, 0).validate_shape(),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            NewMovement::outgoing(id, -1).validate_shape(),
            Err(DomainError::Validation(_))
        ));
        assert!(NewMovement::recount(id, 0).validate_shape().is_ok());
        assert!(NewMovement::recount(id, -1).validate_shape().is_err());
    }

    #[test]
    fn unknown_product_is_not_found() {
        let err = NewMovement::incoming(ProductId::new(), 1)
            .validate(&Catalog::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn outgoing_cannot_exceed_available() {
        let p = Product::simple(ProductId::new(), "lamp", 2);
        let catalog = Catalog::new(vec![p.clone()]);

        assert!(NewMovement::outgoing(p.id, 2).validate(&catalog).is_ok());
        assert_eq!(
            NewMovement::outgoing(p.id, 3).validate(&catalog).unwrap_err(),
            DomainError::insufficient_stock(3, 2)
        );
        assert!(NewMovement::incoming(p.id, 100).validate(&catalog).is_ok());
    }

    #[test]
    fn outgoing_bundle_uses_component_availability() {
        let battery = Product::simple(ProductId::new(), "battery", 5);
        let kit = Product::composite(
            ProductId::new(),
            "kit",
            vec![ComponentRequirement::new(battery.id, 2)],
        );
        let catalog = Catalog::new(vec![battery, kit.clone()]);

        assert!(NewMovement::outgoing(kit.id, 2).validate(&catalog).is_ok());
        assert!(matches!(
            NewMovement::outgoing(kit.id, 3).validate(&catalog),
            Err(DomainError::InsufficientStock { requested: 3, available: 2 })
        ));
    }

    #[test]
    fn bundle_only_accepts_outgoing() {
        let battery = Product::simple(ProductId::new(), "battery", 5);
        let kit = Product::composite(
            ProductId::new(),
            "kit",
            vec![ComponentRequirement::new(battery.id, 1)],
        );
        let catalog = Catalog::new(vec![battery, kit.clone()]);

        assert!(matches!(
            NewMovement::incoming(kit.id, 1).validate(&catalog),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            NewMovement::recount(kit.id, 0).validate(&catalog),
            Err(DomainError::Validation(_))
        ));
    }
}
