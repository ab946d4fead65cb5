//! Ledger store seam and an in-memory reference store.
//!
//! Production writes go to an external system of record; the in-memory store
//! mirrors its contract for tests and local runs, including bundle sales that
//! draw their components down.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use stockbook_core::{DomainError, DomainResult, MovementId, ProductId};
use stockbook_products::{Catalog, ComponentRequirement, producible_units};

use crate::ledger::LedgerScope;
use crate::movement::{Direction, Movement};
use crate::request::NewMovement;

/// System of record for movements.
///
/// The store assigns ids, computes `stock_after` at write time and persists;
/// existing entries are never rewritten. Concurrency control is the store's
/// responsibility, not the caller's.
pub trait LedgerStore: Send + Sync {
    /// Movements matching `scope`, in arrival order.
    fn list(&self, scope: &LedgerScope) -> DomainResult<Vec<Movement>>;

    /// Accept a request and return the entry as written.
    fn append(&self, request: NewMovement, at: DateTime<Utc>) -> DomainResult<Movement>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn list(&self, scope: &LedgerScope) -> DomainResult<Vec<Movement>> {
        (**self).list(scope)
    }

    fn append(&self, request: NewMovement, at: DateTime<Utc>) -> DomainResult<Movement> {
        (**self).append(request, at)
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    movements: Vec<Movement>,
    on_hand: HashMap<ProductId, i64>,
    recipes: HashMap<ProductId, Vec<ComponentRequirement>>,
}

impl LedgerState {
    fn on_hand_of(&self, id: &ProductId) -> i64 {
        self.on_hand.get(id).copied().unwrap_or(0)
    }

    /// Same rule as catalog availability, over the store's own counts.
    fn bundle_available(&self, recipe: &[ComponentRequirement]) -> i64 {
        recipe
            .iter()
            .map(|c| producible_units(self.on_hand_of(&c.component_id), c.quantity_per_unit))
            .min()
            .unwrap_or(0)
            .max(0)
    }
}

/// In-memory ledger store for tests/dev.
///
/// Simple products keep an on-hand count. Bundles keep only their recipe:
/// selling one writes the bundle entry followed by one outgoing entry per
/// component, all stamped with the same time.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<LedgerState>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed on-hand counts and bundle recipes from a catalog snapshot.
    pub fn with_opening_stock(catalog: &Catalog) -> Self {
        let mut state = LedgerState::default();
        for product in catalog.iter() {
            if product.is_composite {
                state.recipes.insert(product.id, product.components.clone());
            } else {
                state.on_hand.insert(product.id, product.stock_qty);
            }
        }
        Self {
            inner: RwLock::new(state),
        }
    }

    /// On-hand count of a simple product, or the sellable bundles of a composite.
    pub fn current_stock(&self, product_id: &ProductId) -> DomainResult<i64> {
        let state = self
            .inner
            .read()
            .map_err(|_| DomainError::conflict("ledger store lock poisoned"))?;
        Ok(match state.recipes.get(product_id) {
            Some(recipe) => state.bundle_available(recipe),
            None => state.on_hand_of(product_id),
        })
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn list(&self, scope: &LedgerScope) -> DomainResult<Vec<Movement>> {
        let state = self
            .inner
            .read()
            .map_err(|_| DomainError::conflict("ledger store lock poisoned"))?;
        Ok(scope.filter(&state.movements).cloned().collect())
    }

    fn append(&self, request: NewMovement, at: DateTime<Utc>) -> DomainResult<Movement> {
        request.validate_shape()?;

        let mut state = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("ledger store lock poisoned"))?;

        if let Some(recipe) = state.recipes.get(&request.product_id).cloned() {
            return append_bundle(&mut *state, &recipe, request, at);
        }

        let before = state.on_hand_of(&request.product_id);
        let (quantity, after) = match request.direction {
            Direction::In => (request.quantity, before + request.quantity),
            Direction::Out => {
                if request.quantity > before {
                    return Err(DomainError::insufficient_stock(request.quantity, before.max(0)));
                }
                (request.quantity, before - request.quantity)
            }
            Direction::Adjustment => ((request.quantity - before).abs(), request.quantity),
        };

        let movement = written(&request, MovementId::new(), at, quantity, after);
        state.on_hand.insert(movement.product_id, after);
        state.movements.push(movement.clone());

        tracing::debug!(
            movement_id = %movement.id,
            product_id = %movement.product_id,
            direction = movement.direction.as_str(),
            quantity,
            stock_after = after,
            "movement appended"
        );

        Ok(movement)
    }
}

/// Bundles are only ever sold; their stock follows the components.
fn append_bundle(
    state: &mut LedgerState,
    recipe: &[ComponentRequirement],
    request: NewMovement,
    at: DateTime<Utc>,
) -> DomainResult<Movement> {
    if request.direction != Direction::Out {
        return Err(DomainError::validation(
            "bundle stock follows its components and cannot be received or recounted",
        ));
    }
    let available = state.bundle_available(recipe);
    if request.quantity > available {
        return Err(DomainError::insufficient_stock(request.quantity, available));
    }

    let mut component_moves = Vec::with_capacity(recipe.len());
    for line in recipe {
        let draw = line.quantity_per_unit.saturating_mul(request.quantity);
        let after = state.on_hand_of(&line.component_id).saturating_sub(draw);
        state.on_hand.insert(line.component_id, after);
        let component_request = NewMovement {
            product_id: line.component_id,
            ..request.clone()
        };
        component_moves.push(written(&component_request, MovementId::new(), at, draw, after));
    }

    let bundle = written(
        &request,
        MovementId::new(),
        at,
        request.quantity,
        state.bundle_available(recipe),
    );
    state.movements.push(bundle.clone());
    state.movements.extend(component_moves);

    tracing::debug!(
        movement_id = %bundle.id,
        product_id = %bundle.product_id,
        quantity = bundle.quantity,
        components = recipe.len(),
        stock_after = bundle.stock_after,
        "bundle sale appended"
    );

    Ok(bundle)
}

fn written(request: &NewMovement, id: MovementId, at: DateTime<Utc>, quantity: i64, stock_after: i64) -> Movement {
    Movement {
        id,
        created_at: at,
        product_id: request.product_id,
        branch_name: request.branch_name.clone(),
        direction: request.direction,
        operation_type: request.operation_type,
        quantity,
        stock_after,
        reason: request.reason.clone(),
        actor_name: request.actor_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationType;
    use chrono::Duration;
    use stockbook_products::{ComponentRequirement, Product};

    fn seeded(stock: i64) -> (ProductId, InMemoryLedgerStore) {
        let p = Product::simple(ProductId::new(), "tape", stock);
        let id = p.id;
        (id, InMemoryLedgerStore::with_opening_stock(&Catalog::new(vec![p])))
    }

    #[test]
    fn append_records_stock_after_at_write_time() {
        let (id, store) = seeded(10);
        let now = Utc::now();

        let out = store
            .append(NewMovement::outgoing(id, 3).with_operation(OperationType::Sale), now)
            .unwrap();
        let inn = store
            .append(NewMovement::incoming(id, 5), now + Duration::seconds(1))
            .unwrap();

        assert_eq!(out.stock_after, 7);
        assert_eq!(inn.stock_after, 12);
        assert_eq!(store.current_stock(&id).unwrap(), 12);
        assert_eq!(store.list(&LedgerScope::for_product(id)).unwrap().len(), 2);
    }

    #[test]
    fn recount_records_difference_as_quantity() {
        let (id, store) = seeded(10);
        let m = store.append(NewMovement::recount(id, 6), Utc::now()).unwrap();
        assert_eq!(m.direction, Direction::Adjustment);
        assert_eq!(m.quantity, 4);
        assert_eq!(m.stock_after, 6);
    }

    #[test]
    fn overdrawn_out_is_rejected_and_not_recorded() {
        let (id, store) = seeded(1);
        let err = store.append(NewMovement::outgoing(id, 2), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(2, 1));
        assert!(store.list(&LedgerScope::all()).unwrap().is_empty());
        assert_eq!(store.current_stock(&id).unwrap(), 1);
    }

    #[test]
    fn earlier_entries_are_never_rewritten() {
        let (id, store) = seeded(0);
        let first = store.append(NewMovement::incoming(id, 4), Utc::now()).unwrap();
        store.append(NewMovement::recount(id, 1), Utc::now()).unwrap();

        let all = store.list(&LedgerScope::all()).unwrap();
        assert_eq!(all[0], first);
    }

    #[test]
    fn arc_store_delegates() {
        let (id, store) = seeded(2);
        let shared: Arc<InMemoryLedgerStore> = Arc::new(store);
        shared.append(NewMovement::incoming(id, 1), Utc::now()).unwrap();
        assert_eq!(shared.current_stock(&id).unwrap(), 3);
    }

    fn kit_store() -> (ProductId, ProductId, ProductId, InMemoryLedgerStore) {
        let cable = Product::simple(ProductId::new(), "cable", 3);
        let adapter = Product::simple(ProductId::new(), "adapter", 10);
        let kit = Product::composite(
            ProductId::new(),
            "travel kit",
            vec![
                ComponentRequirement::new(cable.id, 1),
                ComponentRequirement::new(adapter.id, 2),
            ],
        );
        let ids = (kit.id, cable.id, adapter.id);
        let store = InMemoryLedgerStore::with_opening_stock(&Catalog::new(vec![cable, adapter, kit]));
        (ids.0, ids.1, ids.2, store)
    }

    #[test]
    fn bundle_sale_draws_components_down() {
        let (kit, cable, adapter, store) = kit_store();
        assert_eq!(store.current_stock(&kit).unwrap(), 3);

        let sold = store
            .append(NewMovement::outgoing(kit, 2).with_operation(OperationType::Sale), Utc::now())
            .unwrap();

        assert_eq!(sold.product_id, kit);
        assert_eq!(sold.quantity, 2);
        assert_eq!(sold.stock_after, 1);
        assert_eq!(store.current_stock(&cable).unwrap(), 1);
        assert_eq!(store.current_stock(&adapter).unwrap(), 6);

        let adapter_moves = store.list(&LedgerScope::for_product(adapter)).unwrap();
        assert_eq!(adapter_moves.len(), 1);
        assert_eq!(adapter_moves[0].quantity, 4);
        assert_eq!(adapter_moves[0].stock_after, 6);
        assert_eq!(adapter_moves[0].operation_type, Some(OperationType::Sale));

        let all = store.list(&LedgerScope::all()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, sold.id);
    }

    #[test]
    fn bundle_sale_beyond_components_is_rejected() {
        let (kit, cable, _, store) = kit_store();
        assert_eq!(
            store.append(NewMovement::outgoing(kit, 4), Utc::now()).unwrap_err(),
            DomainError::insufficient_stock(4, 3)
        );
        assert!(store.list(&LedgerScope::all()).unwrap().is_empty());
        assert_eq!(store.current_stock(&cable).unwrap(), 3);
    }

    #[test]
    fn bundle_cannot_be_received_or_recounted() {
        let (kit, _, _, store) = kit_store();
        assert!(matches!(
            store.append(NewMovement::incoming(kit, 1), Utc::now()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            store.append(NewMovement::recount(kit, 5), Utc::now()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn poisoned_lock_surfaces_as_conflict() {
        let (id, store) = seeded(1);
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let guard = store.inner.write().unwrap();
            if guard.movements.is_empty() {
                panic!("writer died");
            }
        }));

        assert!(matches!(store.current_stock(&id), Err(DomainError::Conflict(_))));
        assert!(matches!(store.list(&LedgerScope::all()), Err(DomainError::Conflict(_))));
    }
}
