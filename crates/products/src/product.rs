//! Products and their bundle recipes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockbook_core::{BranchName, Entity, ProductId, ValueObject};

/// One line of a composite product's recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRequirement {
    pub component_id: ProductId,
    /// Units of the component consumed by one unit of the bundle.
    ///
    /// Values `<= 0` make the recipe degenerate: the component contributes 0
    /// producible units.
    pub quantity_per_unit: i64,
}

impl ComponentRequirement {
    pub fn new(component_id: ProductId, quantity_per_unit: i64) -> Self {
        Self {
            component_id,
            quantity_per_unit,
        }
    }
}

impl ValueObject for ComponentRequirement {}

/// Catalog product snapshot.
///
/// The core only ever reads products; `stock_qty` changes happen in the
/// external store as a side effect of accepted movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub branch_name: Option<BranchName>,
    /// Direct on-hand quantity. Ignored for composite products.
    pub stock_qty: i64,
    /// Unit cost in smallest currency unit (e.g., cents).
    pub cost_price: i64,
    pub is_composite: bool,
    /// Recipe, in declaration order. Empty for simple products.
    pub components: Vec<ComponentRequirement>,
}

impl Product {
    /// A simple (directly stocked) product.
    pub fn simple(id: ProductId, name: impl Into<String>, stock_qty: i64) -> Self {
        Self {
            id,
            name: name.into(),
            sku: None,
            barcode: None,
            branch_name: None,
            stock_qty,
            cost_price: 0,
            is_composite: false,
            components: Vec::new(),
        }
    }

    /// A composite (bundle) product whose availability derives from `components`.
    pub fn composite(
        id: ProductId,
        name: impl Into<String>,
        components: Vec<ComponentRequirement>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            sku: None,
            barcode: None,
            branch_name: None,
            stock_qty: 0,
            cost_price: 0,
            is_composite: true,
            components,
        }
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<BranchName>) -> Self {
        self.branch_name = Some(branch.into());
        self
    }

    pub fn with_cost_price(mut self, cost_price: i64) -> Self {
        self.cost_price = cost_price;
        self
    }

    pub fn in_branch(&self, branch: &BranchName) -> bool {
        self.branch_name.as_ref() == Some(branch)
    }

    /// True when `code` equals this product's barcode or SKU (after trimming).
    pub fn matches_code(&self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            return false;
        }
        let eq = |v: &Option<String>| v.as_deref().map(str::trim) == Some(code);
        eq(&self.barcode) || eq(&self.sku)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Loosely-shaped product as delivered by the catalog API.
///
/// Every field except `id` may be absent; [`Product::from`] resolves the
/// defaults once so the engine never has to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRecord {
    pub id: Option<ProductId>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub branch_name: Option<String>,
    pub stock_qty: Option<i64>,
    pub cost_price: Option<i64>,
    pub is_composite: Option<bool>,
    pub components: Option<Vec<ComponentRecord>>,
}

/// Loosely-shaped recipe line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentRecord {
    pub component_product_id: Option<ProductId>,
    pub required_quantity_per_unit: Option<i64>,
}

impl From<ComponentRecord> for ComponentRequirement {
    fn from(record: ComponentRecord) -> Self {
        Self {
            // The nil id never resolves in a catalog, so the line counts as 0 stock.
            component_id: record
                .component_product_id
                .unwrap_or_else(|| ProductId::from_uuid(Uuid::nil())),
            quantity_per_unit: record.required_quantity_per_unit.unwrap_or(0),
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let is_composite = record.is_composite.unwrap_or(false);
        let components = if is_composite {
            record
                .components
                .unwrap_or_default()
                .into_iter()
                .map(ComponentRequirement::from)
                .collect()
        } else {
            Vec::new()
        };

        Self {
            id: record.id.unwrap_or_else(|| ProductId::from_uuid(Uuid::nil())),
            name: record.name.unwrap_or_default(),
            sku: non_blank(record.sku),
            barcode: non_blank(record.barcode),
            branch_name: non_blank(record.branch_name).map(BranchName::from),
            stock_qty: record.stock_qty.unwrap_or(0),
            cost_price: record.cost_price.unwrap_or(0),
            is_composite,
            components,
        }
    }
}
