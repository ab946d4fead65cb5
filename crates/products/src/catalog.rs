//! Catalog snapshots and code lookup.

use std::collections::HashMap;

use stockbook_core::{BranchName, DomainResult, ProductId};

use crate::availability::available_stock;
use crate::product::Product;

/// Immutable, id-indexed snapshot of the product catalog.
///
/// Built once per computation from whatever the catalog provider returned.
/// Declaration order is preserved for iteration.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            if index.contains_key(&product.id) {
                tracing::debug!(product_id = %product.id, "duplicate product id in catalog snapshot; keeping first");
                continue;
            }
            index.insert(product.id, pos);
        }
        Self { products, index }
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&pos| self.products.get(pos))
    }

    /// Raw on-hand quantity of `id`; 0 when the product is unknown.
    ///
    /// This is the literal `stock_qty` field, even for composite products.
    pub fn stock_of(&self, id: &ProductId) -> i64 {
        self.get(id).map_or(0, |p| p.stock_qty)
    }

    /// Sellable quantity of `id`; 0 when the product is unknown.
    pub fn available(&self, id: &ProductId) -> i64 {
        self.get(id).map_or(0, |p| available_stock(p, self))
    }

    /// Look a product up by scanned or typed code: barcode first, then SKU.
    pub fn find_by_code(&self, code: &str) -> Option<&Product> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        self.products
            .iter()
            .find(|p| p.barcode.as_deref().map(str::trim) == Some(code))
            .or_else(|| {
                self.products
                    .iter()
                    .find(|p| p.sku.as_deref().map(str::trim) == Some(code))
            })
    }

    pub fn in_branch<'a>(&'a self, branch: &'a BranchName) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.in_branch(branch))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Source of catalog snapshots (the external catalog service).
///
/// No staleness contract: callers fetch a fresh snapshot when they need one.
pub trait CatalogProvider {
    fn list_products(&self) -> DomainResult<Vec<Product>>;

    fn snapshot(&self) -> DomainResult<Catalog> {
        Ok(Catalog::new(self.list_products()?))
    }
}

impl CatalogProvider for Vec<Product> {
    fn list_products(&self) -> DomainResult<Vec<Product>> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ComponentRequirement;

    #[test]
    fn stock_of_unknown_product_is_zero() {
        let catalog = Catalog::new(vec![Product::simple(ProductId::new(), "Mouse", 4)]);
        assert_eq!(catalog.stock_of(&ProductId::new()), 0);
        assert_eq!(catalog.available(&ProductId::new()), 0);
    }

    #[test]
    fn duplicate_ids_keep_first_entry() {
        let id = ProductId::new();
        let catalog = Catalog::new(vec![
            Product::simple(id, "first", 1),
            Product::simple(id, "second", 9),
        ]);
        assert_eq!(catalog.get(&id).map(|p| p.name.as_str()), Some("first"));
        assert_eq!(catalog.stock_of(&id), 1);
    }

    #[test]
    fn find_by_code_prefers_barcode_over_sku() {
        let by_sku = Product::simple(ProductId::new(), "by sku", 1).with_sku("123456");
        let by_barcode = Product::simple(ProductId::new(), "by barcode", 1).with_barcode("123456");
        let catalog = Catalog::new(vec![by_sku, by_barcode.clone()]);

        assert_eq!(catalog.find_by_code("123456").map(|p| p.id), Some(by_barcode.id));
        assert!(catalog.find_by_code("   ").is_none());
        assert!(catalog.find_by_code("999").is_none());
    }

    #[test]
    fn in_branch_filters_by_name() {
        let central = BranchName::from("Central");
        let catalog = Catalog::new(vec![
            Product::simple(ProductId::new(), "a", 1).with_branch("Central"),
            Product::simple(ProductId::new(), "b", 1).with_branch("North"),
            Product::simple(ProductId::new(), "c", 1),
        ]);
        let names: Vec<_> = catalog.in_branch(&central).map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn available_resolves_composites_through_catalog() {
        let part = ProductId::new();
        let bundle = ProductId::new();
        let catalog: Catalog = vec![
            Product::simple(part, "part", 7),
            Product::composite(bundle, "bundle", vec![ComponentRequirement::new(part, 2)]),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.available(&bundle), 3);
    }

    #[test]
    fn vec_provider_snapshots_its_contents() {
        let products = vec![Product::simple(ProductId::new(), "x", 2)];
        let catalog = products.snapshot().unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_empty());
    }
}
