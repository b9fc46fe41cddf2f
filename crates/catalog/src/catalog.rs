use std::collections::HashMap;

use storefront_core::{DomainError, DomainResult, Entity, ProductId};

use crate::product::{CategoryFilter, Product};

const GROCERY_JSON: &str = include_str!("../data/grocery.json");

/// Immutable, ordered product catalog with an id index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, validating every product and id uniqueness.
    ///
    /// Catalog order is the order of `products`.
    pub fn new(products: Vec<Product>) -> DomainResult<Self> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            product.validate()?;
            if index.insert(*product.id(), position).is_some() {
                return Err(DomainError::invariant(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
        }

        if products.is_empty() {
            tracing::warn!("catalog is empty; storefront will render its zero state");
        } else {
            tracing::debug!(products = products.len(), "catalog loaded");
        }

        Ok(Self { products, index })
    }

    /// Parse a JSON array of products.
    ///
    /// Prices may be JSON numbers or strings; strings avoid any float
    /// conversion on the way in.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("malformed catalog: {e}")))?;
        Self::new(products)
    }

    /// The grocery catalog bundled with the storefront.
    pub fn grocery() -> DomainResult<Self> {
        Self::from_json(GROCERY_JSON)
    }

    /// Every product in catalog order.
    pub fn list_all(&self) -> &[Product] {
        &self.products
    }

    /// Products matching `filter`, in catalog order.
    ///
    /// An unknown category yields an empty list.
    pub fn list_by_category(&self, filter: &CategoryFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).map(|&position| &self.products[position])
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Money;

    fn product(id: u32, name: &str, category: &str, cents: i64) -> Product {
        Product::new(ProductId::new(id), name, category, Money::from_cents(cents))
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            product(1, "Bananas", "Produce", 99),
            product(3, "Milk (1L)", "Dairy", 199),
            product(2, "Apples", "Produce", 129),
        ])
        .unwrap()
    }

    fn ids<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<u32> {
        products.into_iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn list_all_preserves_supplied_order() {
        assert_eq!(ids(sample().list_all()), vec![1, 3, 2]);
    }

    #[test]
    fn filtering_by_all_equals_list_all() {
        let catalog = sample();
        let filtered = catalog.list_by_category(&CategoryFilter::All);
        assert_eq!(ids(filtered), ids(catalog.list_all()));
    }

    #[test]
    fn filtering_by_category_keeps_catalog_order() {
        let catalog = sample();
        let produce = catalog.list_by_category(&CategoryFilter::only("Produce"));
        assert_eq!(ids(produce), vec![1, 2]);
    }

    #[test]
    fn unknown_category_yields_empty_list() {
        let catalog = sample();
        assert!(catalog.list_by_category(&CategoryFilter::only("Toys")).is_empty());
    }

    #[test]
    fn find_by_id_signals_absence() {
        let catalog = sample();
        assert_eq!(catalog.find_by_id(ProductId::new(3)).unwrap().name, "Milk (1L)");
        assert!(catalog.find_by_id(ProductId::new(99)).is_none());
        assert!(!catalog.contains(ProductId::new(99)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Catalog::new(vec![
            product(1, "Bananas", "Produce", 99),
            product(1, "Plantains", "Produce", 149),
        ])
        .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn empty_catalog_is_allowed() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.list_by_category(&CategoryFilter::All).is_empty());
        assert!(catalog.categories().is_empty());
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        assert_eq!(sample().categories(), vec!["Produce", "Dairy"]);
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        let err = Catalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.starts_with("malformed catalog")));
    }

    #[test]
    fn grocery_catalog_loads() {
        let catalog = Catalog::grocery().unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(
            catalog.categories(),
            vec!["Produce", "Dairy", "Bakery", "Snacks", "Beverages", "Household"]
        );
        let bananas = catalog.find_by_id(ProductId::new(1)).unwrap();
        assert_eq!(bananas.price, Money::from_cents(99));
        assert!(bananas.image.is_none());
        assert!(catalog.find_by_id(ProductId::new(2)).unwrap().image.is_some());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_catalog() -> impl Strategy<Value = Catalog> {
            prop::collection::vec(("[A-C]", 0i64..10_000), 0..30).prop_map(|rows| {
                let products = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, (category, cents))| {
                        product(i as u32 + 1, &format!("Item {i}"), &category, cents)
                    })
                    .collect();
                Catalog::new(products).unwrap()
            })
        }

        proptest! {
            /// Property: every product lands in exactly one category listing.
            #[test]
            fn category_listings_partition_the_catalog(catalog in arb_catalog()) {
                let total: usize = catalog
                    .categories()
                    .into_iter()
                    .map(|c| catalog.list_by_category(&CategoryFilter::only(c)).len())
                    .sum();
                prop_assert_eq!(total, catalog.len());
            }

            /// Property: every listed product resolves by id to itself.
            #[test]
            fn every_product_resolves_by_id(catalog in arb_catalog()) {
                for product in catalog.list_all() {
                    prop_assert_eq!(catalog.find_by_id(product.id), Some(product));
                }
            }
        }
    }
}
