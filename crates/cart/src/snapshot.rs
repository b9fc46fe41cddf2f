//! Read-only view of a cart joined with catalog data.

use serde::Serialize;

use storefront_catalog::{Catalog, Product};
use storefront_core::{DomainError, DomainResult, Money, ProductId};

use crate::cart::Cart;

/// One cart line with its product resolved and its subtotal computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotLine {
    pub product: Product,
    pub quantity: u32,
    pub subtotal: Money,
}

/// Derived cart state: never stored, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<SnapshotLine>,
    pub item_count: u64,
    pub grand_total: Money,
}

impl CartSnapshot {
    /// Join `cart` with `catalog`.
    ///
    /// A line whose product is missing from the catalog is skipped and logged;
    /// the cart engine never stores such ids. Fails with `Validation` when a
    /// subtotal or the grand total is too large to represent.
    pub fn build(cart: &Cart, catalog: &Catalog) -> DomainResult<Self> {
        let mut lines = Vec::with_capacity(cart.lines().len());
        for line in cart.lines() {
            let Some(product) = catalog.find_by_id(line.product_id) else {
                tracing::error!(
                    cart_id = %cart.id_typed(),
                    product_id = %line.product_id,
                    "cart line references a product missing from the catalog"
                );
                continue;
            };
            lines.push(SnapshotLine {
                product: product.clone(),
                quantity: line.quantity,
                subtotal: product.price.checked_mul(line.quantity).ok_or_else(|| {
                    DomainError::validation(format!(
                        "subtotal for product {} is too large",
                        line.product_id
                    ))
                })?,
            });
        }

        let item_count = lines.iter().map(|l| u64::from(l.quantity)).sum();
        let grand_total = Money::checked_sum(lines.iter().map(|l| l.subtotal))
            .ok_or_else(|| DomainError::validation("cart total is too large"))?;

        Ok(Self {
            lines,
            item_count,
            grand_total,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, product_id: ProductId) -> Option<&SnapshotLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }
}
