//! Presentation state and text rendering.
//!
//! Nothing here mutates the cart. The controller feeds cart-change
//! notifications into [`StorefrontView::on_cart_changed`] and renders from the
//! snapshot kept there.

use std::fmt::Write as _;

use storefront_cart::{CartChanged, CartSnapshot};
use storefront_catalog::{Catalog, CategoryFilter, Product};

pub const TITLE: &str = "Storefront";
const NO_IMAGE: &str = "[no image]";
const EMPTY_CART: &str = "Your cart is empty";

/// One-shot message shown above the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Info(String),
    Warning(String),
}

#[derive(Debug, Clone, Default)]
pub struct StorefrontView {
    filter: CategoryFilter,
    drawer_open: bool,
    snapshot: CartSnapshot,
    flash: Option<Flash>,
    updates: u64,
}

impl StorefrontView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the cart as it already is, without counting it as an update.
    pub fn with_snapshot(snapshot: CartSnapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn open_drawer(&mut self) {
        self.drawer_open = true;
    }

    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
    }

    /// Item count shown on the cart badge.
    pub fn badge(&self) -> u64 {
        self.snapshot.item_count
    }

    pub fn snapshot(&self) -> &CartSnapshot {
        &self.snapshot
    }

    /// Number of cart notifications received so far.
    pub fn cart_updates(&self) -> u64 {
        self.updates
    }

    pub fn flash(&mut self, flash: Flash) {
        self.flash = Some(flash);
    }

    pub fn pending_flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    pub fn on_cart_changed(&mut self, change: &CartChanged) {
        self.snapshot = change.snapshot.clone();
        self.updates += 1;
    }

    /// Render the whole screen and consume the pending flash message.
    pub fn render(&mut self, catalog: &Catalog) -> String {
        let mut out = String::new();
        render_header(&mut out, self.badge());
        if let Some(flash) = self.flash.take() {
            render_flash(&mut out, &flash);
        }
        render_grid(&mut out, &self.filter, &catalog.list_by_category(&self.filter));
        if self.drawer_open {
            render_drawer(&mut out, &self.snapshot);
        }
        out
    }
}

fn render_header(out: &mut String, badge: u64) {
    let _ = writeln!(out, "=== {TITLE} ===  [cart: {badge}]");
}

fn render_flash(out: &mut String, flash: &Flash) {
    let _ = match flash {
        Flash::Info(msg) => writeln!(out, "* {msg}"),
        Flash::Warning(msg) => writeln!(out, "! {msg}"),
    };
}

pub fn render_grid(out: &mut String, filter: &CategoryFilter, products: &[&Product]) {
    let _ = writeln!(out, "-- {filter} --");
    if products.is_empty() {
        let _ = writeln!(out, "  (no products)");
        return;
    }
    for product in products {
        let image = product.image.as_deref().map_or(NO_IMAGE, |_| "");
        let price = format!("${}", product.price);
        let line = format!(
            "  [{:>3}] {:<24} {:>9} {}",
            product.id, product.name, price, image
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

pub fn render_drawer(out: &mut String, snapshot: &CartSnapshot) {
    let _ = writeln!(out, "-- cart --");
    if snapshot.is_empty() {
        let _ = writeln!(out, "  {EMPTY_CART}");
        return;
    }
    for line in &snapshot.lines {
        let _ = writeln!(
            out,
            "  [{:>3}] {:<24} ${} each  x{:<3} ${}",
            line.product.id, line.product.name, line.product.price, line.quantity, line.subtotal
        );
    }
    let _ = writeln!(out, "  Total: ${}", snapshot.grand_total);
    let _ = writeln!(out, "  (checkout | close)");
}
