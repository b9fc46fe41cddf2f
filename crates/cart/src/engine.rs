//! Session cart engine: the only mutation path for a cart.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use storefront_catalog::Catalog;
use storefront_core::{AggregateRoot, CartId, DomainError, DomainResult, Money, ProductId};
use storefront_events::{Event, EventBus, InMemoryEventBus, ListenerId, Subscription, execute};

use crate::cart::{AddItem, AdjustQuantity, Cart, CartCommand, CartEvent, ClearCart, RemoveItem};
use crate::snapshot::CartSnapshot;

/// Notification published after every completed cart operation.
///
/// `events` is empty when the operation was a tolerated no-op (removing or
/// adjusting a product that is not in the cart).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartChanged {
    pub cart_id: CartId,
    pub events: Vec<CartEvent>,
    pub snapshot: CartSnapshot,
}

/// Outcome of a successful checkout: what the cart held just before clearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutReceipt {
    pub cart_id: CartId,
    pub snapshot: CartSnapshot,
    pub completed_at: DateTime<Utc>,
}

impl CheckoutReceipt {
    pub fn item_count(&self) -> u64 {
        self.snapshot.item_count
    }

    pub fn grand_total(&self) -> Money {
        self.snapshot.grand_total
    }
}

/// Owns one session's cart.
///
/// All operations run to completion synchronously; subscribers are notified
/// with the post-mutation snapshot before the operation returns. Views read
/// through [`CartEngine::snapshot`] or the notifications and never touch the
/// cart directly.
#[derive(Debug)]
pub struct CartEngine {
    catalog: Arc<Catalog>,
    cart: Cart,
    bus: InMemoryEventBus<CartChanged>,
}

impl CartEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_cart_id(catalog, CartId::new())
    }

    pub fn with_cart_id(catalog: Arc<Catalog>, cart_id: CartId) -> Self {
        tracing::debug!(%cart_id, "cart session started");
        Self {
            catalog,
            cart: Cart::new(cart_id),
            bus: InMemoryEventBus::new(),
        }
    }

    pub fn cart_id(&self) -> CartId {
        self.cart.id_typed()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only access to the raw cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add one unit of `product_id`, appending a new line on first add.
    pub fn add_item(&mut self, product_id: ProductId) -> DomainResult<()> {
        if !self.catalog.contains(product_id) {
            tracing::warn!(cart_id = %self.cart_id(), %product_id, "add of unknown product rejected");
            return Err(DomainError::UnknownProduct(product_id));
        }

        self.dispatch(CartCommand::AddItem(AddItem {
            cart_id: self.cart_id(),
            product_id,
            occurred_at: Utc::now(),
        }))
    }

    /// Drop the line for `product_id`; absent ids are a no-op.
    pub fn remove_item(&mut self, product_id: ProductId) -> DomainResult<()> {
        self.dispatch(CartCommand::RemoveItem(RemoveItem {
            cart_id: self.cart_id(),
            product_id,
            occurred_at: Utc::now(),
        }))
    }

    /// Change the quantity of an existing line by `delta`.
    ///
    /// A result of zero or less removes the line; absent ids are a no-op.
    pub fn adjust_quantity(&mut self, product_id: ProductId, delta: i64) -> DomainResult<()> {
        self.dispatch(CartCommand::AdjustQuantity(AdjustQuantity {
            cart_id: self.cart_id(),
            product_id,
            delta,
            occurred_at: Utc::now(),
        }))
    }

    pub fn clear(&mut self) -> DomainResult<()> {
        self.dispatch(CartCommand::ClearCart(ClearCart {
            cart_id: self.cart_id(),
            occurred_at: Utc::now(),
        }))
    }

    /// Current cart joined with catalog data. Never cached.
    ///
    /// Every committed cart state has already produced a snapshot once, so
    /// this only fails if that invariant is broken.
    pub fn snapshot(&self) -> DomainResult<CartSnapshot> {
        CartSnapshot::build(&self.cart, &self.catalog)
    }

    /// Confirm the purchase: fails on an empty cart, otherwise clears it.
    pub fn checkout(&mut self) -> DomainResult<CheckoutReceipt> {
        if self.cart.is_empty() {
            tracing::warn!(cart_id = %self.cart_id(), "checkout attempted on an empty cart");
            return Err(DomainError::EmptyCartCheckout);
        }

        let snapshot = self.snapshot()?;
        self.clear()?;

        let receipt = CheckoutReceipt {
            cart_id: self.cart_id(),
            snapshot,
            completed_at: Utc::now(),
        };
        tracing::info!(
            cart_id = %receipt.cart_id,
            items = receipt.item_count(),
            total = %receipt.grand_total(),
            "checkout completed"
        );
        Ok(receipt)
    }

    /// Register a callback invoked after every completed operation.
    pub fn subscribe(&mut self, listener: impl FnMut(&CartChanged) + 'static) -> ListenerId {
        self.bus.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Buffered alternative to [`CartEngine::subscribe`].
    pub fn subscription(&mut self) -> Subscription<CartChanged> {
        self.bus.channel()
    }

    fn dispatch(&mut self, command: CartCommand) -> DomainResult<()> {
        let span = tracing::info_span!("cart", cart_id = %self.cart_id());
        let _guard = span.enter();

        // Decide and apply on a staged copy; commit only once its totals are representable.
        let mut staged = self.cart.clone();
        let events = execute(&mut staged, &command)?;
        let snapshot = CartSnapshot::build(&staged, &self.catalog).inspect_err(|err| {
            tracing::warn!(error = %err, ?command, "cart command rejected");
        })?;
        self.cart = staged;

        if events.is_empty() {
            tracing::debug!(?command, "cart command was a no-op");
        }
        for event in &events {
            tracing::debug!(
                event_type = event.event_type(),
                version = self.cart.version(),
                "cart event applied"
            );
        }

        let change = CartChanged {
            cart_id: self.cart_id(),
            events,
            snapshot,
        };
        self.bus.publish(&change);
        Ok(())
    }
}
