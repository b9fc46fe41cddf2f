//! Shopping cart domain module.
//!
//! The [`Cart`] aggregate holds the pure state transitions; [`CartEngine`]
//! owns one cart for a session, resolves products through the catalog, and
//! notifies subscribers with a fresh [`CartSnapshot`] after every operation.

pub mod cart;
pub mod engine;
pub mod snapshot;

pub use cart::{
    AddItem, AdjustQuantity, Cart, CartCleared, CartCommand, CartEvent, CartLine, ClearCart,
    ItemAdded, ItemRemoved, QuantityChanged, RemoveItem,
};
pub use engine::{CartChanged, CartEngine, CheckoutReceipt};
pub use snapshot::{CartSnapshot, SnapshotLine};
