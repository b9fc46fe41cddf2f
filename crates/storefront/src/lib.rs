//! `storefront`
//!
//! **Responsibility:** terminal view/controller around the cart engine.
//!
//! - [`StorefrontView`] holds presentation state (category filter, drawer,
//!   last cart snapshot) and renders it as text.
//! - [`Controller`] turns typed [`Action`]s into cart engine calls. The view
//!   is refreshed only through cart-change notifications.
//! - [`StorefrontConfig`] reads environment settings.

pub mod action;
pub mod config;
pub mod controller;
pub mod view;

pub use action::{Action, ParseActionError};
pub use config::{ConfigError, StorefrontConfig};
pub use controller::{Controller, Flow};
pub use view::{Flash, StorefrontView};
