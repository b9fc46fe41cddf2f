//! Wires user actions to the cart engine and keeps the view in sync.

use std::cell::{Ref, RefCell};
use std::io::{BufRead, Write};
use std::rc::Rc;

use anyhow::Context;

use storefront_cart::CartEngine;
use storefront_core::{DomainError, DomainResult};

use crate::action::{Action, HELP};
use crate::view::{Flash, StorefrontView};

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Controller {
    engine: CartEngine,
    view: Rc<RefCell<StorefrontView>>,
}

impl Controller {
    /// Take ownership of `engine`, seed the view with its current cart and
    /// subscribe the view to later changes.
    pub fn new(mut engine: CartEngine) -> DomainResult<Self> {
        let view = Rc::new(RefCell::new(StorefrontView::with_snapshot(engine.snapshot()?)));
        let sink = Rc::clone(&view);
        engine.subscribe(move |change| sink.borrow_mut().on_cart_changed(change));
        Ok(Self { engine, view })
    }

    pub fn engine(&self) -> &CartEngine {
        &self.engine
    }

    pub fn view(&self) -> Ref<'_, StorefrontView> {
        self.view.borrow()
    }

    pub fn handle(&mut self, action: Action) -> Flow {
        tracing::debug!(?action, "handling action");
        let outcome = match action {
            Action::Filter(filter) => {
                self.view.borrow_mut().set_filter(filter);
                Ok(())
            }
            Action::Add(product_id) => self.engine.add_item(product_id),
            Action::Remove(product_id) => self.engine.remove_item(product_id),
            Action::Adjust { product_id, delta } => self.engine.adjust_quantity(product_id, delta),
            Action::OpenCart => {
                self.view.borrow_mut().open_drawer();
                Ok(())
            }
            Action::CloseCart => {
                self.view.borrow_mut().close_drawer();
                Ok(())
            }
            Action::Checkout => self.checkout(),
            Action::Categories => {
                let categories = self.engine.catalog().categories().join(", ");
                self.info(format!("categories: All, {categories}"));
                Ok(())
            }
            Action::Help => {
                self.info(HELP.to_string());
                Ok(())
            }
            Action::Quit => return Flow::Quit,
        };

        if let Err(err) = outcome {
            self.report(err);
        }
        Flow::Continue
    }

    /// Parse and handle one input line; parse failures become a warning.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        match line.parse::<Action>() {
            Ok(action) => self.handle(action),
            Err(err) => {
                self.view.borrow_mut().flash(Flash::Warning(err.to_string()));
                Flow::Continue
            }
        }
    }

    pub fn render(&self) -> String {
        self.view.borrow_mut().render(self.engine.catalog())
    }

    /// Interactive loop: render, read a line, handle it, repeat until quit or EOF.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        write!(output, "{}", self.render()).context("writing storefront")?;
        output.flush().context("flushing storefront")?;

        for line in input.lines() {
            let line = line.context("reading input")?;
            if self.handle_line(&line) == Flow::Quit {
                break;
            }
            write!(output, "{}", self.render()).context("writing storefront")?;
            output.flush().context("flushing storefront")?;
        }
        Ok(())
    }

    fn checkout(&mut self) -> Result<(), DomainError> {
        let receipt = self.engine.checkout()?;
        self.info(format!(
            "Thank you for shopping! ({} items, ${})",
            receipt.item_count(),
            receipt.grand_total()
        ));
        self.view.borrow_mut().close_drawer();
        Ok(())
    }

    fn info(&self, msg: String) {
        self.view.borrow_mut().flash(Flash::Info(msg));
    }

    fn report(&self, err: DomainError) {
        if !err.is_user_facing() {
            tracing::error!(error = %err, "cart operation failed");
        }
        let msg = match &err {
            DomainError::EmptyCartCheckout => "Your cart is empty!".to_string(),
            DomainError::UnknownProduct(id) => format!("Product {id} is not in the catalog"),
            other => other.to_string(),
        };
        self.view.borrow_mut().flash(Flash::Warning(msg));
    }
}
