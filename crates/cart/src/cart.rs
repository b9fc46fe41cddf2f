use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Aggregate, AggregateRoot, CartId, DomainError, ProductId};
use storefront_events::Event;

/// One product in the cart with its quantity (always at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Aggregate root: Cart.
///
/// Lines are kept in the order their products were first added, with at most
/// one line per product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: CartId,
    lines: Vec<CartLine>,
    version: u64,
}

impl Cart {
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.line(product_id).map_or(0, |line| line.quantity)
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem (one more unit of a product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem (drop the whole line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustQuantity (relative change, may be negative).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustQuantity {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub delta: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub cart_id: CartId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    AdjustQuantity(AdjustQuantity),
    ClearCart(ClearCart),
}

/// Event: ItemAdded (a new line with quantity 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged (absolute new quantity of an existing line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub cart_id: CartId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    QuantityChanged(QuantityChanged),
    ItemRemoved(ItemRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item.added",
            CartEvent::QuantityChanged(_) => "cart.item.quantity_changed",
            CartEvent::ItemRemoved(_) => "cart.item.removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => {
                self.lines.push(CartLine {
                    product_id: e.product_id,
                    quantity: 1,
                });
            }
            CartEvent::QuantityChanged(e) => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == e.product_id) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::ItemRemoved(e) => {
                self.lines.retain(|l| l.product_id != e.product_id);
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::RemoveItem(cmd) => self.handle_remove(cmd),
            CartCommand::AdjustQuantity(cmd) => self.handle_adjust(cmd),
            CartCommand::ClearCart(cmd) => self.handle_clear(cmd),
        }
    }
}

impl Cart {
    fn ensure_cart_id(&self, cart_id: CartId) -> Result<(), DomainError> {
        if self.id != cart_id {
            return Err(DomainError::invariant("cart_id mismatch"));
        }
        Ok(())
    }

    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(cmd.cart_id)?;

        let Some(line) = self.line(cmd.product_id) else {
            return Ok(vec![CartEvent::ItemAdded(ItemAdded {
                cart_id: cmd.cart_id,
                product_id: cmd.product_id,
                occurred_at: cmd.occurred_at,
            })]);
        };

        let quantity = line.quantity.checked_add(1).ok_or_else(|| {
            DomainError::validation(format!(
                "quantity of product {} is at its maximum",
                cmd.product_id
            ))
        })?;

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            cart_id: cmd.cart_id,
            product_id: cmd.product_id,
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(cmd.cart_id)?;

        if self.line(cmd.product_id).is_none() {
            return Ok(Vec::new());
        }

        Ok(vec![CartEvent::ItemRemoved(ItemRemoved {
            cart_id: cmd.cart_id,
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust(&self, cmd: &AdjustQuantity) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(cmd.cart_id)?;

        let Some(line) = self.line(cmd.product_id) else {
            return Ok(Vec::new());
        };
        if cmd.delta == 0 {
            return Ok(Vec::new());
        }

        let next = match i64::from(line.quantity).checked_add(cmd.delta) {
            Some(next) => next,
            None if cmd.delta < 0 => 0,
            None => i64::MAX,
        };

        if next <= 0 {
            return Ok(vec![CartEvent::ItemRemoved(ItemRemoved {
                cart_id: cmd.cart_id,
                product_id: cmd.product_id,
                occurred_at: cmd.occurred_at,
            })]);
        }

        let quantity = u32::try_from(next).map_err(|_| {
            DomainError::validation(format!(
                "quantity {next} for product {} exceeds the maximum of {}",
                cmd.product_id,
                u32::MAX
            ))
        })?;

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            cart_id: cmd.cart_id,
            product_id: cmd.product_id,
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_cart_id(cmd.cart_id)?;

        if self.lines.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![CartEvent::CartCleared(CartCleared {
            cart_id: cmd.cart_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_events::execute;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn pid(raw: u32) -> ProductId {
        ProductId::new(raw)
    }

    fn add(cart: &Cart, product: u32) -> CartCommand {
        CartCommand::AddItem(AddItem {
            cart_id: cart.id_typed(),
            product_id: pid(product),
            occurred_at: test_time(),
        })
    }

    fn remove(cart: &Cart, product: u32) -> CartCommand {
        CartCommand::RemoveItem(RemoveItem {
            cart_id: cart.id_typed(),
            product_id: pid(product),
            occurred_at: test_time(),
        })
    }

    fn adjust(cart: &Cart, product: u32, delta: i64) -> CartCommand {
        CartCommand::AdjustQuantity(AdjustQuantity {
            cart_id: cart.id_typed(),
            product_id: pid(product),
            delta,
            occurred_at: test_time(),
        })
    }

    fn clear(cart: &Cart) -> CartCommand {
        CartCommand::ClearCart(ClearCart {
            cart_id: cart.id_typed(),
            occurred_at: test_time(),
        })
    }

    fn run(cart: &mut Cart, command: CartCommand) -> Vec<CartEvent> {
        execute(cart, &command).unwrap()
    }

    fn quantities(cart: &Cart) -> Vec<(u32, u32)> {
        cart.lines()
            .iter()
            .map(|l| (l.product_id.get(), l.quantity))
            .collect()
    }

    #[test]
    fn first_add_emits_item_added() {
        let cart = Cart::new(CartId::new());
        let events = cart.handle(&add(&cart, 1)).unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            CartEvent::ItemAdded(e) => assert_eq!(e.product_id, pid(1)),
            _ => panic!("Expected ItemAdded event"),
        }
    }

    #[test]
    fn repeated_add_increments_in_first_seen_order() {
        let mut cart = Cart::new(CartId::new());
        let cmd = add(&cart, 1);
        run(&mut cart, cmd.clone());
        run(&mut cart, cmd);
        let cmd = add(&cart, 2);
        let events = run(&mut cart, cmd);
        assert_eq!(events[0].event_type(), "cart.item.added");

        assert_eq!(quantities(&cart), vec![(1, 2), (2, 1)]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn second_add_emits_quantity_changed() {
        let mut cart = Cart::new(CartId::new());
        let cmd = add(&cart, 4);
        run(&mut cart, cmd.clone());
        let events = cart.handle(&cmd).unwrap();
        match &events[0] {
            CartEvent::QuantityChanged(e) => assert_eq!(e.quantity, 2),
            _ => panic!("Expected QuantityChanged event"),
        }
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cart = Cart::new(CartId::new());
        let cmd = add(&cart, 5);
        run(&mut cart, cmd);

        let cmd = remove(&cart, 5);
        assert_eq!(run(&mut cart, cmd.clone()).len(), 1);
        assert!(run(&mut cart, cmd).is_empty());
        assert!(cart.is_empty());
    }

    #[test]
    fn adjust_to_zero_removes_the_line() {
        let mut cart = Cart::new(CartId::new());
        let cmd = add(&cart, 3);
        run(&mut cart, cmd);

        let cmd = adjust(&cart, 3, -1);
        let events = run(&mut cart, cmd);
        assert!(matches!(events[0], CartEvent::ItemRemoved(_)));
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn adjust_far_below_zero_removes_the_line() {
        let mut cart = Cart::new(CartId::new());
        let cmd = add(&cart, 3);
        run(&mut cart, cmd);
        let cmd = adjust(&cart, 3, i64::MIN);
        run(&mut cart, cmd);
        assert!(cart.is_empty());
    }

    #[test]
    fn adjust_replaces_quantity() {
        let mut cart = Cart::new(CartId::new());
        let cmd = add(&cart, 3);
        run(&mut cart, cmd);
        let cmd = adjust(&cart, 3, 4);
        run(&mut cart, cmd);
        assert_eq!(cart.quantity_of(pid(3)), 5);
        let cmd = adjust(&cart, 3, -2);
        run(&mut cart, cmd);
        assert_eq!(cart.quantity_of(pid(3)), 3);
    }

    #[test]
    fn adjust_of_absent_line_or_zero_delta_is_a_no_op() {
        let mut cart = Cart::new(CartId::new());
        let cmd = adjust(&cart, 8, 3);
        assert!(run(&mut cart, cmd).is_empty());
        assert!(cart.is_empty());

        let cmd = add(&cart, 8);
        run(&mut cart, cmd);
        let version = cart.version();
        let cmd = adjust(&cart, 8, 0);
        assert!(run(&mut cart, cmd).is_empty());
        assert_eq!(cart.version(), version);
    }

    #[test]
    fn adjust_past_u32_max_is_rejected_without_mutation() {
        let mut cart = Cart::new(CartId::new());
        let cmd = add(&cart, 1);
        run(&mut cart, cmd);
        let before = cart.clone();

        let err = cart.handle(&adjust(&cart, 1, i64::from(u32::MAX))).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = execute(&mut cart, &adjust(&before, 1, i64::MAX)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(cart, before);
    }

    #[test]
    fn add_at_u32_max_is_rejected() {
        let mut cart = Cart::new(CartId::new());
        let cmd = add(&cart, 1);
        run(&mut cart, cmd);
        let cmd = adjust(&cart, 1, i64::from(u32::MAX) - 1);
        run(&mut cart, cmd);
        assert_eq!(cart.quantity_of(pid(1)), u32::MAX);

        let err = cart.handle(&add(&cart, 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("maximum")));
    }

    #[test]
    fn clear_empties_and_is_quiet_when_already_empty() {
        let mut cart = Cart::new(CartId::new());
        let cmd = clear(&cart);
        assert!(run(&mut cart, cmd).is_empty());

        for product in [1, 2, 3] {
            let cmd = add(&cart, product);
            run(&mut cart, cmd);
        }
        let cmd = clear(&cart);
        let events = run(&mut cart, cmd);
        assert_eq!(events[0].event_type(), "cart.cleared");
        assert!(cart.is_empty());
    }

    #[test]
    fn commands_for_another_cart_are_rejected() {
        let cart = Cart::new(CartId::new());
        let other = Cart::new(CartId::new());
        let err = cart.handle(&add(&other, 1)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(msg) if msg.contains("cart_id")));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let mut cart = Cart::new(CartId::new());
        let cmd = add(&cart, 1);
        run(&mut cart, cmd.clone());
        let before = cart.clone();

        let events1 = cart.handle(&cmd).unwrap();
        let events2 = cart.handle(&cmd).unwrap();

        assert_eq!(cart, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn version_increments_per_applied_event() {
        let mut cart = Cart::new(CartId::new());
        assert_eq!(cart.version(), 0);
        let cmd = add(&cart, 1);
        run(&mut cart, cmd);
        assert_eq!(cart.version(), 1);
        let cmd = remove(&cart, 1);
        run(&mut cart, cmd);
        assert_eq!(cart.version(), 2);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(u32),
            Remove(u32),
            Adjust(u32, i64),
            Clear,
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (1u32..6).prop_map(Op::Add),
                1 => (1u32..6).prop_map(Op::Remove),
                3 => ((1u32..6), -4i64..5).prop_map(|(p, d)| Op::Adjust(p, d)),
                1 => Just(Op::Clear),
            ]
        }

        fn command_for(cart: &Cart, op: &Op) -> CartCommand {
            match *op {
                Op::Add(p) => add(cart, p),
                Op::Remove(p) => remove(cart, p),
                Op::Adjust(p, d) => adjust(cart, p, d),
                Op::Clear => clear(cart),
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: n adds of one product yield exactly one line of quantity n.
            #[test]
            fn adds_accumulate_on_a_single_line(product in 1u32..100, n in 1usize..50) {
                let mut cart = Cart::new(CartId::new());
                for _ in 0..n {
                    let cmd = add(&cart, product);
                    run(&mut cart, cmd);
                }
                prop_assert_eq!(cart.lines().len(), 1);
                prop_assert_eq!(cart.quantity_of(pid(product)), n as u32);
            }

            /// Property: no sequence of operations leaves a zero line or a duplicate product.
            #[test]
            fn lines_stay_positive_and_unique(ops in prop::collection::vec(arb_op(), 0..60)) {
                let mut cart = Cart::new(CartId::new());
                for op in &ops {
                    let cmd = command_for(&cart, op);
                    run(&mut cart, cmd);
                }
                let mut seen = std::collections::HashSet::new();
                for line in cart.lines() {
                    prop_assert!(line.quantity > 0);
                    prop_assert!(seen.insert(line.product_id));
                }
                let sum: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();
                prop_assert_eq!(cart.item_count(), sum);
            }

            /// Property: adjusting by minus the current quantity removes the line.
            #[test]
            fn adjust_by_negative_quantity_removes(adds in 1usize..20) {
                let mut cart = Cart::new(CartId::new());
                for _ in 0..adds {
                    let cmd = add(&cart, 7);
                    run(&mut cart, cmd);
                }
                let current = i64::from(cart.quantity_of(pid(7)));
                let cmd = adjust(&cart, 7, -current);
                run(&mut cart, cmd);
                prop_assert!(cart.line(pid(7)).is_none());
            }
        }
    }
}
