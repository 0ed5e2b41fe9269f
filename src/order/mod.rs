//! Order data model and the client for the ordering microservice
//!
//! An [`OrderRequest`] is filled slot by slot during the order
//! sub-dialogue and only submitted once complete. Results are immutable
//! values produced by an [`OrderGateway`].

mod gateway;
pub mod wire;

pub use gateway::{HttpOrderGateway, OrderGateway};

/// One field the order sub-dialogue has to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Address,
    Item,
    Size,
}

impl Slot {
    /// Slots in the order they are asked for
    pub const ALL: [Self; 3] = [Self::Address, Self::Item, Self::Size];

    /// Question spoken to fill this slot
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Address => "What is the delivery address?",
            Self::Item => "What kind of pizza would you like?",
            Self::Size => "What size should it be?",
        }
    }

    /// Short name for logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Item => "item",
            Self::Size => "size",
        }
    }
}

/// A pizza order under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderRequest {
    pub delivery_address: String,
    pub item_description: String,
    pub size: String,
}

impl OrderRequest {
    /// Build a request from all three fields at once
    pub fn new(
        delivery_address: impl Into<String>,
        item_description: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            delivery_address: delivery_address.into(),
            item_description: item_description.into(),
            size: size.into(),
        }
    }

    /// Current value of a slot
    #[must_use]
    pub fn slot(&self, slot: Slot) -> &str {
        match slot {
            Slot::Address => &self.delivery_address,
            Slot::Item => &self.item_description,
            Slot::Size => &self.size,
        }
    }

    /// Store a trimmed answer in a slot
    pub fn set_slot(&mut self, slot: Slot, value: &str) {
        let value = value.trim().to_string();
        match slot {
            Slot::Address => self.delivery_address = value,
            Slot::Item => self.item_description = value,
            Slot::Size => self.size = value,
        }
    }

    /// First slot, in asking order, that is still empty
    #[must_use]
    pub fn next_missing_slot(&self) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|&slot| self.slot(slot).trim().is_empty())
    }

    /// All three fields are non-empty
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_missing_slot().is_none()
    }
}

/// Outcome of a store lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLookupResult {
    success: bool,
    store_id: Option<String>,
    error_message: Option<String>,
}

impl StoreLookupResult {
    /// A store serves the address
    pub fn found(store_id: impl Into<String>) -> Self {
        Self {
            success: true,
            store_id: Some(store_id.into()),
            error_message: None,
        }
    }

    /// No store, or the lookup could not be performed
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            store_id: None,
            error_message: Some(message.into()),
        }
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn store_id(&self) -> Option<&str> {
        self.store_id.as_deref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Outcome of an order placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResult {
    success: bool,
    order_id: Option<String>,
    error_message: Option<String>,
}

impl OrderResult {
    /// The vendor accepted the order
    pub fn placed(order_id: impl Into<String>) -> Self {
        Self {
            success: true,
            order_id: Some(order_id.into()),
            error_message: None,
        }
    }

    /// The order was rejected or could not be sent
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            order_id: None,
            error_message: Some(message.into()),
        }
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_fill_in_order() {
        let mut order = OrderRequest::default();
        assert_eq!(order.next_missing_slot(), Some(Slot::Address));

        order.set_slot(Slot::Address, " 10 Main St ");
        assert_eq!(order.delivery_address, "10 Main St");
        assert_eq!(order.next_missing_slot(), Some(Slot::Item));

        order.set_slot(Slot::Size, "large");
        assert_eq!(order.next_missing_slot(), Some(Slot::Item));
        assert!(!order.is_complete());

        order.set_slot(Slot::Item, "pepperoni");
        assert!(order.is_complete());
    }

    #[test]
    fn test_whitespace_is_not_complete() {
        let order = OrderRequest::new("10 Main St", "   ", "large");
        assert!(!order.is_complete());
        assert_eq!(order.next_missing_slot(), Some(Slot::Item));
    }

    #[test]
    fn test_result_constructors() {
        let found = StoreLookupResult::found("12345");
        assert!(found.success());
        assert_eq!(found.store_id(), Some("12345"));

        let failed = OrderResult::failed("rejected");
        assert!(!failed.success());
        assert!(failed.order_id().is_none());
        assert_eq!(failed.error_message(), Some("rejected"));
    }
}
