//! Order sub-dialogue
//!
//! Fills an [`OrderRequest`] one slot at a time (address, item, size), then
//! runs store lookup and placement. The request never outlives one run.

use crate::order::{OrderGateway, OrderRequest, Slot};
use crate::voice::{SpeechInput, SpeechOutput};

pub const NOT_HEARD: &str = "Sorry, I didn't catch that.";
pub const NO_STORE: &str = "Sorry, no nearby store found for that address.";
pub const ORDER_FAILED: &str = "Sorry, something went wrong placing your order.";

/// How an order sub-dialogue ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// Order accepted by the vendor
    Placed { order_id: String },
    /// Lookup failed or no store serves the address
    NoStore,
    /// Store found but placement failed
    Failed,
    /// A slot stayed empty after every attempt
    Abandoned { slot: Slot },
}

/// One run of the order sub-dialogue
pub struct OrderDialogue<'a> {
    input: &'a mut dyn SpeechInput,
    output: &'a mut dyn SpeechOutput,
    gateway: &'a dyn OrderGateway,
    slot_attempts: u32,
}

#[allow(clippy::future_not_send)]
impl<'a> OrderDialogue<'a> {
    /// `slot_attempts` is the number of listen cycles per slot (at least one)
    pub fn new(
        input: &'a mut dyn SpeechInput,
        output: &'a mut dyn SpeechOutput,
        gateway: &'a dyn OrderGateway,
        slot_attempts: u32,
    ) -> Self {
        Self {
            input,
            output,
            gateway,
            slot_attempts: slot_attempts.max(1),
        }
    }

    /// Collect the order, submit it and tell the user how it went
    pub async fn run(mut self) -> OrderOutcome {
        let mut order = OrderRequest::default();

        while let Some(slot) = order.next_missing_slot() {
            match self.ask(slot).await {
                Some(answer) => {
                    tracing::debug!(slot = slot.name(), answer, "slot filled");
                    order.set_slot(slot, &answer);
                }
                None => {
                    tracing::info!(slot = slot.name(), "order abandoned, slot left empty");
                    self.output
                        .speak(&format!(
                            "I didn't get the {}, so I've cancelled the order.",
                            slot.name()
                        ))
                        .await;
                    return OrderOutcome::Abandoned { slot };
                }
            }
        }

        self.submit(&order).await
    }

    /// Prompt for a slot, re-prompting on empty answers
    async fn ask(&mut self, slot: Slot) -> Option<String> {
        for attempt in 1..=self.slot_attempts {
            let prompt = if attempt == 1 {
                slot.prompt().to_string()
            } else {
                format!("{NOT_HEARD} {}", slot.prompt())
            };
            self.output.speak(&prompt).await;

            let answer = self.input.listen().await;
            if !answer.trim().is_empty() {
                return Some(answer);
            }
            tracing::debug!(slot = slot.name(), attempt, "empty answer");
        }
        None
    }

    async fn submit(&mut self, order: &OrderRequest) -> OrderOutcome {
        let lookup = self.gateway.lookup_store(&order.delivery_address).await;
        if !lookup.success() {
            tracing::info!(error = ?lookup.error_message(), "no store for order");
            self.output.speak(NO_STORE).await;
            return OrderOutcome::NoStore;
        }

        let result = self.gateway.place_order(order).await;
        match result.order_id() {
            Some(order_id) if result.success() => {
                self.output
                    .speak(&format!(
                        "Your {} {} pizza is on its way! Your order number is {order_id}.",
                        order.size, order.item_description
                    ))
                    .await;
                OrderOutcome::Placed {
                    order_id: order_id.to_string(),
                }
            }
            _ => {
                tracing::warn!(error = ?result.error_message(), "order not placed");
                self.output.speak(ORDER_FAILED).await;
                OrderOutcome::Failed
            }
        }
    }
}
