//! Slot-filling order task — validates field writes and gates completion.
//!
//! One task instance is bound to one conversation. The external runtime
//! drives it through the record operations; the task validates each value,
//! tracks which fields are present, and on the last write persists the order
//! and hands the typed result back through a oneshot channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, oneshot};
use tokio::time::timeout;

use crate::config::AgentConfig;
use crate::order::{CoffeeOrder, OrderDraft};
use crate::schema::{self, OrderField};
use crate::store::OrderStore;

/// Phase of one order task.
///
/// Progresses `Collecting → Complete`; nothing leaves `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Collecting,
    Complete,
}

impl TaskPhase {
    /// Whether this phase is terminal (the order is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Shared handle tools use to drive one task.
pub type SharedOrderTask = Arc<RwLock<OrderTask>>;

/// Reply for record calls arriving after the order completed. Such calls are
/// harmless no-ops: no state change, no second persist.
const ALREADY_COMPLETE: &str = "The order is already complete.";

/// Stateful collector for one conversation's order.
pub struct OrderTask {
    draft: OrderDraft,
    phase: TaskPhase,
    store: Arc<dyn OrderStore>,
    persist_timeout: Duration,
    persist_retries: u32,
    completion_tx: Option<oneshot::Sender<CoffeeOrder>>,
    completed: Option<CoffeeOrder>,
}

impl OrderTask {
    /// Create a task persisting through `store`.
    ///
    /// The returned receiver yields the completed order exactly once, when
    /// the last required field is recorded.
    pub fn new(
        store: Arc<dyn OrderStore>,
        config: &AgentConfig,
    ) -> (Self, oneshot::Receiver<CoffeeOrder>) {
        let (tx, rx) = oneshot::channel();
        let task = Self {
            draft: OrderDraft::default(),
            phase: TaskPhase::Collecting,
            store,
            persist_timeout: config.persist_timeout,
            persist_retries: config.persist_retries,
            completion_tx: Some(tx),
            completed: None,
        };
        (task, rx)
    }

    /// Create a task already wrapped for sharing across tools.
    pub fn shared(
        store: Arc<dyn OrderStore>,
        config: &AgentConfig,
    ) -> (SharedOrderTask, oneshot::Receiver<CoffeeOrder>) {
        let (task, rx) = Self::new(store, config);
        (Arc::new(RwLock::new(task)), rx)
    }

    /// Current phase.
    pub fn phase(&self) -> TaskPhase {
        self.phase
    }

    /// The in-progress draft.
    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// The completed order, once the task reached `Complete`.
    pub fn completed_order(&self) -> Option<&CoffeeOrder> {
        self.completed.as_ref()
    }

    /// Record a single-choice field (drink type, size, or milk).
    ///
    /// Returns the spoken reply: a confirmation, or the field's valid
    /// options when `raw` is not one of them.
    pub async fn record_choice(&mut self, field: OrderField, raw: &str) -> String {
        if self.phase.is_terminal() {
            return ALREADY_COMPLETE.to_string();
        }
        match schema::validate_choice(field, raw) {
            Ok(value) => {
                let Some(slot) = self.draft.choice_slot_mut(field) else {
                    // Contract misuse by the caller; extras/name have their
                    // own operations.
                    tracing::warn!(field = %field, "record_choice called for a non-choice field");
                    return format!("Cannot record {field} as a single choice.");
                };
                *slot = Some(value.clone());
                let reply = format!("Recorded {field}: {value}");
                self.check_completion().await;
                reply
            }
            Err(rejected) => rejected.reply(),
        }
    }

    /// Record the extras selection, all-or-nothing.
    ///
    /// If any candidate is not an available extra, nothing is stored and the
    /// reply names every rejected candidate plus the valid set.
    pub async fn record_extras(&mut self, candidates: &[String]) -> String {
        if self.phase.is_terminal() {
            return ALREADY_COMPLETE.to_string();
        }
        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for raw in candidates {
            match schema::validate_choice(OrderField::Extras, raw) {
                Ok(value) => valid.push(value),
                Err(rejected) => invalid.push(rejected.value),
            }
        }
        if !invalid.is_empty() {
            return format!(
                "Sorry, we don't have: {}. Available extras: {}",
                invalid.join(", "),
                OrderField::Extras.options_list()
            );
        }
        let reply = format!("Recorded extras: {}", valid.join(", "));
        self.draft.extras = Some(valid);
        self.check_completion().await;
        reply
    }

    /// Record the customer's name. Any non-empty text is accepted verbatim
    /// (trimmed, case preserved).
    pub async fn record_name(&mut self, raw: &str) -> String {
        if self.phase.is_terminal() {
            return ALREADY_COMPLETE.to_string();
        }
        let name = raw.trim();
        if name.is_empty() {
            return "I didn't catch a name. Could you say it again?".to_string();
        }
        self.draft.name = Some(name.to_string());
        let reply = format!("Recorded name: {name}");
        self.check_completion().await;
        reply
    }

    /// Fire the `Collecting → Complete` transition once all five fields are
    /// present. Invoked after every successful write, independent of which
    /// field was written.
    async fn check_completion(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        let Some(order) = self.draft.finalize() else {
            return;
        };
        self.persist_best_effort(&order).await;
        self.phase = TaskPhase::Complete;
        self.completed = Some(order.clone());
        tracing::info!(customer = %order.name, "Order collection complete");
        if let Some(tx) = self.completion_tx.take()
            && tx.send(order).is_err()
        {
            tracing::warn!("Completion receiver dropped before the order was delivered");
        }
    }

    /// Best-effort durable write: each attempt is bounded by the persist
    /// timeout, with a bounded number of retries. Failure is logged and never
    /// blocks the completion transition or the spoken summary.
    async fn persist_best_effort(&self, order: &CoffeeOrder) {
        let attempts = self.persist_retries.saturating_add(1);
        for attempt in 1..=attempts {
            match timeout(self.persist_timeout, self.store.save(order)).await {
                Ok(Ok(())) => return,
                Ok(Err(e)) => {
                    tracing::warn!(attempt, "Failed to save order: {e}");
                }
                Err(_) => {
                    tracing::warn!(
                        attempt,
                        timeout = ?self.persist_timeout,
                        "Order save timed out"
                    );
                }
            }
        }
        tracing::error!("Giving up on saving the order; only the in-memory record remains");
    }
}
