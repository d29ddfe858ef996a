//! Integration tests for the order-collection flow.
//!
//! Each test drives the real tool surface — registry, record tools, shared
//! task — against a file-backed store in a temp directory, the same wiring
//! the binary uses.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::timeout;

use barista_assist::config::AgentConfig;
use barista_assist::context::SessionContext;
use barista_assist::error::StoreError;
use barista_assist::order::CoffeeOrder;
use barista_assist::store::{JsonFileStore, OrderStore};
use barista_assist::task::{OrderTask, SharedOrderTask};
use barista_assist::tools::ToolRegistry;
use barista_assist::tools::record::register_order_tools;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Store that counts saves, for exactly-once assertions.
#[derive(Default)]
struct CountingStore {
    saves: AtomicUsize,
}

#[async_trait]
impl OrderStore for CountingStore {
    async fn save(&self, _order: &CoffeeOrder) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Harness {
    registry: ToolRegistry,
    task: SharedOrderTask,
    completion: tokio::sync::oneshot::Receiver<CoffeeOrder>,
    ctx: SessionContext,
}

impl Harness {
    async fn new(store: Arc<dyn OrderStore>) -> Self {
        let (task, completion) = OrderTask::shared(store, &AgentConfig::default());
        let registry = ToolRegistry::new();
        register_order_tools(&registry, Arc::clone(&task)).await;
        Self {
            registry,
            task,
            completion,
            ctx: SessionContext::new("test-room"),
        }
    }

    async fn invoke(&self, tool: &str, params: Value) -> String {
        let tool = self.registry.get(tool).await.expect("tool registered");
        timeout(TEST_TIMEOUT, tool.execute(params, &self.ctx))
            .await
            .expect("tool invocation hung")
            .expect("tool invocation failed")
            .content
    }
}

#[tokio::test]
async fn full_order_is_collected_persisted_and_summarized() {
    let dir = tempfile::tempdir().unwrap();
    let order_path = dir.path().join("order.json");
    let mut h = Harness::new(Arc::new(JsonFileStore::new(order_path.clone()))).await;

    let reply = h
        .invoke("record_drink_type", json!({"drink_type": "Latte"}))
        .await;
    assert_eq!(reply, "Recorded drink type: latte");

    h.invoke("record_size", json!({"size": "Medium"})).await;
    h.invoke("record_milk", json!({"milk": "Oat"})).await;
    h.invoke(
        "record_extras",
        json!({"extras": ["Vanilla Syrup", "sugar"]}),
    )
    .await;

    // Four of five fields: nothing persisted, no completion yet.
    assert!(!order_path.exists());
    assert!(h.completion.try_recv().is_err());

    let reply = h.invoke("record_name", json!({"name": "Alex"})).await;
    assert_eq!(reply, "Recorded name: Alex");

    let order = timeout(TEST_TIMEOUT, h.completion)
        .await
        .expect("completion signal hung")
        .expect("completion sender dropped");
    let summary = order.summary();
    for part in ["Alex", "medium", "latte", "oat", "vanilla syrup", "sugar"] {
        assert!(summary.contains(part), "summary should mention {part}");
    }

    let written = tokio::fs::read_to_string(&order_path).await.unwrap();
    let doc: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(
        doc,
        json!({
            "drinkType": "latte",
            "size": "medium",
            "milk": "oat",
            "extras": ["vanilla syrup", "sugar"],
            "name": "Alex",
        })
    );
}

#[tokio::test]
async fn invalid_extras_store_nothing_and_name_every_reject() {
    let dir = tempfile::tempdir().unwrap();
    let h = Harness::new(Arc::new(JsonFileStore::new(dir.path().join("order.json")))).await;

    let reply = h
        .invoke(
            "record_extras",
            json!({"extras": ["whipped cream", "almond syrup"]}),
        )
        .await;
    assert!(reply.contains("almond syrup"));
    assert!(
        reply.contains("sugar, extra shot, vanilla syrup, whipped cream, none"),
        "reply should list the valid extras: {reply}"
    );

    let task = h.task.read().await;
    assert!(task.draft().extras.is_none());
    assert!(!task.phase().is_terminal());
}

#[tokio::test]
async fn invalid_choice_replies_with_the_field_options() {
    let dir = tempfile::tempdir().unwrap();
    let h = Harness::new(Arc::new(JsonFileStore::new(dir.path().join("order.json")))).await;

    let reply = h
        .invoke("record_drink_type", json!({"drink_type": "chai"}))
        .await;
    assert!(reply.contains("chai"));
    assert!(reply.contains("latte, cappuccino, espresso, americano, mocha, flat white"));
    assert!(h.task.read().await.draft().drink_type.is_none());
}

#[tokio::test]
async fn completion_persists_exactly_once_despite_late_calls() {
    let store = Arc::new(CountingStore::default());
    let h = Harness::new(store.clone()).await;

    h.invoke("record_drink_type", json!({"drink_type": "mocha"}))
        .await;
    h.invoke("record_size", json!({"size": "large"})).await;
    h.invoke("record_milk", json!({"milk": "whole"})).await;
    h.invoke("record_extras", json!({"extras": ["none"]})).await;
    h.invoke("record_name", json!({"name": "Sam"})).await;
    assert_eq!(store.saves.load(Ordering::SeqCst), 1);

    // The runtime should stop calling after completion, but if it doesn't
    // the task must neither change state nor persist again.
    let reply = h.invoke("record_size", json!({"size": "small"})).await;
    assert_eq!(reply, "The order is already complete.");
    let reply = h.invoke("record_name", json!({"name": "Riley"})).await;
    assert_eq!(reply, "The order is already complete.");

    assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    let task = h.task.read().await;
    assert_eq!(task.completed_order().unwrap().name, "Sam");
    assert_eq!(task.draft().size.as_deref(), Some("large"));
}

#[tokio::test]
async fn definitions_advertise_the_five_operations() {
    let dir = tempfile::tempdir().unwrap();
    let h = Harness::new(Arc::new(JsonFileStore::new(dir.path().join("order.json")))).await;

    let defs = h.registry.tool_definitions().await;
    assert_eq!(defs.len(), 5);

    let drink = defs.iter().find(|d| d.name == "record_drink_type").unwrap();
    assert!(drink.description.contains("latte"));
    assert_eq!(drink.parameters["required"][0], "drink_type");

    let extras = defs.iter().find(|d| d.name == "record_extras").unwrap();
    assert_eq!(extras.parameters["properties"]["extras"]["type"], "array");
}
