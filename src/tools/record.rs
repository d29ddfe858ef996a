//! The five record operations, exposed as tools over one shared order task.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use crate::context::SessionContext;
use crate::schema::OrderField;
use crate::task::SharedOrderTask;
use crate::tools::registry::ToolRegistry;
use crate::tools::tool::{Tool, ToolError, ToolOutput, require_str, require_str_array};

/// Records a single-choice field (drink type, size, or milk).
///
/// One implementation parameterized by [`OrderField`], so every choice field
/// runs the same normalize-validate-store path against its own option set.
pub struct RecordChoiceTool {
    field: OrderField,
    name: &'static str,
    param: &'static str,
    description: String,
    task: SharedOrderTask,
}

impl RecordChoiceTool {
    fn new(field: OrderField, name: &'static str, param: &'static str, task: SharedOrderTask) -> Self {
        let description = format!(
            "Record the {}. Must be one of: {}.",
            field.label(),
            field.options_list()
        );
        Self {
            field,
            name,
            param,
            description,
            task,
        }
    }

    /// `record_drink_type` tool.
    pub fn drink_type(task: SharedOrderTask) -> Self {
        Self::new(OrderField::DrinkType, "record_drink_type", "drink_type", task)
    }

    /// `record_size` tool.
    pub fn size(task: SharedOrderTask) -> Self {
        Self::new(OrderField::Size, "record_size", "size", task)
    }

    /// `record_milk` tool.
    pub fn milk(task: SharedOrderTask) -> Self {
        Self::new(OrderField::Milk, "record_milk", "milk", task)
    }
}

#[async_trait]
impl Tool for RecordChoiceTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                (self.param): {
                    "type": "string",
                    "description": format!(
                        "The {}, one of: {}",
                        self.field.label(),
                        self.field.options_list()
                    )
                }
            },
            "required": [self.param]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &SessionContext,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let raw = require_str(&params, self.param)?;
        tracing::debug!(session = %ctx.session_id, tool = self.name, "Recording {}", self.field);
        let reply = self.task.write().await.record_choice(self.field, &raw).await;
        Ok(ToolOutput::text(reply, start.elapsed()))
    }
}

/// Records the extras selection, all-or-nothing.
pub struct RecordExtrasTool {
    description: String,
    task: SharedOrderTask,
}

impl RecordExtrasTool {
    pub fn new(task: SharedOrderTask) -> Self {
        let description = format!(
            "Record the extras. Must be a list drawn from: {}.",
            OrderField::Extras.options_list()
        );
        Self { description, task }
    }
}

#[async_trait]
impl Tool for RecordExtrasTool {
    fn name(&self) -> &str {
        "record_extras"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "extras": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": format!(
                        "The requested extras, each one of: {}",
                        OrderField::Extras.options_list()
                    )
                }
            },
            "required": ["extras"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &SessionContext,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let extras = require_str_array(&params, "extras")?;
        tracing::debug!(session = %ctx.session_id, tool = "record_extras", count = extras.len(), "Recording extras");
        let reply = self.task.write().await.record_extras(&extras).await;
        Ok(ToolOutput::text(reply, start.elapsed()))
    }
}

/// Records the customer's name.
pub struct RecordNameTool {
    task: SharedOrderTask,
}

impl RecordNameTool {
    pub fn new(task: SharedOrderTask) -> Self {
        Self { task }
    }
}

#[async_trait]
impl Tool for RecordNameTool {
    fn name(&self) -> &str {
        "record_name"
    }

    fn description(&self) -> &str {
        "Record the customer's name."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "The customer's name"
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &SessionContext,
    ) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let name = require_str(&params, "name")?;
        tracing::debug!(session = %ctx.session_id, tool = "record_name", "Recording name");
        let reply = self.task.write().await.record_name(&name).await;
        Ok(ToolOutput::text(reply, start.elapsed()))
    }
}

/// Register all five record operations for `task`.
pub async fn register_order_tools(registry: &ToolRegistry, task: SharedOrderTask) {
    registry
        .register(Arc::new(RecordChoiceTool::drink_type(Arc::clone(&task))))
        .await;
    registry
        .register(Arc::new(RecordChoiceTool::size(Arc::clone(&task))))
        .await;
    registry
        .register(Arc::new(RecordChoiceTool::milk(Arc::clone(&task))))
        .await;
    registry
        .register(Arc::new(RecordExtrasTool::new(Arc::clone(&task))))
        .await;
    registry.register(Arc::new(RecordNameTool::new(task))).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::error::StoreError;
    use crate::order::CoffeeOrder;
    use crate::store::OrderStore;
    use crate::task::OrderTask;

    struct NullStore;

    #[async_trait]
    impl OrderStore for NullStore {
        async fn save(&self, _order: &CoffeeOrder) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn shared_task() -> SharedOrderTask {
        let (task, _rx) = OrderTask::shared(Arc::new(NullStore), &AgentConfig::default());
        task
    }

    #[tokio::test]
    async fn choice_tool_reports_its_schema() {
        let tool = RecordChoiceTool::size(shared_task());
        assert_eq!(tool.name(), "record_size");
        assert!(tool.description().contains("small, medium, large"));
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"][0], "size");
    }

    #[tokio::test]
    async fn choice_tool_records_through_the_task() {
        let task = shared_task();
        let tool = RecordChoiceTool::milk(Arc::clone(&task));
        let out = tool
            .execute(json!({"milk": " Oat "}), &SessionContext::default())
            .await
            .unwrap();
        assert_eq!(out.content, "Recorded milk: oat");
        assert_eq!(task.read().await.draft().milk.as_deref(), Some("oat"));
    }

    #[tokio::test]
    async fn missing_parameter_is_a_tool_error() {
        let tool = RecordNameTool::new(shared_task());
        let err = tool
            .execute(json!({}), &SessionContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn register_order_tools_registers_all_five() {
        let registry = ToolRegistry::new();
        register_order_tools(&registry, shared_task()).await;
        assert_eq!(
            registry.list().await,
            vec![
                "record_drink_type",
                "record_extras",
                "record_milk",
                "record_name",
                "record_size",
            ]
        );
    }
}
