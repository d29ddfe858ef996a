//! Order records — the in-progress draft and the completed snapshot.

use serde::{Deserialize, Serialize};

use crate::schema::OrderField;

/// The in-progress order for one conversation.
///
/// A field is set only after its value passed validation, so the draft can
/// never hold a value outside its option set.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub drink_type: Option<String>,
    pub size: Option<String>,
    pub milk: Option<String>,
    pub extras: Option<Vec<String>>,
    pub name: Option<String>,
}

impl OrderDraft {
    /// Whether all five required fields are recorded.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Required fields not yet recorded.
    pub fn missing_fields(&self) -> Vec<OrderField> {
        OrderField::REQUIRED
            .into_iter()
            .filter(|field| match field {
                OrderField::DrinkType => self.drink_type.is_none(),
                OrderField::Size => self.size.is_none(),
                OrderField::Milk => self.milk.is_none(),
                OrderField::Extras => self.extras.is_none(),
                OrderField::Name => self.name.is_none(),
            })
            .collect()
    }

    /// Mutable slot for a single-choice field.
    ///
    /// `None` for extras and name, which have dedicated write paths.
    pub(crate) fn choice_slot_mut(&mut self, field: OrderField) -> Option<&mut Option<String>> {
        match field {
            OrderField::DrinkType => Some(&mut self.drink_type),
            OrderField::Size => Some(&mut self.size),
            OrderField::Milk => Some(&mut self.milk),
            OrderField::Extras | OrderField::Name => None,
        }
    }

    /// Snapshot the draft into an immutable [`CoffeeOrder`].
    ///
    /// Returns `None` while any required field is missing.
    pub fn finalize(&self) -> Option<CoffeeOrder> {
        Some(CoffeeOrder {
            drink_type: self.drink_type.clone()?,
            size: self.size.clone()?,
            milk: self.milk.clone()?,
            extras: self.extras.clone()?,
            name: self.name.clone()?,
        })
    }
}

/// An immutable, fully-populated order.
///
/// Serializes with the persisted document's camelCase keys
/// (`drinkType`, `size`, `milk`, `extras`, `name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeOrder {
    pub drink_type: String,
    pub size: String,
    pub milk: String,
    pub extras: Vec<String>,
    pub name: String,
}

impl CoffeeOrder {
    /// The spoken order summary produced on completion.
    pub fn summary(&self) -> String {
        format!(
            "Order complete! {}, here is your summary: {} {} with {} milk and {}.",
            self.name,
            self.size,
            self.drink_type,
            self.milk,
            self.extras.join(", ")
        )
    }
}
