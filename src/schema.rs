//! Static field schema and the shared option validator.
//!
//! Every enumerated field goes through the same normalize-and-check path,
//! parameterized by [`OrderField`], so a field can never be validated against
//! the wrong option set.

use std::fmt;

/// Accepted drink types.
pub const DRINK_TYPES: &[&str] = &[
    "latte",
    "cappuccino",
    "espresso",
    "americano",
    "mocha",
    "flat white",
];

/// Accepted sizes.
pub const SIZES: &[&str] = &["small", "medium", "large"];

/// Accepted milk choices.
pub const MILKS: &[&str] = &["whole", "skim", "oat", "none"];

/// Accepted extras. "none" stands in for an empty selection.
pub const EXTRAS: &[&str] = &["sugar", "extra shot", "vanilla syrup", "whipped cream", "none"];

/// The five required order fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    DrinkType,
    Size,
    Milk,
    Extras,
    Name,
}

impl OrderField {
    /// All fields that must be recorded before an order completes.
    pub const REQUIRED: [OrderField; 5] = [
        OrderField::DrinkType,
        OrderField::Size,
        OrderField::Milk,
        OrderField::Extras,
        OrderField::Name,
    ];

    /// Key used in the persisted order document.
    pub fn key(&self) -> &'static str {
        match self {
            Self::DrinkType => "drinkType",
            Self::Size => "size",
            Self::Milk => "milk",
            Self::Extras => "extras",
            Self::Name => "name",
        }
    }

    /// Human-readable label used in spoken replies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DrinkType => "drink type",
            Self::Size => "size",
            Self::Milk => "milk",
            Self::Extras => "extras",
            Self::Name => "name",
        }
    }

    /// The field's option set. `None` for free-text fields.
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::DrinkType => Some(DRINK_TYPES),
            Self::Size => Some(SIZES),
            Self::Milk => Some(MILKS),
            Self::Extras => Some(EXTRAS),
            Self::Name => None,
        }
    }

    /// The option set rendered for a reply, e.g. `"small, medium, large"`.
    pub fn options_list(&self) -> String {
        self.options().unwrap_or_default().join(", ")
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase and trim a candidate value.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A candidate value that failed the option check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub field: OrderField,
    /// The caller's original value, kept verbatim for the reply.
    pub value: String,
}

impl Rejected {
    /// The corrective reply spoken back to the user.
    pub fn reply(&self) -> String {
        format!(
            "Sorry, {} is not an available {}. We have: {}",
            self.value,
            self.field,
            self.field.options_list()
        )
    }
}

/// Validate `raw` against `field`'s option set.
///
/// Returns the normalized (lowercased, trimmed) value on success. Free-text
/// fields are not accepted here; callers record those directly.
pub fn validate_choice(field: OrderField, raw: &str) -> Result<String, Rejected> {
    let options = field
        .options()
        .unwrap_or_default();
    let normalized = normalize(raw);
    if options.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(Rejected {
            field,
            value: raw.trim().to_string(),
        })
    }
}
