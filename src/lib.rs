//! Barista Assist — slot-filling order core.

pub mod config;
pub mod context;
pub mod error;
pub mod order;
pub mod schema;
pub mod store;
pub mod task;
pub mod tools;
