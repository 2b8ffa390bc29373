pub mod chat;
pub mod filters;

pub use chat::{ChatTurn, Role};
pub use filters::{FilterMap, filters_from_value, merge};
