//! Status-effect tokens: catalog and the three-scope stacking engine.

pub mod catalog;
pub mod engine;

pub use catalog::{TokenGrant, TokenId, TokenScope};
pub use engine::{GrantCtx, TokenApplication, TokenStack, TokenStore, TokenView, REMOVE_ALL};
