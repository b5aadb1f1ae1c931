//! Shared value types and caller contracts for the warden crates.
//!
//! Everything here is plain data or a boundary trait: [`Decision`] is the
//! vocabulary every check layer speaks, [`ActionResponse`] is what an action
//! returns from `prepare`/`perform`, [`WardenError`] is the single structured
//! error type, and [`Actor`]/[`ActorResolver`] are the contracts the host
//! fulfils for authentication.

mod actor;
mod decision;
mod error;
mod response;

pub use actor::{AbilityArgs, Actor, ActorResolver, Guest, NullActorResolver};
pub use decision::Decision;
pub use error::{Result, WardenError};
pub use response::ActionResponse;
pub use serde_json::Value;
