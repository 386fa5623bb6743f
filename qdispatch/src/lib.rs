//! Concurrent fan-out of one user turn to every enabled provider.
//!
//! A [`DispatchCoordinator`] takes a [`Turn`], composes a provider-specific
//! prompt from the turn's [`Topic`], invokes every enabled adapter
//! concurrently, and yields one terminal [`Outcome`] per provider in
//! completion order. Timeouts, retries of transient failures, and
//! cancellation are handled here so adapters stay single-shot.

mod catalog;
mod coordinator;
mod hooks;
mod prompt;
mod types;

pub use catalog::{builtin_topics, TopicCatalog};
pub use coordinator::{DispatchCoordinator, DispatchHandle, DispatchPolicy, OutcomeStream};
pub use hooks::{DispatchHooks, NoopDispatchHooks};
pub use prompt::{compose, ComposeError, Topic};
pub use types::{Outcome, OutcomeStatus, ProviderSelection, SelectionEntry, Turn};
