//! Quitanda transactional outbox
//!
//! Events are recorded in the `event_publication` table on the same
//! transaction as the state change that caused them, one row per interested
//! listener. A background relay polls for incomplete rows, dispatches them
//! to their listener with a retry policy, and marks them complete.
//! Delivery is at-least-once per listener; ordering is best effort by
//! publication date.

pub mod listener;
pub mod publisher;
pub mod relay;
pub mod retry;

pub use listener::{EventListener, ListenerRegistry};
pub use publisher::EventPublisher;
pub use relay::OutboxRelay;
pub use retry::RetryPolicy;
