//! Funnel and conversion events
//!
//! The wizard emits through an injected [`EventSink`]; hosts choose where the
//! events go (tracing, a background drain channel, memory, nowhere).

pub mod sink;
pub mod types;

pub use sink::{ChannelSink, EventDrain, EventSink, MemorySink, NoopSink, TracingSink};
pub use types::{EventCategory, EventPayload, LeadEvent, LEAD_SOURCE_WEBSITE};
