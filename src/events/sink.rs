//! Event sinks.
//!
//! The wizard talks to analytics only through [`EventSink`]. `emit()` returns
//! nothing: a sink that cannot deliver an event drops it, and the wizard's
//! state is never affected.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, info};

use super::types::{EventPayload, LeadEvent};

/// Destination for funnel and conversion events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: LeadEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: LeadEvent) {}
}

/// Writes each event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: LeadEvent) {
        let session = event.session_id;
        let kind = event.payload.event_type_str();
        let category = event.payload.category().as_str();
        match &event.payload {
            EventPayload::Started { form_type } => {
                info!(target: "lead_wizard::events", %session, category, kind, %form_type, "lead event");
            }
            EventPayload::StepCompleted {
                form_type,
                step_number,
                step_id,
            } => {
                info!(
                    target: "lead_wizard::events",
                    %session, category, kind, %form_type, step_number, %step_id,
                    "lead event"
                );
            }
            EventPayload::Submitted {
                form_type,
                reference_number,
            } => {
                info!(
                    target: "lead_wizard::events",
                    %session, category, kind, %form_type, reference_number = reference_number.as_str(),
                    "lead event"
                );
            }
            EventPayload::LeadGenerated { product, source } => {
                info!(
                    target: "lead_wizard::events",
                    %session, category, kind, product = product.as_str(), source = source.as_str(),
                    "lead event"
                );
            }
        }
    }
}

/// Keeps events in memory. Useful for tests and for hosts that batch-upload.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LeadEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LeadEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn payloads(&self) -> Vec<EventPayload> {
        self.events().into_iter().map(|e| e.payload).collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: LeadEvent) {
        // A poisoned lock only means another emitter panicked; drop the event.
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Hands events to another thread through a bounded channel.
///
/// Emitting never waits: once `capacity` events are queued and undrained,
/// further events are discarded and counted in [`ChannelSink::dropped`].
pub struct ChannelSink {
    sender: Sender<LeadEvent>,
    dropped: AtomicU64,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, EventDrain) {
        let (sender, receiver) = bounded(capacity);
        let sink = Self {
            sender,
            dropped: AtomicU64::new(0),
        };
        (sink, EventDrain { receiver })
    }

    /// Events discarded because the queue was full or the drain was gone.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: LeadEvent) {
        if let Err(err) = self.sender.try_send(event) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            let event = err.into_inner();
            debug!(
                session = %event.session_id,
                kind = event.payload.event_type_str(),
                "lead event dropped"
            );
        }
    }
}

/// Consumer end of a [`ChannelSink`].
pub struct EventDrain {
    receiver: Receiver<LeadEvent>,
}

impl EventDrain {
    /// Everything queued so far, oldest first. Never blocks.
    pub fn drain(&self) -> Vec<LeadEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormType;
    use uuid::Uuid;

    fn started(form_type: FormType) -> LeadEvent {
        LeadEvent::new(Uuid::new_v4(), EventPayload::Started { form_type })
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, drain) = ChannelSink::new(8);
        sink.emit(started(FormType::Inquiry));
        sink.emit(started(FormType::Contact));

        let forms: Vec<_> = drain
            .drain()
            .into_iter()
            .map(|e| e.payload)
            .collect();
        assert_eq!(
            forms,
            vec![
                EventPayload::Started { form_type: FormType::Inquiry },
                EventPayload::Started { form_type: FormType::Contact },
            ]
        );
        assert!(drain.drain().is_empty());
        assert_eq!(sink.dropped(), 0);
    }

    #[test]
    fn test_channel_sink_drops_when_full() {
        let (sink, drain) = ChannelSink::new(1);
        sink.emit(started(FormType::Inquiry));
        sink.emit(started(FormType::Inquiry));

        assert_eq!(sink.dropped(), 1);
        assert_eq!(drain.drain().len(), 1);
    }

    #[test]
    fn test_channel_sink_survives_closed_drain() {
        let (sink, drain) = ChannelSink::new(4);
        drop(drain);
        sink.emit(started(FormType::Inquiry));
        assert_eq!(sink.dropped(), 1);
    }

    #[test]
    fn test_tracing_sink_accepts_every_payload() {
        let sink = TracingSink;
        sink.emit(started(FormType::Contact));
        sink.emit(LeadEvent::new(
            Uuid::new_v4(),
            EventPayload::LeadGenerated {
                product: "auto".to_string(),
                source: "website".to_string(),
            },
        ));
    }
}
