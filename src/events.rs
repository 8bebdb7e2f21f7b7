//! Change notifications for UI layers.
//!
//! The form and wizard publish on a broadcast channel instead of invoking
//! callbacks, so any number of views can follow the booking state without the
//! core knowing about them. Publishing never blocks and never fails: with no
//! subscriber the event is dropped.

use crate::draft::Field;
use crate::validation::ValidationErrors;
use crate::wizard::{Confirmation, Step};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEvent {
    /// Field values changed (one entry per touched field).
    DataChanged(Vec<Field>),
    ValidationChanged { valid: bool, errors: ValidationErrors },
    StepChanged(Step),
    SubmissionStarted,
    Submitted(Confirmation),
    SubmissionFailed { message_key: &'static str },
    /// The form was closed or auto-closed and is back at its initial state.
    Closed,
}

/// Cloneable publisher shared by the form and the wizard.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BookingEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: BookingEvent) {
        // Err only means nobody is listening right now.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
