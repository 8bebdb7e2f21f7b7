//! Single-owner task driving a [`BookingWizard`].
//!
//! All mutations go through [`SessionHandle`] and are applied one at a time
//! by the session task. The in-flight submission and the auto-close timer are
//! polled by the same task, so a close always wins over a late result.

use crate::calendar::TimeSlot;
use crate::draft::{BookingDraft, DraftPatch, Field, FieldValue};
use crate::error::{BookingError, SubmissionError};
use crate::events::{BookingEvent, EventBus};
use crate::submission::{submission_task, SubmissionPolicy, SubmissionReceipt, Submitter};
use crate::validation::ValidationErrors;
use crate::wizard::{BookingWizard, Confirmation, Phase, Step};
use chrono::NaiveDate;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

const COMMAND_CAPACITY: usize = 32;

/// Read-only view of the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub step: Step,
    pub phase: Phase,
    pub is_open: bool,
    pub is_dirty: bool,
    pub draft: BookingDraft,
    pub errors: ValidationErrors,
    pub submission_error: Option<SubmissionError>,
    pub displayed_month: NaiveDate,
    pub month_grid: Vec<Option<NaiveDate>>,
    pub time_slots: &'static [TimeSlot],
}

enum Command {
    Open,
    Close(oneshot::Sender<()>),
    UpdateField {
        field: Field,
        value: FieldValue,
        reply: oneshot::Sender<Result<bool, BookingError>>,
    },
    UpdateFields {
        patch: DraftPatch,
        reply: oneshot::Sender<Result<bool, BookingError>>,
    },
    MarkTouched(Field),
    Validate {
        field: Option<Field>,
        reply: oneshot::Sender<bool>,
    },
    Next(oneshot::Sender<Result<Step, BookingError>>),
    Back(oneshot::Sender<Result<Step, BookingError>>),
    SelectDate {
        date: NaiveDate,
        reply: oneshot::Sender<Result<bool, BookingError>>,
    },
    SelectTime {
        time: String,
        reply: oneshot::Sender<Result<bool, BookingError>>,
    },
    PreviousMonth(oneshot::Sender<bool>),
    NextMonth(oneshot::Sender<bool>),
    Submit(oneshot::Sender<Result<Confirmation, BookingError>>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
}

struct PendingSubmission {
    future: BoxFuture<'static, Result<SubmissionReceipt, SubmissionError>>,
    reply: oneshot::Sender<Result<Confirmation, BookingError>>,
}

pub struct BookingSession {
    wizard: BookingWizard,
    submitter: Arc<dyn Submitter>,
    policy: SubmissionPolicy,
    commands: mpsc::Receiver<Command>,
    pending: Option<PendingSubmission>,
}

impl BookingSession {
    /// Move `wizard` into a new task and return a handle to it.
    ///
    /// The task stops once every handle is dropped. Must be called from
    /// within a Tokio runtime.
    pub fn spawn(wizard: BookingWizard, submitter: Arc<dyn Submitter>, policy: SubmissionPolicy) -> SessionHandle {
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let events = wizard.events();

        let session = BookingSession {
            wizard,
            submitter,
            policy,
            commands: rx,
            pending: None,
        };
        tokio::spawn(session.run());

        SessionHandle { commands: tx, events }
    }

    async fn run(mut self) {
        debug!("Booking session started");

        loop {
            let deadline = self.wizard.auto_close_deadline();

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                result = wait_pending(&mut self.pending) => self.complete_submission(result),
                _ = wait_deadline(deadline) => {
                    self.wizard.expire_auto_close();
                }
            }
        }

        debug!("Booking session stopped");
    }

    fn handle(&mut self, command: Command) {
        // A dropped reply receiver only means the caller stopped waiting.
        match command {
            Command::Open => self.wizard.open(),
            Command::Close(reply) => {
                self.cancel_pending();
                self.wizard.close();
                let _ = reply.send(());
            }
            Command::UpdateField { field, value, reply } => {
                let _ = reply.send(self.wizard.update_field(field, value));
            }
            Command::UpdateFields { patch, reply } => {
                let _ = reply.send(self.wizard.update_fields(patch));
            }
            Command::MarkTouched(field) => self.wizard.mark_touched(field),
            Command::Validate { field, reply } => {
                let _ = reply.send(self.wizard.validate(field));
            }
            Command::Next(reply) => {
                let _ = reply.send(self.wizard.next());
            }
            Command::Back(reply) => {
                let _ = reply.send(self.wizard.back());
            }
            Command::SelectDate { date, reply } => {
                let _ = reply.send(self.wizard.select_date(date));
            }
            Command::SelectTime { time, reply } => {
                let _ = reply.send(self.wizard.select_time(&time));
            }
            Command::PreviousMonth(reply) => {
                let _ = reply.send(self.wizard.previous_month());
            }
            Command::NextMonth(reply) => {
                let _ = reply.send(self.wizard.next_month());
            }
            Command::Submit(reply) => match self.wizard.begin_submission() {
                Ok(booking) => {
                    let future = submission_task(self.submitter.clone(), booking, self.policy.clone());
                    self.pending = Some(PendingSubmission { future, reply });
                }
                Err(error) => {
                    let _ = reply.send(Err(error));
                }
            },
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn complete_submission(&mut self, result: Result<SubmissionReceipt, SubmissionError>) {
        if let Some(pending) = self.pending.take() {
            let _ = pending.reply.send(self.wizard.finish_submission(result));
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            info!("Cancelling in-flight booking submission");
            let _ = pending
                .reply
                .send(Err(BookingError::Submission(SubmissionError::Cancelled)));
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        let calendar = self.wizard.calendar();
        SessionSnapshot {
            step: self.wizard.step(),
            phase: self.wizard.phase().clone(),
            is_open: self.wizard.is_open(),
            is_dirty: self.wizard.form().is_dirty(),
            draft: self.wizard.draft().clone(),
            errors: self.wizard.errors().clone(),
            submission_error: self.wizard.submission_error().cloned(),
            displayed_month: calendar.displayed_month(),
            month_grid: calendar.month_grid(),
            time_slots: calendar.time_slots(),
        }
    }
}

async fn wait_pending(
    pending: &mut Option<PendingSubmission>,
) -> Result<SubmissionReceipt, SubmissionError> {
    match pending {
        Some(pending) => (&mut pending.future).await,
        None => std::future::pending().await,
    }
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Cloneable client of a running [`BookingSession`].
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    events: EventBus,
}

impl SessionHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.events.subscribe()
    }

    async fn send(&self, command: Command) -> Result<(), BookingError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| BookingError::SessionClosed)
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, BookingError> {
        let (tx, rx) = oneshot::channel();
        self.send(command(tx)).await?;
        rx.await.map_err(|_| BookingError::SessionClosed)
    }

    pub async fn open(&self) -> Result<(), BookingError> {
        self.send(Command::Open).await
    }

    /// Reset the form; an in-flight submission is abandoned.
    pub async fn close(&self) -> Result<(), BookingError> {
        self.request(Command::Close).await
    }

    /// See [`BookingWizard::update_field`]; `Ok(false)` means the calendar
    /// refused the date or time.
    pub async fn update_field(&self, field: Field, value: impl Into<FieldValue>) -> Result<bool, BookingError> {
        let value = value.into();
        self.request(|reply| Command::UpdateField { field, value, reply }).await?
    }

    pub async fn update_fields(&self, patch: DraftPatch) -> Result<bool, BookingError> {
        self.request(|reply| Command::UpdateFields { patch, reply }).await?
    }

    pub async fn mark_touched(&self, field: Field) -> Result<(), BookingError> {
        self.send(Command::MarkTouched(field)).await
    }

    pub async fn validate(&self, field: Option<Field>) -> Result<bool, BookingError> {
        self.request(|reply| Command::Validate { field, reply }).await
    }

    pub async fn next(&self) -> Result<Step, BookingError> {
        self.request(Command::Next).await?
    }

    pub async fn back(&self) -> Result<Step, BookingError> {
        self.request(Command::Back).await?
    }

    pub async fn select_date(&self, date: NaiveDate) -> Result<bool, BookingError> {
        self.request(|reply| Command::SelectDate { date, reply }).await?
    }

    pub async fn select_time(&self, time: &str) -> Result<bool, BookingError> {
        let time = time.to_string();
        self.request(|reply| Command::SelectTime { time, reply }).await?
    }

    pub async fn previous_month(&self) -> Result<bool, BookingError> {
        self.request(Command::PreviousMonth).await
    }

    pub async fn next_month(&self) -> Result<bool, BookingError> {
        self.request(Command::NextMonth).await
    }

    /// Submit from step 3 and wait for the outcome.
    pub async fn submit(&self) -> Result<Confirmation, BookingError> {
        self.request(Command::Submit).await?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, BookingError> {
        self.request(Command::Snapshot).await
    }
}
