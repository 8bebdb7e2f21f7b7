//! Three-step booking flow: service, personal details, date and time.

use crate::calendar::{BookingCalendar, CalendarPolicy, Clock};
use crate::draft::{Booking, BookingDraft, DraftPatch, Field, FieldValue};
use crate::error::{BookingError, SubmissionError};
use crate::events::{BookingEvent, EventBus};
use crate::form::BookingForm;
use crate::i18n::Translate;
use crate::submission::{submit_with_retry, SubmissionPolicy, SubmissionReceipt, Submitter};
use crate::validation::{EmailPolicy, ValidationErrors};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Service,
    Details,
    DateTime,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Service, Step::Details, Step::DateTime];

    /// 1-based position shown to the user.
    pub fn number(&self) -> u8 {
        match self {
            Step::Service => 1,
            Step::Details => 2,
            Step::DateTime => 3,
        }
    }

    /// Fields validated before leaving this step.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Step::Service => &[Field::Service],
            Step::Details => &[
                Field::Name,
                Field::Email,
                Field::Phone,
                Field::ExperienceLevel,
                Field::GroupSize,
                Field::SpecialRequests,
            ],
            Step::DateTime => &[Field::Date, Field::Time],
        }
    }

    /// Step that owns `field`.
    pub fn for_field(field: Field) -> Step {
        Step::ALL
            .into_iter()
            .find(|step| step.fields().contains(&field))
            .unwrap_or(Step::Service)
    }

    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Service => Some(Step::Details),
            Step::Details => Some(Step::DateTime),
            Step::DateTime => None,
        }
    }

    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::Service => None,
            Step::Details => Some(Step::Service),
            Step::DateTime => Some(Step::Details),
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Step::Service => "booking.steps.service",
            Step::Details => "booking.steps.details",
            Step::DateTime => "booking.steps.dateTime",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// What the user sees after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub name: String,
    pub phone: String,
    pub reference: Option<String>,
}

impl Confirmation {
    pub fn title(&self, translator: &dyn Translate) -> String {
        translator.translate("booking.success.title", &[])
    }

    /// Thank-you line followed by the contact line.
    pub fn message(&self, translator: &dyn Translate) -> String {
        format!(
            "{}\n{}",
            translator.translate("booking.success.message", &[("name", &self.name)]),
            translator.translate("booking.success.contact", &[("phone", &self.phone)])
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    Submitted(Confirmation),
}

/// Construction options for [`BookingWizard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardOptions {
    pub email_policy: EmailPolicy,
    pub calendar: CalendarPolicy,
    /// How long the confirmation stays up before the form closes itself.
    pub auto_close: Duration,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            email_policy: EmailPolicy::default(),
            calendar: CalendarPolicy::default(),
            auto_close: Duration::from_secs(3),
        }
    }
}

/// Step controller owning the form and the calendar.
///
/// Edits and navigation are only accepted in [`Phase::Editing`]. A step can
/// only be left forward once its own fields pass, so step 3 is never reached
/// with an invalid step 1 or 2 unless those fields were edited afterwards;
/// the final submission check catches that case.
pub struct BookingWizard {
    form: BookingForm,
    calendar: BookingCalendar,
    step: Step,
    phase: Phase,
    is_open: bool,
    submission_error: Option<SubmissionError>,
    auto_close: Duration,
    auto_close_at: Option<Instant>,
    events: EventBus,
}

impl BookingWizard {
    pub fn new(clock: Arc<dyn Clock>, options: WizardOptions) -> Self {
        let events = EventBus::new();
        Self {
            form: BookingForm::new(clock.clone(), options.email_policy, events.clone()),
            calendar: BookingCalendar::new(clock, options.calendar),
            step: Step::Service,
            phase: Phase::Editing,
            is_open: false,
            submission_error: None,
            auto_close: options.auto_close,
            auto_close_at: None,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.events.subscribe()
    }

    /// Publisher handle shared with observers that outlive a borrow of the wizard.
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn calendar(&self) -> &BookingCalendar {
        &self.calendar
    }

    pub fn draft(&self) -> &BookingDraft {
        self.form.draft()
    }

    pub fn errors(&self) -> &ValidationErrors {
        self.form.errors()
    }

    /// Failure of the last submission attempt, cleared on the next one.
    pub fn submission_error(&self) -> Option<&SubmissionError> {
        self.submission_error.as_ref()
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Discard everything and return to an empty step 1.
    pub fn close(&mut self) {
        self.form.reset();
        self.calendar.reset();
        self.step = Step::Service;
        self.phase = Phase::Editing;
        self.submission_error = None;
        self.auto_close_at = None;
        self.is_open = false;
        self.events.publish(BookingEvent::Closed);
    }

    fn ensure_editing(&self) -> Result<(), BookingError> {
        match self.phase {
            Phase::Editing => Ok(()),
            Phase::Submitting => Err(BookingError::Locked("in progress")),
            Phase::Submitted(_) => Err(BookingError::Locked("complete")),
        }
    }

    // ==================== Editing ====================

    /// Write one field. Date and time go through the calendar, so past days and
    /// unavailable or unknown slots are refused with `Ok(false)`.
    pub fn update_field(&mut self, field: Field, value: impl Into<FieldValue>) -> Result<bool, BookingError> {
        self.ensure_editing()?;
        match (field, value.into()) {
            (Field::Date, FieldValue::Date(date)) => self.select_date(date),
            (Field::Time, FieldValue::Text(time)) => self.select_time(&time),
            (Field::Date, FieldValue::Clear) => {
                self.calendar.clear_date();
                self.form.update_field(Field::Date, FieldValue::Clear)?;
                Ok(true)
            }
            (Field::Time, FieldValue::Clear) => {
                self.calendar.clear_time();
                self.form.update_field(Field::Time, FieldValue::Clear)?;
                Ok(true)
            }
            (field, value) => {
                self.form.update_field(field, value)?;
                Ok(true)
            }
        }
    }

    /// Merge several values. Returns `Ok(false)` when the calendar refused the
    /// patch's date or time; the other values are still applied.
    pub fn update_fields(&mut self, mut patch: DraftPatch) -> Result<bool, BookingError> {
        self.ensure_editing()?;
        let date = patch.date.take();
        let time = patch.time.take();
        self.form.update_fields(patch);

        let mut accepted = true;
        if let Some(date) = date {
            accepted &= self.select_date(date)?;
        }
        if let Some(time) = time {
            accepted &= self.select_time(&time)?;
        }
        Ok(accepted)
    }

    pub fn mark_touched(&mut self, field: Field) {
        self.form.mark_touched(field);
    }

    /// Validate one field or the whole draft; see [`BookingForm::validate`].
    pub fn validate(&mut self, field: Option<Field>) -> bool {
        self.form.validate(field)
    }

    /// Pick a day in the calendar. Returns `Ok(false)` for past days.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<bool, BookingError> {
        self.ensure_editing()?;
        if !self.calendar.select_date(date) {
            return Ok(false);
        }
        self.form.update_field(Field::Date, date)?;
        Ok(true)
    }

    /// Pick a time slot. Returns `Ok(false)` for unknown or unavailable slots.
    pub fn select_time(&mut self, time: &str) -> Result<bool, BookingError> {
        self.ensure_editing()?;
        if !self.calendar.select_time(time) {
            return Ok(false);
        }
        self.form.update_field(Field::Time, time)?;
        Ok(true)
    }

    pub fn previous_month(&mut self) -> bool {
        self.calendar.previous_month()
    }

    pub fn next_month(&mut self) -> bool {
        self.calendar.next_month()
    }

    // ==================== Navigation ====================

    /// Advance when the current step's fields are valid.
    pub fn next(&mut self) -> Result<Step, BookingError> {
        self.ensure_editing()?;
        let next = self.step.next().ok_or(BookingError::InvalidTransition {
            step: self.step,
            action: "advance",
        })?;

        let errors = self.form.validate_step(self.step);
        if !errors.is_empty() {
            debug!("Step {} blocked: {}", self.step, errors);
            return Err(BookingError::StepBlocked { step: self.step, errors });
        }

        self.go_to(next);
        Ok(next)
    }

    /// Go back one step. Never validates; all errors are cleared.
    pub fn back(&mut self) -> Result<Step, BookingError> {
        self.ensure_editing()?;
        let previous = self.step.previous().ok_or(BookingError::InvalidTransition {
            step: self.step,
            action: "go back",
        })?;

        self.form.clear_errors();
        self.go_to(previous);
        Ok(previous)
    }

    fn go_to(&mut self, step: Step) {
        self.step = step;
        self.events.publish(BookingEvent::StepChanged(step));
    }

    // ==================== Submission ====================

    /// Run the final checks and lock the form for submission.
    pub fn begin_submission(&mut self) -> Result<Booking, BookingError> {
        self.ensure_editing()?;
        if self.step != Step::DateTime {
            return Err(BookingError::InvalidTransition {
                step: self.step,
                action: "submit",
            });
        }

        let errors = self.form.validate_step(Step::DateTime);
        if !errors.is_empty() {
            return Err(BookingError::StepBlocked {
                step: Step::DateTime,
                errors,
            });
        }

        let booking = self.form.validate_for_submission().map_err(|errors| {
            let step = errors.fields().next().map(Step::for_field).unwrap_or(self.step);
            warn!("Draft became invalid after step {}: {}", step, errors);
            BookingError::StepBlocked { step, errors }
        })?;

        self.phase = Phase::Submitting;
        self.submission_error = None;
        self.events.publish(BookingEvent::SubmissionStarted);
        info!("Submitting {} booking for {}", booking.service, booking.date);
        Ok(booking)
    }

    /// Record the outcome of the submission started by [`begin_submission`](Self::begin_submission).
    ///
    /// Success shows the confirmation and arms the auto-close deadline. Failure
    /// unlocks step 3 so the user can try again.
    pub fn finish_submission(
        &mut self,
        result: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<Confirmation, BookingError> {
        if self.phase != Phase::Submitting {
            return Err(BookingError::InvalidTransition {
                step: self.step,
                action: "finish a submission",
            });
        }

        match result {
            Ok(receipt) => {
                let draft = self.form.draft();
                let confirmation = Confirmation {
                    name: draft.name.trim().to_string(),
                    phone: draft.phone.trim().to_string(),
                    reference: receipt.reference,
                };
                self.phase = Phase::Submitted(confirmation.clone());
                self.auto_close_at = Some(Instant::now() + self.auto_close);
                self.events.publish(BookingEvent::Submitted(confirmation.clone()));
                Ok(confirmation)
            }
            Err(error) => {
                warn!("Booking submission failed: {}", error);
                self.phase = Phase::Editing;
                self.events.publish(BookingEvent::SubmissionFailed {
                    message_key: error.message_key(),
                });
                self.submission_error = Some(error.clone());
                Err(error.into())
            }
        }
    }

    /// Validate, submit and record the outcome in one call.
    pub async fn submit_with(
        &mut self,
        submitter: &dyn Submitter,
        policy: &SubmissionPolicy,
    ) -> Result<Confirmation, BookingError> {
        let booking = self.begin_submission()?;
        let result = submit_with_retry(submitter, &booking, policy).await;
        self.finish_submission(result)
    }

    /// When the confirmation closes itself, if it is showing.
    pub fn auto_close_deadline(&self) -> Option<Instant> {
        self.auto_close_at
    }

    /// Close the form if the auto-close deadline has passed. Returns whether it closed.
    pub fn expire_auto_close(&mut self) -> bool {
        match self.auto_close_at {
            Some(deadline) if Instant::now() >= deadline => {
                debug!("Auto-closing confirmation");
                self.close();
                true
            }
            _ => false,
        }
    }
}
