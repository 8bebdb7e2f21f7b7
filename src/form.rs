//! Field store: current draft values, dirty/touched flags and per-field errors.

use crate::calendar::Clock;
use crate::draft::{Booking, BookingDraft, DraftPatch, Field, FieldValue};
use crate::error::BookingError;
use crate::events::{BookingEvent, EventBus};
use crate::validation::{self, EmailPolicy, RuleContext, ValidationErrors};
use crate::wizard::Step;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Holds the draft and its validation state.
///
/// Errors are cleared optimistically on edit and recomputed only when one of
/// the `validate*` methods runs, so a field whose current value satisfies its
/// rule never keeps an error after it has been revalidated.
pub struct BookingForm {
    initial: BookingDraft,
    draft: BookingDraft,
    errors: ValidationErrors,
    dirty: bool,
    touched: BTreeSet<Field>,
    clock: Arc<dyn Clock>,
    email_policy: EmailPolicy,
    events: EventBus,
}

impl BookingForm {
    pub fn new(clock: Arc<dyn Clock>, email_policy: EmailPolicy, events: EventBus) -> Self {
        Self {
            initial: BookingDraft::default(),
            draft: BookingDraft::default(),
            errors: ValidationErrors::new(),
            dirty: false,
            touched: BTreeSet::new(),
            clock,
            email_policy,
            events,
        }
    }

    /// Replace the initial values used by `reset` and start from them.
    pub fn with_initial(mut self, initial: BookingDraft) -> Self {
        self.draft = initial.clone();
        self.initial = initial;
        self
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// No error is currently recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn touched(&self) -> &BTreeSet<Field> {
        &self.touched
    }

    pub fn rule_context(&self) -> RuleContext {
        RuleContext::new(self.clock.today()).with_email_policy(self.email_policy)
    }

    /// Set one field, mark the form dirty and clear that field's error.
    pub fn update_field(&mut self, field: Field, value: impl Into<FieldValue>) -> Result<(), BookingError> {
        if !self.draft.set(field, value.into()) {
            return Err(BookingError::FieldType { field });
        }

        self.dirty = true;
        self.events.publish(BookingEvent::DataChanged(vec![field]));

        if self.errors.remove(field).is_some() {
            self.publish_validation();
        }
        Ok(())
    }

    /// Same as [`update_field`](Self::update_field), addressing the field by its
    /// camelCase name.
    pub fn update_field_named(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), BookingError> {
        let field = name.parse::<Field>().map_err(BookingError::UnknownField)?;
        self.update_field(field, value)
    }

    /// Merge several values at once. Marks the form dirty; errors are kept.
    pub fn update_fields(&mut self, patch: DraftPatch) {
        let fields = patch.fields();
        if fields.is_empty() {
            return;
        }
        patch.apply_to(&mut self.draft);
        self.dirty = true;
        self.events.publish(BookingEvent::DataChanged(fields));
    }

    /// Validate one field, or the whole draft when `field` is `None`.
    ///
    /// For a single field the result is that field's validity and only its
    /// entry changes. For the whole draft the error map is replaced and the
    /// result is the overall validity.
    pub fn validate(&mut self, field: Option<Field>) -> bool {
        let ctx = self.rule_context();

        let valid = match field {
            Some(field) => match validation::validate_field(field, &self.draft, &ctx) {
                Ok(()) => {
                    self.errors.remove(field);
                    true
                }
                Err(key) => {
                    debug!("Field {} failed validation: {}", field, key);
                    self.errors.insert(field, key);
                    false
                }
            },
            None => {
                self.errors = validation::validate_all(&self.draft, &ctx);
                self.errors.is_empty()
            }
        };

        self.publish_validation();
        valid
    }

    pub fn validate_all(&mut self) -> bool {
        self.validate(None)
    }

    /// Validate the fields owned by `step`; entries of other fields are kept.
    ///
    /// Returns the step's failures (empty when the step is valid).
    pub fn validate_step(&mut self, step: Step) -> ValidationErrors {
        let step_errors = validation::validate_step(step, &self.draft, &self.rule_context());
        self.errors.merge_for(step.fields(), &step_errors);
        self.publish_validation();
        step_errors
    }

    /// Full gate before submission; on failure every failing field is recorded.
    pub fn validate_for_submission(&mut self) -> Result<Booking, ValidationErrors> {
        let result = validation::validate_for_submission(&self.draft, &self.rule_context());
        if let Err(errors) = &result {
            self.errors = errors.clone();
            self.publish_validation();
        }
        result
    }

    pub fn mark_touched(&mut self, field: Field) {
        self.touched.insert(field);
    }

    /// Re-check every touched field. Returns `true` when all of them pass.
    pub fn validate_touched(&mut self) -> bool {
        let touched: Vec<Field> = self.touched.iter().copied().collect();
        let ctx = self.rule_context();
        let fresh = validation::validate_fields(&touched, &self.draft, &ctx);
        self.errors.merge_for(&touched, &fresh);
        self.publish_validation();
        fresh.is_empty()
    }

    /// Restore every initial value and forget errors, dirty and touched state.
    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
        self.errors.clear();
        self.dirty = false;
        self.touched.clear();
        self.events.publish(BookingEvent::DataChanged(Field::ALL.to_vec()));
    }

    /// Restore one field's initial value and clear its error and touched flag.
    pub fn reset_field(&mut self, field: Field) {
        self.draft.copy_field(field, &self.initial);
        self.touched.remove(&field);
        self.events.publish(BookingEvent::DataChanged(vec![field]));
        if self.errors.remove(field).is_some() {
            self.publish_validation();
        }
    }

    pub fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
        self.publish_validation();
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
        self.publish_validation();
    }

    fn publish_validation(&self) {
        self.events.publish(BookingEvent::ValidationChanged {
            valid: self.errors.is_empty(),
            errors: self.errors.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::validation::ErrorKey;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn form() -> BookingForm {
        BookingForm::new(Arc::new(FixedClock(today())), EmailPolicy::Strict, EventBus::new())
    }

    #[test]
    fn test_new_form_is_clean() {
        let form = form();
        assert!(!form.is_dirty());
        assert!(form.is_valid());
        assert_eq!(form.draft(), &BookingDraft::default());
    }

    #[test]
    fn test_update_field_marks_dirty_and_clears_error() {
        let mut form = form();
        assert!(!form.validate(Some(Field::Name)));
        assert_eq!(form.errors().get(Field::Name), Some(ErrorKey::NameRequired));

        // Still too short, but the error is cleared until the next validate.
        form.update_field(Field::Name, "J").unwrap();
        assert!(form.is_dirty());
        assert_eq!(form.errors().get(Field::Name), None);

        assert!(!form.validate(Some(Field::Name)));
        assert_eq!(form.errors().get(Field::Name), Some(ErrorKey::NameTooShort));
    }

    #[test]
    fn test_update_field_rejects_wrong_kind() {
        let mut form = form();
        let result = form.update_field(Field::Date, "tomorrow");
        assert_eq!(result, Err(BookingError::FieldType { field: Field::Date }));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_update_field_named() {
        let mut form = form();
        form.update_field_named("groupSize", "3").unwrap();
        assert_eq!(form.draft().group_size, "3");

        let result = form.update_field_named("horse", "Bravo");
        assert_eq!(result, Err(BookingError::UnknownField("horse".to_string())));
    }

    #[test]
    fn test_update_fields_keeps_errors() {
        let mut form = form();
        form.validate(Some(Field::Service));
        form.update_fields(DraftPatch {
            service: Some("academy".to_string()),
            ..Default::default()
        });
        assert!(form.is_dirty());
        assert_eq!(form.draft().service, "academy");
        assert_eq!(form.errors().get(Field::Service), Some(ErrorKey::ServiceRequired));

        assert!(form.validate(Some(Field::Service)));
        assert!(form.is_valid());
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut form = form();
        form.update_fields(DraftPatch::default());
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_validate_all_replaces_error_map() {
        let mut form = form();
        assert!(!form.validate(None));
        let fields: Vec<_> = form.errors().fields().collect();
        assert_eq!(fields, vec![Field::Service, Field::Name, Field::Email, Field::Phone]);

        form.update_fields(DraftPatch {
            service: Some("safari".to_string()),
            name: Some("Dilan".to_string()),
            email: Some("dilan@example.org".to_string()),
            phone: Some("07501234567".to_string()),
            ..Default::default()
        });
        assert!(form.validate_all());
        assert!(form.is_valid());
    }

    #[test]
    fn test_validate_single_field_success_clears_only_that_field() {
        let mut form = form();
        form.validate(None);
        form.update_fields(DraftPatch {
            phone: Some("07501234567".to_string()),
            ..Default::default()
        });
        assert!(form.validate(Some(Field::Phone)));
        assert!(!form.errors().contains(Field::Phone));
        assert!(form.errors().contains(Field::Name));
    }

    #[test]
    fn test_validate_step_keeps_other_entries() {
        let mut form = form();
        form.validate(Some(Field::Service));
        let step_errors = form.validate_step(Step::DateTime);
        assert_eq!(step_errors.len(), 2);
        assert!(form.errors().contains(Field::Service));
        assert!(form.errors().contains(Field::Date));
        assert!(form.errors().contains(Field::Time));
    }

    #[test]
    fn test_touched_fields_revalidate() {
        let mut form = form();
        form.update_field(Field::Email, "nope").unwrap();
        form.mark_touched(Field::Email);
        assert!(!form.validate_touched());
        assert_eq!(form.errors().get(Field::Email), Some(ErrorKey::EmailInvalid));
        assert!(!form.errors().contains(Field::Name));

        form.update_field(Field::Email, "nope@example.org").unwrap();
        assert!(form.validate_touched());
        assert!(form.is_valid());
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut form = form();
        form.update_field(Field::Name, "Rezan").unwrap();
        form.mark_touched(Field::Name);
        form.validate(None);

        form.reset();
        assert_eq!(form.draft(), &BookingDraft::default());
        assert!(form.is_valid());
        assert!(!form.is_dirty());
        assert!(form.touched().is_empty());
    }

    #[test]
    fn test_reset_field_restores_one_value() {
        let initial = BookingDraft {
            group_size: "2".to_string(),
            ..Default::default()
        };
        let mut form = form().with_initial(initial);
        form.update_field(Field::GroupSize, "abc").unwrap();
        form.update_field(Field::Name, "Kawa").unwrap();
        form.validate(Some(Field::GroupSize));
        assert!(form.errors().contains(Field::GroupSize));

        form.reset_field(Field::GroupSize);
        assert_eq!(form.draft().group_size, "2");
        assert_eq!(form.draft().name, "Kawa");
        assert!(!form.errors().contains(Field::GroupSize));
    }

    #[test]
    fn test_set_and_clear_errors() {
        let mut form = form();
        let errors: ValidationErrors = std::iter::once((Field::Time, ErrorKey::TimeInvalid)).collect();
        form.set_errors(errors);
        assert!(!form.is_valid());
        form.clear_errors();
        assert!(form.is_valid());
    }

    #[test]
    fn test_events_published() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let mut form = BookingForm::new(Arc::new(FixedClock(today())), EmailPolicy::Strict, bus);

        form.update_field(Field::Name, "Nazanin").unwrap();
        assert_eq!(rx.try_recv().unwrap(), BookingEvent::DataChanged(vec![Field::Name]));

        form.validate(Some(Field::Name));
        assert_eq!(
            rx.try_recv().unwrap(),
            BookingEvent::ValidationChanged {
                valid: true,
                errors: ValidationErrors::new()
            }
        );
    }

    #[test]
    fn test_past_date_rejected_by_validation() {
        let mut form = form();
        form.update_field(Field::Date, today().pred_opt().unwrap()).unwrap();
        assert!(!form.validate(Some(Field::Date)));
        assert_eq!(form.errors().get(Field::Date), Some(ErrorKey::DatePast));
    }
}
