use crate::draft::Field;
use crate::validation::ValidationErrors;
use crate::wizard::Step;
use thiserror::Error;

/// Failure of a remote booking submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("booking submission timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("booking endpoint rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("booking transport error: {0}")]
    Transport(String),

    #[error("booking submission was cancelled")]
    Cancelled,
}

impl SubmissionError {
    /// Whether another attempt may succeed (timeouts, transport and 5xx).
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmissionError::Timeout(_) | SubmissionError::Transport(_) => true,
            SubmissionError::Rejected { status, .. } => *status >= 500 || *status == 429,
            SubmissionError::Cancelled => false,
        }
    }

    /// Catalog key of the user-visible message.
    pub fn message_key(&self) -> &'static str {
        match self {
            SubmissionError::Cancelled => "booking.submission.cancelled",
            _ => "booking.submission.failed",
        }
    }
}

/// Errors surfaced by the booking form, wizard and session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Advancing or submitting with invalid fields; carries the step's errors.
    #[error("step {step} has invalid fields: {errors}")]
    StepBlocked { step: Step, errors: ValidationErrors },

    #[error("cannot {action} from step {step}")]
    InvalidTransition { step: Step, action: &'static str },

    #[error("the booking form is locked while a submission is {0}")]
    Locked(&'static str),

    #[error("field '{field}' does not accept this kind of value")]
    FieldType { field: Field },

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("the booking session has stopped")]
    SessionClosed,
}

impl BookingError {
    /// Field errors carried by a blocked step, if any.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            BookingError::StepBlocked { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
