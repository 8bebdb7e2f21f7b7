//! Booking core for the Mam Center riding academy: a three-step booking
//! form with per-field validation, a date/time picker, submission with retry,
//! persisted preferences and English/Arabic/Kurdish messages.

pub mod calendar;
pub mod config;
pub mod draft;
pub mod error;
pub mod events;
pub mod form;
pub mod i18n;
pub mod preferences;
pub mod retry;
pub mod session;
pub mod submission;
pub mod validation;
pub mod wizard;
