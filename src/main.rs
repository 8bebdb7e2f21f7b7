//! Drive one booking through all three steps from a JSON draft.
//!
//! Usage:
//!   mam-center-booking <draft.json> [language]
//!
//! The draft uses the form's field names (`service`, `name`, `email`, `phone`,
//! `experienceLevel`, `groupSize`, `specialRequests`, `date`, `time`). The
//! optional language (`en`, `ar`, `ku`) is saved as the new preference.

use anyhow::{bail, Context, Result};
use mam_center_booking::calendar::{format_date, SystemClock};
use mam_center_booking::config::Config;
use mam_center_booking::draft::DraftPatch;
use mam_center_booking::error::BookingError;
use mam_center_booking::i18n::{CatalogValidator, Language, Translate, Translator};
use mam_center_booking::preferences::{AppContext, FilePreferenceStore};
use mam_center_booking::session::{BookingSession, SessionHandle};
use mam_center_booking::submission::{HttpSubmitter, SimulatedSubmitter, Submitter};
use mam_center_booking::wizard::BookingWizard;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mam_center_booking=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let catalogs = CatalogValidator::validate_enabled();
    for problem in catalogs.errors.iter().chain(&catalogs.warnings) {
        warn!("Catalog check: {}", problem);
    }

    let mut args = std::env::args().skip(1);
    let draft_path = args
        .next()
        .context("Usage: mam-center-booking <draft.json> [language]")?;

    let context = AppContext::load(
        Arc::new(FilePreferenceStore::new(&config.storage_path)),
        config.default_preferences(),
    );
    if let Some(code) = args.next() {
        let language = Language::from_code(&code)?;
        if let Err(e) = context.set_language(language) {
            warn!("Could not save language preference: {}", e);
        }
    }
    let translator = context.translator();
    info!(
        "Using language {} ({})",
        translator.language(),
        translator.direction().as_str()
    );

    let text = std::fs::read_to_string(&draft_path)
        .with_context(|| format!("Failed to read draft file {}", draft_path))?;
    let patch: DraftPatch =
        serde_json::from_str(&text).with_context(|| format!("Invalid draft JSON in {}", draft_path))?;

    let submitter: Arc<dyn Submitter> = match &config.booking_endpoint {
        Some(endpoint) => {
            info!("Submitting bookings to {}", endpoint);
            Arc::new(HttpSubmitter::new(reqwest::Client::new(), endpoint.clone()))
        }
        None => Arc::new(SimulatedSubmitter::new(config.submit_delay)),
    };

    let wizard = BookingWizard::new(Arc::new(SystemClock), config.wizard_options());
    let session = BookingSession::spawn(wizard, submitter, config.submission_policy());

    match run_booking(&session, patch, &translator).await {
        Ok(()) => Ok(()),
        Err(error) => {
            print_error(&error, &translator);
            bail!("Booking was not completed: {}", error)
        }
    }
}

async fn run_booking(session: &SessionHandle, mut patch: DraftPatch, translator: &Translator) -> Result<(), BookingError> {
    let date = patch.date.take();
    let time = patch.time.take();

    session.open().await?;
    session.update_fields(patch).await?;
    session.next().await?;
    session.next().await?;

    if let Some(date) = date {
        if !session.select_date(date).await? {
            warn!("{} is in the past and was not selected", date);
        }
    }
    if let Some(time) = time {
        if !session.select_time(&time).await? {
            warn!("Time slot {} is not available", time);
        }
    }

    if let Some(date) = session.snapshot().await?.draft.date {
        info!("Booking for {}", format_date(date, translator));
    }

    let confirmation = session.submit().await?;
    println!("{}", confirmation.title(translator));
    println!("{}", confirmation.message(translator));
    if let Some(reference) = &confirmation.reference {
        println!("#{}", reference);
    }
    Ok(())
}

fn print_error(error: &BookingError, translator: &Translator) {
    match error {
        BookingError::StepBlocked { step, errors } => {
            eprintln!("{}", translator.translate(step.label_key(), &[]));
            for (field, key) in errors.iter() {
                eprintln!("  {}: {}", field, translator.translate(key.as_str(), &[]));
            }
        }
        BookingError::Submission(failure) => {
            eprintln!("{}", translator.translate(failure.message_key(), &[]));
        }
        other => eprintln!("{}", other),
    }
}
