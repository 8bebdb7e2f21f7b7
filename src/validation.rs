//! Declarative per-field booking rules.
//!
//! Every rule is a pure function over the raw draft. A failing rule yields an
//! [`ErrorKey`], the catalog key of a localized message; the first failing rule
//! of a field wins.

use crate::draft::{Booking, BookingDraft, ExperienceLevel, Field, Service};
use crate::wizard::Step;
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const PHONE_MIN_CHARS: usize = 10;
pub const PHONE_MAX_CHARS: usize = 20;
pub const GROUP_SIZE_MIN: u32 = 1;
pub const GROUP_SIZE_MAX: u32 = 50;
pub const SPECIAL_REQUESTS_MAX_CHARS: usize = 500;

/// Providers accepted by the short-domain heuristic regardless of length.
pub const COMMON_EMAIL_DOMAINS: [&str; 4] = ["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];

/// Domains at most this long are rejected by [`EmailPolicy::Strict`].
///
/// Four, one above the three-character cutoff the rule started from, so that
/// `b.co` fails. Four-character domains such as `x.io` fail as well; use
/// [`EmailPolicy::SyntaxOnly`] to accept them.
const SHORT_DOMAIN_MAX_CHARS: usize = 4;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();
static TIME_REGEX: OnceLock<Regex> = OnceLock::new();

/// Localized message keys produced by failing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    ServiceRequired,
    ServiceInvalid,
    NameRequired,
    NameTooShort,
    NameTooLong,
    EmailRequired,
    EmailInvalid,
    PhoneRequired,
    PhoneTooShort,
    PhoneTooLong,
    PhoneInvalid,
    ExperienceLevelRequired,
    ExperienceLevelInvalid,
    GroupSizeRequired,
    GroupSizeInvalid,
    GroupSizeRange,
    SpecialRequestsTooLong,
    DateRequired,
    DatePast,
    TimeRequired,
    TimeInvalid,
}

impl ErrorKey {
    pub const ALL: [ErrorKey; 21] = [
        ErrorKey::ServiceRequired,
        ErrorKey::ServiceInvalid,
        ErrorKey::NameRequired,
        ErrorKey::NameTooShort,
        ErrorKey::NameTooLong,
        ErrorKey::EmailRequired,
        ErrorKey::EmailInvalid,
        ErrorKey::PhoneRequired,
        ErrorKey::PhoneTooShort,
        ErrorKey::PhoneTooLong,
        ErrorKey::PhoneInvalid,
        ErrorKey::ExperienceLevelRequired,
        ErrorKey::ExperienceLevelInvalid,
        ErrorKey::GroupSizeRequired,
        ErrorKey::GroupSizeInvalid,
        ErrorKey::GroupSizeRange,
        ErrorKey::SpecialRequestsTooLong,
        ErrorKey::DateRequired,
        ErrorKey::DatePast,
        ErrorKey::TimeRequired,
        ErrorKey::TimeInvalid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKey::ServiceRequired => "validation.service.required",
            ErrorKey::ServiceInvalid => "validation.service.invalid",
            ErrorKey::NameRequired => "validation.name.required",
            ErrorKey::NameTooShort => "validation.name.tooShort",
            ErrorKey::NameTooLong => "validation.name.tooLong",
            ErrorKey::EmailRequired => "validation.email.required",
            ErrorKey::EmailInvalid => "validation.email.invalid",
            ErrorKey::PhoneRequired => "validation.phone.required",
            ErrorKey::PhoneTooShort => "validation.phone.tooShort",
            ErrorKey::PhoneTooLong => "validation.phone.tooLong",
            ErrorKey::PhoneInvalid => "validation.phone.invalid",
            ErrorKey::ExperienceLevelRequired => "validation.experienceLevel.required",
            ErrorKey::ExperienceLevelInvalid => "validation.experienceLevel.invalid",
            ErrorKey::GroupSizeRequired => "validation.groupSize.required",
            ErrorKey::GroupSizeInvalid => "validation.groupSize.invalid",
            ErrorKey::GroupSizeRange => "validation.groupSize.range",
            ErrorKey::SpecialRequestsTooLong => "validation.specialRequests.tooLong",
            ErrorKey::DateRequired => "validation.date.required",
            ErrorKey::DatePast => "validation.date.past",
            ErrorKey::TimeRequired => "validation.time.required",
            ErrorKey::TimeInvalid => "validation.time.invalid",
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Field → error key map. A missing entry means valid or not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<Field, ErrorKey>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<ErrorKey> {
        self.0.get(&field).copied()
    }

    pub fn insert(&mut self, field: Field, key: ErrorKey) {
        self.0.insert(field, key);
    }

    pub fn remove(&mut self, field: Field) -> Option<ErrorKey> {
        self.0.remove(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, ErrorKey)> + '_ {
        self.0.iter().map(|(field, key)| (*field, *key))
    }

    /// Overwrite the entries of `fields` with the outcome in `other`:
    /// fields failing in `other` get its key, the rest are cleared.
    pub fn merge_for(&mut self, fields: &[Field], other: &ValidationErrors) {
        for field in fields {
            match other.get(*field) {
                Some(key) => self.insert(*field, key),
                None => {
                    self.remove(*field);
                }
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, key)| format!("{}: {}", field, key))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

impl FromIterator<(Field, ErrorKey)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (Field, ErrorKey)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How strictly email domains are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailPolicy {
    /// Address syntax plus the short-domain heuristic: domains of four
    /// characters or fewer are rejected unless they are a common provider.
    #[default]
    Strict,
    /// Address syntax only.
    SyntaxOnly,
}

impl std::str::FromStr for EmailPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(EmailPolicy::Strict),
            "syntax" | "syntax-only" | "syntax_only" => Ok(EmailPolicy::SyntaxOnly),
            other => Err(format!("unknown email policy '{}'", other)),
        }
    }
}

/// Inputs a rule may depend on besides the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    /// Dates strictly before this day are rejected.
    pub today: NaiveDate,
    pub email_policy: EmailPolicy,
}

impl RuleContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            email_policy: EmailPolicy::default(),
        }
    }

    pub fn with_email_policy(mut self, email_policy: EmailPolicy) -> Self {
        self.email_policy = email_policy;
        self
    }
}

/// Run the rules of one field against the draft.
///
/// `date` and `time` are optional here; the date/time step requires them
/// through [`validate_step`].
pub fn validate_field(field: Field, draft: &BookingDraft, ctx: &RuleContext) -> Result<(), ErrorKey> {
    match field {
        Field::Service => check_service(&draft.service),
        Field::Name => check_name(&draft.name),
        Field::Email => check_email(&draft.email, ctx.email_policy),
        Field::Phone => check_phone(&draft.phone),
        Field::ExperienceLevel => check_experience_level(&draft.experience_level),
        Field::GroupSize => check_group_size(&draft.group_size).map(|_| ()),
        Field::SpecialRequests => check_special_requests(&draft.special_requests),
        Field::Date => match draft.date {
            Some(date) if date < ctx.today => Err(ErrorKey::DatePast),
            _ => Ok(()),
        },
        Field::Time => match draft.time.as_deref() {
            Some(time) => parse_time(time).map(|_| ()),
            None => Ok(()),
        },
    }
}

/// Validate a set of fields and collect the failures.
pub fn validate_fields(fields: &[Field], draft: &BookingDraft, ctx: &RuleContext) -> ValidationErrors {
    fields
        .iter()
        .filter_map(|field| {
            validate_field(*field, draft, ctx)
                .err()
                .map(|key| (*field, key))
        })
        .collect()
}

/// Validate every field (date and time remain optional).
pub fn validate_all(draft: &BookingDraft, ctx: &RuleContext) -> ValidationErrors {
    validate_fields(&Field::ALL, draft, ctx)
}

/// Validate the fields owned by a wizard step.
pub fn validate_step(step: Step, draft: &BookingDraft, ctx: &RuleContext) -> ValidationErrors {
    let mut errors = validate_fields(step.fields(), draft, ctx);

    if step == Step::DateTime {
        if draft.date.is_none() {
            errors.insert(Field::Date, ErrorKey::DateRequired);
        }
        if draft.time.is_none() {
            errors.insert(Field::Time, ErrorKey::TimeRequired);
        }
    }

    errors
}

/// Final gate before submission: every field, with date and time required.
pub fn validate_for_submission(draft: &BookingDraft, ctx: &RuleContext) -> Result<Booking, ValidationErrors> {
    let mut errors = validate_all(draft, ctx);
    for (field, key) in validate_step(Step::DateTime, draft, ctx).iter() {
        errors.insert(field, key);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every rule passed, so the conversions below cannot fail; they still
    // report through `errors` rather than panicking.
    let service = draft.service.parse::<Service>().map_err(|_| single(Field::Service, ErrorKey::ServiceInvalid))?;
    let experience_level = draft
        .experience_level
        .parse::<ExperienceLevel>()
        .map_err(|_| single(Field::ExperienceLevel, ErrorKey::ExperienceLevelInvalid))?;
    let group_size = check_group_size(&draft.group_size).map_err(|key| single(Field::GroupSize, key))?;
    let date = draft.date.ok_or_else(|| single(Field::Date, ErrorKey::DateRequired))?;
    let time = draft
        .time
        .as_deref()
        .ok_or(ErrorKey::TimeRequired)
        .and_then(parse_time)
        .map_err(|key| single(Field::Time, key))?;

    let special_requests = draft.special_requests.trim();

    Ok(Booking {
        service,
        name: draft.name.trim().to_string(),
        email: draft.email.trim().to_lowercase(),
        phone: draft.phone.trim().to_string(),
        experience_level,
        group_size: group_size as u8,
        special_requests: (!special_requests.is_empty()).then(|| special_requests.to_string()),
        date,
        time,
    })
}

fn single(field: Field, key: ErrorKey) -> ValidationErrors {
    std::iter::once((field, key)).collect()
}

fn check_service(value: &str) -> Result<(), ErrorKey> {
    if value.trim().is_empty() {
        return Err(ErrorKey::ServiceRequired);
    }
    value
        .parse::<Service>()
        .map(|_| ())
        .map_err(|_| ErrorKey::ServiceInvalid)
}

fn check_name(value: &str) -> Result<(), ErrorKey> {
    let length = value.trim().chars().count();
    if length == 0 {
        Err(ErrorKey::NameRequired)
    } else if length < NAME_MIN_CHARS {
        Err(ErrorKey::NameTooShort)
    } else if length > NAME_MAX_CHARS {
        Err(ErrorKey::NameTooLong)
    } else {
        Ok(())
    }
}

fn check_email(value: &str, policy: EmailPolicy) -> Result<(), ErrorKey> {
    let email = value.trim().to_lowercase();
    if email.is_empty() {
        return Err(ErrorKey::EmailRequired);
    }

    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,}$").unwrap()
    });
    if !regex.is_match(&email) {
        return Err(ErrorKey::EmailInvalid);
    }

    if policy == EmailPolicy::Strict {
        let domain = email.rsplit('@').next().unwrap_or_default();
        let is_common = COMMON_EMAIL_DOMAINS.contains(&domain);
        if !is_common && domain.chars().count() <= SHORT_DOMAIN_MAX_CHARS {
            return Err(ErrorKey::EmailInvalid);
        }
    }

    Ok(())
}

fn check_phone(value: &str) -> Result<(), ErrorKey> {
    let phone = value.trim();
    let length = phone.chars().count();
    if length == 0 {
        return Err(ErrorKey::PhoneRequired);
    }
    if length < PHONE_MIN_CHARS {
        return Err(ErrorKey::PhoneTooShort);
    }
    if length > PHONE_MAX_CHARS {
        return Err(ErrorKey::PhoneTooLong);
    }

    let regex = PHONE_REGEX.get_or_init(|| Regex::new(r"^\+?[\d\s\-()]+$").unwrap());
    if regex.is_match(phone) {
        Ok(())
    } else {
        Err(ErrorKey::PhoneInvalid)
    }
}

fn check_experience_level(value: &str) -> Result<(), ErrorKey> {
    if value.trim().is_empty() {
        return Err(ErrorKey::ExperienceLevelRequired);
    }
    value
        .parse::<ExperienceLevel>()
        .map(|_| ())
        .map_err(|_| ErrorKey::ExperienceLevelInvalid)
}

fn check_group_size(value: &str) -> Result<u32, ErrorKey> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ErrorKey::GroupSizeRequired);
    }

    let regex = DIGITS_REGEX.get_or_init(|| Regex::new(r"^\d+$").unwrap());
    if !regex.is_match(value) {
        return Err(ErrorKey::GroupSizeInvalid);
    }

    // Digit strings too large for u32 are simply out of range.
    match value.parse::<u32>() {
        Ok(size) if (GROUP_SIZE_MIN..=GROUP_SIZE_MAX).contains(&size) => Ok(size),
        _ => Err(ErrorKey::GroupSizeRange),
    }
}

fn check_special_requests(value: &str) -> Result<(), ErrorKey> {
    if value.chars().count() > SPECIAL_REQUESTS_MAX_CHARS {
        Err(ErrorKey::SpecialRequestsTooLong)
    } else {
        Ok(())
    }
}

/// Parse a 24-hour `H:MM` / `HH:MM` time.
pub fn parse_time(value: &str) -> Result<NaiveTime, ErrorKey> {
    let regex = TIME_REGEX.get_or_init(|| Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").unwrap());
    let captures = regex.captures(value).ok_or(ErrorKey::TimeInvalid)?;

    let hour: u32 = captures[1].parse().map_err(|_| ErrorKey::TimeInvalid)?;
    let minute: u32 = captures[2].parse().map_err(|_| ErrorKey::TimeInvalid)?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(ErrorKey::TimeInvalid)
}

// ==================== Sanitizers ====================

/// Escape HTML-significant characters in free text.
pub fn sanitize_text(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Keep only characters that can appear in an email address.
pub fn sanitize_email(input: &str) -> String {
    input
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '@' | '.' | '-' | '+'))
        .collect()
}

/// Keep only digits, `+`, spaces, dots, dashes and parentheses.
pub fn sanitize_phone(input: &str) -> String {
    input
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, ' ' | '(' | ')' | '+' | '.' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{CatalogValidator, LanguageStrings, Language};

    fn ctx() -> RuleContext {
        RuleContext::new(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    fn draft_with(field: Field, value: &str) -> BookingDraft {
        let mut draft = BookingDraft::default();
        draft.set(field, value.into());
        draft
    }

    fn check(field: Field, value: &str) -> Result<(), ErrorKey> {
        validate_field(field, &draft_with(field, value), &ctx())
    }

    fn valid_draft() -> BookingDraft {
        BookingDraft {
            service: "safari".to_string(),
            name: "Hana Aziz".to_string(),
            email: "Hana@Example.org ".to_string(),
            phone: "+964 750 123 4567".to_string(),
            experience_level: "novice".to_string(),
            group_size: "4".to_string(),
            special_requests: "".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 25),
            time: Some("10:00".to_string()),
        }
    }

    // ==================== Service ====================

    #[test]
    fn test_service_values() {
        for service in Service::ALL {
            assert_eq!(check(Field::Service, service.as_str()), Ok(()));
        }
        assert_eq!(check(Field::Service, ""), Err(ErrorKey::ServiceRequired));
        assert_eq!(check(Field::Service, "spa"), Err(ErrorKey::ServiceInvalid));
    }

    // ==================== Name ====================

    #[test]
    fn test_name_bounds() {
        assert_eq!(check(Field::Name, "   "), Err(ErrorKey::NameRequired));
        assert_eq!(check(Field::Name, "J"), Err(ErrorKey::NameTooShort));
        assert_eq!(check(Field::Name, " J "), Err(ErrorKey::NameTooShort));
        assert_eq!(check(Field::Name, "Jo"), Ok(()));
        assert_eq!(check(Field::Name, &"a".repeat(50)), Ok(()));
        assert_eq!(check(Field::Name, &"a".repeat(51)), Err(ErrorKey::NameTooLong));
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        // Two Kurdish letters are four bytes in UTF-8.
        assert_eq!(check(Field::Name, "ئا"), Ok(()));
        assert_eq!(check(Field::Name, &"ژ".repeat(50)), Ok(()));
    }

    // ==================== Email ====================

    #[test]
    fn test_email_short_domain_heuristic() {
        assert_eq!(check(Field::Email, "a@b.co"), Err(ErrorKey::EmailInvalid));
        assert_eq!(check(Field::Email, "a@gmail.com"), Ok(()));
        assert_eq!(check(Field::Email, "test@example.org"), Ok(()));
        assert_eq!(check(Field::Email, "jo@x.com"), Ok(()));
        // Four characters is still short.
        assert_eq!(check(Field::Email, "a@x.io"), Err(ErrorKey::EmailInvalid));
        assert_eq!(check(Field::Email, "a@ab.io"), Ok(()));
    }

    #[test]
    fn test_email_syntax_only_policy_accepts_short_domain() {
        let ctx = ctx().with_email_policy(EmailPolicy::SyntaxOnly);
        let draft = draft_with(Field::Email, "a@b.co");
        assert_eq!(validate_field(Field::Email, &draft, &ctx), Ok(()));
    }

    #[test]
    fn test_email_syntax() {
        assert_eq!(check(Field::Email, ""), Err(ErrorKey::EmailRequired));
        assert_eq!(check(Field::Email, "  "), Err(ErrorKey::EmailRequired));
        assert_eq!(check(Field::Email, "not-an-email"), Err(ErrorKey::EmailInvalid));
        assert_eq!(check(Field::Email, "a@@example.org"), Err(ErrorKey::EmailInvalid));
        assert_eq!(check(Field::Email, "a b@example.org"), Err(ErrorKey::EmailInvalid));
        assert_eq!(check(Field::Email, "a@example"), Err(ErrorKey::EmailInvalid));
        assert_eq!(check(Field::Email, " Rebin@Example.ORG "), Ok(()));
    }

    // ==================== Phone ====================

    #[test]
    fn test_phone_rules() {
        assert_eq!(check(Field::Phone, ""), Err(ErrorKey::PhoneRequired));
        assert_eq!(check(Field::Phone, "12345"), Err(ErrorKey::PhoneTooShort));
        assert_eq!(check(Field::Phone, "0750123456"), Ok(()));
        assert_eq!(check(Field::Phone, "+964 (750) 123-4567"), Ok(()));
        assert_eq!(check(Field::Phone, &"1".repeat(21)), Err(ErrorKey::PhoneTooLong));
        assert_eq!(check(Field::Phone, "0750-CALL-ME"), Err(ErrorKey::PhoneInvalid));
        assert_eq!(check(Field::Phone, "0750+1234567"), Err(ErrorKey::PhoneInvalid));
    }

    // ==================== Group size ====================

    #[test]
    fn test_group_size_bounds() {
        assert_eq!(check(Field::GroupSize, "0"), Err(ErrorKey::GroupSizeRange));
        assert_eq!(check(Field::GroupSize, "51"), Err(ErrorKey::GroupSizeRange));
        assert_eq!(check(Field::GroupSize, "1"), Ok(()));
        assert_eq!(check(Field::GroupSize, "50"), Ok(()));
        assert_eq!(check(Field::GroupSize, "abc"), Err(ErrorKey::GroupSizeInvalid));
        assert_eq!(check(Field::GroupSize, "-3"), Err(ErrorKey::GroupSizeInvalid));
        assert_eq!(check(Field::GroupSize, ""), Err(ErrorKey::GroupSizeRequired));
        assert_eq!(check(Field::GroupSize, "99999999999999999999"), Err(ErrorKey::GroupSizeRange));
    }

    // ==================== Other fields ====================

    #[test]
    fn test_experience_level() {
        assert_eq!(check(Field::ExperienceLevel, "advanced"), Ok(()));
        assert_eq!(check(Field::ExperienceLevel, ""), Err(ErrorKey::ExperienceLevelRequired));
        assert_eq!(check(Field::ExperienceLevel, "pro"), Err(ErrorKey::ExperienceLevelInvalid));
    }

    #[test]
    fn test_special_requests_length() {
        assert_eq!(check(Field::SpecialRequests, ""), Ok(()));
        assert_eq!(check(Field::SpecialRequests, &"x".repeat(500)), Ok(()));
        assert_eq!(
            check(Field::SpecialRequests, &"x".repeat(501)),
            Err(ErrorKey::SpecialRequestsTooLong)
        );
    }

    #[test]
    fn test_time_format() {
        assert_eq!(check(Field::Time, "08:00"), Ok(()));
        assert_eq!(check(Field::Time, "8:00"), Ok(()));
        assert_eq!(check(Field::Time, "23:59"), Ok(()));
        assert_eq!(check(Field::Time, "24:00"), Err(ErrorKey::TimeInvalid));
        assert_eq!(check(Field::Time, "12:60"), Err(ErrorKey::TimeInvalid));
        assert_eq!(check(Field::Time, "noon"), Err(ErrorKey::TimeInvalid));
    }

    #[test]
    fn test_date_optional_but_not_past() {
        let mut draft = BookingDraft::default();
        assert_eq!(validate_field(Field::Date, &draft, &ctx()), Ok(()));

        draft.date = NaiveDate::from_ymd_opt(2026, 10, 18);
        assert_eq!(validate_field(Field::Date, &draft, &ctx()), Err(ErrorKey::DatePast));

        draft.date = NaiveDate::from_ymd_opt(2026, 10, 19);
        assert_eq!(validate_field(Field::Date, &draft, &ctx()), Ok(()));
    }

    // ==================== Step / submission ====================

    #[test]
    fn test_validate_step_details_scenario() {
        let draft = BookingDraft {
            service: "safari".to_string(),
            name: "J".to_string(),
            email: "jo@x.com".to_string(),
            phone: "12345".to_string(),
            ..Default::default()
        };
        let errors = validate_step(Step::Details, &draft, &ctx());
        assert_eq!(errors.get(Field::Name), Some(ErrorKey::NameTooShort));
        assert_eq!(errors.get(Field::Phone), Some(ErrorKey::PhoneTooShort));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validate_step_date_time_requires_both() {
        let errors = validate_step(Step::DateTime, &BookingDraft::default(), &ctx());
        assert_eq!(errors.get(Field::Date), Some(ErrorKey::DateRequired));
        assert_eq!(errors.get(Field::Time), Some(ErrorKey::TimeRequired));
    }

    #[test]
    fn test_validate_step_service_only_touches_service() {
        let errors = validate_step(Step::Service, &BookingDraft::default(), &ctx());
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Service]);
    }

    #[test]
    fn test_validate_for_submission_builds_booking() {
        let booking = validate_for_submission(&valid_draft(), &ctx()).expect("valid draft");
        assert_eq!(booking.service, Service::Safari);
        assert_eq!(booking.email, "hana@example.org");
        assert_eq!(booking.group_size, 4);
        assert_eq!(booking.special_requests, None);
        assert_eq!(booking.time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_validate_for_submission_requires_time() {
        let mut draft = valid_draft();
        draft.time = None;
        let errors = validate_for_submission(&draft, &ctx()).unwrap_err();
        assert_eq!(errors.get(Field::Time), Some(ErrorKey::TimeRequired));
        assert_eq!(errors.len(), 1);
    }

    // ==================== ValidationErrors ====================

    #[test]
    fn test_merge_for_overwrites_only_listed_fields() {
        let mut errors: ValidationErrors = [
            (Field::Name, ErrorKey::NameTooShort),
            (Field::Date, ErrorKey::DateRequired),
        ]
        .into_iter()
        .collect();
        let fresh: ValidationErrors = std::iter::once((Field::Phone, ErrorKey::PhoneTooShort)).collect();

        errors.merge_for(&[Field::Name, Field::Phone], &fresh);
        assert_eq!(errors.get(Field::Name), None);
        assert_eq!(errors.get(Field::Phone), Some(ErrorKey::PhoneTooShort));
        assert_eq!(errors.get(Field::Date), Some(ErrorKey::DateRequired));
    }

    #[test]
    fn test_errors_serialize_as_key_map() {
        let errors: ValidationErrors = std::iter::once((Field::GroupSize, ErrorKey::GroupSizeRange)).collect();
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"groupSize":"validation.groupSize.range"}"#);
        assert_eq!(errors.to_string(), "groupSize: validation.groupSize.range");
    }

    #[test]
    fn test_every_error_key_is_translated() {
        for language in [Language::ENGLISH, Language::ARABIC, Language::KURDISH] {
            let missing = CatalogValidator::missing_keys(
                LanguageStrings::for_language(language),
                ErrorKey::ALL.iter().map(|key| key.as_str()),
            );
            assert!(missing.is_empty(), "{}: {:?}", language, missing);
        }
    }

    #[test]
    fn test_email_policy_from_str() {
        assert_eq!("strict".parse::<EmailPolicy>(), Ok(EmailPolicy::Strict));
        assert_eq!("Syntax".parse::<EmailPolicy>(), Ok(EmailPolicy::SyntaxOnly));
        assert!("loose".parse::<EmailPolicy>().is_err());
    }

    // ==================== Sanitizers ====================

    #[test]
    fn test_sanitize_text() {
        assert_eq!(
            sanitize_text("<b>\"Hi\"</b> it's"),
            "&lt;b&gt;&quot;Hi&quot;&lt;&#x2F;b&gt; it&#x27;s"
        );
        assert_eq!(sanitize_text("سڵاو"), "سڵاو");
    }

    #[test]
    fn test_sanitize_email_and_phone() {
        assert_eq!(sanitize_email("jo <jo@x.com>"), "jojo@x.com");
        assert_eq!(sanitize_phone("+964 (750) 123-4567 ext"), "+964 (750) 123-4567 ");
    }
}
