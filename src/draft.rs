//! Booking data model: raw draft input and the validated booking.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bookable experiences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Safari,
    Academy,
    Private,
    Event,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::Safari,
        Service::Academy,
        Service::Private,
        Service::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Safari => "safari",
            Service::Academy => "academy",
            Service::Private => "private",
            Service::Event => "event",
        }
    }

    /// Catalog key of the display name.
    pub fn label_key(&self) -> &'static str {
        match self {
            Service::Safari => "booking.services.safari",
            Service::Academy => "booking.services.academy",
            Service::Private => "booking.services.private",
            Service::Event => "booking.services.event",
        }
    }
}

impl FromStr for Service {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.as_str() == value)
            .ok_or(())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported riding experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Novice,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Novice,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Novice => "novice",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "booking.experience.beginner",
            ExperienceLevel::Novice => "booking.experience.novice",
            ExperienceLevel::Intermediate => "booking.experience.intermediate",
            ExperienceLevel::Advanced => "booking.experience.advanced",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ExperienceLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == value)
            .ok_or(())
    }
}

/// Names of the booking form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Service,
    Name,
    Email,
    Phone,
    ExperienceLevel,
    GroupSize,
    SpecialRequests,
    Date,
    Time,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Service,
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::ExperienceLevel,
        Field::GroupSize,
        Field::SpecialRequests,
        Field::Date,
        Field::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Service => "service",
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::ExperienceLevel => "experienceLevel",
            Field::GroupSize => "groupSize",
            Field::SpecialRequests => "specialRequests",
            Field::Date => "date",
            Field::Time => "time",
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| value.to_string())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value written into a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    /// Unset an optional field (`date`, `time`) or empty a text field.
    Clear,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// In-progress, unsubmitted booking input exactly as the user entered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub service: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub experience_level: String,
    pub group_size: String,
    pub special_requests: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            service: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            experience_level: ExperienceLevel::default().as_str().to_string(),
            group_size: "1".to_string(),
            special_requests: String::new(),
            date: None,
            time: None,
        }
    }
}

impl BookingDraft {
    /// Text content of a field; `None` for an unset date or time.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Service => Some(&self.service),
            Field::Name => Some(&self.name),
            Field::Email => Some(&self.email),
            Field::Phone => Some(&self.phone),
            Field::ExperienceLevel => Some(&self.experience_level),
            Field::GroupSize => Some(&self.group_size),
            Field::SpecialRequests => Some(&self.special_requests),
            Field::Date => None,
            Field::Time => self.time.as_deref(),
        }
    }

    /// Write one field. Returns `false` when the value kind does not fit the
    /// field (text into `date`, a date into a text field).
    pub fn set(&mut self, field: Field, value: FieldValue) -> bool {
        match (field, value) {
            (Field::Date, FieldValue::Date(date)) => self.date = Some(date),
            (Field::Date, FieldValue::Clear) => self.date = None,
            (Field::Date, FieldValue::Text(_)) => return false,
            (_, FieldValue::Date(_)) => return false,
            (Field::Time, FieldValue::Text(text)) => self.time = Some(text),
            (Field::Time, FieldValue::Clear) => self.time = None,
            (field, value) => match (self.text_slot(field), value) {
                (Some(slot), FieldValue::Text(text)) => *slot = text,
                (Some(slot), _) => slot.clear(),
                (None, _) => return false,
            },
        }
        true
    }

    /// Copy one field's value from `other`.
    pub fn copy_field(&mut self, field: Field, other: &BookingDraft) {
        match field {
            Field::Date => self.date = other.date,
            Field::Time => self.time = other.time.clone(),
            field => {
                let value = other.text(field).unwrap_or_default().to_string();
                if let Some(slot) = self.text_slot(field) {
                    *slot = value;
                }
            }
        }
    }

    fn text_slot(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Service => Some(&mut self.service),
            Field::Name => Some(&mut self.name),
            Field::Email => Some(&mut self.email),
            Field::Phone => Some(&mut self.phone),
            Field::ExperienceLevel => Some(&mut self.experience_level),
            Field::GroupSize => Some(&mut self.group_size),
            Field::SpecialRequests => Some(&mut self.special_requests),
            Field::Date | Field::Time => None,
        }
    }
}

/// Partial update merged by `BookingForm::update_fields`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftPatch {
    pub service: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_level: Option<String>,
    pub group_size: Option<String>,
    pub special_requests: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

impl DraftPatch {
    /// Fields carried by this patch.
    pub fn fields(&self) -> Vec<Field> {
        let present = [
            (Field::Service, self.service.is_some()),
            (Field::Name, self.name.is_some()),
            (Field::Email, self.email.is_some()),
            (Field::Phone, self.phone.is_some()),
            (Field::ExperienceLevel, self.experience_level.is_some()),
            (Field::GroupSize, self.group_size.is_some()),
            (Field::SpecialRequests, self.special_requests.is_some()),
            (Field::Date, self.date.is_some()),
            (Field::Time, self.time.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(field, is_set)| is_set.then_some(field))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn apply_to(self, draft: &mut BookingDraft) {
        let DraftPatch {
            service,
            name,
            email,
            phone,
            experience_level,
            group_size,
            special_requests,
            date,
            time,
        } = self;

        if let Some(value) = service {
            draft.service = value;
        }
        if let Some(value) = name {
            draft.name = value;
        }
        if let Some(value) = email {
            draft.email = value;
        }
        if let Some(value) = phone {
            draft.phone = value;
        }
        if let Some(value) = experience_level {
            draft.experience_level = value;
        }
        if let Some(value) = group_size {
            draft.group_size = value;
        }
        if let Some(value) = special_requests {
            draft.special_requests = value;
        }
        if let Some(value) = date {
            draft.date = Some(value);
        }
        if let Some(value) = time {
            draft.time = Some(value);
        }
    }
}

/// A fully validated booking request.
///
/// Built by `validation::validate_for_submission`; date and time are always both set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub service: Service,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub experience_level: ExperienceLevel,
    pub group_size: u8,
    pub special_requests: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub time: NaiveTime,
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&text, "%H:%M").map_err(de::Error::custom)
    }
}
