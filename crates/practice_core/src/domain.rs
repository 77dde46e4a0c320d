//! crates/practice_core/src/domain.rs
//!
//! Defines the core data structures for the practice dashboard.
//! Entity records are plain data; they are produced by the gateway after the
//! server response has been validated, so every instance upholds its invariants.
//! Request payloads carry their own `validate` so bad input never leaves the process.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier shared by every entity.
pub type EntityId = i64;

/// Minimum and maximum session length, in minutes.
pub const MIN_SESSION_MINUTES: u32 = 15;
pub const MAX_SESSION_MINUTES: u32 = 120;
pub const DEFAULT_SESSION_MINUTES: u32 = 50;

//=========================================================================================
// Validation
//=========================================================================================

/// A field of an entity or payload failed its invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error(
        "session duration must be between {min} and {max} minutes, got {0}",
        min = MIN_SESSION_MINUTES,
        max = MAX_SESSION_MINUTES
    )]
    DurationOutOfRange(u32),
    #[error("unknown session status '{0}'")]
    UnknownStatus(String),
    #[error("unknown difficulty level '{0}'")]
    UnknownDifficulty(String),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), ValidationError> {
    require("email", value)?;
    if !value.contains('@') {
        return Err(ValidationError::InvalidEmail(value.to_string()));
    }
    Ok(())
}

fn require_id(field: &'static str, id: EntityId) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::Invalid {
            field,
            reason: format!("must be a positive id, got {}", id),
        });
    }
    Ok(())
}

/// Checks a session duration against the allowed range.
pub fn validate_duration(minutes: u32) -> Result<(), ValidationError> {
    if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&minutes) {
        return Err(ValidationError::DurationOutOfRange(minutes));
    }
    Ok(())
}

//=========================================================================================
// Enumerations
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(DifficultyLevel::Beginner),
            "intermediate" => Ok(DifficultyLevel::Intermediate),
            "advanced" => Ok(DifficultyLevel::Advanced),
            other => Err(ValidationError::UnknownDifficulty(other.to_string())),
        }
    }
}

//=========================================================================================
// Entity Records
//=========================================================================================

/// The authenticated therapist.
#[derive(Debug, Clone, PartialEq)]
pub struct Therapist {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub ai_insights: Option<String>,
}

/// The slice of a client the server embeds in session responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSummary {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: EntityId,
    pub client_id: EntityId,
    pub therapist_id: EntityId,
    pub session_date: NaiveDateTime,
    /// Length in minutes, always within `[MIN_SESSION_MINUTES, MAX_SESSION_MINUTES]`.
    pub duration: u32,
    pub notes: Option<String>,
    pub status: SessionStatus,
    pub ai_summary: Option<String>,
    pub client: Option<ClientSummary>,
    pub therapist: Option<Therapist>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub ai_enhancements: Option<String>,
}

/// Links a material to a client. Completion is denoted by `completed_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialAssignment {
    pub id: Option<EntityId>,
    pub material_id: EntityId,
    pub client_id: EntityId,
    pub assigned_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub ai_feedback: Option<String>,
    pub material: Option<Material>,
}

impl MaterialAssignment {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

// Represents a login: the therapist plus the bearer token issued for them
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user: Therapist,
    pub token: String,
}

// Entity invariants, checked by the gateway when decoding server responses.
impl Client {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)
    }
}

impl Session {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_duration(self.duration)
    }
}

impl Material {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)
    }
}

//=========================================================================================
// Request Payloads
//=========================================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterTherapist {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

impl RegisterTherapist {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require_email(&self.email)?;
        require("password", &self.password)
    }
}

/// Payload for creating a client account. The password is only sent on create.
#[derive(Debug, Clone, Serialize)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

impl NewClient {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require_email(&self.email)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientUpdate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl ClientUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require_email(&self.email)
    }
}

impl From<&Client> for ClientUpdate {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
        }
    }
}

/// Payload for scheduling or editing a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInput {
    pub client_id: EntityId,
    pub therapist_id: EntityId,
    #[serde(with = "session_date_format")]
    pub session_date: NaiveDateTime,
    pub duration: u32,
    pub notes: Option<String>,
    pub status: SessionStatus,
}

impl SessionInput {
    /// A scheduled session with the default duration.
    pub fn scheduled(client_id: EntityId, therapist_id: EntityId, session_date: NaiveDateTime) -> Self {
        Self {
            client_id,
            therapist_id,
            session_date,
            duration: DEFAULT_SESSION_MINUTES,
            notes: None,
            status: SessionStatus::Scheduled,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_duration(self.duration)
    }
}

impl From<&Session> for SessionInput {
    fn from(session: &Session) -> Self {
        Self {
            client_id: session.client_id,
            therapist_id: session.therapist_id,
            session_date: session.session_date,
            duration: session.duration,
            notes: session.notes.clone(),
            status: session.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialInput {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub difficulty_level: Option<DifficultyLevel>,
}

impl MaterialInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("content", &self.content)
    }
}

impl From<&Material> for MaterialInput {
    fn from(material: &Material) -> Self {
        Self {
            title: material.title.clone(),
            content: material.content.clone(),
            category: material.category.clone(),
            difficulty_level: material.difficulty_level,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignMaterial {
    pub material_id: EntityId,
    pub client_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_feedback: Option<String>,
}

impl AssignMaterial {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("material_id", self.material_id)?;
        require_id("client_id", self.client_id)
    }
}

//=========================================================================================
// Timestamps
//=========================================================================================

/// Parses the timestamp shapes the API emits: RFC 3339 (converted to UTC),
/// or a naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` with `T` or space as separator.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ValidationError> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ValidationError::Invalid {
            field: "timestamp",
            reason: format!("'{}' is not a recognised date-time", raw),
        })
}

mod session_date_format {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format("%Y-%m-%dT%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_timestamp_shapes() {
        let expected = NaiveDateTime::parse_from_str("2024-03-05 14:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(parse_timestamp("2024-03-05T14:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-05T15:30:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-05T14:30").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-05T14:30:00.000").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-05 14:30:00").unwrap(), expected);
        assert!(parse_timestamp("next tuesday").is_err());
    }

    #[test]
    fn status_and_difficulty_parse_case_insensitively() {
        assert_eq!("Completed".parse::<SessionStatus>().unwrap(), SessionStatus::Completed);
        assert_eq!("ADVANCED".parse::<DifficultyLevel>().unwrap(), DifficultyLevel::Advanced);
        assert_eq!(
            "no-show".parse::<SessionStatus>(),
            Err(ValidationError::UnknownStatus("no-show".to_string()))
        );
    }

    #[test]
    fn duration_bounds_are_inclusive() {
        assert!(validate_duration(15).is_ok());
        assert!(validate_duration(120).is_ok());
        assert_eq!(validate_duration(14), Err(ValidationError::DurationOutOfRange(14)));
        assert_eq!(validate_duration(121), Err(ValidationError::DurationOutOfRange(121)));
        assert_eq!(
            ValidationError::DurationOutOfRange(121).to_string(),
            format!(
                "session duration must be between {} and {} minutes, got 121",
                MIN_SESSION_MINUTES, MAX_SESSION_MINUTES
            )
        );
    }

    #[test]
    fn assignment_requires_positive_ids() {
        let mut payload = AssignMaterial {
            material_id: 1,
            client_id: 2,
            ai_feedback: None,
        };
        assert!(payload.validate().is_ok());

        payload.client_id = 0;
        assert!(matches!(
            payload.validate(),
            Err(ValidationError::Invalid { field: "client_id", .. })
        ));
    }

    #[test]
    fn new_client_requires_name_email_and_password() {
        let mut payload = NewClient {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            password: "secret".into(),
        };
        assert!(payload.validate().is_ok());

        payload.name = "   ".into();
        assert_eq!(payload.validate(), Err(ValidationError::Required("name")));

        payload.name = "Ada".into();
        payload.email = "ada.example.com".into();
        assert!(matches!(payload.validate(), Err(ValidationError::InvalidEmail(_))));
    }

    #[test]
    fn session_input_serializes_lowercase_status_and_naive_date() {
        let date = parse_timestamp("2024-03-05T14:30").unwrap();
        let input = SessionInput::scheduled(7, 2, date);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["status"], "scheduled");
        assert_eq!(json["duration"], DEFAULT_SESSION_MINUTES);
        assert_eq!(json["session_date"], "2024-03-05T14:30:00");
    }

    #[test]
    fn assignment_completion_follows_completed_at() {
        let mut assignment = MaterialAssignment {
            id: None,
            material_id: 1,
            client_id: 2,
            assigned_at: parse_timestamp("2024-01-01T09:00").unwrap(),
            completed_at: None,
            ai_feedback: None,
            material: None,
        };
        assert!(!assignment.is_completed());
        assignment.completed_at = Some(parse_timestamp("2024-01-08T09:00").unwrap());
        assert!(assignment.is_completed());
    }
}
