//! services/dashboard/src/adapters/records.rs
//!
//! Wire shapes of the practice API's JSON responses. Each record converts into
//! its domain type through `to_domain`, which enforces the entity invariants;
//! a response that violates them fails with `PortError::Decode` and never
//! reaches a store.

use practice_core::domain::{
    parse_timestamp, AuthSession, Client, ClientSummary, DifficultyLevel, EntityId, Material,
    MaterialAssignment, Session, SessionStatus, Therapist, ValidationError,
};
use practice_core::ports::{PortError, PortResult};
use serde::Deserialize;

fn decode_err(e: ValidationError) -> PortError {
    PortError::Decode(e.to_string())
}

/// Treats `""` the same as an absent field.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//=========================================================================================
// Record Structs
//=========================================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct TherapistRecord {
    id: EntityId,
    #[serde(default)]
    name: String,
    email: String,
    #[serde(default)]
    specialization: Option<String>,
}
impl TherapistRecord {
    pub(crate) fn to_domain(self) -> PortResult<Therapist> {
        Ok(Therapist {
            id: self.id,
            name: self.name,
            email: self.email,
            specialization: non_empty(self.specialization),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthRecord {
    user: TherapistRecord,
    token: String,
}
impl AuthRecord {
    pub(crate) fn to_domain(self) -> PortResult<AuthSession> {
        if self.token.trim().is_empty() {
            return Err(decode_err(ValidationError::Required("token")));
        }
        Ok(AuthSession {
            user: self.user.to_domain()?,
            token: self.token,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClientRecord {
    id: EntityId,
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    ai_insights: Option<String>,
}
impl ClientRecord {
    pub(crate) fn to_domain(self) -> PortResult<Client> {
        let client = Client {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: non_empty(self.phone),
            ai_insights: non_empty(self.ai_insights),
        };
        client.validate().map_err(decode_err)?;
        Ok(client)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClientSummaryRecord {
    id: EntityId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}
impl ClientSummaryRecord {
    fn to_domain(self) -> ClientSummary {
        ClientSummary {
            id: self.id,
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionRecord {
    id: EntityId,
    client_id: EntityId,
    therapist_id: EntityId,
    session_date: String,
    duration: i64,
    #[serde(default)]
    notes: Option<String>,
    status: String,
    #[serde(default)]
    ai_summary: Option<String>,
    #[serde(default)]
    client: Option<ClientSummaryRecord>,
    #[serde(default)]
    therapist: Option<TherapistRecord>,
}
impl SessionRecord {
    pub(crate) fn to_domain(self) -> PortResult<Session> {
        let duration = u32::try_from(self.duration).map_err(|_| PortError::Decode(format!(
            "session {} has negative duration {}",
            self.id, self.duration
        )))?;
        let session = Session {
            id: self.id,
            client_id: self.client_id,
            therapist_id: self.therapist_id,
            session_date: parse_timestamp(&self.session_date).map_err(decode_err)?,
            duration,
            notes: non_empty(self.notes),
            status: self.status.parse::<SessionStatus>().map_err(decode_err)?,
            ai_summary: non_empty(self.ai_summary),
            client: self.client.map(ClientSummaryRecord::to_domain),
            therapist: self.therapist.map(TherapistRecord::to_domain).transpose()?,
        };
        session.validate().map_err(decode_err)?;
        Ok(session)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MaterialRecord {
    id: EntityId,
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty_level: Option<String>,
    #[serde(default)]
    ai_enhancements: Option<String>,
}
impl MaterialRecord {
    pub(crate) fn to_domain(self) -> PortResult<Material> {
        let difficulty_level = non_empty(self.difficulty_level)
            .map(|raw| raw.parse::<DifficultyLevel>())
            .transpose()
            .map_err(decode_err)?;
        let material = Material {
            id: self.id,
            title: self.title,
            content: self.content,
            category: non_empty(self.category),
            difficulty_level,
            ai_enhancements: non_empty(self.ai_enhancements),
        };
        material.validate().map_err(decode_err)?;
        Ok(material)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentRecord {
    #[serde(default)]
    id: Option<EntityId>,
    material_id: EntityId,
    client_id: EntityId,
    assigned_at: String,
    #[serde(default)]
    completed_at: Option<String>,
    #[serde(default)]
    ai_feedback: Option<String>,
    #[serde(default)]
    material: Option<MaterialRecord>,
}
impl AssignmentRecord {
    pub(crate) fn to_domain(self) -> PortResult<MaterialAssignment> {
        let completed_at = non_empty(self.completed_at)
            .map(|raw| parse_timestamp(&raw))
            .transpose()
            .map_err(decode_err)?;
        Ok(MaterialAssignment {
            id: self.id,
            material_id: self.material_id,
            client_id: self.client_id,
            assigned_at: parse_timestamp(&self.assigned_at).map_err(decode_err)?,
            completed_at,
            ai_feedback: non_empty(self.ai_feedback),
            material: self.material.map(MaterialRecord::to_domain).transpose()?,
        })
    }
}

/// Converts a whole list, failing on the first invalid record.
pub(crate) fn to_domain_all<R, T>(records: Vec<R>, convert: impl Fn(R) -> PortResult<T>) -> PortResult<Vec<T>> {
    records.into_iter().map(convert).collect()
}
