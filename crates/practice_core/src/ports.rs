//! crates/practice_core/src/ports.rs
//!
//! Defines the service contracts (traits) for talking to the practice API.
//! The gateway adapter implements these; loaders and tests depend only on the traits.

use async_trait::async_trait;
use crate::domain::{
    AssignMaterial, AuthSession, Client, ClientUpdate, EntityId, Material, MaterialAssignment,
    MaterialInput, NewClient, RegisterTherapist, Session, SessionInput, Therapist,
    ValidationError,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The server rejected the credential (HTTP 401). The gateway has already logged out.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// The HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            PortError::Unauthorized => Some(401),
            PortError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    /// `POST /therapists/login`
    async fn login(&self, email: &str, password: &str) -> PortResult<AuthSession>;

    /// `POST /therapists/register`
    async fn register(&self, therapist: &RegisterTherapist) -> PortResult<Therapist>;
}

#[async_trait]
pub trait ClientService: Send + Sync {
    async fn list_clients(&self) -> PortResult<Vec<Client>>;
    async fn get_client(&self, id: EntityId) -> PortResult<Client>;
    async fn create_client(&self, client: &NewClient) -> PortResult<Client>;
    async fn update_client(&self, id: EntityId, client: &ClientUpdate) -> PortResult<Client>;
    async fn delete_client(&self, id: EntityId) -> PortResult<()>;
}

#[async_trait]
pub trait SessionService: Send + Sync {
    async fn list_sessions(&self) -> PortResult<Vec<Session>>;
    async fn get_session(&self, id: EntityId) -> PortResult<Session>;
    async fn create_session(&self, session: &SessionInput) -> PortResult<Session>;
    async fn update_session(&self, id: EntityId, session: &SessionInput) -> PortResult<Session>;
    async fn delete_session(&self, id: EntityId) -> PortResult<()>;

    /// `GET /sessions/client/{id}`
    async fn sessions_for_client(&self, client_id: EntityId) -> PortResult<Vec<Session>>;
}

#[async_trait]
pub trait MaterialService: Send + Sync {
    async fn list_materials(&self) -> PortResult<Vec<Material>>;
    async fn get_material(&self, id: EntityId) -> PortResult<Material>;
    async fn create_material(&self, material: &MaterialInput) -> PortResult<Material>;
    async fn update_material(&self, id: EntityId, material: &MaterialInput) -> PortResult<Material>;
    async fn delete_material(&self, id: EntityId) -> PortResult<()>;

    /// `POST /materials/assign`
    async fn assign_material(&self, assignment: &AssignMaterial) -> PortResult<MaterialAssignment>;

    /// `GET /materials/client/{id}`: the client's assignments, each embedding its material.
    async fn materials_for_client(&self, client_id: EntityId) -> PortResult<Vec<MaterialAssignment>>;
}
