pub mod domain;
pub mod ports;
pub mod store;
pub mod views;

pub use domain::{
    AssignMaterial, AuthSession, Client, ClientSummary, ClientUpdate, DifficultyLevel, EntityId,
    Material, MaterialAssignment, MaterialInput, NewClient, RegisterTherapist, Session,
    SessionInput, SessionStatus, Therapist, ValidationError,
};
pub use ports::{AuthService, ClientService, MaterialService, PortError, PortResult, SessionService};
pub use store::{AuthStore, ClientStore, EntityStore, Identified, MaterialStore, SessionStore, Shared};
