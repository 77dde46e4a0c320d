//! services/dashboard/src/loaders.rs
//!
//! The data-loading protocol. Each loader runs once, sequences its gateway
//! calls, writes the stores only after a call succeeds, and returns both
//! results and errors explicitly. A failed fetch leaves the previous
//! snapshot in place. Payload validation happens in the gateway, before
//! anything is sent.

use crate::state::AppState;
use practice_core::domain::{
    AssignMaterial, Client, ClientUpdate, EntityId, Material, MaterialAssignment, MaterialInput,
    NewClient, RegisterTherapist, Session, SessionInput, Therapist,
};
use practice_core::ports::PortResult;
use practice_core::views::{self, DashboardSummary};
use tracing::{error, info, warn};

//=========================================================================================
// Authentication
//=========================================================================================

/// Logs in and stores the credential. Returns the authenticated therapist.
pub async fn login(state: &AppState, email: &str, password: &str) -> PortResult<Therapist> {
    let session = state.auth_api.login(email, password).await.map_err(|e| {
        error!("Login failed: {}", e);
        e
    })?;
    let user = session.user.clone();
    state.auth.write(|auth| auth.login(session));
    info!(therapist_id = user.id, "Logged in");
    Ok(user)
}

pub fn logout(state: &AppState) {
    state.auth.write(|auth| auth.logout());
}

pub async fn register(state: &AppState, therapist: &RegisterTherapist) -> PortResult<Therapist> {
    state.auth_api.register(therapist).await
}

//=========================================================================================
// List Loads
//=========================================================================================

/// Refreshes the client store. Returns the number of clients loaded.
pub async fn load_clients(state: &AppState) -> PortResult<usize> {
    let clients = state.client_api.list_clients().await.map_err(|e| {
        error!("Failed to load clients: {}", e);
        e
    })?;
    let count = clients.len();
    state.clients.write(|store| store.set_all(clients));
    Ok(count)
}

pub async fn load_sessions(state: &AppState) -> PortResult<usize> {
    let sessions = state.session_api.list_sessions().await.map_err(|e| {
        error!("Failed to load sessions: {}", e);
        e
    })?;
    let count = sessions.len();
    state.sessions.write(|store| store.set_all(sessions));
    Ok(count)
}

pub async fn load_materials(state: &AppState) -> PortResult<usize> {
    let materials = state.material_api.list_materials().await.map_err(|e| {
        error!("Failed to load materials: {}", e);
        e
    })?;
    let count = materials.len();
    state.materials.write(|store| store.set_all(materials));
    Ok(count)
}

/// Loads all three lists concurrently; every store that loaded is updated
/// even if another fails, and the first error is returned.
pub async fn load_all(state: &AppState) -> PortResult<()> {
    let (clients, sessions, materials) =
        futures::join!(load_clients(state), load_sessions(state), load_materials(state));
    clients?;
    sessions?;
    materials?;
    Ok(())
}

//=========================================================================================
// Client Mutations
//=========================================================================================

pub async fn create_client(state: &AppState, client: &NewClient) -> PortResult<Client> {
    let created = state.client_api.create_client(client).await?;
    state.clients.write(|store| store.add(created.clone()));
    Ok(created)
}

pub async fn update_client(state: &AppState, id: EntityId, client: &ClientUpdate) -> PortResult<Client> {
    let updated = state.client_api.update_client(id, client).await?;
    state.clients.write(|store| store.update(updated.clone()));
    Ok(updated)
}

pub async fn delete_client(state: &AppState, id: EntityId) -> PortResult<()> {
    state.client_api.delete_client(id).await?;
    state.clients.write(|store| store.remove(id));
    Ok(())
}

//=========================================================================================
// Session Mutations
//=========================================================================================

pub async fn create_session(state: &AppState, session: &SessionInput) -> PortResult<Session> {
    let created = state.session_api.create_session(session).await?;
    state.sessions.write(|store| store.add(created.clone()));
    Ok(created)
}

pub async fn update_session(state: &AppState, id: EntityId, session: &SessionInput) -> PortResult<Session> {
    let updated = state.session_api.update_session(id, session).await?;
    state.sessions.write(|store| store.update(updated.clone()));
    Ok(updated)
}

pub async fn delete_session(state: &AppState, id: EntityId) -> PortResult<()> {
    state.session_api.delete_session(id).await?;
    state.sessions.write(|store| store.remove(id));
    Ok(())
}

//=========================================================================================
// Material Mutations
//=========================================================================================

pub async fn create_material(state: &AppState, material: &MaterialInput) -> PortResult<Material> {
    let created = state.material_api.create_material(material).await?;
    state.materials.write(|store| store.add(created.clone()));
    Ok(created)
}

pub async fn update_material(
    state: &AppState,
    id: EntityId,
    material: &MaterialInput,
) -> PortResult<Material> {
    let updated = state.material_api.update_material(id, material).await?;
    state.materials.write(|store| store.update(updated.clone()));
    Ok(updated)
}

pub async fn delete_material(state: &AppState, id: EntityId) -> PortResult<()> {
    state.material_api.delete_material(id).await?;
    state.materials.write(|store| store.remove(id));
    Ok(())
}

/// Assigns a material to a client, then refreshes the material list. Once the
/// assignment is recorded it is returned even if the refresh fails; the
/// material store then keeps its previous snapshot.
pub async fn assign_material(state: &AppState, assignment: &AssignMaterial) -> PortResult<MaterialAssignment> {
    let assigned = state.material_api.assign_material(assignment).await?;
    info!(
        material_id = assigned.material_id,
        client_id = assigned.client_id,
        "Material assigned"
    );
    if let Err(e) = load_materials(state).await {
        warn!(material_id = assigned.material_id, "Material list not refreshed after assign: {}", e);
    }
    Ok(assigned)
}

//=========================================================================================
// Combined Views
//=========================================================================================

/// Everything the client detail page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDetail {
    pub client: Client,
    pub sessions: Vec<Session>,
    pub assignments: Vec<MaterialAssignment>,
}

/// Fetches the client, their sessions and their assignments concurrently.
/// Completes only once all three have resolved; any failure fails the load.
pub async fn load_client_detail(state: &AppState, client_id: EntityId) -> PortResult<ClientDetail> {
    let (client, sessions, assignments) = futures::try_join!(
        state.client_api.get_client(client_id),
        state.session_api.sessions_for_client(client_id),
        state.material_api.materials_for_client(client_id)
    )
    .map_err(|e| {
        error!(client_id, "Failed to load client detail: {}", e);
        e
    })?;

    state.clients.write(|store| store.set_selected(Some(client.clone())));
    Ok(ClientDetail {
        client,
        sessions,
        assignments,
    })
}

/// The dashboard figures over whatever the stores currently hold.
pub fn dashboard(state: &AppState) -> DashboardSummary {
    let clients = state.clients.snapshot();
    let sessions = state.sessions.snapshot();
    let materials = state.materials.snapshot();
    views::dashboard_summary(clients.items(), sessions.items(), materials.items())
}
