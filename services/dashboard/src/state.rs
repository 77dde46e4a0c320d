//! services/dashboard/src/state.rs
//!
//! Defines the application context: the service ports plus the domain stores,
//! created once at startup and passed explicitly to every loader.

use crate::adapters::HttpGateway;
use crate::config::Config;
use practice_core::ports::{AuthService, ClientService, MaterialService, SessionService};
use practice_core::store::{AuthStore, ClientStore, MaterialStore, SessionStore, Shared};
use std::sync::Arc;

//=========================================================================================
// AppState
//=========================================================================================

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_api: Arc<dyn AuthService>,
    pub client_api: Arc<dyn ClientService>,
    pub session_api: Arc<dyn SessionService>,
    pub material_api: Arc<dyn MaterialService>,
    pub auth: Shared<AuthStore>,
    pub clients: Shared<ClientStore>,
    pub sessions: Shared<SessionStore>,
    pub materials: Shared<MaterialStore>,
}

impl AppState {
    /// Wires every port to a single HTTP gateway sharing this state's auth store.
    pub fn connect(config: Arc<Config>) -> Result<Self, reqwest::Error> {
        let auth = Shared::new(AuthStore::new());
        let gateway = Arc::new(HttpGateway::new(&config, auth.clone())?);
        Ok(Self {
            config,
            auth_api: gateway.clone(),
            client_api: gateway.clone(),
            session_api: gateway.clone(),
            material_api: gateway,
            auth,
            clients: Shared::default(),
            sessions: Shared::default(),
            materials: Shared::default(),
        })
    }

    /// Builds a state over arbitrary port implementations, with empty entity
    /// stores. `auth` must be the store those ports clear on a 401.
    pub fn with_services(
        config: Arc<Config>,
        auth: Shared<AuthStore>,
        auth_api: Arc<dyn AuthService>,
        client_api: Arc<dyn ClientService>,
        session_api: Arc<dyn SessionService>,
        material_api: Arc<dyn MaterialService>,
    ) -> Self {
        Self {
            config,
            auth_api,
            client_api,
            session_api,
            material_api,
            auth,
            clients: Shared::default(),
            sessions: Shared::default(),
            materials: Shared::default(),
        }
    }
}
