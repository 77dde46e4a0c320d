//! services/dashboard/src/adapters/session_api.rs
//!
//! `SessionService` over `/sessions`.

use super::http::HttpGateway;
use super::records::{to_domain_all, SessionRecord};
use async_trait::async_trait;
use practice_core::domain::{EntityId, Session, SessionInput};
use practice_core::ports::{PortResult, SessionService};
use reqwest::Method;

#[async_trait]
impl SessionService for HttpGateway {
    async fn list_sessions(&self) -> PortResult<Vec<Session>> {
        let records: Vec<SessionRecord> = self.get_json("/sessions/").await?;
        to_domain_all(records, SessionRecord::to_domain)
    }

    async fn get_session(&self, id: EntityId) -> PortResult<Session> {
        let record: SessionRecord = self.get_json(&format!("/sessions/{}", id)).await?;
        record.to_domain()
    }

    async fn create_session(&self, session: &SessionInput) -> PortResult<Session> {
        session.validate()?;
        let record: SessionRecord = self.send_json(Method::POST, "/sessions", session).await?;
        record.to_domain()
    }

    async fn update_session(&self, id: EntityId, session: &SessionInput) -> PortResult<Session> {
        session.validate()?;
        let record: SessionRecord = self
            .send_json(Method::PUT, &format!("/sessions/{}", id), session)
            .await?;
        record.to_domain()
    }

    async fn delete_session(&self, id: EntityId) -> PortResult<()> {
        self.delete(&format!("/sessions/{}", id)).await
    }

    async fn sessions_for_client(&self, client_id: EntityId) -> PortResult<Vec<Session>> {
        let records: Vec<SessionRecord> = self
            .get_json(&format!("/sessions/client/{}", client_id))
            .await?;
        to_domain_all(records, SessionRecord::to_domain)
    }
}
