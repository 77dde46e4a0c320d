//! services/dashboard/src/adapters/client_api.rs
//!
//! `ClientService` over `/clients`.

use super::http::HttpGateway;
use super::records::{to_domain_all, ClientRecord};
use async_trait::async_trait;
use practice_core::domain::{Client, ClientUpdate, EntityId, NewClient};
use practice_core::ports::{ClientService, PortResult};
use reqwest::Method;

#[async_trait]
impl ClientService for HttpGateway {
    async fn list_clients(&self) -> PortResult<Vec<Client>> {
        let records: Vec<ClientRecord> = self.get_json("/clients/").await?;
        to_domain_all(records, ClientRecord::to_domain)
    }

    async fn get_client(&self, id: EntityId) -> PortResult<Client> {
        let record: ClientRecord = self.get_json(&format!("/clients/{}", id)).await?;
        record.to_domain()
    }

    async fn create_client(&self, client: &NewClient) -> PortResult<Client> {
        client.validate()?;
        let record: ClientRecord = self.send_json(Method::POST, "/clients", client).await?;
        record.to_domain()
    }

    async fn update_client(&self, id: EntityId, client: &ClientUpdate) -> PortResult<Client> {
        client.validate()?;
        let record: ClientRecord = self
            .send_json(Method::PUT, &format!("/clients/{}", id), client)
            .await?;
        record.to_domain()
    }

    async fn delete_client(&self, id: EntityId) -> PortResult<()> {
        self.delete(&format!("/clients/{}", id)).await
    }
}
