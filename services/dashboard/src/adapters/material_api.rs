//! services/dashboard/src/adapters/material_api.rs
//!
//! `MaterialService` over `/materials`.

use super::http::HttpGateway;
use super::records::{to_domain_all, AssignmentRecord, MaterialRecord};
use async_trait::async_trait;
use practice_core::domain::{AssignMaterial, EntityId, Material, MaterialAssignment, MaterialInput};
use practice_core::ports::{MaterialService, PortResult};
use reqwest::Method;

#[async_trait]
impl MaterialService for HttpGateway {
    async fn list_materials(&self) -> PortResult<Vec<Material>> {
        let records: Vec<MaterialRecord> = self.get_json("/materials/").await?;
        to_domain_all(records, MaterialRecord::to_domain)
    }

    async fn get_material(&self, id: EntityId) -> PortResult<Material> {
        let record: MaterialRecord = self.get_json(&format!("/materials/{}", id)).await?;
        record.to_domain()
    }

    async fn create_material(&self, material: &MaterialInput) -> PortResult<Material> {
        material.validate()?;
        let record: MaterialRecord = self.send_json(Method::POST, "/materials", material).await?;
        record.to_domain()
    }

    async fn update_material(&self, id: EntityId, material: &MaterialInput) -> PortResult<Material> {
        material.validate()?;
        let record: MaterialRecord = self
            .send_json(Method::PUT, &format!("/materials/{}", id), material)
            .await?;
        record.to_domain()
    }

    async fn delete_material(&self, id: EntityId) -> PortResult<()> {
        self.delete(&format!("/materials/{}", id)).await
    }

    async fn assign_material(&self, assignment: &AssignMaterial) -> PortResult<MaterialAssignment> {
        assignment.validate()?;
        let record: AssignmentRecord = self
            .send_json(Method::POST, "/materials/assign", assignment)
            .await?;
        record.to_domain()
    }

    async fn materials_for_client(&self, client_id: EntityId) -> PortResult<Vec<MaterialAssignment>> {
        let records: Vec<AssignmentRecord> = self
            .get_json(&format!("/materials/client/{}", client_id))
            .await?;
        to_domain_all(records, AssignmentRecord::to_domain)
    }
}
