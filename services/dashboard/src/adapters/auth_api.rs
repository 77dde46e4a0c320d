//! services/dashboard/src/adapters/auth_api.rs
//!
//! `AuthService` over `/therapists`.

use super::http::HttpGateway;
use super::records::{AuthRecord, TherapistRecord};
use async_trait::async_trait;
use practice_core::domain::{AuthSession, LoginRequest, RegisterTherapist, Therapist};
use practice_core::ports::{AuthService, PortResult};
use reqwest::Method;

#[async_trait]
impl AuthService for HttpGateway {
    async fn login(&self, email: &str, password: &str) -> PortResult<AuthSession> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let record: AuthRecord = self.send_json(Method::POST, "/therapists/login", &body).await?;
        record.to_domain()
    }

    async fn register(&self, therapist: &RegisterTherapist) -> PortResult<Therapist> {
        therapist.validate()?;
        let record: TherapistRecord = self
            .send_json(Method::POST, "/therapists/register", therapist)
            .await?;
        record.to_domain()
    }
}
