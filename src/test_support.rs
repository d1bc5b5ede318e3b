//! Wiring shared by the HTTP tests: the real route table over an in-memory store
//! and a recording payment gateway.

use actix_web::web;
use mongodb::bson::oid::ObjectId;
use serde_json::Map;
use std::sync::Arc;

pub use crate::database::{memory::MemoryStore, Store};
pub use crate::models::{Role, User};
pub use crate::services::stripe_service::testing::RecordingGateway;
use crate::services::{PaymentGateway, TokenService};

pub const TEST_SECRET: &str = "test-access-token-secret";

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<RecordingGateway>,
    pub tokens: web::Data<TokenService>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            gateway: Arc::new(RecordingGateway::default()),
            tokens: web::Data::new(TokenService::new(TEST_SECRET)),
        }
    }

    pub fn configure(&self) -> impl FnOnce(&mut web::ServiceConfig) {
        let store: Arc<dyn Store> = self.store.clone();
        let gateway: Arc<dyn PaymentGateway> = self.gateway.clone();
        let tokens = self.tokens.clone();

        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::from(store))
                .app_data(web::Data::from(gateway))
                .app_data(tokens);
            crate::routes::configure(cfg);
        }
    }

    pub async fn seed_user(&self, email: &str, role: Role, fired: bool) -> ObjectId {
        let user = User {
            id: None,
            email: email.to_string(),
            name: Some(email.split('@').next().unwrap_or_default().to_string()),
            photo: None,
            role,
            is_verified: false,
            is_fired: fired,
            designation: None,
            bank_account_no: None,
            salary: Some(1000.0),
            created_at: None,
        };
        let outcome = self.store.insert_user(user).await.unwrap();
        ObjectId::parse_str(outcome.inserted_id.unwrap()).unwrap()
    }

    /// `Authorization` header value carrying a fresh token for `email`.
    pub fn bearer(&self, email: &str) -> (&'static str, String) {
        let token = self.tokens.issue(email, Map::new()).unwrap();
        ("Authorization", format!("Bearer {}", token))
    }
}
