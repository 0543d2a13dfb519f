#![allow(dead_code)]

use async_trait::async_trait;
use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use linkcut::application::schema::LinkPolicy;
use linkcut::application::security_gate::{GatePolicy, SecurityGate};
use linkcut::application::services::{AuthService, LinkService, LinkSettings};
use linkcut::domain::entities::{Link, NewLink};
use linkcut::domain::repositories::{LinkRepository, StoreError, TokenRepository};
use linkcut::domain::security::{
    GateError, LinkResolver, Reachability, Reputation, ReputationService,
};
use linkcut::infrastructure::persistence::{InMemoryLinkRepository, InMemoryTokenRepository};
use linkcut::routes::app_router_unthrottled;
use linkcut::state::AppState;
use linkcut::utils::code_generator::KeyGenerator;
use linkcut::utils::hashing::hmac_sha256_hex;
use std::sync::Arc;
use url::Url;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://sho.rt";
pub const BASE_KEY_LENGTH: usize = 5;

/// Raw token seeded for [`REGISTERED_OWNER`].
pub const REGISTERED_TOKEN: &str = "registered-test-token";
pub const REGISTERED_OWNER: &str = "team-a";

/// Treats every host as public.
pub struct PublicResolver;

#[async_trait]
impl LinkResolver for PublicResolver {
    async fn classify(&self, _url: &Url) -> Result<Reachability, GateError> {
        Ok(Reachability::Public)
    }
}

/// Flags any URL whose host contains `malware`.
pub struct FlaggingReputation;

#[async_trait]
impl ReputationService for FlaggingReputation {
    async fn check(&self, url: &str) -> Result<Reputation, GateError> {
        if url.contains("malware") {
            Ok(Reputation::Flagged)
        } else {
            Ok(Reputation::Clean)
        }
    }
}

/// Reputation service that is always down.
pub struct FailingReputation;

#[async_trait]
impl ReputationService for FailingReputation {
    async fn check(&self, _url: &str) -> Result<Reputation, GateError> {
        Err(GateError::Upstream("503 Service Unavailable".to_string()))
    }
}

/// Returns `a` repeated to the requested length, so every key of a given
/// length collides with the previous one.
pub struct RepeatingKeyGenerator;

impl KeyGenerator for RepeatingKeyGenerator {
    fn generate(&self, length: usize) -> String {
        "a".repeat(length)
    }
}

/// Link store whose every call fails.
pub struct BrokenLinkRepository;

#[async_trait]
impl LinkRepository for BrokenLinkRepository {
    async fn insert(&self, _new_link: &NewLink) -> Result<Link, StoreError> {
        Err(StoreError::Storage("connection refused".to_string()))
    }

    async fn find_by_key(&self, _key: &str) -> Result<Option<Link>, StoreError> {
        Err(StoreError::Storage("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Storage("connection refused".to_string()))
    }
}

/// Collaborators for a test application.
pub struct TestApp {
    pub links: Arc<dyn LinkRepository>,
    pub keys: Arc<dyn KeyGenerator>,
    pub reputation: Arc<dyn ReputationService>,
    pub gate_policy: GatePolicy,
    pub policy: LinkPolicy,
}

impl Default for TestApp {
    fn default() -> Self {
        Self {
            links: Arc::new(InMemoryLinkRepository::new()),
            keys: Arc::new(linkcut::utils::code_generator::RandomKeyGenerator),
            reputation: Arc::new(FlaggingReputation),
            gate_policy: GatePolicy::default(),
            policy: LinkPolicy::default(),
        }
    }
}

impl TestApp {
    pub fn state(self) -> AppState {
        let gate = SecurityGate::new(Arc::new(PublicResolver), self.reputation, self.gate_policy);
        let link_service = LinkService::new(
            self.links,
            self.keys,
            gate,
            LinkSettings {
                policy: self.policy,
                base_key_length: BASE_KEY_LENGTH,
                passphrase_secret: SIGNING_SECRET.to_string(),
            },
        );

        let tokens = InMemoryTokenRepository::new();
        tokens
            .seed(
                "registered",
                REGISTERED_OWNER,
                &hmac_sha256_hex(SIGNING_SECRET, REGISTERED_TOKEN),
            )
            .unwrap();
        let tokens: Arc<dyn TokenRepository> = Arc::new(tokens);
        let auth_service = AuthService::new(tokens, SIGNING_SECRET.to_string());

        AppState::new(Arc::new(link_service), Arc::new(auth_service), BASE_URL)
    }

    /// Full application router without the rate limiter.
    pub fn server(self) -> TestServer {
        let app = app_router_unthrottled(self.state());
        TestServer::new(ServiceExt::<Request>::into_make_service(app)).unwrap()
    }
}

pub fn test_server() -> TestServer {
    TestApp::default().server()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
