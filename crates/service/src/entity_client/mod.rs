//! Entity Access Client
//!
//! [`EntityService`] is the contract every controller relies on to reach the
//! entity platform. Payloads travel as JSON addressed by a [`ModelSpec`];
//! [`repository::EntityRepository`] layers typed access on top.
//!
//! Implementations:
//! - [`http::CyodaHttpClient`] talks to the platform over REST
//! - [`memory::InMemoryEntityService`] keeps everything in process

use async_trait::async_trait;
use models::{ModelSpec, RawEntity, SearchCondition};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod http;
pub mod memory;
pub mod repository;

#[async_trait]
pub trait EntityService: Send + Sync {
    /// Store a new entity; fails with `Duplicate` when its business key is taken.
    async fn create(&self, model: &ModelSpec, payload: Value) -> Result<RawEntity, ServiceError>;

    /// Fails with `NotFound` when absent.
    async fn get_by_id(&self, model: &ModelSpec, id: Uuid) -> Result<RawEntity, ServiceError>;

    /// `Ok(None)` when no entity carries `value` in `field`.
    async fn find_by_business_id(&self, model: &ModelSpec, field: &str, value: &str) -> Result<Option<RawEntity>, ServiceError>;

    /// Replace the payload, applying the named workflow transition when one is given.
    async fn update(&self, model: &ModelSpec, id: Uuid, payload: Value, transition: Option<&str>) -> Result<RawEntity, ServiceError>;

    async fn search(&self, model: &ModelSpec, condition: &SearchCondition) -> Result<Vec<RawEntity>, ServiceError>;

    async fn delete(&self, model: &ModelSpec, id: Uuid) -> Result<(), ServiceError>;
}

/// Call-recording wrapper for tests and doc examples.
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Call {
        Create(String),
        GetById(String, Uuid),
        FindByBusinessId(String, String),
        Update { model: String, id: Uuid, transition: Option<String> },
        Search(String),
        Delete(String, Uuid),
    }

    /// Forwards to an inner service and records every call it sees.
    pub struct RecordingEntityService {
        inner: Arc<dyn EntityService>,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingEntityService {
        pub fn new(inner: Arc<dyn EntityService>) -> Self {
            Self { inner, calls: Mutex::new(Vec::new()) }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        pub fn clear(&self) {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
        }

        pub fn transitions(&self) -> Vec<Option<String>> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Update { transition, .. } => Some(transition),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
        }
    }

    #[async_trait]
    impl EntityService for RecordingEntityService {
        async fn create(&self, model: &ModelSpec, payload: Value) -> Result<RawEntity, ServiceError> {
            self.record(Call::Create(model.name.clone()));
            self.inner.create(model, payload).await
        }

        async fn get_by_id(&self, model: &ModelSpec, id: Uuid) -> Result<RawEntity, ServiceError> {
            self.record(Call::GetById(model.name.clone(), id));
            self.inner.get_by_id(model, id).await
        }

        async fn find_by_business_id(&self, model: &ModelSpec, field: &str, value: &str) -> Result<Option<RawEntity>, ServiceError> {
            self.record(Call::FindByBusinessId(model.name.clone(), value.to_string()));
            self.inner.find_by_business_id(model, field, value).await
        }

        async fn update(&self, model: &ModelSpec, id: Uuid, payload: Value, transition: Option<&str>) -> Result<RawEntity, ServiceError> {
            self.record(Call::Update { model: model.name.clone(), id, transition: transition.map(str::to_string) });
            self.inner.update(model, id, payload, transition).await
        }

        async fn search(&self, model: &ModelSpec, condition: &SearchCondition) -> Result<Vec<RawEntity>, ServiceError> {
            self.record(Call::Search(model.name.clone()));
            self.inner.search(model, condition).await
        }

        async fn delete(&self, model: &ModelSpec, id: Uuid) -> Result<(), ServiceError> {
            self.record(Call::Delete(model.name.clone(), id));
            self.inner.delete(model, id).await
        }
    }

    /// Fails every call with the configured error kind.
    pub struct FailingEntityService {
        pub unavailable: bool,
    }

    impl FailingEntityService {
        fn err(&self) -> ServiceError {
            if self.unavailable {
                ServiceError::Unavailable("entity platform unreachable".into())
            } else {
                ServiceError::Platform("entity platform failure".into())
            }
        }
    }

    #[async_trait]
    impl EntityService for FailingEntityService {
        async fn create(&self, _: &ModelSpec, _: Value) -> Result<RawEntity, ServiceError> { Err(self.err()) }
        async fn get_by_id(&self, _: &ModelSpec, _: Uuid) -> Result<RawEntity, ServiceError> { Err(self.err()) }
        async fn find_by_business_id(&self, _: &ModelSpec, _: &str, _: &str) -> Result<Option<RawEntity>, ServiceError> { Err(self.err()) }
        async fn update(&self, _: &ModelSpec, _: Uuid, _: Value, _: Option<&str>) -> Result<RawEntity, ServiceError> { Err(self.err()) }
        async fn search(&self, _: &ModelSpec, _: &SearchCondition) -> Result<Vec<RawEntity>, ServiceError> { Err(self.err()) }
        async fn delete(&self, _: &ModelSpec, _: Uuid) -> Result<(), ServiceError> { Err(self.err()) }
    }
}
