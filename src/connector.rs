//! Provisioning entry points.
//!
//! The orchestrator addresses resources by an object-class tag; each call
//! resolves the tag to a [`ResourceKind`], maps attributes with that kind's
//! descriptor table and runs the request through the kind's client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::auth::CredentialProvider;
use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ErrorKind, Result, TestStage};
use crate::filter::{Filter, Query, translate};
use crate::resource::client::{ResourceClient, SearchCriteria};
use crate::resource::kind::ResourceKind;
use crate::resource::mapper::ResourceMapper;
use crate::resource::value::{Attribute, LogicalObject, Uid};
use crate::schema::Schema;

/// Connector for one remote library system.
#[derive(Debug)]
pub struct Connector {
    config: ConnectorConfig,
    schema: Schema,
    persons: ResourceClient,
    categories: ResourceClient,
}

impl Connector {
    /// Validate the configuration and build a connector with the standard
    /// attribute tables.
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        Self::with_schema(config, Schema::new())
    }

    /// Build a connector over explicit attribute tables.
    pub fn with_schema(config: ConnectorConfig, schema: Schema) -> Result<Self> {
        let method = config.validate()?;
        let client = Self::build_client(&config)?;
        let base_url = config.base_url().to_string();
        let credentials = Arc::new(CredentialProvider::new(&method, &client, &base_url));

        let resource = |kind| {
            ResourceClient::new(
                client.clone(),
                &base_url,
                kind,
                Arc::clone(&credentials),
                config.log_level,
            )
        };
        let persons = resource(ResourceKind::Person);
        let categories = resource(ResourceKind::Category);

        log::info!("connector configured for {base_url} ({method:?})");

        Ok(Self {
            config,
            schema,
            persons,
            categories,
        })
    }

    fn build_client(config: &ConnectorConfig) -> Result<Client> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs));

        if config.trust_all_certificates {
            log::warn!("certificate validation is disabled for {}", config.base_url());
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| ConnectorError::invalid_config(format!("Failed to build HTTP client: {e}")))
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Attribute tables for every supported kind.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn client(&self, kind: ResourceKind) -> &ResourceClient {
        match kind {
            ResourceKind::Person => &self.persons,
            ResourceKind::Category => &self.categories,
        }
    }

    fn mapper(&self, kind: ResourceKind) -> ResourceMapper<'_> {
        ResourceMapper::new(self.schema.for_kind(kind))
    }

    /// Create an object and return the identifier assigned by the server.
    pub async fn create(&self, object_class: &str, attributes: &[Attribute]) -> Result<Uid> {
        let kind = ResourceKind::from_object_class(object_class)?;
        let mapper = self.mapper(kind);

        let record = mapper.build_wire_record(attributes, true)?;
        let created = self.client(kind).create(&record).await?;

        let uid = mapper.identifier_of(&created).ok_or_else(|| {
            ConnectorError::protocol(format!(
                "create response for {kind} carries no '{}'",
                mapper.schema().identifier_native()
            ))
        })?;

        log::info!("created {kind} {uid}");
        Ok(uid)
    }

    /// Update an object. Attributes without values are cleared; attributes
    /// not supplied are left untouched.
    pub async fn update(&self, object_class: &str, uid: &Uid, attributes: &[Attribute]) -> Result<Uid> {
        let kind = ResourceKind::from_object_class(object_class)?;
        let mapper = self.mapper(kind);

        let record = mapper.build_wire_record(attributes, false)?;
        if record.is_empty() {
            log::debug!("nothing to update on {kind} {uid}");
            return Ok(uid.clone());
        }

        let updated = self.client(kind).update(uid.value(), &record).await?;
        let uid = mapper.identifier_of(&updated).unwrap_or_else(|| uid.clone());

        log::info!("updated {kind} {uid}");
        Ok(uid)
    }

    pub async fn delete(&self, object_class: &str, uid: &Uid) -> Result<()> {
        let kind = ResourceKind::from_object_class(object_class)?;
        self.client(kind).delete(uid.value()).await?;
        log::info!("deleted {kind} {uid}");
        Ok(())
    }

    /// Fetch one object. `None` when the server does not know the
    /// identifier or the record cannot be mapped.
    pub async fn get(&self, object_class: &str, uid: &Uid) -> Result<Option<LogicalObject>> {
        let kind = ResourceKind::from_object_class(object_class)?;
        self.get_kind(kind, uid.value()).await
    }

    async fn get_kind(&self, kind: ResourceKind, id: &str) -> Result<Option<LogicalObject>> {
        match self.client(kind).get(id).await {
            Ok(record) => Ok(self.mapper(kind).parse_wire_record(&record)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Search objects of a class and hand each one to `handler`, which
    /// returns `false` to stop. Returns the number of objects delivered.
    pub async fn search<F>(
        &self,
        object_class: &str,
        filter: Option<&Filter>,
        page_size: Option<usize>,
        mut handler: F,
    ) -> Result<usize>
    where
        F: FnMut(LogicalObject) -> bool,
    {
        let kind = ResourceKind::from_object_class(object_class)?;
        let mapper = self.mapper(kind);

        match translate(kind, mapper.schema(), filter) {
            Query::ById(id) => match self.get_kind(kind, &id).await? {
                Some(object) => {
                    handler(object);
                    Ok(1)
                }
                None => Ok(0),
            },
            Query::Criteria(criteria) => {
                let page_size = page_size
                    .filter(|&size| size > 0)
                    .unwrap_or(self.config.page_size);
                let mut delivered = 0usize;

                self.client(kind)
                    .search(criteria, page_size)
                    .for_each(|record| match mapper.parse_wire_record(&record) {
                        Some(object) => {
                            delivered += 1;
                            handler(object)
                        }
                        None => {
                            log::warn!("skipping {kind} record without identifier");
                            true
                        }
                    })
                    .await?;

                Ok(delivered)
            }
        }
    }

    /// Verify the attribute tables and run a one-record person search.
    pub async fn test_connection(&self) -> Result<()> {
        for kind in ResourceKind::ALL {
            let schema = self.schema.for_kind(kind);
            if schema.is_empty() || schema.primary_name_descriptor().is_none() {
                return Err(ConnectorError::ConnectionTest {
                    stage: TestStage::SchemaUnavailable,
                    source: Box::new(ConnectorError::invalid_config(format!(
                        "no attribute table with a primary name for {kind}"
                    ))),
                });
            }
        }

        self.persons
            .search(SearchCriteria::new(), 1)
            .for_each(|_| false)
            .await
            .map_err(|e| ConnectorError::ConnectionTest {
                stage: TestStage::SearchFailed,
                source: Box::new(e),
            })?;

        log::info!("connection test against {} succeeded", self.config.base_url());
        Ok(())
    }
}
