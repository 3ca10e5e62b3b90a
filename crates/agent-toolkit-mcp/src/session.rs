// crates/agent-toolkit-mcp/src/session.rs
// ============================================================================
// Module: Toolkit Session
// Description: Session construction from a credential and an optional context.
// Purpose: Own the registry, handle, and router for one configured session.
// Dependencies: agent-toolkit-config, agent-toolkit-core, thiserror
// ============================================================================

//! ## Overview
//! A [`Toolkit`] is built once from a credential and a [`Context`]. It compiles
//! the catalog, filters it into a registry, creates the account-scoped handle,
//! and exposes [`Toolkit::invoke`] as the single call entry point. The session
//! is immutable; a different context means building a new session.
//! `Toolkit` is `Send + Sync` and is shared by reference across concurrent
//! invocations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use agent_toolkit_config::ConfigError;
use agent_toolkit_config::ToolkitConfig;
use agent_toolkit_contract::ToolDefinition;
use agent_toolkit_core::Context;
use serde_json::Value;
use thiserror::Error;

use crate::audit::MeterAuditEvent;
use crate::audit::NoopAuditSink;
use crate::audit::ToolAuditSink;
use crate::audit::sink_from_config;
use crate::catalog::Catalog;
use crate::catalog::CatalogError;
use crate::client::HttpPlatformClient;
use crate::client::PlatformSettings;
use crate::handle::CapabilityHandle;
use crate::handle::PlatformClient;
use crate::handle::PlatformError;
use crate::metering::MeterEvent;
use crate::metering::record_meter_event;
use crate::registry::CapabilityRegistry;
use crate::telemetry::NoopMetrics;
use crate::telemetry::ToolMetrics;
use crate::tools::ToolError;
use crate::tools::ToolRouter;
use crate::tools::ToolRouterConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Session construction errors.
#[derive(Debug, Error)]
pub enum ToolkitError {
    /// The capability catalog is invalid.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The platform credential is missing or blank.
    #[error("credential error: {0}")]
    Credential(String),
    /// The platform client could not be built.
    #[error("platform client error: {0}")]
    Client(#[from] PlatformError),
    /// Configuration could not be loaded or resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The audit sink could not be opened.
    #[error("audit sink error: {0}")]
    Audit(String),
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for sessions with an injected platform client.
pub struct ToolkitBuilder {
    /// Platform transport.
    client: Arc<dyn PlatformClient>,
    /// Session context.
    context: Context,
    /// Catalog override.
    catalog: Option<Catalog>,
    /// Audit sink for tool calls and meter events.
    audit: Arc<dyn ToolAuditSink>,
    /// Metrics sink for tool calls.
    metrics: Arc<dyn ToolMetrics>,
}

impl ToolkitBuilder {
    /// Sets the session context.
    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Replaces the standard catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Sets the audit sink.
    #[must_use]
    pub fn audit(mut self, audit: Arc<dyn ToolAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Sets the metrics sink.
    #[must_use]
    pub fn metrics(mut self, metrics: Arc<dyn ToolMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Builds the session.
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::Catalog`] when the standard catalog is invalid.
    pub fn build(self) -> Result<Toolkit, ToolkitError> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Catalog::standard()?,
        };
        Ok(Toolkit::assemble(self.client, self.context, &catalog, self.audit, self.metrics))
    }
}

// ============================================================================
// SECTION: Toolkit
// ============================================================================

/// A configured toolkit session.
#[derive(Clone)]
pub struct Toolkit {
    /// Router holding the registry, handle, and context.
    router: ToolRouter,
}

impl Toolkit {
    /// Builds a session against the public platform endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError`] when the credential is empty or the catalog is
    /// invalid.
    pub fn new(
        secret_key: impl Into<String>,
        context: Option<Context>,
    ) -> Result<Self, ToolkitError> {
        Self::with_settings(secret_key, context, PlatformSettings::public()?)
    }

    /// Builds a session with explicit platform settings.
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::Credential`] when the credential is blank, or
    /// another [`ToolkitError`] when the client or catalog cannot be built.
    pub fn with_settings(
        secret_key: impl Into<String>,
        context: Option<Context>,
        settings: PlatformSettings,
    ) -> Result<Self, ToolkitError> {
        let secret_key = secret_key.into();
        if secret_key.trim().is_empty() {
            return Err(ToolkitError::Credential("secret key must be non-empty".to_string()));
        }
        let context = context.unwrap_or_default();
        let client = HttpPlatformClient::new(secret_key, context.mode(), settings)?;
        Self::builder(Arc::new(client)).context(context).build()
    }

    /// Builds a session over an injected client and catalog.
    #[must_use]
    pub fn with_client(
        client: Arc<dyn PlatformClient>,
        context: Option<Context>,
        catalog: &Catalog,
    ) -> Self {
        Self::assemble(
            client,
            context.unwrap_or_default(),
            catalog,
            Arc::new(NoopAuditSink),
            Arc::new(NoopMetrics),
        )
    }

    /// Starts a builder over an injected client.
    #[must_use]
    pub fn builder(client: Arc<dyn PlatformClient>) -> ToolkitBuilder {
        ToolkitBuilder {
            client,
            context: Context::default(),
            catalog: None,
            audit: Arc::new(NoopAuditSink),
            metrics: Arc::new(NoopMetrics),
        }
    }

    /// Builds a session from a loaded configuration file.
    ///
    /// The secret key is read from the environment variable named by
    /// `platform.secret_key_env`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError`] when configuration, credential, audit sink, or
    /// catalog resolution fails.
    pub fn from_config(config: &ToolkitConfig) -> Result<Self, ToolkitError> {
        let context = config.context()?;
        let settings = PlatformSettings::from_config(&config.platform)?;
        let secret_key = config.platform.resolve_secret_key()?;
        let audit =
            sink_from_config(&config.audit).map_err(|err| ToolkitError::Audit(err.to_string()))?;
        let client = HttpPlatformClient::new(secret_key, context.mode(), settings)?;
        Self::builder(Arc::new(client)).context(context).audit(audit).build()
    }

    /// Invokes a tool by name and returns its serialized result.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] for unknown names, invalid arguments, handler
    /// failures, or serialization failures.
    pub async fn invoke(&self, name: &str, args: Value) -> Result<String, ToolError> {
        self.router.call(name, args).await
    }

    /// Returns the tool listing for the session, in catalog order.
    #[must_use]
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.router.list_tools()
    }

    /// Records a billing meter event with the session's account scope.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] when validation or the remote call fails.
    pub async fn create_meter_event(&self, event: &MeterEvent) -> Result<(), PlatformError> {
        let handle = self.router.handle();
        let result = record_meter_event(handle, event).await;
        let error_kind = result.as_ref().err().map(PlatformError::kind);
        self.router.audit().record_meter(&MeterAuditEvent::new(
            &event.event,
            error_kind,
            handle.account().is_some(),
        ));
        result
    }

    /// Returns the session context.
    #[must_use]
    pub fn context(&self) -> &Context {
        self.router.context()
    }

    /// Returns the account-scoped capability handle.
    #[must_use]
    pub fn handle(&self) -> &CapabilityHandle {
        self.router.handle()
    }

    /// Returns the session registry.
    #[must_use]
    pub fn registry(&self) -> &CapabilityRegistry {
        self.router.registry()
    }

    /// Returns the tool router used by the protocol server.
    #[must_use]
    pub const fn router(&self) -> &ToolRouter {
        &self.router
    }
}

impl Toolkit {
    /// Filters the catalog for the context and wires the router.
    fn assemble(
        client: Arc<dyn PlatformClient>,
        context: Context,
        catalog: &Catalog,
        audit: Arc<dyn ToolAuditSink>,
        metrics: Arc<dyn ToolMetrics>,
    ) -> Self {
        let registry = Arc::new(CapabilityRegistry::build(catalog, &context));
        let handle = CapabilityHandle::new(client, &context);
        let router = ToolRouter::new(ToolRouterConfig {
            registry,
            handle,
            context: Arc::new(context),
            audit,
            metrics,
        });
        Self {
            router,
        }
    }
}

impl fmt::Debug for Toolkit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Toolkit")
            .field("context", self.context())
            .field("registry", self.registry())
            .finish()
    }
}
