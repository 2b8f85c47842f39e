// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action descriptors, registry, and transport resolution

use crate::error::ConfigError;
use crate::presentation::{Size, Variant};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Identifier of a registered action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// HTTP method for REST dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Parse a method name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which transport family a dispatch goes over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Rest,
    Channel,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Rest => "rest",
            TransportKind::Channel => "channel",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an action travels: a REST endpoint or a named channel event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transport {
    Rest {
        endpoint: String,
        method: HttpMethod,
        #[serde(default)]
        default_payload: Map<String, Value>,
    },
    Channel { event_name: String },
}

impl Transport {
    pub fn kind(&self) -> TransportKind {
        match self {
            Transport::Rest { .. } => TransportKind::Rest,
            Transport::Channel { .. } => TransportKind::Channel,
        }
    }
}

/// Display strings for each phase of a trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLabels {
    pub label: String,
    #[serde(default = "default_loading_label")]
    pub loading: String,
    #[serde(default = "default_success_label")]
    pub success: String,
    #[serde(default = "default_error_label")]
    pub error: String,
}

fn default_loading_label() -> String {
    "Loading...".to_string()
}

fn default_success_label() -> String {
    "Success!".to_string()
}

fn default_error_label() -> String {
    "Failed".to_string()
}

impl ActionLabels {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            loading: default_loading_label(),
            success: default_success_label(),
            error: default_error_label(),
        }
    }

    pub fn with_loading(mut self, loading: impl Into<String>) -> Self {
        self.loading = loading.into();
        self
    }

    pub fn with_success(mut self, success: impl Into<String>) -> Self {
        self.success = success.into();
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }
}

/// A registered action: identity, labels, and transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub id: ActionId,
    pub labels: ActionLabels,
    pub transport: Transport,
}

impl ActionDescriptor {
    pub fn new(id: impl Into<ActionId>, labels: ActionLabels, transport: Transport) -> Self {
        Self {
            id: id.into(),
            labels,
            transport,
        }
    }
}

/// Registry of known actions, keyed by id
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<ActionId, ActionDescriptor>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Rejects duplicate ids.
    pub fn insert(&mut self, descriptor: ActionDescriptor) -> Result<(), ConfigError> {
        if self.actions.contains_key(&descriptor.id) {
            return Err(ConfigError::DuplicateAction(descriptor.id.clone()));
        }
        self.actions.insert(descriptor.id.clone(), descriptor);
        Ok(())
    }

    pub fn lookup(&self, id: &ActionId) -> Option<&ActionDescriptor> {
        self.actions.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Per-trigger configuration supplied at mount time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerOptions {
    pub action_id: ActionId,
    /// Payload merged over the transport's default payload
    #[serde(default)]
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub disabled: bool,
    /// Prefer the channel transport when one is available
    #[serde(default)]
    pub realtime: bool,
    /// Channel event name override
    #[serde(default)]
    pub socket_event: Option<String>,
    /// Inline REST endpoint override
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub method: Option<HttpMethod>,
    #[serde(default)]
    pub show_progress: bool,
    #[serde(default)]
    pub auto_retry: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_debounce", with = "humantime_serde")]
    pub debounce: Duration,
    #[serde(default)]
    pub require_confirmation: bool,
    #[serde(default)]
    pub loading_text: Option<String>,
    #[serde(default)]
    pub success_text: Option<String>,
    #[serde(default)]
    pub error_text: Option<String>,
}

fn default_max_retries() -> u32 {
    3
}

fn default_debounce() -> Duration {
    crate::controller::DEFAULT_DEBOUNCE
}

impl TriggerOptions {
    pub fn new(action_id: impl Into<ActionId>) -> Self {
        Self {
            action_id: action_id.into(),
            payload: Map::new(),
            variant: Variant::default(),
            size: Size::default(),
            disabled: false,
            realtime: false,
            socket_event: None,
            endpoint: None,
            method: None,
            show_progress: false,
            auto_retry: false,
            max_retries: default_max_retries(),
            debounce: default_debounce(),
            require_confirmation: false,
            loading_text: None,
            success_text: None,
            error_text: None,
        }
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Route over the channel transport using the given event name
    pub fn with_socket_event(mut self, event_name: impl Into<String>) -> Self {
        self.realtime = true;
        self.socket_event = Some(event_name.into());
        self
    }

    pub fn with_confirmation(mut self) -> Self {
        self.require_confirmation = true;
        self
    }

    pub fn with_auto_retry(mut self, max_retries: u32) -> Self {
        self.auto_retry = true;
        self.max_retries = max_retries;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    pub fn with_loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = Some(text.into());
        self
    }

    pub fn with_success_text(mut self, text: impl Into<String>) -> Self {
        self.success_text = Some(text.into());
        self
    }

    pub fn with_error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = Some(text.into());
        self
    }
}

/// Resolve which transport a trigger dispatches over.
///
/// Precedence: channel when `realtime` asks for one and an event name is
/// known, then the inline endpoint, then the registry descriptor. A trigger
/// resolves to exactly one transport.
pub fn resolve_transport(
    options: &TriggerOptions,
    descriptor: Option<&ActionDescriptor>,
) -> Result<Transport, ConfigError> {
    if options.realtime {
        if let Some(event_name) = &options.socket_event {
            return Ok(Transport::Channel {
                event_name: event_name.clone(),
            });
        }
        if let Some(Transport::Channel { event_name }) = descriptor.map(|d| &d.transport) {
            return Ok(Transport::Channel {
                event_name: event_name.clone(),
            });
        }
    }

    if let Some(endpoint) = &options.endpoint {
        return Ok(Transport::Rest {
            endpoint: endpoint.clone(),
            method: options.method.unwrap_or(HttpMethod::Post),
            default_payload: Map::new(),
        });
    }

    if let Some(descriptor) = descriptor {
        return Ok(descriptor.transport.clone());
    }

    Err(ConfigError::NoTransport(options.action_id.clone()))
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
