//! Settings buffer: the in-memory, editable projection of one scope.
//!
//! A buffer is created when a settings screen mounts, populated by exactly
//! one successful load, mutated field by field, and discarded when the
//! screen goes away. Until the load completes the buffer has no title and
//! refuses edits; the title is the screen's only readiness signal.

use tokio::sync::mpsc;

use super::field_set::FieldSet;
use super::fields::{FieldName, FieldValue};
use super::payload::{ClipboardSnapshot, ConfigurationPayload};
use crate::context::Environment;
use crate::error::{Result, SettingsError};
use crate::gateway::SettingsGateway;
use crate::i18n;
use crate::scope::ScopeSelection;
use crate::types::{ConfigScope, EntityId, Runner};

/// Navigation state the screen was opened with, beyond the route itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountOptions {
    pub runner: Runner,
    pub is_linux_native: bool,
    pub is_mac_native: bool,
}

/// Read-only values computed from the environment or fetched metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedState {
    pub can_run_offline: bool,
    pub is_linux_native: bool,
    pub is_mac_native: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The load failed; the screen shows `reason` and offers a retry.
    Failed(String),
}

/// Events emitted synchronously as the buffer changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEvent {
    Loaded,
    FieldChanged(FieldName),
}

/// Identifies one load attempt. Completions carrying an outdated ticket are
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Everything a load needs, detached from the buffer so it can run while
/// the buffer keeps handling input.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    ticket: LoadTicket,
    scope: ConfigScope,
    runner: Runner,
    env: Environment,
    language: String,
}

#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub fields: FieldSet,
    pub title: String,
    pub can_run_offline: bool,
}

#[derive(Debug)]
pub struct LoadCompletion {
    ticket: LoadTicket,
    result: anyhow::Result<LoadedSettings>,
}

impl LoadRequest {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Fetch settings, and metadata for override scopes, concurrently.
    pub async fn run<G: SettingsGateway>(&self, gateway: &G) -> LoadCompletion {
        LoadCompletion {
            ticket: self.ticket,
            result: self.fetch(gateway).await,
        }
    }

    async fn fetch<G: SettingsGateway>(&self, gateway: &G) -> anyhow::Result<LoadedSettings> {
        let entity = self.scope.entity_id();
        tracing::debug!(entity = %entity, "loading settings");

        let (response, info) = match &self.scope {
            ConfigScope::Default => (gateway.request_settings(&entity).await, None),
            ConfigScope::Override(_) => {
                let (response, info) = tokio::join!(
                    gateway.request_settings(&entity),
                    gateway.request_entity_info(&entity, self.runner)
                );
                (response, Some(info))
            }
        };

        let fields = FieldSet::from_response(&response?, &self.env)?;
        let loaded = match info {
            Some(info) => {
                let info = info?;
                LoadedSettings {
                    fields,
                    title: info.title,
                    can_run_offline: info.can_run_offline,
                }
            }
            None => LoadedSettings {
                fields,
                title: i18n::global_settings_label(&self.language).to_string(),
                can_run_offline: true,
            },
        };
        Ok(loaded)
    }
}

impl LoadCompletion {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct SettingsBuffer {
    selection: ScopeSelection,
    options: MountOptions,
    env: Environment,
    language: String,
    fields: FieldSet,
    can_run_offline: bool,
    title: Option<String>,
    state: LoadState,
    generation: u64,
    released: bool,
    events: Option<mpsc::UnboundedSender<BufferEvent>>,
}

impl SettingsBuffer {
    /// Fields start at their defaults for `env` until the load replaces them.
    pub fn new(
        selection: ScopeSelection,
        options: MountOptions,
        env: Environment,
        language: impl Into<String>,
    ) -> Self {
        let fields = FieldSet::defaults(&env);
        Self {
            selection,
            options,
            env,
            language: language.into(),
            fields,
            can_run_offline: true,
            title: None,
            state: LoadState::Loading,
            generation: 0,
            released: false,
            events: None,
        }
    }

    /// Receive change events. A new subscription replaces the previous one;
    /// dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<BufferEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn selection(&self) -> &ScopeSelection {
        &self.selection
    }

    pub fn scope(&self) -> &ConfigScope {
        &self.selection.scope
    }

    pub fn entity_id(&self) -> EntityId {
        self.selection.entity_id()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.title.is_some() && !self.released
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn get(&self, field: FieldName) -> Option<FieldValue> {
        match field {
            FieldName::CanRunOffline => Some(FieldValue::Bool(self.can_run_offline)),
            FieldName::IsLinuxNative => Some(FieldValue::Bool(self.options.is_linux_native)),
            FieldName::IsMacNative => Some(FieldValue::Bool(self.options.is_mac_native)),
            _ => self.fields.get(field),
        }
    }

    pub fn derived(&self) -> DerivedState {
        DerivedState {
            can_run_offline: self.can_run_offline,
            is_linux_native: self.options.is_linux_native,
            is_mac_native: self.options.is_mac_native,
        }
    }

    pub fn is_proton(&self) -> bool {
        self.fields.wine_version.is_proton()
    }

    /// Save sync resolves paths inside a Proton prefix on non-Windows hosts.
    pub fn sync_uses_proton_prefix(&self) -> bool {
        !self.env.platform().is_windows() && self.is_proton()
    }

    /// Start a load attempt. Any earlier attempt becomes stale.
    pub fn begin_load(&mut self) -> LoadRequest {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadRequest {
            ticket: LoadTicket {
                generation: self.generation,
            },
            scope: self.selection.scope.clone(),
            runner: self.options.runner,
            env: self.env.clone(),
            language: self.language.clone(),
        }
    }

    /// Apply a finished load. Returns `false` if the completion was stale or
    /// the buffer has been released, in which case nothing changes.
    pub fn complete_load(&mut self, completion: LoadCompletion) -> bool {
        if self.released || completion.ticket.generation != self.generation {
            tracing::warn!(
                entity = %self.entity_id(),
                "discarding stale settings load"
            );
            return false;
        }

        match completion.result {
            Ok(loaded) => {
                self.fields = loaded.fields;
                self.can_run_offline = loaded.can_run_offline;
                self.title = Some(loaded.title);
                self.state = LoadState::Ready;
                for issue in self.fields.issues() {
                    tracing::warn!(field = %issue.field, "{}", issue.message);
                }
                tracing::debug!(entity = %self.entity_id(), "settings loaded");
                self.emit(BufferEvent::Loaded);
            }
            Err(error) => {
                tracing::error!(entity = %self.entity_id(), "Failed to load settings: {:#}", error);
                self.state = LoadState::Failed(format!("{error:#}"));
            }
        }
        true
    }

    /// Load through `gateway`: `begin_load`, run, `complete_load`.
    pub async fn load<G: SettingsGateway>(&mut self, gateway: &G) -> bool {
        let request = self.begin_load();
        let completion = request.run(gateway).await;
        self.complete_load(completion)
    }

    /// Stop accepting load completions and edits. Called on screen teardown.
    pub fn release(&mut self) {
        self.released = true;
        self.events = None;
    }

    /// Overwrite one field. Values are type-checked only; out-of-range
    /// numbers are stored as given and reported through `FieldSet::issues`.
    pub fn set_field(&mut self, field: FieldName, value: FieldValue) -> Result<bool> {
        self.check_editable(field)?;

        let changed = self.fields.set(field, value)?;
        if changed {
            for issue in self.fields.issues().into_iter().filter(|i| i.field == field) {
                tracing::warn!(field = %field, "{}", issue.message);
            }
            self.emit(BufferEvent::FieldChanged(field));
        }
        Ok(changed)
    }

    /// Parse `input` for the field named `name` and set it.
    pub fn set_field_str(&mut self, name: &str, input: &str) -> Result<bool> {
        let (field, value) = self.parse_edit(name, input)?;
        self.set_field(field, value)
    }

    /// Check that `field` can be edited right now, without touching it.
    pub fn check_editable(&self, field: FieldName) -> Result<()> {
        if !self.is_ready() {
            return Err(SettingsError::NotReady);
        }
        if field.is_derived() {
            return Err(SettingsError::ReadOnlyField(field));
        }
        if !field.membership().allowed_in(self.scope()) {
            return Err(SettingsError::OutOfScope {
                field,
                scope: scope_label(self.scope()),
            });
        }
        Ok(())
    }

    /// Resolve and parse one textual edit. Fails with the same errors
    /// `set_field_str` would, but leaves the buffer untouched.
    pub fn parse_edit(&self, name: &str, input: &str) -> Result<(FieldName, FieldValue)> {
        let field = FieldName::try_from(name)?;
        self.check_editable(field)?;
        let value = FieldValue::parse(field, input)?;
        Ok((field, value))
    }

    /// Flip a boolean field.
    pub fn toggle(&mut self, field: FieldName) -> Result<bool> {
        match self.fields.get(field) {
            Some(FieldValue::Bool(current)) => self.set_field(field, FieldValue::Bool(!current)),
            _ => Err(SettingsError::TypeMismatch {
                field,
                expected: field.kind(),
            }),
        }
    }

    /// Add `delta` to an integer field.
    pub fn step(&mut self, field: FieldName, delta: i64) -> Result<bool> {
        match self.fields.get(field) {
            Some(FieldValue::Integer(current)) => {
                self.set_field(field, FieldValue::Integer(current.saturating_add(delta)))
            }
            _ => Err(SettingsError::TypeMismatch {
                field,
                expected: field.kind(),
            }),
        }
    }

    pub fn derive_payload(&self) -> ConfigurationPayload {
        ConfigurationPayload::derive(self.scope(), &self.fields)
    }

    /// The clipboard text for "copy settings", built from the same payload a
    /// flush would send.
    pub fn clipboard_text(&self) -> Result<String> {
        let title = self.title.as_deref().ok_or(SettingsError::NotReady)?;
        let entity = self.entity_id();
        let payload = self.derive_payload();
        ClipboardSnapshot::new(&entity, title, &payload)
            .to_json()
            .map_err(|e| SettingsError::Malformed(e.to_string()))
    }

    fn emit(&self, event: BufferEvent) {
        if let Some(tx) = &self.events {
            // A closed receiver means the host unsubscribed.
            let _ = tx.send(event);
        }
    }
}

fn scope_label(scope: &ConfigScope) -> &'static str {
    match scope {
        ConfigScope::Default => "default",
        ConfigScope::Override(_) => "override",
    }
}
