//! In-memory gateway double shared by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::{Map, Value};

use hearth_core::context::Environment;
use hearth_core::gateway::{EntityInfo, SettingsGateway};
use hearth_core::settings::ConfigurationPayload;
use hearth_core::types::{EntityId, Platform, Runner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Settings(String),
    EntityInfo(String, Runner),
}

#[derive(Default)]
pub struct FakeGateway {
    settings: HashMap<String, Map<String, Value>>,
    infos: HashMap<String, EntityInfo>,
    fail_settings: Cell<bool>,
    fail_writes: bool,
    pub requests: RefCell<Vec<Request>>,
    pub writes: RefCell<Vec<(EntityId, Map<String, Value>)>>,
    pub clipboard: RefCell<Vec<String>>,
    pub revealed: RefCell<Vec<EntityId>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, entity: &str, response: Value) -> Self {
        let Value::Object(map) = response else {
            panic!("settings response must be an object");
        };
        self.settings.insert(entity.to_string(), map);
        self
    }

    pub fn with_info(mut self, entity: &str, title: &str, can_run_offline: bool) -> Self {
        self.infos.insert(
            entity.to_string(),
            EntityInfo {
                title: title.to_string(),
                can_run_offline,
            },
        );
        self
    }

    pub fn failing_settings(self) -> Self {
        self.fail_settings.set(true);
        self
    }

    /// Let subsequent settings requests succeed again.
    pub fn recover(&self) {
        self.fail_settings.set(false);
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn info_requests(&self) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| matches!(r, Request::EntityInfo(..)))
            .count()
    }

    pub fn last_write(&self) -> Option<(EntityId, Map<String, Value>)> {
        self.writes.borrow().last().cloned()
    }
}

impl SettingsGateway for FakeGateway {
    async fn request_settings(&self, entity: &EntityId) -> anyhow::Result<Map<String, Value>> {
        self.requests
            .borrow_mut()
            .push(Request::Settings(entity.to_string()));
        if self.fail_settings.get() {
            anyhow::bail!("backend unreachable");
        }
        Ok(self.settings.get(entity.as_str()).cloned().unwrap_or_default())
    }

    async fn request_entity_info(
        &self,
        entity: &EntityId,
        runner: Runner,
    ) -> anyhow::Result<EntityInfo> {
        self.requests
            .borrow_mut()
            .push(Request::EntityInfo(entity.to_string(), runner));
        self.infos
            .get(entity.as_str())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown entity {entity}"))
    }

    fn write_configuration(
        &self,
        entity: &EntityId,
        payload: &ConfigurationPayload,
    ) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("disk full");
        }
        self.writes
            .borrow_mut()
            .push((entity.clone(), payload.to_map()?));
        Ok(())
    }

    fn reveal_config_file(&self, entity: &EntityId) -> anyhow::Result<()> {
        self.revealed.borrow_mut().push(entity.clone());
        Ok(())
    }

    fn copy_to_clipboard(&self, text: &str) -> anyhow::Result<()> {
        self.clipboard.borrow_mut().push(text.to_string());
        Ok(())
    }
}

pub fn linux_env() -> Environment {
    Environment::new(PathBuf::from("/home/player"), Platform::Linux)
}
