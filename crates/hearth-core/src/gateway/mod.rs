//! Persistence gateway: the boundary between the settings screen and the
//! backend that stores configuration.

pub mod clipboard;
pub mod local;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::settings::ConfigurationPayload;
use crate::types::{EntityId, Runner};

pub use local::LocalGateway;

/// Metadata fetched alongside an override scope's settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfo {
    pub title: String,
    #[serde(default = "default_can_run_offline")]
    pub can_run_offline: bool,
}

fn default_can_run_offline() -> bool {
    true
}

/// Backend operations the settings screen depends on.
///
/// Requests are async and one-shot; dropping the returned future releases
/// it. Writes and auxiliary actions are fire-and-forget: callers log
/// failures but never retry them.
#[allow(async_fn_in_trait)]
pub trait SettingsGateway {
    /// Stored settings record for `entity` (`"default"` for the global scope).
    async fn request_settings(&self, entity: &EntityId) -> anyhow::Result<Map<String, Value>>;

    /// Title and capability flags; only requested for override scopes.
    async fn request_entity_info(
        &self,
        entity: &EntityId,
        runner: Runner,
    ) -> anyhow::Result<EntityInfo>;

    /// Persist `payload`. Named fields replace stored ones; unknown stored
    /// keys are preserved.
    fn write_configuration(
        &self,
        entity: &EntityId,
        payload: &ConfigurationPayload,
    ) -> anyhow::Result<()>;

    fn reveal_config_file(&self, entity: &EntityId) -> anyhow::Result<()>;

    fn copy_to_clipboard(&self, text: &str) -> anyhow::Result<()>;
}
