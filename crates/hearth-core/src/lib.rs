//! Hearth Core Library
//!
//! Settings reconciliation for the Hearth game launcher: which configuration
//! scope a screen edits, how edits are buffered, and what gets persisted for
//! the global defaults versus a single game's overrides.

pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod i18n;
pub mod scope;
pub mod settings;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Scope
    pub use crate::scope::{
        ContextAction, NavigationContext, ReturnTarget, ScopeSelection, SettingsCategory,
        select_scope,
    };
    pub use crate::types::{ConfigScope, EntityId, Platform, Runner};

    // Settings
    pub use crate::settings::{
        ConfigurationPayload, FieldName, FieldSet, FieldValue, LoadState, Membership,
        MountOptions, SettingsBuffer, SettingsScreen, WineInstallation, WineKind,
    };

    // Gateway
    pub use crate::gateway::{EntityInfo, LocalGateway, SettingsGateway};

    // Context
    pub use crate::context::{AppContext, Environment};
    pub use crate::error::SettingsError;
}
