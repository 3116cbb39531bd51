//! Settings model: field catalog, field set, payloads and the edit buffer.

pub mod buffer;
pub mod field_set;
pub mod fields;
pub mod payload;
pub mod screen;
pub mod wine;

pub use buffer::{
    BufferEvent, DerivedState, LoadCompletion, LoadRequest, LoadState, LoadTicket, MountOptions,
    SettingsBuffer,
};
pub use field_set::{FieldIssue, FieldSet};
pub use fields::{FieldKind, FieldName, FieldValue, Membership};
pub use payload::{ClipboardSnapshot, ConfigurationPayload, GameSettings, GlobalSettings};
pub use screen::SettingsScreen;
pub use wine::{WineInstallation, WineKind};
