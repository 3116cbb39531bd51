//! Settings screen host: owns one buffer and flushes it through a gateway.
//!
//! Input is handled in turns. Every change event raised during a turn is
//! drained when the turn settles, and at most one write is issued for the
//! resulting state. A write only happens when the derived payload differs
//! from the last one written.

use tokio::sync::mpsc;

use super::buffer::{BufferEvent, LoadState, MountOptions, SettingsBuffer};
use super::payload::ConfigurationPayload;
use crate::context::Environment;
use crate::error::Result;
use crate::gateway::SettingsGateway;
use crate::scope::{NavigationContext, ScopeSelection, select_scope};

pub struct SettingsScreen<G: SettingsGateway> {
    gateway: G,
    buffer: SettingsBuffer,
    events: mpsc::UnboundedReceiver<BufferEvent>,
    last_flushed: Option<ConfigurationPayload>,
    flush_count: usize,
    write_notice: Option<String>,
}

impl<G: SettingsGateway> SettingsScreen<G> {
    /// Mount a screen for `nav`. The buffer starts in the loading state.
    pub fn mount(
        gateway: G,
        nav: &NavigationContext,
        options: MountOptions,
        env: Environment,
        language: &str,
    ) -> Self {
        let selection = select_scope(nav);
        let mut buffer = SettingsBuffer::new(selection, options, env, language);
        let events = buffer.subscribe();
        Self {
            gateway,
            buffer,
            events,
            last_flushed: None,
            flush_count: 0,
            write_notice: None,
        }
    }

    pub fn buffer(&self) -> &SettingsBuffer {
        &self.buffer
    }

    pub fn selection(&self) -> &ScopeSelection {
        self.buffer.selection()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// `true` while the loading indicator should be shown.
    pub fn is_loading(&self) -> bool {
        self.buffer.title().is_none()
    }

    pub fn load_state(&self) -> &LoadState {
        self.buffer.state()
    }

    /// Number of writes issued so far.
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Last write failure, shown as a dismissible notice.
    pub fn write_notice(&self) -> Option<&str> {
        self.write_notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.write_notice = None;
    }

    /// Load (or reload after a failure) and flush the loaded state once.
    pub async fn load(&mut self) -> bool {
        let applied = self.buffer.load(&self.gateway).await;
        self.settle();
        applied
    }

    /// Load without writing. The loaded state goes out with the next
    /// settled turn, so a load followed by one edit turn writes once.
    pub async fn load_deferred(&mut self) -> bool {
        self.buffer.load(&self.gateway).await
    }

    /// Run one input turn against the buffer, then settle.
    pub fn turn<R>(&mut self, f: impl FnOnce(&mut SettingsBuffer) -> R) -> R {
        let result = f(&mut self.buffer);
        self.settle();
        result
    }

    /// Apply several edits as a single turn.
    ///
    /// Every edit is parsed and checked first. If any is rejected the buffer
    /// is left as it was and nothing is written.
    pub fn edit<I, S>(&mut self, edits: I) -> Result<usize>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let edits = edits
            .into_iter()
            .map(|(name, value)| self.buffer.parse_edit(name.as_ref(), value.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        self.turn(|buffer| {
            let mut changed = 0;
            for (field, value) in edits {
                if buffer.set_field(field, value)? {
                    changed += 1;
                }
            }
            Ok(changed)
        })
    }

    /// Drain pending change events and write once if the payload moved.
    ///
    /// Returns whether a write was issued.
    pub fn settle(&mut self) -> bool {
        let mut pending = false;
        while let Ok(event) = self.events.try_recv() {
            tracing::trace!(?event, "buffer event");
            pending = true;
        }
        if !pending || !self.buffer.is_ready() {
            return false;
        }

        let payload = self.buffer.derive_payload();
        if self.last_flushed.as_ref() == Some(&payload) {
            return false;
        }

        let entity = self.buffer.entity_id();
        match self.gateway.write_configuration(&entity, &payload) {
            Ok(()) => {
                tracing::debug!(entity = %entity, "settings flushed");
                self.write_notice = None;
            }
            Err(error) => {
                tracing::error!(entity = %entity, "Failed to write settings: {:#}", error);
                self.write_notice = Some(format!("Settings could not be saved: {error:#}"));
            }
        }
        self.last_flushed = Some(payload);
        self.flush_count += 1;
        true
    }

    /// Copy `{ entityId, title, ...payload }` to the clipboard and return it.
    pub fn copy_to_clipboard(&self) -> anyhow::Result<String> {
        let text = self.buffer.clipboard_text()?;
        self.gateway.copy_to_clipboard(&text)?;
        Ok(text)
    }

    pub fn reveal_config_file(&self) -> anyhow::Result<()> {
        self.gateway.reveal_config_file(&self.buffer.entity_id())
    }

    /// Tear the screen down, releasing any pending load.
    pub fn close(mut self) -> G {
        self.buffer.release();
        self.events.close();
        self.gateway
    }
}
