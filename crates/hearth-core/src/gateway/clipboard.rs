//! Clipboard delivery for "copy settings".

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Where copied text goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClipboardTarget {
    /// Terminal clipboard via an OSC 52 escape sequence on stdout.
    #[default]
    Terminal,
    /// Plain file, for headless sessions.
    File(PathBuf),
}

impl ClipboardTarget {
    pub fn copy(&self, text: &str) -> anyhow::Result<()> {
        match self {
            ClipboardTarget::Terminal => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(osc52_sequence(text).as_bytes())
                    .and_then(|_| stdout.flush())
                    .context("Failed to write clipboard escape sequence")
            }
            ClipboardTarget::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create clipboard directory: {}", parent.display())
                    })?;
                }
                std::fs::write(path, text)
                    .with_context(|| format!("Failed to write clipboard file: {}", path.display()))
            }
        }
    }
}

/// OSC 52 "set clipboard" sequence carrying `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
