//! Clipboard access for text controls.
//!
//! `Clipboard` wraps the system clipboard (through `arboard`) and keeps an
//! in-process copy of the last text it stored. When the system backend is
//! missing, as on headless machines, copy and paste keep working inside the
//! process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
}

/// Read the system clipboard as a `String`.
pub fn get() -> Result<String, ClipboardError> {
    let mut cb = arboard::Clipboard::new()?;
    cb.get_text().map_err(ClipboardError::from)
}

/// Set the system clipboard to `text`.
pub fn set(text: &str) -> Result<(), ClipboardError> {
    let mut cb = arboard::Clipboard::new()?;
    cb.set_text(text.to_owned()).map_err(ClipboardError::from)
}

/// Try to create a clipboard instance to detect availability.
pub fn available() -> bool {
    arboard::Clipboard::new().is_ok()
}

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    use_system: bool,
    local: String,
}

impl Clipboard {
    /// Clipboard backed by the system clipboard, falling back to the local
    /// copy when the backend fails.
    pub fn system() -> Self {
        Self {
            use_system: true,
            local: String::new(),
        }
    }

    /// System clipboard when a backend can be opened, local otherwise.
    pub fn detect() -> Self {
        if available() {
            Self::system()
        } else {
            tracing::info!("no system clipboard, using an in-process one");
            Self::local()
        }
    }

    /// Clipboard that never leaves the process.
    pub fn local() -> Self {
        Self::default()
    }

    pub fn uses_system(&self) -> bool {
        self.use_system
    }

    pub fn set_text(&mut self, text: &str) {
        if self.use_system
            && let Err(err) = set(text)
        {
            tracing::debug!(%err, "system clipboard unavailable, keeping text locally");
        }
        self.local = text.to_owned();
    }

    pub fn text(&self) -> String {
        if self.use_system {
            match get() {
                Ok(text) => return text,
                Err(err) => tracing::debug!(%err, "system clipboard read failed"),
            }
        }
        self.local.clone()
    }
}
