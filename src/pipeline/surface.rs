//! Text surfaces the pipeline reads from and publishes to.

use parking_lot::Mutex;

use crate::base::SurfaceLanguage;

/// An editable text pane.
pub trait TextSurface: Send + Sync {
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn set_language(&self, language: SurfaceLanguage);
}

/// Kind of typed data handed to the converter by another tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Xml,
    Xsd,
}

/// In-memory surface that counts how often text was set.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

#[derive(Debug, Default)]
struct SurfaceState {
    text: String,
    language: Option<SurfaceLanguage>,
    writes: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(SurfaceState {
                text: text.into(),
                ..SurfaceState::default()
            }),
        }
    }

    pub fn language(&self) -> Option<SurfaceLanguage> {
        self.state.lock().language
    }

    /// Number of `set_text` calls so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }
}

impl TextSurface for MemorySurface {
    fn text(&self) -> String {
        self.state.lock().text.clone()
    }

    fn set_text(&self, text: &str) {
        let mut state = self.state.lock();
        state.text = text.to_string();
        state.writes += 1;
    }

    fn set_language(&self, language: SurfaceLanguage) {
        self.state.lock().language = Some(language);
    }
}
