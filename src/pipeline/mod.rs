//! Single-flight conversion pipeline.
//!
//! Every trigger supersedes the previous one:
//!
//! ```text
//! trigger ─▶ cancel previous token ─▶ new token ─▶ spawn task
//!                                                  │
//!        ┌─────────────────────────────────────────┘
//!        ▼
//!   wait for slot ──(token cancelled)──▶ drop
//!        │
//!        ▼
//!   spawn_blocking(convert) ─▶ result ─▶ token still current? ─▶ publish
//!        │                                         │ no
//!        └──────────── slot released ◀──── drop ◀──┘
//! ```
//!
//! The slot is an async mutex held for the whole conversion body, so two
//! bodies never overlap and a stale attempt can never publish after a newer
//! one. Triggers are expected from one interactive thread; they only swap the
//! current token and spawn.

mod surface;


use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::base::{ConversionDirection, ConversionResult, IndentationStyle};
use crate::convert::{convert_with, invalid_input_message};
use crate::settings::{ConverterSettings, SettingsError, SettingsStore};

pub use surface::{DataKind, MemorySurface, TextSurface};

/// Owns the current cancellation token and the execution slot.
pub struct ConversionPipeline {
    input: Arc<dyn TextSurface>,
    output: Arc<dyn TextSurface>,
    settings: RwLock<ConverterSettings>,
    store: Option<Arc<dyn SettingsStore>>,
    current: Mutex<Option<CancellationToken>>,
    slot: Arc<tokio::sync::Mutex<()>>,
    runtime: Handle,
}

impl ConversionPipeline {
    /// Create a pipeline that spawns onto `runtime`.
    pub fn new(
        input: Arc<dyn TextSurface>,
        output: Arc<dyn TextSurface>,
        settings: ConverterSettings,
        runtime: Handle,
    ) -> Self {
        input.set_language(settings.direction.input_language());
        output.set_language(settings.direction.output_language());
        Self {
            input,
            output,
            settings: RwLock::new(settings),
            store: None,
            current: Mutex::new(None),
            slot: Arc::new(tokio::sync::Mutex::new(())),
            runtime,
        }
    }

    /// Create a pipeline whose settings are loaded from and persisted to `store`.
    pub fn with_store(
        input: Arc<dyn TextSurface>,
        output: Arc<dyn TextSurface>,
        store: Arc<dyn SettingsStore>,
        runtime: Handle,
    ) -> Result<Self, SettingsError> {
        let settings = store.load()?;
        let mut pipeline = Self::new(input, output, settings, runtime);
        pipeline.store = Some(store);
        Ok(pipeline)
    }

    pub fn settings(&self) -> ConverterSettings {
        *self.settings.read()
    }

    /// The input text was edited.
    pub fn on_input_changed(&self) -> JoinHandle<()> {
        self.trigger()
    }

    pub fn on_indentation_changed(&self, indentation: IndentationStyle) -> JoinHandle<()> {
        self.update_settings(|settings| settings.indentation = indentation);
        self.trigger()
    }

    /// Switch direction: the current output becomes the new input and the
    /// surface labels swap.
    pub fn on_direction_changed(&self, direction: ConversionDirection) -> JoinHandle<()> {
        self.update_settings(|settings| settings.direction = direction);
        self.input.set_text(&self.output.text());
        self.apply_languages(direction);
        self.trigger()
    }

    /// Typed data arrived from elsewhere: pick the matching direction and
    /// convert it.
    pub fn on_data_received(&self, kind: DataKind, text: &str) -> JoinHandle<()> {
        let direction = match kind {
            DataKind::Xml => ConversionDirection::XmlToSchema,
            DataKind::Xsd => ConversionDirection::SchemaToXml,
        };
        self.update_settings(|settings| settings.direction = direction);
        self.apply_languages(direction);
        self.input.set_text(text);
        self.trigger()
    }

    /// Cancel the in-flight attempt, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.current.lock().take() {
            token.cancel();
            tracing::debug!("in-flight conversion cancelled");
        }
    }

    fn trigger(&self) -> JoinHandle<()> {
        let token = CancellationToken::new();
        if let Some(previous) = self.current.lock().replace(token.clone()) {
            previous.cancel();
            tracing::trace!("previous conversion superseded");
        }

        let input = self.input.text();
        let settings = self.settings();
        tracing::debug!(
            direction = ?settings.direction,
            len = input.len(),
            "conversion triggered"
        );

        self.runtime.spawn(run(
            input,
            settings,
            token,
            self.slot.clone(),
            self.output.clone(),
        ))
    }

    fn update_settings(&self, change: impl FnOnce(&mut ConverterSettings)) {
        let settings = {
            let mut settings = self.settings.write();
            change(&mut settings);
            *settings
        };
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&settings) {
                tracing::warn!(error = %e, "failed to persist converter settings");
            }
        }
    }

    fn apply_languages(&self, direction: ConversionDirection) {
        self.input.set_language(direction.input_language());
        self.output.set_language(direction.output_language());
    }
}

/// One conversion attempt: wait for the slot, convert off the async
/// workers, publish unless superseded.
async fn run(
    input: String,
    settings: ConverterSettings,
    token: CancellationToken,
    slot: Arc<tokio::sync::Mutex<()>>,
    output: Arc<dyn TextSurface>,
) {
    let _slot = tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::trace!("cancelled while waiting for the slot");
            return;
        }
        guard = slot.lock_owned() => guard,
    };

    let direction = settings.direction;
    let options = settings.options();
    let worker_token = token.clone();
    let work = tokio::task::spawn_blocking(move || {
        convert_with(&input, direction, &options, &worker_token)
    });

    let result = match work.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(
                operation = direction.operation_tag(),
                error = %e,
                "conversion task failed"
            );
            (!token.is_cancelled())
                .then(|| ConversionResult::failure(invalid_input_message(direction)))
        }
    };

    let Some(result) = result else {
        tracing::trace!("cancelled result dropped");
        return;
    };
    if token.is_cancelled() {
        tracing::trace!("stale result dropped");
        return;
    }

    output.set_text(&result.text);
    tracing::debug!(succeeded = result.succeeded, "conversion result published");
}
