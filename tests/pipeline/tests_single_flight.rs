#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use tempfile::TempDir;
use tokio::runtime::Handle;
use xmlxsd::{
    ConversionDirection, ConversionPipeline, ConverterSettings, IndentationStyle, JsonSettingsStore,
    MemorySurface, SettingsStore, TextSurface,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_burst_of_edits_publishes_last_input() {
    let input = Arc::new(MemorySurface::with_text(""));
    let output = Arc::new(MemorySurface::new());
    let pipeline = ConversionPipeline::new(
        input.clone(),
        output.clone(),
        ConverterSettings::default(),
        Handle::current(),
    );

    let mut handles = Vec::new();
    for i in 0..20 {
        input.set_text(&format!("<item{i}><value>{i}</value></item{i}>"));
        handles.push(pipeline.on_input_changed());
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let text = output.text();
    assert!(text.contains(r#"name="item19""#), "{text}");
    assert!(output.write_count() >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_right_after_trigger() {
    let input = Arc::new(MemorySurface::with_text("<root/>"));
    let output = Arc::new(MemorySurface::new());
    let pipeline = ConversionPipeline::new(
        input,
        output.clone(),
        ConverterSettings::default(),
        Handle::current(),
    );

    let handle = pipeline.on_input_changed();
    pipeline.cancel();
    handle.await.unwrap();

    assert_eq!(output.write_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_settings_survive_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("xmlxsd.json");

    {
        let store = Arc::new(JsonSettingsStore::new(&path));
        let pipeline = ConversionPipeline::with_store(
            Arc::new(MemorySurface::new()),
            Arc::new(MemorySurface::new()),
            store,
            Handle::current(),
        )
        .unwrap();
        pipeline
            .on_indentation_changed(IndentationStyle::OneTab)
            .await
            .unwrap();
        pipeline
            .on_direction_changed(ConversionDirection::SchemaToXml)
            .await
            .unwrap();
    }

    let restored = JsonSettingsStore::new(&path).load().unwrap();
    assert_eq!(restored.indentation, IndentationStyle::OneTab);
    assert_eq!(restored.direction, ConversionDirection::SchemaToXml);

    let pipeline = ConversionPipeline::with_store(
        Arc::new(MemorySurface::new()),
        Arc::new(MemorySurface::new()),
        Arc::new(JsonSettingsStore::new(&path)),
        Handle::current(),
    )
    .unwrap();
    assert_eq!(pipeline.settings(), restored);
}
