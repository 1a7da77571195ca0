use snapcanvas_app::{AppConfig, Script, Session};
use snapcanvas_core::storage::MemoryStorage;
use std::sync::Arc;

/// 800x600 canvas at 100% zoom. The first rectangle spawns at (344, 244)
/// and spans 112 logical pixels.
fn config() -> AppConfig {
    let mut config = AppConfig {
        width: 800,
        height: 600,
        ..AppConfig::default()
    };
    config.editor.initial_zoom = 1.0;
    config
}

fn run(config: &AppConfig, json: &str) -> snapcanvas_core::CanvasSnapshot {
    let script = Script::from_json(json).unwrap();
    let mut session = Session::new(config, Arc::new(MemoryStorage::new()));
    session.run(&script)
}

#[test]
fn test_spawn_is_centered() {
    let snapshot = run(&config(), r#"[{"type": "addRectangle"}]"#);
    let shape = &snapshot.shapes[0];
    assert_eq!(shape.id.as_str(), "shape-1");
    assert!((shape.x - 344.0).abs() < 1e-9);
    assert!((shape.y - 244.0).abs() < 1e-9);
    assert!((shape.style.width - 112.0).abs() < 1e-9);
}

#[test]
fn test_drag_snaps_and_clears_guides() {
    let snapshot = run(
        &config(),
        r#"[
            {"type": "addRectangle"},
            {"type": "pointerDown", "x": 360, "y": 260, "time": 0},
            {"type": "pointerMove", "x": 380, "y": 260, "time": 16},
            {"type": "pointerUp", "x": 380, "y": 260, "time": 20}
        ]"#,
    );
    let shape = &snapshot.shapes[0];
    assert!((shape.x - 364.0).abs() < 1e-9);
    assert!((shape.y - 245.0).abs() < 1e-9);
    assert!(snapshot.guides.is_empty());
    assert!(snapshot.focused.is_none());
}

#[test]
fn test_click_then_delete() {
    let snapshot = run(
        &config(),
        r#"[
            {"type": "addRectangle"},
            {"type": "pointerDown", "x": 400, "y": 300, "time": 0},
            {"type": "pointerUp", "x": 401, "y": 300, "time": 60},
            {"type": "key", "key": "Delete", "time": 100}
        ]"#,
    );
    assert!(snapshot.shapes.is_empty());
    assert!(snapshot.focused.is_none());
}

#[test]
fn test_resize_from_handle() {
    let snapshot = run(
        &config(),
        r#"[
            {"type": "addRectangle"},
            {"type": "pointerDown", "x": 450, "y": 350, "time": 0},
            {"type": "pointerMove", "x": 478, "y": 350, "time": 16},
            {"type": "tick", "time": 32},
            {"type": "pointerUp", "x": 478, "y": 350, "time": 40}
        ]"#,
    );
    let style = &snapshot.shapes[0].style;
    assert!((style.width - 140.0).abs() < 1e-9);
    assert!((style.height - 112.0).abs() < 1e-9);
}

#[test]
fn test_zoom_settles_and_output_layout() {
    let snapshot = run(
        &config(),
        r#"[
            {"type": "requestZoom", "zoom": 2.0, "time": 0},
            {"type": "requestZoom", "zoom": 1.5, "time": 20},
            {"type": "tick", "time": 59},
            {"type": "tick", "time": 60}
        ]"#,
    );
    assert!((snapshot.zoom - 1.5).abs() < f64::EPSILON);
    // Center (400, 300) stays fixed: pan = c - c * 1.5.
    assert!((snapshot.pan.x + 200.0).abs() < 1e-9);
    assert!((snapshot.pan.y + 150.0).abs() < 1e-9);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(snapshot.zoom_percent, 150);
    for key in ["shapes", "focused", "zoom", "zoomPercent", "pan", "grid", "guides"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn test_secondary_release_ends_drag() {
    let snapshot = run(
        &config(),
        r#"[
            {"type": "addRectangle"},
            {"type": "pointerDown", "x": 360, "y": 260, "time": 0},
            {"type": "pointerUp", "x": 360, "y": 260, "time": 20, "button": "right"},
            {"type": "pointerMove", "x": 420, "y": 260, "time": 40}
        ]"#,
    );
    let shape = &snapshot.shapes[0];
    assert!((shape.x - 344.0).abs() < 1e-9);
    assert!(snapshot.focused.is_none());
}

#[test]
fn test_content_centered_on_start() {
    let mut config = config();
    config.editor.content_size = Some(kurbo::Size::new(1000.0, 800.0));
    let snapshot = run(&config, r#"[{"type": "addRectangle"}]"#);

    assert!((snapshot.pan.x + 100.0).abs() < 1e-9);
    assert!((snapshot.pan.y + 100.0).abs() < 1e-9);
    let shape = &snapshot.shapes[0];
    assert!((shape.x - 444.0).abs() < 1e-9);
    assert!((shape.y - 344.0).abs() < 1e-9);
}

#[test]
fn test_shapes_persist_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        persist: true,
        storage_dir: Some(dir.path().to_path_buf()),
        ..config()
    };
    let script = Script::from_json(r#"[{"type": "addRectangle"}, {"type": "addRectangle"}]"#).unwrap();

    let mut first = Session::new(&config, config.open_storage().unwrap());
    first.run(&script);

    let mut second = Session::new(&config, config.open_storage().unwrap());
    let snapshot = second.run(&Script::default());
    assert_eq!(snapshot.shapes.len(), 2);
    assert_eq!(snapshot.shapes[1].id.as_str(), "shape-2");
}
