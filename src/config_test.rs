#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn blank_input_gives_defaults() {
    for raw in ["", "   ", "\n"] {
        assert_eq!(LessonConfig::from_json(raw).unwrap(), LessonConfig::default());
    }
}

#[test]
fn empty_object_gives_defaults() {
    let config = LessonConfig::from_json("{}").unwrap();
    assert_eq!(config.cell_size, 40.0);
    assert_eq!(config.margin, 40.0);
    assert_eq!(config.plan, LessonPlan::Full);
    assert_eq!(config.log_level, "info");
}

#[test]
fn partial_object_overrides_named_fields() {
    let config = LessonConfig::from_json(r#"{"plan": "multi_mirror", "cell_size": 30}"#).unwrap();
    assert_eq!(config.plan, LessonPlan::MultiMirror);
    assert_eq!(config.cell_size, 30.0);
    assert_eq!(config.margin, 40.0);
}

#[test]
fn camera_uses_config_and_fixed_grid() {
    let config = LessonConfig::from_json(r#"{"cell_size": 20, "margin": 10}"#).unwrap();
    let camera = config.camera();
    assert_eq!(camera.grid_width, 16);
    assert_eq!(camera.grid_height, 12);
    assert_eq!(camera.surface_size(), (340.0, 260.0));
}

#[test]
fn default_camera_matches_camera_default() {
    assert_eq!(LessonConfig::default().camera(), Camera::default());
}

#[test]
fn malformed_json_is_config_error() {
    assert!(matches!(LessonConfig::from_json("{"), Err(LessonError::Config(_))));
    assert!(matches!(LessonConfig::from_json("[]"), Err(LessonError::Config(_))));
}

#[test]
fn unknown_plan_is_config_error() {
    assert!(matches!(LessonConfig::from_json(r#"{"plan": "triple"}"#), Err(LessonError::Config(_))));
}

#[test]
fn non_positive_cell_size_rejected() {
    for raw in [r#"{"cell_size": 0}"#, r#"{"cell_size": -5}"#] {
        assert!(matches!(LessonConfig::from_json(raw), Err(LessonError::InvalidConfig(_))), "{raw}");
    }
}

#[test]
fn negative_margin_rejected_zero_allowed() {
    assert!(matches!(LessonConfig::from_json(r#"{"margin": -1}"#), Err(LessonError::InvalidConfig(_))));
    assert_eq!(LessonConfig::from_json(r#"{"margin": 0}"#).unwrap().margin, 0.0);
}

#[test]
fn non_finite_values_rejected_by_validate() {
    let config = LessonConfig { cell_size: f64::INFINITY, ..LessonConfig::default() };
    assert!(matches!(config.validate(), Err(LessonError::InvalidConfig(_))));
    let config = LessonConfig { margin: f64::NAN, ..LessonConfig::default() };
    assert!(matches!(config.validate(), Err(LessonError::InvalidConfig(_))));
}

#[test]
fn log_level_parsing() {
    let config = LessonConfig::from_json(r#"{"log_level": "DEBUG"}"#).unwrap();
    assert_eq!(config.level().unwrap(), log::Level::Debug);

    let err = LessonConfig::from_json(r#"{"log_level": "loud"}"#).unwrap_err();
    assert!(err.to_string().contains("loud"));
}
