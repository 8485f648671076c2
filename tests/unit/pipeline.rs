use super::*;
use crate::library::DirectoryLibrary;
use crate::playback::NullPresenter;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_pipeline").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn default_config_is_valid() {
    let cfg = PipelineConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.duration, Duration::from_secs(5));
    assert_eq!(cfg.fps, Fps::new(30, 1).unwrap());
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: PipelineConfig = serde_json::from_str(
        r#"{ "canvas": { "width": 320, "height": 240 }, "duration": { "value": 5, "timescale": 2 } }"#,
    )
    .unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas.width, 320);
    assert_eq!(cfg.duration, Duration::new(5, 2).unwrap());
    assert_eq!(cfg.output_name, "clip");
}

#[test]
fn unknown_fields_are_rejected() {
    let res = serde_json::from_str::<PipelineConfig>(r#"{ "frobnicate": true }"#);
    assert!(res.is_err());
}

#[test]
fn invalid_settings_are_invalid_input() {
    let odd = PipelineConfig {
        canvas: Canvas {
            width: 641,
            height: 480,
        },
        ..PipelineConfig::default()
    };
    assert!(matches!(odd.validate(), Err(StillclipError::InvalidInput(_))));

    let unset = PipelineConfig {
        duration: Duration::INVALID,
        ..PipelineConfig::default()
    };
    assert!(unset.validate().is_err());

    let nested = PipelineConfig {
        output_name: "../escape".to_string(),
        ..PipelineConfig::default()
    };
    assert!(nested.validate().is_err());

    let zero_fps = PipelineConfig {
        fps: Fps { num: 0, den: 1 },
        ..PipelineConfig::default()
    };
    let library = DirectoryLibrary::new("target/unit_pipeline/unused");
    assert!(Pipeline::new(zero_fps, &library, &NullPresenter).is_err());
}

#[test]
fn config_file_round_trip_and_missing_file() {
    let dir = scratch_dir("config");
    let path = dir.join("config.json");
    let cfg = PipelineConfig {
        output_name: "holiday".to_string(),
        ..PipelineConfig::default()
    };
    std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();
    assert_eq!(PipelineConfig::from_path(&path).unwrap(), cfg);

    let err = PipelineConfig::from_path(&dir.join("absent.json")).unwrap_err();
    assert!(matches!(err, StillclipError::InvalidInput(_)));
}

#[test]
fn missing_image_fails_in_the_render_stage() {
    let dir = scratch_dir("missing_image");
    let library = DirectoryLibrary::new(dir.join("library"));
    let cfg = PipelineConfig {
        work_dir: dir.join("work"),
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(cfg, &library, &NullPresenter).unwrap();
    let err = pipeline
        .run(&PipelineRequest {
            image: dir.join("absent.png"),
            audio: dir.join("absent.wav"),
        })
        .unwrap_err();
    assert!(matches!(err, StillclipError::Render(_)));
    assert!(!dir.join("library").exists());
}
