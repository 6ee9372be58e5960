// tests/config_loading.rs
use esg_scoring_engine::config::{ScoringConfig, ENV_SCORING_CONFIG_PATH};
use esg_scoring_engine::error::ConfigError;
use std::{env, fs};

const CUSTOM: &str = r#"
[scoring]
decay_factor = 0.8
reference_period_days = 180.0
lookback_window_days = 90

[sectors.default]
E = 1.0
S = 1.0
G = 1.0

[sectors.Cement]
E = 0.6
S = 0.2
G = 0.2
"#;

#[test]
fn repo_config_file_matches_builtin_defaults() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/scoring.toml");
    let from_file = ScoringConfig::from_path(&path).unwrap();
    assert_eq!(from_file, ScoringConfig::default());
}

#[test]
fn partial_scoring_section_keeps_defaults() {
    let cfg = ScoringConfig::from_toml_str(CUSTOM).unwrap();
    assert_eq!(cfg.params().decay_factor, 0.8);
    assert_eq!(cfg.params().lookback_window_days, 90);
    assert_eq!(cfg.params().penalty_scale, 0.5);
    assert_eq!(cfg.tiers().critical, 9);
    assert!(!cfg.sectors().resolve("Cement").fallback);
}

#[test]
fn invalid_files_are_rejected_with_typed_errors() {
    let no_default = r#"
[sectors.IT]
E = 0.3
S = 0.4
G = 0.3
"#;
    assert!(matches!(
        ScoringConfig::from_toml_str(no_default),
        Err(ConfigError::MissingDefaultSector)
    ));

    let zero_sum = r#"
[sectors.default]
E = 0.0
S = 0.0
G = 0.0
"#;
    assert!(matches!(
        ScoringConfig::from_toml_str(zero_sum),
        Err(ConfigError::NonPositiveWeightSum { .. })
    ));

    let bad_decay = format!("[scoring]\ndecay_factor = 1.5\n{CUSTOM_SECTORS}");
    assert!(matches!(
        ScoringConfig::from_toml_str(&bad_decay),
        Err(ConfigError::OutOfRange {
            name: "decay_factor",
            ..
        })
    ));

    let bad_tiers = format!("[controversy.tiers]\nmoderate = 8\nsevere = 7\ncritical = 9\n{CUSTOM_SECTORS}");
    assert!(matches!(
        ScoringConfig::from_toml_str(&bad_tiers),
        Err(ConfigError::InvalidTierBounds { .. })
    ));

    let overflowing = r#"
[sectors.default]
E = 1e308
S = 1e308
G = 0.0
"#;
    assert!(matches!(
        ScoringConfig::from_toml_str(overflowing),
        Err(ConfigError::WeightSumOverflow { .. })
    ));

    assert!(matches!(
        ScoringConfig::from_toml_str("not = [valid"),
        Err(ConfigError::Parse(_))
    ));
}

const CUSTOM_SECTORS: &str = r#"
[sectors.default]
E = 0.33
S = 0.33
G = 0.34
"#;

#[serial_test::serial]
#[test]
fn load_uses_env_then_default_path_then_builtin() {
    // Isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_SCORING_CONFIG_PATH);

    // 1) Nothing on disk -> built-in
    let builtin = ScoringConfig::load().unwrap();
    assert_eq!(builtin, ScoringConfig::default());

    // 2) ./config/scoring.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("scoring.toml"), CUSTOM).unwrap();
    let from_default_path = ScoringConfig::load().unwrap();
    assert_eq!(from_default_path.params().decay_factor, 0.8);

    // 3) ENV wins
    let p_env = tmp.path().join("override.toml");
    fs::write(
        &p_env,
        format!("[scoring]\npenalty_scale = 0.25\n{CUSTOM_SECTORS}"),
    )
    .unwrap();
    env::set_var(ENV_SCORING_CONFIG_PATH, p_env.display().to_string());
    let from_env = ScoringConfig::load().unwrap();
    assert_eq!(from_env.params().penalty_scale, 0.25);
    assert_eq!(from_env.params().decay_factor, 0.5);

    // 4) ENV pointing nowhere is an error, not a silent fallback
    env::set_var(
        ENV_SCORING_CONFIG_PATH,
        tmp.path().join("missing.toml").display().to_string(),
    );
    assert!(matches!(
        ScoringConfig::load(),
        Err(ConfigError::MissingFile { .. })
    ));

    env::remove_var(ENV_SCORING_CONFIG_PATH);
    env::set_current_dir(&old).unwrap();
}
