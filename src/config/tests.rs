use std::io::Write;

use super::*;

fn env(vars: &[(&str, &str)]) -> Environment {
    let source: config::Map<String, String> = vars
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    environment().source(Some(source))
}

fn empty_env() -> Environment {
    env(&[])
}

fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config file");
    file.write_all(contents.as_bytes())
        .expect("write temp config file");
    file
}

#[test]
fn defaults_without_sources() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.key, "partialcache");
    assert_eq!(settings.cache.duration_minutes, None);
    assert_eq!(settings.cache.directive, "cache");
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn boolish_vocabulary() {
    for text in ["true", "TRUE", " 1 ", "yes", "y", "t", "on"] {
        assert_eq!(parse_boolish(text), Some(true), "{text}");
    }
    for text in ["false", "False", "0", "no", "n", "f", "off", ""] {
        assert_eq!(parse_boolish(text), Some(false), "{text}");
    }
    assert_eq!(parse_boolish("maybe"), None);
}

#[test]
fn enabled_flag_accepts_every_shape() {
    let cases = [
        (RawFlag::Bool(false), false),
        (RawFlag::Int(1), true),
        (RawFlag::Int(0), false),
        (RawFlag::Int(-3), true),
        (RawFlag::Text("false".to_string()), false),
        (RawFlag::Text("On".to_string()), true),
    ];

    for (flag, expected) in cases {
        let raw = RawSettings {
            cache: RawCacheSettings {
                enabled: Some(flag.clone()),
                ..Default::default()
            },
            ..Default::default()
        };
        let settings = Settings::from_raw(raw).expect("valid settings");
        assert_eq!(settings.cache.enabled, expected, "{flag:?}");
    }
}

#[test]
fn unrecognized_enabled_text_reads_as_false() {
    let raw = RawSettings {
        cache: RawCacheSettings {
            enabled: Some(RawFlag::Text("sometimes".to_string())),
            ..Default::default()
        },
        ..Default::default()
    };

    let settings = Settings::from_raw(raw).expect("coerced, not rejected");
    assert!(!settings.cache.enabled);
}

#[test]
fn loose_enabled_values_load_from_file() {
    let file = toml_file(
        r#"
[cache]
enabled = "maybe"
"#,
    );
    let settings = load_with_environment(Some(file.path()), &Overrides::default(), empty_env())
        .expect("text flag loads");
    assert!(!settings.cache.enabled);

    let file = toml_file(
        r#"
[cache]
enabled = 2
"#,
    );
    let settings = load_with_environment(Some(file.path()), &Overrides::default(), empty_env())
        .expect("integer flag loads");
    assert!(settings.cache.enabled);
}

#[test]
fn zero_duration_is_rejected() {
    let raw = RawSettings {
        cache: RawCacheSettings {
            duration: Some(0),
            ..Default::default()
        },
        ..Default::default()
    };

    let err = Settings::from_raw(raw).expect_err("zero minutes");
    assert!(matches!(err, LoadError::Invalid { key: "cache.duration", .. }));
}

#[test]
fn blank_namespace_is_rejected() {
    let raw = RawSettings {
        cache: RawCacheSettings {
            key: Some("   ".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let err = Settings::from_raw(raw).expect_err("blank key");
    assert!(matches!(err, LoadError::Invalid { key: "cache.key", .. }));
}

#[test]
fn file_values_are_loaded() {
    let file = toml_file(
        r#"
[cache]
enabled = "0"
key = "views"
duration = 30
directive = "partial"

[logging]
level = "debug"
json = true
"#,
    );

    let settings = load_with_environment(Some(file.path()), &Overrides::default(), empty_env())
        .expect("valid settings");

    assert!(!settings.cache.enabled);
    assert_eq!(settings.cache.key, "views");
    assert_eq!(settings.cache.duration_minutes, NonZeroU32::new(30));
    assert_eq!(settings.cache.directive, "partial");
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn environment_overrides_file() {
    let file = toml_file(
        r#"
[cache]
enabled = true
duration = 30
"#,
    );
    let environment = env(&[
        ("PARTIALCACHE__CACHE__ENABLED", "off"),
        ("PARTIALCACHE__CACHE__DURATION", "5"),
    ]);

    let settings = load_with_environment(Some(file.path()), &Overrides::default(), environment)
        .expect("valid settings");

    assert!(!settings.cache.enabled);
    assert_eq!(settings.cache.duration_minutes, NonZeroU32::new(5));
}

#[test]
fn overrides_take_highest_precedence() {
    let environment = env(&[
        ("PARTIALCACHE__CACHE__ENABLED", "false"),
        ("PARTIALCACHE__CACHE__KEY", "from-env"),
        ("PARTIALCACHE__LOGGING__LEVEL", "warn"),
    ]);
    let overrides = Overrides {
        enabled: Some(true),
        key: Some("from-overrides".to_string()),
        log_level: Some("trace".to_string()),
        ..Default::default()
    };

    let settings =
        load_with_environment(None, &overrides, environment).expect("valid settings");

    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.key, "from-overrides");
    assert_eq!(settings.logging.level, LevelFilter::TRACE);
}

#[test]
fn missing_explicit_file_fails() {
    let err = load_with_environment(
        Some(Path::new("/nonexistent/partialcache.toml")),
        &Overrides::default(),
        empty_env(),
    )
    .expect_err("file is required");
    assert!(matches!(err, LoadError::Build(_)));
}

#[test]
fn invalid_log_level_is_rejected() {
    let overrides = Overrides {
        log_level: Some("chatty".to_string()),
        ..Default::default()
    };

    let err = load_with_environment(None, &overrides, empty_env()).expect_err("bad level");
    assert!(matches!(err, LoadError::Invalid { key: "logging.level", .. }));
}
