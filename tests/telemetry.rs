use partialcache::config::Settings;
use partialcache::telemetry;

#[test]
fn subscriber_installs_once() {
    let settings = Settings::default();

    telemetry::init(&settings.logging).expect("first install succeeds");

    let err = telemetry::init(&settings.logging).expect_err("global subscriber already set");
    assert!(
        err.to_string()
            .starts_with("telemetry initialization failed: failed to install tracing subscriber")
    );
}
