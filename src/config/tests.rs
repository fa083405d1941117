use serial_test::serial;

use super::*;

fn cli_with_overrides(overrides: ServeOverrides) -> CliArgs {
    CliArgs {
        config_file: None,
        overrides,
    }
}

#[test]
#[serial]
fn defaults_resolve_without_any_source() {
    let settings = load(&cli_with_overrides(ServeOverrides::default())).expect("defaults load");

    assert_eq!(settings.server.public_addr.port(), 3000);
    assert_eq!(settings.server.admin_addr.port(), 3001);
    assert!(settings.database.url.is_none());
    assert_eq!(settings.database.max_connections.get(), 8);
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.ttl_minutes.get(), 10080);
    assert_eq!(settings.cache.consume_batch_limit, 100);
    assert_eq!(settings.compose.recent_comments_limit.get(), 10);
    assert_eq!(settings.compose.home_article_limit.get(), 20);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
#[serial]
fn cli_overrides_take_precedence() {
    let overrides = ServeOverrides {
        public_port: Some(8080),
        database_url: Some("postgres://localhost/brezza".to_string()),
        cache_enabled: Some(false),
        cache_ttl_minutes: Some(5),
        log_json: Some(true),
        ..Default::default()
    };

    let settings = load(&cli_with_overrides(overrides)).expect("overrides load");

    assert_eq!(settings.server.public_addr.port(), 8080);
    assert_eq!(
        settings.database.url.as_deref(),
        Some("postgres://localhost/brezza")
    );
    assert!(!settings.cache.enabled);
    assert_eq!(settings.cache.ttl_minutes.get(), 5);
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
#[serial]
fn environment_variables_layer_in() {
    unsafe {
        std::env::set_var("BREZZA__CACHE__TTL_MINUTES", "60");
        std::env::set_var("BREZZA__SERVER__PUBLIC_PORT", "9000");
    }

    let result = load(&cli_with_overrides(ServeOverrides::default()));

    unsafe {
        std::env::remove_var("BREZZA__CACHE__TTL_MINUTES");
        std::env::remove_var("BREZZA__SERVER__PUBLIC_PORT");
    }

    let settings = result.expect("env settings load");
    assert_eq!(settings.cache.ttl_minutes.get(), 60);
    assert_eq!(settings.server.public_addr.port(), 9000);
}

#[test]
#[serial]
fn zero_ttl_is_rejected() {
    let overrides = ServeOverrides {
        cache_ttl_minutes: Some(0),
        ..Default::default()
    };

    let err = load(&cli_with_overrides(overrides)).expect_err("zero ttl should fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.ttl_minutes",
            ..
        }
    ));
}

#[test]
#[serial]
fn zero_public_port_is_rejected() {
    let overrides = ServeOverrides {
        public_port: Some(0),
        ..Default::default()
    };

    let err = load(&cli_with_overrides(overrides)).expect_err("zero port should fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "server.public_port",
            ..
        }
    ));
}

#[test]
#[serial]
fn blank_database_url_reads_as_unconfigured() {
    let overrides = ServeOverrides {
        database_url: Some("   ".to_string()),
        ..Default::default()
    };

    let settings = load(&cli_with_overrides(overrides)).expect("settings load");
    assert!(settings.database.url.is_none());
}
