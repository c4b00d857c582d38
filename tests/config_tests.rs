// Config loading and validation tests

use pricefeed::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 5000
host = "0.0.0.0"

[cache]
ttl_secs = 21600
sweep_interval_secs = 120

[refresh]
interval_secs = 21600

[providers]
aws_region = "us-east-1"
azure_region = "eastus"
gcp_region = "us-central1"
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.cache.ttl_secs, 21_600);
    assert_eq!(config.cache.sweep_interval_secs, 120);
    assert_eq!(config.refresh.interval_secs, 21_600);
    assert_eq!(config.providers.aws_region, "us-east-1");
    assert_eq!(config.providers.azure_region, "eastus");
    assert_eq!(config.providers.gcp_region, "us-central1");
}

#[test]
fn test_config_defaults_when_sections_omitted() {
    let config = AppConfig::load_from_str("").expect("empty config uses defaults");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.cache.ttl_secs, 21_600);
    assert_eq!(config.cache.sweep_interval_secs, 120);
    assert_eq!(config.refresh.interval_secs, 21_600);
    assert_eq!(config.providers.azure_region, "eastus");
}

#[test]
fn test_config_partial_section_keeps_other_defaults() {
    let config = AppConfig::load_from_str("[server]\nport = 8080\n").expect("valid");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.refresh.interval_secs, 21_600);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 5000", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_host() {
    let bad = VALID_CONFIG.replace("host = \"0.0.0.0\"", "host = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.host"));
}

#[test]
fn test_config_validation_rejects_ttl_zero() {
    let bad = VALID_CONFIG.replace("ttl_secs = 21600", "ttl_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("cache.ttl_secs"));
}

#[test]
fn test_config_validation_rejects_sweep_interval_zero() {
    let bad = VALID_CONFIG.replace("sweep_interval_secs = 120", "sweep_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sweep_interval_secs"));
}

#[test]
fn test_config_validation_rejects_refresh_interval_zero() {
    let bad = VALID_CONFIG.replace("interval_secs = 21600", "interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("refresh.interval_secs"));
}

#[test]
fn test_config_validation_rejects_empty_region() {
    let bad = VALID_CONFIG.replace("azure_region = \"eastus\"", "azure_region = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("azure_region"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.providers.gcp_region, "us-central1");
}
