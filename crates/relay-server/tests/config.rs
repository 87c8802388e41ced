use std::collections::HashMap;
use std::time::Duration;

use relay_server::config::Config;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_without_variables() {
    let config = Config::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.socket_addr_string(), "0.0.0.0:8000");
    assert_eq!(config.send_timeout, Duration::from_secs(5));
}

#[test]
fn variables_override_defaults() {
    let config = Config::from_lookup(lookup_from(&[
        ("RELAY_BIND_ADDR", "127.0.0.1"),
        ("RELAY_PORT", "9100"),
        ("RELAY_MAX_CLIENTS", "2"),
        ("RELAY_OUTBOUND_CAPACITY", " 8 "),
        ("RELAY_SEND_TIMEOUT_MS", "250"),
        ("RELAY_LOG", "relay_server=debug"),
    ]))
    .unwrap();

    assert_eq!(config.socket_addr_string(), "127.0.0.1:9100");
    assert_eq!(config.max_clients, 2);
    assert_eq!(config.outbound_capacity, 8);
    assert_eq!(config.send_timeout, Duration::from_millis(250));
    assert_eq!(config.log_level, "relay_server=debug");
}

#[test]
fn malformed_value_names_the_variable() {
    let err = Config::from_lookup(lookup_from(&[("RELAY_PORT", "eighty")])).unwrap_err();
    assert!(err.to_string().contains("RELAY_PORT"), "{err:#}");
}

#[test]
fn zero_limits_are_rejected() {
    for key in ["RELAY_MAX_CLIENTS", "RELAY_OUTBOUND_CAPACITY", "RELAY_SEND_TIMEOUT_MS"] {
        assert!(
            Config::from_lookup(lookup_from(&[(key, "0")])).is_err(),
            "{key}=0 should be rejected"
        );
    }
}
