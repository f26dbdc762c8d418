//! End-to-end kernel tests: boot, route collection, request resolution.

use std::sync::{Arc, Mutex};

use web_kernel::config::{AliasConfig, KernelConfig, RouteConfig};
use web_kernel::messaging::{keys, names, Listener, ParamValue};
use web_kernel::routing::ConfigRouteSource;
use web_kernel::{Kernel, MatchError, Method};

fn route_config(path: &str, methods: &[&str], controller: &str) -> RouteConfig {
    RouteConfig {
        name: None,
        path: path.to_string(),
        methods: methods.iter().map(|m| m.to_string()).collect(),
        controller: controller.to_string(),
    }
}

fn booted_kernel() -> Kernel {
    let mut config = KernelConfig::default();
    config.routes.push(route_config("/users/new", &["GET"], "users#new"));
    config.routes.push(route_config(
        "/users/{id:[0-9]+}",
        &["GET", "HEAD"],
        "users#show",
    ));
    config.routes.push(route_config("/items", &["POST"], "items#create"));
    config.aliases.push(AliasConfig {
        alias: "/u".to_string(),
        target: "/users/{id:[0-9]+}".to_string(),
    });

    let routes = web_kernel::config::build_routes(&config).expect("config is valid");
    Kernel::builder()
        .attach_aggregate(&ConfigRouteSource::new(routes))
        .boot()
}

#[test]
fn test_static_route_beats_parametrized_route() {
    let mut kernel = booted_kernel();

    let found = kernel.resolve("/users/new", Method::Get).unwrap();
    assert_eq!(found.route.binding().as_str(), "users#new");
    assert!(found.params.is_empty());
}

#[test]
fn test_parametrized_route_extracts_params() {
    let mut kernel = booted_kernel();

    let found = kernel.resolve("/users/42", Method::Get).unwrap();
    assert_eq!(found.route.binding().as_str(), "users#show");
    assert_eq!(found.params, vec![("id".to_string(), "42".to_string())]);
}

#[test]
fn test_constraint_rejection_is_not_found() {
    let mut kernel = booted_kernel();

    let error = kernel.resolve("/users/abc", Method::Get).unwrap_err();
    assert!(matches!(error, MatchError::RouteNotFound { .. }));
}

#[test]
fn test_alias_matches_like_canonical_path() {
    let mut kernel = booted_kernel();

    let found = kernel.resolve("/u/42", Method::Get).unwrap();
    assert_eq!(found.route.binding().as_str(), "users#show");
    assert_eq!(found.params, vec![("id".to_string(), "42".to_string())]);
}

#[test]
fn test_method_not_allowed_carries_allowed_set() {
    let mut kernel = booted_kernel();

    let error = kernel.resolve("/items", Method::Get).unwrap_err();
    match error {
        MatchError::MethodNotAllowed { allowed, .. } => {
            let allowed: Vec<String> = allowed.iter().map(Method::to_string).collect();
            assert_eq!(allowed, vec!["POST".to_string()]);
        }
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
}

#[test]
fn test_failure_messages_reach_wildcard_listeners() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let mut config = KernelConfig::default();
    config.routes.push(route_config("/items", &["POST"], "items#create"));
    let routes = web_kernel::config::build_routes(&config).unwrap();

    let mut kernel = Kernel::builder()
        .attach_aggregate(&ConfigRouteSource::new(routes))
        .attach_listener(Listener::new(
            web_kernel::messaging::ListenerPattern::parse("routes.*").unwrap(),
            0,
            {
                let seen = Arc::clone(&seen);
                move |message, _| {
                    seen.lock().unwrap().push(message.name().as_str().to_string());
                    None
                }
            },
        ))
        .boot();

    let _ = kernel.resolve("/missing", Method::Get);
    let _ = kernel.resolve("/items", Method::Get);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "routes.not_found".to_string(),
            "routes.method_not_allowed".to_string(),
        ]
    );
}

#[test]
fn test_method_not_allowed_message_params() {
    let captured = Arc::new(Mutex::new(None));

    let mut config = KernelConfig::default();
    config.routes.push(route_config("/items", &["POST", "PUT"], "items#create"));
    let routes = web_kernel::config::build_routes(&config).unwrap();

    let mut kernel = Kernel::builder()
        .attach_aggregate(&ConfigRouteSource::new(routes))
        .attach_listener(Listener::on(names::METHOD_NOT_ALLOWED, 0, {
            let captured = Arc::clone(&captured);
            move |message, _| {
                *captured.lock().unwrap() = Some((
                    message
                        .param(keys::PATH)
                        .and_then(ParamValue::as_str)
                        .map(str::to_string),
                    message
                        .param(keys::METHOD)
                        .and_then(ParamValue::as_str)
                        .map(str::to_string),
                    message
                        .param(keys::ALLOWED)
                        .and_then(ParamValue::as_list)
                        .map(<[String]>::to_vec),
                ));
                None
            }
        }))
        .boot();

    let _ = kernel.resolve("/items", Method::Delete);

    let (path, method, allowed) = captured.lock().unwrap().clone().unwrap();
    assert_eq!(path.as_deref(), Some("/items"));
    assert_eq!(method.as_deref(), Some("DELETE"));
    assert_eq!(
        allowed,
        Some(vec!["POST".to_string(), "PUT".to_string()])
    );
}

#[test]
fn test_boot_from_config_file() {
    use std::io::Write as _;

    let path = std::env::temp_dir().join("web-kernel-roundtrip.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(
        br#"
        [[routes]]
        name = "health"
        path = "/health"
        methods = ["GET"]
        controller = "health#check"

        [[routes]]
        path = "/users/{id}"
        methods = ["GET"]
        controller = "users#show"
        "#,
    )
    .unwrap();

    let mut kernel = Kernel::from_config(&path).unwrap();
    assert_eq!(kernel.routes().len(), 2);

    let found = kernel.resolve("/health", Method::Get).unwrap();
    assert_eq!(found.route.name(), Some("health"));
}
