//! Helpers shared by the integration tests

#![allow(dead_code)]

use http::header::{ACCEPT, COOKIE};
use http::Method;
use routekit::{App, AppConfig, Environment, Request};

/// Application configured for tests (no development-only error details)
pub fn test_app() -> App {
    App::new(AppConfig {
        env: Environment::Test,
        ..AppConfig::default()
    })
}

pub fn request(method: Method, uri: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Vec::new())
        .unwrap()
}

pub fn get(uri: &str) -> Request {
    request(Method::GET, uri)
}

pub fn get_json(uri: &str) -> Request {
    let mut req = get(uri);
    req.headers_mut()
        .insert(ACCEPT, "application/json".parse().unwrap());
    req
}

/// `GET uri` carrying the session cookie of a previous response
pub fn get_with_cookie(uri: &str, cookie: &str) -> Request {
    let mut req = get(uri);
    req.headers_mut().insert(COOKIE, cookie.parse().unwrap());
    req
}

/// The `name=value` part of the first `Set-Cookie` header
pub fn session_cookie(res: &http::Response<Vec<u8>>) -> String {
    res.headers()
        .get(http::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
        .expect("response sets a session cookie")
}

pub fn body(res: &http::Response<Vec<u8>>) -> String {
    String::from_utf8_lossy(res.body()).into_owned()
}

/// Installs a test-writer subscriber for the current thread
pub struct TestTracing {
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestTracing {
    pub fn init() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        Self {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}
