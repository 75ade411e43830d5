// Test assertions for HTTP responses

use crate::TestResponse;

/// Assert that a response has a specific status code
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status();
    assert_eq!(
        actual, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        actual,
        response.body_string()
    );
}

/// Assert that a response body contains JSON matching expected value
pub fn assert_json<T>(response: &TestResponse, expected: &T)
where
    T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let actual: T = response
        .body_json()
        .expect("Failed to deserialize response body");
    assert_eq!(actual, *expected, "JSON bodies do not match");
}

/// Assert that a response has a specific header
pub fn assert_header(response: &TestResponse, key: &str, expected: &str) {
    let actual = response.header(key);
    assert_eq!(
        actual,
        Some(expected),
        "Expected header '{}' to be '{}', got {:?}",
        key,
        expected,
        actual
    );
}

/// Assert that a header is absent
pub fn assert_no_header(response: &TestResponse, key: &str) {
    let actual = response.header(key);
    assert!(
        actual.is_none(),
        "Expected no '{}' header, got {:?}",
        key,
        actual
    );
}

/// Assert a `307 Temporary Redirect` to `location`
pub fn assert_redirect(response: &TestResponse, location: &str) {
    assert_status(response, 307);
    assert_header(response, "Location", location);
}

/// Assert the response sets cookie `name` to `value`
pub fn assert_cookie(response: &TestResponse, name: &str, value: &str) {
    let actual = response.set_cookie();
    assert_eq!(
        actual,
        Some((name.to_string(), value.to_string())),
        "Expected Set-Cookie {}={}, got {:?}",
        name,
        value,
        response.header("Set-Cookie")
    );
}

/// Assert that a response body contains a string
pub fn assert_body_contains(response: &TestResponse, expected: &str) {
    let body = response.body_string();
    assert!(
        body.contains(expected),
        "Expected body to contain '{}', but it didn't. Body: {}",
        expected,
        body
    );
}

/// Assert that a response body does not contain a string
pub fn assert_body_not_contains(response: &TestResponse, unexpected: &str) {
    let body = response.body_string();
    assert!(
        !body.contains(unexpected),
        "Expected body not to contain '{}'. Body: {}",
        unexpected,
        body
    );
}

/// Assert that a response is successful (2xx status)
pub fn assert_success(response: &TestResponse) {
    let status = response.status();
    assert!(
        (200..300).contains(&status),
        "Expected successful status (2xx), got {}",
        status
    );
}

/// Assert that a response is a client error (4xx status)
pub fn assert_client_error(response: &TestResponse) {
    let status = response.status();
    assert!(
        (400..500).contains(&status),
        "Expected client error status (4xx), got {}",
        status
    );
}

/// Assert that a response has JSON content type
pub fn assert_json_content_type(response: &TestResponse) {
    let content_type = response.header("Content-Type");
    assert!(
        content_type
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false),
        "Expected JSON content type, got {:?}",
        content_type
    );
}

/// Assert that a response has HTML content type
pub fn assert_html_content_type(response: &TestResponse) {
    let content_type = response.header("Content-Type");
    assert!(
        content_type
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false),
        "Expected HTML content type, got {:?}",
        content_type
    );
}
