// HTTP request and response types

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// HTTP methods the router dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            "HEAD" => Some(HttpMethod::HEAD),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP request wrapper
///
/// `path` carries the raw path and query (`/en/explore?page=2`). Header
/// names are stored lowercased.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
            body: Vec::new(),
            path_params: HashMap::new(),
            query_params: HashMap::new(),
        }
    }

    /// Builder-style header insertion
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// Value of a cookie from the `Cookie` header
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| value.trim().trim_matches('"'))
        })
    }

    /// Path without the query string
    pub fn path_only(&self) -> &str {
        self.path
            .split_once('?')
            .map(|(p, _)| p)
            .unwrap_or(&self.path)
    }

    /// Raw query string, without the leading `?`
    pub fn query_string(&self) -> Option<&str> {
        self.path.split_once('?').map(|(_, q)| q).filter(|q| !q.is_empty())
    }

    /// Get a path parameter by name
    pub fn param(&self, name: &str) -> Option<&String> {
        self.path_params.get(name)
    }

    /// Get a query parameter by name
    pub fn query(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }
}

/// HTTP response wrapper
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn no_content() -> Self {
        Self::new(204)
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }

    pub fn internal_server_error() -> Self {
        Self::new(500)
    }

    /// `200 OK` with an HTML body
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok()
            .content_type("text/html; charset=utf-8")
            .with_body(body.into().into_bytes())
    }

    /// `200 OK` with a JSON body
    pub fn json<T: Serialize>(value: &T) -> Result<Self, crate::Error> {
        Self::ok().with_json(value)
    }

    /// Redirect with an explicit status (301, 302, 307, 308)
    pub fn redirect_with_status(status: u16, location: impl Into<String>) -> Self {
        Self::new(status).with_header("Location".to_string(), location.into())
    }

    /// `307 Temporary Redirect`, keeps the method and body
    pub fn temporary_redirect(location: impl Into<String>) -> Self {
        Self::redirect_with_status(307, location)
    }

    /// `308 Permanent Redirect`
    pub fn permanent_redirect(location: impl Into<String>) -> Self {
        Self::redirect_with_status(308, location)
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self, crate::Error> {
        self.body =
            serde_json::to_vec(value).map_err(|e| crate::Error::Serialization(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn content_type(self, value: &str) -> Self {
        self.with_header("Content-Type".to_string(), value.to_string())
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.status, 301 | 302 | 303 | 307 | 308)
    }

    /// Body as UTF-8 text, lossy
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = HttpRequest::new("GET", "/").with_header("Accept-Language", "de");
        assert_eq!(req.header("accept-language"), Some("de"));
        assert_eq!(req.header("ACCEPT-LANGUAGE"), Some("de"));
    }

    #[test]
    fn test_cookie_parsing() {
        let req = HttpRequest::new("GET", "/")
            .with_header("Cookie", "theme=dark; NEXT_LOCALE=fr ; other=1");
        assert_eq!(req.cookie("NEXT_LOCALE"), Some("fr"));
        assert_eq!(req.cookie("theme"), Some("dark"));
        assert_eq!(req.cookie("missing"), None);
    }

    #[test]
    fn test_path_and_query_split() {
        let req = HttpRequest::new("GET", "/explore?page=2&q=chat");
        assert_eq!(req.path_only(), "/explore");
        assert_eq!(req.query_string(), Some("page=2&q=chat"));

        let req = HttpRequest::new("GET", "/explore?");
        assert_eq!(req.path_only(), "/explore");
        assert_eq!(req.query_string(), None);
    }

    #[test]
    fn test_redirect_helpers() {
        let res = HttpResponse::temporary_redirect("/en");
        assert_eq!(res.status, 307);
        assert_eq!(res.header("location"), Some("/en"));
        assert!(res.is_redirect());
        assert!(!HttpResponse::ok().is_redirect());
    }

    #[test]
    fn test_html_response() {
        let res = HttpResponse::html("<p>hi</p>");
        assert_eq!(res.header("Content-Type"), Some("text/html; charset=utf-8"));
        assert_eq!(res.body_text(), "<p>hi</p>");
    }

    #[test]
    fn test_method_round_trip() {
        assert_eq!(HttpMethod::from_str("get"), Some(HttpMethod::GET));
        assert_eq!(HttpMethod::GET.as_str(), "GET");
        assert_eq!(HttpMethod::from_str("TRACE"), None);
    }
}
