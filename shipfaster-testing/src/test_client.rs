// In-process test client

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use shipfaster_core::{Application, HttpMethod, HttpRequest, HttpResponse};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Upper bound on redirects followed by [`TestClient::follow`]
pub const MAX_REDIRECTS: usize = 10;

/// Test HTTP client that drives an [`Application`] without a socket.
///
/// Cookies set by responses are remembered and sent with later requests,
/// the way a browser would keep `NEXT_LOCALE` between page loads.
#[derive(Clone)]
pub struct TestClient {
    app: Application,
    cookies: Arc<Mutex<BTreeMap<String, String>>>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    pub fn new(app: Application) -> Self {
        Self {
            app,
            cookies: Arc::new(Mutex::new(BTreeMap::new())),
            default_headers: Vec::new(),
        }
    }

    /// Send `name: value` with every request
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers
            .push((name.to_string(), value.to_string()));
        self
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(TestRequestBuilder::new(HttpMethod::GET, path).build())
            .await
    }

    /// Make a HEAD request
    pub async fn head(&self, path: &str) -> TestResponse {
        self.send(TestRequestBuilder::new(HttpMethod::HEAD, path).build())
            .await
    }

    /// Make a POST request
    pub async fn post(&self, path: &str, body: Vec<u8>) -> TestResponse {
        self.send(
            TestRequestBuilder::new(HttpMethod::POST, path)
                .body(body)
                .build(),
        )
        .await
    }

    /// Start building a request with the given method
    pub fn request(&self, method: HttpMethod, path: &str) -> TestRequestBuilder {
        TestRequestBuilder::new(method, path)
    }

    /// Send a prepared request, adding default headers and stored cookies
    pub async fn send(&self, mut req: HttpRequest) -> TestResponse {
        for (name, value) in &self.default_headers {
            if req.header(name).is_none() {
                req.set_header(name, value.clone());
            }
        }

        let jar = self.cookie_header();
        if !jar.is_empty() {
            let cookie = match req.header("cookie") {
                Some(existing) => format!("{}; {}", existing, jar),
                None => jar,
            };
            req.set_header("cookie", cookie);
        }

        let response = TestResponse::new(self.app.handle(req).await);
        if let Some((name, value)) = response.set_cookie() {
            self.cookies.lock().insert(name, value);
        }
        response
    }

    /// GET `path` and follow `Location` headers until a non-redirect
    /// response, returning it with the chain of visited locations.
    pub async fn follow(&self, path: &str) -> (TestResponse, Vec<String>) {
        let mut visited = Vec::new();
        let mut response = self.get(path).await;

        while response.is_redirect() && visited.len() < MAX_REDIRECTS {
            let Some(location) = response.location().map(str::to_string) else {
                break;
            };
            response = self.get(&location).await;
            visited.push(location);
        }

        (response, visited)
    }

    /// Value of a cookie held by the client
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.lock().get(name).cloned()
    }

    /// Store a cookie as if a response had set it
    pub fn set_cookie(&self, name: &str, value: &str) {
        self.cookies
            .lock()
            .insert(name.to_string(), value.to_string());
    }

    pub fn clear_cookies(&self) {
        self.cookies.lock().clear();
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .lock()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Builder for test requests
pub struct TestRequestBuilder {
    method: HttpMethod,
    path: String,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    body: Vec<u8>,
    query_params: Vec<(String, String)>,
}

impl TestRequestBuilder {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: Vec::new(),
            query_params: Vec::new(),
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a request cookie
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.push((name.to_string(), value.to_string()));
        self
    }

    /// Shorthand for the `Accept-Language` header
    pub fn accept_language(self, value: &str) -> Self {
        self.header("Accept-Language", value)
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Add a query parameter; keys and values are percent-encoded
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> HttpRequest {
        let mut path = self.path;
        if !self.query_params.is_empty() {
            let query = self
                .query_params
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            path.push(if path.contains('?') { '&' } else { '?' });
            path.push_str(&query);
        }

        let mut req = HttpRequest::new(self.method.as_str(), path);
        req.body = self.body;
        for (name, value) in self.headers {
            req.set_header(&name, value);
        }
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            req.set_header("cookie", cookie);
        }
        req
    }
}

/// Response from a test request
#[derive(Debug, Clone)]
pub struct TestResponse {
    inner: HttpResponse,
}

impl TestResponse {
    pub fn new(inner: HttpResponse) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> u16 {
        self.inner.status
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.header(name)
    }

    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    pub fn is_redirect(&self) -> bool {
        self.inner.is_redirect()
    }

    pub fn body_string(&self) -> String {
        self.inner.body_text()
    }

    pub fn body_json<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_slice(&self.inner.body).ok()
    }

    /// Name and value of the `Set-Cookie` header, attributes dropped
    pub fn set_cookie(&self) -> Option<(String, String)> {
        let header = self.header("set-cookie")?;
        let pair = header.split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        Some((name.trim().to_string(), value.trim().to_string()))
    }

    pub fn inner(&self) -> &HttpResponse {
        &self.inner
    }

    pub fn into_inner(self) -> HttpResponse {
        self.inner
    }
}

impl From<HttpResponse> for TestResponse {
    fn from(inner: HttpResponse) -> Self {
        Self::new(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipfaster_core::{Router, handler};

    fn app() -> Application {
        let mut router = Router::new();
        router
            .get(
                "/hello",
                handler(|req| async move {
                    let who = req.query("name").cloned().unwrap_or_else(|| "world".to_string());
                    let seen = req.cookie("seen").unwrap_or("no").to_string();
                    Ok(HttpResponse::html(format!("hello {} seen:{}", who, seen)))
                }),
            )
            .unwrap();
        router
            .get(
                "/start",
                handler(|_req| async {
                    Ok(HttpResponse::temporary_redirect("/hello")
                        .with_header("Set-Cookie".to_string(), "seen=yes; Path=/".to_string()))
                }),
            )
            .unwrap();
        router
            .get(
                "/loop",
                handler(|_req| async { Ok(HttpResponse::temporary_redirect("/loop")) }),
            )
            .unwrap();
        Application::new(router)
    }

    #[tokio::test]
    async fn test_get_with_query() {
        let client = TestClient::new(app());
        let req = client
            .request(HttpMethod::GET, "/hello")
            .query("name", "Ada Lovelace")
            .build();
        assert_eq!(req.path, "/hello?name=Ada%20Lovelace");

        let response = client.send(req).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.body_string(), "hello Ada Lovelace seen:no");
    }

    #[tokio::test]
    async fn test_follow_keeps_cookies() {
        let client = TestClient::new(app());
        let (response, visited) = client.follow("/start").await;

        assert_eq!(visited, vec!["/hello".to_string()]);
        assert_eq!(response.body_string(), "hello world seen:yes");
        assert_eq!(client.cookie("seen").as_deref(), Some("yes"));
    }

    #[tokio::test]
    async fn test_follow_stops_on_loops() {
        let client = TestClient::new(app());
        let (response, visited) = client.follow("/loop").await;
        assert!(response.is_redirect());
        assert_eq!(visited.len(), MAX_REDIRECTS);
    }

    #[tokio::test]
    async fn test_missing_route_is_json_error() {
        let client = TestClient::new(app());
        let response = client.get("/nope").await;
        assert_eq!(response.status(), 404);
        let json: serde_json::Value = response.body_json().unwrap();
        assert_eq!(json["status"], 404);
    }

    #[test]
    fn test_builder_cookies_and_headers() {
        let req = TestRequestBuilder::new(HttpMethod::GET, "/de?x=1")
            .cookie("NEXT_LOCALE", "de")
            .accept_language("fr;q=0.8")
            .query("y", "2")
            .build();

        assert_eq!(req.path, "/de?x=1&y=2");
        assert_eq!(req.cookie("NEXT_LOCALE"), Some("de"));
        assert_eq!(req.header("accept-language"), Some("fr;q=0.8"));
    }

    #[test]
    fn test_set_cookie_parsing() {
        let response = TestResponse::new(HttpResponse::ok().with_header(
            "Set-Cookie".to_string(),
            "NEXT_LOCALE=ja; Path=/; SameSite=Lax; Max-Age=31536000".to_string(),
        ));
        assert_eq!(
            response.set_cookie(),
            Some(("NEXT_LOCALE".to_string(), "ja".to_string()))
        );
    }
}
