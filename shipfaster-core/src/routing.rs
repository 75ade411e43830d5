// Routing system for HTTP requests

use crate::{Error, HttpMethod, HttpRequest, HttpResponse};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::trace;

/// Boxed future returned by handlers and middleware
pub type BoxFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>;

/// A route handler function type
pub type HandlerFn = Arc<dyn Fn(HttpRequest) -> BoxFuture + Send + Sync>;

/// Wrap an async function or closure into a [`HandlerFn`].
pub fn handler<F, Fut>(f: F) -> HandlerFn
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}

/// Router for managing routes and dispatching requests
///
/// Patterns use `matchit` syntax: `/{locale}/ai/{websiteName}`, with
/// `{*rest}` for catch-all segments.
#[derive(Default)]
pub struct Router {
    routes: HashMap<HttpMethod, matchit::Router<HandlerFn>>,
    patterns: Vec<(HttpMethod, String)>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route to the router
    pub fn add_route(
        &mut self,
        method: HttpMethod,
        pattern: &str,
        handler: HandlerFn,
    ) -> Result<(), Error> {
        self.routes
            .entry(method)
            .or_default()
            .insert(pattern, handler)
            .map_err(|e| Error::InvalidRoute(format!("{} {}: {}", method, pattern, e)))?;
        self.patterns.push((method, pattern.to_string()));
        trace!(method = %method, pattern, "Registered route");
        Ok(())
    }

    pub fn get(&mut self, pattern: &str, handler: HandlerFn) -> Result<(), Error> {
        self.add_route(HttpMethod::GET, pattern, handler)
    }

    /// Registered `(method, pattern)` pairs in insertion order
    pub fn patterns(&self) -> &[(HttpMethod, String)] {
        &self.patterns
    }

    /// Find a route that matches the request and call its handler
    pub async fn route(&self, mut request: HttpRequest) -> Result<HttpResponse, Error> {
        let path = request.path_only().to_string();

        if let Some(query) = request.query_string() {
            request.query_params = parse_query_string(query);
        }

        let method = HttpMethod::from_str(&request.method)
            .ok_or_else(|| Error::MethodNotAllowed(format!("{} {}", request.method, path)))?;

        // HEAD is served by the GET table when no explicit HEAD route exists
        let table = self
            .routes
            .get(&method)
            .or_else(|| (method == HttpMethod::HEAD).then(|| self.routes.get(&HttpMethod::GET)).flatten());

        if let Some(matched) = table.and_then(|t| t.at(&path).ok()) {
            for (name, value) in matched.params.iter() {
                let decoded = urlencoding::decode(value)
                    .map_err(|e| Error::BadRequest(format!("Invalid path parameter: {}", e)))?;
                request
                    .path_params
                    .entry(name.to_string())
                    .or_insert_with(|| decoded.into_owned());
            }
            let handler = matched.value.clone();
            return handler(request).await;
        }

        let other_method_matches = self
            .routes
            .iter()
            .any(|(m, t)| *m != method && t.at(&path).is_ok());

        if other_method_matches {
            Err(Error::MethodNotAllowed(format!("{} {}", request.method, path)))
        } else {
            Err(Error::RouteNotFound(format!("{} {}", request.method, path)))
        }
    }
}

/// Parse a query string into a map of parameters
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let mut split = part.splitn(2, '=');
            let key = decode_component(split.next()?);
            let value = decode_component(split.next().unwrap_or(""));
            Some((key, value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_param(name: &'static str) -> HandlerFn {
        handler(move |req: HttpRequest| async move {
            let value = req.param(name).cloned().unwrap_or_default();
            Ok(HttpResponse::ok().with_body(value.into_bytes()))
        })
    }

    #[tokio::test]
    async fn test_route_with_params() {
        let mut router = Router::new();
        router.get("/{locale}/ai/{websiteName}", echo_param("websiteName")).unwrap();

        let res = router.route(HttpRequest::new("GET", "/en/ai/chat%20gpt")).await.unwrap();
        assert_eq!(res.body_text(), "chat gpt");
    }

    #[tokio::test]
    async fn test_static_and_param_routes_coexist() {
        let mut router = Router::new();
        router.get("/{locale}", echo_param("locale")).unwrap();
        router.get("/{locale}/explore", echo_param("locale")).unwrap();

        let res = router.route(HttpRequest::new("GET", "/de/explore")).await.unwrap();
        assert_eq!(res.body_text(), "de");
        let res = router.route(HttpRequest::new("GET", "/ja")).await.unwrap();
        assert_eq!(res.body_text(), "ja");
    }

    #[tokio::test]
    async fn test_preset_params_win() {
        let mut router = Router::new();
        router.get("/{locale}", echo_param("locale")).unwrap();

        let mut req = HttpRequest::new("GET", "/en");
        req.path_params.insert("locale".into(), "fr".into());
        let res = router.route(req).await.unwrap();
        assert_eq!(res.body_text(), "fr");
    }

    #[tokio::test]
    async fn test_not_found_and_method_not_allowed() {
        let mut router = Router::new();
        router.get("/api/health", echo_param("x")).unwrap();

        let err = router.route(HttpRequest::new("GET", "/missing")).await.unwrap_err();
        assert!(matches!(err, Error::RouteNotFound(_)));

        let err = router.route(HttpRequest::new("POST", "/api/health")).await.unwrap_err();
        assert!(matches!(err, Error::MethodNotAllowed(_)));
    }

    #[tokio::test]
    async fn test_head_falls_back_to_get() {
        let mut router = Router::new();
        router.get("/api/health", echo_param("x")).unwrap();
        let res = router.route(HttpRequest::new("HEAD", "/api/health")).await.unwrap();
        assert_eq!(res.status, 200);
    }

    #[test]
    fn test_conflicting_routes_are_rejected() {
        let mut router = Router::new();
        router.get("/{locale}", echo_param("locale")).unwrap();
        assert!(router.get("/{lang}", echo_param("lang")).is_err());
    }

    #[test]
    fn test_parse_query_string() {
        let params = parse_query_string("q=chat+bots&page=2&flag");
        assert_eq!(params.get("q"), Some(&"chat bots".to_string()));
        assert_eq!(params.get("page"), Some(&"2".to_string()));
        assert_eq!(params.get("flag"), Some(&String::new()));
        assert!(parse_query_string("").is_empty());
    }
}
