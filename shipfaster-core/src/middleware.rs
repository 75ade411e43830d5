// Middleware system for request/response processing

use crate::routing::{BoxFuture, HandlerFn};
use crate::{Error, HttpRequest, HttpResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Type alias for the next handler in the middleware chain
pub type Next = Box<dyn FnOnce(HttpRequest) -> BoxFuture + Send>;

/// Middleware trait for processing requests before they reach the handler
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Process the request and optionally pass to next middleware
    async fn handle(&self, req: HttpRequest, next: Next) -> Result<HttpResponse, Error>;
}

/// Middleware chain executor
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Arc<Vec<Arc<dyn Middleware>>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a middleware to the chain
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) {
        let mut mws = (*self.middlewares).clone();
        mws.push(Arc::new(middleware));
        self.middlewares = Arc::new(mws);
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Execute the middleware chain with a handler
    pub async fn apply(&self, req: HttpRequest, handler: HandlerFn) -> Result<HttpResponse, Error> {
        debug!(
            middleware_count = self.middlewares.len(),
            path = %req.path,
            method = %req.method,
            "Executing middleware chain"
        );
        self.execute_from(0, req, handler).await
    }

    fn execute_from(&self, index: usize, req: HttpRequest, handler: HandlerFn) -> BoxFuture {
        if index >= self.middlewares.len() {
            trace!("Middleware chain complete, calling handler");
            handler(req)
        } else {
            let middleware = self.middlewares[index].clone();
            let chain = self.clone();

            trace!(middleware_index = index, "Executing middleware");
            Box::pin(async move {
                middleware
                    .handle(
                        req,
                        Box::new(move |req| chain.execute_from(index + 1, req, handler)),
                    )
                    .await
            })
        }
    }
}

/// Request logging middleware
#[derive(Debug, Default)]
pub struct LoggerMiddleware;

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Middleware for LoggerMiddleware {
    async fn handle(&self, req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
        let start = Instant::now();
        let method = req.method.clone();
        let path = req.path.clone();

        let result = next(req).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(response) => info!(
                method = %method,
                path = %path,
                status = response.status,
                elapsed_ms,
                "Request served"
            ),
            Err(e) => warn!(
                method = %method,
                path = %path,
                status = e.status_code(),
                error = %e,
                elapsed_ms,
                "Request failed"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::handler;

    struct TagMiddleware(&'static str);

    #[async_trait]
    impl Middleware for TagMiddleware {
        async fn handle(&self, req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
            let mut res = next(req).await?;
            let trail = res.header("x-trail").unwrap_or("").to_string();
            res.headers
                .insert("x-trail".to_string(), format!("{}{}", trail, self.0));
            Ok(res)
        }
    }

    struct ShortCircuit;

    #[async_trait]
    impl Middleware for ShortCircuit {
        async fn handle(&self, _req: HttpRequest, _next: Next) -> Result<HttpResponse, Error> {
            Ok(HttpResponse::temporary_redirect("/en"))
        }
    }

    fn ok_handler() -> HandlerFn {
        handler(|_req| async { Ok(HttpResponse::ok()) })
    }

    #[tokio::test]
    async fn test_chain_runs_in_registration_order() {
        let mut chain = MiddlewareChain::new();
        chain.use_middleware(TagMiddleware("a"));
        chain.use_middleware(TagMiddleware("b"));
        assert_eq!(chain.len(), 2);

        let res = chain
            .apply(HttpRequest::new("GET", "/"), ok_handler())
            .await
            .unwrap();
        // Responses unwind innermost first
        assert_eq!(res.header("x-trail"), Some("ba"));
    }

    #[tokio::test]
    async fn test_middleware_can_short_circuit() {
        let mut chain = MiddlewareChain::new();
        chain.use_middleware(ShortCircuit);
        chain.use_middleware(TagMiddleware("never"));

        let res = chain
            .apply(HttpRequest::new("GET", "/"), ok_handler())
            .await
            .unwrap();
        assert_eq!(res.status, 307);
        assert_eq!(res.header("x-trail"), None);
    }

    #[tokio::test]
    async fn test_logger_passes_through() {
        let mut chain = MiddlewareChain::new();
        chain.use_middleware(LoggerMiddleware::new());
        let res = chain
            .apply(HttpRequest::new("GET", "/"), ok_handler())
            .await
            .unwrap();
        assert_eq!(res.status, 200);
    }
}
