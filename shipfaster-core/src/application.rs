// Application bootstrapper and HTTP server

use crate::routing::handler;
use crate::{Error, HttpRequest, HttpResponse, Middleware, MiddlewareChain, Router};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, body::Incoming as IncomingBody};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// The main application struct: a router behind a middleware chain.
#[derive(Clone)]
pub struct Application {
    router: Arc<Router>,
    middleware: MiddlewareChain,
}

impl Application {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
            middleware: MiddlewareChain::new(),
        }
    }

    /// Append a middleware; the first registered runs outermost.
    pub fn with_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.use_middleware(middleware);
        self
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Run one request through middleware and router.
    ///
    /// Errors are turned into JSON error responses so that every request
    /// yields a response.
    pub async fn handle(&self, req: HttpRequest) -> HttpResponse {
        let router = self.router.clone();
        let dispatch = handler(move |req| {
            let router = router.clone();
            async move { router.route(req).await }
        });

        match self.middleware.apply(req, dispatch).await {
            Ok(response) => response,
            Err(err) => error_response(&err),
        }
    }

    /// Start the HTTP server and serve until Ctrl-C.
    pub async fn listen(self, addr: SocketAddr) -> Result<(), Error> {
        let listener = TcpListener::bind(addr).await?;
        info!(address = %addr, "Server listening");

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = accepted?;
                    let io = TokioIo::new(stream);
                    let app = self.clone();

                    tokio::spawn(async move {
                        let service = service_fn(move |req: Request<IncomingBody>| {
                            let app = app.clone();
                            async move { handle_request(req, app).await }
                        });

                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                            debug!(peer = %peer, error = %err, "Error serving connection");
                        }
                    });
                }
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping listener");
                    return Ok(());
                }
            }
        }
    }
}

/// Render an error as a JSON response with the matching status.
pub fn error_response(err: &Error) -> HttpResponse {
    let status = err.status_code();
    if err.is_server_error() {
        error!(error = %err, status, "Request failed");
    }
    let body = serde_json::json!({
        "error": err.to_string(),
        "status": status,
    });
    HttpResponse::new(status)
        .with_json(&body)
        .unwrap_or_else(|_| HttpResponse::internal_server_error())
}

/// Handle an incoming HTTP request
async fn handle_request(
    req: Request<IncomingBody>,
    app: Application,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().to_string();
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let mut site_req = HttpRequest::new(method, path);

    for (name, value) in req.headers() {
        if let Ok(value_str) = value.to_str() {
            site_req.set_header(name.as_str(), value_str);
        }
    }

    let body_bytes = req.collect().await?.to_bytes();
    site_req.body = body_bytes.to_vec();

    let response = app.handle(site_req).await;
    Ok(into_hyper_response(response))
}

fn into_hyper_response(response: HttpResponse) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(response.status);
    for (key, value) in &response.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    match builder.body(Full::new(Bytes::from(response.body))) {
        Ok(res) => res,
        Err(err) => {
            error!(error = %err, "Invalid response parts");
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        }
    }
}
