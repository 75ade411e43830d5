// Core HTTP layer for the Shipfaster site
// Request/response types, routing, middleware and the hyper-backed server

pub mod application;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routing;

pub use application::{Application, error_response};
pub use error::Error;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use middleware::{LoggerMiddleware, Middleware, MiddlewareChain, Next};
pub use routing::{BoxFuture, HandlerFn, Router, handler, parse_query_string};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
