//! Testing utilities for the Shipfaster site.
//!
//! - [`TestClient`] drives an [`Application`](shipfaster_core::Application)
//!   in process, keeping cookies between requests and optionally following
//!   redirects.
//! - [`assertions`] holds response assertions with readable failure output.
//!
//! ```no_run
//! use shipfaster_core::{Application, HttpResponse, Router, handler};
//! use shipfaster_testing::*;
//!
//! # tokio_test::block_on(async {
//! let mut router = Router::new();
//! router
//!     .get("/en", handler(|_req| async { Ok(HttpResponse::html("<h1>Hi</h1>")) }))
//!     .unwrap();
//!
//! let client = TestClient::new(Application::new(router));
//! let response = client.get("/en").await;
//! assert_status(&response, 200);
//! assert_body_contains(&response, "<h1>Hi</h1>");
//! # });
//! ```

pub mod assertions;
pub mod test_client;

pub use assertions::*;
pub use test_client::{MAX_REDIRECTS, TestClient, TestRequestBuilder, TestResponse};
