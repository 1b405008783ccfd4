//! Request handling for esframes
//!
//! Sends multi-search requests to the engine with the shared bearer token
//! and feeds the responses through [`esframes::EventResponse`].

pub mod auth;
pub mod error;
pub mod handler;
pub mod msearch;

pub use auth::AuthState;
pub use error::{ClientError, Result};
pub use handler::{remap_error, EventQueryHandler, HttpRequester, QueryRequest, RequestHandler};
pub use msearch::{MultiSearchBody, SearchRequest};
