//! Engine response model and the transformation entry points

mod event;
mod types;

pub use event::{DataQueryResponse, EventResponse, ResponseData};
pub use types::{Hit, Hits, MSearchResponse, SubResponse, TotalHits};
