// SPDX-License-Identifier: MPL-2.0
//! Everything between the search form and the server: input validation,
//! request parameters, routes, the HTTP client and response ordering.

pub mod client;
pub mod page_globals;
pub mod query;
pub mod response;
pub mod routes;
pub mod sequence;
pub mod validation;

pub use client::SearchClient;
pub use query::{ResultsQuery, SearchForm};
pub use response::SearchResponse;
pub use routes::{ApiVariant, Routes};
pub use sequence::{RequestFence, Ticket};
pub use validation::{PickedFile, Rejection, SelectedImage, UploadLimits};
