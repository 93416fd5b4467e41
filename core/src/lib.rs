//! Synchronous client for the FormSite REST/XML API.
//!
//! # Overview
//! An `Account` lists its forms once when constructed. Each `Form` fetches
//! its status and results on demand, and each `FormResult` carries its meta
//! fields and submitted item values.
//!
//! # Design
//! - `FormSiteClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`. All XML mapping lives in `mapper`.
//! - `Transport` performs the round-trip; `UreqTransport` is the default.
//! - Nothing is cached. Every `status()` / `results()` call is a fresh
//!   blocking request.
//! - Values are kept as the service's text; only list items are structured.

pub mod account;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod mapper;
pub mod transport;
pub mod types;

pub use account::{Account, Form, ResultCollection};
pub use client::FormSiteClient;
pub use config::Credentials;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    FormEntry, FormResult, FormStatus, ItemValue, Items, Limit, LimitKind, ListValues,
    ResultMeta, ResultStatus,
};
