//! Client for the Fuse aggregation API.
//!
//! Fuse sits in front of several bank-connectivity providers (Plaid,
//! Teller, MX) and exposes one set of endpoints for linking accounts and
//! reading their data. This crate owns the transport concerns: base URL
//! selection per environment, credential headers, request dispatch, and
//! webhook signature verification. Response translation into other wire
//! shapes lives with the callers.

pub mod client;
pub mod http;
pub mod model;

pub use client::{
    Builder, ClientError, Environment, Fuse, API_KEY_HEADER, CLIENT_ID_HEADER, VERIFICATION_HEADER,
};
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
