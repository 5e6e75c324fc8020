//! Odoo JSON-RPC client.
//!
//! Talks to `POST {url}/jsonrpc` using the `common` service for login and
//! `object.execute_kw` for model calls, and implements
//! [`RemoteSource`](crate::remote::RemoteSource) on top of that.

mod client;
mod rpc;

pub use client::{OdooClient, OdooConfig};
