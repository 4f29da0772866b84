//! Dropset waitlist HTTP server.
//!
//! Wires the waitlist service from `dropset-core` into an Axum router that
//! serves `POST /waitlist`, `GET /waitlist` and a `/health` probe for the
//! landing page.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
