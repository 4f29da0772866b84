//! Core library for the Dropset waitlist.
//!
//! Contains the waitlist service (registrant set with case-insensitive
//! dedup), the per-client sliding-window rate limiter, email shape
//! validation, and the clock abstraction the limiter reads time from. This
//! crate knows nothing about HTTP; `dropset-server` maps its results onto
//! status codes and JSON bodies.

pub mod clock;
pub mod email;
pub mod error;
pub mod rate_limit;
pub mod waitlist;
