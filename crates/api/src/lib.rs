//! HTTP boundary: Basic-Auth gate in front of role-protected routes.
//!
//! Access outcomes map to status codes and nothing else:
//! granted → 200, forbidden → 403, unauthorized → 401.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
