//! End-to-end flows against a fake backend.

pub mod fake_backend;
pub mod flows;
