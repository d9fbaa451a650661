//! # License Dashboard Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fake_backend.rs   # axum server speaking the call_kw JSON-RPC dialect
//!     └── flows.rs          # full load cycles through the HTTP transport
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ld-tests
//! cargo test -p ld-tests integration::flows::
//! ```

pub mod integration;
