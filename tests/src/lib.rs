//! # Service-Proxy Test Suite
//!
//! Unified test crate covering the cross-crate contract:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── e2e_proxy.rs      # Caller → proxy → bus → handler → caller flows
//!     ├── failure_paths.rs  # Contract, remote, and transport failures
//!     └── concurrency.rs    # In-flight independence and reply ordering
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p proxy-tests
//! cargo test -p proxy-tests integration::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
