//! Cross-crate integration tests for the proxy/bus contract.

pub mod e2e_proxy;
pub mod failure_paths;
