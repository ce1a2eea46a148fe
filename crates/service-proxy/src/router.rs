//! # Address Router
//!
//! Resolves a logical service name to its bus address. Pure, deterministic,
//! one-to-one, no I/O: the set of known services is a closed enum, so an
//! unresolvable name cannot be written down.

use std::fmt;

/// Logical services with well-known bus addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
    /// Fetches documents from the backing content repository.
    RepositoryConnector,

    /// Splits a repository document into processable fragments.
    FragmentSplitter,

    /// Assembles processed fragments back into a document.
    FragmentAssembler,
}

impl ServiceName {
    /// The bus address this service listens on.
    #[must_use]
    pub const fn address(self) -> &'static str {
        match self {
            Self::RepositoryConnector => "repository.connector",
            Self::FragmentSplitter => "fragment.splitter",
            Self::FragmentAssembler => "fragment.assembler",
        }
    }
}

/// An immutable bus address: a string key identifying a logical endpoint.
///
/// Stable for the lifetime of a proxy handle; cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Wrap an address string.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl From<ServiceName> for Address {
    fn from(service: ServiceName) -> Self {
        resolve(service)
    }
}

/// Resolve a logical service name to its bus address.
#[must_use]
pub fn resolve(service: ServiceName) -> Address {
    Address::new(service.address())
}
