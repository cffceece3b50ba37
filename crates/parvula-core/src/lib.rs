//! Component resolver for Parvula.
//!
//! `ComponentResolver` turns a symbolic front-end package name into a URI that a
//! template can embed, either from the local component directory (through the
//! package's bower manifest or an explicit path) or from a registered CDN URL.
//! Each package is emitted at most once per resolver, whichever strategy
//! emitted it first.

pub mod cdn;
pub mod config;
pub mod load_state;
pub mod resolver;

pub use cdn::CdnRegistry;
pub use config::ResolverConfig;
pub use load_state::{LoadSource, LoadState};
pub use resolver::ComponentResolver;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("store error: {0}")]
    Store(#[from] parvula_store::StoreError),
    #[error("package not registered on a CDN: {0}")]
    NotRegistered(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_display_not_registered() {
        let e = CoreError::NotRegistered("foo".to_owned());
        let msg = e.to_string();
        assert!(msg.contains("not registered"));
        assert!(msg.contains("foo"));
    }

    #[test]
    fn core_error_wraps_store_error() {
        let e: CoreError = parvula_store::StoreError::LockFailed("busy".to_owned()).into();
        assert!(e.to_string().starts_with("store error:"));
    }
}
