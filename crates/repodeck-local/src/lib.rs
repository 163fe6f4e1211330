#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod document_store;
pub mod identity;

pub use document_store::MemoryDocumentStore;
pub use identity::AnonymousIdentityProvider;

#[cfg(test)]
use tokio_test as _;
