//! User identity and remote collection scopes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque user token produced by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named remote collection within a user's partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Bookmarks,
    Notes,
}

impl Collection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bookmarks => "bookmarks",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collection partitioned by identity, e.g. one user's bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub identity: Identity,
    pub collection: Collection,
}

impl Scope {
    pub const fn new(identity: Identity, collection: Collection) -> Self {
        Self {
            identity,
            collection,
        }
    }

    pub fn bookmarks(identity: &Identity) -> Self {
        Self::new(identity.clone(), Collection::Bookmarks)
    }

    pub fn notes(identity: &Identity) -> Self {
        Self::new(identity.clone(), Collection::Notes)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "users/{}/{}", self.identity, self.collection)
    }
}
