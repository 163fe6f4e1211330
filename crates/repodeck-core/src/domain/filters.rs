//! Search filter snapshot and partial updates.

use serde::{Deserialize, Serialize};

/// Sort field for repository search. Results are always descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Stars,
    Forks,
    Updated,
}

impl SortOrder {
    /// Value of the `sort` query parameter.
    pub const fn as_api_param(self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::Updated => "updated",
        }
    }
}

/// Which list the explorer is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Discover,
    Bookmarks,
}

/// Immutable filter snapshot.
///
/// Replaced wholesale on every change; partial updates are merged into the
/// previous snapshot with [`Filters::merged`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Free-text search query.
    pub query: String,
    pub sort: SortOrder,
    /// Language filter; empty means any language.
    pub language: String,
    pub view: View,
}

impl Filters {
    /// Build a new snapshot with the fields present in `update` replaced.
    #[must_use]
    pub fn merged(&self, update: &FiltersUpdate) -> Self {
        Self {
            query: update.query.clone().unwrap_or_else(|| self.query.clone()),
            sort: update.sort.unwrap_or(self.sort),
            language: update
                .language
                .clone()
                .unwrap_or_else(|| self.language.clone()),
            view: update.view.unwrap_or(self.view),
        }
    }

    /// Whether the language filter is "any".
    pub fn any_language(&self) -> bool {
        self.language.trim().is_empty()
    }
}

/// Partial filter update. `None` fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersUpdate {
    pub query: Option<String>,
    pub sort: Option<SortOrder>,
    pub language: Option<String>,
    pub view: Option<View>,
}

impl FiltersUpdate {
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn view(view: View) -> Self {
        Self {
            view: Some(view),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
