//! Result shape shared by geo search and the unified index.

use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// Category of one search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Country,
    City,
    Ocean,
    Note,
    Map,
    Book,
}

impl ResultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::City => "city",
            Self::Ocean => "ocean",
            Self::Note => "note",
            Self::Map => "map",
            Self::Book => "book",
        }
    }
}

/// One entry of `searchResults` in the state tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub id: String,
    pub kind: ResultKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}
