//! Catalog search query construction

use std::fmt;

/// The intent behind one catalog search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Comma-separated interests, each searched as a genre
    Interests(String),
    /// Tracks by a named artist
    Artist(String),
    /// Tracks in a spoken or sung language
    Language(String),
}

impl SearchQuery {
    /// Render the search clause string
    ///
    /// Interests become space-joined `genre:` clauses, one per trimmed,
    /// non-empty segment. Artist and language values are percent-encoded
    /// inside their clause.
    pub fn clause(&self) -> String {
        match self {
            SearchQuery::Interests(interests) => interests
                .split(',')
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(|term| format!("genre:{}", term))
                .collect::<Vec<_>>()
                .join(" "),
            SearchQuery::Artist(artist) => format!("artist:{}", urlencoding::encode(artist)),
            SearchQuery::Language(language) => {
                format!("language:{}", urlencoding::encode(language))
            }
        }
    }

    /// Render the value placed in the `q` query parameter
    ///
    /// Only the interests clause is encoded as a whole; artist and language
    /// clauses already carry an encoded value and are sent as they are.
    pub fn q_param(&self) -> String {
        match self {
            SearchQuery::Interests(_) => urlencoding::encode(&self.clause()).into_owned(),
            SearchQuery::Artist(_) | SearchQuery::Language(_) => self.clause(),
        }
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            SearchQuery::Interests(_) => "interests",
            SearchQuery::Artist(_) => "artist",
            SearchQuery::Language(_) => "language",
        }
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clause())
    }
}
