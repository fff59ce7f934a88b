//! Domain enums and the tokens the appliance expects for them on the wire.
//!
//! Every `Ignore` variant maps to `None`: the corresponding query-string
//! fragment (or feed attribute) is left out and the appliance falls back to
//! the front end's configured default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Which content a search may see. Query-string key `access`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAccess {
    #[default]
    Ignore,
    Public,
    Secure,
    All,
}

impl SearchAccess {
    pub fn wire_token(self) -> Option<&'static str> {
        match self {
            SearchAccess::Ignore => None,
            SearchAccess::Public => Some("p"),
            SearchAccess::Secure => Some("s"),
            SearchAccess::All => Some("a"),
        }
    }

    /// Secure and all-access searches carry the caller's session cookie.
    pub fn needs_credentials(self) -> bool {
        matches!(self, SearchAccess::Secure | SearchAccess::All)
    }
}

impl FromStr for SearchAccess {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "ignore" => Ok(SearchAccess::Ignore),
            "p" | "public" => Ok(SearchAccess::Public),
            "s" | "secure" => Ok(SearchAccess::Secure),
            "a" | "all" => Ok(SearchAccess::All),
            other => Err(unknown("search access", other)),
        }
    }
}

/// Include or exclude the site given in `as_sitesearch`. Key `as_dt`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteSearchModification {
    #[default]
    Ignore,
    Include,
    Exclude,
}

impl SiteSearchModification {
    pub fn wire_token(self) -> Option<&'static str> {
        match self {
            SiteSearchModification::Ignore => None,
            SiteSearchModification::Include => Some("i"),
            SiteSearchModification::Exclude => Some("e"),
        }
    }
}

impl FromStr for SiteSearchModification {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "ignore" => Ok(SiteSearchModification::Ignore),
            "i" | "include" => Ok(SiteSearchModification::Include),
            "e" | "exclude" => Ok(SiteSearchModification::Exclude),
            other => Err(unknown("site search modification", other)),
        }
    }
}

/// Where on a page the query terms must occur. Key `as_occt`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchLocation {
    #[default]
    Ignore,
    Title,
    Url,
    Anywhere,
}

impl SearchLocation {
    pub fn wire_token(self) -> Option<&'static str> {
        match self {
            SearchLocation::Ignore => None,
            SearchLocation::Title => Some("title"),
            SearchLocation::Url => Some("url"),
            SearchLocation::Anywhere => Some("any"),
        }
    }
}

impl FromStr for SearchLocation {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "ignore" => Ok(SearchLocation::Ignore),
            "title" => Ok(SearchLocation::Title),
            "url" => Ok(SearchLocation::Url),
            "any" | "anywhere" => Ok(SearchLocation::Anywhere),
            other => Err(unknown("search location", other)),
        }
    }
}

/// Query expansion policy. Key `entqr`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryExpansion {
    #[default]
    Ignore,
    None,
    Standard,
    Local,
    Full,
}

impl QueryExpansion {
    pub fn wire_token(self) -> Option<&'static str> {
        match self {
            QueryExpansion::Ignore => None,
            QueryExpansion::None => Some("0"),
            QueryExpansion::Standard => Some("1"),
            QueryExpansion::Local => Some("2"),
            QueryExpansion::Full => Some("3"),
        }
    }
}

impl FromStr for QueryExpansion {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "ignore" => Ok(QueryExpansion::Ignore),
            "none" => Ok(QueryExpansion::None),
            "standard" => Ok(QueryExpansion::Standard),
            "local" => Ok(QueryExpansion::Local),
            "full" => Ok(QueryExpansion::Full),
            other => Err(unknown("query expansion", other)),
        }
    }
}

/// Relevance scoring mode. Key `entsp`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceScoring {
    #[default]
    Ignore,
    Standard,
    Advanced,
}

impl RelevanceScoring {
    pub fn wire_token(self) -> Option<&'static str> {
        match self {
            RelevanceScoring::Ignore => None,
            RelevanceScoring::Standard => Some("0"),
            RelevanceScoring::Advanced => Some("a"),
        }
    }
}

impl FromStr for RelevanceScoring {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "ignore" => Ok(RelevanceScoring::Ignore),
            "standard" => Ok(RelevanceScoring::Standard),
            "advanced" => Ok(RelevanceScoring::Advanced),
            other => Err(unknown("relevance scoring", other)),
        }
    }
}

/// Automatic result filtering. Key `filter`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFilter {
    #[default]
    Ignore,
    SnippetAndDirectory,
    None,
    DirectoryOnly,
    SnippetOnly,
}

impl QueryFilter {
    pub fn wire_token(self) -> Option<&'static str> {
        match self {
            QueryFilter::Ignore => None,
            QueryFilter::SnippetAndDirectory => Some("1"),
            QueryFilter::None => Some("0"),
            QueryFilter::DirectoryOnly => Some("s"),
            QueryFilter::SnippetOnly => Some("p"),
        }
    }
}

impl FromStr for QueryFilter {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "ignore" => Ok(QueryFilter::Ignore),
            "snippet_and_directory" | "snippet-and-dir" => Ok(QueryFilter::SnippetAndDirectory),
            "none" => Ok(QueryFilter::None),
            "directory_only" | "dir-only" => Ok(QueryFilter::DirectoryOnly),
            "snippet_only" | "snippet-only" => Ok(QueryFilter::SnippetOnly),
            other => Err(unknown("query filter", other)),
        }
    }
}

/// Operator joining a metadata field to the one that follows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaDataCombinator {
    #[default]
    Ignore,
    And,
    Or,
}

impl MetaDataCombinator {
    pub fn wire_token(self) -> Option<&'static str> {
        match self {
            MetaDataCombinator::Ignore => None,
            MetaDataCombinator::And => Some("."),
            MetaDataCombinator::Or => Some("|"),
        }
    }
}

impl FromStr for MetaDataCombinator {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "ignore" => Ok(MetaDataCombinator::Ignore),
            "." | "and" => Ok(MetaDataCombinator::And),
            "|" | "or" => Ok(MetaDataCombinator::Or),
            other => Err(unknown("metadata combinator", other)),
        }
    }
}

/// Value type of a dynamic navigation facet, sent as an integer `T` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetType {
    #[default]
    Integer,
    String,
    Float,
    Currency,
    Date,
}

impl TryFrom<i64> for FacetType {
    type Error = SearchError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FacetType::Integer),
            1 => Ok(FacetType::String),
            2 => Ok(FacetType::Float),
            3 => Ok(FacetType::Currency),
            4 => Ok(FacetType::Date),
            other => Err(SearchError::invalid(format!("facet type {} out of range", other))),
        }
    }
}

/// What the appliance should do with a fed URL. `Ignore` means add.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedAction {
    #[default]
    Ignore,
    Add,
    Delete,
}

impl FeedAction {
    pub fn wire_token(self) -> Option<&'static str> {
        match self {
            FeedAction::Ignore => None,
            FeedAction::Add => Some("add"),
            FeedAction::Delete => Some("delete"),
        }
    }
}

impl FromStr for FeedAction {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "ignore" => Ok(FeedAction::Ignore),
            "add" => Ok(FeedAction::Add),
            "delete" => Ok(FeedAction::Delete),
            other => Err(unknown("feed action", other)),
        }
    }
}

/// Authorization the crawler needs to fetch a fed URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedAuthMethod {
    #[default]
    None,
    HttpBasic,
    Ntlm,
    HttpSso,
}

impl FeedAuthMethod {
    pub fn wire_token(self) -> &'static str {
        match self {
            FeedAuthMethod::None => "none",
            FeedAuthMethod::HttpBasic => "httpbasic",
            FeedAuthMethod::Ntlm => "ntlm",
            FeedAuthMethod::HttpSso => "httpsso",
        }
    }
}

impl FromStr for FeedAuthMethod {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "none" => Ok(FeedAuthMethod::None),
            "httpbasic" => Ok(FeedAuthMethod::HttpBasic),
            "ntlm" => Ok(FeedAuthMethod::Ntlm),
            "httpsso" => Ok(FeedAuthMethod::HttpSso),
            other => Err(unknown("feed auth method", other)),
        }
    }
}

impl fmt::Display for FeedAuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_token())
    }
}

fn unknown(what: &str, value: &str) -> SearchError {
    SearchError::invalid(format!("unknown {} value '{}'", what, value))
}
