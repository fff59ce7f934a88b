use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base::BaseQuery;
use super::metadata::{encode_fields, MetaDataField};
use super::{push_non_empty, push_param};
use crate::error::Result;
use crate::wire::{
    QueryExpansion, QueryFilter, RelevanceScoring, SearchLocation, SiteSearchModification,
};

pub const MAX_SEARCH_HITS: u32 = 100;
pub const MAX_KEY_MATCHES: u32 = 5;
const DEFAULT_ENCODING: &str = "utf8";

/// Full description of a search request against the appliance.
///
/// String fields left empty and enum fields left at `Ignore` are not sent,
/// so the front end's own defaults apply. `0` for `max_search_hits`,
/// `max_key_matches` or `start` also means "not sent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDescription {
    #[serde(flatten)]
    pub base: BaseQuery,
    /// Applies to `as_site_to_search`.
    pub site_search_modification: SiteSearchModification,
    /// Phrase appended to the user's term (`as_epq`).
    pub additional_query_phrase: String,
    /// Terms that must not occur in hits (`as_eq`).
    pub excluded_query_terms: String,
    /// Only return pages linking to this URL (`as_lq`).
    pub linked_url: String,
    pub search_location: SearchLocation,
    /// OR-ed with the user's term (`as_oq`).
    pub combined_search_term: String,
    /// AND-ed with the user's term (`as_q`).
    pub added_search_term: String,
    /// Site restriction echoed in the query (`as_sitesearch`).
    pub as_site_to_search: String,
    pub query_expansion: QueryExpansion,
    pub relevance_scoring: RelevanceScoring,
    pub filter: QueryFilter,
    /// Meta tags to return with each hit (`getfields`), already double encoded.
    pub get_meta_fields: String,
    /// Query string encoding (`ie`); `utf8` when empty.
    pub query_encoding: String,
    /// Language restriction (`lr`).
    pub restrict_to_language: String,
    /// Hits per page (`num`), clamped to 1..=100.
    pub max_search_hits: u32,
    /// KeyMatch results (`numgm`), clamped to 1..=5.
    pub max_key_matches: u32,
    /// Result encoding (`oe`); `utf8` when empty.
    pub result_encoding: String,
    pub partial_fields: Vec<MetaDataField>,
    pub required_fields: Vec<MetaDataField>,
    /// Site restriction not echoed in the query (`sitesearch`).
    pub site_to_search: String,
    pub sort: String,
    /// Zero-based offset of the first hit (`start`).
    pub start: u32,
}

impl QueryDescription {
    pub fn new(host_address: impl Into<String>, search_term: impl Into<String>) -> Self {
        Self {
            base: BaseQuery::new(host_address, search_term),
            ..Default::default()
        }
    }

    /// Build the request URL. Fails only when no host address is set.
    pub fn encode(&self) -> Result<String> {
        let mut url = self.base.encode_prefix()?;

        if let Some(token) = self.site_search_modification.wire_token() {
            push_param(&mut url, "ad_dt", token);
        }
        push_non_empty(&mut url, "as_epq", &self.additional_query_phrase);
        push_non_empty(&mut url, "as_eq", &self.excluded_query_terms);
        push_non_empty(&mut url, "as_lq", &self.linked_url);
        if let Some(token) = self.search_location.wire_token() {
            push_param(&mut url, "as_occt", token);
        }
        push_non_empty(&mut url, "as_oq", &self.combined_search_term);
        push_non_empty(&mut url, "as_q", &self.added_search_term);
        push_non_empty(&mut url, "as_sitesearch", &self.as_site_to_search);
        if let Some(token) = self.query_expansion.wire_token() {
            push_param(&mut url, "entqr", token);
        }
        if let Some(token) = self.relevance_scoring.wire_token() {
            push_param(&mut url, "entsp", token);
        }
        if let Some(token) = self.filter.wire_token() {
            push_param(&mut url, "filter", token);
        }
        push_non_empty(&mut url, "getfields", &self.get_meta_fields);
        push_param(&mut url, "ie", or_default_encoding(&self.query_encoding));
        push_non_empty(&mut url, "lr", &self.restrict_to_language);
        if let Some(num) = clamp_limit(self.max_search_hits, MAX_SEARCH_HITS) {
            push_param(&mut url, "num", &num.to_string());
        }
        if let Some(numgm) = clamp_limit(self.max_key_matches, MAX_KEY_MATCHES) {
            push_param(&mut url, "numgm", &numgm.to_string());
        }
        push_param(&mut url, "oe", or_default_encoding(&self.result_encoding));
        push_param(&mut url, "output", "xml_no_dtd");
        if !self.partial_fields.is_empty() {
            push_param(&mut url, "partialfields", &encode_fields(&self.partial_fields));
        }
        if !self.required_fields.is_empty() {
            push_param(&mut url, "requiredfields", &encode_fields(&self.required_fields));
        }
        push_non_empty(&mut url, "sitesearch", &self.site_to_search);
        push_non_empty(&mut url, "sort", &self.sort);
        if self.start > 0 {
            push_param(&mut url, "start", &self.start.to_string());
        }

        debug!(url = %url, "Encoded search query");
        Ok(url)
    }

    pub fn domain(&self) -> Result<String> {
        self.base.domain()
    }
}

/// `0` is the "use the appliance default" signal and yields `None`.
fn clamp_limit(requested: u32, max: u32) -> Option<u32> {
    match requested {
        0 => None,
        n => Some(n.min(max)),
    }
}

fn or_default_encoding(encoding: &str) -> &str {
    if encoding.is_empty() {
        DEFAULT_ENCODING
    } else {
        encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::wire::{MetaDataCombinator, SearchAccess};

    const HOST: &str = "http://google04.domain.se/search/";

    fn query(term: &str) -> QueryDescription {
        QueryDescription::new(HOST, term)
    }

    #[test]
    fn test_missing_host_fails() {
        let q = QueryDescription::default();
        assert!(matches!(q.encode(), Err(SearchError::InvalidArgument(_))));
    }

    #[test]
    fn test_defaults_only() {
        let q = QueryDescription::new(HOST, "");
        assert_eq!(
            q.encode().unwrap(),
            "http://google04.domain.se/search/?q=&ie=utf8&oe=utf8&output=xml_no_dtd"
        );
    }

    #[test]
    fn test_access_tokens() {
        let mut q = query("apa");
        q.base.access = SearchAccess::Public;
        assert!(q.encode().unwrap().contains("&access=p"));
        q.base.access = SearchAccess::Secure;
        assert!(q.encode().unwrap().contains("&access=s"));
        q.base.access = SearchAccess::All;
        assert!(q.encode().unwrap().contains("&access=a"));
        q.base.access = SearchAccess::Ignore;
        assert!(!q.encode().unwrap().contains("&access="));
    }

    #[test]
    fn test_site_search_modification() {
        let mut q = query("apa");
        q.site_search_modification = SiteSearchModification::Include;
        assert!(q.encode().unwrap().contains("&ad_dt=i"));
        q.site_search_modification = SiteSearchModification::Exclude;
        assert!(q.encode().unwrap().contains("&ad_dt=e"));
    }

    #[test]
    fn test_free_text_fields_are_verbatim() {
        let q = QueryDescription {
            additional_query_phrase: "phrase".into(),
            excluded_query_terms: "exclude me".into(),
            linked_url: "http://x.se/".into(),
            combined_search_term: "combine".into(),
            added_search_term: "added".into(),
            as_site_to_search: "site".into(),
            ..query("apa")
        };
        let url = q.encode().unwrap();
        assert!(url.contains("&as_epq=phrase"));
        assert!(url.contains("&as_eq=exclude me"));
        assert!(url.contains("&as_lq=http://x.se/"));
        assert!(url.contains("&as_oq=combine"));
        assert!(url.contains("&as_q=added"));
        assert!(url.contains("&as_sitesearch=site"));
    }

    #[test]
    fn test_enum_fragments() {
        let q = QueryDescription {
            search_location: SearchLocation::Title,
            query_expansion: QueryExpansion::Local,
            relevance_scoring: RelevanceScoring::Standard,
            filter: QueryFilter::SnippetOnly,
            ..query("apa")
        };
        let url = q.encode().unwrap();
        assert!(url.contains("&as_occt=title"));
        assert!(url.contains("&entqr=2"));
        assert!(url.contains("&entsp=0"));
        assert!(url.contains("&filter=p"));
    }

    #[test]
    fn test_max_hits_clamping() {
        let mut q = query("apa");
        q.max_search_hits = 81909;
        assert!(q.encode().unwrap().contains("&num=100"));
        q.max_search_hits = 25;
        assert!(q.encode().unwrap().contains("&num=25"));
        q.max_search_hits = 0;
        assert!(!q.encode().unwrap().contains("&num="));
    }

    #[test]
    fn test_max_key_matches_clamping() {
        let mut q = query("apa");
        q.max_key_matches = 7;
        assert!(q.encode().unwrap().contains("&numgm=5"));
        q.max_key_matches = 0;
        assert!(!q.encode().unwrap().contains("&numgm="));
    }

    #[test]
    fn test_custom_encodings() {
        let q = QueryDescription {
            query_encoding: "latin1".into(),
            result_encoding: "latin1".into(),
            ..query("apa")
        };
        let url = q.encode().unwrap();
        assert!(url.contains("&ie=latin1"));
        assert!(url.contains("&oe=latin1"));
        assert!(!url.contains("utf8"));
    }

    #[test]
    fn test_start_only_when_positive() {
        let mut q = query("apa");
        assert!(!q.encode().unwrap().contains("&start="));
        q.start = 20;
        assert!(q.encode().unwrap().ends_with("&start=20"));
    }

    #[test]
    fn test_metadata_blocks() {
        let mut q = query("Meta");
        assert!(!q.encode().unwrap().contains("&partialfields="));
        assert!(!q.encode().unwrap().contains("&requiredfields="));

        q.partial_fields.push(MetaDataField::new("metakey", "metavalue"));
        q.required_fields.push(
            MetaDataField::new("department", "Human Resources")
                .with_combinator(MetaDataCombinator::And),
        );
        q.required_fields.push(MetaDataField::new("metakey2", "metavalue2"));

        let url = q.encode().unwrap();
        assert!(url.contains("&partialfields=metakey:metavalue"));
        assert!(url.contains("&requiredfields=department:Human%2520Resources.metakey2:metavalue2"));
    }

    #[test]
    fn test_full_fragment_order() {
        let q = QueryDescription {
            base: BaseQuery {
                host_address: "http://gsa/search".into(),
                search_term: "t".into(),
                access: SearchAccess::All,
                client: "c".into(),
                collections: "col".into(),
            },
            site_search_modification: SiteSearchModification::Exclude,
            additional_query_phrase: "ep".into(),
            excluded_query_terms: "eq".into(),
            linked_url: "lq".into(),
            search_location: SearchLocation::Url,
            combined_search_term: "oq".into(),
            added_search_term: "q".into(),
            as_site_to_search: "ss".into(),
            query_expansion: QueryExpansion::None,
            relevance_scoring: RelevanceScoring::Advanced,
            filter: QueryFilter::SnippetAndDirectory,
            get_meta_fields: "*".into(),
            query_encoding: String::new(),
            restrict_to_language: "lang_sv".into(),
            max_search_hits: 10,
            max_key_matches: 3,
            result_encoding: String::new(),
            partial_fields: vec![MetaDataField::new("p", "1")],
            required_fields: vec![MetaDataField::new("r", "2")],
            site_to_search: "site".into(),
            sort: "date:D:S:d1".into(),
            start: 10,
        };

        assert_eq!(
            q.encode().unwrap(),
            "http://gsa/search?q=t&access=a&client=c&site=col&ad_dt=e&as_epq=ep&as_eq=eq\
             &as_lq=lq&as_occt=url&as_oq=oq&as_q=q&as_sitesearch=ss&entqr=0&entsp=a\
             &filter=1&getfields=*&ie=utf8&lr=lang_sv&num=10&numgm=3&oe=utf8\
             &output=xml_no_dtd&partialfields=p:1&requiredfields=r:2&sitesearch=site\
             &sort=date:D:S:d1&start=10"
        );
    }
}
