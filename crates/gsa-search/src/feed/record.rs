use quick_xml::events::{BytesStart, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::wire::{FeedAction, FeedAuthMethod};

/// Web feeds carry no content, but the appliance still requires the attribute.
const PLACEHOLDER_MIMETYPE: &str = "requiredbutignored";

/// One URL to add, update or delete in the appliance index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedRecord {
    pub url: String,
    /// Shown in results instead of `url`. `Some("")` is sent as a blank
    /// attribute, which the appliance also treats as "use url".
    pub display_url: Option<String>,
    pub action: FeedAction,
    /// Locked records are the last to be evicted at the license limit.
    pub lock: bool,
    /// RFC-822 date, e.g. `Mon, 15 Nov 2004 04:58:08 GMT`. Not validated.
    pub last_modified: String,
    pub auth_method: FeedAuthMethod,
    pub crawl_immediately: bool,
    pub crawl_once: bool,
}

impl FeedRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: FeedAction) -> Self {
        self.action = action;
        self
    }

    pub fn crawl_immediately(mut self) -> Self {
        self.crawl_immediately = true;
        self
    }

    /// The `<record>` start tag with attributes in wire order.
    pub(crate) fn element(&self) -> Result<BytesStart<'_>> {
        if self.url.is_empty() {
            return Err(SearchError::invalid("a feed record must have a url"));
        }

        let mut el = BytesStart::new("record");
        el.push_attribute(("url", self.url.as_str()));
        if let Some(display_url) = &self.display_url {
            el.push_attribute(("displayurl", display_url.as_str()));
        }
        if let Some(action) = self.action.wire_token() {
            el.push_attribute(("action", action));
        }
        el.push_attribute(("lock", bool_attr(self.lock)));
        el.push_attribute(("mimetype", PLACEHOLDER_MIMETYPE));
        if !self.last_modified.is_empty() {
            el.push_attribute(("last-modified", self.last_modified.as_str()));
        }
        el.push_attribute(("authmethod", self.auth_method.wire_token()));
        el.push_attribute(("crawl-immediately", bool_attr(self.crawl_immediately)));
        el.push_attribute(("crawl-once", bool_attr(self.crawl_once)));

        Ok(el)
    }

    /// Render this record as a standalone `<record/>` element.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Empty(self.element()?))
            .map_err(write_error)?;
        String::from_utf8(writer.into_inner()).map_err(write_error)
    }
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub(crate) fn write_error(err: impl std::fmt::Display) -> SearchError {
    SearchError::protocol(format!("failed to write feed xml: {}", err))
}
