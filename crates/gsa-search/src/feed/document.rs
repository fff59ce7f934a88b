use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

use super::record::{write_error, FeedRecord};
use crate::error::Result;

const FEED_PROLOG: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<!DOCTYPE gsafeed PUBLIC \"-//Google//DTD GSA Feeds//EN\" \"\">\n";

pub const FEED_DATASOURCE: &str = "web";
pub const FEED_TYPE: &str = "incremental";

/// A batch of records, always sent as one incremental web feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub records: Vec<FeedRecord>,
}

impl Feed {
    pub fn new(records: Vec<FeedRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: FeedRecord) {
        self.records.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the complete feed document. Fails if any record lacks a url.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.get_mut().extend_from_slice(FEED_PROLOG.as_bytes());

        let mut events = vec![
            Event::Start(BytesStart::new("gsafeed")),
            Event::Start(BytesStart::new("header")),
            Event::Start(BytesStart::new("datasource")),
            Event::Text(BytesText::new(FEED_DATASOURCE)),
            Event::End(BytesEnd::new("datasource")),
            Event::Start(BytesStart::new("feedtype")),
            Event::Text(BytesText::new(FEED_TYPE)),
            Event::End(BytesEnd::new("feedtype")),
            Event::End(BytesEnd::new("header")),
            Event::Start(BytesStart::new("group")),
        ];
        for record in &self.records {
            events.push(Event::Empty(record.element()?));
        }
        events.push(Event::End(BytesEnd::new("group")));
        events.push(Event::End(BytesEnd::new("gsafeed")));

        for event in events {
            writer.write_event(event).map_err(write_error)?;
        }

        String::from_utf8(writer.into_inner()).map_err(write_error)
    }
}
