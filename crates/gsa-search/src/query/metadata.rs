use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::wire::MetaDataCombinator;

/// First pass: URI escaping that leaves reserved characters alone.
const URI_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'#')
    .remove(b'[')
    .remove(b']');

/// Second pass: form-value encoding, which also escapes the `%` of pass one.
const VALUE_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// A metadata constraint for `partialfields` / `requiredfields`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaDataField {
    pub key: String,
    pub value: String,
    /// Operator placed between this field and the next one in the list.
    #[serde(default)]
    pub combinator: MetaDataCombinator,
    /// Exclude hits carrying this key/value.
    #[serde(default)]
    pub negate: bool,
}

impl MetaDataField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_combinator(mut self, combinator: MetaDataCombinator) -> Self {
        self.combinator = combinator;
        self
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }
}

/// Encode a metadata key or value for embedding inside a single
/// query-string value. The appliance decodes it twice.
///
/// The first pass writes uppercase hex. The second pass writes lowercase
/// hex, the same as the appliance's own form encoder, so `a/b` becomes
/// `a%2fb` while a space becomes `%2520`.
pub fn double_encode(raw: &str) -> String {
    let once = utf8_percent_encode(raw, URI_ESCAPE).to_string();
    let mut out = String::with_capacity(once.len() * 2);
    for chunk in utf8_percent_encode(&once, VALUE_ESCAPE) {
        if chunk.starts_with('%') {
            out.push_str(&chunk.to_ascii_lowercase());
        } else {
            out.push_str(chunk);
        }
    }
    out
}

/// Serialize an ordered field list into the compound `key:value` syntax.
///
/// The combinator of the last field is never written. Callers skip the
/// whole parameter when `fields` is empty.
pub fn encode_fields(fields: &[MetaDataField]) -> String {
    let mut out = String::new();
    let last = fields.len().saturating_sub(1);

    for (i, field) in fields.iter().enumerate() {
        if field.negate {
            out.push('-');
        }
        out.push_str(&double_encode(&field.key));
        out.push(':');
        out.push_str(&double_encode(&field.value));

        if i < last {
            if let Some(op) = field.combinator.wire_token() {
                out.push_str(op);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field() {
        let fields = vec![MetaDataField::new("metakey", "metavalue")];
        assert_eq!(encode_fields(&fields), "metakey:metavalue");
    }

    #[test]
    fn test_and_between_fields() {
        let fields = vec![
            MetaDataField::new("key1", "value1").with_combinator(MetaDataCombinator::And),
            MetaDataField::new("key2", "value2"),
        ];
        assert_eq!(encode_fields(&fields), "key1:value1.key2:value2");
    }

    #[test]
    fn test_or_with_negated_second_field() {
        let fields = vec![
            MetaDataField::new("key1", "value1").with_combinator(MetaDataCombinator::Or),
            MetaDataField::new("key2", "value2").negated(),
        ];
        assert_eq!(encode_fields(&fields), "key1:value1|-key2:value2");
    }

    #[test]
    fn test_trailing_combinator_is_dropped() {
        let fields = vec![
            MetaDataField::new("a", "1").with_combinator(MetaDataCombinator::Or),
            MetaDataField::new("b", "2").with_combinator(MetaDataCombinator::And),
        ];
        assert_eq!(encode_fields(&fields), "a:1|b:2");
    }

    #[test]
    fn test_ignore_combinator_concatenates() {
        let fields = vec![MetaDataField::new("a", "1"), MetaDataField::new("b", "2")];
        assert_eq!(encode_fields(&fields), "a:1b:2");
    }

    #[test]
    fn test_space_is_encoded_twice() {
        assert_eq!(double_encode("Human Resources"), "Human%2520Resources");
        assert_eq!(double_encode("my key"), "my%2520key");
    }

    #[test]
    fn test_non_ascii_is_encoded_twice() {
        assert_eq!(double_encode("ö"), "%25C3%25B6");
    }

    #[test]
    fn test_reserved_characters_escaped_once() {
        // Reserved characters survive the first pass and are escaped by the second.
        assert_eq!(double_encode("a/b"), "a%2fb");
        assert_eq!(double_encode("x-y_z.w"), "x-y_z.w");
    }

    #[test]
    fn test_second_pass_hex_is_lowercase() {
        assert_eq!(double_encode("a:b"), "a%3ab");
        assert_eq!(double_encode("a=b&c"), "a%3db%26c");
        // First-pass escapes keep their uppercase digits.
        assert_eq!(double_encode("ö/"), "%25C3%25B6%2f");

        let fields = vec![MetaDataField::new("url", "http://intra/hr")];
        assert_eq!(encode_fields(&fields), "url:http%3a%2f%2fintra%2fhr");
    }
}
