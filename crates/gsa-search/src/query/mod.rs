pub mod base;
pub mod metadata;
pub mod search;
pub mod suggest;

pub use base::BaseQuery;
pub use metadata::{double_encode, encode_fields, MetaDataField};
pub use search::QueryDescription;
pub use suggest::SuggestionQueryDescription;

/// Append one `&name=value` fragment. Values are inserted verbatim.
pub(crate) fn push_param(out: &mut String, name: &str, value: &str) {
    out.push('&');
    out.push_str(name);
    out.push('=');
    out.push_str(value);
}

/// Append the fragment only when `value` is non-empty.
pub(crate) fn push_non_empty(out: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        push_param(out, name, value);
    }
}
