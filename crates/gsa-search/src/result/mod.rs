pub mod decode;
pub mod types;
mod xml;

pub use decode::decode_results;
pub use types::{Facet, FacetItem, KeyMatch, ResultParameter, SearchHit, SearchResult};
