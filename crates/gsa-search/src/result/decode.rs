use std::str::FromStr;

use tracing::warn;

use super::types::{Facet, FacetItem, KeyMatch, ResultParameter, SearchHit, SearchResult};
use super::xml::{parse_document, Element};
use crate::wire::FacetType;

pub const NO_ROOT_ERROR: &str = "The XML appears malformed. No root element found.";

/// Decode an appliance XML response.
///
/// Never fails: malformed input is reported through `SearchResult::error`.
/// Every element is optional; a missing element leaves its field at the
/// default value.
pub fn decode_results(xml: &str) -> SearchResult {
    let root = match parse_document(xml) {
        Ok(Some(root)) => root,
        Ok(None) => return SearchResult::failed(NO_ROOT_ERROR),
        Err(e) => {
            warn!(error = %e, "Failed to parse appliance response");
            return SearchResult::failed(format!("The XML appears malformed: {}", e));
        }
    };

    let mut result = SearchResult::default();

    if let Some(ver) = root.attr("VER") {
        result.version = ver.to_string();
    }
    if let Some(tm) = root.child("TM") {
        result.execution_time = tm.text();
    }
    if let Some(q) = root.child("Q") {
        result.query = q.text();
    }

    result.parameters = root.children("PARAM").filter_map(decode_parameter).collect();

    if let Some(res) = root.child("RES") {
        if let Some(m) = res.child("M") {
            result.number_of_hits = parse_or_default("RES/M", &m.text());
        }
        if let Some(fi) = res.child("FI") {
            result.filtering = fi.text();
        }
        if let Some(nb) = res.child("NB") {
            if let Some(nu) = nb.child("NU") {
                result.next_url = nu.text();
            }
            if let Some(np) = nb.child("NP") {
                result.previous_url = np.text();
            }
        }

        result.search_hits = res.children("R").filter_map(decode_hit).collect();

        if let Some(parm) = res.child("PARM") {
            result.facets = parm.children("PMT").map(decode_facet).collect();
        }
    }

    result.key_matches = root.children("GM").map(decode_key_match).collect();

    if let Some(spelling) = root.child("Spelling") {
        result.spelling_suggestions = query_attrs(spelling, "Suggestion");
    }
    if let Some(synonyms) = root.child("Synonyms") {
        result.synonyms = query_attrs(synonyms, "OneSynonym");
    }

    result
}

fn decode_parameter(param: &Element) -> Option<ResultParameter> {
    Some(ResultParameter {
        name: param.attr("name")?.to_string(),
        value: param.attr("value")?.to_string(),
        original_value: param.attr("original_value")?.to_string(),
    })
}

fn decode_hit(r: &Element) -> Option<SearchHit> {
    let index = match r.attr("N").map(|n| n.trim().parse::<i64>()) {
        Some(Ok(n)) => n,
        _ => {
            warn!(n = ?r.attr("N"), "Dropping search hit without a numeric index");
            return None;
        }
    };

    let mut hit = SearchHit {
        index,
        ..Default::default()
    };

    if let Some(u) = r.child("U") {
        hit.url = u.text();
    }
    if let Some(ue) = r.child("UE") {
        hit.encoded_url = ue.text();
    }
    if let Some(t) = r.child("T") {
        hit.title = t.text();
    }
    if let Some(rk) = r.child("RK") {
        hit.rating = parse_or_default("R/RK", &rk.text());
    }
    if let Some(s) = r.child("S") {
        hit.snippet = s.text();
    }
    if let Some(mime) = r.attr("MIME") {
        hit.mime_type = mime.to_string();
    }
    if let Some(sz) = r
        .child("HAS")
        .and_then(|has| has.child("C"))
        .and_then(|c| c.attr("SZ"))
    {
        hit.size = sz.to_string();
    }

    for mt in r.children("MT") {
        if let (Some(n), Some(v)) = (mt.attr("N"), mt.attr("V")) {
            hit.meta_tags
                .entry(n.to_string())
                .or_insert_with(|| v.to_string());
        }
    }

    Some(hit)
}

fn decode_facet(pmt: &Element) -> Facet {
    let mut facet = Facet::default();

    if let Some(nm) = pmt.attr("NM") {
        facet.meta_name = nm.to_string();
    }
    if let Some(dn) = pmt.attr("DN") {
        facet.display_name = dn.to_string();
    }
    if let Some(ir) = pmt.attr("IR") {
        facet.is_range = parse_or_default::<i64>("PMT/IR", ir) > 0;
    }
    if let Some(t) = pmt.attr("T") {
        facet.facet_type = parse_facet_type(t);
    }

    facet.facet_items = pmt
        .children("PV")
        .map(|pv| FacetItem {
            value: pv.attr("V").unwrap_or_default().to_string(),
            low_range: pv.attr("L").unwrap_or_default().to_string(),
            high_range: pv.attr("H").unwrap_or_default().to_string(),
            count: pv.attr("C").map(|c| parse_or_default("PV/C", c)).unwrap_or(0),
            meta_name: facet.meta_name.clone(),
        })
        .collect();

    facet
}

fn decode_key_match(gm: &Element) -> KeyMatch {
    KeyMatch {
        url: gm.child("GL").map(Element::text).unwrap_or_default(),
        description: gm.child("GD").map(Element::text).unwrap_or_default(),
    }
}

fn query_attrs(parent: &Element, child: &str) -> Vec<String> {
    parent
        .children(child)
        .filter_map(|el| el.attr("q"))
        .map(str::to_string)
        .collect()
}

fn parse_facet_type(raw: &str) -> FacetType {
    let parsed = raw
        .trim()
        .parse::<i64>()
        .map_err(|e| e.to_string())
        .and_then(|n| FacetType::try_from(n).map_err(|e| e.to_string()));
    match parsed {
        Ok(t) => t,
        Err(e) => {
            warn!(value = raw, error = %e, "Unknown facet type, using default");
            FacetType::default()
        }
    }
}

/// Numeric fields are optional; an unparsable value is logged and left at zero.
fn parse_or_default<T: FromStr + Default>(field: &str, raw: &str) -> T {
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(field, value = raw, "Ignoring non-numeric value");
            T::default()
        }
    }
}
