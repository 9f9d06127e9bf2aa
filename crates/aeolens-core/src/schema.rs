//! JSON-LD structured data extraction
//!
//! Malformed blocks are common in the wild and are skipped silently.

use scraper::{Html, Selector};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

/// Extract the raw text of every JSON-LD script block
pub fn extract_json_ld_blocks(document: &Html) -> Vec<String> {
    let Ok(script_selector) = Selector::parse("script") else {
        return Vec::new();
    };

    document
        .select(&script_selector)
        .filter_map(|element| {
            let script_type = element
                .value()
                .attr("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .unwrap_or_default();

            // Use contains() to catch variations like "application/ld+json; charset=utf-8"
            if script_type.contains("ld+json") {
                let text = element.text().collect::<String>().trim().to_string();
                if text.is_empty() { None } else { Some(text) }
            } else {
                None
            }
        })
        .collect()
}

/// Parse every JSON-LD block; top-level arrays are flattened into their items
pub fn extract_structured_data(document: &Html) -> Vec<JsonValue> {
    parse_blocks(&extract_json_ld_blocks(document))
}

pub(crate) fn parse_blocks(blocks: &[String]) -> Vec<JsonValue> {
    let mut items = Vec::new();
    for block in blocks {
        match serde_json::from_str::<JsonValue>(block) {
            Ok(JsonValue::Array(arr)) => items.extend(arr.into_iter().filter(JsonValue::is_object)),
            Ok(value @ JsonValue::Object(_)) => items.push(value),
            // Primitives and parse failures are not usable schema
            _ => {}
        }
    }
    items
}

/// Whether any structured data object (or `@graph` member) declares `type_name`
pub fn has_schema_type(document: &Html, type_name: &str) -> bool {
    schema_has_type(&extract_structured_data(document), type_name)
}

/// Same as [`has_schema_type`] over already extracted data
pub fn schema_has_type(data: &[JsonValue], type_name: &str) -> bool {
    schema_nodes(data).any(|node| node_has_type(node, type_name))
}

/// Every declared `@type`, sorted and deduplicated
pub fn schema_types(data: &[JsonValue]) -> BTreeSet<String> {
    schema_nodes(data)
        .flat_map(|node| declared_types(node).into_iter())
        .collect()
}

/// Top-level objects plus the members of their `@graph` arrays
pub fn schema_nodes(data: &[JsonValue]) -> impl Iterator<Item = &JsonValue> {
    data.iter().flat_map(|item| {
        let graph = item
            .get("@graph")
            .and_then(JsonValue::as_array)
            .map(|members| members.iter().filter(|m| m.is_object()))
            .into_iter()
            .flatten();
        std::iter::once(item).chain(graph)
    })
}

/// First value of `property` on any node
pub fn find_property<'a>(data: &'a [JsonValue], property: &str) -> Option<&'a JsonValue> {
    schema_nodes(data).find_map(|node| node.get(property))
}

fn node_has_type(node: &JsonValue, type_name: &str) -> bool {
    declared_types(node).iter().any(|t| t == type_name)
}

fn declared_types(node: &JsonValue) -> Vec<String> {
    match node.get("@type") {
        Some(JsonValue::String(s)) => vec![shorten_type(s)],
        Some(JsonValue::Array(arr)) => arr
            .iter()
            .filter_map(JsonValue::as_str)
            .map(shorten_type)
            .collect(),
        _ => Vec::new(),
    }
}

/// `https://schema.org/Product` -> `Product`
fn shorten_type(iri: &str) -> String {
    match iri.rfind(['/', '#']) {
        Some(pos) => iri[pos + 1..].to_string(),
        None => iri.to_string(),
    }
}
