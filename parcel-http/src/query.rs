//! Merging query parameters into an existing URL.
//!
//! The query is re-encoded as a whole after merging, with keys in sorted
//! order. Values for a repeated key keep their order.

use crate::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

type QueryValues = BTreeMap<String, Vec<String>>;

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::MalformedUrl(format!("{url}: {e}")))
}

fn parse_query(url: &Url) -> Result<QueryValues> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(url.query().unwrap_or(""))
        .map_err(|e| Error::MalformedUrl(format!("query of {url}: {e}")))?;

    let mut values = QueryValues::new();
    for (key, value) in pairs {
        values.entry(key).or_default().push(value);
    }
    Ok(values)
}

fn encode_query(values: &QueryValues) -> Result<String> {
    let pairs: Vec<(&str, &str)> = values
        .iter()
        .flat_map(|(key, vs)| vs.iter().map(move |v| (key.as_str(), v.as_str())))
        .collect();
    serde_urlencoded::to_string(pairs).map_err(|e| Error::Encoding(e.to_string()))
}

fn rebuild(mut url: Url, values: &QueryValues) -> Result<String> {
    let encoded = encode_query(values)?;
    url.set_query((!encoded.is_empty()).then_some(encoded.as_str()));
    Ok(url.into())
}

/// Set each of `params` on the query of `url`, replacing existing values for that key.
///
/// ```
/// use std::collections::BTreeMap;
///
/// let params = BTreeMap::from([("a".to_string(), "c".to_string())]);
/// let url = parcel_http::query::merge_params("http://simple.org/path/?b=a&a=x", &params).unwrap();
/// assert_eq!(url, "http://simple.org/path/?a=c&b=a");
/// ```
pub fn merge_params(url: &str, params: &BTreeMap<String, String>) -> Result<String> {
    if params.is_empty() {
        return Ok(url.to_string());
    }

    let parsed = parse_url(url)?;
    let mut values = parse_query(&parsed)?;
    for (key, value) in params {
        values.insert(key.clone(), vec![value.clone()]);
    }
    rebuild(parsed, &values)
}

/// Add every field of a structured query object to the query of `url`.
///
/// Existing values are kept; sequence fields contribute one value per
/// element and `null` fields are skipped.
pub fn merge_object(url: &str, object: &Value) -> Result<String> {
    let parsed = parse_url(url)?;
    let mut values = parse_query(&parsed)?;

    let Value::Object(fields) = object else {
        return Err(Error::Encoding(
            "query object must serialize to a struct or map".to_string(),
        ));
    };

    for (key, field) in fields {
        let entry = values.entry(key.clone()).or_default();
        match field {
            Value::Array(items) => entry.extend(items.iter().filter_map(scalar_to_string)),
            other => entry.extend(scalar_to_string(other)),
        }
        if entry.is_empty() {
            values.remove(key);
        }
    }
    rebuild(parsed, &values)
}

/// Render a JSON scalar as a query value. `null` renders as nothing.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        nested => Some(nested.to_string()),
    }
}
