use serde_json::{Map, Value};

/// Parse a request body based on Content-Type header.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, String> {
    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/json") {
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        // Try JSON first, then form-urlencoded
        serde_json::from_slice(body).or_else(|_| {
            if looks_like_form(body) {
                parse_form_urlencoded(body)
            } else {
                Err("Unable to parse body: neither JSON nor form data".to_string())
            }
        })
    }
}

/// Every pair has a `=`; bare words are not form data.
fn looks_like_form(body: &[u8]) -> bool {
    !body.is_empty()
        && body
            .split(|b| *b == b'&')
            .all(|pair| pair.contains(&b'='))
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let mut map = Map::new();
    for (k, v) in form_urlencoded::parse(body_str.as_bytes()) {
        map.insert(k.into_owned(), Value::String(v.into_owned()));
    }
    Ok(Value::Object(map))
}
