//! Query-string parsing.
//!
//! `a=1&b=two` becomes a name-to-value map. The first occurrence of a name
//! wins, `+` decodes to a space, and valid `%XX` escapes decode; invalid
//! escapes pass through unchanged.

use std::collections::HashMap;

/// Parse a raw query string into a parameter map.
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name, value),
            None => (pair, ""),
        };
        let name = decode_component(name);
        if name.is_empty() {
            continue;
        }
        params
            .entry(name)
            .or_insert_with(|| decode_component(value));
    }

    params
}

/// Decode `+` and `%XX` escapes in a single query component.
pub fn decode_component(component: &str) -> String {
    let bytes = component.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                (Some(high), Some(low)) => {
                    decoded.push(high * 16 + low);
                    i += 3;
                }
                _ => {
                    decoded.push(b'%');
                    i += 1;
                }
            },
            other => {
                decoded.push(other);
                i += 1;
            }
        }
    }

    match String::from_utf8(decoded) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|digit| digit as u8)
}
