//! `Content-Disposition` filename extraction.
//!
//! Both forms are supported:
//! - `filename*=UTF-8''<percent-encoded>` (RFC 5987 extended parameter)
//! - `filename="<value>"` or unquoted `filename=<value>`
//!
//! The extended form wins when both are present. Returned names are reduced
//! to their final path segment so a hostile header cannot point a save
//! outside the download directory.

/// Extract the filename from a `Content-Disposition` header value.
#[must_use]
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    for param in split_params(header) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                if let Some(name) = decode_extended(value.trim()).and_then(|d| sanitize(&d)) {
                    return Some(name);
                }
            }
            "filename" if plain.is_none() => plain = Some(unquote(value.trim())),
            _ => {}
        }
    }
    plain.and_then(|name| sanitize(&name))
}

/// Split on `;` outside of double quotes.
fn split_params(header: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                out.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&header[start..]);
    out
}

fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode `charset'lang'value`. Only UTF-8 (and its ASCII subset) is accepted.
fn decode_extended(value: &str) -> Option<String> {
    let value = value.trim_matches('"');
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?;
    let _lang = parts.next()?;
    let encoded = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("us-ascii") {
        return None;
    }
    if !well_formed_escapes(encoded) {
        return None;
    }
    urlencoding::decode(encoded).ok().map(std::borrow::Cow::into_owned)
}

/// Every `%` must introduce exactly two hex digits.
fn well_formed_escapes(encoded: &str) -> bool {
    let bytes = encoded.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}

fn sanitize(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if last.is_empty() || last == "." || last == ".." || last.chars().any(char::is_control) {
        None
    } else {
        Some(last.to_string())
    }
}

#[cfg(test)]
#[path = "disposition_test.rs"]
mod tests;
