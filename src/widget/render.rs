//! Message text → safe HTML.
//!
//! Every character of visitor or bot text is escaped; the only markup ever
//! produced is the anchor wrapped around a detected `http(s)://` URL, whose
//! href and label are escaped as well.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("valid URL pattern"));

/// Sentence punctuation stripped from the end of a detected URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']'];

/// Escape `& < > " '` for use in element content or a quoted attribute.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and turn each URL into an anchor opening in a new context.
#[must_use]
pub fn render_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut cursor = 0;
    for found in URL_RE.find_iter(text) {
        let url = trim_trailing(found.as_str());
        if url.ends_with("://") {
            continue;
        }
        out.push_str(&escape_html(&text[cursor..found.start()]));
        out.push_str(&anchor(url));
        cursor = found.start() + url.len();
    }
    out.push_str(&escape_html(&text[cursor..]));
    out
}

/// Strip sentence punctuation, keeping a closing bracket that pairs with one in the URL.
fn trim_trailing(url: &str) -> &str {
    let mut end = url;
    while let Some(last) = end.chars().last() {
        if !TRAILING_PUNCTUATION.contains(&last) {
            break;
        }
        let open = match last {
            ')' => Some('('),
            ']' => Some('['),
            _ => None,
        };
        if let Some(open) = open {
            if end.matches(open).count() >= end.matches(last).count() {
                break;
            }
        }
        end = &end[..end.len() - last.len_utf8()];
    }
    end
}

fn anchor(url: &str) -> String {
    let escaped = escape_html(url);
    format!(r#"<a href="{escaped}" target="_blank" rel="noopener noreferrer">{escaped}</a>"#)
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
