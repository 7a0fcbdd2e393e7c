//! Selenium IDE html test case parser
//!
//! Only a small subset of HTML is consulted:
//! - the first `<table>`, whose rows with at least three `<td>` cells are
//!   read positionally as (command, target, value)
//! - the first `<link>` element's `href`, used as the base URL
//! - the `<title>` element, used to derive the test name

use super::types::{Command, ParsedScript};
use crate::assembler::naming::normalize_title;
use crate::error::{ConvertError, Result};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<table\b[^>]*>(.*?)(?:</table\s*>|\z)").expect("valid table regex")
});

static ROW_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<tr\b[^>]*>").expect("valid row regex"));

/// A row ends at its end tag or wherever the next row or row group starts
static ROW_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:tr|tbody|thead|tfoot)\b").expect("valid row end regex")
});

static CELL_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<td\b[^>]*>").expect("valid cell regex"));

/// A cell ends at its end tag or wherever the next cell starts
static CELL_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:td|th)\b").expect("valid cell end regex"));

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("valid title regex")
});

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b([^>]*)>").expect("valid link regex"));

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid href regex")
});

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").expect("valid entity regex")
});

static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid br regex"));

/// Metadata the caller already knows, plus fallbacks for what neither the
/// caller nor the document supplies
#[derive(Debug, Clone, Copy)]
pub struct ParseSettings<'a> {
    pub test_name: Option<&'a str>,
    pub base_url: Option<&'a str>,
    pub default_test_name: &'a str,
    pub default_base_url: &'a str,
}

/// Parse a recorded test case document into its command sequence
pub fn parse_document(html: &str, settings: &ParseSettings<'_>) -> Result<ParsedScript> {
    let table = TABLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or(ConvertError::DocumentParse)?
        .as_str();

    let commands = parse_rows(table);

    let base_url = non_empty(settings.base_url)
        .map(str::to_string)
        .or_else(|| extract_base_url(html))
        .unwrap_or_else(|| settings.default_base_url.to_string());

    let test_name = non_empty(settings.test_name)
        .map(str::to_string)
        .or_else(|| extract_title(html).map(|t| normalize_title(&t)))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| settings.default_test_name.to_string());

    log::debug!(
        "Parsed {} commands (test name: {}, base url: {})",
        commands.len(),
        test_name,
        base_url
    );

    Ok(ParsedScript {
        test_name,
        base_url,
        commands,
    })
}

fn parse_rows(table: &str) -> Vec<Command> {
    let mut commands = Vec::new();

    for row in elements(table, &ROW_OPEN_RE, &ROW_END_RE) {
        let cells = elements(row, &CELL_OPEN_RE, &CELL_END_RE);

        // Header rows span one cell; anything short of three cells is skipped
        if cells.len() < 3 {
            continue;
        }

        let name = cells[0].trim();
        if name.is_empty() {
            continue;
        }

        commands.push(Command {
            name: name.to_string(),
            target: decoded_cell(cells[1]),
            value: decoded_cell(cells[2]),
        });
    }

    commands
}

/// Inner html of every element opened by `open` in `html`
///
/// End tags are optional: an element without one runs until the next
/// sibling starts, and its trailing whitespace is dropped. A self-closing
/// `<x/>` element is empty.
fn elements<'h>(html: &'h str, open: &Regex, end: &Regex) -> Vec<&'h str> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(tag) = open.find_at(html, pos) {
        pos = tag.end();
        if tag.as_str().ends_with("/>") {
            found.push("");
            continue;
        }

        let rest = &html[pos..];
        match end.find(rest) {
            Some(m) if m.as_str().starts_with("</") => {
                found.push(&rest[..m.start()]);
                pos += m.end();
            }
            Some(m) => {
                found.push(rest[..m.start()].trim_end());
                pos += m.start();
            }
            None => found.push(rest.trim_end()),
        }
    }

    found
}

fn decoded_cell(raw: &str) -> Option<String> {
    let text = decode_cell_text(raw);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn extract_base_url(html: &str) -> Option<String> {
    let attrs = LINK_RE.captures(html)?.get(1)?.as_str();
    let caps = HREF_RE.captures(attrs)?;
    let href = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str();
    Some(decode_entities(href))
}

fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode the inner html of a table cell into text suitable for a
/// double-quoted PHP string literal
///
/// `&nbsp;` becomes a plain space, entities are decoded, line breaks become
/// the two characters `\n` and double quotes are backslash-escaped.
pub fn decode_cell_text(raw: &str) -> String {
    let text = raw.replace("&nbsp;", " ");
    let text = decode_entities(&text);
    let text = BR_RE.replace_all(&text, r"\n");
    text.replace('"', "\\\"")
}

/// Decode numeric and named character references, leaving unknown ones as is
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(num) = entity.strip_prefix('#') {
                let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32).map(String::from)
            } else {
                named_entity(entity).map(String::from)
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<&'static str> {
    let value = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "hellip" => "\u{2026}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "bull" => "\u{2022}",
        "middot" => "\u{b7}",
        "deg" => "\u{b0}",
        "times" => "\u{d7}",
        "divide" => "\u{f7}",
        "plusmn" => "\u{b1}",
        "sect" => "\u{a7}",
        "para" => "\u{b6}",
        "euro" => "\u{20ac}",
        "pound" => "\u{a3}",
        "yen" => "\u{a5}",
        "cent" => "\u{a2}",
        "iexcl" => "\u{a1}",
        "iquest" => "\u{bf}",
        "shy" => "\u{ad}",
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: ParseSettings<'static> = ParseSettings {
        test_name: None,
        base_url: None,
        default_test_name: "some",
        default_base_url: "http://example.com",
    };

    const IDE_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en" lang="en">
<head profile="http://selenium-ide.openqa.org/profiles/test-case">
<meta http-equiv="Content-Type" content="text/html; charset=UTF-8" />
<link rel="selenium.base" href="http://shop.example.org/" />
<title>user login-check</title>
</head>
<body>
<table cellpadding="1" cellspacing="1" border="1">
<thead>
<tr><td rowspan="1" colspan="3">user login-check</td></tr>
</thead><tbody>
<tr>
	<td>open</td>
	<td>/login</td>
	<td></td>
</tr>
<tr>
	<td>type</td>
	<td>id=username</td>
	<td>admin</td>
</tr>
<tr>
	<td>clickAndWait</td>
	<td>css=button.submit</td>
	<td></td>
</tr>
</tbody></table>
</body>
</html>
"#;

    #[test]
    fn test_parse_ide_document() {
        let script = parse_document(IDE_DOCUMENT, &SETTINGS).unwrap();
        assert_eq!(script.base_url, "http://shop.example.org/");
        assert_eq!(script.test_name, "User_Login_check");
        assert_eq!(script.commands.len(), 3);
        assert_eq!(script.commands[0], Command::new("open", Some("/login"), None));
        assert_eq!(
            script.commands[1],
            Command::new("type", Some("id=username"), Some("admin"))
        );
        assert_eq!(script.commands[2].name, "clickAndWait");
    }

    #[test]
    fn test_caller_metadata_wins() {
        let settings = ParseSettings {
            test_name: Some("Checkout"),
            base_url: Some("http://staging.local"),
            ..SETTINGS
        };
        let script = parse_document(IDE_DOCUMENT, &settings).unwrap();
        assert_eq!(script.test_name, "Checkout");
        assert_eq!(script.base_url, "http://staging.local");
    }

    #[test]
    fn test_missing_table_is_error() {
        let err = parse_document("<html><title>x</title></html>", &SETTINGS).unwrap_err();
        assert!(matches!(err, ConvertError::DocumentParse));
    }

    #[test]
    fn test_defaults_when_document_has_no_metadata() {
        let html = "<table><tr><td>refresh</td><td></td><td></td></tr></table>";
        let script = parse_document(html, &SETTINGS).unwrap();
        assert_eq!(script.test_name, "some");
        assert_eq!(script.base_url, "http://example.com");
        assert_eq!(script.commands, vec![Command::new("refresh", None, None)]);
    }

    #[test]
    fn test_short_rows_are_skipped_not_fatal() {
        let html = "<table>\
            <tr><td>open</td><td>/</td></tr>\
            <tr><td>click</td><td>id=go</td><td></td></tr>\
            </table>";
        let script = parse_document(html, &SETTINGS).unwrap();
        assert_eq!(script.commands, vec![Command::new("click", Some("id=go"), None)]);
    }

    #[test]
    fn test_self_closing_cells_are_empty() {
        let html = "<table>\
            <tr><td>open</td><td>/login</td><td/></tr>\
            <tr><td>click</td><td>id=go</td><td /></tr>\
            <tr><td>refresh</td><td/><td/></tr>\
            </table>";
        let script = parse_document(html, &SETTINGS).unwrap();
        assert_eq!(
            script.commands,
            vec![
                Command::new("open", Some("/login"), None),
                Command::new("click", Some("id=go"), None),
                Command::new("refresh", None, None),
            ]
        );
    }

    #[test]
    fn test_omitted_end_tags() {
        let html = "<table>\n\
            <tr><td>open<td>/login<td></tr>\n\
            <tr>\n  <td>type\n  <td>id=q\n  <td>rust\n\
            <TR><TD>click<TD>id=go<TD>\n\
            </table>";
        let script = parse_document(html, &SETTINGS).unwrap();
        assert_eq!(
            script.commands,
            vec![
                Command::new("open", Some("/login"), None),
                Command::new("type", Some("id=q"), Some("rust")),
                Command::new("click", Some("id=go"), None),
            ]
        );
    }

    #[test]
    fn test_only_first_table_is_used() {
        let html = "<table><tr><td>open</td><td>/a</td><td></td></tr></table>\
            <table><tr><td>open</td><td>/b</td><td></td></tr></table>";
        let script = parse_document(html, &SETTINGS).unwrap();
        assert_eq!(script.commands.len(), 1);
        assert_eq!(script.commands[0].target(), "/a");
    }

    #[test]
    fn test_decode_cell_text() {
        assert_eq!(
            decode_cell_text("A&nbsp;&amp;&nbsp;B<br />C\"D"),
            r#"A & B\nC\"D"#
        );
    }

    #[test]
    fn test_decode_br_variants() {
        assert_eq!(decode_cell_text("a<br>b<BR/>c"), r"a\nb\nc");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&lt;a&gt; &#65;&#x42; &quot;"), "<a> AB \"");
        assert_eq!(decode_entities("&unknown; &amp"), "&unknown; &amp");
    }

    #[test]
    fn test_escaped_quote_entity_is_backslashed() {
        assert_eq!(decode_cell_text("say &quot;hi&quot;"), r#"say \"hi\""#);
    }
}
