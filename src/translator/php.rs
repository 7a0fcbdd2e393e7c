//! PHP line builders shared by both translators

/// Method call statement with double-quoted string arguments
///
/// A present value always produces two arguments, with an empty target if
/// the target is missing.
pub fn call(receiver: &str, method: &str, target: Option<&str>, value: Option<&str>) -> String {
    match (target, value) {
        (t, Some(v)) => format!(
            "{}->{}(\"{}\", \"{}\");",
            receiver,
            method,
            t.unwrap_or_default(),
            v
        ),
        (Some(t), None) => format!("{}->{}(\"{}\");", receiver, method, t),
        (None, None) => format!("{}->{}();", receiver, method),
    }
}

/// Method call expression (no trailing `;`) with one quoted argument
pub fn call_expr(receiver: &str, method: &str, arg: &str) -> String {
    format!("{}->{}(\"{}\")", receiver, method, arg)
}

pub fn assert_true(receiver: &str, expression: &str) -> String {
    format!("{}->assertTrue({});", receiver, expression)
}

pub fn assert_false(receiver: &str, expression: &str) -> String {
    format!("{}->assertFalse({});", receiver, expression)
}

/// Convert a recorder wildcard pattern into a PCRE body (`?` matches any char)
pub fn pattern_to_regex(pattern: &str) -> String {
    pattern.replace('?', r"[\s\S]")
}

/// Boolean expression matching `subject` against a recorder wildcard pattern
pub fn pattern_match(pattern: &str, subject: &str) -> String {
    format!(
        "(bool)preg_match('/^{}$/', {})",
        pattern_to_regex(pattern),
        subject
    )
}

/// Prefix every line with `size` spaces
pub fn indent_lines(lines: &[String], size: usize) -> Vec<String> {
    let pad = " ".repeat(size);
    lines.iter().map(|line| format!("{}{}", pad, line)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_arities() {
        assert_eq!(
            call("$this", "name", Some("t"), Some("v")),
            r#"$this->name("t", "v");"#
        );
        assert_eq!(call("$this", "name", Some("t"), None), r#"$this->name("t");"#);
        assert_eq!(call("$this", "name", None, None), "$this->name();");
        assert_eq!(call("$this", "name", None, Some("v")), r#"$this->name("", "v");"#);
    }

    #[test]
    fn test_pattern_match() {
        assert_eq!(
            pattern_match("Delete ?", "$this->getConfirmation()"),
            r"(bool)preg_match('/^Delete [\s\S]$/', $this->getConfirmation())"
        );
    }

    #[test]
    fn test_indent_lines() {
        let lines = vec!["a".to_string(), "    b".to_string()];
        assert_eq!(indent_lines(&lines, 4), vec!["    a", "        b"]);
    }
}
