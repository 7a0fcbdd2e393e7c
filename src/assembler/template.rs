//! External template rendering
//!
//! Templates contain `{$name}` placeholders. Recognized placeholders are
//! replaced in a single pass, so substituted values are never re-scanned;
//! unknown ones are left as they are.

use crate::error::{ConvertError, Result};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\$([A-Za-z0-9_]+)\}").expect("valid placeholder regex"));

/// Placeholder names recognized in templates
pub const PLACEHOLDERS: [&str; 10] = [
    "comment",
    "className",
    "browser",
    "testUrl",
    "remoteHost",
    "remotePort",
    "testMethodName",
    "testMethodContent",
    "customParam1",
    "customParam2",
];

/// Replacement values keyed by placeholder name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: Vec<(&'static str, String)>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Substitute every known placeholder in `template`
    pub fn render(&self, template: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(template, |caps: &Captures| match self.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Read a template file
pub fn load_template(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ConvertError::TemplateNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Join lines, indenting all but the first by `size` spaces
///
/// The first line lands wherever the placeholder sits in the template.
pub fn indent_block(lines: &[String], size: usize, eol: &str) -> String {
    let pad = " ".repeat(size);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.clone()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join(eol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn full_context() -> TemplateContext {
        let mut ctx = TemplateContext::new();
        for name in PLACEHOLDERS {
            ctx.set(name, format!("<{}>", name));
        }
        ctx
    }

    #[test]
    fn test_render_all_placeholders() {
        let template: String = PLACEHOLDERS
            .iter()
            .map(|name| format!("before {{${}}} after\n", name))
            .collect();
        let rendered = full_context().render(&template);

        assert!(!rendered.contains("{$"));
        for name in PLACEHOLDERS {
            assert!(rendered.contains(&format!("before <{}> after\n", name)));
        }
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let rendered = full_context().render("{$className} {$unknown} {$ className}");
        assert_eq!(rendered, "<className> {$unknown} {$ className}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let mut ctx = TemplateContext::new();
        ctx.set("comment", "{$className}").set("className", "LoginTest");
        assert_eq!(ctx.render("{$comment}|{$className}"), "{$className}|LoginTest");
    }

    #[test]
    fn test_set_overwrites() {
        let mut ctx = TemplateContext::new();
        ctx.set("browser", "*firefox").set("browser", "*chrome");
        assert_eq!(ctx.get("browser"), Some("*chrome"));
    }

    #[test]
    fn test_indent_block() {
        let lines = vec!["a;".to_string(), "b;".to_string(), "    c;".to_string()];
        assert_eq!(indent_block(&lines, 8, "\n"), "a;\n        b;\n            c;");
    }

    #[test]
    fn test_load_template() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "class {{$className}} {{}}").unwrap();
        assert_eq!(load_template(file.path()).unwrap(), "class {$className} {}");
    }

    #[test]
    fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.tpl");
        assert!(matches!(
            load_template(&missing),
            Err(ConvertError::TemplateNotFound(p)) if p == missing
        ));
        // A directory is not a readable template either
        assert!(matches!(
            load_template(dir.path()),
            Err(ConvertError::TemplateNotFound(_))
        ));
    }
}
