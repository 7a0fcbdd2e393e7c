use crate::translator::Variant;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const LEGACY_PARENT_CLASS: &str = "PHPUnit_Extensions_SeleniumTestCase";
pub const WEBDRIVER_PARENT_CLASS: &str = "PHPUnit_Extensions_Selenium2TestCase";
pub const DEFAULT_REMOTE_HOST: &str = "127.0.0.1";
pub const DEFAULT_REMOTE_PORT: u16 = 4444;

/// Fixed waiting budgets written into generated code
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Timing {
    /// Iterations of the legacy polling loop before it fails with "timeout"
    pub wait_loop_iterations: u32,

    /// Sleep between legacy polling iterations (seconds)
    pub wait_loop_interval_secs: u32,

    /// Page load budget for legacy clickAndWait (ms)
    pub page_load_timeout_ms: u64,

    /// Timeout of the WebDriver waitUntil primitive (ms)
    pub wait_until_timeout_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            wait_loop_iterations: 60,
            wait_loop_interval_secs: 1,
            page_load_timeout_ms: 30000,
            wait_until_timeout_ms: 8000,
        }
    }
}

/// Settings of a single document conversion
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterConfig {
    /// Target test case API
    pub variant: Variant,

    /// Browser string passed to setBrowser
    pub browser: String,

    /// Test URL; takes precedence over the document's base URL
    pub test_url: Option<String>,

    /// Test URL when neither the caller nor the document supplies one
    pub default_test_url: String,

    /// Test name when neither the caller nor the document title supplies one
    pub default_test_name: String,

    /// Selenium server address
    pub remote_host: Option<String>,

    /// Selenium server port
    pub remote_port: Option<u16>,

    pub class_prefix: String,

    /// Lines emitted before the class declaration
    pub pre_class_lines: Vec<String>,

    /// Lines emitted at the top of the class body
    pub class_body_lines: Vec<String>,

    /// Parent class override; defaults depend on the variant
    pub parent_class: Option<String>,

    pub custom_param1: String,
    pub custom_param2: String,

    /// External template file; the built-in skeleton is used when unset
    pub template: Option<PathBuf>,

    /// Line separator of the generated file
    pub eol: String,

    /// Terminator appended to the last line of every command; defaults
    /// depend on the variant
    pub command_eol: Option<String>,

    /// Expression all generated calls are made on
    pub receiver: String,

    /// Replace untranslatable commands with a marker comment instead of
    /// aborting the conversion
    pub continue_on_error: bool,

    pub timing: Timing,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Legacy,
            browser: "*firefox".to_string(),
            test_url: None,
            default_test_url: "http://example.com".to_string(),
            default_test_name: "some".to_string(),
            remote_host: None,
            remote_port: None,
            class_prefix: String::new(),
            pre_class_lines: Vec::new(),
            class_body_lines: Vec::new(),
            parent_class: None,
            custom_param1: String::new(),
            custom_param2: String::new(),
            template: None,
            eol: "\n".to_string(),
            command_eol: None,
            receiver: "$this".to_string(),
            continue_on_error: false,
            timing: Timing::default(),
        }
    }
}

impl ConverterConfig {
    /// Load settings from a YAML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn parent_class(&self) -> &str {
        self.parent_class
            .as_deref()
            .unwrap_or(match self.variant {
                Variant::Legacy => LEGACY_PARENT_CLASS,
                Variant::WebDriver => WEBDRIVER_PARENT_CLASS,
            })
    }

    pub fn command_eol(&self) -> Option<&str> {
        match (&self.command_eol, self.variant) {
            (Some(eol), _) => Some(eol.as_str()).filter(|e| !e.is_empty()),
            (None, Variant::Legacy) => None,
            (None, Variant::WebDriver) => Some("\n"),
        }
    }
}

/// Settings of the file-level collaborator around the converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Output directory; next to each input file when unset
    pub dest: Option<PathBuf>,

    pub php_prefix: String,
    pub php_postfix: String,

    /// Descend into subdirectories when converting a directory
    pub recursive: bool,

    /// Pattern of recorded test files inside a directory
    pub html_pattern: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            dest: None,
            php_prefix: String::new(),
            php_postfix: "Test".to_string(),
            recursive: false,
            html_pattern: "*.html".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.browser, "*firefox");
        assert_eq!(config.parent_class(), LEGACY_PARENT_CLASS);
        assert_eq!(config.command_eol(), None);
        assert_eq!(config.timing.wait_loop_iterations, 60);
        assert_eq!(config.timing.wait_until_timeout_ms, 8000);
    }

    #[test]
    fn test_webdriver_variant_defaults() {
        let config = ConverterConfig {
            variant: Variant::WebDriver,
            ..Default::default()
        };
        assert_eq!(config.parent_class(), WEBDRIVER_PARENT_CLASS);
        assert_eq!(config.command_eol(), Some("\n"));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
variant: webdriver
browser: chrome
remotePort: 5555
parentClass: My_TestCase
preClassLines:
  - "require_once 'bootstrap.php';"
timing:
  waitUntilTimeoutMs: 10000
"#;
        let config = ConverterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.variant, Variant::WebDriver);
        assert_eq!(config.browser, "chrome");
        assert_eq!(config.remote_port, Some(5555));
        assert_eq!(config.parent_class(), "My_TestCase");
        assert_eq!(config.pre_class_lines.len(), 1);
        assert_eq!(config.timing.wait_until_timeout_ms, 10000);
        assert_eq!(config.timing.wait_loop_iterations, 60);
        assert_eq!(config.default_test_url, "http://example.com");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ConverterConfig::from_yaml("").unwrap(), ConverterConfig::default());
    }
}
