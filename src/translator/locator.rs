//! Selenium IDE target selector grammar
//!
//! - `//...` is a raw XPath expression
//! - `<prefix>=<rest>` with prefix one of `id`, `name`, `link`, `xpath`, `css`
//!
//! Anything else is rejected.

use crate::error::ResolutionError;
use regex::Regex;
use std::sync::LazyLock;

static PREFIXED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+)=(.+)").expect("valid selector regex"));

/// Element addressing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Id,
    Name,
    LinkText,
    XPath,
    CssSelector,
}

impl Strategy {
    /// WebDriver test case method that finds an element by this strategy
    pub fn method(self) -> &'static str {
        match self {
            Strategy::Id => "byId",
            Strategy::Name => "byName",
            Strategy::LinkText => "byLinkText",
            Strategy::XPath => "byXPath",
            Strategy::CssSelector => "byCssSelector",
        }
    }
}

/// A resolved target selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub strategy: Strategy,
    pub value: String,
}

impl Locator {
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Element lookup statement on `receiver`, e.g. `$this->byId("login");`
    pub fn to_php(&self, receiver: &str) -> String {
        format!("{}->{}(\"{}\");", receiver, self.strategy.method(), self.value)
    }
}

/// Resolve a target selector string into a locator
pub fn resolve(selector: &str) -> Result<Locator, ResolutionError> {
    if selector.starts_with("//") && selector.len() > 2 {
        return Ok(Locator::new(Strategy::XPath, selector));
    }

    if let Some(caps) = PREFIXED_RE.captures(selector) {
        let rest = &caps[2];
        let locator = match &caps[1] {
            "id" => Some(Locator::new(Strategy::Id, rest)),
            "name" => Some(Locator::new(Strategy::Name, rest)),
            "link" => Some(Locator::new(Strategy::LinkText, rest)),
            "xpath" => Some(Locator::new(Strategy::XPath, rest)),
            // The recorder doubles dots inside css selectors
            "css" => Some(Locator::new(Strategy::CssSelector, rest.replace("..", "."))),
            _ => None,
        };
        if let Some(locator) = locator {
            return Ok(locator);
        }
    }

    Err(ResolutionError::UnknownSelector(selector.to_string()))
}
