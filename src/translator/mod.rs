//! Translation of recorded Selenium IDE commands into PHPUnit test code
//!
//! Two target APIs are supported:
//! - `Legacy`: `PHPUnit_Extensions_SeleniumTestCase` (Selenium RC commands)
//! - `WebDriver`: `PHPUnit_Extensions_Selenium2TestCase`
//!
//! Each translator keeps an explicit table of specially handled commands.
//! Any other command name goes through a generic rule that calls the
//! command verbatim on the receiver.

pub mod legacy;
pub mod locator;
pub mod php;
pub mod webdriver;

use crate::error::ResolutionError;
use crate::parser::types::Command;
use crate::utils::config::Timing;
use serde::Deserialize;

pub use legacy::LegacyTranslator;
pub use locator::{resolve, Locator, Strategy};
pub use webdriver::WebDriverTranslator;

/// Target test case API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Legacy,
    #[serde(alias = "selenium2")]
    WebDriver,
}

/// Maps one command into one or more lines of PHP
///
/// The first line carries no indentation; following lines are indented
/// relative to it.
pub trait CommandTranslator {
    fn variant(&self) -> Variant;

    fn translate(&self, command: &Command) -> Result<Vec<String>, ResolutionError>;

    /// Whether `name` has a dedicated rule instead of the generic one
    fn handles(&self, name: &str) -> bool;
}

/// Build the translator for `variant`
pub fn translator_for(
    variant: Variant,
    receiver: &str,
    timing: &Timing,
) -> Box<dyn CommandTranslator> {
    match variant {
        Variant::Legacy => Box::new(LegacyTranslator::new(receiver, timing.clone())),
        Variant::WebDriver => Box::new(WebDriverTranslator::new(receiver, timing.clone())),
    }
}

/// Log an informational note about a command; generated code is unaffected
pub(crate) fn note(kind: &str, command: &Command) {
    log::warn!("{} - {}", kind, command.display());
}
