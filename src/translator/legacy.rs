//! Selenium RC style translation for `PHPUnit_Extensions_SeleniumTestCase`
//!
//! The RC test case exposes most recorder commands as methods, so only
//! commands that need more than a direct call are special-cased. Example:
//!
//! ```text
//! waitForElementPresent | css=div.route-view > span
//! ```
//! becomes
//! ```text
//! for ($second = 0; ; $second++) {
//!     if ($second >= 60) $this->fail("timeout");
//!     try {
//!         if ($this->isElementPresent("css=div.route-view > span")) break;
//!     } catch (Exception $e) {}
//!     sleep(1);
//! }
//! ```

use super::php;
use super::{CommandTranslator, Variant};
use crate::error::ResolutionError;
use crate::parser::types::Command;
use crate::utils::config::Timing;
use std::collections::HashMap;
use std::sync::LazyLock;

type Handler = fn(&LegacyTranslator, &Command) -> Vec<String>;

static HANDLERS: LazyLock<HashMap<&'static str, Handler>> = LazyLock::new(|| {
    let mut table: HashMap<&'static str, Handler> = HashMap::new();
    table.insert("clickAndWait", LegacyTranslator::click_and_wait);
    table.insert("assertText", LegacyTranslator::assert_text);
    table.insert("assertElementPresent", LegacyTranslator::assert_element_present);
    table.insert(
        "assertElementNotPresent",
        LegacyTranslator::assert_element_not_present,
    );
    table.insert("waitForElementPresent", LegacyTranslator::wait_for_element_present);
    table.insert(
        "waitForElementNotPresent",
        LegacyTranslator::wait_for_element_not_present,
    );
    table.insert("waitForTextPresent", LegacyTranslator::wait_for_text_present);
    table.insert("waitForTextNotPresent", LegacyTranslator::wait_for_text_not_present);
    table.insert("assertConfirmation", LegacyTranslator::assert_confirmation);
    table.insert("verifyConfirmation", LegacyTranslator::verify_confirmation);
    table.insert("assertTextPresent", LegacyTranslator::assert_text_present);
    table.insert("assertTextNotPresent", LegacyTranslator::assert_text_not_present);
    table
});

pub struct LegacyTranslator {
    receiver: String,
    timing: Timing,
}

impl LegacyTranslator {
    pub fn new(receiver: &str, timing: Timing) -> Self {
        Self {
            receiver: receiver.to_string(),
            timing,
        }
    }

    fn generic(&self, cmd: &Command) -> Vec<String> {
        vec![php::call(
            &self.receiver,
            &cmd.name,
            cmd.target.as_deref(),
            cmd.value.as_deref(),
        )]
    }

    fn click_and_wait(&self, cmd: &Command) -> Vec<String> {
        let timeout = self.timing.page_load_timeout_ms.to_string();
        vec![
            php::call(&self.receiver, "click", Some(cmd.target()), None),
            php::call(&self.receiver, "waitForPageToLoad", Some(&timeout), None),
        ]
    }

    fn assert_text(&self, cmd: &Command) -> Vec<String> {
        vec![format!(
            "{}->assertEquals(\"{}\", {});",
            self.receiver,
            cmd.value(),
            php::call_expr(&self.receiver, "getText", cmd.target())
        )]
    }

    fn is_element_present(&self, cmd: &Command) -> String {
        php::call_expr(&self.receiver, "isElementPresent", cmd.target())
    }

    fn is_text_present(&self, cmd: &Command) -> String {
        php::call_expr(&self.receiver, "isTextPresent", cmd.target())
    }

    fn assert_element_present(&self, cmd: &Command) -> Vec<String> {
        vec![php::assert_true(&self.receiver, &self.is_element_present(cmd))]
    }

    fn assert_element_not_present(&self, cmd: &Command) -> Vec<String> {
        vec![php::assert_false(&self.receiver, &self.is_element_present(cmd))]
    }

    fn wait_for_element_present(&self, cmd: &Command) -> Vec<String> {
        self.wait_loop(&self.is_element_present(cmd))
    }

    fn wait_for_element_not_present(&self, cmd: &Command) -> Vec<String> {
        self.wait_loop(&format!("!{}", self.is_element_present(cmd)))
    }

    fn wait_for_text_present(&self, cmd: &Command) -> Vec<String> {
        self.wait_loop(&self.is_text_present(cmd))
    }

    fn wait_for_text_not_present(&self, cmd: &Command) -> Vec<String> {
        self.wait_loop(&format!("!{}", self.is_text_present(cmd)))
    }

    fn confirmation_matches(&self, cmd: &Command) -> String {
        let subject = format!("{}->getConfirmation()", self.receiver);
        php::pattern_match(cmd.target(), &subject)
    }

    fn assert_confirmation(&self, cmd: &Command) -> Vec<String> {
        vec![php::assert_true(&self.receiver, &self.confirmation_matches(cmd))]
    }

    fn verify_confirmation(&self, cmd: &Command) -> Vec<String> {
        let assertion = php::assert_true(&self.receiver, &self.confirmation_matches(cmd));
        vec![
            "try {".to_string(),
            format!("    {}", assertion),
            "} catch (PHPUnit_Framework_AssertionFailedError $e) {".to_string(),
            format!(
                "    array_push({}->verificationErrors, $e->toString());",
                self.receiver
            ),
            "}".to_string(),
        ]
    }

    fn assert_text_present(&self, cmd: &Command) -> Vec<String> {
        vec![php::assert_true(&self.receiver, &self.is_text_present(cmd))]
    }

    fn assert_text_not_present(&self, cmd: &Command) -> Vec<String> {
        vec![php::assert_false(&self.receiver, &self.is_text_present(cmd))]
    }

    /// Polling loop that breaks once `expression` is true, swallowing any
    /// exception raised while evaluating it
    fn wait_loop(&self, expression: &str) -> Vec<String> {
        vec![
            "for ($second = 0; ; $second++) {".to_string(),
            format!(
                "    if ($second >= {}) {}->fail(\"timeout\");",
                self.timing.wait_loop_iterations, self.receiver
            ),
            "    try {".to_string(),
            format!("        if ({}) break;", expression),
            "    } catch (Exception $e) {}".to_string(),
            format!("    sleep({});", self.timing.wait_loop_interval_secs),
            "}".to_string(),
        ]
    }
}

impl CommandTranslator for LegacyTranslator {
    fn variant(&self) -> Variant {
        Variant::Legacy
    }

    fn translate(&self, command: &Command) -> Result<Vec<String>, ResolutionError> {
        let lines = match HANDLERS.get(command.name.as_str()) {
            Some(handler) => handler(self, command),
            None => self.generic(command),
        };
        Ok(lines)
    }

    fn handles(&self, name: &str) -> bool {
        HANDLERS.contains_key(name)
    }
}
