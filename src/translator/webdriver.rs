//! WebDriver style translation for `PHPUnit_Extensions_Selenium2TestCase`
//!
//! Element commands resolve their target through the locator grammar and
//! act on the returned element. Waits use `waitUntil` with a closure whose
//! test case argument is `$testCase`; lookups inside the closure are built
//! on that receiver directly.

use super::locator::resolve;
use super::php;
use super::{note, CommandTranslator, Variant};
use crate::error::ResolutionError;
use crate::parser::types::Command;
use crate::utils::config::Timing;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Receiver of element lookups inside waitUntil closures
pub const CLOSURE_RECEIVER: &str = "$testCase";

const WEBDRIVER_EXCEPTION: &str = "PHPUnit_Extensions_Selenium2TestCase_WebDriverException";
const NO_SUCH_ELEMENT: &str = "PHPUnit_Extensions_Selenium2TestCase_WebDriverException::NoSuchElement";

type Handler = fn(&WebDriverTranslator, &Command) -> Result<Vec<String>, ResolutionError>;

static HANDLERS: LazyLock<HashMap<&'static str, Handler>> = LazyLock::new(|| {
    let mut table: HashMap<&'static str, Handler> = HashMap::new();
    table.insert("open", WebDriverTranslator::open);
    table.insert("type", WebDriverTranslator::type_text);
    table.insert("sendKeys", WebDriverTranslator::send_keys);
    table.insert("click", WebDriverTranslator::click);
    // Page load waits are implicit in WebDriver
    table.insert("clickAndWait", WebDriverTranslator::click);
    table.insert("select", WebDriverTranslator::select);
    table.insert("assertText", WebDriverTranslator::assert_text);
    table.insert("assertNotText", WebDriverTranslator::assert_not_text);
    table.insert("assertElementPresent", WebDriverTranslator::assert_element_present);
    table.insert(
        "assertElementNotPresent",
        WebDriverTranslator::assert_element_not_present,
    );
    table.insert("waitForElementPresent", WebDriverTranslator::wait_for_element_present);
    table.insert(
        "waitForElementNotPresent",
        WebDriverTranslator::wait_for_element_not_present,
    );
    table.insert("waitForTextPresent", WebDriverTranslator::wait_for_text_present);
    table.insert("waitForTextNotPresent", WebDriverTranslator::wait_for_text_not_present);
    table.insert("waitForText", WebDriverTranslator::wait_for_text);
    table.insert("waitForNotText", WebDriverTranslator::wait_for_not_text);
    table.insert("assertConfirmation", WebDriverTranslator::assert_alert);
    table.insert("verifyConfirmation", WebDriverTranslator::assert_alert);
    table.insert("assertAlert", WebDriverTranslator::assert_alert);
    table.insert("assertTextPresent", WebDriverTranslator::assert_text_present);
    table.insert("assertTextNotPresent", WebDriverTranslator::assert_text_not_present);
    table.insert("storeAttribute", WebDriverTranslator::store_attribute);
    table.insert("runScript", WebDriverTranslator::run_script);
    table
});

static LABEL_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"label=(.+)").expect("valid label regex"));

static VALUE_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"value=(.+)").expect("valid value regex"));

/// `//div/a/@href` -> (`//div/a`, `href`)
static ATTRIBUTE_LOCATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)/?@(\S+)$").expect("valid attribute regex"));

pub struct WebDriverTranslator {
    receiver: String,
    timing: Timing,
}

impl WebDriverTranslator {
    pub fn new(receiver: &str, timing: Timing) -> Self {
        Self {
            receiver: receiver.to_string(),
            timing,
        }
    }

    fn generic(&self, cmd: &Command) -> Vec<String> {
        if cmd.value.is_some() {
            note("Unknown command", cmd);
        }
        vec![php::call(
            &self.receiver,
            &cmd.name,
            cmd.target.as_deref(),
            cmd.value.as_deref(),
        )]
    }

    /// Element lookup statement for `selector` on `receiver`
    fn find(&self, selector: &str, receiver: &str) -> Result<String, ResolutionError> {
        Ok(resolve(selector)?.to_php(receiver))
    }

    fn open(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        Ok(vec![php::call(&self.receiver, "url", Some(cmd.target()), None)])
    }

    fn type_text(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        Ok(vec![
            format!("$input = {}", self.find(cmd.target(), &self.receiver)?),
            "$input->clear();".to_string(),
            format!("$input->value(\"{}\");", cmd.value()),
        ])
    }

    /// The test case sends keys one by one through value(), without clearing
    fn send_keys(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        Ok(vec![
            format!("$input = {}", self.find(cmd.target(), &self.receiver)?),
            format!("$input->value(\"{}\");", cmd.value()),
        ])
    }

    fn click(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        Ok(vec![
            format!("$input = {}", self.find(cmd.target(), &self.receiver)?),
            "$input->click();".to_string(),
        ])
    }

    fn select(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let option = cmd.value();
        let mut lines = vec![
            format!("$element = {}", self.find(cmd.target(), &self.receiver)?),
            format!("$selectElement = {}->select($element);", self.receiver),
        ];

        if let Some(caps) = LABEL_OPTION_RE.captures(option) {
            lines.push(format!("$selectElement->selectOptionByLabel(\"{}\");", &caps[1]));
        } else if let Some(caps) = VALUE_OPTION_RE.captures(option) {
            lines.push(format!("$selectElement->selectOptionByValue(\"{}\");", &caps[1]));
        } else {
            return Err(ResolutionError::UnknownOptionSelector(option.to_string()));
        }

        Ok(lines)
    }

    fn assert_text(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        Ok(vec![
            format!("$input = {}", self.find(cmd.target(), &self.receiver)?),
            format!(
                "{}->assertEquals(\"{}\", $input->text());",
                self.receiver,
                cmd.value()
            ),
        ])
    }

    fn assert_not_text(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let r = &self.receiver;
        Ok(vec![
            "try {".to_string(),
            format!("    $input = {}", self.find(cmd.target(), r)?),
            format!("    {}", php::assert_true(r, &text_differs(cmd.value()))),
            format!("}} catch ({} $e) {{", WEBDRIVER_EXCEPTION),
            format!("    {}->assertEquals({}, $e->getCode());", r, NO_SUCH_ELEMENT),
            "}".to_string(),
        ])
    }

    fn assert_element_present(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let r = &self.receiver;
        Ok(vec![
            "try {".to_string(),
            format!("    {}", self.find(cmd.target(), r)?),
            format!("    {}", php::assert_true(r, "true")),
            format!("}} catch ({} $e) {{", WEBDRIVER_EXCEPTION),
            format!("    if ({} === $e->getCode()) {{", NO_SUCH_ELEMENT),
            format!("        {}", php::assert_true(r, "false")),
            "    } else {".to_string(),
            "        throw $e;".to_string(),
            "    }".to_string(),
            "}".to_string(),
        ])
    }

    fn assert_element_not_present(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let r = &self.receiver;
        Ok(vec![
            "try {".to_string(),
            format!("    {}", self.find(cmd.target(), r)?),
            format!("    {}", php::assert_true(r, "false")),
            format!("}} catch ({} $e) {{", WEBDRIVER_EXCEPTION),
            format!("    {}->assertEquals({}, $e->getCode());", r, NO_SUCH_ELEMENT),
            "}".to_string(),
        ])
    }

    /// Elements must be displayed to be usable, so presence waits for that
    fn wait_for_element_present(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let lookup = self.find(cmd.target(), CLOSURE_RECEIVER)?;
        Ok(self.wait_until(vec![
            "try {".to_string(),
            format!("    $element = {}", lookup),
            "    if ($element->displayed()) {".to_string(),
            "        return true;".to_string(),
            "    }".to_string(),
            format!("}} catch ({} $e) {{}}", WEBDRIVER_EXCEPTION),
        ]))
    }

    fn wait_for_element_not_present(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let lookup = self.find(cmd.target(), CLOSURE_RECEIVER)?;
        let mut body = vec!["try {".to_string(), format!("    {}", lookup)];
        body.extend(no_such_element_is_success());
        Ok(self.wait_until(body))
    }

    fn wait_for_text_present(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        note("Deprecated command", cmd);
        Ok(self.wait_until(vec![
            format!("if ({} !== false) {{", body_text_position(CLOSURE_RECEIVER, cmd.target())),
            "    return true;".to_string(),
            "}".to_string(),
        ]))
    }

    fn wait_for_text_not_present(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        note("Deprecated command", cmd);
        Ok(self.wait_until(vec![
            format!("if ({} === false) {{", body_text_position(CLOSURE_RECEIVER, cmd.target())),
            "    return true;".to_string(),
            "}".to_string(),
        ]))
    }

    fn wait_for_text(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let lookup = self.find(cmd.target(), CLOSURE_RECEIVER)?;
        Ok(self.wait_until(vec![
            format!("$input = {}", lookup),
            format!("if ({}) {{", text_matches(cmd.value())),
            "    return true;".to_string(),
            "}".to_string(),
        ]))
    }

    fn wait_for_not_text(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let lookup = self.find(cmd.target(), CLOSURE_RECEIVER)?;
        let mut body = vec![
            "try {".to_string(),
            format!("    $input = {}", lookup),
            format!("    if ({}) {{", text_differs(cmd.value())),
            "        return true;".to_string(),
            "    }".to_string(),
        ];
        body.extend(no_such_element_is_success());
        Ok(self.wait_until(body))
    }

    fn assert_alert(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let r = &self.receiver;
        Ok(vec![
            format!("if ( !is_null({}->alertText()) ) {{", r),
            format!(
                "    {}->assertEquals(\"{}\", {}->alertText());",
                r,
                cmd.target(),
                r
            ),
            "}".to_string(),
            format!("{}->acceptAlert();", r),
        ])
    }

    fn assert_text_present(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        note("Deprecated command", cmd);
        Ok(vec![php::assert_true(
            &self.receiver,
            &is_text_present(&self.receiver, cmd.target()),
        )])
    }

    fn assert_text_not_present(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        note("Deprecated command", cmd);
        Ok(vec![php::assert_false(
            &self.receiver,
            &is_text_present(&self.receiver, cmd.target()),
        )])
    }

    /// There is no getAttribute(locator) on the WebDriver test case, so the
    /// element is looked up and the attribute read from it
    fn store_attribute(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        let target = cmd.target();
        let caps = ATTRIBUTE_LOCATOR_RE
            .captures(target)
            .ok_or_else(|| ResolutionError::MissingAttribute(target.to_string()))?;
        let element_target = &caps[1];
        let attribute = &caps[2];

        Ok(vec![
            format!("//replacement for: {}", target),
            format!("$element = {}", self.find(element_target, &self.receiver)?),
            format!("${} = $element->attribute('{}');", cmd.value(), attribute),
        ])
    }

    fn run_script(&self, cmd: &Command) -> Result<Vec<String>, ResolutionError> {
        Ok(vec![
            format!("$script = \"{}\";", cmd.target()),
            format!("$result = {}->execute(array(", self.receiver),
            "    'script' => $script,".to_string(),
            "    'args' => array()".to_string(),
            "));".to_string(),
        ])
    }

    /// Wrap `body` into a waitUntil call with the configured timeout
    fn wait_until(&self, body: Vec<String>) -> Vec<String> {
        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(format!(
            "{}->waitUntil(function({}) {{",
            self.receiver, CLOSURE_RECEIVER
        ));
        lines.extend(php::indent_lines(&body, 4));
        lines.push(format!("}}, {});", self.timing.wait_until_timeout_ms));
        lines
    }
}

impl CommandTranslator for WebDriverTranslator {
    fn variant(&self) -> Variant {
        Variant::WebDriver
    }

    fn translate(&self, command: &Command) -> Result<Vec<String>, ResolutionError> {
        match HANDLERS.get(command.name.as_str()) {
            Some(handler) => handler(self, command),
            None => Ok(self.generic(command)),
        }
    }

    fn handles(&self, name: &str) -> bool {
        HANDLERS.contains_key(name)
    }
}

/// Closing part of a `try` whose catch treats "no such element" as success
fn no_such_element_is_success() -> Vec<String> {
    vec![
        format!("}} catch ({} $e) {{", WEBDRIVER_EXCEPTION),
        format!("    if ({} == $e->getCode()) {{", NO_SUCH_ELEMENT),
        "        return true;".to_string(),
        "    }".to_string(),
        "}".to_string(),
    ]
}

fn body_text_position(receiver: &str, text: &str) -> String {
    format!("strpos({}->byTag('body')->text(), \"{}\")", receiver, text)
}

fn is_text_present(receiver: &str, text: &str) -> String {
    format!("(bool)({} !== false)", body_text_position(receiver, text))
}

/// `$input` text equals an empty `value`, or contains a non-empty one
fn text_matches(value: &str) -> String {
    format!(
        "(\"{v}\" === '' && $input->text() === '') || strpos($input->text(), \"{v}\") !== false",
        v = value
    )
}

/// `$input` text is non-empty for an empty `value`, or lacks a non-empty one
fn text_differs(value: &str) -> String {
    format!(
        "(\"{v}\" === '' && $input->text() !== '') || strpos($input->text(), \"{v}\") === false",
        v = value
    )
}
