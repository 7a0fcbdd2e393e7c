//! Composition of the final PHP test case file

pub mod naming;
pub mod template;

use crate::error::Result;
use crate::parser::types::ParsedScript;
use crate::utils::config::{ConverterConfig, DEFAULT_REMOTE_HOST, DEFAULT_REMOTE_PORT};
use chrono::NaiveDateTime;
use naming::TestNames;
use template::{indent_block, load_template, TemplateContext};

const FIRST_LINE: &str = "<?php";
const CLASS_INDENT: usize = 4;
const METHOD_INDENT: usize = 8;

/// Builds the output document from a parsed script and its translated lines
pub struct CodeAssembler<'a> {
    config: &'a ConverterConfig,
    generated_at: NaiveDateTime,
}

impl<'a> CodeAssembler<'a> {
    pub fn new(config: &'a ConverterConfig, generated_at: NaiveDateTime) -> Self {
        Self {
            config,
            generated_at,
        }
    }

    /// Compose the output: the configured template if any, otherwise the
    /// built-in class skeleton
    ///
    /// `translated` holds the lines of each command in script order.
    pub fn assemble(&self, script: &ParsedScript, translated: &[Vec<String>]) -> Result<String> {
        let content = self.test_method_content(translated);
        match &self.config.template {
            Some(path) => {
                let template = load_template(path)?;
                Ok(self.template_context(script, &content).render(&template))
            }
            None => Ok(self.compose_lines(script, &content).join(&self.config.eol)),
        }
    }

    /// Flatten translated commands, terminating each command's last line
    /// with the command EOL when one is configured
    pub fn test_method_content(&self, translated: &[Vec<String>]) -> Vec<String> {
        let command_eol = self.config.command_eol();
        let mut lines = Vec::new();
        for command_lines in translated {
            let last = command_lines.len().saturating_sub(1);
            for (i, line) in command_lines.iter().enumerate() {
                match command_eol {
                    Some(eol) if i == last => lines.push(format!("{}{}", line, eol)),
                    _ => lines.push(line.clone()),
                }
            }
        }
        lines
    }

    pub fn comment(&self) -> String {
        [
            "/*".to_string(),
            "* Autogenerated from Selenium html test case by selenium2php.".to_string(),
            format!("* {}", self.generated_at.format("%Y-%m-%d %H:%M:%S")),
            "*/".to_string(),
        ]
        .join(&self.config.eol)
    }

    fn setup_content(&self, script: &ParsedScript) -> Vec<String> {
        let receiver = &self.config.receiver;
        let mut lines = vec![
            format!("{}->setBrowser(\"{}\");", receiver, self.config.browser),
            format!("{}->setBrowserUrl(\"{}\");", receiver, script.base_url),
        ];
        if let Some(host) = self.config.remote_host.as_deref().filter(|h| !h.is_empty()) {
            lines.push(format!("{}->setHost(\"{}\");", receiver, host));
        }
        if let Some(port) = self.config.remote_port {
            lines.push(format!("{}->setPort(\"{}\");", receiver, port));
        }
        lines
    }

    fn compose_lines(&self, script: &ParsedScript, content: &[String]) -> Vec<String> {
        let names = TestNames::new(&self.config.class_prefix, &script.test_name);
        let class_pad = " ".repeat(CLASS_INDENT);
        let method_pad = " ".repeat(METHOD_INDENT);

        let mut lines = vec![FIRST_LINE.to_string(), self.comment()];

        if !self.config.pre_class_lines.is_empty() {
            lines.push(String::new());
            lines.extend(self.config.pre_class_lines.iter().cloned());
            lines.push(String::new());
        }

        lines.push(format!(
            "class {} extends {} {{",
            names.class_name,
            self.config.parent_class()
        ));
        lines.push(String::new());

        if !self.config.class_body_lines.is_empty() {
            for line in &self.config.class_body_lines {
                lines.push(format!("{}{}", class_pad, line));
            }
            lines.push(String::new());
        }

        lines.push(format!("{}function setUp() {{", class_pad));
        for line in self.setup_content(script) {
            lines.push(format!("{}{}", method_pad, line));
        }
        lines.push(format!("{}}}", class_pad));
        lines.push(String::new());

        lines.push(format!("{}function {}() {{", class_pad, names.method_name));
        for line in content {
            lines.push(format!("{}{}", method_pad, line));
        }
        lines.push(format!("{}}}", class_pad));
        lines.push(String::new());

        lines.push("}".to_string());
        lines
    }

    fn template_context(&self, script: &ParsedScript, content: &[String]) -> TemplateContext {
        let config = self.config;
        let names = TestNames::new(&config.class_prefix, &script.test_name);
        let remote_host = config
            .remote_host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_REMOTE_HOST);
        let remote_port = config.remote_port.unwrap_or(DEFAULT_REMOTE_PORT);

        let mut ctx = TemplateContext::new();
        ctx.set("comment", self.comment())
            .set("className", names.class_name)
            .set("browser", config.browser.as_str())
            .set("testUrl", script.base_url.as_str())
            .set("remoteHost", remote_host)
            .set("remotePort", remote_port.to_string())
            .set("testMethodName", names.method_name)
            .set(
                "testMethodContent",
                indent_block(content, METHOD_INDENT, &config.eol),
            )
            .set("customParam1", config.custom_param1.as_str())
            .set("customParam2", config.custom_param2.as_str());
        ctx
    }
}
