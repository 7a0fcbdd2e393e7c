//! One document conversion: parse, translate every command, assemble

use crate::assembler::CodeAssembler;
use crate::error::Result;
use crate::parser::html::{parse_document, ParseSettings};
use crate::parser::types::ParsedScript;
use crate::translator::{translator_for, CommandTranslator};
use crate::utils::config::ConverterConfig;
use chrono::{Local, NaiveDateTime};

/// Converts Selenium IDE html test cases into PHPUnit test case source
///
/// Holds only its configuration; every call to [`Converter::convert`] is
/// independent of the others.
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Convert a recorded test case document into PHP source text
    ///
    /// `test_name` overrides the name derived from the document title.
    pub fn convert(&self, html: &str, test_name: Option<&str>) -> Result<String> {
        self.convert_at(html, test_name, Local::now().naive_local())
    }

    /// Same as [`Converter::convert`] with a fixed generation timestamp
    pub fn convert_at(
        &self,
        html: &str,
        test_name: Option<&str>,
        generated_at: NaiveDateTime,
    ) -> Result<String> {
        let script = self.parse(html, test_name)?;
        let translated = self.translate(&script)?;
        CodeAssembler::new(&self.config, generated_at).assemble(&script, &translated)
    }

    pub fn parse(&self, html: &str, test_name: Option<&str>) -> Result<ParsedScript> {
        let settings = ParseSettings {
            test_name,
            base_url: self.config.test_url.as_deref(),
            default_test_name: &self.config.default_test_name,
            default_base_url: &self.config.default_test_url,
        };
        parse_document(html, &settings)
    }

    /// Translate every command in script order
    ///
    /// The first untranslatable command aborts the conversion, unless
    /// `continue_on_error` is set, in which case it is replaced by a marker
    /// comment.
    pub fn translate(&self, script: &ParsedScript) -> Result<Vec<Vec<String>>> {
        let translator = translator_for(
            self.config.variant,
            &self.config.receiver,
            &self.config.timing,
        );
        self.translate_with(translator.as_ref(), script)
    }

    fn translate_with(
        &self,
        translator: &dyn CommandTranslator,
        script: &ParsedScript,
    ) -> Result<Vec<Vec<String>>> {
        log::debug!(
            "Translating {} commands for {:?}",
            script.commands.len(),
            translator.variant()
        );

        let mut translated = Vec::with_capacity(script.commands.len());
        for command in &script.commands {
            if !translator.handles(&command.name) {
                log::debug!("{} has no dedicated rule, emitting a direct call", command.name);
            }
            match translator.translate(command) {
                Ok(lines) => translated.push(lines),
                Err(err) if self.config.continue_on_error => {
                    log::warn!("Skipping {}: {}", command.display(), err);
                    translated.push(vec![format!(
                        "// selenium2php: cannot convert {}: {}",
                        command.display(),
                        err
                    )]);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(translated)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}
