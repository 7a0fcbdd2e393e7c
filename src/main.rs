use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use selenium2php::{BatchConfig, BatchConverter, Converter, ConverterConfig, Variant};

#[derive(Parser)]
#[command(name = "selenium2php")]
#[command(version = "0.1.0")]
#[command(
    about = "Converts Selenium IDE html test cases into PHPUnit test cases",
    long_about = None
)]
struct Cli {
    /// Html test case file, or a directory of them
    input: PathBuf,

    /// Output file (single file input only)
    output: Option<PathBuf>,

    /// Destination directory for generated files
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Prefix of generated file names
    #[arg(long)]
    php_prefix: Option<String>,

    /// Postfix of generated file names
    #[arg(long)]
    php_postfix: Option<String>,

    /// Browser string passed to setBrowser (e.g. "*firefox")
    #[arg(long)]
    browser: Option<String>,

    /// Test URL; overrides the base URL recorded in the document
    #[arg(long)]
    browser_url: Option<String>,

    /// Selenium server host
    #[arg(long)]
    remote_host: Option<String>,

    /// Selenium server port
    #[arg(long)]
    remote_port: Option<u16>,

    /// Scan subdirectories too
    #[arg(short, long, default_value = "false")]
    recursive: bool,

    /// Prefix of generated class names
    #[arg(long)]
    class_prefix: Option<String>,

    /// Generate PHPUnit_Extensions_Selenium2TestCase (WebDriver) code
    #[arg(long, default_value = "false")]
    selenium2: bool,

    /// Template file with {$placeholder} markers
    #[arg(long)]
    tpl: Option<PathBuf>,

    /// Value of {$customParam1} in templates
    #[arg(long)]
    custom_param1: Option<String>,

    /// Value of {$customParam2} in templates
    #[arg(long)]
    custom_param2: Option<String>,

    /// Parent class of generated test cases
    #[arg(long)]
    parent_class: Option<String>,

    /// YAML file with converter settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replace untranslatable commands with a comment instead of failing
    #[arg(long, default_value = "false")]
    continue_on_error: bool,
}

impl Cli {
    fn converter_config(&self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_file(path)?,
            None => ConverterConfig::default(),
        };

        if self.selenium2 {
            config.variant = Variant::WebDriver;
        }
        if self.continue_on_error {
            config.continue_on_error = true;
        }
        if let Some(browser) = &self.browser {
            config.browser = browser.clone();
        }
        if let Some(url) = &self.browser_url {
            config.test_url = Some(url.clone());
        }
        if let Some(host) = &self.remote_host {
            config.remote_host = Some(host.clone());
        }
        if let Some(port) = self.remote_port {
            config.remote_port = Some(port);
        }
        if let Some(prefix) = &self.class_prefix {
            config.class_prefix = prefix.clone();
        }
        if let Some(tpl) = &self.tpl {
            config.template = Some(tpl.clone());
        }
        if let Some(param) = &self.custom_param1 {
            config.custom_param1 = param.clone();
        }
        if let Some(param) = &self.custom_param2 {
            config.custom_param2 = param.clone();
        }
        if let Some(parent) = &self.parent_class {
            config.parent_class = Some(parent.clone());
        }
        Ok(config)
    }

    fn batch_config(&self) -> BatchConfig {
        let mut config = BatchConfig {
            dest: self.dest.clone(),
            recursive: self.recursive,
            ..Default::default()
        };
        if let Some(prefix) = &self.php_prefix {
            config.php_prefix = prefix.clone();
        }
        if let Some(postfix) = &self.php_postfix {
            config.php_postfix = postfix.clone();
        }
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let converter_config = cli.converter_config()?;
    let variant = converter_config.variant;
    let batch = BatchConverter::new(Converter::new(converter_config), cli.batch_config());

    println!(
        "{} {} ({})",
        "selenium2php".bold(),
        cli.input.display(),
        match variant {
            Variant::Legacy => "SeleniumTestCase",
            Variant::WebDriver => "Selenium2TestCase",
        }
        .cyan()
    );

    if cli.input.is_dir() {
        if cli.output.is_some() {
            bail!("An output file can only be given for a single input file");
        }

        let report = batch.convert_directory(&cli.input)?;
        for path in &report.converted {
            println!("  {} {}", "✓".green(), path.display());
        }
        for (path, err) in &report.failed {
            println!("  {} {}: {}", "✗".red(), path.display(), err);
        }

        if !report.is_success() {
            bail!(
                "{} of {} files failed",
                report.failed.len(),
                report.failed.len() + report.converted.len()
            );
        }
    } else {
        let written = batch.convert_single(&cli.input, cli.output.as_deref())?;
        println!("  {} {}", "✓".green(), written.display());
    }

    println!("{}", "OK.".green().bold());
    Ok(())
}
