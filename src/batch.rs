//! File level conversion around [`Converter`]
//!
//! Resolves which html files to convert, where their PHP output goes, and
//! does the reading and writing. Each file is converted independently: a
//! failure is recorded and the remaining files are still converted.

use crate::converter::Converter;
use crate::utils::config::BatchConfig;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of converting a set of files
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Written PHP files
    pub converted: Vec<PathBuf>,

    /// Input files that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct BatchConverter {
    converter: Converter,
    config: BatchConfig,
}

impl BatchConverter {
    pub fn new(converter: Converter, config: BatchConfig) -> Self {
        Self { converter, config }
    }

    /// Convert a single html file; `php_path` overrides the derived output name
    pub fn convert_single(&self, html_path: &Path, php_path: Option<&Path>) -> Result<PathBuf> {
        let source_base = parent_dir(html_path);
        self.convert_file(html_path, php_path, &source_base)
    }

    /// Convert every matching html file in `dir`
    pub fn convert_directory(&self, dir: &Path) -> Result<BatchReport> {
        let files = self.collect_inputs(dir)?;
        if files.is_empty() {
            bail!(
                "Files \"{}\" not found in \"{}\"",
                self.config.html_pattern,
                dir.display()
            );
        }

        let mut report = BatchReport::default();
        for file in files {
            match self.convert_file(&file, None, dir) {
                Ok(written) => report.converted.push(written),
                Err(err) => {
                    log::error!("{}: {:#}", file.display(), err);
                    report.failed.push((file, format!("{:#}", err)));
                }
            }
        }
        Ok(report)
    }

    /// Html files in `dir` matching the pattern, sorted; subdirectories are
    /// included when recursive
    pub fn collect_inputs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = if self.config.recursive {
            let pattern = glob::Pattern::new(&self.config.html_pattern)
                .with_context(|| format!("Invalid file pattern: {}", self.config.html_pattern))?;
            let mut files = Vec::new();
            for entry in WalkDir::new(dir) {
                let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
                if entry.file_type().is_file()
                    && pattern.matches(&entry.file_name().to_string_lossy())
                {
                    files.push(entry.into_path());
                }
            }
            files
        } else {
            let pattern = dir.join(&self.config.html_pattern);
            let pattern = pattern.to_string_lossy();
            glob::glob(&pattern)
                .with_context(|| format!("Invalid file pattern: {}", pattern))?
                .filter_map(|entry| entry.ok())
                .filter(|path| path.is_file())
                .collect()
        };
        files.sort();
        Ok(files)
    }

    /// Output path for `html_path`: `<dest>/<prefix><stem><postfix>.php`
    ///
    /// A relative destination that does not exist as given is looked up
    /// under `source_base`.
    pub fn output_path(&self, html_path: &Path, source_base: &Path) -> Result<PathBuf> {
        let dir = match &self.config.dest {
            Some(dest) if dest.is_dir() => dest.clone(),
            Some(dest) => {
                let relative = source_base.join(dest);
                if !relative.is_dir() {
                    bail!("Directory \"{}\" not found", relative.display());
                }
                relative
            }
            None => parent_dir(html_path),
        };

        let file_name = html_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name.strip_suffix(".html").unwrap_or(&file_name);

        Ok(dir.join(format!(
            "{}{}{}.php",
            self.config.php_prefix, stem, self.config.php_postfix
        )))
    }

    fn convert_file(
        &self,
        html_path: &Path,
        php_path: Option<&Path>,
        source_base: &Path,
    ) -> Result<PathBuf> {
        let html = std::fs::read_to_string(html_path)
            .with_context(|| format!("Cannot open file \"{}\"", html_path.display()))?;

        let php = self
            .converter
            .convert(&html, None)
            .with_context(|| format!("Failed to convert {}", html_path.display()))?;

        let output = match php_path {
            Some(path) => path.to_path_buf(),
            None => self.output_path(html_path, source_base)?,
        };
        std::fs::write(&output, php)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        log::info!("{} -> {}", html_path.display(), output.display());
        Ok(output)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DOC: &str = "<html><head><title>Login</title></head><body><table>\
        <tr><td>open</td><td>/</td><td></td></tr>\
        </table></body></html>";

    fn batch(config: BatchConfig) -> BatchConverter {
        BatchConverter::new(Converter::default(), config)
    }

    #[test]
    fn test_output_path_next_to_input() {
        let b = batch(BatchConfig::default());
        let out = b
            .output_path(Path::new("suite/login.html"), Path::new("suite"))
            .unwrap();
        assert_eq!(out, PathBuf::from("suite/loginTest.php"));
    }

    #[test]
    fn test_output_path_with_prefix_and_relative_dest() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("php")).unwrap();
        let b = batch(BatchConfig {
            dest: Some(PathBuf::from("php")),
            php_prefix: "Ui".to_string(),
            php_postfix: "Case".to_string(),
            ..Default::default()
        });
        let out = b
            .output_path(&dir.path().join("login.html"), dir.path())
            .unwrap();
        assert_eq!(out, dir.path().join("php").join("UiloginCase.php"));
    }

    #[test]
    fn test_output_path_missing_dest() {
        let dir = tempfile::tempdir().unwrap();
        let b = batch(BatchConfig {
            dest: Some(PathBuf::from("does-not-exist")),
            ..Default::default()
        });
        assert!(b.output_path(&dir.path().join("a.html"), dir.path()).is_err());
    }

    #[test]
    fn test_convert_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("login.html");
        fs::write(&html, DOC).unwrap();

        let written = batch(BatchConfig::default()).convert_single(&html, None).unwrap();
        assert_eq!(written, dir.path().join("loginTest.php"));
        let php = fs::read_to_string(written).unwrap();
        assert!(php.contains("class LoginTest extends PHPUnit_Extensions_SeleniumTestCase {"));
        assert!(php.contains(r#"        $this->open("/");"#));
    }

    #[test]
    fn test_convert_directory_recursive_and_isolated_failures() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("a.html"), DOC).unwrap();
        fs::write(dir.path().join("broken.html"), "<html>no table</html>").unwrap();
        fs::write(nested.join("b.html"), DOC).unwrap();
        fs::write(dir.path().join("notes.txt"), DOC).unwrap();

        let flat = batch(BatchConfig::default());
        assert_eq!(flat.collect_inputs(dir.path()).unwrap().len(), 2);

        let recursive = batch(BatchConfig {
            recursive: true,
            ..Default::default()
        });
        let report = recursive.convert_directory(dir.path()).unwrap();
        assert_eq!(report.converted.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("broken.html"));
        assert!(report.failed[0].1.contains("no command table"));
        assert!(!report.is_success());
        assert!(nested.join("bTest.php").is_file());
    }

    #[test]
    fn test_empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(batch(BatchConfig::default())
            .convert_directory(dir.path())
            .is_err());
    }
}
