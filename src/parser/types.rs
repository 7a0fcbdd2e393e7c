/// One recorded action from the Selenium IDE command table
///
/// `target` and `value` hold decoded text ready to be embedded in a
/// double-quoted PHP string. An empty cell is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub target: Option<String>,
    pub value: Option<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, target: Option<&str>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            target: target.map(str::to_string),
            value: value.map(str::to_string),
        }
    }

    /// Target text, or an empty string when the cell was empty
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or_default()
    }

    /// Value text, or an empty string when the cell was empty
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// Short human-readable form used in notes and error markers
    pub fn display(&self) -> String {
        match (&self.target, &self.value) {
            (Some(t), Some(v)) => format!("{}('{}', '{}')", self.name, t, v),
            (Some(t), None) => format!("{}('{}')", self.name, t),
            (None, Some(v)) => format!("{}('', '{}')", self.name, v),
            (None, None) => format!("{}()", self.name),
        }
    }
}

/// Result of parsing one recorded test case document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScript {
    /// Test name used for class and method names
    pub test_name: String,

    /// Base URL of the recorded session
    pub base_url: String,

    /// Commands in execution order
    pub commands: Vec<Command>,
}
