use crate::core::errors_checker::BracketStrategy;
use crate::core::rules::IndentStyle;
use crate::utils::error::{LintError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Style settings read from a `.style` (JSON) or `.toml` file.
///
/// Every rule is optional; rules left out of the file are not run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    pub max_line_length: Option<usize>,
    pub indent_style_and_size: Option<(IndentStyle, usize)>,
    pub newline_before_return: Option<usize>,
    pub require_semicolons: Option<bool>,
    pub space_after_keywords: Option<bool>,
    pub camel_case: Option<bool>,
    pub always_use_braces: Option<bool>,
    pub newline_after_open_brace: Option<bool>,
    pub newline_before_close_brace: Option<bool>,
    pub space_after_comma: Option<bool>,
    pub space_before_comma: Option<bool>,
    pub space_after_colon: Option<bool>,
    pub space_before_colon: Option<bool>,
    pub space_around_operators: Option<bool>,
    pub allow_trailing_whitespace: Option<bool>,
    pub trim_whitespace: Option<bool>,
    pub bracket_strategy: Option<BracketStrategy>,
}

impl StyleConfig {
    /// Picks the parser by extension: `.style`/`.json` are JSON, `.toml` is TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("style") | Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(LintError::UnsupportedConfigFormat {
                path: path.display().to_string(),
            }),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        serde_json::from_str(&processed).map_err(|e| LintError::ConfigValidationError {
            field: "style_parsing".to_string(),
            message: format!("JSON parsing error: {}", e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                std::env::var(name).unwrap_or_else(|_| format!("${{{}}}", name))
            })
            .into_owned()
    }

    pub fn bracket_strategy(&self) -> BracketStrategy {
        self.bracket_strategy.unwrap_or_default()
    }

    /// Number of rules that will run.
    pub fn enabled_rules(&self) -> usize {
        let numeric = [
            self.max_line_length.is_some(),
            self.indent_style_and_size.is_some(),
            self.newline_before_return.is_some(),
        ];
        let flags = [
            self.require_semicolons,
            self.space_after_keywords,
            self.camel_case,
            self.always_use_braces,
            self.newline_after_open_brace,
            self.newline_before_close_brace,
            self.space_after_comma,
            self.space_before_comma,
            self.space_after_colon,
            self.space_before_colon,
            self.space_around_operators,
            self.allow_trailing_whitespace,
            self.trim_whitespace,
        ];
        numeric.iter().filter(|set| **set).count() + flags.iter().filter(|f| f.is_some()).count()
    }
}

impl Validate for StyleConfig {
    fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_line_length {
            validate_positive_number("max_line_length", max, 1)?;
        }
        if let Some((_, size)) = self.indent_style_and_size {
            validate_range("indent_style_and_size", size, 1, 16)?;
        }
        if let Some(count) = self.newline_before_return {
            validate_range("newline_before_return", count, 0, 10)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const DEFAULT_STYLE: &str = r#"{
        "max_line_length": 120,
        "indent_style_and_size": ["spaces", 4],
        "newline_before_return": 1,
        "require_semicolons": true,
        "space_after_keywords": true,
        "camel_case": true
    }"#;

    #[test]
    fn test_parse_json_style() {
        let config = StyleConfig::from_json_str(DEFAULT_STYLE).unwrap();

        assert_eq!(config.max_line_length, Some(120));
        assert_eq!(config.indent_style_and_size, Some((IndentStyle::Spaces, 4)));
        assert_eq!(config.require_semicolons, Some(true));
        assert_eq!(config.trim_whitespace, None);
        assert_eq!(config.enabled_rules(), 6);
        assert_eq!(config.bracket_strategy(), BracketStrategy::Auto);
    }

    #[test]
    fn test_parse_toml_style() {
        let content = r#"
max_line_length = 100
indent_style_and_size = ["tab", 1]
space_after_comma = true
bracket_strategy = "stack"
"#;
        let config = StyleConfig::from_toml_str(content).unwrap();

        assert_eq!(config.indent_style_and_size, Some((IndentStyle::Tab, 1)));
        assert_eq!(config.space_after_comma, Some(true));
        assert_eq!(config.bracket_strategy(), BracketStrategy::Stack);
    }

    #[test]
    fn test_unknown_rule_is_rejected() {
        let err = StyleConfig::from_json_str(r#"{"max_line_lenght": 80}"#).unwrap_err();
        assert!(matches!(err, LintError::ConfigValidationError { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CSLINT_TEST_MAX_LINE", "42");

        let config = StyleConfig::from_json_str(r#"{"max_line_length": ${CSLINT_TEST_MAX_LINE}}"#).unwrap();
        assert_eq!(config.max_line_length, Some(42));

        std::env::remove_var("CSLINT_TEST_MAX_LINE");
    }

    #[test]
    fn test_config_validation() {
        let config = StyleConfig::from_json_str(r#"{"max_line_length": 0}"#).unwrap();
        assert!(config.validate().is_err());

        let config = StyleConfig::from_json_str(r#"{"indent_style_and_size": ["spaces", 0]}"#).unwrap();
        assert!(config.validate().is_err());

        let config = StyleConfig::from_json_str(DEFAULT_STYLE).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = Builder::new().suffix(".style").tempfile().unwrap();
        temp_file.write_all(DEFAULT_STYLE.as_bytes()).unwrap();

        let config = StyleConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.newline_before_return, Some(1));
    }

    #[test]
    fn test_unsupported_extension() {
        let mut temp_file = Builder::new().suffix(".yaml").tempfile().unwrap();
        temp_file.write_all(b"max_line_length: 80").unwrap();

        let err = StyleConfig::from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, LintError::UnsupportedConfigFormat { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
