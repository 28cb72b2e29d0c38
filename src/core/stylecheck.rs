use crate::config::style_config::StyleConfig;
use crate::core::{code_analyzer, errors_checker, rules};
use crate::domain::model::{FileReport, Line, Section};

const RULE_BANNER: &str = "####################################################";
pub const STYLE_BANNER: &str = "                 CHECKING THE STYLE                 ";
pub const INFO_BANNER: &str = "               ADDITIONAL INFORMATION               ";

/// Runs the configured style rules plus the error checker and analyzer
/// over one tokenized file.
#[derive(Debug, Clone)]
pub struct StyleChecker {
    config: StyleConfig,
}

impl StyleChecker {
    pub fn new(config: StyleConfig) -> Self {
        Self { config }
    }

    /// One section per rule that found something, in a fixed rule order.
    pub fn style_sections(&self, lines: &[Line]) -> Vec<Section> {
        let c = &self.config;
        let mut runs: Vec<(&str, Vec<String>)> = Vec::new();

        if let Some(max) = c.max_line_length {
            runs.push(("max_line_length", rules::max_line_length(max, lines)));
        }
        if let Some((style, size)) = c.indent_style_and_size {
            runs.push((
                "indent_style_and_size",
                rules::indent_style_and_size(style, size, lines),
            ));
        }
        if let Some(count) = c.newline_before_return {
            runs.push(("newline_before_return", rules::newline_before_return(count, lines)));
        }

        let flags: [(&str, Option<bool>, fn(bool, &[Line]) -> Vec<String>); 13] = [
            ("require_semicolons", c.require_semicolons, rules::require_semicolons),
            ("space_after_keywords", c.space_after_keywords, rules::space_after_keywords),
            ("camel_case", c.camel_case, rules::camel_case),
            ("always_use_braces", c.always_use_braces, rules::always_use_braces),
            ("newline_after_open_brace", c.newline_after_open_brace, rules::newline_after_open_brace),
            ("newline_before_close_brace", c.newline_before_close_brace, rules::newline_before_close_brace),
            ("space_after_comma", c.space_after_comma, rules::space_after_comma),
            ("space_before_comma", c.space_before_comma, rules::space_before_comma),
            ("space_after_colon", c.space_after_colon, rules::space_after_colon),
            ("space_before_colon", c.space_before_colon, rules::space_before_colon),
            ("space_around_operators", c.space_around_operators, rules::space_around_operators),
            ("allow_trailing_whitespace", c.allow_trailing_whitespace, rules::allow_trailing_whitespace),
            ("trim_whitespace", c.trim_whitespace, rules::trim_whitespace),
        ];
        for (name, value, rule) in flags {
            if let Some(value) = value {
                runs.push((name, rule(value, lines)));
            }
        }

        runs.into_iter()
            .filter(|(_, messages)| !messages.is_empty())
            .map(|(name, messages)| {
                tracing::debug!("{}: {} findings", name, messages.len());
                Section {
                    name: name.to_string(),
                    messages,
                }
            })
            .collect()
    }

    /// `--- rule ---` blocks followed by the total.
    pub fn check_style(&self, lines: &[Line]) -> Vec<String> {
        let sections = self.style_sections(lines);
        let total: usize = sections.iter().map(|s| s.messages.len()).sum();

        let mut result = Vec::new();
        for section in sections {
            result.push(format!("--- {} ---", section.name));
            result.extend(section.messages);
        }
        result.push(String::new());
        result.push(format!("Total errors: {}", total));
        result
    }

    /// The full text report for one file.
    pub fn check(&self, lines: &[Line]) -> Vec<String> {
        let mut result = banner(STYLE_BANNER);
        result.extend(self.check_style(lines));
        result.extend(banner(INFO_BANNER));
        result.extend(errors_checker::check(lines, self.config.bracket_strategy()));
        result.extend(code_analyzer::analyze(lines));
        result
    }

    pub fn report(&self, path: &str, lines: &[Line]) -> FileReport {
        FileReport {
            path: path.to_string(),
            style: self.style_sections(lines),
            errors: errors_checker::check(lines, self.config.bracket_strategy()),
            analysis: code_analyzer::analyze(lines),
        }
    }
}

pub fn banner(title: &str) -> Vec<String> {
    vec![RULE_BANNER.to_string(), title.to_string(), RULE_BANNER.to_string()]
}
