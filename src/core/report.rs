use crate::core::stylecheck::{banner, INFO_BANNER, STYLE_BANNER};
use crate::domain::model::{FileReport, LintReport};
use crate::domain::ports::ReportFormat;
use crate::utils::error::Result;
use regex::Regex;
use std::sync::LazyLock;

static LINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Line (\d+)").expect("line prefix pattern is valid"));

pub fn render(report: &LintReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Csv => render_csv(report),
    }
}

/// Same layout as `StyleChecker::check`, with a header per file.
pub fn file_lines(file: &FileReport) -> Vec<String> {
    let mut lines = banner(STYLE_BANNER);
    for section in &file.style {
        lines.push(format!("--- {} ---", section.name));
        lines.extend(section.messages.iter().cloned());
    }
    lines.push(String::new());
    lines.push(format!("Total errors: {}", file.style_error_count()));
    lines.extend(banner(INFO_BANNER));
    lines.extend(file.errors.iter().cloned());
    lines.extend(file.analysis.iter().cloned());
    lines
}

pub fn render_text(report: &LintReport) -> String {
    let mut out = String::new();
    for file in &report.files {
        out.push_str(&format!("Your file: \"{}\"\n", file.path));
        out.push_str(&format!("Your style: \"{}\"\n\n", report.style_file));
        for line in file_lines(file) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// One row per finding: `file,section,line,message`. Analysis output without
/// a line number gets an empty `line` column.
pub fn render_csv(report: &LintReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["file", "section", "line", "message"])?;

    for file in &report.files {
        let style = file
            .style
            .iter()
            .flat_map(|s| s.messages.iter().map(move |m| (s.name.as_str(), m)));
        let errors = file.errors.iter().map(|m| ("errors", m));
        let analysis = file.analysis.iter().map(|m| ("analysis", m));

        for (section, message) in style.chain(errors).chain(analysis) {
            let line = LINE_PREFIX
                .captures(message)
                .map(|caps| caps[1].to_string())
                .unwrap_or_default();
            writer.write_record([file.path.as_str(), section, line.as_str(), message.as_str()])?;
        }
    }

    let data = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
