pub mod code_analyzer;
pub mod engine;
pub mod errors_checker;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod stylecheck;
pub mod tokenizer;
pub mod tour;

pub use crate::domain::model::{FileReport, Line, LintReport, SourceFile, Token, TokenKind};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ReportFormat, Storage};
pub use crate::utils::error::Result;
