use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Symbol,
    Keyword,
    NumberConstant,
    StringConstant,
    Identifier,
    Operation,
    Comment,
    Space,
}

/// A lexical unit of C# source.
///
/// `value` is the semantic text (string contents without quotes, comment text
/// without markers); `lexeme` is the exact slice taken from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub lexeme: String,
    pub row: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, row: usize, column: usize) -> Self {
        let value = value.into();
        Self {
            kind,
            lexeme: value.clone(),
            value,
            row,
            column,
        }
    }

    pub fn with_lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.lexeme = lexeme.into();
        self
    }

    pub fn is_space(&self) -> bool {
        self.kind == TokenKind::Space
    }

    pub fn is_newline(&self) -> bool {
        self.kind == TokenKind::Space && self.value == "\n"
    }

    pub fn is(&self, value: &str) -> bool {
        self.value == value && !matches!(self.kind, TokenKind::StringConstant | TokenKind::Comment)
    }

    /// Last row this token touches.
    pub fn end_row(&self) -> usize {
        if self.is_newline() {
            return self.row;
        }
        self.row + self.lexeme.matches('\n').count()
    }
}

/// Tokens that start on the same source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub tokens: Vec<Token>,
    /// The row begins inside a token opened on an earlier row.
    pub continuation: bool,
}

impl Line {
    pub fn significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| !t.is_space())
    }

    pub fn first_significant(&self) -> Option<&Token> {
        self.significant().next()
    }

    pub fn last_significant(&self) -> Option<&Token> {
        self.tokens.iter().rev().find(|t| !t.is_space())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.tokens.iter().any(|t| t.is(value))
    }

    pub fn is_blank(&self) -> bool {
        self.tokens.iter().all(Token::is_space)
    }

    /// Leading whitespace of the row, if any.
    pub fn indent(&self) -> &str {
        match self.tokens.first() {
            Some(token) if token.is_space() && !token.is_newline() => &token.value,
            _ => "",
        }
    }

    /// Number of chars on the row as written, without the line break.
    /// Tokens running onto later rows only count up to their first break.
    pub fn char_len(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| !t.is_newline())
            .map(|t| {
                let first_row = t.lexeme.split('\n').next().unwrap_or_default();
                first_row.trim_end_matches('\r').chars().count()
            })
            .sum()
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

/// Findings of one checker group, e.g. a single style rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub style: Vec<Section>,
    pub errors: Vec<String>,
    pub analysis: Vec<String>,
}

impl FileReport {
    pub fn style_error_count(&self) -> usize {
        self.style.iter().map(|s| s.messages.len()).sum()
    }

    pub fn finding_count(&self) -> usize {
        self.style_error_count() + self.errors.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub style_file: String,
    pub files: Vec<FileReport>,
}

impl LintReport {
    pub fn total_findings(&self) -> usize {
        self.files.iter().map(FileReport::finding_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(tokens: Vec<Token>) -> Line {
        Line {
            number: 1,
            tokens,
            continuation: false,
        }
    }

    #[test]
    fn test_line_helpers_skip_whitespace() {
        let l = line(vec![
            Token::new(TokenKind::Space, "    ", 1, 1),
            Token::new(TokenKind::Keyword, "return", 1, 5),
            Token::new(TokenKind::Symbol, ";", 1, 11),
            Token::new(TokenKind::Space, "\n", 1, 12),
        ]);
        assert_eq!(l.indent(), "    ");
        assert_eq!(l.first_significant().map(|t| t.value.as_str()), Some("return"));
        assert_eq!(l.last_significant().map(|t| t.value.as_str()), Some(";"));
        assert_eq!(l.significant().count(), 2);
        assert_eq!(l.char_len(), 11);
        assert!(!l.is_blank());
    }

    #[test]
    fn test_string_contents_do_not_match_symbols() {
        let token = Token::new(TokenKind::StringConstant, "{", 1, 1).with_lexeme("\"{\"");
        assert!(!token.is("{"));
        assert_eq!(token.end_row(), 1);
    }
}
