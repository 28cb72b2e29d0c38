//! Splits C# source into tokens and groups them into source rows.
//!
//! Whitespace is kept: every run of blanks becomes a `Space` token and every
//! line break is a `Space` token of its own with the value `"\n"`. The style
//! rules rely on this to look at indentation and spacing.

use crate::domain::model::{Line, Token, TokenKind};
use regex::Regex;
use std::sync::LazyLock;

pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const TWO_CHAR_OPERATIONS: &[&str] = &[
    "++", "--", "+=", "-=", "*=", "/=", "%=", "&&", "||", "==", "!=", "<=", ">=", "<<", ">>",
    "=>",
];

const ONE_CHAR_OPERATIONS: &[char] = &['+', '-', '*', '/', '%', '=', '^', '>', '<', '&', '|', '~', '?'];

// Real literals come before integer ones so that `5.5` is not cut at the dot,
// and suffixed forms come before bare ones so that `5UL` keeps its suffix.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:[0-9]*\.[0-9]+|[0-9]+\.[0-9]*|[0-9]+)[fFdDmM]|[0-9]+(?:UL|Ul|uL|ul|LU|Lu|lU|lu|[uUlL])|[0-9]*\.[0-9]+|[0-9]+\.[0-9]*|[0-9]+)",
    )
    .expect("number pattern is valid")
});

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn tokenize(code: &str) -> Vec<Token> {
    Tokenizer::new(code).tokens()
}

pub fn lines(code: &str) -> Vec<Line> {
    Tokenizer::new(code).lines()
}

pub struct Tokenizer<'a> {
    code: &'a str,
    pos: usize,
    row: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            code,
            pos: 0,
            row: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    pub fn tokens(mut self) -> Vec<Token> {
        while self.pos < self.code.len() {
            let _ = self.read_space()
                || self.read_number()
                || self.read_word()
                || self.read_comment()
                || self.read_string()
                || self.read_operation()
                || self.read_symbol();
        }
        tracing::trace!("Tokenized {} bytes into {} tokens", self.code.len(), self.tokens.len());
        self.tokens
    }

    /// Groups tokens by the row they start on.
    pub fn lines(self) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::new();
        let mut reached_row = 0;
        for token in self.tokens() {
            let starts_row = lines.last().map_or(true, |line| line.number != token.row);
            if starts_row {
                lines.push(Line {
                    number: token.row,
                    tokens: Vec::new(),
                    continuation: reached_row >= token.row,
                });
            }
            reached_row = reached_row.max(token.end_row());
            if let Some(line) = lines.last_mut() {
                line.tokens.push(token);
            }
        }
        lines
    }

    fn rest(&self) -> &'a str {
        let code: &'a str = self.code;
        &code[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes `len` bytes as one token. `value` defaults to the consumed text.
    fn emit(&mut self, kind: TokenKind, len: usize, value: Option<String>) {
        let code: &'a str = self.code;
        let lexeme = &code[self.pos..self.pos + len];
        let value = value.unwrap_or_else(|| lexeme.to_string());
        self.tokens
            .push(Token::new(kind, value, self.row, self.column).with_lexeme(lexeme));
        for c in lexeme.chars() {
            if c == '\n' {
                self.row += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += len;
    }

    fn read_space(&mut self) -> bool {
        let mut consumed = false;
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            consumed = true;
            let rest = self.rest();
            if rest.starts_with("\r\n") {
                self.emit(TokenKind::Space, 2, Some("\n".to_string()));
            } else if c == '\n' {
                self.emit(TokenKind::Space, 1, None);
            } else {
                let len = rest
                    .char_indices()
                    .find(|&(i, ch)| {
                        !ch.is_whitespace() || ch == '\n' || rest[i..].starts_with("\r\n")
                    })
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                self.emit(TokenKind::Space, len, None);
            }
        }
        consumed
    }

    fn read_number(&mut self) -> bool {
        match NUMBER.find(self.rest()) {
            Some(m) if !m.is_empty() => {
                self.emit(TokenKind::NumberConstant, m.end(), None);
                true
            }
            _ => false,
        }
    }

    fn read_word(&mut self) -> bool {
        let rest = self.rest();
        let len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
        if len == 0 {
            return false;
        }
        let kind = if is_keyword(&rest[..len]) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.emit(kind, len, None);
        true
    }

    fn read_comment(&mut self) -> bool {
        let rest = self.rest();
        if let Some(body) = rest.strip_prefix("//") {
            let mut end = body.find('\n').unwrap_or(body.len());
            if body[..end].ends_with('\r') {
                end -= 1;
            }
            self.emit(TokenKind::Comment, 2 + end, Some(body[..end].to_string()));
            return true;
        }
        if let Some(body) = rest.strip_prefix("/*") {
            if let Some(end) = body.find("*/") {
                self.emit(TokenKind::Comment, 2 + end + 2, Some(body[..end].to_string()));
            } else {
                // unterminated: keep the first word so the rest is still linted
                let end = body
                    .find(|c: char| c == ' ' || c == '\n' || c == '\r')
                    .unwrap_or(body.len());
                self.emit(TokenKind::Comment, 2 + end, Some(body[..end].to_string()));
            }
            return true;
        }
        false
    }

    fn read_string(&mut self) -> bool {
        let rest = self.rest();
        let quote = match rest.chars().next() {
            Some(c @ ('"' | '\'')) => c,
            _ => return false,
        };
        let prefix = &self.code[..self.pos];
        // `@"`, `$@"` and `@$"` are all verbatim
        let verbatim = quote == '"' && (prefix.ends_with('@') || prefix.ends_with("@$"));
        let body = &rest[1..];

        let mut chars = body.char_indices().peekable();
        let mut close = None;
        while let Some((i, c)) = chars.next() {
            if verbatim {
                if c == quote {
                    if matches!(chars.peek(), Some(&(_, next)) if next == quote) {
                        chars.next();
                        continue;
                    }
                    close = Some(i);
                    break;
                }
            } else if c == '\\' {
                chars.next();
            } else if c == '\n' {
                break;
            } else if c == quote {
                close = Some(i);
                break;
            }
        }

        match close {
            Some(end) => {
                self.emit(TokenKind::StringConstant, 1 + end + 1, Some(body[..end].to_string()));
            }
            None => {
                let word_len = body.find(|c: char| !is_word_char(c)).unwrap_or(body.len());
                self.emit(
                    TokenKind::StringConstant,
                    1 + word_len,
                    Some(body[..word_len].to_string()),
                );
            }
        }
        true
    }

    fn read_operation(&mut self) -> bool {
        let rest = self.rest();
        if let Some(op) = TWO_CHAR_OPERATIONS.iter().find(|op| rest.starts_with(**op)) {
            self.emit(TokenKind::Operation, op.len(), None);
            return true;
        }
        match rest.chars().next() {
            Some(c) if ONE_CHAR_OPERATIONS.contains(&c) => {
                self.emit(TokenKind::Operation, 1, None);
                true
            }
            _ => false,
        }
    }

    fn read_symbol(&mut self) -> bool {
        match self.peek() {
            Some(c) => {
                self.emit(TokenKind::Symbol, c.len_utf8(), None);
                true
            }
            None => false,
        }
    }
}
