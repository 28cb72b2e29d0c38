//! Style rules.
//!
//! Every rule takes its configured value plus the tokenized source rows and
//! returns one `Line {n}: ...` message per finding. Boolean rules return no
//! findings when switched off.

use crate::domain::model::{Line, Token, TokenKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

/// Keywords whose statement may be written without braces.
const STATEMENT_KEYWORDS: &[&str] = &["if", "else", "for", "foreach", "while", "do", "lock"];

const BRACED_KEYWORDS: &[&str] = &[
    "if", "else", "for", "foreach", "while", "do", "switch", "try", "catch", "finally", "lock",
];

/// Lines holding these keywords open a block or a declaration and take no `;`.
const BLOCK_KEYWORDS: &[&str] = &[
    "if", "else", "for", "foreach", "while", "do", "switch", "try", "catch", "finally", "lock",
    "class", "static", "case", "default", "namespace", "struct", "interface", "enum",
];

/// Symbols allowed right after a keyword, e.g. `string[]` or `this.x`.
const TIGHT_AFTER_KEYWORD: &[&str] = &["[", "]", ";", ",", ".", ")", ":"];

/// Keywords used like functions: `typeof(T)`, `default(T)`, `new()`.
const CALL_LIKE_KEYWORDS: &[&str] = &[
    "typeof", "sizeof", "default", "checked", "unchecked", "this", "base", "new",
];

static CAMEL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*$").expect("camelCase pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    Spaces,
    Tab,
}

impl IndentStyle {
    fn unit(self) -> char {
        match self {
            IndentStyle::Spaces => ' ',
            IndentStyle::Tab => '\t',
        }
    }

    fn foreign(self) -> char {
        match self {
            IndentStyle::Spaces => '\t',
            IndentStyle::Tab => ' ',
        }
    }
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentStyle::Spaces => write!(f, "spaces"),
            IndentStyle::Tab => write!(f, "tab"),
        }
    }
}

fn has_keyword(line: &Line, keywords: &[&str]) -> bool {
    line.tokens
        .iter()
        .any(|t| t.kind == TokenKind::Keyword && keywords.contains(&t.value.as_str()))
}

/// Significant tokens of a row without comments.
fn code_tokens(line: &Line) -> Vec<&Token> {
    line.significant()
        .filter(|t| t.kind != TokenKind::Comment)
        .collect()
}

fn next_code_line<'l>(lines: &'l [Line], index: usize) -> Option<&'l Line> {
    lines[index + 1..]
        .iter()
        .find(|l| !code_tokens(l).is_empty())
}

pub fn max_line_length(max: usize, lines: &[Line]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            let count = line.char_len();
            (count > max).then(|| {
                format!(
                    "Line {}: the number of characters in the line has been exceeded ({} > {})",
                    line.number, count, max
                )
            })
        })
        .collect()
}

/// Checks the leading whitespace of every row against the brace depth.
///
/// One indentation level is `size` repetitions of the style's character. A
/// row gets one extra level when it is the body of a brace-less statement on
/// the previous row, and one extra level per enclosing `case`/`default` label.
pub fn indent_style_and_size(style: IndentStyle, size: usize, lines: &[Line]) -> Vec<String> {
    let mut res = Vec::new();
    let mut expected: usize = 0;
    let mut last_delta: isize = 0;
    let mut prev: Option<&Line> = None;
    let mut case_levels: Vec<usize> = Vec::new();

    for line in lines {
        if line.is_blank() || line.continuation {
            continue;
        }

        let opens = line.tokens.iter().filter(|t| t.is("{")).count() as isize;
        let closes = line.tokens.iter().filter(|t| t.is("}")).count() as isize;
        let delta = (opens - closes) * size as isize;

        let hanging = last_delta == 0
            && prev.is_some_and(|p| {
                has_keyword(p, STATEMENT_KEYWORDS)
                    && !p.contains("{")
                    && !line.contains("{")
                    && p.last_significant().map_or(true, |t| !t.is(";"))
            });

        if delta < 0 {
            expected = expected.saturating_sub(delta.unsigned_abs());
        }
        case_levels.retain(|&level| level <= expected);

        let is_label = line
            .first_significant()
            .is_some_and(|t| t.is("case") || t.is("default"))
            && line.last_significant().is_some_and(|t| t.is(":"));
        let labels_around = if is_label {
            case_levels.iter().filter(|&&level| level < expected).count()
        } else {
            case_levels.iter().filter(|&&level| level <= expected).count()
        };

        let indent = line.indent();
        if indent.contains(style.foreign()) {
            res.push(format!(
                "Line {}: the indentation type is incorrect. Must be {}",
                line.number, style
            ));
        } else {
            let count = indent.chars().filter(|&c| c == style.unit()).count();
            let required = expected + size * (labels_around + usize::from(hanging));
            if count != required {
                res.push(format!(
                    "Line {}: the number of indents ({}) per line is different (Yours {} > {} in code style)",
                    line.number, style, count, required
                ));
            }
        }

        if is_label && !case_levels.contains(&expected) {
            case_levels.push(expected);
        }
        if delta > 0 {
            expected += delta as usize;
        }
        last_delta = delta;
        prev = Some(line);
    }
    res
}

pub fn newline_before_return(required: usize, lines: &[Line]) -> Vec<String> {
    let mut res = Vec::new();
    let mut empty_lines = 0;
    let mut prev_last: Option<&Token> = None;

    for line in lines {
        if line.is_blank() {
            empty_lines += 1;
            continue;
        }
        let starts_with_return = line.first_significant().is_some_and(|t| t.is("return"));
        // a return opening a block, a case or a brace-less statement needs no gap
        let opens_scope = prev_last.is_some_and(|t| {
            t.is("{") || t.is(":") || t.is(")") || t.is("else")
        });
        if starts_with_return && !opens_scope && empty_lines < required {
            res.push(format!(
                "Line {}: there must be {} empty line before the return (was: {})",
                line.number, required, empty_lines
            ));
        }
        empty_lines = 0;
        prev_last = line.last_significant();
    }
    res
}

pub fn require_semicolons(enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    let mut res = Vec::new();
    let mut depth = 0usize;
    // brace depths of the enum bodies currently open
    let mut enum_bodies: Vec<usize> = Vec::new();
    let mut enum_pending = false;

    for (i, line) in lines.iter().enumerate() {
        let code = code_tokens(line);
        let in_enum = enum_bodies.last() == Some(&depth);
        if has_keyword(line, &["enum"]) {
            enum_pending = true;
        }
        for token in &code {
            if token.is("{") {
                depth += 1;
                if enum_pending {
                    enum_bodies.push(depth);
                    enum_pending = false;
                }
            } else if token.is("}") {
                if enum_bodies.last() == Some(&depth) {
                    enum_bodies.pop();
                }
                depth = depth.saturating_sub(1);
            }
        }
        if in_enum {
            continue;
        }
        let (Some(first), Some(last)) = (code.first(), code.last()) else {
            continue;
        };
        if has_keyword(line, BLOCK_KEYWORDS) || first.is("[") {
            continue;
        }
        let open_ended = ["{", "}", ",", "(", "[", ":", ";"].iter().any(|v| last.is(v))
            || last.kind == TokenKind::Operation
            || last.end_row() > line.number;
        if open_ended {
            continue;
        }
        let continued = next_code_line(lines, i)
            .and_then(|next| code_tokens(next).first().copied())
            .is_some_and(|t| t.is("{") || t.is(".") || t.kind == TokenKind::Operation);
        if continued {
            continue;
        }
        res.push(format!("Line {}: expected ;", line.number));
    }
    res
}

pub fn space_after_keywords(expected: bool, lines: &[Line]) -> Vec<String> {
    let mut res = Vec::new();
    for line in lines {
        let tokens = &line.tokens;
        for (j, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Keyword {
                continue;
            }
            let Some(next) = tokens.get(j + 1) else {
                continue;
            };
            let checked_symbol = |t: &Token| {
                t.kind == TokenKind::Symbol
                    && !TIGHT_AFTER_KEYWORD.contains(&t.value.as_str())
                    && !(t.value == "(" && CALL_LIKE_KEYWORDS.contains(&token.value.as_str()))
            };
            if expected {
                if checked_symbol(next) {
                    res.push(format!(
                        "Line {}: expected space after '{}'",
                        line.number, token.value
                    ));
                }
            } else if next.is_space()
                && !next.is_newline()
                && tokens.get(j + 2).is_some_and(|t| checked_symbol(t))
            {
                res.push(format!(
                    "Line {}: don't expected space after '{}'",
                    line.number, token.value
                ));
            }
        }
    }
    res
}

pub fn camel_case(enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    lines
        .iter()
        .flat_map(|line| {
            line.tokens
                .iter()
                .filter(|t| t.kind == TokenKind::Identifier && !CAMEL_CASE.is_match(&t.value))
                .map(move |t| format!("Line {}: expected camelCase in '{}'", line.number, t.value))
        })
        .collect()
}

pub fn always_use_braces(enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    let mut res = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if !has_keyword(line, BRACED_KEYWORDS) || line.contains("{") {
            continue;
        }
        // `} while (...);` closes a do-while
        if line.first_significant().is_some_and(|t| t.is("}")) {
            continue;
        }
        if next_code_line(lines, i).is_some_and(|next| next.contains("{")) {
            continue;
        }
        res.push(format!("Line {}: expected '{{'", line.number));
    }
    res
}

pub fn newline_after_open_brace(enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    let mut res = Vec::new();
    for line in lines {
        if !line.contains("{") || line.contains("}") {
            continue;
        }
        let code = code_tokens(line);
        let Some(pos) = code.iter().position(|t| t.is("{")) else {
            continue;
        };
        if pos > 0 {
            res.push(format!("Line {}: expected newline before '{{'", line.number));
        }
        if pos + 1 < code.len() {
            res.push(format!("Line {}: expected newline after '{{'", line.number));
        }
    }
    res
}

pub fn newline_before_close_brace(enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    lines
        .iter()
        .filter(|line| line.contains("}") && !line.contains("{"))
        .filter(|line| {
            code_tokens(line)
                .iter()
                .position(|t| t.is("}"))
                .is_some_and(|pos| pos > 0)
        })
        .map(|line| format!("Line {}: expected newline before '}}'", line.number))
        .collect()
}

fn space_after(symbol: &str, enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    let mut res = Vec::new();
    for line in lines {
        for pair in line.tokens.windows(2) {
            if pair[0].is(symbol) && !pair[1].is_space() {
                res.push(format!("Line {}: expected space after '{}'", line.number, symbol));
            }
        }
    }
    res
}

fn space_before(symbol: &str, enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    let mut res = Vec::new();
    for line in lines {
        for pair in line.tokens.windows(2) {
            if pair[1].is(symbol) && !pair[0].is_space() {
                res.push(format!("Line {}: expected space before '{}'", line.number, symbol));
            }
        }
    }
    res
}

pub fn space_after_comma(enabled: bool, lines: &[Line]) -> Vec<String> {
    space_after(",", enabled, lines)
}

pub fn space_before_comma(enabled: bool, lines: &[Line]) -> Vec<String> {
    space_before(",", enabled, lines)
}

pub fn space_after_colon(enabled: bool, lines: &[Line]) -> Vec<String> {
    space_after(":", enabled, lines)
}

pub fn space_before_colon(enabled: bool, lines: &[Line]) -> Vec<String> {
    space_before(":", enabled, lines)
}

fn is_word(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Identifier | TokenKind::Keyword)
}

/// Index of the token closing a generic argument list opened at `open`.
/// Nested lists may end together in a single `>>`.
fn generic_close(tokens: &[Token], open: usize) -> Option<usize> {
    let before = open.checked_sub(1).and_then(|i| tokens.get(i))?;
    let after = tokens.get(open + 1)?;
    if !is_word(before) || !is_word(after) {
        return None;
    }
    let mut depth = 1usize;
    for (i, token) in tokens.iter().enumerate().skip(open + 1) {
        if token.is("<") {
            depth += 1;
        } else if token.is(">") {
            depth -= 1;
        } else if token.is(">>") {
            depth = depth.checked_sub(2)?;
        } else if !(is_word(token)
            || token.is_space()
            || [",", ".", "[", "]", "?"].iter().any(|v| token.is(v)))
        {
            return None;
        }
        if depth == 0 {
            return Some(i);
        }
    }
    None
}

pub fn space_around_operators(enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    let mut res = Vec::new();
    for line in lines {
        let tokens = &line.tokens;
        let mut generic_parts = HashSet::new();
        let mut prev_significant: Option<&Token> = None;

        for (j, token) in tokens.iter().enumerate() {
            let prev = prev_significant;
            if !token.is_space() {
                prev_significant = Some(token);
            }
            if token.kind != TokenKind::Operation {
                continue;
            }
            if generic_parts.contains(&j) || token.value == "++" || token.value == "--" {
                continue;
            }
            if token.value == "<" {
                if let Some(close) = generic_close(tokens, j) {
                    generic_parts.extend(
                        (j + 1..=close).filter(|&k| matches!(tokens[k].value.as_str(), "<" | ">" | ">>")),
                    );
                    continue;
                }
            }
            let unary = matches!(token.value.as_str(), "-" | "+" | "~")
                && prev.map_or(true, |p| {
                    matches!(p.kind, TokenKind::Operation | TokenKind::Keyword)
                        || ["(", "[", ",", ":", ";", "{"].iter().any(|v| p.is(v))
                });
            if unary {
                continue;
            }
            let left_ok = j == 0 || tokens[j - 1].is_space();
            // `int?` and `a?.b`
            if token.value == "?" && !left_ok {
                continue;
            }
            let right_ok = tokens.get(j + 1).map_or(true, Token::is_space);
            if !left_ok || !right_ok {
                res.push(format!(
                    "Line {}: expected spaces around '{}'",
                    line.number, token.value
                ));
            }
        }
    }
    res
}

/// `true` reports whitespace left before a line break.
pub fn allow_trailing_whitespace(enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    lines
        .iter()
        .filter(|line| {
            let mut rest = line.tokens.iter().rev();
            match rest.next() {
                Some(last) if last.is_newline() => {
                    rest.next().is_some_and(|t| t.is_space() && !t.is_newline())
                }
                Some(last) => last.is_space(),
                None => false,
            }
        })
        .map(|line| {
            format!(
                "Line {}: don't expected spaces in the end of line",
                line.number
            )
        })
        .collect()
}

pub fn trim_whitespace(enabled: bool, lines: &[Line]) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    let mut res = Vec::new();
    for line in lines {
        let tokens = &line.tokens;
        for (j, token) in tokens.iter().enumerate().skip(1) {
            if !token.is_space() || token.is_newline() || token.value.chars().count() == 1 {
                continue;
            }
            let trailing = tokens.get(j + 1).map_or(true, Token::is_newline);
            if !trailing {
                res.push(format!(
                    "Line {}: expected ' '. Actual: '{}'",
                    line.number, token.value
                ));
            }
        }
    }
    res
}
