//! Structural problems that are errors rather than style: unterminated
//! strings and comments, and brackets without a partner.

use crate::domain::model::{Line, Token, TokenKind};
use serde::{Deserialize, Serialize};

/// Bracket counts above this make `Auto` fall back to the stack method.
pub const EXACT_BRACKET_LIMIT: usize = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum BracketStrategy {
    /// Minimum set of brackets to delete for a balanced sequence, O(n³).
    Exact,
    /// Each bracket kind checked on its own with a stack, O(n).
    Stack,
    #[default]
    Auto,
}

const PAIRS: [(&str, &str); 3] = [("(", ")"), ("[", "]"), ("{", "}")];

fn is_bracket(token: &Token) -> bool {
    token.kind == TokenKind::Symbol && PAIRS.iter().any(|(o, c)| token.value == *o || token.value == *c)
}

fn opener_of(close: &str) -> Option<&'static str> {
    PAIRS.iter().find(|(_, c)| *c == close).map(|(o, _)| *o)
}

fn unterminated_string(token: &Token) -> bool {
    let mut chars = token.lexeme.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) => open != close,
        _ => true,
    }
}

fn unterminated_comment(token: &Token) -> bool {
    token.lexeme.starts_with("/*") && (token.lexeme.len() < 4 || !token.lexeme.ends_with("*/"))
}

pub fn check(lines: &[Line], strategy: BracketStrategy) -> Vec<String> {
    let tokens: Vec<&Token> = lines.iter().flat_map(|l| l.tokens.iter()).collect();

    let mut errors: Vec<String> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::StringConstant && unterminated_string(t))
        .map(|t| format!("Line {}: the string does not have a closing quotation mark", t.row))
        .collect();

    errors.extend(
        tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Comment && unterminated_comment(t))
            .map(|t| format!("Line {}: the multiline comment has no closing characters", t.row)),
    );

    let brackets: Vec<&Token> = tokens.into_iter().filter(|t| is_bracket(t)).collect();
    let mut unpaired = match strategy {
        BracketStrategy::Exact => unpaired_brackets_exact(&brackets),
        BracketStrategy::Stack => unpaired_brackets_stack(&brackets),
        BracketStrategy::Auto if brackets.len() <= EXACT_BRACKET_LIMIT => {
            unpaired_brackets_exact(&brackets)
        }
        BracketStrategy::Auto => {
            tracing::warn!(
                "{} brackets exceed {}, pairing them per kind instead",
                brackets.len(),
                EXACT_BRACKET_LIMIT
            );
            unpaired_brackets_stack(&brackets)
        }
    };
    unpaired.sort_by_key(|t| (t.row, t.column));

    errors.extend(unpaired.into_iter().map(|t| {
        format!(
            "Line {}, column {}: it looks like this bracket doesn't have a pair",
            t.row, t.column
        )
    }));
    errors
}

/// Interval DP over the bracket sequence.
///
/// `cost[l][r]` is the fewest deletions that balance `brackets[l..=r]`. The
/// last bracket is either deleted, or paired with a matching opener `i`
/// splitting the interval into `l..i` and `i+1..r`. `split[l][r]` keeps the
/// chosen opener so the deleted brackets can be collected afterwards.
pub fn unpaired_brackets_exact<'t>(brackets: &[&'t Token]) -> Vec<&'t Token> {
    let n = brackets.len();
    if n == 0 {
        return Vec::new();
    }
    let mut cost = vec![vec![0u32; n]; n];
    let mut split: Vec<Vec<Option<u32>>> = vec![vec![None; n]; n];

    let at = |cost: &Vec<Vec<u32>>, l: usize, r: isize| -> u32 {
        if r < l as isize {
            0
        } else {
            cost[l][r as usize]
        }
    };

    for r in 0..n {
        let opener = opener_of(&brackets[r].value);
        for l in (0..=r).rev() {
            let mut best = 1 + at(&cost, l, r as isize - 1);
            let mut choice = None;
            if let Some(opener) = opener {
                for i in l..r {
                    if brackets[i].value != opener {
                        continue;
                    }
                    let inner = if i + 1 < r { cost[i + 1][r - 1] } else { 0 };
                    let candidate = at(&cost, l, i as isize - 1) + inner;
                    if candidate < best {
                        best = candidate;
                        choice = Some(i as u32);
                    }
                }
            }
            cost[l][r] = best;
            split[l][r] = choice;
        }
    }

    let mut unpaired = Vec::with_capacity(cost[0][n - 1] as usize);
    let mut pending = vec![(0usize, n - 1)];
    while let Some((l, r)) = pending.pop() {
        match split[l][r] {
            None => {
                unpaired.push(brackets[r]);
                if r > l {
                    pending.push((l, r - 1));
                }
            }
            Some(i) => {
                let i = i as usize;
                if i > l {
                    pending.push((l, i - 1));
                }
                if i + 1 < r {
                    pending.push((i + 1, r - 1));
                }
            }
        }
    }
    unpaired
}

/// Each bracket kind is checked independently, so `({)}` passes.
pub fn unpaired_brackets_stack<'t>(brackets: &[&'t Token]) -> Vec<&'t Token> {
    let mut unpaired = Vec::new();
    for (open, close) in PAIRS {
        let mut stack = Vec::new();
        for bracket in brackets.iter().copied() {
            if bracket.value == open {
                stack.push(bracket);
            } else if bracket.value == close && stack.pop().is_none() {
                unpaired.push(bracket);
            }
        }
        unpaired.extend(stack);
    }
    unpaired
}
