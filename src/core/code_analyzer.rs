//! Light static analysis over the token stream: unused locals, parameters
//! and methods, and per-method cyclomatic complexity.

use crate::domain::model::{Line, Token, TokenKind};

/// Keywords counted as decision points, matching what Visual Studio reports
/// for simple methods.
const DECISION_KEYWORDS: &[&str] = &["if", "for", "while", "foreach"];

/// Methods called by the runtime rather than from source.
const ENTRY_POINTS: &[&str] = &["Main"];

/// A method found as `name ( args ) { body }`; positions index into the
/// significant token list.
#[derive(Debug, Clone)]
pub struct FunctionStructure<'t> {
    pub name: &'t Token,
    pub args_begin: usize,
    pub args_end: usize,
    pub body_begin: usize,
    pub body_end: usize,
}

/// Tokens without whitespace and comments.
pub fn code_tokens(lines: &[Line]) -> Vec<&Token> {
    lines
        .iter()
        .flat_map(|l| l.tokens.iter())
        .filter(|t| !matches!(t.kind, TokenKind::Space | TokenKind::Comment))
        .collect()
}

/// Index of the bracket closing the first `open` found from `start`.
fn find_pair(tokens: &[&Token], start: usize, open: &str, close: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(start) {
        if token.is(open) {
            depth += 1;
        } else if token.is(close) {
            if depth == 1 {
                return Some(i);
            }
            depth = depth.saturating_sub(1);
        }
    }
    None
}

/// Top-level methods; bodies are not searched for nested ones.
pub fn find_functions<'t>(tokens: &[&'t Token]) -> Vec<FunctionStructure<'t>> {
    let mut functions = Vec::new();
    let mut i = 1;
    while i < tokens.len() {
        if tokens[i].is("(") && tokens[i - 1].kind == TokenKind::Identifier {
            let body = find_pair(tokens, i, "(", ")").and_then(|close| {
                let opens_body = tokens.get(close + 1).is_some_and(|t| t.is("{"));
                opens_body
                    .then(|| find_pair(tokens, close + 1, "{", "}"))
                    .flatten()
                    .map(|end| (close, end))
            });
            if let Some((close, end)) = body {
                functions.push(FunctionStructure {
                    name: tokens[i - 1],
                    args_begin: i + 1,
                    args_end: close,
                    body_begin: close + 1,
                    body_end: end,
                });
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    functions
}

/// Parameter name tokens: the identifier before `=` or at the end of each
/// comma-separated segment. Commas inside `<>`, `()` and `[]` don't split.
fn parameters<'t>(tokens: &[&'t Token], function: &FunctionStructure<'t>) -> Vec<&'t Token> {
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut segment: Vec<&'t Token> = Vec::new();

    let mut flush = |segment: &mut Vec<&'t Token>| {
        let name = match segment.iter().position(|t| t.is("=")) {
            Some(eq) => eq.checked_sub(1).map(|i| segment[i]),
            None => segment.last().copied(),
        };
        // a lone token is a type or a call argument, not a declaration
        if segment.len() >= 2 {
            if let Some(name) = name.filter(|t| t.kind == TokenKind::Identifier) {
                params.push(name);
            }
        }
        segment.clear();
    };

    for &token in &tokens[function.args_begin..function.args_end] {
        match token.value.as_str() {
            "(" | "[" | "<" if token.kind != TokenKind::StringConstant => depth += 1,
            ")" | "]" | ">" if token.kind != TokenKind::StringConstant => {
                depth = depth.saturating_sub(1)
            }
            ">>" if token.kind == TokenKind::Operation => depth = depth.saturating_sub(2),
            "," if depth == 0 && token.kind == TokenKind::Symbol => {
                flush(&mut segment);
                continue;
            }
            _ => {}
        }
        segment.push(token);
    }
    flush(&mut segment);
    params
}

struct Declared<'t> {
    token: &'t Token,
    depth: usize,
    uses: usize,
}

/// `var` locals never read after their declaration, then parameters never
/// mentioned in their method body.
pub fn find_unused_vars<'t>(tokens: &[&'t Token]) -> Vec<&'t Token> {
    let mut unused = Vec::new();
    let mut live: Vec<Declared<'t>> = Vec::new();
    let mut depth = 0usize;
    let mut declaration_at = None;

    for (i, &token) in tokens.iter().enumerate() {
        if token.is("{") {
            depth += 1;
        } else if token.is("}") {
            let (closing, kept): (Vec<_>, Vec<_>) = live.into_iter().partition(|d| d.depth >= depth);
            unused.extend(closing.into_iter().filter(|d| d.uses == 0).map(|d| d.token));
            live = kept;
            depth = depth.saturating_sub(1);
        }

        if token.kind == TokenKind::Identifier && token.value == "var" {
            if let Some(&name) = tokens.get(i + 1).filter(|t| t.kind == TokenKind::Identifier) {
                live.push(Declared {
                    token: name,
                    depth,
                    uses: 0,
                });
                declaration_at = Some(i + 1);
            }
        } else if token.kind == TokenKind::Identifier && declaration_at != Some(i) {
            if let Some(declared) = live.iter_mut().rev().find(|d| d.token.value == token.value) {
                declared.uses += 1;
            }
        }
    }
    unused.extend(live.into_iter().filter(|d| d.uses == 0).map(|d| d.token));

    for function in find_functions(tokens) {
        let body = &tokens[function.body_begin..function.body_end];
        unused.extend(
            parameters(tokens, &function)
                .into_iter()
                .filter(|param| !body.iter().any(|t| t.is(&param.value))),
        );
    }
    unused
}

/// Methods whose name occurs nowhere else in the file.
pub fn find_unused_functions<'t>(tokens: &[&'t Token]) -> Vec<&'t Token> {
    find_functions(tokens)
        .into_iter()
        .map(|f| f.name)
        .filter(|name| !ENTRY_POINTS.contains(&name.value.as_str()))
        .filter(|name| tokens.iter().filter(|t| t.is(&name.value)).count() == 1)
        .collect()
}

pub fn find_unused_objects(lines: &[Line]) -> Vec<String> {
    let tokens = code_tokens(lines);
    let mut warnings: Vec<String> = find_unused_vars(&tokens)
        .into_iter()
        .map(|t| format!("Line {}: local variable '{}' value is not used", t.row, t.value))
        .collect();
    warnings.extend(
        find_unused_functions(&tokens)
            .into_iter()
            .map(|t| format!("Line {}: method '{}' is not used", t.row, t.value)),
    );
    warnings
}

pub fn complexity_by_function<'t>(tokens: &[&'t Token]) -> Vec<(&'t Token, usize)> {
    find_functions(tokens)
        .into_iter()
        .map(|f| {
            let decisions = tokens[f.body_begin..f.body_end]
                .iter()
                .filter(|t| {
                    t.kind == TokenKind::Keyword && DECISION_KEYWORDS.contains(&t.value.as_str())
                })
                .count();
            (f.name, 1 + decisions)
        })
        .collect()
}

pub fn cyclomatic_complexity(lines: &[Line]) -> Vec<String> {
    let tokens = code_tokens(lines);
    let by_function = complexity_by_function(&tokens);
    let total: usize = by_function.iter().map(|(_, cc)| cc).sum();

    let mut report = vec![format!("Cyclomatic complexity of the entire code: {}", total)];
    report.extend(by_function.into_iter().map(|(name, cc)| {
        format!("Function: '{}', cyclomatic complexity: {}", name.value, cc)
    }));
    report
}

pub fn analyze(lines: &[Line]) -> Vec<String> {
    let mut report = find_unused_objects(lines);
    report.extend(cyclomatic_complexity(lines));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokenizer::lines;

    const GEOMETRY: &str = r#"
namespace Geometry;


public static class Geometry
{
    public static double GetLength(Vector a)
    {
        return Math.Sqrt(a.X * a.X + a.Y * a.Y);
    }

    public static Vector Sub(Vector a, Vector b)
    {
        return new Vector() { X = a.X - b.X, Y = a.Y - b.Y };
    }

    public static bool IsVectorInSegment(Vector a, Segment segment)
    {
        var leftHalf = Sub(segment.Begin, a);
        return true;
    }
}"#;

    fn names(tokens: Vec<&Token>) -> Vec<String> {
        tokens.into_iter().map(|t| t.value.clone()).collect()
    }

    #[test]
    fn test_find_unused_vars() {
        let code = r#"
        var variable = some_function();
        Console.WriteLine(variable);
        var unused_variable;
        GetSomeVar(int a, int unused_arg)
        {
            return a;
        }
        "#;
        let parsed = lines(code);
        let tokens = code_tokens(&parsed);
        assert_eq!(names(find_unused_vars(&tokens)), vec!["unused_variable", "unused_arg"]);
    }

    #[test]
    fn test_use_in_nested_block_counts() {
        let code = "void F()\n{\n    var total = 0;\n    if (x)\n    {\n        Print(total);\n    }\n}";
        let parsed = lines(code);
        assert!(find_unused_vars(&code_tokens(&parsed)).is_empty());
    }

    #[test]
    fn test_generic_and_default_parameters() {
        let code = "int F(Dictionary<string, int> map, int limit = 5)\n{\n    return map.Count;\n}";
        let parsed = lines(code);
        assert_eq!(names(find_unused_vars(&code_tokens(&parsed))), vec!["limit"]);
    }

    #[test]
    fn test_find_function_names() {
        let parsed = lines(GEOMETRY);
        let tokens = code_tokens(&parsed);
        let found: Vec<&str> = find_functions(&tokens)
            .iter()
            .map(|f| f.name.value.as_str())
            .collect();
        assert_eq!(found, vec!["GetLength", "Sub", "IsVectorInSegment"]);
    }

    #[test]
    fn test_find_unused_functions() {
        let parsed = lines(GEOMETRY);
        let tokens = code_tokens(&parsed);
        assert_eq!(
            names(find_unused_functions(&tokens)),
            vec!["GetLength", "IsVectorInSegment"]
        );
    }

    #[test]
    fn test_find_unused_objects() {
        assert_eq!(
            find_unused_objects(&lines(GEOMETRY)),
            vec![
                "Line 19: local variable 'leftHalf' value is not used",
                "Line 7: method 'GetLength' is not used",
                "Line 17: method 'IsVectorInSegment' is not used",
            ]
        );
    }

    #[test]
    fn test_main_is_not_reported_unused() {
        let code = "class Program\n{\n    static void Main(string[] args)\n    {\n        Run(args);\n    }\n}";
        assert!(find_unused_functions(&code_tokens(&lines(code))).is_empty());
    }

    #[test]
    fn test_cyclomatic_complexity() {
        let code = r#"
class Program
{
    static void Main(string[] args)
    {
        if (args.Length == 2)
            return;
        foreach (var arg in args.Skip(2))
            Console.WriteLine(arg);
    }

    static int SecondFunction()
    {
        while (true) {
            if (ready) {
                Work();
            } else if (waiting) {
                Wait();
            } else return 0;
        }
        if (failed)
            return -1;
        return 0;
    }
}
"#;
        assert_eq!(
            cyclomatic_complexity(&lines(code)),
            vec![
                "Cyclomatic complexity of the entire code: 8",
                "Function: 'Main', cyclomatic complexity: 3",
                "Function: 'SecondFunction', cyclomatic complexity: 5",
            ]
        );
    }
}
