//! Plan parser
//!
//! Extracts an ordered list of task invocations from the model's free-form
//! plan text. Tolerant of surrounding prose, strict about invocation syntax.
//!
//! Accepted step shape, one per line, with optional leading enumeration:
//!
//! ```text
//! 1. task_name(param="literal", other=$R1) -> R2
//! ```
//!
//! Literals are quoted strings or bare tokens; `$identifier` references an
//! earlier step's declared output; ` -> identifier` declares this step's
//! output. A line that opens like an invocation but fails strict parsing
//! becomes a malformed entry for the verifier to reject.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::step::{ArgValue, Plan, PlanStep, StepEntry};

/// A line starting (after optional `1.` / `1)` / `-` enumeration) with an
/// identifier followed by an opening parenthesis is an invocation candidate.
static STEP_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+[.)]\s*|[-*]\s+)?([A-Za-z_][A-Za-z0-9_-]*)\s*\(").expect("step head regex")
});

/// Parse raw model output into a plan
///
/// Total: always returns a Plan, possibly empty or partially malformed, so
/// the verifier can report specific, attributable errors per step.
pub fn parse_plan(raw: &str) -> Plan {
    let mut steps = Vec::new();

    for line in raw.lines() {
        let Some(caps) = STEP_HEAD.captures(line) else {
            continue;
        };
        let head_end = caps.get(0).map_or(0, |m| m.end());
        let task_name = caps[1].to_string();
        let index = steps.len();

        match parse_invocation_tail(&line[head_end..]) {
            Ok((arguments, produces)) => {
                steps.push(StepEntry::Step(PlanStep {
                    index,
                    task_name,
                    arguments,
                    produces,
                }));
            }
            Err(detail) => {
                debug!(index, line = line.trim(), %detail, "malformed step");
                steps.push(StepEntry::Malformed {
                    index,
                    raw: line.trim().to_string(),
                    detail,
                });
            }
        }
    }

    debug!(step_count = steps.len(), "parsed plan");
    Plan {
        steps,
        raw: raw.to_string(),
    }
}

/// Parse everything after the opening parenthesis: the argument list, the
/// closing parenthesis, and an optional ` -> identifier` output declaration.
fn parse_invocation_tail(tail: &str) -> Result<(BTreeMap<String, ArgValue>, Option<String>), String> {
    let mut cursor = Cursor::new(tail);
    let mut arguments = BTreeMap::new();

    cursor.skip_whitespace();
    if !cursor.eat(')') {
        loop {
            cursor.skip_whitespace();
            let name = cursor.take_identifier().ok_or_else(|| "expected argument name".to_string())?;

            cursor.skip_whitespace();
            if !cursor.eat('=') {
                return Err(format!("expected '=' after argument '{name}'"));
            }

            cursor.skip_whitespace();
            let value = parse_value(&mut cursor)?;

            if arguments.insert(name.clone(), value).is_some() {
                return Err(format!("duplicate argument '{name}'"));
            }

            cursor.skip_whitespace();
            if cursor.eat(',') {
                continue;
            }
            if cursor.eat(')') {
                break;
            }
            return Err("expected ',' or ')' in argument list".to_string());
        }
    }

    cursor.skip_whitespace();
    let produces = if cursor.eat_str("->") {
        cursor.skip_whitespace();
        let id = cursor
            .take_identifier()
            .ok_or_else(|| "expected output identifier after '->'".to_string())?;
        Some(id)
    } else {
        None
    };

    cursor.skip_whitespace();
    cursor.eat('.');
    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(format!("unexpected trailing text: '{}'", cursor.rest()));
    }

    Ok((arguments, produces))
}

fn parse_value(cursor: &mut Cursor) -> Result<ArgValue, String> {
    if let Some(quote) = cursor.peek().filter(|c| *c == '"' || *c == '\'') {
        cursor.bump();
        let literal = cursor
            .take_until(quote)
            .ok_or_else(|| "unterminated quoted literal".to_string())?;
        return Ok(ArgValue::Literal(literal));
    }

    if cursor.eat('$') {
        let id = cursor
            .take_identifier()
            .ok_or_else(|| "expected identifier after '$'".to_string())?;
        return Ok(ArgValue::Reference(id));
    }

    let token = cursor.take_bare_token();
    if token.is_empty() {
        return Err("expected argument value".to_string());
    }
    Ok(ArgValue::Literal(token))
}

/// Character cursor over an invocation tail
struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.s.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_identifier(&mut self) -> Option<String> {
        let start = self.pos;
        if !self.peek().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') {
            return None;
        }
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => self.bump(),
                // Interior hyphens only, matching the task-name lexical
                // class; a trailing '-' belongs to '->' or prose
                Some('-') => {
                    let mut ahead = self.rest().chars().skip(1);
                    if ahead.next().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
                        self.bump();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Some(self.s[start..self.pos].to_string())
    }

    /// Consume up to (and including) the terminator; None when unterminated
    fn take_until(&mut self, terminator: char) -> Option<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == terminator {
                let literal = self.s[start..self.pos].to_string();
                self.bump();
                return Some(literal);
            }
            self.bump();
        }
        None
    }

    fn take_bare_token(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| !c.is_whitespace() && c != ',' && c != ')') {
            self.bump();
        }
        self.s[start..self.pos].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_step() {
        let plan = parse_plan("1. search(query=\"cats\") -> R1");

        assert_eq!(plan.step_count(), 1);
        let step = plan.steps().next().unwrap();
        assert_eq!(step.index, 0);
        assert_eq!(step.task_name, "search");
        assert_eq!(
            step.arguments.get("query"),
            Some(&ArgValue::Literal("cats".to_string()))
        );
        assert_eq!(step.produces.as_deref(), Some("R1"));
    }

    #[test]
    fn test_parse_reference_argument() {
        let plan = parse_plan(
            "1. search(query=\"cat pictures\") -> R1\n\
             2. summarize(text=$R1) -> R2",
        );

        assert_eq!(plan.step_count(), 2);
        let steps: Vec<&PlanStep> = plan.steps().collect();
        assert_eq!(
            steps[1].arguments.get("text"),
            Some(&ArgValue::Reference("R1".to_string()))
        );
        assert_eq!(steps[1].produces.as_deref(), Some("R2"));
    }

    #[test]
    fn test_parse_ignores_surrounding_prose() {
        let raw = "Here is the plan I came up with:\n\
                   \n\
                   1. search(query=\"rust parsers\") -> R1\n\
                   \n\
                   That single step should answer the question.";

        let plan = parse_plan(raw);
        assert_eq!(plan.step_count(), 1);
        assert_eq!(plan.raw, raw);
    }

    #[test]
    fn test_parse_bare_and_quoted_values() {
        let plan = parse_plan("fetch(url='https://example.com', limit=10, dry_run=true)");

        let step = plan.steps().next().unwrap();
        assert_eq!(
            step.arguments.get("url"),
            Some(&ArgValue::Literal("https://example.com".to_string()))
        );
        assert_eq!(step.arguments.get("limit"), Some(&ArgValue::Literal("10".to_string())));
        assert_eq!(
            step.arguments.get("dry_run"),
            Some(&ArgValue::Literal("true".to_string()))
        );
        assert!(step.produces.is_none());
    }

    #[test]
    fn test_parse_no_arguments() {
        let plan = parse_plan("- snapshot() -> S1");
        let step = plan.steps().next().unwrap();
        assert!(step.arguments.is_empty());
        assert_eq!(step.produces.as_deref(), Some("S1"));
    }

    #[test]
    fn test_malformed_step_is_kept() {
        let plan = parse_plan(
            "1. search(query=\"cats\" -> R1\n\
             2. summarize(text=$R1) -> R2",
        );

        assert_eq!(plan.step_count(), 2);
        match &plan.steps[0] {
            StepEntry::Malformed { index, detail, .. } => {
                assert_eq!(*index, 0);
                assert!(!detail.is_empty());
            }
            StepEntry::Step(_) => panic!("expected malformed entry"),
        }
        // The following well-formed step still parses at the next index
        assert_eq!(plan.steps[1].index(), 1);
        assert!(plan.steps[1].as_step().is_some());
    }

    #[test]
    fn test_quoted_literal_may_contain_syntax() {
        let plan = parse_plan("search(query=\"cats, dogs (and birds) -> pets\")");
        let step = plan.steps().next().unwrap();
        assert_eq!(
            step.arguments.get("query"),
            Some(&ArgValue::Literal("cats, dogs (and birds) -> pets".to_string()))
        );
    }

    #[test]
    fn test_duplicate_argument_is_malformed() {
        let plan = parse_plan("search(query=\"a\", query=\"b\")");
        match &plan.steps[0] {
            StepEntry::Malformed { detail, .. } => assert!(detail.contains("duplicate")),
            StepEntry::Step(_) => panic!("expected malformed entry"),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_plan() {
        let plan = parse_plan("");
        assert!(plan.is_empty());

        let plan = parse_plan("No steps here, just prose about search engines.");
        assert!(plan.is_empty());
    }

    #[test]
    fn test_hyphenated_identifiers() {
        // Task names, argument names, references, and outputs share one
        // lexical class, hyphens included.
        let plan = parse_plan(
            "1. fetch-data(source-url=\"https://example.com\") -> raw-doc\n\
             2. summarize(text=$raw-doc) -> final-answer",
        );

        assert_eq!(plan.step_count(), 2);
        let steps: Vec<&PlanStep> = plan.steps().collect();
        assert_eq!(steps[0].task_name, "fetch-data");
        assert!(steps[0].arguments.contains_key("source-url"));
        assert_eq!(steps[0].produces.as_deref(), Some("raw-doc"));
        assert_eq!(
            steps[1].arguments.get("text"),
            Some(&ArgValue::Reference("raw-doc".to_string()))
        );
        assert_eq!(steps[1].produces.as_deref(), Some("final-answer"));
    }

    #[test]
    fn test_trailing_period_allowed() {
        let plan = parse_plan("1. search(query=\"cats\") -> R1.");
        assert!(plan.steps[0].as_step().is_some());
    }
}
