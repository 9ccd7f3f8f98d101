use crate::expression::lexer::{Token, TokenKind, lex};
use crate::layout::bbox::BoundingBoxes;

/// Nesting limit for `max(...)`, parentheses and unary signs; deeper input evaluates as 0.
const MAX_DEPTH: usize = 256;

/// Resolve a comma-separated offset/dimension expression into integers.
///
/// Each term may use `+ - * / %`, parentheses, `max(a,b,...)` and `[<pos>.<field>]` references
/// into `boxes`. Evaluation never fails: unknown tokens read as 0, a missing reference reads as 0,
/// and a division or modulo by zero leaves the running value untouched.
pub fn resolve(expr: &str, boxes: &BoundingBoxes) -> Vec<i32> {
    if expr.trim().is_empty() {
        return Vec::new();
    }
    let substituted = substitute_refs(expr, boxes);
    let expanded = expand_max(&substituted, 0);
    split_top_level(&expanded)
        .into_iter()
        .map(|term| round_to_i32(eval_term(term)))
        .collect()
}

/// Component `idx` of a resolved list, 0 when absent.
pub fn component(values: &[i32], idx: usize) -> i32 {
    values.get(idx).copied().unwrap_or(0)
}

fn round_to_i32(v: f64) -> i32 {
    if v.is_finite() { v.round() as i32 } else { 0 }
}

fn substitute_refs(expr: &str, boxes: &BoundingBoxes) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut rest = expr;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            // Unterminated reference: the remainder is junk.
            out.push('0');
            rest = "";
            break;
        };
        out.push_str(&format_value(lookup_ref(&after[..close], boxes)));
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn lookup_ref(inner: &str, boxes: &BoundingBoxes) -> i64 {
    let Some((pos, field)) = inner.trim().split_once('.') else {
        return 0;
    };
    let Ok(pos) = pos.trim().parse::<i64>() else {
        return 0;
    };
    boxes
        .get(pos)
        .map(|b| i64::from(b.field(field.trim())))
        .unwrap_or(0)
}

fn format_value(v: i64) -> String {
    if v < 0 { format!("({v})") } else { v.to_string() }
}

fn expand_max(s: &str, depth: usize) -> String {
    if depth > MAX_DEPTH {
        return "0".to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(at) = find_max_call(rest) {
        out.push_str(&rest[..at]);
        let args_start = at + "max(".len();
        let (inner, next) = match matching_paren(&rest[args_start..]) {
            Some(close) => (
                &rest[args_start..args_start + close],
                &rest[args_start + close + 1..],
            ),
            None => (&rest[args_start..], ""),
        };
        let inner = expand_max(inner, depth + 1);
        let value = split_top_level(&inner)
            .into_iter()
            .map(eval_term)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .unwrap_or(0.0);
        out.push_str(&format_value(round_to_i32(value).into()));
        rest = next;
    }
    out.push_str(rest);
    out
}

fn find_max_call(s: &str) -> Option<usize> {
    s.as_bytes()
        .windows(4)
        .position(|w| w.eq_ignore_ascii_case(b"max("))
}

/// Byte offset of the `)` closing an already-open paren.
fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth <= 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn eval_term(term: &str) -> f64 {
    let mut ev = Evaluator {
        tokens: lex(term),
        pos: 0,
        depth: 0,
    };
    ev.sum()
}

struct Evaluator {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Evaluator {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    fn bump(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn sum(&mut self) -> f64 {
        let mut acc = self.product();
        loop {
            match self.peek() {
                TokenKind::Plus => {
                    self.bump();
                    acc += self.product();
                }
                TokenKind::Minus => {
                    self.bump();
                    acc -= self.product();
                }
                _ => return acc,
            }
        }
    }

    fn product(&mut self) -> f64 {
        let mut acc = self.unary();
        loop {
            match self.peek() {
                TokenKind::Star => {
                    self.bump();
                    acc *= self.unary();
                }
                TokenKind::Slash => {
                    self.bump();
                    let rhs = self.unary();
                    if rhs != 0.0 {
                        acc /= rhs;
                    }
                }
                TokenKind::Percent => {
                    self.bump();
                    // Modulo works on integers, like the config language it serves.
                    let rhs = self.unary().trunc() as i64;
                    if let Some(rem) = (acc.trunc() as i64).checked_rem(rhs) {
                        acc = rem as f64;
                    }
                }
                _ => return acc,
            }
        }
    }

    fn unary(&mut self) -> f64 {
        if self.depth >= MAX_DEPTH {
            // Give up on the rest of the term.
            self.pos = self.tokens.len() - 1;
            return 0.0;
        }
        self.depth += 1;
        let v = match self.peek() {
            TokenKind::Minus => {
                self.bump();
                -self.unary()
            }
            TokenKind::Plus => {
                self.bump();
                self.unary()
            }
            _ => self.primary(),
        };
        self.depth -= 1;
        v
    }

    fn primary(&mut self) -> f64 {
        match *self.peek() {
            TokenKind::Number(v) => {
                self.bump();
                v
            }
            TokenKind::Junk => {
                self.bump();
                0.0
            }
            TokenKind::LParen => {
                self.bump();
                let v = self.sum();
                if *self.peek() == TokenKind::RParen {
                    self.bump();
                }
                v
            }
            // Stray operator or closing paren: treat the operand as 0 and leave the token.
            _ => 0.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/offset.rs"]
mod tests;
