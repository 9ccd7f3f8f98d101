use crate::text::run::{RunStyle, Segment, SplitKind, SplitRendering, SplitRule, scale};

/// Decompose `text` into styled segments by applying each split rule in order.
///
/// `base` is already at scale `sf`; rule sizes and spacings are scaled here.
pub fn split_string(text: &str, base: &RunStyle, split: &SplitRendering, sf: f32) -> Vec<Segment> {
    let mut result = vec![Segment {
        text: text.to_string(),
        style: base.clone(),
    }];

    for rule in &split.rules {
        let rule = scaled_rule(rule, sf);
        let next = match &rule.kind {
            SplitKind::HighlightWord(word) if !word.is_empty() => highlight(&result, word, &rule),
            SplitKind::CharRange(ranges) if !ranges.is_empty() => {
                char_ranges(&result, ranges, &rule)
            }
            _ => continue,
        };
        if !next.is_empty() {
            result = next;
        }
    }
    result
}

fn scaled_rule(rule: &SplitRule, sf: f32) -> SplitRule {
    SplitRule {
        size: rule.size.map(|s| s * sf),
        x_space_before: scale(rule.x_space_before, sf),
        x_space_after: scale(rule.x_space_after, sf),
        y_space_before: scale(rule.y_space_before, sf),
        y_space_after: scale(rule.y_space_after, sf),
        ..rule.clone()
    }
}

fn highlight(parts: &[Segment], word: &str, rule: &SplitRule) -> Vec<Segment> {
    let mut out = Vec::new();
    for part in parts {
        let pieces: Vec<&str> = part.text.split(word).collect();
        let last = pieces.len().saturating_sub(1);
        for (i, piece) in pieces.iter().enumerate() {
            if !piece.is_empty() {
                out.push(Segment {
                    text: (*piece).to_string(),
                    style: part.style.clone(),
                });
            }
            if i < last {
                out.push(Segment {
                    text: word.to_string(),
                    style: rule.style_over(&part.style),
                });
            }
        }
    }
    out
}

fn in_ranges(code: u32, ranges: &[(u32, u32)]) -> bool {
    ranges
        .iter()
        .any(|&(lo, hi)| code >= lo && (hi == 0 || code <= hi))
}

/// Tab, newline, carriage return and space never switch the current classification.
fn is_neutral(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | ' ')
}

fn char_ranges(parts: &[Segment], ranges: &[(u32, u32)], rule: &SplitRule) -> Vec<Segment> {
    let mut out = Vec::new();
    for part in parts {
        let mut state: Option<bool> = None;
        let mut bank = String::new();

        let flush = |bank: &mut String, in_range: bool, out: &mut Vec<Segment>| {
            if bank.is_empty() {
                return;
            }
            let style = if in_range {
                rule.style_over(&part.style)
            } else {
                part.style.clone()
            };
            out.push(Segment {
                text: std::mem::take(bank),
                style,
            });
        };

        for c in part.text.chars() {
            let in_range = in_ranges(u32::from(c), ranges);
            let current = *state.get_or_insert(in_range);
            if in_range != current && !is_neutral(c) {
                flush(&mut bank, current, &mut out);
                state = Some(in_range);
            }
            bank.push(c);
        }
        if let Some(current) = state {
            flush(&mut bank, current, &mut out);
        }
    }
    out
}

/// Parse a `charRange` value such as `"48-57, 0x41-0x5A, 1024-0"` into inclusive ranges.
///
/// A single number is a one-character range. Hex values with a `0x` prefix are accepted.
pub fn parse_char_ranges(value: &str) -> Vec<(u32, u32)> {
    value
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| {
            let mut bounds = r.splitn(2, '-').map(parse_code);
            let lo = bounds.next().unwrap_or(0);
            let hi = bounds.next().unwrap_or(lo);
            (lo, hi)
        })
        .collect()
}

fn parse_code(s: &str) -> u32 {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).unwrap_or(0),
        None => {
            let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/split.rs"]
mod tests;
