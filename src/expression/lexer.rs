#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),

    LParen,
    RParen,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    /// Anything the grammar does not know; evaluates as 0.
    Junk,

    Eof,
}

/// Tokenize one arithmetic term. Never fails: unknown input becomes [`TokenKind::Junk`].
pub(crate) fn lex(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let offset = |j: usize| chars.get(j).map(|(o, _)| *o).unwrap_or(input.len());
    let mut j = 0usize;

    while j < chars.len() {
        let c = chars[j].1;
        if c.is_whitespace() {
            j += 1;
            continue;
        }

        let start = offset(j);

        // Number: [0-9]+(.[0-9]*)? or .[0-9]+
        let next_is_digit = chars.get(j + 1).is_some_and(|(_, n)| n.is_ascii_digit());
        if c.is_ascii_digit() || (c == '.' && next_is_digit) {
            while j < chars.len() && chars[j].1.is_ascii_digit() {
                j += 1;
            }
            if j < chars.len() && chars[j].1 == '.' {
                j += 1;
                while j < chars.len() && chars[j].1.is_ascii_digit() {
                    j += 1;
                }
            }
            let end = offset(j);
            let s = input[start..end].trim_end_matches('.');
            let kind = s
                .parse::<f64>()
                .map(TokenKind::Number)
                .unwrap_or(TokenKind::Junk);
            out.push(Token {
                kind,
                span: Span { start, end },
            });
            continue;
        }

        let kind = match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '%' => Some(TokenKind::Percent),
            _ => None,
        };
        if let Some(kind) = kind {
            j += 1;
            out.push(Token {
                kind,
                span: Span {
                    start,
                    end: offset(j),
                },
            });
            continue;
        }

        // Junk run: everything up to the next operator, paren, digit or space.
        while j < chars.len() {
            let ch = chars[j].1;
            if ch.is_whitespace() || ch.is_ascii_digit() || "()+-*/%".contains(ch) {
                break;
            }
            j += 1;
        }
        out.push(Token {
            kind: TokenKind::Junk,
            span: Span {
                start,
                end: offset(j),
            },
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });

    out
}
