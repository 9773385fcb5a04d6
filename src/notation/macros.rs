//! Aggregate macros
//!
//! Each macro replicates its argument once per axis and joins the copies.
//! The join rule is data on the variant, so the expansion loop never
//! branches on the macro name.

use super::lexer::{Spanned, Token};

/// How the per-axis copies of a macro argument are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// `((E_0) op (E_1) op ...)`
    Infix(char),
    /// `Name(E_0, E_1, ...)`
    Call(&'static str),
}

/// The closed set of aggregate macros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    Sum,
    Product,
    Max,
    Min,
}

impl MacroKind {
    pub const ALL: [MacroKind; 4] = [
        MacroKind::Sum,
        MacroKind::Product,
        MacroKind::Max,
        MacroKind::Min,
    ];

    /// Look up a macro by the name used in notation
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(MacroKind::Sum),
            "prod" | "product" => Some(MacroKind::Product),
            "max" => Some(MacroKind::Max),
            "min" => Some(MacroKind::Min),
            _ => None,
        }
    }

    /// Canonical notation name
    pub fn name(self) -> &'static str {
        match self {
            MacroKind::Sum => "sum",
            MacroKind::Product => "prod",
            MacroKind::Max => "max",
            MacroKind::Min => "min",
        }
    }

    pub fn combine(self) -> Combine {
        match self {
            MacroKind::Sum => Combine::Infix('+'),
            MacroKind::Product => Combine::Infix('*'),
            MacroKind::Max => Combine::Call("Max"),
            MacroKind::Min => Combine::Call("Min"),
        }
    }

    /// Join per-axis copies into the replacement token run
    ///
    /// `offset` is the position of the macro call in the notation; the
    /// synthesized brackets and separators are attributed to it.
    pub fn join(self, terms: Vec<Vec<Spanned>>, offset: usize) -> Vec<Spanned> {
        let tok = |token: Token| Spanned::new(token, offset);
        let mut out = Vec::new();

        match self.combine() {
            Combine::Infix(op) => {
                out.push(tok(Token::Punct('(')));
                for (i, term) in terms.into_iter().enumerate() {
                    if i > 0 {
                        out.push(tok(Token::Space(" ".into())));
                        out.push(tok(Token::Punct(op)));
                        out.push(tok(Token::Space(" ".into())));
                    }
                    out.push(tok(Token::Punct('(')));
                    out.extend(term);
                    out.push(tok(Token::Punct(')')));
                }
                out.push(tok(Token::Punct(')')));
            }
            Combine::Call(function) => {
                out.push(tok(Token::Ident(function.to_string())));
                out.push(tok(Token::Punct('(')));
                for (i, term) in terms.into_iter().enumerate() {
                    if i > 0 {
                        out.push(tok(Token::Punct(',')));
                        out.push(tok(Token::Space(" ".into())));
                    }
                    out.extend(term);
                }
                out.push(tok(Token::Punct(')')));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Vec<Spanned> {
        vec![Spanned::new(Token::Ident(name.into()), 0)]
    }

    fn text(tokens: &[Spanned]) -> String {
        tokens
            .iter()
            .map(|s| match &s.token {
                Token::Ident(v) | Token::Number(v) | Token::Space(v) => v.clone(),
                Token::Punct(c) => c.to_string(),
                other => format!("{:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_names_round_trip() {
        for kind in MacroKind::ALL {
            assert_eq!(MacroKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(MacroKind::from_name("product"), Some(MacroKind::Product));
        assert_eq!(MacroKind::from_name("Max"), None);
    }

    #[test]
    fn test_infix_join_parenthesizes_each_copy() {
        let out = MacroKind::Product.join(vec![ident("a"), ident("b")], 0);
        assert_eq!(text(&out), "((a) * (b))");
    }

    #[test]
    fn test_call_join() {
        let out = MacroKind::Min.join(vec![ident("a"), ident("b"), ident("c")], 0);
        assert_eq!(text(&out), "Min(a, b, c)");
    }
}
