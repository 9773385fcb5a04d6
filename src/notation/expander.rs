//! Template Expander
//!
//! Expands dimension-agnostic notation into an explicit algebraic expression
//! for a given number of axes.
//!
//! ## Pipeline
//!
//! ```text
//! "sum(Dim^2/a^2) = 1", 2D, {a: 3}
//!     ↓ 1. resolve Dim[i]          (explicit axes are fixed first)
//!     ↓ 2. expand sum/prod/max/min (innermost first)
//!     ↓ 3. substitute parameters   (whole tokens only)
//!     ↓ 4. render                  (axis names, |E| → Abs(E))
//! "((x^2/3^2) + (y^2/3^2)) = 1"
//! ```
//!
//! Every call works on its own token vector; the expander holds nothing but
//! the axis table, so it is safe to share between threads.
//!
//! Macro arguments may contain parentheses, e.g. `sum((Dim+1)^2)`. The
//! argument extent is found by bracket matching; a call whose parentheses
//! never close is rejected rather than guessed at.

use tracing::debug;

use super::lexer::{tokenize, Spanned, Token};
use super::macros::MacroKind;
use super::params::{format_value, Params};
use crate::axes::AxisTable;
use crate::error::ExpandError;
use crate::identities::IdentityLibrary;

/// Expands notation strings against an axis table
#[derive(Debug, Clone, Default)]
pub struct TemplateExpander {
    axes: AxisTable,
}

/// A located macro call: `name ( ... )`
struct MacroCall {
    kind: MacroKind,
    head: usize,
    open: usize,
    close: usize,
}

impl TemplateExpander {
    /// Expander over the default `x, y, z, w, ...` table
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axes(axes: AxisTable) -> Self {
        Self { axes }
    }

    pub fn axes(&self) -> &AxisTable {
        &self.axes
    }

    /// Expand a notation string for `dimension` axes
    ///
    /// # Examples
    ///
    /// ```
    /// use dimexpand::{Params, TemplateExpander};
    ///
    /// let expander = TemplateExpander::new();
    /// let out = expander.expand("max(|Dim|) = 1", 3, &Params::new()).unwrap();
    /// assert_eq!(out, "Max(Abs(x), Abs(y), Abs(z)) = 1");
    /// ```
    pub fn expand(
        &self,
        notation: &str,
        dimension: usize,
        params: &Params,
    ) -> Result<String, ExpandError> {
        let axes = self.axes.coords(dimension)?;
        params.validate()?;

        let mut tokens = tokenize(notation);

        // 1. Dim[i] → axis i
        resolve_indexed(&mut tokens, dimension)?;

        // 2. Aggregate macros
        let (tokens, macro_count) = expand_macros(tokens, dimension)?;

        // 3. Parameters
        let tokens = substitute_params(tokens, params);

        // 4. Render
        let expanded = render(&tokens, axes)?;

        debug!(
            "Expanded {:?} for {}D ({} macro calls) -> {:?}",
            notation, dimension, macro_count, expanded
        );

        Ok(expanded)
    }

    /// Expand a named identity from `library`
    ///
    /// Identity defaults are merged with `overrides`; overrides win.
    pub fn expand_identity(
        &self,
        library: &IdentityLibrary,
        name: &str,
        dimension: usize,
        overrides: &Params,
    ) -> Result<String, ExpandError> {
        let identity = library
            .get(name)
            .ok_or_else(|| ExpandError::UnknownIdentity(name.to_string()))?;

        if dimension < identity.min_dim {
            return Err(ExpandError::DimensionTooLow {
                name: name.to_string(),
                required: identity.min_dim,
                got: dimension,
            });
        }

        let params = identity.merged_params(overrides);
        self.expand(&identity.notation, dimension, &params)
    }
}

/// Replace every `Dim[i]` with a resolved axis
fn resolve_indexed(tokens: &mut [Spanned], dimension: usize) -> Result<(), ExpandError> {
    for spanned in tokens.iter_mut() {
        if let Token::IndexedDim(index) = spanned.token {
            if index >= dimension {
                return Err(ExpandError::IndexOutOfRange { index, dimension });
            }
            spanned.token = Token::Axis(index);
        }
    }
    Ok(())
}

/// Expand macro calls until none remain
///
/// The rightmost call head can never sit inside another call's argument
/// list, so expanding it first is innermost-first order. Each iteration
/// removes exactly one call, and the copies it produces contain none.
fn expand_macros(
    mut tokens: Vec<Spanned>,
    dimension: usize,
) -> Result<(Vec<Spanned>, usize), ExpandError> {
    let mut count = 0;

    while let Some(call) = find_innermost_call(&tokens)? {
        let argument = &tokens[call.open + 1..call.close];
        let terms = (0..dimension)
            .map(|axis| bind_dim(argument, axis))
            .collect();
        let replacement = call.kind.join(terms, tokens[call.head].offset);

        tokens.splice(call.head..=call.close, replacement);
        count += 1;
    }

    Ok((tokens, count))
}

fn find_innermost_call(tokens: &[Spanned]) -> Result<Option<MacroCall>, ExpandError> {
    let head = tokens.iter().enumerate().rev().find_map(|(i, spanned)| {
        let Token::Ident(name) = &spanned.token else {
            return None;
        };
        let kind = MacroKind::from_name(name)?;
        let open = next_significant(tokens, i + 1)?;
        (tokens[open].token == Token::Punct('(')).then_some((i, kind, open))
    });

    let Some((head, kind, open)) = head else {
        return Ok(None);
    };

    let malformed = || ExpandError::MalformedMacroCall {
        name: kind.name().to_string(),
        position: tokens[head].offset,
    };

    let close = matching_close(tokens, open).ok_or_else(malformed)?;
    if tokens[open + 1..close].iter().all(|t| t.token.is_space()) {
        return Err(malformed());
    }

    Ok(Some(MacroCall {
        kind,
        head,
        open,
        close,
    }))
}

fn next_significant(tokens: &[Spanned], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !tokens[i].token.is_space())
}

fn matching_close(tokens: &[Spanned], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, spanned) in tokens.iter().enumerate().skip(open) {
        match spanned.token {
            Token::Punct('(') => depth += 1,
            Token::Punct(')') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Copy a macro argument with every bare `Dim` bound to `axis`
fn bind_dim(argument: &[Spanned], axis: usize) -> Vec<Spanned> {
    argument
        .iter()
        .map(|spanned| match spanned.token {
            Token::Dim => Spanned::new(Token::Axis(axis), spanned.offset),
            _ => spanned.clone(),
        })
        .collect()
}

/// Replace parameter identifiers with their values
///
/// An identifier glued to the operand before it (`4r`, `2a`) is not a whole
/// word and stays as written.
fn substitute_params(tokens: Vec<Spanned>, params: &Params) -> Vec<Spanned> {
    if params.is_empty() {
        return tokens;
    }

    let mut glued = false;
    tokens
        .into_iter()
        .map(|spanned| {
            let after_operand = glued;
            glued = matches!(
                spanned.token,
                Token::Ident(_) | Token::Number(_) | Token::Axis(_)
            );

            match &spanned.token {
                Token::Ident(name) if !after_operand => match params.get(name) {
                    Some(value) => {
                        Spanned::new(Token::Number(format_value(value)), spanned.offset)
                    }
                    None => spanned,
                },
                _ => spanned,
            }
        })
        .collect()
}

/// What the last significant token was, for deciding what a `|` means
#[derive(Clone, Copy, PartialEq)]
enum Last {
    Nothing,
    Operand,
    Operator,
    OpenBar,
}

/// Write tokens out as text
///
/// A `|` opens an absolute value unless it directly follows an operand, in
/// which case it closes the innermost open one.
fn render(tokens: &[Spanned], axes: &[String]) -> Result<String, ExpandError> {
    let mut out = String::new();
    let mut open_bars: Vec<usize> = Vec::new();
    let mut last = Last::Nothing;

    for spanned in tokens {
        match &spanned.token {
            Token::Space(s) => {
                out.push_str(s);
                continue;
            }
            Token::Dim => {
                return Err(ExpandError::StrayDim {
                    position: spanned.offset,
                })
            }
            Token::IndexedDim(index) => {
                // Resolved in pass 1; only reachable if a caller skips it
                return Err(ExpandError::IndexOutOfRange {
                    index: *index,
                    dimension: axes.len(),
                });
            }
            Token::Axis(index) => {
                out.push_str(&axes[*index]);
                last = Last::Operand;
            }
            Token::Ident(s) | Token::Number(s) => {
                out.push_str(s);
                last = Last::Operand;
            }
            Token::Punct('|') => {
                if last == Last::Operand {
                    if open_bars.pop().is_none() {
                        return Err(ExpandError::UnbalancedAbs {
                            position: spanned.offset,
                        });
                    }
                    out.push(')');
                    // A closed bar is itself an operand
                } else {
                    open_bars.push(spanned.offset);
                    out.push_str("Abs(");
                    last = Last::OpenBar;
                }
            }
            Token::Punct(c) => {
                out.push(*c);
                last = if *c == ')' {
                    Last::Operand
                } else {
                    Last::Operator
                };
            }
        }
    }

    if let Some(position) = open_bars.pop() {
        return Err(ExpandError::UnbalancedAbs { position });
    }

    Ok(out)
}
