//! Selector text parsing.
//!
//! Supports the subset of selector syntax the engine can match:
//! - Type selectors: `Button`
//! - Class selectors: `.primary`
//! - Name selectors: `#ok`
//! - Universal selector: `*`
//! - Pseudo-classes: `:hover`, `:enabled`
//! - Descendant (whitespace) and child (`>`) combinators
//! - Selector lists separated by `,`

use std::iter::Peekable;
use std::str::CharIndices;

use super::{StyleSelector, StyleSelectorPart, StyleSelectorRelationship};
use crate::error::StyleSheetError;

const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit()
}

struct Parser<'s> {
    text: &'s str,
    chars: Peekable<CharIndices<'s>>,
}

impl<'s> Parser<'s> {
    fn error(&self, position: usize, reason: &str) -> StyleSheetError {
        StyleSheetError::InvalidSelector {
            selector: self.text.to_string(),
            position,
            reason: reason.to_string(),
        }
    }

    fn ident(&mut self, after: usize) -> Result<&'s str, StyleSheetError> {
        let start = match self.chars.peek() {
            Some(&(i, c)) if is_ident_start_char(c) => i,
            Some(&(i, _)) => return Err(self.error(i, "expected an identifier")),
            None => return Err(self.error(after, "expected an identifier")),
        };
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            end = i + c.len_utf8();
            let _ = self.chars.next();
        }
        Ok(&self.text[start..end])
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            let _ = self.chars.next();
            skipped = true;
        }
        skipped
    }

    /// Parse one complex selector, stopping at `,` or end of input.
    fn complex(&mut self) -> Result<Vec<StyleSelector>, StyleSheetError> {
        let mut selectors = Vec::new();
        let mut parts = Vec::new();
        let mut pending: Option<StyleSelectorRelationship> = None;
        let _ = self.skip_whitespace();

        while let Some(&(pos, c)) = self.chars.peek() {
            match c {
                ',' => break,
                c if c.is_whitespace() => {
                    let _ = self.skip_whitespace();
                    if !parts.is_empty() {
                        let relationship = relationship_for(&selectors, &mut pending);
                        selectors.push(StyleSelector::new(std::mem::take(&mut parts), relationship));
                        pending = Some(StyleSelectorRelationship::Descendant);
                    }
                }
                '>' => {
                    let _ = self.chars.next();
                    if !parts.is_empty() {
                        let relationship = relationship_for(&selectors, &mut pending);
                        selectors.push(StyleSelector::new(std::mem::take(&mut parts), relationship));
                    }
                    if selectors.is_empty() {
                        return Err(self.error(pos, "combinator without a left-hand selector"));
                    }
                    pending = Some(StyleSelectorRelationship::Child);
                }
                '*' => {
                    let _ = self.chars.next();
                    parts.push(StyleSelectorPart::Wildcard);
                }
                '.' => {
                    let _ = self.chars.next();
                    parts.push(StyleSelectorPart::Class(self.ident(pos + 1)?.to_string()));
                }
                '#' => {
                    let _ = self.chars.next();
                    parts.push(StyleSelectorPart::Id(self.ident(pos + 1)?.to_string()));
                }
                ':' => {
                    let _ = self.chars.next();
                    parts.push(StyleSelectorPart::PseudoClass(self.ident(pos + 1)?.to_string()));
                }
                c if is_ident_start_char(c) => {
                    if !parts.is_empty() {
                        return Err(self.error(pos, "type selector must come first"));
                    }
                    parts.push(StyleSelectorPart::Type(self.ident(pos)?.to_string()));
                }
                _ => return Err(self.error(pos, &format!("unexpected character '{c}'"))),
            }
        }

        if parts.is_empty() {
            let at = self.chars.peek().map_or(self.text.len(), |&(i, _)| i);
            if pending == Some(StyleSelectorRelationship::Child) {
                return Err(self.error(at, "combinator without a right-hand selector"));
            }
            if selectors.is_empty() {
                return Err(self.error(at, "empty selector"));
            }
        } else {
            let relationship = relationship_for(&selectors, &mut pending);
            selectors.push(StyleSelector::new(parts, relationship));
        }
        Ok(selectors)
    }
}

fn relationship_for(
    selectors: &[StyleSelector],
    pending: &mut Option<StyleSelectorRelationship>,
) -> StyleSelectorRelationship {
    let pending = pending.take();
    if selectors.is_empty() {
        StyleSelectorRelationship::None
    } else {
        pending.unwrap_or(StyleSelectorRelationship::Descendant)
    }
}

/// Parse a comma-separated selector list into complex selectors, each a list
/// of compounds from left to right.
///
/// # Errors
///
/// Returns [`StyleSheetError::InvalidSelector`] with the byte position of the
/// first problem.
pub fn parse_selector_list(text: &str) -> Result<Vec<Vec<StyleSelector>>, StyleSheetError> {
    let mut parser = Parser {
        text,
        chars: text.char_indices().peekable(),
    };
    let mut list = vec![parser.complex()?];
    while let Some(&(_, ',')) = parser.chars.peek() {
        let _ = parser.chars.next();
        list.push(parser.complex()?);
    }
    Ok(list)
}
