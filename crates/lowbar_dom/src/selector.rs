// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The CSS selector subset understood by [`MemoryDocument`][crate::MemoryDocument].
//!
//! Supported: type (`div`), id (`#menu`), class (`.open`) and universal (`*`) selectors,
//! compounds of these (`div#menu.open`) and the descendant combinator (whitespace).

use crate::{Error, Result};

/// A parsed selector: compounds separated by descendant combinators, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selector {
    compounds: Vec<Compound>,
}

/// Conditions that must all hold for a single element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    /// Lowercase tag name. `None` matches any tag.
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
}

/// The properties of an element that selectors test.
pub(crate) trait Matchable {
    fn tag(&self) -> &str;
    fn dom_id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self> {
        let compounds = selector
            .split_ascii_whitespace()
            .map(|part| Compound::parse(selector, part))
            .collect::<Result<Vec<_>>>()?;

        if compounds.is_empty() {
            return Err(Error::invalid_selector(selector, "selector is empty"));
        }

        Ok(Self { compounds })
    }

    /// Tests an element given its chain of ancestors, nearest first.
    pub fn matches<'a, M, I>(&self, element: &M, ancestors: I) -> bool
    where
        M: Matchable + 'a,
        I: IntoIterator<Item = &'a M>,
    {
        let Some((subject, outer)) = self.compounds.split_last() else {
            return false;
        };

        if !subject.matches(element) {
            return false;
        }

        // With only descendant combinators, matching each compound against the nearest
        // qualifying ancestor never misses a match.
        let mut remaining = outer.iter().rev().peekable();
        for ancestor in ancestors {
            let Some(compound) = remaining.peek() else {
                break;
            };

            if compound.matches(ancestor) {
                remaining.next();
            }
        }

        remaining.peek().is_none()
    }
}

impl Compound {
    fn parse(selector: &str, part: &str) -> Result<Self> {
        let mut compound = Self::default();
        let mut rest = part;

        if let Some(after) = rest.strip_prefix('*') {
            rest = after;
        } else {
            let (tag, after) = split_ident(rest);
            if !tag.is_empty() {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
            rest = after;
        }

        while let Some(prefix) = rest.chars().next() {
            let (name, after) = split_ident(&rest[prefix.len_utf8()..]);

            match prefix {
                '#' | '.' if name.is_empty() => {
                    return Err(Error::invalid_selector(selector, format!("expected a name after '{prefix}'")));
                }
                '#' => compound.ids.push(name.to_string()),
                '.' => compound.classes.push(name.to_string()),
                other => {
                    return Err(Error::invalid_selector(selector, format!("unsupported character '{other}'")));
                }
            }

            rest = after;
        }

        Ok(compound)
    }

    fn matches<M: Matchable>(&self, element: &M) -> bool {
        self.tag.as_deref().is_none_or(|tag| element.tag().eq_ignore_ascii_case(tag))
            && self.ids.iter().all(|id| element.dom_id() == Some(id.as_str()))
            && self.classes.iter().all(|class| element.has_class(class))
    }
}

/// Splits a leading identifier off `input`.
fn split_ident(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(input.len());

    input.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake {
        tag: &'static str,
        id: Option<&'static str>,
        classes: &'static [&'static str],
    }

    impl Matchable for Fake {
        fn tag(&self) -> &str {
            self.tag
        }

        fn dom_id(&self) -> Option<&str> {
            self.id
        }

        fn has_class(&self, class: &str) -> bool {
            self.classes.contains(&class)
        }
    }

    const MENU: Fake = Fake {
        tag: "div",
        id: Some("menu"),
        classes: &["open", "dark"],
    };

    const ITEM: Fake = Fake {
        tag: "li",
        id: None,
        classes: &["item"],
    };

    fn matches(selector: &str, element: &Fake, ancestors: &[&Fake]) -> bool {
        Selector::parse(selector).unwrap().matches(element, ancestors.iter().copied())
    }

    #[test]
    fn parse_compound() {
        let selector = Selector::parse("DIV#menu.open.dark").unwrap();

        assert_eq!(
            selector.compounds,
            [Compound {
                tag: Some("div".to_string()),
                ids: vec!["menu".to_string()],
                classes: vec!["open".to_string(), "dark".to_string()],
            }]
        );
    }

    #[test]
    fn parse_descendants_ignores_extra_whitespace() {
        let selector = Selector::parse("  ul \t .item  ").unwrap();

        assert_eq!(selector.compounds.len(), 2);
    }

    #[test]
    fn parse_rejects_unsupported_syntax() {
        for bad in ["", "   ", "div > p", "a[href]", "li:hover", "#", ".", "a,b", "div+p"] {
            let error = Selector::parse(bad).unwrap_err();
            assert!(error.is_invalid_selector(), "{bad:?} should be rejected");
            assert_eq!(error.selector(), Some(bad));
        }
    }

    #[test]
    fn simple_selectors() {
        assert!(matches("div", &MENU, &[]));
        assert!(matches("#menu", &MENU, &[]));
        assert!(matches(".dark", &MENU, &[]));
        assert!(matches("*", &MENU, &[]));
        assert!(matches("div#menu.open", &MENU, &[]));

        assert!(!matches("span", &MENU, &[]));
        assert!(!matches("#other", &MENU, &[]));
        assert!(!matches(".item", &MENU, &[]));
        assert!(!matches("div.open.closed", &MENU, &[]));
    }

    #[test]
    fn descendant_combinator() {
        assert!(matches("#menu .item", &ITEM, &[&MENU]));
        assert!(matches("div li", &ITEM, &[&ITEM, &MENU]));
        assert!(matches("* li", &ITEM, &[&MENU]));

        assert!(!matches("#menu .item", &ITEM, &[]));
        assert!(!matches("ul #menu", &MENU, &[&ITEM]));
        assert!(!matches("div div li", &ITEM, &[&MENU]));
    }
}
