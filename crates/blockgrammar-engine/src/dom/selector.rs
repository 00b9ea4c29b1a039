//! A CSS selector subset for attribute sources and raw transforms.
//!
//! Supported: type and universal selectors, `#id`, `.class`, attribute
//! selectors (`[a]`, `[a=v]`, `~=`, `^=`, `$=`, `*=`, `|=`), compound
//! selectors, descendant (` `) and child (`>`) combinators, and
//! comma-separated lists.
//!
//! ```
//! use blockgrammar_engine::dom::{Dom, selector::Selector};
//!
//! let dom = Dom::parse(r#"<figure><img src="x.png"></figure>"#);
//! let img = Selector::parse("figure > img[src$='.png']").unwrap();
//! assert!(dom.select_first(dom.root(), &img).is_some());
//! ```

use std::str::FromStr;

use blockgrammar_syntax::cursor::Cursor;

use crate::dom::{Dom, NodeId};
use crate::error::BlockError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
    DashMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
    value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    /// `None` for `*` or an omitted type.
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    list: Vec<Complex>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, BlockError> {
        let mut cur = Cursor::new(source);
        let mut list = Vec::new();
        loop {
            cur.skip_whitespace();
            list.push(parse_complex(&mut cur).map_err(|reason| invalid(source, reason))?);
            cur.skip_whitespace();
            if cur.eof() {
                break;
            }
            if !cur.eat(b',') {
                return Err(invalid(source, format!("unexpected input at byte {}", cur.pos())));
            }
        }
        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether element `id` matches any selector of the list.
    pub fn matches(&self, dom: &Dom, id: NodeId) -> bool {
        dom.is_element(id)
            && self
                .list
                .iter()
                .any(|c| matches_complex(dom, id, c, c.compounds.len() - 1))
    }
}

impl FromStr for Selector {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl Dom {
    /// The first descendant of `context` matching `selector`, in document
    /// order.
    pub fn select_first(&self, context: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(context)
            .into_iter()
            .find(|&id| selector.matches(self, id))
    }

    /// Every descendant of `context` matching `selector`, in document order.
    pub fn select_all(&self, context: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(context)
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect()
    }
}

fn invalid(source: &str, reason: impl Into<String>) -> BlockError {
    BlockError::InvalidSelector {
        selector: source.to_string(),
        reason: reason.into(),
    }
}

fn parse_complex(cur: &mut Cursor<'_>) -> Result<Complex, String> {
    let mut compounds = vec![parse_compound(cur)?];
    let mut combinators = Vec::new();

    loop {
        let had_space = cur.skip_whitespace() > 0;
        let combinator = if cur.eat(b'>') {
            cur.skip_whitespace();
            Combinator::Child
        } else if had_space && !cur.eof() && cur.peek() != Some(b',') {
            Combinator::Descendant
        } else {
            break;
        };
        combinators.push(combinator);
        compounds.push(parse_compound(cur)?);
    }

    Ok(Complex {
        compounds,
        combinators,
    })
}

fn parse_compound(cur: &mut Cursor<'_>) -> Result<Compound, String> {
    let start = cur.pos();
    let mut compound = Compound::default();

    if !cur.eat(b'*') {
        let tag = read_ident(cur);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    loop {
        match cur.peek() {
            Some(b'#') => {
                cur.bump();
                compound.ids.push(required_ident(cur, "id")?);
            }
            Some(b'.') => {
                cur.bump();
                compound.classes.push(required_ident(cur, "class")?);
            }
            Some(b'[') => {
                cur.bump();
                compound.attrs.push(parse_attr(cur)?);
            }
            _ => break,
        }
    }

    if cur.pos() == start {
        return Err(format!("expected a selector at byte {start}"));
    }
    Ok(compound)
}

fn parse_attr(cur: &mut Cursor<'_>) -> Result<AttrSelector, String> {
    cur.skip_whitespace();
    let name = required_ident(cur, "attribute name")?.to_ascii_lowercase();
    cur.skip_whitespace();

    let op = if cur.eat(b']') {
        return Ok(AttrSelector {
            name,
            op: AttrOp::Exists,
            value: String::new(),
        });
    } else if cur.eat(b'=') {
        AttrOp::Equals
    } else {
        let op = match cur.bump() {
            Some(b'~') => AttrOp::Includes,
            Some(b'^') => AttrOp::Prefix,
            Some(b'$') => AttrOp::Suffix,
            Some(b'*') => AttrOp::Substring,
            Some(b'|') => AttrOp::DashMatch,
            _ => return Err(format!("bad attribute operator at byte {}", cur.pos())),
        };
        if !cur.eat(b'=') {
            return Err(format!("expected `=` at byte {}", cur.pos()));
        }
        op
    };

    cur.skip_whitespace();
    let value = match cur.peek() {
        Some(q @ (b'"' | b'\'')) => {
            cur.bump();
            let value = cur.take_while(|b| b != q).to_string();
            if !cur.eat(q) {
                return Err("unterminated attribute value".to_string());
            }
            value
        }
        _ => required_ident(cur, "attribute value")?,
    };
    cur.skip_whitespace();
    if !cur.eat(b']') {
        return Err(format!("expected `]` at byte {}", cur.pos()));
    }

    Ok(AttrSelector { name, op, value })
}

fn read_ident<'a>(cur: &mut Cursor<'a>) -> &'a str {
    cur.take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_') || b >= 0x80)
}

fn required_ident(cur: &mut Cursor<'_>, what: &str) -> Result<String, String> {
    let ident = read_ident(cur);
    if ident.is_empty() {
        return Err(format!("expected {what} at byte {}", cur.pos()));
    }
    Ok(ident.to_string())
}

fn matches_complex(dom: &Dom, id: NodeId, complex: &Complex, index: usize) -> bool {
    if !matches_compound(dom, id, &complex.compounds[index]) {
        return false;
    }
    if index == 0 {
        return true;
    }

    match complex.combinators[index - 1] {
        Combinator::Child => dom
            .parent(id)
            .is_some_and(|p| dom.is_element(p) && matches_complex(dom, p, complex, index - 1)),
        Combinator::Descendant => {
            let mut ancestor = dom.parent(id);
            while let Some(a) = ancestor {
                if dom.is_element(a) && matches_complex(dom, a, complex, index - 1) {
                    return true;
                }
                ancestor = dom.parent(a);
            }
            false
        }
    }
}

fn matches_compound(dom: &Dom, id: NodeId, compound: &Compound) -> bool {
    let Some(tag) = dom.tag(id) else {
        return false;
    };
    if compound.tag.as_deref().is_some_and(|t| t != tag) {
        return false;
    }
    if !compound.ids.iter().all(|i| dom.attr(id, "id") == Some(i.as_str())) {
        return false;
    }
    let classes = dom.attr(id, "class").unwrap_or_default();
    if !compound
        .classes
        .iter()
        .all(|c| classes.split_ascii_whitespace().any(|have| have == c))
    {
        return false;
    }
    compound.attrs.iter().all(|a| matches_attr(dom.attr(id, &a.name), a))
}

fn matches_attr(actual: Option<&str>, selector: &AttrSelector) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let expected = selector.value.as_str();
    match selector.op {
        AttrOp::Exists => true,
        AttrOp::Equals => actual == expected,
        AttrOp::Includes => actual.split_ascii_whitespace().any(|w| w == expected),
        AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
        AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
        AttrOp::Substring => !expected.is_empty() && actual.contains(expected),
        AttrOp::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const HTML: &str = r#"<div id="main" class="wrap wide"><figure><img src="a.png" alt="first"></figure><p lang="en-GB" data-x="1"><img src="b.jpg"></p></div><img src="c.gif">"#;

    fn srcs(selector: &str) -> Vec<String> {
        let dom = Dom::parse(HTML);
        let selector = Selector::parse(selector).unwrap();
        dom.select_all(dom.root(), &selector)
            .into_iter()
            .map(|id| dom.attr(id, "src").unwrap_or("-").to_string())
            .collect()
    }

    #[rstest]
    #[case("img", &["a.png", "b.jpg", "c.gif"])]
    #[case("figure img", &["a.png"])]
    #[case("div img", &["a.png", "b.jpg"])]
    #[case("div > img", &[])]
    #[case("p > img", &["b.jpg"])]
    #[case("#main img", &["a.png", "b.jpg"])]
    #[case(".wrap.wide p img", &["b.jpg"])]
    #[case(".wrap.narrow img", &[])]
    #[case("img[alt]", &["a.png"])]
    #[case("img[src$='.gif'], figure > img", &["a.png", "c.gif"])]
    #[case("img[src^=b]", &["b.jpg"])]
    #[case("img[src*=\".\"]", &["a.png", "b.jpg", "c.gif"])]
    #[case("[lang|=en] img", &["b.jpg"])]
    #[case("[class~=wide] figure *", &["a.png"])]
    #[case("IMG[ALT=first]", &["a.png"])]
    fn selects(#[case] selector: &str, #[case] expected: &[&str]) {
        assert_eq!(srcs(selector), expected);
    }

    #[rstest]
    #[case("")]
    #[case("img >")]
    #[case("img[")]
    #[case("img[src^]")]
    #[case("img[src='x]")]
    #[case("a,,b")]
    #[case(".")]
    #[case("a:hover")]
    fn rejects_invalid(#[case] selector: &str) {
        assert!(matches!(
            Selector::parse(selector),
            Err(BlockError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn context_itself_is_not_matched() {
        let dom = Dom::parse("<div><div>x</div></div>");
        let outer = dom.children(dom.root())[0];
        let inner = dom.children(outer)[0];
        let selector = Selector::parse("div").unwrap();
        assert_eq!(dom.select_first(outer, &selector), Some(inner));
        assert_eq!(dom.select_first(dom.root(), &selector), Some(outer));
    }
}
