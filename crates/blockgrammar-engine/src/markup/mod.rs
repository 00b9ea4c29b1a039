//! # Markup
//!
//! The output of a block type's `save` function: a small tree of primitive
//! elements, text and raw HTML that renders to a string.
//!
//! ```
//! use blockgrammar_engine::markup::{Element, Markup};
//!
//! let markup: Markup = Element::new("p")
//!     .attr("class", "lead")
//!     .child(Markup::raw("Hello <em>there</em>"))
//!     .into();
//! assert_eq!(markup.render(""), r#"<p class="lead">Hello <em>there</em></p>"#);
//! ```

mod render;

pub use render::is_void_element;

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    /// `true` renders the bare attribute name, `false` omits it.
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, AttrValue)>,
    pub children: Vec<Markup>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Markup {
    Element(Element),
    /// Text, escaped on render.
    Text(String),
    /// Trusted HTML, emitted verbatim.
    RawHtml(String),
    Fragment(Vec<Markup>),
    /// Where the serialized inner blocks go.
    InnerBlocks,
    #[default]
    Empty,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name.into(), AttrValue::String(value.into()));
        self
    }

    /// Set the attribute only when there is a value.
    pub fn attr_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn bool_attr(mut self, name: impl Into<String>, present: bool) -> Self {
        self.set_attr(name.into(), AttrValue::Bool(present));
        self
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Markup>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find_map(|(n, v)| match v {
            AttrValue::String(s) if n == name => Some(s.as_str()),
            _ => None,
        })
    }

    fn set_attr(&mut self, name: String, value: AttrValue) {
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Merge class names into the `class` attribute, keeping the first
    /// occurrence of each and dropping empty names.
    pub fn merge_classes<'a>(&mut self, leading: &[&'a str], trailing: &[&'a str]) {
        let existing = self.get_attr("class").unwrap_or_default().to_string();
        let mut classes: Vec<&str> = Vec::new();
        for class in leading
            .iter()
            .copied()
            .chain(existing.split_whitespace())
            .chain(trailing.iter().flat_map(|c| c.split_whitespace()))
        {
            if !class.is_empty() && !classes.contains(&class) {
                classes.push(class);
            }
        }
        if !classes.is_empty() {
            self.set_attr("class".to_string(), AttrValue::String(classes.join(" ")));
        }
    }
}

impl Markup {
    pub fn text(text: impl Into<String>) -> Self {
        Markup::Text(text.into())
    }

    pub fn raw(html: impl Into<String>) -> Self {
        Markup::RawHtml(html.into())
    }

    pub fn fragment(children: impl IntoIterator<Item = Markup>) -> Self {
        Markup::Fragment(children.into_iter().collect())
    }

    /// The root element, when the markup is a single element.
    pub fn root_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Markup::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Markup::Empty => true,
            Markup::Text(s) | Markup::RawHtml(s) => s.is_empty(),
            Markup::Fragment(children) => children.iter().all(Markup::is_empty),
            Markup::Element(_) | Markup::InnerBlocks => false,
        }
    }

    /// Render to HTML, substituting `inner_blocks` at the placeholder.
    pub fn render(&self, inner_blocks: &str) -> String {
        let mut out = String::new();
        render::render_into(self, inner_blocks, &mut out);
        out
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Markup::Element(element)
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Markup::Text(text.to_string())
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Markup::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_classes_orders_and_dedupes() {
        let mut el = Element::new("div").attr("class", "b wp-block-x");
        el.merge_classes(&["wp-block-x"], &["custom  b", ""]);
        assert_eq!(el.get_attr("class"), Some("wp-block-x b custom"));
    }

    #[test]
    fn merge_classes_without_any_class_adds_nothing() {
        let mut el = Element::new("div");
        el.merge_classes(&[], &[""]);
        assert!(el.attributes.is_empty());
    }

    #[test]
    fn attr_replaces_existing_value() {
        let el = Element::new("a").attr("href", "x").attr("href", "y");
        assert_eq!(el.attributes.len(), 1);
        assert_eq!(el.get_attr("href"), Some("y"));
    }

    #[test]
    fn emptiness() {
        assert!(Markup::Empty.is_empty());
        assert!(Markup::fragment([Markup::raw(""), Markup::Empty]).is_empty());
        assert!(!Markup::InnerBlocks.is_empty());
        assert!(!Markup::from(Element::new("hr")).is_empty());
    }
}
