use serde_json::Value;

/// Declared JSON type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    /// Rich text is stored as an HTML string.
    RichText,
}

impl AttributeType {
    /// Whether `value` is acceptable for this type. `integer` accepts any
    /// number, as JSON makes no distinction.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            AttributeType::String | AttributeType::RichText => value.is_string(),
            AttributeType::Number | AttributeType::Integer => value.is_number(),
            AttributeType::Boolean => value.is_boolean(),
            AttributeType::Array => value.is_array(),
            AttributeType::Object => value.is_object(),
            AttributeType::Null => value.is_null(),
        }
    }
}

/// Where an attribute's value comes from.
///
/// An attribute without a source lives in the delimiter's JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeSource {
    /// An HTML attribute of the first match, or of the context element.
    Attribute {
        selector: Option<String>,
        attribute: String,
    },
    /// `innerHTML` of the first match. With `multiline`, the concatenated
    /// outer HTML of the match's children with that tag.
    Html {
        selector: Option<String>,
        multiline: Option<String>,
    },
    /// `textContent` of the first match.
    Text { selector: Option<String> },
    /// One object per match, each extracted with the nested set.
    Query { selector: String, query: AttributeSet },
    /// The block's HTML, unmodified.
    Raw,
    /// Lower-cased tag name of the first match.
    Tag { selector: Option<String> },
    /// A post meta key, read through the host's [`crate::attributes::PostMeta`].
    Meta { key: String },
}

impl AttributeSource {
    pub fn attribute(selector: &str, attribute: &str) -> Self {
        AttributeSource::Attribute {
            selector: Some(selector.to_string()),
            attribute: attribute.to_string(),
        }
    }

    pub fn html(selector: &str) -> Self {
        AttributeSource::Html {
            selector: Some(selector.to_string()),
            multiline: None,
        }
    }

    pub fn multiline_html(selector: &str, tag: &str) -> Self {
        AttributeSource::Html {
            selector: Some(selector.to_string()),
            multiline: Some(tag.to_string()),
        }
    }

    pub fn text(selector: &str) -> Self {
        AttributeSource::Text {
            selector: Some(selector.to_string()),
        }
    }

    pub fn query(selector: &str, query: AttributeSet) -> Self {
        AttributeSource::Query {
            selector: selector.to_string(),
            query,
        }
    }

    pub fn tag(selector: &str) -> Self {
        AttributeSource::Tag {
            selector: Some(selector.to_string()),
        }
    }

    pub fn meta(key: &str) -> Self {
        AttributeSource::Meta {
            key: key.to_string(),
        }
    }

    /// Every selector this source (and any nested query) uses.
    pub fn selectors(&self) -> Vec<&str> {
        match self {
            AttributeSource::Attribute { selector, .. }
            | AttributeSource::Html { selector, .. }
            | AttributeSource::Text { selector }
            | AttributeSource::Tag { selector } => selector.as_deref().into_iter().collect(),
            AttributeSource::Query { selector, query } => {
                let mut all = vec![selector.as_str()];
                for (_, schema) in query.iter() {
                    if let Some(source) = &schema.source {
                        all.extend(source.selectors());
                    }
                }
                all
            }
            AttributeSource::Raw | AttributeSource::Meta { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSchema {
    pub kind: Option<AttributeType>,
    pub source: Option<AttributeSource>,
    pub default: Option<Value>,
    pub enum_values: Option<Vec<Value>>,
}

impl AttributeSchema {
    pub fn of(kind: AttributeType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::of(AttributeType::String)
    }

    pub fn number() -> Self {
        Self::of(AttributeType::Number)
    }

    pub fn boolean() -> Self {
        Self::of(AttributeType::Boolean)
    }

    pub fn array() -> Self {
        Self::of(AttributeType::Array)
    }

    /// No declared type; any value passes.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: AttributeSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn one_of(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.enum_values = Some(values.into_iter().collect());
        self
    }

    /// Type and enum check.
    pub fn accepts(&self, value: &Value) -> bool {
        self.kind.is_none_or(|kind| kind.accepts(value))
            && self
                .enum_values
                .as_ref()
                .is_none_or(|allowed| allowed.contains(value))
    }
}

/// Attribute schemas in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    entries: Vec<(String, AttributeSchema)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`AttributeSet::insert`].
    pub fn with(mut self, name: &str, schema: AttributeSchema) -> Self {
        self.insert(name, schema);
        self
    }

    /// Add a schema, replacing any existing one of the same name in place.
    pub fn insert(&mut self, name: &str, schema: AttributeSchema) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = schema,
            None => self.entries.push((name.to_string(), schema)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSchema> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeSchema)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, AttributeSchema)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, AttributeSchema)>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for (name, schema) in iter {
            set.insert(name, schema);
        }
        set
    }
}
