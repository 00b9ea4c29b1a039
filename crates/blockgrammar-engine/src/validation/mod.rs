//! # Validation
//!
//! A parsed block is valid when re-saving its hydrated attributes produces
//! markup equivalent to what was stored. Equivalence is token based and
//! forgiving about formatting but not about content:
//!
//! - whitespace-only text between tags is ignored
//! - tag names are compared case-insensitively
//! - attributes are compared as a set, with `class` as a set of names,
//!   `style` as a property map, boolean attributes by presence and plain
//!   numbers by value
//! - text is compared after collapsing whitespace
//! - `<br/>` matches `<br></br>`
//!
//! Blocks that fail are retried against each deprecated definition, most
//! recent first; see [`deprecation`].
//!
//! Issues found along the way are queued on an [`IssueLog`] and only
//! reach the `log` output when the block ends up invalid.
//!
//! ## Modules
//!
//! - [`equivalence`] - HTML token comparison
//! - [`style`] - `style` attribute normalization
//! - [`deprecation`] - the current/deprecated validation pipeline

pub mod deprecation;
pub mod equivalence;
pub mod style;

use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::block::{Attributes, SaveVariant};
use crate::serializer::get_save_content;

pub use equivalence::is_equivalent_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub message: String,
}

/// Validation messages held back until the outcome is known.
#[derive(Debug, Clone, Default)]
pub struct IssueLog {
    issues: Vec<ValidationIssue>,
}

impl IssueLog {
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(IssueLevel::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(IssueLevel::Error, message.into());
    }

    fn push(&mut self, level: IssueLevel, message: String) {
        self.issues.push(ValidationIssue { level, message });
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}

/// Send queued issues to the `log` facade.
pub fn emit_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        match issue.level {
            IssueLevel::Warning => warn!("{}", issue.message),
            IssueLevel::Error => error!("{}", issue.message),
        }
    }
}

/// Compare `original_content` with what `variant` saves for `attributes`.
///
/// Inner blocks are not part of a block's own content, so the save output
/// is rendered with an empty inner-blocks placeholder.
pub fn validate_block(
    variant: &SaveVariant<'_>,
    attributes: &Attributes,
    original_content: &str,
) -> (bool, Vec<ValidationIssue>) {
    let generated = get_save_content(variant, attributes, "");
    let mut log = IssueLog::default();
    let is_valid = is_equivalent_html(original_content, &generated, &mut log);
    if !is_valid {
        log.error(format!(
            "Block validation failed for `{}`.\n\nContent generated by `save` function:\n\n{generated}\n\nContent retrieved from post body:\n\n{original_content}",
            variant.name
        ));
    }
    (is_valid, log.into_issues())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{AttributeSchema, AttributeSource, BlockType, Supports};
    use crate::markup::{Element, Markup};
    use serde_json::{Map, Value, json};

    fn paragraph() -> BlockType {
        BlockType::new("test/paragraph", |attributes| {
            Element::new("p")
                .child(Markup::raw(
                    attributes.get("content").and_then(Value::as_str).unwrap_or_default(),
                ))
                .into()
        })
        .supports(Supports {
            class_name: false,
            custom_class_name: true,
        })
        .attribute(
            "content",
            AttributeSchema::string().source(AttributeSource::html("p")),
        )
    }

    fn content(text: &str) -> Attributes {
        let mut attributes = Map::new();
        attributes.insert("content".into(), json!(text));
        attributes
    }

    #[test]
    fn valid_block_has_no_issues() {
        let block_type = paragraph();
        let (valid, issues) = validate_block(&block_type.current(), &content("Hi"), "<p>Hi</p>");
        assert!(valid);
        assert!(issues.is_empty());
    }

    #[test]
    fn invalid_block_ends_with_an_error() {
        let block_type = paragraph();
        let (valid, issues) = validate_block(&block_type.current(), &content("Hi"), "<p>Bye</p>");
        assert!(!valid);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].level, IssueLevel::Warning);
        assert_eq!(issues[1].level, IssueLevel::Error);
        assert!(issues[1].message.contains("<p>Hi</p>"));
        assert!(issues[1].message.contains("<p>Bye</p>"));
    }

    #[test]
    fn issue_levels_serialize_lowercase() {
        let issue = ValidationIssue {
            level: IssueLevel::Warning,
            message: "m".into(),
        };
        assert_eq!(
            serde_json::to_value(issue).unwrap(),
            json!({"level": "warning", "message": "m"})
        );
    }
}
