//! Schema description: fields, their ordered rules, and cross-field checks.
//!
//! Schemas are plain data built once per form and shared by every submission.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};

/// Shape a field's value must have.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    /// JSON numbers; numeric strings are coerced.
    Number,
    Boolean,
    /// One of the listed wire strings.
    Choice(Vec<&'static str>),
    /// Array whose elements are validated by the inner field (its name is unused).
    List(Box<Field>),
    /// Nested record.
    Object(Vec<Field>),
    /// Client-side file descriptor: an object with a non-empty `name`.
    Upload,
}

/// One constraint on a field, with its own message.
#[derive(Debug, Clone)]
pub enum Rule {
    MinLength(usize, &'static str),
    MaxLength(usize, &'static str),
    /// `regex` is `None` when `source` failed to compile; the runner reports
    /// that as a form-level failure instead of skipping the rule.
    Pattern {
        source: &'static str,
        regex: Option<Regex>,
        message: &'static str,
    },
    Email(&'static str),
    Url(&'static str),
    Min(f64, &'static str),
    Max(f64, &'static str),
    Positive(&'static str),
    MinItems(usize, &'static str),
    MustBeTrue(&'static str),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub optional: bool,
    pub rules: Vec<Rule>,
    /// Replaces the generic "Expected ..., received ..." message.
    pub type_message: Option<&'static str>,
}

impl Field {
    fn of(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            optional: false,
            rules: Vec::new(),
            type_message: None,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::of(name, FieldKind::Text)
    }

    pub fn number(name: &'static str) -> Self {
        Self::of(name, FieldKind::Number)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::of(name, FieldKind::Boolean)
    }

    pub fn choice(name: &'static str, allowed: &[&'static str]) -> Self {
        Self::of(name, FieldKind::Choice(allowed.to_vec()))
    }

    pub fn list(name: &'static str, item: Field) -> Self {
        Self::of(name, FieldKind::List(Box::new(item)))
    }

    pub fn object(name: &'static str, fields: Vec<Field>) -> Self {
        Self::of(name, FieldKind::Object(fields))
    }

    pub fn upload(name: &'static str) -> Self {
        Self::of(name, FieldKind::Upload)
    }

    /// Absent (or `null`) values are accepted and left out of the output.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn type_message(mut self, message: &'static str) -> Self {
        self.type_message = Some(message);
        self
    }

    pub fn min_len(self, n: usize, message: &'static str) -> Self {
        self.rule(Rule::MinLength(n, message))
    }

    pub fn max_len(self, n: usize, message: &'static str) -> Self {
        self.rule(Rule::MaxLength(n, message))
    }

    pub fn pattern(self, source: &'static str, message: &'static str) -> Self {
        let regex = Regex::new(source).ok();
        self.rule(Rule::Pattern {
            source,
            regex,
            message,
        })
    }

    pub fn email(self, message: &'static str) -> Self {
        self.rule(Rule::Email(message))
    }

    pub fn url(self, message: &'static str) -> Self {
        self.rule(Rule::Url(message))
    }

    pub fn min(self, n: f64, message: &'static str) -> Self {
        self.rule(Rule::Min(n, message))
    }

    pub fn max(self, n: f64, message: &'static str) -> Self {
        self.rule(Rule::Max(n, message))
    }

    pub fn positive(self, message: &'static str) -> Self {
        self.rule(Rule::Positive(message))
    }

    pub fn min_items(self, n: usize, message: &'static str) -> Self {
        self.rule(Rule::MinItems(n, message))
    }

    pub fn must_be_true(self, message: &'static str) -> Self {
        self.rule(Rule::MustBeTrue(message))
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Comparison between two already-validated fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossField {
    /// `field` must equal `other`; the error lands on `path`.
    Equal {
        field: &'static str,
        other: &'static str,
        path: &'static str,
        message: &'static str,
    },
    /// `field` must differ from `other`; the error lands on `path`.
    NotEqual {
        field: &'static str,
        other: &'static str,
        path: &'static str,
        message: &'static str,
    },
}

/// A violation produced by an asynchronous check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Check that may need IO (e.g. "is this email already registered").
///
/// `Ok(None)` passes, `Ok(Some(issue))` is a rule violation, `Err` is an
/// internal failure reported under the form-level key.
#[async_trait]
pub trait AsyncRefinement: Send + Sync {
    async fn check(&self, data: &Map<String, Value>) -> anyhow::Result<Option<Issue>>;
}

/// A complete form description.
#[derive(Clone)]
pub struct Schema {
    pub name: &'static str,
    pub fields: Vec<Field>,
    pub cross_fields: Vec<CrossField>,
    pub async_refinements: Vec<Arc<dyn AsyncRefinement>>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("cross_fields", &self.cross_fields)
            .field("async_refinements", &self.async_refinements.len())
            .finish()
    }
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            cross_fields: Vec::new(),
            async_refinements: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn must_match(
        mut self,
        field: &'static str,
        other: &'static str,
        path: &'static str,
        message: &'static str,
    ) -> Self {
        self.cross_fields.push(CrossField::Equal {
            field,
            other,
            path,
            message,
        });
        self
    }

    pub fn must_differ(
        mut self,
        field: &'static str,
        other: &'static str,
        path: &'static str,
        message: &'static str,
    ) -> Self {
        self.cross_fields.push(CrossField::NotEqual {
            field,
            other,
            path,
            message,
        });
        self
    }

    pub fn refine_async(mut self, check: Arc<dyn AsyncRefinement>) -> Self {
        self.async_refinements.push(check);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
