//! The summary prompt template.
//!
//! Placeholders are `{field}` where `field` is one of [`RawFields::FIELD_NAMES`];
//! `{{` and `}}` produce literal braces. Every placeholder is checked when the
//! template is loaded, so substitution itself cannot fail.

use std::path::Path;

use crate::config::{read_template, ConfigError};
use crate::models::resume::RawFields;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(&'static str),
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::parse(&read_template(path)?)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, ch)) => name.push(ch),
                            None => return Err(ConfigError::UnclosedPlaceholder(pos)),
                        }
                    }
                    let field = RawFields::FIELD_NAMES
                        .iter()
                        .copied()
                        .find(|known| *known == name)
                        .ok_or(ConfigError::UnknownPromptField(name))?;

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => return Err(ConfigError::UnmatchedBrace(pos)),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Field names referenced by the template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(*name),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, fields: &RawFields) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => out.push_str(fields.get(name).unwrap_or_default()),
            }
        }
        out
    }
}
