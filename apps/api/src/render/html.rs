//! HTML projection of a [`ResumeRecord`] through a MiniJinja template.
//!
//! The template is registered under an `.html` name so auto-escaping is on:
//! plain-text slots are escaped, the five rich-text slots are passed as safe
//! strings and rendered verbatim. The photo slot is escaped for attribute use
//! up front so URL slashes survive.

use std::path::Path;

use minijinja::{context, Environment, Value};

use crate::config::{read_template, ConfigError};
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::render::markup::escape_attribute;

const TEMPLATE_NAME: &str = "resume.html";

/// Names a template may reference.
pub const SLOTS: &[&str] = &[
    "NAME",
    "ADDRESS",
    "EMAIL",
    "NUMBER",
    "ROLE",
    "EXPERIENCE",
    "EDUCATION",
    "PROFESSIONAL",
    "SKILLS",
    "PROJECTS",
    "AWARDS",
    "START",
    "END",
    "SUMMARY",
    "PHOTO_URL",
];

/// Globals MiniJinja provides itself.
const BUILTINS: &[&str] = &["range", "dict", "namespace", "debug", "loop"];

pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_source(read_template(path)?)
    }

    /// Compiles the template and checks it only references known slots.
    pub fn from_source(source: String) -> Result<Self, ConfigError> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source)?;

        let template = env.get_template(TEMPLATE_NAME)?;
        let mut unknown: Vec<String> = template
            .undeclared_variables(false)
            .into_iter()
            .filter(|var| !SLOTS.contains(&var.as_str()) && !BUILTINS.contains(&var.as_str()))
            .collect();
        unknown.sort();
        if let Some(slot) = unknown.into_iter().next() {
            return Err(ConfigError::UnknownSlot(slot));
        }

        Ok(Self { env })
    }

    pub fn render(&self, record: &ResumeRecord) -> Result<String, AppError> {
        let trusted = |markup: &str| Value::from_safe_string(markup.to_string());

        let ctx = context! {
            NAME => record.name.as_str(),
            ADDRESS => record.address.as_str(),
            EMAIL => record.email.as_str(),
            NUMBER => record.phone.as_str(),
            ROLE => record.role.as_str(),
            EXPERIENCE => trusted(record.experience.as_markup()),
            EDUCATION => trusted(record.education.as_markup()),
            PROFESSIONAL => record.professional_qualifications.as_str(),
            SKILLS => trusted(record.skills.as_markup()),
            PROJECTS => trusted(record.projects.as_markup()),
            AWARDS => trusted(record.awards.as_markup()),
            START => record.start_date.as_str(),
            END => record.end_date.as_str(),
            SUMMARY => record.narrative.as_str(),
            PHOTO_URL => trusted(&escape_attribute(&record.photo.html_src())),
        };

        self.env
            .get_template(TEMPLATE_NAME)
            .and_then(|template| template.render(ctx))
            .map_err(|e| AppError::RenderFailure(format!("HTML template: {e}")))
    }
}
