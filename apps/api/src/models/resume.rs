use std::path::PathBuf;

use bytes::Bytes;

use crate::render::markup::plain_lines;

// ────────────────────────────────────────────────────────────────────────────
// Raw input
// ────────────────────────────────────────────────────────────────────────────

/// The text fields a client submits for one resume, keyed by their form names.
///
/// Every field defaults to `""`; an absent form field is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub experience: String,
    pub education: String,
    pub prof_education: String,
    pub skills: String,
    pub projects: String,
    pub awards: String,
    pub start: String,
    pub end: String,
}

impl RawFields {
    /// Form field names accepted as resume text. Prompt placeholders must be drawn from this set.
    pub const FIELD_NAMES: &'static [&'static str] = &[
        "name",
        "address",
        "email",
        "phone",
        "role",
        "experience",
        "education",
        "prof_education",
        "skills",
        "projects",
        "awards",
        "start",
        "end",
    ];

    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "name" => &self.name,
            "address" => &self.address,
            "email" => &self.email,
            "phone" => &self.phone,
            "role" => &self.role,
            "experience" => &self.experience,
            "education" => &self.education,
            "prof_education" => &self.prof_education,
            "skills" => &self.skills,
            "projects" => &self.projects,
            "awards" => &self.awards,
            "start" => &self.start,
            "end" => &self.end,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Stores `value` under `key`. Returns `false` for names outside [`Self::FIELD_NAMES`].
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "name" => &mut self.name,
            "address" => &mut self.address,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "role" => &mut self.role,
            "experience" => &mut self.experience,
            "education" => &mut self.education,
            "prof_education" => &mut self.prof_education,
            "skills" => &mut self.skills,
            "projects" => &mut self.projects,
            "awards" => &mut self.awards,
            "start" => &mut self.start,
            "end" => &mut self.end,
            _ => return false,
        };
        *slot = value;
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Photo references
// ────────────────────────────────────────────────────────────────────────────

/// A photo persisted in the upload directory under a generated unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub name: String,
    pub path: PathBuf,
}

impl StoredAsset {
    /// Path relative to the asset root, usable as an `<img src>` by both the
    /// browser preview and the PDF engine.
    pub fn relative_src(&self) -> String {
        format!("{}/{}", crate::assets::store::UPLOAD_SUBDIR, self.name)
    }
}

/// Where the resume photo lives. Created once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetReference {
    /// Decoded from an embedded data URI; the decoded bytes travel with the reference.
    Inline { asset: StoredAsset, bytes: Bytes },
    /// A file received as a multipart upload and persisted as-is.
    Uploaded(StoredAsset),
    /// An external URL that is never materialized locally.
    Remote(String),
}

impl AssetReference {
    /// The value placed in the HTML photo slot.
    pub fn html_src(&self) -> String {
        match self {
            AssetReference::Inline { asset, .. } | AssetReference::Uploaded(asset) => {
                asset.relative_src()
            }
            AssetReference::Remote(url) => url.clone(),
        }
    }

    /// Bytes available for embedding without any further I/O.
    pub fn inline_bytes(&self) -> Option<&[u8]> {
        match self {
            AssetReference::Inline { bytes, .. } => Some(bytes),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Canonical record
// ────────────────────────────────────────────────────────────────────────────

/// Markup produced by the client's rich-text editor.
///
/// Accepted as trusted markup: inserted verbatim into HTML, reduced to plain
/// text for every other target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText(String);

impl RichText {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_markup(&self) -> &str {
        &self.0
    }

    /// Text content split into display lines, with every tag removed.
    pub fn plain_lines(&self) -> Vec<String> {
        plain_lines(&self.0)
    }
}

/// The normalized resume consumed by every renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRecord {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub experience: RichText,
    pub education: RichText,
    pub skills: RichText,
    pub projects: RichText,
    pub awards: RichText,
    pub professional_qualifications: String,
    pub narrative: String,
    pub photo: AssetReference,
}

impl ResumeRecord {
    /// Merges raw fields, the resolved photo and the cleaned narrative. Pure mapping, no I/O.
    pub fn assemble(fields: RawFields, photo: AssetReference, narrative: String) -> Self {
        Self {
            name: fields.name,
            address: fields.address,
            email: fields.email,
            phone: fields.phone,
            role: fields.role,
            start_date: fields.start,
            end_date: fields.end,
            experience: RichText::new(fields.experience),
            education: RichText::new(fields.education),
            skills: RichText::new(fields.skills),
            projects: RichText::new(fields.projects),
            awards: RichText::new(fields.awards),
            professional_qualifications: fields.prof_education,
            narrative,
            photo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_name_round_trips_through_set_and_get() {
        let mut fields = RawFields::default();
        for key in RawFields::FIELD_NAMES {
            assert!(fields.set(key, format!("value of {key}")));
        }
        for key in RawFields::FIELD_NAMES {
            assert_eq!(fields.get(key), Some(format!("value of {key}").as_str()));
        }
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut fields = RawFields::default();
        assert!(!fields.set("salary", "1".to_string()));
        assert_eq!(fields.get("salary"), None);
        assert_eq!(fields, RawFields::default());
    }

    #[test]
    fn test_assemble_defaults_missing_fields_to_empty() {
        let fields = RawFields {
            name: "A. Lee".to_string(),
            experience: "<b>Built X</b>".to_string(),
            ..Default::default()
        };
        let record = ResumeRecord::assemble(
            fields,
            AssetReference::Remote("https://example.com/p.png".to_string()),
            "Engineer.".to_string(),
        );

        assert_eq!(record.name, "A. Lee");
        assert_eq!(record.phone, "");
        assert_eq!(record.start_date, "");
        assert_eq!(record.professional_qualifications, "");
        assert_eq!(record.experience.as_markup(), "<b>Built X</b>");
        assert_eq!(record.awards.as_markup(), "");
        assert_eq!(record.narrative, "Engineer.");
    }

    #[test]
    fn test_prof_education_maps_to_professional_qualifications() {
        let fields = RawFields {
            prof_education: "PMP".to_string(),
            start: "2020".to_string(),
            end: "2024".to_string(),
            ..Default::default()
        };
        let record =
            ResumeRecord::assemble(fields, AssetReference::Remote(String::new()), String::new());
        assert_eq!(record.professional_qualifications, "PMP");
        assert_eq!(record.start_date, "2020");
        assert_eq!(record.end_date, "2024");
    }

    #[test]
    fn test_html_src_per_variant() {
        let asset = StoredAsset {
            name: "abc.png".to_string(),
            path: PathBuf::from("/srv/uploads/abc.png"),
        };
        let inline = AssetReference::Inline {
            asset: asset.clone(),
            bytes: Bytes::from_static(b"png"),
        };
        assert_eq!(inline.html_src(), "uploads/abc.png");
        assert_eq!(inline.inline_bytes(), Some(&b"png"[..]));

        let uploaded = AssetReference::Uploaded(asset);
        assert_eq!(uploaded.html_src(), "uploads/abc.png");
        assert!(uploaded.inline_bytes().is_none());

        let remote = AssetReference::Remote("https://via.placeholder.com/120".to_string());
        assert_eq!(remote.html_src(), "https://via.placeholder.com/120");
        assert!(remote.inline_bytes().is_none());
    }
}
