use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The canonical per-identity record. Exactly one profile exists per
/// `identity_key` (normalized email); all writes go through the store's
/// compare-and-swap upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub identity_key: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<LanguageSkill>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub awards: Vec<Award>,
    /// Storage identifiers of every source document that contributed to this
    /// profile. Grows monotonically; duplicates are never added.
    #[serde(default)]
    pub source_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// An empty profile for a previously-unseen identity.
    pub fn new(identity_key: String, now: DateTime<Utc>) -> Self {
        Profile {
            identity_key,
            name: None,
            phone: None,
            location: None,
            linkedin: None,
            github: None,
            portfolio: None,
            summary: None,
            skills: Vec::new(),
            languages: Vec::new(),
            education: Vec::new(),
            experience: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            awards: Vec::new(),
            source_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub name: String,
    pub proficiency: Option<String>,
}

impl LanguageSkill {
    /// Splits loose extractor output like `"English (Native)"` into a name and
    /// proficiency. Anything without a trailing parenthesized part is taken as
    /// a bare language name.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if let Some((name, rest)) = text.rsplit_once('(') {
            if let Some(proficiency) = rest.trim().strip_suffix(')') {
                let name = name.trim();
                if !name.is_empty() && !proficiency.trim().is_empty() {
                    return LanguageSkill {
                        name: name.to_string(),
                        proficiency: Some(proficiency.trim().to_string()),
                    };
                }
            }
        }
        LanguageSkill {
            name: text.to_string(),
            proficiency: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
    pub honors: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub employment_type: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub achievements: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub title: Option<String>,
    pub organization: Option<String>,
    pub date: Option<String>,
}

/// A structured record proposed for merging into a profile, as produced by the
/// extraction collaborator (or posted directly by an API client). Every field
/// is optional; unknown fields are ignored. The identity is carried as a raw
/// email and normalized by the engine before any lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub email: Option<String>,
    /// Storage identifier of the document this record was extracted from, if
    /// any. Recorded as provenance on a successful merge.
    #[serde(default)]
    pub source_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "languages_loose")]
    pub languages: Vec<LanguageSkill>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "null_as_empty_vec")]
    pub certifications: Vec<Certification>,
    #[serde(default, deserialize_with = "awards_loose")]
    pub awards: Vec<Award>,
}

/// Extractors emit `null` where a section is absent; treat that the same as a
/// missing field.
fn null_as_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Languages arrive either as objects or as plain strings ("English (Native)").
fn languages_loose<'de, D>(deserializer: D) -> Result<Vec<LanguageSkill>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Structured(LanguageSkill),
    }

    let raw = Option::<Vec<Loose>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|l| match l {
            Loose::Text(s) => LanguageSkill::from_text(&s),
            Loose::Structured(l) => l,
        })
        .collect())
}

/// Awards arrive either as objects or as bare title strings.
fn awards_loose<'de, D>(deserializer: D) -> Result<Vec<Award>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Structured(Award),
    }

    let raw = Option::<Vec<Loose>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|a| match a {
            Loose::Text(s) => Award {
                title: Some(s),
                ..Award::default()
            },
            Loose::Structured(a) => a,
        })
        .collect())
}
