//! Field merge engine: folds a candidate record into a profile field by field.
//!
//! Scalar policy is last-non-empty-wins. A newer extraction overwrites what is
//! stored, but an absent or empty incoming value never erases prior data;
//! resumes get re-uploaded over time and silent loss is the one failure mode
//! this module exists to prevent. `identity_key` and `created_at` are never
//! touched. Every merge reports whether it changed anything so the caller can
//! skip the write (and leave `updated_at` alone) on a no-op.

use crate::models::profile::{
    Award, CandidateProfile, Certification, Education, Experience, LanguageSkill, Profile, Project,
};
use crate::profile::reconcile::{key_part, merge_string_set, reconcile};

/// Overwrites `existing` with a trimmed `incoming` when the incoming value is
/// non-empty and actually different. Returns whether a change was made.
pub fn merge_scalar(existing: &mut Option<String>, incoming: Option<&str>) -> bool {
    let incoming = match incoming.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return false,
    };
    if existing.as_deref() == Some(incoming) {
        return false;
    }
    *existing = Some(incoming.to_string());
    true
}

/// Applies the full merge policy for one candidate against one profile.
/// Returns whether the profile changed; the caller advances `updated_at` and
/// persists only when it did.
pub fn merge_candidate(profile: &mut Profile, candidate: &CandidateProfile) -> bool {
    let mut changed = false;

    changed |= merge_scalar(&mut profile.name, candidate.name.as_deref());
    changed |= merge_scalar(&mut profile.phone, candidate.phone.as_deref());
    changed |= merge_scalar(&mut profile.location, candidate.location.as_deref());
    changed |= merge_scalar(&mut profile.linkedin, candidate.linkedin.as_deref());
    changed |= merge_scalar(&mut profile.github, candidate.github.as_deref());
    changed |= merge_scalar(&mut profile.portfolio, candidate.portfolio.as_deref());
    changed |= merge_scalar(&mut profile.summary, candidate.summary.as_deref());

    changed |= merge_string_set(&mut profile.skills, &candidate.skills);

    changed |= reconcile(
        &mut profile.languages,
        candidate.languages.clone(),
        |l: &LanguageSkill| l.name.trim().to_lowercase(),
        merge_language,
    );
    changed |= reconcile(
        &mut profile.education,
        candidate.education.clone(),
        education_key,
        merge_education,
    );
    changed |= reconcile(
        &mut profile.experience,
        candidate.experience.clone(),
        experience_key,
        merge_experience,
    );
    changed |= reconcile(
        &mut profile.projects,
        candidate.projects.clone(),
        |p: &Project| key_part(&p.name),
        merge_project,
    );
    changed |= reconcile(
        &mut profile.certifications,
        candidate.certifications.clone(),
        |c: &Certification| key_part(&c.name),
        merge_certification,
    );
    changed |= reconcile(
        &mut profile.awards,
        candidate.awards.clone(),
        |a: &Award| key_part(&a.title),
        merge_award,
    );

    if let Some(source_id) = &candidate.source_id {
        changed |= add_source(profile, source_id);
    }

    changed
}

/// Idempotent set-add on `source_ids`. Source identifiers are opaque, so
/// equality is exact.
pub fn add_source(profile: &mut Profile, source_id: &str) -> bool {
    let source_id = source_id.trim();
    if source_id.is_empty() || profile.source_ids.iter().any(|s| s == source_id) {
        return false;
    }
    profile.source_ids.push(source_id.to_string());
    true
}

fn merge_language(existing: &mut LanguageSkill, incoming: LanguageSkill) -> bool {
    // Newest proficiency wins; a bare mention never erases a known level.
    merge_scalar(&mut existing.proficiency, incoming.proficiency.as_deref())
}

fn education_key(e: &Education) -> (String, String, String) {
    (
        key_part(&e.institution),
        key_part(&e.degree),
        key_part(&e.field),
    )
}

fn merge_education(existing: &mut Education, incoming: Education) -> bool {
    let mut changed = false;
    changed |= merge_scalar(&mut existing.location, incoming.location.as_deref());
    changed |= merge_scalar(&mut existing.start_date, incoming.start_date.as_deref());
    changed |= merge_scalar(
        &mut existing.graduation_date,
        incoming.graduation_date.as_deref(),
    );
    changed |= merge_scalar(&mut existing.gpa, incoming.gpa.as_deref());
    changed |= merge_scalar(&mut existing.honors, incoming.honors.as_deref());
    changed
}

fn experience_key(e: &Experience) -> (String, String, String) {
    (
        key_part(&e.company),
        key_part(&e.title),
        key_part(&e.start_date),
    )
}

fn merge_experience(existing: &mut Experience, incoming: Experience) -> bool {
    let mut changed = false;
    changed |= merge_scalar(&mut existing.location, incoming.location.as_deref());
    changed |= merge_scalar(&mut existing.end_date, incoming.end_date.as_deref());
    changed |= merge_scalar(
        &mut existing.employment_type,
        incoming.employment_type.as_deref(),
    );
    changed |= merge_scalar(&mut existing.description, incoming.description.as_deref());
    changed |= merge_string_set(&mut existing.achievements, &incoming.achievements);
    changed |= merge_string_set(&mut existing.technologies, &incoming.technologies);
    changed
}

fn merge_project(existing: &mut Project, incoming: Project) -> bool {
    let mut changed = false;
    changed |= merge_scalar(&mut existing.description, incoming.description.as_deref());
    changed |= merge_scalar(&mut existing.url, incoming.url.as_deref());
    changed |= merge_scalar(&mut existing.start_date, incoming.start_date.as_deref());
    changed |= merge_scalar(&mut existing.end_date, incoming.end_date.as_deref());
    changed |= merge_string_set(&mut existing.technologies, &incoming.technologies);
    changed
}

fn merge_certification(existing: &mut Certification, incoming: Certification) -> bool {
    let mut changed = false;
    changed |= merge_scalar(&mut existing.organization, incoming.organization.as_deref());
    changed |= merge_scalar(&mut existing.date, incoming.date.as_deref());
    changed |= merge_scalar(&mut existing.expiry_date, incoming.expiry_date.as_deref());
    changed |= merge_scalar(
        &mut existing.credential_id,
        incoming.credential_id.as_deref(),
    );
    changed
}

fn merge_award(existing: &mut Award, incoming: Award) -> bool {
    let mut changed = false;
    changed |= merge_scalar(&mut existing.organization, incoming.organization.as_deref());
    changed |= merge_scalar(&mut existing.date, incoming.date.as_deref());
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn empty_profile() -> Profile {
        Profile::new("x@y.com".to_string(), Utc::now())
    }

    #[test]
    fn test_scalar_overwrites_with_newer_value() {
        let mut existing = Some("555-1111".to_string());
        assert!(merge_scalar(&mut existing, Some("555-2222")));
        assert_eq!(existing.as_deref(), Some("555-2222"));
    }

    #[test]
    fn test_scalar_absent_incoming_keeps_existing() {
        let mut existing = Some("555-1111".to_string());
        assert!(!merge_scalar(&mut existing, None));
        assert!(!merge_scalar(&mut existing, Some("   ")));
        assert_eq!(existing.as_deref(), Some("555-1111"));
    }

    #[test]
    fn test_scalar_identical_incoming_is_noop() {
        let mut existing = Some("Pune".to_string());
        assert!(!merge_scalar(&mut existing, Some("Pune")));
    }

    #[test]
    fn test_candidate_merge_does_not_erase_phone() {
        let mut profile = empty_profile();
        profile.phone = Some("555-1111".to_string());

        let candidate = CandidateProfile {
            name: Some("Ada".to_string()),
            ..CandidateProfile::default()
        };
        assert!(merge_candidate(&mut profile, &candidate));
        assert_eq!(profile.phone.as_deref(), Some("555-1111"));
        assert_eq!(profile.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_candidate_merge_is_idempotent() {
        let mut profile = empty_profile();
        let candidate = CandidateProfile {
            name: Some("Ada".to_string()),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            experience: vec![Experience {
                company: Some("Acme".to_string()),
                title: Some("Engineer".to_string()),
                start_date: Some("2021-01".to_string()),
                achievements: vec!["A".to_string()],
                ..Experience::default()
            }],
            source_id: Some("doc-1".to_string()),
            ..CandidateProfile::default()
        };

        assert!(merge_candidate(&mut profile, &candidate));
        let snapshot = profile.clone();
        assert!(!merge_candidate(&mut profile, &candidate));
        assert_eq!(profile, snapshot);
    }

    #[test]
    fn test_experience_merges_on_natural_key() {
        let mut profile = empty_profile();
        profile.experience = vec![Experience {
            company: Some("Acme".to_string()),
            title: Some("Engineer".to_string()),
            start_date: Some("2021-01".to_string()),
            achievements: vec!["A".to_string()],
            ..Experience::default()
        }];

        let candidate = CandidateProfile {
            experience: vec![Experience {
                company: Some("Acme".to_string()),
                title: Some("Engineer".to_string()),
                start_date: Some("2021-01".to_string()),
                achievements: vec!["B".to_string()],
                ..Experience::default()
            }],
            ..CandidateProfile::default()
        };

        assert!(merge_candidate(&mut profile, &candidate));
        assert_eq!(profile.experience.len(), 1);
        assert_eq!(profile.experience[0].achievements, vec!["A", "B"]);
    }

    #[test]
    fn test_experience_key_is_case_insensitive() {
        let mut profile = empty_profile();
        profile.experience = vec![Experience {
            company: Some("Acme".to_string()),
            title: Some("Engineer".to_string()),
            start_date: Some("2021-01".to_string()),
            ..Experience::default()
        }];

        let candidate = CandidateProfile {
            experience: vec![Experience {
                company: Some("ACME".to_string()),
                title: Some("engineer".to_string()),
                start_date: Some("2021-01".to_string()),
                end_date: Some("2023-06".to_string()),
                ..Experience::default()
            }],
            ..CandidateProfile::default()
        };

        merge_candidate(&mut profile, &candidate);
        assert_eq!(profile.experience.len(), 1);
        assert_eq!(profile.experience[0].end_date.as_deref(), Some("2023-06"));
    }

    #[test]
    fn test_language_proficiency_newest_wins() {
        let mut profile = empty_profile();
        profile.languages = vec![LanguageSkill {
            name: "English".to_string(),
            proficiency: Some("B2".to_string()),
        }];

        let candidate = CandidateProfile {
            languages: vec![LanguageSkill {
                name: "english".to_string(),
                proficiency: Some("C1".to_string()),
            }],
            ..CandidateProfile::default()
        };

        assert!(merge_candidate(&mut profile, &candidate));
        assert_eq!(profile.languages.len(), 1);
        assert_eq!(profile.languages[0].proficiency.as_deref(), Some("C1"));
    }

    #[test]
    fn test_new_entries_append_after_existing() {
        let mut profile = empty_profile();
        profile.projects = vec![Project {
            name: Some("Alpha".to_string()),
            ..Project::default()
        }];

        let candidate = CandidateProfile {
            projects: vec![
                Project {
                    name: Some("Beta".to_string()),
                    ..Project::default()
                },
                Project {
                    name: Some("alpha".to_string()),
                    description: Some("rewritten".to_string()),
                    ..Project::default()
                },
            ],
            ..CandidateProfile::default()
        };

        merge_candidate(&mut profile, &candidate);
        let names: Vec<_> = profile.projects.iter().map(|p| p.name.as_deref()).collect();
        assert_eq!(names, vec![Some("Alpha"), Some("Beta")]);
        assert_eq!(profile.projects[0].description.as_deref(), Some("rewritten"));
    }

    #[test]
    fn test_add_source_is_idempotent() {
        let mut profile = empty_profile();
        assert!(add_source(&mut profile, "doc-1"));
        assert!(!add_source(&mut profile, "doc-1"));
        assert_eq!(profile.source_ids, vec!["doc-1"]);
    }
}
