//! Profile data model – the canonical record of one person's CV content.
//!
//! A [`ProfileData`] is constructed once per export (either the built-in
//! sample via [`default_profile`] or a caller-assembled customisation via
//! [`customize`]) and is read-only for the duration of rendering. Every
//! list is ordered and that order is editorial: renderers must surface
//! entries in the order given here, truncating only by prefix.

use serde::{Deserialize, Serialize};

/// Full CV content for one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub location: String,
    pub summary: String,
    pub skills: Vec<SkillGroup>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub languages: Vec<LanguageEntry>,
}

/// A named group of skills. Category names are unique within one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

/// One position held, with bullet-point highlights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: String,
    /// Display string, e.g. "Mar 2021 – Present". Not parsed.
    pub period: String,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    /// Display string listing the stack, e.g. "Rust, Axum, Postgres".
    pub technologies: String,
    pub contribution: Contribution,
    pub link: String,
}

/// Closed vocabulary for a project contribution badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contribution {
    #[serde(rename = "Full-Stack")]
    FullStack,
    Frontend,
    Backend,
    Mobile,
}

impl Contribution {
    /// Badge text as it appears in rendered documents.
    pub fn label(&self) -> &'static str {
        match self {
            Contribution::FullStack => "Full-Stack",
            Contribution::Frontend => "Frontend",
            Contribution::Backend => "Backend",
            Contribution::Mobile => "Mobile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub name: String,
    pub level: String,
}

// ---------------------------------------------------------------------------
// Customisation
// ---------------------------------------------------------------------------

/// Caller-supplied overrides applied on top of a base profile.
///
/// `None` keeps the base value. `Some(list)` replaces the list wholesale –
/// an upstream selection UI expresses "drop entry 3, move entry 5 first" by
/// sending the already filtered and reordered list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Option<Vec<SkillGroup>>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<Vec<EducationEntry>>,
    pub projects: Option<Vec<ProjectEntry>>,
    pub languages: Option<Vec<LanguageEntry>>,
}

/// Build a new [`ProfileData`] from `base` with `overrides` applied.
///
/// Pure: neither argument is mutated, and calling twice with the same
/// inputs yields identical results.
pub fn customize(base: &ProfileData, overrides: &ProfileOverrides) -> ProfileData {
    ProfileData {
        name: overrides.name.clone().unwrap_or_else(|| base.name.clone()),
        title: overrides.title.clone().unwrap_or_else(|| base.title.clone()),
        email: overrides.email.clone().unwrap_or_else(|| base.email.clone()),
        phone: overrides.phone.clone().unwrap_or_else(|| base.phone.clone()),
        linkedin: overrides
            .linkedin
            .clone()
            .unwrap_or_else(|| base.linkedin.clone()),
        github: overrides
            .github
            .clone()
            .unwrap_or_else(|| base.github.clone()),
        location: overrides
            .location
            .clone()
            .unwrap_or_else(|| base.location.clone()),
        summary: overrides
            .summary
            .clone()
            .unwrap_or_else(|| base.summary.clone()),
        skills: overrides
            .skills
            .clone()
            .unwrap_or_else(|| base.skills.clone()),
        experience: overrides
            .experience
            .clone()
            .unwrap_or_else(|| base.experience.clone()),
        education: overrides
            .education
            .clone()
            .unwrap_or_else(|| base.education.clone()),
        projects: overrides
            .projects
            .clone()
            .unwrap_or_else(|| base.projects.clone()),
        languages: overrides
            .languages
            .clone()
            .unwrap_or_else(|| base.languages.clone()),
    }
}

// ---------------------------------------------------------------------------
// Sample profile
// ---------------------------------------------------------------------------

/// The built-in sample profile used when the caller supplies no
/// customisation. Fully populated so every renderer section is exercised.
pub fn default_profile() -> ProfileData {
    ProfileData {
        name: "Elena Vasquez".to_string(),
        title: "Senior Software Engineer".to_string(),
        email: "elena.vasquez@fastmail.com".to_string(),
        phone: "+34 612 44 87 21".to_string(),
        linkedin: "linkedin.com/in/elenavasquez-dev".to_string(),
        github: "github.com/evasquez-dev".to_string(),
        location: "Valencia, Spain".to_string(),
        summary: "Senior Software Engineer with 8+ years building backend \
                  services, developer tooling, and data-heavy web applications. \
                  Comfortable owning systems end to end, from storage schema and \
                  API design through deployment and on-call. Known for clear \
                  written design work and for shipping maintainable code under \
                  real deadlines."
            .to_string(),
        skills: vec![
            SkillGroup {
                category: "Backend".to_string(),
                items: vec![
                    "Rust".to_string(),
                    "Go".to_string(),
                    "PostgreSQL".to_string(),
                    "Redis".to_string(),
                    "gRPC".to_string(),
                    "Kafka".to_string(),
                ],
            },
            SkillGroup {
                category: "Web".to_string(),
                items: vec![
                    "TypeScript".to_string(),
                    "React".to_string(),
                    "Node.js".to_string(),
                    "GraphQL".to_string(),
                    "REST APIs".to_string(),
                ],
            },
            SkillGroup {
                category: "Infrastructure".to_string(),
                items: vec![
                    "Kubernetes".to_string(),
                    "Terraform".to_string(),
                    "AWS".to_string(),
                    "CI/CD".to_string(),
                    "Prometheus".to_string(),
                    "Grafana".to_string(),
                ],
            },
            SkillGroup {
                category: "Data".to_string(),
                items: vec![
                    "ClickHouse".to_string(),
                    "dbt".to_string(),
                    "Airflow".to_string(),
                    "Parquet".to_string(),
                ],
            },
            SkillGroup {
                category: "Practices".to_string(),
                items: vec![
                    "Design reviews".to_string(),
                    "Incident response".to_string(),
                    "Mentoring".to_string(),
                    "Tech interviews".to_string(),
                ],
            },
            SkillGroup {
                category: "Tools".to_string(),
                items: vec![
                    "Git".to_string(),
                    "Linux".to_string(),
                    "Docker".to_string(),
                    "Jira".to_string(),
                    "Figma".to_string(),
                ],
            },
        ],
        experience: vec![
            ExperienceEntry {
                title: "Senior Software Engineer".to_string(),
                company: "Tideway Analytics".to_string(),
                location: "Remote".to_string(),
                period: "Mar 2022 - Present".to_string(),
                description: vec![
                    "Own the ingestion pipeline moving ~2B events/day from Kafka into ClickHouse with exactly-once semantics".to_string(),
                    "Led the migration of the query API from Node.js to Rust, cutting p99 latency from 900ms to 120ms".to_string(),
                    "Designed the customer-facing usage export service and its billing reconciliation jobs".to_string(),
                    "Mentor two mid-level engineers; run the team's design-review rotation".to_string(),
                ],
            },
            ExperienceEntry {
                title: "Software Engineer".to_string(),
                company: "Mercabit".to_string(),
                location: "Valencia, Spain".to_string(),
                period: "Jun 2019 - Feb 2022".to_string(),
                description: vec![
                    "Built the marketplace settlement engine handling split payments across 4 PSPs".to_string(),
                    "Introduced contract tests between the storefront and 11 internal services".to_string(),
                    "Reduced checkout error rate by 40% through idempotency keys and retry budgets".to_string(),
                ],
            },
            ExperienceEntry {
                title: "Backend Developer".to_string(),
                company: "Nimbus Salud".to_string(),
                location: "Madrid, Spain".to_string(),
                period: "Sep 2017 - May 2019".to_string(),
                description: vec![
                    "Developed FHIR-compliant APIs for appointment scheduling across 30+ clinics".to_string(),
                    "Implemented audit logging and role-based access to meet healthcare data requirements".to_string(),
                    "On-call owner for the notifications service (SMS/email, ~500k sends/month)".to_string(),
                ],
            },
            ExperienceEntry {
                title: "Junior Developer".to_string(),
                company: "Estudio Brava".to_string(),
                location: "Valencia, Spain".to_string(),
                period: "Jul 2016 - Aug 2017".to_string(),
                description: vec![
                    "Delivered CMS-backed sites and booking widgets for agency clients".to_string(),
                    "Automated the agency's deployment flow, replacing FTP uploads with Git-based releases".to_string(),
                ],
            },
        ],
        education: vec![EducationEntry {
            degree: "B.Sc. in Computer Engineering".to_string(),
            institution: "Universitat Politècnica de València".to_string(),
            period: "2012 - 2016".to_string(),
        }],
        projects: vec![
            ProjectEntry {
                name: "Ledgerline".to_string(),
                description: "Double-entry bookkeeping engine with an embeddable \
                              reporting UI, used by three fintech startups in production."
                    .to_string(),
                technologies: "Rust, PostgreSQL, React, TypeScript".to_string(),
                contribution: Contribution::FullStack,
                link: "github.com/evasquez-dev/ledgerline".to_string(),
            },
            ProjectEntry {
                name: "Tideway Usage Exports".to_string(),
                description: "Self-serve export service producing signed Parquet \
                              bundles of customer analytics data on a schedule."
                    .to_string(),
                technologies: "Rust, ClickHouse, S3, Kafka".to_string(),
                contribution: Contribution::Backend,
                link: "tideway.io/docs/exports".to_string(),
            },
            ProjectEntry {
                name: "fhir-codegen".to_string(),
                description: "Code generator turning FHIR resource definitions into \
                              typed Go client bindings with validation."
                    .to_string(),
                technologies: "Go, OpenAPI, JSON Schema".to_string(),
                contribution: Contribution::Backend,
                link: "github.com/evasquez-dev/fhir-codegen".to_string(),
            },
            ProjectEntry {
                name: "Mercabit Storefront".to_string(),
                description: "High-traffic marketplace storefront with localized \
                              catalogues and A/B-tested checkout flows."
                    .to_string(),
                technologies: "TypeScript, React, GraphQL, Node.js".to_string(),
                contribution: Contribution::Frontend,
                link: "mercabit.es".to_string(),
            },
            ProjectEntry {
                name: "shiftplan".to_string(),
                description: "Mobile-first rota planner for small clinics with \
                              offline support and conflict detection."
                    .to_string(),
                technologies: "React Native, SQLite, TypeScript".to_string(),
                contribution: Contribution::Mobile,
                link: "github.com/evasquez-dev/shiftplan".to_string(),
            },
        ],
        languages: vec![
            LanguageEntry {
                name: "Spanish".to_string(),
                level: "Native".to_string(),
            },
            LanguageEntry {
                name: "English".to_string(),
                level: "Professional".to_string(),
            },
            LanguageEntry {
                name: "Valencian".to_string(),
                level: "Native".to_string(),
            },
        ],
    }
}

/// An entirely empty profile – handy for tests and for callers that build
/// content from scratch.
pub fn empty_profile() -> ProfileData {
    ProfileData {
        name: String::new(),
        title: String::new(),
        email: String::new(),
        phone: String::new(),
        linkedin: String::new(),
        github: String::new(),
        location: String::new(),
        summary: String::new(),
        skills: Vec::new(),
        experience: Vec::new(),
        education: Vec::new(),
        projects: Vec::new(),
        languages: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customize_keeps_base_when_no_overrides() {
        let base = default_profile();
        let merged = customize(&base, &ProfileOverrides::default());
        assert_eq!(merged, base);
    }

    #[test]
    fn customize_replaces_lists_wholesale() {
        let base = default_profile();
        let overrides = ProfileOverrides {
            name: Some("Test Person".to_string()),
            skills: Some(vec![SkillGroup {
                category: "Only".to_string(),
                items: vec!["One".to_string()],
            }]),
            ..Default::default()
        };
        let merged = customize(&base, &overrides);
        assert_eq!(merged.name, "Test Person");
        assert_eq!(merged.skills.len(), 1);
        assert_eq!(merged.skills[0].category, "Only");
        // Untouched fields come from the base.
        assert_eq!(merged.experience, base.experience);
        // The base itself is unchanged.
        assert_eq!(base.name, "Elena Vasquez");
    }

    #[test]
    fn profile_json_roundtrip() {
        let profile = default_profile();
        let json = serde_json::to_string(&profile).unwrap();
        let parsed: ProfileData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn contribution_serde_uses_display_vocabulary() {
        let json = serde_json::to_string(&Contribution::FullStack).unwrap();
        assert_eq!(json, "\"Full-Stack\"");
        assert_eq!(Contribution::FullStack.label(), "Full-Stack");
    }
}
