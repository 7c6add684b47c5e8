//! OneRoster entity schemas used to build per-collection filter compilers.
//!
//! Each collection service hands its [`EntityType::compiler`] the client's
//! raw `filter` parameter. The allow-list comes from the built-in field
//! tables in [`fields`], adjusted by `[entities.<name>]` sections of the
//! [`FilterConfig`].

pub mod fields;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::FilterConfig;
use crate::filters::{FieldAllowList, FieldType, FieldTypes, FilterCompiler};
use fields::{
    ACADEMIC_SESSION_FIELDS, CLASS_FIELDS, COMMON_FIELDS, COURSE_FIELDS, DEMOGRAPHIC_FIELDS,
    ENROLLMENT_FIELDS, ORG_FIELDS, USER_FIELDS,
};

/// OneRoster rostering collections that accept a `filter` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
    Users,
    Orgs,
    Classes,
    Courses,
    Enrollments,
    AcademicSessions,
    Demographics,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Unknown entity type: '{0}' (valid: users, orgs, classes, courses, enrollments, academicSessions, demographics)"
)]
pub struct UnknownEntityType(pub String);

impl EntityType {
    pub const ALL: [EntityType; 7] = [
        EntityType::Users,
        EntityType::Orgs,
        EntityType::Classes,
        EntityType::Courses,
        EntityType::Enrollments,
        EntityType::AcademicSessions,
        EntityType::Demographics,
    ];

    /// Collection name as it appears in OneRoster endpoint paths
    pub fn name(self) -> &'static str {
        match self {
            EntityType::Users => "users",
            EntityType::Orgs => "orgs",
            EntityType::Classes => "classes",
            EntityType::Courses => "courses",
            EntityType::Enrollments => "enrollments",
            EntityType::AcademicSessions => "academicSessions",
            EntityType::Demographics => "demographics",
        }
    }

    fn own_fields(self) -> &'static [(&'static str, FieldType)] {
        match self {
            EntityType::Users => USER_FIELDS,
            EntityType::Orgs => ORG_FIELDS,
            EntityType::Classes => CLASS_FIELDS,
            EntityType::Courses => COURSE_FIELDS,
            EntityType::Enrollments => ENROLLMENT_FIELDS,
            EntityType::AcademicSessions => ACADEMIC_SESSION_FIELDS,
            EntityType::Demographics => DEMOGRAPHIC_FIELDS,
        }
    }

    /// Built-in filterable fields, common fields first
    pub fn fields(self) -> impl Iterator<Item = (&'static str, FieldType)> {
        COMMON_FIELDS.iter().chain(self.own_fields()).copied()
    }

    /// Filterable fields and their types after applying config overrides
    ///
    /// `extra_fields` are added as strings, `array_fields` are added or
    /// re-typed as arrays, and `disabled_fields` are removed last.
    pub fn field_types(self, config: &FilterConfig) -> FieldTypes {
        let mut types: FieldTypes =
            self.fields().map(|(name, ty)| (name.to_string(), ty)).collect();

        if let Some(overrides) = config.entity(self) {
            for name in &overrides.extra_fields {
                types.entry(name.clone()).or_insert(FieldType::String);
            }
            for name in &overrides.array_fields {
                types.insert(name.clone(), FieldType::Array);
            }
            for name in &overrides.disabled_fields {
                types.remove(name);
            }
        }

        types
    }

    pub fn allow_list(self, config: &FilterConfig) -> FieldAllowList {
        self.field_types(config).into_keys().collect()
    }

    /// Compiler restricted to this collection's fields
    pub fn compiler(self, config: &FilterConfig) -> FilterCompiler {
        let types = self.field_types(config);
        let allowed: FieldAllowList = types.keys().cloned().collect();

        FilterCompiler::new()
            .with_limits(&config.limits)
            .with_allowed_fields(allowed)
            .with_field_types(types)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts collection names case-insensitively, singular or plural, with
/// optional `-`/`_` separators (`academic-sessions`, `academic_session`)
impl FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            s.trim().chars().filter(|c| *c != '-' && *c != '_').collect::<String>().to_lowercase();

        match normalized.as_str() {
            "users" | "user" => Ok(EntityType::Users),
            "orgs" | "org" => Ok(EntityType::Orgs),
            "classes" | "class" => Ok(EntityType::Classes),
            "courses" | "course" => Ok(EntityType::Courses),
            "enrollments" | "enrollment" => Ok(EntityType::Enrollments),
            "academicsessions" | "academicsession" => Ok(EntityType::AcademicSessions),
            "demographics" | "demographic" => Ok(EntityType::Demographics),
            _ => Err(UnknownEntityType(s.to_string())),
        }
    }
}
