//! Filterable fields per OneRoster collection.
//!
//! Multi-valued references are exposed under flattened `...SourcedIds` names
//! and declared as arrays so `~` tests membership.

use crate::filters::FieldType::{self, Array, Boolean, Date, Number, String};

/// Fields every OneRoster object carries
pub const COMMON_FIELDS: &[(&str, FieldType)] =
    &[("sourcedId", String), ("status", String), ("dateLastModified", Date)];

pub const USER_FIELDS: &[(&str, FieldType)] = &[
    ("enabledUser", Boolean),
    ("username", String),
    ("userMasterIdentifier", String),
    ("givenName", String),
    ("familyName", String),
    ("middleName", String),
    ("preferredFirstName", String),
    ("preferredMiddleName", String),
    ("preferredLastName", String),
    ("pronouns", String),
    ("role", String),
    ("roles", Array),
    ("identifier", String),
    ("email", String),
    ("sms", String),
    ("phone", String),
    ("userIds", Array),
    ("agentSourcedIds", Array),
    ("orgSourcedIds", Array),
    ("grades", Array),
];

pub const ORG_FIELDS: &[(&str, FieldType)] = &[
    ("name", String),
    ("type", String),
    ("identifier", String),
    ("parentSourcedId", String),
    ("childSourcedIds", Array),
];

pub const CLASS_FIELDS: &[(&str, FieldType)] = &[
    ("title", String),
    ("classCode", String),
    ("classType", String),
    ("location", String),
    ("courseSourcedId", String),
    ("schoolSourcedId", String),
    ("termSourcedIds", Array),
    ("grades", Array),
    ("subjects", Array),
    ("subjectCodes", Array),
    ("periods", Array),
];

pub const COURSE_FIELDS: &[(&str, FieldType)] = &[
    ("title", String),
    ("courseCode", String),
    ("schoolYearSourcedId", String),
    ("orgSourcedId", String),
    ("grades", Array),
    ("subjects", Array),
    ("subjectCodes", Array),
];

pub const ENROLLMENT_FIELDS: &[(&str, FieldType)] = &[
    ("role", String),
    ("primary", Boolean),
    ("beginDate", Date),
    ("endDate", Date),
    ("userSourcedId", String),
    ("classSourcedId", String),
    ("schoolSourcedId", String),
];

pub const ACADEMIC_SESSION_FIELDS: &[(&str, FieldType)] = &[
    ("title", String),
    ("type", String),
    ("startDate", Date),
    ("endDate", Date),
    ("schoolYear", Number),
    ("parentSourcedId", String),
    ("childSourcedIds", Array),
];

pub const DEMOGRAPHIC_FIELDS: &[(&str, FieldType)] = &[
    ("birthDate", Date),
    ("sex", String),
    ("americanIndianOrAlaskaNative", Boolean),
    ("asian", Boolean),
    ("blackOrAfricanAmerican", Boolean),
    ("nativeHawaiianOrOtherPacificIslander", Boolean),
    ("white", Boolean),
    ("demographicRaceTwoOrMoreRaces", Boolean),
    ("hispanicOrLatinoEthnicity", Boolean),
    ("countryOfBirthCode", String),
    ("stateOfBirthAbbreviation", String),
    ("cityOfBirth", String),
    ("publicSchoolResidenceStatus", String),
];
