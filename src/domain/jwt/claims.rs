//! Caller-supplied identity claims and their external claim names

use std::collections::BTreeMap;

use crate::domain::DomainError;

/// Identity attributes embedded into an issued token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub birthdate: Option<String>,
    pub gender: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
    /// Extra string claims merged after the mapped fields
    pub additional: BTreeMap<String, String>,
}

impl ClaimSet {
    /// Create a claim set with the required fields
    pub fn new(
        sub: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            sub: sub.into(),
            name: name.into(),
            email: email.into(),
            birthdate: None,
            gender: None,
            picture: None,
            locale: None,
            additional: BTreeMap::new(),
        }
    }

    pub fn with_birthdate(mut self, birthdate: impl Into<String>) -> Self {
        self.birthdate = Some(birthdate.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional.insert(name.into(), value.into());
        self
    }

    /// Ensure the required fields carry a value
    pub fn validate(&self) -> Result<(), DomainError> {
        for field in [ClaimField::Subject, ClaimField::Name, ClaimField::Email] {
            if self.value(field).is_none_or(str::is_empty) {
                return Err(DomainError::validation(format!(
                    "Claim field '{}' is required",
                    field.as_str()
                )));
            }
        }

        Ok(())
    }

    /// Value of a mapped field, `None` when an optional field is unset or empty
    pub fn value(&self, field: ClaimField) -> Option<&str> {
        let optional = match field {
            ClaimField::Subject => return Some(&self.sub),
            ClaimField::Name => return Some(&self.name),
            ClaimField::Email => return Some(&self.email),
            ClaimField::Birthdate => &self.birthdate,
            ClaimField::Gender => &self.gender,
            ClaimField::Picture => &self.picture,
            ClaimField::Locale => &self.locale,
        };

        optional.as_deref().filter(|value| !value.is_empty())
    }
}

/// Fields of a [`ClaimSet`] that map to external claim names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClaimField {
    Subject,
    Name,
    Email,
    Birthdate,
    Gender,
    Picture,
    Locale,
}

impl ClaimField {
    pub const ALL: [ClaimField; 7] = [
        Self::Subject,
        Self::Name,
        Self::Email,
        Self::Birthdate,
        Self::Gender,
        Self::Picture,
        Self::Locale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Name => "name",
            Self::Email => "email",
            Self::Birthdate => "birthdate",
            Self::Gender => "gender",
            Self::Picture => "picture",
            Self::Locale => "locale",
        }
    }
}

const STANDARD_CLAIM_NAMES: [(ClaimField, &str); 7] = [
    (ClaimField::Subject, "sub"),
    (ClaimField::Name, "name"),
    (ClaimField::Email, "email"),
    (ClaimField::Birthdate, "birthdate"),
    (ClaimField::Gender, "gender"),
    (ClaimField::Picture, "picture"),
    (ClaimField::Locale, "locale"),
];

/// Immutable table from claim field to external claim name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimMapping {
    entries: Vec<(ClaimField, String)>,
}

impl ClaimMapping {
    /// Override the external name of one field
    pub fn with_name(mut self, field: ClaimField, claim_name: impl Into<String>) -> Self {
        let claim_name = claim_name.into();

        if let Some(entry) = self.entries.iter_mut().find(|(f, _)| *f == field) {
            entry.1 = claim_name;
        }

        self
    }

    pub fn claim_name(&self, field: ClaimField) -> &str {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, name)| name.as_str())
            .unwrap_or_else(|| field.as_str())
    }

    /// External claim name and value pairs for the fields set on `claims`
    pub fn map<'a>(&'a self, claims: &'a ClaimSet) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries.iter().filter_map(move |(field, claim_name)| {
            claims
                .value(*field)
                .map(|value| (claim_name.as_str(), value))
        })
    }
}

impl Default for ClaimMapping {
    fn default() -> Self {
        Self {
            entries: STANDARD_CLAIM_NAMES
                .iter()
                .map(|(field, name)| (*field, name.to_string()))
                .collect(),
        }
    }
}
