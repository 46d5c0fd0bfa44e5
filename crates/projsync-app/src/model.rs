// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::ids::ProjectId;

/// The four operator-editable string fields of a project, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectField {
    Name,
    Description,
    Status,
    Responsible,
}

impl ProjectField {
    pub const ALL: [Self; 4] = [
        Self::Name,
        Self::Description,
        Self::Status,
        Self::Responsible,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Status => "status",
            Self::Responsible => "responsible",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }
}

/// A project as returned by the server. The client only ever holds a copy of
/// the latest fetch; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(
        default,
        rename = "createdAt",
        alias = "created_at",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<PrimitiveDateTime>,
    #[serde(
        default,
        rename = "updatedAt",
        alias = "updated_at",
        deserialize_with = "lenient_timestamp"
    )]
    pub updated_at: Option<PrimitiveDateTime>,
}

impl ProjectRecord {
    pub fn new(id: ProjectId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            status: None,
            responsible: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn field(&self, field: ProjectField) -> Option<&str> {
        let value = match field {
            ProjectField::Name => &self.name,
            ProjectField::Description => &self.description,
            ProjectField::Status => &self.status,
            ProjectField::Responsible => &self.responsible,
        };
        value.as_deref()
    }
}

/// Request body for create and update. Absent fields are sent as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub responsible: Option<String>,
}

impl ProjectPayload {
    pub fn value(&self, field: ProjectField) -> Option<&str> {
        let value = match field {
            ProjectField::Name => &self.name,
            ProjectField::Description => &self.description,
            ProjectField::Status => &self.status,
            ProjectField::Responsible => &self.responsible,
        };
        value.as_deref()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Other(IgnoredAny),
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<PrimitiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
        Some(RawTimestamp::Other(_)) | None => None,
    })
}

/// Accepts RFC 3339 as well as offset-less local date-times with optional
/// fractional seconds.
pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(PrimitiveDateTime::new(parsed.date(), parsed.time()));
    }

    let whole_seconds = raw.split('.').next().unwrap_or(raw);
    PrimitiveDateTime::parse(
        whole_seconds,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            whole_seconds,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        )
    })
    .ok()
}

pub fn format_timestamp(value: PrimitiveDateTime) -> String {
    value
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_default()
}
