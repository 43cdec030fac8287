use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::report::{NewReport as DomainNewReport, Report as DomainReport, ReportKind};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reports)]
pub struct Report {
    pub id: i32,
    pub profile_id: i32,
    pub kind: String,
    pub criteria: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reports)]
pub struct NewReport<'a> {
    pub profile_id: i32,
    pub kind: &'a str,
    pub criteria: &'a str,
    pub content: &'a str,
    pub created_at: NaiveDateTime,
}

impl From<Report> for DomainReport {
    fn from(value: Report) -> Self {
        Self {
            id: value.id,
            profile_id: value.profile_id,
            kind: ReportKind::from_tag(&value.kind),
            criteria: value.criteria,
            content: value.content,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewReport> for NewReport<'a> {
    fn from(value: &'a DomainNewReport) -> Self {
        Self {
            profile_id: value.profile_id,
            kind: value.kind.as_str(),
            criteria: value.criteria.as_str(),
            content: value.content.as_str(),
            created_at: value.created_at,
        }
    }
}
