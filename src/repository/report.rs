use diesel::prelude::*;

use crate::domain::report::{NewReport as DomainNewReport, Report as DomainReport, ReportListQuery};
use crate::models::report::{NewReport as DbNewReport, Report as DbReport};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ReportReader, ReportWriter};

impl ReportReader for DieselRepository {
    fn get_report_by_id(&self, id: i32, profile_id: i32) -> RepositoryResult<Option<DomainReport>> {
        use crate::schema::reports;

        let mut conn = self.conn()?;
        let report = reports::table
            .filter(reports::id.eq(id))
            .filter(reports::profile_id.eq(profile_id))
            .first::<DbReport>(&mut conn)
            .optional()?;

        Ok(report.map(DomainReport::from))
    }

    fn list_reports(&self, query: ReportListQuery) -> RepositoryResult<(usize, Vec<DomainReport>)> {
        use crate::schema::reports;

        let mut conn = self.conn()?;

        let mut count_query = reports::table
            .filter(reports::profile_id.eq(query.profile_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(kind) = query.kind {
            count_query = count_query.filter(reports::kind.eq(kind.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = reports::table
            .filter(reports::profile_id.eq(query.profile_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(kind) = query.kind {
            items = items.filter(reports::kind.eq(kind.as_str()));
        }

        items = items.order(reports::created_at.desc());

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_reports = items.load::<DbReport>(&mut conn)?;
        let reports = db_reports.into_iter().map(DomainReport::from).collect();

        Ok((total, reports))
    }
}

impl ReportWriter for DieselRepository {
    fn create_report(&self, new_report: &DomainNewReport) -> RepositoryResult<DomainReport> {
        use crate::schema::reports;

        let mut conn = self.conn()?;
        let insertable = DbNewReport::from(new_report);

        let created = diesel::insert_into(reports::table)
            .values(&insertable)
            .get_result::<DbReport>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_report(&self, report_id: i32, profile_id: i32) -> RepositoryResult<()> {
        use crate::schema::reports;

        let mut conn = self.conn()?;

        let target = reports::table
            .filter(reports::id.eq(report_id))
            .filter(reports::profile_id.eq(profile_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
