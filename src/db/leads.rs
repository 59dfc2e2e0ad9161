use super::*;
use crate::types::{FunnelSlice, RevenueSummary, Stage};

impl CrmDb {
    // =========================================================================
    // Leads
    // =========================================================================

    fn map_lead_row(row: &rusqlite::Row) -> rusqlite::Result<DbLead> {
        Ok(DbLead {
            id: row.get(0)?,
            name: row.get(1)?,
            company: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
            source: row.get(5)?,
            stage: row.get(6)?,
            qualification: row.get(7)?,
            response_status: row.get(8)?,
            owner_id: row.get(9)?,
            estimated_value: row.get(10)?,
            demo_count: row.get(11)?,
            next_stage_note: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
            converted_at: row.get(15)?,
        })
    }

    const LEAD_COLUMNS: &'static str =
        "id, name, company, email, phone, source, stage, qualification, response_status,
         owner_id, estimated_value, demo_count, next_stage_note, created_at, updated_at,
         converted_at";

    /// Get a single lead by its ID.
    pub fn get_lead(&self, id: &str) -> Result<Option<DbLead>, DbError> {
        let sql = format!("SELECT {} FROM leads WHERE id = ?1", Self::LEAD_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], Self::map_lead_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Insert or update a lead. Uses SQLite `ON CONFLICT` (upsert).
    pub fn upsert_lead(&self, lead: &DbLead) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO leads (
                id, name, company, email, phone, source, stage, qualification,
                response_status, owner_id, estimated_value, demo_count,
                next_stage_note, created_at, updated_at, converted_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                company = excluded.company,
                email = excluded.email,
                phone = excluded.phone,
                source = excluded.source,
                stage = excluded.stage,
                qualification = excluded.qualification,
                response_status = excluded.response_status,
                owner_id = excluded.owner_id,
                estimated_value = excluded.estimated_value,
                demo_count = excluded.demo_count,
                next_stage_note = excluded.next_stage_note,
                updated_at = excluded.updated_at,
                converted_at = excluded.converted_at",
            params![
                lead.id,
                lead.name,
                lead.company,
                lead.email,
                lead.phone,
                lead.source,
                lead.stage,
                lead.qualification,
                lead.response_status,
                lead.owner_id,
                lead.estimated_value,
                lead.demo_count,
                lead.next_stage_note,
                lead.created_at,
                lead.updated_at,
                lead.converted_at,
            ],
        )?;
        Ok(())
    }

    /// List board leads within a scope, most recently touched first.
    ///
    /// Absorbing stages are soft-excluded here; disqualified and junk leads
    /// stay in the store but never appear on the pipeline board.
    pub fn list_board_leads(&self, scope: &Scope) -> Result<Vec<DbLead>, DbError> {
        let sql = format!(
            "SELECT {} FROM leads
             WHERE stage NOT IN ('disqualified', 'junk')
               AND (?1 IS NULL OR owner_id = ?1)
             ORDER BY updated_at DESC",
            Self::LEAD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![scope.owner()], Self::map_lead_row)?;

        let mut leads = Vec::new();
        for row in rows {
            leads.push(row?);
        }
        Ok(leads)
    }

    /// Move a lead to a new stage, optionally recording a hand-off note.
    ///
    /// `converted_at` is stamped once, on the first arrival at Converted.
    pub fn update_lead_stage(
        &self,
        id: &str,
        stage: Stage,
        note: Option<&str>,
    ) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE leads SET
                stage = ?1,
                next_stage_note = COALESCE(?2, next_stage_note),
                converted_at = CASE
                    WHEN ?1 = 'converted' THEN COALESCE(converted_at, ?3)
                    ELSE converted_at
                END,
                updated_at = ?3
             WHERE id = ?4",
            params![stage.as_str(), note, now, id],
        )?;
        Ok(())
    }

    /// Record the first-call qualification verdict.
    pub fn set_lead_qualification(
        &self,
        id: &str,
        qualification: crate::types::Qualification,
    ) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE leads SET qualification = ?1, updated_at = ?2 WHERE id = ?3",
            params![qualification.as_str(), now, id],
        )?;
        Ok(())
    }

    /// Record the response-check verdict.
    pub fn set_lead_response_status(
        &self,
        id: &str,
        response_status: crate::types::ResponseStatus,
    ) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE leads SET response_status = ?1, updated_at = ?2 WHERE id = ?3",
            params![response_status.as_str(), now, id],
        )?;
        Ok(())
    }

    /// Set the demo session counter.
    pub fn set_lead_demo_count(&self, id: &str, demo_count: i32) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE leads SET demo_count = ?1, updated_at = ?2 WHERE id = ?3",
            params![demo_count, now, id],
        )?;
        Ok(())
    }

    /// Reassign a lead to a different salesperson (NULL clears ownership).
    pub fn assign_lead_owner(&self, id: &str, owner_id: Option<&str>) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE leads SET owner_id = ?1, updated_at = ?2 WHERE id = ?3",
            params![owner_id, now, id],
        )?;
        Ok(())
    }

    // =========================================================================
    // Dashboard aggregates
    // =========================================================================

    /// Per-stage lead counts for the funnel, in pipeline order. Stages with
    /// no leads still appear with a zero count.
    pub fn stage_funnel(&self, scope: &Scope) -> Result<Vec<FunnelSlice>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT stage, COUNT(*) FROM leads
             WHERE (?1 IS NULL OR owner_id = ?1)
             GROUP BY stage",
        )?;
        let rows = stmt.query_map(params![scope.owner()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = std::collections::HashMap::new();
        for row in rows {
            let (stage, count) = row?;
            counts.insert(stage, count);
        }

        let ordered = [
            Stage::New,
            Stage::Responded,
            Stage::DemoScheduled,
            Stage::DemoCompleted,
            Stage::Srs,
            Stage::Converted,
            Stage::Disqualified,
            Stage::Junk,
        ];
        Ok(ordered
            .into_iter()
            .map(|stage| FunnelSlice {
                stage,
                label: stage.label().to_string(),
                count: counts.get(stage.as_str()).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Revenue rollup for the dashboard header.
    pub fn revenue_summary(&self, scope: &Scope) -> Result<RevenueSummary, DbError> {
        let (converted_value, converted_count): (Option<f64>, i64) = self.conn.query_row(
            "SELECT SUM(estimated_value), COUNT(*) FROM leads
             WHERE stage = 'converted' AND (?1 IS NULL OR owner_id = ?1)",
            params![scope.owner()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let open_pipeline_value: Option<f64> = self.conn.query_row(
            "SELECT SUM(estimated_value) FROM leads
             WHERE stage NOT IN ('converted', 'disqualified', 'junk')
               AND (?1 IS NULL OR owner_id = ?1)",
            params![scope.owner()],
            |row| row.get(0),
        )?;

        let lost_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM leads
             WHERE stage IN ('disqualified', 'junk')
               AND (?1 IS NULL OR owner_id = ?1)",
            params![scope.owner()],
            |row| row.get(0),
        )?;

        let closed = converted_count + lost_count;
        let win_rate = if closed > 0 {
            Some(converted_count as f64 / closed as f64)
        } else {
            None
        };

        Ok(RevenueSummary {
            converted_value: converted_value.unwrap_or(0.0),
            open_pipeline_value: open_pipeline_value.unwrap_or(0.0),
            converted_count,
            lost_count,
            win_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{sample_lead, test_db};
    use super::*;
    use crate::types::{Qualification, ResponseStatus};

    #[test]
    fn test_upsert_and_get_lead() {
        let db = test_db();

        let lead = sample_lead("lead-001", "Acme Corp");
        db.upsert_lead(&lead).expect("upsert should succeed");

        let fetched = db.get_lead("lead-001").expect("get lead");
        assert!(fetched.is_some());
        let lead = fetched.unwrap();
        assert_eq!(lead.name, "Acme Corp");
        assert_eq!(lead.stage, "new");
        assert_eq!(lead.demo_count, 0);
    }

    #[test]
    fn test_get_lead_not_found() {
        let db = test_db();
        let result = db.get_lead("nonexistent").expect("get lead");
        assert!(result.is_none());
    }

    #[test]
    fn test_upsert_updates_existing() {
        let db = test_db();

        let mut lead = sample_lead("lead-002", "Original Name");
        db.upsert_lead(&lead).expect("first upsert");

        lead.name = "Updated Name".to_string();
        lead.estimated_value = Some(45_000.0);
        db.upsert_lead(&lead).expect("second upsert");

        let fetched = db.get_lead("lead-002").expect("get").unwrap();
        assert_eq!(fetched.name, "Updated Name");
        assert_eq!(fetched.estimated_value, Some(45_000.0));
    }

    #[test]
    fn test_board_excludes_absorbing_stages() {
        let db = test_db();

        db.upsert_lead(&sample_lead("lead-a", "Active Co")).expect("insert");

        let mut junk = sample_lead("lead-b", "Junk Co");
        junk.stage = "junk".to_string();
        db.upsert_lead(&junk).expect("insert");

        let mut disq = sample_lead("lead-c", "Disq Co");
        disq.stage = "disqualified".to_string();
        db.upsert_lead(&disq).expect("insert");

        let board = db.list_board_leads(&Scope::All).expect("board");
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].id, "lead-a");
    }

    #[test]
    fn test_scope_filters_by_owner() {
        let db = test_db();

        let mut mine = sample_lead("lead-mine", "Mine Co");
        mine.owner_id = Some("sp-alice".to_string());
        db.upsert_lead(&mine).expect("insert");

        let mut theirs = sample_lead("lead-theirs", "Theirs Co");
        theirs.owner_id = Some("sp-bob".to_string());
        db.upsert_lead(&theirs).expect("insert");

        let unowned = sample_lead("lead-unowned", "Unowned Co");
        db.upsert_lead(&unowned).expect("insert");

        let all = db.list_board_leads(&Scope::All).expect("all");
        assert_eq!(all.len(), 3);

        let scoped = db
            .list_board_leads(&Scope::OwnedBy("sp-alice".to_string()))
            .expect("scoped");
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].id, "lead-mine");
    }

    #[test]
    fn test_update_lead_stage_stamps_converted_at_once() {
        let db = test_db();
        db.upsert_lead(&sample_lead("lead-w", "Winner Co")).expect("insert");

        db.update_lead_stage("lead-w", Stage::Srs, Some("sent proposal"))
            .expect("advance");
        let lead = db.get_lead("lead-w").expect("get").unwrap();
        assert_eq!(lead.stage, "srs");
        assert_eq!(lead.next_stage_note, Some("sent proposal".to_string()));
        assert!(lead.converted_at.is_none());

        db.update_lead_stage("lead-w", Stage::Converted, None)
            .expect("convert");
        let lead = db.get_lead("lead-w").expect("get").unwrap();
        let first_converted_at = lead.converted_at.clone();
        assert!(first_converted_at.is_some());
        // Note survives a stage change with no new note
        assert_eq!(lead.next_stage_note, Some("sent proposal".to_string()));

        // A second write must not move the conversion timestamp
        db.update_lead_stage("lead-w", Stage::Converted, None)
            .expect("re-convert");
        let lead = db.get_lead("lead-w").expect("get").unwrap();
        assert_eq!(lead.converted_at, first_converted_at);
    }

    #[test]
    fn test_qualification_and_response_status() {
        let db = test_db();
        db.upsert_lead(&sample_lead("lead-q", "Qual Co")).expect("insert");

        db.set_lead_qualification("lead-q", Qualification::Unqualified)
            .expect("set qualification");
        db.set_lead_response_status("lead-q", ResponseStatus::Junk)
            .expect("set response status");

        let lead = db.get_lead("lead-q").expect("get").unwrap();
        assert_eq!(lead.qualification, Some("unqualified".to_string()));
        assert_eq!(lead.response_status, Some("junk".to_string()));
    }

    #[test]
    fn test_stage_funnel_includes_empty_stages() {
        let db = test_db();
        db.upsert_lead(&sample_lead("lead-1", "One")).expect("insert");
        let mut two = sample_lead("lead-2", "Two");
        two.stage = "srs".to_string();
        db.upsert_lead(&two).expect("insert");

        let funnel = db.stage_funnel(&Scope::All).expect("funnel");
        assert_eq!(funnel.len(), 8, "every stage appears");
        assert_eq!(funnel[0].stage, Stage::New);
        assert_eq!(funnel[0].count, 1);
        let srs = funnel.iter().find(|s| s.stage == Stage::Srs).unwrap();
        assert_eq!(srs.count, 1);
        let junk = funnel.iter().find(|s| s.stage == Stage::Junk).unwrap();
        assert_eq!(junk.count, 0);
    }

    #[test]
    fn test_revenue_summary() {
        let db = test_db();

        let mut won = sample_lead("lead-won", "Won Co");
        won.stage = "converted".to_string();
        won.estimated_value = Some(120_000.0);
        db.upsert_lead(&won).expect("insert");

        let mut open = sample_lead("lead-open", "Open Co");
        open.stage = "srs".to_string();
        open.estimated_value = Some(40_000.0);
        db.upsert_lead(&open).expect("insert");

        let mut lost = sample_lead("lead-lost", "Lost Co");
        lost.stage = "disqualified".to_string();
        db.upsert_lead(&lost).expect("insert");

        let revenue = db.revenue_summary(&Scope::All).expect("revenue");
        assert_eq!(revenue.converted_value, 120_000.0);
        assert_eq!(revenue.open_pipeline_value, 40_000.0);
        assert_eq!(revenue.converted_count, 1);
        assert_eq!(revenue.lost_count, 1);
        assert_eq!(revenue.win_rate, Some(0.5));
    }

    #[test]
    fn test_revenue_summary_empty_db() {
        let db = test_db();
        let revenue = db.revenue_summary(&Scope::All).expect("revenue");
        assert_eq!(revenue.converted_value, 0.0);
        assert_eq!(revenue.win_rate, None);
    }
}
