use super::*;

impl CrmDb {
    // =========================================================================
    // Activities (append-only)
    // =========================================================================

    fn map_activity_row(row: &rusqlite::Row) -> rusqlite::Result<DbActivity> {
        Ok(DbActivity {
            id: row.get(0)?,
            lead_id: row.get(1)?,
            task_id: row.get(2)?,
            salesperson_id: row.get(3)?,
            outcome: row.get(4)?,
            comment: row.get(5)?,
            from_stage: row.get(6)?,
            to_stage: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    /// Append an activity record. There is deliberately no update or delete
    /// counterpart; the table is the audit trail.
    pub fn insert_activity(&self, activity: &DbActivity) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO activities (
                id, lead_id, task_id, salesperson_id, outcome, comment,
                from_stage, to_stage, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                activity.id,
                activity.lead_id,
                activity.task_id,
                activity.salesperson_id,
                activity.outcome,
                activity.comment,
                activity.from_stage,
                activity.to_stage,
                activity.created_at,
            ],
        )?;
        Ok(())
    }

    /// Activity history for one lead, newest first.
    pub fn list_lead_activities(
        &self,
        lead_id: &str,
        limit: i64,
    ) -> Result<Vec<DbActivity>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, task_id, salesperson_id, outcome, comment,
                    from_stage, to_stage, created_at
             FROM activities
             WHERE lead_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![lead_id, limit], Self::map_activity_row)?;

        let mut activities = Vec::new();
        for row in rows {
            activities.push(row?);
        }
        Ok(activities)
    }

    /// Recent activity across leads within a scope, for the dashboard feed.
    pub fn recent_activities(
        &self,
        scope: &Scope,
        limit: i64,
    ) -> Result<Vec<DbActivity>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.lead_id, a.task_id, a.salesperson_id, a.outcome, a.comment,
                    a.from_stage, a.to_stage, a.created_at
             FROM activities a
             JOIN leads l ON a.lead_id = l.id
             WHERE (?1 IS NULL OR l.owner_id = ?1)
             ORDER BY a.created_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![scope.owner(), limit], Self::map_activity_row)?;

        let mut activities = Vec::new();
        for row in rows {
            activities.push(row?);
        }
        Ok(activities)
    }

    /// Count of activity rows for a lead. Used by resolver tests to assert
    /// exactly-one-append semantics.
    pub fn count_lead_activities(&self, lead_id: &str) -> Result<i64, DbError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM activities WHERE lead_id = ?1",
            params![lead_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
