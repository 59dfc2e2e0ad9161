use super::*;
use crate::types::TaskStatus;

impl CrmDb {
    // =========================================================================
    // Tasks
    // =========================================================================

    fn map_task_row(row: &rusqlite::Row) -> rusqlite::Result<DbTask> {
        Ok(DbTask {
            id: row.get(0)?,
            lead_id: row.get(1)?,
            title: row.get(2)?,
            stage: row.get(3)?,
            flow_kind: row.get(4)?,
            status: row.get(5)?,
            due_date: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
            completed_at: row.get(9)?,
        })
    }

    const TASK_COLUMNS: &'static str =
        "id, lead_id, title, stage, flow_kind, status, due_date, created_at, updated_at,
         completed_at";

    /// Get a single task by its ID.
    pub fn get_task(&self, id: &str) -> Result<Option<DbTask>, DbError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", Self::TASK_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], Self::map_task_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Insert a task row. Fails if a pending task already exists for the
    /// same lead and stage (partial unique index).
    pub fn insert_task(&self, task: &DbTask) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO tasks (
                id, lead_id, title, stage, flow_kind, status, due_date,
                created_at, updated_at, completed_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                task.id,
                task.lead_id,
                task.title,
                task.stage,
                task.flow_kind,
                task.status,
                task.due_date,
                task.created_at,
                task.updated_at,
                task.completed_at,
            ],
        )?;
        Ok(())
    }

    /// Insert a task unless the lead already has a pending one at the same
    /// stage. Returns true when a row was inserted.
    ///
    /// This is the duplicate guard behind idempotent next-task spawning; the
    /// partial unique index is the storage-level backstop for races.
    pub fn insert_task_if_no_pending(&self, task: &DbTask) -> Result<bool, DbError> {
        if self.has_pending_task(&task.lead_id, &task.stage)? {
            return Ok(false);
        }
        self.insert_task(task)?;
        Ok(true)
    }

    /// True when the lead has a pending task frozen at the given stage.
    pub fn has_pending_task(&self, lead_id: &str, stage: &str) -> Result<bool, DbError> {
        let exists: bool = self
            .conn
            .query_row(
                "SELECT 1 FROM tasks
                 WHERE lead_id = ?1 AND stage = ?2 AND status = 'pending'
                 LIMIT 1",
                params![lead_id, stage],
                |_row| Ok(true),
            )
            .unwrap_or(false);
        Ok(exists)
    }

    /// Mark a task as completed with the current timestamp.
    pub fn complete_task(&self, id: &str) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE tasks SET status = 'completed', completed_at = ?1, updated_at = ?1
             WHERE id = ?2",
            params![now, id],
        )?;
        Ok(())
    }

    /// Reopen a completed task, clearing the completed_at timestamp.
    pub fn reopen_task(&self, id: &str) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE tasks SET status = 'pending', completed_at = NULL, updated_at = ?1
             WHERE id = ?2",
            params![now, id],
        )?;
        Ok(())
    }

    /// Manual status edit from the task list view.
    pub fn set_task_status(&self, id: &str, status: TaskStatus) -> Result<(), DbError> {
        match status {
            TaskStatus::Completed => self.complete_task(id),
            TaskStatus::Pending => self.reopen_task(id),
        }
    }

    /// All tasks for a lead, newest first.
    pub fn list_lead_tasks(&self, lead_id: &str) -> Result<Vec<DbTask>, DbError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE lead_id = ?1 ORDER BY created_at DESC",
            Self::TASK_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![lead_id], Self::map_task_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Pending tasks across leads within a scope, due-soonest first.
    pub fn list_pending_tasks(&self, scope: &Scope) -> Result<Vec<DbTask>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.lead_id, t.title, t.stage, t.flow_kind, t.status, t.due_date,
                    t.created_at, t.updated_at, t.completed_at
             FROM tasks t
             JOIN leads l ON t.lead_id = l.id
             WHERE t.status = 'pending'
               AND (?1 IS NULL OR l.owner_id = ?1)
             ORDER BY
               CASE WHEN t.due_date IS NULL THEN 1 ELSE 0 END,
               t.due_date,
               t.created_at",
        )?;
        let rows = stmt.query_map(params![scope.owner()], Self::map_task_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Count of pending tasks within a scope.
    pub fn count_open_tasks(&self, scope: &Scope) -> Result<i64, DbError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks t
             JOIN leads l ON t.lead_id = l.id
             WHERE t.status = 'pending'
               AND (?1 IS NULL OR l.owner_id = ?1)",
            params![scope.owner()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count of pending tasks already past their due date.
    pub fn count_overdue_tasks(&self, scope: &Scope) -> Result<i64, DbError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks t
             JOIN leads l ON t.lead_id = l.id
             WHERE t.status = 'pending'
               AND t.due_date IS NOT NULL
               AND t.due_date < date('now')
               AND (?1 IS NULL OR l.owner_id = ?1)",
            params![scope.owner()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Leads whose current stage has no pending task. Feeds the reconcile
    /// binary; an empty result means the spawn path has kept up.
    pub fn leads_missing_stage_task(&self) -> Result<Vec<DbLead>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.name, l.company, l.email, l.phone, l.source, l.stage,
                    l.qualification, l.response_status, l.owner_id, l.estimated_value,
                    l.demo_count, l.next_stage_note, l.created_at, l.updated_at,
                    l.converted_at
             FROM leads l
             WHERE l.stage NOT IN ('converted', 'disqualified', 'junk')
               AND NOT EXISTS (
                 SELECT 1 FROM tasks t
                 WHERE t.lead_id = l.id AND t.stage = l.stage AND t.status = 'pending'
               )
             ORDER BY l.updated_at",
        )?;
        let rows = stmt.query_map([], |row| {
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
        })?;

        let mut leads = Vec::new();
        for row in rows {
            leads.push(row?);
        }
        Ok(leads)
    }
}
