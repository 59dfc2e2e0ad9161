use super::*;

impl CrmDb {
    // =========================================================================
    // Appointments (scheduling provider bookings)
    // =========================================================================

    fn map_appointment_row(row: &rusqlite::Row) -> rusqlite::Result<DbAppointment> {
        Ok(DbAppointment {
            id: row.get(0)?,
            lead_id: row.get(1)?,
            provider_event_id: row.get(2)?,
            title: row.get(3)?,
            start_time: row.get(4)?,
            end_time: row.get(5)?,
            status: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    /// Sync a booking event into the appointments table, keyed by the
    /// provider's event id so repeated webhook deliveries stay idempotent.
    pub fn sync_appointment(
        &self,
        appointment: &DbAppointment,
    ) -> Result<BookingSyncOutcome, DbError> {
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM appointments WHERE provider_event_id = ?1",
                params![appointment.provider_event_id],
                |row| row.get(0),
            )
            .ok();

        match existing {
            Some(id) => {
                let now = Utc::now().to_rfc3339();
                self.conn.execute(
                    "UPDATE appointments SET
                        title = ?1, start_time = ?2, end_time = ?3, status = ?4,
                        updated_at = ?5
                     WHERE id = ?6",
                    params![
                        appointment.title,
                        appointment.start_time,
                        appointment.end_time,
                        appointment.status,
                        now,
                        id,
                    ],
                )?;
                Ok(BookingSyncOutcome::Updated)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO appointments (
                        id, lead_id, provider_event_id, title, start_time, end_time,
                        status, created_at, updated_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        appointment.id,
                        appointment.lead_id,
                        appointment.provider_event_id,
                        appointment.title,
                        appointment.start_time,
                        appointment.end_time,
                        appointment.status,
                        appointment.created_at,
                        appointment.updated_at,
                    ],
                )?;
                Ok(BookingSyncOutcome::New)
            }
        }
    }

    /// Get an appointment by the provider's event id.
    pub fn get_appointment_by_event(
        &self,
        provider_event_id: &str,
    ) -> Result<Option<DbAppointment>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, provider_event_id, title, start_time, end_time,
                    status, created_at, updated_at
             FROM appointments
             WHERE provider_event_id = ?1",
        )?;
        let mut rows = stmt.query_map(params![provider_event_id], Self::map_appointment_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Appointments for a lead, soonest first.
    pub fn list_lead_appointments(&self, lead_id: &str) -> Result<Vec<DbAppointment>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, provider_event_id, title, start_time, end_time,
                    status, created_at, updated_at
             FROM appointments
             WHERE lead_id = ?1
             ORDER BY start_time ASC",
        )?;
        let rows = stmt.query_map(params![lead_id], Self::map_appointment_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?);
        }
        Ok(appointments)
    }
}
