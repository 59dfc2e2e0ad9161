//! Pipeline reconcile: open the missing task for any lead whose current
//! stage has none.
//!
//! The resolver spawns the next task in the same transaction as the stage
//! advance, so gaps only appear after manual surgery on the database or a
//! crash between releases. This binary closes them idempotently; running it
//! twice is safe. Set LEADLINE_DRY_RUN=1 to only report what would change.

use leadline::db::CrmDb;
use leadline::services::tasks::reconcile_missing_tasks;

fn main() {
    env_logger::init();

    let dry_run = std::env::var("LEADLINE_DRY_RUN").is_ok_and(|v| v == "1");

    let db = match CrmDb::open() {
        Ok(db) => db,
        Err(e) => {
            log::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    if dry_run {
        match db.leads_missing_stage_task() {
            Ok(missing) => {
                log::info!("dry run: {} lead(s) missing a stage task", missing.len());
                for lead in missing {
                    log::info!("  {} ({}) at stage {}", lead.id, lead.name, lead.stage);
                }
            }
            Err(e) => {
                log::error!("Scan failed: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    match reconcile_missing_tasks(&db, 3) {
        Ok(0) => log::info!("reconcile: nothing to do"),
        Ok(spawned) => log::info!("reconcile: spawned {spawned} task(s)"),
        Err(e) => {
            log::error!("Reconcile failed: {e}");
            std::process::exit(1);
        }
    }
}
