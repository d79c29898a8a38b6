//! Then steps for daily triage BDD scenarios.

use super::world::TriageWorld;
use heijunka::task::domain::TaskStatus;
use rstest_bdd_macros::then;

#[then(r#"task "{label}" is active"#)]
fn task_is_active(world: &TriageWorld, label: String) -> Result<(), eyre::Report> {
    let status = world.status_of(&label)?;
    if status != TaskStatus::Active {
        return Err(eyre::eyre!("expected {label} active, found {:?}", status));
    }
    Ok(())
}

#[then(r#"task "{label}" is queued"#)]
fn task_is_queued(world: &TriageWorld, label: String) -> Result<(), eyre::Report> {
    let status = world.status_of(&label)?;
    if status != TaskStatus::Queued {
        return Err(eyre::eyre!("expected {label} queued, found {:?}", status));
    }
    Ok(())
}

#[then("the report counts {promoted:usize} promotions")]
fn report_counts_promotions(world: &TriageWorld, promoted: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .ok_or_else(|| eyre::eyre!("missing triage report in scenario world"))?;
    if report.tasks_promoted != promoted {
        return Err(eyre::eyre!(
            "expected {promoted} promotions, found {}",
            report.tasks_promoted
        ));
    }
    Ok(())
}
