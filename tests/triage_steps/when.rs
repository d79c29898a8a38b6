//! When steps for daily triage BDD scenarios.

use super::world::{TriageWorld, run_async};
use rstest_bdd_macros::when;

#[when("the daily triage runs")]
fn daily_triage_runs(world: &mut TriageWorld) -> Result<(), eyre::Report> {
    let triage = world.triage()?;
    let report = run_async(triage.run()).map_err(|err| eyre::eyre!("triage run failed: {err}"))?;
    world.last_report = Some(report);
    Ok(())
}
