//! Given steps for daily triage BDD scenarios.

use super::world::TriageWorld;
use heijunka::task::domain::{Priority, WipLimits};
use rstest_bdd_macros::given;

#[given("the WIP limits are {p1_max:u32} P1 and {p2_max:u32} P2")]
fn wip_limits_are(world: &mut TriageWorld, p1_max: u32, p2_max: u32) -> Result<(), eyre::Report> {
    world.limits = Some(
        WipLimits::new(p1_max, p2_max).map_err(|err| eyre::eyre!("invalid limits: {err}"))?,
    );
    Ok(())
}

#[given(r#"a queued P1 task "{label}" for owner "{owner}" created {age_days:u32} days ago"#)]
fn queued_p1_task(
    world: &mut TriageWorld,
    label: String,
    owner: String,
    age_days: u32,
) -> Result<(), eyre::Report> {
    world.seed_queued(&label, &owner, Priority::P1, age_days)
}

#[given(r#"a queued P3 task "{label}" for owner "{owner}" created {age_days:u32} days ago"#)]
fn queued_p3_task(
    world: &mut TriageWorld,
    label: String,
    owner: String,
    age_days: u32,
) -> Result<(), eyre::Report> {
    world.seed_queued(&label, &owner, Priority::P3, age_days)
}
