use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use fairplay::manager::{run_pass, PassOutcome};
use fairplay::models::{PlaylistItem, RelocationOp};
use fairplay::provider::InMemoryProvider;
use fairplay::reorder::ReorderPlan;

use super::load_snapshot;

const SIMULATED_USER: &str = "simulator";
const SIMULATED_PLAYLIST: &str = "simulated";

#[derive(Serialize)]
struct PlanReport<'a> {
    playing_index: usize,
    target: Vec<&'a str>,
    relocations: &'a [RelocationOp],
}

#[derive(Serialize)]
struct SimulationReport {
    outcome: PassOutcome,
    moves: Vec<RelocationOp>,
    items: Vec<PlaylistItem>,
}

/// Print the fair target ordering and the relocations that reach it
pub fn plan(input: &Path, playing_index: usize) -> Result<()> {
    let items = load_snapshot(input)?;
    let plan = ReorderPlan::build(&items, playing_index)?;

    tracing::debug!(
        tracks = items.len(),
        unplayed = plan.unplayed_len(),
        relocations = plan.relocations.len(),
        "Plan computed"
    );

    let report = PlanReport {
        playing_index,
        target: plan.target.track_ids(),
        relocations: &plan.relocations,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Run one pass against an in-memory copy of the snapshot and print the result
pub async fn simulate(input: &Path, playing: &str) -> Result<()> {
    let items = load_snapshot(input)?;
    let provider = InMemoryProvider::new(SIMULATED_USER).with_playlist(
        SIMULATED_PLAYLIST,
        SIMULATED_USER,
        items,
    );
    provider.set_playing(Some(playing)).await;

    let outcome = run_pass(&provider, SIMULATED_PLAYLIST, 0).await?;

    let report = SimulationReport {
        outcome,
        moves: provider.move_log().await.into_iter().map(|m| m.op).collect(),
        items: provider
            .items(SIMULATED_PLAYLIST)
            .await
            .context("Simulated playlist disappeared")?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
