//! Scores one request file offline and prints the breakdown.
//!
//! Usage: `score_demo [path/to/request.json]` (defaults to `fixtures/sample_request.json`).
//! The file has the same shape as the `POST /score` body.

use std::fs;

use anyhow::Context;
use esg_scoring_engine::explain::signed;
use esg_scoring_engine::{compute_score, telemetry, Pillar, ScoreRequest, ScoringConfig};

const DEFAULT_REQUEST_PATH: &str = "fixtures/sample_request.json";

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init()?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_REQUEST_PATH.to_string());
    let raw = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let req: ScoreRequest =
        serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;

    let config = ScoringConfig::load()?;
    let result = compute_score(
        &req.entity_id,
        req.as_of,
        &req.sector,
        &req.documents,
        &config,
    );

    println!(
        "{} as of {} (sector '{}' -> {})",
        result.entity_id, result.as_of, result.sector, result.sector_used
    );
    for p in Pillar::ALL {
        let score = result.pillar(p);
        let expl = result.explanation.pillar(p);
        println!(
            "  {:<13} {:>5.2}  ({} docs, {} controversies)",
            p.label(),
            score.score,
            score.data_points_count,
            expl.controversy_count
        );
        for f in &expl.factors {
            println!("      {:>6}  {}", signed(f.impact), f.description);
        }
    }
    println!("  {:<13} {:>5.2}", "Composite", result.composite);
    for w in &result.warnings {
        println!("  skipped doc #{}: {}", w.index, w.message);
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
