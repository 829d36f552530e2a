//! Subcommand implementations

use anyhow::Result;
use riskmap_cli::output::{format_count, format_duration, risk_badge, Status};
use riskmap_core::config::Config;
use riskmap_core::error::Error;
use riskmap_core::filter::RiskFilter;
use riskmap_core::model::{RiskLevel, Shop};
use riskmap_core::prelude::DistanceLabel;
use riskmap_core::render::{GeoJsonRenderer, MapScene};
use riskmap_core::repository::{InMemoryRepository, Repository};
use riskmap_core::resolver::{
    rank_centers, resolve, resolve_all, resolve_by_id, shops_within_radius, NearestResult,
};
use riskmap_core::stats::RiskStats;
use riskmap_telemetry::{metrics, Event, MetricsSnapshot, Timer};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;

/// Shared state for one command invocation
pub struct Context<'a> {
    pub config: &'a Config,
    pub repository: &'a InMemoryRepository,
    pub json: bool,
}

impl Context<'_> {
    fn emit(&self, value: &Value) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn nearest_json(result: &NearestResult) -> Value {
    json!({
        "shop": result.shop,
        "center": result.center,
        "distance_km": result.distance_km,
        "label": result.label().to_string(),
    })
}

fn shop_line(shop: &Shop) -> String {
    format!("{:>4}  {} {}  {}", shop.id, shop.risk.emoji(), risk_badge(shop.risk), shop.name)
}

pub fn centers(ctx: &Context<'_>) -> Result<()> {
    let centers = ctx.repository.centers();
    if ctx.json {
        return ctx.emit(&serde_json::to_value(centers)?);
    }

    Status::header(&format!("Distribution centers ({})", centers.len()));
    for center in centers {
        println!("{:>4}  {}  ({})", center.id, center.name, center.location);
    }
    Ok(())
}

pub fn center(ctx: &Context<'_>, id: i64) -> Result<()> {
    let center = ctx
        .repository
        .get_center(id)?
        .ok_or_else(|| Error::center_not_found(id))?;
    let radius_m = ctx.config.schema.map.coverage_radius_m;
    let covered = shops_within_radius(&center, ctx.repository.shops(), radius_m);

    if ctx.json {
        return ctx.emit(&json!({
            "center": center,
            "coverage_radius_m": radius_m,
            "shops": covered,
        }));
    }

    Status::header(&center.name);
    Status::field("ID", &center.id.to_string());
    Status::field("Location", &center.location.to_string());
    Status::field("Coverage radius", &format!("{radius_m} m"));

    Status::subheader(&format!(
        "{} within coverage",
        format_count(covered.len(), "shop", "shops")
    ));
    for entry in &covered {
        let label = DistanceLabel::from_km(entry.distance_km);
        println!("{}  {}", shop_line(&entry.shop), label);
    }
    Ok(())
}

pub fn shops(ctx: &Context<'_>, filter: &RiskFilter) -> Result<()> {
    let all = ctx.repository.shops();
    let visible = filter.apply(all);

    if ctx.json {
        return ctx.emit(&serde_json::to_value(&visible)?);
    }

    Status::header(&format!("Shops ({} of {})", visible.len(), all.len()));
    for shop in visible {
        println!("{}", shop_line(shop));
    }
    Ok(())
}

pub fn shop(ctx: &Context<'_>, id: i64) -> Result<()> {
    let shop = ctx
        .repository
        .get_shop(id)?
        .ok_or_else(|| Error::shop_not_found(id))?;
    let result = resolve(&shop, ctx.repository.centers())?;
    metrics().increment("resolutions");

    if ctx.json {
        return ctx.emit(&nearest_json(&result));
    }

    Status::header(&shop.name);
    Status::field("ID", &shop.id.to_string());
    Status::field("Location", &shop.location.to_string());
    Status::field("Risk", &format!("{} {}", shop.risk.emoji(), risk_badge(shop.risk)));
    if !shop.analysis.is_empty() {
        Status::field("Analysis", &shop.analysis);
    }

    Status::subheader("Nearest center");
    Status::field("Center", &format!("{} (#{})", result.center.name, result.center.id));
    Status::field("Distance", &result.label().to_string());
    Ok(())
}

pub fn nearest(ctx: &Context<'_>, shop_id: i64, top: Option<usize>) -> Result<()> {
    let Some(limit) = top else {
        let result =
            resolve_by_id(ctx.repository, shop_id)?.ok_or_else(|| Error::shop_not_found(shop_id))?;
        metrics().increment("resolutions");

        if ctx.json {
            return ctx.emit(&nearest_json(&result));
        }
        Status::success(&format!(
            "{} → {}: {}",
            result.shop.name,
            result.center.name,
            result.label()
        ));
        return Ok(());
    };

    if limit == 0 {
        return Err(Error::validation("--top must be at least 1").into());
    }

    let shop = ctx
        .repository
        .get_shop(shop_id)?
        .ok_or_else(|| Error::shop_not_found(shop_id))?;
    let centers = ctx.repository.centers();
    if centers.is_empty() {
        return Err(Error::empty_candidate_set().into());
    }
    let ranked = rank_centers(&shop, centers, Some(limit));

    if ctx.json {
        let entries: Vec<Value> = ranked
            .iter()
            .map(|r| {
                json!({
                    "center": r.center,
                    "distance_km": r.distance_km,
                    "label": DistanceLabel::from_km(r.distance_km).to_string(),
                })
            })
            .collect();
        return ctx.emit(&json!({ "shop": shop, "centers": entries }));
    }

    Status::header(&format!("Closest centers to {}", shop.name));
    for (rank, entry) in ranked.iter().enumerate() {
        println!(
            "{:>3}. {} (#{})  {}",
            rank + 1,
            entry.center.name,
            entry.center.id,
            DistanceLabel::from_km(entry.distance_km)
        );
    }
    Ok(())
}

pub fn nearest_all(ctx: &Context<'_>, filter: &RiskFilter) -> Result<()> {
    let timer = Timer::start("resolve.batch");
    let results = resolve_all(ctx.repository, filter)?;
    let elapsed = timer.stop();
    metrics().increment_by("resolutions", results.len() as u64);

    if ctx.json {
        let entries: Vec<Value> = results.iter().map(nearest_json).collect();
        return ctx.emit(&Value::Array(entries));
    }

    Status::header("Nearest centers");
    for result in &results {
        println!(
            "{}  →  {}  {}",
            shop_line(&result.shop),
            result.center.name,
            result.label()
        );
    }
    Status::info(&format!(
        "Resolved {} in {}",
        format_count(results.len(), "shop", "shops"),
        format_duration(elapsed)
    ));
    Ok(())
}

pub fn stats(ctx: &Context<'_>, filter: &RiskFilter) -> Result<()> {
    let stats = RiskStats::compute(ctx.repository.shops(), filter, &ctx.config.schema.risk);

    if ctx.json {
        return ctx.emit(&serde_json::to_value(&stats)?);
    }

    Status::header("Risk overview");
    Status::field("Total shops", &stats.total_shops.to_string());
    Status::field("Visible shops", &stats.visible_shops.to_string());
    for level in RiskLevel::ASSESSED {
        Status::field(level.label(), &stats.counts.get(level).to_string());
    }
    if stats.counts.unknown > 0 {
        Status::field(RiskLevel::Unknown.label(), &stats.counts.unknown.to_string());
    }
    Status::alert(stats.alert, stats.high_risk_pct);
    Ok(())
}

pub fn render(
    ctx: &Context<'_>,
    center_id: i64,
    shop_id: Option<i64>,
    filter: &RiskFilter,
    output: Option<&Path>,
) -> Result<()> {
    let focus = ctx
        .repository
        .get_center(center_id)?
        .ok_or_else(|| Error::center_not_found(center_id))?;

    let selection = match shop_id {
        Some(id) => {
            Some(resolve_by_id(ctx.repository, id)?.ok_or_else(|| Error::shop_not_found(id))?)
        }
        None => None,
    };
    if let Some(result) = selection.as_ref().filter(|r| !filter.allows(r.shop.risk)) {
        Status::warning(&format!(
            "Shop {} is hidden by the risk filter; no path drawn",
            result.shop.id
        ));
    }

    let scene = MapScene::build(
        &focus,
        ctx.repository.shops(),
        filter,
        selection.as_ref(),
        &ctx.config.schema.map,
    );
    let collection = GeoJsonRenderer::render(&scene);
    let text = serde_json::to_string_pretty(&collection)?;

    Event::new(
        "map_rendered",
        json!({ "center_id": center_id, "shop_id": shop_id, "layers": scene.layers.len() }),
    )
    .log();

    match output {
        Some(path) => {
            std::fs::write(path, text).map_err(|e| {
                Error::io(format!("Failed to write {}", path.display())).with_source(e)
            })?;
            if !ctx.json {
                Status::success(&format!(
                    "Wrote {} to {}",
                    format_count(scene.layers.len(), "feature", "features"),
                    path.display()
                ));
            }
        }
        None => println!("{text}"),
    }
    Ok(())
}

pub fn validate(ctx: &Context<'_>) -> Result<()> {
    let centers = ctx.repository.centers().len();
    let shops = ctx.repository.shops();
    let unknown = ctx.repository.shops_by_risk(RiskLevel::Unknown)?.len();

    if ctx.json {
        return ctx.emit(&json!({
            "valid": true,
            "config": ctx.config.path,
            "data": ctx.config.schema.data.path,
            "centers": centers,
            "shops": shops.len(),
            "unknown_risk": unknown,
        }));
    }

    Status::field("Config", ctx.config.path.as_deref().unwrap_or("(defaults)"));
    Status::field("Dataset", &ctx.config.schema.data.path);
    if centers == 0 && !shops.is_empty() {
        Status::warning("Dataset has no centers; nearest-center lookups will fail");
    }
    if unknown > 0 {
        Status::warning(&format!(
            "{} without a recognized risk level",
            format_count(unknown, "shop", "shops")
        ));
    }
    Status::success(&format!(
        "Dataset is valid: {}, {}",
        format_count(centers, "center", "centers"),
        format_count(shops.len(), "shop", "shops")
    ));
    Ok(())
}

/// Counters and timings collected during the run, shown with `--verbose`
pub fn print_metrics(snapshot: &MetricsSnapshot) {
    Status::subheader("Metrics");
    Status::field("Session", &snapshot.session_id);
    Status::field("Elapsed", &format_duration(snapshot.uptime));
    for (name, value) in &snapshot.counters {
        Status::field(name, &value.to_string());
    }
    for (name, timing) in &snapshot.timings {
        Status::field(
            name,
            &format!(
                "{} run(s), mean {}, max {}",
                timing.count,
                format_duration(Duration::from_secs_f64(timing.mean_ms() / 1000.0)),
                format_duration(Duration::from_secs_f64(timing.max_ms / 1000.0))
            ),
        );
    }
}
