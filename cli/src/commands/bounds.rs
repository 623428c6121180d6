use anyhow::{Context, Result};
use slackmap::{compute_bounds, geometry_to_value, BoxArray, HttpSource, MapConfig, PointIndex};

pub fn run(config: &MapConfig, args: &crate::cli::BoundsArgs) -> Result<()> {
    let index = PointIndex::new();
    match &args.input {
        Some(path) => {
            let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            index.load_from_bytes(&bytes).with_context(|| format!("in {}", path.display()))?;
        }
        None => index.ensure_loaded(&HttpSource::new()?, &config.endpoints.clusters_main)?,
    }
    tracing::info!(features = index.len(), "point index loaded");

    let geometry = index.lookup(&args.id)
        .with_context(|| format!("No feature with id {:?} in the point collection", args.id))?;

    let padding = args.padding.unwrap_or(config.bounds_padding);
    let bounds = compute_bounds(&geometry, args.length, Some(padding))
        .with_context(|| format!("Feature {:?} has no extent", args.id))?;

    let out = serde_json::json!({
        "geometry": geometry_to_value(&geometry),
        "exact": BoxArray::from(bounds.exact),
        "margined": BoxArray::from(bounds.margined),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
