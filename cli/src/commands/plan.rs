use anyhow::Result;
use slackmap::{LegendConfig, MapConfig, Planner};

pub fn run(config: &MapConfig, args: &crate::cli::PlanArgs) -> Result<()> {
    let mut legend = LegendConfig {
        spots: args.spots,
        lines: args.lines,
        guides: args.guides,
        communities: args.communities,
    };
    if legend == LegendConfig::default() {
        legend = LegendConfig::slacklines();
    }
    let clustering = config.clustering.enabled && !args.no_cluster;

    let plan = Planner::from_config(config).plan(&legend, clustering, args.exclude.as_deref());
    tracing::info!(mode = ?plan.mode, sources = plan.static_sources.len(), "planned");

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
