use anyhow::{bail, Result};
use slackmap::{GroupDirectory, HttpSource, MapConfig};

pub fn run(config: &MapConfig, args: &crate::cli::GroupArgs) -> Result<()> {
    let source = HttpSource::new()?;
    let directory = GroupDirectory::new();

    let Some(group) = directory.find(&source, &config.endpoints.groups, &args.id)? else {
        bail!("No community group with id {:?} ({} known)", args.id, directory.len());
    };

    println!("{} ({})", group.name, group.id);
    println!("  location: {}, {}", group.lat, group.lng);
    println!("  updated:  {}", group.last_updated());
    for link in group.links() {
        println!("  {}: {}", link.label, link.url);
    }
    Ok(())
}
