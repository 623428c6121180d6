use anyhow::{bail, Result};
use slackmap::{format_viewport_param, MapConfig, Viewport};

use crate::cli::ViewportCommand;

pub fn run(config: &MapConfig, command: &ViewportCommand) -> Result<()> {
    match command {
        ViewportCommand::Parse { query } => {
            let parsed = Viewport::parse(query);
            if parsed.is_none() {
                tracing::info!("no usable viewport in {query:?}, using the default");
            }
            let viewport = parsed.unwrap_or(config.default_viewport);
            println!("{}", serde_json::to_string(&viewport)?);
        }
        ViewportCommand::Format { longitude, latitude, zoom } => {
            if !longitude.is_finite() || !latitude.is_finite() {
                bail!("longitude and latitude must be finite");
            }
            println!("{}", format_viewport_param(*longitude, *latitude, *zoom));
        }
    }
    Ok(())
}
