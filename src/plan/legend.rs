use serde::{Deserialize, Serialize};

/// Feature categories toggled on in the map legend. Missing keys read as off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub spots: bool,
    pub lines: bool,
    /// Recognized but not backed by a source yet.
    pub guides: bool,
    pub communities: bool,
}

impl LegendConfig {
    /// Spots and lines on, as the map opens.
    pub fn slacklines() -> Self {
        Self { spots: true, lines: true, ..Self::default() }
    }

    pub fn communities() -> Self {
        Self { communities: true, ..Self::default() }
    }
}

/// Which family of sources a legend selects. The two never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    Slacklines,
    Communities,
}

impl From<&LegendConfig> for PlanMode {
    fn from(legend: &LegendConfig) -> Self {
        if legend.communities { PlanMode::Communities } else { PlanMode::Slacklines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_default_to_off() {
        let legend: LegendConfig = serde_json::from_str(r#"{ "spots": true, "extra": 1 }"#).unwrap();
        assert_eq!(legend, LegendConfig { spots: true, ..LegendConfig::default() });
    }

    #[test]
    fn communities_flag_selects_mode() {
        assert_eq!(PlanMode::from(&LegendConfig::slacklines()), PlanMode::Slacklines);
        let both = LegendConfig { communities: true, ..LegendConfig::slacklines() };
        assert_eq!(PlanMode::from(&both), PlanMode::Communities);
    }
}
