mod feature_id;
mod layer_id;

pub use feature_id::{FeatureId, FeatureStateKey};
pub use layer_id::LayerId;
