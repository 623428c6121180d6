mod classify;
mod feature;

pub use classify::classify;
pub use feature::{DomainFeature, FeatureKind, FeatureRef, LENGTH_PROPERTY, ORIGINAL_ID_PROPERTY};
