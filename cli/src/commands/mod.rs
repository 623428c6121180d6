pub mod bounds;
pub mod group;
pub mod plan;
pub mod viewport;
