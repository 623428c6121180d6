mod groups;
mod load_once;
mod points;

pub use groups::{GroupDirectory, GroupInfo, GroupLink};
pub use points::PointIndex;
