mod event;
mod machine;

pub use event::{Cursor, Effect, Highlight, HighlightState, MapEvent};
pub use machine::{reduce, InteractionState};
