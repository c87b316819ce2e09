mod floors;
mod frame;
mod types;
mod walls;

pub use frame::{Visit, render_frame, walk_tree};
pub use types::{Screen, ViewState};
