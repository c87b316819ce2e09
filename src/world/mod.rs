mod camera;
mod geometry;
mod level;

pub use camera::{Camera, Frustum};
pub use geometry::{
    EPS, Facing, JOIN_EPS, Side, Wall, line_intersection, segment_intersection,
};
pub use level::{Boundary, Level};
