//! Cursor Trail Animation
//!
//! Decorative ribbon following the pointer. Independent of the form core.

pub mod animator;
pub mod buffer;
pub mod ribbon;

pub use animator::{FrameSink, RunningTrail, TrailAnimator, TrailInput};
pub use buffer::{Point, PointerTrail, DEFAULT_TRAIL_CAPACITY};
pub use ribbon::{compute_frame, Frame, RibbonLayer, RibbonStyle, Viewport};
