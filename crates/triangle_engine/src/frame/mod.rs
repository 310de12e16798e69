//! Frame loop
//!
//! Everything between "window is open" and "window is closed": deriving the
//! viewport and projection from the framebuffer each frame, the rotation
//! animation, the lifecycle state machine and the driver that ties them to a
//! window and a renderer.

pub mod driver;
pub mod geometry;
pub mod lifecycle;
pub mod transform;

pub use driver::{FrameLoop, FrameStats, StepOutcome};
pub use geometry::{FrameGeometry, Viewport};
pub use lifecycle::{Lifecycle, LifecycleError, LifecycleState, Termination};
pub use transform::{rotation_degrees, FrameTransform};
