//! Animation Module
//!
//! The per-frame step. [`AnimationScheduler::step`] runs once per display
//! refresh and, in order:
//!
//! 1. advances each cube by its motion profile ([`motion`]), including fading
//!    and recycling for the ascent profile
//! 2. spins it
//! 3. eases its hover visuals ([`hover`])
//! 4. lifts and wraps the particles ([`particles`])
//! 5. eases the camera toward the pointer parallax target

pub mod hover;
pub mod motion;
pub mod particles;
pub mod scheduler;

pub use hover::ease_hover;
pub use motion::{fade_opacity, recycle, step_ascent, step_oscillation};
pub use particles::step_particles;
pub use scheduler::{AnimationScheduler, StepReport};
