//! Interaction Module
//!
//! Pointer input, in two flavors:
//!
//! - surface-local movement drives the hover hit-test ([`hit_test`])
//! - viewport-wide movement drives the camera parallax target ([`PointerState`])

mod hit_test;
mod pointer;

pub use hit_test::{hit_test, pick};
pub use pointer::{PointerState, to_ndc};
