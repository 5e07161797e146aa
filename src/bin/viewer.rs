//! Cube Field Viewer
//!
//! Opens a window with the animated field. Move the mouse to tilt the camera
//! and highlight cubes.
//!
//! Usage:
//!
//! ```text
//! cubefield-viewer [ascent|oscillation|<config.json>]
//! ```

use cubefield::app::App;
use cubefield::{FieldConfig, Profile};

fn main() -> cubefield::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        None => FieldConfig::default(),
        Some(arg) => match arg.parse::<Profile>() {
            Ok(profile) => FieldConfig::for_profile(profile),
            Err(_) => FieldConfig::from_json_file(&arg)?,
        },
    };

    App::new()
        .with_title(format!("Cube Field ({})", config.profile().name()))
        .with_config(config)
        .run()
}
