use crate::config::HoverParams;
use crate::math::approach;
use crate::pool::CubeEntity;

/// Eases scale, emissive color, emissive intensity and the opacity boost one
/// tick toward their hovered or resting targets.
pub fn ease_hover(cube: &mut CubeEntity, params: &HoverParams) {
    if cube.hovered {
        let target = cube.resting_scale * params.scale_factor;
        cube.scale = approach(cube.scale, target, params.scale_rate);
        cube.emissive = cube.emissive.lerp(cube.hover_color, params.color_rate_in);
        cube.emissive_intensity =
            (cube.emissive_intensity + params.intensity_step_in).min(params.intensity_ceiling);
        cube.opacity_boost =
            (cube.opacity_boost + params.opacity_step_in).min(params.opacity_boost_max);
    } else {
        cube.scale = approach(cube.scale, cube.resting_scale, params.scale_rate);
        cube.emissive = cube.emissive.lerp(cube.rest_emissive, params.color_rate_out);
        cube.emissive_intensity =
            (cube.emissive_intensity - params.intensity_step_out).max(params.intensity_floor);
        cube.opacity_boost = (cube.opacity_boost - params.opacity_step_out).max(0.0);
    }
}
