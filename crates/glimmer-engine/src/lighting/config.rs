use crate::coords::Resolution;

use super::error::{LightingError, LightingResult};

/// Window options consumed by the runtime.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub title: String,
    pub fullscreen: bool,
    pub resizable: bool,
    /// No window decorations.
    pub frameless: bool,
    /// Composite at the largest integer multiple of the native resolution.
    pub integer_scale: bool,
    /// Requested color depth in bits. wgpu picks the surface format itself,
    /// so this is logged and otherwise ignored.
    pub depth: u32,
    /// Monitor index used for fullscreen.
    pub display: usize,
    pub vsync: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "glimmer".to_string(),
            fullscreen: false,
            resizable: false,
            frameless: false,
            integer_scale: false,
            depth: 0,
            display: 0,
            vsync: true,
        }
    }
}

/// Resolutions and fixed capacities of a [`LightingEngine`](super::LightingEngine).
///
/// Every GPU resource is sized from this once at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window size in physical pixels.
    pub screen_res: Resolution,
    /// Size of the background and foreground layers.
    pub native_res: Resolution,
    /// Size of the accumulator and the blurred lightmap.
    pub lightmap_res: Resolution,

    pub max_lights: usize,
    pub max_hulls: usize,
    pub max_vertices: usize,

    pub display: DisplayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let screen = Resolution::new(1280, 720);
        Self {
            screen_res: screen,
            native_res: screen,
            lightmap_res: screen.scaled_by(0.4),
            max_lights: 64,
            max_hulls: 256,
            max_vertices: 1024,
            display: DisplayConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Config with all three resolutions given and default capacities.
    pub fn new(
        screen_res: impl Into<Resolution>,
        native_res: impl Into<Resolution>,
        lightmap_res: impl Into<Resolution>,
    ) -> Self {
        Self {
            screen_res: screen_res.into(),
            native_res: native_res.into(),
            lightmap_res: lightmap_res.into(),
            ..Default::default()
        }
    }

    /// Checks resolutions and capacities against `max_texture_dimension`.
    pub fn validate(&self, max_texture_dimension: u32) -> LightingResult<()> {
        for (name, res) in [
            ("screen", self.screen_res),
            ("native", self.native_res),
            ("lightmap", self.lightmap_res),
        ] {
            if !res.is_valid() {
                return Err(LightingError::config(format!(
                    "{name} resolution must be non-zero, got {}x{}",
                    res.width, res.height
                )));
            }
            if res.width > max_texture_dimension || res.height > max_texture_dimension {
                return Err(LightingError::config(format!(
                    "{name} resolution {}x{} exceeds the device limit of {max_texture_dimension}",
                    res.width, res.height
                )));
            }
        }

        for (name, cap) in [
            ("max_lights", self.max_lights),
            ("max_hulls", self.max_hulls),
            ("max_vertices", self.max_vertices),
        ] {
            if cap == 0 {
                return Err(LightingError::config(format!("{name} must be at least 1")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate(8192).is_ok());
        assert_eq!(cfg.lightmap_res, Resolution::new(512, 288));
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let cfg = EngineConfig::new((640, 360), (0, 180), (160, 90));
        let err = cfg.validate(8192).unwrap_err();
        assert!(matches!(err, LightingError::InvalidConfig(ref m) if m.contains("native")));
    }

    #[test]
    fn oversized_resolution_is_rejected() {
        let cfg = EngineConfig::new((640, 360), (320, 180), (16384, 90));
        assert!(matches!(cfg.validate(8192), Err(LightingError::InvalidConfig(_))));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let cfg = EngineConfig {
            max_hulls: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(8192), Err(LightingError::InvalidConfig(_))));
    }
}
