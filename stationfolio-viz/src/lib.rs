//! Animated canvas scenes for the stationfolio site
//!
//! This crate provides WASM bindings for mounting the rotating station and the
//! background starfield on canvas elements. The geometry, projection and
//! simulation modules are plain Rust and are tested natively.

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

pub mod canvas2d;
pub mod clock;
pub mod geometry;
pub mod projector;
pub mod raster;
pub mod runtime;
pub mod scene;
pub mod starfield;
pub mod station;
pub mod surface;
pub mod viewport;

use canvas2d::SurfaceError;
use runtime::{Container, MountOptions, SceneHandle};
use scene::{StarfieldScene, StationScene};
use starfield::StarfieldConfig;
use station::StationConfig;

/// Initialize WASM panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::try_set_as_global_default().ok();
}

/// Parse an optional JSON override; missing fields keep their defaults
fn parse_config<T: DeserializeOwned + Default>(json: Option<String>) -> Result<T, SurfaceError> {
    match json.as_deref().map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(json) => Ok(serde_json::from_str(json)?),
    }
}

/// Mount the rotating station on a canvas sized to its parent element.
///
/// Returns `undefined` if the canvas has no 2D context.
#[wasm_bindgen]
pub fn mount_station(
    canvas: web_sys::HtmlCanvasElement,
    config_json: Option<String>,
) -> Result<Option<SceneHandle>, JsValue> {
    let config: StationConfig = parse_config(config_json)?;
    let options = MountOptions {
        container: Container::Parent,
        track_pointer: true,
    };
    Ok(runtime::mount(canvas, StationScene::new(config), options)?)
}

/// Mount the starfield on a canvas sized to the window.
///
/// Returns `undefined` if the canvas has no 2D context.
#[wasm_bindgen]
pub fn mount_starfield(
    canvas: web_sys::HtmlCanvasElement,
    config_json: Option<String>,
) -> Result<Option<SceneHandle>, JsValue> {
    let config: StarfieldConfig = parse_config(config_json)?;
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    let epoch = js_sys::Date::now() / 1000.0;
    let options = MountOptions {
        container: Container::Window,
        track_pointer: false,
    };
    Ok(runtime::mount(canvas, StarfieldScene::new(config, seed, epoch), options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let config: StationConfig = parse_config(None).unwrap();
        assert_eq!(config, StationConfig::default());

        let config: StarfieldConfig = parse_config(Some("  ".to_string())).unwrap();
        assert_eq!(config, StarfieldConfig::default());
    }

    #[test]
    fn partial_config_overrides_named_fields() {
        let json = r#"{"rotation_speed": 0.001, "shading": {"depth_offset": 400, "depth_span": 800}}"#;
        let config: StationConfig = parse_config(Some(json.to_string())).unwrap();

        assert_eq!(config.rotation_speed, 0.001);
        assert_eq!(config.shading.depth_offset, 400.0);
        assert_eq!(config.shading.depth_span, 800.0);
        assert_eq!(config.module_count, 12);
        assert_eq!(config.projector.fov, 1200.0);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let result: Result<StarfieldConfig, _> = parse_config(Some("{not json".to_string()));
        assert!(matches!(result, Err(SurfaceError::Config(_))));
    }
}
