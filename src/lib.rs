use wasm_bindgen::prelude::*;

pub mod animation;
pub mod camera;
pub mod config;
pub mod formation;
pub mod interaction;
pub mod math;
pub mod particles;
pub mod scene;

use camera::{ViewMode, Viewport};
use config::SceneConfig;
use interaction::{InteractionRouter, integrity};
use math::Vec3;
use particles::FrameTime;
use scene::TreeScene;

/// Longest frame step the scene is advanced by; covers tabs waking from sleep
const MAX_FRAME_STEP: f32 = 0.25;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    console_log::init_with_level(log::Level::Info).ok();
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct ChaosTree {
    scene: TreeScene,
    router: InteractionRouter,
    time: f32,
}

#[wasm_bindgen]
impl ChaosTree {
    /// Create an engine with the default scene
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<ChaosTree, JsValue> {
        Self::build(SceneConfig::default(), width, height)
    }

    /// Create an engine from a YAML scene description
    #[wasm_bindgen]
    pub fn with_config_yaml(yaml: &str, width: f32, height: f32) -> Result<ChaosTree, JsValue> {
        let config = SceneConfig::from_yaml(yaml)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::build(config, width, height)
    }

    fn build(config: SceneConfig, width: f32, height: f32) -> Result<ChaosTree, JsValue> {
        let router = InteractionRouter::new(&config.input, &config.spin);
        let scene = TreeScene::new(config, Viewport::new(width, height))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            scene,
            router,
            time: 0.0,
        })
    }

    /// Advance one frame
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        let dt = frame_step(dt);
        self.time += dt;
        self.scene
            .advance(self.router.snapshot(), FrameTime::new(self.time, dt));
    }

    /// Resize the canvas; non-finite sizes are ignored
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) {
        if !width.is_finite() || !height.is_finite() {
            log::warn!("ignoring non-finite canvas size {}x{}", width, height);
            return;
        }
        self.scene.resize(Viewport::new(width, height));
    }

    // === Input ===

    #[wasm_bindgen]
    pub fn on_wheel(&mut self, delta_y: f32) {
        self.router.wheel(delta_y);
    }

    #[wasm_bindgen]
    pub fn on_touch_start(&mut self, x: f32, y: f32) {
        self.router.touch_start(x, y);
    }

    #[wasm_bindgen]
    pub fn on_touch_move(&mut self, x: f32, y: f32) {
        self.router.touch_move(x, y);
    }

    #[wasm_bindgen]
    pub fn on_touch_end(&mut self) {
        self.router.touch_end();
    }

    #[wasm_bindgen]
    pub fn on_pointer_down(&mut self) {
        self.router.pointer_down();
    }

    #[wasm_bindgen]
    pub fn on_pointer_up(&mut self) {
        self.router.pointer_up();
    }

    /// Pointer move in normalized device coordinates; returns whether the
    /// star is hovered
    #[wasm_bindgen]
    pub fn on_pointer_move(&mut self, ndc_x: f32, ndc_y: f32) -> bool {
        self.router.pointer_move(ndc_x);
        if !ndc_x.is_finite() || !ndc_y.is_finite() {
            return self.scene.star().is_hovered();
        }
        self.scene.hover(ndc_x, ndc_y)
    }

    /// Click in normalized device coordinates; returns true if the star was hit
    #[wasm_bindgen]
    pub fn on_click(&mut self, ndc_x: f32, ndc_y: f32) -> bool {
        if !ndc_x.is_finite() || !ndc_y.is_finite() {
            return false;
        }
        match self.scene.click(ndc_x, ndc_y) {
            Some(event) => {
                self.router.apply(event);
                true
            }
            None => false,
        }
    }

    /// Return from the top-down view
    #[wasm_bindgen]
    pub fn reset_view(&mut self) {
        self.router.reset_view();
    }

    // === Buffers ===

    /// 7 floats per point: position, size, colour
    #[wasm_bindgen]
    pub fn foliage_data(&self) -> Vec<f32> {
        self.scene.foliage().point_data()
    }

    #[wasm_bindgen]
    pub fn ornament_matrices(&self) -> Vec<f32> {
        self.scene.ornaments().instance_matrices()
    }

    /// 3 floats per ornament
    #[wasm_bindgen]
    pub fn ornament_colors(&self) -> Vec<f32> {
        self.scene.ornaments().instance_colors()
    }

    #[wasm_bindgen]
    pub fn photo_matrices(&self) -> Vec<f32> {
        self.scene.photos().instance_matrices()
    }

    #[wasm_bindgen]
    pub fn star_matrix(&self) -> Vec<f32> {
        self.scene.star().instance_matrix()
    }

    /// Colour, emissive colour and emissive intensity of the star (7 floats)
    #[wasm_bindgen]
    pub fn star_material(&self) -> Vec<f32> {
        let look = self.scene.star().look();
        let mut data = Vec::with_capacity(7);
        data.extend_from_slice(&look.color.to_array());
        data.extend_from_slice(&look.emissive.to_array());
        data.push(look.emissive_intensity);
        data
    }

    /// Rotation of the whole group about the vertical axis, as a matrix
    #[wasm_bindgen]
    pub fn group_matrix(&self) -> Vec<f32> {
        self.scene.group_matrix().as_slice().to_vec()
    }

    #[wasm_bindgen]
    pub fn view_matrix(&self) -> Vec<f32> {
        self.scene.camera_view().view_matrix().as_slice().to_vec()
    }

    #[wasm_bindgen]
    pub fn projection_matrix(&self) -> Vec<f32> {
        self.scene.camera_view().projection_matrix().as_slice().to_vec()
    }

    // === State ===

    #[wasm_bindgen]
    pub fn camera_position(&self) -> Vec<f32> {
        vec3_data(self.scene.camera().position())
    }

    #[wasm_bindgen]
    pub fn camera_target(&self) -> Vec<f32> {
        vec3_data(self.scene.camera().look_at())
    }

    /// Group yaw in radians
    #[wasm_bindgen]
    pub fn group_rotation(&self) -> f32 {
        self.scene.group_yaw()
    }

    /// Target progress (0 = chaos, 1 = tree)
    #[wasm_bindgen]
    pub fn progress(&self) -> f32 {
        self.router.snapshot().progress
    }

    #[wasm_bindgen]
    pub fn status_label(&self) -> String {
        self.router.snapshot().status().label().to_string()
    }

    /// Progress as a whole percentage
    #[wasm_bindgen]
    pub fn integrity(&self) -> u32 {
        integrity(self.router.snapshot().progress)
    }

    #[wasm_bindgen]
    pub fn is_top_down(&self) -> bool {
        self.router.snapshot().view_mode == ViewMode::TopDown
    }

    #[wasm_bindgen]
    pub fn is_star_hovered(&self) -> bool {
        self.scene.star().is_hovered()
    }

    #[wasm_bindgen]
    pub fn instructions_visible(&self) -> bool {
        self.router.instructions_visible()
    }

    #[wasm_bindgen]
    pub fn foliage_count(&self) -> usize {
        self.scene.foliage().count()
    }

    #[wasm_bindgen]
    pub fn ornament_count(&self) -> usize {
        self.scene.ornaments().count()
    }

    #[wasm_bindgen]
    pub fn photo_count(&self) -> usize {
        self.scene.photos().count()
    }
}

/// Sanitize a host frame delta
fn frame_step(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_STEP)
    } else {
        0.0
    }
}

fn vec3_data(v: Vec3) -> Vec<f32> {
    v.to_array().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_step() {
        assert_eq!(frame_step(0.016), 0.016);
        assert_eq!(frame_step(-1.0), 0.0);
        assert_eq!(frame_step(f32::NAN), 0.0);
        assert_eq!(frame_step(30.0), MAX_FRAME_STEP);
    }

    #[test]
    fn test_engine_forms_and_reports() {
        let yaml = "seed: 3\nfoliage:\n  count: 100\nornaments:\n  count: 10\nphotos:\n  count: 4\n";
        let mut tree = ChaosTree::with_config_yaml(yaml, 1280.0, 720.0).unwrap();
        assert_eq!(tree.status_label(), "COMPLETE FORM");
        assert_eq!(tree.integrity(), 100);
        assert!(tree.instructions_visible());

        for _ in 0..600 {
            tree.render(1.0 / 60.0);
        }
        assert_eq!(tree.foliage_data().len(), 100 * 7);
        assert_eq!(tree.ornament_matrices().len(), 10 * 16);
        assert_eq!(tree.ornament_colors().len(), 10 * 3);
        assert_eq!(tree.photo_matrices().len(), 4 * 16);
        assert_eq!(tree.star_matrix().len(), 16);
        assert_eq!(tree.star_material().len(), 7);

        tree.on_wheel(-1000.0);
        assert_eq!(tree.status_label(), "CHAOS DETECTED");
        assert_eq!(tree.integrity(), 0);
        assert!(!tree.instructions_visible());
    }

    #[test]
    fn test_collapsed_canvas_stays_finite() {
        let yaml = "seed: 5\nfoliage:\n  count: 20\nornaments:\n  count: 4\nphotos:\n  count: 2\n";
        let mut tree = ChaosTree::with_config_yaml(yaml, 0.0, 0.0).unwrap();
        tree.render(1.0 / 60.0);
        assert!(tree.projection_matrix().iter().all(|v| v.is_finite()));

        tree.resize(1280.0, 720.0);
        let before = tree.projection_matrix();
        tree.resize(f32::NAN, 720.0);
        assert_eq!(tree.projection_matrix(), before);

        tree.resize(0.0, 0.0);
        assert!(tree.projection_matrix().iter().all(|v| v.is_finite()));
        assert!(tree.view_matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_clicking_star_switches_to_top_down() {
        let yaml = "seed: 11\nfoliage:\n  count: 50\nornaments:\n  count: 5\nphotos:\n  count: 2\n";
        let mut tree = ChaosTree::with_config_yaml(yaml, 1280.0, 720.0).unwrap();
        for _ in 0..600 {
            tree.render(1.0 / 60.0);
        }

        assert!(!tree.on_click(-0.95, -0.95));
        assert!(!tree.is_top_down());

        // Formed star projects a little above the centre of a landscape view
        let view = tree.scene.camera_view();
        let star = tree.scene.star_world_position();
        let eye_space = view.view_matrix().transform_point(star);
        let half = (view.fov_y / 2.0).tan();
        let ndc_x = eye_space.x / (-eye_space.z * half * view.aspect);
        let ndc_y = eye_space.y / (-eye_space.z * half);

        assert!(tree.on_pointer_move(ndc_x, ndc_y));
        assert!(tree.is_star_hovered());
        assert!(tree.on_click(ndc_x, ndc_y));
        assert!(tree.is_top_down());

        tree.reset_view();
        assert!(!tree.is_top_down());
    }
}
