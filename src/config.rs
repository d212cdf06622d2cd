use std::path::PathBuf;

use crate::draw::Color;

/// Environment variable naming a TTF/OTF file for panel labels.
pub const FONT_ENV_VAR: &str = "TRANSFORM_LAB_FONT";

/// Environment variable fixing the seed of randomly placed scene content.
pub const SEED_ENV_VAR: &str = "TRANSFORM_LAB_SEED";

/// Configuration for the viewer window.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Clear color behind the scene.
    pub background: Color,
    /// Font used for panel labels. Without one, widgets draw without text.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    /// Camera units moved per frame while a movement key is held.
    pub movement_speed: f32,
    /// Seed for random points and orbit pools. `None` picks a fresh one.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "transform-lab".to_string(),
            width: 1000,
            height: 900,
            background: Color::OFF_WHITE,
            font_path: None,
            font_size: 16.0,
            movement_speed: 0.1,
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the font path taken from `TRANSFORM_LAB_FONT` and the
    /// seed from `TRANSFORM_LAB_SEED` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(FONT_ENV_VAR).filter(|p| !p.is_empty()) {
            config = config.font(path);
        }
        if let Ok(raw) = std::env::var(SEED_ENV_VAR) {
            match parse_seed(&raw) {
                Some(seed) => config = config.seed(seed),
                None => log::warn!("ignoring {SEED_ENV_VAR}={raw:?}, expected an unsigned integer"),
            }
        }
        config
    }

    /// The configured seed, or a random one.
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn parse_seed(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}
