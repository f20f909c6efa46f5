use {
    bodyrig::config::{config_path, load},
    color_eyre::Report,
    eyre::WrapErr as _,
};

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: bodyrig::Config,

    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl Config {
    pub fn load_default() -> Result<Self, Report> {
        match config_path() {
            Some(path) => load(&path).wrap_err_with(|| {
                format!("Failed to load config from '{}'", path.display())
            }),
            None => Ok(Config::default()),
        }
    }
}

/// Synthetic tracking session parameters.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ViewerConfig {
    /// Number of frames to play.
    #[serde(default = "default_frames")]
    pub frames: u32,

    #[serde(default = "default_fps")]
    pub fps: f32,

    /// Pace frames to `fps` instead of playing as fast as possible.
    #[serde(default)]
    pub realtime: bool,

    /// Peak swing of arms and legs, in radians.
    #[serde(default = "default_sway")]
    pub sway: f32,

    /// Forward drift of the body, in meters per second.
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,

    /// Sensor noise added to joint offsets, in meters.
    #[serde(default = "default_jitter")]
    pub jitter: f32,

    /// Frame at which the body anchor is removed.
    /// It is detected again half a second later.
    #[serde(default)]
    pub lose_tracking_at: Option<u32>,

    /// Report plane anchors alongside the body.
    #[serde(default = "default_foreign_anchors")]
    pub foreign_anchors: bool,

    /// Log skeleton state every this many frames.
    #[serde(default = "default_report_every")]
    pub report_every: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            frames: default_frames(),
            fps: default_fps(),
            realtime: false,
            sway: default_sway(),
            walk_speed: default_walk_speed(),
            jitter: default_jitter(),
            lose_tracking_at: None,
            foreign_anchors: default_foreign_anchors(),
            report_every: default_report_every(),
        }
    }
}

fn default_frames() -> u32 {
    300
}

fn default_fps() -> f32 {
    60.0
}

fn default_sway() -> f32 {
    std::f32::consts::PI / 8.0
}

fn default_walk_speed() -> f32 {
    0.3
}

fn default_jitter() -> f32 {
    0.002
}

fn default_foreign_anchors() -> bool {
    true
}

fn default_report_every() -> u32 {
    30
}
