use {
    palette::Srgb,
    std::path::{Path, PathBuf},
};

pub const CONFIG_PATH_VAR: &str = "BODYRIG_CONFIG_PATH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode config from RON: {source}")]
    Ron {
        #[from]
        source: ron::de::Error,
    },
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub skeleton: SkeletonConfig,
}

impl Config {
    pub fn from_ron(ron: &str) -> Result<Self, ConfigError> {
        Ok(ron::de::from_str(ron)?)
    }
}

/// Path in `BODYRIG_CONFIG_PATH`, or `./cfg.ron` if that file exists.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(path));
    }

    let path = PathBuf::from("./cfg.ron");
    if path.exists() {
        Some(path)
    } else {
        tracing::info!("No config at '{}', using defaults", path.display());
        None
    }
}

#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load<T>(path: impl AsRef<Path>) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned,
{
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    Ok(ron::de::from_reader(file)?)
}

/// Look of the skeleton overlay.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct SkeletonConfig {
    /// Radius of a full-size joint sphere, in meters.
    #[serde(default = "default_joint_radius")]
    pub joint_radius: f32,

    #[serde(default = "default_tracked_color")]
    pub tracked_color: [f32; 3],

    #[serde(default = "default_interpolated_color")]
    pub interpolated_color: [f32; 3],

    #[serde(default = "default_joint_roughness")]
    pub joint_roughness: f32,

    #[serde(default = "default_bone_diameter")]
    pub bone_diameter: f32,

    #[serde(default = "default_bone_color")]
    pub bone_color: [f32; 3],

    #[serde(default = "default_bone_roughness")]
    pub bone_roughness: f32,

    #[serde(default = "default_bone_metallic")]
    pub bone_metallic: bool,

    /// Scale bone cylinders along their axis to the joint distance.
    #[serde(default = "default_stretch_bones")]
    pub stretch_bones: bool,

    /// Segments around generated spheres and cylinders.
    #[serde(default = "default_mesh_detail")]
    pub mesh_detail: usize,
}

impl SkeletonConfig {
    pub fn tracked_color(&self) -> Srgb {
        srgb(self.tracked_color)
    }

    pub fn interpolated_color(&self) -> Srgb {
        srgb(self.interpolated_color)
    }

    pub fn bone_color(&self) -> Srgb {
        srgb(self.bone_color)
    }
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        SkeletonConfig {
            joint_radius: default_joint_radius(),
            tracked_color: default_tracked_color(),
            interpolated_color: default_interpolated_color(),
            joint_roughness: default_joint_roughness(),
            bone_diameter: default_bone_diameter(),
            bone_color: default_bone_color(),
            bone_roughness: default_bone_roughness(),
            bone_metallic: default_bone_metallic(),
            stretch_bones: default_stretch_bones(),
            mesh_detail: default_mesh_detail(),
        }
    }
}

fn srgb([red, green, blue]: [f32; 3]) -> Srgb {
    Srgb::new(red, green, blue)
}

fn default_joint_radius() -> f32 {
    0.05
}

fn default_tracked_color() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_interpolated_color() -> [f32; 3] {
    [1.0, 1.0, 0.0]
}

fn default_joint_roughness() -> f32 {
    0.8
}

fn default_bone_diameter() -> f32 {
    0.04
}

fn default_bone_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_bone_roughness() -> f32 {
    0.5
}

fn default_bone_metallic() -> bool {
    true
}

fn default_stretch_bones() -> bool {
    true
}

fn default_mesh_detail() -> usize {
    16
}
