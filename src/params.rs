use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::core::Vec3;

/// Normalized, renderer-ready scene produced by the mapper.
///
/// Derived once per descriptor and immutable afterwards. Mapping is a pure
/// function of the descriptor except for `generated_at`, which is excluded
/// from equality-style comparisons in tests.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneParameters {
    pub camera: CameraParams,
    pub character: CharacterParams,
    pub background: BackgroundParams,
    pub composition: CompositionGraph,
    pub effects: EffectProfile,
    pub generated_at: SystemTime,
}

impl SceneParameters {
    /// Neutral fallback scene used when a descriptor fails validation: a
    /// medium shot of an empty panel so the page as a whole still completes.
    pub fn neutral() -> Self {
        Self {
            camera: CameraParams::default(),
            character: CharacterParams::invisible(),
            background: BackgroundParams::invisible(),
            composition: CompositionGraph::default(),
            effects: EffectProfile::none(),
            generated_at: SystemTime::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraKind {
    CloseUp,
    Medium,
    Wide,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraParams {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees, always in `[10, 120]`.
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub kind: CameraKind,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.4, 5.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            fov: 50.0,
            near: 0.1,
            far: 100.0,
            kind: CameraKind::Medium,
        }
    }
}

/// Character record. Always fully populated; `visible == false` means the
/// renderer skips the figure but downstream code never sees missing fields.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CharacterParams {
    pub visible: bool,
    pub pose: String,
    pub expression: String,
    pub position: Vec3,
    /// Euler rotation in radians; only `y` (facing) is used by the renderer.
    pub rotation: Vec3,
    pub scale: f64,
    /// Free-form extracted attributes (clothing, hairstyle, ...).
    pub attributes: BTreeMap<String, String>,
}

impl CharacterParams {
    pub fn invisible() -> Self {
        Self {
            visible: false,
            pose: "neutral".to_string(),
            expression: "neutral".to_string(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            attributes: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKind {
    Bed,
    Window,
    Curtain,
    Desk,
    Chair,
    Lamp,
    Door,
}

/// One prop with its coarse qualitative placement in room space.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropPlacement {
    pub kind: PropKind,
    pub position: Vec3,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundParams {
    pub visible: bool,
    pub environment: String,
    pub lighting: String,
    pub props: Vec<PropPlacement>,
    /// Normalized RGB in [0,1] per channel.
    pub ambient_color: [f64; 3],
    pub light_intensity: f64,
}

impl BackgroundParams {
    pub fn invisible() -> Self {
        Self {
            visible: false,
            environment: "none".to_string(),
            lighting: "neutral".to_string(),
            props: Vec::new(),
            ambient_color: [0.92, 0.92, 0.94],
            light_intensity: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    Flat,
    DepthLayered,
}

/// One spatial keyword hit with the local text it was found in.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpatialRelation {
    pub object: String,
    pub keyword: String,
    pub context: String,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionGraph {
    pub layout: LayoutKind,
    pub relationships: Vec<SpatialRelation>,
    pub foreground: Vec<String>,
    pub midground: Vec<String>,
    pub background: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    None,
    Sepia,
    SoftGlow,
    Posterize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostProcess {
    Bloom,
    Vignette,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationProfile {
    None,
    Pulse,
    Waver,
    Flashback,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectProfile {
    pub filter: FilterKind,
    pub intensity: f64,
    pub post_processing: Vec<PostProcess>,
    pub animation: AnimationProfile,
}

impl EffectProfile {
    pub fn none() -> Self {
        Self {
            filter: FilterKind::None,
            intensity: 0.0,
            post_processing: Vec::new(),
            animation: AnimationProfile::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_scene_is_fully_populated() {
        let p = SceneParameters::neutral();
        assert!(!p.character.visible);
        assert_eq!(p.character.pose, "neutral");
        assert!(!p.background.visible);
        assert_eq!(p.background.props.len(), 0);
        assert!(p.camera.fov >= 10.0 && p.camera.fov <= 120.0);
        assert!(p.camera.near < p.camera.far);
    }

    #[test]
    fn params_serialize_roundtrip() {
        let p = SceneParameters::neutral();
        let s = serde_json::to_string(&p).unwrap();
        let back: SceneParameters = serde_json::from_str(&s).unwrap();
        assert_eq!(back.camera, p.camera);
        assert_eq!(back.character, p.character);
        assert_eq!(back.composition, p.composition);
    }
}
