//! Data-driven keyword and lookup tables for the mapper.
//!
//! Every table is an ordered slice of `{ patterns, effect }` rows matched
//! case-insensitively against the descriptor text, so matching order and
//! precedence are explicit and testable in isolation.

use crate::core::Vec3;
use crate::descriptor::{CameraAngle, VisualEffect};
use crate::params::{
    AnimationProfile, CameraKind, EffectProfile, FilterKind, PostProcess, PropKind,
};

/// Fixed camera profile per camera-angle enum value.
#[derive(Clone, Copy, Debug)]
pub struct CameraProfile {
    pub distance: f64,
    pub fov: f64,
    pub kind: CameraKind,
}

pub fn camera_profile(angle: CameraAngle) -> CameraProfile {
    match angle {
        CameraAngle::Near => CameraProfile {
            distance: 2.0,
            fov: 60.0,
            kind: CameraKind::CloseUp,
        },
        CameraAngle::Middle => CameraProfile {
            distance: 5.0,
            fov: 50.0,
            kind: CameraKind::Medium,
        },
        CameraAngle::Far => CameraProfile {
            distance: 10.0,
            fov: 40.0,
            kind: CameraKind::Wide,
        },
    }
}

/// One composition phrase and the camera nudge it contributes. Offsets are
/// additive and order-independent; no phrase cancels another.
pub struct CameraPhraseRule {
    pub name: &'static str,
    pub phrases: &'static [&'static str],
    pub position_offset: Vec3,
    pub target_offset: Vec3,
}

pub const CAMERA_PHRASES: &[CameraPhraseRule] = &[
    CameraPhraseRule {
        name: "pulled_back",
        phrases: &["pulled back view", "pulled-back view", "from a distance"],
        position_offset: Vec3::new(0.0, 0.4, 2.5),
        target_offset: Vec3::ZERO,
    },
    CameraPhraseRule {
        name: "whole_room",
        phrases: &["whole room visible", "entire room", "full view of the room"],
        position_offset: Vec3::new(0.0, 0.8, 3.5),
        target_offset: Vec3::new(0.0, -0.2, 0.0),
    },
    CameraPhraseRule {
        name: "subject_foreground",
        phrases: &["in foreground", "in the foreground"],
        position_offset: Vec3::new(0.0, 0.0, -0.6),
        target_offset: Vec3::new(0.0, 0.1, 0.0),
    },
    CameraPhraseRule {
        name: "subject_background",
        phrases: &["in background", "in the background"],
        position_offset: Vec3::new(0.0, 0.0, 0.8),
        target_offset: Vec3::new(0.0, 0.0, -0.5),
    },
    CameraPhraseRule {
        name: "gaze_up",
        phrases: &["looking up", "gazing up", "looks up"],
        position_offset: Vec3::new(0.0, -0.3, 0.0),
        target_offset: Vec3::new(0.0, 0.5, 0.0),
    },
    CameraPhraseRule {
        name: "gaze_down",
        phrases: &["looking down", "gazing down", "looks down"],
        position_offset: Vec3::new(0.0, 0.4, 0.0),
        target_offset: Vec3::new(0.0, -0.4, 0.0),
    },
    CameraPhraseRule {
        name: "gaze_window",
        phrases: &["looking out the window", "gazing out the window"],
        position_offset: Vec3::new(-0.5, 0.0, 0.0),
        target_offset: Vec3::new(0.8, 0.2, 0.0),
    },
    CameraPhraseRule {
        name: "gaze_away",
        phrases: &["looking away", "facing away", "turned away"],
        position_offset: Vec3::new(0.7, 0.0, 0.3),
        target_offset: Vec3::new(-0.3, 0.0, 0.0),
    },
];

/// One keyword row: any matching pattern yields `value`.
pub struct KeywordRule {
    pub patterns: &'static [&'static str],
    pub value: &'static str,
}

/// Character attribute table: the extracted value is stored under `key` in
/// the character's attribute map. Each table is scanned independently; the
/// first matching row per table wins.
pub struct AttributeTable {
    pub key: &'static str,
    pub rules: &'static [KeywordRule],
}

pub const ATTRIBUTE_TABLES: &[AttributeTable] = &[
    AttributeTable {
        key: "clothing",
        rules: &[
            KeywordRule { patterns: &["pajama", "nightgown", "nightwear"], value: "pajamas" },
            KeywordRule { patterns: &["school uniform", "uniform", "sailor suit"], value: "school_uniform" },
            KeywordRule { patterns: &["dress", "gown"], value: "dress" },
            KeywordRule { patterns: &["suit", "blazer", "jacket"], value: "suit" },
            KeywordRule { patterns: &["t-shirt", "tshirt", "shirt", "hoodie"], value: "casual" },
        ],
    },
    AttributeTable {
        key: "hairstyle",
        rules: &[
            KeywordRule { patterns: &["twin tail", "twintail", "pigtails"], value: "twin_tails" },
            KeywordRule { patterns: &["ponytail"], value: "ponytail" },
            KeywordRule { patterns: &["long hair"], value: "long" },
            KeywordRule { patterns: &["short hair", "bob cut", "cropped hair"], value: "short" },
            KeywordRule { patterns: &["messy hair", "bed hair", "bedhead"], value: "messy" },
        ],
    },
    AttributeTable {
        key: "expression",
        rules: &[
            KeywordRule { patterns: &["smiling", "smile", "laughing", "cheerful", "happy"], value: "happy" },
            KeywordRule { patterns: &["crying", "tearful", "tears", "sad", "downcast"], value: "sad" },
            KeywordRule { patterns: &["angry", "furious", "glaring", "scowl"], value: "angry" },
            KeywordRule { patterns: &["surprised", "shocked", "startled", "wide-eyed"], value: "surprised" },
            KeywordRule { patterns: &["worried", "anxious", "uneasy", "nervous"], value: "worried" },
        ],
    },
    AttributeTable {
        key: "pose",
        rules: &[
            KeywordRule { patterns: &["sitting up"], value: "sitting_up" },
            KeywordRule { patterns: &["sitting", "seated", "sits"], value: "sitting" },
            KeywordRule { patterns: &["lying", "lying down", "asleep", "sleeping"], value: "lying" },
            KeywordRule { patterns: &["walking", "strolling", "walks"], value: "walking" },
            KeywordRule { patterns: &["waving", "waves"], value: "waving" },
            KeywordRule { patterns: &["arms crossed", "crossed arms", "arms folded"], value: "arms_crossed" },
            KeywordRule { patterns: &["pointing", "points at"], value: "pointing" },
            KeywordRule { patterns: &["thinking", "pondering", "hand on chin"], value: "thinking" },
            KeywordRule { patterns: &["standing", "stands"], value: "standing" },
        ],
    },
    AttributeTable {
        key: "body_language",
        rules: &[
            KeywordRule { patterns: &["slumped", "hunched"], value: "slumped" },
            KeywordRule { patterns: &["upright", "straight-backed", "confident"], value: "upright" },
            KeywordRule { patterns: &["fidgeting", "restless"], value: "restless" },
            KeywordRule { patterns: &["relaxed", "at ease"], value: "relaxed" },
        ],
    },
    AttributeTable {
        key: "skin_tone",
        rules: &[
            KeywordRule { patterns: &["pale", "fair-skinned", "fair skin"], value: "pale" },
            KeywordRule { patterns: &["tan", "tanned"], value: "tan" },
            KeywordRule { patterns: &["dark skin", "dark-skinned", "brown skin"], value: "dark" },
        ],
    },
    AttributeTable {
        key: "facial_detail",
        rules: &[
            KeywordRule { patterns: &["glasses", "spectacles"], value: "glasses" },
            KeywordRule { patterns: &["freckles"], value: "freckles" },
            KeywordRule { patterns: &["blushing", "blush"], value: "blush" },
        ],
    },
];

/// Second-pass character phrase rules. Applied in order; later rules
/// override earlier ones for the same field.
pub struct CharacterPhraseRule {
    pub name: &'static str,
    pub phrases: &'static [&'static str],
    pub pose: Option<&'static str>,
    pub position: Option<Vec3>,
    pub rotation_y: Option<f64>,
}

pub const CHARACTER_PHRASES: &[CharacterPhraseRule] = &[
    CharacterPhraseRule {
        name: "sitting_up_from_bed",
        phrases: &["sitting up from bed", "sitting up in bed", "sits up in bed"],
        pose: Some("sitting_up"),
        position: Some(Vec3::new(0.3, 0.35, -0.6)),
        rotation_y: None,
    },
    CharacterPhraseRule {
        name: "lying_in_bed",
        phrases: &["lying in bed", "asleep in bed", "sleeping in bed"],
        pose: Some("lying"),
        position: Some(Vec3::new(0.3, 0.4, -0.6)),
        rotation_y: None,
    },
    CharacterPhraseRule {
        name: "by_the_window",
        phrases: &["by the window", "at the window", "beside the window"],
        pose: None,
        position: Some(Vec3::new(-1.0, 0.0, -0.8)),
        rotation_y: Some(std::f64::consts::FRAC_PI_4),
    },
    CharacterPhraseRule {
        name: "facing_away",
        phrases: &["facing away", "back turned", "from behind"],
        pose: None,
        position: None,
        rotation_y: Some(std::f64::consts::PI),
    },
    CharacterPhraseRule {
        name: "in_doorway",
        phrases: &["in the doorway", "at the door"],
        pose: Some("standing"),
        position: Some(Vec3::new(1.3, 0.0, -1.2)),
        rotation_y: None,
    },
];

pub const ENVIRONMENTS: &[KeywordRule] = &[
    KeywordRule { patterns: &["bedroom", "bed room"], value: "bedroom" },
    KeywordRule { patterns: &["classroom", "school"], value: "classroom" },
    KeywordRule { patterns: &["kitchen"], value: "kitchen" },
    KeywordRule { patterns: &["street", "road", "sidewalk"], value: "street" },
    KeywordRule { patterns: &["park", "garden"], value: "park" },
    KeywordRule { patterns: &["forest", "woods"], value: "forest" },
    KeywordRule { patterns: &["beach", "seaside", "shore"], value: "beach" },
    KeywordRule { patterns: &["office"], value: "office" },
    KeywordRule { patterns: &["room", "indoors", "interior"], value: "room" },
];

/// Prop table with coarse qualitative placement in room space (x right,
/// y up, z into the scene; the room is roughly 6x3x6 units).
pub struct PropRule {
    pub patterns: &'static [&'static str],
    pub kind: PropKind,
    pub position: Vec3,
}

pub const PROPS: &[PropRule] = &[
    PropRule { patterns: &["bed"], kind: PropKind::Bed, position: Vec3::new(0.6, 0.0, -0.8) },
    PropRule { patterns: &["window"], kind: PropKind::Window, position: Vec3::new(-1.6, 1.3, -2.6) },
    PropRule { patterns: &["curtain"], kind: PropKind::Curtain, position: Vec3::new(-2.3, 1.3, -2.5) },
    PropRule { patterns: &["desk", "table"], kind: PropKind::Desk, position: Vec3::new(1.8, 0.0, -2.0) },
    PropRule { patterns: &["chair", "stool"], kind: PropKind::Chair, position: Vec3::new(1.8, 0.0, -1.2) },
    PropRule { patterns: &["lamp", "light stand"], kind: PropKind::Lamp, position: Vec3::new(-1.9, 0.0, -1.6) },
    PropRule { patterns: &["door", "doorway"], kind: PropKind::Door, position: Vec3::new(2.6, 0.0, -2.7) },
];

/// Lighting rule: the FIRST matching row in this priority order supplies the
/// ambient color and intensity. Time-of-day rows come before adjectives.
pub struct LightingRule {
    pub patterns: &'static [&'static str],
    pub label: &'static str,
    pub ambient: [f64; 3],
    pub intensity: f64,
}

pub const LIGHTING: &[LightingRule] = &[
    LightingRule {
        patterns: &["morning", "sunrise", "dawn"],
        label: "morning",
        ambient: [1.0, 0.94, 0.82],
        intensity: 0.85,
    },
    LightingRule {
        patterns: &["noon", "midday", "daytime"],
        label: "noon",
        ambient: [1.0, 1.0, 0.96],
        intensity: 1.0,
    },
    LightingRule {
        patterns: &["sunset", "evening", "dusk"],
        label: "evening",
        ambient: [1.0, 0.72, 0.5],
        intensity: 0.65,
    },
    LightingRule {
        patterns: &["night", "midnight", "moonlight", "moonlit"],
        label: "night",
        ambient: [0.35, 0.4, 0.6],
        intensity: 0.3,
    },
    LightingRule {
        patterns: &["dim", "gloomy", "dark"],
        label: "dim",
        ambient: [0.5, 0.5, 0.55],
        intensity: 0.35,
    },
    LightingRule {
        patterns: &["bright", "sunlit", "sunny"],
        label: "bright",
        ambient: [1.0, 1.0, 0.9],
        intensity: 0.95,
    },
    LightingRule {
        patterns: &["warm", "cozy", "soft light"],
        label: "warm",
        ambient: [1.0, 0.88, 0.72],
        intensity: 0.7,
    },
];

/// Spatial keywords recorded into the composition graph.
pub const SPATIAL_WORDS: &[&str] = &[
    "foreground",
    "background",
    "front",
    "back",
    "behind",
    "left",
    "right",
    "above",
    "below",
    "up",
    "down",
];

/// Object keywords the composition scan recognizes.
pub const OBJECT_WORDS: &[&str] = &[
    "character", "girl", "boy", "figure", "bed", "curtain", "window", "light", "floor", "wall",
    "desk", "chair", "door", "lamp",
];

/// Fixed lookup from the visual-effect enum to a renderer effect profile.
pub fn effect_profile(effect: VisualEffect) -> EffectProfile {
    match effect {
        VisualEffect::Normal => EffectProfile {
            filter: FilterKind::None,
            intensity: 0.0,
            post_processing: vec![],
            animation: AnimationProfile::None,
        },
        VisualEffect::Emotional => EffectProfile {
            filter: FilterKind::SoftGlow,
            intensity: 0.6,
            post_processing: vec![PostProcess::Bloom],
            animation: AnimationProfile::Pulse,
        },
        VisualEffect::Deformed => EffectProfile {
            filter: FilterKind::Posterize,
            intensity: 0.7,
            post_processing: vec![],
            animation: AnimationProfile::Waver,
        },
        VisualEffect::Past => EffectProfile {
            filter: FilterKind::Sepia,
            intensity: 0.8,
            post_processing: vec![PostProcess::Vignette],
            animation: AnimationProfile::Flashback,
        },
    }
}
