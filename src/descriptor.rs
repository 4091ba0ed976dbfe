use crate::error::{PanelError, PanelResult};

/// Canonical sentinel the upstream generator emits when a panel contains no
/// character. Treated the same as an empty hint.
pub const NO_CHARACTER_SENTINEL: &str = "no character in this panel";

/// Raw per-panel scene description, produced once per panel by the upstream
/// text-to-descriptor service and consumed by the mapper. Immutable.
///
/// The wire schema is camelCase JSON; all five fields are required.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SceneDescriptor {
    pub camera_angle: CameraAngle,
    pub composition: String,
    pub visual_effects: VisualEffect,
    pub character_details: String,
    /// 0 = no background, 1 = background present.
    pub background: u8,
    pub background_details: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraAngle {
    Near,
    Middle,
    Far,
}

impl CameraAngle {
    pub fn parse(raw: &str) -> PanelResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "near" => Ok(Self::Near),
            "middle" => Ok(Self::Middle),
            "far" => Ok(Self::Far),
            other => Err(PanelError::validation(format!(
                "cameraAngle must be one of near|middle|far, got '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualEffect {
    Normal,
    Emotional,
    Deformed,
    Past,
}

impl VisualEffect {
    pub fn parse(raw: &str) -> PanelResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "emotional" => Ok(Self::Emotional),
            "deformed" => Ok(Self::Deformed),
            "past" => Ok(Self::Past),
            other => Err(PanelError::validation(format!(
                "visualEffects must be one of normal|emotional|deformed|past, got '{other}'"
            ))),
        }
    }
}

impl SceneDescriptor {
    /// Build a descriptor from untyped field values, validating the closed
    /// enum sets. Useful for callers holding loose upstream output.
    pub fn from_raw(
        camera_angle: &str,
        composition: impl Into<String>,
        visual_effects: &str,
        character_details: impl Into<String>,
        background: i64,
        background_details: impl Into<String>,
    ) -> PanelResult<Self> {
        let background = u8::try_from(background)
            .map_err(|_| PanelError::validation("background flag must be 0 or 1"))?;
        let descriptor = Self {
            camera_angle: CameraAngle::parse(camera_angle)?,
            composition: composition.into(),
            visual_effects: VisualEffect::parse(visual_effects)?,
            character_details: character_details.into(),
            background,
            background_details: background_details.into(),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// The enum fields are closed by construction; only the background flag
    /// needs a range check after deserialization.
    pub fn validate(&self) -> PanelResult<()> {
        if self.background > 1 {
            return Err(PanelError::validation(format!(
                "background flag must be 0 or 1, got {}",
                self.background
            )));
        }
        Ok(())
    }

    pub fn has_character(&self) -> bool {
        let hint = self.character_details.trim();
        !hint.is_empty() && !hint.eq_ignore_ascii_case(NO_CHARACTER_SENTINEL)
    }

    pub fn has_background(&self) -> bool {
        self.background == 1 && !self.background_details.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_json() -> &'static str {
        r#"{
            "cameraAngle": "near",
            "composition": "girl in foreground, window behind her",
            "visualEffects": "normal",
            "characterDetails": "a girl in pajamas, smiling",
            "background": 1,
            "backgroundDetails": "a bedroom in the morning"
        }"#
    }

    #[test]
    fn json_roundtrip() {
        let d: SceneDescriptor = serde_json::from_str(basic_json()).unwrap();
        assert_eq!(d.camera_angle, CameraAngle::Near);
        assert_eq!(d.visual_effects, VisualEffect::Normal);
        let s = serde_json::to_string(&d).unwrap();
        let back: SceneDescriptor = serde_json::from_str(&s).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn out_of_set_enum_is_rejected() {
        let bad = basic_json().replace("\"near\"", "\"overhead\"");
        assert!(serde_json::from_str::<SceneDescriptor>(&bad).is_err());
        assert!(CameraAngle::parse("overhead").is_err());
        assert!(VisualEffect::parse("noir").is_err());
    }

    #[test]
    fn background_flag_must_be_binary() {
        let mut d: SceneDescriptor = serde_json::from_str(basic_json()).unwrap();
        d.background = 2;
        assert!(d.validate().is_err());
        assert!(
            SceneDescriptor::from_raw("near", "", "normal", "", 2, "").is_err()
        );
    }

    #[test]
    fn sentinel_means_no_character() {
        let mut d: SceneDescriptor = serde_json::from_str(basic_json()).unwrap();
        assert!(d.has_character());
        d.character_details = NO_CHARACTER_SENTINEL.to_string();
        assert!(!d.has_character());
        d.character_details = "   ".to_string();
        assert!(!d.has_character());
    }
}
