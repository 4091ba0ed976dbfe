use std::collections::BTreeMap;

use crate::core::Vec3;
use crate::descriptor::SceneDescriptor;
use crate::params::CharacterParams;

use super::tables::{ATTRIBUTE_TABLES, CHARACTER_PHRASES};

/// Map the free-text character hint (plus the composition text) to a
/// character record.
///
/// Two passes: independent keyword-to-attribute extractions first, then an
/// ordered phrase-rule pass that may override pose/position/rotation. Later
/// phrase rules win for the same field.
pub fn map_character(descriptor: &SceneDescriptor, fired: &mut Vec<String>) -> CharacterParams {
    if !descriptor.has_character() {
        return CharacterParams::invisible();
    }

    let haystack = format!(
        "{} {}",
        descriptor.character_details, descriptor.composition
    )
    .to_ascii_lowercase();

    let mut attributes = BTreeMap::new();
    for table in ATTRIBUTE_TABLES {
        let hit = table
            .rules
            .iter()
            .find(|r| r.patterns.iter().any(|p| haystack.contains(p)));
        if let Some(rule) = hit {
            attributes.insert(table.key.to_string(), rule.value.to_string());
            fired.push(format!("character.{}={}", table.key, rule.value));
        }
    }

    let mut pose = attributes
        .get("pose")
        .cloned()
        .unwrap_or_else(|| "standing".to_string());
    let expression = attributes
        .get("expression")
        .cloned()
        .unwrap_or_else(|| "neutral".to_string());
    let mut position = Vec3::ZERO;
    let mut rotation = Vec3::ZERO;

    for rule in CHARACTER_PHRASES {
        if !rule.phrases.iter().any(|p| haystack.contains(p)) {
            continue;
        }
        if let Some(p) = rule.pose {
            pose = p.to_string();
        }
        if let Some(pos) = rule.position {
            position = pos;
        }
        if let Some(ry) = rule.rotation_y {
            rotation.y = ry;
        }
        fired.push(format!("character.phrase.{}", rule.name));
    }

    CharacterParams {
        visible: true,
        pose,
        expression,
        position,
        rotation,
        scale: 1.0,
        attributes,
    }
}
