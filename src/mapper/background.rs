use crate::descriptor::SceneDescriptor;
use crate::params::{BackgroundParams, PropPlacement};

use super::tables::{ENVIRONMENTS, LIGHTING, PROPS};

/// Map the background flag and hint text to a background record.
///
/// Environment and props come from independent keyword tables; lighting is a
/// priority-ordered table where the first matching rule wins.
pub fn map_background(descriptor: &SceneDescriptor, fired: &mut Vec<String>) -> BackgroundParams {
    if !descriptor.has_background() {
        return BackgroundParams::invisible();
    }

    let haystack = descriptor.background_details.to_ascii_lowercase();

    let environment = ENVIRONMENTS
        .iter()
        .find(|r| r.patterns.iter().any(|p| haystack.contains(p)))
        .map(|r| {
            fired.push(format!("background.environment={}", r.value));
            r.value.to_string()
        })
        .unwrap_or_else(|| "room".to_string());

    let mut props = Vec::new();
    for rule in PROPS {
        if rule.patterns.iter().any(|p| haystack.contains(p)) {
            props.push(PropPlacement {
                kind: rule.kind,
                position: rule.position,
            });
            fired.push(format!("background.prop.{:?}", rule.kind));
        }
    }

    let (lighting, ambient_color, light_intensity) = match LIGHTING
        .iter()
        .find(|r| r.patterns.iter().any(|p| haystack.contains(p)))
    {
        Some(rule) => {
            fired.push(format!("background.lighting={}", rule.label));
            (rule.label.to_string(), rule.ambient, rule.intensity)
        }
        None => {
            let neutral = BackgroundParams::invisible();
            ("neutral".to_string(), neutral.ambient_color, neutral.light_intensity)
        }
    };

    BackgroundParams {
        visible: true,
        environment,
        lighting,
        props,
        ambient_color,
        light_intensity,
    }
}
