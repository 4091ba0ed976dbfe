use crate::descriptor::SceneDescriptor;
use crate::params::{CompositionGraph, LayoutKind, SpatialRelation};

use super::tables::{OBJECT_WORDS, SPATIAL_WORDS};

/// Width of the local textual context captured around each spatial keyword.
const CONTEXT_CHARS: usize = 24;

/// Scan the free-text composition for spatial and object keywords and build
/// the composition graph.
///
/// Classification uses simple substring rules: in "X in front of Y", X goes
/// to the foreground list and Y to the background list; "X behind Y" is the
/// reverse. Objects mentioned but never classified land in the midground.
pub fn map_composition(descriptor: &SceneDescriptor, fired: &mut Vec<String>) -> CompositionGraph {
    let haystack = descriptor.composition.to_ascii_lowercase();

    let objects = object_occurrences(&haystack);

    let mut relationships = Vec::new();
    for &keyword in SPATIAL_WORDS {
        for pos in occurrences(&haystack, keyword) {
            let context = context_window(&haystack, pos, keyword.len());
            let object = nearest_object(&objects, pos)
                .map(|(_, w)| w.to_string())
                .unwrap_or_else(|| "scene".to_string());
            relationships.push(SpatialRelation {
                object,
                keyword: keyword.to_string(),
                context,
            });
        }
    }
    if !relationships.is_empty() {
        fired.push(format!("composition.relationships={}", relationships.len()));
    }

    let mut foreground = Vec::new();
    let mut background = Vec::new();
    for pos in occurrences(&haystack, "in front of") {
        if let Some((_, w)) = nearest_before(&objects, pos) {
            push_unique(&mut foreground, w);
        }
        if let Some((_, w)) = nearest_after(&objects, pos + "in front of".len()) {
            push_unique(&mut background, w);
        }
    }
    for pos in occurrences(&haystack, "behind") {
        if let Some((_, w)) = nearest_before(&objects, pos) {
            push_unique(&mut background, w);
        }
        if let Some((_, w)) = nearest_after(&objects, pos + "behind".len()) {
            push_unique(&mut foreground, w);
        }
    }

    let mut midground = Vec::new();
    for &(_, w) in &objects {
        if !foreground.iter().any(|x| x == w) && !background.iter().any(|x| x == w) {
            push_unique(&mut midground, w);
        }
    }

    let layout = if !foreground.is_empty() && !background.is_empty() {
        fired.push("composition.layout=depth_layered".to_string());
        LayoutKind::DepthLayered
    } else {
        LayoutKind::Flat
    };

    CompositionGraph {
        layout,
        relationships,
        foreground,
        midground,
        background,
    }
}

fn occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some(i) = haystack[from..].find(needle) {
        out.push(from + i);
        from += i + needle.len();
    }
    out
}

fn object_occurrences(haystack: &str) -> Vec<(usize, &'static str)> {
    let mut out = Vec::new();
    for &word in OBJECT_WORDS {
        for pos in occurrences(haystack, word) {
            out.push((pos, word));
        }
    }
    out.sort_by_key(|&(pos, _)| pos);
    out
}

fn nearest_object<'a>(
    objects: &'a [(usize, &'static str)],
    pos: usize,
) -> Option<&'a (usize, &'static str)> {
    objects.iter().min_by_key(|(p, _)| p.abs_diff(pos))
}

fn nearest_before<'a>(
    objects: &'a [(usize, &'static str)],
    pos: usize,
) -> Option<&'a (usize, &'static str)> {
    objects.iter().rev().find(|(p, _)| *p < pos)
}

fn nearest_after<'a>(
    objects: &'a [(usize, &'static str)],
    pos: usize,
) -> Option<&'a (usize, &'static str)> {
    objects.iter().find(|(p, _)| *p >= pos)
}

fn context_window(haystack: &str, pos: usize, len: usize) -> String {
    let start = pos.saturating_sub(CONTEXT_CHARS);
    let end = (pos + len + CONTEXT_CHARS).min(haystack.len());
    // Snap to char boundaries so multi-byte text cannot split a codepoint.
    let start = (0..=start).rev().find(|&i| haystack.is_char_boundary(i)).unwrap_or(0);
    let end = (end..=haystack.len())
        .find(|&i| haystack.is_char_boundary(i))
        .unwrap_or(haystack.len());
    haystack[start..end].trim().to_string()
}

fn push_unique(list: &mut Vec<String>, word: &str) {
    if !list.iter().any(|x| x == word) {
        list.push(word.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CameraAngle, VisualEffect};

    fn descriptor(composition: &str) -> SceneDescriptor {
        SceneDescriptor {
            camera_angle: CameraAngle::Middle,
            composition: composition.to_string(),
            visual_effects: VisualEffect::Normal,
            character_details: String::new(),
            background: 0,
            background_details: String::new(),
        }
    }

    #[test]
    fn front_and_behind_pairs_produce_depth_layers() {
        let mut fired = vec![];
        let g = map_composition(
            &descriptor("the girl in front of the window, and the bed behind the curtain"),
            &mut fired,
        );
        assert_eq!(g.layout, LayoutKind::DepthLayered);
        assert!(g.foreground.iter().any(|o| o == "girl"));
        assert!(g.background.iter().any(|o| o == "window"));
        assert!(g.background.iter().any(|o| o == "bed"));
        assert!(!g.relationships.is_empty());
    }

    #[test]
    fn flat_layout_without_depth_phrases() {
        let mut fired = vec![];
        let g = map_composition(&descriptor("the girl stands by the bed"), &mut fired);
        assert_eq!(g.layout, LayoutKind::Flat);
        assert!(g.foreground.is_empty());
        assert!(g.background.is_empty());
        // Mentioned but unclassified objects land in the midground.
        assert!(g.midground.iter().any(|o| o == "girl"));
        assert!(g.midground.iter().any(|o| o == "bed"));
    }

    #[test]
    fn relationships_carry_local_context() {
        let mut fired = vec![];
        let g = map_composition(
            &descriptor("morning light falls on the floor in the background of the room"),
            &mut fired,
        );
        let rel = g
            .relationships
            .iter()
            .find(|r| r.keyword == "background")
            .unwrap();
        assert!(rel.context.contains("background"));
        assert_eq!(rel.object, "floor");
    }

    #[test]
    fn empty_text_yields_default_graph() {
        let mut fired = vec![];
        let g = map_composition(&descriptor(""), &mut fired);
        assert_eq!(g, CompositionGraph::default());
    }
}
