use crate::core::{Rgba8, Vec3};
use crate::params::{BackgroundParams, PropKind};

use super::primitives::{DrawCategory, Primitive, ScenePrimitive};

const ROOM_HALF_WIDTH: f64 = 4.0;
const ROOM_DEPTH: f64 = 4.0;
const ROOM_HEIGHT: f64 = 3.0;

/// Build the backdrop and furniture primitives for a scene background.
///
/// An invisible background yields no primitives at all; the panel keeps its
/// clear color. Otherwise the room shell (floor, back wall, side wall) goes
/// in first, then one primitive group per prop. Props whose object word
/// appears in `foreground_objects` are promoted to the foreground draw
/// category so they paint over the character.
pub fn background_primitives(
    bg: &BackgroundParams,
    foreground_objects: &[String],
) -> Vec<ScenePrimitive> {
    if !bg.visible {
        return Vec::new();
    }

    let mut out = Vec::new();
    let palette = Palette::for_background(bg);

    // Room shell. The far wall sits at -ROOM_DEPTH and the floor spans from
    // just in front of the camera to the wall.
    out.push(backdrop(Primitive::Plane {
        corners: [
            Vec3::new(-ROOM_HALF_WIDTH, 0.0, 1.5),
            Vec3::new(ROOM_HALF_WIDTH, 0.0, 1.5),
            Vec3::new(ROOM_HALF_WIDTH, 0.0, -ROOM_DEPTH),
            Vec3::new(-ROOM_HALF_WIDTH, 0.0, -ROOM_DEPTH),
        ],
        color: palette.floor,
    }));
    out.push(backdrop(Primitive::Plane {
        corners: [
            Vec3::new(-ROOM_HALF_WIDTH, 0.0, -ROOM_DEPTH),
            Vec3::new(ROOM_HALF_WIDTH, 0.0, -ROOM_DEPTH),
            Vec3::new(ROOM_HALF_WIDTH, ROOM_HEIGHT, -ROOM_DEPTH),
            Vec3::new(-ROOM_HALF_WIDTH, ROOM_HEIGHT, -ROOM_DEPTH),
        ],
        color: palette.wall,
    }));
    out.push(backdrop(Primitive::Plane {
        corners: [
            Vec3::new(-ROOM_HALF_WIDTH, 0.0, 1.5),
            Vec3::new(-ROOM_HALF_WIDTH, 0.0, -ROOM_DEPTH),
            Vec3::new(-ROOM_HALF_WIDTH, ROOM_HEIGHT, -ROOM_DEPTH),
            Vec3::new(-ROOM_HALF_WIDTH, ROOM_HEIGHT, 1.5),
        ],
        color: palette.wall.darken(0.12),
    }));

    for prop in &bg.props {
        let start = out.len();
        prop_primitives(prop.kind, prop.position, &palette, &mut out);
        if foreground_objects.iter().any(|o| o == object_word(prop.kind)) {
            for prim in &mut out[start..] {
                prim.category = DrawCategory::Foreground;
            }
        }
    }

    out
}

fn object_word(kind: PropKind) -> &'static str {
    match kind {
        PropKind::Bed => "bed",
        PropKind::Window => "window",
        PropKind::Curtain => "curtain",
        PropKind::Desk => "desk",
        PropKind::Chair => "chair",
        PropKind::Lamp => "lamp",
        PropKind::Door => "door",
    }
}

/// Scene-wide colors derived from the ambient color and light intensity.
struct Palette {
    floor: Rgba8,
    wall: Rgba8,
    wood: Rgba8,
    fabric: Rgba8,
    glass: Rgba8,
}

impl Palette {
    fn for_background(bg: &BackgroundParams) -> Self {
        let lit = |base: [f64; 3]| {
            let gain = 0.55 + 0.45 * bg.light_intensity.clamp(0.0, 1.5);
            let ch = |b: f64, a: f64| ((b * a * gain).clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgba8::opaque(
                ch(base[0], bg.ambient_color[0]),
                ch(base[1], bg.ambient_color[1]),
                ch(base[2], bg.ambient_color[2]),
            )
        };
        Self {
            floor: lit([0.62, 0.52, 0.42]),
            wall: lit([0.82, 0.80, 0.76]),
            wood: lit([0.55, 0.40, 0.28]),
            fabric: lit([0.78, 0.70, 0.82]),
            glass: lit([0.75, 0.85, 0.98]),
        }
    }
}

fn prop_primitives(kind: PropKind, at: Vec3, palette: &Palette, out: &mut Vec<ScenePrimitive>) {
    match kind {
        PropKind::Bed => {
            out.push(furniture(Primitive::BoxShape {
                center: at + Vec3::new(0.0, 0.22, 0.0),
                size: Vec3::new(1.0, 0.44, 1.9),
                color: palette.wood,
            }));
            // Mattress and pillow overhang the frame slightly.
            out.push(furniture(Primitive::BoxShape {
                center: at + Vec3::new(0.0, 0.50, 0.0),
                size: Vec3::new(1.04, 0.16, 1.94),
                color: palette.fabric.lighten(0.18),
            }));
            out.push(furniture(Primitive::BoxShape {
                center: at + Vec3::new(0.0, 0.62, -0.75),
                size: Vec3::new(0.6, 0.12, 0.35),
                color: palette.fabric.lighten(0.35),
            }));
        }
        PropKind::Window => {
            // Frame then pane, flush against the back wall.
            out.push(backdrop(Primitive::Plane {
                corners: wall_rect(at, 1.25, 1.45),
                color: palette.wood.darken(0.15),
            }));
            out.push(backdrop(Primitive::Plane {
                corners: wall_rect(at, 1.1, 1.3),
                color: palette.glass,
            }));
        }
        PropKind::Curtain => {
            out.push(backdrop(Primitive::Plane {
                corners: wall_rect(at + Vec3::new(0.0, 0.1, 0.05), 0.5, 1.8),
                color: palette.fabric,
            }));
        }
        PropKind::Desk => {
            out.push(furniture(Primitive::BoxShape {
                center: at + Vec3::new(0.0, 0.70, 0.0),
                size: Vec3::new(1.2, 0.06, 0.6),
                color: palette.wood,
            }));
            for dx in [-0.52, 0.52] {
                out.push(furniture(Primitive::BoxShape {
                    center: at + Vec3::new(dx, 0.34, 0.0),
                    size: Vec3::new(0.08, 0.68, 0.5),
                    color: palette.wood.darken(0.1),
                }));
            }
        }
        PropKind::Chair => {
            out.push(furniture(Primitive::BoxShape {
                center: at + Vec3::new(0.0, 0.42, 0.0),
                size: Vec3::new(0.45, 0.06, 0.45),
                color: palette.wood,
            }));
            out.push(furniture(Primitive::BoxShape {
                center: at + Vec3::new(0.0, 0.72, -0.20),
                size: Vec3::new(0.45, 0.55, 0.06),
                color: palette.wood.darken(0.08),
            }));
        }
        PropKind::Lamp => {
            out.push(furniture(Primitive::Cylinder {
                bottom: at,
                top: at + Vec3::new(0.0, 1.3, 0.0),
                radius: 0.035,
                color: palette.wood.darken(0.25),
            }));
            out.push(furniture(Primitive::Sphere {
                center: at + Vec3::new(0.0, 1.42, 0.0),
                radius: 0.16,
                color: palette.glass.lighten(0.3),
            }));
        }
        PropKind::Door => {
            out.push(backdrop(Primitive::Plane {
                corners: wall_rect(at + Vec3::new(0.0, -0.4, 0.0), 0.85, 2.0),
                color: palette.wood.darken(0.05),
            }));
        }
    }
}

/// Axis-aligned rectangle facing the camera, centered at `at`.
fn wall_rect(at: Vec3, width: f64, height: f64) -> [Vec3; 4] {
    let hw = width / 2.0;
    let hh = height / 2.0;
    [
        Vec3::new(at.x - hw, at.y - hh, at.z),
        Vec3::new(at.x + hw, at.y - hh, at.z),
        Vec3::new(at.x + hw, at.y + hh, at.z),
        Vec3::new(at.x - hw, at.y + hh, at.z),
    ]
}

fn backdrop(shape: Primitive) -> ScenePrimitive {
    ScenePrimitive {
        category: DrawCategory::Backdrop,
        shape,
    }
}

fn furniture(shape: Primitive) -> ScenePrimitive {
    ScenePrimitive {
        category: DrawCategory::Furniture,
        shape,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PropPlacement;

    #[test]
    fn invisible_background_yields_no_primitives() {
        assert!(background_primitives(&BackgroundParams::invisible(), &[]).is_empty());
    }

    #[test]
    fn visible_background_starts_with_the_room_shell() {
        let bg = BackgroundParams {
            visible: true,
            ..BackgroundParams::invisible()
        };
        let prims = background_primitives(&bg, &[]);
        assert_eq!(prims.len(), 3);
        assert!(prims.iter().all(|p| p.category == DrawCategory::Backdrop));
    }

    #[test]
    fn props_add_primitives_in_their_category() {
        let bg = BackgroundParams {
            visible: true,
            props: vec![
                PropPlacement {
                    kind: PropKind::Bed,
                    position: Vec3::new(-1.5, 0.0, -2.0),
                },
                PropPlacement {
                    kind: PropKind::Window,
                    position: Vec3::new(1.0, 1.5, -3.9),
                },
            ],
            ..BackgroundParams::invisible()
        };
        let prims = background_primitives(&bg, &[]);
        assert!(prims.len() > 3);
        assert!(prims.iter().any(|p| p.category == DrawCategory::Furniture));
    }

    #[test]
    fn composition_foreground_promotes_the_matching_prop() {
        let bg = BackgroundParams {
            visible: true,
            props: vec![PropPlacement {
                kind: PropKind::Curtain,
                position: Vec3::new(0.8, 1.4, -0.5),
            }],
            ..BackgroundParams::invisible()
        };
        let prims = background_primitives(&bg, &["curtain".to_string()]);
        assert!(prims.iter().any(|p| p.category == DrawCategory::Foreground));
    }

    #[test]
    fn darker_lighting_darkens_the_walls() {
        let bright = BackgroundParams {
            visible: true,
            light_intensity: 1.0,
            ..BackgroundParams::invisible()
        };
        let dark = BackgroundParams {
            visible: true,
            light_intensity: 0.2,
            ambient_color: [0.35, 0.4, 0.6],
            ..BackgroundParams::invisible()
        };
        let wall_of = |bg: &BackgroundParams| match background_primitives(bg, &[])[1].shape {
            Primitive::Plane { color, .. } => color,
            _ => unreachable!(),
        };
        assert!(wall_of(&dark).r < wall_of(&bright).r);
    }
}
