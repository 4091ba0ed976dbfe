use crate::core::{PanelBounds, Rgba8};
use crate::error::{PanelError, PanelResult};

use super::primitives::FillCmd;

/// One finished raster panel: straight rows of RGBA8, top-left origin.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl RasterFrame {
    /// Convert premultiplied pixel data back to straight alpha (for image
    /// encoders that expect it). No-op when already straight.
    pub fn into_unpremultiplied(mut self) -> Self {
        if !self.premultiplied {
            return self;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = px[3];
            if a > 0 && a < 255 {
                let af = u16::from(a);
                for c in px.iter_mut().take(3) {
                    *c = ((u16::from(*c) * 255 + af / 2) / af).min(255) as u8;
                }
            }
        }
        self.premultiplied = false;
        self
    }
}

/// Rasterize an ordered list of fill commands onto a cleared panel.
///
/// Fill order is the z-order: callers sort primitives by draw category
/// before projecting. The output is premultiplied, matching the pixmap's
/// native layout.
pub fn rasterize(
    bounds: PanelBounds,
    clear: Rgba8,
    fills: &[FillCmd],
) -> PanelResult<RasterFrame> {
    let width: u16 = bounds
        .width
        .try_into()
        .map_err(|_| PanelError::render("panel width exceeds u16"))?;
    let height: u16 = bounds
        .height
        .try_into()
        .map_err(|_| PanelError::render("panel height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    for cmd in fills {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            cmd.color.r,
            cmd.color.g,
            cmd.color.b,
            cmd.color.a,
        ));
        ctx.fill_path(&bezpath_to_cpu(&cmd.path));
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    clear_pixmap(&mut pixmap, premul_rgba8(clear));
    ctx.render_to_pixmap(&mut pixmap);

    Ok(RasterFrame {
        width: bounds.width,
        height: bounds.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

fn premul_rgba8(c: Rgba8) -> [u8; 4] {
    let af = u16::from(c.a) + 1;
    let premul = |ch: u8| -> u8 { ((u16::from(ch) * af) >> 8) as u8 };
    [premul(c.r), premul(c.g), premul(c.b), c.a]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
