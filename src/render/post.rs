use crate::error::{PanelError, PanelResult};
use crate::params::{EffectProfile, FilterKind, PostProcess};

use super::cpu::RasterFrame;

/// Apply the scene's filter and post-processing passes to a finished frame,
/// in place. Filter first, then each post pass in declared order. Animation
/// profiles are metadata for downstream players and do not touch pixels here.
pub fn apply_effects(frame: &mut RasterFrame, effects: &EffectProfile) -> PanelResult<()> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(PanelError::render("frame byte length mismatch"));
    }

    let intensity = effects.intensity.clamp(0.0, 1.0) as f32;
    match effects.filter {
        FilterKind::None => {}
        FilterKind::Sepia => sepia_in_place(&mut frame.data, intensity),
        FilterKind::SoftGlow => soft_glow_in_place(frame, intensity),
        FilterKind::Posterize => posterize_in_place(&mut frame.data, intensity),
    }

    for pass in &effects.post_processing {
        match pass {
            PostProcess::Bloom => bloom_in_place(&mut frame.data, intensity),
            PostProcess::Vignette => {
                vignette_in_place(&mut frame.data, frame.width, frame.height, intensity);
            }
        }
    }

    Ok(())
}

/// Blend each pixel toward its sepia-toned version by `t`.
fn sepia_in_place(data: &mut [u8], t: f32) {
    for px in data.chunks_exact_mut(4) {
        let (r, g, b) = (f32::from(px[0]), f32::from(px[1]), f32::from(px[2]));
        let sr = (r * 0.393 + g * 0.769 + b * 0.189).min(255.0);
        let sg = (r * 0.349 + g * 0.686 + b * 0.168).min(255.0);
        let sb = (r * 0.272 + g * 0.534 + b * 0.131).min(255.0);
        px[0] = lerp_u8(px[0], sr, t);
        px[1] = lerp_u8(px[1], sg, t);
        px[2] = lerp_u8(px[2], sb, t);
    }
}

/// Quantize channels to fewer levels; intensity controls how few.
fn posterize_in_place(data: &mut [u8], t: f32) {
    // t=0 keeps 256 levels, t=1 crushes to 4.
    let levels = (256.0 - t * 252.0).round().max(4.0);
    let step = 255.0 / (levels - 1.0);
    for px in data.chunks_exact_mut(4) {
        for c in px.iter_mut().take(3) {
            *c = ((f32::from(*c) / step).round() * step).clamp(0.0, 255.0) as u8;
        }
    }
}

/// Box-blurred copy screened over the original. Small fixed radius; the glow
/// strength comes from the blend factor, not the kernel size.
fn soft_glow_in_place(frame: &mut RasterFrame, t: f32) {
    let blurred = box_blur(&frame.data, frame.width, frame.height, 2);
    for (px, bl) in frame.data.chunks_exact_mut(4).zip(blurred.chunks_exact(4)) {
        for i in 0..3 {
            let base = f32::from(px[i]);
            let glow = f32::from(bl[i]);
            // Screen blend lifts highlights without clipping midtones.
            let screened = 255.0 - (255.0 - base) * (255.0 - glow) / 255.0;
            px[i] = lerp_u8(px[i], screened, t * 0.8);
        }
    }
}

/// Additive highlight boost: bright pixels get pushed brighter.
fn bloom_in_place(data: &mut [u8], t: f32) {
    for px in data.chunks_exact_mut(4) {
        let luma =
            0.2126 * f32::from(px[0]) + 0.7152 * f32::from(px[1]) + 0.0722 * f32::from(px[2]);
        if luma > 180.0 {
            let boost = (luma - 180.0) / 75.0 * t;
            for c in px.iter_mut().take(3) {
                *c = (f32::from(*c) * (1.0 + boost * 0.35)).min(255.0) as u8;
            }
        }
    }
}

/// Darken toward the corners with a smooth radial falloff.
fn vignette_in_place(data: &mut [u8], width: u32, height: u32, t: f32) {
    let (w, h) = (width as f32, height as f32);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let max_d = (cx * cx + cy * cy).sqrt();
    for (i, px) in data.chunks_exact_mut(4).enumerate() {
        let x = (i as u32 % width) as f32;
        let y = (i as u32 / width) as f32;
        let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() / max_d;
        let falloff = 1.0 - t * 0.65 * d * d;
        for c in px.iter_mut().take(3) {
            *c = (f32::from(*c) * falloff) as u8;
        }
    }
}

fn box_blur(data: &[u8], width: u32, height: u32, radius: i64) -> Vec<u8> {
    let (w, h) = (width as i64, height as i64);
    let mut out = vec![0u8; data.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u32; 4];
            let mut count = 0u32;
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let (sx, sy) = (x + dx, y + dy);
                    if sx < 0 || sy < 0 || sx >= w || sy >= h {
                        continue;
                    }
                    let base = ((sy * w + sx) * 4) as usize;
                    for (slot, value) in acc.iter_mut().zip(&data[base..base + 4]) {
                        *slot += u32::from(*value);
                    }
                    count += 1;
                }
            }
            let base = ((y * w + x) * 4) as usize;
            for (i, slot) in acc.iter().enumerate() {
                out[base + i] = (slot / count) as u8;
            }
        }
    }
    out
}

fn lerp_u8(from: u8, to: f32, t: f32) -> u8 {
    let f = f32::from(from);
    (f + (to - f) * t).clamp(0.0, 255.0) as u8
}
