//! Ribbon Geometry
//!
//! Turns the pointer trail into layered polylines that undulate along the
//! path normals. Rendering is left to whoever consumes the frames.

use serde::{Deserialize, Serialize};

use super::buffer::Point;

/// Shape parameters of the ribbon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonStyle {
    pub layers: usize,
    pub base_thickness: f64,
    pub thickness_step: f64,
    pub base_alpha: f64,
    pub alpha_step: f64,
    pub base_amplitude: f64,
    pub amplitude_step: f64,
    pub wave_frequency: f64,
    pub wave_speed: f64,
    /// Opacity of the background wash drawn each frame
    pub fade_alpha: f64,
    /// Animation time added per frame
    pub time_step: f64,
}

impl Default for RibbonStyle {
    fn default() -> Self {
        Self {
            layers: 3,
            base_thickness: 16.0,
            thickness_step: 4.0,
            base_alpha: 0.35,
            alpha_step: 0.1,
            base_amplitude: 10.0,
            amplitude_step: 2.0,
            wave_frequency: 0.35,
            wave_speed: 3.0,
            fade_alpha: 0.06,
            time_step: 0.02,
        }
    }
}

/// Drawing surface size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Build from CSS pixel dimensions
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width: css_width * device_pixel_ratio,
            height: css_height * device_pixel_ratio,
            device_pixel_ratio,
        }
    }

    /// Map a client (CSS pixel) position to device pixels
    pub fn to_device(&self, x: f64, y: f64) -> Point {
        Point::new(x * self.device_pixel_ratio, y * self.device_pixel_ratio)
    }
}

/// One stroked polyline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RibbonLayer {
    pub thickness: f64,
    pub alpha: f64,
    pub points: Vec<Point>,
}

/// Everything needed to draw one animation frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub time: f64,
    pub fade_alpha: f64,
    pub viewport: Viewport,
    pub layers: Vec<RibbonLayer>,
}

/// Compute the ribbon layers for the trail at animation time `time`.
///
/// Fewer than three samples produce a frame with only the fade.
pub fn compute_frame(points: &[Point], time: f64, viewport: &Viewport, style: &RibbonStyle) -> Frame {
    let layers = if points.len() > 2 {
        (0..style.layers)
            .map(|layer| ribbon_layer(points, time, layer, style))
            .collect()
    } else {
        Vec::new()
    };

    Frame {
        time,
        fade_alpha: style.fade_alpha,
        viewport: *viewport,
        layers,
    }
}

fn ribbon_layer(points: &[Point], time: f64, layer: usize, style: &RibbonStyle) -> RibbonLayer {
    let step = layer as f64;
    let amplitude = style.base_amplitude - style.amplitude_step * step;
    let total = points.len() as f64;

    let path = points
        .windows(3)
        .enumerate()
        .map(|(offset, w)| {
            let i = (offset + 1) as f64;
            let (prev, current, next) = (w[0], w[1], w[2]);

            let dx = next.x - prev.x;
            let dy = next.y - prev.y;
            let len = dx.hypot(dy);
            let len = if len == 0.0 { 1.0 } else { len };
            let (nx, ny) = (-dy / len, dx / len);

            let wave = (i * style.wave_frequency + time * style.wave_speed).sin()
                * amplitude
                * (i / total);
            Point::new(current.x + nx * wave, current.y + ny * wave)
        })
        .collect();

    RibbonLayer {
        thickness: style.base_thickness - style.thickness_step * step,
        alpha: style.base_alpha - style.alpha_step * step,
        points: path,
    }
}
