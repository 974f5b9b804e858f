//! Minimal raster plotting: polylines (solid or dashed), horizontal reference
//! lines, filled circular markers, and a light background grid. Everything is
//! specified in real-space coordinates and mapped into pixels through an
//! `ImageSpecification`, so the same scene can be drawn at any pan/zoom.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::core::image_utils::{
    generate_image_in_place, ImageSpecification, PixelFootprint, PixelMapper, ViewRectangle,
};

/// Number of grid cells (roughly) that span each axis of the view.
const TARGET_GRID_LINE_COUNT: f64 = 8.0;

/// Pixels outside the image by more than this are skipped during line
/// clipping, so that very long segments are cheap to draw when zoomed in.
const CLIP_MARGIN_PIXELS: f64 = 16.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum LineStyle {
    Solid,
    Dashed { dash_length_pixels: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vector2<f64>>,
    pub color: image::Rgb<u8>,
    pub width_pixels: u32,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub point: Vector2<f64>,
    pub color: image::Rgb<u8>,
    pub radius_pixels: u32,
}

/// A horizontal line spanning the entire view, e.g. the `y = 0` axis.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalLine {
    pub y: f64,
    pub color: image::Rgb<u8>,
    pub width_pixels: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotScene {
    pub background_color: image::Rgb<u8>,
    pub grid_color: image::Rgb<u8>,
    pub horizontal_lines: Vec<HorizontalLine>,
    pub polylines: Vec<Polyline>,
    pub markers: Vec<Marker>,
}

impl PlotScene {
    /// Smallest rectangle containing every polyline vertex and marker.
    /// Horizontal lines are infinite, so only their `y` value is included.
    pub fn bounding_rectangle(&self) -> Option<ViewRectangle> {
        let mut vertices: Vec<Vector2<f64>> = self
            .polylines
            .iter()
            .flat_map(|line| line.points.iter().copied())
            .chain(self.markers.iter().map(|marker| marker.point))
            .collect();
        if vertices.is_empty() {
            return None;
        }
        let x_anchor = vertices[0][0];
        vertices.extend(
            self.horizontal_lines
                .iter()
                .map(|line| Vector2::new(x_anchor, line.y)),
        );
        Some(ViewRectangle::from_vertices(&vertices))
    }

    /// Draws the full scene into a newly allocated image.
    pub fn rasterize(&self, spec: &ImageSpecification) -> image::RgbImage {
        let mut image = image::RgbImage::new(spec.resolution[0], spec.resolution[1]);
        self.rasterize_in_place(spec, &mut image);
        image
    }

    pub fn rasterize_in_place(&self, spec: &ImageSpecification, image: &mut image::RgbImage) {
        let grid_spacing = [grid_spacing(spec.width()), grid_spacing(spec.height())];
        let background_color = self.background_color;
        let grid_color = self.grid_color;
        generate_image_in_place(
            spec,
            |footprint: &PixelFootprint| {
                if crosses_grid_line(&footprint.x, grid_spacing[0])
                    || crosses_grid_line(&footprint.y, grid_spacing[1])
                {
                    grid_color
                } else {
                    background_color
                }
            },
            image,
        );

        let mut canvas = Canvas::new(spec, image);
        for line in self.horizontal_lines.iter() {
            let x_low = canvas.pixel_mapper.width.map(-CLIP_MARGIN_PIXELS);
            let x_upp = canvas
                .pixel_mapper
                .width
                .map(spec.resolution[0] as f64 + CLIP_MARGIN_PIXELS);
            canvas.draw_segment(
                &Vector2::new(x_low, line.y),
                &Vector2::new(x_upp, line.y),
                line.color,
                line.width_pixels,
                &LineStyle::Solid,
                &mut 0.0,
            );
        }
        for polyline in self.polylines.iter() {
            canvas.draw_polyline(polyline);
        }
        for marker in self.markers.iter() {
            canvas.draw_marker(marker);
        }
    }
}

/// Picks a "nice" grid spacing (1, 2, or 5 times a power of ten) so that
/// roughly `TARGET_GRID_LINE_COUNT` grid lines span `extent`.
pub fn grid_spacing(extent: f64) -> f64 {
    let raw = extent.abs() / TARGET_GRID_LINE_COUNT;
    if !raw.is_finite() || raw <= 0.0 {
        return f64::INFINITY;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let step = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

/// True iff some multiple of `spacing` lies in the half-open interval `[low, upp)`.
fn crosses_grid_line(interval: &[f64; 2], spacing: f64) -> bool {
    if !spacing.is_finite() {
        return false;
    }
    (interval[0] / spacing).ceil() < (interval[1] / spacing).ceil()
}

/// Clips the segment `a -> b` to the axis-aligned box `[low, upp]` using the
/// Liang-Barsky algorithm. Returns the parameter range `[t0, t1]` in `[0, 1]`
/// of the visible portion, if any.
fn clip_segment(a: &[f64; 2], b: &[f64; 2], low: &[f64; 2], upp: &[f64; 2]) -> Option<[f64; 2]> {
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for axis in 0..2 {
        let delta = b[axis] - a[axis];
        for (p, q) in [(-delta, a[axis] - low[axis]), (delta, upp[axis] - a[axis])] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }
    }
    if t0 <= t1 {
        Some([t0, t1])
    } else {
        None
    }
}

/// Pixel-level drawing on top of an image buffer.
struct Canvas<'a> {
    image: &'a mut image::RgbImage,
    pixel_mapper: PixelMapper,
    resolution: [u32; 2],
}

impl<'a> Canvas<'a> {
    fn new(spec: &ImageSpecification, image: &'a mut image::RgbImage) -> Self {
        Canvas {
            image,
            pixel_mapper: PixelMapper::new(spec),
            resolution: spec.resolution,
        }
    }

    fn stamp(&mut self, pixel: &[f64; 2], color: image::Rgb<u8>, radius: i64) {
        let cx = pixel[0].round() as i64;
        let cy = pixel[1].round() as i64;
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 {
                    continue;
                }
                if let Some(target) = self.image.get_pixel_mut_checked(x as u32, y as u32) {
                    *target = color;
                }
            }
        }
    }

    fn draw_polyline(&mut self, polyline: &Polyline) {
        // Dash phase is carried across vertices so dashes stay uniform.
        let mut arc_length = 0.0;
        for pair in polyline.points.windows(2) {
            self.draw_segment(
                &pair[0],
                &pair[1],
                polyline.color,
                polyline.width_pixels,
                &polyline.style,
                &mut arc_length,
            );
        }
    }

    fn draw_segment(
        &mut self,
        a: &Vector2<f64>,
        b: &Vector2<f64>,
        color: image::Rgb<u8>,
        width_pixels: u32,
        style: &LineStyle,
        arc_length: &mut f64,
    ) {
        let pa = self.pixel_mapper.inverse_map(a);
        let pb = self.pixel_mapper.inverse_map(b);
        if !(pa.iter().chain(pb.iter()).all(|v| v.is_finite())) {
            return;
        }
        let segment_length = ((pb[0] - pa[0]).powi(2) + (pb[1] - pa[1]).powi(2)).sqrt();

        let low = [-CLIP_MARGIN_PIXELS, -CLIP_MARGIN_PIXELS];
        let upp = [
            self.resolution[0] as f64 + CLIP_MARGIN_PIXELS,
            self.resolution[1] as f64 + CLIP_MARGIN_PIXELS,
        ];
        let start_length = *arc_length;
        *arc_length += segment_length;
        let Some([t0, t1]) = clip_segment(&pa, &pb, &low, &upp) else {
            return;
        };

        let radius = (width_pixels / 2) as i64;
        let visible_length = (t1 - t0) * segment_length;
        let step_count = visible_length.ceil().max(1.0) as usize;
        for step in 0..=step_count {
            let t = t0 + (t1 - t0) * (step as f64) / (step_count as f64);
            if let LineStyle::Dashed { dash_length_pixels } = style {
                let distance = start_length + t * segment_length;
                if (distance / dash_length_pixels).floor() as i64 % 2 == 1 {
                    continue;
                }
            }
            let pixel = [
                pa[0] + t * (pb[0] - pa[0]),
                pa[1] + t * (pb[1] - pa[1]),
            ];
            self.stamp(&pixel, color, radius);
        }
    }

    fn draw_marker(&mut self, marker: &Marker) {
        let pixel = self.pixel_mapper.inverse_map(&marker.point);
        let r = marker.radius_pixels as f64;
        let inside = pixel[0] > -r
            && pixel[1] > -r
            && pixel[0] < self.resolution[0] as f64 + r
            && pixel[1] < self.resolution[1] as f64 + r;
        if inside {
            self.stamp(&pixel, marker.color, marker.radius_pixels as i64);
        }
    }
}
