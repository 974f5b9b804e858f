use nalgebra::Vector2;

use super::{
    file_io::{date_time_string, serialize_to_json_or_panic, FilePrefix},
    image_utils::{write_image_to_file_or_panic, ImageSpecification, PixelMapper},
    plot::PlotScene,
    view_control::{PanVelocityCommand, ViewControl, ZoomVelocityCommand},
};

/// A trait for managing and rendering a graphical view with controls for panning,
/// zooming, updating, and saving the rendered output. This is the interface used
/// by the "explore" GUI.
pub trait RenderWindow {
    fn image_specification(&self) -> &ImageSpecification;

    /// Restores the view that the window was created with.
    fn reset(&mut self);

    /// Applies keyboard pan/zoom velocities up to `time`.
    ///
    /// @return: true iff the view changed and a redraw is needed.
    fn update(
        &mut self,
        time: f64,
        pan_command: &PanVelocityCommand,
        zoom_command: &ZoomVelocityCommand,
    ) -> bool;

    /// Pans so that the content follows a mouse drag of `pixel_delta`.
    fn drag(&mut self, pixel_delta: [f64; 2]) -> bool;

    /// Zooms by `scale` about the point under `pixel`.
    fn zoom_about_pixel(&mut self, pixel: [f64; 2], scale: f64) -> bool;

    /// Real-space point under the given (fractional) pixel.
    fn point_at_pixel(&self, pixel: [f64; 2]) -> Vector2<f64>;

    /// Renders the internal buffer to the RGBA `screen`, recomputing it first
    /// if the view has changed since the last draw.
    fn draw(&mut self, screen: &mut [u8]);

    /// Saves the current view (PNG + JSON view specification) to disk.
    fn render_to_file(&self);
}

/// Double-duty image buffer for a `PlotScene`: rasterized on demand into an
/// RGB buffer, then copied onto the RGBA screen.
pub struct PlotWindow {
    scene: PlotScene,
    view_control: ViewControl,
    buffer: image::RgbImage,
    buffer_is_stale: bool,
    file_prefix: FilePrefix,
}

impl PlotWindow {
    pub fn new(
        time: f64,
        scene: PlotScene,
        image_specification: &ImageSpecification,
        file_prefix: FilePrefix,
    ) -> Self {
        Self {
            scene,
            view_control: ViewControl::new(time, image_specification),
            buffer: image::RgbImage::new(
                image_specification.resolution[0],
                image_specification.resolution[1],
            ),
            buffer_is_stale: true,
            file_prefix,
        }
    }

    pub fn redraw_required(&self) -> bool {
        self.buffer_is_stale
    }

    fn mark_stale_if(&mut self, modified: bool) -> bool {
        self.buffer_is_stale |= modified;
        modified
    }

    fn refresh_buffer(&mut self) {
        if self.buffer_is_stale {
            self.scene
                .rasterize_in_place(self.view_control.image_specification(), &mut self.buffer);
            self.buffer_is_stale = false;
        }
    }
}

impl RenderWindow for PlotWindow {
    fn image_specification(&self) -> &ImageSpecification {
        self.view_control.image_specification()
    }

    fn reset(&mut self) {
        self.view_control.reset();
        self.buffer_is_stale = true;
    }

    fn update(
        &mut self,
        time: f64,
        pan_command: &PanVelocityCommand,
        zoom_command: &ZoomVelocityCommand,
    ) -> bool {
        let modified = self.view_control.update(time, pan_command, zoom_command);
        self.mark_stale_if(modified)
    }

    fn drag(&mut self, pixel_delta: [f64; 2]) -> bool {
        let modified = self.view_control.drag(pixel_delta);
        self.mark_stale_if(modified)
    }

    fn zoom_about_pixel(&mut self, pixel: [f64; 2], scale: f64) -> bool {
        let modified = self.view_control.zoom_about_pixel(pixel, scale);
        self.mark_stale_if(modified)
    }

    fn point_at_pixel(&self, pixel: [f64; 2]) -> Vector2<f64> {
        PixelMapper::new(self.view_control.image_specification()).map(&pixel)
    }

    fn draw(&mut self, screen: &mut [u8]) {
        self.refresh_buffer();
        // The screen has RGBA channels, the buffer only RGB.
        debug_assert_eq!(screen.len(), 4 * self.buffer.len() / 3);
        for (screen_pixel, buffer_pixel) in screen.chunks_exact_mut(4).zip(self.buffer.pixels()) {
            let [r, g, b] = buffer_pixel.0;
            screen_pixel.copy_from_slice(&[r, g, b, 255]);
        }
    }

    fn render_to_file(&self) {
        let datetime = date_time_string();
        serialize_to_json_or_panic(
            self.file_prefix
                .full_path_with_suffix(&format!("_{}.json", datetime)),
            self.view_control.image_specification(),
        );

        let imgbuf = self
            .scene
            .rasterize(self.view_control.image_specification());
        write_image_to_file_or_panic(
            self.file_prefix
                .full_path_with_suffix(&format!("_{}.png", datetime)),
            |f| imgbuf.save(f),
        );
    }
}
