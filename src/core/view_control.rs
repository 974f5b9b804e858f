use super::image_utils::{ImageSpecification, PixelMapper};

/// Views narrower than this (on either axis) are rejected by zoom commands.
const MIN_VIEW_DIMENSION: f64 = 1e-12;

/// Views wider than this (on either axis) are rejected by zoom commands.
const MAX_VIEW_DIMENSION: f64 = 1e12;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ScalarDirection {
    Neg,
    Zero,
    Pos,
}

impl ScalarDirection {
    pub fn from_key_pair(neg_flag: bool, pos_flag: bool) -> ScalarDirection {
        if neg_flag == pos_flag {
            ScalarDirection::Zero
        } else if pos_flag {
            ScalarDirection::Pos
        } else {
            ScalarDirection::Neg
        }
    }

    pub fn apply_to_magnitude(&self, magnitude: f64) -> f64 {
        match self {
            ScalarDirection::Neg => -magnitude,
            ScalarDirection::Zero => 0.0,
            ScalarDirection::Pos => magnitude,
        }
    }
}

/// Keyboard panning. `pan_rate` is in view widths (or heights) per second.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct PanVelocityCommand {
    pub direction: [ScalarDirection; 2],
    pub pan_rate: f64,
}

impl PanVelocityCommand {
    pub fn zero() -> PanVelocityCommand {
        PanVelocityCommand {
            direction: [ScalarDirection::Zero, ScalarDirection::Zero],
            pan_rate: 0.0,
        }
    }
}

/// Keyboard zooming. `zoom_rate` is in natural-log of view size per second;
/// `Pos` zooms in (the view shrinks).
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ZoomVelocityCommand {
    pub zoom_direction: ScalarDirection,
    pub zoom_rate: f64,
}

impl ZoomVelocityCommand {
    pub fn zero() -> ZoomVelocityCommand {
        ZoomVelocityCommand {
            zoom_direction: ScalarDirection::Zero,
            zoom_rate: 0.0,
        }
    }
}

/// Owns the current view onto the plot and applies pan/zoom commands to it.
/// Keyboard commands are velocities integrated over time; mouse drags and
/// scroll events are applied immediately.
#[derive(Clone, Debug)]
pub struct ViewControl {
    image_specification: ImageSpecification,
    initial_image_specification: ImageSpecification,
    time: f64,
}

impl ViewControl {
    pub fn new(time: f64, image_specification: &ImageSpecification) -> Self {
        Self {
            image_specification: *image_specification,
            initial_image_specification: *image_specification,
            time,
        }
    }

    pub fn reset(&mut self) {
        self.image_specification = self.initial_image_specification;
    }

    pub fn image_specification(&self) -> &ImageSpecification {
        &self.image_specification
    }

    /// Integrates the keyboard velocity commands from the previous call up to `time`.
    ///
    /// @return: true iff the view changed.
    pub fn update(
        &mut self,
        time: f64,
        pan_command: &PanVelocityCommand,
        zoom_command: &ZoomVelocityCommand,
    ) -> bool {
        let delta_time = (time - self.time).max(0.0);
        self.time = time;

        let direction = [
            pan_command.direction[0].apply_to_magnitude(1.0),
            pan_command.direction[1].apply_to_magnitude(1.0),
        ];
        // Diagonal panning moves at the same apparent speed as straight panning.
        let length = (direction[0] * direction[0] + direction[1] * direction[1]).sqrt();
        let mut view_was_modified = false;
        if length > 0.0 && pan_command.pan_rate != 0.0 {
            let step = pan_command.pan_rate * delta_time / length;
            for (axis, unit) in direction.iter().enumerate() {
                self.image_specification.center[axis] +=
                    unit * step * self.image_specification.dimensions[axis];
            }
            view_was_modified = delta_time > 0.0;
        }

        let log_scale = -zoom_command
            .zoom_direction
            .apply_to_magnitude(zoom_command.zoom_rate)
            * delta_time;
        if log_scale != 0.0 {
            let center = self.image_specification.center;
            view_was_modified |= self.zoom_about_point(center, log_scale.exp());
        }
        view_was_modified
    }

    /// Moves the view so the content follows a mouse drag of `pixel_delta`.
    pub fn drag(&mut self, pixel_delta: [f64; 2]) -> bool {
        if pixel_delta == [0.0, 0.0] {
            return false;
        }
        let pixel_size = self.image_specification.pixel_size();
        // Image rows count downward, so a downward drag raises the view center.
        self.image_specification.center[0] -= pixel_delta[0] * pixel_size[0];
        self.image_specification.center[1] += pixel_delta[1] * pixel_size[1];
        true
    }

    /// Scales the view by `scale` while keeping the point under `pixel` fixed
    /// on the screen. `scale < 1` zooms in.
    pub fn zoom_about_pixel(&mut self, pixel: [f64; 2], scale: f64) -> bool {
        let anchor = PixelMapper::new(&self.image_specification).map(&pixel);
        self.zoom_about_point([anchor[0], anchor[1]], scale)
    }

    fn zoom_about_point(&mut self, anchor: [f64; 2], scale: f64) -> bool {
        let spec = &mut self.image_specification;
        let dimensions = spec.dimensions.map(|d| d * scale);
        let in_range =
            |d: &f64| d.is_finite() && *d >= MIN_VIEW_DIMENSION && *d <= MAX_VIEW_DIMENSION;
        if scale <= 0.0 || scale == 1.0 || !dimensions.iter().all(in_range) {
            return false;
        }
        for axis in 0..2 {
            spec.center[axis] = anchor[axis] + (spec.center[axis] - anchor[axis]) * scale;
        }
        spec.dimensions = dimensions;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_spec() -> ImageSpecification {
        ImageSpecification {
            resolution: [101, 51],
            center: [0.0, 0.0],
            dimensions: [10.0, 5.0],
        }
    }

    #[test]
    fn test_direction_from_key_pair() {
        assert_eq!(ScalarDirection::from_key_pair(true, true), ScalarDirection::Zero);
        assert_eq!(ScalarDirection::from_key_pair(false, false), ScalarDirection::Zero);
        assert_eq!(ScalarDirection::from_key_pair(false, true), ScalarDirection::Pos);
        assert_eq!(ScalarDirection::from_key_pair(true, false), ScalarDirection::Neg);
    }

    #[test]
    fn test_keyboard_pan_scales_with_view() {
        let mut view = ViewControl::new(0.0, &test_spec());
        let pan = PanVelocityCommand {
            direction: [ScalarDirection::Pos, ScalarDirection::Zero],
            pan_rate: 0.2,
        };
        assert!(view.update(0.5, &pan, &ZoomVelocityCommand::zero()));
        // 0.2 widths/s * 0.5 s * 10 units
        assert_relative_eq!(view.image_specification().center[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(view.image_specification().center[1], 0.0);

        assert!(!view.update(1.0, &PanVelocityCommand::zero(), &ZoomVelocityCommand::zero()));
    }

    #[test]
    fn test_keyboard_zoom_in_shrinks_view() {
        let mut view = ViewControl::new(0.0, &test_spec());
        let zoom = ZoomVelocityCommand {
            zoom_direction: ScalarDirection::Pos,
            zoom_rate: 2.0_f64.ln(),
        };
        assert!(view.update(1.0, &PanVelocityCommand::zero(), &zoom));
        assert_relative_eq!(view.image_specification().width(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(view.image_specification().height(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_drag_moves_content_with_the_mouse() {
        let mut view = ViewControl::new(0.0, &test_spec());
        // Pixel size is 0.1 on both axes.
        assert!(view.drag([10.0, 10.0]));
        assert_relative_eq!(view.image_specification().center[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(view.image_specification().center[1], 1.0, epsilon = 1e-12);
        assert!(!view.drag([0.0, 0.0]));
    }

    #[test]
    fn test_zoom_about_pixel_keeps_anchor_fixed() {
        let mut view = ViewControl::new(0.0, &test_spec());
        let pixel = [75.0, 10.0];
        let before = PixelMapper::new(view.image_specification()).map(&pixel);
        assert!(view.zoom_about_pixel(pixel, 0.5));
        let after = PixelMapper::new(view.image_specification()).map(&pixel);
        assert_relative_eq!(before[0], after[0], epsilon = 1e-12);
        assert_relative_eq!(before[1], after[1], epsilon = 1e-12);
        assert_relative_eq!(view.image_specification().width(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zoom_rejects_degenerate_scale() {
        let mut view = ViewControl::new(0.0, &test_spec());
        assert!(!view.zoom_about_pixel([0.0, 0.0], 0.0));
        assert!(!view.zoom_about_pixel([0.0, 0.0], -2.0));
        assert!(!view.zoom_about_pixel([0.0, 0.0], 1e-20));
        assert_eq!(*view.image_specification(), test_spec());
    }

    #[test]
    fn test_reset_restores_initial_view() {
        let mut view = ViewControl::new(0.0, &test_spec());
        view.drag([3.0, -7.0]);
        view.zoom_about_pixel([20.0, 20.0], 0.25);
        view.reset();
        assert_eq!(*view.image_specification(), test_spec());
    }
}
