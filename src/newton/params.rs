use serde::{Deserialize, Serialize};

use crate::core::image_utils::FitImage;

use super::solver::SolverParams;

/// Compute sqrt(`target_value`), starting the iteration at `initial_guess`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Problem {
    pub target_value: f64,
    pub initial_guess: f64,
}

/// Complete set of parameters that are read from a JSON parameter file.
/// Only `problems` is required; the solver and plot settings fall back to
/// their defaults when omitted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewtonParams {
    pub problems: Vec<Problem>,
    #[serde(default)]
    pub solver: SolverParams,
    #[serde(default)]
    pub plot: PlotParams,
}

impl Default for NewtonParams {
    fn default() -> Self {
        NewtonParams {
            problems: default_problems(),
            solver: SolverParams::default(),
            plot: PlotParams::default(),
        }
    }
}

impl NewtonParams {
    /// Checks the preconditions that the plotting code asserts on, so that a
    /// bad parameter file is reported up front instead of panicking mid-render.
    pub fn validate(&self) -> Result<(), String> {
        let resolution = self.plot.fit_image.resolution;
        if resolution.iter().any(|&n| n < 2) {
            return Err(format!(
                "plot.fit_image.resolution must be at least 2 pixels on each axis, got {:?}",
                resolution
            ));
        }
        if self.plot.curve_sample_count < 2 {
            return Err(format!(
                "plot.curve_sample_count must be at least 2, got {}",
                self.plot.curve_sample_count
            ));
        }
        let padding_scale = self.plot.fit_image.padding_scale;
        if padding_scale.is_nan() || padding_scale <= 0.0 {
            return Err(format!(
                "plot.fit_image.padding_scale must be positive, got {}",
                padding_scale
            ));
        }
        Ok(())
    }
}

/// Reads, parses, and validates a JSON parameter file.
pub fn read_parameter_file(path: &str) -> Result<NewtonParams, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("Unable to read param file `{}`: {}", path, err))?;
    let params: NewtonParams = serde_json::from_str(&text)
        .map_err(|err| format!("Unable to parse param file `{}`: {}", path, err))?;
    params
        .validate()
        .map_err(|err| format!("Invalid param file `{}`: {}", path, err))?;
    Ok(params)
}

/// The four worked examples: sqrt(3), sqrt(7), sqrt(20), and sqrt(99).
pub fn default_problems() -> Vec<Problem> {
    [(3.0, 2.0), (7.0, 3.0), (20.0, 4.0), (99.0, 10.0)]
        .iter()
        .map(|&(target_value, initial_guess)| Problem {
            target_value,
            initial_guess,
        })
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlotParams {
    pub fit_image: FitImage,
    /// The curve is drawn over `[0, initial_guess + curve_x_margin]`.
    pub curve_x_margin: f64,
    pub curve_sample_count: usize,
    pub curve_width_pixels: u32,
    pub tangent_width_pixels: u32,
    pub dash_length_pixels: f64,
    pub tangent_marker_radius_pixels: u32,
    pub start_marker_radius_pixels: u32,
    pub background_color_rgb: [u8; 3],
    pub grid_color_rgb: [u8; 3],
    pub axis_color_rgb: [u8; 3],
    pub curve_color_rgb: [u8; 3],
    pub start_marker_color_rgb: [u8; 3],
    /// Tangent colors are assigned by iteration, cycling through this list.
    pub tangent_colors_rgb: Vec<[u8; 3]>,
}

impl Default for PlotParams {
    fn default() -> Self {
        PlotParams {
            fit_image: FitImage {
                resolution: [1000, 600],
                padding_scale: 1.1,
            },
            curve_x_margin: 2.0,
            curve_sample_count: 1000,
            curve_width_pixels: 2,
            tangent_width_pixels: 2,
            dash_length_pixels: 6.0,
            tangent_marker_radius_pixels: 3,
            start_marker_radius_pixels: 4,
            background_color_rgb: [255, 255, 255],
            grid_color_rgb: [235, 236, 240],
            axis_color_rgb: [0, 0, 0],
            curve_color_rgb: [0, 0, 255],
            start_marker_color_rgb: [0, 128, 0],
            tangent_colors_rgb: vec![
                [99, 110, 250],
                [239, 85, 59],
                [0, 204, 150],
                [171, 99, 250],
                [255, 161, 90],
                [25, 211, 243],
                [255, 102, 146],
                [182, 232, 128],
                [255, 151, 255],
                [254, 203, 82],
            ],
        }
    }
}

impl PlotParams {
    /// Color of the tangent drawn for the iteration with the given (1-based) index.
    pub fn tangent_color(&self, iteration_index: u32) -> image::Rgb<u8> {
        if self.tangent_colors_rgb.is_empty() {
            return image::Rgb(self.axis_color_rgb);
        }
        let slot = (iteration_index.saturating_sub(1) as usize) % self.tangent_colors_rgb.len();
        image::Rgb(self.tangent_colors_rgb[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problems_only_parameter_file() {
        let text = r#"{ "problems": [ { "target_value": 2.0, "initial_guess": 1.0 } ] }"#;
        let params: NewtonParams = serde_json::from_str(text).unwrap();
        assert_eq!(params.problems.len(), 1);
        assert_eq!(params.solver, SolverParams::default());
        assert_eq!(params.plot, PlotParams::default());
    }

    #[test]
    fn test_partial_plot_parameters() {
        let text = r#"{
            "problems": [],
            "solver": { "tolerance": 1e-9, "max_iterations": 25 },
            "plot": { "curve_sample_count": 50, "fit_image": { "resolution": [320, 200], "padding_scale": 1.0 } }
        }"#;
        let params: NewtonParams = serde_json::from_str(text).unwrap();
        assert_eq!(params.solver.max_iterations, 25);
        assert_eq!(params.plot.curve_sample_count, 50);
        assert_eq!(params.plot.fit_image.resolution, [320, 200]);
        assert_eq!(params.plot.curve_x_margin, 2.0);
    }

    #[test]
    fn test_read_missing_parameter_file() {
        let err = read_parameter_file("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn test_validate_rejects_degenerate_plot_settings() {
        assert!(NewtonParams::default().validate().is_ok());

        let mut params = NewtonParams::default();
        params.plot.fit_image.resolution = [1, 600];
        assert!(params.validate().unwrap_err().contains("resolution"));

        let mut params = NewtonParams::default();
        params.plot.curve_sample_count = 1;
        assert!(params.validate().unwrap_err().contains("curve_sample_count"));

        let mut params = NewtonParams::default();
        params.plot.fit_image.padding_scale = 0.0;
        assert!(params.validate().unwrap_err().contains("padding_scale"));
    }

    #[test]
    fn test_read_invalid_parameter_file_names_the_path() {
        let directory = std::env::temp_dir().join("newton_sqrt_explorer_params_test");
        std::fs::create_dir_all(&directory).unwrap();
        let path = directory.join("one_pixel_wide.json");
        std::fs::write(
            &path,
            r#"{ "problems": [ { "target_value": 2.0, "initial_guess": 1.0 } ],
                 "plot": { "fit_image": { "resolution": [1, 100], "padding_scale": 1.0 } } }"#,
        )
        .unwrap();

        let path_str = path.to_str().unwrap();
        let err = read_parameter_file(path_str).unwrap_err().to_string();
        assert!(err.contains(path_str), "{}", err);
        assert!(err.contains("resolution"), "{}", err);
    }

    #[test]
    fn test_default_problems() {
        let problems = default_problems();
        let targets: Vec<f64> = problems.iter().map(|p| p.target_value).collect();
        let guesses: Vec<f64> = problems.iter().map(|p| p.initial_guess).collect();
        assert_eq!(targets, vec![3.0, 7.0, 20.0, 99.0]);
        assert_eq!(guesses, vec![2.0, 3.0, 4.0, 10.0]);
    }

    #[test]
    fn test_tangent_colors_cycle() {
        let plot = PlotParams::default();
        let n = plot.tangent_colors_rgb.len() as u32;
        assert_eq!(plot.tangent_color(1), plot.tangent_color(n + 1));
        assert_ne!(plot.tangent_color(1), plot.tangent_color(2));
    }
}
