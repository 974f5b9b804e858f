use iter_num_tools::lin_space;
use more_asserts::assert_ge;
use nalgebra::Vector2;

use crate::core::{
    image_utils::{ImageSpecification, ViewRectangle},
    plot::{HorizontalLine, LineStyle, Marker, PlotScene, Polyline},
};

use super::{
    params::{PlotParams, Problem},
    solver::{ScalarFunctionWithSlope, Solution, SquareRootResidual},
};

/// The view never collapses below this size on either axis, even if all of
/// the plotted data lies on a single point.
const MIN_VIEW_DIMENSION: f64 = 1.0;

/// Builds the curve `f(x) = x^2 - N`, the `y = 0` axis, and one tangent
/// segment (with markers) for each recorded iteration.
pub fn build_plot_scene(problem: &Problem, solution: &Solution, plot: &PlotParams) -> PlotScene {
    assert_ge!(plot.curve_sample_count, 2);
    let function = SquareRootResidual {
        target_value: problem.target_value,
    };

    let curve_points = lin_space(
        0.0..=(problem.initial_guess + plot.curve_x_margin),
        plot.curve_sample_count,
    )
    .map(|x| Vector2::new(x, function.value(x)))
    .collect();

    let mut polylines = vec![Polyline {
        points: curve_points,
        color: image::Rgb(plot.curve_color_rgb),
        width_pixels: plot.curve_width_pixels,
        style: LineStyle::Solid,
    }];
    let mut markers = Vec::new();

    for record in solution.records.records() {
        let start = Vector2::new(record.x_curr, record.f_x);
        let intercept = Vector2::new(record.x_next, 0.0);
        let color = plot.tangent_color(record.index);
        polylines.push(Polyline {
            points: vec![start, intercept],
            color,
            width_pixels: plot.tangent_width_pixels,
            style: LineStyle::Dashed {
                dash_length_pixels: plot.dash_length_pixels,
            },
        });
        markers.push(Marker {
            point: intercept,
            color,
            radius_pixels: plot.tangent_marker_radius_pixels,
        });
        markers.push(Marker {
            point: start,
            color: image::Rgb(plot.start_marker_color_rgb),
            radius_pixels: plot.start_marker_radius_pixels,
        });
    }

    PlotScene {
        background_color: image::Rgb(plot.background_color_rgb),
        grid_color: image::Rgb(plot.grid_color_rgb),
        horizontal_lines: vec![HorizontalLine {
            y: 0.0,
            color: image::Rgb(plot.axis_color_rgb),
            width_pixels: 1,
        }],
        polylines,
        markers,
    }
}

/// Initial view: the whole scene, padded by `plot.fit_image.padding_scale`.
pub fn fit_view(scene: &PlotScene, plot: &PlotParams) -> ImageSpecification {
    let view_rectangle = scene
        .bounding_rectangle()
        .unwrap_or_else(|| ViewRectangle {
            center: Vector2::zeros(),
            dimensions: Vector2::zeros(),
        })
        .with_minimum_dimensions(MIN_VIEW_DIMENSION);
    plot.fit_image.image_specification(&view_rectangle)
}

/// Title used for the interactive window and printed alongside the render.
pub fn plot_title(problem: &Problem, solution: &Solution) -> String {
    format!(
        "Newton-Raphson for √{} (Final Root: {:.5})",
        problem.target_value,
        solution.estimate()
    )
}
