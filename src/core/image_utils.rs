use more_asserts::assert_gt;
use nalgebra::Vector2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/**
 * Fully specifies both an image resolution and how it is anchored into the "real"
 * space in which the plot lives. Unlike a fractal view, a plot has independent
 * scales on each axis, so both real-space dimensions are stored explicitly.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ImageSpecification {
    pub resolution: [u32; 2],
    pub center: [f64; 2],
    pub dimensions: [f64; 2], // [width, height] in real space
}

impl ImageSpecification {
    pub fn width(&self) -> f64 {
        self.dimensions[0]
    }

    pub fn height(&self) -> f64 {
        self.dimensions[1]
    }

    /// Real-space size of a single pixel along each axis.
    pub fn pixel_size(&self) -> [f64; 2] {
        [
            self.dimensions[0] / ((self.resolution[0] - 1) as f64),
            self.dimensions[1] / ((self.resolution[1] - 1) as f64),
        ]
    }
}

/**
 * Describes a rectangular region in space.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ViewRectangle {
    pub center: Vector2<f64>,
    pub dimensions: Vector2<f64>,
}

impl ViewRectangle {
    pub fn from_vertices(vertices: &[Vector2<f64>]) -> ViewRectangle {
        assert!(!vertices.is_empty());

        let mut min_corner = vertices[0];
        let mut max_corner = vertices[0];

        for vertex in vertices.iter() {
            min_corner = min_corner.inf(vertex);
            max_corner = max_corner.sup(vertex);
        }

        ViewRectangle {
            center: 0.5 * (min_corner + max_corner),
            dimensions: max_corner - min_corner,
        }
    }

    /// Grows any dimension smaller than `min_dimension`, keeping the center fixed.
    pub fn with_minimum_dimensions(&self, min_dimension: f64) -> ViewRectangle {
        ViewRectangle {
            center: self.center,
            dimensions: self.dimensions.map(|d| d.max(min_dimension)),
        }
    }
}

/**
 * Allows the user to specify only the resolution of the image and how much "extra space" to leave
 * around the subject of the plot. The real coordinates are derived from the data being plotted.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FitImage {
    pub resolution: [u32; 2],
    pub padding_scale: f64,
}

impl FitImage {
    pub fn image_specification(&self, view_rectangle: &ViewRectangle) -> ImageSpecification {
        ImageSpecification {
            resolution: self.resolution,
            center: [view_rectangle.center[0], view_rectangle.center[1]],
            dimensions: [
                self.padding_scale * view_rectangle.dimensions[0],
                self.padding_scale * view_rectangle.dimensions[1],
            ],
        }
    }
}

/**
 * Used to map from image space into the real space of the plot.
 */
#[derive(Clone, Debug)]
pub struct LinearPixelMap {
    offset: f64,
    slope: f64,
}

impl LinearPixelMap {
    /**
     * @param n: number of pixels spanned by [x0,x1]
     * @param x0: output of the map at 0
     * @param x1: output of the map at n-1
     */
    pub fn new(n: u32, x0: f64, x1: f64) -> LinearPixelMap {
        assert_gt!(n, 1);
        LinearPixelMap {
            offset: x0,
            slope: (x1 - x0) / ((n - 1) as f64),
        }
    }

    pub fn new_from_center_and_width(n: u32, center: f64, width: f64) -> LinearPixelMap {
        LinearPixelMap::new(n, center - 0.5 * width, center + 0.5 * width)
    }

    /// Pixel coordinate (possibly fractional) to real-space point.
    pub fn map(&self, pixel: f64) -> f64 {
        self.offset + self.slope * pixel
    }

    /// Real-space point to (fractional) pixel coordinate.
    pub fn inverse_map(&self, point: f64) -> f64 {
        (point - self.offset) / self.slope
    }
}

#[derive(Clone, Debug)]
pub struct PixelMapper {
    pub width: LinearPixelMap,
    pub height: LinearPixelMap,
}

impl PixelMapper {
    pub fn new(image_specification: &ImageSpecification) -> PixelMapper {
        PixelMapper {
            width: LinearPixelMap::new_from_center_and_width(
                image_specification.resolution[0],
                image_specification.center[0],
                image_specification.width(),
            ),
            // Image rows count downward, real-space y counts upward.
            height: LinearPixelMap::new_from_center_and_width(
                image_specification.resolution[1],
                image_specification.center[1],
                -image_specification.height(),
            ),
        }
    }

    pub fn map(&self, pixel: &[f64; 2]) -> Vector2<f64> {
        Vector2::new(self.width.map(pixel[0]), self.height.map(pixel[1]))
    }

    pub fn inverse_map(&self, point: &Vector2<f64>) -> [f64; 2] {
        [
            self.width.inverse_map(point[0]),
            self.height.inverse_map(point[1]),
        ]
    }
}

/// Real-space extent covered by a single pixel, as closed intervals `[low, upp]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelFootprint {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/**
 * Given image size parameters, evaluate `pixel_renderer` on the footprint of
 * every pixel and write the resulting color into `image`. Rows are processed
 * in parallel.
 */
pub fn generate_image_in_place<F>(
    spec: &ImageSpecification,
    pixel_renderer: F,
    image: &mut image::RgbImage,
) where
    F: Fn(&PixelFootprint) -> image::Rgb<u8> + Sync,
{
    assert_eq!(image.dimensions(), (spec.resolution[0], spec.resolution[1]));
    let pixel_mapper = PixelMapper::new(spec);
    let [half_x, half_y] = spec.pixel_size().map(|s| 0.5 * s);
    let row_stride = 3 * spec.resolution[0] as usize;

    image
        .par_chunks_mut(row_stride)
        .enumerate()
        .for_each(|(row, data)| {
            let y = pixel_mapper.height.map(row as f64);
            for (col, pixel) in data.chunks_exact_mut(3).enumerate() {
                let x = pixel_mapper.width.map(col as f64);
                let footprint = PixelFootprint {
                    x: [x - half_x, x + half_x],
                    y: [y - half_y, y + half_y],
                };
                pixel.copy_from_slice(&pixel_renderer(&footprint).0);
            }
        });
}

pub fn write_image_to_file_or_panic<F, T, E>(filename: PathBuf, save_lambda: F)
where
    F: FnOnce(&PathBuf) -> Result<T, E>,
    E: std::fmt::Debug,
{
    save_lambda(&filename).unwrap_or_else(|err| {
        panic!(
            "ERROR:  Unable to write image file: {}  ({:?})",
            filename.display(),
            err
        )
    });
    println!("INFO:  Wrote image file to: {}", filename.display());
}
