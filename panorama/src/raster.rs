//! Paints projected rays into an image, one column per ray.

use crate::math::linspace;
use image::{Rgba, RgbaImage};
use terrain::Ray;

/// Image height in pixels.
pub const HEIGHT: u32 = 360;

/// Row just below the horizon line.
pub const HORIZON: i32 = 180;

pub const SKY: Rgba<u8> = Rgba([128, 128, 255, 255]);
pub const WATER: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const RIDGE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Gray level of the nearest sample.
const DARKEST: f64 = 16.0;

/// Gray level of the farthest sample.
const WHITEST: f64 = 240.0;

/// Returns a sky-filled image with every ray's visible terrain
/// painted in its own column.
///
/// Projected and row values of each ray must already be filled in.
pub fn render(rays: &[Ray], oceanfront: bool) -> RgbaImage {
    #[allow(clippy::cast_possible_truncation)]
    let width = rays.len() as u32;
    let mut image = RgbaImage::from_pixel(width, HEIGHT, SKY);
    for (x, ray) in rays.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        draw_column(&mut image, x as u32, ray, oceanfront);
    }
    image
}

/// Walks `ray` from its farthest sample to its nearest.
///
/// A sample on the same row as the next nearer one is hidden by it
/// and skipped, leaving the last drawn farther row in place. A sample
/// above the next nearer one is visible and fills down to it. The top
/// of a visible run, one not continuing a farther run, gets a ridge
/// pixel.
fn draw_column(image: &mut RgbaImage, x: u32, ray: &Ray, oceanfront: bool) {
    let samples = &ray.samples;
    if samples.len() < 2 {
        return;
    }
    let shades: Vec<f64> = linspace(DARKEST, WHITEST, samples.len()).collect();

    let mut farther: Option<i32> = None;
    for index in (1..samples.len()).rev() {
        let current = samples[index];
        let nearer = samples[index - 1];

        if current.row == nearer.row {
            continue;
        }

        if current.row < nearer.row {
            let color = if oceanfront && current.elevation == 0 {
                WATER
            } else {
                gray(shades[index])
            };
            #[allow(clippy::cast_possible_wrap)]
            let bottom = nearer.row.min(HEIGHT as i32);
            for y in current.row.max(0)..bottom {
                put(image, x, y, color);
            }
            if farther.map_or(true, |row| row >= current.row) {
                put(image, x, current.row, RIDGE);
            }
        }

        farther = Some(current.row);
    }
}

fn gray(shade: f64) -> Rgba<u8> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let level = shade.round().clamp(0.0, 255.0) as u8;
    Rgba([level, level, level, 255])
}

/// Writes a pixel, discarding writes outside the image.
fn put(image: &mut RgbaImage, x: u32, y: i32, color: Rgba<u8>) {
    if let Ok(y) = u32::try_from(y) {
        if x < image.width() && y < image.height() {
            image.put_pixel(x, y, color);
        }
    }
}
