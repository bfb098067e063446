use std::path::Path;

use image::{
    RgbImage,
    imageops::{self, FilterType},
};
use ndarray::Array3;

use crate::{MlErr, Result};

/// The per channel ImageNet training set mean, in RGB order over `[0, 255]` pixel values.
pub const MEAN_RGB: [f32; 3] = [123.68, 116.779, 103.939];

/// Decodes an image file into 8 bit RGB, whatever its original color type.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| MlErr::Image {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(img.to_rgb8())
}

/// Resizes the image to `height x width` and only then subtracts the channel means.
///
/// The order matters: the resize interpolates the raw `u8` pixels, exactly as the pretrained
/// weights expect.
pub fn preprocess(img: &RgbImage, height: u32, width: u32) -> Array3<f32> {
    subtract_mean(&resize(img, height, width))
}

/// Bilinear resize, a no-op copy when the image already has the requested size.
pub fn resize(img: &RgbImage, height: u32, width: u32) -> RgbImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }

    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Converts the image into a `[h, w, 3]` array with [`MEAN_RGB`] subtracted.
pub fn subtract_mean(img: &RgbImage) -> Array3<f32> {
    let (w, h) = img.dimensions();

    Array3::from_shape_fn((h as usize, w as usize, 3), |(y, x, c)| {
        f32::from(img.get_pixel(x as u32, y as u32)[c]) - MEAN_RGB[c]
    })
}
