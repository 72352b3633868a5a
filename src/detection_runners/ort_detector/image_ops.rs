//! File adapted from: https://github.com/jamjamjon
//!
//! Functions to preprocess images.

use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::imageops::FilterType as ImageFilterType;
use image::{DynamicImage, Rgb, RgbImage};
use rayon::prelude::*;
use crate::common::BBox;
use crate::detection_runners::ort_detector::input_wrapper::X;
use crate::errors::PredictError;

/// Grey used for letterbox borders, matching the value YOLO models are trained with.
pub const LETTERBOX_FILL: u8 = 114;

/// How a source frame was mapped onto the model input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageTransformInfo {
    pub width_src: u32,
    pub height_src: u32,
    pub width_dst: u32,
    pub height_dst: u32,
    pub width_scale: f32,
    pub height_scale: f32,
    pub width_pad: f32,
    pub height_pad: f32,
}

impl ImageTransformInfo {
    /// Maps a box in model-input coordinates back onto the source frame, clipped to its bounds.
    pub fn to_source(&self, bbox: BBox) -> BBox {
        BBox::new(
            (bbox.x1 - self.width_pad) / self.width_scale,
            (bbox.y1 - self.height_pad) / self.height_scale,
            (bbox.x2 - self.width_pad) / self.width_scale,
            (bbox.y2 - self.height_pad) / self.height_scale,
        )
        .clip(self.width_src as f32, self.height_src as f32)
    }
}

/// Letterboxes `image` into a `size` x `size` square and returns the normalized NCHW tensor.
pub fn letterbox(image: &RgbImage, size: u32) -> Result<(X, ImageTransformInfo), PredictError> {
    let (width_src, height_src) = check_dimensions(image, size)?;

    let scale = (size as f32 / width_src as f32).min(size as f32 / height_src as f32);
    let w = ((width_src as f32 * scale).round() as u32).clamp(1, size);
    let h = ((height_src as f32 * scale).round() as u32).clamp(1, size);
    let width_pad = (size - w) / 2;
    let height_pad = (size - h) / 2;

    let resized = resize(image, w, h);
    let mut canvas = RgbImage::from_pixel(size, size, Rgb([LETTERBOX_FILL; 3]));
    image::imageops::replace(&mut canvas, &resized, width_pad as i64, height_pad as i64);

    let info = ImageTransformInfo {
        width_src,
        height_src,
        width_dst: size,
        height_dst: size,
        width_scale: scale,
        height_scale: scale,
        width_pad: width_pad as f32,
        height_pad: height_pad as f32,
    };
    Ok((nchw_normalize(&canvas)?, info))
}

/// Stretches `image` to a `size` x `size` square without preserving aspect ratio.
pub fn fit_exact(image: &RgbImage, size: u32) -> Result<(X, ImageTransformInfo), PredictError> {
    let (width_src, height_src) = check_dimensions(image, size)?;

    let resized = resize(image, size, size);
    let info = ImageTransformInfo {
        width_src,
        height_src,
        width_dst: size,
        height_dst: size,
        width_scale: size as f32 / width_src as f32,
        height_scale: size as f32 / height_src as f32,
        width_pad: 0.,
        height_pad: 0.,
    };
    Ok((nchw_normalize(&resized)?, info))
}

fn check_dimensions(image: &RgbImage, size: u32) -> Result<(u32, u32), PredictError> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(PredictError::preprocess("image has no pixels"));
    }
    if size == 0 {
        return Err(PredictError::preprocess("model input size is zero"));
    }
    Ok((w, h))
}

fn resize(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }

    let src = DynamicImage::ImageRgb8(image.clone());
    let mut dst = DynamicImage::new_rgb8(width, height);
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));

    let mut resizer = Resizer::new();
    if let Err(err) = resizer.resize(&src, &mut dst, &options) {
        log::warn!("Failed to use `fast_image_resize`: {err}. Falling back.");
        return image::imageops::resize(image, width, height, ImageFilterType::Triangle);
    }
    dst.into_rgb8()
}

/// `[0, 255]` interleaved RGB to `[0, 1]` planar `1x3xHxW`.
fn nchw_normalize(image: &RgbImage) -> Result<X, PredictError> {
    let (w, h) = image.dimensions();
    let plane = w as usize * h as usize;
    let raw = image.as_raw();

    let mut data = vec![0f32; 3 * plane];
    data.par_chunks_mut(plane)
        .enumerate()
        .for_each(|(channel, out)| {
            for (i, v) in out.iter_mut().enumerate() {
                *v = raw[i * 3 + channel] as f32 / 255.;
            }
        });

    X::from_shape_vec(&[1, 3, h as usize, w as usize], data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letterbox_pads_the_short_side() {
        let image = RgbImage::from_pixel(200, 100, Rgb([255, 0, 0]));
        let (x, info) = letterbox(&image, 100).unwrap();

        assert_eq!(x.shape(), &[1, 3, 100, 100]);
        assert_eq!(info.width_scale, 0.5);
        assert_eq!(info.width_pad, 0.);
        assert_eq!(info.height_pad, 25.);
        // border row is padding grey, center row is the red frame
        assert!((x[[0, 0, 0, 50]] - 114. / 255.).abs() < 1e-6);
        assert!((x[[0, 0, 50, 50]] - 1.).abs() < 1e-6);
        assert!(x[[0, 1, 50, 50]].abs() < 1e-6);
    }

    #[test]
    fn boxes_map_back_to_source() {
        let info = ImageTransformInfo {
            width_src: 200,
            height_src: 100,
            width_dst: 100,
            height_dst: 100,
            width_scale: 0.5,
            height_scale: 0.5,
            width_pad: 0.,
            height_pad: 25.,
        };
        let mapped = info.to_source(BBox::new(10., 25., 30., 80.));
        assert_eq!(mapped, BBox::new(20., 0., 60., 100.));
    }

    #[test]
    fn empty_image_is_rejected() {
        assert!(matches!(letterbox(&RgbImage::new(0, 0), 64), Err(PredictError::Preprocess(_))));
    }
}
