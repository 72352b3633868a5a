use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use crate::errors::PredictError;

/// Decoded RGB frame handed to a predictor.
#[derive(Debug, Clone, Default)]
pub struct PredictImage {
    pub image: RgbImage,
}

impl std::ops::Deref for PredictImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl From<DynamicImage> for PredictImage {
    fn from(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }
}

impl From<GrayImage> for PredictImage {
    fn from(image: GrayImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<RgbImage> for PredictImage {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

impl From<RgbaImage> for PredictImage {
    fn from(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::from(image).to_rgb8(),
        }
    }
}

impl From<PredictImage> for RgbImage {
    fn from(image: PredictImage) -> Self {
        image.image
    }
}

impl PredictImage {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Builds a frame from packed `0xAARRGGBB` pixels, the layout camera and bitmap APIs hand out.
    /// Alpha is dropped.
    pub fn from_argb(pixels: &[u32], width: u32, height: u32) -> Result<Self, PredictError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(PredictError::preprocess(format!(
                "expected {} ARGB pixels for {}x{}, got {}",
                expected, width, height, pixels.len()
            )));
        }

        let raw = pixels
            .iter()
            .flat_map(|p| [(p >> 16) as u8, (p >> 8) as u8, *p as u8])
            .collect::<Vec<u8>>();

        RgbImage::from_raw(width, height, raw)
            .map(Self::new)
            .ok_or_else(|| PredictError::preprocess("ARGB buffer does not match its dimensions"))
    }
}
