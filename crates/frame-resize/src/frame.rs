//! RGB frame type and resize policies

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use ndarray::Array3;

use crate::{FrameError, FrameMode};

/// Decoded RGB frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
}

impl Frame {
    /// Create a frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
        if data.len() != (width as usize) * (height as usize) * 3 {
            return Err(FrameError::Buffer {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self { data, width, height })
    }

    /// Wrap a decoded image buffer
    pub fn from_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
        }
    }

    /// Crop a region of the frame
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Option<Frame> {
        if x + w > self.width || y + h > self.height {
            return None;
        }

        let mut cropped = Vec::with_capacity((w * h * 3) as usize);
        for row in y..(y + h) {
            let start = ((row * self.width + x) * 3) as usize;
            let end = start + (w * 3) as usize;
            cropped.extend_from_slice(&self.data[start..end]);
        }

        Some(Frame {
            data: cropped,
            width: w,
            height: h,
        })
    }

    /// Resize frame using bilinear interpolation
    pub fn resize(&self, new_width: u32, new_height: u32) -> Result<Frame, FrameError> {
        if (new_width, new_height) == (self.width, self.height) {
            return Ok(self.clone());
        }
        let img = self.to_image()?;
        let resized = imageops::resize(&img, new_width, new_height, FilterType::Triangle);
        Ok(Frame::from_image(resized))
    }

    /// Convert to an `image` buffer
    pub fn to_image(&self) -> Result<RgbImage, FrameError> {
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or(FrameError::Buffer {
            len: self.data.len(),
            width: self.width,
            height: self.height,
        })
    }

    /// View the frame as a `(height, width, 3)` array
    pub fn to_array(&self) -> Result<Array3<u8>, FrameError> {
        Array3::from_shape_vec(
            (self.height as usize, self.width as usize, 3),
            self.data.clone(),
        )
        .map_err(|e| FrameError::InvalidShape(e.to_string()))
    }
}

/// Shape a frame to `(height, width)` under the given policy.
///
/// The output always has exactly the target dimensions, whatever the source
/// size or aspect ratio.
pub fn resize_frame(
    frame: &Frame,
    target_shape: (u32, u32),
    mode: FrameMode,
) -> Result<Frame, FrameError> {
    let (target_h, target_w) = target_shape;
    if target_h == 0 || target_w == 0 {
        return Err(FrameError::InvalidShape(format!(
            "target shape {}x{} has a zero axis",
            target_h, target_w
        )));
    }
    if frame.width == 0 || frame.height == 0 {
        return Err(FrameError::InvalidShape("source frame is empty".into()));
    }

    match mode {
        FrameMode::Stretch => frame.resize(target_w, target_h),
        FrameMode::Fit => fit(frame, target_h, target_w),
        FrameMode::Cut => cut(frame, target_h, target_w),
    }
}

fn fit(frame: &Frame, target_h: u32, target_w: u32) -> Result<Frame, FrameError> {
    let scale = (target_h as f64 / frame.height as f64).min(target_w as f64 / frame.width as f64);
    let new_h = ((frame.height as f64 * scale) as u32).clamp(1, target_h);
    let new_w = ((frame.width as f64 * scale) as u32).clamp(1, target_w);

    let scaled = frame.resize(new_w, new_h)?.to_image()?;
    let mut canvas = RgbImage::from_pixel(target_w, target_h, Rgb([0, 0, 0]));
    let x = ((target_w - new_w) / 2) as i64;
    let y = ((target_h - new_h) / 2) as i64;
    imageops::overlay(&mut canvas, &scaled, x, y);

    Ok(Frame::from_image(canvas))
}

fn cut(frame: &Frame, target_h: u32, target_w: u32) -> Result<Frame, FrameError> {
    let scale = (target_h as f64 / frame.height as f64).max(target_w as f64 / frame.width as f64);
    let new_h = ((frame.height as f64 * scale).ceil() as u32).max(target_h);
    let new_w = ((frame.width as f64 * scale).ceil() as u32).max(target_w);

    let scaled = frame.resize(new_w, new_h)?;
    let x = (new_w - target_w) / 2;
    let y = (new_h - target_h) / 2;

    scaled.crop(x, y, target_w, target_h).ok_or_else(|| {
        FrameError::InvalidShape(format!(
            "crop {}x{} at ({}, {}) exceeds {}x{}",
            target_w, target_h, x, y, new_w, new_h
        ))
    })
}
