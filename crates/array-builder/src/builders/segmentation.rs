//! Segmentation mask arrays

use std::sync::Arc;

use frame_resize::{FsImageDecoder, ImageDecoder};
use ndarray::{Array3, ArrayView3, Axis, Zip};
use tracing::debug;

use super::image::load_frame;
use super::ArrayBuilder;
use crate::error::ArrayError;
use crate::modality::Modality;
use crate::parameters::{SegmentationClass, SegmentationParameters};
use crate::source::Source;
use crate::tensor::{ArrayData, Tensor};
use crate::transform::Transform;

/// Mask image turned into one binary channel per class colour.
///
/// A pixel is marked for a class when every channel lies within
/// `color ± rgb_range`. Classes are not mutually exclusive: with
/// overlapping windows a pixel can be marked in several channels.
#[derive(Clone)]
pub struct SegmentationArray {
    decoder: Arc<dyn ImageDecoder>,
}

impl SegmentationArray {
    pub fn new(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { decoder }
    }
}

impl Default for SegmentationArray {
    fn default() -> Self {
        Self::new(Arc::new(FsImageDecoder))
    }
}

/// Stack per-class colour masks along a trailing axis, `(h, w, classes)`
pub(crate) fn color_masks(
    image: ArrayView3<'_, u8>,
    classes: &[SegmentationClass],
    rgb_range: u8,
) -> Array3<u8> {
    let (height, width, _) = image.dim();
    let range = i32::from(rgb_range);
    let mut masks = Array3::zeros((height, width, classes.len()));

    for (c, class) in classes.iter().enumerate() {
        let color = class.color.map(i32::from);
        Zip::from(masks.index_axis_mut(Axis(2), c))
            .and(image.lanes(Axis(2)))
            .for_each(|mask, pixel| {
                let inside = (0..3).all(|ch| {
                    let v = i32::from(pixel[ch]);
                    color[ch] - range <= v && v <= color[ch] + range
                });
                *mask = u8::from(inside);
            });
    }
    masks
}

impl ArrayBuilder for SegmentationArray {
    type Params = SegmentationParameters;
    type Fitted = dyn Transform;

    fn modality(&self) -> Modality {
        Modality::Segmentation
    }

    fn create(&self, source: &Source, params: &SegmentationParameters) -> Result<ArrayData, ArrayError> {
        let frame = load_frame(
            self.decoder.as_ref(),
            Modality::Segmentation,
            source,
            (params.height, params.width),
            params.process,
        )?;
        let masks = color_masks(frame.view(), &params.classes, params.rgb_range);
        debug!(
            "Created segmentation mask {:?} from {}",
            masks.shape(),
            source.describe()
        );
        Ok(ArrayData::Tensor(Tensor::U8(masks.into_dyn())))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        _transform: &dyn Transform,
        _params: &SegmentationParameters,
    ) -> Result<ArrayData, ArrayError> {
        Ok(data)
    }
}
