//! Image arrays

use std::sync::Arc;

use frame_resize::{resize_frame, Frame, FrameMode, FsImageDecoder, ImageDecoder};
use ndarray::{Array3, ArrayD, Axis};
use tracing::debug;

use super::{expect_tensor, ArrayBuilder};
use crate::error::ArrayError;
use crate::modality::Modality;
use crate::parameters::{ImageNetwork, ImageParameters, ImageScaling};
use crate::source::Source;
use crate::tensor::{ArrayData, Tensor};
use crate::transform::{column_transform, Transform};

/// Decode `source` and shape it to `(height, width, 3)`
pub(crate) fn load_frame(
    decoder: &dyn ImageDecoder,
    modality: Modality,
    source: &Source,
    target_shape: (u32, u32),
    mode: FrameMode,
) -> Result<Array3<u8>, ArrayError> {
    let path = source
        .as_path()
        .ok_or_else(|| ArrayError::malformed(modality, source, "expected an image path"))?;
    let img = decoder
        .decode(path)
        .map_err(|e| ArrayError::decode(modality, source, e))?;
    let frame = resize_frame(&Frame::from_image(img), target_shape, mode)
        .map_err(|e| ArrayError::decode(modality, source, e))?;
    frame
        .to_array()
        .map_err(|e| ArrayError::decode(modality, source, e))
}

/// Decoded, resized RGB frame; flattened for linear networks
#[derive(Clone)]
pub struct ImageArray {
    decoder: Arc<dyn ImageDecoder>,
}

impl ImageArray {
    pub fn new(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { decoder }
    }

    /// Apply the transform to each leading-axis row independently
    fn per_sample(array: &ArrayD<f64>, transform: &dyn Transform) -> Result<ArrayD<f64>, ArrayError> {
        if array.ndim() == 0 {
            return Err(ArrayError::ShapeMismatch {
                modality: Modality::Image,
                expected: vec![0],
                actual: vec![],
            });
        }
        let mut out = ArrayD::zeros(array.raw_dim());
        for (mut dst, row) in out.axis_iter_mut(Axis(0)).zip(array.axis_iter(Axis(0))) {
            let scaled = transform
                .transform(row.view())
                .map_err(ArrayError::transform(Modality::Image))?;
            if scaled.shape() != row.shape() {
                return Err(ArrayError::ShapeMismatch {
                    modality: Modality::Image,
                    expected: row.shape().to_vec(),
                    actual: scaled.shape().to_vec(),
                });
            }
            dst.assign(&scaled);
        }
        Ok(out)
    }
}

impl Default for ImageArray {
    fn default() -> Self {
        Self::new(Arc::new(FsImageDecoder))
    }
}

impl ArrayBuilder for ImageArray {
    type Params = ImageParameters;
    type Fitted = dyn Transform;

    fn modality(&self) -> Modality {
        Modality::Image
    }

    fn create(&self, source: &Source, params: &ImageParameters) -> Result<ArrayData, ArrayError> {
        let frame = load_frame(
            self.decoder.as_ref(),
            Modality::Image,
            source,
            (params.height, params.width),
            params.process,
        )?;
        let array = match params.network {
            ImageNetwork::Convolutional => frame.into_dyn(),
            ImageNetwork::Linear => {
                let n = frame.len();
                frame
                    .into_shape_with_order(n)
                    .map_err(|e| ArrayError::decode(Modality::Image, source, e))?
                    .into_dyn()
            }
        };
        debug!("Created image array {:?} from {}", array.shape(), source.describe());
        Ok(ArrayData::Tensor(Tensor::U8(array)))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        transform: &dyn Transform,
        params: &ImageParameters,
    ) -> Result<ArrayData, ArrayError> {
        let array = expect_tensor(Modality::Image, data)?.to_f64();
        let out = match params.preprocessing {
            ImageScaling::ImageScaler => Self::per_sample(&array, transform)?,
            ImageScaling::MinMaxScaler | ImageScaling::None => {
                column_transform(Modality::Image, &array, transform)?
            }
        };
        Ok(ArrayData::Tensor(Tensor::F32(out.mapv(|v| v as f32))))
    }
}
