use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use array_builder::{
    ArrayBuilders, ArrayData, ArrayError, AudioDecoder, AudioParameter, AudioParameters,
    ClassificationParameters, DType, IdentityTransform, ImageDecoder, ImageParameters,
    ImageScaler, ImageScaling, Modality, Parameters, Preprocessor, ResampleAlgorithm,
    ScalerParams, SegmentationClass, SegmentationParameters, Source, StandardScaler,
    TextParameters, TimeseriesParameters, Tokenizer, Transform, TransformError, TrendParameters,
    Waveform,
};
use frame_resize::FrameError;
use image::{Rgb, RgbImage};
use ndarray::{ArrayD, ArrayViewD};

/// Images held in memory, keyed by path
struct MemoryImages(HashMap<String, RgbImage>);

impl ImageDecoder for MemoryImages {
    fn decode(&self, path: &Path) -> Result<RgbImage, FrameError> {
        let key = path.to_string_lossy();
        self.0
            .get(key.as_ref())
            .cloned()
            .ok_or_else(|| FrameError::InvalidShape(format!("no image at {}", key)))
    }
}

/// Every file is a 1.5 s ramp at whatever rate is requested
struct ShortClips;

impl AudioDecoder for ShortClips {
    fn load(
        &self,
        _path: &Path,
        sample_rate: u32,
        offset: f64,
        duration: f64,
        _resample: ResampleAlgorithm,
    ) -> Result<Waveform, Box<dyn Error + Send + Sync>> {
        let sr = f64::from(sample_rate);
        let start = (offset * sr) as usize;
        let end = ((offset + duration).min(1.5) * sr) as usize;
        let samples = (start..end.max(start))
            .map(|i| ((i % 100) as f32 / 100.0) - 0.5)
            .collect();
        Ok(Waveform {
            samples,
            sample_rate,
        })
    }
}

fn builders() -> ArrayBuilders {
    let mut images = HashMap::new();
    let mut mask = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));
    mask.put_pixel(3, 3, Rgb([250, 5, 5]));
    images.insert("mask.png".to_string(), mask);
    images.insert("photo.png".to_string(), RgbImage::from_pixel(16, 8, Rgb([255, 128, 0])));
    images.insert(
        "ramp.png".to_string(),
        RgbImage::from_fn(8, 4, |x, y| Rgb([(10 * (y + 1) + x) as u8; 3])),
    );

    ArrayBuilders::new()
        .with_image_decoder(Arc::new(MemoryImages(images)))
        .with_audio_decoder(Arc::new(ShortClips))
}

fn tensor_shape(data: &ArrayData) -> Vec<usize> {
    data.as_tensor().map(|t| t.shape().to_vec()).unwrap_or_default()
}

#[test]
fn test_timeseries_padding() {
    let params = Parameters::Timeseries(TimeseriesParameters { length: 5 });
    let out = builders().create(&Source::from(vec![1.0, 2.0, 3.0]), &params).unwrap();
    let values: Vec<f64> = out.as_tensor().unwrap().to_f64().iter().copied().collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 0.0, 0.0]);
}

#[test]
fn test_classification_one_hot() {
    let params = Parameters::Classification(ClassificationParameters::new(["cat", "dog"], true));
    let out = builders().create(&Source::from("dog"), &params).unwrap();
    let tensor = out.into_tensor().unwrap();
    assert_eq!(tensor.dtype(), DType::U8);
    assert_eq!(tensor.as_u8().unwrap().as_slice().unwrap(), &[0, 1]);
}

#[test]
fn test_unknown_label_names_modality() {
    let params = Parameters::Categorical(ClassificationParameters::new(["cat", "dog"], false));
    let err = builders().create(&Source::from("bird"), &params).unwrap_err();
    assert_eq!(err.modality(), Some(Modality::Categorical));
    assert!(matches!(err, ArrayError::UnknownLabel { ref label, .. } if label == "bird"));
}

#[test]
fn test_trend_labels() {
    let params = Parameters::Trend(TrendParameters {
        deviation: 5.0,
        one_hot_encoding: false,
    });
    let label = |values: Vec<f64>| {
        let out = builders().create(&Source::from(values), &params).unwrap();
        out.as_tensor().unwrap().as_i64().unwrap().iter().copied().next().unwrap()
    };
    assert_eq!(label(vec![100.0, 102.0]), 0);
    assert_eq!(label(vec![100.0, 110.0]), 1);
    assert_eq!(label(vec![100.0, 90.0]), 2);

    let err = builders().create(&Source::from(vec![0.0, 1.0]), &params).unwrap_err();
    assert!(matches!(err, ArrayError::ZeroDenominator { .. }));
}

#[test]
fn test_segmentation_mask() {
    let params = Parameters::Segmentation(SegmentationParameters {
        height: 8,
        width: 8,
        rgb_range: 10,
        classes: vec![SegmentationClass::new("red", [255, 0, 0])],
        ..Default::default()
    });
    let out = builders().create(&Source::from("mask.png"), &params).unwrap();
    let tensor = out.into_tensor().unwrap();
    assert_eq!(tensor.shape(), &[8, 8, 1]);
    let mask = tensor.as_u8().unwrap();
    assert_eq!(mask[[3, 3, 0]], 1);
    assert_eq!(mask[[0, 0, 0]], 0);
    assert_eq!(mask.iter().map(|&v| usize::from(v)).sum::<usize>(), 1);
}

#[test]
fn test_image_scaled_per_sample() {
    let params = Parameters::Image(ImageParameters {
        height: 4,
        width: 8,
        preprocessing: ImageScaling::ImageScaler,
        ..Default::default()
    });
    let builders = builders();
    let data = builders.create(&Source::from("photo.png"), &params).unwrap();
    assert_eq!(tensor_shape(&data), vec![4, 8, 3]);

    let scaler = ImageScaler::default();
    let out = builders
        .preprocess(data, Preprocessor::Numeric(&scaler), &params)
        .unwrap();
    let tensor = out.into_tensor().unwrap();
    assert_eq!(tensor.dtype(), DType::F32);
    assert_eq!(tensor.shape(), &[4, 8, 3]);
    let pixel: Vec<f32> = tensor.as_f32().unwrap().iter().take(3).copied().collect();
    assert_eq!(pixel[0], 1.0);
    assert!((pixel[1] - 128.0 / 255.0).abs() < 1e-6);
    assert_eq!(pixel[2], 0.0);
}

/// Scales its input so the largest value becomes 1
struct PeakNormalize;

impl Transform for PeakNormalize {
    fn transform(&self, input: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>, TransformError> {
        let peak = input.iter().copied().fold(f64::MIN, f64::max);
        Ok(input.mapv(|v| v / peak))
    }
}

#[test]
fn test_image_scaler_sees_one_row_at_a_time() {
    let params = Parameters::Image(ImageParameters {
        height: 4,
        width: 8,
        preprocessing: ImageScaling::ImageScaler,
        ..Default::default()
    });
    let builders = builders();
    let data = builders.create(&Source::from("ramp.png"), &params).unwrap();
    let out = builders
        .preprocess(data, Preprocessor::Numeric(&PeakNormalize), &params)
        .unwrap();
    let tensor = out.into_tensor().unwrap();
    let values = tensor.as_f32().unwrap();

    // row y holds 10 * (y + 1) + x for x in 0..8, so its peak is at x = 7
    for y in 0..4usize {
        let peak = (10 * (y + 1) + 7) as f32;
        assert_eq!(values[[y, 7, 0]], 1.0);
        let first = values[[y, 0, 1]];
        assert!((first - (10 * (y + 1)) as f32 / peak).abs() < 1e-6, "row {}", y);
    }
}

#[test]
fn test_missing_image_is_decode_error() {
    let params = Parameters::Image(ImageParameters::default());
    let err = builders().create(&Source::from("absent.png"), &params).unwrap_err();
    match err {
        ArrayError::Decode { modality, source_id, .. } => {
            assert_eq!(modality, Modality::Image);
            assert_eq!(source_id, "absent.png");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_audio_silence_padding() {
    let params = Parameters::Audio(AudioParameters {
        sample_rate: 16000,
        parameter: AudioParameter::AudioSignal,
        ..Default::default()
    });
    let out = builders().create(&Source::from("clip.wav;0:2.0"), &params).unwrap();
    let tensor = out.into_tensor().unwrap();
    assert_eq!(tensor.shape(), &[32000]);
    assert!(tensor.as_f32().unwrap().iter().skip(24000).all(|&v| v == 0.0));
}

#[test]
fn test_audio_feature_round_trip_shape() {
    let params = Parameters::Audio(AudioParameters {
        sample_rate: 16000,
        parameter: AudioParameter::SpectralBandwidth,
        ..Default::default()
    });
    let builders = builders();
    let data = builders.create(&Source::from("clip.wav;0.25:1.25"), &params).unwrap();
    let shape = tensor_shape(&data);
    assert_eq!(shape, vec![1 + 16000 / 512, 1]);

    let scaler = StandardScaler::new(vec![1000.0], vec![250.0]).unwrap();
    let out = builders
        .preprocess(data, Preprocessor::Numeric(&scaler), &params)
        .unwrap();
    assert_eq!(tensor_shape(&out), shape);
}

#[test]
fn test_text_pipeline() {
    let tokenizer = Tokenizer::from_vocabulary(["the", "quick", "brown", "fox"]);
    let params = Parameters::Text(TextParameters::embedding_full(6));
    let builders = builders();

    let mut batch = Vec::new();
    for text in ["The quick fox", "brown fox, the fox"] {
        match builders.create(&Source::from(text), &params).unwrap() {
            ArrayData::Text(mut t) => batch.append(&mut t),
            other => panic!("unexpected {:?}", other),
        }
    }
    let out = builders
        .preprocess(ArrayData::Text(batch), Preprocessor::Text(&tokenizer), &params)
        .unwrap();
    let tensor = out.into_tensor().unwrap();
    assert_eq!(tensor.shape(), &[2, 6]);
    assert_eq!(
        tensor.as_i64().unwrap().iter().copied().collect::<Vec<_>>(),
        vec![1, 2, 4, 0, 0, 0, 3, 4, 1, 4, 0, 0]
    );
}

#[test]
fn test_identity_preprocess_is_idempotent() {
    let cases = [
        (
            Parameters::Timeseries(TimeseriesParameters { length: 4 }),
            Source::from(vec![1.0, -2.0]),
        ),
        (
            Parameters::Depth(Default::default()),
            Source::from(vec![0.25, 0.5, 0.75]),
        ),
        (Parameters::Regression(Default::default()), Source::from("-4.5")),
    ];
    let builders = builders();
    for (params, source) in cases {
        let data = builders.create(&source, &params).unwrap();
        let out = builders
            .preprocess(data.clone(), Preprocessor::Numeric(&IdentityTransform), &params)
            .unwrap();
        assert_eq!(out, data, "{}", params.modality());
    }
}

#[test]
fn test_persisted_scaler_applies_identically() {
    let scaler = StandardScaler::new(vec![2.0], vec![4.0]).unwrap();
    let restored = ScalerParams::from_bytes(&scaler.params().to_bytes().unwrap())
        .unwrap()
        .into_transform()
        .unwrap();

    let params = Parameters::Timeseries(TimeseriesParameters { length: 3 });
    let builders = builders();
    let data = builders.create(&Source::from(vec![6.0, 10.0]), &params).unwrap();
    let a = builders
        .preprocess(data.clone(), Preprocessor::Numeric(&scaler), &params)
        .unwrap();
    let b = builders
        .preprocess(data, Preprocessor::Numeric(restored.as_ref()), &params)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_parameters_from_json_and_toml() {
    let json = r#"{
        "modality": "segmentation",
        "height": 8,
        "width": 8,
        "rgb_range": 10,
        "classes": [{ "name": "red", "color": [255, 0, 0] }]
    }"#;
    let from_json: Parameters = serde_json::from_str(json).unwrap();
    assert_eq!(from_json.modality(), Modality::Segmentation);

    let path = std::env::temp_dir().join(format!("array-builder-pipeline-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "modality = \"audio\"\nsample_rate = 16000\nresample = \"kaiser_fast\"\nparameter = \"rms\"\n",
    )
    .unwrap();
    let from_toml = Parameters::from_file(&path);
    std::fs::remove_file(&path).unwrap();

    let params = from_toml.unwrap();
    let out = builders().create(&Source::from("clip.wav;0:1.0"), &params).unwrap();
    assert_eq!(tensor_shape(&out), vec![1 + 16000 / 512]);

    let out = builders().create(&Source::from("mask.png"), &from_json).unwrap();
    assert_eq!(tensor_shape(&out), vec![8, 8, 1]);
}
