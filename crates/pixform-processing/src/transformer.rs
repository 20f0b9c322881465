//! Image transformer - decode, apply one operation, encode
//!
//! Pixel work is synchronous and CPU bound; callers on an async runtime
//! should run `ImageTransformer::process` on a blocking thread.

use crate::error::TransformError;
use crate::format::OutputFormat;
use crate::operation::{CropParams, Operation};
use bytes::Bytes;
use image::{ColorType, DynamicImage, GenericImageView, ImageReader, Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use std::io::Cursor;

/// Crop rectangle after clamping; always non-empty and inside the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Clamp requested offsets to `[0, dim-1]` and extents to `[1, dim-offset]`.
    pub fn clamp(params: CropParams, image_width: u32, image_height: u32) -> Self {
        let (x, width) = clamp_axis(params.x, params.width, image_width);
        let (y, height) = clamp_axis(params.y, params.height, image_height);
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

fn clamp_axis(offset: i64, extent: i64, dimension: u32) -> (u32, u32) {
    let dimension = i64::from(dimension.max(1));
    let offset = offset.clamp(0, dimension - 1);
    let extent = extent.clamp(1, dimension - offset);
    (offset as u32, extent as u32)
}

/// Encoded result of one pipeline run
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub data: Bytes,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

pub struct ImageTransformer;

impl ImageTransformer {
    /// Decode → transform → encode.
    pub fn process(
        data: &[u8],
        operation: &Operation,
        format: OutputFormat,
    ) -> Result<ProcessedImage, TransformError> {
        let img = Self::decode(data)?;
        let (source_width, source_height) = img.dimensions();

        let transformed = Self::apply(img, operation)?;
        let (width, height) = transformed.dimensions();
        let data = Self::encode(&transformed, format)?;

        tracing::debug!(
            operation = operation.name(),
            format = format.name(),
            source_width,
            source_height,
            width,
            height,
            size_bytes = data.len(),
            "Image transformed"
        );

        Ok(ProcessedImage {
            data,
            format,
            width,
            height,
        })
    }

    pub fn decode(data: &[u8]) -> Result<DynamicImage, TransformError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(e.to_string()))?;
        let img = reader
            .decode()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        if img.width() == 0 || img.height() == 0 {
            return Err(TransformError::EmptyImage);
        }
        Ok(img)
    }

    pub fn apply(img: DynamicImage, operation: &Operation) -> Result<DynamicImage, TransformError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(TransformError::EmptyImage);
        }

        let result = match *operation {
            Operation::Crop(params) => {
                let rect = CropRect::clamp(params, img.width(), img.height());
                img.crop_imm(rect.x, rect.y, rect.width, rect.height)
            }
            Operation::Rotate { angle } => Self::rotate_expand(img, angle),
            Operation::FlipHorizontal => img.fliph(),
            Operation::FlipVertical => img.flipv(),
        };
        Ok(result)
    }

    /// Rotate counter-clockwise by `angle` degrees, growing the canvas so no
    /// pixel is clipped. Quarter turns are exact; other angles are resampled
    /// onto a transparent background.
    pub fn rotate_expand(img: DynamicImage, angle: f64) -> DynamicImage {
        let angle = angle.rem_euclid(360.0);
        let quarter_turns = angle / 90.0;
        if (quarter_turns - quarter_turns.round()).abs() < 1e-9 {
            return match (quarter_turns.round() as i64).rem_euclid(4) {
                0 => img,
                1 => img.rotate270(),
                2 => img.rotate180(),
                _ => img.rotate90(),
            };
        }

        let (width, height) = img.dimensions();
        let (out_width, out_height) = expanded_canvas(width, height, angle);

        let source = img.to_rgba8();
        // Projection rotates clockwise in image coordinates (y down).
        let theta = -(angle.to_radians()) as f32;
        let projection = Projection::translate(out_width as f32 / 2.0, out_height as f32 / 2.0)
            * Projection::rotate(theta)
            * Projection::translate(-(width as f32) / 2.0, -(height as f32) / 2.0);

        let mut out = RgbaImage::new(out_width, out_height);
        warp_into(
            &source,
            &projection,
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
            &mut out,
        );
        DynamicImage::ImageRgba8(out)
    }

    pub fn encode(img: &DynamicImage, format: OutputFormat) -> Result<Bytes, TransformError> {
        let (width, height) = img.dimensions();
        let estimated_size = (width as usize) * (height as usize) * 3;
        let mut buffer = Vec::with_capacity(estimated_size.min(16 * 1024 * 1024));
        let mut cursor = Cursor::new(&mut buffer);

        let prepared = prepare_for_format(img, format);
        prepared
            .write_to(&mut cursor, format.image_format())
            .map_err(|e| TransformError::Encode {
                format: format.name(),
                message: e.to_string(),
            })?;

        Ok(Bytes::from(buffer))
    }
}

/// Bounding box of the source rectangle rotated by `angle` degrees.
fn expanded_canvas(width: u32, height: u32, angle: f64) -> (u32, u32) {
    let (sin, cos) = angle.to_radians().sin_cos();
    let (w, h) = (f64::from(width), f64::from(height));
    let out_width = (w * cos.abs() + h * sin.abs() - 1e-6).ceil().max(1.0);
    let out_height = (w * sin.abs() + h * cos.abs() - 1e-6).ceil().max(1.0);
    (out_width as u32, out_height as u32)
}

/// JPEG has no alpha channel and GIF is palette based; hand each encoder a
/// pixel layout it accepts.
fn prepare_for_format(img: &DynamicImage, format: OutputFormat) -> DynamicImage {
    match format {
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        OutputFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8()),
        OutputFormat::Png => match img.color() {
            ColorType::Rgb32F | ColorType::Rgba32F => DynamicImage::ImageRgba8(img.to_rgba8()),
            _ => img.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    /// 4x3 image with a distinct colour per pixel so orientation is observable.
    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 40) as u8, (y * 60) as u8, ((x + y) * 10) as u8, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    fn encode_png(img: &DynamicImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_crop_rect_within_bounds() {
        let rect = CropRect::clamp(
            CropParams {
                x: 10,
                y: 20,
                width: 30,
                height: 40,
            },
            100,
            100,
        );
        assert_eq!(
            rect,
            CropRect {
                x: 10,
                y: 20,
                width: 30,
                height: 40
            }
        );
    }

    #[test]
    fn test_crop_rect_always_valid_for_out_of_range_input() {
        let extremes = [i64::MIN, -1000, -1, 0, 1, 7, 49, 50, 51, 1000, i64::MAX];
        let (w, h) = (50u32, 20u32);
        for &x in &extremes {
            for &y in &extremes {
                for &width in &extremes {
                    for &height in &extremes {
                        let rect = CropRect::clamp(CropParams { x, y, width, height }, w, h);
                        assert!(rect.width >= 1 && rect.height >= 1);
                        assert!(rect.x + rect.width <= w, "{:?}", rect);
                        assert!(rect.y + rect.height <= h, "{:?}", rect);
                    }
                }
            }
        }
    }

    #[test]
    fn test_crop_offsets_clamp_to_last_pixel() {
        let rect = CropRect::clamp(
            CropParams {
                x: 500,
                y: -3,
                width: 0,
                height: 500,
            },
            10,
            8,
        );
        assert_eq!(
            rect,
            CropRect {
                x: 9,
                y: 0,
                width: 1,
                height: 8
            }
        );
    }

    #[test]
    fn test_apply_crop_copies_region() {
        let img = gradient(4, 3);
        let cropped = ImageTransformer::apply(
            img.clone(),
            &Operation::Crop(CropParams {
                x: 1,
                y: 1,
                width: 2,
                height: 5,
            }),
        )
        .unwrap();
        assert_eq!(cropped.dimensions(), (2, 2));
        assert_eq!(cropped.get_pixel(0, 0), img.get_pixel(1, 1));
        assert_eq!(cropped.get_pixel(1, 1), img.get_pixel(2, 2));
    }

    #[test]
    fn test_rotate_zero_and_full_turn_are_identity() {
        let img = gradient(4, 3);
        for angle in [0.0, 360.0, -360.0, 720.0] {
            let rotated = ImageTransformer::rotate_expand(img.clone(), angle);
            assert_eq!(rotated.dimensions(), img.dimensions());
            assert_eq!(rotated.to_rgba8(), img.to_rgba8(), "angle {}", angle);
        }
    }

    #[test]
    fn test_rotate_quarter_turn_is_counter_clockwise() {
        let img = gradient(4, 3);
        let rotated = ImageTransformer::rotate_expand(img.clone(), 90.0);
        assert_eq!(rotated.dimensions(), (3, 4));
        // Top-right corner moves to top-left.
        assert_eq!(rotated.get_pixel(0, 0), img.get_pixel(3, 0));
        // Bottom-left corner moves to bottom-right.
        assert_eq!(rotated.get_pixel(2, 3), img.get_pixel(0, 2));

        let back = ImageTransformer::rotate_expand(rotated, -90.0);
        assert_eq!(back.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn test_rotate_half_turn() {
        let img = gradient(4, 3);
        let rotated = ImageTransformer::rotate_expand(img.clone(), 180.0);
        assert_eq!(rotated.dimensions(), (4, 3));
        assert_eq!(rotated.get_pixel(0, 0), img.get_pixel(3, 2));
    }

    #[test]
    fn test_rotate_arbitrary_angle_expands_canvas() {
        let img = gradient(40, 20);
        let rotated = ImageTransformer::rotate_expand(img, 45.0);
        let (w, h) = rotated.dimensions();
        // 40*cos45 + 20*sin45 ≈ 42.43
        assert_eq!((w, h), (43, 43));
        // Corners of the expanded canvas are background.
        assert_eq!(rotated.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        // Centre is covered by the source.
        assert_eq!(rotated.get_pixel(w / 2, h / 2)[3], 255);
    }

    #[test]
    fn test_expanded_canvas_for_quarter_turns_is_exact() {
        assert_eq!(expanded_canvas(40, 20, 90.0), (20, 40));
        assert_eq!(expanded_canvas(40, 20, 180.0), (40, 20));
        assert_eq!(expanded_canvas(1, 1, 30.0), (2, 2));
    }

    #[test]
    fn test_flips_are_involutions() {
        let img = gradient(4, 3);

        let once = ImageTransformer::apply(img.clone(), &Operation::FlipHorizontal).unwrap();
        assert_eq!(once.get_pixel(0, 0), img.get_pixel(3, 0));
        let twice = ImageTransformer::apply(once, &Operation::FlipHorizontal).unwrap();
        assert_eq!(twice.to_rgba8(), img.to_rgba8());

        let once = ImageTransformer::apply(img.clone(), &Operation::FlipVertical).unwrap();
        assert_eq!(once.get_pixel(0, 0), img.get_pixel(0, 2));
        let twice = ImageTransformer::apply(once, &Operation::FlipVertical).unwrap();
        assert_eq!(twice.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = ImageTransformer::decode(b"definitely not an image");
        assert!(matches!(result, Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_process_png_round_trip_keeps_pixels() {
        let img = gradient(4, 3);
        let processed =
            ImageTransformer::process(&encode_png(&img), &Operation::FlipVertical, OutputFormat::Png)
                .unwrap();
        assert_eq!(processed.format, OutputFormat::Png);
        assert_eq!((processed.width, processed.height), (4, 3));

        let decoded = image::load_from_memory_with_format(&processed.data, ImageFormat::Png).unwrap();
        assert_eq!(decoded.to_rgba8(), img.flipv().to_rgba8());
    }

    #[test]
    fn test_encode_jpeg_from_rgba_source() {
        let img = ImageTransformer::rotate_expand(gradient(10, 10), 30.0);
        assert_eq!(img.color(), ColorType::Rgba8);

        let data = ImageTransformer::encode(&img, OutputFormat::Jpeg).unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_encode_gif_from_rgb_source() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 5, Rgb([10, 200, 30])));
        let data = ImageTransformer::encode(&img, OutputFormat::Gif).unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn test_output_format_independent_of_input_format() {
        let img = gradient(8, 8);
        let processed = ImageTransformer::process(
            &encode_png(&img),
            &Operation::Crop(CropParams::default()),
            OutputFormat::Jpeg,
        )
        .unwrap();
        assert_eq!(image::guess_format(&processed.data).unwrap(), ImageFormat::Jpeg);
        // Default 100x100 crop is clamped to the 8x8 source.
        assert_eq!((processed.width, processed.height), (8, 8));
    }
}
