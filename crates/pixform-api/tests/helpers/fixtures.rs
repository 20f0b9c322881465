//! Test fixtures: small encoded images.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// A `width`x`height` image with a horizontal gradient so crops are distinguishable.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Png)
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Jpeg)
}

/// Multipart form with the given file and text fields.
pub fn upload_form(filename: &str, data: Vec<u8>, fields: &[(&str, &str)]) -> MultipartForm {
    let mut form = MultipartForm::new();
    for (name, value) in fields {
        form = form.add_text(name.to_string(), value.to_string());
    }
    form.add_part("file", Part::bytes(data).file_name(filename))
}
