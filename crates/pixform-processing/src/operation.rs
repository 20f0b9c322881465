//! Operation parsing from submitted form fields.

use crate::error::TransformError;
use std::collections::HashMap;
use std::num::IntErrorKind;

pub const DEFAULT_OPERATION: &str = "crop";
pub const DEFAULT_ROTATION_ANGLE: f64 = 90.0;

/// Requested crop rectangle as submitted, before clamping to the image bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropParams {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Crop(CropParams),
    /// Counter-clockwise rotation in degrees; the canvas grows to fit.
    Rotate { angle: f64 },
    FlipHorizontal,
    FlipVertical,
}

impl Operation {
    /// Build an operation from its name and the remaining form fields.
    ///
    /// Absent numeric fields take their defaults; present but non-numeric
    /// ones are rejected.
    pub fn from_form(name: &str, fields: &HashMap<String, String>) -> Result<Self, TransformError> {
        match name {
            "crop" => {
                let defaults = CropParams::default();
                let int_field = |key: &str, default: i64| match fields.get(key) {
                    Some(raw) => parse_int(raw).ok_or(TransformError::InvalidCropParameters),
                    None => Ok(default),
                };
                Ok(Operation::Crop(CropParams {
                    x: int_field("x", defaults.x)?,
                    y: int_field("y", defaults.y)?,
                    width: int_field("width", defaults.width)?,
                    height: int_field("height", defaults.height)?,
                }))
            }
            "rotate" => {
                let angle = match fields.get("angle") {
                    Some(raw) => raw
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|a| a.is_finite())
                        .ok_or(TransformError::InvalidRotationAngle)?,
                    None => DEFAULT_ROTATION_ANGLE,
                };
                Ok(Operation::Rotate { angle })
            }
            "flip_h" => Ok(Operation::FlipHorizontal),
            "flip_v" => Ok(Operation::FlipVertical),
            other => Err(TransformError::UnknownOperation(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Crop(_) => "crop",
            Operation::Rotate { .. } => "rotate",
            Operation::FlipHorizontal => "flip_h",
            Operation::FlipVertical => "flip_v",
        }
    }
}

/// Integers out of `i64` range saturate; they are clamped to the image anyway.
fn parse_int(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}
