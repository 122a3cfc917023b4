//! Turns a raw service response into a [`MeasurementResult`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use photometer_fetch::{RawResponse, RequestKind};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::model::{CaptureId, ChannelAverages, MeasurementParts, MeasurementResult};

pub const DEFAULT_CONCENTRATION_UNIT: &str = "mg/L";

/// Everything about a measurement that does not come from the service.
#[derive(Debug, Clone)]
pub struct CaptureContext {
    pub capture: CaptureId,
    pub image_path: PathBuf,
    pub captured_at: DateTime<Utc>,
}

/// Pure, synchronous formatter for prediction payloads.
///
/// The request kind decides which numbers are mandatory: `Both` needs
/// concentration and absorbance, the single-model kinds need only their own
/// number. The RGB triple is always required.
#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    kind: RequestKind,
    concentration_unit: String,
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new(RequestKind::default())
    }
}

impl ResponseFormatter {
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            concentration_unit: DEFAULT_CONCENTRATION_UNIT.to_string(),
        }
    }

    #[must_use]
    pub fn concentration_unit(mut self, unit: impl Into<String>) -> Self {
        self.concentration_unit = unit.into();
        self
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn format(
        &self,
        raw: &RawResponse,
        context: CaptureContext,
    ) -> Result<MeasurementResult, ParseError> {
        let payload: Payload =
            serde_json::from_slice(&raw.body).map_err(|e| ParseError::Malformed(e.to_string()))?;

        let concentration = optional_number("concentration", payload.concentration)?;
        let absorbance = optional_number("absorbance", payload.absorbance)?;
        let rgb = payload.rgb.ok_or(ParseError::MissingField("rgb"))?;
        let channels = ChannelAverages {
            red: required_number("rgb.red", rgb.red)?,
            green: required_number("rgb.green", rgb.green)?,
            blue: required_number("rgb.blue", rgb.blue)?,
        };

        if self.kind.expects_concentration() && concentration.is_none() {
            return Err(ParseError::MissingField("concentration"));
        }
        if self.kind.expects_absorbance() && absorbance.is_none() {
            return Err(ParseError::MissingField("absorbance"));
        }

        Ok(MeasurementResult::from_parts(MeasurementParts {
            capture: context.capture,
            request_kind: self.kind,
            concentration_text: concentration
                .map(|value| format!("{} {}", three_decimals(value), self.concentration_unit)),
            absorbance_text: absorbance.map(three_decimals),
            channels,
            raw_image_path: context.image_path,
            remote_processed_image: payload.processed_image.filter(|name| !name.trim().is_empty()),
            captured_at: context.captured_at,
        }))
    }
}

/// Fixed three-decimal rendering, independent of input precision.
pub fn three_decimals(value: f64) -> String {
    format!("{value:.3}")
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    concentration: Option<Numeric>,
    #[serde(default)]
    absorbance: Option<Numeric>,
    #[serde(default)]
    rgb: Option<RgbPayload>,
    #[serde(default)]
    processed_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RgbPayload {
    #[serde(default)]
    red: Option<Numeric>,
    #[serde(default)]
    green: Option<Numeric>,
    #[serde(default)]
    blue: Option<Numeric>,
}

/// A number as the service may send it: JSON number or numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Numeric {
    fn to_f64(&self, field: &'static str) -> Result<f64, ParseError> {
        let value = match self {
            Numeric::Number(n) => Some(*n),
            Numeric::Text(s) => s.trim().parse::<f64>().ok(),
            Numeric::Other(_) => None,
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::NotNumeric {
                field,
                value: self.describe(),
            })
    }

    fn describe(&self) -> String {
        match self {
            Numeric::Number(n) => n.to_string(),
            Numeric::Text(s) => format!("{s:?}"),
            Numeric::Other(v) => v.to_string(),
        }
    }
}

fn optional_number(field: &'static str, value: Option<Numeric>) -> Result<Option<f64>, ParseError> {
    value.map(|n| n.to_f64(field)).transpose()
}

fn required_number(field: &'static str, value: Option<Numeric>) -> Result<f64, ParseError> {
    optional_number(field, value)?.ok_or(ParseError::MissingField(field))
}
