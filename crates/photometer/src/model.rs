//! Measurement data carried through the pipeline and into history.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use photometer_fetch::RequestKind;
use serde::{Deserialize, Serialize};

/// Identity of one capture event.
///
/// Issued by [`SharedResultState`](crate::SharedResultState) so that ids stay
/// unique across every screen sharing the slot. Later captures get larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaptureId(u64);

impl CaptureId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CaptureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse classification of the sample color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorType {
    Orange,
    Blue,
}

impl ColorType {
    /// `Orange` when red dominates blue, otherwise `Blue`.
    pub fn from_rgb(rgb: &Rgb) -> Self {
        if rgb.red > rgb.blue {
            ColorType::Orange
        } else {
            ColorType::Blue
        }
    }
}

impl fmt::Display for ColorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorType::Orange => f.write_str("orange"),
            ColorType::Blue => f.write_str("blue"),
        }
    }
}

/// Channel averages as reported by the service, before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelAverages {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ChannelAverages {
    pub fn rounded(&self) -> Rgb {
        Rgb {
            red: self.red.round() as i64,
            green: self.green.round() as i64,
            blue: self.blue.round() as i64,
        }
    }
}

/// Display-rounded channel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub red: i64,
    pub green: i64,
    pub blue: i64,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R: {}, G: {}, B: {}", self.red, self.green, self.blue)
    }
}

/// One completed measurement.
///
/// Every field is fixed at construction except the processed image path,
/// which arrives later from the best-effort download.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementResult {
    capture: CaptureId,
    request_kind: RequestKind,
    concentration_text: Option<String>,
    absorbance_text: Option<String>,
    channels: ChannelAverages,
    rgb: Rgb,
    color_type: ColorType,
    raw_image_path: PathBuf,
    remote_processed_image: Option<String>,
    processed_image_path: Option<PathBuf>,
    captured_at: DateTime<Utc>,
}

/// Builder input for [`MeasurementResult`]; only the formatter creates one.
pub(crate) struct MeasurementParts {
    pub capture: CaptureId,
    pub request_kind: RequestKind,
    pub concentration_text: Option<String>,
    pub absorbance_text: Option<String>,
    pub channels: ChannelAverages,
    pub raw_image_path: PathBuf,
    pub remote_processed_image: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl MeasurementResult {
    pub(crate) fn from_parts(parts: MeasurementParts) -> Self {
        let rgb = parts.channels.rounded();
        Self {
            capture: parts.capture,
            request_kind: parts.request_kind,
            concentration_text: parts.concentration_text,
            absorbance_text: parts.absorbance_text,
            channels: parts.channels,
            color_type: ColorType::from_rgb(&rgb),
            rgb,
            raw_image_path: parts.raw_image_path,
            remote_processed_image: parts.remote_processed_image,
            processed_image_path: None,
            captured_at: parts.captured_at,
        }
    }

    pub fn capture(&self) -> CaptureId {
        self.capture
    }

    pub fn request_kind(&self) -> RequestKind {
        self.request_kind
    }

    pub fn concentration_text(&self) -> Option<&str> {
        self.concentration_text.as_deref()
    }

    pub fn absorbance_text(&self) -> Option<&str> {
        self.absorbance_text.as_deref()
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn channels(&self) -> ChannelAverages {
        self.channels
    }

    pub fn rgb_text(&self) -> String {
        self.rgb.to_string()
    }

    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    pub fn raw_image_path(&self) -> &Path {
        &self.raw_image_path
    }

    /// File name the service assigned to the annotated image, if any.
    pub fn remote_processed_image(&self) -> Option<&str> {
        self.remote_processed_image.as_deref()
    }

    pub fn processed_image_path(&self) -> Option<&Path> {
        self.processed_image_path.as_deref()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub(crate) fn set_processed_image(&mut self, path: PathBuf) {
        self.processed_image_path = Some(path);
    }

    /// Images to preview: the raw capture, then the annotated image once present.
    pub fn preview_paths(&self) -> Vec<&Path> {
        std::iter::once(self.raw_image_path.as_path())
            .chain(self.processed_image_path.as_deref())
            .collect()
    }

    pub fn history_record(&self) -> HistoryRecord {
        HistoryRecord {
            request_kind: self.request_kind,
            concentration_text: self.concentration_text.clone(),
            absorbance_text: self.absorbance_text.clone(),
            rgb_text: self.rgb_text(),
            color_type: self.color_type,
            captured_at: self.captured_at,
        }
    }
}

/// Display-formatted snapshot of a measurement, as stored in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub request_kind: RequestKind,
    pub concentration_text: Option<String>,
    pub absorbance_text: Option<String>,
    pub rgb_text: String,
    pub color_type: ColorType,
    pub captured_at: DateTime<Utc>,
}
