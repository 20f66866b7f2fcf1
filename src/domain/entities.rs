//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/imaging types here; adapters map into these.

use crate::domain::errors::DomainError;
use crate::domain::report::ParsedReport;
use serde::Serialize;
use std::fmt;

/// Lowest budget the form accepts, in dollars.
pub const BUDGET_FLOOR: f64 = 1_000.0;
/// Highest budget the form accepts, in dollars.
pub const BUDGET_CEILING: f64 = 100_000.0;

/// Budget bounds supplied by the user. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetRange {
    min: f64,
    max: f64,
}

impl BudgetRange {
    /// Validate and build a budget range. Bounds are never swapped.
    pub fn new(min: f64, max: f64) -> Result<Self, DomainError> {
        for (name, value) in [("minimum", min), ("maximum", max)] {
            if !value.is_finite() {
                return Err(DomainError::InvalidInput(format!(
                    "budget {} must be a number",
                    name
                )));
            }
            if !(BUDGET_FLOOR..=BUDGET_CEILING).contains(&value) {
                return Err(DomainError::InvalidInput(format!(
                    "budget {} must be between ${} and ${}",
                    name, BUDGET_FLOOR as u64, BUDGET_CEILING as u64
                )));
            }
        }
        if min > max {
            return Err(DomainError::InvalidInput(format!(
                "budget minimum ({}) is greater than maximum ({})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Image encodings accepted by the upload widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    pub fn media_type(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Png => f.write_str("PNG"),
            ImageKind::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// Uploaded rooftop image. Bytes are kept as uploaded; format is sniffed from content.
#[derive(Clone)]
pub struct RoofImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for RoofImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoofImage")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Wire form of the image: base64 JPEG ready to embed in a data URI.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub media_type: &'static str,
    pub base64: String,
    pub width: u32,
    pub height: u32,
    /// Size of the re-encoded image before base64.
    pub byte_len: usize,
}

impl EncodedImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64)
    }
}

/// One validated user submission. Built fresh per click, dropped after the call.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub location: String,
    pub budget: BudgetRange,
    pub image: RoofImage,
}

/// Secret for the completion endpoint. Held in memory only; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Trims the key and rejects empty values, whitespace and anything outside
    /// visible ASCII (it must fit in an HTTP header).
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let key = raw.as_ref().trim();
        if key.is_empty() {
            return Err(DomainError::MissingInput("API key"));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidInput(
                "API key must not contain whitespace".to_string(),
            ));
        }
        if !key.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(DomainError::InvalidInput(
                "API key contains unsupported characters".to_string(),
            ));
        }
        Ok(Self(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

/// Outcome of one round trip. `raw_text` is kept whatever the parse produced.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub location: String,
    pub budget: BudgetRange,
    pub model: String,
    pub raw_text: String,
    pub report: ParsedReport,
    /// Unix seconds.
    pub analyzed_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_accepts_equal_bounds() {
        let b = BudgetRange::new(25_000.0, 25_000.0).unwrap();
        assert_eq!(b.min(), 25_000.0);
        assert_eq!(b.max(), 25_000.0);
    }

    #[test]
    fn test_budget_rejects_inverted_bounds() {
        let err = BudgetRange::new(30_000.0, 20_000.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(err.to_string().contains("greater than maximum"));
    }

    #[test]
    fn test_budget_rejects_out_of_range_and_nan() {
        assert!(BudgetRange::new(500.0, 20_000.0).is_err());
        assert!(BudgetRange::new(5_000.0, 250_000.0).is_err());
        assert!(BudgetRange::new(f64::NAN, 20_000.0).is_err());
    }

    #[test]
    fn test_credential_trims_and_redacts() {
        let key = ApiCredential::new("  sk-or-secret \n").unwrap();
        assert_eq!(key.expose(), "sk-or-secret");
        assert_eq!(format!("{:?}", key), "ApiCredential(***)");
    }

    #[test]
    fn test_credential_rejects_blank_and_spaces() {
        assert!(matches!(
            ApiCredential::new("   "),
            Err(DomainError::MissingInput("API key"))
        ));
        assert!(matches!(
            ApiCredential::new("sk or"),
            Err(DomainError::InvalidInput(_))
        ));
        for bad in ["sk-or\u{1}abc", "sk-or\u{7f}", "sk-oré"] {
            let err = ApiCredential::new(bad).unwrap_err();
            assert!(
                err.to_string().contains("unsupported characters"),
                "{:?} -> {}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_data_uri() {
        let img = EncodedImage {
            media_type: "image/jpeg",
            base64: "AAAA".to_string(),
            width: 1,
            height: 1,
            byte_len: 3,
        };
        assert_eq!(img.data_uri(), "data:image/jpeg;base64,AAAA");
    }
}
