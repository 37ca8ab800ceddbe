use thiserror::Error;

/// How much the extractor trusts the segment it picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionConfidence {
    /// `<segment>/<service>/<environment>`
    High,
    /// Two segments, or deeper paths where the second-to-last segment is used
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedName {
    pub name: String,
    pub confidence: ExtractionConfidence,
}

/// The raw value did not yield a service name; the matcher falls back to
/// its next tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("property path is empty")]
    Empty,
    #[error("property path '{raw}' has fewer than two segments")]
    TooFewSegments { raw: String },
    #[error("property path '{raw}' has a blank service segment")]
    BlankSegment { raw: String },
}

/// Derives a canonical service name from a `/`-delimited property path.
///
/// Pure: no logging, no state. Callers log low-confidence results.
pub struct BuildNameExtractor;

impl BuildNameExtractor {
    pub fn extract(raw: &str) -> Result<ExtractedName, ExtractionFailure> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.trim().is_empty() {
            return Err(ExtractionFailure::Empty);
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        let (segment, confidence) = match segments.len() {
            0 | 1 => {
                return Err(ExtractionFailure::TooFewSegments {
                    raw: raw.to_string(),
                })
            }
            2 => (segments[1], ExtractionConfidence::Low),
            3 => (segments[1], ExtractionConfidence::High),
            n => (segments[n - 2], ExtractionConfidence::Low),
        };

        let name = segment.trim();
        if name.is_empty() {
            return Err(ExtractionFailure::BlankSegment {
                raw: raw.to_string(),
            });
        }

        Ok(ExtractedName {
            name: name.to_string(),
            confidence,
        })
    }
}
