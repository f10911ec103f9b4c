//! Composite image-quality scoring for generated illustrations.
//!
//! The score is a sum of independently-capped sub-scores over the
//! image's alpha/color statistics and upstream-inspected metadata,
//! clamped to `[0, 100]`. Pipeline stages use it to rank candidate
//! renders before a cover is offered to the client.

use serde::{Deserialize, Serialize};

/// Alpha-channel metadata produced by upstream image inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaMetadata {
    pub has_transparency: bool,
    pub alpha_range: AlphaRange,
    pub dimensions: Dimensions,
    /// Encoded file size in bytes.
    pub file_size: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlphaRange {
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Per-component breakdown of a quality score.
///
/// Each component is already capped to its band; the total is the
/// clamped, rounded sum.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityBreakdown {
    /// 0-30, proportional to the observed alpha value range.
    pub transparency: f64,
    /// 0-25, higher for smoother alpha edges (lower alpha stdev).
    pub edge: f64,
    /// 0-20 band. Fixed at 15 pending a real center-of-mass analysis;
    /// an intentionally approximate placeholder, not a bug.
    pub centering: f64,
    /// 0-15, higher for lower color-channel variance.
    pub color_consistency: f64,
    /// 0-10, resolution and file-size bonuses.
    pub technical: f64,
    /// Clamped, rounded total in `[0, 100]`.
    pub total: u8,
}

const CENTERING_PLACEHOLDER: f64 = 15.0;

/// Score an illustration from its encoded bytes and inspection metadata.
pub fn score_quality(image_bytes: &[u8], meta: &AlphaMetadata) -> u8 {
    score_breakdown(image_bytes, meta).total
}

/// Full sub-score breakdown for diagnostics and ranking UIs.
pub fn score_breakdown(image_bytes: &[u8], meta: &AlphaMetadata) -> QualityBreakdown {
    let stats = ChannelStats::from_bytes(image_bytes);

    let transparency = transparency_score(meta.alpha_range);
    let edge = edge_score(stats.alpha_stdev);
    let color_consistency = color_score(stats.color_stdev);
    let technical = technical_score(meta);

    let sum = transparency + edge + CENTERING_PLACEHOLDER + color_consistency + technical;

    QualityBreakdown {
        transparency,
        edge,
        centering: CENTERING_PLACEHOLDER,
        color_consistency,
        technical,
        total: sum.round().clamp(0.0, 100.0) as u8,
    }
}

/// 0-30: the full 0-255 alpha range earns all 30 points; a fully
/// opaque image (range 0) earns none.
fn transparency_score(range: AlphaRange) -> f64 {
    let span = range.max.saturating_sub(range.min) as f64;
    span / 255.0 * 30.0
}

/// 0-25: `25 - min(25, stdev / 10)`; a missing stdev counts as 0.
fn edge_score(alpha_stdev: Option<f64>) -> f64 {
    25.0 - (alpha_stdev.unwrap_or(0.0) / 10.0).min(25.0)
}

/// 0-15: `15 - min(15, stdev / 100)` over the color channels only.
fn color_score(color_stdev: Option<f64>) -> f64 {
    15.0 - (color_stdev.unwrap_or(0.0) / 100.0).min(15.0)
}

/// 0-10: independent resolution and file-size bonuses (5 + 5 cap).
fn technical_score(meta: &AlphaMetadata) -> f64 {
    let Dimensions { width, height } = meta.dimensions;

    let resolution = if width >= 1024 && height >= 1024 {
        5.0
    } else if width >= 768 {
        3.0
    } else {
        0.0
    };

    let size = if (400_000..=900_000).contains(&meta.file_size) {
        5.0
    } else if meta.file_size < 1_200_000 {
        3.0
    } else {
        0.0
    };

    resolution + size
}

/// Alpha and color standard deviations computed from the decoded image.
struct ChannelStats {
    alpha_stdev: Option<f64>,
    color_stdev: Option<f64>,
}

impl ChannelStats {
    /// Decode and measure. Undecodable or empty images yield no stats,
    /// which downstream scoring treats as zero deviation.
    fn from_bytes(bytes: &[u8]) -> Self {
        let Ok(decoded) = image::load_from_memory(bytes) else {
            return Self {
                alpha_stdev: None,
                color_stdev: None,
            };
        };
        let rgba = decoded.to_rgba8();
        if rgba.is_empty() {
            return Self {
                alpha_stdev: None,
                color_stdev: None,
            };
        }

        let alphas = rgba.pixels().map(|p| f64::from(p.0[3]));
        let colors = rgba
            .pixels()
            .flat_map(|p| p.0[..3].iter().map(|&v| f64::from(v)).collect::<Vec<_>>());

        Self {
            alpha_stdev: stdev(alphas),
            color_stdev: stdev(colors),
        }
    }
}

fn stdev(values: impl Iterator<Item = f64>) -> Option<f64> {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}
