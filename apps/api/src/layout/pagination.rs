//! Pagination Engine — slices one tall rendered image across fixed-size pages.
//!
//! The image is scaled to the page width. Every page redraws the *whole* scaled image,
//! shifted up by a multiple of the page height, so that only the next page-tall band
//! falls inside the page bounds:
//!
//! ```text
//!   page 0: offset 0
//!   page n: offset (scaled_height - n * page_height) - scaled_height = -n * page_height
//! ```
//!
//! Pure arithmetic. Pixels are never touched here; see `render::pdf` for the writer.

use serde::{Deserialize, Serialize};

/// Remaining heights within this distance of zero count as zero.
const HEIGHT_EPSILON: f64 = 1e-6;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Page size in the PDF writer's length unit (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

/// The fixed export page: A4 width with a 295 mm page band.
pub const EXPORT_PAGE: PageGeometry = PageGeometry {
    width: 210.0,
    height: 295.0,
};

/// Where the full-height source image is drawn on one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PagePlacement {
    pub page_index: usize,
    /// Vertical position of the image's top edge relative to the page top. Zero or negative.
    pub vertical_offset: f64,
}

/// What to do when the scaled image is an exact multiple of the page height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailingPagePolicy {
    /// Stop once nothing remains: no blank trailing page.
    #[default]
    Trim,
    /// Legacy exporter behavior: keep paging while the remaining height is `>= 0`,
    /// which appends one empty page at exact multiples.
    KeepBoundaryPage,
}

/// A single draw instruction for the PDF writer. Top-left origin, page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCall {
    pub page_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Output of the engine: the scaled image height plus one placement per page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub scaled_height: f64,
    pub placements: Vec<PagePlacement>,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.placements.len()
    }

    /// Translates placements into draw calls: the full scaled image on every page.
    pub fn draw_calls(&self, page: PageGeometry) -> Vec<DrawCall> {
        self.placements
            .iter()
            .map(|placement| DrawCall {
                page_index: placement.page_index,
                x: 0.0,
                y: placement.vertical_offset,
                width: page.width,
                height: self.scaled_height,
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Height of the source once scaled so its width equals `page_width`.
///
/// Returns `None` for degenerate inputs (zero, negative or non-finite dimensions).
pub fn scaled_height(source_width: f64, source_height: f64, page_width: f64) -> Option<f64> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(source_width) || !valid(source_height) || !valid(page_width) {
        return None;
    }
    Some(source_height * page_width / source_width)
}

/// Paginates with the default `TrailingPagePolicy::Trim`.
pub fn paginate(source_width: f64, source_height: f64, page: PageGeometry) -> Pagination {
    paginate_with_policy(source_width, source_height, page, TrailingPagePolicy::Trim)
}

/// Computes the ordered page placements for a source image of the given size.
///
/// Degenerate inputs yield a single placement at offset 0.
pub fn paginate_with_policy(
    source_width: f64,
    source_height: f64,
    page: PageGeometry,
    policy: TrailingPagePolicy,
) -> Pagination {
    let first = PagePlacement {
        page_index: 0,
        vertical_offset: 0.0,
    };

    let scaled = match scaled_height(source_width, source_height, page.width) {
        Some(h) if page.height.is_finite() && page.height > 0.0 => h,
        _ => {
            return Pagination {
                scaled_height: 0.0,
                placements: vec![first],
            }
        }
    };

    let mut placements = vec![first];
    loop {
        let remaining = scaled - page.height * placements.len() as f64;
        let keep_going = match policy {
            TrailingPagePolicy::Trim => remaining > HEIGHT_EPSILON,
            TrailingPagePolicy::KeepBoundaryPage => remaining >= -HEIGHT_EPSILON,
        };
        if !keep_going {
            break;
        }
        placements.push(PagePlacement {
            page_index: placements.len(),
            vertical_offset: remaining - scaled,
        });
    }

    Pagination {
        scaled_height: scaled,
        placements,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(p: &Pagination) -> Vec<f64> {
        p.placements.iter().map(|pl| pl.vertical_offset).collect()
    }

    fn assert_contiguous(p: &Pagination) {
        for (i, placement) in p.placements.iter().enumerate() {
            assert_eq!(placement.page_index, i, "page indices must be 0..n with no gaps");
        }
    }

    #[test]
    fn test_two_full_pages() {
        let p = paginate(210.0, 590.0, EXPORT_PAGE);
        assert_eq!(
            p.placements,
            vec![
                PagePlacement {
                    page_index: 0,
                    vertical_offset: 0.0
                },
                PagePlacement {
                    page_index: 1,
                    vertical_offset: -295.0
                },
            ]
        );
        assert_eq!(p.scaled_height, 590.0);
    }

    #[test]
    fn test_exact_single_page_has_no_trailing_blank() {
        let p = paginate(210.0, 295.0, EXPORT_PAGE);
        assert_eq!(p.page_count(), 1);
        assert_eq!(offsets(&p), vec![0.0]);
    }

    #[test]
    fn test_legacy_policy_appends_blank_page_at_exact_multiple() {
        let p = paginate_with_policy(210.0, 295.0, EXPORT_PAGE, TrailingPagePolicy::KeepBoundaryPage);
        assert_eq!(offsets(&p), vec![0.0, -295.0]);

        let p = paginate_with_policy(210.0, 590.0, EXPORT_PAGE, TrailingPagePolicy::KeepBoundaryPage);
        assert_eq!(offsets(&p), vec![0.0, -295.0, -590.0]);
    }

    #[test]
    fn test_policies_agree_off_the_boundary() {
        for height in [10.0, 294.0, 296.0, 700.0, 1234.5] {
            let trim = paginate(210.0, height, EXPORT_PAGE);
            let legacy =
                paginate_with_policy(210.0, height, EXPORT_PAGE, TrailingPagePolicy::KeepBoundaryPage);
            assert_eq!(trim, legacy, "height {height}");
        }
    }

    #[test]
    fn test_zero_height_is_single_degenerate_page() {
        let p = paginate(210.0, 0.0, EXPORT_PAGE);
        assert_eq!(offsets(&p), vec![0.0]);
        assert_eq!(p.scaled_height, 0.0);
    }

    #[test]
    fn test_degenerate_inputs_are_single_page() {
        for (w, h) in [(0.0, 500.0), (-10.0, 500.0), (210.0, -1.0), (f64::NAN, 10.0), (210.0, f64::INFINITY)] {
            let p = paginate(w, h, EXPORT_PAGE);
            assert_eq!(offsets(&p), vec![0.0], "({w}, {h})");
        }
    }

    #[test]
    fn test_partial_last_page() {
        // 700 / 295 = 2.37 pages → 3 pages.
        let p = paginate(210.0, 700.0, EXPORT_PAGE);
        assert_eq!(offsets(&p), vec![0.0, -295.0, -590.0]);
        assert_contiguous(&p);
    }

    #[test]
    fn test_source_is_scaled_to_page_width() {
        // A 2x-scaled raster: 1050 px wide, 2950 px tall.
        let p = paginate(1050.0, 2950.0, EXPORT_PAGE);
        assert!((p.scaled_height - 590.0).abs() < 1e-9);
        assert_eq!(p.page_count(), 2);
    }

    #[test]
    fn test_float_noise_does_not_create_sliver_page() {
        // 3 * 295 = 885 scaled, computed through a ratio that is inexact in binary.
        let p = paginate(0.7, 2.95, EXPORT_PAGE);
        assert!((p.scaled_height - 885.0).abs() < 1e-9);
        assert_eq!(p.page_count(), 3);
    }

    #[test]
    fn test_every_row_is_covered_exactly_once() {
        let p = paginate(800.0, 3333.0, EXPORT_PAGE);
        assert_contiguous(&p);
        // Band for page n is [-offset, -offset + page_height) in image coordinates.
        let mut covered = 0.0;
        for placement in &p.placements {
            let band_start = -placement.vertical_offset;
            assert!((band_start - covered).abs() < 1e-9, "bands must be adjacent");
            covered = band_start + EXPORT_PAGE.height;
        }
        assert!(covered >= p.scaled_height);
        assert!(covered - p.scaled_height < EXPORT_PAGE.height);
    }

    #[test]
    fn test_draw_calls_place_full_image_on_each_page() {
        let p = paginate(210.0, 590.0, EXPORT_PAGE);
        let calls = p.draw_calls(EXPORT_PAGE);
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            DrawCall {
                page_index: 1,
                x: 0.0,
                y: -295.0,
                width: 210.0,
                height: 590.0
            }
        );
    }

    #[test]
    fn test_scaled_height_rejects_degenerate_width() {
        assert_eq!(scaled_height(0.0, 100.0, 210.0), None);
        assert_eq!(scaled_height(100.0, 100.0, 210.0), Some(210.0));
    }
}
