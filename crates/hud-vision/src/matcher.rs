//! Template scoring via zero-mean normalized cross-correlation.
//!
//! The template slides over the search area; each placement gets a
//! correlation in [-1, 1] and the peak over all placements is the channel
//! score. The three RGB channel peaks are averaged into one match score.

use image::RgbImage;

/// Variance product below this is treated as undefined correlation.
const DEGENERATE_EPS: f64 = 1e-10;

/// Placements with undefined correlation score the worst possible value,
/// so they never outrank a genuine match and no NaN is produced.
const DEGENERATE_SCORE: f64 = -1.0;

/// Score a fused template against a slot crop.
///
/// The template must fit inside the search area in both dimensions; the
/// caller validates this before building templates.
pub fn match_score(template: &RgbImage, area: &RgbImage) -> f64 {
    debug_assert!(
        template.width() <= area.width() && template.height() <= area.height(),
        "template {}x{} larger than search area {}x{}",
        template.width(),
        template.height(),
        area.width(),
        area.height()
    );

    let mut sum = 0.0;
    for channel in 0..3 {
        sum += channel_peak(
            &channel_plane(area, channel),
            area.width() as usize,
            area.height() as usize,
            &channel_plane(template, channel),
            template.width() as usize,
            template.height() as usize,
        );
    }
    sum / 3.0
}

/// Extract one color channel as a row-major f64 plane.
fn channel_plane(img: &RgbImage, channel: usize) -> Vec<f64> {
    img.pixels().map(|p| p[channel] as f64).collect()
}

/// Compute mean and standard deviation of a plane.
fn plane_stats(plane: &[f64]) -> (f64, f64) {
    let n = plane.len() as f64;
    let mean = plane.iter().sum::<f64>() / n;
    let variance = plane.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Peak zero-mean NCC of one template channel over one area channel.
fn channel_peak(
    area: &[f64],
    area_w: usize,
    area_h: usize,
    tmpl: &[f64],
    tmpl_w: usize,
    tmpl_h: usize,
) -> f64 {
    let (tmpl_mean, tmpl_std) = plane_stats(tmpl);
    let n = (tmpl_w * tmpl_h) as f64;

    let mut best = DEGENERATE_SCORE;

    for oy in 0..=(area_h - tmpl_h) {
        for ox in 0..=(area_w - tmpl_w) {
            let mut sum_w = 0.0;
            let mut sum_w2 = 0.0;
            let mut sum_wt = 0.0;
            for ty in 0..tmpl_h {
                let row = (oy + ty) * area_w + ox;
                for tx in 0..tmpl_w {
                    let w = area[row + tx];
                    let t = tmpl[ty * tmpl_w + tx];
                    sum_w += w;
                    sum_w2 += w * w;
                    sum_wt += w * t;
                }
            }

            let win_mean = sum_w / n;
            let win_var = (sum_w2 / n - win_mean * win_mean).max(0.0);
            let denom = win_var.sqrt() * tmpl_std;
            if denom < DEGENERATE_EPS {
                continue;
            }

            let cross = sum_wt - n * win_mean * tmpl_mean;
            let score = cross / (n * denom);
            if score > best {
                best = score;
            }
        }
    }

    best
}
