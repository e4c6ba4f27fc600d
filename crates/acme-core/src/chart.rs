//! # Chart Axis Scaler
//!
//! Computes Y-axis tick labels for the revenue chart.
//!
//! ## Scaling
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  max = 3,800                                                │
//! │  scale = 10^floor(log10(3800)) = 1,000                      │
//! │  top   = ceil(3800 / 1000) * 1000 = 4,000                   │
//! │  step  = top / 5 = 800                                      │
//! │                                                             │
//! │  labels: $4K  $3.2K  $2.4K  $1.6K  $800  $0                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//! Values ≥ 1000 render as thousands with a `K` suffix, smaller values as-is.

use crate::types::RevenuePoint;

// =============================================================================
// Y Axis
// =============================================================================

/// Tick labels for the revenue chart, top first.
#[derive(Debug, Clone, PartialEq)]
pub struct YAxis {
    /// Rendered labels, from `top_label` down to `$0`.
    pub labels: Vec<String>,

    /// The rounded top-of-axis value.
    pub top_label: i64,
}

/// Computes six evenly spaced tick labels covering a revenue series.
///
/// An empty series yields no labels; an all-zero series yields a single
/// `"$0"` label.
///
/// ## Example
/// ```rust
/// use acme_core::chart::generate_y_axis;
/// use acme_core::types::RevenuePoint;
///
/// let series = vec![
///     RevenuePoint { month: "Jan".into(), revenue: 2000 },
///     RevenuePoint { month: "Feb".into(), revenue: 3800 },
/// ];
/// let axis = generate_y_axis(&series);
/// assert_eq!(axis.top_label, 4000);
/// assert_eq!(axis.labels[0], "$4K");
/// assert_eq!(axis.labels[5], "$0");
/// ```
pub fn generate_y_axis(revenue: &[RevenuePoint]) -> YAxis {
    let Some(max) = revenue.iter().map(|p| p.revenue).max() else {
        return YAxis {
            labels: Vec::new(),
            top_label: 0,
        };
    };

    if max <= 0 {
        return YAxis {
            labels: vec!["$0".to_string()],
            top_label: 0,
        };
    }

    let scale = 10f64.powf((max as f64).log10().floor());
    let top = ((max as f64 / scale).ceil() * scale) as i64;
    let step = top as f64 / 5.0;

    let labels = (0..=5)
        .map(|n| {
            let value = top as f64 - step * n as f64;
            if value >= 1000.0 {
                format!("${}K", render_number(value / 1000.0))
            } else {
                format!("${}", render_number(value))
            }
        })
        .collect();

    YAxis {
        labels,
        top_label: top,
    }
}

/// Renders a tick value without trailing float noise.
fn render_number(value: f64) -> String {
    // step = top/5 has at most a couple of meaningful decimals; round away
    // accumulated float error before display.
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[i64]) -> Vec<RevenuePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &revenue)| RevenuePoint {
                month: format!("M{}", i + 1),
                revenue,
            })
            .collect()
    }

    #[test]
    fn test_empty_series() {
        let axis = generate_y_axis(&[]);
        assert!(axis.labels.is_empty());
        assert_eq!(axis.top_label, 0);
    }

    #[test]
    fn test_all_zero_series() {
        let axis = generate_y_axis(&series(&[0, 0, 0]));
        assert_eq!(axis.labels, vec!["$0"]);
        assert_eq!(axis.top_label, 0);
    }

    #[test]
    fn test_typical_series() {
        let axis = generate_y_axis(&series(&[2000, 1800, 3800, 2500]));
        assert_eq!(axis.top_label, 4000);
        assert_eq!(
            axis.labels,
            vec!["$4K", "$3.2K", "$2.4K", "$1.6K", "$800", "$0"]
        );
    }

    #[test]
    fn test_exact_power_of_ten() {
        let axis = generate_y_axis(&series(&[1000]));
        assert_eq!(axis.top_label, 1000);
        assert_eq!(axis.labels, vec!["$1K", "$800", "$600", "$400", "$200", "$0"]);
    }

    #[test]
    fn test_small_values_render_raw() {
        let axis = generate_y_axis(&series(&[7, 3]));
        assert_eq!(axis.top_label, 7);
        assert_eq!(axis.labels.len(), 6);
        assert_eq!(axis.labels[0], "$7");
        assert_eq!(axis.labels[5], "$0");
    }

    #[test]
    fn test_six_labels_always() {
        for max in [1, 9, 10, 99, 550, 1001, 123_456] {
            let axis = generate_y_axis(&series(&[max]));
            assert_eq!(axis.labels.len(), 6, "max={}", max);
            assert_eq!(axis.labels[5], "$0", "max={}", max);
        }
    }
}
