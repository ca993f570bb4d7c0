//! Relative-comparison scoring.
//!
//! These helpers score the gap between a recent metric and a baseline:
//! recent growth against its trailing average, EPS growth against revenue
//! growth, a stock's return against its benchmark, and a multiple against
//! its sector median.

use crate::brackets::{clamp_score, NEUTRAL_SCORE};

/// Score the consistency of growth from `delta = recent − trailing`.
///
/// Signed steps around a base of 50:
///
/// | delta          | step |
/// |----------------|------|
/// | > 3            | +50  |
/// | [1, 3]         | +30  |
/// | \|d\| ≤ 1      | +10  |
/// | [−3, −1)       | −10  |
/// | < −3           | −30  |
pub fn consistency_step(delta: f64) -> f64 {
    let step = if delta > 3.0 {
        50.0
    } else if delta >= 1.0 {
        30.0
    } else if delta.abs() <= 1.0 {
        10.0
    } else if delta >= -3.0 {
        -10.0
    } else {
        -30.0
    };
    clamp_score(NEUTRAL_SCORE + step)
}

/// Adjustment applied to an EPS score when EPS growth outruns revenue growth
/// (operating leverage) or trails it (margin compression) by more than
/// `margin` points.
pub fn operating_leverage_adjustment(eps_growth: f64, revenue_growth: f64, margin: f64, step: f64) -> f64 {
    if eps_growth > revenue_growth + margin {
        step
    } else if eps_growth < revenue_growth - margin {
        -step
    } else {
        0.0
    }
}

/// Score EPS growth against revenue growth on a base of 50.
///
/// EPS more than 7 points ahead scores 100, within 5 points 70, more than
/// 5 points behind 30; the narrow band in between stays at 50.
pub fn eps_versus_revenue(eps_growth: f64, revenue_growth: f64) -> f64 {
    let step = if eps_growth > revenue_growth + 7.0 {
        50.0
    } else if (eps_growth - revenue_growth).abs() <= 5.0 {
        20.0
    } else if eps_growth < revenue_growth - 5.0 {
        -20.0
    } else {
        0.0
    };
    clamp_score(NEUTRAL_SCORE + step)
}

/// Whether a forward estimate beats the current rate by more than `margin`.
pub fn forward_outpaces(forward: f64, current: f64, margin: f64) -> bool {
    forward > current + margin
}

/// Return of a stock in excess of its benchmark, in percentage points.
pub fn excess_return(stock_return: f64, benchmark_return: f64) -> f64 {
    stock_return - benchmark_return
}

/// Ratio of a multiple to its sector median.
///
/// A missing or non-positive median, or a missing stock multiple, yields
/// 1.0 so the comparison scores "in line with the sector".
pub fn sector_ratio(multiple: Option<f64>, sector_median: Option<f64>) -> f64 {
    match (multiple, sector_median) {
        (Some(m), Some(median)) if median > 0.0 => m / median,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(4.14, 100.0 ; "accelerating")]
    #[test_case(3.0, 80.0 ; "upper step inclusive")]
    #[test_case(1.0, 80.0 ; "one point ahead")]
    #[test_case(0.0, 60.0 ; "steady")]
    #[test_case(-1.0, 60.0 ; "one point behind")]
    #[test_case(-2.0, 40.0 ; "slowing")]
    #[test_case(-3.0, 40.0 ; "lower step inclusive")]
    #[test_case(-3.5, 20.0 ; "decelerating")]
    fn test_consistency_step(delta: f64, expected: f64) {
        assert_eq!(consistency_step(delta), expected);
    }

    #[test]
    fn test_operating_leverage_adjustment() {
        assert_eq!(operating_leverage_adjustment(25.0, 11.0, 5.0, 15.0), 15.0);
        assert_eq!(operating_leverage_adjustment(15.0, 11.86, 5.0, 15.0), 0.0);
        assert_eq!(operating_leverage_adjustment(2.0, 11.0, 5.0, 15.0), -15.0);
    }

    #[test_case(40.0, 30.0, 100.0 ; "operating leverage")]
    #[test_case(33.0, 30.0, 70.0 ; "in line")]
    #[test_case(36.0, 30.0, 50.0 ; "gap band")]
    #[test_case(20.0, 30.0, 30.0 ; "margin compression")]
    fn test_eps_versus_revenue(eps: f64, revenue: f64, expected: f64) {
        assert_eq!(eps_versus_revenue(eps, revenue), expected);
    }

    #[test]
    fn test_sector_ratio_guards() {
        assert_eq!(sector_ratio(Some(30.0), Some(20.0)), 1.5);
        assert_eq!(sector_ratio(Some(30.0), Some(0.0)), 1.0);
        assert_eq!(sector_ratio(Some(30.0), Some(-4.0)), 1.0);
        assert_eq!(sector_ratio(Some(30.0), None), 1.0);
        assert_eq!(sector_ratio(None, Some(20.0)), 1.0);
    }

    #[test]
    fn test_forward_and_excess() {
        assert!(forward_outpaces(30.0, 20.0, 5.0));
        assert!(!forward_outpaces(25.0, 20.0, 5.0));
        assert!((excess_return(35.2, 25.0) - 10.2).abs() < 1e-9);
    }
}
