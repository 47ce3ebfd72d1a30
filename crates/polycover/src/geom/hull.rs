use num_traits::Signed;

use super::point::{cross, Point};

/// Andrew's monotone chain convex hull (CCW, collinear points dropped).
///
/// Degenerate input (fewer than three non-collinear points) yields the
/// one or two extreme points; callers treat `len() < 3` as "no area".
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort();
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }
    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 {
            let n = lower.len();
            if cross(&lower[n - 2], &lower[n - 1], p).is_positive() {
                break;
            }
            lower.pop();
        }
        lower.push(p.clone());
    }
    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 {
            let n = upper.len();
            if cross(&upper[n - 2], &upper[n - 1], p).is_positive() {
                break;
            }
            upper.pop();
        }
        upper.push(p.clone());
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    hull
}
