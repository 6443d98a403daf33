//! Rasterisation on a [`Canvas`]
//!
//! Every plotted point stamps a square footprint of `size×size` cells centered on
//! the point (`size` is odd). Cells outside the canvas are skipped. Lines and circles
//! jump straight to the steps whose footprint can reach the canvas, so their cost
//! follows the canvas size rather than the shape's length or radius.

use super::{Canvas, ColorName};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

impl Canvas {
    /// Paint a `size×size` square centered on `(cx, cy)`
    pub fn stamp(&mut self, cx: i64, cy: i64, color: ColorName, size: i32) {
        let half = i64::from(size / 2);
        let limit = self.size() as i64;

        let x_range = (cx - half).max(0)..=(cx + half).min(limit - 1);
        let y_range = (cy - half).max(0)..=(cy + half).min(limit - 1);

        for y in y_range {
            for x in x_range.clone() {
                // Both coordinates are in [0, size) here
                self.set(x as i32, y as i32, color);
            }
        }
    }

    /// Bresenham line from `from` to `to`, both ends included
    pub fn draw_line(&mut self, from: (i64, i64), to: (i64, i64), color: ColorName, size: i32) {
        let line = LineSteps::new(from, to);
        let half = i64::from(size / 2);
        let (lo, hi) = (-half, self.size() as i64 - 1 + half);

        let (start_x, end_x) = line.window(|(x, _)| x, line.sx, lo, hi);
        let (start_y, end_y) = line.window(|(_, y)| y, line.sy, lo, hi);

        for k in start_x.max(start_y)..=end_x.min(end_y) {
            let (x, y) = line.point(k);
            self.stamp(x, y, color, size);
        }
    }

    /// Midpoint circle outline of the given radius around `center`
    pub fn draw_circle(&mut self, center: (i64, i64), radius: i64, color: ColorName, size: i32) {
        let (cx, cy) = center;
        let half = i64::from(size / 2);
        if !self.ring_may_touch(center, radius, half) {
            return;
        }
        let bands = self.ring_bands(center, half);

        let mut x = radius;
        let mut y = 0;
        let mut err = 0;

        while x >= y {
            let Some(&(band_start, _)) = bands.iter().find(|&&(_, end)| end >= y) else {
                break;
            };
            if band_start > y {
                if let Some(state) = midpoint_state(radius, band_start).filter(|s| s.1 > y) {
                    (x, y, err) = state;
                    continue;
                }
            }

            for (px, py) in [
                (cx + x, cy + y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx - x, cy + y),
                (cx - x, cy - y),
                (cx - y, cy - x),
                (cx + y, cy - x),
                (cx + x, cy - y),
            ] {
                self.stamp(px, py, color, size);
            }

            y += 1;
            err += 1 + 2 * y;
            if 2 * (err - x) + 1 > 0 {
                x -= 1;
                err += 1 - 2 * x;
            }
        }
    }

    /// Rectangle outline centered on `center`, drawn as four lines
    pub fn draw_rectangle(
        &mut self,
        center: (i64, i64),
        width: i64,
        height: i64,
        color: ColorName,
        size: i32,
    ) {
        let (cx, cy) = center;
        let left = cx - width / 2;
        let right = cx + width / 2;
        let top = cy - height / 2;
        let bottom = cy + height / 2;

        self.draw_line((left, top), (right, top), color, size);
        self.draw_line((right, top), (right, bottom), color, size);
        self.draw_line((right, bottom), (left, bottom), color, size);
        self.draw_line((left, bottom), (left, top), color, size);
    }

    /// 4-connected flood fill replacing the region of the seed's color.
    /// Returns the number of cells painted; 0 if the seed already has `color`
    /// or lies outside the canvas.
    pub fn flood_fill(&mut self, x: i32, y: i32, color: ColorName) -> usize {
        let Some(target) = self.get(x, y) else {
            return 0;
        };
        if target == color {
            return 0;
        }

        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert((x, y));
        queue.push_back((x, y));

        let mut painted = 0;
        while let Some((cx, cy)) = queue.pop_front() {
            self.set(cx, cy, color);
            painted += 1;

            for (nx, ny) in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
                if self.get(nx, ny) == Some(target) && visited.insert((nx, ny)) {
                    queue.push_back((nx, ny));
                }
            }
        }

        painted
    }

    /// Whether a ring of `radius` around `center`, widened by `half` on both
    /// sides, can intersect the canvas
    fn ring_may_touch(&self, center: (i64, i64), radius: i64, half: i64) -> bool {
        let (cx, cy) = center;
        let far = self.size() as i64 - 1;

        let nearest_x = cx.clamp(0, far.max(0));
        let nearest_y = cy.clamp(0, far.max(0));
        let min_dist = (cx - nearest_x).abs().max((cy - nearest_y).abs());

        let farthest_x = cx.abs().max((cx - far).abs());
        let farthest_y = cy.abs().max((cy - far).abs());
        let max_dist = farthest_x + farthest_y;

        radius + half + 1 >= min_dist && radius - 2 * half - 2 <= max_dist
    }

    /// Sorted ranges of the midpoint `y` counter outside which no octant stamp can
    /// reach the canvas. Every octant point carries `±y` on exactly one axis.
    fn ring_bands(&self, center: (i64, i64), half: i64) -> Vec<(i64, i64)> {
        let (lo, hi) = (-half, self.size() as i64 - 1 + half);
        let mut bands: Vec<(i64, i64)> = [center.0, center.1]
            .into_iter()
            .flat_map(|c| [(lo - c, hi - c), (c - hi, c - lo)])
            .map(|(start, end)| (start.max(0), end))
            .filter(|(start, end)| start <= end)
            .collect();
        bands.sort_unstable();
        bands
    }
}

/// Closed form of the Bresenham walk. Step `k` moves `k` cells along the major axis
/// and `k * minor / major` cells along the minor one, rounding halves down.
struct LineSteps {
    origin: (i64, i64),
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
}

impl LineSteps {
    fn new(from: (i64, i64), to: (i64, i64)) -> Self {
        LineSteps {
            origin: from,
            dx: (to.0 - from.0).abs(),
            dy: (to.1 - from.1).abs(),
            sx: if from.0 < to.0 { 1 } else { -1 },
            sy: if from.1 < to.1 { 1 } else { -1 },
        }
    }

    fn steps(&self) -> i64 {
        self.dx.max(self.dy)
    }

    fn point(&self, k: i64) -> (i64, i64) {
        let (x0, y0) = self.origin;
        if self.dx >= self.dy {
            (x0 + self.sx * k, y0 + self.sy * scaled(k, self.dy, self.dx))
        } else {
            (x0 + self.sx * scaled(k, self.dx, self.dy), y0 + self.sy * k)
        }
    }

    /// Steps `start..=end` whose coordinate on one axis lies in `lo..=hi`. The
    /// coordinate moves monotonically in the direction of `step`.
    fn window(
        &self,
        coord: impl Fn((i64, i64)) -> i64,
        step: i64,
        lo: i64,
        hi: i64,
    ) -> (i64, i64) {
        let n = self.steps();
        let not_yet = |c: i64| if step > 0 { c < lo } else { c > hi };
        let beyond = |c: i64| if step > 0 { c > hi } else { c < lo };

        let start = first_step_where(n, |k| !not_yet(coord(self.point(k))));
        let end = first_step_where(n, |k| beyond(coord(self.point(k)))) - 1;
        (start, end)
    }
}

/// `k * minor / major`, halves rounded down; 0 for a zero-length line
fn scaled(k: i64, minor: i64, major: i64) -> i64 {
    if major == 0 {
        return 0;
    }
    let (k, minor, major) = (i128::from(k), i128::from(minor), i128::from(major));
    // Never exceeds `minor`
    ((2 * k * minor + major - 1) / (2 * major)) as i64
}

/// First `k` in `0..=n` where `pred` holds, for a `pred` that turns from false to
/// true once; `n + 1` if it never holds
fn first_step_where(n: i64, pred: impl Fn(i64) -> bool) -> i64 {
    let (mut lo, mut hi) = (0, n + 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Column the midpoint walk holds at row `y`, valid while it has never had to move
/// more than one column per row
fn midpoint_x(radius: i64, y: i64) -> Option<i64> {
    let (r, y) = (i128::from(radius), i128::from(y));
    let d = 4 * (r * r - 2 * r - y * y - 2 * y) + 9;
    if d < 1 {
        return None;
    }
    i64::try_from((isqrt(d - 1) + 3) / 2).ok()
}

/// Walk state `(x, y, err)` at the last row in `1..=target` where [`midpoint_x`]
/// is exact
fn midpoint_state(radius: i64, target: i64) -> Option<(i64, i64, i64)> {
    let exact = |y: i64| midpoint_x(radius, y).is_some_and(|x| x >= y + 2);
    if target < 1 || !exact(1) {
        return None;
    }

    let row = if exact(target) {
        target
    } else {
        let (mut lo, mut hi) = (1, target);
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if exact(mid) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    };

    let x = midpoint_x(radius, row)?;
    let (r, xi, yi) = (i128::from(radius), i128::from(x), i128::from(row));
    let err = xi * xi + yi * yi - r * r + 2 * yi + 2 * r - 2 * xi;
    Some((x, row, i64::try_from(err).ok()?))
}

fn isqrt(n: i128) -> i128 {
    if n <= 0 {
        return 0;
    }
    let mut s = (n as f64).sqrt() as i128;
    while s * s > n {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= n {
        s += 1;
    }
    s
}
