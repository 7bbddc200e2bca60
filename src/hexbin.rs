// @file hexbin.rs
// @brief hexagonal binning of pixel-space points

use std::collections::HashMap;
use std::f64::consts::PI;

#[derive(Clone, Debug, PartialEq)]
pub struct Bin<T> {
    pub x: f64,
    pub y: f64,
    pub members: Vec<T>,
}

impl<T> Bin<T> {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Pointy-top hexagonal grid; cell (i, j) is centered at
/// `((i + (j & 1) / 2) * dx, j * dy)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HexBinner {
    radius: f64,
    dx: f64,
    dy: f64,
}

impl HexBinner {
    pub fn new(radius: f64) -> HexBinner {
        HexBinner {
            radius,
            dx: radius * 2.0 * (PI / 3.0).sin(),
            dy: radius * 1.5,
        }
    }

    /// Grid cell of a pixel position.
    pub fn cell(&self, x: f64, y: f64) -> (i64, i64) {
        let px = x / self.dx;
        let py = y / self.dy;
        let mut pj = py.round();
        let odd = |j: f64| (j as i64).rem_euclid(2) as f64;
        let px = px - odd(pj) / 2.0;
        let mut pi = px.round();
        let py1 = py - pj;

        // near a row boundary the rounded cell may not be the nearest center
        if py1.abs() * 3.0 > 1.0 {
            let px1 = px - pi;
            let pi2 = pi + (if px < pi { -0.5 } else { 0.5 });
            let pj2 = pj + (if py < pj { -1.0 } else { 1.0 });
            let px2 = px - pi2;
            let py2 = py - pj2;
            // pixel distances
            let d1 = (px1 * self.dx).powi(2) + (py1 * self.dy).powi(2);
            let d2 = (px2 * self.dx).powi(2) + (py2 * self.dy).powi(2);
            if d1 > d2 {
                pi = pi2 + (if odd(pj) == 1.0 { 0.5 } else { -0.5 });
                pj = pj2;
            }
        }
        (pi as i64, pj as i64)
    }

    pub fn center(&self, cell: (i64, i64)) -> (f64, f64) {
        let (i, j) = cell;
        let shift = j.rem_euclid(2) as f64 / 2.0;
        ((i as f64 + shift) * self.dx, j as f64 * self.dy)
    }

    /// Groups `items` by the hexagon containing `position(item)`. Empty cells
    /// are omitted and bins come out in the order their first member was seen.
    pub fn bin<T, I, F>(&self, items: I, position: F) -> Vec<Bin<T>>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> (f64, f64),
    {
        let mut index: HashMap<(i64, i64), usize> = HashMap::new();
        let mut bins: Vec<Bin<T>> = Vec::new();
        for item in items {
            let (x, y) = position(&item);
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let cell = self.cell(x, y);
            if let Some(&i) = index.get(&cell) {
                bins[i].members.push(item);
            } else {
                let (cx, cy) = self.center(cell);
                index.insert(cell, bins.len());
                bins.push(Bin {
                    x: cx,
                    y: cy,
                    members: vec![item],
                });
            }
        }
        bins
    }

    /// Corner offsets of one hexagon relative to its center, starting at the top.
    pub fn hexagon(&self) -> [(f64, f64); 6] {
        let mut corners = [(0.0, 0.0); 6];
        for (i, c) in corners.iter_mut().enumerate() {
            let angle = i as f64 * PI / 3.0;
            *c = (angle.sin() * self.radius, -angle.cos() * self.radius);
        }
        corners
    }

    /// True when `(x, y)` falls inside the hexagon centered at `center`.
    pub fn contains(&self, center: (f64, f64), x: f64, y: f64) -> bool {
        let (dx, dy) = ((x - center.0).abs(), (y - center.1).abs());
        let half_width = self.dx / 2.0;
        if dx > half_width || dy > self.radius {
            return false;
        }
        // slanted edges: dy <= r - dx * tan(30deg)
        dy <= self.radius - dx / 3f64.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn binner() -> HexBinner {
        HexBinner::new(10.0)
    }

    #[test]
    fn test_points_near_center_share_bin() {
        let b = binner();
        let bins = b.bin(vec![(1.0, 1.0), (-2.0, 3.0), (60.0, 60.0), (2.0, -1.0)], |p| *p);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count(), 3);
        assert_eq!((bins[0].x, bins[0].y), (0.0, 0.0));
        assert_eq!(bins[1].members, vec![(60.0, 60.0)]);
    }

    #[test]
    fn test_every_point_in_nearest_center() {
        let b = binner();
        let points = (0..40)
            .flat_map(|i| (0..40).map(move |j| (i as f64 * 2.37 - 5.0, j as f64 * 2.91 - 7.0)))
            .collect::<Vec<_>>();
        let bins = b.bin(points.iter().copied(), |p| *p);
        assert_eq!(bins.iter().map(|x| x.count()).sum::<usize>(), points.len());

        let centers = bins.iter().map(|x| (x.x, x.y)).collect::<Vec<_>>();
        for bin in &bins {
            for &(x, y) in &bin.members {
                let own = (x - bin.x).powi(2) + (y - bin.y).powi(2);
                for &(cx, cy) in &centers {
                    assert!(own <= (x - cx).powi(2) + (y - cy).powi(2) + 1e-9);
                }
            }
        }
    }

    fn neighbors((i, j): (i64, i64)) -> [(i64, i64); 6] {
        // odd rows sit half a cell to the right
        let s = j.rem_euclid(2);
        [
            (i - 1, j),
            (i + 1, j),
            (i - 1 + s, j - 1),
            (i + s, j - 1),
            (i - 1 + s, j + 1),
            (i + s, j + 1),
        ]
    }

    #[test]
    fn test_cell_is_nearest_and_contains_point() {
        for radius in [8.0, 10.0] {
            let b = HexBinner::new(radius);
            let half_width = radius * (PI / 3.0).sin();
            for i in 0..300 {
                for j in 0..300 {
                    let (x, y) = (i as f64 * 0.613 + 0.011, j as f64 * 0.587 + 0.007);
                    let cell = b.cell(x, y);
                    let (cx, cy) = b.center(cell);
                    let own = (x - cx).powi(2) + (y - cy).powi(2);
                    for n in neighbors(cell) {
                        let (nx, ny) = b.center(n);
                        assert!(own <= (x - nx).powi(2) + (y - ny).powi(2) + 1e-9, "({x}, {y}) -> {cell:?}");
                    }
                    let (dx, dy) = ((x - cx).abs(), (y - cy).abs());
                    assert!(dx <= half_width + 1e-9 && dy <= radius - dx / 3f64.sqrt() + 1e-9, "({x}, {y}) -> {cell:?}");
                }
            }
        }
    }

    #[test]
    fn test_boundary_point_goes_to_nearer_row() {
        let b = HexBinner::new(10.0);
        // nearer to (0, 30) than to the odd-row neighbor at (-8.66, 45)
        let (x, y) = b.center(b.cell(-0.26, 39.56));
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 30.0);
    }

    #[test]
    fn test_membership_independent_of_order() {
        let b = binner();
        let points = vec![(3.0, 4.0), (40.0, 12.0), (41.0, 13.0), (88.0, 71.0), (2.0, 5.0)];
        let mut fw = b.bin(points.iter().copied(), |p| *p);
        let mut rv = b.bin(points.iter().rev().copied(), |p| *p);
        let key = |x: &Bin<(f64, f64)>| (x.x.to_bits(), x.y.to_bits());
        fw.sort_by_key(key);
        rv.sort_by_key(key);
        for bin in rv.iter_mut() {
            bin.members.reverse();
        }
        assert_eq!(fw, rv);
    }

    #[test]
    fn test_odd_rows_are_shifted() {
        let b = binner();
        let dx = 20.0 * (PI / 3.0).sin();
        let (x, y) = b.center((0, 1));
        assert_relative_eq!(x, dx / 2.0);
        assert_relative_eq!(y, 15.0);
        assert_eq!(b.cell(x, y), (0, 1));
        assert_eq!(b.cell(-dx / 2.0, -15.0), (-1, -1));
    }

    #[test]
    fn test_skips_non_finite() {
        let bins = binner().bin(vec![(f64::NAN, 1.0), (1.0, 1.0)], |p| *p);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count(), 1);
    }

    #[test]
    fn test_hexagon_and_contains() {
        let b = binner();
        let corners = b.hexagon();
        assert_relative_eq!(corners[0].0, 0.0);
        assert_relative_eq!(corners[0].1, -10.0);
        assert_relative_eq!(corners[3].1, 10.0);
        assert!(b.contains((50.0, 50.0), 50.0, 50.0));
        assert!(b.contains((50.0, 50.0), 55.0, 52.0));
        assert!(!b.contains((50.0, 50.0), 50.0, 61.0));
        assert!(!b.contains((50.0, 50.0), 59.0, 58.0));
    }
}
