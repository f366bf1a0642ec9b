use glam::DVec2;

/// Axis-aligned lon/lat bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Bounds of a point set; `None` when empty
    pub fn of(points: &[DVec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Bounds {
            min: *first,
            max: *first,
        };
        for p in rest {
            bounds.include(*p);
        }
        Some(bounds)
    }

    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline(always)]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}

/// Polygon with an exterior ring and optional holes (lon/lat)
#[derive(Clone, Debug)]
pub struct Polygon {
    pub exterior: Vec<DVec2>,
    pub holes: Vec<Vec<DVec2>>,
}

impl Polygon {
    pub fn from_rings(rings: &[Vec<Vec<f64>>]) -> Option<Self> {
        let mut rings = rings.iter().map(|r| to_ring(r));
        let exterior = rings.next()?;
        if exterior.len() < 3 {
            return None;
        }
        Some(Self {
            exterior,
            holes: rings.filter(|r| r.len() >= 3).collect(),
        })
    }

    /// Even-odd containment; points inside a hole are outside
    pub fn contains(&self, p: DVec2) -> bool {
        ring_contains(&self.exterior, p) && !self.holes.iter().any(|h| ring_contains(h, p))
    }

    pub fn rings(&self) -> impl Iterator<Item = &[DVec2]> {
        std::iter::once(self.exterior.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Absolute shoelace area of the exterior ring (square degrees)
    pub fn area(&self) -> f64 {
        signed_area(&self.exterior).abs()
    }

    /// Area centroid of the exterior ring, falling back to the bbox center
    /// for degenerate rings
    pub fn centroid(&self) -> DVec2 {
        let a = signed_area(&self.exterior);
        if a.abs() < f64::EPSILON {
            return Bounds::of(&self.exterior).map_or(DVec2::ZERO, |b| b.center());
        }
        let mut c = DVec2::ZERO;
        for (p, q) in ring_edges(&self.exterior) {
            let cross = p.perp_dot(q);
            c += (p + q) * cross;
        }
        c / (6.0 * a)
    }
}

fn to_ring(coords: &[Vec<f64>]) -> Vec<DVec2> {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| DVec2::new(c[0], c[1]))
        .collect()
}

/// Consecutive vertex pairs, closing the ring if the file left it open
fn ring_edges(ring: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

fn signed_area(ring: &[DVec2]) -> f64 {
    ring_edges(ring).map(|(p, q)| p.perp_dot(q)).sum::<f64>() * 0.5
}

/// Crossing-number test
#[inline(always)]
pub fn ring_contains(ring: &[DVec2], p: DVec2) -> bool {
    let mut inside = false;
    for (a, b) in ring_edges(ring) {
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Vec<f64>> {
        vec![
            vec![x0, y0],
            vec![x0 + size, y0],
            vec![x0 + size, y0 + size],
            vec![x0, y0 + size],
            vec![x0, y0],
        ]
    }

    #[test]
    fn test_contains_respects_holes() {
        let poly = Polygon::from_rings(&[square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)]).unwrap();
        assert!(poly.contains(DVec2::new(1.0, 1.0)));
        assert!(!poly.contains(DVec2::new(5.0, 5.0)));
        assert!(!poly.contains(DVec2::new(11.0, 5.0)));
    }

    #[test]
    fn test_open_ring_is_closed_implicitly() {
        let mut ring = square(0.0, 0.0, 2.0);
        ring.pop();
        let poly = Polygon::from_rings(&[ring]).unwrap();
        assert!(poly.contains(DVec2::new(1.0, 1.0)));
        assert!((poly.area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_centroid_of_square() {
        let poly = Polygon::from_rings(&[square(-76.0, -10.0, 2.0)]).unwrap();
        let c = poly.centroid();
        assert!((c.x + 75.0).abs() < 1e-9);
        assert!((c.y + 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        assert!(Polygon::from_rings(&[vec![vec![0.0, 0.0], vec![1.0, 1.0]]]).is_none());
        assert!(Polygon::from_rings(&[]).is_none());
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::of(&[DVec2::new(0.0, 0.0), DVec2::new(1.0, 2.0)]).unwrap();
        let b = Bounds::of(&[DVec2::new(-3.0, 1.0)]).unwrap();
        let u = a.union(b);
        assert_eq!(u.min, DVec2::new(-3.0, 0.0));
        assert_eq!(u.max, DVec2::new(1.0, 2.0));
        assert!(u.contains(DVec2::new(-1.0, 1.0)));
    }
}
