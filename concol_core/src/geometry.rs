//! # Section Geometry
//!
//! Polygon primitives and the circular reinforced column builder.
//!
//! Every shape is a closed polygon with counter-clockwise vertices, so the
//! closed-form (Green's theorem) integrals give positive areas. Holes are
//! stored separately and subtracted from their region.
//!
//! ## Local Frame
//!
//! Bending about an axis at angle θ is analysed in the rotated frame
//!
//! ```text
//! u =  x cos θ + y sin θ
//! v = -x sin θ + y cos θ
//! ```
//!
//! with compression on the `+v` side. [`Polygon::rotated`] maps into this
//! frame and [`Polygon::clip_above`] keeps the part with `v >= v_limit`.

use std::f64::consts::PI;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::equations::section::{
    bar_centre_chord, bar_centre_radius, circle_area, polygon_radius_for_area,
};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{Concrete, Material, SteelBar};

/// Number of sides used to discretise the concrete circle
pub const CONCRETE_CIRCLE_SIDES: usize = 96;

/// Number of sides used to discretise each bar
pub const BAR_CIRCLE_SIDES: usize = 16;

/// Point in the section plane (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinates in the frame rotated by `theta`, returned as `(u, v)`
    #[must_use]
    pub fn to_local(self, theta: f64) -> (f64, f64) {
        let (s, c) = theta.sin_cos();
        (self.x * c + self.y * s, -self.x * s + self.y * c)
    }

    /// Inverse of [`Point::to_local`]
    #[must_use]
    pub fn from_local(u: f64, v: f64, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new(u * c - v * s, u * s + v * c)
    }
}

/// Area integrals of a shape about the global origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaIntegrals {
    /// ∫ dA
    pub area: f64,
    /// ∫ y dA
    pub qx: f64,
    /// ∫ x dA
    pub qy: f64,
    /// ∫ y² dA
    pub ixx: f64,
    /// ∫ x² dA
    pub iyy: f64,
    /// ∫ xy dA
    pub ixy: f64,
}

impl AreaIntegrals {
    /// Centroid, or `None` for a zero-area shape
    pub fn centroid(&self) -> Option<Point> {
        if self.area.abs() < f64::EPSILON {
            return None;
        }
        Some(Point::new(self.qy / self.area, self.qx / self.area))
    }

    /// Scale every integral (e.g. by an elastic modulus)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            area: self.area * factor,
            qx: self.qx * factor,
            qy: self.qy * factor,
            ixx: self.ixx * factor,
            iyy: self.iyy * factor,
            ixy: self.ixy * factor,
        }
    }
}

impl Add for AreaIntegrals {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            area: self.area + rhs.area,
            qx: self.qx + rhs.qx,
            qy: self.qy + rhs.qy,
            ixx: self.ixx + rhs.ixx,
            iyy: self.iyy + rhs.iyy,
            ixy: self.ixy + rhs.ixy,
        }
    }
}

impl Sub for AreaIntegrals {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + rhs.scaled(-1.0)
    }
}

/// Closed polygon with counter-clockwise vertices (first vertex not repeated)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    /// Build a polygon, reversing the ring if it was given clockwise.
    pub fn new(mut vertices: Vec<Point>) -> Self {
        if signed_area(&vertices) < 0.0 {
            vertices.reverse();
        }
        Self { vertices }
    }

    /// Regular polygon with `n` sides, circumradius `radius`, first vertex
    /// at angle `start_angle` from the +x axis.
    pub fn regular(n: usize, radius: f64, centre: Point, start_angle: f64) -> Self {
        let vertices = (0..n)
            .map(|i| {
                let a = start_angle + 2.0 * PI * i as f64 / n as f64;
                Point::new(centre.x + radius * a.cos(), centre.y + radius * a.sin())
            })
            .collect();
        Self { vertices }
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// All area integrals in one pass.
    pub fn integrals(&self) -> AreaIntegrals {
        if self.vertices.len() < 3 {
            return AreaIntegrals::default();
        }
        let mut out = AreaIntegrals::default();
        for (p, q) in self.edges() {
            let cross = p.x * q.y - q.x * p.y;
            out.area += cross;
            out.qx += (p.y + q.y) * cross;
            out.qy += (p.x + q.x) * cross;
            out.ixx += (p.y * p.y + p.y * q.y + q.y * q.y) * cross;
            out.iyy += (p.x * p.x + p.x * q.x + q.x * q.x) * cross;
            out.ixy += (p.x * q.y + 2.0 * p.x * p.y + 2.0 * q.x * q.y + q.x * p.y) * cross;
        }
        out.area /= 2.0;
        out.qx /= 6.0;
        out.qy /= 6.0;
        out.ixx /= 12.0;
        out.iyy /= 12.0;
        out.ixy /= 24.0;
        out
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    pub fn centroid(&self) -> Option<Point> {
        self.integrals().centroid()
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(p, q)| (q.x - p.x).hypot(q.y - p.y)).sum()
    }

    /// Polygon expressed in the frame rotated by `theta` (x = u, y = v).
    pub fn rotated(&self, theta: f64) -> Polygon {
        let vertices = self
            .vertices
            .iter()
            .map(|p| {
                let (u, v) = p.to_local(theta);
                Point::new(u, v)
            })
            .collect();
        Polygon { vertices }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Polygon {
        let vertices = self
            .vertices
            .iter()
            .map(|p| Point::new(p.x + dx, p.y + dy))
            .collect();
        Polygon { vertices }
    }

    /// Minimum and maximum `v` coordinate in the frame rotated by `theta`
    pub fn extent(&self, theta: f64) -> (f64, f64) {
        self.vertices
            .iter()
            .map(|p| p.to_local(theta).1)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Axis-aligned bounding box as `(min, max)` corners
    pub fn bounding_box(&self) -> (Point, Point) {
        self.vertices.iter().fold(
            (
                Point::new(f64::INFINITY, f64::INFINITY),
                Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(lo, hi), p| {
                (
                    Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        )
    }

    /// Part of the polygon with `v >= v_limit` in the frame rotated by
    /// `theta`, returned in global coordinates. Sutherland-Hodgman against a
    /// single half-plane; `None` when nothing remains.
    pub fn clip_above(&self, v_limit: f64, theta: f64) -> Option<Polygon> {
        let n = self.vertices.len();
        if n < 3 {
            return None;
        }
        let local: Vec<(f64, f64)> = self.vertices.iter().map(|p| p.to_local(theta)).collect();

        let mut out = Vec::with_capacity(n + 2);
        for i in 0..n {
            let (u0, v0) = local[i];
            let (u1, v1) = local[(i + 1) % n];
            let inside0 = v0 >= v_limit;
            let inside1 = v1 >= v_limit;

            if inside0 {
                out.push((u0, v0));
            }
            if inside0 != inside1 {
                let t = (v_limit - v0) / (v1 - v0);
                out.push((u0 + t * (u1 - u0), v_limit));
            }
        }

        if out.len() < 3 {
            return None;
        }
        let clipped = Polygon {
            vertices: out
                .into_iter()
                .map(|(u, v)| Point::from_local(u, v, theta))
                .collect(),
        };
        if clipped.area() <= 0.0 {
            None
        } else {
            Some(clipped)
        }
    }
}

fn signed_area(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let p = vertices[i];
            let q = vertices[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum::<f64>()
        / 2.0
}

/// Regular polygon, centred on the origin, whose area equals `area`.
///
/// ```rust
/// use concol_core::geometry::circular_section_by_area;
///
/// let poly = circular_section_by_area(1000.0, 16);
/// assert!((poly.area() - 1000.0).abs() < 1e-9);
/// ```
pub fn circular_section_by_area(area: f64, n: usize) -> Polygon {
    Polygon::regular(n, polygon_radius_for_area(area, n), Point::default(), 0.0)
}

/// Material region: an exterior ring minus any holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub exterior: Polygon,
    pub holes: Vec<Polygon>,
    pub material: Material,
}

impl Region {
    pub fn integrals(&self) -> AreaIntegrals {
        self.holes
            .iter()
            .fold(self.exterior.integrals(), |acc, h| acc - h.integrals())
    }

    pub fn area(&self) -> f64 {
        self.integrals().area
    }

    /// Integrals of the part of the region with `v >= v_limit`
    pub fn clipped_integrals(&self, v_limit: f64, theta: f64) -> AreaIntegrals {
        let clip = |p: &Polygon| {
            p.clip_above(v_limit, theta)
                .map(|c| c.integrals())
                .unwrap_or_default()
        };
        self.holes
            .iter()
            .fold(clip(&self.exterior), |acc, h| acc - clip(h))
    }
}

/// Reinforcing bar; analysed as a point area at its centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub polygon: Polygon,
    pub centre: Point,
    pub diameter: f64,
    /// Area of the discretised bar (mm²)
    pub area: f64,
    pub material: Material,
}

/// Concrete regions plus the bars embedded in them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundGeometry {
    pub regions: Vec<Region>,
    pub bars: Vec<Bar>,
}

impl CompoundGeometry {
    /// `(v_min, v_max)` over every region exterior in the frame rotated by `theta`
    pub fn extent(&self, theta: f64) -> (f64, f64) {
        self.regions
            .iter()
            .map(|r| r.exterior.extent(theta))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            })
    }

    /// Bounding box over all regions
    pub fn bounding_box(&self) -> (Point, Point) {
        self.regions.iter().map(|r| r.exterior.bounding_box()).fold(
            (
                Point::new(f64::INFINITY, f64::INFINITY),
                Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(lo, hi), (a, b)| {
                (
                    Point::new(lo.x.min(a.x), lo.y.min(a.y)),
                    Point::new(hi.x.max(b.x), hi.y.max(b.y)),
                )
            },
        )
    }

    /// Total area of the bars (mm²)
    pub fn bar_area(&self) -> f64 {
        self.bars.iter().map(|b| b.area).sum()
    }

    /// Net concrete area (mm²)
    pub fn concrete_area(&self) -> f64 {
        self.regions.iter().map(Region::area).sum()
    }
}

/// Inputs for [`concrete_circular_section`]
#[derive(Debug, Clone, PartialEq)]
pub struct CircularSectionParams {
    /// Column diameter D (mm)
    pub diameter: f64,
    /// Bar diameter Ø (mm)
    pub bar_diameter: f64,
    pub bar_count: u32,
    /// Cover to the bar surface (mm)
    pub cover: f64,
    pub concrete: Concrete,
    pub steel: SteelBar,
}

/// Build a circular column with `bar_count` equally spaced bars.
///
/// The concrete is a 96-gon and each bar a 16-gon, each with the area of the
/// true circle. The first bar sits on the +x axis.
///
/// # Errors
///
/// `InvalidGeometry` when the bars do not fit inside the concrete or when
/// adjacent bars overlap.
pub fn concrete_circular_section(params: &CircularSectionParams) -> CalcResult<CompoundGeometry> {
    let d = params.diameter;
    let bar_d = params.bar_diameter;
    let n = params.bar_count;

    if !(d > 0.0 && bar_d > 0.0 && params.cover >= 0.0) || n == 0 {
        return Err(CalcError::invalid_geometry(format!(
            "diameter, bar diameter and bar count must be positive and cover non-negative \
             (D = {}, bar = {}, n = {}, cover = {})",
            d, bar_d, n, params.cover
        )));
    }

    let r = bar_centre_radius(d, params.cover, bar_d);
    if r - bar_d / 2.0 <= 0.0 {
        return Err(CalcError::invalid_geometry(format!(
            "bars do not fit inside the concrete: cover {} + bar {} >= D/2 = {}",
            params.cover,
            bar_d,
            d / 2.0
        )));
    }
    if n >= 2 && bar_centre_chord(r, n) < bar_d {
        return Err(CalcError::invalid_geometry(format!(
            "{} bars of {} mm overlap on a {:.1} mm bar circle",
            n,
            bar_d,
            2.0 * r
        )));
    }

    let steel = Material::Steel(params.steel.clone());
    let bar_area = circle_area(bar_d);
    let bars: Vec<Bar> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI * f64::from(i) / f64::from(n);
            let centre = Point::new(r * angle.cos(), r * angle.sin());
            let polygon = circular_section_by_area(bar_area, BAR_CIRCLE_SIDES)
                .translated(centre.x, centre.y);
            Bar {
                area: polygon.area(),
                polygon,
                centre,
                diameter: bar_d,
                material: steel.clone(),
            }
        })
        .collect();

    let concrete = Region {
        exterior: circular_section_by_area(circle_area(d), CONCRETE_CIRCLE_SIDES),
        holes: bars.iter().map(|b| b.polygon.clone()).collect(),
        material: Material::Concrete(params.concrete.clone()),
    };

    tracing::debug!(
        diameter = d,
        bar_count = n,
        bar_centre_radius = r,
        "built circular section"
    );

    Ok(CompoundGeometry {
        regions: vec![concrete],
        bars,
    })
}
