//! Kurvengeometrie einer Trigger-Kante: zwei kubische Bézier-Teilkurven
//! mit gemeinsamem, verschiebbarem Gelenkpunkt.
//!
//! Alle Operationen liefern neue Werte (`CurveGeometry` ist `Copy`); der
//! Renderer bekommt die Pfad-Kommandos immer vollständig neu.

mod intersect;

pub use intersect::{distance_to_polyline, distance_to_segment, polylines_cross, segment_intersection};

use super::{ConnectionSide, EdgeData};
use glam::Vec2;

/// Faktor für den Kontrollpunkt-Abstand relativ zum Achsen-Delta.
pub const CONTROL_EXTENT_FACTOR: f32 = 0.75;
/// Minimaler Kontrollpunkt-Abstand für horizontale Seiten.
pub const MIN_HORIZONTAL_EXTENT: f32 = 20.0;
/// Anzahl der Abtastschritte für die Längen-Halbierung.
pub const LENGTH_SAMPLE_STEPS: usize = 16;
/// Segmente pro Teilkurve beim Flachen (Treffertest, Kreuzungstest).
pub const FLATTEN_SEGMENTS: usize = 16;
/// Seite für ein loses Startende.
pub const DEFAULT_START_SIDE: ConnectionSide = ConnectionSide::Right;
/// Seite für ein loses Zielende.
pub const DEFAULT_END_SIDE: ConnectionSide = ConnectionSide::Left;

/// Lineare Interpolation in der Form `a·(1-t) + b·t`.
///
/// Liefert für t=0 exakt `a` und für t=1 exakt `b`.
#[inline]
fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a * (1.0 - t) + b * t
}

/// Kontrollpunkte einer kubischen Bézier-Kurve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    /// Startpunkt
    pub p0: Vec2,
    /// Erster Kontrollpunkt
    pub p1: Vec2,
    /// Zweiter Kontrollpunkt
    pub p2: Vec2,
    /// Endpunkt
    pub p3: Vec2,
}

impl CubicBezier {
    /// Erstellt eine Kurve aus vier Punkten
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Punkt bei Parameter t über wiederholte lineare Interpolation (de Casteljau)
    pub fn point_at(&self, t: f32) -> Vec2 {
        let p01 = lerp(self.p0, self.p1, t);
        let p12 = lerp(self.p1, self.p2, t);
        let p23 = lerp(self.p2, self.p3, t);
        let p012 = lerp(p01, p12, t);
        let p123 = lerp(p12, p23, t);
        lerp(p012, p123, t)
    }

    /// Teilt die Kurve bei t in zwei Kurven, die sich den Teilungspunkt teilen
    pub fn split_at(&self, t: f32) -> (CubicBezier, CubicBezier) {
        let p01 = lerp(self.p0, self.p1, t);
        let p12 = lerp(self.p1, self.p2, t);
        let p23 = lerp(self.p2, self.p3, t);
        let p012 = lerp(p01, p12, t);
        let p123 = lerp(p12, p23, t);
        let joint = lerp(p012, p123, t);

        (
            CubicBezier::new(self.p0, p01, p012, joint),
            CubicBezier::new(joint, p123, p23, self.p3),
        )
    }

    /// Erste Ableitung bei t
    pub fn derivative_at(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        3.0 * (mt * mt * (self.p1 - self.p0)
            + 2.0 * mt * t * (self.p2 - self.p1)
            + t * t * (self.p3 - self.p2))
    }

    /// Verschiebt alle vier Punkte
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(
            self.p0 + delta,
            self.p1 + delta,
            self.p2 + delta,
            self.p3 + delta,
        )
    }

    /// Gleichmäßig abgetastete Punkte inkl. Start und Ende
    fn sample(&self, segments: usize) -> impl Iterator<Item = Vec2> + '_ {
        (0..=segments).map(move |i| match i {
            0 => self.p0,
            i if i == segments => self.p3,
            i => self.point_at(i as f32 / segments as f32),
        })
    }
}

/// Definierende Endpunkte und Seiten einer Kurve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveEndpoints {
    /// Startpunkt
    pub start: Vec2,
    /// Seite am Start
    pub start_side: ConnectionSide,
    /// Endpunkt
    pub end: Vec2,
    /// Seite am Ende
    pub end_side: ConnectionSide,
}

/// Ein Element des SVG-Pfads
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// `M x y`
    MoveTo(Vec2),
    /// `C c1 c2 to`
    CubicTo {
        /// Erster Kontrollpunkt
        ctrl1: Vec2,
        /// Zweiter Kontrollpunkt
        ctrl2: Vec2,
        /// Zielpunkt
        to: Vec2,
    },
}

impl PathCommand {
    /// Kommando in SVG-Pfadsyntax
    pub fn to_svg(&self) -> String {
        match self {
            PathCommand::MoveTo(p) => format!("M {} {}", p.x, p.y),
            PathCommand::CubicTo { ctrl1, ctrl2, to } => format!(
                "C {} {} {} {} {} {}",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
        }
    }
}

/// Zweiteilige Kurve einer Kante
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveGeometry {
    endpoints: CurveEndpoints,
    first: CubicBezier,
    second: CubicBezier,
}

impl CurveGeometry {
    /// Baut die Kurve zwischen zwei gerichteten Ankern und teilt sie bei halber Länge.
    pub fn from_endpoints(
        start: Vec2,
        start_side: ConnectionSide,
        end: Vec2,
        end_side: ConnectionSide,
    ) -> Self {
        let delta = end - start;
        let ctrl1 = start + start_side.outward() * control_extent(start_side, delta);
        let ctrl2 = end + end_side.outward() * control_extent(end_side, delta);

        let full = CubicBezier::new(start, ctrl1, ctrl2, end);
        let (first, second) = full.split_at(half_length_parameter(&full));

        Self {
            endpoints: CurveEndpoints {
                start,
                start_side,
                end,
                end_side,
            },
            first,
            second,
        }
    }

    /// Baut die Kurve einer Kante inklusive gespeichertem Gelenkpunkt.
    ///
    /// Lose Enden verwenden die Standardseiten (Start rechts, Ende links).
    pub fn from_edge(edge: &EdgeData) -> Self {
        Self::from_endpoints(
            edge.start,
            edge.source_side.unwrap_or(DEFAULT_START_SIDE),
            edge.end,
            edge.destination_side.unwrap_or(DEFAULT_END_SIDE),
        )
        .move_center_point(edge.center)
    }

    /// Definierende Endpunkte und Seiten
    pub fn endpoints(&self) -> CurveEndpoints {
        self.endpoints
    }

    /// Startpunkt der Kurve
    pub fn start(&self) -> Vec2 {
        self.first.p0
    }

    /// Endpunkt der Kurve
    pub fn end(&self) -> Vec2 {
        self.second.p3
    }

    /// Erste Teilkurve (Start → Gelenk)
    pub fn first(&self) -> &CubicBezier {
        &self.first
    }

    /// Zweite Teilkurve (Gelenk → Ende)
    pub fn second(&self) -> &CubicBezier {
        &self.second
    }

    /// Gemeinsamer Gelenkpunkt der beiden Teilkurven
    pub fn center_point(&self) -> Vec2 {
        self.first.p3
    }

    /// Setzt das Gelenk auf `new_center` und verschiebt die beiden
    /// angrenzenden Kontrollpunkte um dasselbe Delta. Endpunkte bleiben.
    #[must_use]
    pub fn move_center_point(&self, new_center: Vec2) -> Self {
        let delta = new_center - self.center_point();
        let mut moved = *self;
        moved.first.p2 += delta;
        moved.first.p3 = new_center;
        moved.second.p0 = new_center;
        moved.second.p1 += delta;
        moved
    }

    /// Verschiebt die gesamte Kurve starr um `delta`.
    #[must_use]
    pub fn shift_curve(&self, delta: Vec2) -> Self {
        Self {
            endpoints: CurveEndpoints {
                start: self.endpoints.start + delta,
                end: self.endpoints.end + delta,
                ..self.endpoints
            },
            first: self.first.translated(delta),
            second: self.second.translated(delta),
        }
    }

    /// Einheits-Tangente am Kurvenende (Ableitung der zweiten Teilkurve bei t=1).
    pub fn tangent_vector(&self) -> Vec2 {
        let s = &self.second;
        // Fallen Kontrollpunkt und Ende zusammen, ist die Ableitung null
        [s.derivative_at(1.0), s.p3 - s.p1, s.p3 - s.p0, s.p3 - self.first.p0]
            .into_iter()
            .find_map(|v| v.try_normalize())
            .unwrap_or(Vec2::X)
    }

    /// Normale: Tangente um 90° gedreht
    pub fn normal_vector(&self) -> Vec2 {
        self.tangent_vector().perp()
    }

    /// Tangente, die nie nach links zeigt (Beschriftung steht nie Kopf)
    pub fn compensated_tangent(&self) -> Vec2 {
        let tangent = self.tangent_vector();
        if needs_flip(tangent) {
            -tangent
        } else {
            tangent
        }
    }

    /// Normale mit derselben Kompensation wie `compensated_tangent`
    pub fn compensated_normal(&self) -> Vec2 {
        let tangent = self.tangent_vector();
        let normal = tangent.perp();
        if needs_flip(tangent) {
            -normal
        } else {
            normal
        }
    }

    /// Pfad als ein MoveTo plus zwei CubicTo
    pub fn path_commands(&self) -> [PathCommand; 3] {
        [
            PathCommand::MoveTo(self.first.p0),
            PathCommand::CubicTo {
                ctrl1: self.first.p1,
                ctrl2: self.first.p2,
                to: self.first.p3,
            },
            PathCommand::CubicTo {
                ctrl1: self.second.p1,
                ctrl2: self.second.p2,
                to: self.second.p3,
            },
        ]
    }

    /// SVG-`d`-Attribut des Pfads
    pub fn svg_path_data(&self) -> String {
        self.path_commands()
            .iter()
            .map(PathCommand::to_svg)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Punkt auf dem zusammengesetzten Pfad, t ∈ [0, 1].
    ///
    /// t ≤ 0 liefert exakt den Start, t ≥ 1 exakt das Ende.
    pub fn point_at(&self, t: f32) -> Vec2 {
        if t <= 0.0 {
            self.start()
        } else if t >= 1.0 {
            self.end()
        } else if t < 0.5 {
            self.first.point_at(t * 2.0)
        } else {
            self.second.point_at((t - 0.5) * 2.0)
        }
    }

    /// Polylinie über beide Teilkurven (`segments` Segmente je Teilkurve)
    pub fn flatten(&self, segments: usize) -> Vec<Vec2> {
        let segments = segments.max(1);
        let mut points = Vec::with_capacity(segments * 2 + 1);
        points.extend(self.first.sample(segments));
        points.extend(self.second.sample(segments).skip(1));
        points
    }

    /// Näherungsweiser Abstand eines Punkts zur Kurve
    pub fn distance_to(&self, point: Vec2) -> f32 {
        distance_to_polyline(point, &self.flatten(FLATTEN_SEGMENTS))
    }

    /// Prüft ob die aus `other` gebaute Kurve diese Kurve kreuzt.
    ///
    /// Dieselben Endpunkte und Seiten wie die eigenen ergeben nie eine Kreuzung.
    pub fn is_intersect(&self, other: &CurveEndpoints) -> bool {
        if *other == self.endpoints {
            return false;
        }
        let other = CurveGeometry::from_endpoints(
            other.start,
            other.start_side,
            other.end,
            other.end_side,
        );
        self.intersects(&other)
    }

    /// Prüft ob sich zwei Kurven echt kreuzen (Berührung an Enden zählt nicht).
    pub fn intersects(&self, other: &CurveGeometry) -> bool {
        if self == other {
            return false;
        }
        polylines_cross(
            &self.flatten(FLATTEN_SEGMENTS),
            &other.flatten(FLATTEN_SEGMENTS),
        )
    }
}

/// Abstand des Kontrollpunkts vom Anker entlang der Achse der Seite.
fn control_extent(side: ConnectionSide, delta: Vec2) -> f32 {
    if side.is_horizontal() {
        (CONTROL_EXTENT_FACTOR * delta.x.abs()).max(MIN_HORIZONTAL_EXTENT)
    } else {
        CONTROL_EXTENT_FACTOR * delta.y.abs()
    }
}

/// Parameter, dessen kumulierte (quadrierte) Abtastlänge der halben Gesamtlänge
/// am nächsten liegt. Quadrierte Abstände sparen die Wurzel.
fn half_length_parameter(curve: &CubicBezier) -> f32 {
    let mut cumulative = [0.0f32; LENGTH_SAMPLE_STEPS + 1];
    let mut prev = curve.p0;
    for i in 1..=LENGTH_SAMPLE_STEPS {
        let p = curve.point_at(i as f32 / LENGTH_SAMPLE_STEPS as f32);
        cumulative[i] = cumulative[i - 1] + prev.distance_squared(p);
        prev = p;
    }

    let total = cumulative[LENGTH_SAMPLE_STEPS];
    if total <= f32::EPSILON {
        return 0.5;
    }

    let half = total * 0.5;
    // Randindizes ausschließen, sonst entsteht eine entartete Teilkurve
    let best = (1..LENGTH_SAMPLE_STEPS)
        .min_by(|&a, &b| {
            (cumulative[a] - half)
                .abs()
                .total_cmp(&(cumulative[b] - half).abs())
        })
        .unwrap_or(LENGTH_SAMPLE_STEPS / 2);

    best as f32 / LENGTH_SAMPLE_STEPS as f32
}

/// Mehr als ±90° gegenüber der Horizontalen
fn needs_flip(tangent: Vec2) -> bool {
    tangent.x < 0.0
}
