use crate::annotation::Annotation;
use crate::shape::Shape;
use atlas_taxonomy::RegionId;
use geo::coordinate_position::CoordPos;
use geo::dimensions::{Dimensions, HasDimensions};
use geo::relate::IntersectionMatrix;
use geo::{
    Area, Coord, Euclidean, HausdorffDistance, InteriorPoint, Length, Line, MinimumRotatedRect,
    Polygon, Relate,
};
use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};

/// Topological predicate between two shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Predicate {
    Touches,
    Crosses,
    Intersects,
    Overlaps,
}

impl Predicate {
    pub const ALL: [Predicate; 4] = [
        Predicate::Touches,
        Predicate::Crosses,
        Predicate::Intersects,
        Predicate::Overlaps,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Predicate::Touches => "touches",
            Predicate::Crosses => "crosses",
            Predicate::Intersects => "intersects",
            Predicate::Overlaps => "overlaps",
        }
    }

    /// Evaluate against a DE-9IM matrix of operands with dimensions `a` and `b`
    fn holds(self, matrix: &IntersectionMatrix, a: Dimensions, b: Dimensions) -> bool {
        let cell = |lhs: CoordPos, rhs: CoordPos| matrix.get(lhs, rhs);
        let set = |lhs: CoordPos, rhs: CoordPos| cell(lhs, rhs) != Dimensions::Empty;
        let interiors = set(CoordPos::Inside, CoordPos::Inside);

        match self {
            Predicate::Intersects => {
                interiors
                    || set(CoordPos::Inside, CoordPos::OnBoundary)
                    || set(CoordPos::OnBoundary, CoordPos::Inside)
                    || set(CoordPos::OnBoundary, CoordPos::OnBoundary)
            }
            Predicate::Touches => !interiors && Predicate::Intersects.holds(matrix, a, b),
            Predicate::Crosses => {
                if a < b {
                    interiors && set(CoordPos::Inside, CoordPos::Outside)
                } else if a > b {
                    interiors && set(CoordPos::Outside, CoordPos::Inside)
                } else if a == Dimensions::OneDimensional {
                    cell(CoordPos::Inside, CoordPos::Inside) == Dimensions::ZeroDimensional
                } else {
                    false
                }
            }
            Predicate::Overlaps => {
                let exteriors =
                    set(CoordPos::Inside, CoordPos::Outside) && set(CoordPos::Outside, CoordPos::Inside);
                match (a, b) {
                    (Dimensions::TwoDimensional, Dimensions::TwoDimensional)
                    | (Dimensions::ZeroDimensional, Dimensions::ZeroDimensional) => interiors && exteriors,
                    (Dimensions::OneDimensional, Dimensions::OneDimensional) => {
                        cell(CoordPos::Inside, CoordPos::Inside) == Dimensions::OneDimensional && exteriors
                    }
                    _ => false,
                }
            }
        }
    }
}

/// Ordered edge lists between annotated regions, one per predicate.
///
/// Every predicate is symmetric, so `(i, j)` and `(j, i)` both appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    pub ids: Vec<RegionId>,
    pub touches: Vec<(RegionId, RegionId)>,
    pub crosses: Vec<(RegionId, RegionId)>,
    pub intersects: Vec<(RegionId, RegionId)>,
    pub overlaps: Vec<(RegionId, RegionId)>,
}

impl Adjacency {
    /// Relate every pair of annotated shapes once, recording both directions
    pub fn compute(annotation: &Annotation) -> Self {
        let entries: Vec<(RegionId, geo::MultiPolygon<f64>)> = annotation
            .iter()
            .map(|(id, shape)| (id, shape.to_multi()))
            .collect();

        let mut adjacency = Adjacency {
            ids: entries.iter().map(|(id, _)| *id).collect(),
            ..Default::default()
        };

        for (i, (left_id, left)) in entries.iter().enumerate() {
            for (right_id, right) in &entries[i + 1..] {
                let matrix = left.relate(right);
                let (a, b) = (left.dimensions(), right.dimensions());
                for predicate in Predicate::ALL {
                    if predicate.holds(&matrix, a, b) {
                        let edges = adjacency.edges_mut(predicate);
                        edges.push((*left_id, *right_id));
                        edges.push((*right_id, *left_id));
                    }
                }
            }
        }

        for predicate in Predicate::ALL {
            adjacency.edges_mut(predicate).sort_unstable();
        }

        log::debug!(
            "Adjacency over {} shapes: {} touching, {} intersecting, {} overlapping",
            adjacency.ids.len(),
            adjacency.touches.len() / 2,
            adjacency.intersects.len() / 2,
            adjacency.overlaps.len() / 2
        );
        adjacency
    }

    pub fn edges(&self, predicate: Predicate) -> &[(RegionId, RegionId)] {
        match predicate {
            Predicate::Touches => &self.touches,
            Predicate::Crosses => &self.crosses,
            Predicate::Intersects => &self.intersects,
            Predicate::Overlaps => &self.overlaps,
        }
    }

    fn edges_mut(&mut self, predicate: Predicate) -> &mut Vec<(RegionId, RegionId)> {
        match predicate {
            Predicate::Touches => &mut self.touches,
            Predicate::Crosses => &mut self.crosses,
            Predicate::Intersects => &mut self.intersects,
            Predicate::Overlaps => &mut self.overlaps,
        }
    }

    /// Deduplicated `(min, max)` edges
    pub fn undirected(&self, predicate: Predicate) -> Vec<(RegionId, RegionId)> {
        self.edges(predicate)
            .iter()
            .filter(|(i, j)| i < j)
            .copied()
            .collect()
    }

    /// Undirected graph over all annotated regions
    pub fn graph(&self, predicate: Predicate) -> UnGraphMap<RegionId, ()> {
        let mut graph = UnGraphMap::with_capacity(self.ids.len(), self.edges(predicate).len() / 2);
        for id in &self.ids {
            graph.add_node(*id);
        }
        for (i, j) in self.undirected(predicate) {
            graph.add_edge(i, j, ());
        }
        graph
    }
}

/// Result of [`nearest_shape`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestMatch {
    pub id: Option<RegionId>,
    /// Hausdorff distance, `f64::INFINITY` without a match
    pub distance: f64,
}

impl NearestMatch {
    pub fn none() -> Self {
        Self {
            id: None,
            distance: f64::INFINITY,
        }
    }
}

/// Candidate with the smallest Hausdorff distance to `shape`.
///
/// The match is rejected when that distance exceeds the larger bounding box
/// extent of both shapes. The first candidate wins ties.
pub fn nearest_shape<'s, I>(shape: &Shape, candidates: I) -> NearestMatch
where
    I: IntoIterator<Item = (RegionId, &'s Shape)>,
{
    let target = shape.to_multi();
    let mut best: Option<(RegionId, f64, f64)> = None;

    for (id, candidate) in candidates {
        let distance = target.hausdorff_distance(&candidate.to_multi());
        if best.map_or(true, |(_, d, _)| distance < d) {
            best = Some((id, distance, candidate.extent()));
        }
    }

    match best {
        Some((id, distance, extent)) if distance <= shape.extent().max(extent) => NearestMatch {
            id: Some(id),
            distance,
        },
        _ => NearestMatch::none(),
    }
}

/// Longest side of the minimum rotated rectangle of a single polygon,
/// endpoints ordered left to right
pub fn orientation_line(shape: &Shape) -> Option<Line<f64>> {
    let Shape::Polygon(polygon) = shape else {
        return None;
    };
    let rect = polygon.minimum_rotated_rect()?;
    longest_side(&rect)
}

fn longest_side(rect: &Polygon<f64>) -> Option<Line<f64>> {
    let side = rect
        .exterior()
        .lines()
        .max_by(|a, b| {
            a.length::<Euclidean>()
                .partial_cmp(&b.length::<Euclidean>())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let (start, end) = if (side.start.x, side.start.y) <= (side.end.x, side.end.y) {
        (side.start, side.end)
    } else {
        (side.end, side.start)
    };
    Some(Line::new(start, end))
}

/// Angle in degrees of [`orientation_line`], 0 when undefined
pub fn shape_orientation(shape: &Shape) -> f64 {
    orientation_line(shape)
        .map(|line| line.dy().atan2(line.dx()).to_degrees())
        .unwrap_or(0.0)
}

/// Descriptive measurements of one shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeProperties {
    pub interior_point: Option<[f64; 2]>,
    pub area: f64,
    /// Total length of all rings, holes included
    pub perimeter: f64,
    pub components: usize,
    /// Closed ring
    pub min_rotated_rect: Option<Vec<[f64; 2]>>,
    pub orientation_line: Option<[[f64; 2]; 2]>,
    /// Degrees
    pub orientation: f64,
}

pub fn properties(shape: &Shape) -> ShapeProperties {
    let multi = shape.to_multi();
    let perimeter = multi
        .0
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .map(|ring| ring.length::<Euclidean>())
        .sum();
    let pair = |c: Coord<f64>| [c.x, c.y];

    ShapeProperties {
        interior_point: multi.interior_point().map(|p| [p.x(), p.y()]),
        area: multi.unsigned_area(),
        perimeter,
        components: shape.component_count(),
        min_rotated_rect: multi
            .minimum_rotated_rect()
            .map(|rect| rect.exterior().coords().copied().map(pair).collect()),
        orientation_line: orientation_line(shape).map(|line| [pair(line.start), pair(line.end)]),
        orientation: shape_orientation(shape),
    }
}
