use crate::error::{AnnotationError, Result};
use geo::{Area, BooleanOps, BoundingRect, Coord, LineString, MultiPolygon, Polygon, Rect};

/// Ring as delivered by the geometry collaborator: `[[x, y], ...]`
pub type RawRing = Vec<[f64; 2]>;

/// Areal geometry drawn for one region
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl Shape {
    /// Polygon from rings: the first is the shell, the rest are holes.
    /// Rings are closed automatically.
    pub fn from_rings(rings: &[RawRing]) -> Result<Self> {
        let (shell, holes) = rings
            .split_first()
            .ok_or_else(|| AnnotationError::MalformedGeometry("polygon has no rings".to_string()))?;

        let exterior = ring_to_line_string(shell)?;
        let interiors = holes
            .iter()
            .map(|ring| ring_to_line_string(ring))
            .collect::<Result<Vec<_>>>()?;

        Ok(Shape::Polygon(Polygon::new(exterior, interiors)))
    }

    /// Same geometry as a multipolygon
    pub fn to_multi(&self) -> MultiPolygon<f64> {
        match self {
            Shape::Polygon(polygon) => MultiPolygon::new(vec![polygon.clone()]),
            Shape::MultiPolygon(multi) => multi.clone(),
        }
    }

    /// Geometric union. A single-part result collapses to a polygon.
    pub fn union(&self, other: &Shape) -> Shape {
        Shape::from(self.to_multi().union(&other.to_multi()))
    }

    /// Number of polygon parts
    pub fn component_count(&self) -> usize {
        match self {
            Shape::Polygon(_) => 1,
            Shape::MultiPolygon(multi) => multi.0.len(),
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Shape::Polygon(polygon) => polygon.bounding_rect(),
            Shape::MultiPolygon(multi) => multi.bounding_rect(),
        }
    }

    /// Larger of bounding box width and height (0 for empty shapes)
    pub fn extent(&self) -> f64 {
        self.bounding_rect()
            .map(|rect| rect.width().max(rect.height()))
            .unwrap_or(0.0)
    }

    /// Rings per part, shell first, in collaborator layout
    pub fn rings(&self) -> Vec<Vec<RawRing>> {
        self.to_multi()
            .0
            .iter()
            .map(|polygon| {
                std::iter::once(polygon.exterior())
                    .chain(polygon.interiors())
                    .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
                    .collect()
            })
            .collect()
    }
}

impl From<Polygon<f64>> for Shape {
    fn from(polygon: Polygon<f64>) -> Self {
        Shape::Polygon(polygon)
    }
}

impl From<MultiPolygon<f64>> for Shape {
    fn from(mut multi: MultiPolygon<f64>) -> Self {
        if multi.0.len() == 1 {
            if let Some(polygon) = multi.0.pop() {
                return Shape::Polygon(polygon);
            }
        }
        Shape::MultiPolygon(multi)
    }
}

fn ring_to_line_string(ring: &[[f64; 2]]) -> Result<LineString<f64>> {
    if let Some(bad) = ring.iter().find(|[x, y]| !x.is_finite() || !y.is_finite()) {
        return Err(AnnotationError::MalformedGeometry(format!(
            "non-finite coordinate {:?}",
            bad
        )));
    }

    let mut coords: Vec<Coord<f64>> = ring.iter().map(|[x, y]| Coord { x: *x, y: *y }).collect();
    coords.dedup();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    if coords.len() < 3 {
        return Err(AnnotationError::MalformedGeometry(format!(
            "ring needs at least 3 distinct coordinates, got {}",
            coords.len()
        )));
    }

    let line = LineString::new(coords);
    if Polygon::new(line.clone(), vec![]).unsigned_area() <= 0.0 {
        return Err(AnnotationError::MalformedGeometry(
            "ring encloses no area".to_string(),
        ));
    }
    Ok(line)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Axis aligned rectangle as a shape
    pub(crate) fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        Shape::from_rings(&[vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]]).unwrap()
    }

    fn area(shape: &Shape) -> f64 {
        shape.to_multi().unsigned_area()
    }

    #[test]
    fn test_from_rings_with_hole() {
        let shape = Shape::from_rings(&[
            vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
            vec![[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 2.0]],
        ])
        .unwrap();

        assert!((area(&shape) - 15.0).abs() < 1e-9);
        assert_eq!(shape.component_count(), 1);
        let rings = shape.rings();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 2);
        // closed
        assert_eq!(rings[0][0].first(), rings[0][0].last());
    }

    #[test]
    fn test_from_rings_rejects_degenerate() {
        assert!(Shape::from_rings(&[]).is_err());
        assert!(Shape::from_rings(&[vec![[0.0, 0.0], [1.0, 1.0]]]).is_err());
        assert!(Shape::from_rings(&[vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]).is_err());
        assert!(Shape::from_rings(&[vec![[0.0, 0.0], [f64::NAN, 1.0], [1.0, 0.0]]]).is_err());
    }

    #[test]
    fn test_from_rings_rejects_collinear() {
        let err = Shape::from_rings(&[vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]]).unwrap_err();
        assert!(matches!(err, AnnotationError::MalformedGeometry(_)));

        let flat_hole = Shape::from_rings(&[
            vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]],
            vec![[1.0, 1.0], [2.0, 1.0], [3.0, 1.0]],
        ]);
        assert!(flat_hole.is_err());
    }

    #[test]
    fn test_union_overlapping_collapses_to_polygon() {
        let merged = rect(0.0, 0.0, 2.0, 2.0).union(&rect(1.0, 0.0, 3.0, 2.0));
        assert!(matches!(merged, Shape::Polygon(_)));
        assert!((area(&merged) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_disjoint_is_multi() {
        let merged = rect(0.0, 0.0, 1.0, 1.0).union(&rect(5.0, 5.0, 6.0, 6.0));
        assert_eq!(merged.component_count(), 2);
        assert!((area(&merged) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_of_slanted_polygons() {
        let left = Shape::from_rings(&[vec![[1.85, 4.55], [1.48, 6.37], [0.0, 4.55], [0.0, 0.0]]])
            .unwrap();
        let right = Shape::from_rings(&[vec![
            [1.48, 0.0],
            [2.59, 0.91],
            [1.48, 6.37],
            [1.11, 6.37],
            [0.37, 0.91],
        ]])
        .unwrap();

        let merged = left.union(&right);
        let largest = area(&left).max(area(&right));
        assert!(area(&merged) + 1e-9 >= largest);
        assert!(area(&merged) <= area(&left) + area(&right) + 1e-9);
        assert!(merged.component_count() >= 1);
    }

    #[test]
    fn test_extent() {
        assert_eq!(rect(0.0, 0.0, 4.0, 1.0).extent(), 4.0);
        assert_eq!(Shape::MultiPolygon(MultiPolygon::new(vec![])).extent(), 0.0);
    }
}
