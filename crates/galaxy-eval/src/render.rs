//! Pixel-set pictures produced by `draw` and `multipledraw`.
//!
//! Pictures are opaque to the evaluator. External renderers consume them
//! as JSON or as the ASCII form used in logs.

use crate::error::EvalResult;
use crate::graph::{Graph, NodeId};
use galaxy_types::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of lit pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub points: BTreeSet<Point>,
}

impl Picture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.points.contains(&point)
    }

    /// Add every point of `other` to this picture.
    pub fn union_with(&mut self, other: &Picture) {
        self.points.extend(other.points.iter().copied());
    }

    /// Row-major `#`/`.` grid over the bounding box, one line per row.
    pub fn to_ascii(&self) -> String {
        if self.points.is_empty() {
            return String::new();
        }
        let xs = self.points.iter().map(|p| p.x);
        let (min_x, max_x) = (xs.clone().min().unwrap_or(0), xs.max().unwrap_or(0));
        let ys = self.points.iter().map(|p| p.y);
        let (min_y, max_y) = (ys.clone().min().unwrap_or(0), ys.max().unwrap_or(0));

        let mut out = String::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                out.push(if self.contains(Point::new(x, y)) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

impl FromIterator<Point> for Picture {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Force a list of `(x, y)` integer pairs into a picture.
pub fn draw(graph: &mut Graph, points: NodeId) -> EvalResult<Picture> {
    let mut picture = Picture::new();
    for item in graph.force_list(points)? {
        let (x, y) = graph.force_pair(item)?;
        let point = Point::new(graph.force_int(x)?, graph.force_int(y)?);
        picture.points.insert(point);
    }
    Ok(picture)
}

/// Force a list of point lists into one picture each.
///
/// With more than one picture, a final picture holding the union of all
/// points is appended.
pub fn multiple_draw(graph: &mut Graph, lists: NodeId) -> EvalResult<Vec<Picture>> {
    let mut pictures = Vec::new();
    let mut union = Picture::new();
    for list in graph.force_list(lists)? {
        let picture = draw(graph, list)?;
        union.union_with(&picture);
        pictures.push(picture);
    }
    if pictures.len() > 1 {
        pictures.push(union);
    }
    Ok(pictures)
}
