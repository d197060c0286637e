use crate::models::{Geometry, GeometryExt, Position};
use rstar::{RTree, RTreeObject, AABB};

/// Envelope of one indexed feature
#[derive(Debug, Clone, PartialEq)]
struct IndexedEnvelope {
    /// Position of the feature in its source collection
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over feature bounding boxes, refined by exact containment.
///
/// Feature order is paint order: when several features contain a position, the one
/// with the highest index (painted last) is the topmost.
#[derive(Debug)]
pub struct PickIndex {
    tree: RTree<IndexedEnvelope>,
    geometries: Vec<Geometry>,
}

impl PickIndex {
    /// Build an index over geometries in paint order
    pub fn build<'a, I>(geometries: I) -> Self
    where
        I: IntoIterator<Item = &'a Geometry>,
    {
        let geometries: Vec<Geometry> = geometries.into_iter().cloned().collect();

        // Features without a bounding box can never be hit
        let envelopes: Vec<IndexedEnvelope> = geometries
            .iter()
            .enumerate()
            .filter_map(|(index, geometry)| {
                geometry.bounds().map(|b| IndexedEnvelope {
                    index,
                    envelope: AABB::from_corners([b[0], b[1]], [b[2], b[3]]),
                })
            })
            .collect();

        Self { tree: RTree::bulk_load(envelopes), geometries }
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Indices of all features containing `position`, in ascending paint order
    pub fn hits_at(&self, position: Position) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&AABB::from_point(position))
            .map(|candidate| candidate.index)
            .filter(|&index| self.geometries[index].contains_position(position))
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Topmost feature containing `position`
    pub fn topmost_at(&self, position: Position) -> Option<usize> {
        self.hits_at(position).last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Geometry::polygon(vec![vec![
            [x, y],
            [x + size, y],
            [x + size, y + size],
            [x, y + size],
            [x, y],
        ]])
    }

    #[test]
    fn test_empty_index() {
        let index = PickIndex::build(std::iter::empty());
        assert!(index.is_empty());
        assert_eq!(index.topmost_at([0.0, 0.0]), None);
    }

    #[test]
    fn test_overlap_prefers_later_feature() {
        let geometries = vec![square(0.0, 0.0, 4.0), square(1.0, 1.0, 2.0), square(10.0, 10.0, 1.0)];
        let index = PickIndex::build(&geometries);

        assert_eq!(index.len(), 3);
        assert_eq!(index.hits_at([2.0, 2.0]), vec![0, 1]);
        assert_eq!(index.topmost_at([2.0, 2.0]), Some(1));
        assert_eq!(index.topmost_at([0.5, 0.5]), Some(0));
        assert_eq!(index.topmost_at([10.5, 10.5]), Some(2));
        assert_eq!(index.topmost_at([7.0, 7.0]), None);
    }

    #[test]
    fn test_envelope_hit_is_refined_by_shape() {
        // Triangle whose bounding box covers (0.9, 0.1) but whose area does not
        let triangle =
            Geometry::polygon(vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]]);
        let index = PickIndex::build([&triangle]);

        assert_eq!(index.topmost_at([0.1, 0.9]), Some(0));
        assert_eq!(index.topmost_at([0.9, 0.1]), None);
    }
}
