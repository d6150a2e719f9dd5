//! Spatial-Index (KD-Tree) für Proximity-Abfragen auf Nodes und Kanten-Ankern.

use glam::Vec2;
use kiddo::{KdTree, SquaredEuclidean};

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// ID der gefundenen Entity
    pub id: u64,
    /// Indexierter Punkt
    pub position: Vec2,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f32,
}

/// Read-only Spatial-Index über (ID, Punkt)-Paaren.
///
/// Eine ID darf mehrfach vorkommen (Kanten liefern Start, Gelenk und Ende).
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    entries: Vec<(u64, Vec2)>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl SpatialIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            entries: Vec::new(),
        }
    }

    /// Baut einen neuen Index aus den übergebenen Punkten.
    pub fn from_points(points: impl IntoIterator<Item = (u64, Vec2)>) -> Self {
        let entries: Vec<(u64, Vec2)> = points.into_iter().collect();
        let coords: Vec<[f64; 2]> = entries
            .iter()
            .map(|(_, p)| [p.x as f64, p.y as f64])
            .collect();
        let tree: KdTree<f64, 2> = (&coords).into();

        Self { tree, entries }
    }

    /// Gibt die Anzahl indexierter Punkte zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Punkte im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn to_match(&self, item: u64, distance_sq: f64) -> Option<SpatialMatch> {
        let (id, position) = *self.entries.get(item as usize)?;
        Some(SpatialMatch {
            id,
            position,
            distance: (distance_sq as f32).sqrt(),
        })
    }

    /// Findet den nächsten Punkt zur gegebenen Position.
    pub fn nearest(&self, query: Vec2) -> Option<SpatialMatch> {
        if self.is_empty() {
            return None;
        }

        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x as f64, query.y as f64]);
        self.to_match(result.item, result.distance)
    }

    /// Findet alle Punkte innerhalb eines Radius, nach Distanz sortiert.
    pub fn within_radius(&self, query: Vec2, radius: f32) -> Vec<SpatialMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&[query.x as f64, query.y as f64], (radius * radius) as f64)
            .into_iter()
            .filter_map(|entry| self.to_match(entry.item, entry.distance))
            .collect::<Vec<_>>();

        // Gleichstand über die ID auflösen, damit die Reihenfolge deterministisch ist
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        results
    }

    /// Findet alle IDs, deren Punkt im axis-aligned Rechteck liegt.
    ///
    /// KD-Tree-Kreisabfrage um das Rechteck mit exakter Nachfilterung.
    pub fn within_rect(&self, min: Vec2, max: Vec2) -> Vec<u64> {
        if self.is_empty() {
            return Vec::new();
        }

        let center_x = (min.x + max.x) as f64 * 0.5;
        let center_y = (min.y + max.y) as f64 * 0.5;
        let half_w = (max.x - min.x) as f64 * 0.5;
        let half_h = (max.y - min.y) as f64 * 0.5;
        let radius_sq = half_w * half_w + half_h * half_h;

        let mut ids: Vec<u64> = self
            .tree
            .within::<SquaredEuclidean>(&[center_x, center_y], radius_sq)
            .into_iter()
            .filter_map(|entry| {
                let (id, pos) = *self.entries.get(entry.item as usize)?;
                (pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y)
                    .then_some(id)
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> SpatialIndex {
        SpatialIndex::from_points([
            (1, Vec2::new(0.0, 0.0)),
            (2, Vec2::new(10.0, 0.0)),
            (3, Vec2::new(4.0, 3.0)),
        ])
    }

    #[test]
    fn nearest_returns_expected_entry() {
        let nearest = sample_index()
            .nearest(Vec2::new(3.9, 2.9))
            .expect("Treffer erwartet");

        assert_eq!(nearest.id, 3);
        assert_eq!(nearest.position, Vec2::new(4.0, 3.0));
        assert!(nearest.distance < 0.2);
    }

    #[test]
    fn radius_query_returns_sorted_matches() {
        let matches = sample_index().within_radius(Vec2::new(0.0, 0.0), 6.0);

        let ids: Vec<u64> = matches.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn rect_query_deduplicates_repeated_ids() {
        let index = SpatialIndex::from_points([
            (7, Vec2::new(1.0, 1.0)),
            (7, Vec2::new(2.0, 2.0)),
            (8, Vec2::new(50.0, 50.0)),
        ]);
        assert_eq!(index.within_rect(Vec2::ZERO, Vec2::new(5.0, 5.0)), vec![7]);
    }

    #[test]
    fn empty_index_has_no_entries() {
        let index = SpatialIndex::empty();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.nearest(Vec2::new(0.0, 0.0)).is_none());
        assert!(index.within_radius(Vec2::ZERO, 100.0).is_empty());
    }
}
