use features::{Feature, FeatureId};

use crate::feature::DrawFeature;
use crate::path::CoordPath;

/// Features under edit plus the current selection.
///
/// Ordering contract:
/// - Features iterate in insertion order; replacing a feature keeps its slot.
/// - Selected ids iterate in the order they were selected.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<DrawFeature>,
    selected: Vec<FeatureId>,
    selected_coordinates: Vec<CoordPath>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawFeature> + '_ {
        self.features.iter()
    }

    pub fn ids(&self) -> Vec<FeatureId> {
        self.features.iter().map(|f| f.id.clone()).collect()
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &FeatureId) -> Option<&DrawFeature> {
        self.features.iter().find(|f| &f.id == id)
    }

    pub fn get_mut(&mut self, id: &FeatureId) -> Option<&mut DrawFeature> {
        self.features.iter_mut().find(|f| &f.id == id)
    }

    /// Inserts or replaces by id. Returns the id.
    pub fn add(&mut self, feature: DrawFeature) -> FeatureId {
        let id = feature.id.clone();
        match self.get_mut(&id) {
            Some(slot) => *slot = feature,
            None => self.features.push(feature),
        }
        id
    }

    /// Removes the given features and drops them from the selection.
    /// Returns what was removed, in store order.
    pub fn delete(&mut self, ids: &[FeatureId]) -> Vec<DrawFeature> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.features)
            .into_iter()
            .partition(|f| ids.contains(&f.id));
        self.features = kept;
        let before = self.selected.len();
        self.selected.retain(|id| !ids.contains(id));
        if self.selected.len() != before {
            self.selected_coordinates.clear();
        }
        removed
    }

    pub fn clear(&mut self) -> Vec<DrawFeature> {
        self.selected.clear();
        self.selected_coordinates.clear();
        std::mem::take(&mut self.features)
    }

    pub fn to_features(&self) -> Vec<Feature> {
        self.features.iter().map(DrawFeature::to_feature).collect()
    }

    pub fn selected_ids(&self) -> &[FeatureId] {
        &self.selected
    }

    pub fn is_selected(&self, id: &FeatureId) -> bool {
        self.selected.contains(id)
    }

    /// Returns `true` if the selection changed.
    pub fn select(&mut self, id: FeatureId) -> bool {
        if self.selected.contains(&id) || !self.contains(&id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    /// Returns `true` if the selection changed.
    pub fn deselect(&mut self, id: &FeatureId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| s != id);
        before != self.selected.len()
    }

    /// Replaces the selection; ids not in the store are skipped.
    pub fn set_selected(&mut self, ids: &[FeatureId]) {
        self.selected.clear();
        for id in ids {
            self.select(id.clone());
        }
    }

    pub fn clear_selected(&mut self) {
        self.selected.clear();
    }

    pub fn selected_features(&self) -> Vec<Feature> {
        self.selected
            .iter()
            .filter_map(|id| self.get(id))
            .map(DrawFeature::to_feature)
            .collect()
    }

    pub fn selected_coordinates(&self) -> &[CoordPath] {
        &self.selected_coordinates
    }

    pub fn select_coordinate(&mut self, path: CoordPath) -> bool {
        if self.selected_coordinates.contains(&path) {
            return false;
        }
        self.selected_coordinates.push(path);
        true
    }

    pub fn deselect_coordinate(&mut self, path: &CoordPath) -> bool {
        let before = self.selected_coordinates.len();
        self.selected_coordinates.retain(|p| p != path);
        before != self.selected_coordinates.len()
    }

    pub fn clear_selected_coordinates(&mut self) {
        self.selected_coordinates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureStore;
    use crate::feature::DrawFeature;
    use features::{Feature, FeatureId, Geometry};
    use pretty_assertions::assert_eq;

    fn point(id: &str, x: f64) -> DrawFeature {
        DrawFeature::from_feature(Feature::new(Geometry::Point([x, 0.0])).with_id(id))
    }

    #[test]
    fn replace_keeps_slot() {
        let mut s = FeatureStore::new();
        s.add(point("a", 0.0));
        s.add(point("b", 1.0));
        s.add(point("a", 5.0));
        assert_eq!(s.ids(), vec![FeatureId::from("a"), FeatureId::from("b")]);
        assert_eq!(
            s.get(&FeatureId::from("a")).map(|f| f.to_feature().geometry),
            Some(Geometry::Point([5.0, 0.0]))
        );
    }

    #[test]
    fn selection_is_ordered_and_only_tracks_known_ids() {
        let mut s = FeatureStore::new();
        s.add(point("a", 0.0));
        s.add(point("b", 1.0));
        assert!(s.select(FeatureId::from("b")));
        assert!(s.select(FeatureId::from("a")));
        assert!(!s.select(FeatureId::from("a")));
        assert!(!s.select(FeatureId::from("zzz")));
        assert_eq!(s.selected_ids(), &[FeatureId::from("b"), FeatureId::from("a")]);
    }

    #[test]
    fn delete_drops_selection() {
        let mut s = FeatureStore::new();
        s.add(point("a", 0.0));
        s.add(point("b", 1.0));
        s.set_selected(&[FeatureId::from("a"), FeatureId::from("b")]);
        let removed = s.delete(&[FeatureId::from("a")]);
        assert_eq!(removed.len(), 1);
        assert_eq!(s.selected_ids(), &[FeatureId::from("b")]);
        assert_eq!(s.len(), 1);
    }
}
