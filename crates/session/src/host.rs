use draw::DrawTool;
use features::{Feature, FeatureId};
use policy::PolicyReport;

/// Why candidate features were turned away; one flag per failed check.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub has_kinks: bool,
    pub too_big: bool,
    pub is_outside: bool,
    /// Only reported for edits, and for creations that carry no coordinates.
    pub has_no_coords: Option<bool>,
    pub features: Vec<Feature>,
}

impl Rejection {
    pub fn new(report: &PolicyReport, features: Vec<Feature>) -> Self {
        Self {
            has_kinks: report.has_kinks,
            too_big: report.too_big,
            is_outside: report.is_outside,
            has_no_coords: report.has_no_coords,
            features,
        }
    }
}

/// The application's feature store, driven synchronously by the session.
pub trait FeatureHost {
    fn add_feature(&mut self, feature: &Feature);
    fn remove_feature(&mut self, feature: &Feature);
    fn update_feature(&mut self, feature: &Feature);
    fn error_modal(&mut self, tool: &DrawTool, rejection: &Rejection);
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Add(Feature),
    Remove(Feature),
    Update(Feature),
    Error(Rejection),
}

/// Host that keeps every call in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn added(&self) -> Vec<&Feature> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Add(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    pub fn removed_ids(&self) -> Vec<FeatureId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Remove(f) => f.id.clone(),
                _ => None,
            })
            .collect()
    }

    pub fn updated(&self) -> Vec<&Feature> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Update(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    pub fn rejections(&self) -> Vec<&Rejection> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Error(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl FeatureHost for RecordingHost {
    fn add_feature(&mut self, feature: &Feature) {
        self.calls.push(HostCall::Add(feature.clone()));
    }

    fn remove_feature(&mut self, feature: &Feature) {
        self.calls.push(HostCall::Remove(feature.clone()));
    }

    fn update_feature(&mut self, feature: &Feature) {
        self.calls.push(HostCall::Update(feature.clone()));
    }

    fn error_modal(&mut self, _tool: &DrawTool, rejection: &Rejection) {
        self.calls.push(HostCall::Error(rejection.clone()));
    }
}
