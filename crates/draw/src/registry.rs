use std::collections::BTreeMap;

use crate::constants::modes;
use crate::mode::DrawMode;
use crate::modes::{
    CircleMode, DirectSelectMode, DrawPolygonMode, PolygonMode, RectangleDragMode,
    SimpleSelectMode,
};

pub type ModeFactory = fn() -> Box<dyn DrawMode>;

fn simple_select() -> Box<dyn DrawMode> {
    Box::new(SimpleSelectMode::default())
}

fn direct_select() -> Box<dyn DrawMode> {
    Box::new(DirectSelectMode::default())
}

fn draw_polygon() -> Box<dyn DrawMode> {
    Box::new(DrawPolygonMode::default())
}

fn circle() -> Box<dyn DrawMode> {
    Box::new(CircleMode::default())
}

fn rectangle_drag() -> Box<dyn DrawMode> {
    Box::new(RectangleDragMode::default())
}

fn polygon() -> Box<dyn DrawMode> {
    Box::new(PolygonMode::default())
}

/// The drawing adapters shipped on top of the stock modes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Circle,
    RectangleDrag,
    Polygon,
}

impl AdapterKind {
    pub const ALL: [AdapterKind; 3] = [AdapterKind::Circle, AdapterKind::RectangleDrag, AdapterKind::Polygon];

    /// Name the adapter is registered under. The polygon adapter replaces
    /// the stock `draw_polygon`.
    pub fn mode_name(self) -> &'static str {
        match self {
            AdapterKind::Circle => modes::DRAW_CIRCLE,
            AdapterKind::RectangleDrag => modes::DRAW_RECTANGLE,
            AdapterKind::Polygon => modes::DRAW_POLYGON,
        }
    }

    pub fn factory(self) -> ModeFactory {
        match self {
            AdapterKind::Circle => circle,
            AdapterKind::RectangleDrag => rectangle_drag,
            AdapterKind::Polygon => polygon,
        }
    }

    pub fn instantiate(self) -> Box<dyn DrawMode> {
        (self.factory())()
    }
}

/// Mode name to constructor.
#[derive(Clone, Default)]
pub struct ModeRegistry {
    factories: BTreeMap<String, ModeFactory>,
}

impl std::fmt::Debug for ModeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeRegistry")
            .field("modes", &self.names())
            .finish()
    }
}

impl ModeRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `simple_select`, `direct_select` and `draw_polygon`.
    pub fn stock() -> Self {
        let mut registry = Self::empty();
        registry.register(modes::SIMPLE_SELECT, simple_select);
        registry.register(modes::DIRECT_SELECT, direct_select);
        registry.register(modes::DRAW_POLYGON, draw_polygon);
        registry
    }

    /// Stock modes with every adapter installed.
    pub fn with_adapters() -> Self {
        let mut registry = Self::stock();
        for kind in AdapterKind::ALL {
            registry.install(kind);
        }
        registry
    }

    /// Returns the factory previously registered under `name`, if any.
    pub fn register(&mut self, name: impl Into<String>, factory: ModeFactory) -> Option<ModeFactory> {
        self.factories.insert(name.into(), factory)
    }

    pub fn install(&mut self, kind: AdapterKind) {
        self.register(kind.mode_name(), kind.factory());
    }

    pub fn get(&self, name: &str) -> Option<ModeFactory> {
        self.factories.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}
