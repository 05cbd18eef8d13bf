use draw::{PointerEvent, ScreenPoint};
use features::Feature;
use foundation::time::Time;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use session::{COMMIT_DELAY_MS, DrawSession, InputEvent, SessionError, SessionOptions};
use tracing::debug;

use crate::host::JsonHost;
use crate::map::{Projection, ReplayMap};

/// One scripted input. Pointer positions are in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    SetMode {
        mode: String,
    },
    PointerDown {
        at: [f64; 2],
        #[serde(default)]
        shift: bool,
    },
    PointerMove {
        at: [f64; 2],
    },
    PointerUp {
        at: [f64; 2],
        #[serde(default)]
        shift: bool,
    },
    /// Press and release at the same spot.
    Click {
        at: [f64; 2],
        #[serde(default)]
        shift: bool,
    },
    KeyDown {
        key: String,
    },
    KeyUp {
        key: String,
    },
    /// Key press and release.
    Key {
        key: String,
    },
    /// Advance the session clock.
    Tick {
        ms: u64,
    },
    /// Replace the host's committed shapes.
    Sync {
        features: Vec<Feature>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub projection: Projection,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// What a replay produced: host callbacks in order, sync faults, and the
/// session state after the last step.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub calls: Vec<Value>,
    pub errors: Vec<String>,
    pub state: Value,
}

struct Replay {
    session: DrawSession<JsonHost, ReplayMap>,
    clock_ms: u64,
}

impl Replay {
    fn pointer(&self, at: [f64; 2], shift: bool) -> PointerEvent {
        let point = ScreenPoint::new(at[0], at[1]);
        let mut event = PointerEvent::new(self.session.map().projection().to_lng_lat(point), point);
        event.shift_key = shift;
        event
    }

    fn step(&mut self, step: Step) {
        match step {
            Step::SetMode { mode } => self.session.set_draw_mode(&mode),
            Step::PointerDown { at, shift } => {
                let e = self.pointer(at, shift);
                self.session.handle(InputEvent::PointerDown(e));
            }
            Step::PointerMove { at } => {
                let e = self.pointer(at, false);
                self.session.handle(InputEvent::PointerMove(e));
            }
            Step::PointerUp { at, shift } => {
                let e = self.pointer(at, shift);
                self.session.handle(InputEvent::PointerUp(e));
            }
            Step::Click { at, shift } => {
                let e = self.pointer(at, shift);
                self.session.handle(InputEvent::PointerDown(e.clone()));
                self.session.handle(InputEvent::PointerUp(e));
            }
            Step::KeyDown { key } => self.session.handle(InputEvent::KeyDown(key)),
            Step::KeyUp { key } => self.session.handle(InputEvent::KeyUp(key)),
            Step::Key { key } => {
                self.session.handle(InputEvent::KeyDown(key.clone()));
                self.session.handle(InputEvent::KeyUp(key));
            }
            Step::Tick { ms } => self.tick(ms),
            Step::Sync { features } => self.session.sync_draws(&features),
        }
    }

    fn tick(&mut self, ms: u64) {
        self.clock_ms = self.clock_ms.saturating_add(ms);
        self.session.advance(Time::from_millis(self.clock_ms));
    }

    fn state(&self) -> Value {
        let s = self.session.state();
        json!({
            "mode": s.mode,
            "drawMode": s.draw_mode,
            "isDrawing": s.is_drawing,
            "polygonClicks": s.polygon_clicks,
            "isHoveringOverVertex": s.is_hovering_over_vertex,
            "label": s.label,
            "features": self.session.features().len(),
        })
    }
}

/// Runs `script` against a fresh session. Commits still pending after the
/// last step are flushed.
pub fn run_replay(script: &Script, options: &SessionOptions) -> Result<ReplayOutcome, SessionError> {
    let session = DrawSession::attach(ReplayMap::new(script.projection), JsonHost::new(), options)?;
    let mut replay = Replay {
        session,
        clock_ms: 0,
    };
    for (index, step) in script.steps.iter().enumerate() {
        debug!(index, ?step, "replay step");
        replay.step(step.clone());
    }
    if replay.session.pending_commits() > 0 {
        replay.tick(COMMIT_DELAY_MS);
    }

    let state = replay.state();
    let errors = replay.session.errors().iter().map(ToString::to_string).collect();
    let (_, host) = replay.session.detach();
    Ok(ReplayOutcome {
        calls: host.into_records(),
        errors,
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::{Script, Step, run_replay};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use session::SessionOptions;

    fn script(steps: serde_json::Value) -> Script {
        serde_json::from_value(json!({ "steps": steps })).expect("script")
    }

    #[test]
    fn steps_parse_from_tagged_json() {
        let s = script(json!([
            {"step": "set_mode", "mode": "draw_polygon"},
            {"step": "click", "at": [1, 2]},
            {"step": "tick", "ms": 10}
        ]));
        assert_eq!(
            s.steps,
            vec![
                Step::SetMode {
                    mode: "draw_polygon".into()
                },
                Step::Click {
                    at: [1.0, 2.0],
                    shift: false
                },
                Step::Tick { ms: 10 },
            ]
        );
        assert_eq!(s.projection.degrees_per_pixel, 1e-4);
    }

    #[test]
    fn polygon_replay_commits_through_the_host() {
        let s = script(json!([
            {"step": "set_mode", "mode": "draw_polygon"},
            {"step": "click", "at": [0, 0]},
            {"step": "click", "at": [100, 0]},
            {"step": "click", "at": [100, 100]},
            {"step": "click", "at": [0, 0]}
        ]));
        let outcome = run_replay(&s, &SessionOptions::default()).expect("replay");
        let calls: Vec<_> = outcome.calls.iter().map(|c| c["call"].clone()).collect();
        assert_eq!(calls, vec![json!("addFeature")]);
        assert_eq!(outcome.calls[0]["feature"]["properties"], json!({"type": 4}));
        assert_eq!(outcome.state["drawMode"], json!("simple_select"));
        assert_eq!(outcome.state["features"], json!(1));
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn oversized_rectangle_is_reported() {
        let s = script(json!([
            {"step": "set_mode", "mode": "draw_rectangle"},
            {"step": "pointer_down", "at": [0, 0]},
            {"step": "pointer_move", "at": [400, 400]},
            {"step": "pointer_up", "at": [400, 400]},
            {"step": "tick", "ms": 50}
        ]));
        let options = SessionOptions::from_json_str(r#"{"areaSize": 100}"#).expect("options");
        let outcome = run_replay(&s, &options).expect("replay");
        assert_eq!(outcome.calls.len(), 1);
        assert_eq!(outcome.calls[0]["call"], json!("errorModal"));
        assert_eq!(outcome.calls[0]["tooBig"], json!(true));
        assert_eq!(outcome.state["features"], json!(0));
    }
}
