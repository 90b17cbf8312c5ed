//! Recorded pointer input, replayable into a [`Session`].
//!
//! The wire format is a JSON array of events:
//!
//! ```json
//! [
//!   {"kind": "down", "x": 10, "y": 20, "t": 0},
//!   {"kind": "move", "x": 30, "y": 25, "t": 16},
//!   {"kind": "up"}
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PaintError;
use crate::math::Point;
use crate::rand::Random;
use crate::session::Session;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { x: i32, y: i32, t: i64 },
    Move { x: i32, y: i32, t: i64 },
    Up,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerScript(pub Vec<PointerEvent>);

#[derive(Debug, Default, PartialEq)]
pub struct ReplayReport {
    /// Draw commands applied across all moves.
    pub commands: usize,
    /// Events that were rejected, with their index in the script.
    pub rejected: Vec<(usize, PaintError)>,
}

impl PointerScript {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Feeds every event to `session` in order. A rejected event is recorded and skipped; it
    /// never stops the replay.
    pub fn replay<R: Random>(&self, session: &mut Session<R>) -> ReplayReport {
        let mut report = ReplayReport::default();
        for (index, event) in self.0.iter().enumerate() {
            match *event {
                PointerEvent::Down { x, y, t } => session.on_pointer_down(Point::new(x, y), t),
                PointerEvent::Move { x, y, t } => match session.on_pointer_move(Point::new(x, y), t)
                {
                    Ok(n) => report.commands += n,
                    Err(e) => {
                        tracing::warn!(index, error = %e, "rejected pointer event");
                        report.rejected.push((index, e));
                    }
                },
                PointerEvent::Up => session.on_pointer_up(),
            }
        }
        report
    }
}
