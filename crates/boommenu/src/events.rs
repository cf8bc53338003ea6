use serde::Serialize;

/// Which axes a drag actually moved the cluster along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Moved {
    pub x: bool,
    pub y: bool,
}

impl Moved {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Gesture outcomes queued for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ItemEvent {
    Click {
        index: usize,
        x: f64,
        y: f64,
    },
    Translate {
        index: usize,
        dx: f64,
        dy: f64,
        moved: Moved,
    },
}
