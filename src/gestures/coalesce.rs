// Frame coalescing for pointer moves.
//
// Hosts deliver pointer moves faster than they render. Move handling is
// admitted at most once per rendering tick; intermediate positions inside
// a tick are dropped. Release positions bypass the gate entirely so the
// final pointer-up is always processed exactly once.

/// Gate admitting one move computation per tick. Ticks are host-supplied
/// and non-decreasing (frame counter, vsync counter, coarse timestamp).
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCoalescer {
    last_tick: Option<u64>,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self { last_tick: None }
    }

    /// True when a move may be processed in this tick
    pub fn admit_move(&mut self, tick: u64) -> bool {
        if self.last_tick == Some(tick) {
            return false;
        }
        self.last_tick = Some(tick);
        true
    }

    /// Forget the last tick, e.g. when a gesture ends
    pub fn reset(&mut self) {
        self.last_tick = None;
    }
}
