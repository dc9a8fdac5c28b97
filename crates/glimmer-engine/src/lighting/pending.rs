/// Layer draws recorded between frames.
///
/// Generic over the recorder so the bookkeeping is testable without a device.
#[derive(Debug)]
pub(crate) struct PendingDraws<E> {
    recording: Option<E>,
}

impl<E> PendingDraws<E> {
    pub(crate) fn new() -> Self {
        Self { recording: None }
    }

    /// Recorder for the next draw, started on first use.
    pub(crate) fn record(&mut self, begin: impl FnOnce() -> E) -> &mut E {
        self.recording.get_or_insert_with(begin)
    }

    /// Drops everything recorded so far and starts over. Used by layer
    /// clears, which overwrite whatever earlier draws produced.
    pub(crate) fn restart(&mut self, begin: impl FnOnce() -> E) -> &mut E {
        self.recording.insert(begin())
    }

    pub(crate) fn take(&mut self) -> Option<E> {
        self.recording.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_accumulate_until_taken() {
        let mut pending = PendingDraws::new();
        assert!(pending.take().is_none());
        pending.record(Vec::new).push("sprite");
        pending.record(Vec::new).push("hud");
        assert_eq!(pending.take(), Some(vec!["sprite", "hud"]));
        assert!(pending.take().is_none());
    }

    #[test]
    fn clear_does_not_carry_earlier_draws() {
        let mut pending = PendingDraws::new();
        // A frame that was never rendered.
        pending.record(Vec::new).push("clear");
        pending.record(Vec::new).push("background");

        pending.restart(Vec::new).push("clear");
        pending.record(Vec::new).push("background");
        assert_eq!(pending.take(), Some(vec!["clear", "background"]));
    }

    #[test]
    fn skipped_frames_stay_bounded() {
        let mut pending = PendingDraws::new();
        for _ in 0..100 {
            pending.restart(Vec::new).push("clear");
            for _ in 0..3 {
                pending.record(Vec::new).push("blit");
            }
        }
        assert_eq!(pending.take().map(|draws| draws.len()), Some(4));
    }
}
