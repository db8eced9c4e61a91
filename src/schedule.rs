use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Identifies one outstanding animation-frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FrameHandle(u64);

/// Identifies one registered resize listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ListenerId(u64);

/// Shared stop flag for a started component. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub(crate) struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub(crate) fn new() -> Self {
        Self::default()
    }
    pub(crate) fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub(crate) fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Single-threaded frame and event scheduler.
///
/// Frame requests are one-shot: a request made while frames are being
/// dispatched lands in the next batch, so a callback that requests its
/// successor never runs twice in the same tick. Every entry carries the
/// token of the component that registered it; once that token is
/// cancelled the entry is never handed out again.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    next_id: u64,
    frames: Vec<(FrameHandle, CancelToken)>,
    resize: Vec<(ListenerId, CancelToken)>,
}

impl Scheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn request_frame(&mut self, token: &CancelToken) -> FrameHandle {
        let h = FrameHandle(self.bump());
        self.frames.push((h, token.clone()));
        h
    }

    /// Drains the current batch of due frames, dropping cancelled ones.
    pub(crate) fn take_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.frames)
            .into_iter()
            .filter(|(_, t)| !t.is_cancelled())
            .map(|(h, _)| h)
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn pending_frames(&self) -> usize {
        self.frames.iter().filter(|(_, t)| !t.is_cancelled()).count()
    }

    pub(crate) fn add_resize_listener(&mut self, token: &CancelToken) -> ListenerId {
        let id = ListenerId(self.bump());
        self.resize.push((id, token.clone()));
        debug!(?id, "resize listener attached");
        id
    }

    /// Live listeners. Listeners whose token was cancelled are detached.
    pub(crate) fn resize_listeners(&mut self) -> Vec<ListenerId> {
        self.resize.retain(|(id, t)| {
            let live = !t.is_cancelled();
            if !live {
                debug!(?id, "resize listener detached");
            }
            live
        });
        self.resize.iter().map(|(id, _)| *id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_token_frame_is_never_dispatched() {
        let mut s = Scheduler::new();
        let gone = CancelToken::new();
        let live = CancelToken::new();
        s.request_frame(&gone);
        let b = s.request_frame(&live);
        gone.cancel();
        assert_eq!(s.pending_frames(), 1);
        assert_eq!(s.take_frames(), vec![b]);
        assert_eq!(s.pending_frames(), 0);
        assert!(s.take_frames().is_empty());
    }

    #[test]
    fn test_request_during_dispatch_lands_in_next_batch() {
        let mut s = Scheduler::new();
        let t = CancelToken::new();
        s.request_frame(&t);
        let batch = s.take_frames();
        assert_eq!(batch.len(), 1);
        let next = s.request_frame(&t);
        assert_eq!(s.take_frames(), vec![next]);
    }

    #[test]
    fn test_cancelled_listener_is_detached() {
        let mut s = Scheduler::new();
        let gone = CancelToken::new();
        let live = CancelToken::new();
        let a = s.add_resize_listener(&gone);
        let b = s.add_resize_listener(&live);
        assert_eq!(s.resize_listeners(), vec![a, b]);
        gone.cancel();
        assert_eq!(s.resize_listeners(), vec![b]);
        live.cancel();
        assert!(s.resize_listeners().is_empty());
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let t = CancelToken::new();
        let c = t.clone();
        assert!(!c.is_cancelled());
        t.cancel();
        assert!(c.is_cancelled());
    }
}
