use std::sync::{Mutex, MutexGuard, PoisonError};

use event_emitter_rs::EventEmitter;

/// Event broadcast after every insert, save, and delete. Carries no payload;
/// listeners re-fetch what they need.
pub const CONTEXT_DID_CHANGE: &str = "ModelContextDidChange";

/// Fire-and-forget change broadcasts.
///
/// `EventEmitter` runs each listener on its own thread, so the writer never
/// waits on observers.
pub(crate) struct ChangeNotifier {
    emitter: Mutex<EventEmitter>,
}

impl ChangeNotifier {
    pub(crate) fn new() -> Self {
        Self {
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    fn emitter(&self) -> MutexGuard<'_, EventEmitter> {
        self.emitter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener. Returns its id.
    pub(crate) fn subscribe<F>(&self, listener: F) -> String
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.emitter()
            .on(CONTEXT_DID_CHANGE, move |_: ()| listener())
    }

    pub(crate) fn unsubscribe(&self, listener_id: &str) -> bool {
        self.emitter().remove_listener(listener_id).is_some()
    }

    pub(crate) fn notify(&self) {
        // Listener threads are detached.
        let _ = self.emitter().emit(CONTEXT_DID_CHANGE, ());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait_for(counter: &AtomicUsize, expected: usize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if counter.load(Ordering::SeqCst) >= expected {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn notify_reaches_listener() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        notifier.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        notifier.notify();
        notifier.notify();
        assert!(wait_for(&calls, 2));
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = notifier.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(notifier.unsubscribe(&id));
        assert!(!notifier.unsubscribe(&id));
        notifier.notify();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn notify_without_listeners_is_fine() {
        ChangeNotifier::new().notify();
    }
}
