//! UI loop lifecycle: one-shot quit notification and full-stop confirmation

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

/// Callback run once when the UI requests exit, on the UI thread
pub type QuitListener = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct LoopState {
    listeners: Vec<QuitListener>,
    quit_fired: bool,
    stopped: bool,
}

#[derive(Default)]
struct Inner {
    state: Mutex<LoopState>,
    stopped: Condvar,
}

/// Shared handle to the UI loop lifecycle. Cheap to clone.
#[derive(Clone, Default)]
pub struct UiLoop {
    inner: Arc<Inner>,
}

impl UiLoop {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LoopState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a quit listener. Returns false (and drops the listener) if
    /// quit already fired.
    pub fn on_quit(&self, listener: QuitListener) -> bool {
        let mut state = self.lock();
        if state.quit_fired {
            warn!("Quit listener registered after quit fired, it will never run");
            return false;
        }
        state.listeners.push(listener);
        true
    }

    /// Fire the quit notification. Listeners run once, in registration
    /// order; later calls do nothing and return false.
    pub fn quit(&self) -> bool {
        let listeners = {
            let mut state = self.lock();
            if state.quit_fired {
                return false;
            }
            state.quit_fired = true;
            std::mem::take(&mut state.listeners)
        };

        debug!(listeners = listeners.len(), "Quit requested, notifying listeners");
        // Run outside the lock so listeners may query the loop
        for listener in listeners {
            listener();
        }
        true
    }

    pub fn has_quit(&self) -> bool {
        self.lock().quit_fired
    }

    /// Confirm the event loop has fully stopped
    pub fn mark_stopped(&self) {
        self.lock().stopped = true;
        self.inner.stopped.notify_all();
    }

    #[cfg(test)]
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Block until [`mark_stopped`](Self::mark_stopped) has been called
    pub fn await_quit(&self) {
        let mut state = self.lock();
        while !state.stopped {
            state = self
                .inner
                .stopped
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_quit_fires_listeners_once_in_order() {
        let ui_loop = UiLoop::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let order = order.clone();
            assert!(ui_loop.on_quit(Box::new(move || order.lock().unwrap().push(id))));
        }

        assert!(ui_loop.quit());
        assert!(!ui_loop.quit());
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert!(ui_loop.has_quit());
    }

    #[test]
    fn test_listener_after_quit_is_dropped() {
        let ui_loop = UiLoop::new();
        let calls = Arc::new(AtomicUsize::new(0));
        ui_loop.quit();

        let counter = calls.clone();
        assert!(!ui_loop.on_quit(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })));
        ui_loop.quit();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_can_query_loop() {
        let ui_loop = UiLoop::new();
        let handle = ui_loop.clone();
        let seen = Arc::new(Mutex::new(None));
        let seen_in_listener = seen.clone();

        ui_loop.on_quit(Box::new(move || {
            *seen_in_listener.lock().unwrap() = Some(handle.has_quit());
        }));
        ui_loop.quit();

        assert_eq!(*seen.lock().unwrap(), Some(true));
    }

    #[test]
    fn test_quit_is_not_stop() {
        let ui_loop = UiLoop::new();
        ui_loop.quit();

        assert!(!ui_loop.is_stopped());
    }

    #[test]
    fn test_await_quit_wakes_on_stop_from_other_thread() {
        let ui_loop = UiLoop::new();
        let remote = ui_loop.clone();

        let worker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.quit();
            remote.mark_stopped();
        });

        ui_loop.await_quit();
        assert!(ui_loop.is_stopped());
        assert!(ui_loop.has_quit());
        worker.join().unwrap();
    }
}
