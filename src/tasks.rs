use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A named background task that runs a callback on a fixed interval until
/// cancelled or dropped. The callback returns `false` to stop on its own.
///
/// A plain thread with a stop channel keeps callers free of any async
/// runtime requirement.
pub struct RepeatingTask {
    name: String,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RepeatingTask {
    /// Spawns the task. The first tick lands one full `interval` after spawn.
    pub fn spawn<F>(name: &str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<()>();
        let interval = interval.max(Duration::from_millis(1));
        let handle = thread::Builder::new()
            .name(name.into())
            .spawn(move || run(&rx, interval, &mut tick))
            .ok();
        Self { name: name.to_string(), stop: Some(tx), handle }
    }

    /// Signals the task to stop and waits for the thread to finish.
    pub fn cancel(mut self) {
        self.cancel_inner();
    }

    fn cancel_inner(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("background task {} panicked", self.name);
            }
        }
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.cancel_inner();
    }
}

fn run<F: FnMut() -> bool>(rx: &Receiver<()>, interval: Duration, tick: &mut F) {
    loop {
        match rx.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                if !tick() {
                    break;
                }
            }
        }
    }
}
