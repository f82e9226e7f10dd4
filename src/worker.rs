//! Dedicated lighting thread
//!
//! The firmware call can block indefinitely, so callers that need to stay
//! responsive run operations here and wait with a timeout. A worker that
//! misses a deadline is abandoned: it is never joined and accepts no more jobs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::lighting::KeyboardLighting;
use crate::transport::PlatformCall;

type Job<P> = Box<dyn FnOnce(&mut KeyboardLighting<P>) + Send>;

enum Message<P> {
    Run(Job<P>),
    Shutdown,
}

/// Owns a [`KeyboardLighting`] service on its own thread
pub struct LightingWorker<P> {
    tx: Sender<Message<P>>,
    thread: Option<JoinHandle<()>>,
    timeout: Option<Duration>,
    stalled: AtomicBool,
}

impl<P: PlatformCall + 'static> LightingWorker<P> {
    /// Start the worker thread and open the platform on it.
    ///
    /// `connect` runs on the worker thread, so the platform handle does not
    /// need to be `Send`. `timeout` bounds every wait, including the connect;
    /// `None` waits forever.
    pub fn spawn<F>(connect: F, timeout: Option<Duration>) -> Result<Self>
    where
        F: FnOnce() -> Result<P> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("lighting-worker".into())
            .spawn(move || match connect() {
                Ok(platform) => {
                    let _ = ready_tx.send(Ok(()));
                    worker_loop(KeyboardLighting::new(platform), rx);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })
            .map_err(|e| Error::Transport(format!("Failed to spawn lighting worker: {}", e)))?;

        let worker = Self {
            tx,
            thread: Some(thread),
            timeout,
            stalled: AtomicBool::new(false),
        };
        worker.wait(ready_rx)?;
        log::debug!("Lighting worker started");
        Ok(worker)
    }

    /// Run `job` on the worker thread and wait for its result
    pub fn call<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut KeyboardLighting<P>) -> Result<T> + Send + 'static,
    {
        if self.is_stalled() {
            return Err(Error::WorkerStopped);
        }

        let (reply_tx, reply_rx) = mpsc::channel();
        let job: Job<P> = Box::new(move |lighting| {
            let _ = reply_tx.send(job(lighting));
        });
        self.tx
            .send(Message::Run(job))
            .map_err(|_| Error::WorkerStopped)?;
        self.wait(reply_rx)
    }

    /// True once a call has timed out
    pub fn is_stalled(&self) -> bool {
        self.stalled.load(Ordering::SeqCst)
    }
}

impl<P> LightingWorker<P> {
    fn wait<T>(&self, rx: Receiver<Result<T>>) -> Result<T> {
        let Some(timeout) = self.timeout else {
            return rx.recv().map_err(|_| Error::WorkerStopped)?;
        };
        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("Lighting worker gave no reply within {:?}, abandoning it", timeout);
                self.stalled.store(true, Ordering::SeqCst);
                Err(Error::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(Error::WorkerStopped),
        }
    }
}

impl<P> Drop for LightingWorker<P> {
    fn drop(&mut self) {
        let _ = self.tx.send(Message::Shutdown);
        if self.stalled.load(Ordering::SeqCst) {
            // Still blocked in the platform call; leave it behind
            return;
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn worker_loop<P: PlatformCall>(mut lighting: KeyboardLighting<P>, rx: Receiver<Message<P>>) {
    for message in rx {
        match message {
            Message::Run(job) => job(&mut lighting),
            Message::Shutdown => break,
        }
    }
    log::debug!("Lighting worker shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ZoneColors};
    use crate::protocol::{CommandEnvelope, CommandReply};
    use crate::transport::fake::FakeDevice;

    /// Blocks every call until the gate sender is dropped
    struct Stuck {
        gate: Receiver<()>,
    }

    impl PlatformCall for Stuck {
        fn invoke(&mut self, _: &CommandEnvelope) -> Result<CommandReply> {
            let _ = self.gate.recv();
            Err(Error::Transport("released".into()))
        }
    }

    #[test]
    fn test_call_returns_result() {
        let worker = LightingWorker::spawn(|| Ok(FakeDevice::new()), None).unwrap();
        worker
            .call(|l| l.set_colors(&ZoneColors::uniform(Color::new(1, 2, 3))))
            .unwrap();
        let colors = worker.call(|l| l.colors()).unwrap();
        assert_eq!(colors, ZoneColors::uniform(Color::new(1, 2, 3)));
        assert!(!worker.is_stalled());
    }

    #[test]
    fn test_call_propagates_errors() {
        let worker =
            LightingWorker::spawn(|| Ok(FakeDevice::failing(4, 9)), Some(Duration::from_secs(5)))
                .unwrap();
        let err = worker.call(|l| l.is_lighting_on()).unwrap_err();
        assert!(matches!(err, Error::Protocol { status: 9 }));
        // A failed call doesn't stall the worker
        assert!(worker.call(|l| l.is_lighting_supported()).unwrap());
    }

    #[test]
    fn test_connect_error() {
        let result = LightingWorker::<FakeDevice>::spawn(
            || Err(Error::Transport("no management interface".into())),
            None,
        );
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[test]
    fn test_timeout_abandons_worker() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let worker = LightingWorker::spawn(
            move || Ok(Stuck { gate: gate_rx }),
            Some(Duration::from_millis(50)),
        )
        .unwrap();

        let err = worker.call(|l| l.keyboard_type()).unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(50)));
        assert!(worker.is_stalled());
        assert!(matches!(
            worker.call(|l| l.colors()),
            Err(Error::WorkerStopped)
        ));

        // Must not block on the stuck thread
        drop(worker);
        drop(gate_tx);
    }
}
