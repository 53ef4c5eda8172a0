//! Periodic background reload.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   stop / drop    ┌──────────────────────────┐
//! │     Reloader     │ ───────────────▶ │     reloader thread      │
//! │ (Sender + Join)  │                  │                          │
//! └──────────────────┘                  │  loop:                   │
//!                                       │    recv_timeout(interval)│
//!                                       │    timeout → tick()      │
//!                                       │    signal  → exit        │
//!                                       └──────────────────────────┘
//! ```
//!
//! Waiting on the stop channel instead of sleeping lets shutdown interrupt
//! the interval immediately.

use std::{
    io,
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

/// Handle to the running reload thread. Dropping it stops the thread.
#[derive(Debug)]
pub struct Reloader {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Reloader {
    /// Spawn a thread calling `tick` once per `interval` until stopped.
    pub fn spawn<F>(interval: Duration, mut tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, signal) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("reloader".into())
            .spawn(move || {
                loop {
                    match signal.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => tick(),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Signal the thread and wait for the current tick to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop.send(()).ok();
        }
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

impl Drop for Reloader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Instant,
    };

    #[test]
    fn test_ticks_until_stopped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let reloader = Reloader::spawn(Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while ticks.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        reloader.stop();

        let after_stop = ticks.load(Ordering::SeqCst);
        assert!(after_stop >= 3);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_stop_interrupts_long_interval() {
        let reloader = Reloader::spawn(Duration::from_secs(3600), || {}).unwrap();
        let started = Instant::now();
        reloader.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_drop_stops_thread() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        {
            let _reloader = Reloader::spawn(Duration::from_secs(3600), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }
}
