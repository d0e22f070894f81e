//! Background encoding worker. Embedding a memory for long-term storage is
//! slow next to the token loop, so it runs on a dedicated thread: callers
//! enqueue text without blocking and collect finished vectors by polling
//! between turns.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pending texts the queue will hold before `memorize` starts rejecting.
const QUEUE_DEPTH: usize = 64;

/// How long the worker waits for input before re-checking the stop flag.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Anything that turns text into an embedding. Closures qualify.
pub trait TextEncoder {
    fn encode(&mut self, text: &str) -> Vec<f32>;
}

impl<F> TextEncoder for F
where
    F: FnMut(&str) -> Vec<f32>,
{
    fn encode(&mut self, text: &str) -> Vec<f32> {
        self(text)
    }
}

/// Handle to the encoding thread. Dropping it stops the thread; results
/// already produced stay pollable.
pub struct EncoderWorker {
    input: Option<SyncSender<String>>,
    results: Receiver<(String, Vec<f32>)>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EncoderWorker {
    /// Start the worker thread around the given encoder.
    pub fn spawn<E>(mut encoder: E) -> Self
    where
        E: TextEncoder + Send + 'static,
    {
        let (input_tx, input_rx) = mpsc::sync_channel::<String>(QUEUE_DEPTH);
        let (result_tx, result_rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::SeqCst) {
                match input_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(text) => {
                        let vector = encoder.encode(&text);
                        if result_tx.send((text, vector)).is_err() {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            input: Some(input_tx),
            results: result_rx,
            stop,
            handle: Some(handle),
        }
    }

    /// Enqueue text for encoding. Returns false when the worker has been
    /// stopped or the queue is full; the text is not retried.
    pub fn memorize(&self, text: impl Into<String>) -> bool {
        if self.stop.load(Ordering::SeqCst) {
            return false;
        }
        match &self.input {
            Some(tx) => tx.try_send(text.into()).is_ok(),
            None => false,
        }
    }

    /// Fetch one finished (text, embedding) pair without blocking.
    pub fn poll(&self) -> Option<(String, Vec<f32>)> {
        self.results.try_recv().ok()
    }

    /// Stop the thread and wait for it. Work already dequeued finishes and
    /// its result stays pollable; texts still queued are discarded.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        self.input.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for EncoderWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
