//! Off-thread texture generation
//!
//! A small pool of named threads pulls [`TextureRequest`]s from a shared job
//! channel and answers on a single response channel. Responses carry the
//! [`RequestId`] handed out by [`TextureWorker::submit`] and arrive in
//! completion order, which is not submission order once more than one
//! request is in flight.

use std::fmt;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use tracing::{debug, info, warn};

use crate::error::{Result, TextureError};
use crate::texture::{GenerateOptions, TextureRequest, generate_with};

/// Correlates a response with the request that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A finished texture, owned by the receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureResponse {
    pub id: RequestId,
    /// Row-major RGBA8, `width * height * 4` bytes
    pub buffer: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

struct Job {
    id: RequestId,
    request: TextureRequest,
}

/// Handle to a pool of texture generation threads
///
/// Dropping the handle discards queued jobs, closes the job channel and
/// joins every thread after it finishes the job it is working on.
pub struct TextureWorker {
    jobs: Option<Sender<Job>>,
    /// Shared with the threads so queued jobs can be discarded
    queue: Receiver<Job>,
    results: Receiver<TextureResponse>,
    handles: Vec<JoinHandle<()>>,
    next_id: u64,
    in_flight: usize,
}

impl TextureWorker {
    /// Spawn `workers` generation threads (at least one)
    ///
    /// # Arguments
    ///
    /// * `workers` - Number of threads, clamped to a minimum of 1
    /// * `options` - Generation options applied to every request
    pub fn spawn(workers: usize, options: GenerateOptions) -> Result<Self> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<Job>();
        let (result_tx, result_rx) = unbounded::<TextureResponse>();

        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("texture-worker-{}", index))
                .spawn(move || run_worker(index, jobs, results, options))?;
            handles.push(handle);
        }
        info!(workers, "texture worker pool started");

        Ok(TextureWorker {
            jobs: Some(job_tx),
            queue: job_rx,
            results: result_rx,
            handles,
            next_id: 0,
            in_flight: 0,
        })
    }

    /// Queue a request and return the id its response will carry
    pub fn submit(&mut self, request: TextureRequest) -> Result<RequestId> {
        let id = RequestId(self.next_id);
        let jobs = self.jobs.as_ref().ok_or(TextureError::WorkerDisconnected)?;
        jobs.send(Job { id, request })
            .map_err(|_| TextureError::WorkerDisconnected)?;

        self.next_id += 1;
        self.in_flight += 1;
        debug!(%id, in_flight = self.in_flight, "queued texture request");
        Ok(id)
    }

    /// Block until the next response arrives
    ///
    /// Fails with `NoPendingRequests` instead of blocking forever when nothing
    /// is in flight.
    pub fn recv(&mut self) -> Result<TextureResponse> {
        if self.in_flight == 0 {
            return Err(TextureError::NoPendingRequests);
        }
        let response = self.results.recv().map_err(|_| TextureError::WorkerDisconnected)?;
        self.in_flight -= 1;
        Ok(response)
    }

    /// Take a finished response if one is ready
    ///
    /// `Ok(None)` means nothing has finished yet; a pool whose threads are
    /// all gone is `WorkerDisconnected`, as with [`TextureWorker::recv`].
    pub fn try_recv(&mut self) -> Result<Option<TextureResponse>> {
        match self.results.try_recv() {
            Ok(response) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Ok(Some(response))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TextureError::WorkerDisconnected),
        }
    }

    /// Discard every queued job no thread has started yet
    ///
    /// Jobs already being generated run to completion and still answer.
    /// Returns the number of discarded jobs.
    pub fn cancel_pending(&mut self) -> usize {
        let cancelled = self.queue.try_iter().count();
        self.in_flight = self.in_flight.saturating_sub(cancelled);
        if cancelled > 0 {
            debug!(cancelled, in_flight = self.in_flight, "discarded queued texture requests");
        }
        cancelled
    }

    /// Requests submitted but not yet received
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn workers(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for TextureWorker {
    fn drop(&mut self) {
        self.cancel_pending();
        // Closing the sender ends each worker's job loop
        self.jobs.take();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("texture worker panicked");
            }
        }
        debug!("texture worker pool stopped");
    }
}

fn run_worker(index: usize, jobs: Receiver<Job>, results: Sender<TextureResponse>, options: GenerateOptions) {
    debug!(index, "texture worker started");

    for Job { id, request } in jobs.iter() {
        let buffer = generate_with(&request, &options);
        let response = TextureResponse {
            id,
            width: buffer.width(),
            height: buffer.height(),
            buffer: buffer.into_bytes(),
        };
        if results.send(response).is_err() {
            warn!(index, %id, "response channel closed, dropping texture");
            break;
        }
    }

    debug!(index, "texture worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{TextureType, generate};
    use std::collections::HashMap;

    fn request(texture: TextureType, base: &str, secondary: &str, resolution: i64) -> TextureRequest {
        TextureRequest::new(texture, base, secondary, resolution).unwrap()
    }

    #[test]
    fn test_responses_match_sync_output_by_id() {
        let mut worker = TextureWorker::spawn(3, GenerateOptions::default()).unwrap();
        let cases = [
            (TextureType::Terrestrial, "#2233FF", "#228833", 96),
            (TextureType::GasGiant, "#D8CA9D", "#A89A6D", 32),
            (TextureType::Cratered, "#A5A5A5", "#808080", 64),
            (TextureType::Sun, "#FDB813", "#FDB813", 8),
            (TextureType::Volcanic, "#eebb44", "#aa4400", 48),
        ];

        let mut expected = HashMap::new();
        for (texture, base, secondary, resolution) in cases {
            let id = worker.submit(request(texture, base, secondary, resolution)).unwrap();
            expected.insert(id, generate(texture, base, secondary, resolution).unwrap());
        }
        assert_eq!(worker.in_flight(), cases.len());

        for _ in 0..cases.len() {
            let response = worker.recv().unwrap();
            let sync = expected.remove(&response.id).expect("Response id should match a submitted request");
            assert_eq!(response.width, sync.width());
            assert_eq!(response.height, sync.height());
            assert_eq!(response.buffer.as_slice(), sync.as_bytes(), "Request {} differs from sync path", response.id);
        }
        assert!(expected.is_empty());
        assert_eq!(worker.in_flight(), 0);
    }

    #[test]
    fn test_small_request_can_overtake_large_one() {
        let mut worker = TextureWorker::spawn(2, GenerateOptions::default()).unwrap();
        let large = worker.submit(request(TextureType::Terrestrial, "#2233FF", "#228833", 512)).unwrap();
        let small = worker.submit(request(TextureType::Sun, "#FDB813", "#000000", 1)).unwrap();
        assert!(large < small);

        let mut seen = Vec::new();
        while worker.in_flight() > 0 {
            seen.push(worker.recv().unwrap().id);
        }
        seen.sort();
        assert_eq!(seen, vec![large, small], "Both responses arrive, in whatever order they finish");
    }

    #[test]
    fn test_recv_without_requests_fails_fast() {
        let mut worker = TextureWorker::spawn(1, GenerateOptions::default()).unwrap();
        assert!(matches!(worker.recv(), Err(TextureError::NoPendingRequests)));
        assert!(matches!(worker.try_recv(), Ok(None)));
    }

    #[test]
    fn test_ids_are_sequential_and_pool_size_clamped() {
        let mut worker = TextureWorker::spawn(0, GenerateOptions::default()).unwrap();
        assert_eq!(worker.workers(), 1);
        let first = worker.submit(request(TextureType::Sun, "#ffffff", "#ffffff", 2)).unwrap();
        let second = worker.submit(request(TextureType::Sun, "#000000", "#000000", 2)).unwrap();
        assert_eq!(first, RequestId(0));
        assert_eq!(second, RequestId(1));
    }

    #[test]
    fn test_try_recv_reports_stopped_pool() {
        let mut worker = TextureWorker::spawn(2, GenerateOptions::default()).unwrap();
        worker.jobs.take();
        for handle in worker.handles.drain(..) {
            handle.join().unwrap();
        }
        assert!(matches!(worker.try_recv(), Err(TextureError::WorkerDisconnected)));
        assert!(matches!(
            worker.submit(request(TextureType::Sun, "#ffffff", "#ffffff", 2)),
            Err(TextureError::WorkerDisconnected)
        ));
    }

    #[test]
    fn test_cancel_pending_skips_queued_jobs() {
        let mut worker = TextureWorker::spawn(1, GenerateOptions::default()).unwrap();
        for _ in 0..6 {
            worker.submit(request(TextureType::Terrestrial, "#2233FF", "#228833", 256)).unwrap();
        }

        // The single thread can have started at most the first job or two
        let cancelled = worker.cancel_pending();
        assert!(cancelled >= 4, "Only {} queued jobs were discarded", cancelled);
        assert_eq!(worker.in_flight() + cancelled, 6);

        while worker.in_flight() > 0 {
            let response = worker.recv().unwrap();
            assert_eq!(response.width, 256);
        }
        assert!(matches!(worker.recv(), Err(TextureError::NoPendingRequests)));
        assert_eq!(worker.cancel_pending(), 0);
    }

    #[test]
    fn test_drop_with_pending_work_joins_cleanly() {
        let mut worker = TextureWorker::spawn(2, GenerateOptions::default()).unwrap();
        for _ in 0..4 {
            worker.submit(request(TextureType::IceGiant, "#4488ff", "#aaddff", 64)).unwrap();
        }
        drop(worker);
    }
}
