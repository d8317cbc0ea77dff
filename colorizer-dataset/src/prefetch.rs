//! Background sample prefetching.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use crate::error::Result;
use crate::loader::load_sample;
use crate::sample::{ColorSample, PreprocessConfig};

/// A bounded producer/consumer loader that decodes samples on a
/// background thread while the consumer trains on the previous batch.
///
/// The channel depth bounds memory: at most `depth` decoded samples are
/// held in flight. Decode failures are forwarded as items so the
/// consumer can decide whether to skip or abort.
///
/// # Example
///
/// ```no_run
/// use colorizer_dataset::{PrefetchLoader, PreprocessConfig};
/// use std::path::PathBuf;
///
/// let files = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
/// let loader = PrefetchLoader::spawn(files, PreprocessConfig::default(), 4);
///
/// for (path, result) in loader {
///     match result {
///         Ok(sample) => println!("{}: {} px", path.display(), sample.lightness.len()),
///         Err(e) => eprintln!("skipping {}: {e}", path.display()),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct PrefetchLoader {
    receiver: Option<mpsc::Receiver<(PathBuf, Result<ColorSample>)>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl PrefetchLoader {
    /// Spawns a background worker that loads `files` in order.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    #[must_use]
    pub fn spawn(files: Vec<PathBuf>, config: PreprocessConfig, depth: usize) -> Self {
        assert!(depth > 0, "prefetch depth must be > 0");

        let (sender, receiver) = mpsc::sync_channel(depth);
        let worker = thread::spawn(move || {
            for path in files {
                let result = load_sample(&path, &config);
                // Consumer dropped the receiver; stop loading
                if sender.send((path, result)).is_err() {
                    break;
                }
            }
        });

        Self {
            receiver: Some(receiver),
            worker: Some(worker),
        }
    }
}

impl Iterator for PrefetchLoader {
    type Item = (PathBuf, Result<ColorSample>);

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.as_ref().and_then(|rx| rx.recv().ok())
    }
}

impl Drop for PrefetchLoader {
    fn drop(&mut self) {
        // Dropping the receiver makes the worker's next send fail, so
        // it exits even when blocked on a full channel.
        drop(self.receiver.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
