//! Coalescing atomic file writer.
//!
//! Each payload is written to `<path>.temp`, flushed to disk and renamed over `<path>`,
//! so the target always holds either the previous or the new contents in full. At most
//! one write is in flight. Payloads submitted meanwhile go to a single pending slot, each
//! replacing the one before, and the slot is drained when the in-flight write finishes,
//! whether it succeeded or not.

use std::{
    ffi::OsString,
    future::Future,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::channel::oneshot;
use parking_lot::Mutex;
use tokio::{fs, io::AsyncWriteExt, runtime::Handle};
use tracing::{debug, trace, warn};

/// Suffix appended to the target file name for the temporary file.
pub const TEMP_SUFFIX: &str = ".temp";

type Waiter = oneshot::Sender<io::Result<()>>;

/// A payload and the callers waiting for it, or for a payload it superseded.
#[derive(Debug)]
struct Pending {
    payload: String,
    waiters: Vec<Waiter>,
}

#[derive(Debug, Default)]
struct WriterState {
    writing: bool,
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    temp_path: PathBuf,
    state: Mutex<WriterState>,
}

/// Atomic writer for a single target file. Clones share the target and the pending slot.
#[derive(Debug, Clone)]
pub struct AtomicWriter {
    inner: Arc<Inner>,
}

impl AtomicWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let temp_path = temp_path(&path);

        Self {
            inner: Arc::new(Inner {
                path,
                temp_path,
                state: Mutex::new(WriterState::default()),
            }),
        }
    }

    /// The target file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// The temporary file written before each rename.
    pub fn temp_path(&self) -> &Path {
        &self.inner.temp_path
    }

    /// Submits `payload`.
    ///
    /// The payload is accepted before this returns: either it starts a write, or it takes
    /// the pending slot. The returned future resolves with the outcome of the write that
    /// carried this payload, or of the later payload that superseded it in the slot. The
    /// write runs on its own task and completes even if the future is dropped.
    ///
    /// Outside a Tokio runtime nothing is accepted and the future resolves to an error.
    pub fn write(&self, payload: String) -> impl Future<Output = io::Result<()>> + Send + 'static {
        let submitted = self.submit(payload);

        async move { submitted?.await.map_err(io::Error::other)? }
    }

    /// Returns `true` while a write is in flight.
    pub fn is_writing(&self) -> bool {
        self.inner.state.lock().writing
    }

    fn submit(&self, payload: String) -> io::Result<oneshot::Receiver<io::Result<()>>> {
        let runtime = Handle::try_current().map_err(io::Error::other)?;
        let (waiter, receiver) = oneshot::channel();

        let mut state = self.inner.state.lock();

        if state.writing {
            match state.pending.as_mut() {
                Some(pending) => {
                    trace!(path = %self.inner.path.display(), "superseded pending snapshot");
                    pending.payload = payload;
                    pending.waiters.push(waiter);
                },
                None => {
                    state.pending = Some(Pending {
                        payload,
                        waiters: vec![waiter],
                    });
                },
            }

            return Ok(receiver);
        }

        state.writing = true;
        drop(state);

        let inner = Arc::clone(&self.inner);
        runtime.spawn(async move {
            inner
                .drain(Pending {
                    payload,
                    waiters: vec![waiter],
                })
                .await
        });

        Ok(receiver)
    }
}

impl Inner {
    async fn drain(&self, mut current: Pending) {
        loop {
            let outcome = self.write_file(&current.payload).await;

            if let Err(err) = &outcome {
                warn!(path = %self.path.display(), error = %err, "failed to write storage file");
            }

            for waiter in current.waiters {
                // A dropped receiver only means nobody awaits the outcome.
                let _ = waiter.send(copy_outcome(&outcome));
            }

            match self.next() {
                Some(next) => current = next,
                None => return,
            }
        }
    }

    async fn write_file(&self, payload: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&self.temp_path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&self.temp_path, &self.path).await?;
        debug!(path = %self.path.display(), bytes = payload.len(), "wrote storage file");

        Ok(())
    }

    /// Takes the pending payload, or marks the writer idle when there is none.
    fn next(&self) -> Option<Pending> {
        let mut state = self.state.lock();
        let next = state.pending.take();

        if next.is_none() {
            state.writing = false;
        }

        next
    }
}

fn copy_outcome(outcome: &io::Result<()>) -> io::Result<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(err) => Err(io::Error::new(err.kind(), err.to_string())),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}
