//! Background persistence

use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    thread::{self, JoinHandle},
};

use tracing::{debug, warn};

use crate::{
    cart::CartSnapshot,
    persistence::{CartPersistence, PersistenceError},
};

/// Hands snapshots to a worker thread so saving never blocks the cart.
///
/// The worker only writes the newest pending snapshot. Dropping the adapter
/// flushes whatever is pending and joins the worker.
#[derive(Debug)]
pub struct BackgroundPersistence<P> {
    inner: Arc<P>,
    sender: Option<Sender<CartSnapshot>>,
    worker: Option<JoinHandle<()>>,
}

impl<P> BackgroundPersistence<P>
where
    P: CartPersistence + Send + Sync + 'static,
{
    /// Start a worker writing through `inner`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the worker thread cannot be spawned.
    pub fn new(inner: P) -> Result<Self, PersistenceError> {
        let inner = Arc::new(inner);
        let (sender, receiver) = mpsc::channel();
        let worker_inner = Arc::clone(&inner);

        let worker = thread::Builder::new()
            .name("cart-persistence".to_string())
            .spawn(move || run_worker(worker_inner.as_ref(), &receiver))?;

        Ok(BackgroundPersistence {
            inner,
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// The wrapped adapter.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: CartPersistence> CartPersistence for BackgroundPersistence<P> {
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), PersistenceError> {
        self.sender
            .as_ref()
            .ok_or(PersistenceError::Closed)?
            .send(snapshot.clone())
            .map_err(|_err| PersistenceError::Closed)
    }

    fn load(&self) -> Result<Option<CartSnapshot>, PersistenceError> {
        self.inner.load()
    }
}

impl<P> Drop for BackgroundPersistence<P> {
    fn drop(&mut self) {
        drop(self.sender.take());

        let Some(worker) = self.worker.take() else {
            return;
        };

        if worker.join().is_err() {
            warn!("cart persistence worker panicked");
        }
    }
}

fn run_worker<P: CartPersistence>(inner: &P, receiver: &Receiver<CartSnapshot>) {
    while let Ok(mut snapshot) = receiver.recv() {
        let mut skipped = 0_usize;

        while let Ok(newer) = receiver.try_recv() {
            snapshot = newer;
            skipped += 1;
        }

        if skipped > 0 {
            debug!(skipped, "coalesced pending cart snapshots");
        }

        if let Err(error) = inner.save(&snapshot) {
            warn!(%error, "background cart save failed");
        }
    }
}
