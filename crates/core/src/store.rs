//! Cart Store
//!
//! [`CartStore`] owns the authoritative [`CartState`] and routes every mutation
//! through the four cart transitions, snapshotting to its persistence adapter
//! after each one.

use rusty_money::iso::Currency;
use tracing::{debug, warn};

use crate::{
    cart::{CartCommand, CartError, CartSnapshot, CartState, LineItem, LineItemId},
    persistence::CartPersistence,
};

/// Cart Store
#[derive(Debug)]
pub struct CartStore<P> {
    state: CartState,
    persistence: P,
}

impl<P: CartPersistence> CartStore<P> {
    /// Open a store, restoring the last snapshot from `persistence` when possible.
    ///
    /// A missing, unreadable or invalid snapshot starts an empty cart.
    pub fn open(currency: &'static Currency, persistence: P) -> Self {
        let state = match persistence.load() {
            Ok(Some(snapshot)) => {
                CartState::restore(snapshot, currency).unwrap_or_else(|error| {
                    warn!(%error, "discarding invalid cart snapshot");
                    CartState::new(currency)
                })
            }
            Ok(None) => CartState::new(currency),
            Err(error) => {
                warn!(%error, "failed to restore cart, starting empty");
                CartState::new(currency)
            }
        };

        debug!(items = state.len(), "opened cart store");

        CartStore { state, persistence }
    }

    /// Apply a command and persist the resulting snapshot.
    ///
    /// Persistence failures are logged and never fail the command.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the command is rejected; the state is unchanged.
    pub fn dispatch(&mut self, command: CartCommand) -> Result<&CartState, CartError> {
        let name = command.name();
        let target = command.target().map(ToString::to_string);

        self.state = self.state.apply(command)?;

        debug!(
            command = name,
            target = target.as_deref().unwrap_or_default(),
            items = self.state.len(),
            "applied cart command"
        );

        self.persist();

        Ok(&self.state)
    }

    /// Add an item, merging quantities with an existing entry of the same id.
    ///
    /// # Errors
    ///
    /// See [`CartState::add`].
    pub fn add(&mut self, item: LineItem) -> Result<&CartState, CartError> {
        self.dispatch(CartCommand::Add(item))
    }

    /// Remove an item; unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// See [`CartState::remove`].
    pub fn remove(&mut self, id: LineItemId) -> Result<&CartState, CartError> {
        self.dispatch(CartCommand::Remove(id))
    }

    /// Overwrite an item's quantity; quantities below 1 are ignored.
    ///
    /// # Errors
    ///
    /// See [`CartState::set_quantity`].
    pub fn set_quantity(&mut self, id: LineItemId, quantity: i64) -> Result<&CartState, CartError> {
        self.dispatch(CartCommand::SetQuantity { id, quantity })
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other transitions.
    pub fn clear(&mut self) -> Result<&CartState, CartError> {
        self.dispatch(CartCommand::Clear)
    }

    /// Current state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.snapshot()
    }

    /// The persistence adapter.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Close the store, handing back the persistence adapter.
    pub fn into_persistence(self) -> P {
        self.persistence
    }

    fn persist(&self) {
        if let Err(error) = self.persistence.save(&self.state.snapshot()) {
            warn!(%error, "failed to persist cart snapshot");
        }
    }
}
