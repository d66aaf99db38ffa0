//! Optimistic mutations with a compensating undo.
//!
//! Apply a local change, run the remote call, and if it fails apply the
//! inverse change. The forward step hands back whatever the inverse needs.

use std::future::Future;

use cms_client::{Entity, EntityId};

/// Run `remote` with `forward` already applied to `state`; undo on failure.
pub async fn apply_optimistic<S, U, R, E, Fut>(
    state: &mut S,
    forward: impl FnOnce(&mut S) -> U,
    remote: Fut,
    inverse: impl FnOnce(&mut S, U),
) -> Result<R, E>
where
    Fut: Future<Output = Result<R, E>>,
{
    let undo = forward(state);
    match remote.await {
        Ok(value) => Ok(value),
        Err(e) => {
            inverse(state, undo);
            Err(e)
        }
    }
}

/// An item taken out of a list, with its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed<T> {
    pub index: usize,
    pub item: T,
}

/// Forward step for deletes.
pub fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: &EntityId) -> Option<Removed<T>> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(Removed {
        index,
        item: items.remove(index),
    })
}

/// Inverse step for deletes: put the item back where it was.
///
/// A no-op if something with the same id has appeared in the meantime.
pub fn restore<T: Entity>(items: &mut Vec<T>, removed: Removed<T>) {
    if items.iter().any(|item| item.id() == removed.item.id()) {
        return;
    }
    let index = removed.index.min(items.len());
    items.insert(index, removed.item);
}
