//! Single-parent ownership of composite children.
//!
//! A child's back-reference lives in its [`Element`] cell. Containers
//! ([`ElementList`], [`ElementSlot`]) keep it in sync: attaching sets it,
//! every removal path (explicit removal, clear, overwrite, drop) nulls it.

mod list;
mod slot;


use crate::obs::sink::{self, MetricsEvent};
use derive_more::Display;
use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
        atomic::{AtomicU64, Ordering},
    },
};
use thiserror::Error as ThisError;

// re-exports
pub use list::ElementList;
pub use slot::ElementSlot;

///
/// ElementId
///
/// Process-unique identity of one modeled object.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("#{_0}")]
pub struct ElementId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ElementId {
    /// Allocate a fresh identity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::next()
    }
}

///
/// Identity
///

pub trait Identity {
    fn element_id(&self) -> ElementId;
}

///
/// OwnershipError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum OwnershipError {
    #[error("child {child} is owned by {owner}, cannot attach to {requested}")]
    AlreadyOwned {
        child: ElementId,
        owner: ElementId,
        requested: ElementId,
    },

    #[error("child {child} is already present in {parent}")]
    DuplicateChild { child: ElementId, parent: ElementId },

    #[error("cannot attach a missing child to {parent}")]
    NullChild { parent: ElementId },

    #[error("position {index} is out of range for a collection of {len}")]
    PositionOutOfRange { index: usize, len: usize },

    #[error("container belongs to {parent}, cannot attach on behalf of {requested}")]
    WrongParent {
        parent: ElementId,
        requested: ElementId,
    },
}

impl OwnershipError {
    /// A container binds to the first parent it attaches a child for.
    pub(crate) fn check_parent(
        bound: Option<ElementId>,
        requested: ElementId,
    ) -> Result<(), Self> {
        match bound {
            Some(parent) if parent != requested => {
                Err(Self::WrongParent { parent, requested }.rejected())
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn rejected(self) -> Self {
        tracing::debug!(error = %self, "ownership change rejected");
        sink::record(MetricsEvent::OwnershipRejected);

        self
    }
}

///
/// ElementCell
///

struct ElementCell<C> {
    id: ElementId,
    owner: Mutex<Option<ElementId>>,
    value: RwLock<C>,
}

///
/// Element
///
/// Shared handle to one composite child. Clones refer to the same instance
/// and share its back-reference.
///

pub struct Element<C> {
    cell: Arc<ElementCell<C>>,
}

impl<C: Identity> Element<C> {
    pub fn new(value: C) -> Self {
        Self {
            cell: Arc::new(ElementCell {
                id: value.element_id(),
                owner: Mutex::new(None),
                value: RwLock::new(value),
            }),
        }
    }
}

impl<C> Element<C> {
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.cell.id
    }

    /// The current parent, if attached.
    #[must_use]
    pub fn owner(&self) -> Option<ElementId> {
        *self.cell.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.owner().is_some()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, C> {
        self.cell.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, C> {
        self.cell
            .value
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether both handles refer to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    pub(crate) fn set_owner(&self, owner: Option<ElementId>) -> Option<ElementId> {
        let mut slot = self.cell.owner.lock().unwrap_or_else(PoisonError::into_inner);

        std::mem::replace(&mut *slot, owner)
    }
}

impl<C> Clone for Element<C> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for Element<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id())
            .field("owner", &self.owner())
            .field("value", &*self.read())
            .finish()
    }
}

/// Attach `child` to `parent`.
///
/// Succeeds without change when the child already belongs to `parent`;
/// duplicate detection within a container is the container's job.
pub fn attach<C>(parent: ElementId, child: Option<&Element<C>>) -> Result<(), OwnershipError> {
    let child = child.ok_or_else(|| OwnershipError::NullChild { parent }.rejected())?;
    let mut owner = child
        .cell
        .owner
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    match *owner {
        Some(current) if current == parent => Ok(()),
        Some(current) => Err(OwnershipError::AlreadyOwned {
            child: child.id(),
            owner: current,
            requested: parent,
        }
        .rejected()),
        None => {
            *owner = Some(parent);
            Ok(())
        }
    }
}

/// Null the child's back-reference, returning the parent it had.
pub fn detach<C>(child: &Element<C>) -> Option<ElementId> {
    child.set_owner(None)
}

#[must_use]
pub fn owner_of<C>(child: &Element<C>) -> Option<ElementId> {
    child.owner()
}
