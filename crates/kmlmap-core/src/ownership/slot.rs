use crate::ownership::{Element, ElementId, OwnershipError, attach, detach};
use std::fmt;

///
/// ElementSlot
///
/// Single composite child. Assigning a new occupant detaches the old one.
/// Like [`ElementList`](super::ElementList), the slot keeps the first
/// parent it attached for.
///

pub struct ElementSlot<C> {
    owner: Option<ElementId>,
    item: Option<Element<C>>,
}

impl<C> ElementSlot<C> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            owner: None,
            item: None,
        }
    }

    /// Put `child` in the slot, returning the detached previous occupant.
    ///
    /// Setting the current occupant again changes nothing.
    pub fn set(
        &mut self,
        owner: ElementId,
        child: Element<C>,
    ) -> Result<Option<Element<C>>, OwnershipError> {
        OwnershipError::check_parent(self.owner, owner)?;

        if self.item.as_ref().is_some_and(|item| item.ptr_eq(&child)) {
            return Ok(None);
        }

        if child.owner() == Some(owner) {
            return Err(OwnershipError::DuplicateChild {
                child: child.id(),
                parent: owner,
            }
            .rejected());
        }

        attach(owner, Some(&child))?;
        self.owner = Some(owner);

        Ok(self.item.replace(child).map(|prev| {
            detach(&prev);
            prev
        }))
    }

    /// Empty the slot, returning the detached occupant.
    pub fn take(&mut self) -> Option<Element<C>> {
        self.item.take().map(|prev| {
            detach(&prev);
            prev
        })
    }

    #[must_use]
    pub const fn get(&self) -> Option<&Element<C>> {
        self.item.as_ref()
    }

    #[must_use]
    pub const fn is_some(&self) -> bool {
        self.item.is_some()
    }

    #[must_use]
    pub const fn owner(&self) -> Option<ElementId> {
        self.owner
    }
}

impl<C> Default for ElementSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Drop for ElementSlot<C> {
    fn drop(&mut self) {
        self.take();
    }
}

impl<C: fmt::Debug> fmt::Debug for ElementSlot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementSlot").field(&self.item).finish()
    }
}
