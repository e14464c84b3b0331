use crate::ownership::{Element, ElementId, OwnershipError, attach, detach};
use std::{fmt, slice};

///
/// ElementList
///
/// Ordered collection of composite children belonging to one parent.
/// Every member's back-reference points at that parent while it is a member.
/// The parent is fixed by the first successful attach.
///

pub struct ElementList<C> {
    owner: Option<ElementId>,
    items: Vec<Element<C>>,
}

impl<C> ElementList<C> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            owner: None,
            items: Vec::new(),
        }
    }

    /// Append `child`, attaching it to `owner`.
    pub fn push(&mut self, owner: ElementId, child: Element<C>) -> Result<(), OwnershipError> {
        self.insert(owner, self.items.len(), child)
    }

    /// Insert `child` at `index`, attaching it to `owner`.
    ///
    /// Re-inserting a member at the index it already holds is a no-op.
    /// Any other insert of an existing member fails and leaves the list
    /// unchanged; members are never moved implicitly.
    pub fn insert(
        &mut self,
        owner: ElementId,
        index: usize,
        child: Element<C>,
    ) -> Result<(), OwnershipError> {
        OwnershipError::check_parent(self.owner, owner)?;

        if let Some(current) = self.position(&child) {
            if current == index {
                return Ok(());
            }

            return Err(OwnershipError::DuplicateChild {
                child: child.id(),
                parent: owner,
            }
            .rejected());
        }

        if index > self.items.len() {
            return Err(OwnershipError::PositionOutOfRange {
                index,
                len: self.items.len(),
            }
            .rejected());
        }

        // already ours, but held by another container of the same parent
        if child.owner() == Some(owner) {
            return Err(OwnershipError::DuplicateChild {
                child: child.id(),
                parent: owner,
            }
            .rejected());
        }

        attach(owner, Some(&child))?;
        self.owner = Some(owner);
        self.items.insert(index, child);

        Ok(())
    }

    /// Remove `child` if it is a member. Returns whether it was.
    pub fn remove(&mut self, child: &Element<C>) -> bool {
        self.position(child)
            .and_then(|index| self.take(index))
            .is_some()
    }

    /// Remove and detach the member at `index`.
    pub fn take(&mut self, index: usize) -> Option<Element<C>> {
        if index >= self.items.len() {
            return None;
        }

        let child = self.items.remove(index);
        detach(&child);

        Some(child)
    }

    /// Detach and drop every member.
    pub fn clear(&mut self) {
        for child in self.items.drain(..) {
            detach(&child);
        }
    }

    /// The parent this list is bound to, once anything was attached.
    #[must_use]
    pub const fn owner(&self) -> Option<ElementId> {
        self.owner
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Element<C>> {
        self.items.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Element<C>> {
        self.items.iter()
    }

    #[must_use]
    pub fn position(&self, child: &Element<C>) -> Option<usize> {
        self.items.iter().position(|item| item.ptr_eq(child))
    }

    #[must_use]
    pub fn contains(&self, child: &Element<C>) -> bool {
        self.position(child).is_some()
    }
}

impl<C> Default for ElementList<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Drop for ElementList<C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<C: fmt::Debug> fmt::Debug for ElementList<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<'a, C> IntoIterator for &'a ElementList<C> {
    type Item = &'a Element<C>;
    type IntoIter = slice::Iter<'a, Element<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
