use crate::{
    codec::{CodecError, Scalar, ScalarTag},
    leaf::Leaf,
    ownership::ElementId,
};
use kmlmap_derive::Element;

bitflags::bitflags! {
    /// Folder states an icon is drawn for. Written as space-separated
    /// tokens, e.g. `open error`.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct ItemIconStates: u8 {
        const OPEN = 1 << 0;
        const CLOSED = 1 << 1;
        const ERROR = 1 << 2;
        const FETCHING0 = 1 << 3;
        const FETCHING1 = 1 << 4;
        const FETCHING2 = 1 << 5;
    }
}

impl ItemIconStates {
    const TOKENS: [(Self, &'static str); 6] = [
        (Self::OPEN, "open"),
        (Self::CLOSED, "closed"),
        (Self::ERROR, "error"),
        (Self::FETCHING0, "fetching0"),
        (Self::FETCHING1, "fetching1"),
        (Self::FETCHING2, "fetching2"),
    ];
}

impl Scalar for ItemIconStates {
    const TAG: ScalarTag = ScalarTag::new("itemIconState");

    fn encode(&self) -> String {
        Self::TOKENS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, token)| *token)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn decode(text: &str) -> Result<Self, CodecError> {
        text.split_whitespace().try_fold(Self::empty(), |states, token| {
            Self::TOKENS
                .iter()
                .find(|(_, t)| *t == token)
                .map(|(flag, _)| states | *flag)
                .ok_or_else(|| CodecError::unrecognized(Self::TAG, token))
        })
    }
}

///
/// ItemIcon
///
/// An icon drawn in the list view for a given set of folder states.
///

#[derive(Debug, Default, Element)]
pub struct ItemIcon {
    #[kml(id)]
    id: ElementId,

    #[kml(order = 1)]
    pub state: Leaf<ItemIconStates>,

    #[kml(order = 2)]
    pub href: Leaf<String>,
}

impl ItemIcon {
    #[must_use]
    pub fn new(state: ItemIconStates, href: impl Into<String>) -> Self {
        Self {
            state: Leaf::Set(state),
            href: Leaf::Set(href.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.id
    }
}
