//! Modeled types shared by the engine and descriptor tests.

use crate::{
    codec::Color32,
    leaf::Leaf,
    ownership::{ElementId, ElementList, ElementSlot},
};
use kmlmap_derive::{Element, Token};

///
/// Shade
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Token)]
pub enum Shade {
    Light,
    Dark,
    #[kml(token = "pitch-black")]
    PitchBlack,
}

///
/// Pin
///

#[derive(Debug, Default, Element)]
pub struct Pin {
    #[kml(id)]
    pub id: ElementId,

    #[kml(order = 1)]
    pub weight: i32,

    #[kml(order = 2)]
    pub label: Leaf<String>,

    #[kml(order = 3, name = "tag")]
    pub tags: Vec<String>,

    #[kml(order = 4, default = "light", suppress_default)]
    pub shade: Leaf<Shade>,
}

impl Pin {
    pub fn weighted(weight: i32) -> Self {
        Self {
            weight,
            ..Self::default()
        }
    }
}

///
/// Board
///

#[derive(Debug, Default, Element)]
pub struct Board {
    #[kml(id)]
    pub id: ElementId,

    #[kml(order = 1)]
    pub title: Leaf<String>,

    #[kml(order = 2, name = "bgColor", default = "FFFFFFFF")]
    pub color: Leaf<Color32>,

    #[kml(order = 3)]
    pub pins: ElementList<Pin>,

    #[kml(order = 4, default = "2")]
    pub lines: Leaf<u32>,

    #[kml(order = 5, name = "cover")]
    pub cover: ElementSlot<Pin>,
}

///
/// Chain
///

#[derive(Debug, Default, Element)]
pub struct Chain {
    #[kml(id)]
    pub id: ElementId,

    pub next: ElementSlot<Chain>,
}

impl Chain {
    /// A chain `links` objects deep.
    pub fn of_length(links: usize) -> Self {
        let mut head = Self::default();

        for _ in 1..links {
            let mut parent = Self::default();
            let owner = parent.id;
            parent
                .next
                .set(owner, crate::ownership::Element::new(head))
                .expect("fresh child");
            head = parent;
        }

        head
    }
}

///
/// Frame
///

#[derive(Debug, Default, Element)]
pub struct Frame {
    #[kml(id)]
    pub id: ElementId,

    #[kml(required)]
    pub pin: ElementSlot<Pin>,
}
