// element.rs
// Element kinds and their per-element property table

use std::collections::HashMap;
use once_cell::sync::Lazy;
use palette::Srgb;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Element {
    Nt,
    Pl,
    Ws,
    Ck,
    /// Generic atom of an inserted molecule
    Mo,
    /// Surface particle, the building block of molecular surfaces and ribbons
    Sp,
}

#[derive(Clone, Copy, Debug)]
pub struct ElementProps {
    pub mass: f32,
    /// Lennard-Jones sigma, i.e. the van der Waals diameter
    pub sigma: f32,
    pub epsilon: f32,
    pub color: Srgb<u8>,
}

pub static ELEMENT_PROPERTIES: Lazy<HashMap<Element, ElementProps>> = Lazy::new(|| {
    use Element::*;
    let mut m = HashMap::new();
    m.insert(
        Nt,
        ElementProps { mass: 20.0, sigma: 7.0, epsilon: 0.1, color: Srgb::new(255, 255, 255) },
    );
    m.insert(
        Pl,
        ElementProps { mass: 40.0, sigma: 14.0, epsilon: 0.1, color: Srgb::new(255, 0, 255) },
    );
    m.insert(
        Ws,
        ElementProps { mass: 60.0, sigma: 21.0, epsilon: 0.1, color: Srgb::new(0, 255, 0) },
    );
    m.insert(
        Ck,
        ElementProps { mass: 80.0, sigma: 28.0, epsilon: 0.1, color: Srgb::new(255, 200, 0) },
    );
    m.insert(
        Mo,
        ElementProps { mass: 40.0, sigma: 10.0, epsilon: 0.1, color: Srgb::new(128, 128, 255) },
    );
    m.insert(
        Sp,
        ElementProps { mass: 20.0, sigma: 7.0, epsilon: 0.1, color: Srgb::new(200, 200, 200) },
    );
    m
});

impl Element {
    pub const ALL: [Element; 6] = [
        Element::Nt,
        Element::Pl,
        Element::Ws,
        Element::Ck,
        Element::Mo,
        Element::Sp,
    ];

    pub fn props(self) -> &'static ElementProps {
        &ELEMENT_PROPERTIES[&self]
    }

    pub fn mass(self) -> f32 {
        self.props().mass
    }

    pub fn sigma(self) -> f32 {
        self.props().sigma
    }

    /// Van der Waals radius (half of sigma)
    pub fn radius(self) -> f32 {
        0.5 * self.sigma()
    }

    pub fn color(self) -> Srgb<u8> {
        self.props().color
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Compact set of elements, used for obstacle permeability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementSet(u8);

impl ElementSet {
    pub const EMPTY: ElementSet = ElementSet(0);

    pub fn contains(self, element: Element) -> bool {
        self.0 & element.bit() != 0
    }

    pub fn insert(&mut self, element: Element) {
        self.0 |= element.bit();
    }

    pub fn remove(&mut self, element: Element) {
        self.0 &= !element.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Element> for ElementSet {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut set = ElementSet::EMPTY;
        for e in iter {
            set.insert(e);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_element_has_properties() {
        for e in Element::ALL {
            assert!(e.sigma() > 0.0, "{:?} has no sigma", e);
            assert_eq!(e.radius(), 0.5 * e.sigma());
        }
    }

    #[test]
    fn element_set_membership() {
        let mut set: ElementSet = [Element::Nt, Element::Ck].into_iter().collect();
        assert!(set.contains(Element::Nt));
        assert!(!set.contains(Element::Pl));
        set.remove(Element::Nt);
        set.insert(Element::Sp);
        assert!(!set.contains(Element::Nt));
        assert!(set.contains(Element::Sp));
        assert!(set.contains(Element::Ck));
    }
}
