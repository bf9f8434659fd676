//! Clothing catalogue: the closed set of item kinds the doll can wear plus
//! the attachment bookkeeping for the dressing phase.

/// Closed set of clothing types. Markup tags and drag payloads must parse to
/// one of these; anything else fails session construction, not the drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Hat,
    Shirt,
    Skirt,
    Shoes,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Hat,
        ItemKind::Shirt,
        ItemKind::Skirt,
        ItemKind::Shoes,
    ];

    /// Parse a markup / data-transfer tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hat" => Some(ItemKind::Hat),
            "shirt" => Some(ItemKind::Shirt),
            "skirt" => Some(ItemKind::Skirt),
            "shoes" => Some(ItemKind::Shoes),
            _ => None,
        }
    }

    /// Stable lowercase token used in markup attributes and drag payloads.
    pub fn tag(self) -> &'static str {
        match self {
            ItemKind::Hat => "hat",
            ItemKind::Shirt => "shirt",
            ItemKind::Skirt => "skirt",
            ItemKind::Shoes => "shoes",
        }
    }

    /// Display text for the marker appended into an occupied zone.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Hat => "Hat",
            ItemKind::Shirt => "Shirt",
            ItemKind::Skirt => "Skirt",
            ItemKind::Shoes => "Shoes",
        }
    }

    fn index(self) -> usize {
        match self {
            ItemKind::Hat => 0,
            ItemKind::Shirt => 1,
            ItemKind::Skirt => 2,
            ItemKind::Shoes => 3,
        }
    }
}

/// Which kinds the doll is currently wearing. Attachment is one-way.
#[derive(Clone, Debug, Default)]
pub struct Outfit {
    worn: [bool; ItemKind::ALL.len()],
}

impl Outfit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the kind was already attached (duplicate drop).
    pub fn attach(&mut self, kind: ItemKind) -> bool {
        let slot = &mut self.worn[kind.index()];
        if *slot {
            false
        } else {
            *slot = true;
            true
        }
    }

    pub fn is_attached(&self, kind: ItemKind) -> bool {
        self.worn[kind.index()]
    }

    pub fn attached_count(&self) -> usize {
        self.worn.iter().filter(|w| **w).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn unknown_tags_rejected() {
        assert_eq!(ItemKind::from_tag(""), None);
        assert_eq!(ItemKind::from_tag("cape"), None);
        assert_eq!(ItemKind::from_tag("Hat"), None);
    }

    #[test]
    fn attach_is_one_way_and_idempotent() {
        let mut outfit = Outfit::new();
        assert!(outfit.attach(ItemKind::Hat));
        assert!(!outfit.attach(ItemKind::Hat));
        assert!(outfit.is_attached(ItemKind::Hat));
        assert!(!outfit.is_attached(ItemKind::Shirt));
        assert_eq!(outfit.attached_count(), 1);
    }
}
