//! Declared shape of each landing-page section.

use serde::Serialize;

use crate::error::CoreError;

/// Maximum number of cards in any card-bearing section.
pub const MAX_CARDS: usize = 12;

/// Media key prefix addressing a card image (`card0`, `card1`, ...).
pub const CARD_MEDIA_PREFIX: &str = "card";

/// Media key addressing the section's top-level image.
pub const SECTION_MEDIA_KEY: &str = "image";

/// Shape of the repeated card array inside a section.
#[derive(Debug, Serialize)]
pub struct CardSchema {
    /// JSON key of the array.
    pub key: &'static str,
    /// Text fields of each card.
    pub fields: &'static [&'static str],
    /// Field holding the card's uploaded image path.
    pub image_field: &'static str,
}

/// Shape of one section document.
#[derive(Debug, Serialize)]
pub struct SectionSchema {
    pub number: u8,
    pub name: &'static str,
    /// Top-level text fields.
    pub scalars: &'static [&'static str],
    /// Top-level image field, if the section has one.
    pub image_field: Option<&'static str>,
    pub cards: Option<CardSchema>,
}

/// The six landing-page sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Hero,
    About,
    Services,
    Gallery,
    Testimonials,
    Contact,
}

pub const ALL_SECTIONS: [Section; 6] = [
    Section::Hero,
    Section::About,
    Section::Services,
    Section::Gallery,
    Section::Testimonials,
    Section::Contact,
];

static HERO: SectionSchema = SectionSchema {
    number: 1,
    name: "hero",
    scalars: &["title", "subtitle", "ctaText", "ctaLink"],
    image_field: Some("imagePath"),
    cards: None,
};

static ABOUT: SectionSchema = SectionSchema {
    number: 2,
    name: "about",
    scalars: &["heading", "description"],
    image_field: Some("imagePath"),
    cards: Some(CardSchema {
        key: "cards",
        fields: &["title", "description"],
        image_field: "imagePath",
    }),
};

static SERVICES: SectionSchema = SectionSchema {
    number: 3,
    name: "services",
    scalars: &["heading", "subheading"],
    image_field: None,
    cards: Some(CardSchema {
        key: "cards",
        fields: &["title", "description"],
        image_field: "imagePath",
    }),
};

static GALLERY: SectionSchema = SectionSchema {
    number: 4,
    name: "gallery",
    scalars: &["heading", "subheading"],
    image_field: None,
    cards: Some(CardSchema {
        key: "cards",
        fields: &["caption"],
        image_field: "imagePath",
    }),
};

static TESTIMONIALS: SectionSchema = SectionSchema {
    number: 5,
    name: "testimonials",
    scalars: &["heading"],
    image_field: None,
    cards: Some(CardSchema {
        key: "cards",
        fields: &["name", "quote", "location"],
        image_field: "imagePath",
    }),
};

static CONTACT: SectionSchema = SectionSchema {
    number: 6,
    name: "contact",
    scalars: &["heading", "description", "buttonText", "buttonLink"],
    image_field: Some("backgroundImage"),
    cards: None,
};

impl Section {
    /// Resolve a 1-based section number.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Hero),
            2 => Ok(Self::About),
            3 => Ok(Self::Services),
            4 => Ok(Self::Gallery),
            5 => Ok(Self::Testimonials),
            6 => Ok(Self::Contact),
            _ => Err(CoreError::Validation(format!(
                "Invalid section number {n}. Must be between 1 and 6"
            ))),
        }
    }

    pub fn number(self) -> u8 {
        self.schema().number
    }

    pub fn schema(self) -> &'static SectionSchema {
        match self {
            Self::Hero => &HERO,
            Self::About => &ABOUT,
            Self::Services => &SERVICES,
            Self::Gallery => &GALLERY,
            Self::Testimonials => &TESTIMONIALS,
            Self::Contact => &CONTACT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_round_trip() {
        for section in ALL_SECTIONS {
            assert_eq!(Section::from_number(section.number()).unwrap(), section);
        }
        assert!(Section::from_number(0).is_err());
        assert!(Section::from_number(7).is_err());
    }

    #[test]
    fn every_section_has_content_fields() {
        for section in ALL_SECTIONS {
            let schema = section.schema();
            assert!(!schema.scalars.is_empty(), "{} has no scalars", schema.name);
        }
    }
}
