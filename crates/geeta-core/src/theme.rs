/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The eight color roles every theme defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub highlight: Rgb,
    pub border: Rgb,
    pub book: Rgb,
    pub chapter: Rgb,
    pub verse: Rgb,
    pub fg: Rgb,
    pub bg: Rgb,
    pub status_bg: Rgb,
}

/// Built-in palettes, named after the five Pandavas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Yudhisthira,
    Bhima,
    #[default]
    Arjuna,
    Nakula,
    Sahadeva,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Yudhisthira,
        Theme::Bhima,
        Theme::Arjuna,
        Theme::Nakula,
        Theme::Sahadeva,
    ];

    /// Config key under which the active theme name is stored.
    pub const CONFIG_KEY: &'static str = "theme";

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Yudhisthira => "yudhisthira",
            Theme::Bhima => "bhima",
            Theme::Arjuna => "arjuna",
            Theme::Nakula => "nakula",
            Theme::Sahadeva => "sahadeva",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == name.trim().to_lowercase())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Yudhisthira => "Yudhisthira",
            Theme::Bhima => "Bhima",
            Theme::Arjuna => "Arjuna",
            Theme::Nakula => "Nakula",
            Theme::Sahadeva => "Sahadeva",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Yudhisthira => Palette {
                highlight: Rgb(0xFF, 0xD7, 0x00),
                border: Rgb(0x9A, 0x8C, 0x6A),
                book: Rgb(0xE6, 0xC0, 0x7B),
                chapter: Rgb(0xC6, 0xD6, 0x8F),
                verse: Rgb(0x61, 0xAF, 0xEF),
                fg: Rgb(0xEC, 0xEF, 0xF4),
                bg: Rgb(0x16, 0x16, 0x1A),
                status_bg: Rgb(0x2B, 0x2B, 0x2F),
            },
            Theme::Bhima => Palette {
                highlight: Rgb(0xFF, 0x55, 0x55),
                border: Rgb(0x88, 0x44, 0x44),
                book: Rgb(0xFF, 0xB8, 0x6C),
                chapter: Rgb(0xF1, 0xFA, 0x8C),
                verse: Rgb(0xFF, 0x79, 0xC6),
                fg: Rgb(0xF8, 0xF8, 0xF2),
                bg: Rgb(0x28, 0x2A, 0x36),
                status_bg: Rgb(0x23, 0x24, 0x2A),
            },
            Theme::Arjuna => Palette {
                highlight: Rgb(0x61, 0xAF, 0xEF),
                border: Rgb(0x3B, 0x6F, 0x9A),
                book: Rgb(0x8B, 0xE9, 0xFD),
                chapter: Rgb(0x50, 0xFA, 0x7B),
                verse: Rgb(0xF1, 0xFA, 0x8C),
                fg: Rgb(0xED, 0xF6, 0xFF),
                bg: Rgb(0x07, 0x14, 0x25),
                status_bg: Rgb(0x08, 0x22, 0x35),
            },
            Theme::Nakula => Palette {
                highlight: Rgb(0x50, 0xFA, 0x7B),
                border: Rgb(0x2F, 0x7A, 0x3A),
                book: Rgb(0x3B, 0xE3, 0x8A),
                chapter: Rgb(0xB2, 0xFF, 0x59),
                verse: Rgb(0xC3, 0xE8, 0x8D),
                fg: Rgb(0xF7, 0xFF, 0xF7),
                bg: Rgb(0x07, 0x13, 0x0A),
                status_bg: Rgb(0x07, 0x29, 0x17),
            },
            Theme::Sahadeva => Palette {
                highlight: Rgb(0xBD, 0x93, 0xF9),
                border: Rgb(0x6E, 0x4B, 0xAF),
                book: Rgb(0x8B, 0xE9, 0xFD),
                chapter: Rgb(0x50, 0xFA, 0x7B),
                verse: Rgb(0xF8, 0xF8, 0xF2),
                fg: Rgb(0xF8, 0xF8, 0xF2),
                bg: Rgb(0x1E, 0x1B, 0x2F),
                status_bg: Rgb(0x2A, 0x25, 0x40),
            },
        }
    }
}
