use std::fmt;

/// Playable classes, identified in join lines by their breed id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerClass {
    Feca,
    Osamodas,
    Enutrof,
    Sram,
    Xelor,
    Ecaflip,
    Eniripsa,
    Iop,
    Cra,
    Sadida,
    Sacrieur,
    Pandawa,
    Roublard,
    Zobal,
    Ouginak,
    Steamer,
    Eliotrope,
    Huppermage,
}

impl PlayerClass {
    pub fn from_breed(breed: u32) -> Option<Self> {
        let class = match breed {
            1 => Self::Feca,
            2 => Self::Osamodas,
            3 => Self::Enutrof,
            4 => Self::Sram,
            5 => Self::Xelor,
            6 => Self::Ecaflip,
            7 => Self::Eniripsa,
            8 => Self::Iop,
            9 => Self::Cra,
            10 => Self::Sadida,
            11 => Self::Sacrieur,
            12 => Self::Pandawa,
            13 => Self::Roublard,
            14 => Self::Zobal,
            15 => Self::Ouginak,
            16 => Self::Steamer,
            18 => Self::Eliotrope,
            19 => Self::Huppermage,
            _ => return None,
        };
        Some(class)
    }

    /// Display name, as used for keys in the spell cost table.
    pub fn name(self) -> &'static str {
        match self {
            Self::Feca => "Féca",
            Self::Osamodas => "Osamodas",
            Self::Enutrof => "Enutrof",
            Self::Sram => "Sram",
            Self::Xelor => "Xélor",
            Self::Ecaflip => "Écaflip",
            Self::Eniripsa => "Eniripsa",
            Self::Iop => "Iop",
            Self::Cra => "Cra",
            Self::Sadida => "Sadida",
            Self::Sacrieur => "Sacrieur",
            Self::Pandawa => "Pandawa",
            Self::Roublard => "Roublard",
            Self::Zobal => "Zobal",
            Self::Ouginak => "Ouginak",
            Self::Steamer => "Steamer",
            Self::Eliotrope => "Eliotrope",
            Self::Huppermage => "Huppermage",
        }
    }
}

impl fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
