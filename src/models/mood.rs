//! Closed questionnaire vocabularies.
//!
//! Labels are the Portuguese strings the mobile client sends and that are
//! stored verbatim. Parsing at the API boundary is strict (`TryFrom<String>`);
//! reading stored rows is lenient (`from_label_lossy`) and maps anything
//! outside the vocabulary to the `Unrecognized` variant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Self-reported mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Humor {
    MuitoBem,
    Bem,
    Normal,
    Cansado,
    Exausto,
    /// Missing or out-of-vocabulary value found in stored data.
    Unrecognized,
}

impl Humor {
    pub const ALL: [Humor; 5] = [
        Humor::MuitoBem,
        Humor::Bem,
        Humor::Normal,
        Humor::Cansado,
        Humor::Exausto,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Humor::MuitoBem => "Muito Bem",
            Humor::Bem => "Bem",
            Humor::Normal => "Normal",
            Humor::Cansado => "Cansado",
            Humor::Exausto => "Exausto",
            Humor::Unrecognized => "Não informado",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.label() == label)
    }

    pub fn from_label_lossy(label: &str) -> Self {
        Self::parse(label).unwrap_or(Humor::Unrecognized)
    }

    /// Numeric score used for averaging. Unrecognized moods count as "Normal".
    pub fn score(self) -> u8 {
        match self {
            Humor::MuitoBem => 5,
            Humor::Bem => 4,
            Humor::Normal | Humor::Unrecognized => 3,
            Humor::Cansado => 2,
            Humor::Exausto => 1,
        }
    }

    /// Bands a numeric average back onto the vocabulary.
    pub fn from_average(average: f64) -> Self {
        if average >= 4.5 {
            Humor::MuitoBem
        } else if average >= 3.5 {
            Humor::Bem
        } else if average >= 2.5 {
            Humor::Normal
        } else if average >= 1.5 {
            Humor::Cansado
        } else {
            Humor::Exausto
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Energia {
    Alta,
    Media,
    Baixa,
    Unrecognized,
}

impl Energia {
    pub const ALL: [Energia; 3] = [Energia::Alta, Energia::Media, Energia::Baixa];

    pub fn label(self) -> &'static str {
        match self {
            Energia::Alta => "Alta",
            Energia::Media => "Média",
            Energia::Baixa => "Baixa",
            Energia::Unrecognized => "Não informado",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.label() == label)
    }

    pub fn from_label_lossy(label: &str) -> Self {
        Self::parse(label).unwrap_or(Energia::Unrecognized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Sono {
    MuitoBom,
    Bom,
    Regular,
    Ruim,
    MuitoRuim,
    Unrecognized,
}

impl Sono {
    pub const ALL: [Sono; 5] = [
        Sono::MuitoBom,
        Sono::Bom,
        Sono::Regular,
        Sono::Ruim,
        Sono::MuitoRuim,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Sono::MuitoBom => "Muito Bom",
            Sono::Bom => "Bom",
            Sono::Regular => "Regular",
            Sono::Ruim => "Ruim",
            Sono::MuitoRuim => "Muito Ruim",
            Sono::Unrecognized => "Não informado",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    pub fn from_label_lossy(label: &str) -> Self {
        Self::parse(label).unwrap_or(Sono::Unrecognized)
    }

    pub fn is_poor(self) -> bool {
        matches!(self, Sono::Ruim | Sono::MuitoRuim)
    }
}

/// Whether the (simulated) facial capture step was completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "&'static str")]
pub enum FotoStatus {
    Capturada,
    #[default]
    NaoCapturada,
}

impl FotoStatus {
    pub fn label(self) -> &'static str {
        match self {
            FotoStatus::Capturada => "Capturada",
            FotoStatus::NaoCapturada => "Não capturada",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        [FotoStatus::Capturada, FotoStatus::NaoCapturada]
            .into_iter()
            .find(|f| f.label() == label)
    }

    pub fn from_label_lossy(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }
}

macro_rules! label_conversions {
    ($($ty:ident => $kind:literal),* $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = UnknownLabel;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    $ty::parse(&value).ok_or(UnknownLabel { kind: $kind, value })
                }
            }

            impl From<$ty> for &'static str {
                fn from(value: $ty) -> Self {
                    value.label()
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

label_conversions!(
    Humor => "humor",
    Energia => "energia",
    Sono => "sono",
    FotoStatus => "fotoStatus",
);
