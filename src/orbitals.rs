//! Classification of DOSCAR variants from block widths.
//!
//! VASP writes projected DOS blocks whose width depends on LORBIT and ISPIN,
//! and a total DOS block whose width depends on ISPIN only. Nothing else in the
//! file tells which variant it is, so the column count is all we have.

use std::fmt;

use serde::Serialize;

use crate::error::{
    DosError,
    DosResult,
};


/// Layout of the projected (per atom) DOS blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrbitalSchema {
    /// s, p, d summed over m. 4 columns.
    Spd,
    /// s, py, px, pz, no d channel. 5 columns.
    SpNoD,
    /// s, p, d with spin up/down. 7 columns.
    SpdSpin,
    /// lm-resolved up to d. 10 columns.
    LmResolved,
    /// lm-resolved up to f. 17 columns.
    LmResolvedF,
    /// lm-resolved up to d with spin up/down. 19 columns.
    LmResolvedSpin,
}


const LABELS_SPD: &[&str] = &["s", "p", "d"];

const LABELS_SP_NO_D: &[&str] = &["s", "py", "px", "pz"];

const LABELS_SPD_SPIN: &[&str] = &["s (↑)", "s (↓)", "p (↑)", "p (↓)", "d (↑)", "d (↓)"];

const LABELS_LM: &[&str] = &["s", "py", "pz", "px", "dxy", "dyz", "dz²", "dxz", "dx²-y²"];

const LABELS_LM_F: &[&str] = &[
    "s",   "py",  "pz",  "px",
    "dxy", "dyz", "dz²", "dxz", "dx²-y²",
    "fx(3x²-y²)", "fxyz", "fyz²", "fz³", "fxz²", "fx(x²-y²)", "fx(x²-3y²)",
];

const LABELS_LM_SPIN: &[&str] = &[
    "s (↑)",      "s (↓)",
    "py (↑)",     "py (↓)",
    "pz (↑)",     "pz (↓)",
    "px (↑)",     "px (↓)",
    "dxy (↑)",    "dxy (↓)",
    "dyz (↑)",    "dyz (↓)",
    "dz² (↑)",    "dz² (↓)",
    "dxz (↑)",    "dxz (↓)",
    "dx²-y² (↑)", "dx²-y² (↓)",
];


impl OrbitalSchema {
    /// Map the width of a projected block (energy column included) to its schema.
    ///
    /// Widths outside the known table are rejected, no guessing.
    pub fn from_ncol(ncol: usize) -> DosResult<Self> {
        match ncol {
            4  => Ok(Self::Spd),
            5  => Ok(Self::SpNoD),
            7  => Ok(Self::SpdSpin),
            10 => Ok(Self::LmResolved),
            17 => Ok(Self::LmResolvedF),
            19 => Ok(Self::LmResolvedSpin),
            _  => Err(DosError::UnsupportedFormat { ncol }),
        }
    }

    /// Block width including the energy column.
    pub fn ncol(&self) -> usize {
        self.labels().len() + 1
    }

    /// Orbital labels in column order, label `i` lives in column `i + 1`.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Spd            => LABELS_SPD,
            Self::SpNoD          => LABELS_SP_NO_D,
            Self::SpdSpin        => LABELS_SPD_SPIN,
            Self::LmResolved     => LABELS_LM,
            Self::LmResolvedF    => LABELS_LM_F,
            Self::LmResolvedSpin => LABELS_LM_SPIN,
        }
    }

    /// Column index of an orbital label, `None` if this schema has no such orbital.
    pub fn column_of(&self, label: &str) -> Option<usize> {
        self.labels()
            .iter()
            .position(|l| *l == label)
            .map(|i| i + 1)
    }

    pub fn is_spin_split(&self) -> bool {
        matches!(self, Self::SpdSpin | Self::LmResolvedSpin)
    }

    pub fn is_lm_resolved(&self) -> bool {
        matches!(self, Self::LmResolved | Self::LmResolvedF | Self::LmResolvedSpin)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Spd => "Regular grouped atomic contribution detected (LORBIT=0, 1, 2, 5 or 10). \
Only total p- and d-orbital contributions are available (i.e., p = px + py + pz).",
            Self::SpNoD => "Regular grouped atomic contribution detected (LORBIT=0, 1, 2, 5 or 10). \
s and p-orbital contributions are available.",
            Self::SpdSpin => "Spin-polarized collinear calculation with grouped orbitals detected \
(LORBIT=0, 1, 2, 5 or 10, ISPIN=2). Only total p- and d-orbital contributions are available \
(i.e., p = px + py + pz) with respective spin states.",
            Self::LmResolved => "lm-resolved calculation detected (LORBIT=11, 12, 13 or 14). \
Orbitals are resolved into individual components: px, py, pz, etc.",
            Self::LmResolvedF => "lm-resolved calculation detected (LORBIT=11, 12, 13 or 14). \
Orbitals are resolved into individual components up to the f orbitals.",
            Self::LmResolvedSpin => "lm-resolved calculation detected (LORBIT=11, 12, 13 or 14). \
Orbitals are resolved into individual components: px, py, pz, etc. with respective spin states.",
        }
    }
}


impl fmt::Display for OrbitalSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spd            => "s/p/d",
            Self::SpNoD          => "s/py/px/pz",
            Self::SpdSpin        => "s/p/d spin-split",
            Self::LmResolved     => "lm-resolved s..d",
            Self::LmResolvedF    => "lm-resolved s..f",
            Self::LmResolvedSpin => "lm-resolved s..d spin-split",
        };
        f.write_str(name)
    }
}


/// Spin treatment read off the width of the total DOS block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpinPolarization {
    /// energy, dos, integrated dos
    Unpolarized,
    /// energy, dos up, dos down, integrated up, integrated down
    Polarized,
    /// Any other width, plotted as if unpolarized.
    Unknown(usize),
}


impl SpinPolarization {
    pub fn from_total_ncol(ncol: usize) -> Self {
        match ncol {
            3 => Self::Unpolarized,
            5 => Self::Polarized,
            n => Self::Unknown(n),
        }
    }

    pub fn is_polarized(&self) -> bool {
        matches!(self, Self::Polarized)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Polarized => "Spin-polarized collinear calculation detected (ISPIN=2). \
This means the calculation includes spin-up and spin-down states.",
            Self::Unpolarized => "Non-spin-polarized calculation detected (ISPIN=1). \
This means the calculation does not include spin-up and spin-down states.",
            Self::Unknown(_) => "Unknown DOSCAR format detected. Unable to determine spin polarization.",
        }
    }
}


/// Both detections of a DOSCAR, done on different blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DosFormat {
    pub spin:    SpinPolarization,
    pub orbitals: OrbitalSchema,
}


impl DosFormat {
    pub fn detect(total_ncol: usize, projected_ncol: usize) -> DosResult<Self> {
        Ok(Self {
            spin:     SpinPolarization::from_total_ncol(total_ncol),
            orbitals: OrbitalSchema::from_ncol(projected_ncol)?,
        })
    }

    /// Whether the total block and the projected blocks agree on spin.
    ///
    /// Disagreement means an internally inconsistent file. It is reported, never fixed.
    pub fn is_consistent(&self) -> bool {
        self.spin.is_polarized() == self.orbitals.is_spin_split()
    }

    pub fn description(&self) -> String {
        format!("{} {}", self.spin.description(), self.orbitals.description())
    }
}
