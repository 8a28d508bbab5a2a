use std::{
    fs,
    path::Path,
    str::FromStr,
};

use crate::error::{
    DosError,
    DosResult,
};


const FILE: &str = "POSCAR";
const SYMBOLS_LINE: usize = 5;
const COUNTS_LINE: usize = 6;


/// The part of a POSCAR needed to group projected DOS blocks by species.
///
/// Only the VASP 5 layout is accepted, where line 6 holds the element symbols
/// and line 7 the number of ions of each element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poscar {
    pub comment:       String,
    pub ion_types:     Vec<String>,
    pub ions_per_type: Vec<usize>,
}


impl Poscar {
    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> DosResult<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .map_err(|e| DosError::malformed(FILE, format!("cannot read {:?}: {}", path, e)))?;
        txt.parse()
    }

    pub fn nions(&self) -> usize {
        self.ions_per_type.iter().sum()
    }
}


impl FromStr for Poscar {
    type Err = DosError;

    fn from_str(txt: &str) -> DosResult<Self> {
        let lines = txt.lines().collect::<Vec<&str>>();
        if lines.len() <= COUNTS_LINE {
            return Err(DosError::malformed(FILE,
                format!("expected at least {} lines, found {}", COUNTS_LINE + 1, lines.len())));
        }

        let comment = lines[0].trim().to_owned();

        let ion_types = lines[SYMBOLS_LINE].split_whitespace()
            .map(str::to_owned)
            .collect::<Vec<String>>();
        if ion_types.is_empty() {
            return Err(DosError::malformed_at(FILE, SYMBOLS_LINE + 1, "missing element symbols"));
        }
        if ion_types.iter().any(|s| s.parse::<f64>().is_ok()) {
            return Err(DosError::malformed_at(FILE, SYMBOLS_LINE + 1,
                "element symbols line is missing (VASP 4 layout is not supported)"));
        }

        let ions_per_type = lines[COUNTS_LINE].split_whitespace()
            .map(|token| token.parse::<usize>()
                 .map_err(|_| DosError::ParseError {
                     file:  FILE,
                     line:  COUNTS_LINE + 1,
                     token: token.to_owned(),
                 }))
            .collect::<DosResult<Vec<usize>>>()?;

        if ions_per_type.len() != ion_types.len() {
            return Err(DosError::malformed_at(FILE, COUNTS_LINE + 1,
                format!("{} element symbols but {} ion counts", ion_types.len(), ions_per_type.len())));
        }

        Ok(Self {
            comment,
            ion_types,
            ions_per_type,
        })
    }
}
