//! DOSCAR reader.
//!
//! Layout of the file, all whitespace separated:
//!
//! ```text
//! line 0          : NIONS  NIONS  JOBPAR  WDES%NCDIJ
//! line 1 .. 4     : volume/lattice, temperature, "CAR", system name
//! line 5          : EMAX  EMIN  NEDOS  EFERMI  1.0
//! NEDOS lines     : total DOS, (energy, dos[, dos_dn], idos[, idos_dn])
//! NIONS times:
//!   1 line        : same as line 5
//!   NEDOS lines   : projected DOS of this ion, (energy, orbitals ...)
//! ```
//!
//! The reader is strictly positional: every offset is computed from NEDOS and
//! NIONS and checked against the number of lines before it is touched.

use std::{
    fs,
    path::Path,
    str::FromStr,
};

use log::debug;
use ndarray::{
    Array2,
    ArrayView1,
};

use crate::{
    error::{
        DosError,
        DosResult,
    },
    orbitals::{
        DosFormat,
        SpinPolarization,
    },
    types::{
        Matrix,
        Vector,
    },
};


const FILE: &str = "DOSCAR";
const HEADER_LINES: usize = 6;
const ENERGY_TOLERANCE: f64 = 1E-6;


#[derive(Clone, Debug)]
pub struct Doscar {
    pub nions:  usize,
    pub efermi: f64,
    pub nedos:  usize,
    /// Total DOS block as written in the file, energy shifted by `-efermi`.
    pub total:  Matrix<f64>,
    /// One block per ion, energy shifted by `-efermi`.
    pub pdos:   Vec<Matrix<f64>>,
}


impl Doscar {
    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> DosResult<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .map_err(|e| DosError::malformed(FILE, format!("cannot read {:?}: {}", path, e)))?;
        txt.parse()
    }

    /// Energy axis relative to the Fermi level, shared by every block.
    pub fn energy(&self) -> ArrayView1<f64> {
        self.total.column(0)
    }

    pub fn format(&self) -> DosResult<DosFormat> {
        let projected_ncol = self.pdos.first()
            .map(|b| b.ncols())
            .unwrap_or(0);
        DosFormat::detect(self.total.ncols(), projected_ncol)
    }

    /// The total DOS the file reports itself, spin channels added up.
    ///
    /// This is not necessarily equal to the sum over projected blocks.
    pub fn reported_total(&self) -> Vector<f64> {
        let dos = self.total.column(1).to_owned();
        if SpinPolarization::from_total_ncol(self.total.ncols()).is_polarized() {
            dos + self.total.column(2)
        } else {
            dos
        }
    }

    fn parse_nions(lines: &[&str]) -> DosResult<usize> {
        let line = Self::line_at(lines, 0)?;
        let token = line.split_whitespace()
            .next()
            .ok_or_else(|| DosError::malformed_at(FILE, 1, "missing number of ions"))?;
        parse_token::<usize>(token, 1)
    }

    //                                             nedos  efermi
    fn parse_nedos_efermi(lines: &[&str]) -> DosResult<(usize, f64)> {
        let line = Self::line_at(lines, HEADER_LINES - 1)?;
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 4 {
            return Err(DosError::malformed_at(FILE, HEADER_LINES,
                format!("expected EMAX EMIN NEDOS EFERMI, found {} fields", tokens.len())));
        }

        let nedos  = parse_token::<usize>(tokens[2], HEADER_LINES)?;
        let efermi = parse_token::<f64>(tokens[3], HEADER_LINES)?;
        Ok((nedos, efermi))
    }

    fn line_at<'a>(lines: &[&'a str], i: usize) -> DosResult<&'a str> {
        lines.get(i)
            .copied()
            .ok_or_else(|| DosError::malformed(FILE,
                format!("expected at least {} lines, found {}", i + 1, lines.len())))
    }

    /// Read `nrows` lines starting at line index `start` into a matrix.
    fn parse_block(lines: &[&str], start: usize, nrows: usize, efermi: f64) -> DosResult<Matrix<f64>> {
        let rows = lines.get(start .. start + nrows)
            .ok_or_else(|| DosError::malformed(FILE,
                format!("expected at least {} lines, found {}", start + nrows, lines.len())))?;

        let mut ncol = 0usize;
        let mut data = Vec::<f64>::with_capacity(nrows * 20);

        for (irow, line) in rows.iter().enumerate() {
            let lineno = start + irow + 1;
            let mut nvalue = 0usize;
            for token in line.split_whitespace() {
                data.push(parse_token::<f64>(token, lineno)?);
                nvalue += 1;
            }

            if irow == 0 {
                if nvalue == 0 {
                    return Err(DosError::malformed_at(FILE, lineno, "empty line inside a data block"));
                }
                ncol = nvalue;
            } else if nvalue != ncol {
                return Err(DosError::malformed_at(FILE, lineno,
                    format!("expected {} columns as the block's first line, found {}", ncol, nvalue)));
            }
        }

        let mut block = Array2::from_shape_vec((nrows, ncol), data)
            .map_err(|e| DosError::malformed(FILE, e.to_string()))?;
        block.column_mut(0).mapv_inplace(|e| e - efermi);

        Ok(block)
    }

    fn check_energy_grid(total: &Matrix<f64>, block: &Matrix<f64>, start: usize) -> DosResult<()> {
        let irow = total.column(0).iter()
            .zip(block.column(0).iter())
            .position(|(a, b)| (a - b).abs() > ENERGY_TOLERANCE);

        match irow {
            Some(irow) => Err(DosError::malformed_at(FILE, start + irow + 1,
                "energy grid differs from the total DOS block")),
            None => Ok(()),
        }
    }
}


impl FromStr for Doscar {
    type Err = DosError;

    fn from_str(txt: &str) -> DosResult<Self> {
        let lines = txt.lines().collect::<Vec<&str>>();

        let nions = Self::parse_nions(&lines)?;
        let (nedos, efermi) = Self::parse_nedos_efermi(&lines)?;
        debug!("DOSCAR header: NIONS = {}, NEDOS = {}, E-fermi = {}", nions, nedos, efermi);

        if nions == 0 {
            return Err(DosError::malformed_at(FILE, 1, "number of ions is zero"));
        }
        if nedos == 0 {
            return Err(DosError::malformed_at(FILE, HEADER_LINES, "NEDOS is zero"));
        }

        let expected = nedos.checked_add(1)
            .and_then(|n| n.checked_mul(nions))
            .and_then(|n| n.checked_add(nedos))
            .and_then(|n| n.checked_add(HEADER_LINES))
            .ok_or_else(|| DosError::malformed_at(FILE, HEADER_LINES,
                format!("NEDOS = {} and NIONS = {} are too large", nedos, nions)))?;
        if lines.len() < expected {
            let nonblank = lines.iter()
                .rposition(|l| !l.trim().is_empty())
                .map(|i| i + 1)
                .unwrap_or(0);
            let detail = if nonblank == HEADER_LINES + nedos {
                format!("expected {} lines but found {}: no projected DOS blocks, \
the calculation was probably run without LORBIT", expected, lines.len())
            } else {
                format!("expected {} lines for {} ions and {} energy points, found {}",
                        expected, nions, nedos, lines.len())
            };
            return Err(DosError::malformed(FILE, detail));
        }

        let total = Self::parse_block(&lines, HEADER_LINES, nedos, efermi)?;
        debug!("Total DOS block has {} columns", total.ncols());
        if total.ncols() < 2 {
            return Err(DosError::malformed_at(FILE, HEADER_LINES + 1,
                "total DOS block holds no DOS column"));
        }

        let pdos = (0 .. nions)
            .map(|iion| {
                let start = HEADER_LINES + nedos + iion * (nedos + 1) + 1;
                let block = Self::parse_block(&lines, start, nedos, efermi)?;
                Self::check_energy_grid(&total, &block, start)?;
                Ok(block)
            })
            .collect::<DosResult<Vec<_>>>()?;

        if let Some(first) = pdos.first() {
            debug!("Projected DOS blocks have {} columns", first.ncols());
        }

        Ok(Self {
            nions,
            efermi,
            nedos,
            total,
            pdos,
        })
    }
}


fn parse_token<T: FromStr>(token: &str, lineno: usize) -> DosResult<T> {
    token.parse::<T>()
        .map_err(|_| DosError::ParseError {
            file:  FILE,
            line:  lineno,
            token: token.to_owned(),
        })
}
