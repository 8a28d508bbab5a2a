//! Grouping of projected DOS blocks into per-species sums.
//!
//! Ions in DOSCAR come in the order POSCAR declares them, so species `i` owns
//! the contiguous run of `ions_per_type[i]` blocks after the runs of species
//! `0 .. i`.

use log::{
    debug,
    warn,
};
use ndarray::{
    s,
    ArrayView1,
    Axis,
};

use crate::{
    error::{
        DosError,
        DosResult,
    },
    mendeleev::sort_by_rank,
    orbitals::DosFormat,
    types::{
        Matrix,
        Vector,
    },
    vasp_parsers::{
        doscar::Doscar,
        poscar::Poscar,
    },
};


/// Projected DOS of all ions of one species.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesDos {
    pub symbol: String,
    pub nions:  usize,
    /// [ienergy, icolumn], column 0 is the shared energy axis, the others are
    /// summed over every ion of this species.
    pub dos:    Matrix<f64>,
}


impl SpeciesDos {
    pub fn energy(&self) -> ArrayView1<f64> {
        self.dos.column(0)
    }

    /// Sum of all orbital columns.
    pub fn total(&self) -> Vector<f64> {
        self.dos.slice(s![.., 1..]).sum_axis(Axis(1))
    }

    pub fn orbital(&self, icol: usize) -> Option<ArrayView1<f64>> {
        if icol == 0 || icol >= self.dos.ncols() {
            return None;
        }
        Some(self.dos.column(icol))
    }
}


fn check_shapes(blocks: &[Matrix<f64>]) -> DosResult<(usize, usize)> {
    let expected = blocks.first()
        .map(|b| b.dim())
        .ok_or_else(|| DosError::malformed("DOSCAR", "no projected DOS blocks"))?;

    match blocks.iter().map(|b| b.dim()).find(|d| *d != expected) {
        Some(found) => Err(DosError::ShapeMismatch { expected, found }),
        None => Ok(expected),
    }
}


/// Element-wise sum of the orbital columns of `blocks`, energy column taken from `energy`.
pub fn sum_blocks(blocks: &[Matrix<f64>], energy: ArrayView1<f64>) -> DosResult<Matrix<f64>> {
    let (nrow, ncol) = check_shapes(blocks)?;
    if energy.len() != nrow {
        return Err(DosError::ShapeMismatch { expected: (nrow, ncol), found: (energy.len(), 1) });
    }

    let mut ret = Matrix::<f64>::zeros((nrow, ncol));
    ret.column_mut(0).assign(&energy);
    {
        let mut acc = ret.slice_mut(s![.., 1..]);
        for b in blocks {
            acc += &b.slice(s![.., 1..]);
        }
    }
    Ok(ret)
}


/// Partition `blocks` by species and sum each run, in POSCAR order.
///
/// A symbol listed more than once gets a single entry holding all of its runs.
pub fn group_by_species(blocks: &[Matrix<f64>], ion_types: &[String], ions_per_type: &[usize]) -> DosResult<Vec<SpeciesDos>> {
    let nions = ions_per_type.iter().sum::<usize>();
    if nions != blocks.len() {
        return Err(DosError::InconsistentAtomCount { poscar: nions, doscar: blocks.len() });
    }
    check_shapes(blocks)?;

    let energy = blocks[0].column(0);
    let mut ret: Vec<SpeciesDos> = Vec::with_capacity(ion_types.len());
    let mut start = 0usize;

    for (symbol, &n) in ion_types.iter().zip(ions_per_type.iter()) {
        let run = &blocks[start .. start + n];
        start += n;

        let summed = if run.is_empty() {
            let mut m = Matrix::<f64>::zeros(blocks[0].dim());
            m.column_mut(0).assign(&energy);
            m
        } else {
            sum_blocks(run, energy)?
        };

        if let Some(species) = ret.iter_mut().find(|sp| &sp.symbol == symbol) {
            debug!("Species {} appears more than once in POSCAR, merging", symbol);
            species.nions += n;
            let mut acc = species.dos.slice_mut(s![.., 1..]);
            acc += &summed.slice(s![.., 1..]);
        } else {
            ret.push(SpeciesDos {
                symbol: symbol.clone(),
                nions:  n,
                dos:    summed,
            });
        }
    }

    Ok(ret)
}


/// Total DOS as the sum of every orbital column of every ion.
pub fn atom_summed_total(blocks: &[Matrix<f64>]) -> DosResult<Vector<f64>> {
    let (nrow, _) = check_shapes(blocks)?;
    Ok(blocks.iter()
       .fold(Vector::<f64>::zeros(nrow), |acc, b| {
           acc + b.slice(s![.., 1..]).sum_axis(Axis(1))
       }))
}


/// Everything the plotting layer needs from one DOSCAR/POSCAR pair.
#[derive(Clone, Debug)]
pub struct AggregatedDos {
    pub format:  DosFormat,
    /// E - E_fermi
    pub energy:  Vector<f64>,
    /// Sorted by Mendeleev number, unknown symbols last.
    pub species: Vec<SpeciesDos>,
    /// Atom-summed total DOS. Used as the plotted total instead of the
    /// file's own total block, the two may differ.
    pub total:   Vector<f64>,
}


impl AggregatedDos {
    pub fn new(doscar: &Doscar, poscar: &Poscar) -> DosResult<Self> {
        let format = doscar.format()?;
        if !format.is_consistent() {
            warn!("Total DOS block says {:?} but projected blocks are {}, the DOSCAR may be inconsistent.",
                  format.spin, format.orbitals);
        }

        let mut species = group_by_species(&doscar.pdos, &poscar.ion_types, &poscar.ions_per_type)?;
        sort_by_rank(&mut species, |sp| sp.symbol.as_str());

        let total = atom_summed_total(&doscar.pdos)?;

        Ok(Self {
            format,
            energy: doscar.energy().to_owned(),
            species,
            total,
        })
    }

    pub fn species(&self, symbol: &str) -> Option<&SpeciesDos> {
        self.species.iter().find(|sp| sp.symbol == symbol)
    }

    /// Position of `symbol` in display order.
    pub fn rank_of(&self, symbol: &str) -> Option<usize> {
        self.species.iter().position(|sp| sp.symbol == symbol)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::arr2;
    use crate::error::ErrorKind;

    fn blocks() -> Vec<Matrix<f64>> {
        vec![
            arr2(&[[-1.0, 1.0, 2.0, 3.0],
                   [ 0.0, 4.0, 5.0, 6.0]]),
            arr2(&[[-1.0, 0.5, 0.5, 0.5],
                   [ 0.0, 1.5, 1.5, 1.5]]),
            arr2(&[[-1.0, 2.0, 0.0, 0.0],
                   [ 0.0, 0.0, 2.0, 0.0]]),
        ]
    }

    fn symbols(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_group_by_species() {
        let ret = group_by_species(&blocks(), &symbols(&["O", "Fe"]), &[2, 1]).unwrap();
        assert_eq!(ret.len(), 2);
        assert_eq!(ret[0].symbol, "O");
        assert_eq!(ret[0].nions, 2);
        assert_eq!(ret[0].dos, arr2(&[[-1.0, 1.5, 2.5, 3.5],
                                       [ 0.0, 5.5, 6.5, 7.5]]));
        assert_eq!(ret[1].dos, blocks()[2]);
        assert_eq!(ret[0].total().to_vec(), vec![7.5, 19.5]);
        assert_eq!(ret[1].orbital(2).unwrap().to_vec(), vec![0.0, 2.0]);
        assert!(ret[1].orbital(0).is_none());
        assert!(ret[1].orbital(4).is_none());
    }

    #[test]
    fn test_duplicated_species() {
        let ret = group_by_species(&blocks(), &symbols(&["O", "Fe", "O"]), &[1, 1, 1]).unwrap();
        assert_eq!(ret.len(), 2);
        assert_eq!(ret[0].symbol, "O");
        assert_eq!(ret[0].nions, 2);
        assert_eq!(ret[0].dos, arr2(&[[-1.0, 3.0, 2.0, 3.0],
                                       [ 0.0, 4.0, 7.0, 6.0]]));
    }

    #[test]
    fn test_order_independent() {
        let b = blocks();
        let rev = b.iter().rev().cloned().collect::<Vec<_>>();
        let energy = b[0].column(0);
        assert_eq!(sum_blocks(&b, energy).unwrap(), sum_blocks(&rev, energy).unwrap());
    }

    #[test]
    fn test_inconsistent_atom_count() {
        let err = group_by_species(&blocks(), &symbols(&["O", "Fe"]), &[2, 2]).unwrap_err();
        assert_eq!(err, DosError::InconsistentAtomCount { poscar: 4, doscar: 3 });
    }

    #[test]
    fn test_shape_mismatch() {
        let mut b = blocks();
        b[1] = arr2(&[[-1.0, 0.5, 0.5],
                      [ 0.0, 1.5, 1.5]]);
        let err = group_by_species(&b, &symbols(&["O", "Fe"]), &[2, 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
        assert_eq!(err, DosError::ShapeMismatch { expected: (2, 4), found: (2, 3) });

        assert!(atom_summed_total(&b).is_err());
    }

    #[test]
    fn test_atom_summed_total() {
        let total = atom_summed_total(&blocks()).unwrap();
        assert_eq!(total.to_vec(), vec![9.5, 21.5]);
    }

    #[test]
    fn test_zero_count_species() {
        let ret = group_by_species(&blocks(), &symbols(&["O", "Fe", "H"]), &[2, 1, 0]).unwrap();
        assert_eq!(ret[2].nions, 0);
        assert_eq!(ret[2].dos, arr2(&[[-1.0, 0.0, 0.0, 0.0],
                                       [ 0.0, 0.0, 0.0, 0.0]]));
    }
}
