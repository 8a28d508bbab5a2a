use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use itertools::Itertools;

use crate::{
    types::Result,
    OptProcess,
    aggregate::AggregatedDos,
    mendeleev::mendeleev_number,
    vasp_parsers::doscar::Doscar,
    commands::common::read_inputs,
};


#[derive(Debug, Args)]
/// Print a summary of DOSCAR and POSCAR: detected format, species and available orbitals.
pub struct Info {
    #[arg(default_value = "./DOSCAR")]
    /// DOSCAR file path.
    doscar: PathBuf,

    #[arg(long, default_value = "./POSCAR")]
    /// POSCAR file path.
    poscar: PathBuf,
}


/// Largest absolute difference between the file's total DOS and the atom-summed one.
pub fn total_deviation(doscar: &Doscar, agg: &AggregatedDos) -> f64 {
    (&doscar.reported_total() - &agg.total)
        .iter()
        .fold(0.0f64, |acc, d| acc.max(d.abs()))
}


pub fn summary(doscar: &Doscar, agg: &AggregatedDos) -> String {
    let mut output = String::with_capacity(512);
    let emin = agg.energy.iter().copied().fold(f64::INFINITY, f64::min);
    let emax = agg.energy.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    output.push_str("----------------------------------------\n");
    output.push_str(&format!(" {:<12} {}\n", "NIONS",  doscar.nions.to_string().bright_cyan()));
    output.push_str(&format!(" {:<12} {}\n", "NEDOS",  doscar.nedos.to_string().bright_cyan()));
    output.push_str(&format!(" {:<12} {} eV\n", "E-fermi", format!("{:.4}", doscar.efermi).bright_cyan()));
    output.push_str(&format!(" {:<12} [{:.3}, {:.3}] eV\n", "E-Ef range", emin, emax));
    output.push_str(&format!(" {:<12} {}\n", "Format", agg.format.orbitals.to_string().bright_yellow()));
    output.push_str(&format!(" Detected {} columns in DOSCAR\n", agg.format.orbitals.ncol()));
    output.push_str("----------------------------------------\n");

    for sp in agg.species.iter() {
        let rank = mendeleev_number(&sp.symbol)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_owned());
        output.push_str(&format!(" {:<4} x {:<5} Mendeleev number {:>4}\n",
                                 sp.symbol.bright_green(), sp.nions, rank));
    }

    output.push_str("----------------------------------------\n");
    output.push_str(&format!(" Orbitals: {}\n", agg.format.orbitals.labels().iter().join(", ")));
    output.push_str(&format!(" Max |total - sum of projections|: {:.4}\n", total_deviation(doscar, agg)));
    output.push_str("----------------------------------------\n");
    output.push_str(&agg.format.description());

    output
}


impl OptProcess for Info {
    fn process(&self) -> Result<()> {
        let (doscar, agg) = read_inputs(&self.doscar, &self.poscar)?;
        if !agg.format.is_consistent() {
            println!("{}", "Total and projected DOS blocks disagree on spin polarization.".bright_red());
        }
        println!("{}", summary(&doscar, &agg));
        Ok(())
    }
}
