use std::{
    io::Write,
    fs,
    path::Path,
};

use anyhow::{
    anyhow,
    bail,
    Context,
};
use log::info;
use rayon;

use crate::{
    types::Result,
    vasp_parsers::{
        doscar::Doscar,
        poscar::Poscar,
    },
    aggregate::AggregatedDos,
    selection::LineSeries,
};


/// Write equally long columns side by side, with `comment` as the header line.
pub fn write_array_to_txt(file_name: &(impl AsRef<Path> + ?Sized), ys: &[&[f64]], comment: &str) -> Result<()> {
    let ncol = ys.len();

    let x = ys.first().context("At lease one data set is needed")?;
    let nrow = x.len();

    if nrow == 0 || !ys.iter().all(|y| y.len() == nrow) {
        bail!("[WRT_ARRAY]: input data with zero length or they don't have consistent lengths");
    }

    let mut f = fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(file_name)?;

    writeln!(f, "# {}", comment.trim())?;

    for irow in 0 .. nrow {
        let mut s = String::with_capacity(17 * ncol + 1);
        for y in ys.iter() {
            s.push_str(&format!("  {:15.6}", y[irow]));
        }
        s.push('\n');

        f.write_all(s.as_bytes())?;
    }

    Ok(())
}


/// Energy column followed by one column per series, labels in the header.
pub fn write_series_to_txt(file_name: &(impl AsRef<Path> + ?Sized), energy: &[f64], series: &[LineSeries]) -> Result<()> {
    let header = std::iter::once("E-Ef(eV)".to_owned())
        .chain(series.iter().map(|s| s.label.replace(' ', "")))
        .collect::<Vec<_>>()
        .join("  ");

    let columns = std::iter::once(energy)
        .chain(series.iter().map(|s| s.x.as_slice()))
        .collect::<Vec<_>>();

    write_array_to_txt(file_name, &columns, &header)
}


/// Read DOSCAR and POSCAR in parallel and aggregate them.
pub fn read_inputs(doscar: &Path, poscar: &Path) -> Result<(Doscar, AggregatedDos)> {
    let mut dos: Result<Doscar> = Err(anyhow!(""));
    let mut pos: Result<Poscar> = Err(anyhow!(""));

    rayon::scope(|s| {
        s.spawn(|_| {
            info!("Reading {:?}", doscar);
            dos = Doscar::from_file(doscar).map_err(anyhow::Error::from);
        });
        s.spawn(|_| {
            info!("Reading {:?}", poscar);
            pos = Poscar::from_file(poscar).map_err(anyhow::Error::from);
        });
    });

    let dos = dos.context(format!("Parse file {:?} failed.", doscar))?;
    let pos = pos.context(format!("Parse file {:?} failed.", poscar))?;

    let agg = AggregatedDos::new(&dos, &pos)
        .context(format!("{:?} and {:?} do not describe the same system.", doscar, poscar))?;

    Ok((dos, agg))
}


#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;
    use crate::selection::LineStyle;

    #[test]
    fn test_write_array_to_txt() {
        let dir = TempDir::new("rsdos_txt").unwrap();
        let fname = dir.path().join("out.txt");

        write_array_to_txt(&fname, &[&[1.0, 2.0], &[3.5, -4.25]], "x  y").unwrap();
        let txt = fs::read_to_string(&fname).unwrap();
        let lines = txt.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "# x  y");
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), vec!["2.000000", "-4.250000"]);

        assert!(write_array_to_txt(&fname, &[&[1.0, 2.0], &[3.5]], "").is_err());
        assert!(write_array_to_txt(&fname, &[], "").is_err());
    }

    #[test]
    fn test_write_series_to_txt() {
        let dir = TempDir::new("rsdos_txt").unwrap();
        let fname = dir.path().join("dos.txt");
        let series = vec![LineSeries {
            label: "Fe (d)".to_owned(),
            color: "blue".to_owned(),
            style: LineStyle::Dashed,
            width: 1.5,
            x:     vec![0.5, 1.5],
            y:     vec![-1.0, 0.0],
        }];

        write_series_to_txt(&fname, &[-1.0, 0.0], &series).unwrap();
        let txt = fs::read_to_string(&fname).unwrap();
        assert!(txt.starts_with("# E-Ef(eV)  Fe(d)\n"));
        assert_eq!(txt.lines().count(), 3);
    }
}
