use std::path::PathBuf;

use approx::assert_relative_eq;
use rsdos::{
    Doscar,
    Poscar,
    AggregatedDos,
    DosFormat,
    ErrorKind,
    OrbitalSchema,
    SpinPolarization,
};


macro_rules! get_fpath_in_current_dir {
    ($fname:expr) => {{
        let mut path = PathBuf::from(file!());
        path.pop();
        path.push($fname);
        path
    }}
}


#[test]
fn test_read_unpolarized() {
    let doscar = Doscar::from_file(&get_fpath_in_current_dir!("Fe2O3/DOSCAR")).unwrap();
    assert_eq!(doscar.nions, 5);
    assert_eq!(doscar.nedos, 5);
    assert_eq!(doscar.efermi, 1.5);
    assert_eq!(doscar.energy().to_vec(), vec![-8.0, -5.0, -2.0, 0.0, 2.0]);
    assert_eq!(doscar.pdos.len(), 5);
    assert!(doscar.pdos.iter().all(|b| b.dim() == (5, 4)));

    let format = doscar.format().unwrap();
    assert_eq!(format, DosFormat { spin: SpinPolarization::Unpolarized, orbitals: OrbitalSchema::Spd });
    assert!(format.is_consistent());
}


#[test]
fn test_read_polarized() {
    let doscar = Doscar::from_file(&get_fpath_in_current_dir!("NiO_spin/DOSCAR")).unwrap();
    let format = doscar.format().unwrap();
    assert_eq!(format.spin, SpinPolarization::Polarized);
    assert_eq!(format.orbitals, OrbitalSchema::LmResolvedSpin);
    assert!(format.is_consistent());

    let poscar = Poscar::from_file(&get_fpath_in_current_dir!("NiO_spin/POSCAR")).unwrap();
    let agg = AggregatedDos::new(&doscar, &poscar).unwrap();

    let names = agg.species.iter().map(|sp| sp.symbol.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Ni", "O"]);

    let ni = agg.species("Ni").unwrap();
    let icol = format.orbitals.column_of("dxy (↑)").unwrap();
    assert_eq!(icol, 9);
    assert_eq!(ni.orbital(icol).unwrap().to_vec(), vec![0.125, 0.375, 0.625, 0.875]);

    let o = agg.species("O").unwrap();
    let icol = format.orbitals.column_of("s (↓)").unwrap();
    assert_eq!(o.orbital(icol).unwrap().to_vec(), vec![0.5, 0.75, 1.0, 1.25]);

    for (a, b) in agg.total.iter().zip([10.125, 19.125, 28.125, 37.125]) {
        assert_relative_eq!(*a, b, epsilon = 1E-9);
    }
    for (a, b) in doscar.reported_total().iter().zip(agg.total.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1E-5);
    }
}


#[test]
fn test_unsupported_width() {
    let doscar = Doscar::from_file(&get_fpath_in_current_dir!("DOSCAR.ncol11")).unwrap();
    let err = doscar.format().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert!(err.to_string().contains("11 columns"));
}


#[test]
fn test_truncated() {
    let err = Doscar::from_file(&get_fpath_in_current_dir!("DOSCAR.truncated")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert!(err.to_string().contains("expected 41 lines"), "{}", err);
    assert!(err.to_string().contains("found 38"), "{}", err);
}


#[test]
fn test_no_projections() {
    let err = Doscar::from_file(&get_fpath_in_current_dir!("DOSCAR.no_lorbit")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert!(err.to_string().contains("LORBIT"), "{}", err);
}


#[test]
fn test_bad_token() {
    let err = Doscar::from_file(&get_fpath_in_current_dir!("DOSCAR.bad_token")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseError);
    assert_eq!(err.line(), Some(9));
    assert!(err.to_string().contains("0.1x"));
}


#[test]
fn test_missing_file() {
    let err = Doscar::from_file(&get_fpath_in_current_dir!("DOSCAR.does_not_exist")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}
