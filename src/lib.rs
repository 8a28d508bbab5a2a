pub mod types;
pub mod error;
pub mod settings;
pub mod vasp_parsers;
pub mod orbitals;
pub mod mendeleev;
pub mod aggregate;
pub mod ranges;
pub mod selection;
pub mod plot;
pub mod commands;
pub mod cli;

pub use types::Result;
pub use cli::OptProcess;

pub use error::{
    DosError,
    DosResult,
    ErrorKind,
};

pub use vasp_parsers::{
    doscar::Doscar,
    poscar::Poscar,
};

pub use orbitals::{
    DosFormat,
    OrbitalSchema,
    SpinPolarization,
};

pub use aggregate::{
    AggregatedDos,
    SpeciesDos,
};

pub use ranges::{
    AxisLimits,
    AxisRanges,
    estimate_xmax,
};

pub use selection::{
    LineSeries,
    LineStyle,
    Selection,
};

pub use plot::{
    DisplayFlags,
    DosPlot,
    PlotParams,
};

pub use settings::{
    PlotDefaults,
    Settings,
};
