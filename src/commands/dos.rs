use std::{
    fs,
    path::PathBuf,
};

use clap::Args;
use log::{
    info,
    warn,
};

use crate::{
    types::Result,
    OptProcess,
    settings::Settings,
    selection::Selection,
    ranges::AxisLimits,
    plot::{
        DisplayFlags,
        DosPlot,
        PlotParams,
        system_name_of,
    },
    commands::common::{
        read_inputs,
        write_series_to_txt,
    },
};


#[derive(Debug, Args)]
/// Plot the total and projected density of states from DOSCAR and POSCAR.
///
/// The atom-summed total DOS and the summed DOS of every species are drawn by
/// default. Orbital contributions, colours and toggles are chosen in a selection
/// file, run with '--gen-template' to get one listing the available orbitals.
///
/// Energies are shifted so that the Fermi level sits at zero.
pub struct Dos {
    #[arg(default_value = "./DOSCAR")]
    /// DOSCAR file path. Set 'LORBIT' in INCAR to get the projected DOS written.
    doscar: PathBuf,

    #[arg(long, default_value = "./POSCAR")]
    /// POSCAR file path, element symbols are required (VASP 5 format).
    poscar: PathBuf,

    #[arg(short, long)]
    /// Selection file in TOML format, picks orbitals, toggles lines and sets colours.
    config: Option<PathBuf>,

    #[arg(long)]
    /// Settings file in TOML format, overrides the user settings and the built-in defaults.
    settings: Option<PathBuf>,

    #[arg(long)]
    /// Write a selection template for the given DOSCAR and POSCAR to 'dos.toml' and exit.
    gen_template: bool,

    #[arg(long, allow_negative_numbers = true)]
    /// Lower limit of the DOS axis.
    xmin: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    /// Upper limit of the DOS axis, estimated from the data within the energy window if omitted.
    xmax: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    /// Lower limit of the energy axis, relative to the Fermi level.
    ymin: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    /// Upper limit of the energy axis, relative to the Fermi level.
    ymax: Option<f64>,

    #[arg(long)]
    /// Vertical position of the legend in fraction of the plot height.
    legend_y: Option<f64>,

    #[arg(long)]
    /// Name of the system shown in the title, the folder holding DOSCAR by default.
    title: Option<String>,

    #[arg(long)]
    /// Hide the plot title.
    no_title: bool,

    #[arg(long)]
    /// Hide the DOS axis title.
    no_xtitle: bool,

    #[arg(long)]
    /// Hide the energy axis title.
    no_ytitle: bool,

    #[arg(long)]
    /// Hide the DOS axis tick labels.
    no_xticks: bool,

    #[arg(long)]
    /// Hide the energy axis tick labels.
    no_yticks: bool,

    #[arg(long, short = 'o', default_value = "dos.html")]
    /// Write the plot to html and view it in the web browser.
    htmlout: PathBuf,

    #[arg(long, default_value = "dos.txt")]
    /// Write the raw plot data as txt file in order to replot it with more advanced tools.
    txtout: PathBuf,

    #[arg(long)]
    /// Write the figure description (series, ranges and titles) as JSON.
    jsonout: Option<PathBuf>,

    #[arg(long)]
    /// Open default browser to see the plot immediately.
    show: bool,

    #[arg(long)]
    /// Render the plot and print the rendered code to stdout.
    to_inline_html: bool,
}


impl Dos {
    fn limits(&self) -> AxisLimits {
        AxisLimits {
            xmin: self.xmin,
            xmax: self.xmax,
            ymin: self.ymin,
            ymax: self.ymax,
        }
    }

    fn display(&self) -> DisplayFlags {
        DisplayFlags {
            plot_title: !self.no_title,
            x_title:    !self.no_xtitle,
            y_title:    !self.no_ytitle,
            x_ticks:    !self.no_xticks,
            y_ticks:    !self.no_yticks,
        }
    }
}


impl OptProcess for Dos {
    fn process(&self) -> Result<()> {
        let settings = Settings::load(self.settings.as_deref())?;
        let (_, agg) = read_inputs(&self.doscar, &self.poscar)?;

        info!("{}", agg.format.description());

        if self.gen_template {
            let fname = "dos.toml";
            info!("Writing selection template to {:?}", fname);
            fs::write(fname, Selection::template(&agg)?)?;
            return Ok(());
        }

        let mut sel = Selection::default_for(&agg);
        if let Some(config) = self.config.as_ref() {
            info!("Reading selection from {:?}", config);
            sel = sel.merge(Selection::from_file(config)?);
        }

        let limits = self.limits();
        if let (Some(ymin), Some(ymax)) = (limits.ymin, limits.ymax) {
            if ymin >= ymax {
                warn!("Energy range [{}, {}] is empty, nothing will be visible.", ymin, ymax);
            }
        }

        let params = PlotParams {
            limits,
            legend_y: self.legend_y,
            display:  self.display(),
            system:   self.title.clone().or_else(|| system_name_of(&self.doscar)),
        };
        params.validate()?;
        let dosplot = DosPlot::build(&agg, &params, &sel, &settings);
        info!("Plotting {} lines, DOS range {:?}, energy range {:?}",
              dosplot.series.len(), dosplot.x_range, dosplot.y_range);

        info!("Writing raw plot data to {:?}", self.txtout);
        write_series_to_txt(&self.txtout, &agg.energy.to_vec(), &dosplot.series)?;

        if let Some(jsonout) = self.jsonout.as_ref() {
            info!("Writing figure description to {:?}", jsonout);
            fs::write(jsonout, serde_json::to_string_pretty(&dosplot)?)?;
        }

        let plot = dosplot.to_plotly();

        info!("Writing to {:?}", self.htmlout);
        plot.write_html(&self.htmlout);

        if self.show {
            plot.show();
        }

        if self.to_inline_html {
            info!("Printing inline html to stdout ...");
            println!("{}", plot.to_inline_html(None));
        }

        Ok(())
    }
}
