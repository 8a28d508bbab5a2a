//! Figure description and its rendering with plotly.

use std::path::Path;

use plotly::{
    Plot,
    Scatter,
    Layout,
    common::{
        Anchor,
        DashType,
        Font,
        Line,
        Mode,
        Title,
    },
    layout::{
        Annotation,
        Axis,
        Legend,
        Margin,
        Shape,
        ShapeLine,
        ShapeType,
    },
};
use anyhow::ensure;
use serde::Serialize;

use crate::{
    aggregate::AggregatedDos,
    ranges::{
        AxisLimits,
        AxisRanges,
    },
    selection::{
        project,
        LineSeries,
        LineStyle,
        Selection,
    },
    settings::Settings,
    types::Result,
};


const FONT_FAMILY: &str = "DejaVu Sans, Arial, sans-serif";
const FERMI_LABEL: &str = "<i>E</i><sub><i>F</i></sub>";


/// Which titles and tick labels are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayFlags {
    pub plot_title: bool,
    pub x_title:    bool,
    pub y_title:    bool,
    pub x_ticks:    bool,
    pub y_ticks:    bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            plot_title: true,
            x_title:    true,
            y_title:    true,
            x_ticks:    true,
            y_ticks:    true,
        }
    }
}


#[derive(Clone, Debug, Default)]
pub struct PlotParams {
    pub limits:   AxisLimits,
    pub legend_y: Option<f64>,
    pub display:  DisplayFlags,
    /// Name of the calculated system, usually the folder holding DOSCAR.
    pub system:   Option<String>,
}


impl PlotParams {
    pub fn validate(&self) -> Result<()> {
        if let Some(y) = self.legend_y {
            ensure!((0.0 ..= 1.0).contains(&y), "legend_y must be within [0, 1], got {}", y);
        }
        Ok(())
    }
}


/// Everything a renderer needs to draw the figure, free of any plotting library type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DosPlot {
    pub series:       Vec<LineSeries>,
    pub x_range:      [f64; 2],
    pub y_range:      [f64; 2],
    pub title:        Option<String>,
    pub x_title:      Option<String>,
    pub y_title:      Option<String>,
    pub show_x_ticks: bool,
    pub show_y_ticks: bool,
    pub legend_y:     f64,
}


/// Replace ASCII digits with their Unicode subscript forms, `Fe2O3` becomes `Fe₂O₃`.
pub fn subscript_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x2080 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}


/// System name from the folder holding `path`.
pub fn system_name_of(path: &Path) -> Option<String> {
    let path = path.canonicalize().ok()?;
    path.parent()?
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
}


impl DosPlot {
    pub fn build(agg: &AggregatedDos, params: &PlotParams, sel: &Selection, settings: &Settings) -> Self {
        let ranges = AxisRanges::resolve(&params.limits, &settings.defaults, agg.energy.view(), agg.total.view());
        let series = project(agg, sel, settings);
        let display = params.display;

        let title = if display.plot_title {
            Some(match params.system.as_deref() {
                Some(name) if !name.is_empty() => format!("{} DOS", subscript_digits(name)),
                _ => "DOS".to_owned(),
            })
        } else {
            None
        };

        Self {
            series,
            x_range:      ranges.x,
            y_range:      ranges.y,
            title,
            x_title:      display.x_title.then(|| "DOS".to_owned()),
            y_title:      display.y_title.then(|| "energy (eV)".to_owned()),
            show_x_ticks: display.x_ticks,
            show_y_ticks: display.y_ticks,
            legend_y:     params.legend_y.unwrap_or(settings.defaults.legend_y),
        }
    }

    /// Same figure with axis ranges back to their defaults.
    pub fn reset_ranges(mut self, agg: &AggregatedDos, settings: &Settings) -> Self {
        let ranges = AxisRanges::reset(&settings.defaults, agg.energy.view(), agg.total.view());
        self.x_range = ranges.x;
        self.y_range = ranges.y;
        self
    }

    pub fn to_plotly(&self) -> Plot {
        let mut plot = Plot::new();

        for s in self.series.iter() {
            let mut line = Line::new()
                .color(s.color.clone())
                .width(s.width);
            if s.style == LineStyle::Dashed {
                line = line.dash(DashType::Dash);
            }

            let trace = Scatter::new(s.x.clone(), s.y.clone())
                .mode(Mode::Lines)
                .name(&s.label)
                .line(line);
            plot.add_trace(trace);
        }

        let font = || Font::new().family(FONT_FAMILY).size(20).color("black");
        let title = |t: &Option<String>| Title::with_text(t.as_deref().unwrap_or("")).font(font());

        let [xmin, xmax] = self.x_range;

        let fermi_line = Shape::new()
            .shape_type(ShapeType::Line)
            .x0(xmin)
            .x1(xmax)
            .y0(0.0)
            .y1(0.0)
            .line(ShapeLine::new()
                  .color("black")
                  .width(2.0)
                  .dash(DashType::Dash));

        let frame = Shape::new()
            .shape_type(ShapeType::Rect)
            .x_ref("paper")
            .y_ref("paper")
            .x0(0.0)
            .x1(1.0)
            .y0(0.0)
            .y1(1.0)
            .line(ShapeLine::new()
                  .color("black")
                  .width(2.0));

        let fermi_label = Annotation::new()
            .x_ref("x")
            .y_ref("y")
            .x(xmax)
            .y(0.2)
            .text(FERMI_LABEL)
            .show_arrow(false)
            .font(font())
            .x_anchor(Anchor::Left)
            .y_anchor(Anchor::Top);

        let layout = Layout::new()
            .font(Font::new().family(FONT_FAMILY).size(18).color("black"))
            .title(title(&self.title))
            .x_axis(Axis::new()
                    .title(title(&self.x_title))
                    .range(self.x_range.to_vec())
                    .show_grid(false)
                    .zero_line(true)
                    .zero_line_color("black")
                    .zero_line_width(3)
                    .show_tick_labels(self.show_x_ticks))
            .y_axis(Axis::new()
                    .title(title(&self.y_title))
                    .range(self.y_range.to_vec())
                    .show_grid(false)
                    .zero_line(false)
                    .show_tick_labels(self.show_y_ticks))
            .legend(Legend::new()
                    .x(0.95)
                    .y(self.legend_y)
                    .x_anchor(Anchor::Right)
                    .y_anchor(Anchor::Top))
            .plot_background_color("white")
            .paper_background_color("white")
            .margin(Margin::new().left(50).right(50).top(50).bottom(50))
            .height(725)
            .width(400)
            .shapes(vec![fermi_line, frame])
            .annotations(vec![fermi_label]);
        plot.set_layout(layout);

        plot
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{
        arr1,
        arr2,
    };
    use crate::{
        aggregate::SpeciesDos,
        orbitals::DosFormat,
    };

    fn sample() -> AggregatedDos {
        AggregatedDos {
            format:  DosFormat::detect(3, 4).unwrap(),
            energy:  arr1(&[-1.0, 0.0, 1.0]),
            species: vec![
                SpeciesDos {
                    symbol: "Fe".to_owned(),
                    nions:  1,
                    dos:    arr2(&[[-1.0, 1.0, 1.0, 3.0],
                                   [ 0.0, 1.0, 2.0, 6.0],
                                   [ 1.0, 0.0, 0.0, 1.0]]),
                },
            ],
            total:   arr1(&[5.0, 9.0, 1.0]),
        }
    }

    #[test]
    fn test_subscript_digits() {
        assert_eq!(subscript_digits("Fe2O3"), "Fe₂O₃");
        assert_eq!(subscript_digits("TiO2_110"), "TiO₂_₁₁₀");
        assert_eq!(subscript_digits("bulk"), "bulk");
    }

    #[test]
    fn test_build() {
        let agg = sample();
        let params = PlotParams {
            system: Some("Fe2O3".to_owned()),
            ..Default::default()
        };
        let settings = Settings::default();
        let plot = DosPlot::build(&agg, &params, &Selection::default_for(&agg), &settings);

        assert_eq!(plot.title.as_deref(), Some("Fe₂O₃ DOS"));
        assert_eq!(plot.x_title.as_deref(), Some("DOS"));
        assert_eq!(plot.y_title.as_deref(), Some("energy (eV)"));
        assert_eq!(plot.x_range, [0.0, 10.0]);
        assert_eq!(plot.y_range, [-8.0, 2.0]);
        assert_eq!(plot.legend_y, 0.26);
        assert_eq!(plot.series.len(), 2);
        assert!(plot.show_x_ticks && plot.show_y_ticks);
    }

    #[test]
    fn test_flags_and_reset() {
        let agg = sample();
        let params = PlotParams {
            limits:   AxisLimits { xmax: Some(3.0), ymin: Some(-0.5), ..Default::default() },
            legend_y: Some(0.8),
            display:  DisplayFlags { plot_title: false, y_ticks: false, ..Default::default() },
            system:   None,
        };
        let settings = Settings::default();
        let plot = DosPlot::build(&agg, &params, &Selection::default_for(&agg), &settings);

        assert!(plot.title.is_none());
        assert!(!plot.show_y_ticks);
        assert_eq!(plot.x_range, [0.0, 3.0]);
        assert_eq!(plot.y_range, [-0.5, 2.0]);
        assert_eq!(plot.legend_y, 0.8);

        let plot = plot.reset_ranges(&agg, &settings);
        assert_eq!(plot.x_range, [0.0, 10.0]);
        assert_eq!(plot.y_range, [-8.0, 2.0]);
    }

    #[test]
    fn test_legend_y_bounds() {
        let mut params = PlotParams::default();
        assert!(params.validate().is_ok());

        params.legend_y = Some(1.0);
        assert!(params.validate().is_ok());

        params.legend_y = Some(1.5);
        assert!(params.validate().is_err());

        params.legend_y = Some(-0.1);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_to_plotly() {
        let agg = sample();
        let plot = DosPlot::build(&agg, &PlotParams::default(), &Selection::default_for(&agg), &Settings::default());
        let html = plot.to_plotly().to_inline_html(None);
        assert!(html.contains("Total"));
        assert!(html.contains("energy (eV)"));
    }
}
