//! Turning the user's selection state into line series.
//!
//! A selection TOML file looks like
//!
//! ```toml
//! [orbitals]
//! Fe = ["dxy", "dz²"]
//!
//! [totals]
//! Total = true
//! Fe    = true
//! O     = false
//!
//! [colors]
//! Fe = "orange"
//! ```

use std::{
    fs,
    path::Path,
    sync::OnceLock,
};

use anyhow::{
    bail,
    Context,
};
use indexmap::IndexMap;
use log::warn;
use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    aggregate::AggregatedDos,
    settings::Settings,
    types::Result,
};


/// Key of the atom-summed total line in `totals` and `colors`.
pub const TOTAL_KEY: &str = "Total";

pub const TOTAL_WIDTH:   f64 = 2.25;
pub const SPECIES_WIDTH: f64 = 2.5;
pub const ORBITAL_WIDTH: f64 = 1.5;


const NAMED_COLORS: &[&str] = &[
        "aliceblue",            "antiquewhite",     "aqua",             "aquamarine",       "azure",
        "beige",                "bisque",           "black",            "blanchedalmond",   "blue",
        "blueviolet",           "brown",            "burlywood",        "cadetblue",        "chartreuse",
        "chocolate",            "coral",            "cornflowerblue",   "cornsilk",         "crimson",
        "cyan",                 "darkblue",         "darkcyan",         "darkgoldenrod",    "darkgray",
        "darkgrey",             "darkgreen",        "darkkhaki",        "darkmagenta",      "darkolivegreen",
        "darkorange",           "darkorchid",       "darkred",          "darksalmon",       "darkseagreen",
        "darkslateblue",        "darkslategray",    "darkslategrey",    "darkturquoise",    "darkviolet",
        "deeppink",             "deepskyblue",      "dimgray",          "dimgrey",          "dodgerblue",
        "firebrick",            "floralwhite",      "forestgreen",      "fuchsia",          "gainsboro",
        "ghostwhite",           "gold",             "goldenrod",        "gray",             "grey",
        "green",                "greenyellow",      "honeydew",         "hotpink",          "indianred",
        "indigo",               "ivory",            "khaki",            "lavender",         "lavenderblush",
        "lawngreen",            "lemonchiffon",     "lightblue",        "lightcoral",       "lightcyan",
        "lightgoldenrodyellow", "lightgray",        "lightgrey",        "lightgreen",       "lightpink",
        "lightsalmon",          "lightseagreen",    "lightskyblue",     "lightslategray",   "lightslategrey",
        "lightsteelblue",       "lightyellow",      "lime",             "limegreen",        "linen",
        "magenta",              "maroon",           "mediumaquamarine", "mediumblue",       "mediumorchid",
        "mediumpurple",         "mediumseagreen",   "mediumslateblue",  "mediumspringgreen","mediumturquoise",
        "mediumvioletred",      "midnightblue",     "mintcream",        "mistyrose",        "moccasin",
        "navajowhite",          "navy",             "oldlace",          "olive",            "olivedrab",
        "orange",               "orangered",        "orchid",           "palegoldenrod",    "palegreen",
        "paleturquoise",        "palevioletred",    "papayawhip",       "peachpuff",        "peru",
        "pink",                 "plum",             "powderblue",       "purple",           "red",
        "rosybrown",            "royalblue",        "saddlebrown",      "salmon",           "sandybrown",
        "seagreen",             "seashell",         "sienna",           "silver",           "skyblue",
        "slateblue",            "slategray",        "slategrey",        "snow",             "springgreen",
        "steelblue",            "tan",              "teal",             "thistle",          "tomato",
        "turquoise",            "violet",           "wheat",            "white",            "whitesmoke",
        "yellow",               "yellowgreen",      "transparent",
    ];


/// CSS named colour or `#rgb`/`#rrggbb` hex code.
pub fn is_valid_color(input: &str) -> bool {
    static HEX: OnceLock<Regex> = OnceLock::new();
    let hex = HEX.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap()
    });

    NAMED_COLORS.contains(&input.to_ascii_lowercase().as_ref()) || hex.is_match(input)
}


#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    /// species -> orbital labels to draw separately
    pub orbitals: IndexMap<String, Vec<String>>,
    /// species or `Total` -> draw the summed line
    pub totals:   IndexMap<String, bool>,
    /// species or `Total` -> line colour
    pub colors:   IndexMap<String, String>,
}


impl Selection {
    /// State right after loading a file: every total on, no orbital selected.
    pub fn default_for(agg: &AggregatedDos) -> Self {
        let totals = std::iter::once(TOTAL_KEY.to_owned())
            .chain(agg.species.iter().map(|sp| sp.symbol.clone()))
            .map(|k| (k, true))
            .collect();

        Self {
            orbitals: IndexMap::new(),
            totals,
            colors:   IndexMap::new(),
        }
    }

    pub fn from_toml_str(txt: &str) -> Result<Self> {
        let ret: Self = toml::from_str(txt)
            .context("Invalid selection")?;
        ret.validate()?;
        Ok(ret)
    }

    pub fn from_file(path: &(impl AsRef<Path> + ?Sized)) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .with_context(|| format!("Cannot read selection file {:?}", path))?;
        Self::from_toml_str(&txt)
            .with_context(|| format!("Parse selection file {:?} failed.", path))
    }

    /// Entries of `other` replace those of `self` key by key.
    pub fn merge(mut self, other: Self) -> Self {
        self.orbitals.extend(other.orbitals);
        self.totals.extend(other.totals);
        self.colors.extend(other.colors);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (key, color) in self.colors.iter() {
            if !is_valid_color(color) {
                bail!("The colour {:?} of {} is neither a named colour nor a valid hex code. \
See \"https://developer.mozilla.org/en-US/docs/Web/CSS/color_value\" for available named colours.", color, key);
            }
        }
        Ok(())
    }

    /// A TOML template listing every species and the orbitals it offers.
    pub fn template(agg: &AggregatedDos) -> Result<String> {
        let labels = agg.format.orbitals.labels();
        let mut ret = String::new();
        ret.push_str(&format!("# Available orbitals: {}\n", labels.join(", ")));
        ret.push_str("# Fill `orbitals` to draw single orbital contributions, e.g.\n");
        ret.push_str(&format!("# {} = [\"{}\"]\n\n", agg.species.first().map(|sp| sp.symbol.as_str()).unwrap_or("Fe"), labels[0]));

        let mut sel = Self::default_for(agg);
        sel.orbitals = agg.species.iter()
            .map(|sp| (sp.symbol.clone(), vec![]))
            .collect();
        ret.push_str(&toml::to_string_pretty(&sel)?);
        Ok(ret)
    }

    fn shows(&self, key: &str) -> bool {
        self.totals.get(key)
            .copied()
            .unwrap_or(key == TOTAL_KEY)
    }

    fn color_of(&self, key: &str, agg: &AggregatedDos, settings: &Settings) -> String {
        if let Some(c) = self.colors.get(key) {
            return c.clone();
        }
        if key == TOTAL_KEY {
            return settings.total_color.clone();
        }
        let irank = agg.rank_of(key).unwrap_or(0);
        settings.palette[irank % settings.palette.len()].clone()
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}


/// One named curve, x is DOS and y is E - E_fermi.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    pub color: String,
    pub style: LineStyle,
    pub width: f64,
    pub x:     Vec<f64>,
    pub y:     Vec<f64>,
}


/// Series to draw for `sel`, in drawing order.
///
/// `Total` comes first, then each species in Mendeleev order with its summed
/// line followed by its selected orbitals. Orbital labels the schema does not
/// know are skipped with a warning.
pub fn project(agg: &AggregatedDos, sel: &Selection, settings: &Settings) -> Vec<LineSeries> {
    let schema = agg.format.orbitals;
    let energy = agg.energy.to_vec();
    let mut ret = vec![];

    if sel.shows(TOTAL_KEY) {
        ret.push(LineSeries {
            label: TOTAL_KEY.to_owned(),
            color: sel.color_of(TOTAL_KEY, agg, settings),
            style: LineStyle::Solid,
            width: TOTAL_WIDTH,
            x:     agg.total.to_vec(),
            y:     energy.clone(),
        });
    }

    for symbol in sel.orbitals.keys().chain(sel.totals.keys()) {
        if symbol != TOTAL_KEY && agg.species(symbol).is_none() {
            warn!("Species {:?} is not in POSCAR, ignored.", symbol);
        }
    }

    for sp in agg.species.iter() {
        let color = sel.color_of(&sp.symbol, agg, settings);

        if sel.shows(&sp.symbol) {
            ret.push(LineSeries {
                label: sp.symbol.clone(),
                color: color.clone(),
                style: LineStyle::Solid,
                width: SPECIES_WIDTH,
                x:     sp.total().to_vec(),
                y:     energy.clone(),
            });
        }

        let orbitals = match sel.orbitals.get(&sp.symbol) {
            Some(v) => v,
            None => continue,
        };

        for orbital in orbitals.iter() {
            let column = schema.column_of(orbital)
                .and_then(|icol| sp.orbital(icol));
            let column = match column {
                Some(c) => c,
                None => {
                    warn!("Orbital {:?} is not available for {} DOSCAR, skipped.", orbital, schema);
                    continue;
                },
            };

            ret.push(LineSeries {
                label: format!("{} ({})", sp.symbol, orbital),
                color: color.clone(),
                style: LineStyle::Dashed,
                width: ORBITAL_WIDTH,
                x:     column.to_vec(),
                y:     energy.clone(),
            });
        }
    }

    ret
}
