//! # Chemistry Constants
//!
//! Atomic numbers, element-to-oxide stoichiometric conversion factors and the
//! unit constants used by table derivation.
//!
//! Oxide factors convert an element mass fraction into the mass fraction of its
//! reporting oxide: `Si × 2.1393 = SiO2`. Iron is reported as Fe2O3 (Fe³⁺).

/// 1 ppm expressed in weight percent
pub const PPM_TO_PERCENT: f64 = 0.0001;

/// Values at or below this many ppm are classified as trace
pub const TRACE_THRESHOLD_PPM: f64 = 1000.0;

/// Values at or below this many weight percent are classified as trace
pub const TRACE_THRESHOLD_PERCENT: f64 = 0.1;

/// Element symbols ordered by atomic number (index 0 is hydrogen, Z = 1)
const ELEMENTS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Element → (reporting oxide, conversion factor)
const OXIDE_FACTORS: &[(&str, &str, f64)] = &[
    ("Na", "Na2O", 1.3480),
    ("Mg", "MgO", 1.6583),
    ("Al", "Al2O3", 1.8895),
    ("Si", "SiO2", 2.1393),
    ("P", "P2O5", 2.2914),
    ("S", "SO3", 2.4972),
    // Chlorine is reported as the element
    ("Cl", "Cl", 1.0000),
    ("K", "K2O", 1.2046),
    ("Ca", "CaO", 1.3992),
    ("Ti", "TiO2", 1.6681),
    ("V", "V2O5", 1.7852),
    ("Cr", "Cr2O3", 1.4616),
    ("Mn", "MnO", 1.2912),
    ("Fe", "Fe2O3", 1.4297),
    ("Co", "CoO", 1.2715),
    ("Ni", "NiO", 1.2725),
    ("Cu", "CuO", 1.2518),
    ("Zn", "ZnO", 1.2448),
    ("Ga", "Ga2O3", 1.3442),
    ("Ge", "GeO2", 1.4408),
    ("As", "As2O3", 1.3203),
    ("Se", "SeO2", 1.4053),
    ("Rb", "Rb2O", 1.0936),
    ("Sr", "SrO", 1.1826),
    ("Y", "Y2O3", 1.2699),
    ("Zr", "ZrO2", 1.3508),
    ("Nb", "Nb2O5", 1.4305),
    ("Mo", "MoO3", 1.5003),
    ("Sn", "SnO2", 1.2696),
    ("Sb", "Sb2O3", 1.1973),
    ("Ba", "BaO", 1.1165),
    ("La", "La2O3", 1.1728),
    ("Ce", "CeO2", 1.2284),
    ("Pr", "Pr6O11", 1.1703),
    ("Nd", "Nd2O3", 1.1664),
    ("Sm", "Sm2O3", 1.1596),
    ("Eu", "Eu2O3", 1.1579),
    ("Gd", "Gd2O3", 1.1526),
    ("Tb", "Tb4O7", 1.1762),
    ("Dy", "Dy2O3", 1.1477),
    ("Ho", "Ho2O3", 1.1455),
    ("Er", "Er2O3", 1.1435),
    ("Tm", "Tm2O3", 1.1421),
    ("Yb", "Yb2O3", 1.1387),
    ("Lu", "Lu2O3", 1.1371),
    ("Hf", "HfO2", 1.1793),
    ("Ta", "Ta2O5", 1.2211),
    ("W", "WO3", 1.2610),
    ("Pb", "PbO", 1.0772),
    ("Bi", "Bi2O3", 1.1148),
    ("Th", "ThO2", 1.1379),
    ("U", "U3O8", 1.1792),
];

/// Reporting oxide of an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OxideFactor {
    /// Element symbol (e.g. "Al")
    pub element: &'static str,
    /// Oxide formula (e.g. "Al2O3")
    pub formula: &'static str,
    /// Multiplier from element mass to oxide mass
    pub factor: f64,
}

impl OxideFactor {
    /// Convert an element concentration to its oxide equivalent (unit unchanged)
    pub fn convert(&self, concentration: f64) -> f64 {
        concentration * self.factor
    }
}

/// Atomic number of an element symbol, `None` for unknown symbols
pub fn atomic_number(symbol: &str) -> Option<u8> {
    ELEMENTS
        .iter()
        .position(|&s| s == symbol)
        .map(|idx| (idx + 1) as u8)
}

/// Element symbol for an atomic number
pub fn symbol(z: u8) -> Option<&'static str> {
    ELEMENTS.get((z as usize).checked_sub(1)?).copied()
}

/// Oxide conversion for an element, `None` if the element has no reporting oxide
pub fn oxide_for(element: &str) -> Option<OxideFactor> {
    OXIDE_FACTORS
        .iter()
        .find(|(e, _, _)| *e == element)
        .map(|&(element, formula, factor)| OxideFactor {
            element,
            formula,
            factor,
        })
}

/// Leading element symbol of an analyte label.
///
/// Handles plain symbols (`Fe`), oxide formulas (`Al2O3`) and annotated
/// formulas (`Fe2O3 (Iron III Oxide)`).
pub fn base_element(label: &str) -> Option<&str> {
    let label = label.split('(').next().unwrap_or(label).trim();
    let bytes = label.as_bytes();
    if bytes.is_empty() || !bytes[0].is_ascii_uppercase() {
        return None;
    }
    let end = if bytes.len() > 1 && bytes[1].is_ascii_lowercase() {
        2
    } else {
        1
    };
    Some(&label[..end])
}

/// Atomic number of the element an analyte label is built on (0 when unknown)
pub fn analyte_z(label: &str) -> u8 {
    base_element(label).and_then(atomic_number).unwrap_or(0)
}
