use std::fmt;

/// One axis of a ternary diagram: a single species or the sum of several
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Axis label, e.g. `Na2O+K2O`
    pub label: &'static str,
    /// Species summed into the component
    pub species: &'static [&'static str],
}

impl Component {
    const fn new(label: &'static str, species: &'static [&'static str]) -> Self {
        Self { label, species }
    }

    /// Whether a species (oxide formula or element symbol) contributes to this component
    pub fn includes(&self, species: &str) -> bool {
        self.species.iter().any(|s| *s == species)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// A named ternary system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TernarySystem {
    /// Display name
    pub name: &'static str,
    /// Axes in plotting order (bottom-left, top, bottom-right)
    pub components: [Component; 3],
}

impl TernarySystem {
    /// Axis labels
    pub fn labels(&self) -> [&'static str; 3] {
        [
            self.components[0].label,
            self.components[1].label,
            self.components[2].label,
        ]
    }

    /// Every species the system needs, in component order
    pub fn species(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.iter().flat_map(|c| c.species.iter().copied())
    }

    /// System name made safe for file names (`AFM_Na2OplusK2O-FeOplusFe2O3-MgO`)
    pub fn file_stem(&self) -> String {
        self.name
            .replace(' ', "_")
            .replace(['(', ')'], "")
            .replace('+', "plus")
    }
}

impl fmt::Display for TernarySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The supported ternary systems
pub static TERNARY_SYSTEMS: [TernarySystem; 5] = [
    TernarySystem {
        name: "SiO2-Al2O3-Fe2O3",
        components: [
            Component::new("SiO2", &["SiO2"]),
            Component::new("Al2O3", &["Al2O3"]),
            Component::new("Fe2O3", &["Fe2O3"]),
        ],
    },
    TernarySystem {
        name: "AFM (Na2O+K2O-FeO+Fe2O3-MgO)",
        components: [
            Component::new("Na2O+K2O", &["Na2O", "K2O"]),
            Component::new("FeO+Fe2O3", &["FeO", "Fe2O3"]),
            Component::new("MgO", &["MgO"]),
        ],
    },
    TernarySystem {
        name: "Fe-Ti-O",
        components: [
            Component::new("Fe", &["Fe"]),
            Component::new("Ti", &["Ti"]),
            Component::new("O", &["O"]),
        ],
    },
    TernarySystem {
        name: "CaO-Al2O3-SiO2",
        components: [
            Component::new("CaO", &["CaO"]),
            Component::new("Al2O3", &["Al2O3"]),
            Component::new("SiO2", &["SiO2"]),
        ],
    },
    TernarySystem {
        name: "CaO-Al2O3-Fe2O3",
        components: [
            Component::new("CaO", &["CaO"]),
            Component::new("Al2O3", &["Al2O3"]),
            Component::new("Fe2O3", &["Fe2O3"]),
        ],
    },
];

/// Names of the supported systems
pub fn available_systems() -> Vec<&'static str> {
    TERNARY_SYSTEMS.iter().map(|s| s.name).collect()
}

/// Look a system up by name (case-insensitive)
pub fn find_system(name: &str) -> Option<&'static TernarySystem> {
    TERNARY_SYSTEMS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
}
