//! Static seasonal illness reference.

/// Illnesses commonly seen in one season
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Season {
    pub name: &'static str,
    pub illnesses: &'static [&'static str],
}

const SEASONS: &[Season] = &[
    Season {
        name: "Winter",
        illnesses: &["Common Cold", "Flu", "Sore Throat"],
    },
    Season {
        name: "Summer",
        illnesses: &["Heat Exhaustion", "Food Poisoning", "Dehydration"],
    },
    Season {
        name: "Monsoon",
        illnesses: &["Viral Fever", "Dengue", "Respiratory Infections"],
    },
];

/// Seasons in display order
pub fn seasonal_illnesses() -> &'static [Season] {
    SEASONS
}
