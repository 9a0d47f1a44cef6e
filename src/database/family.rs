// ampseed: Antimicrobial peptide classification with spaced-seed k-mer profiles.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use crate::error::Error;

/// Antimicrobial peptide families.
///
/// [Family::Unknown] is reported when no profile matches and is never
/// trained.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Abaecin,
    AlphaDefensin,
    Ascaphin,
    Aurein,
    Bacteriocin,
    BetaDefensin,
    Bombinin,
    Brevinin,
    Caerin,
    Cathelicidin,
    Cecropin,
    Clavanin,
    Coleoptericin,
    Cupiennin,
    Cyclotide,
    Cystatin,
    Dermaseptin,
    Esculentin,
    Formaecin,
    Hevein,
    Histone,
    Lectin,
    Magainin,
    Mastoparan,
    Ocellatin,
    Palustrin,
    Phylloseptin,
    Pseudin,
    Ribosome,
    Rugosin,
    Snakin,
    Temporin,
    Thionin,
    #[default]
    Unknown,
}

const NAMES: [(Family, &str); 34] = [
    (Family::Abaecin, "Abaecin"),
    (Family::AlphaDefensin, "AlphaDefensin"),
    (Family::Ascaphin, "Ascaphin"),
    (Family::Aurein, "Aurein"),
    (Family::Bacteriocin, "Bacteriocin"),
    (Family::BetaDefensin, "BetaDefensin"),
    (Family::Bombinin, "Bombinin"),
    (Family::Brevinin, "Brevinin"),
    (Family::Caerin, "Caerin"),
    (Family::Cathelicidin, "Cathelicidin"),
    (Family::Cecropin, "Cecropin"),
    (Family::Clavanin, "Clavanin"),
    (Family::Coleoptericin, "Coleoptericin"),
    (Family::Cupiennin, "Cupiennin"),
    (Family::Cyclotide, "Cyclotide"),
    (Family::Cystatin, "Cystatin"),
    (Family::Dermaseptin, "Dermaseptin"),
    (Family::Esculentin, "Esculentin"),
    (Family::Formaecin, "Formaecin"),
    (Family::Hevein, "Hevein"),
    (Family::Histone, "Histone"),
    (Family::Lectin, "Lectin"),
    (Family::Magainin, "Magainin"),
    (Family::Mastoparan, "Mastoparan"),
    (Family::Ocellatin, "Ocellatin"),
    (Family::Palustrin, "Palustrin"),
    (Family::Phylloseptin, "Phylloseptin"),
    (Family::Pseudin, "Pseudin"),
    (Family::Ribosome, "Ribosome"),
    (Family::Rugosin, "Rugosin"),
    (Family::Snakin, "Snakin"),
    (Family::Temporin, "Temporin"),
    (Family::Thionin, "Thionin"),
    (Family::Unknown, "Unknown"),
];

impl Family {
    /// Number of labels including [Family::Unknown].
    pub const COUNT: usize = NAMES.len();

    /// All labels in declaration order.
    pub fn all() -> impl Iterator<Item = Family> {
        NAMES.iter().map(|(family, _)| *family)
    }

    /// Labels that can be trained.
    pub fn trainable() -> impl Iterator<Item = Family> {
        Self::all().filter(|family| *family != Family::Unknown)
    }

    /// Position in declaration order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        NAMES[self.index()].1
    }
}

impl std::str::FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES.iter()
             .find(|(_, name)| name.eq_ignore_ascii_case(s))
             .map(|(family, _)| *family)
             .ok_or_else(|| Error::UnknownFamily(s.to_string()))
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn names_match_declaration_order() {
        use super::Family;

        assert!(Family::all().enumerate().all(|(idx, family)| family.index() == idx));
        assert_eq!(Family::COUNT, 34);
        assert_eq!(Family::trainable().count(), 33);
    }

    #[test]
    fn parse_family() {
        use super::Family;
        use std::str::FromStr;

        assert_eq!(Family::from_str("AlphaDefensin").unwrap(), Family::AlphaDefensin);
        assert_eq!(Family::from_str("temporin").unwrap(), Family::Temporin);
        assert_eq!(Family::Temporin.to_string(), "Temporin");
        assert!(Family::from_str("Lysozyme").is_err());
    }
}
