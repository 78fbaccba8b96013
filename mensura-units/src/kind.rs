//! Kind names - signature lookup and registry introspection

use mensura_core::QtyError;

use crate::registry::UNITS;

/// Signature -> kind name
const KINDS: &[(i64, &str)] = &[
    (-312078, "elastance"),
    (-312058, "resistance"),
    (-312038, "inductance"),
    (-152058, "potential"),
    (-152040, "magnetism"),
    (-152038, "magnetism"),
    (-7997, "specific_volume"),
    (-79, "snap"),
    (-59, "jolt"),
    (-39, "acceleration"),
    (-38, "radiation"),
    (-20, "frequency"),
    (-19, "speed"),
    (-18, "viscosity"),
    (-17, "volumetric_flow"),
    (-1, "wavenumber"),
    (0, "unitless"),
    (1, "length"),
    (2, "area"),
    (3, "volume"),
    (20, "time"),
    (400, "temperature"),
    (7941, "yank"),
    (7942, "power"),
    (7959, "pressure"),
    (7961, "force"),
    (7962, "energy"),
    (7979, "viscosity"),
    (7980, "mass_flow"),
    (7981, "momentum"),
    (7982, "angular_momentum"),
    (7997, "density"),
    (7998, "area_density"),
    (8000, "mass"),
    (152020, "radiation_exposure"),
    (159999, "magnetism"),
    (160000, "current"),
    (160020, "charge"),
    (312058, "conductance"),
    (312078, "capacitance"),
    (3199980, "activity"),
    (3199997, "molar_concentration"),
    (3200000, "substance"),
    (63999998, "illuminance"),
    (64000000, "luminous_power"),
    (1280000000, "currency"),
    (25599999980, "information_rate"),
    (25600000000, "information"),
    (511999999980, "angular_velocity"),
    (512000000000, "angle"),
];

/// Kind name for a signature, `None` for uncategorized composites
pub fn kind_of(signature: i64) -> Option<&'static str> {
    KINDS
        .binary_search_by_key(&signature, |(sig, _)| *sig)
        .ok()
        .map(|i| KINDS[i].1)
}

/// Every kind name, without duplicates
pub fn get_kinds() -> Vec<&'static str> {
    let mut kinds: Vec<&'static str> = Vec::new();
    for &(_, name) in KINDS {
        if !kinds.contains(&name) {
            kinds.push(name);
        }
    }
    kinds
}

/// Unit names (atom ids without brackets) of a kind, sorted
/// case-insensitively. Without a kind: every unit except prefixes and unity.
pub fn get_units(kind: Option<&str>) -> Result<Vec<&'static str>, QtyError> {
    let mut units: Vec<&'static str> = match kind {
        None => UNITS
            .atoms()
            .filter(|atom| !atom.is_prefix() && !atom.is_unity())
            .map(|atom| atom.name())
            .collect(),
        Some(kind) => {
            if !get_kinds().iter().any(|known| *known == kind) {
                return Err(QtyError::UnknownKind(kind.to_string()));
            }
            UNITS
                .atoms()
                .filter(|atom| atom.kind() == kind)
                .map(|atom| atom.name())
                .collect()
        }
    };
    units.sort_by_cached_key(|name| name.to_lowercase());
    Ok(units)
}

/// Every alias of the unit `name` resolves to
pub fn get_aliases(name: &str) -> Result<Vec<&'static str>, QtyError> {
    UNITS
        .unit(name)
        .map(|atom| atom.definition().aliases.to_vec())
        .ok_or_else(QtyError::unit_not_recognized)
}
