use serde::Serialize;

/// Locations of one zone-group, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneGroup {
    pub name: String,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facility {
    pub name: String,
    pub zone_groups: Vec<ZoneGroup>,
}

/// Read-only facility → zone-group → location reference data.
///
/// Declaration order is significant: task identifiers are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Catalog {
    facilities: Vec<Facility>,
}

type RawFacility = (&'static str, &'static [(&'static str, &'static [&'static str])]);

const BUILTIN: &[RawFacility] = &[
    (
        "HE06 JFC4/107D",
        &[
            (
                "Circuit de stockage",
                &[
                    "SC03 + Jetée",
                    "SD02 + Jetée",
                    "SE02 + Jetée",
                    "AAT02 + Jetée",
                    "ABT03 + Jetée",
                ],
            ),
            (
                "Circuit de chargement",
                &["ABT05", "Jetée ABT05/ABT01", "Bâtiment de vente locale", "Gratteur"],
            ),
            ("Hall de stockage", &["Les couloirs", "Extra Hall"]),
        ],
    ),
    (
        "HE06 JFC2/107E",
        &[
            (
                "Circuit de stockage",
                &[
                    "SC02 + Jetée",
                    "SD01 + Jetée",
                    "SE01 + Jetée",
                    "AAT02 + Jetée",
                    "ABT03 + Jetée",
                ],
            ),
            (
                "Circuit de chargement",
                &["ABT05", "Jetée ABT05/ABT01", "Bâtiment de vente locale", "Gratteur"],
            ),
            ("Hall de stockage", &["Les couloirs", "Extra Hall"]),
        ],
    ),
    (
        "HE03/107F",
        &[
            ("Circuit de stockage", &["SC01 + Jetée", "SD03 + Jetée", "SJ01 + Jetée"]),
            (
                "Circuit de chargement",
                &["ABT03 + Jetée", "Bâtiment de vente locale", "Gratteur"],
            ),
            ("Hall de stockage", &["Les couloirs", "Extra Hall"]),
        ],
    ),
];

impl Catalog {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    /// The halls shipped with the application.
    pub fn builtin() -> Self {
        let facilities = BUILTIN
            .iter()
            .map(|(name, groups)| Facility {
                name: (*name).to_string(),
                zone_groups: groups
                    .iter()
                    .map(|(group, locations)| ZoneGroup {
                        name: (*group).to_string(),
                        locations: locations.iter().map(|l| (*l).to_string()).collect(),
                    })
                    .collect(),
            })
            .collect();
        Self { facilities }
    }

    pub fn facility(&self, key: &str) -> Option<&Facility> {
        self.facilities.iter().find(|facility| facility.name == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.facility(key).is_some()
    }

    pub fn facility_keys(&self) -> Vec<&str> {
        self.facilities.iter().map(|f| f.name.as_str()).collect()
    }

    /// First declared facility; the selection used before anything is chosen.
    pub fn default_facility(&self) -> Option<&str> {
        self.facilities.first().map(|f| f.name.as_str())
    }
}
