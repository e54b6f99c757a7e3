use crate::catalog::Catalog;
use crate::models::{PhotoPhase, Planned, Presence, TaskRecord};
use crate::photos::PhotoStore;
use std::collections::HashMap;

/// Identity is positional: facility, zone-group and ordinal within the group.
pub fn task_id(facility: &str, zone_group: &str, ordinal: usize) -> String {
    format!("{facility}|{zone_group}|{ordinal}")
}

/// Builds the ordered task list of one facility.
///
/// Tasks whose identifier appears in `previous` keep their planned flag,
/// status and comment; photo presence always comes from `photos`. An unknown
/// facility yields an empty list.
pub fn flatten(
    catalog: &Catalog,
    facility: &str,
    previous: &[TaskRecord],
    photos: &PhotoStore,
) -> Vec<TaskRecord> {
    let Some(entry) = catalog.facility(facility) else {
        return Vec::new();
    };

    let carried: HashMap<&str, &TaskRecord> =
        previous.iter().map(|task| (task.id.as_str(), task)).collect();

    let mut tasks = Vec::new();
    for group in &entry.zone_groups {
        for (ordinal, location) in group.locations.iter().enumerate() {
            let id = task_id(&entry.name, &group.name, ordinal);
            let saved = carried.get(id.as_str());

            tasks.push(TaskRecord {
                facility: entry.name.clone(),
                zone_group: group.name.clone(),
                location: location.clone(),
                planned: saved.map_or(Planned::No, |task| task.planned),
                status: saved.and_then(|task| task.status),
                photo_before: Presence::from_flag(photos.contains(&id, PhotoPhase::Before)),
                photo_after: Presence::from_flag(photos.contains(&id, PhotoPhase::After)),
                comment: saved.map(|task| task.comment.clone()).unwrap_or_default(),
                id,
            });
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Facility, ZoneGroup};
    use crate::models::TaskStatus;
    use crate::photos::Photo;

    fn storage_catalog() -> Catalog {
        Catalog::new(vec![Facility {
            name: "A".into(),
            zone_groups: vec![ZoneGroup {
                name: "Storage".into(),
                locations: vec!["X".into(), "Y".into()],
            }],
        }])
    }

    #[test]
    fn fresh_flatten_has_positional_ids_and_defaults() {
        let tasks = flatten(&storage_catalog(), "A", &[], &PhotoStore::default());
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "A|Storage|0");
        assert_eq!(tasks[0].location, "X");
        assert_eq!(tasks[1].id, "A|Storage|1");
        assert_eq!(tasks[1].location, "Y");
        for task in &tasks {
            assert_eq!(task.planned, Planned::No);
            assert_eq!(task.status, None);
            assert_eq!(task.photo_before, Presence::Absent);
            assert!(task.comment.is_empty());
        }
    }

    #[test]
    fn flatten_is_deterministic_and_ordered() {
        let catalog = Catalog::builtin();
        let photos = PhotoStore::default();
        let first = flatten(&catalog, "HE06 JFC4/107D", &[], &photos);
        let second = flatten(&catalog, "HE06 JFC4/107D", &[], &photos);
        assert_eq!(first, second);
        assert_eq!(first.len(), 11);
        assert_eq!(first[0].zone_group, "Circuit de stockage");
        assert_eq!(first[5].id, "HE06 JFC4/107D|Circuit de chargement|0");
        assert_eq!(first[10].location, "Extra Hall");

        let ids: std::collections::HashSet<_> = first.iter().map(|t| &t.id).collect();
        assert_eq!(ids.len(), first.len());
    }

    #[test]
    fn carries_fields_for_matching_ids_only() {
        let catalog = storage_catalog();
        let photos = PhotoStore::default();
        let mut previous = flatten(&catalog, "A", &[], &photos);
        previous[1].planned = Planned::Yes;
        previous[1].status = Some(TaskStatus::Partial);
        previous[1].comment = "bac plein".into();
        previous[0].id = "B|Storage|0".into();
        previous[0].planned = Planned::Yes;

        let tasks = flatten(&catalog, "A", &previous, &photos);
        assert_eq!(tasks[0].planned, Planned::No);
        assert_eq!(tasks[1].planned, Planned::Yes);
        assert_eq!(tasks[1].status, Some(TaskStatus::Partial));
        assert_eq!(tasks[1].comment, "bac plein");
    }

    #[test]
    fn photo_presence_comes_from_store_not_previous() {
        let catalog = storage_catalog();
        let mut photos = PhotoStore::default();
        let photo = Photo::from_upload("image/png", "iVBORw0KGgo=").unwrap();
        photos.insert("A|Storage|1", PhotoPhase::After, &photo);

        let mut previous = flatten(&catalog, "A", &[], &PhotoStore::default());
        previous[0].photo_before = Presence::Present;

        let tasks = flatten(&catalog, "A", &previous, &photos);
        assert_eq!(tasks[0].photo_before, Presence::Absent);
        assert_eq!(tasks[1].photo_after, Presence::Present);
        assert_eq!(tasks[1].photo_before, Presence::Absent);
    }

    #[test]
    fn unknown_facility_yields_empty_list() {
        let tasks = flatten(&storage_catalog(), "Z", &[], &PhotoStore::default());
        assert!(tasks.is_empty());
    }
}
