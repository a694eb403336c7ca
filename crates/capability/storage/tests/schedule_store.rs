use domain::{ActionKind, ScheduleAction, ScheduleDraft, ScheduleError, SchedulePatch};
use fan_storage::{InMemoryScheduleStore, ScheduleStore, StorageError};
use std::collections::HashSet;

fn draft(fan_id: &str, time: &str, days: &[i32]) -> ScheduleDraft {
    ScheduleDraft {
        fan_id: fan_id.to_string(),
        time: time.to_string(),
        days_of_week: days.to_vec(),
        enabled: true,
        action: ActionKind::PowerOn,
        speed_value: None,
    }
}

#[test]
fn create_assigns_unique_ids_in_rapid_succession() {
    let store = InMemoryScheduleStore::new();
    let mut ids = HashSet::new();
    for _ in 0..50 {
        let created = store.create(draft("fan-001", "07:00", &[1])).expect("create");
        assert!(ids.insert(created.schedule_id));
    }
    assert_eq!(store.list().expect("list").len(), 50);
}

#[test]
fn create_rejects_invalid_schedules() {
    let store = InMemoryScheduleStore::new();
    let empty_days = store.create(draft("fan-001", "07:00", &[]));
    assert!(matches!(
        empty_days,
        Err(StorageError::InvalidSchedule(ScheduleError::NoDays))
    ));

    let mut set_speed = draft("fan-001", "07:00", &[1]);
    set_speed.action = ActionKind::SetSpeed;
    assert!(matches!(
        store.create(set_speed),
        Err(StorageError::InvalidSchedule(ScheduleError::MissingSpeed))
    ));

    assert!(matches!(
        store.create(draft("fan-001", "25:00", &[1])),
        Err(StorageError::InvalidSchedule(ScheduleError::InvalidTime(_)))
    ));
    assert!(store.list().expect("list").is_empty());
}

#[test]
fn create_does_not_require_existing_fan() {
    let store = InMemoryScheduleStore::new();
    let created = store.create(draft("F9", "08:00", &[0])).expect("create");
    assert_eq!(created.fan_id, "F9");
}

#[test]
fn update_merges_and_revalidates() {
    let store = InMemoryScheduleStore::new();
    let created = store.create(draft("fan-001", "07:00", &[1, 2])).expect("create");

    let updated = store
        .update(
            &created.schedule_id,
            SchedulePatch {
                action: Some(ActionKind::SetSpeed),
                speed_value: Some(40),
                ..SchedulePatch::default()
            },
        )
        .expect("update");
    assert_eq!(updated.action, ScheduleAction::SetSpeed(40));
    assert_eq!(updated.time.to_string(), "07:00");
    assert_eq!(updated.days.days(), vec![1, 2]);
}

#[test]
fn failed_update_leaves_record_unchanged() {
    let store = InMemoryScheduleStore::new();
    let created = store.create(draft("fan-001", "07:00", &[1, 2])).expect("create");

    let result = store.update(
        &created.schedule_id,
        SchedulePatch {
            days_of_week: Some(Vec::new()),
            time: Some("06:00".to_string()),
            ..SchedulePatch::default()
        },
    );
    assert!(matches!(result, Err(StorageError::InvalidSchedule(_))));
    let stored = store
        .find(&created.schedule_id)
        .expect("find")
        .expect("schedule");
    assert_eq!(stored, created);
}

#[test]
fn update_unknown_schedule_is_not_found() {
    let store = InMemoryScheduleStore::new();
    let result = store.update("schedule-999", SchedulePatch::default());
    assert!(matches!(result, Err(ref err) if err.is_not_found()));
}

#[test]
fn delete_twice_yields_not_found() {
    let store = InMemoryScheduleStore::new();
    let created = store.create(draft("fan-001", "07:00", &[1])).expect("create");
    store.delete(&created.schedule_id).expect("delete");
    assert!(store.find(&created.schedule_id).expect("find").is_none());
    let again = store.delete(&created.schedule_id);
    assert!(matches!(again, Err(StorageError::NotFound { .. })));
}

#[test]
fn toggle_enabled_is_its_own_inverse() {
    let store = InMemoryScheduleStore::new();
    let created = store.create(draft("fan-001", "07:00", &[1])).expect("create");
    let toggled = store.toggle_enabled(&created.schedule_id).expect("toggle");
    assert!(!toggled.enabled);
    let restored = store.toggle_enabled(&created.schedule_id).expect("toggle");
    assert_eq!(restored.enabled, created.enabled);
    assert!(store.toggle_enabled("missing").is_err());
}

#[test]
fn by_fan_id_preserves_insertion_order() {
    let store = InMemoryScheduleStore::with_demo_schedules().expect("demo");
    let ids: Vec<String> = store
        .by_fan_id("fan-001")
        .expect("by fan")
        .into_iter()
        .map(|item| item.schedule_id)
        .collect();
    assert_eq!(ids, vec!["schedule-001", "schedule-002"]);
    assert!(store.by_fan_id("fan-006").expect("by fan").is_empty());

    // 演示数据之后继续单调分配
    let created = store.create(draft("fan-006", "09:15", &[3])).expect("create");
    assert_eq!(created.schedule_id, "schedule-006");
}
