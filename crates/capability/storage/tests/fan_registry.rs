use domain::{Fan, FanFilter, FanStatus, PowerState};
use fan_storage::{
    ControlWrite, FanRegistry, FanTelemetry, FanUpdate, InMemoryFanRegistry, StorageError,
};

fn fan(fan_id: &str, room: &str, is_on: bool, status: FanStatus, power: f64) -> Fan {
    Fan {
        fan_id: fan_id.to_string(),
        name: format!("Fan {fan_id}"),
        room: room.to_string(),
        is_on,
        speed: if is_on { 60 } else { 0 },
        status,
        power_consumption: power,
        temperature: None,
        runtime: None,
    }
}

fn registry() -> InMemoryFanRegistry {
    InMemoryFanRegistry::with_fans(vec![
        fan("f1", "Bedroom", true, FanStatus::Online, 40.0),
        fan("f2", "Kitchen", false, FanStatus::Online, 0.0),
        fan("f3", "Bedroom", true, FanStatus::Error, 25.5),
        fan("f4", "bedroom", false, FanStatus::Offline, 0.0),
    ])
    .expect("registry")
}

#[test]
fn list_and_find_preserve_insertion_order() {
    let registry = registry();
    let ids: Vec<String> = registry
        .list_fans()
        .expect("list")
        .into_iter()
        .map(|fan| fan.fan_id)
        .collect();
    assert_eq!(ids, vec!["f1", "f2", "f3", "f4"]);
    assert!(registry.find_fan("f3").expect("find").is_some());
    assert!(registry.find_fan("missing").expect("find").is_none());
}

#[test]
fn aggregates() {
    let registry = registry();
    assert_eq!(registry.total_power().expect("total"), 65.5);
    assert_eq!(registry.active_count().expect("active"), 2);
    assert_eq!(registry.online_count().expect("online"), 2);
}

#[test]
fn rooms_are_case_sensitive() {
    let registry = registry();
    let bedroom: Vec<String> = registry
        .fans_by_room("Bedroom")
        .expect("by room")
        .into_iter()
        .map(|fan| fan.fan_id)
        .collect();
    assert_eq!(bedroom, vec!["f1", "f3"]);

    let mut rooms = registry.unique_rooms().expect("rooms");
    rooms.sort();
    assert_eq!(rooms, vec!["Bedroom", "Kitchen", "bedroom"]);
}

#[test]
fn filter_combines_all_criteria() {
    let registry = registry();
    let all = registry.filter_fans(&FanFilter::default()).expect("filter");
    assert_eq!(all.len(), 4);

    let filter = FanFilter {
        room: Some("Bedroom".to_string()),
        status: Some(FanStatus::Online),
        power: Some(PowerState::On),
    };
    let matched = registry.filter_fans(&filter).expect("filter");
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].fan_id, "f1");

    let off = FanFilter {
        power: Some(PowerState::Off),
        ..FanFilter::default()
    };
    assert_eq!(registry.filter_fans(&off).expect("filter").len(), 2);
}

#[test]
fn provisioning_rejects_invalid_and_duplicate_fans() {
    let registry = registry();
    let mut spinning_while_off = fan("f9", "Garage", false, FanStatus::Online, 0.0);
    spinning_while_off.speed = 40;
    assert!(matches!(
        registry.provision_fan(spinning_while_off),
        Err(StorageError::InvalidFan(_))
    ));
    assert!(matches!(
        registry.provision_fan(fan("f1", "Garage", false, FanStatus::Online, 0.0)),
        Err(StorageError::Conflict(_))
    ));
    assert_eq!(registry.list_fans().expect("list").len(), 4);
}

#[test]
fn update_that_breaks_invariant_is_not_written() {
    let registry = registry();
    let result = registry.update_online_fan("f1", &|_: &Fan| FanUpdate {
        is_on: Some(false),
        ..FanUpdate::default()
    });
    assert!(matches!(result, Err(StorageError::InvalidFan(_))));
    let fan = registry.find_fan("f1").expect("find").expect("fan");
    assert!(fan.is_on);
    assert_eq!(fan.speed, 60);

    let missing = registry
        .update_online_fan("missing", &|_: &Fan| FanUpdate::default())
        .expect("update");
    assert!(missing.is_none());
}

#[test]
fn control_write_sees_status_committed_by_telemetry() {
    let registry = registry();
    registry
        .report_telemetry(
            "f1",
            FanTelemetry {
                status: Some(FanStatus::Offline),
                ..FanTelemetry::default()
            },
        )
        .expect("telemetry")
        .expect("fan");

    let write = registry
        .update_online_fan("f1", &|_: &Fan| FanUpdate {
            is_on: Some(false),
            speed: Some(0),
            power_consumption: Some(0.0),
        })
        .expect("update")
        .expect("fan");
    let ControlWrite::Offline(fan) = write else {
        panic!("offline fan must not be written");
    };
    assert!(fan.is_on);
    assert_eq!(registry.find_fan("f1").expect("find"), Some(fan));
}

#[test]
fn control_write_plans_from_locked_record() {
    let registry = registry();
    let write = registry
        .update_online_fan("f1", &|fan: &Fan| FanUpdate {
            speed: Some(fan.speed / 2),
            ..FanUpdate::default()
        })
        .expect("update")
        .expect("fan");
    let ControlWrite::Applied { previous, current } = write else {
        panic!("online fan should be written");
    };
    assert_eq!(previous.speed, 60);
    assert_eq!(current.speed, 30);
    assert_eq!(registry.find_fan("f1").expect("find"), Some(current));
}

#[test]
fn telemetry_updates_status_and_readings() {
    let registry = registry();
    let fan = registry
        .report_telemetry(
            "f1",
            FanTelemetry {
                status: Some(FanStatus::Offline),
                power_consumption: Some(12.0),
                temperature: Some(31.5),
                runtime: Some(10.0),
            },
        )
        .expect("telemetry")
        .expect("fan");
    assert_eq!(fan.status, FanStatus::Offline);
    assert_eq!(fan.power_consumption, 12.0);
    assert_eq!(fan.temperature, Some(31.5));
    assert_eq!(fan.runtime, Some(10.0));
}

#[test]
fn telemetry_never_reports_power_for_a_fan_that_is_off() {
    let registry = registry();
    let fan = registry
        .report_telemetry(
            "f2",
            FanTelemetry {
                power_consumption: Some(18.0),
                ..FanTelemetry::default()
            },
        )
        .expect("telemetry")
        .expect("fan");
    assert_eq!(fan.power_consumption, 0.0);

    let negative = registry.report_telemetry(
        "f1",
        FanTelemetry {
            power_consumption: Some(-1.0),
            ..FanTelemetry::default()
        },
    );
    assert!(matches!(negative, Err(StorageError::InvalidFan(_))));
}

#[test]
fn demo_fans_satisfy_invariants() {
    let registry = InMemoryFanRegistry::with_demo_fans();
    let fans = registry.list_fans().expect("list");
    assert_eq!(fans.len(), 6);
    for fan in &fans {
        fan.validate().expect("valid demo fan");
    }
    assert_eq!(registry.total_power().expect("total"), 143.0);
    assert_eq!(registry.active_count().expect("active"), 4);
}
