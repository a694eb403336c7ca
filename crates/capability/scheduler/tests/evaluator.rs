use chrono::{NaiveDate, NaiveDateTime};
use domain::{ActionKind, Fan, FanControl, FanStatus, ScheduleDraft};
use fan_control::{ControlError, FanControlService};
use fan_scheduler::{ScheduleEvaluator, due_actions};
use fan_storage::{FanRegistry, InMemoryFanRegistry, InMemoryScheduleStore, ScheduleStore};
use std::sync::Arc;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("date")
        .and_hms_opt(hour, minute, second)
        .expect("time")
}

// 2024-01-01 周一；2024-01-06 周六；2024-01-07 周日
fn monday(hour: u32, minute: u32) -> NaiveDateTime {
    at(2024, 1, 1, hour, minute, 0)
}

fn saturday(hour: u32, minute: u32) -> NaiveDateTime {
    at(2024, 1, 6, hour, minute, 0)
}

fn sunday(hour: u32, minute: u32) -> NaiveDateTime {
    at(2024, 1, 7, hour, minute, 0)
}

fn fan(fan_id: &str, is_on: bool, speed: u8, status: FanStatus) -> Fan {
    Fan {
        fan_id: fan_id.to_string(),
        name: format!("Fan {fan_id}"),
        room: "Bedroom".to_string(),
        is_on,
        speed,
        status,
        power_consumption: if is_on { 30.0 } else { 0.0 },
        temperature: None,
        runtime: None,
    }
}

fn draft(
    fan_id: &str,
    time: &str,
    days: &[i32],
    action: ActionKind,
    speed_value: Option<i32>,
) -> ScheduleDraft {
    ScheduleDraft {
        fan_id: fan_id.to_string(),
        time: time.to_string(),
        days_of_week: days.to_vec(),
        enabled: true,
        action,
        speed_value,
    }
}

struct Fixture {
    fans: Arc<InMemoryFanRegistry>,
    schedules: Arc<InMemoryScheduleStore>,
    evaluator: ScheduleEvaluator,
}

fn fixture(fans: Vec<Fan>) -> Fixture {
    let fans = Arc::new(InMemoryFanRegistry::with_fans(fans).expect("fans"));
    let schedules = Arc::new(InMemoryScheduleStore::new());
    let control = FanControlService::new(fans.clone());
    let evaluator = ScheduleEvaluator::new(schedules.clone(), control);
    Fixture {
        fans,
        schedules,
        evaluator,
    }
}

#[test]
fn weekday_schedule_fires_on_monday_not_saturday() {
    let fx = fixture(vec![fan("F1", false, 0, FanStatus::Online)]);
    let created = fx
        .schedules
        .create(draft("F1", "07:00", &[1, 2, 3, 4, 5], ActionKind::PowerOn, None))
        .expect("create");

    let actions = fx.evaluator.evaluate(&monday(7, 0)).expect("evaluate");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].schedule_id, created.schedule_id);
    assert_eq!(actions[0].fan_id, "F1");
    assert_eq!(actions[0].control, FanControl::power_on());

    assert!(fx.evaluator.evaluate(&saturday(7, 0)).expect("evaluate").is_empty());
    assert!(fx.evaluator.evaluate(&monday(7, 1)).expect("evaluate").is_empty());
}

#[test]
fn seconds_are_ignored_and_evaluation_is_idempotent() {
    let fx = fixture(vec![fan("F1", false, 0, FanStatus::Online)]);
    fx.schedules
        .create(draft("F1", "07:00", &[1], ActionKind::PowerOn, None))
        .expect("create");

    let first = fx
        .evaluator
        .evaluate(&at(2024, 1, 1, 7, 0, 5))
        .expect("evaluate");
    let second = fx
        .evaluator
        .evaluate(&at(2024, 1, 1, 7, 0, 55))
        .expect("evaluate");
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test]
fn disabled_schedules_never_fire() {
    let fx = fixture(vec![fan("F1", false, 0, FanStatus::Online)]);
    let created = fx
        .schedules
        .create(draft("F1", "07:00", &[1], ActionKind::PowerOn, None))
        .expect("create");
    fx.schedules
        .toggle_enabled(&created.schedule_id)
        .expect("toggle");
    assert!(fx.evaluator.evaluate(&monday(7, 0)).expect("evaluate").is_empty());
}

#[test]
fn dangling_fan_reference_is_skipped_silently() {
    let fx = fixture(vec![fan("F1", false, 0, FanStatus::Online)]);
    fx.schedules
        .create(draft("F9", "08:00", &[0], ActionKind::PowerOff, None))
        .expect("create");
    let outcomes = fx.evaluator.run(&sunday(8, 0)).expect("run");
    assert!(outcomes.is_empty());
}

#[test]
fn deleted_schedule_produces_no_action() {
    let fx = fixture(vec![fan("F1", false, 0, FanStatus::Online)]);
    let created = fx
        .schedules
        .create(draft("F1", "07:00", &[1], ActionKind::PowerOn, None))
        .expect("create");
    assert_eq!(fx.evaluator.evaluate(&monday(7, 0)).expect("evaluate").len(), 1);

    fx.schedules.delete(&created.schedule_id).expect("delete");
    let actions = fx.evaluator.evaluate(&monday(7, 0)).expect("evaluate");
    assert!(actions
        .iter()
        .all(|action| action.schedule_id != created.schedule_id));
}

#[test]
fn set_speed_powers_the_fan_on() {
    let fx = fixture(vec![fan("F2", false, 0, FanStatus::Online)]);
    fx.schedules
        .create(draft(
            "F2",
            "23:00",
            &[0, 1, 2, 3, 4, 5, 6],
            ActionKind::SetSpeed,
            Some(50),
        ))
        .expect("create");

    let outcomes = fx.evaluator.run(&saturday(23, 0)).expect("run");
    assert_eq!(outcomes.len(), 1);
    let fan = outcomes[0].result.as_ref().expect("applied");
    assert!(fan.is_on);
    assert_eq!(fan.speed, 50);
    let stored = fx.fans.find_fan("F2").expect("find").expect("fan");
    assert_eq!(stored.speed, 50);
}

#[test]
fn one_rejected_action_does_not_block_others() {
    let fx = fixture(vec![
        fan("F1", true, 60, FanStatus::Offline),
        fan("F2", true, 60, FanStatus::Online),
    ]);
    fx.schedules
        .create(draft("F1", "22:00", &[1], ActionKind::PowerOff, None))
        .expect("create");
    fx.schedules
        .create(draft("F2", "22:00", &[1], ActionKind::PowerOff, None))
        .expect("create");

    let outcomes = fx.evaluator.run(&monday(22, 0)).expect("run");
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0].result, Err(ControlError::Rejected(_))));
    let fan = outcomes[1].result.as_ref().expect("applied");
    assert!(!fan.is_on);
    assert_eq!(fan.speed, 0);
    assert_eq!(fan.power_consumption, 0.0);
}

#[test]
fn due_actions_is_a_pure_view_over_inputs() {
    let schedules = InMemoryScheduleStore::with_demo_schedules().expect("demo");
    let fans = InMemoryFanRegistry::with_demo_fans();
    let list = schedules.list().expect("list");
    let fan_list = fans.list_fans().expect("fans");

    // 周三 18:00：schedule-005（fan-004，set-speed 75）
    let wednesday = at(2024, 1, 3, 18, 0, 0);
    let actions = due_actions(&list, &fan_list, &wednesday);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].schedule_id, "schedule-005");
    assert_eq!(actions[0].control, FanControl::set_speed(75));

    // 周六 06:30：schedule-004 已禁用
    assert!(due_actions(&list, &fan_list, &saturday(6, 30)).is_empty());
}
