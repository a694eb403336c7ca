//! 排程模型
//!
//! - TimeOfDay：本地墙钟时分（HH:MM，24 小时制，无时区）
//! - DaySet：星期集合（0 = 周日 … 6 = 周六），按位存储，天然去重且升序
//! - ScheduleAction：带载荷的动作枚举，只有 set-speed 携带转速
//! - ScheduleDraft / SchedulePatch：未校验的输入，经 `validate` 得到 ScheduleFields

use crate::fan::{FanControl, MAX_SPEED};
use chrono::{Datelike, Timelike, Weekday};
use std::fmt;
use std::str::FromStr;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// 排程校验错误（对外统一表现为 InvalidSchedule）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("fanId required")]
    MissingFan,
    #[error("invalid time (expected HH:MM): {0}")]
    InvalidTime(String),
    #[error("day of week out of range: {0}")]
    InvalidDay(i32),
    #[error("daysOfWeek must not be empty")]
    NoDays,
    #[error("speedValue required for set-speed")]
    MissingSpeed,
    #[error("speedValue out of range: {0}")]
    SpeedOutOfRange(i32),
    #[error("speedValue only allowed for set-speed")]
    UnexpectedSpeed,
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// 本地墙钟时分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    /// 取时刻的时分，秒被忽略。
    pub fn of<T: Timelike>(instant: &T) -> Self {
        Self {
            hour: instant.hour() as u8,
            minute: instant.minute() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(value.to_string());
        let (hour, minute) = value.split_once(':').ok_or_else(invalid)?;
        let two_digits =
            |part: &str| part.len() == 2 && part.bytes().all(|byte| byte.is_ascii_digit());
        if !two_digits(hour) || !two_digits(minute) {
            return Err(invalid());
        }
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// 星期集合（bit 0 = 周日）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DaySet(u8);

impl DaySet {
    pub const DAILY: DaySet = DaySet(0b0111_1111);
    pub const WEEKDAYS: DaySet = DaySet(0b0011_1110);
    pub const WEEKENDS: DaySet = DaySet(0b0100_0001);

    /// 由星期编号构造；重复值合并，超出 [0,6] 报错。允许为空，由排程校验决定是否接受。
    pub fn from_days<I>(days: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut mask = 0u8;
        for day in days {
            if !(0..=6).contains(&day) {
                return Err(ScheduleError::InvalidDay(day));
            }
            mask |= 1 << day;
        }
        Ok(Self(mask))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(&self, day: u8) -> bool {
        day < 7 && self.0 & (1 << day) != 0
    }

    pub fn contains_weekday(&self, weekday: Weekday) -> bool {
        self.contains(weekday.num_days_from_sunday() as u8)
    }

    /// 升序星期编号（规范顺序）。
    pub fn days(&self) -> Vec<u8> {
        (0..7u8).filter(|day| self.contains(*day)).collect()
    }

    /// 展示文案：Daily / Weekdays / Weekends / "Mon, Wed, Fri"。
    pub fn label(&self) -> String {
        match *self {
            Self::DAILY => "Daily".to_string(),
            Self::WEEKDAYS => "Weekdays".to_string(),
            Self::WEEKENDS => "Weekends".to_string(),
            _ => self
                .days()
                .into_iter()
                .map(|day| DAY_NAMES[day as usize])
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// 动作类别（线上表示：power-on / power-off / set-speed）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    PowerOn,
    PowerOff,
    SetSpeed,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::PowerOn => "power-on",
            ActionKind::PowerOff => "power-off",
            ActionKind::SetSpeed => "set-speed",
        }
    }
}

impl FromStr for ActionKind {
    type Err = ScheduleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "power-on" => Ok(ActionKind::PowerOn),
            "power-off" => Ok(ActionKind::PowerOff),
            "set-speed" => Ok(ActionKind::SetSpeed),
            other => Err(ScheduleError::UnknownAction(other.to_string())),
        }
    }
}

/// 排程动作；只有 SetSpeed 携带转速，无法构造出非法组合。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleAction {
    PowerOn,
    PowerOff,
    SetSpeed(u8),
}

impl ScheduleAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            ScheduleAction::PowerOn => ActionKind::PowerOn,
            ScheduleAction::PowerOff => ActionKind::PowerOff,
            ScheduleAction::SetSpeed(_) => ActionKind::SetSpeed,
        }
    }

    pub fn speed_value(&self) -> Option<u8> {
        match self {
            ScheduleAction::SetSpeed(speed) => Some(*speed),
            _ => None,
        }
    }

    /// 到期后交给控制服务的控制请求。
    pub fn to_control(&self) -> FanControl {
        match self {
            ScheduleAction::PowerOn => FanControl::power_on(),
            ScheduleAction::PowerOff => FanControl::power_off(),
            ScheduleAction::SetSpeed(speed) => FanControl::set_speed(i32::from(*speed)),
        }
    }
}

impl fmt::Display for ScheduleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleAction::PowerOn => f.write_str("Power On"),
            ScheduleAction::PowerOff => f.write_str("Power Off"),
            ScheduleAction::SetSpeed(speed) => write!(f, "Set Speed {speed}%"),
        }
    }
}

/// 已存储的排程。
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub schedule_id: String,
    /// 弱引用：只按 id 关联风扇，不校验存在性
    pub fan_id: String,
    pub time: TimeOfDay,
    pub days: DaySet,
    pub enabled: bool,
    pub action: ScheduleAction,
}

impl Schedule {
    /// 启用且星期、时分都与 `now` 匹配时到期（秒忽略）。
    pub fn is_due_at<T: Datelike + Timelike>(&self, now: &T) -> bool {
        self.enabled && self.days.contains_weekday(now.weekday()) && self.time == TimeOfDay::of(now)
    }

    /// 将补丁合并到当前记录，得到待校验的完整草稿。
    ///
    /// 动作仍为 set-speed 且补丁未给出转速时沿用原转速。
    pub fn merge(&self, patch: SchedulePatch) -> ScheduleDraft {
        let action = patch.action.unwrap_or(self.action.kind());
        let speed_value = match (patch.speed_value, self.action) {
            (Some(speed), _) => Some(speed),
            (None, ScheduleAction::SetSpeed(speed)) if action == ActionKind::SetSpeed => {
                Some(i32::from(speed))
            }
            _ => None,
        };
        ScheduleDraft {
            fan_id: patch.fan_id.unwrap_or_else(|| self.fan_id.clone()),
            time: patch.time.unwrap_or_else(|| self.time.to_string()),
            days_of_week: patch.days_of_week.unwrap_or_else(|| {
                self.days.days().into_iter().map(i32::from).collect()
            }),
            enabled: patch.enabled.unwrap_or(self.enabled),
            action,
            speed_value,
        }
    }

    pub fn apply(&mut self, fields: ScheduleFields) {
        self.fan_id = fields.fan_id;
        self.time = fields.time;
        self.days = fields.days;
        self.enabled = fields.enabled;
        self.action = fields.action;
    }
}

/// 新建排程的原始输入。
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDraft {
    pub fan_id: String,
    pub time: String,
    pub days_of_week: Vec<i32>,
    pub enabled: bool,
    pub action: ActionKind,
    pub speed_value: Option<i32>,
}

impl ScheduleDraft {
    /// 校验全部排程不变量。
    pub fn validate(&self) -> Result<ScheduleFields, ScheduleError> {
        let fan_id = self.fan_id.trim();
        if fan_id.is_empty() {
            return Err(ScheduleError::MissingFan);
        }
        let time = self.time.trim().parse::<TimeOfDay>()?;
        let days = DaySet::from_days(self.days_of_week.iter().copied())?;
        if days.is_empty() {
            return Err(ScheduleError::NoDays);
        }
        let action = match (self.action, self.speed_value) {
            (ActionKind::SetSpeed, None) => return Err(ScheduleError::MissingSpeed),
            (ActionKind::SetSpeed, Some(speed)) => {
                if !(0..=i32::from(MAX_SPEED)).contains(&speed) {
                    return Err(ScheduleError::SpeedOutOfRange(speed));
                }
                ScheduleAction::SetSpeed(speed as u8)
            }
            (_, Some(_)) => return Err(ScheduleError::UnexpectedSpeed),
            (ActionKind::PowerOn, None) => ScheduleAction::PowerOn,
            (ActionKind::PowerOff, None) => ScheduleAction::PowerOff,
        };
        Ok(ScheduleFields {
            fan_id: fan_id.to_string(),
            time,
            days,
            enabled: self.enabled,
            action,
        })
    }
}

/// 排程部分更新输入。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulePatch {
    pub fan_id: Option<String>,
    pub time: Option<String>,
    pub days_of_week: Option<Vec<i32>>,
    pub enabled: Option<bool>,
    pub action: Option<ActionKind>,
    pub speed_value: Option<i32>,
}

/// 校验通过的排程字段（尚未分配 id）。
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleFields {
    pub fan_id: String,
    pub time: TimeOfDay,
    pub days: DaySet,
    pub enabled: bool,
    pub action: ScheduleAction,
}

impl ScheduleFields {
    pub fn into_schedule(self, schedule_id: String) -> Schedule {
        Schedule {
            schedule_id,
            fan_id: self.fan_id,
            time: self.time,
            days: self.days,
            enabled: self.enabled,
            action: self.action,
        }
    }
}
