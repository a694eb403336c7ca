//! 存储接口 Trait 定义
//!
//! - FanRegistry：风扇注册表（查询、聚合、写回、遥测）
//! - ScheduleStore：排程存储（CRUD + 启用切换）
//!
//! 设计原则：
//! - 读操作无副作用
//! - 查找类接口以 `Option` 表示不存在；排程变更接口以 `StorageError::NotFound` 表示不存在
//! - `Send + Sync`，便于以 `Arc<dyn _>` 在服务间共享

use crate::error::StorageError;
use crate::models::{ControlWrite, FanTelemetry, FanUpdate};
use domain::{Fan, FanFilter, Schedule, ScheduleDraft, SchedulePatch};

/// 风扇注册表接口
pub trait FanRegistry: Send + Sync {
    /// 按接入顺序列出全部风扇
    fn list_fans(&self) -> Result<Vec<Fan>, StorageError>;

    /// 查找指定风扇
    fn find_fan(&self, fan_id: &str) -> Result<Option<Fan>, StorageError>;

    /// 全部风扇的功率之和（瓦）
    fn total_power(&self) -> Result<f64, StorageError>;

    /// 运行中（开机）的风扇数量
    fn active_count(&self) -> Result<usize, StorageError>;

    /// 在线风扇数量
    fn online_count(&self) -> Result<usize, StorageError>;

    /// 按房间精确匹配（区分大小写），保持注册顺序
    fn fans_by_room(&self, room: &str) -> Result<Vec<Fan>, StorageError>;

    /// 去重后的房间列表
    fn unique_rooms(&self) -> Result<Vec<String>, StorageError>;

    /// 按组合条件筛选，保持注册顺序
    fn filter_fans(&self, filter: &FanFilter) -> Result<Vec<Fan>, StorageError>;

    /// 接入新风扇（校验不变量，拒绝重复 id）
    fn provision_fan(&self, fan: Fan) -> Result<Fan, StorageError>;

    /// 写回控制结果
    ///
    /// 在同一把写锁内：离线则拒绝，否则以当前记录调用 `plan` 计算写回并校验提交。
    /// 风扇不存在时返回 `None`。
    fn update_online_fan(
        &self,
        fan_id: &str,
        plan: &dyn Fn(&Fan) -> FanUpdate,
    ) -> Result<Option<ControlWrite>, StorageError>;

    /// 记录设备上报的状态与遥测
    fn report_telemetry(
        &self,
        fan_id: &str,
        telemetry: FanTelemetry,
    ) -> Result<Option<Fan>, StorageError>;
}

/// 排程存储接口
pub trait ScheduleStore: Send + Sync {
    /// 按创建顺序列出全部排程
    fn list(&self) -> Result<Vec<Schedule>, StorageError>;

    /// 查找指定排程
    fn find(&self, schedule_id: &str) -> Result<Option<Schedule>, StorageError>;

    /// 列出引用指定风扇的排程
    fn by_fan_id(&self, fan_id: &str) -> Result<Vec<Schedule>, StorageError>;

    /// 校验并创建排程，分配新 id
    fn create(&self, draft: ScheduleDraft) -> Result<Schedule, StorageError>;

    /// 合并更新；校验失败时原记录保持不变
    fn update(&self, schedule_id: &str, patch: SchedulePatch) -> Result<Schedule, StorageError>;

    /// 删除排程
    fn delete(&self, schedule_id: &str) -> Result<(), StorageError>;

    /// 翻转启用状态
    fn toggle_enabled(&self, schedule_id: &str) -> Result<Schedule, StorageError>;
}
