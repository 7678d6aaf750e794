// ==========================================
// 排班工时系统 - 工时单领域模型
// ==========================================
// 工时单 = 员工×项目×客户×日期的一条已记录工时
// 去重键: (slot_id, employee_id, project_id, date)
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::slot::PlanningSlot;

// ==========================================
// TimesheetEntry - 工时单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimesheetEntry {
    pub timesheet_id: String,      // 工时单ID
    pub slot_id: String,           // 来源槽位
    pub employee_id: String,       // 员工ID
    pub project_id: String,        // 项目ID
    pub partner_id: String,        // 客户ID
    pub date: NaiveDate,           // 记录日期
    pub unit_amount: f64,          // 工时数 (0, 8]
    pub name: String,              // 标签
    pub created_at: NaiveDateTime, // 创建时间
}

impl TimesheetEntry {
    /// 取本条工时单的去重键
    pub fn key(&self) -> TimesheetKey {
        TimesheetKey {
            slot_id: self.slot_id.clone(),
            employee_id: self.employee_id.clone(),
            project_id: self.project_id.clone(),
            date: self.date,
        }
    }
}

// ==========================================
// TimesheetKey - 去重键
// ==========================================
// 用途: 同槽位×员工×项目×日期已有工时单时,跳过创建
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimesheetKey {
    pub slot_id: String,
    pub employee_id: String,
    pub project_id: String,
    pub date: NaiveDate,
}

impl TimesheetKey {
    /// 由槽位与日期构造去重键
    pub fn for_slot(slot: &PlanningSlot, date: NaiveDate) -> Self {
        Self {
            slot_id: slot.slot_id.clone(),
            employee_id: slot.employee_id.clone(),
            project_id: slot.project_id.clone(),
            date,
        }
    }
}

/// 生成工时单标签
///
/// 格式: "Timesheet from Planning Slot {槽位名或ID} - {日期}"
pub fn timesheet_label(slot: &PlanningSlot, date: NaiveDate) -> String {
    format!(
        "Timesheet from Planning Slot {} - {}",
        slot.display_name(),
        date
    )
}
