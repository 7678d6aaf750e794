// ==========================================
// 排班工时系统 - 排班槽位领域模型
// ==========================================
// 槽位 = 某客户(partner)在某时间段内对某员工/项目的排班记录
// 工时来源: effective_hours 优先, 其次 allocated_hours
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::SlotState;

// ==========================================
// PlanningSlot - 排班槽位
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningSlot {
    pub slot_id: String,                // 槽位ID
    pub name: Option<String>,           // 槽位名称(可空,工时单标签回退到ID)
    pub partner_id: Option<String>,     // 客户/资源ID(未指派班次为空)
    pub employee_id: String,            // 员工ID
    pub project_id: String,             // 项目ID
    pub start_datetime: NaiveDateTime,  // 排班开始时间
    pub end_datetime: NaiveDateTime,    // 排班结束时间
    pub allocated_hours: f64,           // 计划分配工时
    pub effective_hours: f64,           // 实际有效工时
    pub allow_timesheets: bool,         // 项目是否允许记工时(展平到槽位行)
    pub state: SlotState,               // 槽位状态
    pub created_at: NaiveDateTime,      // 创建时间
    pub updated_at: NaiveDateTime,      // 更新时间
}

impl PlanningSlot {
    /// 取待分配总工时: effective_hours 优先,无效则回退 allocated_hours
    pub fn hours_to_distribute(&self) -> f64 {
        if self.effective_hours > 0.0 {
            self.effective_hours
        } else {
            self.allocated_hours
        }
    }

    /// 槽位自身的日期跨度(发布钩子用)
    pub fn date_span(&self) -> (NaiveDate, NaiveDate) {
        (self.start_datetime.date(), self.end_datetime.date())
    }

    /// 工时单标签: 名称缺失时回退到槽位ID
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.slot_id)
    }
}
