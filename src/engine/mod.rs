// ==========================================
// 排班工时系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: 单日工时不超上限; 分摊引擎保持纯函数
// ==========================================

pub mod hour_distributor;
pub mod timesheet_generator;

// 重导出核心引擎
pub use hour_distributor::{Allocation, HourDistributor, MAX_HOURS_PER_DAY};
pub use timesheet_generator::{GenerateReport, TimesheetGenerator};
