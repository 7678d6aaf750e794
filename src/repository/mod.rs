// ==========================================
// 排班工时系统 - 数据仓储层
// ==========================================
// 职责: 数据访问,表结构管理
// 红线: 不含业务规则,SQL 只出现在本层
// ==========================================

pub mod error;
pub mod slot_repo;
pub mod timesheet_repo;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use slot_repo::PlanningSlotRepository;
pub use timesheet_repo::TimesheetRepository;
