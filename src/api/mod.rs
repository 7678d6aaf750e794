// ==========================================
// 排班工时系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,承接外部调用边界
// ==========================================

pub mod error;
pub mod slot_api;
pub mod timesheet_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use slot_api::SlotApi;
pub use timesheet_api::{GenerateResponse, TimesheetApi};
