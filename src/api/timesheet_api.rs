// ==========================================
// 排班工时系统 - 工时单生成 API
// ==========================================
// 职责: 外部调用边界
// - 字符串日期(YYYY-MM-DD)解析与校验
// - 日期顺序校验(start <= end), 不合法请求不进入分摊引擎
// - 返回结构化结果 {status, message, timesheet_ids}
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::engine::hour_distributor::HourDistributor;
use crate::engine::timesheet_generator::TimesheetGenerator;
use crate::repository::slot_repo::PlanningSlotRepository;
use crate::repository::timesheet_repo::TimesheetRepository;

// ==========================================
// GenerateResponse - 结构化调用结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// "success" 或 "error"
    pub status: String,
    /// 人类可读消息
    pub message: String,
    /// 成功时为已创建工时单ID列表
    pub timesheet_ids: Vec<String>,
}

impl GenerateResponse {
    pub fn success(message: impl Into<String>, timesheet_ids: Vec<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            timesheet_ids,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            timesheet_ids: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// ==========================================
// TimesheetApi - 工时单生成 API
// ==========================================

/// 工时单生成API
///
/// 职责:
/// 1. 入参解析与校验(字符串日期边界)
/// 2. 按配置解析单日工时上限
/// 3. 委托 TimesheetGenerator 完成分摊与落库
/// 4. 业务性失败(入参不合法/无候选槽位)以结构化结果返回,不抛错
pub struct TimesheetApi {
    slot_repo: Arc<PlanningSlotRepository>,
    timesheet_repo: Arc<TimesheetRepository>,
    config_manager: Arc<ConfigManager>,
}

impl TimesheetApi {
    /// 创建新的TimesheetApi实例
    pub fn new(
        slot_repo: Arc<PlanningSlotRepository>,
        timesheet_repo: Arc<TimesheetRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            slot_repo,
            timesheet_repo,
            config_manager,
        }
    }

    /// 为客户在日期区间内生成工时单
    ///
    /// # 参数
    /// - `partner_id`: 客户ID
    /// - `start_date` / `end_date`: YYYY-MM-DD 字符串
    /// - `specific_slot_id`: 指定槽位时只处理该槽位
    ///
    /// # 返回
    /// - Ok(GenerateResponse): 结构化结果(含业务性 error)
    /// - Err(ApiError): 仓储/基础设施失败
    #[instrument(skip(self))]
    pub fn generate_timesheets(
        &self,
        partner_id: &str,
        start_date: &str,
        end_date: &str,
        specific_slot_id: Option<&str>,
    ) -> ApiResult<GenerateResponse> {
        // 1. 日期解析: 失败即返回结构化错误,不进入引擎
        let (start, end) = match (parse_date(start_date), parse_date(end_date)) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Ok(GenerateResponse::error(
                    "Invalid date format. Use YYYY-MM-DD.",
                ))
            }
        };

        // 2. 日期顺序校验(分摊引擎的前置条件)
        if start > end {
            return Ok(GenerateResponse::error(
                "Start date cannot be after end date.",
            ));
        }

        // 3. 按配置解析单日上限并委托引擎
        let daily_cap = self
            .config_manager
            .get_max_hours_per_day()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let generator = TimesheetGenerator::with_distributor(
            Arc::clone(&self.slot_repo),
            Arc::clone(&self.timesheet_repo),
            HourDistributor::with_daily_cap(daily_cap),
        );

        let report = generator.generate_for_customer(partner_id, start, end, specific_slot_id)?;

        // 4. 无候选槽位: 结构化错误
        if report.slots_matched == 0 {
            return Ok(GenerateResponse::error(
                "No planning slots found with effective or allocated hours for this customer.",
            ));
        }

        // 候选非空即成功,即使所有日期均已有工时单(created = 0)
        let created = report.created_timesheet_ids.len();
        Ok(GenerateResponse::success(
            format!("Created {} timesheet entries.", created),
            report.created_timesheet_ids,
        ))
    }
}

/// 解析 YYYY-MM-DD 日期字符串
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_strict_format() {
        assert_eq!(
            parse_date("2025-05-16"),
            NaiveDate::from_ymd_opt(2025, 5, 16)
        );
        assert!(parse_date("2025/05/16").is_none());
        assert!(parse_date("16-05-2025").is_none());
        assert!(parse_date("not-a-date").is_none());
    }
}
