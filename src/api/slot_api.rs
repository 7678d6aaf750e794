// ==========================================
// 排班工时系统 - 槽位发布 API
// ==========================================
// 职责: 槽位发布动作 + 发布后工时单生成钩子
// 组合方式: 显式两步 —— 先执行基础发布,再触发生成流程
// ==========================================

use std::sync::Arc;

use tracing::instrument;

use crate::api::error::ApiResult;
use crate::api::timesheet_api::TimesheetApi;
use crate::domain::slot::PlanningSlot;
use crate::repository::slot_repo::PlanningSlotRepository;

// ==========================================
// SlotApi - 槽位发布 API
// ==========================================

/// 槽位发布API
///
/// 职责:
/// 1. 基础发布: 槽位状态置为 PUBLISHED
/// 2. 发布钩子: 已指派资源的槽位,按其自身日期跨度生成工时单
/// 3. 钩子内的生成结果不影响发布本身的成败
pub struct SlotApi {
    slot_repo: Arc<PlanningSlotRepository>,
    timesheet_api: Arc<TimesheetApi>,
}

impl SlotApi {
    /// 创建新的SlotApi实例
    pub fn new(slot_repo: Arc<PlanningSlotRepository>, timesheet_api: Arc<TimesheetApi>) -> Self {
        Self {
            slot_repo,
            timesheet_api,
        }
    }

    /// 发布槽位
    ///
    /// 流程:
    /// 1) 基础发布(状态流转)
    /// 2) 已指派资源时,以槽位自身的 [开始日, 结束日] 触发工时单生成,
    ///    并把本槽位作为指定槽位收窄候选范围
    ///
    /// # 返回
    /// 发布后的槽位
    #[instrument(skip(self))]
    pub fn publish_slot(&self, slot_id: &str) -> ApiResult<PlanningSlot> {
        // 1. 基础发布
        let slot = self.slot_repo.mark_published(slot_id)?;

        // 2. 发布钩子: 未指派资源的槽位不触发生成
        if let Some(partner_id) = slot.partner_id.as_deref() {
            let (start, end) = slot.date_span();
            let outcome = self.timesheet_api.generate_timesheets(
                partner_id,
                &start.to_string(),
                &end.to_string(),
                Some(&slot.slot_id),
            );

            // 钩子结果只记录,不回滚发布
            match outcome {
                Ok(response) => tracing::info!(
                    slot_id = %slot.slot_id,
                    status = %response.status,
                    message = %response.message,
                    created = response.timesheet_ids.len(),
                    "发布钩子: 工时单生成完成"
                ),
                Err(e) => tracing::warn!(
                    slot_id = %slot.slot_id,
                    error = %e,
                    "发布钩子: 工时单生成失败"
                ),
            }
        }

        Ok(slot)
    }
}
