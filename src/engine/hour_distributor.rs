// ==========================================
// 排班工时系统 - 工时分摊引擎
// ==========================================
// 职责: 把总工时按日拆分为 (日期, 工时) 分摊序列
// 红线: 单日分摊不超过 max_hours_per_day
// ==========================================
// 输入: 总工时 + 日期区间 + 去重谓词
// 输出: 有序分摊序列 (纯计算,不做任何 I/O)
// ==========================================

use chrono::NaiveDate;
use tracing::instrument;

/// 单日工时上限(小时)
pub const MAX_HOURS_PER_DAY: f64 = 8.0;

// ==========================================
// Allocation - 单日分摊结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub date: NaiveDate, // 分摊日期
    pub hours: f64,      // 分摊工时 (0, max_hours_per_day]
}

// ==========================================
// HourDistributor - 工时分摊引擎
// ==========================================
// 无状态引擎,只持有单日上限
pub struct HourDistributor {
    max_hours_per_day: f64,
}

impl Default for HourDistributor {
    fn default() -> Self {
        Self::new()
    }
}

impl HourDistributor {
    /// 构造函数(单日上限 8 小时)
    pub fn new() -> Self {
        Self {
            max_hours_per_day: MAX_HOURS_PER_DAY,
        }
    }

    /// 指定单日上限的构造函数(配置覆写用)
    ///
    /// 上限必须是有限正数: 上限 <= 0 时每日扣减为 0, 分摊循环无法收敛,
    /// 非法值回退默认上限
    pub fn with_daily_cap(max_hours_per_day: f64) -> Self {
        let max_hours_per_day = if max_hours_per_day.is_finite() && max_hours_per_day > 0.0 {
            max_hours_per_day
        } else {
            MAX_HOURS_PER_DAY
        };
        Self { max_hours_per_day }
    }

    /// 当前单日上限
    pub fn daily_cap(&self) -> f64 {
        self.max_hours_per_day
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分摊总工时到日期区间
    ///
    /// 规则:
    /// 1) 从 start_date 到 end_date 逐日分摊, 每日 min(剩余, 上限)
    /// 2) exists(日期) 为真时该日不产出分摊, 但当日份额仍被扣减
    ///    (该日份额被静默消耗, 不会转移到后续日期)
    /// 3) 区间耗尽后仍有剩余时, 从 end_date+1 起逐日顺延, 规则同上, 无上界
    ///
    /// # 前置条件
    /// - start_date <= end_date (日期顺序校验由调用方负责)
    ///
    /// # 参数
    /// - `total_hours`: 待分摊总工时, <= 0 时返回空序列
    /// - `exists`: 去重谓词, 该日期已有工时单时返回 true
    ///
    /// # 返回
    /// 日期升序的分摊序列, 每项工时在 (0, 上限] 内
    #[instrument(skip(self, exists), fields(daily_cap = self.max_hours_per_day))]
    pub fn distribute<F>(
        &self,
        total_hours: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        mut exists: F,
    ) -> Vec<Allocation>
    where
        F: FnMut(NaiveDate) -> bool,
    {
        let mut allocations = Vec::new();
        if total_hours <= 0.0 {
            return allocations;
        }

        let mut remaining = total_hours;

        // 1. 主区间逐日分摊
        let mut current_date = start_date;
        while current_date <= end_date {
            if remaining <= 0.0 {
                break;
            }

            let hours_for_day = remaining.min(self.max_hours_per_day);
            if !exists(current_date) {
                allocations.push(Allocation {
                    date: current_date,
                    hours: hours_for_day,
                });
            }
            remaining -= hours_for_day;

            current_date = match current_date.succ_opt() {
                Some(d) => d,
                None => break, // 日历上界,不再顺延
            };
        }

        // 2. 剩余工时从区间末尾顺延
        let mut current_date = end_date;
        while remaining > 0.0 {
            current_date = match current_date.succ_opt() {
                Some(d) => d,
                None => break,
            };

            let hours_for_day = remaining.min(self.max_hours_per_day);
            if !exists(current_date) {
                allocations.push(Allocation {
                    date: current_date,
                    hours: hours_for_day,
                });
            }
            remaining -= hours_for_day;
        }

        tracing::debug!(
            allocations = allocations.len(),
            "工时分摊完成"
        );
        allocations
    }
}
