// ==========================================
// 排班工时系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 槽位状态 (Slot State)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotState {
    Draft,     // 草稿(未发布)
    Published, // 已发布(触发工时单生成)
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotState::Draft => write!(f, "DRAFT"),
            SlotState::Published => write!(f, "PUBLISHED"),
        }
    }
}

impl SlotState {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "DRAFT" => SlotState::Draft,
            "PUBLISHED" => SlotState::Published,
            _ => SlotState::Draft, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SlotState::Draft => "DRAFT",
            SlotState::Published => "PUBLISHED",
        }
    }
}
