use serde::{Deserialize, Serialize};

// 学科实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    // 学科 ID
    pub id: String,
    // 学科名称
    pub name: String,
    // 所属教师用户名
    pub teacher: String,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}
