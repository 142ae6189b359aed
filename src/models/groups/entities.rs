use serde::{Deserialize, Serialize};

// 学习小组实体
//
// 学生名单不在 meta 中，而是作为同目录下独立的有序集合持久化
// （groups/<id>/students.json），追加写入时整体替换。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    // 小组 ID
    pub id: String,
    // 小组名称
    pub name: String,
    // 所属教师用户名
    pub teacher: String,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}
