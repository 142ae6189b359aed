use serde::{Deserialize, Serialize};

// 作业任务实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    // 存储标识（时间戳 + 随机后缀）
    pub id: String,
    // 面向用户的全局递增编号，分配后不再复用
    pub number: i64,
    // 标题
    pub title: String,
    // 描述
    pub description: String,
    // 作者（教师用户名）
    pub author: String,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 附件文件名（可选，文件本体存于 attachment/ 目录）
    pub attachment: Option<String>,
    // 关联小组 ID
    pub group_id: String,
    // 小组名称（创建时刻的快照，之后不维护）
    pub group_name: String,
    // 关联学科 ID
    pub subject_id: String,
    // 学科名称（创建时刻的快照）
    pub subject_name: String,
}
