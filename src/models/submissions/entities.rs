use serde::{Deserialize, Serialize};

// 学生提交记录
//
// 以 (assignment_id, username) 为键，重复提交原地覆盖，不保留历史。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    // 所属作业 ID
    pub assignment_id: String,
    // 提交学生用户名
    pub username: String,
    // 文字说明
    pub note: String,
    // 提交文件名（可选，文件本体存于 file/ 目录）
    pub filename: Option<String>,
    // 提交时间（覆盖提交时整体替换）
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
