use super::entities::Assignment;
use serde::Serialize;

// 任务列表项：作业本体加上提交数聚合
#[derive(Debug, Clone, Serialize)]
pub struct TaskListItem {
    #[serde(flatten)]
    pub assignment: Assignment,
    // 该作业下的提交记录数
    pub submissions_count: usize,
}
