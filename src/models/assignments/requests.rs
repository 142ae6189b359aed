use crate::models::files::entities::FileUpload;
use serde::Deserialize;

// 创建作业请求
#[derive(Debug, Clone)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: String,
    pub group_id: String,
    pub subject_id: String,
    // 教师附件（可选）
    pub attachment: Option<FileUpload>,
}

// 任务列表查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListQuery {
    // 只保留该教师创建的任务
    pub author: Option<String>,
    // 只保留该学生所在小组的任务
    pub for_student: Option<String>,
}
