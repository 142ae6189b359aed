use crate::models::files::entities::FileUpload;

// 提交作业请求（upsert 语义）
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub note: String,
    // 学生上传文件（可选）
    pub file: Option<FileUpload>,
}
