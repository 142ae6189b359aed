//! 提交存储操作
//!
//! 每个学生在每个作业下至多一条在档提交，重复提交整体覆盖
//! meta（说明、文件名、时间戳），不保留历史。

use std::path::PathBuf;

use super::FsStorage;
use super::document::{read_optional, write_document};
use crate::errors::{AssignHubError, Result};
use crate::models::submissions::{entities::Submission, requests::SubmitRequest};
use crate::utils::{check_upload_size, sanitize_filename};
use tracing::info;

impl FsStorage {
    /// 学生提交作业（upsert 语义）
    ///
    /// 要求作业存在且学生在其小组名单中；未上传文件时 filename
    /// 置空，即使之前的提交带有文件。
    pub async fn submit_impl(
        &self,
        assignment_id: &str,
        username: &str,
        req: SubmitRequest,
    ) -> Result<Submission> {
        let assignment = self
            .get_assignment_by_id_impl(assignment_id)
            .await?
            .ok_or_else(|| {
                AssignHubError::not_found(format!("作业不存在: {assignment_id}"))
            })?;

        let students = self.list_group_students_impl(&assignment.group_id).await?;
        if !students.iter().any(|s| s == username) {
            return Err(AssignHubError::authorization(format!(
                "学生 {username} 不在作业 {assignment_id} 的小组名单中"
            )));
        }

        let filename = match req.file {
            Some(upload) => {
                check_upload_size(upload.content.len())?;
                let filename = sanitize_filename(&upload.filename);
                let dir = self.submission_file_dir(assignment_id, username);
                tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                    AssignHubError::file_operation(format!(
                        "创建目录失败 {}: {e}",
                        dir.display()
                    ))
                })?;
                let path = dir.join(&filename);
                tokio::fs::write(&path, &upload.content).await.map_err(|e| {
                    AssignHubError::file_operation(format!(
                        "写入提交文件失败 {}: {e}",
                        path.display()
                    ))
                })?;
                Some(filename)
            }
            None => None,
        };

        let submission = Submission {
            assignment_id: assignment_id.to_string(),
            username: username.to_string(),
            note: req.note.trim().to_string(),
            filename,
            submitted_at: chrono::Utc::now(),
        };
        write_document(
            &self.submission_meta_path(assignment_id, username),
            &submission,
        )
        .await?;

        info!("作业 {assignment_id} 收到提交: {username}");
        Ok(submission)
    }

    /// 获取单条提交记录
    pub async fn get_submission_impl(
        &self,
        assignment_id: &str,
        username: &str,
    ) -> Result<Option<Submission>> {
        Ok(read_optional(&self.submission_meta_path(assignment_id, username)).await)
    }

    /// 列出某作业下的全部提交，按提交时间倒序
    pub async fn list_submissions_impl(&self, assignment_id: &str) -> Result<Vec<Submission>> {
        let mut submissions = Vec::new();
        let mut entries = match tokio::fs::read_dir(self.submissions_dir(assignment_id)).await {
            Ok(entries) => entries,
            Err(_) => return Ok(submissions),
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let meta_path = entry.path().join("meta.json");
            if let Some(submission) = read_optional::<Submission>(&meta_path).await {
                submissions.push(submission);
            }
        }

        submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(submissions)
    }

    /// 定位作业附件，供外部传输层下载
    pub async fn resolve_attachment_impl(
        &self,
        assignment_id: &str,
        filename: &str,
    ) -> Result<Option<PathBuf>> {
        let path = self
            .attachment_dir(assignment_id)
            .join(sanitize_filename(filename));
        Ok(path.is_file().then_some(path))
    }

    /// 定位学生提交文件，供外部传输层下载
    pub async fn resolve_submission_file_impl(
        &self,
        assignment_id: &str,
        username: &str,
        filename: &str,
    ) -> Result<Option<PathBuf>> {
        let path = self
            .submission_file_dir(assignment_id, username)
            .join(sanitize_filename(filename));
        Ok(path.is_file().then_some(path))
    }
}
