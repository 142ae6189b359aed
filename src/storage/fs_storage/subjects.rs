//! 学科存储操作
//!
//! 每个学科是 subjects/ 下的单个 JSON 文件，创建后不可变。

use super::FsStorage;
use super::document::{read_optional, write_document};
use crate::errors::Result;
use crate::models::subjects::{entities::Subject, requests::CreateSubjectRequest};
use crate::utils::require_name;
use tracing::info;

impl FsStorage {
    /// 创建学科
    pub async fn create_subject_impl(
        &self,
        teacher: &str,
        req: CreateSubjectRequest,
    ) -> Result<Subject> {
        let name = require_name(&req.name, "学科名称")?;
        let id = self.allocate_id("s-", |id| self.subject_path(id).exists())?;

        let subject = Subject {
            id: id.clone(),
            name,
            teacher: teacher.to_string(),
            created_at: chrono::Utc::now(),
        };
        write_document(&self.subject_path(&id), &subject).await?;

        info!("创建学科: {} ({})", subject.name, subject.id);
        Ok(subject)
    }

    /// 通过 ID 获取学科
    pub async fn get_subject_by_id_impl(&self, subject_id: &str) -> Result<Option<Subject>> {
        Ok(read_optional(&self.subject_path(subject_id)).await)
    }

    /// 列出该教师拥有的学科，按创建时间倒序
    pub async fn list_subjects_by_teacher_impl(&self, teacher: &str) -> Result<Vec<Subject>> {
        let mut subjects = Vec::new();
        let mut entries = match tokio::fs::read_dir(self.subjects_dir()).await {
            Ok(entries) => entries,
            Err(_) => return Ok(subjects),
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(subject) = read_optional::<Subject>(&path).await
                && subject.teacher == teacher
            {
                subjects.push(subject);
            }
        }

        subjects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(subjects)
    }
}
