//! 作业存储操作
//!
//! 全局编号 = 扫描全部已有作业取 max(number) + 1。编号计算与
//! meta 写入处于 assignments_lock 的同一临界区内，单进程下不会
//! 出现两次创建取到相同编号。

use super::FsStorage;
use super::document::{read_optional, write_document};
use crate::errors::{AssignHubError, Result};
use crate::models::assignments::{
    entities::Assignment,
    requests::{CreateAssignmentRequest, TaskListQuery},
    responses::TaskListItem,
};
use crate::utils::{check_upload_size, require_name, sanitize_filename};
use tracing::info;

impl FsStorage {
    /// 创建作业
    ///
    /// 归属校验只在创建时刻进行：小组与学科都必须存在且属于作者。
    /// 缺失的必填引用按校验失败拒绝，归属错误按越权拒绝，二者都
    /// 发生在任何写入之前。
    pub async fn create_assignment_impl(
        &self,
        author: &str,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let title = require_name(&req.title, "作业标题")?;
        let description = req.description.trim().to_string();

        if let Some(ref upload) = req.attachment {
            check_upload_size(upload.content.len())?;
        }

        let group = self
            .get_group_by_id_impl(&req.group_id)
            .await?
            .ok_or_else(|| {
                AssignHubError::validation(format!("小组不存在: {}", req.group_id))
            })?;
        if group.teacher != author {
            return Err(AssignHubError::authorization(format!(
                "小组 {} 不属于教师 {author}",
                req.group_id
            )));
        }

        let subject = self
            .get_subject_by_id_impl(&req.subject_id)
            .await?
            .ok_or_else(|| {
                AssignHubError::validation(format!("学科不存在: {}", req.subject_id))
            })?;
        if subject.teacher != author {
            return Err(AssignHubError::authorization(format!(
                "学科 {} 不属于教师 {author}",
                req.subject_id
            )));
        }

        let _guard = self.assignments_lock.lock().await;

        let id = self.allocate_id("", |id| self.assignment_dir(id).exists())?;
        let number = self.next_assignment_number().await;

        // 容器目录先于 meta 创建；进程在 meta 落盘前中断时，
        // 读取方只会观察到"不存在"
        for dir in [self.attachment_dir(&id), self.submissions_dir(&id)] {
            tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                AssignHubError::file_operation(format!("创建目录失败 {}: {e}", dir.display()))
            })?;
        }

        let attachment = match req.attachment {
            Some(upload) => {
                let filename = sanitize_filename(&upload.filename);
                let path = self.attachment_dir(&id).join(&filename);
                tokio::fs::write(&path, &upload.content).await.map_err(|e| {
                    AssignHubError::file_operation(format!(
                        "写入附件失败 {}: {e}",
                        path.display()
                    ))
                })?;
                Some(filename)
            }
            None => None,
        };

        let assignment = Assignment {
            id: id.clone(),
            number,
            title,
            description,
            author: author.to_string(),
            created_at: chrono::Utc::now(),
            attachment,
            group_id: group.id,
            group_name: group.name,
            subject_id: subject.id,
            subject_name: subject.name,
        };
        write_document(&self.assignment_meta_path(&id), &assignment).await?;

        info!("创建作业 #{number}: {} ({id})", assignment.title);
        Ok(assignment)
    }

    /// 扫描全部已有作业，返回下一个编号
    ///
    /// 调用方必须持有 assignments_lock。
    async fn next_assignment_number(&self) -> i64 {
        let mut max_number = 0;
        if let Ok(mut entries) = tokio::fs::read_dir(self.assignments_dir()).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let meta_path = entry.path().join("meta.json");
                if let Some(assignment) = read_optional::<Assignment>(&meta_path).await {
                    max_number = max_number.max(assignment.number);
                }
            }
        }
        max_number + 1
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(
        &self,
        assignment_id: &str,
    ) -> Result<Option<Assignment>> {
        Ok(read_optional(&self.assignment_meta_path(assignment_id)).await)
    }

    /// 获取作业并校验作者
    pub async fn get_assignment_authored_by_impl(
        &self,
        assignment_id: &str,
        author: &str,
    ) -> Result<Assignment> {
        let assignment = self
            .get_assignment_by_id_impl(assignment_id)
            .await?
            .ok_or_else(|| {
                AssignHubError::not_found(format!("作业不存在: {assignment_id}"))
            })?;
        if assignment.author != author {
            return Err(AssignHubError::authorization(format!(
                "作业 {assignment_id} 不属于教师 {author}"
            )));
        }
        Ok(assignment)
    }

    /// 任务视图：过滤 + 小组名单连接 + 提交数聚合，按创建时间倒序
    pub async fn list_tasks_impl(&self, query: TaskListQuery) -> Result<Vec<TaskListItem>> {
        let mut tasks = Vec::new();
        let mut entries = match tokio::fs::read_dir(self.assignments_dir()).await {
            Ok(entries) => entries,
            Err(_) => return Ok(tasks),
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let meta_path = entry.path().join("meta.json");
            let Some(assignment) = read_optional::<Assignment>(&meta_path).await else {
                continue;
            };

            if let Some(ref author) = query.author
                && assignment.author != *author
            {
                continue;
            }

            if let Some(ref student) = query.for_student {
                // 小组文档缺失（悬挂引用）时名单为空，任务被排除
                let students = self.list_group_students_impl(&assignment.group_id).await?;
                if !students.iter().any(|s| s == student) {
                    continue;
                }
            }

            let submissions_count = self.count_submissions(&assignment.id).await;
            tasks.push(TaskListItem {
                assignment,
                submissions_count,
            });
        }

        tasks.sort_by(|a, b| b.assignment.created_at.cmp(&a.assignment.created_at));
        Ok(tasks)
    }

    /// 统计某作业下的提交条目数
    pub(crate) async fn count_submissions(&self, assignment_id: &str) -> usize {
        let mut count = 0;
        if let Ok(mut entries) = tokio::fs::read_dir(self.submissions_dir(assignment_id)).await {
            while let Ok(Some(_)) = entries.next_entry().await {
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use crate::models::assignments::requests::{CreateAssignmentRequest, TaskListQuery};
    use crate::models::files::entities::FileUpload;
    use crate::models::groups::requests::CreateGroupRequest;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::fs_storage::FsStorage;

    struct Fixture {
        storage: FsStorage,
        group_id: String,
        subject_id: String,
    }

    // 教师 olena + 学生 ivan（已入组）+ 一组一科
    async fn fixture(root: &std::path::Path) -> Fixture {
        let storage = FsStorage::with_root(root).await.unwrap();
        for (name, role) in [("olena", UserRole::Teacher), ("ivan", UserRole::Student)] {
            storage
                .create_user_impl(CreateUserRequest {
                    username: name.to_string(),
                    password: "secret".to_string(),
                    role,
                })
                .await
                .unwrap();
        }
        let group = storage
            .create_group_impl(
                "olena",
                CreateGroupRequest {
                    name: "К-101".to_string(),
                },
            )
            .await
            .unwrap();
        storage
            .add_group_student_impl(&group.id, "olena", "ivan")
            .await
            .unwrap();
        let subject = storage
            .create_subject_impl(
                "olena",
                CreateSubjectRequest {
                    name: "Алгебра".to_string(),
                },
            )
            .await
            .unwrap();
        Fixture {
            storage,
            group_id: group.id,
            subject_id: subject.id,
        }
    }

    fn assignment_req(title: &str, group_id: &str, subject_id: &str) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: title.to_string(),
            description: "розв'язати задачі".to_string(),
            group_id: group_id.to_string(),
            subject_id: subject_id.to_string(),
            attachment: None,
        }
    }

    #[tokio::test]
    async fn numbering_is_gapless_from_one() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;

        for expected in 1..=3 {
            let assignment = fx
                .storage
                .create_assignment_impl(
                    "olena",
                    assignment_req("ДЗ", &fx.group_id, &fx.subject_id),
                )
                .await
                .unwrap();
            assert_eq!(assignment.number, expected);
        }
    }

    #[tokio::test]
    async fn creation_validates_references_and_ownership() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;

        // 缺失引用：校验失败
        let missing = fx
            .storage
            .create_assignment_impl("olena", assignment_req("ДЗ", "g-missing", &fx.subject_id))
            .await
            .unwrap_err();
        assert_eq!(missing.code(), "E004");

        // 他人的小组：越权
        let foreign = fx
            .storage
            .create_assignment_impl("petro", assignment_req("ДЗ", &fx.group_id, &fx.subject_id))
            .await
            .unwrap_err();
        assert_eq!(foreign.code(), "E006");
    }

    #[tokio::test]
    async fn created_assignment_round_trips_with_snapshot_names() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;

        let assignment = fx
            .storage
            .create_assignment_impl(
                "olena",
                assignment_req("ДЗ 1", &fx.group_id, &fx.subject_id),
            )
            .await
            .unwrap();
        assert_eq!(assignment.group_name, "К-101");
        assert_eq!(assignment.subject_name, "Алгебра");

        let loaded = fx
            .storage
            .get_assignment_by_id_impl(&assignment.id)
            .await
            .unwrap();
        assert_eq!(loaded, Some(assignment));
    }

    #[tokio::test]
    async fn attachment_is_sanitized_and_stored() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;

        let mut req = assignment_req("ДЗ", &fx.group_id, &fx.subject_id);
        req.attachment = Some(FileUpload {
            filename: "../lecture notes.pdf".to_string(),
            content: b"pdf".to_vec(),
        });
        let assignment = fx
            .storage
            .create_assignment_impl("olena", req)
            .await
            .unwrap();
        let stored = assignment.attachment.unwrap();
        assert_eq!(stored, "lecture_notes.pdf");

        let path = fx
            .storage
            .resolve_attachment_impl(&assignment.id, &stored)
            .await
            .unwrap();
        assert!(path.is_some());
    }

    #[tokio::test]
    async fn membership_join_scopes_tasks_to_student() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;

        let assignment = fx
            .storage
            .create_assignment_impl("olena", assignment_req("ДЗ", &fx.group_id, &fx.subject_id))
            .await
            .unwrap();

        let for_ivan = fx
            .storage
            .list_tasks_impl(TaskListQuery {
                for_student: Some("ivan".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(for_ivan.len(), 1);
        assert_eq!(for_ivan[0].assignment.id, assignment.id);
        assert_eq!(for_ivan[0].submissions_count, 0);

        // 不在名单中的学生看不到任务
        let for_other = fx
            .storage
            .list_tasks_impl(TaskListQuery {
                for_student: Some("petro".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(for_other.is_empty());
    }

    #[tokio::test]
    async fn author_filter_keeps_only_own_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;

        fx.storage
            .create_assignment_impl("olena", assignment_req("ДЗ", &fx.group_id, &fx.subject_id))
            .await
            .unwrap();

        let own = fx
            .storage
            .list_tasks_impl(TaskListQuery {
                author: Some("olena".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(own.len(), 1);

        let other = fx
            .storage
            .list_tasks_impl(TaskListQuery {
                author: Some("petro".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn author_check_distinguishes_missing_from_foreign() {
        let dir = tempfile::tempdir().unwrap();
        let fx = fixture(dir.path()).await;

        let assignment = fx
            .storage
            .create_assignment_impl("olena", assignment_req("ДЗ", &fx.group_id, &fx.subject_id))
            .await
            .unwrap();

        let missing = fx
            .storage
            .get_assignment_authored_by_impl("20000101-000000-zzzz", "olena")
            .await
            .unwrap_err();
        assert_eq!(missing.code(), "E005");

        let foreign = fx
            .storage
            .get_assignment_authored_by_impl(&assignment.id, "petro")
            .await
            .unwrap_err();
        assert_eq!(foreign.code(), "E006");
    }
}
