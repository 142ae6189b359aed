//! 文件系统存储实现
//!
//! 持久化布局（外部工具可能依赖，视为稳定契约）：
//!
//! ```text
//! users.json
//! groups/<group_id>/meta.json
//! groups/<group_id>/students.json
//! subjects/<subject_id>.json
//! assignments/<assignment_id>/meta.json
//! assignments/<assignment_id>/attachment/<file>
//! assignments/<assignment_id>/submissions/<user>/meta.json
//! assignments/<assignment_id>/submissions/<user>/file/<file>
//! ```
//!
//! 所有记录为 UTF-8 JSON，可直接人工查看。对同一集合的读改写
//! （users.json、students.json、作业编号分配）各由一把进程内互斥锁
//! 串行化；跨进程并发不在保证范围内。

mod assignments;
pub(crate) mod document;
mod groups;
mod submissions;
mod subjects;
mod users;

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::{AssignHubError, Result};

const ID_RETRY_LIMIT: u32 = 5;

/// 文件系统存储实现
pub struct FsStorage {
    root: PathBuf,
    // users.json 的读改写锁
    pub(crate) users_lock: Mutex<()>,
    // students.json 追加的读改写锁
    pub(crate) groups_lock: Mutex<()>,
    // 作业编号分配（扫描取 max + 写入）的临界区锁
    pub(crate) assignments_lock: Mutex<()>,
}

impl FsStorage {
    /// 按全局配置创建存储实例
    pub async fn new() -> Result<Self> {
        let config = AppConfig::get();
        Self::with_root(&config.storage.data_dir).await
    }

    /// 在指定数据根目录创建存储实例
    pub async fn with_root(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for dir in [
            root.clone(),
            root.join("groups"),
            root.join("subjects"),
            root.join("assignments"),
        ] {
            tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                AssignHubError::storage_init(format!("创建数据目录失败 {}: {e}", dir.display()))
            })?;
        }

        info!("文件系统存储初始化完成，数据目录: {}", root.display());

        Ok(Self {
            root,
            users_lock: Mutex::new(()),
            groups_lock: Mutex::new(()),
            assignments_lock: Mutex::new(()),
        })
    }

    // ---- 路径布局 ----

    pub(crate) fn users_path(&self) -> PathBuf {
        self.root.join("users.json")
    }

    pub(crate) fn group_dir(&self, group_id: &str) -> PathBuf {
        self.root.join("groups").join(group_id)
    }

    pub(crate) fn group_meta_path(&self, group_id: &str) -> PathBuf {
        self.group_dir(group_id).join("meta.json")
    }

    pub(crate) fn group_students_path(&self, group_id: &str) -> PathBuf {
        self.group_dir(group_id).join("students.json")
    }

    pub(crate) fn subjects_dir(&self) -> PathBuf {
        self.root.join("subjects")
    }

    pub(crate) fn subject_path(&self, subject_id: &str) -> PathBuf {
        self.subjects_dir().join(format!("{subject_id}.json"))
    }

    pub(crate) fn groups_dir(&self) -> PathBuf {
        self.root.join("groups")
    }

    pub(crate) fn assignments_dir(&self) -> PathBuf {
        self.root.join("assignments")
    }

    pub(crate) fn assignment_dir(&self, assignment_id: &str) -> PathBuf {
        self.assignments_dir().join(assignment_id)
    }

    pub(crate) fn assignment_meta_path(&self, assignment_id: &str) -> PathBuf {
        self.assignment_dir(assignment_id).join("meta.json")
    }

    pub(crate) fn attachment_dir(&self, assignment_id: &str) -> PathBuf {
        self.assignment_dir(assignment_id).join("attachment")
    }

    pub(crate) fn submissions_dir(&self, assignment_id: &str) -> PathBuf {
        self.assignment_dir(assignment_id).join("submissions")
    }

    pub(crate) fn submission_dir(&self, assignment_id: &str, username: &str) -> PathBuf {
        self.submissions_dir(assignment_id).join(username)
    }

    pub(crate) fn submission_meta_path(&self, assignment_id: &str, username: &str) -> PathBuf {
        self.submission_dir(assignment_id, username).join("meta.json")
    }

    pub(crate) fn submission_file_dir(&self, assignment_id: &str, username: &str) -> PathBuf {
        self.submission_dir(assignment_id, username).join("file")
    }

    /// 生成未被占用的不透明标识
    ///
    /// 低熵后缀碰撞概率非零，这里用 `exists` 回调检查目标是否已被
    /// 占用，有限次重试后放弃。
    pub(crate) fn allocate_id(
        &self,
        prefix: &str,
        exists: impl Fn(&str) -> bool,
    ) -> Result<String> {
        for _ in 0..ID_RETRY_LIMIT {
            let id = crate::utils::new_id(prefix);
            if !exists(&id) {
                return Ok(id);
            }
        }
        Err(AssignHubError::id_collision(format!(
            "标识分配失败，前缀: '{prefix}'，已重试 {ID_RETRY_LIMIT} 次"
        )))
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, TaskListQuery},
        responses::TaskListItem,
    },
    groups::{entities::Group, requests::CreateGroupRequest},
    subjects::{entities::Subject, requests::CreateSubjectRequest},
    submissions::{entities::Submission, requests::SubmitRequest},
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for FsStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.list_users_impl().await
    }

    async fn delete_user(&self, username: &str) -> Result<bool> {
        self.delete_user_impl(username).await
    }

    // 小组模块
    async fn create_group(&self, teacher: &str, group: CreateGroupRequest) -> Result<Group> {
        self.create_group_impl(teacher, group).await
    }

    async fn get_group_by_id(&self, group_id: &str) -> Result<Option<Group>> {
        self.get_group_by_id_impl(group_id).await
    }

    async fn get_group_owned_by(&self, group_id: &str, teacher: &str) -> Result<Group> {
        self.get_group_owned_by_impl(group_id, teacher).await
    }

    async fn list_groups_by_teacher(&self, teacher: &str) -> Result<Vec<Group>> {
        self.list_groups_by_teacher_impl(teacher).await
    }

    async fn list_group_students(&self, group_id: &str) -> Result<Vec<String>> {
        self.list_group_students_impl(group_id).await
    }

    async fn add_group_student(
        &self,
        group_id: &str,
        teacher: &str,
        username: &str,
    ) -> Result<()> {
        self.add_group_student_impl(group_id, teacher, username).await
    }

    // 学科模块
    async fn create_subject(
        &self,
        teacher: &str,
        subject: CreateSubjectRequest,
    ) -> Result<Subject> {
        self.create_subject_impl(teacher, subject).await
    }

    async fn get_subject_by_id(&self, subject_id: &str) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn list_subjects_by_teacher(&self, teacher: &str) -> Result<Vec<Subject>> {
        self.list_subjects_by_teacher_impl(teacher).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        author: &str,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(author, assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: &str) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn get_assignment_authored_by(
        &self,
        assignment_id: &str,
        author: &str,
    ) -> Result<Assignment> {
        self.get_assignment_authored_by_impl(assignment_id, author)
            .await
    }

    async fn list_tasks(&self, query: TaskListQuery) -> Result<Vec<TaskListItem>> {
        self.list_tasks_impl(query).await
    }

    // 提交模块
    async fn submit(
        &self,
        assignment_id: &str,
        username: &str,
        submission: SubmitRequest,
    ) -> Result<Submission> {
        self.submit_impl(assignment_id, username, submission).await
    }

    async fn get_submission(
        &self,
        assignment_id: &str,
        username: &str,
    ) -> Result<Option<Submission>> {
        self.get_submission_impl(assignment_id, username).await
    }

    async fn list_submissions(&self, assignment_id: &str) -> Result<Vec<Submission>> {
        self.list_submissions_impl(assignment_id).await
    }

    // 文件模块
    async fn resolve_attachment(
        &self,
        assignment_id: &str,
        filename: &str,
    ) -> Result<Option<PathBuf>> {
        self.resolve_attachment_impl(assignment_id, filename).await
    }

    async fn resolve_submission_file(
        &self,
        assignment_id: &str,
        username: &str,
        filename: &str,
    ) -> Result<Option<PathBuf>> {
        self.resolve_submission_file_impl(assignment_id, username, filename)
            .await
    }
}
