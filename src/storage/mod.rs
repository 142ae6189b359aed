use std::path::PathBuf;
use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, TaskListQuery},
        responses::TaskListItem,
    },
    groups::{entities::Group, requests::CreateGroupRequest},
    subjects::{entities::Subject, requests::CreateSubjectRequest},
    submissions::{entities::Submission, requests::SubmitRequest},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};

use crate::errors::Result;

pub mod fs_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（用户名重复时拒绝）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 列出全部用户，按创建顺序倒序
    async fn list_users(&self) -> Result<Vec<User>>;
    // 删除用户（不级联，悬挂引用保留）
    async fn delete_user(&self, username: &str) -> Result<bool>;

    /// 小组管理方法
    // 创建小组（学生名单初始为空）
    async fn create_group(&self, teacher: &str, group: CreateGroupRequest) -> Result<Group>;
    // 通过 ID 获取小组信息
    async fn get_group_by_id(&self, group_id: &str) -> Result<Option<Group>>;
    // 获取小组并校验归属教师
    async fn get_group_owned_by(&self, group_id: &str, teacher: &str) -> Result<Group>;
    // 列出该教师拥有的小组
    async fn list_groups_by_teacher(&self, teacher: &str) -> Result<Vec<Group>>;
    // 列出小组学生名单
    async fn list_group_students(&self, group_id: &str) -> Result<Vec<String>>;
    // 向小组追加学生（要求角色为 student 且未在名单中）
    async fn add_group_student(&self, group_id: &str, teacher: &str, username: &str)
    -> Result<()>;

    /// 学科管理方法
    // 创建学科
    async fn create_subject(&self, teacher: &str, subject: CreateSubjectRequest)
    -> Result<Subject>;
    // 通过 ID 获取学科信息
    async fn get_subject_by_id(&self, subject_id: &str) -> Result<Option<Subject>>;
    // 列出该教师拥有的学科
    async fn list_subjects_by_teacher(&self, teacher: &str) -> Result<Vec<Subject>>;

    /// 作业管理方法
    // 创建作业（校验小组/学科归属，分配 ID 与全局编号）
    async fn create_assignment(
        &self,
        author: &str,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过 ID 获取作业信息
    async fn get_assignment_by_id(&self, assignment_id: &str) -> Result<Option<Assignment>>;
    // 获取作业并校验作者
    async fn get_assignment_authored_by(
        &self,
        assignment_id: &str,
        author: &str,
    ) -> Result<Assignment>;
    // 任务视图：按作者/学生过滤并附带提交数，按创建时间倒序
    async fn list_tasks(&self, query: TaskListQuery) -> Result<Vec<TaskListItem>>;

    /// 提交管理方法
    // 学生提交作业（按 (assignment, username) upsert，整体覆盖）
    async fn submit(
        &self,
        assignment_id: &str,
        username: &str,
        submission: SubmitRequest,
    ) -> Result<Submission>;
    // 获取单条提交记录
    async fn get_submission(
        &self,
        assignment_id: &str,
        username: &str,
    ) -> Result<Option<Submission>>;
    // 列出某作业下的全部提交，按提交时间倒序
    async fn list_submissions(&self, assignment_id: &str) -> Result<Vec<Submission>>;

    /// 文件定位方法（供外部传输层下载）
    // 定位作业附件
    async fn resolve_attachment(
        &self,
        assignment_id: &str,
        filename: &str,
    ) -> Result<Option<PathBuf>>;
    // 定位学生提交文件
    async fn resolve_submission_file(
        &self,
        assignment_id: &str,
        username: &str,
        filename: &str,
    ) -> Result<Option<PathBuf>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = fs_storage::FsStorage::new().await?;
    Ok(Arc::new(storage))
}

/// 补种默认管理员
///
/// 仅当不存在任何 admin 角色用户时创建 admin/admin，返回是否创建。
/// 以角色而非用户名判断：操作员删除默认账户、改用其他名字的管理员
/// 之后，重启不会再悄悄复活默认口令账户。
pub async fn seed_default_admin(storage: &dyn Storage) -> Result<bool> {
    let users = storage.list_users().await?;
    if users.iter().any(|u| u.role == UserRole::Admin) {
        return Ok(false);
    }

    storage
        .create_user(CreateUserRequest {
            username: "admin".to_string(),
            password: "admin".to_string(),
            role: UserRole::Admin,
        })
        .await?;
    Ok(true)
}
