//! 小组存储操作
//!
//! meta.json 保存小组记录，students.json 保存学生名单（仅追加）。
//! 名单追加是读改写，由 groups_lock 串行化，避免两次并发追加
//! 互相覆盖。

use super::FsStorage;
use super::document::{read_document, read_optional, write_document};
use crate::errors::{AssignHubError, Result};
use crate::models::groups::{entities::Group, requests::CreateGroupRequest};
use crate::models::users::entities::UserRole;
use crate::utils::require_name;
use tracing::info;

impl FsStorage {
    /// 创建小组，学生名单初始为空
    pub async fn create_group_impl(
        &self,
        teacher: &str,
        req: CreateGroupRequest,
    ) -> Result<Group> {
        let name = require_name(&req.name, "小组名称")?;
        let id = self.allocate_id("g-", |id| self.group_dir(id).exists())?;

        let group = Group {
            id: id.clone(),
            name,
            teacher: teacher.to_string(),
            created_at: chrono::Utc::now(),
        };
        write_document(&self.group_meta_path(&id), &group).await?;
        write_document(&self.group_students_path(&id), &Vec::<String>::new()).await?;

        info!("创建小组: {} ({})", group.name, group.id);
        Ok(group)
    }

    /// 通过 ID 获取小组
    pub async fn get_group_by_id_impl(&self, group_id: &str) -> Result<Option<Group>> {
        Ok(read_optional(&self.group_meta_path(group_id)).await)
    }

    /// 获取小组并校验归属教师
    ///
    /// 缺失与归属错误是两类不同的拒绝：前者 NotFound，后者
    /// Authorization。
    pub async fn get_group_owned_by_impl(&self, group_id: &str, teacher: &str) -> Result<Group> {
        let group = self
            .get_group_by_id_impl(group_id)
            .await?
            .ok_or_else(|| AssignHubError::not_found(format!("小组不存在: {group_id}")))?;
        if group.teacher != teacher {
            return Err(AssignHubError::authorization(format!(
                "小组 {group_id} 不属于教师 {teacher}"
            )));
        }
        Ok(group)
    }

    /// 列出该教师拥有的小组，按创建时间倒序
    pub async fn list_groups_by_teacher_impl(&self, teacher: &str) -> Result<Vec<Group>> {
        let mut groups = Vec::new();
        let mut entries = match tokio::fs::read_dir(self.groups_dir()).await {
            Ok(entries) => entries,
            Err(_) => return Ok(groups),
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let meta_path = entry.path().join("meta.json");
            if let Some(group) = read_optional::<Group>(&meta_path).await
                && group.teacher == teacher
            {
                groups.push(group);
            }
        }

        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(groups)
    }

    /// 列出小组学生名单
    pub async fn list_group_students_impl(&self, group_id: &str) -> Result<Vec<String>> {
        Ok(read_document(&self.group_students_path(group_id), Vec::new()).await)
    }

    /// 向小组追加学生
    ///
    /// 拒绝条件：小组不存在 / 归属错误、目标用户不存在或不是
    /// student 角色、已在名单中。
    pub async fn add_group_student_impl(
        &self,
        group_id: &str,
        teacher: &str,
        username: &str,
    ) -> Result<()> {
        self.get_group_owned_by_impl(group_id, teacher).await?;

        let user = self
            .get_user_by_username_impl(username)
            .await?
            .ok_or_else(|| AssignHubError::validation(format!("用户不存在: {username}")))?;
        if user.role != UserRole::Student {
            return Err(AssignHubError::validation(format!(
                "用户 {username} 不是学生，无法加入小组"
            )));
        }

        let _guard = self.groups_lock.lock().await;

        let mut students: Vec<String> =
            read_document(&self.group_students_path(group_id), Vec::new()).await;
        if students.iter().any(|s| s == username) {
            return Err(AssignHubError::validation(format!(
                "学生 {username} 已在小组 {group_id} 中"
            )));
        }
        students.push(username.to_string());
        write_document(&self.group_students_path(group_id), &students).await?;

        info!("小组 {group_id} 添加学生: {username}");
        Ok(())
    }
}
