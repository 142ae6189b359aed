//! 用户存储操作
//!
//! 全部用户保存在单个 users.json 有序集合中，追加即创建顺序。
//! 创建与删除都是对该文件的读改写，由 users_lock 串行化。

use super::FsStorage;
use super::document::{read_document, write_document};
use crate::errors::{AssignHubError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use crate::utils::{require_name, require_username};
use tracing::info;

impl FsStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let username = require_username(&req.username)?;
        let password = require_name(&req.password, "密码")?;

        let _guard = self.users_lock.lock().await;

        let mut users: Vec<User> = read_document(&self.users_path(), Vec::new()).await;
        if users.iter().any(|u| u.username == username) {
            return Err(AssignHubError::validation(format!(
                "用户已存在: {username}"
            )));
        }

        let user = User {
            username,
            password,
            role: req.role,
        };
        users.push(user.clone());
        write_document(&self.users_path(), &users).await?;

        info!("创建用户: {} ({})", user.username, user.role);
        Ok(user)
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let users: Vec<User> = read_document(&self.users_path(), Vec::new()).await;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    /// 列出全部用户，按创建顺序倒序
    pub async fn list_users_impl(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = read_document(&self.users_path(), Vec::new()).await;
        users.reverse();
        Ok(users)
    }

    /// 删除用户
    ///
    /// 不级联：小组名单、作业作者与提交记录中的引用原样保留，
    /// 读取方自行处理悬挂引用。
    pub async fn delete_user_impl(&self, username: &str) -> Result<bool> {
        let _guard = self.users_lock.lock().await;

        let mut users: Vec<User> = read_document(&self.users_path(), Vec::new()).await;
        let before = users.len();
        users.retain(|u| u.username != username);
        if users.len() == before {
            return Ok(false);
        }

        write_document(&self.users_path(), &users).await?;
        info!("删除用户: {username}");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::fs_storage::FsStorage;

    fn user_req(username: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            password: "secret".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::with_root(dir.path()).await.unwrap();

        storage
            .create_user_impl(user_req("ivan", UserRole::Student))
            .await
            .unwrap();
        let err = storage
            .create_user_impl(user_req("ivan", UserRole::Teacher))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");

        let users = storage.list_users_impl().await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_write() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::with_root(dir.path()).await.unwrap();

        assert!(
            storage
                .create_user_impl(user_req("  ", UserRole::Student))
                .await
                .is_err()
        );
        assert!(storage.list_users_impl().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn username_with_path_characters_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::with_root(dir.path()).await.unwrap();

        // 用户名会作为 submissions/<user>/ 的路径片段使用
        for bad in ["ivan/../../etc", "a\\b", ".."] {
            let err = storage
                .create_user_impl(user_req(bad, UserRole::Student))
                .await
                .unwrap_err();
            assert_eq!(err.code(), "E004");
        }
        assert!(storage.list_users_impl().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_returns_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::with_root(dir.path()).await.unwrap();

        for name in ["a", "b", "c"] {
            storage
                .create_user_impl(user_req(name, UserRole::Student))
                .await
                .unwrap();
        }

        let names: Vec<String> = storage
            .list_users_impl()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::with_root(dir.path()).await.unwrap();

        storage
            .create_user_impl(user_req("ivan", UserRole::Student))
            .await
            .unwrap();
        assert!(storage.delete_user_impl("ivan").await.unwrap());
        assert!(!storage.delete_user_impl("ivan").await.unwrap());
        assert!(
            storage
                .get_user_by_username_impl("ivan")
                .await
                .unwrap()
                .is_none()
        );
    }
}
