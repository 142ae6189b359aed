//! 文档读写原语
//!
//! 读取：文件缺失或无法解析时一律返回默认值，调用方无法区分
//! 两种情况，也不会收到错误。写入：先补齐父目录再整体替换，
//! 对同一路径的并发写以最后一次为准。

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::errors::{AssignHubError, Result};

/// 读取文档，缺失或损坏时返回 `default`
pub(crate) async fn read_document<T: DeserializeOwned>(path: &Path, default: T) -> T {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or(default),
        Err(_) => default,
    }
}

/// 读取文档，缺失或损坏时返回 `None`
pub(crate) async fn read_optional<T: DeserializeOwned>(path: &Path) -> Option<T> {
    read_document(path, None).await
}

/// 写入文档，自动创建缺失的父目录，整体替换旧值
pub(crate) async fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            AssignHubError::file_operation(format!("创建目录失败 {}: {e}", parent.display()))
        })?;
    }

    let json = serde_json::to_vec_pretty(document)?;
    fs::write(path, json).await.map_err(|e| {
        AssignHubError::file_operation(format!("写入文档失败 {}: {e}", path.display()))
    })
}
