//! 输入校验与文件名清洗

use crate::errors::{AssignHubError, Result};

/// 校验名称类输入非空，返回去除首尾空白后的值
pub fn require_name(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AssignHubError::validation(format!("{field} 不能为空")));
    }
    Ok(trimmed.to_string())
}

/// 校验用户名非空且可以安全地作为路径片段使用
///
/// 用户名会出现在 submissions/<user>/ 路径中，这里在创建时就拒绝
/// 路径分隔符与 `..`，而不是留给后续清洗。
pub fn require_username(value: &str) -> Result<String> {
    let name = require_name(value, "用户名")?;
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(AssignHubError::validation(format!(
            "用户名包含非法字符: {name}"
        )));
    }
    Ok(name)
}

/// 按配置上限校验上传文件大小
pub fn check_upload_size(len: usize) -> Result<()> {
    let max = crate::config::AppConfig::get().upload.max_size;
    if len > max {
        return Err(AssignHubError::validation(format!(
            "上传文件过大: {len} 字节，上限 {max} 字节"
        )));
    }
    Ok(())
}

/// 清洗调用方提供的文件名，使其可以安全地作为单个路径片段使用
///
/// - 丢弃所有目录部分（`/` 与 `\` 之前的内容）
/// - 仅保留 ASCII 字母数字以及 `.`、`-`、`_`，其余字符替换为 `_`
/// - 去掉开头的 `.`，防止隐藏文件与 `..` 穿越
/// - 清洗后为空时回退为 `file`
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(raw);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
