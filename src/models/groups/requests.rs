use serde::Deserialize;

// 创建小组请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}
