//! AssignHub - 作业流转记录存储
//!
//! 教师创建小组、学科与作业，学生提交作业；所有记录以层级化的
//! JSON 文档形式落盘。HTTP 路由、会话认证、页面渲染与上传传输
//! 由外部协作层负责，本 crate 只承载存储与查询不变量。
//!
//! # 架构
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `storage`: 数据存储层（文件系统 JSON）
//! - `utils`: 标识生成与输入校验

pub mod config;
pub mod errors;
pub mod models;
pub mod storage;
pub mod utils;
