//! School Admin - 学校教务管理后端服务
//!
//! 基于 Actix Web 构建的成绩报告单与学生升级服务。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `middlewares`: 操作人中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（成绩汇总、升级校验）
//! - `storage`: 数据存储层（基于缓存的 JSON 文档仓储）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
