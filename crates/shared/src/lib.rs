//! 共享库
//!
//! 包含门户各二进制共用的配置、可观测性初始化和测试 fixture。

pub mod config;
pub mod observability;
pub mod test_utils;
