//! 测试套件模块
//!
//! 按会话场景组织的测试用例集合。

pub mod invalid_token;
pub mod registry_upgrade;
pub mod session_lifecycle;
