//! 测试辅助工具模块
//!
//! 提供模拟会话载体与页面可见性断言。

mod assertions;
mod session;

pub use session::*;
