//! 自定义断言宏
//!
//! 提供针对页面可见性的专用断言。

/// 断言页面谓词为 true
#[macro_export]
macro_rules! assert_visible {
    ($env:expr, $rules:expr, $predicate:expr) => {
        let visible = $env.visible($rules, $predicate);
        assert!(visible, "谓词 {} 应该为 true", $predicate);
    };
}

/// 断言页面谓词为 false
#[macro_export]
macro_rules! assert_hidden {
    ($env:expr, $rules:expr, $predicate:expr) => {
        let visible = $env.visible($rules, $predicate);
        assert!(!visible, "谓词 {} 应该为 false", $predicate);
    };
}
