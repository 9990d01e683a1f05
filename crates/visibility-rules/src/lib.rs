//! 会员可见性规则引擎
//!
//! 提供会员权益属性的紧凑编码与派生谓词评估：
//! - 只追加的属性注册表（名称 <-> 比特位置）
//! - 6 位分组的令牌编解码，向前/向后兼容
//! - 具名派生谓词目录，依赖按注册顺序解析
//! - 会话载体接入与损坏令牌处理策略

pub mod catalog;
pub mod cli;
pub mod codec;
pub mod context;
pub mod error;
pub mod models;
pub mod predicates;
pub mod registry;
pub mod session;

pub use catalog::{PredicateCatalog, PredicateDef, PredicateKind, PredicateOutcome, PredicateReport};
pub use codec::{ALPHABET, VisibilityCodec};
pub use context::{EvaluationContext, GroupId, PlanTerm};
pub use error::{Result, RuleError};
pub use models::{CoverageStatus, PlanKind, PredicateValue, VisibilityRules};
pub use registry::{AttributeEntry, AttributeRegistry};
pub use session::{RequestRules, TokenCarrier, VisibilityGate};
