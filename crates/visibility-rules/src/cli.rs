//! 诊断命令行
//!
//! 使用 clap derive 宏定义命令行接口，供运维与开发人员查看注册表、
//! 编解码令牌、枚举全部谓词的求值结果。

use crate::catalog::PredicateCatalog;
use crate::codec::VisibilityCodec;
use crate::context::{EvaluationContext, GroupId, PlanTerm, parse_date};
use crate::models::VisibilityRules;
use crate::registry::AttributeRegistry;
use crate::session::{RequestRules, TokenCarrier, VisibilityGate};
use anyhow::bail;
use clap::{Parser, Subcommand};
use portal_shared::config::SessionConfig;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// 可见性规则诊断工具
#[derive(Parser, Debug)]
#[command(name = "visibility-rules")]
#[command(version, about = "会员可见性规则诊断工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 按位置顺序列出注册表
    Registry,

    /// 查询属性的比特位置
    Position {
        /// 属性名
        name: String,
    },

    /// 编码属性集为令牌
    Encode {
        /// 值为 true 的属性（逗号分隔）
        #[arg(long, value_delimiter = ',')]
        set: Vec<String>,

        /// 原始 JSON 属性对象（按 JS 真值转换）
        #[arg(long, conflicts_with = "set")]
        json: Option<String>,
    },

    /// 解码令牌为完整属性集
    Decode {
        /// 令牌
        token: String,
    },

    /// 解码令牌并求值谓词
    Evaluate {
        /// 令牌
        token: String,

        /// 只求值指定谓词（默认全部）
        #[arg(short, long)]
        predicate: Option<String>,

        /// 团体号
        #[arg(long)]
        group_id: Option<String>,

        /// 参照日期 (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,

        /// 计划生效日期 (YYYY-MM-DD)
        #[arg(long)]
        effective: Option<String>,

        /// 计划终止日期 (YYYY-MM-DD)
        #[arg(long, requires = "effective")]
        term: Option<String>,
    },
}

/// 命令行参数中给出的令牌，按会话载体处理
struct ArgumentToken(Option<String>);

impl TokenCarrier for ArgumentToken {
    fn visibility_token(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn set_visibility_token(&mut self, token: String) {
        self.0 = Some(token);
    }
}

/// 命令执行器
///
/// 解码经由 `VisibilityGate`，损坏令牌按配置的策略回退或报错。
pub struct CommandRunner {
    gate: VisibilityGate,
    catalog: PredicateCatalog,
}

impl CommandRunner {
    pub fn new(registry: Arc<AttributeRegistry>, session: &SessionConfig) -> crate::Result<Self> {
        Ok(Self {
            gate: VisibilityGate::from_config(VisibilityCodec::new(registry), session),
            catalog: PredicateCatalog::member_portal()?,
        })
    }

    fn decode(&self, token: &str) -> crate::Result<RequestRules> {
        self.gate
            .rules_for_request(&ArgumentToken(Some(token.to_string())))
    }

    /// 执行命令，返回写往 stdout 的 JSON 文本
    pub fn run(&self, command: &Commands) -> anyhow::Result<String> {
        let output = match command {
            Commands::Registry => serde_json::to_value(self.gate.codec().registry().entries())?,
            Commands::Position { name } => {
                let position = self.gate.codec().registry().position_of(name)?;
                json!({ "name": name, "position": position })
            }
            Commands::Encode { set, json } => {
                let token = match json {
                    Some(raw) => self.gate.codec().encode(&VisibilityRules::from_json_str(raw)?),
                    None => self.encode_names(set),
                };
                json!({ "token": token })
            }
            Commands::Decode { token } => {
                let request = self.decode(token)?;
                json!({ "fallback": request.is_fallback(), "rules": request.rules() })
            }
            Commands::Evaluate {
                token,
                predicate,
                group_id,
                as_of,
                effective,
                term,
            } => {
                let request = self.decode(token)?;
                let rules = request.rules();
                let context = build_context(
                    group_id.as_deref(),
                    as_of.as_deref(),
                    effective.as_deref(),
                    term.as_deref(),
                )?;

                match predicate {
                    Some(name) => {
                        let value = self.catalog.evaluate(name, rules, &context)?;
                        json!({ "fallback": request.is_fallback(), "name": name, "value": value })
                    }
                    None => json!({
                        "fallback": request.is_fallback(),
                        "report": self.catalog.evaluate_all(rules, &context),
                    }),
                }
            }
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn encode_names(&self, names: &[String]) -> String {
        let registry = self.gate.codec().registry();
        for name in names {
            if !registry.contains(name) {
                warn!(attribute = %name, "ignoring unregistered attribute");
            } else if registry.is_deprecated(name) {
                warn!(attribute = %name, "encoding deprecated attribute");
            }
        }

        self.gate
            .codec()
            .encode(&VisibilityRules::with_true(names.iter().map(String::as_str)))
    }
}

/// 在调用处校验上下文参数
fn build_context(
    group_id: Option<&str>,
    as_of: Option<&str>,
    effective: Option<&str>,
    term: Option<&str>,
) -> anyhow::Result<EvaluationContext> {
    let mut context = EvaluationContext::new();

    if let Some(raw) = group_id {
        context = context.with_group_id(GroupId::parse(raw)?);
    }
    if let Some(raw) = as_of {
        context = context.with_as_of(parse_date("as_of", raw)?);
    }
    match (effective, term) {
        (Some(effective), term) => {
            context = context.with_plan_term(PlanTerm::parse(effective, term)?);
        }
        (None, Some(_)) => bail!("--term 需要同时提供 --effective"),
        (None, None) => {}
    }

    Ok(context)
}
