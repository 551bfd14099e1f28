//! # Dispatcher
//!
//! 消息分发模块。
//!
//! 负责：
//! - 按变体路由每条消息
//! - 解析并调用 Override Provider 的对应能力
//! - 校验 Schema 消息的 stream 身份不变量

pub mod dispatcher;
pub mod error;
pub mod probe;

pub use contracts::{Message, MessageType, OverrideProvider};
pub use dispatcher::MessageDispatcher;
pub use error::DispatcherError;
pub use probe::CapabilitySet;
