//! Rule source implementations

mod static_rules;

pub use static_rules::StaticRuleSource;
