use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod alloc;
pub mod error;
pub mod fixture;
pub mod harness;
pub mod model;
pub mod rank;
pub mod report;
pub mod schema;
pub mod strategies;

/// Built-in mapping strategy.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum StrategyKind {
    /// Serialize to a `serde_json::Value` and deserialize the destination by field name.
    #[value(name = "serde_value")]
    SerdeValue,
    /// Per-field copy rules configured once at setup.
    #[value(name = "field_table")]
    FieldTable,
    /// Hand-written field assignment.
    #[value(name = "manual")]
    Manual,
    /// `TryFrom<&BookDto> for Book`.
    #[value(name = "try_from")]
    TryFrom,
    /// Mapper generated at compile time by `macro_rules!`.
    #[value(name = "macro_generated")]
    MacroGenerated,
}

impl StrategyKind {
    /// Declaration order.
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::SerdeValue,
        StrategyKind::FieldTable,
        StrategyKind::Manual,
        StrategyKind::TryFrom,
        StrategyKind::MacroGenerated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::SerdeValue => "serde_value",
            StrategyKind::FieldTable => "field_table",
            StrategyKind::Manual => "manual",
            StrategyKind::TryFrom => "try_from",
            StrategyKind::MacroGenerated => "macro_generated",
        }
    }
}

/// Row order of the rendered report.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Ascending mean time; ties keep declaration order.
    #[default]
    #[value(name = "fastest")]
    FastestToSlowest,
    /// Declaration order.
    Declared,
}
