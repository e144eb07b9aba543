use serde::{Deserialize, Serialize};

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            ArithmeticOp::Add | ArithmeticOp::Sub => Precedence::Additive,
            ArithmeticOp::Mul | ArithmeticOp::Div => Precedence::Multiplicative,
        }
    }

    /// `a op (b op c) == (a op b) op c`
    pub fn is_associative(&self) -> bool {
        matches!(self, ArithmeticOp::Add | ArithmeticOp::Mul)
    }
}

impl std::fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
        }
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            LogicalOp::And => Precedence::And,
            LogicalOp::Or => Precedence::Or,
        }
    }

    /// Constant predicate rendered for an empty operand list.
    pub fn identity(&self) -> &'static str {
        match self {
            LogicalOp::And => "1 = 1",
            LogicalOp::Or => "0 = 1",
        }
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    pub fn keyword(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Placement of nulls in a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullOrder {
    First,
    Last,
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        }
    }
}

/// Binding strength of an expression, lowest first.
///
/// This is the single precedence table for the renderer: serializers never
/// decide parenthesization on their own, they ask [`needs_parentheses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Alias,
    Or,
    And,
    Not,
    /// Comparison, LIKE, BETWEEN, IN, IS, MEMBER OF.
    Predicate,
    Additive,
    Multiplicative,
    Unary,
    Atom,
}

/// Position of a child operand relative to its parent operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Left-hand operand, or sole operand of a prefix operator.
    Left,
    /// Right-hand operand of a left-associative operator.
    Right,
    /// Operand of a non-associative operator (comparison and friends).
    Strict,
    /// Operand of an operator that associates with an identical child.
    Chained,
}

/// Whether `child` must be wrapped in parentheses under `parent`.
pub fn needs_parentheses(parent: Precedence, child: Precedence, position: Operand) -> bool {
    match position {
        Operand::Left | Operand::Chained => child < parent,
        Operand::Right | Operand::Strict => child <= parent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert!(Precedence::Or < Precedence::And);
        assert!(Precedence::And < Precedence::Not);
        assert!(Precedence::Predicate < Precedence::Additive);
        assert!(Precedence::Additive < Precedence::Multiplicative);
        assert!(Precedence::Unary < Precedence::Atom);
    }

    #[test]
    fn test_needs_parentheses() {
        // (a + b) * c
        assert!(needs_parentheses(
            Precedence::Multiplicative,
            Precedence::Additive,
            Operand::Left
        ));
        // a + b * c
        assert!(!needs_parentheses(
            Precedence::Additive,
            Precedence::Multiplicative,
            Operand::Right
        ));
        // a - (b - c)
        assert!(needs_parentheses(
            Precedence::Additive,
            Precedence::Additive,
            Operand::Right
        ));
        // a - b - c
        assert!(!needs_parentheses(
            Precedence::Additive,
            Precedence::Additive,
            Operand::Left
        ));
        // x AND y AND z
        assert!(!needs_parentheses(Precedence::And, Precedence::And, Operand::Chained));
        // (x OR y) AND z
        assert!(needs_parentheses(Precedence::And, Precedence::Or, Operand::Chained));
    }
}
