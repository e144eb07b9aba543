use serde::{Deserialize, Serialize};

use super::kind::NodeKind;
use super::operators::{AggregateFunc, ArithmeticOp, ComparisonOp, LogicalOp, Precedence};
use super::query::{EntityRef, SelectQuery};
use super::values::Value;

/// Dotted attribute path, e.g. `b.author.name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub segments: Vec<String>,
}

impl Path {
    /// Split a dotted path into segments.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for Path {
    fn from(path: &str) -> Self {
        Path::parse(path)
    }
}

/// One `WHEN ... THEN ...` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct When {
    pub condition: Expr,
    pub result: Expr,
}

/// Extension node rendered by a serializer registered under `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomNode {
    pub kind: NodeKind,
    pub args: Vec<Expr>,
}

/// Expression and predicate nodes.
///
/// Predicates are the subset of variants that yield a truth value; they share
/// this type so clause positions dispatch exactly like any other expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Literal(Value),
    /// Named parameter (`:name`), optionally carrying its own value.
    Param {
        name: String,
        value: Option<Value>,
    },
    Path(Path),
    /// An entity used as a value; renders its alias.
    Entity(EntityRef),
    /// `expr AS alias` in a select list.
    Alias {
        value: Box<Expr>,
        alias: String,
    },
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Negate(Box<Expr>),
    /// Searched CASE when `operand` is `None`, simple CASE otherwise.
    Case {
        operand: Option<Box<Expr>>,
        whens: Vec<When>,
        otherwise: Option<Box<Expr>>,
    },
    Subquery(Box<SelectQuery>),

    Comparison {
        op: ComparisonOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        operands: Vec<Expr>,
    },
    Not(Box<Expr>),
    Like {
        value: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<char>,
        negated: bool,
    },
    Between {
        value: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    In {
        value: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    InSubquery {
        value: Box<Expr>,
        subquery: Box<SelectQuery>,
        negated: bool,
    },
    IsNull {
        value: Box<Expr>,
        negated: bool,
    },
    IsEmpty {
        path: Path,
        negated: bool,
    },
    MemberOf {
        value: Box<Expr>,
        collection: Path,
        negated: bool,
    },
    Exists {
        subquery: Box<SelectQuery>,
        negated: bool,
    },

    Lower(Box<Expr>),
    Upper(Box<Expr>),
    Length(Box<Expr>),
    Abs(Box<Expr>),
    Sqrt(Box<Expr>),
    Size(Box<Expr>),
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    Concat(Vec<Expr>),
    Substring {
        value: Box<Expr>,
        start: Box<Expr>,
        length: Option<Box<Expr>>,
    },
    Coalesce(Vec<Expr>),
    NullIf {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Aggregate {
        func: AggregateFunc,
        distinct: bool,
        value: Box<Expr>,
    },
    /// Database function call, `FUNCTION('name', args...)`.
    Function {
        name: String,
        args: Vec<Expr>,
    },
    Custom(CustomNode),
}

impl Expr {
    /// The kind this node dispatches on.
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Literal(_) => NodeKind::LITERAL,
            Expr::Param { .. } => NodeKind::PARAM,
            Expr::Path(_) => NodeKind::PATH,
            Expr::Entity(_) => NodeKind::ENTITY_REFERENCE,
            Expr::Alias { .. } => NodeKind::ALIAS,
            Expr::Arithmetic { .. } => NodeKind::ARITHMETIC,
            Expr::Negate(_) => NodeKind::NEGATE,
            Expr::Case { .. } => NodeKind::CASE,
            Expr::Subquery(_) => NodeKind::SUBQUERY,
            Expr::Comparison { .. } => NodeKind::COMPARISON,
            Expr::Logical { op: LogicalOp::And, .. } => NodeKind::AND,
            Expr::Logical { op: LogicalOp::Or, .. } => NodeKind::OR,
            Expr::Not(_) => NodeKind::NOT,
            Expr::Like { .. } => NodeKind::LIKE,
            Expr::Between { .. } => NodeKind::BETWEEN,
            Expr::In { .. } => NodeKind::IN,
            Expr::InSubquery { .. } => NodeKind::IN_SUBQUERY,
            Expr::IsNull { .. } => NodeKind::IS_NULL,
            Expr::IsEmpty { .. } => NodeKind::IS_EMPTY,
            Expr::MemberOf { .. } => NodeKind::MEMBER_OF,
            Expr::Exists { .. } => NodeKind::EXISTS,
            Expr::Lower(_) => NodeKind::LOWER,
            Expr::Upper(_) => NodeKind::UPPER,
            Expr::Length(_) => NodeKind::LENGTH,
            Expr::Abs(_) => NodeKind::ABS,
            Expr::Sqrt(_) => NodeKind::SQRT,
            Expr::Size(_) => NodeKind::SIZE,
            Expr::CurrentDate => NodeKind::CURRENT_DATE,
            Expr::CurrentTime => NodeKind::CURRENT_TIME,
            Expr::CurrentTimestamp => NodeKind::CURRENT_TIMESTAMP,
            Expr::Concat(_) => NodeKind::CONCAT,
            Expr::Substring { .. } => NodeKind::SUBSTRING,
            Expr::Coalesce(_) => NodeKind::COALESCE,
            Expr::NullIf { .. } => NodeKind::NULLIF,
            Expr::Aggregate { func, .. } => match func {
                AggregateFunc::Count => NodeKind::COUNT,
                AggregateFunc::Sum => NodeKind::SUM,
                AggregateFunc::Avg => NodeKind::AVG,
                AggregateFunc::Min => NodeKind::MIN,
                AggregateFunc::Max => NodeKind::MAX,
            },
            Expr::Function { .. } => NodeKind::FUNCTION,
            Expr::Custom(node) => node.kind.clone(),
        }
    }

    /// Binding strength used when this node appears as an operand.
    pub fn precedence(&self) -> Precedence {
        match self {
            Expr::Alias { .. } => Precedence::Alias,
            Expr::Logical { op, operands } => match operands.as_slice() {
                [] => Precedence::Predicate,
                [only] => only.precedence(),
                _ => op.precedence(),
            },
            Expr::Not(_) => Precedence::Not,
            Expr::Comparison { .. }
            | Expr::Like { .. }
            | Expr::Between { .. }
            | Expr::In { .. }
            | Expr::InSubquery { .. }
            | Expr::IsNull { .. }
            | Expr::IsEmpty { .. }
            | Expr::MemberOf { .. } => Precedence::Predicate,
            Expr::Exists { negated: true, .. } => Precedence::Not,
            Expr::Arithmetic { op, .. } => op.precedence(),
            Expr::Negate(_) => Precedence::Unary,
            _ => Precedence::Atom,
        }
    }

    /// Argument of a single-argument function node.
    pub fn unary_argument(&self) -> Option<&Expr> {
        match self {
            Expr::Lower(value)
            | Expr::Upper(value)
            | Expr::Length(value)
            | Expr::Abs(value)
            | Expr::Sqrt(value)
            | Expr::Size(value) => Some(value),
            _ => None,
        }
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn param(name: impl Into<String>) -> Self {
        Expr::Param {
            name: name.into(),
            value: None,
        }
    }

    pub fn param_with(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Expr::Param {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn path(path: &str) -> Self {
        Expr::Path(Path::parse(path))
    }

    pub fn entity(entity: &EntityRef) -> Self {
        Expr::Entity(entity.clone())
    }

    pub fn alias(self, alias: impl Into<String>) -> Self {
        Expr::Alias {
            value: Box::new(self),
            alias: alias.into(),
        }
    }

    pub fn arithmetic(left: Expr, op: ArithmeticOp, right: Expr) -> Self {
        Expr::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn compare(left: Expr, op: ComparisonOp, right: Expr) -> Self {
        Expr::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn equal(self, right: Expr) -> Self {
        Expr::compare(self, ComparisonOp::Eq, right)
    }

    pub fn greater_than(self, right: Expr) -> Self {
        Expr::compare(self, ComparisonOp::Gt, right)
    }

    pub fn less_than(self, right: Expr) -> Self {
        Expr::compare(self, ComparisonOp::Lt, right)
    }

    pub fn and(operands: Vec<Expr>) -> Self {
        Expr::Logical {
            op: LogicalOp::And,
            operands,
        }
    }

    pub fn or(operands: Vec<Expr>) -> Self {
        Expr::Logical {
            op: LogicalOp::Or,
            operands,
        }
    }

    pub fn not(predicate: Expr) -> Self {
        Expr::Not(Box::new(predicate))
    }

    pub fn lower(value: Expr) -> Self {
        Expr::Lower(Box::new(value))
    }

    pub fn upper(value: Expr) -> Self {
        Expr::Upper(Box::new(value))
    }

    pub fn count(value: Expr) -> Self {
        Expr::Aggregate {
            func: AggregateFunc::Count,
            distinct: false,
            value: Box::new(value),
        }
    }

    pub fn custom(kind: impl Into<NodeKind>, args: Vec<Expr>) -> Self {
        Expr::Custom(CustomNode {
            kind: kind.into(),
            args,
        })
    }
}
