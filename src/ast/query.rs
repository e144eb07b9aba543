use serde::{Deserialize, Serialize};

use super::expr::{Expr, Path};
use super::operators::{JoinKind, NullOrder, SortOrder};

/// An entity declared in a FROM, UPDATE or DELETE clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity name as mapped by the persistence provider.
    pub name: String,
    pub alias: String,
}

impl EntityRef {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }

    /// Path rooted at this entity's alias.
    pub fn path(&self, attribute: &str) -> Expr {
        Expr::path(&format!("{}.{}", self.alias, attribute))
    }
}

/// What a join brings into scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinTarget {
    /// Unrelated entity, joined through an explicit ON predicate.
    Entity(EntityRef),
    /// Mapped association reached through a path, e.g. `b.authors`.
    Association { path: Path, alias: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    #[serde(default)]
    pub fetch: bool,
    pub target: JoinTarget,
    pub on: Option<Expr>,
}

/// One FROM item: a root entity followed by its joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromItem {
    pub entity: EntityRef,
    #[serde(default)]
    pub joins: Vec<Join>,
}

impl From<EntityRef> for FromItem {
    fn from(entity: EntityRef) -> Self {
        Self {
            entity,
            joins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub expr: Expr,
    #[serde(default)]
    pub order: SortOrder,
    pub nulls: Option<NullOrder>,
}

impl Sort {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            order: SortOrder::Asc,
            nulls: None,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            order: SortOrder::Desc,
            nulls: None,
        }
    }
}

/// `path = value` in an UPDATE's SET clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub path: Path,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectQuery {
    /// Declared result type, used by execution adapters.
    pub result_type: String,
    #[serde(default)]
    pub distinct: bool,
    pub select: Vec<Expr>,
    pub from: Vec<FromItem>,
    #[serde(rename = "where")]
    pub where_clause: Option<Expr>,
    #[serde(default)]
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    #[serde(default)]
    pub order_by: Vec<Sort>,
}

impl SelectQuery {
    /// Select `select` from a single root entity.
    pub fn new(result_type: impl Into<String>, select: Vec<Expr>, from: EntityRef) -> Self {
        Self {
            result_type: result_type.into(),
            distinct: false,
            select,
            from: vec![from.into()],
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
        }
    }

    pub fn filter(mut self, predicate: Expr) -> Self {
        self.where_clause = Some(predicate);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateQuery {
    pub entity: EntityRef,
    pub set: Vec<Assignment>,
    #[serde(rename = "where")]
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteQuery {
    pub entity: EntityRef,
    #[serde(rename = "where")]
    pub where_clause: Option<Expr>,
}

/// Root of a query model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    Select(SelectQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
}

impl Query {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Query::Select(_) => "select",
            Query::Update(_) => "update",
            Query::Delete(_) => "delete",
        }
    }

    /// Declared result type; only select queries carry one.
    pub fn result_type(&self) -> Option<&str> {
        match self {
            Query::Select(q) => Some(&q.result_type),
            Query::Update(_) | Query::Delete(_) => None,
        }
    }
}

impl From<SelectQuery> for Query {
    fn from(query: SelectQuery) -> Self {
        Query::Select(query)
    }
}

impl From<UpdateQuery> for Query {
    fn from(query: UpdateQuery) -> Self {
        Query::Update(query)
    }
}

impl From<DeleteQuery> for Query {
    fn from(query: DeleteQuery) -> Self {
        Query::Delete(query)
    }
}
