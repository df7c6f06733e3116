//! Column references, predicates and select/order expressions.
//!
//! The schema is fixed: `members m LEFT JOIN teams t`. Columns render with
//! those aliases and carry a stable result label so row mappers can read by
//! name.

use rusqlite::types::Value;

/// Table a column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Member,
    Team,
}

/// Declared entity field usable in projections, filters and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    MemberId,
    MemberUsername,
    MemberAge,
    MemberTeamId,
    TeamId,
    TeamName,
}

impl Column {
    pub fn table(self) -> Table {
        match self {
            Self::MemberId | Self::MemberUsername | Self::MemberAge | Self::MemberTeamId => {
                Table::Member
            }
            Self::TeamId | Self::TeamName => Table::Team,
        }
    }

    /// Alias-qualified SQL reference.
    pub fn qualified(self) -> &'static str {
        match self {
            Self::MemberId => "m.member_id",
            Self::MemberUsername => "m.username",
            Self::MemberAge => "m.age",
            Self::MemberTeamId => "m.team_id",
            Self::TeamId => "t.team_id",
            Self::TeamName => "t.name",
        }
    }

    /// Result-set label used when this column is projected.
    pub fn label(self) -> &'static str {
        match self {
            Self::MemberId => "member_id",
            Self::MemberUsername => "username",
            Self::MemberAge => "age",
            Self::MemberTeamId => "member_team_id",
            Self::TeamId => "team_id",
            Self::TeamName => "team_name",
        }
    }

    pub fn eq(self, value: impl Into<Value>) -> Predicate {
        Predicate::compare(self, CompareOp::Eq, value.into())
    }

    pub fn ne(self, value: impl Into<Value>) -> Predicate {
        Predicate::compare(self, CompareOp::Ne, value.into())
    }

    pub fn gt(self, value: impl Into<Value>) -> Predicate {
        Predicate::compare(self, CompareOp::Gt, value.into())
    }

    /// Greater than or equal.
    pub fn goe(self, value: impl Into<Value>) -> Predicate {
        Predicate::compare(self, CompareOp::Goe, value.into())
    }

    pub fn lt(self, value: impl Into<Value>) -> Predicate {
        Predicate::compare(self, CompareOp::Lt, value.into())
    }

    /// Less than or equal.
    pub fn loe(self, value: impl Into<Value>) -> Predicate {
        Predicate::compare(self, CompareOp::Loe, value.into())
    }

    pub fn is_null(self) -> Predicate {
        Predicate {
            node: Node::IsNull(self),
        }
    }

    pub fn is_not_null(self) -> Predicate {
        Predicate {
            node: Node::IsNotNull(self),
        }
    }

    pub fn asc(self) -> OrderSpec {
        OrderSpec {
            column: self,
            descending: false,
            nulls_last: false,
        }
    }

    pub fn desc(self) -> OrderSpec {
        OrderSpec {
            column: self,
            descending: true,
            nulls_last: false,
        }
    }
}

/// Binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Goe,
    Lt,
    Loe,
}

impl CompareOp {
    fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Goe => ">=",
            Self::Lt => "<",
            Self::Loe => "<=",
        }
    }
}

/// Opaque boolean expression over declared columns.
///
/// Built from [`Column`] comparison helpers and combined with
/// [`Predicate::and`] / [`Predicate::or`]. There is no "always true"
/// predicate: an absent filter is represented by no predicate at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    node: Node,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Compare {
        column: Column,
        op: CompareOp,
        value: Value,
    },
    IsNull(Column),
    IsNotNull(Column),
    // Both hold at least two operands.
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    fn compare(column: Column, op: CompareOp, value: Value) -> Self {
        Self {
            node: Node::Compare { column, op, value },
        }
    }

    /// Conjunction of `self` and `other`, flattening nested conjunctions.
    pub fn and(self, other: Predicate) -> Predicate {
        let mut operands = match self.node {
            Node::All(operands) => operands,
            node => vec![Predicate { node }],
        };
        operands.push(other);
        Predicate {
            node: Node::All(operands),
        }
    }

    /// Disjunction of `self` and `other`, flattening nested disjunctions.
    pub fn or(self, other: Predicate) -> Predicate {
        let mut operands = match self.node {
            Node::Any(operands) => operands,
            node => vec![Predicate { node }],
        };
        operands.push(other);
        Predicate {
            node: Node::Any(operands),
        }
    }

    /// Folds predicates into one conjunction; `None` when there are none.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Option<Predicate> {
        predicates.into_iter().reduce(Predicate::and)
    }

    /// Whether any column referenced by this predicate lives in `table`.
    pub fn touches(&self, table: Table) -> bool {
        match &self.node {
            Node::Compare { column, .. } | Node::IsNull(column) | Node::IsNotNull(column) => {
                column.table() == table
            }
            Node::All(operands) | Node::Any(operands) => {
                operands.iter().any(|operand| operand.touches(table))
            }
        }
    }

    /// Number of leaf comparisons in this expression.
    pub fn leaf_count(&self) -> usize {
        match &self.node {
            Node::Compare { .. } | Node::IsNull(_) | Node::IsNotNull(_) => 1,
            Node::All(operands) | Node::Any(operands) => {
                operands.iter().map(Predicate::leaf_count).sum()
            }
        }
    }

    pub(crate) fn render(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match &self.node {
            Node::Compare { column, op, value } => {
                sql.push_str(column.qualified());
                sql.push(' ');
                sql.push_str(op.sql());
                sql.push_str(" ?");
                binds.push(value.clone());
            }
            Node::IsNull(column) => {
                sql.push_str(column.qualified());
                sql.push_str(" IS NULL");
            }
            Node::IsNotNull(column) => {
                sql.push_str(column.qualified());
                sql.push_str(" IS NOT NULL");
            }
            Node::All(operands) => render_group(operands, " AND ", sql, binds),
            Node::Any(operands) => render_group(operands, " OR ", sql, binds),
        }
    }
}

fn render_group(operands: &[Predicate], joiner: &str, sql: &mut String, binds: &mut Vec<Value>) {
    sql.push('(');
    for (index, operand) in operands.iter().enumerate() {
        if index > 0 {
            sql.push_str(joiner);
        }
        operand.render(sql, binds);
    }
    sql.push(')');
}

/// One projected expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectExpr {
    Column(Column),
    CountAll,
    Count(Column),
    Sum(Column),
    Avg(Column),
    Max(Column),
    Min(Column),
}

impl SelectExpr {
    /// Result-set label, e.g. `username` or `avg_age`.
    pub fn label(&self) -> String {
        match self {
            Self::Column(column) => column.label().to_string(),
            Self::CountAll => "count_all".to_string(),
            Self::Count(column) => format!("count_{}", column.label()),
            Self::Sum(column) => format!("sum_{}", column.label()),
            Self::Avg(column) => format!("avg_{}", column.label()),
            Self::Max(column) => format!("max_{}", column.label()),
            Self::Min(column) => format!("min_{}", column.label()),
        }
    }

    pub fn column(&self) -> Option<Column> {
        match self {
            Self::CountAll => None,
            Self::Column(column)
            | Self::Count(column)
            | Self::Sum(column)
            | Self::Avg(column)
            | Self::Max(column)
            | Self::Min(column) => Some(*column),
        }
    }

    pub(crate) fn render(&self, sql: &mut String) {
        let expr = match self {
            Self::Column(column) => column.qualified().to_string(),
            Self::CountAll => "COUNT(*)".to_string(),
            Self::Count(column) => format!("COUNT({})", column.qualified()),
            Self::Sum(column) => format!("SUM({})", column.qualified()),
            Self::Avg(column) => format!("AVG({})", column.qualified()),
            Self::Max(column) => format!("MAX({})", column.qualified()),
            Self::Min(column) => format!("MIN({})", column.qualified()),
        };
        sql.push_str(&expr);
        sql.push_str(" AS ");
        sql.push_str(&self.label());
    }
}

impl From<Column> for SelectExpr {
    fn from(value: Column) -> Self {
        Self::Column(value)
    }
}

/// Ordering term for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub column: Column,
    pub descending: bool,
    pub nulls_last: bool,
}

impl OrderSpec {
    pub fn nulls_last(mut self) -> Self {
        self.nulls_last = true;
        self
    }

    pub(crate) fn render(&self, sql: &mut String) {
        sql.push_str(self.column.qualified());
        sql.push_str(if self.descending { " DESC" } else { " ASC" });
        if self.nulls_last {
            sql.push_str(" NULLS LAST");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, Predicate, Table};
    use rusqlite::types::Value;

    fn rendered(predicate: &Predicate) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut binds = Vec::new();
        predicate.render(&mut sql, &mut binds);
        (sql, binds)
    }

    #[test]
    fn comparison_renders_bind_placeholder() {
        let (sql, binds) = rendered(&Column::MemberAge.goe(30_i64));
        assert_eq!(sql, "m.age >= ?");
        assert_eq!(binds, vec![Value::Integer(30)]);
    }

    #[test]
    fn not_equal_renders_sql_inequality() {
        let (sql, binds) = rendered(&Column::MemberUsername.ne("member1".to_string()));
        assert_eq!(sql, "m.username <> ?");
        assert_eq!(binds, vec![Value::Text("member1".to_string())]);
    }

    #[test]
    fn and_flattens_nested_conjunctions() {
        let predicate = Column::MemberAge
            .goe(10_i64)
            .and(Column::MemberAge.loe(20_i64))
            .and(Column::TeamName.eq("teamA".to_string()));
        let (sql, binds) = rendered(&predicate);
        assert_eq!(sql, "(m.age >= ? AND m.age <= ? AND t.name = ?)");
        assert_eq!(binds.len(), 3);
        assert_eq!(predicate.leaf_count(), 3);
    }

    #[test]
    fn or_inside_and_keeps_grouping() {
        let predicate = Column::MemberUsername
            .eq("member1".to_string())
            .or(Column::MemberUsername.is_null())
            .and(Column::MemberAge.lt(50_i64));
        let (sql, _) = rendered(&predicate);
        assert_eq!(sql, "((m.username = ? OR m.username IS NULL) AND m.age < ?)");
    }

    #[test]
    fn all_of_nothing_is_none() {
        assert!(Predicate::all(Vec::new()).is_none());
        let single = Predicate::all(vec![Column::MemberId.eq(1_i64)]).unwrap();
        assert_eq!(single, Column::MemberId.eq(1_i64));
    }

    #[test]
    fn touches_reports_team_columns() {
        assert!(Column::TeamName.eq("x".to_string()).touches(Table::Team));
        assert!(!Column::MemberAge.goe(1_i64).touches(Table::Team));
        let mixed = Column::MemberAge.goe(1_i64).or(Column::TeamId.eq(3_i64));
        assert!(mixed.touches(Table::Team));
        assert!(mixed.touches(Table::Member));
    }
}
