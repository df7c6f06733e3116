//! `SELECT` builder over `members m LEFT JOIN teams t`.
//!
//! # Invariants
//! - The team join is rendered whenever any projected, filtered, grouped or
//!   ordered column belongs to `teams`, even if not requested explicitly.
//! - Filters accumulate and are ANDed in insertion order.
//! - Count queries drop ordering and paging but keep joins and filters.

use super::expr::{Column, OrderSpec, Predicate, SelectExpr, Table};
use super::{QueryError, QueryResult};
use log::trace;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

const MEMBER_COLUMNS: [Column; 4] = [
    Column::MemberId,
    Column::MemberUsername,
    Column::MemberAge,
    Column::MemberTeamId,
];

#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    projection: Vec<SelectExpr>,
    join_team: bool,
    predicates: Vec<Predicate>,
    group_by: Vec<Column>,
    order_by: Vec<OrderSpec>,
    offset: Option<u64>,
    limit: Option<u64>,
    // Grouped queries are counted as `SELECT COUNT(*) FROM (<grouped>)`.
    count_over_groups: bool,
}

impl SelectQuery {
    /// Starts a query projecting the given expressions from `members`.
    pub fn select(projection: impl IntoIterator<Item = impl Into<SelectExpr>>) -> Self {
        Self {
            projection: projection.into_iter().map(Into::into).collect(),
            join_team: false,
            predicates: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            offset: None,
            limit: None,
            count_over_groups: false,
        }
    }

    /// Starts a query projecting every member column.
    pub fn select_member() -> Self {
        Self::select(MEMBER_COLUMNS)
    }

    pub fn left_join_team(mut self) -> Self {
        self.join_team = true;
        self
    }

    /// Adds filters. `None` entries from an `Option` iterator add nothing.
    pub fn filter(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    pub fn group_by(mut self, column: Column) -> Self {
        self.group_by.push(column);
        self
    }

    pub fn order_by(mut self, spec: OrderSpec) -> Self {
        self.order_by.push(spec);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether the rendered SQL will include the `teams` join.
    pub fn joins_team(&self) -> bool {
        self.join_team
            || self
                .projection
                .iter()
                .filter_map(SelectExpr::column)
                .chain(self.group_by.iter().copied())
                .chain(self.order_by.iter().map(|spec| spec.column))
                .any(|column| column.table() == Table::Team)
            || self
                .predicates
                .iter()
                .any(|predicate| predicate.touches(Table::Team))
    }

    /// Derives a query returning the number of rows `self` would return
    /// without offset/limit.
    pub fn to_count_query(&self) -> SelectQuery {
        let mut count = self.clone();
        count.order_by.clear();
        count.offset = None;
        count.limit = None;
        if self.group_by.is_empty() {
            count.projection = vec![SelectExpr::CountAll];
            count.count_over_groups = false;
        } else {
            count.count_over_groups = true;
        }
        count
    }

    /// Renders SQL text plus positional bind values.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = String::from("SELECT ");
        let mut binds = Vec::new();

        for (index, expr) in self.projection.iter().enumerate() {
            if index > 0 {
                sql.push_str(", ");
            }
            expr.render(&mut sql);
        }

        sql.push_str(" FROM members m");
        if self.joins_team() {
            sql.push_str(" LEFT JOIN teams t ON t.team_id = m.team_id");
        }

        for (index, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(if index == 0 { " WHERE " } else { " AND " });
            predicate.render(&mut sql, &mut binds);
        }

        for (index, column) in self.group_by.iter().enumerate() {
            sql.push_str(if index == 0 { " GROUP BY " } else { ", " });
            sql.push_str(column.qualified());
        }

        for (index, spec) in self.order_by.iter().enumerate() {
            sql.push_str(if index == 0 { " ORDER BY " } else { ", " });
            spec.render(&mut sql);
        }

        let offset = self.offset.filter(|offset| *offset > 0);
        match (self.limit, offset) {
            (Some(limit), offset) => {
                sql.push_str(" LIMIT ?");
                binds.push(bind_u64(limit));
                if let Some(offset) = offset {
                    sql.push_str(" OFFSET ?");
                    binds.push(bind_u64(offset));
                }
            }
            (None, Some(offset)) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                binds.push(bind_u64(offset));
            }
            (None, None) => {}
        }

        if self.count_over_groups {
            sql = format!("SELECT COUNT(*) AS count_all FROM ({sql})");
        }

        (sql, binds)
    }

    /// Executes the query and maps every row.
    pub fn fetch<T, F>(&self, conn: &Connection, mut map_row: F) -> QueryResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> QueryResult<T>,
    {
        let (sql, binds) = self.to_sql();
        trace!("event=query_fetch module=query status=start sql={sql}");

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(map_row(row)?);
        }

        Ok(items)
    }

    /// Executes the query with `LIMIT 1` and maps the first row, if any.
    pub fn fetch_first<T, F>(&self, conn: &Connection, map_row: F) -> QueryResult<Option<T>>
    where
        F: FnMut(&Row<'_>) -> QueryResult<T>,
    {
        let first = self.clone().limit(1);
        Ok(first.fetch(conn, map_row)?.into_iter().next())
    }

    /// Executes the count form of this query (see [`Self::to_count_query`]).
    pub fn fetch_count(&self, conn: &Connection) -> QueryResult<u64> {
        let (sql, binds) = self.to_count_query().to_sql();
        trace!("event=query_count module=query status=start sql={sql}");

        let count: i64 = conn.query_row(&sql, params_from_iter(binds), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| QueryError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn bind_u64(value: u64) -> Value {
    Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::SelectQuery;
    use crate::query::expr::{Column, SelectExpr};
    use rusqlite::types::Value;

    #[test]
    fn unfiltered_query_has_no_where_clause() {
        let (sql, binds) = SelectQuery::select_member().to_sql();
        assert_eq!(
            sql,
            "SELECT m.member_id AS member_id, m.username AS username, m.age AS age, \
             m.team_id AS member_team_id FROM members m"
        );
        assert!(binds.is_empty());
    }

    #[test]
    fn team_filter_adds_join_implicitly() {
        let query = SelectQuery::select_member().filter(Some(Column::TeamName.eq("teamA".to_string())));
        let (sql, binds) = query.to_sql();
        assert!(sql.contains("LEFT JOIN teams t ON t.team_id = m.team_id"));
        assert!(sql.ends_with("WHERE t.name = ?"));
        assert_eq!(binds, vec![Value::Text("teamA".to_string())]);
    }

    #[test]
    fn filters_are_anded_and_paging_binds_follow_filters() {
        let query = SelectQuery::select_member()
            .filter([Column::MemberAge.goe(10_i64), Column::MemberAge.loe(30_i64)])
            .order_by(Column::MemberId.asc())
            .offset(1)
            .limit(2);
        let (sql, binds) = query.to_sql();
        assert!(sql.ends_with("WHERE m.age >= ? AND m.age <= ? ORDER BY m.member_id ASC LIMIT ? OFFSET ?"));
        assert_eq!(
            binds,
            vec![
                Value::Integer(10),
                Value::Integer(30),
                Value::Integer(2),
                Value::Integer(1)
            ]
        );
    }

    #[test]
    fn offset_without_limit_uses_unbounded_limit() {
        let (sql, _) = SelectQuery::select_member().offset(3).to_sql();
        assert!(sql.ends_with("LIMIT -1 OFFSET ?"));
    }

    #[test]
    fn count_query_drops_order_and_paging() {
        let query = SelectQuery::select_member()
            .left_join_team()
            .filter(Some(Column::MemberAge.gt(5_i64)))
            .order_by(Column::MemberUsername.asc().nulls_last())
            .offset(10)
            .limit(5);
        let (sql, binds) = query.to_count_query().to_sql();
        assert_eq!(
            sql,
            "SELECT COUNT(*) AS count_all FROM members m \
             LEFT JOIN teams t ON t.team_id = m.team_id WHERE m.age > ?"
        );
        assert_eq!(binds, vec![Value::Integer(5)]);
    }

    #[test]
    fn grouped_count_wraps_subquery() {
        let query = SelectQuery::select([
            SelectExpr::Column(Column::TeamName),
            SelectExpr::Avg(Column::MemberAge),
        ])
        .group_by(Column::TeamName);
        let (sql, _) = query.to_count_query().to_sql();
        assert!(sql.starts_with("SELECT COUNT(*) AS count_all FROM (SELECT t.name AS team_name"));
        assert!(sql.ends_with("GROUP BY t.name)"));
    }
}
