//! Minimal parameterized statement builder.
//!
//! Statements are assembled dialect-agnostically and rendered with
//! [`InsertBuilder::build`] / [`SelectBuilder::build`], which ask the
//! [`Dialect`] for bind markers and any engine-specific suffix. The result is a
//! [`Statement`]: SQL text plus its ordered arguments, ready to bind onto an
//! `AnyPool` query.

use sqlx::any::{Any, AnyArguments};
use sqlx::query::Query;

use crate::Dialect;

/// A bound argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Text(String),
    BigInt(i64),
    /// Serialized JSON document destined for a JSON-capable column.
    Json(String),
}

impl Arg {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// Rendered SQL with its arguments in bind order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    args: Vec<Arg>,
}

impl Statement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Bind every argument onto a sqlx query over the Any driver.
    pub fn query(&self) -> Query<'_, Any, AnyArguments<'_>> {
        self.args
            .iter()
            .fold(sqlx::query::<Any>(&self.sql), |q, arg| match arg {
                Arg::Text(s) | Arg::Json(s) => q.bind(s.as_str()),
                Arg::BigInt(v) => q.bind(*v),
            })
    }
}

fn render_param(dialect: Dialect, index: usize, arg: &Arg) -> String {
    let placeholder = dialect.placeholder(index);
    match arg {
        Arg::Json(_) => dialect.json_param(&placeholder),
        Arg::Text(_) | Arg::BigInt(_) => placeholder,
    }
}

// ---------------------------------------------------------------------------
// INSERT
// ---------------------------------------------------------------------------

/// `INSERT INTO … VALUES …` with an optional upsert suffix.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    columns: Vec<&'static str>,
    values: Vec<Arg>,
    upsert: Option<(&'static str, Vec<&'static str>)>,
}

impl InsertBuilder {
    pub fn insert_into(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            upsert: None,
        }
    }

    pub fn value(mut self, column: &'static str, arg: Arg) -> Self {
        self.columns.push(column);
        self.values.push(arg);
        self
    }

    /// On a `conflict_key` collision, overwrite `columns` instead of failing.
    pub fn on_conflict_update(mut self, conflict_key: &'static str, columns: &[&'static str]) -> Self {
        self.upsert = Some((conflict_key, columns.to_vec()));
        self
    }

    pub fn build(self, dialect: Dialect) -> Statement {
        let params: Vec<String> = self
            .values
            .iter()
            .enumerate()
            .map(|(i, arg)| render_param(dialect, i + 1, arg))
            .collect();

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            params.join(", "),
        );
        if let Some((key, columns)) = &self.upsert {
            sql.push(' ');
            sql.push_str(&dialect.upsert_conflict_clause(key, columns));
        }

        Statement { sql, args: self.values }
    }
}

// ---------------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------------

/// `SELECT … FROM …` with joins, equality filters and grouping.
#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    columns: Vec<String>,
    from: String,
    joins: Vec<String>,
    filters: Vec<(String, Arg)>,
    group_by: Vec<String>,
}

impl SelectBuilder {
    pub fn select<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = table.into();
        self
    }

    /// Inner join; `clause` is `"<table> ON <condition>"`.
    pub fn join(mut self, clause: impl Into<String>) -> Self {
        self.joins.push(format!("JOIN {}", clause.into()));
        self
    }

    /// Left join; `clause` is `"<table> ON <condition>"`.
    pub fn left_join(mut self, clause: impl Into<String>) -> Self {
        self.joins.push(format!("LEFT JOIN {}", clause.into()));
        self
    }

    /// `column = <param>`; several filters are ANDed.
    pub fn where_eq(mut self, column: impl Into<String>, arg: Arg) -> Self {
        self.filters.push((column.into(), arg));
        self
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn build(self, dialect: Dialect) -> Statement {
        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), self.from);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }

        let mut args = Vec::with_capacity(self.filters.len());
        if !self.filters.is_empty() {
            let conditions: Vec<String> = self
                .filters
                .into_iter()
                .enumerate()
                .map(|(i, (column, arg))| {
                    let cond = format!("{column} = {}", render_param(dialect, i + 1, &arg));
                    args.push(arg);
                    cond
                })
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        Statement { sql, args }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_renders_dialect_placeholders() {
        let build = |dialect| {
            InsertBuilder::insert_into("t_workspaces")
                .value("id", Arg::text("ws"))
                .value("settings", Arg::Json("{}".into()))
                .value("update_at", Arg::BigInt(7))
                .build(dialect)
        };

        let pg = build(Dialect::Postgres);
        assert_eq!(
            pg.sql(),
            "INSERT INTO t_workspaces (id, settings, update_at) VALUES ($1, CAST($2 AS JSON), $3)"
        );
        assert_eq!(
            pg.args(),
            &[Arg::text("ws"), Arg::Json("{}".into()), Arg::BigInt(7)]
        );

        let my = build(Dialect::MySql);
        assert_eq!(
            my.sql(),
            "INSERT INTO t_workspaces (id, settings, update_at) VALUES (?, ?, ?)"
        );
        assert_eq!(my.args(), pg.args());
    }

    #[test]
    fn insert_appends_upsert_clause_without_extra_args() {
        let stmt = InsertBuilder::insert_into("w")
            .value("id", Arg::text("a"))
            .value("signup_token", Arg::text("t"))
            .on_conflict_update("id", &["signup_token"])
            .build(Dialect::MySql);
        assert!(stmt
            .sql()
            .ends_with("ON DUPLICATE KEY UPDATE signup_token = VALUES(signup_token)"));
        assert_eq!(stmt.args().len(), 2);
    }

    #[test]
    fn select_orders_joins_filters_and_grouping() {
        let stmt = SelectBuilder::select(["a.id", "COUNT(b.id)"])
            .from("a")
            .join("c ON c.id = a.id")
            .left_join("b ON b.a_id = a.id")
            .where_eq("a.owner", Arg::text("u1"))
            .where_eq("a.kind", Arg::text("k"))
            .group_by(["a.id"])
            .build(Dialect::Postgres);

        assert_eq!(
            stmt.sql(),
            "SELECT a.id, COUNT(b.id) FROM a JOIN c ON c.id = a.id LEFT JOIN b ON b.a_id = a.id \
             WHERE a.owner = $1 AND a.kind = $2 GROUP BY a.id"
        );
        assert_eq!(stmt.args(), &[Arg::text("u1"), Arg::text("k")]);
    }

    #[test]
    fn select_without_filters_has_no_where() {
        let stmt = SelectBuilder::select(["COUNT(*) AS count"])
            .from("w")
            .build(Dialect::MySql);
        assert_eq!(stmt.sql(), "SELECT COUNT(*) AS count FROM w");
        assert!(stmt.args().is_empty());
    }
}
