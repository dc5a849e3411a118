//! SQL text builders.
//!
//! Free functions that assemble the statements used by
//! [`CrudRepository`](crate::CrudRepository). Identifiers are always
//! double-quoted and values are always bound through `?` placeholders; the
//! repository guarantees that every identifier passed in was drawn from the
//! entity's declared column list.

use crate::sort::SortKey;

fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

/// Format column names as a comma-separated list: `"a", "b", "c"`.
pub fn column_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|column| quote(column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format `n` positional placeholders: `?, ?, ?`.
pub fn placeholder_list(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Format column names as assignment pairs: `"a" = ?, "b" = ?`.
pub fn assignment_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|column| format!("{} = ?", quote(column)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format sort keys as an ORDER BY list: `"a" ASC, "b" DESC`.
pub fn order_clause(keys: &[SortKey]) -> String {
    keys.iter()
        .map(|key| format!("{} {}", quote(&key.column), key.direction.as_sql()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn select(
    table: &str,
    columns: &[&str],
    sort: &[SortKey],
    limit: Option<u64>,
    offset: Option<u64>,
) -> String {
    let mut sql = format!("SELECT {} FROM {}", column_list(columns), quote(table));
    if !sort.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_clause(sort));
    }
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = offset {
        sql.push_str(&format!(" OFFSET {offset}"));
    }
    sql
}

pub fn select_by_id(table: &str, columns: &[&str]) -> String {
    format!(
        "SELECT {} FROM {} WHERE \"id\" = ?",
        column_list(columns),
        quote(table)
    )
}

pub fn count(table: &str) -> String {
    format!("SELECT COUNT(\"id\") FROM {}", quote(table))
}

/// The identifier slot is an explicit NULL so the database assigns it.
pub fn insert(table: &str, columns: &[&str]) -> String {
    format!(
        "INSERT INTO {} (\"id\", {}) VALUES (NULL, {})",
        quote(table),
        column_list(columns),
        placeholder_list(columns.len())
    )
}

pub fn update(table: &str, columns: &[&str]) -> String {
    format!(
        "UPDATE {} SET {} WHERE \"id\" = ?",
        quote(table),
        assignment_list(columns)
    )
}

pub fn delete(table: &str) -> String {
    format!("DELETE FROM {} WHERE \"id\" = ?", quote(table))
}
