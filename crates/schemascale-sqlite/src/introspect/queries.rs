use sqlx::{Row, SqlitePool};

use crate::errors::SqliteError;

pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>, SqliteError> {
    let rows = sqlx::query(
        r#"
        select name
        from sqlite_master
        where type = 'table'
          and name not like 'sqlite_%'
        order by rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| row.try_get::<String, _>("name").map_err(SqliteError::from))
        .collect()
}

pub struct RawColumn {
    pub name: String,
    pub declared_type: Option<String>,
    pub not_null: bool,
    pub pk: i64,
}

pub async fn list_columns(pool: &SqlitePool, table: &str) -> Result<Vec<RawColumn>, SqliteError> {
    let rows = sqlx::query(
        r#"
        select name, type, "notnull", pk
        from pragma_table_info(?1)
        order by cid
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        columns.push(RawColumn {
            name: row.try_get("name")?,
            declared_type: row.try_get("type")?,
            not_null: row.try_get::<i64, _>("notnull")? != 0,
            pk: row.try_get("pk")?,
        });
    }
    Ok(columns)
}

pub struct RawForeignKey {
    pub id: i64,
    pub seq: i64,
    pub table: String,
    pub from: String,
    /// `None` when the constraint references the parent's primary key implicitly.
    pub to: Option<String>,
}

pub async fn list_foreign_keys(
    pool: &SqlitePool,
    table: &str,
) -> Result<Vec<RawForeignKey>, SqliteError> {
    let rows = sqlx::query(
        r#"
        select id, seq, "table", "from", "to"
        from pragma_foreign_key_list(?1)
        order by id, seq
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    let mut fks = Vec::with_capacity(rows.len());
    for row in rows {
        fks.push(RawForeignKey {
            id: row.try_get("id")?,
            seq: row.try_get("seq")?,
            table: row.try_get("table")?,
            from: row.try_get("from")?,
            to: row.try_get("to")?,
        });
    }
    Ok(fks)
}
