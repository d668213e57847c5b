// src/actions/database/drivers.rs

//! One connect-and-query path per dialect.
//!
//! Each call opens a fresh connection, runs the query, and closes it again.
//! Query semantics are whatever the driver does. PostgreSQL, MySQL and SQLite
//! go through `sqlx`; SQL Server goes through `tiberius` over a tokio socket.

use serde_json::Value;
use sqlx::mysql::MySqlConnection;
use sqlx::postgres::PgConnection;
use sqlx::sqlite::SqliteConnection;
use sqlx::Connection;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing::debug;

use super::registry::Dialect;
use super::rows;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    MsSql(#[from] tiberius::error::Error),

    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn fetch_rows(
    dialect: Dialect,
    connection: &str,
    query: &str,
) -> Result<Vec<Value>, DriverError> {
    debug!(%dialect, "opening database connection");

    match dialect {
        Dialect::Postgres => {
            let mut conn = PgConnection::connect(connection).await?;
            let rows = sqlx::query(query).fetch_all(&mut conn).await?;
            let json = rows.iter().map(rows::pg_row_to_json).collect();
            conn.close().await?;
            Ok(json)
        }
        Dialect::MySql => {
            let mut conn = MySqlConnection::connect(connection).await?;
            let rows = sqlx::query(query).fetch_all(&mut conn).await?;
            let json = rows.iter().map(rows::mysql_row_to_json).collect();
            conn.close().await?;
            Ok(json)
        }
        Dialect::Sqlite => {
            let mut conn = SqliteConnection::connect(connection).await?;
            let rows = sqlx::query(query).fetch_all(&mut conn).await?;
            let json = rows.iter().map(rows::sqlite_row_to_json).collect();
            conn.close().await?;
            Ok(json)
        }
        Dialect::MsSql => fetch_mssql_rows(connection, query).await,
    }
}

/// `connection` is an ADO.NET string (`server=tcp:host,1433;user=...`) or a
/// JDBC URL (`jdbc:sqlserver://host:1433;...`).
async fn fetch_mssql_rows(connection: &str, query: &str) -> Result<Vec<Value>, DriverError> {
    let config = if connection.starts_with("jdbc:") {
        tiberius::Config::from_jdbc_string(connection)?
    } else {
        tiberius::Config::from_ado_string(connection)?
    };

    let tcp = TcpStream::connect(config.get_addr()).await?;
    tcp.set_nodelay(true)?;
    let mut client = tiberius::Client::connect(config, tcp.compat_write()).await?;

    let rows = client
        .simple_query(query)
        .await?
        .into_first_result()
        .await?;
    let json = rows.into_iter().map(rows::mssql_row_to_json).collect();
    client.close().await?;
    Ok(json)
}
