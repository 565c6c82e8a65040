//! Tests against a real Firebird server.
//!
//! Skipped unless `TEST_FIREBIRD_DATABASE` names a database the test user may
//! write to. `TEST_FIREBIRD_HOST`, `TEST_FIREBIRD_PORT`, `TEST_FIREBIRD_USER`
//! and `TEST_FIREBIRD_PASSWORD` override the usual defaults.

use firebird_mcp_server::db::ConnectionManager;
use firebird_mcp_server::models::{CellValue, ConnectionParams, QueryOutcome};
use firebird_mcp_server::tools::{
    DescribeTableInput, ExecuteQueryInput, QueryToolHandler, SchemaToolHandler,
};

fn live_params() -> Option<ConnectionParams> {
    let database = std::env::var("TEST_FIREBIRD_DATABASE").ok()?;
    let env = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());

    let port = env("TEST_FIREBIRD_PORT", "3050").parse().ok()?;
    ConnectionParams::new(
        env("TEST_FIREBIRD_HOST", "localhost"),
        port,
        database,
        env("TEST_FIREBIRD_USER", "SYSDBA"),
        env("TEST_FIREBIRD_PASSWORD", "masterkey"),
    )
    .ok()
}

macro_rules! live_manager {
    () => {
        match live_params() {
            Some(params) => ConnectionManager::from_params(params),
            None => {
                eprintln!("Skipping: TEST_FIREBIRD_DATABASE not set");
                return;
            }
        }
    };
}

fn sql(text: &str) -> ExecuteQueryInput {
    ExecuteQueryInput {
        sql: text.to_string(),
    }
}

/// Row count of `select` as seen by a separate attachment.
async fn count_from_new_attachment(select: &str) -> u64 {
    let params = live_params().unwrap();
    let other = ConnectionManager::from_params(params);
    let outcome = QueryToolHandler::new(other.clone())
        .execute_query(sql(select))
        .await
        .unwrap();
    other.close().await;
    outcome.row_count()
}

#[tokio::test]
async fn test_live_select_from_rdb_database() {
    let connections = live_manager!();
    let query = QueryToolHandler::new(connections.clone());

    let outcome = query
        .execute_query(sql("SELECT 1 AS ONE FROM RDB$DATABASE"))
        .await
        .unwrap();
    let QueryOutcome::Rows { rows } = outcome else {
        panic!("SELECT should return rows, got {outcome:?}");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("ONE"), Some(&CellValue::Integer(1)));

    connections.close().await;
}

#[tokio::test]
async fn test_live_table_lifecycle() {
    let connections = live_manager!();
    let query = QueryToolHandler::new(connections.clone());
    let schema = SchemaToolHandler::new(connections.clone());

    // Leftover from an aborted run
    let _ = query.execute_query(sql("DROP TABLE MCP_LIVE_T")).await;

    query
        .execute_query(sql(
            "CREATE TABLE MCP_LIVE_T (ID INTEGER NOT NULL PRIMARY KEY, NAME VARCHAR(50))",
        ))
        .await
        .unwrap();

    let tables = schema.list_tables().await.unwrap();
    assert_eq!(
        tables.tables.iter().filter(|t| *t == "MCP_LIVE_T").count(),
        1
    );
    assert!(tables.tables.iter().all(|t| !t.starts_with("RDB$")));

    let described = schema
        .describe_table(DescribeTableInput {
            table_name: "MCP_LIVE_T".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(described.columns.len(), 2);
    assert_eq!(described.columns[0].name, "ID");
    assert!(!described.columns[0].nullable);
    assert!(described.columns[0].is_primary_key);
    assert_eq!(described.columns[1].data_type, "VARCHAR");
    assert_eq!(described.columns[1].length, Some(50));

    let inserted = query
        .execute_query(sql("INSERT INTO MCP_LIVE_T (ID, NAME) VALUES (1, 'x')"))
        .await
        .unwrap();
    assert_eq!(inserted, QueryOutcome::affected(1));

    let err = query
        .execute_query(sql("INSERT INTO MCP_LIVE_T (ID) VALUES (1)"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("PRIMARY"), "{err}");

    let selected = query
        .execute_query(sql("SELECT ID, NAME FROM MCP_LIVE_T"))
        .await
        .unwrap();
    assert_eq!(selected.row_count(), 1);
    assert_eq!(
        count_from_new_attachment("SELECT ID FROM MCP_LIVE_T").await,
        1
    );

    let returned = query
        .execute_query(sql(
            "INSERT INTO MCP_LIVE_T (ID, NAME) VALUES (2, 'y') RETURNING ID, NAME",
        ))
        .await
        .unwrap();
    let QueryOutcome::Rows { rows } = returned else {
        panic!("RETURNING should return a row, got {returned:?}");
    };
    assert_eq!(rows[0].get("ID"), Some(&CellValue::Integer(2)));
    assert_eq!(rows[0].get("NAME"), Some(&CellValue::Text("y".to_string())));
    assert_eq!(
        count_from_new_attachment("SELECT ID FROM MCP_LIVE_T WHERE ID = 2").await,
        1
    );

    let block = query
        .execute_query(sql(
            "EXECUTE BLOCK RETURNS (N INTEGER) AS BEGIN \
             INSERT INTO MCP_LIVE_T (ID, NAME) VALUES (3, 'z'); N = 3; SUSPEND; END",
        ))
        .await
        .unwrap();
    assert_eq!(block.row_count(), 1);
    assert_eq!(
        count_from_new_attachment("SELECT ID FROM MCP_LIVE_T WHERE ID = 3").await,
        1
    );

    query
        .execute_query(sql("DROP TABLE MCP_LIVE_T"))
        .await
        .unwrap();
    connections.close().await;
}

#[tokio::test]
async fn test_live_unknown_table_error() {
    let connections = live_manager!();
    let query = QueryToolHandler::new(connections.clone());

    let err = query
        .execute_query(sql("SELECT * FROM MCP_NO_SUCH_TABLE"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("MCP_NO_SUCH_TABLE"), "{err}");

    // Still serving
    query
        .execute_query(sql("SELECT 1 FROM RDB$DATABASE"))
        .await
        .unwrap();
    connections.close().await;
}

#[tokio::test]
async fn test_live_wide_numeric_aggregate() {
    let connections = live_manager!();
    let query = QueryToolHandler::new(connections.clone());

    // SUM over BIGINT is INT128 on Firebird 4+
    let outcome = query
        .execute_query(sql(
            "SELECT SUM(CAST(2 AS BIGINT)) AS TOTAL, CURRENT_TIMESTAMP AS NOW_TS FROM RDB$DATABASE",
        ))
        .await
        .unwrap();
    let QueryOutcome::Rows { rows } = outcome else {
        panic!("SELECT should return rows, got {outcome:?}");
    };
    assert_eq!(rows[0].get("TOTAL"), Some(&CellValue::Integer(2)));
    assert!(matches!(rows[0].get("NOW_TS"), Some(CellValue::Text(_))));

    connections.close().await;
}
