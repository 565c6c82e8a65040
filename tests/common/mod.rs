//! Shared fixtures for integration tests.
//!
//! `FakeFirebird` stands in for a server: it answers the catalog queries from
//! an in-memory table list and hands other statements to a scripted responder.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use firebird_mcp_server::db::schema::{DESCRIBE_TABLE, LIST_TABLES};
use firebird_mcp_server::db::{
    ConnectionManager, Connector, FbRow, FirebirdBackend, StatementOutcome,
};
use rsfbclient::{FbError, SqlType};

/// Column definition as the catalog would report it.
#[derive(Debug, Clone)]
pub struct FakeColumn {
    pub name: &'static str,
    pub field_type: i64,
    pub sub_type: Option<i64>,
    pub byte_length: i64,
    pub char_length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: i64,
    pub not_null: bool,
    pub default_source: Option<&'static str>,
    pub primary_key: bool,
    pub foreign_key: bool,
    pub unique: bool,
}

impl FakeColumn {
    pub fn integer(name: &'static str) -> Self {
        Self {
            name,
            field_type: 8,
            sub_type: Some(0),
            byte_length: 4,
            char_length: None,
            precision: Some(0),
            scale: 0,
            not_null: false,
            default_source: None,
            primary_key: false,
            foreign_key: false,
            unique: false,
        }
    }

    pub fn varchar(name: &'static str, length: i64) -> Self {
        Self {
            name,
            field_type: 37,
            sub_type: Some(0),
            byte_length: length * 4,
            char_length: Some(length),
            precision: None,
            scale: 0,
            not_null: false,
            default_source: None,
            primary_key: false,
            foreign_key: false,
            unique: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Type and name of the first covering constraint, ordered by type.
    fn constraint(&self) -> Option<(&'static str, String)> {
        if self.foreign_key {
            Some(("FOREIGN KEY", format!("FK_{}", self.name)))
        } else if self.primary_key {
            Some(("PRIMARY KEY", format!("PK_{}", self.name)))
        } else if self.unique {
            Some(("UNIQUE", format!("UQ_{}", self.name)))
        } else {
            None
        }
    }

    pub fn default_source(mut self, source: &'static str) -> Self {
        self.default_source = Some(source);
        self
    }

    fn to_row(&self) -> FbRow {
        let opt = |v: Option<i64>| v.map(SqlType::Integer).unwrap_or(SqlType::Null);
        let constraint = self.constraint();
        FbRow::new(vec![
            // Catalog names arrive CHAR-padded
            ("FIELD_NAME".into(), SqlType::Text(format!("{:<31}", self.name))),
            ("FIELD_TYPE".into(), SqlType::Integer(self.field_type)),
            ("FIELD_SUB_TYPE".into(), opt(self.sub_type)),
            ("FIELD_LENGTH".into(), SqlType::Integer(self.byte_length)),
            ("CHARACTER_LENGTH".into(), opt(self.char_length)),
            ("FIELD_PRECISION".into(), opt(self.precision)),
            ("FIELD_SCALE".into(), SqlType::Integer(self.scale)),
            ("NOT_NULL".into(), SqlType::Integer(self.not_null as i64)),
            (
                "DEFAULT_SOURCE".into(),
                self.default_source
                    .map(|s| SqlType::Text(s.to_string()))
                    .unwrap_or(SqlType::Null),
            ),
            ("IS_PRIMARY_KEY".into(), SqlType::Integer(self.primary_key as i64)),
            ("IS_FOREIGN_KEY".into(), SqlType::Integer(self.foreign_key as i64)),
            ("IS_UNIQUE".into(), SqlType::Integer(self.unique as i64)),
            (
                "CONSTRAINT_TYPE".into(),
                constraint
                    .as_ref()
                    .map(|(kind, _)| SqlType::Text(format!("{kind:<11}")))
                    .unwrap_or(SqlType::Null),
            ),
            (
                "CONSTRAINT_NAME".into(),
                constraint
                    .map(|(_, name)| SqlType::Text(format!("{name:<31}")))
                    .unwrap_or(SqlType::Null),
            ),
        ])
    }
}

type Responder = dyn Fn(&str) -> Result<StatementOutcome, FbError> + Send + Sync;

#[derive(Default)]
struct State {
    tables: BTreeMap<String, Vec<FakeColumn>>,
    executed: Vec<String>,
    connects: usize,
    refuse_connections: bool,
    drop_next_call: bool,
}

/// In-memory Firebird double shared by every attachment it opens.
#[derive(Clone)]
pub struct FakeFirebird {
    state: Arc<Mutex<State>>,
    responder: Arc<Responder>,
}

impl FakeFirebird {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            responder: Arc::new(|sql| {
                Err(FbError::Sql {
                    msg: format!("Dynamic SQL Error\nSQL error code = -104\nToken unknown\n{sql}"),
                    code: -104,
                })
            }),
        }
    }

    pub fn with_table(self, name: &str, columns: Vec<FakeColumn>) -> Self {
        self.state
            .lock()
            .unwrap()
            .tables
            .insert(name.to_string(), columns);
        self
    }

    /// Answer non-catalog statements with `responder`.
    pub fn respond_with<F>(mut self, responder: F) -> Self
    where
        F: Fn(&str) -> Result<StatementOutcome, FbError> + Send + Sync + 'static,
    {
        self.responder = Arc::new(responder);
        self
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.state.lock().unwrap().refuse_connections = refuse;
    }

    /// Fail the next call with a lost-connection error.
    pub fn drop_next_call(&self) {
        self.state.lock().unwrap().drop_next_call = true;
    }

    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn manager(&self) -> ConnectionManager {
        ConnectionManager::new(self.clone())
    }

    fn take_dropped(&self) -> Result<(), FbError> {
        let mut state = self.state.lock().unwrap();
        if std::mem::take(&mut state.drop_next_call) {
            return Err(FbError::Sql {
                msg: "Error writing data to the connection".to_string(),
                code: -902,
            });
        }
        Ok(())
    }
}

impl Connector for FakeFirebird {
    fn connect(&self) -> Result<Box<dyn FirebirdBackend>, FbError> {
        let mut state = self.state.lock().unwrap();
        if state.refuse_connections {
            return Err(FbError::Other(
                "Unable to complete network request to host \"localhost\"".to_string(),
            ));
        }
        state.connects += 1;
        Ok(Box::new(FakeAttachment { db: self.clone() }))
    }

    fn target(&self) -> String {
        "sysdba:****@localhost/3050:fake.fdb".to_string()
    }
}

struct FakeAttachment {
    db: FakeFirebird,
}

impl FirebirdBackend for FakeAttachment {
    fn fetch(&mut self, sql: &str, params: Vec<SqlType>) -> Result<Vec<FbRow>, FbError> {
        self.db.take_dropped()?;
        let state = self.db.state.lock().unwrap();

        if sql == LIST_TABLES {
            return Ok(state
                .tables
                .keys()
                .map(|name| {
                    FbRow::new(vec![("TABLE_NAME".into(), SqlType::Text(name.clone()))])
                })
                .collect());
        }

        if sql == DESCRIBE_TABLE {
            let name = match params.first() {
                Some(SqlType::Text(name)) => name.clone(),
                other => return Err(FbError::Other(format!("unexpected parameter {other:?}"))),
            };
            return Ok(state
                .tables
                .get(&name)
                .map(|columns| columns.iter().map(FakeColumn::to_row).collect())
                .unwrap_or_default());
        }

        Err(FbError::Other(format!("unexpected catalog query: {sql}")))
    }

    fn run(&mut self, sql: &str) -> Result<StatementOutcome, FbError> {
        self.db.take_dropped()?;
        self.db.state.lock().unwrap().executed.push(sql.to_string());
        (self.db.responder)(sql)
    }

    fn close(self: Box<Self>) -> Result<(), FbError> {
        Ok(())
    }
}

/// The `(ID INTEGER NOT NULL, NAME VARCHAR(50))` table used across tests.
pub fn sample_database() -> FakeFirebird {
    FakeFirebird::new()
        .with_table(
            "T",
            vec![
                FakeColumn::integer("ID").not_null(),
                FakeColumn::varchar("NAME", 50),
            ],
        )
        .with_table(
            "ORDERS",
            vec![
                FakeColumn::integer("ORDER_ID").primary_key(),
                FakeColumn::integer("CUSTOMER_ID").foreign_key(),
                FakeColumn::varchar("STATUS", 10).default_source("DEFAULT 'NEW'"),
            ],
        )
}

/// Build a one-row result with the given cells.
pub fn row(cells: Vec<(&str, SqlType)>) -> FbRow {
    FbRow::new(
        cells
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    )
}
