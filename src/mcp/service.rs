//! MCP service implementation using rmcp.
//!
//! This module defines the FirebirdService struct with the database tools
//! exposed via the MCP protocol using the rmcp framework's macros, plus the
//! `firebird://table/{table_name}` resources.

use rmcp::Json;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        AnnotateAble, CallToolResult, Implementation, ListResourceTemplatesResult,
        ListResourcesResult, PaginatedRequestParam, ProtocolVersion, RawResource,
        RawResourceTemplate, ReadResourceRequestParam, ReadResourceResult, Resource,
        ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use tracing::warn;

use crate::db::ConnectionManager;
use crate::mcp::resource::{self, RESOURCE_MIME_TYPE, TABLE_URI_TEMPLATE};
use crate::tools::query::{ExecuteQueryInput, QueryToolHandler};
use crate::tools::schema::{
    DescribeTableInput, DescribeTableOutput, ListTablesOutput, SchemaToolHandler,
};

#[derive(Clone)]
pub struct FirebirdService {
    /// Shared connection manager for all database operations
    connections: ConnectionManager,
    schema: SchemaToolHandler,
    query: QueryToolHandler,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl FirebirdService {
    /// Create a new FirebirdService instance over a shared connection manager.
    pub fn new(connections: ConnectionManager) -> Self {
        Self {
            schema: SchemaToolHandler::new(connections.clone()),
            query: QueryToolHandler::new(connections.clone()),
            connections,
            tool_router: Self::tool_router(),
        }
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    /// One resource per user table.
    pub async fn table_resources(&self) -> Result<Vec<Resource>, McpError> {
        let tables = self
            .schema
            .list_tables()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to list tables for resources"))?
            .tables;

        Ok(tables
            .into_iter()
            .map(|table| {
                RawResource {
                    uri: resource::table_uri(&table),
                    name: table.clone(),
                    title: Some(format!("Table: {table}")),
                    description: Some(format!("Columns of table {table}")),
                    mime_type: Some(RESOURCE_MIME_TYPE.to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                }
                .no_annotation()
            })
            .collect())
    }

    /// Read a table resource. The text is the `describe_table` tool output.
    pub async fn read_table_resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let table_name = resource::parse_table_uri(uri)?;
        let output = self
            .schema
            .describe_table(DescribeTableInput { table_name })
            .await?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some(RESOURCE_MIME_TYPE.to_string()),
                text: to_json_value(&output)?.to_string(),
                meta: None,
            }],
        })
    }
}

/// Serialize exactly as `Json<T>` tool output does.
fn to_json_value<T: Serialize>(value: &T) -> Result<serde_json::Value, McpError> {
    serde_json::to_value(value).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize result: {e}"), None)
    })
}

#[tool_router]
impl FirebirdService {
    #[tool(
        description = "List all user tables in the Firebird database.\nViews and system tables are excluded. Names are returned sorted."
    )]
    pub async fn list_tables(&self) -> Result<Json<ListTablesOutput>, McpError> {
        self.schema
            .list_tables()
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Describe the columns of a table: name, type, length, precision, scale, nullability, default, primary and foreign key membership.\nReturns an empty column list when the table does not exist. Unquoted Firebird names are stored in upper case."
    )]
    pub async fn describe_table(
        &self,
        Parameters(input): Parameters<DescribeTableInput>,
    ) -> Result<Json<DescribeTableOutput>, McpError> {
        self.schema
            .describe_table(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Execute any SQL statement against the Firebird database.\nSELECT returns {rows: [...]} with one object per row. Other statements are committed immediately and return {success, rows_affected}."
    )]
    pub async fn execute_query(
        &self,
        Parameters(input): Parameters<ExecuteQueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self.query.execute_query(input).await?;
        Ok(CallToolResult::structured(to_json_value(&outcome)?))
    }
}

#[tool_handler]
impl ServerHandler for FirebirdService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "firebird-mcp".to_owned(),
                title: Some("Firebird MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for inspecting and querying a Firebird database.\n\
                \n\
                ## Workflow\n\
                1. Call `list_tables` to see the user tables\n\
                2. Call `describe_table` with a name from step 1 to see its columns\n\
                3. Call `execute_query` to run SQL\n\
                \n\
                ## Notes\n\
                - `execute_query` runs any statement, including UPDATE, DELETE and DDL. Writes are committed immediately.\n\
                - Firebird SQL: use `FIRST n` / `ROWS n` instead of LIMIT; `RDB$DATABASE` is a one-row table for expressions.\n\
                - Each table is also available as the resource `firebird://table/{table_name}`."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(
            self.table_resources().await?,
        ))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        let template = RawResourceTemplate {
            uri_template: TABLE_URI_TEMPLATE.to_string(),
            name: "Firebird Table".to_string(),
            title: Some("Firebird Table Columns".to_string()),
            description: Some("Column descriptors of a table, as returned by describe_table".to_string()),
            mime_type: Some(RESOURCE_MIME_TYPE.to_string()),
        }
        .no_annotation();
        Ok(ListResourceTemplatesResult::with_all_items(vec![template]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_table_resource(&request.uri).await
    }
}
