//! Generation run orchestration.
//!
//! Connections are processed one at a time. A failure anywhere in a
//! connection's table loop ends that connection, is logged and recorded in
//! the [`GenerationReport`], and the run moves on. Files and route blocks
//! produced before the failure are kept. Only the final route flush can
//! fail the whole run.

use std::path::PathBuf;

use crate::classify::classify;
use crate::codegen::{fs_utils, TableContext, TargetTemplate};
use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::routes::{RouteAggregator, RouteBlock};
use crate::schema::SchemaReader;

/// Files written for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table: String,
    pub model_path: PathBuf,
    pub controller_path: PathBuf,
}

/// Outcome for one connection
#[derive(Debug, Clone, Default)]
pub struct ConnectionReport {
    pub connection: String,
    /// Tables fully generated before any failure
    pub tables: Vec<TableReport>,
    pub error: Option<String>,
}

impl ConnectionReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub connections: Vec<ConnectionReport>,
    /// Route blocks appended by the final flush
    pub routes_appended: usize,
}

impl GenerationReport {
    pub fn tables_generated(&self) -> usize {
        self.connections.iter().map(|c| c.tables.len()).sum()
    }

    pub fn failed_connections(&self) -> Vec<&str> {
        self.connections
            .iter()
            .filter(|c| !c.is_ok())
            .map(|c| c.connection.as_str())
            .collect()
    }

    pub fn connection(&self, name: &str) -> Option<&ConnectionReport> {
        self.connections.iter().find(|c| c.connection == name)
    }
}

/// Drives schema reading, rendering and file output for a run
pub struct Generator<R, T> {
    config: GeneratorConfig,
    reader: R,
    target: T,
}

impl<R: SchemaReader, T: TargetTemplate> Generator<R, T> {
    pub fn new(config: GeneratorConfig, reader: R, target: T) -> Self {
        Self { config, reader, target }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Generate for `selection`, or for every configured connection when
    /// `None`. A named connection is attempted even if it is not configured;
    /// the reader reports that as a connection failure.
    pub fn run(&mut self, selection: Option<&str>) -> Result<GenerationReport, GeneratorError> {
        let connections: Vec<String> = match selection {
            Some(name) => vec![name.to_string()],
            None => self.config.connection_names().map(str::to_string).collect(),
        };

        let mut routes = RouteAggregator::new();
        let mut report = GenerationReport::default();

        for connection in connections {
            tracing::info!(
                "Generating models and controllers for connection: {} (target: {})",
                connection,
                self.target.name()
            );

            let mut connection_report = ConnectionReport {
                connection: connection.clone(),
                ..ConnectionReport::default()
            };

            if let Err(e) = self.generate_connection(&connection, &mut connection_report, &mut routes) {
                tracing::error!(
                    "Error generating models or controllers for connection {}: {}",
                    connection,
                    e
                );
                connection_report.error = Some(e.to_string());
            }

            report.connections.push(connection_report);
        }

        report.routes_appended = routes.flush(self.config.paths.routes_file())?;

        Ok(report)
    }

    fn generate_connection(
        &mut self,
        connection: &str,
        report: &mut ConnectionReport,
        routes: &mut RouteAggregator,
    ) -> Result<(), GeneratorError> {
        let tables = self.reader.list_tables(connection)?;
        tracing::debug!("Connection {} has {} table(s)", connection, tables.len());

        for table in tables {
            let (table_report, block) = self.generate_table(connection, &table)?;
            routes.push(block);
            report.tables.push(table_report);
        }

        Ok(())
    }

    fn generate_table(
        &mut self,
        connection: &str,
        table: &str,
    ) -> Result<(TableReport, RouteBlock), GeneratorError> {
        let columns = self.reader.describe_columns(connection, table)?;
        let classification = classify(&columns);
        let ctx = TableContext {
            table,
            connection,
            classification: &classification,
        };
        let paths = &self.config.paths;

        let model = self.target.model_artifact(&ctx, &paths.models_dir());
        fs_utils::write_artifact(&model).map_err(|e| GeneratorError::io(&model.path, e))?;
        tracing::info!(
            "Model {} generated successfully for connection '{}'.",
            self.target.model_name(table),
            connection
        );

        let controller = self.target.controller_artifact(&ctx, &paths.controllers_dir());
        fs_utils::write_artifact(&controller)
            .map_err(|e| GeneratorError::io(&controller.path, e))?;
        tracing::info!(
            "Controller {} generated successfully for connection '{}'.",
            self.target.controller_name(table),
            connection
        );

        let block = RouteBlock {
            table: table.to_string(),
            text: self.target.render_routes(&ctx),
        };

        Ok((
            TableReport {
                table: table.to_string(),
                model_path: model.path,
                controller_path: controller.path,
            },
            block,
        ))
    }
}
