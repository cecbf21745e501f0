use crate::{
    backend::{Backend, BackendError, QuerySpecMap},
    model::short_name_of,
    value::{BackendType, ExternalId, FieldTypes, FieldValues, Value},
};
use std::{
    cell::{Ref, RefCell, RefMut},
    collections::{BTreeMap, HashMap},
    fmt,
};
use tracing::debug;

///
/// CONSTANTS
///

/// Dialect key this backend reads from native query maps.
pub const DIALECT: &str = "memory";

/// Suffix stripped from identity class names to derive table names.
const IDENTITY_SUFFIX: &str = "Id";

///
/// MemoryTable
///

#[derive(Clone, Debug, Default)]
pub struct MemoryTable {
    next_id: u64,
    rows: BTreeMap<u64, FieldValues>,
}

impl MemoryTable {
    /// Insert a row and return its freshly minted id (ids start at 1).
    pub fn insert(&mut self, fields: FieldValues) -> u64 {
        self.next_id += 1;
        self.rows.insert(self.next_id, fields);

        self.next_id
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&FieldValues> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut FieldValues> {
        self.rows.get_mut(&id)
    }

    pub fn rows(&self) -> impl Iterator<Item = (u64, &FieldValues)> {
        self.rows.iter().map(|(id, row)| (*id, row))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

///
/// MemoryTables
///

#[derive(Clone, Debug, Default)]
pub struct MemoryTables(BTreeMap<String, MemoryTable>);

impl MemoryTables {
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.0.get(name)
    }

    /// Table by name, created empty on first use.
    pub fn table_mut(&mut self, name: &str) -> &mut MemoryTable {
        self.0.entry(name.to_string()).or_default()
    }
}

///
/// MemoryRequest
/// Arguments handed to an operation override or native query.
///

#[derive(Debug)]
pub struct MemoryRequest<'a> {
    /// Table derived from the entity class, when the operation has one.
    pub table: Option<&'a str>,
    pub id: Option<u64>,
    pub field: Option<&'a str>,
    pub params: &'a FieldValues,
    pub multiple: bool,
}

/// Operation override or native query.
pub type MemoryQuery =
    Box<dyn Fn(&mut MemoryTables, &MemoryRequest<'_>) -> Result<Value, BackendError>>;

///
/// MemoryBackend
///
/// Reference backend keeping one table per identity class. Generic
/// operations address rows by integer id; any operation can be replaced by
/// an override registered under its fully-qualified name.
///
/// Overrides run while the tables are borrowed. Calling back into the same
/// backend from an override fails with `BackendError::Transport`.
///

#[derive(Default)]
pub struct MemoryBackend {
    tables: RefCell<MemoryTables>,
    operations: HashMap<String, MemoryQuery>,
    native: HashMap<String, MemoryQuery>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the generic behaviour of one operation.
    #[must_use]
    pub fn with_operation<F>(mut self, operation: impl Into<String>, query: F) -> Self
    where
        F: Fn(&mut MemoryTables, &MemoryRequest<'_>) -> Result<Value, BackendError> + 'static,
    {
        self.operations.insert(operation.into(), Box::new(query));
        self
    }

    /// Register a native query; `retrieve` selects it by the `memory` dialect key.
    #[must_use]
    pub fn with_native_query<F>(mut self, name: impl Into<String>, query: F) -> Self
    where
        F: Fn(&mut MemoryTables, &MemoryRequest<'_>) -> Result<Value, BackendError> + 'static,
    {
        self.native.insert(name.into(), Box::new(query));
        self
    }

    /// Insert a prepared row for `entity` and return its id.
    pub fn seed(&self, entity: &str, fields: FieldValues) -> Result<ExternalId, BackendError> {
        let table = table_name(entity)?;
        let id = self.tables_mut()?.table_mut(table).insert(fields);

        Ok(ExternalId::from(id))
    }

    /// Snapshot of one row.
    #[must_use]
    pub fn row(&self, entity: &str, id: &ExternalId) -> Option<FieldValues> {
        let table = table_name(entity).ok()?;
        let id = parse_id(id)?;

        self.tables.try_borrow().ok()?.table(table)?.get(id).cloned()
    }

    /// Read access to every table; panics if called from inside an override.
    pub fn tables(&self) -> Ref<'_, MemoryTables> {
        self.tables.borrow()
    }

    fn tables_ref(&self) -> Result<Ref<'_, MemoryTables>, BackendError> {
        self.tables.try_borrow().map_err(|_| busy())
    }

    fn tables_mut(&self) -> Result<RefMut<'_, MemoryTables>, BackendError> {
        self.tables.try_borrow_mut().map_err(|_| busy())
    }

    fn run(&self, query: &MemoryQuery, request: &MemoryRequest<'_>) -> Result<Value, BackendError> {
        let mut tables = self.tables_mut()?;
        query(&mut *tables, request)
    }
}

impl fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("tables", &self.tables)
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .field("native", &self.native.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Backend for MemoryBackend {
    fn create(&self, entity: &str) -> Result<ExternalId, BackendError> {
        self.seed(entity, FieldValues::new())
    }

    fn get(
        &self,
        operation: &str,
        entity: &str,
        id: &ExternalId,
        _field_type: &BackendType,
        field: &str,
    ) -> Result<Value, BackendError> {
        let table = table_name(entity)?;
        let not_found = || BackendError::NotFound {
            entity: table.to_string(),
            id: id.to_string(),
        };
        let row_id = parse_id(id).ok_or_else(not_found)?;

        if let Some(query) = self.operations.get(operation) {
            let params = FieldValues::new();
            return self.run(
                query,
                &MemoryRequest {
                    table: Some(table),
                    id: Some(row_id),
                    field: Some(field),
                    params: &params,
                    multiple: false,
                },
            );
        }

        let tables = self.tables_ref()?;
        let row = tables
            .table(table)
            .and_then(|t| t.get(row_id))
            .ok_or_else(not_found)?;

        Ok(row.get(field).cloned().unwrap_or(Value::Null))
    }

    fn set(
        &self,
        operation: &str,
        entity: &str,
        id: &ExternalId,
        _field_types: &FieldTypes,
        field_values: &FieldValues,
    ) -> Result<(), BackendError> {
        let table = table_name(entity)?;
        let row_id = parse_id(id);

        if let Some(query) = self.operations.get(operation) {
            self.run(
                query,
                &MemoryRequest {
                    table: Some(table),
                    id: row_id,
                    field: None,
                    params: field_values,
                    multiple: false,
                },
            )?;
            return Ok(());
        }

        let mut tables = self.tables_mut()?;
        let row = match row_id {
            Some(row_id) => tables.table_mut(table).get_mut(row_id),
            None => None,
        };
        match row {
            Some(row) => row.extend(field_values.clone()),
            None => debug!(table, id = %id, "set matched no rows"),
        }

        Ok(())
    }

    fn find(
        &self,
        operation: &str,
        entity: Option<&str>,
        _filter_types: &FieldTypes,
        filter_values: &FieldValues,
        result_type: &BackendType,
        multiple: bool,
    ) -> Result<Value, BackendError> {
        let table = entity.map(table_name).transpose()?;

        if let Some(query) = self.operations.get(operation) {
            return self.run(
                query,
                &MemoryRequest {
                    table,
                    id: None,
                    field: None,
                    params: filter_values,
                    multiple,
                },
            );
        }

        let Some(table) = table.filter(|_| !result_type.is_record()) else {
            return Err(BackendError::Unsupported(format!(
                "find '{operation}' without an identity result needs an operation override"
            )));
        };

        let tables = self.tables_ref()?;
        let mut ids = tables
            .table(table)
            .into_iter()
            .flat_map(MemoryTable::rows)
            .filter(|(_, row)| {
                filter_values
                    .iter()
                    .all(|(name, value)| row.get(name).unwrap_or(&Value::Null) == value)
            })
            .map(|(id, _)| ExternalId::from(id).to_value());

        if multiple {
            Ok(Value::List(ids.collect()))
        } else {
            Ok(ids.next().unwrap_or(Value::Null))
        }
    }

    fn retrieve(
        &self,
        queries: &QuerySpecMap,
        _param_types: &FieldTypes,
        param_values: &FieldValues,
        _result_types: &FieldTypes,
    ) -> Result<Vec<Value>, BackendError> {
        let name = queries
            .get(DIALECT)
            .ok_or_else(|| BackendError::NoQueryForDialect {
                dialect: DIALECT.to_string(),
            })?;
        let query = self
            .native
            .get(name)
            .ok_or_else(|| BackendError::Unsupported(format!("unknown native query '{name}'")))?;

        let result = self.run(
            query,
            &MemoryRequest {
                table: None,
                id: None,
                field: None,
                params: param_values,
                multiple: true,
            },
        )?;

        result.into_list().ok_or_else(|| {
            BackendError::Transport(format!("native query '{name}' must return a list"))
        })
    }
}

/// Table name for an identity class: its short name without the `Id` suffix.
fn table_name(entity: &str) -> Result<&str, BackendError> {
    short_name_of(entity)
        .strip_suffix(IDENTITY_SUFFIX)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| BackendError::InvalidEntity(entity.to_string()))
}

fn parse_id(id: &ExternalId) -> Option<u64> {
    id.as_str().parse().ok()
}

fn busy() -> BackendError {
    BackendError::Transport("memory tables are in use by a running query".to_string())
}

///
/// TESTS
///
