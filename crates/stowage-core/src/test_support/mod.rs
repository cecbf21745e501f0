//! Shared fixtures for unit tests: a small catalog of class models, a store
//! builder and a backend double that records every call.

use crate::{
    backend::{Backend, BackendError, QuerySpecMap},
    catalog::ClassCatalog,
    model::{ClassModel, FieldModel},
    store::{BackendMap, EnvironmentStore, StoreConfig},
    value::{BackendType, ExternalId, FieldTypes, FieldValues, Value},
};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

///
/// CONSTANTS
///

pub(crate) const MAIN: &str = "main";

// ---- class models ------------------------------------------------------

pub(crate) static FOO_ID: ClassModel = ClassModel::new("app::FooId", &[]);
pub(crate) static BAR_ID: ClassModel = ClassModel::new("app::BarId", &[]);

/// Catalogued but never configured as an identity class.
pub(crate) static BAZ_ID: ClassModel = ClassModel::new("app::BazId", &[]);

pub(crate) static BAR_VALUE: ClassModel =
    ClassModel::new("app::BarValue", &[FieldModel::public("x", Some("int"))]);

pub(crate) static SUB_VALUE: ClassModel = ClassModel::extending(
    "app::sub::SubValue",
    &BAR_VALUE,
    &[FieldModel::public("y", Some("string"))],
);

pub(crate) static PAIR_VALUE: ClassModel = ClassModel::new(
    "app::PairValue",
    &[
        FieldModel::public("a", None),
        FieldModel::private("b", Some("FooId")),
    ],
);

pub(crate) static STAMP_VALUE: ClassModel =
    ClassModel::new("app::StampValue", &[FieldModel::public("at", Some("DateTime"))]);

pub(crate) static EMPTY_VALUE: ClassModel =
    ClassModel::new("app::EmptyValue", &[FieldModel::shared("count", None)]);

pub(crate) static FOO_ROW: ClassModel = ClassModel::new(
    "app::FooRow",
    &[
        FieldModel::public("c", Some("FooId")),
        FieldModel::public("label", Some("string")),
    ],
);

pub(crate) static ROW_STATIC: ClassModel = ClassModel::new(
    "app::RowStatic",
    &[
        FieldModel::shared("total", Some("int")),
        FieldModel::public("c", None),
    ],
);

pub(crate) static ROW_PRIVATE: ClassModel =
    ClassModel::new("app::RowPrivate", &[FieldModel::private("secret", None)]);

pub(crate) static ROW_ARRAY: ClassModel =
    ClassModel::new("app::RowArray", &[FieldModel::public("items", Some("int[]"))]);

pub(crate) static OTHER: ClassModel = ClassModel::new("app::Other", &[]);

pub(crate) fn catalog() -> ClassCatalog {
    [
        &FOO_ID,
        &BAR_ID,
        &BAZ_ID,
        &BAR_VALUE,
        &SUB_VALUE,
        &PAIR_VALUE,
        &STAMP_VALUE,
        &EMPTY_VALUE,
        &FOO_ROW,
        &ROW_STATIC,
        &ROW_PRIVATE,
        &ROW_ARRAY,
        &OTHER,
    ]
    .into_iter()
    .collect()
}

pub(crate) fn config() -> StoreConfig {
    StoreConfig::new()
        .identity_class(FOO_ID.path, MAIN)
        .identity_class(BAR_ID.path, MAIN)
        .value_class(BAR_VALUE.path)
        .value_class(SUB_VALUE.path)
        .value_class(PAIR_VALUE.path)
        .value_class(STAMP_VALUE.path)
        .value_class(EMPTY_VALUE.path)
}

pub(crate) fn backends(backend: &Rc<RecordingBackend>) -> BackendMap {
    let backend: Rc<dyn Backend> = backend.clone();

    BackendMap::from([(MAIN.to_string(), backend)])
}

/// Store over the fixture catalog with every class routed to `backend`.
pub(crate) fn store(backend: &Rc<RecordingBackend>) -> EnvironmentStore {
    store_with(backend, config())
}

pub(crate) fn store_with(backend: &Rc<RecordingBackend>, config: StoreConfig) -> EnvironmentStore {
    EnvironmentStore::new(catalog(), backends(backend), config).expect("fixture store")
}

///
/// BackendCall
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum BackendCall {
    Create {
        entity: String,
    },
    Get {
        operation: String,
        entity: String,
        id: ExternalId,
        field_type: BackendType,
        field: String,
    },
    Set {
        operation: String,
        entity: String,
        id: ExternalId,
        field_types: FieldTypes,
        field_values: FieldValues,
    },
    Find {
        operation: String,
        entity: Option<String>,
        filter_types: FieldTypes,
        filter_values: FieldValues,
        result_type: BackendType,
        multiple: bool,
    },
    Retrieve {
        queries: QuerySpecMap,
        param_types: FieldTypes,
        param_values: FieldValues,
        result_types: FieldTypes,
    },
}

///
/// RecordingBackend
///
/// Records calls in order and answers `get`/`find` from a queue of scripted
/// responses (`Null` when the queue is empty). Created ids count up from 1.
///

#[derive(Default)]
pub(crate) struct RecordingBackend {
    calls: RefCell<Vec<BackendCall>>,
    responses: RefCell<VecDeque<Result<Value, BackendError>>>,
    rows: RefCell<VecDeque<Vec<Value>>>,
    created: Cell<u64>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn respond(&self, value: Value) {
        self.responses.borrow_mut().push_back(Ok(value));
    }

    pub(crate) fn fail(&self, err: BackendError) {
        self.responses.borrow_mut().push_back(Err(err));
    }

    pub(crate) fn respond_rows(&self, rows: Vec<Value>) {
        self.rows.borrow_mut().push_back(rows);
    }

    pub(crate) fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn last_call(&self) -> Option<BackendCall> {
        self.calls.borrow().last().cloned()
    }

    pub(crate) fn creates(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, BackendCall::Create { .. }))
            .count()
    }

    fn record(&self, call: BackendCall) {
        self.calls.borrow_mut().push(call);
    }

    fn next_response(&self) -> Result<Value, BackendError> {
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

impl Backend for RecordingBackend {
    fn create(&self, entity: &str) -> Result<ExternalId, BackendError> {
        self.record(BackendCall::Create {
            entity: entity.to_string(),
        });
        self.created.set(self.created.get() + 1);

        Ok(ExternalId::from(self.created.get()))
    }

    fn get(
        &self,
        operation: &str,
        entity: &str,
        id: &ExternalId,
        field_type: &BackendType,
        field: &str,
    ) -> Result<Value, BackendError> {
        self.record(BackendCall::Get {
            operation: operation.to_string(),
            entity: entity.to_string(),
            id: id.clone(),
            field_type: field_type.clone(),
            field: field.to_string(),
        });

        self.next_response()
    }

    fn set(
        &self,
        operation: &str,
        entity: &str,
        id: &ExternalId,
        field_types: &FieldTypes,
        field_values: &FieldValues,
    ) -> Result<(), BackendError> {
        self.record(BackendCall::Set {
            operation: operation.to_string(),
            entity: entity.to_string(),
            id: id.clone(),
            field_types: field_types.clone(),
            field_values: field_values.clone(),
        });

        Ok(())
    }

    fn find(
        &self,
        operation: &str,
        entity: Option<&str>,
        filter_types: &FieldTypes,
        filter_values: &FieldValues,
        result_type: &BackendType,
        multiple: bool,
    ) -> Result<Value, BackendError> {
        self.record(BackendCall::Find {
            operation: operation.to_string(),
            entity: entity.map(str::to_string),
            filter_types: filter_types.clone(),
            filter_values: filter_values.clone(),
            result_type: result_type.clone(),
            multiple,
        });

        self.next_response()
    }

    fn retrieve(
        &self,
        queries: &QuerySpecMap,
        param_types: &FieldTypes,
        param_values: &FieldValues,
        result_types: &FieldTypes,
    ) -> Result<Vec<Value>, BackendError> {
        self.record(BackendCall::Retrieve {
            queries: queries.clone(),
            param_types: param_types.clone(),
            param_values: param_values.clone(),
            result_types: result_types.clone(),
        });

        Ok(self.rows.borrow_mut().pop_front().unwrap_or_default())
    }
}
