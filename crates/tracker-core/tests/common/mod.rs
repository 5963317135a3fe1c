//! Test doubles and common utilities for plumbing contract tests
//!
//! `WidgetResource` is a minimal resource kind over `WidgetClient`, an
//! in-memory service that counts calls and can be told to fail.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tracker_core::{Error, FieldSchema, FieldType, Resource, ResourceData, Result, Schema};

pub const WIDGET: &str = "test_widget";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("widget service failed: {0}")]
pub struct WidgetError(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Widget {
    pub name: String,
    pub size: i64,
}

/// In-memory widget service
pub struct WidgetClient {
    widgets: Mutex<BTreeMap<u64, Widget>>,
    next_id: AtomicU64,
    calls: AtomicUsize,
    failure: Mutex<Option<WidgetError>>,
}

impl Default for WidgetClient {
    fn default() -> Self {
        Self {
            widgets: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            calls: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }
}

impl WidgetClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(WidgetError(message.to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn widget(&self, id: u64) -> Option<Widget> {
        self.widgets.lock().unwrap().get(&id).cloned()
    }

    fn record(&self) -> std::result::Result<(), WidgetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn missing(id: u64) -> WidgetError {
        WidgetError(format!("widget {id} not found"))
    }

    pub fn create(&self, widget: Widget) -> std::result::Result<u64, WidgetError> {
        self.record()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.widgets.lock().unwrap().insert(id, widget);
        Ok(id)
    }

    pub fn get(&self, id: u64) -> std::result::Result<Widget, WidgetError> {
        self.record()?;
        self.widget(id).ok_or_else(|| Self::missing(id))
    }

    pub fn update(&self, id: u64, widget: Widget) -> std::result::Result<Widget, WidgetError> {
        self.record()?;
        let mut widgets = self.widgets.lock().unwrap();
        let stored = widgets.get_mut(&id).ok_or_else(|| Self::missing(id))?;
        *stored = widget;
        Ok(stored.clone())
    }

    pub fn delete(&self, id: u64) -> std::result::Result<(), WidgetError> {
        self.record()?;
        self.widgets
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::missing(id))
    }
}

/// Resource kind with one required and one optional field
pub struct WidgetResource;

impl WidgetResource {
    fn request(data: &ResourceData) -> Result<Widget> {
        Ok(Widget {
            name: data
                .get("name")
                .map(|v| v.expect_string())
                .transpose()
                .map_err(|e| Error::invalid_field("name", e))?
                .unwrap_or_default(),
            size: data
                .get("size")
                .map(|v| v.expect_int::<i64>())
                .transpose()
                .map_err(|e| Error::invalid_field("size", e))?
                .unwrap_or_default(),
        })
    }

    fn apply(data: &mut ResourceData, widget: &Widget) {
        data.set("name", widget.name.as_str());
        data.set("size", widget.size);
    }
}

impl Resource<WidgetClient> for WidgetResource {
    fn schema(&self) -> Schema {
        Schema::new(
            1,
            vec![
                FieldSchema::required("name", FieldType::String, "Widget name"),
                FieldSchema::optional("size", FieldType::Int, "Widget size"),
            ],
        )
    }

    fn create(&self, data: &mut ResourceData, client: &WidgetClient) -> Result<()> {
        let widget = Self::request(data)?;
        let id = client.create(widget.clone()).map_err(Error::client)?;
        data.set_id(id.to_string());
        Self::apply(data, &widget);
        Ok(())
    }

    fn read(&self, data: &mut ResourceData, client: &WidgetClient) -> Result<()> {
        let widget = client.get(data.parsed_id()?).map_err(Error::client)?;
        Self::apply(data, &widget);
        Ok(())
    }

    fn update(&self, data: &mut ResourceData, client: &WidgetClient) -> Result<()> {
        let id = data.parsed_id()?;
        let widget = client
            .update(id, Self::request(data)?)
            .map_err(Error::client)?;
        Self::apply(data, &widget);
        Ok(())
    }

    fn delete(&self, data: &ResourceData, client: &WidgetClient) -> Result<()> {
        client.delete(data.parsed_id()?).map_err(Error::client)
    }

    fn exists(&self, data: &ResourceData, client: &WidgetClient) -> Result<bool> {
        Ok(client.get(data.parsed_id()?).is_ok())
    }
}
