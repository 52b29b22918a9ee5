//! The canonical in-memory registry of merged items.
//!
//! Every collection is keyed so that re-registering an item replaces it in
//! place: last write wins, never a duplicate.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{NamedKind, Record, identifier};

/// A pod, identified by `(pod_type, name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pod {
    pub pod_type: String,
    pub name: String,
    /// Every attribute from the declaring record except `id` and `fields`.
    pub attributes: Record,
    /// Field records keyed by field name.
    pub fields: BTreeMap<String, Record>,
}

impl Pod {
    /// Build a pod from a decoded record, dropping its `id`.
    ///
    /// A `fields` attribute given inline seeds the field mapping: either a
    /// mapping of `name -> record`, or a sequence of records carrying `name`.
    pub fn from_record(pod_type: impl Into<String>, name: impl Into<String>, mut record: Record) -> Self {
        record.remove("id");
        let fields = record.remove("fields").map(inline_fields).unwrap_or_default();
        Self {
            pod_type: pod_type.into(),
            name: name.into(),
            attributes: record,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Record> {
        self.fields.get(name)
    }

    /// Render the pod back into one record, with its fields as a mapping.
    pub fn to_record(&self) -> Record {
        let mut record = self.attributes.clone();
        let fields = self
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), Value::Object(field.clone())))
            .collect();
        record.insert("fields".into(), Value::Object(fields));
        record
    }
}

fn inline_fields(value: Value) -> BTreeMap<String, Record> {
    let strip = |mut record: Record| {
        record.remove("id");
        record
    };

    match value {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(key, field)| match field {
                Value::Object(record) => Some((key, strip(record))),
                _ => None,
            })
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|field| match field {
                Value::Object(record) => {
                    let name = identifier(&record, "name")?.to_string();
                    Some((name, strip(record)))
                }
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pods: BTreeMap<String, BTreeMap<String, Pod>>,
    templates: BTreeMap<String, Record>,
    pages: BTreeMap<String, Record>,
    helpers: BTreeMap<String, Record>,
    custom: BTreeMap<String, BTreeMap<String, Record>>,
}

impl Store {
    /// Pods grouped by pod type, then by name.
    pub fn pods(&self) -> &BTreeMap<String, BTreeMap<String, Pod>> {
        &self.pods
    }

    pub fn pod(&self, pod_type: &str, name: &str) -> Option<&Pod> {
        self.pods.get(pod_type)?.get(name)
    }

    pub fn pod_count(&self) -> usize {
        self.pods.values().map(BTreeMap::len).sum()
    }

    pub fn templates(&self) -> &BTreeMap<String, Record> {
        &self.templates
    }

    pub fn pages(&self) -> &BTreeMap<String, Record> {
        &self.pages
    }

    pub fn helpers(&self) -> &BTreeMap<String, Record> {
        &self.helpers
    }

    pub fn named(&self, kind: NamedKind) -> &BTreeMap<String, Record> {
        match kind {
            NamedKind::Templates => &self.templates,
            NamedKind::Pages => &self.pages,
            NamedKind::Helpers => &self.helpers,
        }
    }

    /// Items of every custom item type, keyed by item type then name.
    pub fn custom_configs(&self) -> &BTreeMap<String, BTreeMap<String, Record>> {
        &self.custom
    }

    pub fn custom_items(&self, item_type: &str) -> Option<&BTreeMap<String, Record>> {
        self.custom.get(item_type)
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
            && self.templates.is_empty()
            && self.pages.is_empty()
            && self.helpers.is_empty()
            && self.custom.is_empty()
    }

    pub(crate) fn insert_pod(&mut self, pod: Pod) {
        self.pods
            .entry(pod.pod_type.clone())
            .or_default()
            .insert(pod.name.clone(), pod);
    }

    /// Look up a pod, creating it with `create` if it has not been seen yet.
    pub(crate) fn pod_or_insert_with(
        &mut self,
        pod_type: &str,
        name: &str,
        create: impl FnOnce() -> Pod,
    ) -> &mut Pod {
        self.pods
            .entry(pod_type.to_string())
            .or_default()
            .entry(name.to_string())
            .or_insert_with(create)
    }

    pub(crate) fn named_mut(&mut self, kind: NamedKind) -> &mut BTreeMap<String, Record> {
        match kind {
            NamedKind::Templates => &mut self.templates,
            NamedKind::Pages => &mut self.pages,
            NamedKind::Helpers => &mut self.helpers,
        }
    }

    pub(crate) fn custom_mut(&mut self, item_type: &str) -> &mut BTreeMap<String, Record> {
        self.custom.entry(item_type.to_string()).or_default()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
