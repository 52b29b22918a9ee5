//! Merge decoded config into the store.
//!
//! A decoded file is a mapping of `item_type -> [record]`. Each section is
//! checked against the item type the file was discovered as, then merged by
//! the strategy for its item type:
//!
//! | Item type                      | Required identifiers                 | Stored at                              |
//! |--------------------------------|--------------------------------------|----------------------------------------|
//! | `pods`                         | `type`, `name`                       | `pods[type][name]`                     |
//! | `fields`                       | `type`, `name`, `pod.type`, `pod.name` | `pods[pod.type][pod.name].fields[name]` |
//! | `templates`, `pages`, `helpers` | `name`                              | `<item_type>[name]`                    |
//! | anything else                  | `name` (after preprocess hooks)      | `custom[item_type][name]`              |
//!
//! All strategies drop `id`, replace on key collision, and skip records that
//! lack their identifiers without failing the rest of the file.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::hooks::Hooks;
use crate::provenance::Provenance;
use crate::store::{Pod, Store};
use crate::types::{ItemKind, NamedKind, POD_ITEM_TYPE, Record, identifier};

pub(crate) struct Registrar<'a> {
    store: &'a mut Store,
    provenance: &'a mut Provenance,
    hooks: &'a Hooks,
}

impl<'a> Registrar<'a> {
    pub fn new(store: &'a mut Store, provenance: &'a mut Provenance, hooks: &'a Hooks) -> Self {
        Self {
            store,
            provenance,
            hooks,
        }
    }

    /// Merge every permitted section of `config`. Returns the number of
    /// records admitted.
    ///
    /// `restriction` is the item type the file was discovered as. A file may
    /// declare its own item type's section; a `pods` file may declare any
    /// section. `None` or an empty restriction permits everything.
    pub fn register(&mut self, config: Record, path: &Path, restriction: Option<&str>) -> usize {
        let mut admitted = 0;

        for (item_type, items) in config {
            let Value::Array(items) = items else {
                debug!(path = %path.display(), %item_type, "section is not a sequence, skipping");
                continue;
            };
            if items.is_empty() {
                continue;
            }
            if !section_permitted(restriction, &item_type) {
                debug!(
                    path = %path.display(),
                    %item_type,
                    restriction = restriction.unwrap_or_default(),
                    "section not permitted in this file, skipping"
                );
                continue;
            }

            admitted += match ItemKind::from_id(&item_type) {
                ItemKind::Pods => self.register_pods(items, path),
                ItemKind::Fields => self.register_fields(items, path),
                ItemKind::Named(kind) => self.register_named(kind, items, path),
                ItemKind::Custom(custom) => self.register_custom(custom, items, path),
            };
        }

        admitted
    }

    fn register_pods(&mut self, items: Vec<Value>, path: &Path) -> usize {
        let mut admitted = 0;
        for item in items {
            let Value::Object(record) = item else {
                skip(path, POD_ITEM_TYPE, "not a record");
                continue;
            };
            let (Some(pod_type), Some(name)) = (identifier(&record, "type"), identifier(&record, "name"))
            else {
                skip(path, POD_ITEM_TYPE, "missing type or name");
                continue;
            };
            let (pod_type, name) = (pod_type.to_string(), name.to_string());
            let label = format!("{pod_type}:{name}");

            self.store.insert_pod(Pod::from_record(pod_type, name, record));
            self.provenance.record(path, POD_ITEM_TYPE, label);
            admitted += 1;
        }
        admitted
    }

    fn register_fields(&mut self, items: Vec<Value>, path: &Path) -> usize {
        let mut admitted = 0;
        for item in items {
            let Value::Object(mut record) = item else {
                skip(path, "fields", "not a record");
                continue;
            };
            let Some(name) = identifier(&record, "name").map(str::to_string) else {
                skip(path, "fields", "missing name");
                continue;
            };
            if identifier(&record, "type").is_none() {
                skip(path, "fields", "missing type");
                continue;
            }
            let pod_ref = match record.get_mut("pod") {
                Some(Value::Object(pod_ref)) => {
                    pod_ref.remove("id");
                    pod_ref.clone()
                }
                _ => {
                    skip(path, "fields", "missing pod reference");
                    continue;
                }
            };
            let (Some(pod_type), Some(pod_name)) =
                (identifier(&pod_ref, "type"), identifier(&pod_ref, "name"))
            else {
                skip(path, "fields", "pod reference missing type or name");
                continue;
            };
            let (pod_type, pod_name) = (pod_type.to_string(), pod_name.to_string());

            record.remove("id");
            let label = format!("{pod_type}:{pod_name}:{name}");
            let pod = self.store.pod_or_insert_with(&pod_type, &pod_name, || {
                Pod::from_record(pod_type.clone(), pod_name.clone(), pod_ref)
            });
            pod.fields.insert(name, record);

            self.provenance.record(path, POD_ITEM_TYPE, label);
            admitted += 1;
        }
        admitted
    }

    fn register_named(&mut self, kind: NamedKind, items: Vec<Value>, path: &Path) -> usize {
        let mut admitted = 0;
        for item in items {
            let Value::Object(mut record) = item else {
                skip(path, kind.as_str(), "not a record");
                continue;
            };
            let Some(name) = identifier(&record, "name").map(str::to_string) else {
                skip(path, kind.as_str(), "missing name");
                continue;
            };
            record.remove("id");

            self.store.named_mut(kind).insert(name.clone(), record);
            self.provenance.record(path, kind.as_str(), name);
            admitted += 1;
        }
        admitted
    }

    fn register_custom(&mut self, item_type: &str, items: Vec<Value>, path: &Path) -> usize {
        let mut admitted = 0;
        for item in items {
            let Value::Object(mut record) = self.hooks.apply_preprocess(item, item_type, path) else {
                skip(path, item_type, "not a record after preprocessing");
                continue;
            };
            let Some(name) = identifier(&record, "name").map(str::to_string) else {
                skip(path, item_type, "missing name");
                continue;
            };
            record.remove("id");

            self.store.custom_mut(item_type).insert(name.clone(), record);
            self.provenance.record(path, item_type, name);
            admitted += 1;
        }
        admitted
    }
}

fn section_permitted(restriction: Option<&str>, item_type: &str) -> bool {
    match restriction {
        None | Some("") => true,
        Some(restriction) => restriction == item_type || restriction == POD_ITEM_TYPE,
    }
}

fn skip(path: &Path, item_type: &str, why: &str) {
    debug!(path = %path.display(), item_type, why, "skipping record");
}
