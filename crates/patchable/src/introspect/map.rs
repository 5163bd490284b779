use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{json_equal, slot_equals, Container, ContainerMut, Keyed, Patchable, SlotError};
use crate::coerce::{shape_name, Coerce};

// String-keyed maps are open keyed containers: `add` creates entries and
// `remove` deletes them.
macro_rules! open_map {
    ($map:ident, $remove:ident) => {
        impl<T: Patchable + Coerce> Patchable for $map<String, T> {
            fn type_name(&self) -> String {
                <Self as Coerce>::type_name()
            }

            fn to_value(&self) -> Value {
                Value::Object(
                    self.iter()
                        .map(|(key, item)| (key.clone(), item.to_value()))
                        .collect(),
                )
            }

            fn container(&self) -> Option<Container<'_>> {
                Some(Container::Keyed(self))
            }

            fn container_mut(&mut self) -> Option<ContainerMut<'_>> {
                Some(ContainerMut::Keyed(self))
            }
        }

        impl<T: Patchable + Coerce> Keyed for $map<String, T> {
            fn is_open(&self) -> bool {
                true
            }

            fn member_names(&self) -> Vec<&str> {
                self.keys().map(String::as_str).collect()
            }

            fn member(&self, name: &str) -> Option<&dyn Patchable> {
                self.get(name).map(|item| item as &dyn Patchable)
            }

            fn member_mut(&mut self, name: &str) -> Option<&mut dyn Patchable> {
                self.get_mut(name).map(|item| item as &mut dyn Patchable)
            }

            fn insert_member(&mut self, name: &str, value: &Value) -> Result<(), SlotError> {
                let item = T::coerce(value)?;
                self.insert(name.to_string(), item);
                Ok(())
            }

            fn reset_member(&mut self, name: &str) -> Result<Value, SlotError> {
                self.$remove(name)
                    .map(|item| item.to_value())
                    .ok_or_else(|| SlotError::UnknownMember(name.to_string()))
            }

            fn member_equals(&self, name: &str, value: &Value) -> Result<bool, SlotError> {
                let current = self
                    .get(name)
                    .ok_or_else(|| SlotError::UnknownMember(name.to_string()))?;
                Ok(slot_equals(current, value)?)
            }
        }
    };
}

open_map!(BTreeMap, remove);
open_map!(HashMap, remove);
open_map!(IndexMap, shift_remove);

// ── serde_json::Value as a structural document ───────────────────────────

impl Patchable for Value {
    fn type_name(&self) -> String {
        shape_name(self).to_string()
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn container(&self) -> Option<Container<'_>> {
        match self {
            Value::Object(map) => Some(Container::Keyed(map)),
            Value::Array(items) => Some(Container::Indexed(items)),
            _ => None,
        }
    }

    fn container_mut(&mut self) -> Option<ContainerMut<'_>> {
        match self {
            Value::Object(map) => Some(ContainerMut::Keyed(map)),
            Value::Array(items) => Some(ContainerMut::Indexed(items)),
            _ => None,
        }
    }
}

impl Keyed for Map<String, Value> {
    fn is_open(&self) -> bool {
        true
    }

    fn member_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    fn member(&self, name: &str) -> Option<&dyn Patchable> {
        self.get(name).map(|item| item as &dyn Patchable)
    }

    fn member_mut(&mut self, name: &str) -> Option<&mut dyn Patchable> {
        self.get_mut(name).map(|item| item as &mut dyn Patchable)
    }

    fn insert_member(&mut self, name: &str, value: &Value) -> Result<(), SlotError> {
        self.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn reset_member(&mut self, name: &str) -> Result<Value, SlotError> {
        self.shift_remove(name)
            .ok_or_else(|| SlotError::UnknownMember(name.to_string()))
    }

    fn member_equals(&self, name: &str, value: &Value) -> Result<bool, SlotError> {
        self.get(name)
            .map(|current| json_equal(current, value))
            .ok_or_else(|| SlotError::UnknownMember(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_maps_create_and_delete() {
        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        scores.insert_member("alice", &json!(9.5)).unwrap();
        assert_eq!(scores.get("alice"), Some(&9.5));
        assert_eq!(scores.reset_member("alice"), Ok(json!(9.5)));
        assert!(scores.is_empty());
        assert_eq!(
            scores.reset_member("alice"),
            Err(SlotError::UnknownMember("alice".to_string()))
        );
    }

    #[test]
    fn index_map_keeps_order_on_remove() {
        let mut map: IndexMap<String, u8> = IndexMap::new();
        for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
            map.insert_member(key, &json!(i)).unwrap();
        }
        map.reset_member("a").unwrap();
        assert_eq!(map.to_value(), json!({"b": 1, "c": 2}));
        assert_eq!(map.to_value().to_string(), r#"{"b":1,"c":2}"#);
    }

    #[test]
    fn value_object_and_array_views() {
        let mut doc = json!({"list": [1, 2], "n": null});
        assert!(matches!(doc.container(), Some(Container::Keyed(_))));
        assert!(doc["list"].container().is_some_and(|c| c.is_collection()));
        assert!(doc["n"].container().is_none());
        if let Some(ContainerMut::Keyed(map)) = doc.container_mut() {
            map.insert_member("extra", &json!({"deep": true})).unwrap();
        }
        assert_eq!(doc["extra"]["deep"], json!(true));
        assert_eq!(doc.type_name(), "object");
    }

    #[test]
    fn value_equality_is_ordered_for_arrays() {
        let doc = json!({"a": [1, {"b": "c"}]});
        let map = doc.as_object().unwrap();
        assert_eq!(map.member_equals("a", &json!([1, {"b": "c"}])), Ok(true));
        assert_eq!(map.member_equals("a", &json!([{"b": "c"}, 1])), Ok(false));
    }

    #[test]
    fn value_equality_compares_numbers_by_value() {
        let doc = json!({"a": 1, "b": [2.5, {"c": 3}]});
        let map = doc.as_object().unwrap();
        assert_eq!(map.member_equals("a", &json!(1.0)), Ok(true));
        assert_eq!(map.member_equals("b", &json!([2.5, {"c": 3.0}])), Ok(true));
        assert_eq!(map.member_equals("a", &json!(1.1)), Ok(false));
    }
}
