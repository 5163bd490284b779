use std::collections::VecDeque;

use serde_json::Value;

use super::{slot_equals, Container, ContainerMut, Indexed, Patchable, SlotError};
use crate::coerce::Coerce;

macro_rules! sequence {
    ($seq:ident) => {
        impl<T: Patchable + Coerce> Patchable for $seq<T> {
            fn type_name(&self) -> String {
                <Self as Coerce>::type_name()
            }

            fn to_value(&self) -> Value {
                Value::Array(self.iter().map(Patchable::to_value).collect())
            }

            fn container(&self) -> Option<Container<'_>> {
                Some(Container::Indexed(self))
            }

            fn container_mut(&mut self) -> Option<ContainerMut<'_>> {
                Some(ContainerMut::Indexed(self))
            }
        }

        impl<T: Patchable + Coerce> Indexed for $seq<T> {
            fn len(&self) -> usize {
                $seq::len(self)
            }

            fn element(&self, index: usize) -> Option<&dyn Patchable> {
                self.get(index).map(|item| item as &dyn Patchable)
            }

            fn element_mut(&mut self, index: usize) -> Option<&mut dyn Patchable> {
                self.get_mut(index).map(|item| item as &mut dyn Patchable)
            }

            fn insert_element(&mut self, index: usize, value: &Value) -> Result<(), SlotError> {
                let len = $seq::len(self);
                if index > len {
                    return Err(SlotError::OutOfRange { index, len });
                }
                let item = T::coerce(value)?;
                self.insert(index, item);
                Ok(())
            }

            fn set_element(&mut self, index: usize, value: &Value) -> Result<(), SlotError> {
                let len = $seq::len(self);
                let slot = self
                    .get_mut(index)
                    .ok_or(SlotError::OutOfRange { index, len })?;
                *slot = T::coerce(value)?;
                Ok(())
            }

            fn remove_element(&mut self, index: usize) -> Result<Value, SlotError> {
                let len = $seq::len(self);
                if index >= len {
                    return Err(SlotError::OutOfRange { index, len });
                }
                // VecDeque::remove yields Option<T>; its snapshot is the element's.
                Ok(Patchable::to_value(&self.remove(index)))
            }

            fn element_equals(&self, index: usize, value: &Value) -> Result<bool, SlotError> {
                let len = $seq::len(self);
                let current = self.get(index).ok_or(SlotError::OutOfRange { index, len })?;
                Ok(slot_equals(current, value)?)
            }
        }
    };
}

sequence!(Vec);
sequence!(VecDeque);
