use serde_json::Value;

use super::{Container, ContainerMut, Patchable};
use crate::coerce::Coerce;

macro_rules! leaf {
    ($($ty:ty),*) => {$(
        impl Patchable for $ty {
            fn type_name(&self) -> String {
                <$ty as Coerce>::type_name()
            }

            fn to_value(&self) -> Value {
                Value::from(self.clone())
            }
        }
    )*};
}

leaf!(bool, String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Patchable for char {
    fn type_name(&self) -> String {
        <char as Coerce>::type_name()
    }

    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

// `None` is an absent value: it serializes as null and cannot be traversed.
impl<T: Patchable + Coerce> Patchable for Option<T> {
    fn type_name(&self) -> String {
        <Self as Coerce>::type_name()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Patchable::to_value)
    }

    fn container(&self) -> Option<Container<'_>> {
        self.as_ref().and_then(Patchable::container)
    }

    fn container_mut(&mut self) -> Option<ContainerMut<'_>> {
        self.as_mut().and_then(Patchable::container_mut)
    }
}

impl<T: Patchable + ?Sized> Patchable for Box<T> {
    fn type_name(&self) -> String {
        (**self).type_name()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn container(&self) -> Option<Container<'_>> {
        (**self).container()
    }

    fn container_mut(&mut self) -> Option<ContainerMut<'_>> {
        (**self).container_mut()
    }
}
