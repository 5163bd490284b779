//! Record adapter: exposes a struct's fields as a closed keyed container.

/// Implements [`Patchable`](crate::Patchable), [`Keyed`](crate::Keyed) and
/// [`Coerce`](crate::Coerce) for a struct.
///
/// Every listed field must implement `Patchable + Coerce + Default`, and the
/// struct itself must implement `Default`. Members are addressed by field
/// name unless renamed with `field as "wireName"`. Fields that are not listed
/// are invisible to patches.
///
/// Records are closed: `add` cannot create members, and `remove` resets a
/// member to its default value instead of deleting it.
///
/// # Example
///
/// ```
/// use patchable::{apply, patchable_record, Operation};
/// use serde_json::json;
///
/// #[derive(Debug, Default)]
/// struct User {
///     name: String,
///     login_count: u32,
///     tags: Vec<String>,
/// }
///
/// patchable_record!(User { name, login_count as "loginCount", tags });
///
/// let mut user = User::default();
/// let result = apply(
///     &mut user,
///     &[
///         Operation::replace("/name", json!("Ada")),
///         Operation::add("/tags/-", json!("admin")),
///         Operation::replace("/loginCount", json!(3)),
///     ],
/// );
/// assert!(result.succeeded);
/// assert_eq!(user.name, "Ada");
/// assert_eq!(user.login_count, 3);
/// assert_eq!(user.tags, ["admin"]);
/// ```
#[macro_export]
macro_rules! patchable_record {
    ($ty:ident { $($field:ident $(as $name:literal)?),* $(,)? }) => {
        impl $crate::Patchable for $ty {
            fn type_name(&self) -> ::std::string::String {
                ::std::string::String::from(stringify!($ty))
            }

            fn to_value(&self) -> $crate::__private::Value {
                let mut map = $crate::__private::Map::new();
                $(
                    map.insert(
                        ::std::string::String::from($crate::__member_name!($field $($name)?)),
                        $crate::Patchable::to_value(&self.$field),
                    );
                )*
                $crate::__private::Value::Object(map)
            }

            fn container(&self) -> ::std::option::Option<$crate::Container<'_>> {
                ::std::option::Option::Some($crate::Container::Keyed(self))
            }

            fn container_mut(&mut self) -> ::std::option::Option<$crate::ContainerMut<'_>> {
                ::std::option::Option::Some($crate::ContainerMut::Keyed(self))
            }
        }

        impl $crate::Keyed for $ty {
            fn is_open(&self) -> bool {
                false
            }

            fn member_names(&self) -> ::std::vec::Vec<&str> {
                ::std::vec![$($crate::__member_name!($field $($name)?)),*]
            }

            fn member(&self, name: &str) -> ::std::option::Option<&dyn $crate::Patchable> {
                $(
                    if name == $crate::__member_name!($field $($name)?) {
                        return ::std::option::Option::Some(&self.$field as &dyn $crate::Patchable);
                    }
                )*
                ::std::option::Option::None
            }

            fn member_mut(&mut self, name: &str) -> ::std::option::Option<&mut dyn $crate::Patchable> {
                $(
                    if name == $crate::__member_name!($field $($name)?) {
                        return ::std::option::Option::Some(&mut self.$field as &mut dyn $crate::Patchable);
                    }
                )*
                ::std::option::Option::None
            }

            fn insert_member(
                &mut self,
                name: &str,
                value: &$crate::__private::Value,
            ) -> ::std::result::Result<(), $crate::SlotError> {
                $(
                    if name == $crate::__member_name!($field $($name)?) {
                        return $crate::introspect::assign(&mut self.$field, value)
                            .map_err($crate::SlotError::from);
                    }
                )*
                ::std::result::Result::Err($crate::SlotError::UnknownMember(name.to_string()))
            }

            fn reset_member(
                &mut self,
                name: &str,
            ) -> ::std::result::Result<$crate::__private::Value, $crate::SlotError> {
                $(
                    if name == $crate::__member_name!($field $($name)?) {
                        return ::std::result::Result::Ok($crate::introspect::reset(&mut self.$field));
                    }
                )*
                ::std::result::Result::Err($crate::SlotError::UnknownMember(name.to_string()))
            }

            fn member_equals(
                &self,
                name: &str,
                value: &$crate::__private::Value,
            ) -> ::std::result::Result<bool, $crate::SlotError> {
                $(
                    if name == $crate::__member_name!($field $($name)?) {
                        return $crate::introspect::slot_equals(&self.$field, value)
                            .map_err($crate::SlotError::from);
                    }
                )*
                ::std::result::Result::Err($crate::SlotError::UnknownMember(name.to_string()))
            }
        }

        impl $crate::Coerce for $ty {
            fn type_name() -> ::std::string::String {
                ::std::string::String::from(stringify!($ty))
            }

            fn coerce(
                value: &$crate::__private::Value,
            ) -> ::std::result::Result<Self, $crate::CoercionError> {
                let members = value.as_object().ok_or_else(|| {
                    $crate::CoercionError::new(stringify!($ty), value)
                })?;
                let mut out = <$ty as ::std::default::Default>::default();
                for (key, item) in members {
                    let key = key.as_str();
                    $(
                        if key == $crate::__member_name!($field $($name)?) {
                            $crate::introspect::assign(&mut out.$field, item)?;
                            continue;
                        }
                    )*
                    return ::std::result::Result::Err(
                        $crate::CoercionError::unknown_member(stringify!($ty), key),
                    );
                }
                ::std::result::Result::Ok(out)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __member_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident $name:literal) => {
        $name
    };
}
