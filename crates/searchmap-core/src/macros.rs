///
/// mapped_entity!
///
/// Declares a struct and its `MappedEntity` implementation in one place.
/// Every listed struct field becomes reachable by name; the `mapping`
/// expression is the in-code declaration the metadata factory reads.
///
/// ```ignore
/// mapped_entity! {
///     #[derive(Clone, Debug, Default)]
///     pub struct Post {
///         pub id: i64,
///         pub title: String,
///     }
///
///     path: "blog::Post",
///     mapping: EntityMapping::indexable("id")
///         .field(FieldMapping::new("id", FieldKind::Int))
///         .field(FieldMapping::new("title", FieldKind::Text)),
/// }
/// ```
///

#[macro_export]
macro_rules! mapped_entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $entity:ident {
            $($field_vis:vis $field:ident : $ty:ty),* $(,)?
        }

        path: $path:literal,
        mapping: $mapping:expr $(,)?
    ) => {
        $(#[$meta])*
        $vis struct $entity {
            $($field_vis $field: $ty),*
        }

        impl $crate::traits::MappedEntity for $entity {
            const PATH: &'static str = $path;

            fn declared_mapping() -> $crate::model::EntityMapping {
                $mapping
            }

            fn field_value(&self, field: &str) -> ::std::option::Option<$crate::value::Value> {
                match field {
                    $(stringify!($field) => ::std::option::Option::Some(
                        $crate::traits::FieldValue::to_value(&self.$field),
                    ),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field_value(
                &mut self,
                field: &str,
                value: &$crate::value::Value,
            ) -> ::std::result::Result<(), $crate::error::FieldError> {
                match field {
                    $(stringify!($field) => {
                        self.$field = $crate::traits::FieldValue::from_value(value)
                            .ok_or_else(|| $crate::error::FieldError::invalid(field, value))?;
                        ::std::result::Result::Ok(())
                    })*
                    _ => ::std::result::Result::Err(
                        $crate::error::FieldError::UnknownField(field.to_string()),
                    ),
                }
            }
        }
    };
}
