//! The [`Describe`] trait and its implementations for std types.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use crate::description::{IntegerRange, PrimitiveKind, SchemaDescription};
use crate::inspector::Inspector;

/// A type whose serialized shape can be described structurally.
///
/// Implementations must be pure: the same type always yields the same
/// description. Use [`Inspector::describe`] rather than calling
/// [`Describe::describe`] directly so results are memoized and named types are
/// stored once in the arena.
///
/// Usually derived:
///
/// ```rust
/// use daedalus_schema::Describe;
///
/// #[derive(Describe)]
/// #[serde(rename_all = "camelCase")]
/// struct NewFruit {
///     /// Display name
///     name: String,
///     unit_price: Option<f64>,
/// }
/// ```
pub trait Describe: 'static {
    /// Fields of this type are optional (`Option<T>`).
    const OPTIONAL: bool = false;

    /// Schema name used for named types.
    fn type_name() -> Cow<'static, str> {
        Cow::Owned(display_name(std::any::type_name::<Self>()))
    }

    /// Builds the description. Named types call [`Inspector::named`].
    fn describe(inspector: &mut Inspector) -> SchemaDescription;
}

/// Strips module paths from a Rust type name and flattens generics into a
/// name usable as an OpenAPI component key.
///
/// ```rust
/// use daedalus_schema::display_name;
///
/// assert_eq!(display_name("shop::model::Fruit"), "Fruit");
/// assert_eq!(display_name("shop::Page<shop::model::Fruit>"), "Page_Fruit");
/// assert_eq!(display_name("shop::Pair<alloc::string::String, u32>"), "Pair_String_u32");
/// ```
pub fn display_name(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len());
    let mut token = String::new();

    let flush = |token: &mut String, out: &mut String| {
        if let Some(last) = token.rsplit("::").next() {
            out.push_str(last);
        }
        token.clear();
    };

    for c in type_name.chars() {
        match c {
            '<' | ',' => {
                flush(&mut token, &mut out);
                out.push('_');
            }
            '>' | ' ' | '&' | '(' | ')' | '[' | ']' | ';' => flush(&mut token, &mut out),
            _ => token.push(c),
        }
    }
    flush(&mut token, &mut out);
    out
}

macro_rules! describe_primitive {
    ($kind:ident, $format:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(_inspector: &mut Inspector) -> SchemaDescription {
                    SchemaDescription::Primitive {
                        kind: PrimitiveKind::$kind,
                        format: $format,
                        range: None,
                    }
                }
            }
        )+
    };
}

macro_rules! describe_integer {
    ($format:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(_inspector: &mut Inspector) -> SchemaDescription {
                    SchemaDescription::bounded_integer(
                        $format,
                        IntegerRange::new(<$ty>::MIN as i128, <$ty>::MAX as i128),
                    )
                }
            }
        )+
    };
}

describe_primitive!(String, None => String, str, char);
describe_primitive!(Boolean, None => bool);
describe_integer!(Some("int32") => i8, i16, i32, u8, u16);
describe_integer!(Some("int64") => i64, isize, u32, u64, usize);
describe_primitive!(Integer, None => i128, u128);
describe_primitive!(Number, Some("float") => f32);
describe_primitive!(Number, Some("double") => f64);

impl Describe for () {
    fn describe(_inspector: &mut Inspector) -> SchemaDescription {
        SchemaDescription::Empty
    }
}

impl Describe for serde_json::Value {
    fn describe(_inspector: &mut Inspector) -> SchemaDescription {
        SchemaDescription::Any
    }
}

impl Describe for serde_json::Map<String, serde_json::Value> {
    fn describe(_inspector: &mut Inspector) -> SchemaDescription {
        SchemaDescription::map(SchemaDescription::Any)
    }
}

impl<T: Describe> Describe for Option<T> {
    const OPTIONAL: bool = true;

    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }

    fn describe(inspector: &mut Inspector) -> SchemaDescription {
        inspector.describe::<T>()
    }
}

macro_rules! describe_pointer {
    ($($ptr:ident),+) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ptr<T> {
                const OPTIONAL: bool = T::OPTIONAL;

                fn type_name() -> Cow<'static, str> {
                    T::type_name()
                }

                fn describe(inspector: &mut Inspector) -> SchemaDescription {
                    inspector.describe::<T>()
                }
            }
        )+
    };
}

describe_pointer!(Box, Arc, Rc);

impl<T: Describe + ?Sized> Describe for &'static T {
    const OPTIONAL: bool = T::OPTIONAL;

    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }

    fn describe(inspector: &mut Inspector) -> SchemaDescription {
        inspector.describe::<T>()
    }
}

impl<T> Describe for Cow<'static, T>
where
    T: Describe + ToOwned + ?Sized,
    T::Owned: 'static,
{
    fn describe(inspector: &mut Inspector) -> SchemaDescription {
        inspector.describe::<T>()
    }
}

macro_rules! describe_sequence {
    ($($seq:ident),+) => {
        $(
            impl<T: Describe> Describe for $seq<T> {
                fn describe(inspector: &mut Inspector) -> SchemaDescription {
                    SchemaDescription::array(inspector.describe::<T>())
                }
            }
        )+
    };
}

describe_sequence!(Vec, VecDeque, LinkedList, BTreeSet);

impl<T: Describe> Describe for [T] {
    fn describe(inspector: &mut Inspector) -> SchemaDescription {
        SchemaDescription::array(inspector.describe::<T>())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(inspector: &mut Inspector) -> SchemaDescription {
        SchemaDescription::array(inspector.describe::<T>())
    }
}

impl<T: Describe, S: 'static> Describe for HashSet<T, S> {
    fn describe(inspector: &mut Inspector) -> SchemaDescription {
        SchemaDescription::array(inspector.describe::<T>())
    }
}

/// JSON object keys are strings; serde_json also accepts integers and unit
/// enum variants there, everything else fails at run time.
fn map_schema<K: Describe, V: Describe>(inspector: &mut Inspector) -> SchemaDescription {
    let key = inspector.describe::<K>();
    let key_ok = matches!(
        inspector.arena().resolve(&key),
        SchemaDescription::Primitive {
            kind: PrimitiveKind::String | PrimitiveKind::Integer,
            ..
        } | SchemaDescription::Enumeration(_)
    );
    if !key_ok {
        return SchemaDescription::unsupported(
            std::any::type_name::<K>(),
            "map keys must serialize as strings",
        );
    }
    SchemaDescription::map(inspector.describe::<V>())
}

impl<K: Describe, V: Describe, S: 'static> Describe for HashMap<K, V, S> {
    fn describe(inspector: &mut Inspector) -> SchemaDescription {
        map_schema::<K, V>(inspector)
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe(inspector: &mut Inspector) -> SchemaDescription {
        map_schema::<K, V>(inspector)
    }
}

impl<K: Describe, V: Describe, S: 'static> Describe for indexmap::IndexMap<K, V, S> {
    fn describe(inspector: &mut Inspector) -> SchemaDescription {
        map_schema::<K, V>(inspector)
    }
}

macro_rules! describe_tuple {
    ($($name:ident),+) => {
        impl<$($name: Describe),+> Describe for ($($name,)+) {
            fn describe(_inspector: &mut Inspector) -> SchemaDescription {
                SchemaDescription::unsupported(
                    std::any::type_name::<Self>(),
                    "tuples have no structural schema; use a struct with named fields",
                )
            }
        }
    };
}

describe_tuple!(A);
describe_tuple!(A, B);
describe_tuple!(A, B, C);
describe_tuple!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::InspectorConfig;

    fn describe<T: Describe + ?Sized>() -> SchemaDescription {
        Inspector::new(InspectorConfig::default()).describe::<T>()
    }

    #[test]
    fn test_integer_formats() {
        assert_eq!(
            describe::<u8>(),
            SchemaDescription::bounded_integer(Some("int32"), IntegerRange::new(0, 255))
        );
        assert_eq!(
            describe::<i16>(),
            SchemaDescription::bounded_integer(Some("int32"), IntegerRange::new(-32768, 32767))
        );
        assert_eq!(
            describe::<u64>(),
            SchemaDescription::bounded_integer(
                Some("int64"),
                IntegerRange::new(0, i128::from(u64::MAX))
            )
        );
        assert_eq!(describe::<u128>(), SchemaDescription::integer(None));
    }

    #[test]
    fn test_optional_and_pointers_unwrap() {
        assert_eq!(describe::<Option<String>>(), SchemaDescription::string());
        assert_eq!(describe::<Box<str>>(), SchemaDescription::string());
        assert_eq!(describe::<Arc<f64>>(), SchemaDescription::number(Some("double")));
        assert!(<Option<u8> as Describe>::OPTIONAL);
        assert!(<Box<Option<u8>> as Describe>::OPTIONAL);
        assert!(!<Vec<Option<u8>> as Describe>::OPTIONAL);
    }

    #[test]
    fn test_sequences_are_arrays() {
        let expected = SchemaDescription::array(SchemaDescription::boolean());
        assert_eq!(describe::<Vec<bool>>(), expected);
        assert_eq!(describe::<[bool; 3]>(), expected);
        assert_eq!(describe::<[bool]>(), expected);
        assert_eq!(describe::<BTreeSet<bool>>(), expected);
    }

    #[test]
    fn test_string_keyed_map() {
        assert_eq!(
            describe::<HashMap<String, u32>>(),
            SchemaDescription::map(describe::<u32>())
        );
        assert_eq!(
            describe::<BTreeMap<u16, bool>>(),
            SchemaDescription::map(SchemaDescription::boolean())
        );
    }

    #[test]
    fn test_non_string_map_key_is_unsupported() {
        assert!(matches!(
            describe::<HashMap<bool, u32>>(),
            SchemaDescription::Unsupported { .. }
        ));
    }

    #[test]
    fn test_tuple_is_unsupported() {
        assert!(matches!(
            describe::<(u8, String)>(),
            SchemaDescription::Unsupported { .. }
        ));
    }

    #[test]
    fn test_unit_and_value() {
        assert_eq!(describe::<()>(), SchemaDescription::Empty);
        assert_eq!(describe::<serde_json::Value>(), SchemaDescription::Any);
    }

    #[test]
    fn test_display_name_of_std_type() {
        assert_eq!(<Vec<u8> as Describe>::type_name(), "Vec_u8");
        assert_eq!(<Option<String> as Describe>::type_name(), "String");
    }
}
