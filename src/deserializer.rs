//! Serde deserializer implementation for HOCON
//!
//! This module provides the serde integration, allowing a parsed
//! configuration (or any node inside it) to be deserialized into Rust types
//! using the standard serde derive macros.
//!
//! Documents parsed without native conversion hold every scalar as text, so
//! the deserializer converts strings to numbers and booleans when the target
//! type asks for one.

use crate::config::ConfigFactory;
use crate::error::{HoconError, SerdeError};
use crate::native::{NativeMap, NativeValue};
use crate::value::HoconValue;
use serde::de::{self, DeserializeOwned, DeserializeSeed, Visitor};

/// HOCON deserializer that implements serde::Deserializer
pub struct HoconDeserializer {
    value: NativeValue,
}

impl HoconDeserializer {
    /// Creates a deserializer over plain data
    pub fn new(value: NativeValue) -> Self {
        Self { value }
    }

    /// Creates a deserializer over a (resolved) document node
    pub fn from_node(node: &HoconValue) -> Self {
        Self::new(node.to_native())
    }

    fn mismatch(expected: &str, found: &NativeValue) -> HoconError {
        HoconError::Serde(SerdeError::TypeMismatch {
            expected: expected.to_string(),
            found: describe(found),
        })
    }

    fn integer(&self) -> Result<i64, HoconError> {
        match &self.value {
            NativeValue::Integer(i) => Ok(*i),
            NativeValue::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| Self::mismatch("integer", &self.value)),
            other => Err(Self::mismatch("integer", other)),
        }
    }

    fn float(&self) -> Result<f64, HoconError> {
        match &self.value {
            NativeValue::Float(f) => Ok(*f),
            NativeValue::Integer(i) => Ok(*i as f64),
            NativeValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Self::mismatch("float", &self.value)),
            other => Err(Self::mismatch("float", other)),
        }
    }

    fn is_null(&self) -> bool {
        match &self.value {
            NativeValue::Null => true,
            NativeValue::String(s) => s == "null",
            _ => false,
        }
    }
}

fn describe(value: &NativeValue) -> String {
    match value {
        NativeValue::String(s) => format!("string \"{}\"", s),
        NativeValue::Boolean(b) => format!("boolean {}", b),
        NativeValue::Integer(i) => format!("integer {}", i),
        NativeValue::Float(f) => format!("float {}", f),
        NativeValue::List(items) => format!("array of {} items", items.len()),
        NativeValue::Map(map) => format!("object with {} keys", map.len()),
        NativeValue::Null => "null".to_string(),
    }
}

macro_rules! deserialize_integer {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                let value = self.integer()?;
                visitor.visit_i64(value)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for HoconDeserializer {
    type Error = HoconError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            NativeValue::String(s) => visitor.visit_string(s),
            NativeValue::Integer(i) => visitor.visit_i64(i),
            NativeValue::Float(f) => visitor.visit_f64(f),
            NativeValue::Boolean(b) => visitor.visit_bool(b),
            NativeValue::Null => visitor.visit_unit(),
            NativeValue::Map(map) => visitor.visit_map(HoconMapAccess::new(map)),
            NativeValue::List(items) => visitor.visit_seq(HoconSeqAccess::new(items)),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match &self.value {
            NativeValue::Boolean(b) => visitor.visit_bool(*b),
            NativeValue::String(s) => match s.as_str() {
                "true" | "on" => visitor.visit_bool(true),
                "false" | "off" => visitor.visit_bool(false),
                _ => Err(Self::mismatch("boolean", &self.value)),
            },
            other => Err(Self::mismatch("boolean", other)),
        }
    }

    deserialize_integer! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.float()?;
        visitor.visit_f64(value)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if let NativeValue::String(s) = &self.value {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return visitor.visit_char(c);
            }
        }
        Err(Self::mismatch("single character", &self.value))
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            NativeValue::String(s) => visitor.visit_string(s),
            NativeValue::Integer(i) => visitor.visit_string(i.to_string()),
            NativeValue::Float(f) => visitor.visit_string(f.to_string()),
            NativeValue::Boolean(b) => visitor.visit_string(b.to_string()),
            ref other => Err(Self::mismatch("string", other)),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            NativeValue::String(s) => visitor.visit_byte_buf(s.into_bytes()),
            _ => self.deserialize_seq(visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.is_null() {
            visitor.visit_unit()
        } else {
            Err(Self::mismatch("null", &self.value))
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            NativeValue::List(items) => visitor.visit_seq(HoconSeqAccess::new(items)),
            // Allow objects to be deserialized as sequences of values
            NativeValue::Map(map) => {
                visitor.visit_seq(HoconSeqAccess::new(map.into_values().collect()))
            }
            ref other => Err(Self::mismatch("array or object", other)),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            NativeValue::Map(map) => visitor.visit_map(HoconMapAccess::new(map)),
            // Allow arrays to be deserialized as maps with string indices
            NativeValue::List(items) => {
                let map: NativeMap = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| (i.to_string(), value))
                    .collect();
                visitor.visit_map(HoconMapAccess::new(map))
            }
            ref other => Err(Self::mismatch("object or array", other)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            // Unit variant (string)
            NativeValue::String(s) => visitor.visit_enum(HoconEnumAccess::new(s, None)),
            // Data variant (object with single key)
            NativeValue::Map(map) if map.len() == 1 => match map.into_iter().next() {
                Some((variant, value)) => {
                    visitor.visit_enum(HoconEnumAccess::new(variant, Some(value)))
                }
                None => Err(HoconError::Serde(SerdeError::Custom(
                    "Empty enum object".to_string(),
                ))),
            },
            ref other => Err(Self::mismatch(
                "enum (string or single-key object)",
                other,
            )),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }
}

/// Sequence access for HOCON arrays
struct HoconSeqAccess {
    items: std::vec::IntoIter<NativeValue>,
}

impl HoconSeqAccess {
    fn new(items: Vec<NativeValue>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for HoconSeqAccess {
    type Error = HoconError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.items.next() {
            Some(value) => seed.deserialize(HoconDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Map access for HOCON objects
struct HoconMapAccess {
    entries: indexmap::map::IntoIter<String, NativeValue>,
    current_value: Option<NativeValue>,
}

impl HoconMapAccess {
    fn new(map: NativeMap) -> Self {
        Self {
            entries: map.into_iter(),
            current_value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for HoconMapAccess {
    type Error = HoconError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((key, value)) => {
                self.current_value = Some(value);
                seed.deserialize(HoconDeserializer::new(NativeValue::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current_value.take() {
            Some(value) => seed.deserialize(HoconDeserializer::new(value)),
            None => Err(HoconError::Serde(SerdeError::Custom(
                "No value available for map entry".to_string(),
            ))),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Enum access for HOCON enum deserialization
struct HoconEnumAccess {
    variant: String,
    value: Option<NativeValue>,
}

impl HoconEnumAccess {
    fn new(variant: String, value: Option<NativeValue>) -> Self {
        Self { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for HoconEnumAccess {
    type Error = HoconError;
    type Variant = HoconVariantAccess;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(HoconDeserializer::new(NativeValue::String(self.variant)))?;
        Ok((variant, HoconVariantAccess { value: self.value }))
    }
}

/// Variant access for HOCON enum variants
struct HoconVariantAccess {
    value: Option<NativeValue>,
}

impl<'de> de::VariantAccess<'de> for HoconVariantAccess {
    type Error = HoconError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        match self.value {
            None => Ok(()),
            Some(_) => Err(HoconError::Serde(SerdeError::Custom(
                "Expected unit variant, found data".to_string(),
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(HoconDeserializer::new(value)),
            None => Err(HoconError::Serde(SerdeError::Custom(
                "Expected newtype variant data, found unit".to_string(),
            ))),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(NativeValue::List(items)) => visitor.visit_seq(HoconSeqAccess::new(items)),
            // Single value as tuple with one element
            Some(value) => visitor.visit_seq(HoconSeqAccess::new(vec![value])),
            None => Err(HoconError::Serde(SerdeError::Custom(
                "Expected tuple variant data, found unit".to_string(),
            ))),
        }
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(NativeValue::Map(map)) => visitor.visit_map(HoconMapAccess::new(map)),
            Some(_) => Err(HoconError::Serde(SerdeError::Custom(
                "Expected struct variant data (object), found other type".to_string(),
            ))),
            None => Err(HoconError::Serde(SerdeError::Custom(
                "Expected struct variant data, found unit".to_string(),
            ))),
        }
    }
}

/// Convenience function to deserialize HOCON text into a Rust type
///
/// The text is parsed with native value conversion; includes are not
/// available.
pub fn from_str<T>(s: &str) -> Result<T, HoconError>
where
    T: DeserializeOwned,
{
    ConfigFactory::parse_with(s, None, true)?.deserialize()
}

/// Deserializes a single document node
pub fn from_value<T>(value: &HoconValue) -> Result<T, HoconError>
where
    T: DeserializeOwned,
{
    T::deserialize(HoconDeserializer::from_node(value))
}
