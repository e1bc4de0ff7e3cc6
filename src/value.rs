//! In-memory document tree
//!
//! A parsed document is a tree of [`HoconValue`] nodes. Each node holds an
//! ordered list of [`HoconElement`]s: literals, arrays, objects and
//! substitution placeholders. Juxtaposed elements concatenate, which is how
//! `a = hello world` becomes one string and `a = [1] [2]` one array.

use crate::error::CoercionError;
use crate::native::{NativeMap, NativeValue};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Typed content of a literal
///
/// Without native mode every literal is a `String`. In native mode unquoted
/// integers, floats and the words `true/false/on/off` are converted while
/// tokenizing.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    /// Converts unquoted text the way native mode does
    pub fn from_unquoted(text: &str) -> Self {
        match text {
            "true" | "on" => return Scalar::Boolean(true),
            "false" | "off" => return Scalar::Boolean(false),
            _ => {}
        }

        if is_integer_text(text) {
            // Out of range integers keep their text
            return text
                .parse::<i64>()
                .map(Scalar::Integer)
                .unwrap_or_else(|_| Scalar::String(text.to_string()));
        }

        if is_float_text(text) {
            if let Ok(value) = text.parse::<f64>() {
                return Scalar::Float(value);
            }
        }

        Scalar::String(text.to_string())
    }

    fn to_native(&self) -> NativeValue {
        match self {
            Scalar::String(s) => NativeValue::String(s.clone()),
            Scalar::Boolean(b) => NativeValue::Boolean(*b),
            Scalar::Integer(i) => NativeValue::Integer(*i),
            Scalar::Float(f) => NativeValue::Float(*f),
        }
    }
}

/// `-?\d+`
fn is_integer_text(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `-?\d+\.\d+`
fn is_float_text(text: &str) -> bool {
    match text.split_once('.') {
        Some((whole, fraction)) => {
            is_integer_text(whole)
                && !fraction.is_empty()
                && fraction.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// A terminal scalar element
///
/// `text` is the source text after escape processing; it is what typed
/// getters and string concatenation read. `value` is the typed form.
#[derive(Debug, Clone, PartialEq)]
pub struct HoconLiteral {
    pub text: String,
    pub value: Scalar,
}

impl HoconLiteral {
    /// Creates a plain string literal
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: Scalar::String(text.clone()),
            text,
        }
    }

    /// Creates a literal whose typed value was inferred from unquoted text
    pub fn native(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: Scalar::from_unquoted(&text),
            text,
        }
    }
}

impl fmt::Display for HoconLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Ordered array of value nodes
pub type HoconArray = Vec<HoconValue>;

/// Ordered mapping from key to value node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoconObject {
    fields: IndexMap<String, HoconValue>,
}

impl HoconObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get_key(&self, key: &str) -> Option<&HoconValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the child node for `key`, inserting an empty one if needed
    pub fn get_or_create_key(&mut self, key: &str) -> &mut HoconValue {
        self.fields.entry(key.to_string()).or_default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: HoconValue) -> Option<HoconValue> {
        self.fields.insert(key.into(), value)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, HoconValue> {
        self.fields.iter()
    }

    pub(crate) fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, HoconValue> {
        self.fields.values_mut()
    }

    /// Fills in keys of `other` that are missing here
    ///
    /// Keys present on both sides are merged recursively when both values
    /// are objects; otherwise the value already in `self` is kept.
    pub fn merge(&mut self, other: HoconObject) {
        for (key, incoming) in other.fields {
            match self.fields.get_mut(&key) {
                None => {
                    self.fields.insert(key, incoming);
                }
                Some(existing) => {
                    if let (Some(HoconElement::Object(target)), true) =
                        (existing.elements.first_mut(), incoming.is_object())
                    {
                        if let Some(HoconElement::Object(source)) =
                            incoming.elements.into_iter().next()
                        {
                            target.merge(source);
                        }
                    }
                }
            }
        }
    }

    fn to_native(&self) -> NativeMap {
        self.fields
            .iter()
            .map(|(key, value)| (key.clone(), value.to_native()))
            .collect()
    }
}

/// A `${path}` placeholder
///
/// `resolved` stays empty until the resolution pass runs; every query made
/// before that fails with [`CoercionError::Unresolved`]. Resolved targets are
/// shared: every placeholder naming the same path points at one node.
#[derive(Debug, Clone, PartialEq)]
pub struct HoconSubstitution {
    pub path: String,
    pub resolved: Option<Arc<HoconValue>>,
}

impl HoconSubstitution {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            resolved: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Returns the node this placeholder points at
    pub fn target(&self) -> Result<&HoconValue, CoercionError> {
        self.resolved
            .as_deref()
            .ok_or_else(|| CoercionError::Unresolved {
                path: self.path.clone(),
            })
    }
}

// Targets can chain through each other (`a = x${b}`, `b = y${c}`, ...), so
// the last owner unwinds the chain with a work list instead of recursing.
impl Drop for HoconSubstitution {
    fn drop(&mut self) {
        let mut pending: Vec<Arc<HoconValue>> = self.resolved.take().into_iter().collect();
        while let Some(target) = pending.pop() {
            if let Some(mut value) = Arc::into_inner(target) {
                value.take_targets(&mut pending);
            }
        }
    }
}

/// One piece of a value node
#[derive(Debug, Clone, PartialEq)]
pub enum HoconElement {
    Literal(HoconLiteral),
    Array(HoconArray),
    Object(HoconObject),
    Substitution(HoconSubstitution),
}

impl HoconElement {
    /// Short name of the variant for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            HoconElement::Literal(_) => "string",
            HoconElement::Array(_) => "array",
            HoconElement::Object(_) => "object",
            HoconElement::Substitution(sub) => match &sub.resolved {
                Some(target) => target.kind_name(),
                None => "unresolved substitution",
            },
        }
    }

    pub fn is_string(&self) -> bool {
        match self {
            HoconElement::Literal(_) => true,
            HoconElement::Substitution(sub) => sub.target().is_ok_and(HoconValue::is_string),
            HoconElement::Array(_) | HoconElement::Object(_) => false,
        }
    }

    pub fn is_array(&self) -> bool {
        match self {
            HoconElement::Array(_) => true,
            HoconElement::Substitution(sub) => sub.target().is_ok_and(HoconValue::is_array),
            HoconElement::Literal(_) | HoconElement::Object(_) => false,
        }
    }

    pub fn is_object(&self) -> bool {
        self.as_object().is_some()
    }

    /// Returns the object this element is or resolves to
    pub fn as_object(&self) -> Option<&HoconObject> {
        match self {
            HoconElement::Object(obj) => Some(obj),
            HoconElement::Substitution(sub) => sub.target().ok()?.get_object(),
            HoconElement::Literal(_) | HoconElement::Array(_) => None,
        }
    }

    pub fn get_string(&self) -> Result<String, CoercionError> {
        match self {
            HoconElement::Literal(lit) => Ok(lit.text.clone()),
            HoconElement::Substitution(sub) => sub.target()?.get_string(),
            other => Err(CoercionError::WrongType {
                expected: "string",
                found: other.kind_name(),
            }),
        }
    }

    /// Returns the array slots of this element
    pub fn get_array(&self) -> Result<Vec<&HoconValue>, CoercionError> {
        match self {
            HoconElement::Array(items) => Ok(items.iter().collect()),
            HoconElement::Substitution(sub) => sub.target()?.get_array(),
            other => Err(CoercionError::WrongType {
                expected: "array",
                found: other.kind_name(),
            }),
        }
    }

    fn to_native(&self) -> NativeValue {
        match self {
            HoconElement::Literal(lit) => lit.value.to_native(),
            HoconElement::Array(items) => {
                NativeValue::List(items.iter().map(HoconValue::to_native).collect())
            }
            HoconElement::Object(obj) => NativeValue::Map(obj.to_native()),
            HoconElement::Substitution(sub) => match &sub.resolved {
                Some(target) => target.to_native(),
                None => NativeValue::Null,
            },
        }
    }
}

/// The generic cell of the document tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoconValue {
    elements: SmallVec<[HoconElement; 1]>,
}

impl HoconValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node holding a single element
    pub fn from_element(element: HoconElement) -> Self {
        let mut value = Self::new();
        value.append_value(element);
        value
    }

    pub fn elements(&self) -> &[HoconElement] {
        &self.elements
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [HoconElement] {
        &mut self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Detaches the resolved targets of every placeholder in this node
    fn take_targets(&mut self, targets: &mut Vec<Arc<HoconValue>>) {
        for element in self.elements.iter_mut() {
            match element {
                HoconElement::Substitution(sub) => targets.extend(sub.resolved.take()),
                HoconElement::Array(items) => {
                    for item in items {
                        item.take_targets(targets);
                    }
                }
                HoconElement::Object(obj) => {
                    for child in obj.values_mut() {
                        child.take_targets(targets);
                    }
                }
                HoconElement::Literal(_) => {}
            }
        }
    }

    pub fn append_value(&mut self, element: HoconElement) -> &mut Self {
        self.elements.push(element);
        self
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Replaces every element with `element`
    pub fn new_value(&mut self, element: HoconElement) {
        self.clear();
        self.append_value(element);
    }

    /// Short name of the node kind for error messages
    pub fn kind_name(&self) -> &'static str {
        match self.elements.as_slice() {
            [] => "empty value",
            [single] => single.kind_name(),
            _ if self.is_string() => "string",
            _ if self.is_array() => "array",
            _ => "mixed value",
        }
    }

    /// Returns the object held by the first element, if any
    pub fn get_object(&self) -> Option<&HoconObject> {
        self.elements.first()?.as_object()
    }

    /// Returns the object held directly by the first element, replacing
    /// whatever the node held if it is not one
    pub(crate) fn object_mut_or_insert(&mut self) -> &mut HoconObject {
        if !matches!(self.elements.first(), Some(HoconElement::Object(_))) {
            self.new_value(HoconElement::Object(HoconObject::new()));
        }
        match self.elements.first_mut() {
            Some(HoconElement::Object(obj)) => obj,
            _ => unreachable!(),
        }
    }

    pub fn is_object(&self) -> bool {
        self.get_object().is_some()
    }

    /// Removes and returns the object held by the first element
    pub(crate) fn take_object(self) -> Option<HoconObject> {
        match self.elements.into_iter().next() {
            Some(HoconElement::Object(obj)) => Some(obj),
            _ => None,
        }
    }

    /// A node is string-typed when all its elements are
    pub fn is_string(&self) -> bool {
        self.elements.iter().all(HoconElement::is_string)
    }

    /// A node is array-typed when it has elements and all of them flatten into arrays
    pub fn is_array(&self) -> bool {
        !self.elements.is_empty() && self.elements.iter().all(HoconElement::is_array)
    }

    /// Looks up a direct child of the object this node holds
    pub fn get_child_object(&self, key: &str) -> Option<&HoconValue> {
        self.get_object()?.get_key(key)
    }

    /// Concatenates the text of every element
    pub fn concat(&self) -> Result<String, CoercionError> {
        self.elements
            .iter()
            .map(HoconElement::get_string)
            .collect::<Result<Vec<_>, _>>()
            .map(|parts| parts.concat())
    }

    pub fn get_string(&self) -> Result<String, CoercionError> {
        if !self.is_string() {
            // Surface an unresolved placeholder instead of a type mismatch
            if let Some(HoconElement::Substitution(sub)) =
                self.elements.iter().find(|e| matches!(e, HoconElement::Substitution(s) if !s.is_resolved()))
            {
                sub.target()?;
            }
            return Err(CoercionError::WrongType {
                expected: "string",
                found: self.kind_name(),
            });
        }
        self.concat()
    }

    pub fn get_bool(&self) -> Result<bool, CoercionError> {
        let text = self.get_string()?;
        match text.as_str() {
            "on" | "true" => Ok(true),
            "off" | "false" => Ok(false),
            _ => Err(CoercionError::InvalidBoolean { value: text }),
        }
    }

    pub fn get_int(&self) -> Result<i64, CoercionError> {
        let text = self.get_string()?;
        text.trim()
            .parse::<i64>()
            .map_err(|_| CoercionError::InvalidNumber {
                target: "int",
                value: text,
            })
    }

    pub fn get_float(&self) -> Result<f64, CoercionError> {
        let text = self.get_string()?;
        text.trim()
            .parse::<f64>()
            .map_err(|_| CoercionError::InvalidNumber {
                target: "float",
                value: text,
            })
    }

    /// Flattens every array element into one list of slots
    pub fn get_array(&self) -> Result<Vec<&HoconValue>, CoercionError> {
        if !self.is_array() {
            return Err(CoercionError::WrongType {
                expected: "array",
                found: self.kind_name(),
            });
        }
        let mut items = Vec::new();
        for element in &self.elements {
            items.extend(element.get_array()?);
        }
        Ok(items)
    }

    pub fn get_string_list(&self) -> Result<Vec<String>, CoercionError> {
        self.get_array()?.into_iter().map(HoconValue::get_string).collect()
    }

    pub fn get_bool_list(&self) -> Result<Vec<bool>, CoercionError> {
        self.get_array()?.into_iter().map(HoconValue::get_bool).collect()
    }

    pub fn get_int_list(&self) -> Result<Vec<i64>, CoercionError> {
        self.get_array()?.into_iter().map(HoconValue::get_int).collect()
    }

    pub fn get_float_list(&self) -> Result<Vec<f64>, CoercionError> {
        self.get_array()?.into_iter().map(HoconValue::get_float).collect()
    }

    /// Unwraps the node into plain data
    ///
    /// A single element becomes its own native form. Several string
    /// elements concatenate into one string, several arrays into one list.
    /// Anything else becomes a list of the native form of each element.
    pub fn to_native(&self) -> NativeValue {
        match self.elements.as_slice() {
            [] => NativeValue::List(Vec::new()),
            [single] => single.to_native(),
            _ if self.is_string() => match self.concat() {
                Ok(text) => NativeValue::String(text),
                Err(_) => NativeValue::Null,
            },
            _ if self.is_array() => match self.get_array() {
                Ok(items) => NativeValue::List(items.into_iter().map(HoconValue::to_native).collect()),
                Err(_) => NativeValue::Null,
            },
            elements => NativeValue::List(elements.iter().map(HoconElement::to_native).collect()),
        }
    }
}

impl fmt::Display for HoconValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_string() {
            if let Ok(text) = self.concat() {
                return f.write_str(&text);
            }
        }
        write!(f, "{}", self.to_native())
    }
}

/// The result of parsing one document
///
/// `substitutions` lists every placeholder the document declared, in order,
/// together with the node it resolved to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigRoot {
    pub value: HoconValue,
    pub substitutions: Vec<HoconSubstitution>,
}

impl ConfigRoot {
    pub fn new(value: HoconValue, substitutions: Vec<HoconSubstitution>) -> Self {
        Self {
            value,
            substitutions,
        }
    }
}
