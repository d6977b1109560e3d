//! Typed leaves of the container tree.

use std::collections::BTreeMap;

use ndarray::{ArrayD, ArrayViewD};
use serde::{Deserialize, Serialize};

/// Floating-point width used to store array values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Precision {
    /// 32-bit IEEE float.
    F32,
    /// 64-bit IEEE float.
    #[default]
    F64,
}

impl Precision {
    /// Bytes per stored value.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Precision::F32 => 4,
            Precision::F64 => 8,
        }
    }

    /// Round a value to this precision and widen it back.
    #[inline]
    pub fn round(self, value: f64) -> f64 {
        match self {
            Precision::F32 => value as f32 as f64,
            Precision::F64 => value,
        }
    }
}

/// Scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// UTF-8 string.
    Str(String),
    /// Floating-point number.
    Float(f64),
    /// Signed integer.
    Int(i64),
}

impl AttrValue {
    /// The string value, if this is a string attribute.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

/// Attribute table attached to groups and datasets.
pub type Attributes = BTreeMap<String, AttrValue>;

/// N-dimensional array stored at a fixed precision.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// Values stored as `f32`.
    F32(ArrayD<f32>),
    /// Values stored as `f64`.
    F64(ArrayD<f64>),
}

impl ArrayData {
    /// Convert an `f64` array to the given storage precision.
    pub fn from_f64(array: ArrayViewD<'_, f64>, precision: Precision) -> Self {
        match precision {
            Precision::F32 => ArrayData::F32(array.mapv(|v| v as f32)),
            Precision::F64 => ArrayData::F64(array.to_owned()),
        }
    }

    /// Array shape.
    pub fn shape(&self) -> &[usize] {
        match self {
            ArrayData::F32(array) => array.shape(),
            ArrayData::F64(array) => array.shape(),
        }
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Storage precision.
    pub fn precision(&self) -> Precision {
        match self {
            ArrayData::F32(_) => Precision::F32,
            ArrayData::F64(_) => Precision::F64,
        }
    }

    /// Values widened to `f64`.
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            ArrayData::F32(array) => array.mapv(f64::from),
            ArrayData::F64(array) => array.clone(),
        }
    }
}

/// Array leaf with optional field name, compression flag and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    data: ArrayData,
    field: Option<String>,
    compressed: bool,
    attrs: Attributes,
}

impl Dataset {
    /// Create an uncompressed dataset without field name or attributes.
    pub fn new(data: ArrayData) -> Self {
        Self {
            data,
            field: None,
            compressed: false,
            attrs: Attributes::new(),
        }
    }

    /// Name the single field of a record-style dataset.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Whether the payload is deflated on disk.
    pub fn with_compression(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Stored values.
    #[inline]
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Stored values, for in-place modification.
    #[inline]
    pub fn data_mut(&mut self) -> &mut ArrayData {
        &mut self.data
    }

    /// Array shape.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Field name, if any.
    #[inline]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Whether the payload is deflated on disk.
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// All attributes.
    #[inline]
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// Look up an attribute.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub(crate) fn from_parts(
        data: ArrayData,
        field: Option<String>,
        compressed: bool,
        attrs: Attributes,
    ) -> Self {
        Self {
            data,
            field,
            compressed,
            attrs,
        }
    }
}
