use std::fmt::Debug;
use std::ops::Add;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QuadtreeError, Result};

/// Coordinate type of a tree. One tree uses one scalar type throughout.
///
/// Only floating point types qualify: children must quarter their parent
/// exactly, including for odd extents. Integer coordinates convert losslessly
/// into `f64`.
pub trait Scalar: Copy + PartialOrd + Add<Output = Self> + Debug {
    /// Exact half of the value.
    fn half(self) -> Self;
    /// Largest integral value not greater than `self`.
    fn floor(self) -> Self;
}

macro_rules! impl_scalar_float {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            #[inline]
            fn half(self) -> Self {
                self / 2.0
            }

            #[inline]
            fn floor(self) -> Self {
                <$t>::floor(self)
            }
        }
    )*};
}

impl_scalar_float!(f32, f64);

/// Axis-aligned rectangle. `y` grows downward.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T: Scalar> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> T {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> T {
        self.y + self.height
    }
}

impl<T: Scalar + DeserializeOwned> Rect<T> {
    /// Parses and validates a rectangle from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| QuadtreeError::invalid(format!("not valid JSON: {e}")))?;
        Self::try_from(&value)
    }
}

impl<T: Scalar + DeserializeOwned> TryFrom<&Value> for Rect<T> {
    type Error = QuadtreeError;

    fn try_from(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| QuadtreeError::invalid(format!("expected a rect object, got {value}")))?;
        Ok(Self {
            x: field(object, "x")?,
            y: field(object, "y")?,
            width: field(object, "width")?,
            height: field(object, "height")?,
        })
    }
}

fn field<T: DeserializeOwned>(object: &Map<String, Value>, name: &str) -> Result<T> {
    let value = object
        .get(name)
        .ok_or_else(|| QuadtreeError::invalid(format!("missing field `{name}`")))?;
    if !value.is_number() {
        return Err(QuadtreeError::invalid(format!(
            "field `{name}` is not a number: {value}"
        )));
    }
    T::deserialize(value).map_err(|e| QuadtreeError::invalid(format!("field `{name}`: {e}")))
}
