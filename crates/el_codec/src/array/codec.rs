use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use super::nd_array::row_major_offset;
use super::{NdArray, Odometer};
use crate::codec::{IS_NULL_ATTRIBUTE, PersistContext};
use crate::error::CodecError;
use crate::node::{Node, parse_or};
use crate::path::TypePath;
use crate::registry::{FromType, TypeTraitArray};

const RANK_ATTRIBUTE: &str = "Rank";
const DIMENSIONS_NODE: &str = "Dimensions";
const BOUNDS_ATTRIBUTE: &str = "Bounds";
const ELEMENT_NODE: &str = "Element";
const INDEX_ATTRIBUTE: &str = "Index";
const DATA_NODE: &str = "Data";

const MAX_RANK: usize = 64;

fn join(values: &[usize]) -> String {
    let mut joined = String::new();
    for (at, value) in values.iter().enumerate() {
        if at > 0 {
            joined.push(',');
        }
        joined.push_str(&value.to_string());
    }
    joined
}

// Comma separated integers. Unparsable parts read as zero, an empty string
// is an empty list.
fn split(text: &str) -> Vec<usize> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(|part| parse_or(part, 0)).collect()
}

fn save_array<T: TypePath>(value: &dyn Any, name: &str, cx: &PersistContext<'_>) -> Result<Node, CodecError> {
    let array = crate::registry::downcast_value::<NdArray<T>>(value)?;

    let mut dimensions = Node::new(DIMENSIONS_NODE).with_attribute(BOUNDS_ATTRIBUTE, join(array.shape()));
    for (index, cell) in array.indexed_iter() {
        let element = Node::new(ELEMENT_NODE)
            .with_attribute(INDEX_ATTRIBUTE, join(&index))
            .with_child(cx.save(cell, DATA_NODE)?);
        dimensions.push(element);
    }

    Ok(Node::new(name)
        .with_attribute(RANK_ATTRIBUTE, array.rank())
        .with_child(dimensions))
}

fn load_array<T: TypePath>(node: &Node, cx: &PersistContext<'_>) -> Result<Box<dyn Any>, CodecError> {
    read_array::<T>(node, cx).map(crate::registry::box_value)
}

fn read_array<T: TypePath>(node: &Node, cx: &PersistContext<'_>) -> Result<NdArray<T>, CodecError> {
    if node.attribute_bool(IS_NULL_ATTRIBUTE, false) {
        log::warn!(
            "`{}` is marked null but `{}` is not nullable, loading an empty array",
            node.name(),
            <NdArray<T>>::type_path()
        );
        return Ok(NdArray::default());
    }
    if !node.has_attribute(RANK_ATTRIBUTE) {
        return Ok(NdArray::default());
    }

    let rank: usize = node.attribute_parsed(RANK_ATTRIBUTE, 0);
    if rank > MAX_RANK {
        return Err(CodecError::InvalidValue {
            type_path: <NdArray<T>>::type_path().into(),
            value: rank.to_string(),
        });
    }
    let dimensions = node.child(DIMENSIONS_NODE);
    let mut shape = split(dimensions.map_or("", |dims| dims.attribute_or(BOUNDS_ATTRIBUTE, "")));
    if shape.len() != rank {
        log::warn!(
            "`{}` has rank {rank} but {} bounds, missing bounds read as zero",
            node.name(),
            shape.len()
        );
        shape.resize(rank, 0);
    }

    // A written array has one `Element` per cell, so the document bounds
    // what may be allocated.
    let written = dimensions.map_or(0, |dims| dims.children_named(ELEMENT_NODE).count());
    let cells = shape
        .iter()
        .try_fold(1_usize, |acc, &dim| acc.checked_mul(dim))
        .filter(|&cells| cells <= written)
        .ok_or_else(|| CodecError::InvalidValue {
            type_path: <NdArray<T>>::type_path().into(),
            value: join(&shape),
        })?;

    let mut slots: Vec<Option<T>> = Vec::new();
    slots.resize_with(cells, || None);

    let elements = dimensions
        .into_iter()
        .flat_map(|dims| dims.children_named(ELEMENT_NODE));
    for element in elements {
        let index = split(element.attribute_or(INDEX_ATTRIBUTE, ""));
        let Some(offset) = row_major_offset(&shape, &index) else {
            log::warn!(
                "`{}` skips cell [{}] outside of shape [{}]",
                node.name(),
                join(&index),
                join(&shape)
            );
            continue;
        };
        let Some(data) = element.child(DATA_NODE).or_else(|| element.first_child()) else {
            continue;
        };
        slots[offset] = Some(cx.load::<T>(data)?);
    }

    let mut data = Vec::with_capacity(cells);
    for (index, slot) in Odometer::new(&shape).zip(slots) {
        match slot {
            Some(value) => data.push(value),
            None => data.push(default_cell::<T>(&index, cx)?),
        }
    }

    NdArray::from_shape_vec(shape, data).ok_or_else(|| CodecError::custom("array shape does not match its cell count"))
}

fn default_cell<T: TypePath>(index: &[usize], cx: &PersistContext<'_>) -> Result<T, CodecError> {
    cx.registry()
        .create_default::<T>()
        .ok_or_else(|| CodecError::MissingCell {
            element: T::type_path().into(),
            index: join(index),
        })
}

impl<T: TypePath> FromType<NdArray<T>> for TypeTraitArray {
    fn from_type() -> Self {
        TypeTraitArray::new(save_array::<T>, load_array::<T>)
    }
}
