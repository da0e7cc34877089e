#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use el_cfg as cfg;
pub use el_codec as codec;
pub use el_utils as utils;
