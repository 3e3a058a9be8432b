//! PLY vertex line remapping

use crate::error::ConvertError;
use crate::types::{DEFAULT_VALUE, SourceOrderMap, TARGET_ORDER};
use tracing::debug;

/// Rewrite one ASCII vertex line into PTS column order.
///
/// `line_number` is only used for error reporting. The returned line has
/// exactly seven space separated tokens and no trailing newline.
pub fn remap_vertex(
    line: &str,
    line_number: usize,
    source_order: &SourceOrderMap,
) -> Result<String, ConvertError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut out = Vec::with_capacity(TARGET_ORDER.len());

    for target in TARGET_ORDER {
        let column = source_order.get(target);
        debug!(property = %target, ?column, "Property index lookup");

        match column {
            None => out.push(DEFAULT_VALUE),
            Some(index) => {
                let token = tokens.get(index).ok_or(ConvertError::ShortVertexLine {
                    line: line_number,
                    index,
                    tokens: tokens.len(),
                })?;
                out.push(*token);
            }
        }
    }

    Ok(out.join(" "))
}
