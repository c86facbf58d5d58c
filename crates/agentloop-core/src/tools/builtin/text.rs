//! String reversal tool

use unicode_segmentation::UnicodeSegmentation;

use crate::tools::descriptor::{ParameterType, ToolDescriptor};
use crate::tools::error::{ToolError, ToolFailure};

/// Name the reversal tool is registered under
pub const REVERSE_TOOL: &str = "reverse_string";

/// Reverse `input` by user-perceived characters (extended grapheme clusters)
///
/// Combining marks and multi-codepoint emoji stay attached to their base.
pub fn reverse(input: &str) -> String {
    input.graphemes(true).rev().collect()
}

/// Descriptor for the reversal tool
pub fn reverse_string_tool() -> Result<ToolDescriptor, ToolError> {
    ToolDescriptor::builder(REVERSE_TOOL)
        .description("Reverses a string. Input should be a single string.")
        .required("input", ParameterType::String, "The string to reverse")
        .handler_fn(|args| {
            args.get_str("input")
                .map(reverse)
                .ok_or_else(|| ToolFailure::new("parameter 'input' must be a string"))
        })
        .build()
}
