//! Payload Extraction
//!
//! When the JSON endpoint is rendered through the device's HTTP layer (and in
//! particular when read back out of a browser page), the JSON document arrives
//! wrapped in a fixed pair of markup markers. This module strips them.

/// Literal prefix the device emits before the JSON body.
const WRAPPER_PREFIX: &str = "<body><pre>";

/// Literal suffix the device emits after the JSON body.
const WRAPPER_SUFFIX: &str = "</pre><div class=\"json-formatter-container\"></div></body>";

/// Recover the embedded JSON text from a raw response body.
///
/// Pure and total: input without the wrapper markers is returned unchanged.
/// The markers are an optimization, not a requirement; well-formedness of the
/// result is validated by the JSON decoder, not here.
pub fn extract_json(body: &str) -> String {
    body.replace(WRAPPER_PREFIX, "")
        .replace(WRAPPER_SUFFIX, "")
}
