//! Node binding used by the bundler plugins.

use napi_derive::napi;
use std::path::Path;

use crate::discovery::discover_components;
use crate::error::ExtendError;
use crate::js_merge::merge_code;
use crate::loader::FsLoader;
use crate::options::ExtendOptions;
use crate::pipeline::Extender;

fn to_napi_error(err: ExtendError) -> napi::Error {
    napi::Error::from_reason(format!("[{}] {}", err.code(), err))
}

fn parse_options(options_json: Option<String>) -> napi::Result<ExtendOptions> {
    match options_json {
        Some(json) => ExtendOptions::from_json(&json).map_err(to_napi_error),
        None => Ok(ExtendOptions::default()),
    }
}

#[napi]
pub fn extend_native(
    source: String,
    filepath: String,
    options_json: Option<String>,
) -> napi::Result<String> {
    let extender = Extender::new(FsLoader, parse_options(options_json)?).map_err(to_napi_error)?;
    extender.extend(&source, &filepath).map_err(to_napi_error)
}

/// `null` for files the include/exclude filter rejects.
#[napi]
pub fn process_native(
    source: String,
    filepath: String,
    options_json: Option<String>,
) -> napi::Result<Option<String>> {
    let extender = Extender::new(FsLoader, parse_options(options_json)?).map_err(to_napi_error)?;
    extender.process(&source, &filepath).map_err(to_napi_error)
}

#[napi]
pub fn merge_code_native(base: String, extended: String) -> napi::Result<String> {
    merge_code(&base, &extended).map_err(to_napi_error)
}

#[napi]
pub fn discover_components_native(
    base_dir: String,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let filter = parse_options(options_json)?.filter().map_err(to_napi_error)?;
    let components = discover_components(Path::new(&base_dir), &filter);
    serde_json::to_value(components).map_err(|e| napi::Error::from_reason(e.to_string()))
}
