//! Normalization of `$_FILES`-shaped upload specifications.

use serde_json::{Map, Value};

use crate::core::{Error, Result, UploadedFile, UPLOAD_ERR_OK};

/// A normalized entry: a file, or files nested under form-field keys.
#[derive(Debug)]
pub enum UploadNode {
    File(UploadedFile),
    Nested(Vec<(String, UploadNode)>),
}

impl UploadNode {
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            UploadNode::File(file) => Some(file),
            UploadNode::Nested(_) => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut UploadedFile> {
        match self {
            UploadNode::File(file) => Some(file),
            UploadNode::Nested(_) => None,
        }
    }

    /// Child under `key` of a nested node.
    pub fn get(&self, key: &str) -> Option<&UploadNode> {
        match self {
            UploadNode::File(_) => None,
            UploadNode::Nested(children) => children
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, node)| node),
        }
    }

    /// Number of children; a file counts as one.
    pub fn len(&self) -> usize {
        match self {
            UploadNode::File(_) => 1,
            UploadNode::Nested(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize an upload specification into a tree of [`UploadedFile`]s.
///
/// `files` maps form-field names to either a file spec (an object holding
/// `tmp_name`, `name`, `type`, `size`, `error`) or further nested objects
/// and arrays. A spec whose fields are arrays describes several files keyed
/// like the arrays.
pub fn normalize_files(files: Value) -> Result<Vec<(String, UploadNode)>> {
    match files {
        Value::Object(map) => normalize(map),
        Value::Array(items) => normalize(indexed(items)),
        _ => Err(invalid_spec()),
    }
}

fn normalize(files: Map<String, Value>) -> Result<Vec<(String, UploadNode)>> {
    files
        .into_iter()
        .map(|(key, value)| {
            let spec = match value {
                Value::Object(spec) => spec,
                Value::Array(items) => indexed(items),
                _ => return Err(invalid_spec()),
            };
            let node = if spec.contains_key("tmp_name") {
                build(spec)?
            } else {
                UploadNode::Nested(normalize(spec)?)
            };
            Ok((key, node))
        })
        .collect()
}

fn build(mut spec: Map<String, Value>) -> Result<UploadNode> {
    let Some(Value::Object(_) | Value::Array(_)) = spec.get("tmp_name") else {
        return single(&spec).map(UploadNode::File);
    };

    let tmp_names = as_map(spec.remove("tmp_name"));
    let mut names = as_map(spec.remove("name"));
    let mut types = as_map(spec.remove("type"));
    let mut sizes = as_map(spec.remove("size"));
    let mut errors = as_map(spec.remove("error"));

    let mut nested = Vec::with_capacity(tmp_names.len());
    for (key, tmp_name) in tmp_names {
        let mut file = Map::new();
        file.insert("tmp_name".into(), tmp_name);
        for (field, values) in [
            ("name", &mut names),
            ("type", &mut types),
            ("size", &mut sizes),
            ("error", &mut errors),
        ] {
            if let Some(value) = values.remove(&key) {
                file.insert(field.into(), value);
            }
        }
        nested.push((key, build(file)?));
    }
    Ok(UploadNode::Nested(nested))
}

fn single(spec: &Map<String, Value>) -> Result<UploadedFile> {
    let mut builder = UploadedFile::builder();
    if let Some(name) = string_field(spec, "name")? {
        builder = builder.client_filename(name);
    }
    if let Some(temp_name) = string_field(spec, "tmp_name")? {
        builder = builder.temp_name(temp_name);
    }
    if let Some(media_type) = string_field(spec, "type")? {
        builder = builder.client_media_type(media_type);
    }
    if let Some(size) = integer_field(spec, "size")? {
        builder = builder.size(size);
    }
    let error = integer_field(spec, "error")?.unwrap_or(u64::from(UPLOAD_ERR_OK));
    let error = u8::try_from(error)
        .map_err(|_| Error::InvalidArgument(format!("invalid error status {} provided", error)))?;
    builder.error(error).build()
}

fn string_field<'a>(spec: &'a Map<String, Value>, field: &str) -> Result<Option<&'a str>> {
    match spec.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(Error::InvalidArgument(format!(
            "invalid \"{}\" in files specification; must be a string",
            field
        ))),
    }
}

/// Integer field; numeric strings are accepted.
fn integer_field(spec: &Map<String, Value>, field: &str) -> Result<Option<u64>> {
    let invalid = || {
        Error::InvalidArgument(format!(
            "invalid \"{}\" in files specification; must be an integer",
            field
        ))
    };
    match spec.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number.as_u64().map(Some).ok_or_else(invalid),
        Some(Value::String(value)) => value.trim().parse().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn as_map(value: Option<Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        Some(Value::Array(items)) => indexed(items),
        _ => Map::new(),
    }
}

fn indexed(items: Vec<Value>) -> Map<String, Value> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, value)| (index.to_string(), value))
        .collect()
}

fn invalid_spec() -> Error {
    Error::InvalidArgument("invalid value in files specification".into())
}
