//! Field lists and record maps extracted from IDL text.

use mcap2json_core::Record;

use crate::{
    decoder,
    lex::strip_comments,
    parser::{RecordDecl, record_declarations, scan_fields},
    types::normalize_type_name,
};

/// One field of a record layout: normalized type name and field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub ty: String,
    pub name: String,
}

impl FieldDescriptor {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// A record layout in declaration order. Decoding is positional, so order matters.
pub type FieldList = Vec<FieldDescriptor>;

/// Every record declared in one IDL text, keyed by its declared (unqualified) name.
///
/// Keeps declaration order; a later declaration with the same name replaces the
/// earlier one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMap {
    records: Vec<(String, FieldList)>,
}

impl RecordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, fields: FieldList) {
        let name = name.into();
        match self.records.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = fields,
            None => self.records.push((name, fields)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldList> {
        self.records
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// Find the record a normalized field type refers to.
    ///
    /// An exact name match wins. Otherwise the longest record name that the
    /// type ends with is chosen (`pkg_msg_DeviceState` → `DeviceState`, not
    /// `State`); ties go to the earlier declaration.
    pub fn resolve(&self, ty: &str) -> Option<(&str, &FieldList)> {
        if let Some((name, fields)) = self.records.iter().find(|(n, _)| n == ty) {
            return Some((name.as_str(), fields));
        }
        self.records
            .iter()
            .filter(|(name, _)| !name.is_empty() && ty.ends_with(name.as_str()))
            .fold(None::<&(String, FieldList)>, |best, candidate| match best {
                Some(b) if b.0.len() >= candidate.0.len() => Some(b),
                _ => Some(candidate),
            })
            .map(|(name, fields)| (name.as_str(), fields))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|(n, _)| n.as_str())
    }
}

/// Extract the field list of the record named by the last segment of `type_name`.
///
/// `type_name` may be namespaced (`pkg/msg/Name` or `pkg::msg::Name`); only the
/// trailing component is matched against declared record names. Returns an empty
/// list when no declaration matches.
pub fn extract_fields(idl_text: &str, type_name: &str) -> FieldList {
    let text = strip_comments(idl_text);
    let decls = record_declarations(&text);
    find_record_fields(&decls, type_name)
}

/// Build a [`RecordMap`] covering every record declared anywhere in `idl_text`.
pub fn build_record_map(idl_text: &str) -> RecordMap {
    let text = strip_comments(idl_text);
    collect_records(&record_declarations(&text))
}

/// Last path component of a (possibly namespaced) type name.
pub fn record_name_of(type_name: &str) -> &str {
    let tail = type_name.rsplit('/').next().unwrap_or(type_name);
    tail.rsplit("::").next().unwrap_or(tail).trim()
}

fn fields_of(decl: &RecordDecl<'_>) -> FieldList {
    scan_fields(decl.body)
        .into_iter()
        .map(|raw| FieldDescriptor::new(normalize_type_name(raw.ty), raw.name))
        .collect()
}

fn find_record_fields(decls: &[RecordDecl<'_>], type_name: &str) -> FieldList {
    let wanted = record_name_of(type_name);
    match decls.iter().find(|d| d.name == wanted) {
        Some(decl) => fields_of(decl),
        None => {
            tracing::debug!(type_name, record = wanted, "no record declaration found");
            Vec::new()
        }
    }
}

fn collect_records(decls: &[RecordDecl<'_>]) -> RecordMap {
    let mut map = RecordMap::new();
    for decl in decls {
        map.insert(decl.name, fields_of(decl));
    }
    map
}

/// Everything the fallback decoder needs for one schema, parsed once and shared
/// read-only across decode calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdlSchema {
    fields: FieldList,
    records: RecordMap,
}

impl IdlSchema {
    /// Extract the root field list and the record map from one IDL text.
    pub fn parse(type_name: &str, idl_text: &str) -> Self {
        let text = strip_comments(idl_text);
        let decls = record_declarations(&text);
        Self {
            fields: find_record_fields(&decls, type_name),
            records: collect_records(&decls),
        }
    }

    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    pub fn records(&self) -> &RecordMap {
        &self.records
    }

    /// `false` when no declaration matched the type: the schema cannot be
    /// decoded through this path.
    pub fn is_resolved(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Decode one top-level message payload.
    pub fn decode(&self, data: &[u8]) -> Record {
        decoder::decode(data, &self.fields, &self.records)
    }
}
