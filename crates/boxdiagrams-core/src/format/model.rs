//! The format model: message schemas and the surrogate table.
//!
//! A [`FormatModel`] describes every persisted type: its named fields and
//! their kinds, the fixed subtype tags of polymorphic types, and which
//! surrogate record stands in for each native value type. Building one walks
//! and validates the whole schema, so hosts build it once and share it.
//!
//! Every native value crosses the format boundary through
//! [`FormatModel::to_record`] and [`FormatModel::from_record`], which refuse
//! any record type the table does not map to that native type.

use super::surrogate::{
    BoxRecord, ColorRecord, FontRecord, PointRecord, Surrogate, TextFormatRecord,
};
use crate::error::ModelError;
use crate::style::{Font, Style, TextFormat};
use kurbo::{Point, Rect};
use peniko::color::Rgba8;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

/// Limits applied while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Upper bound on the payload size.
    pub max_payload_bytes: usize,
    /// Upper bound on nested container depth.
    pub max_nesting: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 64 * 1024 * 1024,
            max_nesting: 16,
        }
    }
}

/// Value type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    UInt32,
    Bool,
    Float,
    Double,
    String,
    /// A nested message, by schema name.
    Message(&'static str),
    /// A native value type written through its registered surrogate.
    Native(TypeId, &'static str),
}

impl FieldKind {
    /// Shorthand for a native field of type `N`.
    pub fn native<N: Any>() -> Self {
        FieldKind::Native(TypeId::of::<N>(), type_name::<N>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    Required,
    /// May be absent. Absent means "not set", never a default value.
    Optional,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub label: FieldLabel,
}

/// Field layout of one message.
#[derive(Debug, Clone)]
pub struct MessageSchema {
    name: &'static str,
    fields: Vec<FieldDef>,
    subtypes: Vec<(u32, &'static str)>,
}

impl MessageSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            subtypes: Vec::new(),
        }
    }

    fn with(mut self, name: &'static str, kind: FieldKind, label: FieldLabel) -> Self {
        self.fields.push(FieldDef { name, kind, label });
        self
    }

    pub fn field(self, name: &'static str, kind: FieldKind) -> Self {
        self.with(name, kind, FieldLabel::Required)
    }

    pub fn optional(self, name: &'static str, kind: FieldKind) -> Self {
        self.with(name, kind, FieldLabel::Optional)
    }

    pub fn repeated(self, name: &'static str, kind: FieldKind) -> Self {
        self.with(name, kind, FieldLabel::Repeated)
    }

    /// Register the message `target` as a subtype written under `tag`.
    pub fn subtype(mut self, tag: u32, target: &'static str) -> Self {
        self.subtypes.push((tag, target));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Message name registered under subtype `tag`.
    pub fn subtype_name(&self, tag: u32) -> Option<&'static str> {
        self.subtypes
            .iter()
            .find_map(|&(t, target)| (t == tag).then_some(target))
    }

    fn validate(&self) -> Result<(), ModelError> {
        for (i, def) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == def.name) {
                return Err(ModelError::DuplicateField {
                    message: self.name,
                    field: def.name,
                });
            }
        }
        for (i, &(tag, _)) in self.subtypes.iter().enumerate() {
            if self.subtypes[..i].iter().any(|&(t, _)| t == tag) {
                return Err(ModelError::DuplicateSubtype {
                    message: self.name,
                    tag,
                });
            }
        }
        Ok(())
    }
}

/// One row of the surrogate table.
#[derive(Debug, Clone)]
pub struct SurrogateEntry {
    pub native_name: &'static str,
    pub record_name: &'static str,
    record_type: TypeId,
}

/// Schema name of a record type, without its module path.
fn short_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Collects schemas and surrogates before validation.
#[derive(Default)]
struct ModelBuilder {
    messages: Vec<MessageSchema>,
    surrogates: Vec<(TypeId, SurrogateEntry)>,
}

impl ModelBuilder {
    fn message(&mut self, schema: MessageSchema) -> &mut Self {
        self.messages.push(schema);
        self
    }

    /// Register `S` as the stand-in for `S::Native`, with `fields` as the
    /// record's layout.
    fn surrogate<S: Surrogate>(
        &mut self,
        fields: impl FnOnce(MessageSchema) -> MessageSchema,
    ) -> &mut Self {
        let record_name = short_name::<S>();
        self.messages.push(fields(MessageSchema::new(record_name)));
        self.surrogates.push((
            TypeId::of::<S::Native>(),
            SurrogateEntry {
                native_name: type_name::<S::Native>(),
                record_name,
                record_type: TypeId::of::<S>(),
            },
        ));
        self
    }

    fn build(self, config: FormatConfig) -> Result<FormatModel, ModelError> {
        let mut messages = HashMap::with_capacity(self.messages.len());
        for schema in self.messages {
            schema.validate()?;
            let name = schema.name;
            if messages.insert(name, schema).is_some() {
                return Err(ModelError::DuplicateMessage(name));
            }
        }

        let mut surrogates = HashMap::with_capacity(self.surrogates.len());
        for (type_id, entry) in self.surrogates {
            let native_name = entry.native_name;
            if surrogates.insert(type_id, entry).is_some() {
                return Err(ModelError::DuplicateSurrogate(native_name));
            }
        }

        for schema in messages.values() {
            let fields = schema.fields.iter().map(|def| (def.name, def.kind));
            let subtypes = schema
                .subtypes
                .iter()
                .map(|&(_, target)| ("subtype", FieldKind::Message(target)));
            for (field, kind) in fields.chain(subtypes) {
                let resolved = match kind {
                    FieldKind::Message(target) => {
                        messages.contains_key(target).then_some(()).ok_or(target)
                    }
                    FieldKind::Native(type_id, native) => {
                        surrogates.contains_key(&type_id).then_some(()).ok_or(native)
                    }
                    _ => Ok(()),
                };
                if let Err(target) = resolved {
                    return Err(ModelError::UnknownReference {
                        message: schema.name,
                        field,
                        target,
                    });
                }
            }
        }

        Ok(FormatModel {
            config,
            messages,
            surrogates,
        })
    }
}

/// Immutable description of the document file format.
#[derive(Debug)]
pub struct FormatModel {
    config: FormatConfig,
    messages: HashMap<&'static str, MessageSchema>,
    surrogates: HashMap<TypeId, SurrogateEntry>,
}

impl FormatModel {
    /// Build and validate the document schema.
    pub fn new(config: FormatConfig) -> Result<Self, ModelError> {
        let mut builder = ModelBuilder::default();
        builder
            .surrogate::<ColorRecord>(|s| s.field("argb", FieldKind::UInt32))
            .surrogate::<FontRecord>(|s| {
                s.field("family", FieldKind::String)
                    .field("size_in_points", FieldKind::Float)
                    .field("style", FieldKind::UInt32)
            })
            .surrogate::<TextFormatRecord>(|s| {
                s.field("alignment", FieldKind::UInt32)
                    .field("line_alignment", FieldKind::UInt32)
                    .field("flags", FieldKind::UInt32)
            })
            .surrogate::<PointRecord>(|s| {
                s.field("x", FieldKind::Double).field("y", FieldKind::Double)
            })
            .surrogate::<BoxRecord>(|s| {
                s.field("x1", FieldKind::Double)
                    .field("x2", FieldKind::Double)
                    .field("y1", FieldKind::Double)
                    .field("y2", FieldKind::Double)
            })
            .message(
                MessageSchema::new("Document")
                    .repeated("styles", FieldKind::Message("DrawStyle"))
                    .repeated("shapes", FieldKind::Message("Shape")),
            )
            .message(
                MessageSchema::new("DrawStyle")
                    .field("subtype", FieldKind::UInt32)
                    .field("line_color", FieldKind::native::<Rgba8>())
                    .field("line_width", FieldKind::Float)
                    .field("line_style", FieldKind::UInt32)
                    .field("fill_color", FieldKind::native::<Rgba8>())
                    .field("text_color", FieldKind::native::<Rgba8>())
                    .optional("font", FieldKind::native::<Font>())
                    .subtype(Style::DIAGRAM_TAG, "DiagramDrawStyle"),
            )
            .message(MessageSchema::new("DiagramDrawStyle").field("name", FieldKind::String))
            .message(
                MessageSchema::new("Shape")
                    .optional("TextBox", FieldKind::Message("TextBox"))
                    .optional("Marker", FieldKind::Message("Marker"))
                    .optional("LineOrArrow", FieldKind::Message("LineOrArrow")),
            )
            .message(
                MessageSchema::new("TextBox")
                    .field("bbox", FieldKind::native::<Rect>())
                    .field("text", FieldKind::String)
                    .optional("style_name", FieldKind::String)
                    .optional("text_format", FieldKind::native::<TextFormat>()),
            )
            .message(
                MessageSchema::new("Marker")
                    .field("center", FieldKind::native::<Point>())
                    .field("radius", FieldKind::Double)
                    .optional("style_name", FieldKind::String),
            )
            .message(
                MessageSchema::new("LineOrArrow")
                    .repeated("points", FieldKind::native::<Point>())
                    .field("from_arrow", FieldKind::Bool)
                    .field("to_arrow", FieldKind::Bool)
                    .optional("style_name", FieldKind::String),
            );

        let model = builder.build(config)?;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("document format schema:\n{}", model.schema_text());
        }
        Ok(model)
    }

    /// Process-wide model with the default configuration, built on first use.
    pub fn shared() -> Result<&'static FormatModel, ModelError> {
        static SHARED: OnceLock<Result<FormatModel, ModelError>> = OnceLock::new();
        SHARED
            .get_or_init(|| FormatModel::new(FormatConfig::default()))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn message(&self, name: &str) -> Option<&MessageSchema> {
        self.messages.get(name)
    }

    /// Surrogate registered for native type `N`.
    pub fn surrogate_for<N: Any>(&self) -> Option<&SurrogateEntry> {
        self.surrogates.get(&TypeId::of::<N>())
    }

    fn check_surrogate<S: Surrogate>(&self) -> Result<(), ModelError> {
        match self.surrogate_for::<S::Native>() {
            Some(entry) if entry.record_type == TypeId::of::<S>() => Ok(()),
            _ => Err(ModelError::UnregisteredSurrogate {
                native: type_name::<S::Native>(),
                record: type_name::<S>(),
            }),
        }
    }

    /// Convert `native` to its record, if `S` is the registered surrogate.
    pub fn to_record<S: Surrogate>(&self, native: &S::Native) -> Result<S, ModelError> {
        self.check_surrogate::<S>()?;
        Ok(S::to_surrogate(native))
    }

    /// Rebuild the native value from `record`, if `S` is the registered
    /// surrogate.
    pub fn from_record<S: Surrogate>(&self, record: S) -> Result<S::Native, ModelError> {
        self.check_surrogate::<S>()?;
        Ok(record.from_surrogate())
    }

    /// Render the schema as text, messages sorted by name.
    pub fn schema_text(&self) -> String {
        let mut names: Vec<_> = self.messages.keys().copied().collect();
        names.sort_unstable();
        let mut out = String::new();
        for name in names {
            let schema = &self.messages[name];
            let _ = writeln!(out, "message {name} {{");
            for def in &schema.fields {
                let label = match def.label {
                    FieldLabel::Required => "",
                    FieldLabel::Optional => "optional ",
                    FieldLabel::Repeated => "repeated ",
                };
                let _ = writeln!(out, "  {label}{} {};", self.type_label(def.kind), def.name);
            }
            for (tag, target) in &schema.subtypes {
                let _ = writeln!(out, "  subtype {tag} = {target};");
            }
            out.push_str("}\n");
        }
        out
    }

    fn type_label(&self, kind: FieldKind) -> &'static str {
        match kind {
            FieldKind::UInt32 => "uint32",
            FieldKind::Bool => "bool",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::String => "string",
            FieldKind::Message(name) => name,
            FieldKind::Native(type_id, native) => self
                .surrogates
                .get(&type_id)
                .map_or(native, |entry| entry.record_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_model_is_valid() {
        let model = FormatModel::new(FormatConfig::default()).unwrap();
        assert!(model.message("Document").is_some());
        assert!(model.surrogate_for::<Rgba8>().is_some());
        assert!(model.surrogate_for::<Font>().is_some());
        assert!(model.surrogate_for::<TextFormat>().is_some());
        assert!(model.surrogate_for::<Point>().is_some());
        assert!(model.surrogate_for::<Rect>().is_some());
        assert!(model.surrogate_for::<String>().is_none());
    }

    #[test]
    fn test_subtype_tag_is_fixed() {
        let model = FormatModel::new(FormatConfig::default()).unwrap();
        let style = model.message("DrawStyle").unwrap();
        assert_eq!(style.subtype_name(100), Some("DiagramDrawStyle"));
        assert_eq!(style.subtype_name(101), None);
        assert!(model.message("DiagramDrawStyle").is_some());
    }

    #[test]
    fn test_record_names_drop_module_path() {
        let model = FormatModel::new(FormatConfig::default()).unwrap();
        assert_eq!(model.surrogate_for::<Rect>().unwrap().record_name, "BoxRecord");
        assert!(model.message("ColorRecord").is_some());
    }

    #[test]
    fn test_shared_model_is_built_once() {
        let a = FormatModel::shared().unwrap();
        let b = FormatModel::shared().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_schema_text_resolves_surrogates() {
        let model = FormatModel::new(FormatConfig::default()).unwrap();
        let text = model.schema_text();
        assert!(text.contains("message DrawStyle {"));
        assert!(text.contains("  ColorRecord line_color;"));
        assert!(text.contains("  optional FontRecord font;"));
        assert!(text.contains("  subtype 100 = DiagramDrawStyle;"));
        assert!(text.contains("  repeated PointRecord points;"));
    }

    #[test]
    fn test_registered_surrogate_converts() {
        let model = FormatModel::new(FormatConfig::default()).unwrap();
        let white = Rgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        };
        let record: ColorRecord = model.to_record(&white).unwrap();
        assert_eq!(record.argb, 0xffff_ffff);
        assert_eq!(model.from_record(record), Ok(white));
    }

    #[test]
    fn test_conversion_without_surrogate_is_an_error() {
        let mut builder = ModelBuilder::default();
        builder.surrogate::<PointRecord>(|s| s.field("x", FieldKind::Double));
        let model = builder.build(FormatConfig::default()).unwrap();
        let black = Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        };
        assert!(matches!(
            model.to_record::<ColorRecord>(&black),
            Err(ModelError::UnregisteredSurrogate { .. })
        ));
        assert!(matches!(
            model.from_record(ColorRecord { argb: 0 }),
            Err(ModelError::UnregisteredSurrogate { .. })
        ));
        assert!(model.to_record::<PointRecord>(&Point::ORIGIN).is_ok());
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let schema = MessageSchema::new("Broken")
            .field("a", FieldKind::Bool)
            .optional("a", FieldKind::UInt32);
        assert_eq!(
            schema.validate(),
            Err(ModelError::DuplicateField {
                message: "Broken",
                field: "a"
            })
        );
    }

    #[test]
    fn test_duplicate_subtype_is_rejected() {
        let schema = MessageSchema::new("Base").subtype(7, "A").subtype(7, "B");
        assert_eq!(
            schema.validate(),
            Err(ModelError::DuplicateSubtype {
                message: "Base",
                tag: 7
            })
        );
    }

    #[test]
    fn test_unknown_reference_is_rejected() {
        let mut builder = ModelBuilder::default();
        builder.message(MessageSchema::new("Orphan").field("child", FieldKind::Message("Missing")));
        let result = builder.build(FormatConfig::default());
        assert!(matches!(
            result,
            Err(ModelError::UnknownReference {
                message: "Orphan",
                field: "child",
                target: "Missing"
            })
        ));
    }

    #[test]
    fn test_unknown_subtype_target_is_rejected() {
        let mut builder = ModelBuilder::default();
        builder.message(MessageSchema::new("Base").subtype(100, "Nowhere"));
        assert!(matches!(
            builder.build(FormatConfig::default()),
            Err(ModelError::UnknownReference {
                message: "Base",
                target: "Nowhere",
                ..
            })
        ));
    }

    #[test]
    fn test_unregistered_native_is_rejected() {
        let mut builder = ModelBuilder::default();
        builder.message(MessageSchema::new("Holder").field("color", FieldKind::native::<Rgba8>()));
        assert!(matches!(
            builder.build(FormatConfig::default()),
            Err(ModelError::UnknownReference { message: "Holder", .. })
        ));
    }

    #[test]
    fn test_duplicate_surrogate_is_rejected() {
        let mut builder = ModelBuilder::default();
        builder
            .surrogate::<PointRecord>(|s| s.field("x", FieldKind::Double))
            .surrogate::<PointRecord>(|s| s.field("x", FieldKind::Double));
        // The second record schema collides first.
        assert_eq!(
            builder.build(FormatConfig::default()).err(),
            Some(ModelError::DuplicateMessage("PointRecord"))
        );
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let config: FormatConfig = serde_json::from_str(r#"{ "max_nesting": 4 }"#).unwrap();
        assert_eq!(config.max_nesting, 4);
        assert_eq!(config.max_payload_bytes, FormatConfig::default().max_payload_bytes);
    }
}
